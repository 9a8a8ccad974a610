/// Smoothed band energies, all in [0, 1]. Read-only to everything past the
/// extractor; the render stage never writes these back.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BandLevels {
    pub low: f32,
    pub mid: f32,
    pub high: f32,
    pub overall: f32,
}

/// Exponential smoothing rate toward the newest instantaneous reading.
pub const SMOOTHING: f32 = 0.2;

/// Instantaneous band levels from a byte magnitude spectrum (0..255 bins).
///
/// Band edges are fixed fractions of the spectrum length, so the same math
/// holds for any analyser size. Bins 0..1 (DC/sub-bass rumble) are skipped.
/// Per-band gamma compresses low-energy noise.
pub fn instantaneous(spectrum: &[u8]) -> BandLevels {
    let n = spectrum.len();
    if n == 0 {
        return BandLevels::default();
    }

    let band = |lo: usize, hi: usize| -> f32 {
        let hi = hi.min(n);
        if lo >= hi {
            return 0.0;
        }
        let sum: u32 = spectrum[lo..hi].iter().map(|&b| b as u32).sum();
        (sum as f32 / (hi - lo) as f32) / 255.0
    };

    let low = band(2, n * 8 / 100).powf(1.2); // ~<200 Hz
    let mid = band(n * 8 / 100, n * 35 / 100).powf(1.1); // ~200 Hz - 2 kHz
    let high = band(n * 35 / 100, n * 75 / 100).powf(1.05); // ~2 - 8 kHz
    let overall = (0.6 * low + 0.9 * mid + 0.5 * high) / 2.0;

    BandLevels {
        low,
        mid,
        high,
        overall,
    }
}

/// Rolling smoothed levels; the only piece of audio state that survives
/// across frames. With a silent input every level decays toward zero.
#[derive(Clone, Copy, Debug, Default)]
pub struct LevelExtractor {
    smoothed: BandLevels,
}

impl LevelExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance one frame toward `inst` scaled by the reactive gain.
    pub fn update(&mut self, inst: BandLevels, reactive_gain: f32) -> BandLevels {
        fn lerp(a: f32, b: f32, t: f32) -> f32 {
            a + (b - a) * t
        }

        let g = reactive_gain.clamp(0.0, 1.0);
        let s = &mut self.smoothed;
        s.low = lerp(s.low, inst.low * g, SMOOTHING);
        s.mid = lerp(s.mid, inst.mid * g, SMOOTHING);
        s.high = lerp(s.high, inst.high * g, SMOOTHING);
        s.overall = lerp(s.overall, inst.overall * g, SMOOTHING);
        *s
    }

    pub fn levels(&self) -> BandLevels {
        self.smoothed
    }
}
