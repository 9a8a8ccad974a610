/// Hard upper bound on motif instances; worst-case per-pixel cost control.
pub const MAX_INSTANCES: u32 = 160;
/// Hard cap on box-fold depth regardless of the configured iteration count.
pub const MAX_FOLD_ITERATIONS: u32 = 10;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Motif {
    Circle,
    Polygon,
    Cross,
    Capsule,
}

impl Motif {
    pub const fn all() -> [Self; 4] {
        [Self::Circle, Self::Polygon, Self::Cross, Self::Capsule]
    }

    pub fn next(self) -> Self {
        let all = Self::all();
        let mut idx = 0usize;
        while idx < all.len() {
            if all[idx] == self {
                return all[(idx + 1) % all.len()];
            }
            idx += 1;
        }
        Self::Circle
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Circle => "Circle",
            Self::Polygon => "Polygon",
            Self::Cross => "Cross",
            Self::Capsule => "Capsule",
        }
    }

    pub fn from_index(i: u32) -> Self {
        Self::all()[(i as usize) % 4]
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Arrangement {
    Spiral,
    Ring,
    Grid,
    Lissajous,
}

impl Arrangement {
    pub const fn all() -> [Self; 4] {
        [Self::Spiral, Self::Ring, Self::Grid, Self::Lissajous]
    }

    pub fn next(self) -> Self {
        let all = Self::all();
        let mut idx = 0usize;
        while idx < all.len() {
            if all[idx] == self {
                return all[(idx + 1) % all.len()];
            }
            idx += 1;
        }
        Self::Spiral
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Spiral => "Spiral",
            Self::Ring => "Ring",
            Self::Grid => "Grid",
            Self::Lissajous => "Lissajous",
        }
    }

    pub fn from_index(i: u32) -> Self {
        Self::all()[(i as usize) % 4]
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PaletteKind {
    Neon,
    Sunset,
    Cyber,
    Mono,
    Ocean,
    VioletDusk,
}

impl PaletteKind {
    pub const fn all() -> [Self; 6] {
        [
            Self::Neon,
            Self::Sunset,
            Self::Cyber,
            Self::Mono,
            Self::Ocean,
            Self::VioletDusk,
        ]
    }

    pub fn next(self) -> Self {
        let all = Self::all();
        let mut idx = 0usize;
        while idx < all.len() {
            if all[idx] == self {
                return all[(idx + 1) % all.len()];
            }
            idx += 1;
        }
        Self::Neon
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Neon => "Neon",
            Self::Sunset => "Sunset",
            Self::Cyber => "Cyber",
            Self::Mono => "Monochrome",
            Self::Ocean => "Ocean",
            Self::VioletDusk => "Violet Dusk",
        }
    }

    pub fn from_index(i: u32) -> Self {
        Self::all()[(i as usize) % 6]
    }
}

/// Complete visual control snapshot for one frame.
///
/// Replaced wholesale on any control change, preset, or randomize; the
/// evaluation core never sees partial mutation. `clamped()` is the single
/// place where UI ranges are enforced — downstream code assumes validated
/// values.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParameterState {
    pub motif: Motif,
    pub arrangement: Arrangement,
    pub palette: PaletteKind,
    pub folds: u32,
    pub iterations: u32,
    pub instance_count: u32,
    pub size: f32,
    pub thickness: f32,
    pub scale: f32,
    pub warp: f32,
    pub noise_scale: f32,
    pub noise_amount: f32,
    pub speed: f32,
    pub reactive_gain: f32,
    pub pixelation: f32,
}

impl Default for ParameterState {
    fn default() -> Self {
        Self {
            motif: Motif::Circle,
            arrangement: Arrangement::Spiral,
            palette: PaletteKind::Cyber,
            folds: 8,
            iterations: 3,
            instance_count: 80,
            size: 0.06,
            thickness: 0.02,
            scale: 1.0,
            warp: 1.1,
            noise_scale: 3.0,
            noise_amount: 0.35,
            speed: 0.9,
            reactive_gain: 0.6,
            pixelation: 0.0,
        }
    }
}

impl ParameterState {
    /// Normalize every field into its UI-enforced range.
    pub fn clamped(self) -> Self {
        // instance_count=0 stays 0 (explicit empty field); anything else
        // snaps into the slider range [20, 140].
        let instance_count = if self.instance_count == 0 {
            0
        } else {
            self.instance_count.clamp(20, 140)
        };

        Self {
            motif: self.motif,
            arrangement: self.arrangement,
            palette: self.palette,
            folds: self.folds.clamp(3, 18),
            iterations: self.iterations.clamp(1, MAX_FOLD_ITERATIONS),
            instance_count,
            size: self.size.clamp(0.02, 0.1),
            thickness: self.thickness.clamp(0.005, 0.05),
            scale: self.scale.clamp(0.6, 1.6),
            warp: self.warp.clamp(0.0, 2.0),
            noise_scale: self.noise_scale.clamp(1.0, 7.0),
            noise_amount: self.noise_amount.clamp(0.0, 0.8),
            speed: self.speed.clamp(0.3, 1.8),
            reactive_gain: self.reactive_gain.clamp(0.0, 1.0),
            pixelation: self.pixelation.clamp(0.0, 0.2),
        }
    }

    /// Fresh random state inside the live-show ranges.
    pub fn randomized() -> Self {
        fn rnd(a: f32, b: f32) -> f32 {
            a + fastrand::f32() * (b - a)
        }

        Self {
            motif: Motif::from_index(fastrand::u32(0..4)),
            arrangement: Arrangement::from_index(fastrand::u32(0..4)),
            palette: PaletteKind::from_index(fastrand::u32(0..6)),
            folds: fastrand::u32(5..18),
            iterations: fastrand::u32(1..6),
            instance_count: fastrand::u32(40..120),
            size: rnd(0.03, 0.09),
            thickness: rnd(0.01, 0.04),
            scale: rnd(0.8, 1.4),
            warp: rnd(0.6, 1.8),
            noise_scale: rnd(2.0, 6.0),
            noise_amount: rnd(0.15, 0.5),
            speed: rnd(0.5, 1.6),
            reactive_gain: rnd(0.2, 0.9),
            pixelation: rnd(0.0, 0.15),
        }
        .clamped()
    }
}
