use crate::params::{Arrangement, Motif, PaletteKind, ParameterState};

pub struct NamedPreset {
    pub name: &'static str,
    pub state: ParameterState,
}

/// The six live-set presets, bound to keys 1..6. Applying one replaces the
/// whole ParameterState; presets are never merged into the current state.
pub fn make_presets() -> Vec<NamedPreset> {
    vec![
        NamedPreset {
            name: "Monolith Spiral",
            state: ParameterState {
                motif: Motif::Capsule,
                arrangement: Arrangement::Spiral,
                palette: PaletteKind::Ocean,
                folds: 12,
                iterations: 2,
                instance_count: 72,
                size: 0.07,
                thickness: 0.03,
                scale: 1.1,
                warp: 0.8,
                noise_scale: 2.4,
                noise_amount: 0.25,
                speed: 0.7,
                reactive_gain: 0.4,
                pixelation: 0.0,
            },
        },
        NamedPreset {
            name: "Krakow Bloom",
            state: ParameterState {
                motif: Motif::Circle,
                arrangement: Arrangement::Spiral,
                palette: PaletteKind::Cyber,
                folds: 10,
                iterations: 4,
                instance_count: 96,
                size: 0.055,
                thickness: 0.02,
                scale: 1.0,
                warp: 1.4,
                noise_scale: 3.3,
                noise_amount: 0.38,
                speed: 1.0,
                reactive_gain: 0.7,
                pixelation: 0.0,
            },
        },
        NamedPreset {
            name: "Grid Apparitions",
            state: ParameterState {
                motif: Motif::Polygon,
                arrangement: Arrangement::Grid,
                palette: PaletteKind::VioletDusk,
                folds: 6,
                iterations: 3,
                instance_count: 81,
                size: 0.07,
                thickness: 0.02,
                scale: 1.2,
                warp: 1.0,
                noise_scale: 4.5,
                noise_amount: 0.30,
                speed: 0.85,
                reactive_gain: 0.5,
                pixelation: 0.08,
            },
        },
        NamedPreset {
            name: "Ring of Reeds",
            state: ParameterState {
                motif: Motif::Cross,
                arrangement: Arrangement::Ring,
                palette: PaletteKind::Sunset,
                folds: 16,
                iterations: 2,
                instance_count: 60,
                size: 0.05,
                thickness: 0.028,
                scale: 1.0,
                warp: 1.2,
                noise_scale: 2.8,
                noise_amount: 0.22,
                speed: 0.9,
                reactive_gain: 0.6,
                pixelation: 0.0,
            },
        },
        NamedPreset {
            name: "Broken Lissajous",
            state: ParameterState {
                motif: Motif::Capsule,
                arrangement: Arrangement::Lissajous,
                palette: PaletteKind::Neon,
                folds: 7,
                iterations: 5,
                instance_count: 88,
                size: 0.06,
                thickness: 0.025,
                scale: 0.95,
                warp: 1.5,
                noise_scale: 5.0,
                noise_amount: 0.42,
                speed: 1.25,
                reactive_gain: 0.7,
                pixelation: 0.12,
            },
        },
        NamedPreset {
            name: "Monochrome Relic",
            state: ParameterState {
                motif: Motif::Polygon,
                arrangement: Arrangement::Spiral,
                palette: PaletteKind::Mono,
                folds: 9,
                iterations: 4,
                instance_count: 70,
                size: 0.06,
                thickness: 0.018,
                scale: 1.05,
                warp: 0.9,
                noise_scale: 3.6,
                noise_amount: 0.28,
                speed: 0.65,
                reactive_gain: 0.3,
                pixelation: 0.0,
            },
        },
    ]
}

/// Resolve a `--preset` query by index or case-insensitive name substring.
pub fn select_preset(query: &Option<String>, presets: &[NamedPreset]) -> Option<usize> {
    let q = query.as_deref()?.trim();
    if q.is_empty() {
        return None;
    }
    if let Ok(i) = q.parse::<usize>() {
        return (i < presets.len()).then_some(i);
    }
    let q_l = q.to_lowercase();
    presets
        .iter()
        .position(|p| p.name.to_lowercase().contains(&q_l))
}
