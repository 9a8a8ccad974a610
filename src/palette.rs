use crate::field::FieldSample;
use crate::params::PaletteKind;
use std::f32::consts::TAU;

/// Cyclic [0,1) color phase from the field value, the orbit-trap distance
/// and a slow time swell.
pub fn phase(sample: &FieldSample, t_eff: f32) -> f32 {
    (0.35 * sample.field + 0.25 * (0.2 * t_eff).sin() + 0.2 * sample.min_dist).rem_euclid(1.0)
}

#[inline]
fn cosine(t: f32, a: [f32; 3], b: [f32; 3], c: [f32; 3], d: [f32; 3]) -> [f32; 3] {
    [
        a[0] + b[0] * (TAU * (c[0] * t + d[0])).cos(),
        a[1] + b[1] * (TAU * (c[1] * t + d[1])).cos(),
        a[2] + b[2] * (TAU * (c[2] * t + d[2])).cos(),
    ]
}

/// Base color for a phase in [0,1). Five cosine families plus literal
/// grayscale for Monochrome.
pub fn family_color(kind: PaletteKind, t: f32) -> [f32; 3] {
    let one = [1.0, 1.0, 1.0];
    match kind {
        PaletteKind::Neon => cosine(t, [0.5; 3], [0.5; 3], one, [0.00, 0.33, 0.67]),
        PaletteKind::Sunset => cosine(
            t,
            [0.55, 0.35, 0.30],
            [0.45, 0.35, 0.30],
            one,
            [0.0, 0.15, 0.25],
        ),
        PaletteKind::Cyber => cosine(
            t,
            [0.42, 0.45, 0.50],
            [0.58, 0.55, 0.50],
            one,
            [0.05, 0.40, 0.90],
        ),
        PaletteKind::Mono => [t, t, t],
        PaletteKind::Ocean => cosine(
            t,
            [0.28, 0.32, 0.40],
            [0.72, 0.68, 0.60],
            one,
            [0.10, 0.20, 0.35],
        ),
        PaletteKind::VioletDusk => cosine(
            t,
            [0.35, 0.30, 0.45],
            [0.65, 0.60, 0.55],
            one,
            [0.3, 0.1, 0.7],
        ),
    }
}

fn resaturate(c: [f32; 3], sat: f32) -> [f32; 3] {
    let g = c[0] * 0.299 + c[1] * 0.587 + c[2] * 0.114;
    [
        g + (c[0] - g) * sat,
        g + (c[1] - g) * sat,
        g + (c[2] - g) * sat,
    ]
}

/// Map one field sample to a display color.
///
/// `high_level` drives the audio-reactive contrast curve; `grain` is a
/// per-pixel hash in [0,1) adding +-0.02 of broadband noise so flat areas
/// do not band. No error conditions; output is clamped to sRGB bytes.
pub fn shade(sample: &FieldSample, t_eff: f32, kind: PaletteKind, high_level: f32, grain: f32) -> [u8; 3] {
    let ph = phase(sample, t_eff);
    let mut col = family_color(kind, ph);

    let gamma = 1.1 + 0.6 * high_level;
    let boost = 1.0 + 0.15 * sample.field;
    let noise = (grain - 0.5) * 0.04;
    for ch in &mut col {
        *ch = ch.max(0.0).powf(gamma) * boost + noise;
    }

    let col = resaturate(col, 1.15);
    [
        (col[0].clamp(0.0, 1.0) * 255.0) as u8,
        (col[1].clamp(0.0, 1.0) * 255.0) as u8,
        (col[2].clamp(0.0, 1.0) * 255.0) as u8,
    ]
}
