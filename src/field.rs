use crate::levels::BandLevels;
use crate::params::{Arrangement, Motif, ParameterState, MAX_FOLD_ITERATIONS};
use std::f32::consts::PI;

/// Golden angle in radians; drives the phyllotaxis spiral.
const GOLDEN_ANGLE: f32 = 2.399_963_23;

/// Accumulated glow and orbit-trap distance at one evaluation point.
/// Consumed immediately by the palette mapper, never retained.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FieldSample {
    pub field: f32,
    pub min_dist: f32,
}

/// Per-frame effective parameters after audio-reactive modulation.
///
/// Computed once per frame on the host side; per-pixel evaluation reads it
/// immutably, so permuting pixel order can never change a frame.
#[derive(Clone, Copy, Debug)]
pub struct FrameTuning {
    pub t_eff: f32,
    pub size: f32,
    pub warp: f32,
}

impl FrameTuning {
    pub fn new(params: &ParameterState, levels: &BandLevels, t: f32) -> Self {
        let overall = levels.overall.clamp(0.0, 1.0);
        let speed = params.speed * (1.0 + 0.8 * overall);
        Self {
            t_eff: t * speed,
            size: params.size * (1.0 + 0.6 * levels.low),
            warp: params.warp * (1.0 + 0.8 * levels.mid),
        }
    }
}

#[inline]
pub fn hash(x: f32, y: f32) -> f32 {
    // GLSL-style fract: always in [0, 1).
    ((x * 127.1 + y * 311.7).sin() * 43758.5453123).rem_euclid(1.0)
}

/// Lattice value noise with smoothstep interpolation.
pub fn noise(x: f32, y: f32) -> f32 {
    let ix = x.floor();
    let iy = y.floor();
    let fx = x - ix;
    let fy = y - iy;

    let a = hash(ix, iy);
    let b = hash(ix + 1.0, iy);
    let c = hash(ix, iy + 1.0);
    let d = hash(ix + 1.0, iy + 1.0);

    let ux = fx * fx * (3.0 - 2.0 * fx);
    let uy = fy * fy * (3.0 - 2.0 * fy);

    a + (b - a) * ux + (c - a) * uy * (1.0 - ux) + (d - b) * ux * uy
}

/// 5-octave fractal noise, persistence 0.5, lacunarity 2.
pub fn fbm(mut x: f32, mut y: f32) -> f32 {
    let mut v = 0.0;
    let mut amp = 0.5;
    for _ in 0..5 {
        v += amp * noise(x, y);
        x *= 2.0;
        y *= 2.0;
        amp *= 0.5;
    }
    v
}

/// Angular mirror into the wedge [0, PI/n]; radius is preserved.
pub fn kaleido_fold(x: f32, y: f32, folds: u32) -> (f32, f32) {
    let n = folds as f32;
    let ang = y.atan2(x);
    let r = (x * x + y * y).sqrt();
    let k = 2.0 * PI / n;
    let a = (ang.rem_euclid(k) - 0.5 * k).abs();
    (a.cos() * r, a.sin() * r)
}

/// Iterated box fold: abs, scale/translate, small rotation each pass.
/// `iterations` beyond MAX_FOLD_ITERATIONS has no further effect.
pub fn box_fold(mut x: f32, mut y: f32, iterations: u32) -> (f32, f32) {
    let (rc, rs) = (0.2f32.cos(), 0.2f32.sin());
    let it = iterations.min(MAX_FOLD_ITERATIONS);
    for _ in 0..it {
        x = x.abs() * 1.25 - 0.15;
        y = y.abs() * 1.25 - 0.15;
        let rx = rc * x - rs * y;
        let ry = rs * x + rc * y;
        x = rx;
        y = ry;
    }
    (x, y)
}

// Motif SDFs. Negative inside, distance to the boundary outside.

#[inline]
pub fn sd_circle(x: f32, y: f32, r: f32) -> f32 {
    (x * x + y * y).sqrt() - r
}

pub fn sd_ngon(x: f32, y: f32, r: f32, sides: u32) -> f32 {
    let n = sides as f32;
    let ang = y.atan2(x);
    let a = 2.0 * PI / n;
    ((0.5 + ang / a).floor() * a - ang).cos() * (x * x + y * y).sqrt() - r
}

pub fn sd_cross(x: f32, y: f32, s: f32, t: f32) -> f32 {
    let px = x.abs();
    let py = y.abs();
    let d1 = (px - t).max(py - s);
    let d2 = (py - t).max(px - s);
    d1.min(d2)
}

pub fn sd_capsule(x: f32, y: f32, half_len: f32, r: f32) -> f32 {
    let px = (x.abs() - half_len).max(0.0);
    (px * px + y * y).sqrt() - r
}

/// Position of instance `i` at effective time `t`. Instances have no
/// identity across frames; this is a pure function of (i, t, mode).
pub fn arrange(i: u32, t: f32, mode: Arrangement) -> (f32, f32) {
    let fi = i as f32;
    match mode {
        Arrangement::Spiral => {
            let a = fi * GOLDEN_ANGLE + 0.25 * t;
            let r = 0.015 * (fi + 1.0).sqrt() * (0.9 + 0.2 * (0.11 * t).sin());
            (r * a.cos(), r * a.sin())
        }
        Arrangement::Ring => {
            let per = 12.0 + 8.0 * (0.07 * t).sin();
            let ring = (fi / per).floor();
            let idx = fi - ring * per;
            let a = (idx / per) * 2.0 * PI + 0.1 * t * (1.0 + 0.3 * ring);
            let r = 0.12 + 0.08 * ring;
            (r * a.cos(), r * a.sin())
        }
        Arrangement::Grid => {
            let w = 9.0;
            let x = fi.rem_euclid(w) - 0.5 * (w - 1.0);
            let y = (fi / w).floor() - 0.5 * (w - 1.0);
            (
                0.08 * x + 0.02 * (0.31 * t + y).sin(),
                0.08 * y + 0.02 * (0.23 * t + x).cos(),
            )
        }
        Arrangement::Lissajous => {
            let s = 0.12 * fi + 0.6 * t;
            (0.35 * (2.0 * s).sin(), 0.35 * (3.0 * s + 0.7).sin())
        }
    }
}

#[inline]
fn motif_distance(motif: Motif, i: u32, qx: f32, qy: f32, size: f32, thickness: f32) -> f32 {
    match motif {
        Motif::Circle => sd_circle(qx, qy, size),
        Motif::Polygon => sd_ngon(qx, qy, size, 5 + i % 3),
        Motif::Cross => sd_cross(qx, qy, size * 1.1, thickness),
        Motif::Capsule => sd_capsule(qx, qy, size * 1.5, thickness),
    }
}

#[inline]
fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Evaluate the glow field for one output sample.
///
/// `uv` is in [0,1]^2 over a raster of `res` device pixels. Assumes a
/// clamped ParameterState; all math here is total, so there is no error
/// path. Instance accumulation is a pure sum/min and the loop runs only to
/// the configured count while density normalization stays tied to that
/// same count, so visual density is independent of any internal cap.
pub fn evaluate(
    uv: (f32, f32),
    res: (f32, f32),
    params: &ParameterState,
    tune: &FrameTuning,
) -> FieldSample {
    let (mut u, mut v) = uv;
    let t = tune.t_eff;

    // Pixelation: snap to a mosaic grid between 1 and 240 device pixels.
    if params.pixelation > 0.001 {
        let px = 1.0 + (240.0 - 1.0) * params.pixelation;
        u = (u * res.0 / px).floor() * px / res.0;
        v = (v * res.1 / px).floor() * px / res.1;
    }

    // Centered, aspect-corrected coordinates.
    let px = (u * 2.0 - 1.0) * (res.0 / res.1);
    let py = v * 2.0 - 1.0;

    // Domain warp.
    let mut wx = px / params.scale;
    let mut wy = py / params.scale;
    let ns = params.noise_scale;
    let n0 = fbm(wx * ns + 0.15 * t, wy * ns + 0.15 * t);
    let n1 = fbm(wx * ns * 1.3 - 0.12 * t, wy * ns * 1.3 - 0.12 * t);
    let amp = params.noise_amount * tune.warp;
    wx += (n0 - 0.5) * 2.0 * amp;
    wy += (n1 - 0.5) * 2.0 * amp;

    // Kaleidoscope, then self-similar box folds.
    let (kx, ky) = kaleido_fold(wx, wy, params.folds);
    let (fx, fy) = box_fold(kx, ky, params.iterations);

    // Glow accumulation over arranged motif instances.
    let count = params.instance_count;
    let mut accum = 0.0f32;
    let mut min_dist = 1e9f32;
    for i in 0..count {
        let (cx, cy) = arrange(i, t, params.arrangement);
        let d = motif_distance(params.motif, i, fx - cx, fy - cy, tune.size, params.thickness);
        min_dist = min_dist.min(d);
        accum += (-12.0 * d.abs()).exp();
    }
    accum /= (count as f32 * 0.035).max(1.0);

    // Vignette: full brightness near center, darkening toward the edge.
    let vig = smoothstep(1.4, 0.2, (px * px + py * py).sqrt());
    let field = accum * (0.85 + (1.15 - 0.85) * vig);

    FieldSample { field, min_dist }
}
