use std::f32::consts::PI;

use motif_visualizer::field::{self, FrameTuning};
use motif_visualizer::levels::BandLevels;
use motif_visualizer::params::{Arrangement, Motif, PaletteKind, ParameterState};

fn golden_params() -> ParameterState {
    ParameterState {
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
    .clamped()
}

fn silent() -> BandLevels {
    BandLevels::default()
}

#[test]
fn kaleido_fold_angle_stays_in_wedge() {
    for folds in 3u32..=18 {
        let wedge = PI / folds as f32;
        for step in 0..720 {
            let ang = step as f32 / 720.0 * 2.0 * PI - PI;
            let r = 0.7;
            let (x, y) = field::kaleido_fold(r * ang.cos(), r * ang.sin(), folds);
            let out_ang = y.atan2(x);
            assert!(
                out_ang >= -1e-5 && out_ang <= wedge + 1e-5,
                "folds={folds} ang={ang}: folded angle {out_ang} outside [0, {wedge}]"
            );
            let out_r = (x * x + y * y).sqrt();
            assert!(
                (out_r - r).abs() < 1e-4,
                "folds={folds} ang={ang}: radius changed {r} -> {out_r}"
            );
        }
    }
}

#[test]
fn kaleido_fold_three_segments_at_zero_angle() {
    // theta=0, folds=3: |0 mod (2pi/3) - pi/3| = pi/3.
    let (x, y) = field::kaleido_fold(1.0, 0.0, 3);
    let ang = y.atan2(x);
    assert!(
        (ang - PI / 3.0).abs() < 1e-5,
        "expected pi/3, got {ang}"
    );
}

#[test]
fn kaleido_fold_is_total_at_origin() {
    let (x, y) = field::kaleido_fold(0.0, 0.0, 7);
    assert!(x.is_finite() && y.is_finite());
    assert!((x * x + y * y).sqrt() < 1e-6);
}

#[test]
fn box_fold_saturates_at_hard_cap() {
    let points = [(0.3f32, -0.7f32), (0.0, 0.0), (-1.2, 0.4), (0.9, 0.9)];
    for (x, y) in points {
        let capped = field::box_fold(x, y, 10);
        for extra in [11u32, 12, 50, u32::MAX] {
            let over = field::box_fold(x, y, extra);
            assert_eq!(
                capped, over,
                "iterations beyond the cap changed the fold at ({x}, {y})"
            );
        }
    }
}

#[test]
fn box_fold_depth_changes_structure_below_cap() {
    let a = field::box_fold(0.31, -0.54, 2);
    let b = field::box_fold(0.31, -0.54, 3);
    assert_ne!(a, b);
}

#[test]
fn accumulation_is_order_independent() {
    let p = golden_params();
    let tune = FrameTuning::new(&p, &silent(), 1.7);
    let t = tune.t_eff;

    let (qx, qy) = (0.21f32, -0.34f32);
    let mut forward_sum = 0.0f32;
    let mut forward_min = f32::MAX;
    for i in 0..p.instance_count {
        let (cx, cy) = field::arrange(i, t, p.arrangement);
        let d = field::sd_circle(qx - cx, qy - cy, tune.size);
        forward_sum += (-12.0 * d.abs()).exp();
        forward_min = forward_min.min(d);
    }

    let mut reverse_sum = 0.0f32;
    let mut reverse_min = f32::MAX;
    for i in (0..p.instance_count).rev() {
        let (cx, cy) = field::arrange(i, t, p.arrangement);
        let d = field::sd_circle(qx - cx, qy - cy, tune.size);
        reverse_sum += (-12.0 * d.abs()).exp();
        reverse_min = reverse_min.min(d);
    }

    assert!(
        (forward_sum - reverse_sum).abs() <= forward_sum.abs() * 1e-5 + 1e-6,
        "glow sum depends on instance order: {forward_sum} vs {reverse_sum}"
    );
    assert_eq!(forward_min, reverse_min, "orbit trap depends on instance order");
}

#[test]
fn zero_instances_reduce_to_empty_field() {
    let p = ParameterState {
        instance_count: 0,
        ..golden_params()
    }
    .clamped();
    assert_eq!(p.instance_count, 0);

    let tune = FrameTuning::new(&p, &silent(), 0.0);
    for (u, v) in [(0.0, 0.0), (0.5, 0.5), (0.93, 0.17)] {
        let s = field::evaluate((u, v), (320.0, 200.0), &p, &tune);
        assert_eq!(s.field, 0.0, "empty field should accumulate nothing");
        assert!(s.field.is_finite() && s.min_dist.is_finite());
    }
}

#[test]
fn golden_scenario_is_deterministic() {
    let p = golden_params();
    let tune = FrameTuning::new(&p, &silent(), 0.0);
    let res = (256.0, 160.0);

    for yi in 0..16 {
        for xi in 0..16 {
            let uv = (xi as f32 / 16.0, yi as f32 / 16.0);
            let a = field::evaluate(uv, res, &p, &tune);
            let b = field::evaluate(uv, res, &p, &tune);
            assert_eq!(a, b, "evaluation not reproducible at {uv:?}");
            assert!(a.field.is_finite() && a.field >= 0.0);
        }
    }
}

#[test]
fn silent_levels_leave_parameters_unmodulated() {
    let p = golden_params();
    let tune = FrameTuning::new(&p, &silent(), 2.0);
    assert!((tune.t_eff - 2.0 * p.speed).abs() < 1e-6);
    assert!((tune.size - p.size).abs() < 1e-7);
    assert!((tune.warp - p.warp).abs() < 1e-7);
}

#[test]
fn band_levels_modulate_speed_size_and_warp() {
    let p = golden_params();
    let loud = BandLevels {
        low: 1.0,
        mid: 1.0,
        high: 1.0,
        overall: 1.0,
    };
    let tune = FrameTuning::new(&p, &loud, 1.0);
    assert!((tune.t_eff - p.speed * 1.8).abs() < 1e-5);
    assert!((tune.size - p.size * 1.6).abs() < 1e-6);
    assert!((tune.warp - p.warp * 1.8).abs() < 1e-5);
}

#[test]
fn pixelation_snaps_to_mosaic_cells() {
    let p = ParameterState {
        pixelation: 0.2,
        ..golden_params()
    }
    .clamped();
    let tune = FrameTuning::new(&p, &silent(), 0.8);
    let res = (240.0, 240.0);

    // Cell size is 1 + 239*0.2 = 48.8 device pixels; uv points inside one
    // cell must evaluate identically.
    let a = field::evaluate((0.01, 0.01), res, &p, &tune);
    let b = field::evaluate((0.15, 0.18), res, &p, &tune);
    assert_eq!(a, b, "points in the same mosaic cell diverged");

    let c = field::evaluate((0.45, 0.45), res, &p, &tune);
    assert_ne!(a, c, "distinct mosaic cells collapsed");
}

#[test]
fn polygon_side_count_cycles_with_index() {
    // 5 + i%3 sides; a query angle past the first half-wedge separates the
    // three side counts.
    let d5 = field::sd_ngon(0.0852, 0.0522, 0.06, 5);
    let d6 = field::sd_ngon(0.0852, 0.0522, 0.06, 6);
    let d7 = field::sd_ngon(0.0852, 0.0522, 0.06, 7);
    assert_ne!(d5, d6);
    assert_ne!(d6, d7);
}

#[test]
fn motif_sdfs_sign_convention() {
    // Inside is negative, outside positive.
    assert!(field::sd_circle(0.0, 0.0, 0.06) < 0.0);
    assert!(field::sd_circle(0.2, 0.0, 0.06) > 0.0);

    assert!(field::sd_ngon(0.0, 0.001, 0.06, 6) < 0.0);
    assert!(field::sd_ngon(0.3, 0.1, 0.06, 6) > 0.0);

    assert!(field::sd_cross(0.0, 0.0, 0.066, 0.02) < 0.0);
    assert!(field::sd_cross(0.3, 0.3, 0.066, 0.02) > 0.0);

    assert!(field::sd_capsule(0.0, 0.0, 0.09, 0.02) < 0.0);
    assert!(field::sd_capsule(0.3, 0.0, 0.09, 0.02) > 0.0);
}

#[test]
fn arrangements_are_pure_in_index_and_time() {
    for mode in Arrangement::all() {
        for i in [0u32, 1, 17, 80, 159] {
            let a = field::arrange(i, 3.2, mode);
            let b = field::arrange(i, 3.2, mode);
            assert_eq!(a, b);
            assert!(a.0.is_finite() && a.1.is_finite());
        }
    }
}

#[test]
fn spiral_radius_grows_with_index() {
    let near = field::arrange(1, 0.0, Arrangement::Spiral);
    let far = field::arrange(120, 0.0, Arrangement::Spiral);
    let rn = (near.0 * near.0 + near.1 * near.1).sqrt();
    let rf = (far.0 * far.0 + far.1 * far.1).sqrt();
    assert!(rf > rn, "phyllotaxis radius must grow outward: {rn} vs {rf}");
}

#[test]
fn fbm_is_bounded_and_smoothish() {
    for yi in 0..32 {
        for xi in 0..32 {
            let x = xi as f32 * 0.37 - 4.0;
            let y = yi as f32 * 0.29 - 3.0;
            let v = field::fbm(x, y);
            // 5 octaves of [0,1) noise at halving amplitude.
            assert!((0.0..2.0).contains(&v), "fbm({x},{y}) = {v} out of range");
        }
    }
}

#[test]
fn hash_stays_in_unit_interval() {
    for i in 0..4096 {
        let v = field::hash(i as f32 * 1.7 - 300.0, i as f32 * -0.9 + 55.0);
        assert!((0.0..1.0).contains(&v), "hash escaped [0,1): {v}");
    }
}
