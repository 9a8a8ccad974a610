use motif_visualizer::params::{
    Arrangement, Motif, PaletteKind, ParameterState, MAX_FOLD_ITERATIONS, MAX_INSTANCES,
};
use motif_visualizer::presets::{make_presets, select_preset};

fn assert_in_ui_ranges(p: &ParameterState) {
    assert!((3..=18).contains(&p.folds), "folds {}", p.folds);
    assert!((1..=MAX_FOLD_ITERATIONS).contains(&p.iterations));
    assert!(p.instance_count == 0 || (20..=140).contains(&p.instance_count));
    assert!(p.instance_count <= MAX_INSTANCES);
    assert!((0.02..=0.1).contains(&p.size));
    assert!((0.005..=0.05).contains(&p.thickness));
    assert!((0.6..=1.6).contains(&p.scale));
    assert!((0.0..=2.0).contains(&p.warp));
    assert!((1.0..=7.0).contains(&p.noise_scale));
    assert!((0.0..=0.8).contains(&p.noise_amount));
    assert!((0.3..=1.8).contains(&p.speed));
    assert!((0.0..=1.0).contains(&p.reactive_gain));
    assert!((0.0..=0.2).contains(&p.pixelation));
}

#[test]
fn clamping_snaps_out_of_range_values() {
    let wild = ParameterState {
        folds: 99,
        iterations: 40,
        instance_count: 10_000,
        size: 5.0,
        thickness: -1.0,
        scale: 0.0,
        warp: 9.0,
        noise_scale: 0.0,
        noise_amount: 2.0,
        speed: 0.0,
        reactive_gain: 3.0,
        pixelation: 1.0,
        ..ParameterState::default()
    }
    .clamped();

    assert_in_ui_ranges(&wild);
    assert_eq!(wild.folds, 18);
    assert_eq!(wild.iterations, MAX_FOLD_ITERATIONS);
    assert_eq!(wild.instance_count, 140);
    assert_eq!(wild.pixelation, 0.2);
}

#[test]
fn clamping_preserves_in_range_values() {
    let p = ParameterState::default();
    assert_eq!(p.clamped(), p);
}

#[test]
fn zero_instances_survive_clamping() {
    let p = ParameterState {
        instance_count: 0,
        ..ParameterState::default()
    }
    .clamped();
    assert_eq!(p.instance_count, 0);

    // Any nonzero value snaps into the slider range.
    let p = ParameterState {
        instance_count: 3,
        ..ParameterState::default()
    }
    .clamped();
    assert_eq!(p.instance_count, 20);
}

#[test]
fn randomized_states_respect_every_range() {
    for _ in 0..500 {
        let p = ParameterState::randomized();
        assert_in_ui_ranges(&p);
    }
}

#[test]
fn enum_cycles_cover_all_variants() {
    let mut m = Motif::Circle;
    for expected in [Motif::Polygon, Motif::Cross, Motif::Capsule, Motif::Circle] {
        m = m.next();
        assert_eq!(m, expected);
    }

    let mut a = Arrangement::Spiral;
    for _ in 0..4 {
        a = a.next();
    }
    assert_eq!(a, Arrangement::Spiral);

    let mut pal = PaletteKind::Neon;
    for _ in 0..6 {
        pal = pal.next();
    }
    assert_eq!(pal, PaletteKind::Neon);
}

#[test]
fn presets_are_complete_and_already_valid() {
    let presets = make_presets();
    assert_eq!(presets.len(), 6);

    for p in &presets {
        assert!(!p.name.trim().is_empty());
        // Preset bundles must be stable under clamping: applying one is a
        // pure replacement, never a correction.
        assert_eq!(p.state.clamped(), p.state, "preset '{}' out of range", p.name);
    }
}

#[test]
fn presets_are_pairwise_distinct() {
    let presets = make_presets();
    for a in 0..presets.len() {
        for b in (a + 1)..presets.len() {
            assert_ne!(
                presets[a].state, presets[b].state,
                "presets '{}' and '{}' are identical",
                presets[a].name, presets[b].name
            );
            assert_ne!(presets[a].name, presets[b].name);
        }
    }
}

#[test]
fn preset_lookup_by_index_and_name() {
    let presets = make_presets();

    assert_eq!(select_preset(&Some("0".into()), &presets), Some(0));
    assert_eq!(select_preset(&Some("5".into()), &presets), Some(5));
    assert_eq!(select_preset(&Some("6".into()), &presets), None);

    assert_eq!(select_preset(&Some("krakow".into()), &presets), Some(1));
    assert_eq!(select_preset(&Some("RELIC".into()), &presets), Some(5));
    assert_eq!(select_preset(&Some("no such preset".into()), &presets), None);
    assert_eq!(select_preset(&None, &presets), None);
    assert_eq!(select_preset(&Some("  ".into()), &presets), None);
}
