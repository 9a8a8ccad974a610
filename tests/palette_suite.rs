use motif_visualizer::field::FieldSample;
use motif_visualizer::palette;
use motif_visualizer::params::PaletteKind;

#[test]
fn phase_is_cyclic_in_unit_interval() {
    let samples = [
        FieldSample { field: 0.0, min_dist: 0.0 },
        FieldSample { field: 2.7, min_dist: -0.4 },
        FieldSample { field: 11.0, min_dist: 3.9 },
        FieldSample { field: 0.3, min_dist: 1e9 },
    ];
    for s in &samples {
        for t in [0.0f32, 1.3, 77.7, -5.0] {
            let ph = palette::phase(s, t);
            assert!(
                (0.0..1.0).contains(&ph),
                "phase {ph} escaped [0,1) for {s:?} at t={t}"
            );
        }
    }
}

#[test]
fn monochrome_family_is_gray_for_every_phase() {
    for step in 0..256 {
        let s = FieldSample {
            field: step as f32 * 0.015,
            min_dist: (step as f32 - 128.0) * 0.01,
        };
        for grain in [0.0f32, 0.25, 0.5, 0.99] {
            let [r, g, b] = palette::shade(&s, 4.2, PaletteKind::Mono, 0.3, grain);
            assert_eq!(r, g, "mono palette drifted off gray");
            assert_eq!(g, b, "mono palette drifted off gray");
        }
    }
}

#[test]
fn cosine_families_vary_across_phase() {
    for kind in [
        PaletteKind::Neon,
        PaletteKind::Sunset,
        PaletteKind::Cyber,
        PaletteKind::Ocean,
        PaletteKind::VioletDusk,
    ] {
        let a = palette::family_color(kind, 0.1);
        let b = palette::family_color(kind, 0.6);
        assert_ne!(a, b, "{kind:?} palette is flat across phase");
    }
}

#[test]
fn family_colors_are_finite() {
    for kind in PaletteKind::all() {
        for step in 0..64 {
            let c = palette::family_color(kind, step as f32 / 64.0);
            for ch in c {
                assert!(ch.is_finite());
                // Cosine palettes with |a|+|b| <= ~1.2 stay near the unit range;
                // shade() clamps before quantizing either way.
                assert!(ch > -0.5 && ch < 1.5, "{kind:?} produced wild channel {ch}");
            }
        }
    }
}

#[test]
fn grain_stays_subtle() {
    let s = FieldSample { field: 1.0, min_dist: 0.1 };
    let lo = palette::shade(&s, 2.0, PaletteKind::Cyber, 0.0, 0.0);
    let hi = palette::shade(&s, 2.0, PaletteKind::Cyber, 0.0, 1.0);
    for (a, b) in lo.iter().zip(hi.iter()) {
        // Full grain swing is +-0.02 around the base color (~5 byte steps),
        // plus the resaturation mix.
        assert!(
            (*a as i16 - *b as i16).unsigned_abs() <= 16,
            "grain swing too strong: {lo:?} vs {hi:?}"
        );
    }
}

#[test]
fn treble_contrast_darkens_midtones() {
    // A phase mapping to a midtone gets pushed down by a higher gamma.
    let s = FieldSample { field: 0.5, min_dist: 0.05 };
    let calm = palette::shade(&s, 0.0, PaletteKind::Mono, 0.0, 0.5);
    let bright_treble = palette::shade(&s, 0.0, PaletteKind::Mono, 1.0, 0.5);
    assert!(
        bright_treble[0] <= calm[0],
        "raising the contrast gamma should not brighten a midtone: {calm:?} -> {bright_treble:?}"
    );
}

#[test]
fn shade_output_is_deterministic() {
    let s = FieldSample { field: 1.4, min_dist: -0.02 };
    let a = palette::shade(&s, 9.1, PaletteKind::Sunset, 0.42, 0.77);
    let b = palette::shade(&s, 9.1, PaletteKind::Sunset, 0.42, 0.77);
    assert_eq!(a, b);
}
