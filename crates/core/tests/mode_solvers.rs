use std::f64::consts::PI;

use approx::assert_relative_eq;
use membrane_modes_core::special::{bessel_j, bessel_j_zero};
use membrane_modes_core::{
    evaluate_field, CircularMembrane, Membrane, MembraneError, RectangularMembrane, SampleGrid,
};

#[test]
fn circular_lambda_tracks_bessel_zeros() {
    for m in 0..4 {
        for n in 1..4 {
            for radius in [0.5, 1.0, 3.0] {
                let membrane = CircularMembrane::new(radius, 1.0, m, n, 1.0).unwrap();
                let root = bessel_j_zero(m, n).unwrap();

                assert_relative_eq!(membrane.lambda(), root / radius, max_relative = 1e-9);
                assert!(bessel_j(m, membrane.lambda() * radius).abs() < 1e-12);
            }
        }
    }
}

#[test]
fn rectangular_lambda_matches_closed_form() {
    for (a, b, m, n) in [(1.0, 2.0, 1.0, 1.0), (2.0, 0.5, 3.0, 2.0), (1.5, 1.5, 2.5, 1.0)] {
        let membrane = RectangularMembrane::new(a, b, m, n, 1.0, 1.0).unwrap();
        let expected = PI / (a * b) * ((n * b).powi(2) + (m * a).powi(2)).sqrt();
        assert_relative_eq!(membrane.lambda(), expected, max_relative = 1e-14);
    }
}

#[test]
fn normalization_is_idempotent_for_both_shapes() {
    let mut membranes: Vec<Box<dyn Membrane>> = vec![
        Box::new(CircularMembrane::new(1.0, 1.0, 0, 2, 3.0).unwrap()),
        Box::new(CircularMembrane::new(2.0, 0.5, 2, 1, -1.0).unwrap()),
        Box::new(RectangularMembrane::new(1.0, 2.0, 2.0, 3.0, 1.0, 7.0).unwrap()),
    ];

    for membrane in membranes.iter_mut() {
        membrane.normalize(0.25).unwrap();
        assert_relative_eq!(membrane.amplitude(), 0.25, max_relative = 1e-12);

        let probe = membrane.evaluate(0.3, 0.4, 0.2);
        membrane.normalize(0.25).unwrap();
        assert_relative_eq!(membrane.amplitude(), 0.25, max_relative = 1e-12);
        assert_relative_eq!(membrane.evaluate(0.3, 0.4, 0.2), probe, max_relative = 1e-12);
    }
}

#[test]
fn rectangular_membrane_starts_flat_everywhere() {
    let membrane = RectangularMembrane::new(1.0, 2.0, 3.0, 2.0, 1.0, 0.5).unwrap();
    let grid = SampleGrid::for_membrane(&membrane, 16).unwrap();
    let (x, y) = grid.native();

    let field = evaluate_field(&membrane, x.view(), y.view(), 0.0).unwrap();
    assert!(field.iter().all(|&z| z == 0.0));
}

#[test]
fn circular_centre_depends_on_order() {
    let t = 0.37;
    for m in 1..4 {
        let membrane = CircularMembrane::new(1.0, 1.0, m, 2, 1.0).unwrap();
        assert_eq!(membrane.evaluate(0.0, 0.8, t), 0.0);
    }

    let axisymmetric = CircularMembrane::new(1.0, 1.0, 0, 2, 1.0).unwrap();
    let expected = (axisymmetric.lambda() * t).sin();
    assert_relative_eq!(axisymmetric.evaluate(0.0, 0.8, t), expected, epsilon = 1e-15);
    assert!(expected.abs() > 0.0);
}

#[test]
fn both_shapes_are_periodic() {
    let membranes: Vec<Box<dyn Membrane>> = vec![
        Box::new(CircularMembrane::new(1.0, 1.3, 2, 2, 1.0).unwrap()),
        Box::new(RectangularMembrane::new(1.0, 2.0, 2.0, 1.0, 0.8, 1.0).unwrap()),
    ];

    for membrane in &membranes {
        let period = membrane.period();
        assert!(period > 0.0);
        for t in [0.0, 0.21, 1.7] {
            assert_relative_eq!(
                membrane.evaluate(0.35, 0.6, t + period),
                membrane.evaluate(0.35, 0.6, t),
                epsilon = 1e-12
            );
        }
    }
}

#[test]
fn fundamental_circular_mode_peaks_at_the_centre() {
    let mut membrane = CircularMembrane::new(1.0, 1.0, 0, 1, 1.0).unwrap();
    membrane.normalize(0.5).unwrap();

    assert_relative_eq!(membrane.amplitude(), 0.5, max_relative = 1e-12);
    let period = membrane.period();
    assert!(period > 0.0);

    // J_0(0) = 1 and sin(π/2) = 1, so the centre reaches the normalized scale.
    let centre = membrane.evaluate(0.0, 0.0, period / 4.0);
    assert!(centre > 0.0);
    assert_relative_eq!(centre, membrane.amplitude_scale(), max_relative = 1e-12);
    // The envelope uses |J_0| at its first critical point (≈ 0.4028) times √2.
    assert_relative_eq!(
        centre,
        0.5 / (0.402_759_395_702_552_8 * 2.0_f64.sqrt()),
        max_relative = 1e-9
    );
}

#[test]
fn fundamental_rectangular_mode_peaks_at_the_midpoint() {
    let membrane = RectangularMembrane::new(1.0, 2.0, 1.0, 1.0, 1.0, 0.5).unwrap();
    let (a, b) = membrane.dimensions();

    let peak = membrane.evaluate(a / 2.0, b / 2.0, membrane.period() / 4.0);
    assert_relative_eq!(peak, 0.5, epsilon = 1e-12);
}

#[test]
fn degenerate_parameters_fail_fast() {
    assert!(matches!(
        CircularMembrane::new(1.0, 0.0, 0, 1, 1.0),
        Err(MembraneError::Domain(_))
    ));
    assert!(matches!(
        CircularMembrane::compute_lambda(0.0, 0, 1),
        Err(MembraneError::Domain(_))
    ));
    assert!(matches!(
        RectangularMembrane::compute_lambda(1.0, 1.0, 0.0, 1.0),
        Err(MembraneError::Domain(_))
    ));
}
