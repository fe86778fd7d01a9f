// [tests/mirror/libs/core/ordering_engine/fractional_positioning.test.rs]
/*!
 * =================================================================
 * APARATO: CERTIFICADOR DE POSICIONAMIENTO FRACCIONAL (V4.0 - ZENITH)
 * CLASIFICACIÓN: TRINITY EVIDENCE // ESTRATO L1-MIRROR
 * RESPONSABILIDAD: AUDITORÍA DE ARITMÉTICA DE PUNTO MEDIO Y AGOTAMIENTO
 *
 * # Mathematical Proof (Strict Betweenness):
 * Para vecinas (a, b) con b - a >= MIN_POSITION_GAP, el punto medio
 * a + (b - a) / 2 es estrictamente interior en aritmética IEEE-754
 * mientras el hueco domine al ULP de 'a'; el generador acota el espacio
 * de búsqueda a 1e12 para preservar esa dominancia.
 * =================================================================
 */

use proptest::prelude::*;
use syncboard_core_ordering::{
    evenly_spaced_position, position_at_end, position_between, PlacementOutcome,
    MIN_POSITION_GAP, POSITION_STEP,
};

#[test]
fn certify_position_at_end_over_empty_column() {
    assert_eq!(position_at_end(&[]), POSITION_STEP);
}

#[test]
fn certify_position_at_end_steps_past_maximum() {
    let column_positions = [65536.0, 131072.0, 32768.0];
    assert_eq!(position_at_end(&column_positions), 131072.0 + POSITION_STEP);
}

#[test]
fn certify_between_with_no_neighbors_yields_canonical_step() {
    assert_eq!(
        position_between(None, None),
        PlacementOutcome::Computed(POSITION_STEP)
    );
}

#[test]
fn certify_between_head_insert_halves_successor() {
    // Inserción en cabeza: la sucesora se divide por la mitad.
    assert_eq!(
        position_between(None, Some(1.2)),
        PlacementOutcome::Computed(0.6)
    );

    // Bajo el doble del hueco mínimo, la cabeza declara agotamiento.
    assert_eq!(position_between(None, Some(0.8)), PlacementOutcome::Exhausted);
}

#[test]
fn certify_between_tail_insert_steps_past_predecessor() {
    assert_eq!(
        position_between(Some(42.0), None),
        PlacementOutcome::Computed(42.0 + POSITION_STEP)
    );
}

#[test]
fn certify_between_interior_midpoint_and_exhaustion() {
    match position_between(Some(65536.0), Some(131072.0)) {
        PlacementOutcome::Computed(midpoint) => {
            assert!(midpoint > 65536.0 && midpoint < 131072.0);
            assert_eq!(midpoint, 98304.0);
        }
        PlacementOutcome::Exhausted => panic!("GAP_COLLAPSE: Healthy gap declared exhausted."),
    }

    // Hueco de 0.3 < MIN_POSITION_GAP: sentinela de agotamiento.
    assert_eq!(
        position_between(Some(1.0), Some(1.3)),
        PlacementOutcome::Exhausted
    );
}

#[test]
fn certify_evenly_spaced_layout_multiples() {
    let leveled_layout: Vec<f64> = (0..3).map(evenly_spaced_position).collect();
    assert_eq!(leveled_layout, vec![65536.0, 131072.0, 196608.0]);
}

proptest! {
    /// Con hueco sano, el punto medio es estrictamente interior.
    #[test]
    fn property_midpoint_strictly_between(
        before_position in 0.0f64..1e12,
        raw_gap in 0.5f64..1e6,
    ) {
        let after_position = before_position + raw_gap;
        prop_assume!(after_position - before_position >= MIN_POSITION_GAP);

        match position_between(Some(before_position), Some(after_position)) {
            PlacementOutcome::Computed(midpoint) => {
                prop_assert!(midpoint > before_position);
                prop_assert!(midpoint < after_position);
            }
            PlacementOutcome::Exhausted => {
                return Err(TestCaseError::fail("GAP_COLLAPSE: healthy gap exhausted"));
            }
        }
    }

    /// Bajo el hueco mínimo, el veredicto es siempre el sentinela.
    #[test]
    fn property_sub_minimum_gap_exhausts(
        before_position in 0.0f64..1e9,
        starved_gap in 0.0f64..0.499,
    ) {
        let after_position = before_position + starved_gap;
        prop_assume!(after_position - before_position < MIN_POSITION_GAP);

        prop_assert_eq!(
            position_between(Some(before_position), Some(after_position)),
            PlacementOutcome::Exhausted
        );
    }

    /// El final de columna siempre domina estrictamente a toda posición vigente.
    #[test]
    fn property_end_position_dominates_column(
        column_positions in proptest::collection::vec(0.1f64..1e12, 1..64),
    ) {
        let tail_position = position_at_end(&column_positions);
        for existing_position in &column_positions {
            prop_assert!(tail_position > *existing_position);
        }
        prop_assert!(tail_position > 0.0);
    }
}
