// [libs/core/ordering-engine/src/lib.rs]
/*!
 * =================================================================
 * APARATO: ORDERING ENGINE LIBRARY ROOT (V3.0 - PURE STRATA)
 * CLASIFICACIÓN: CRATE ROOT (ESTRATO L1)
 * RESPONSABILIDAD: EXPOSICIÓN NOMINAL DEL MOTOR DE POSICIONAMIENTO
 * =================================================================
 */

/// Aritmética fraccional y layout canónico de rebalanceo.
pub mod positioning;

pub use positioning::{
    evenly_spaced_position, position_at_end, position_between, PlacementOutcome,
    MIN_POSITION_GAP, POSITION_STEP,
};
