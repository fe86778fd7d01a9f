// [libs/domain/conflict-engine/src/lib.rs]
/*!
 * =================================================================
 * APARATO: CONFLICT ENGINE LIBRARY ROOT (V2.0 - PURE STRATA)
 * CLASIFICACIÓN: CRATE ROOT (ESTRATO L2)
 * RESPONSABILIDAD: EXPOSICIÓN NOMINAL DEL RESOLUTOR DE CONFLICTOS
 * =================================================================
 */

/// Análisis causal por campo y plantillas de explicación.
pub mod resolution;

pub use resolution::{
    analyze_against_current, resolution_reason, ConflictAnalysis, TaskChangeSet,
};
