// [libs/infra/db-turso/src/repositories/mod.rs]
/*!
 * =================================================================
 * APARATO: REPOSITORY ACCESS MATRIX (V7.0 - BOARD TOPOLOGY)
 * CLASIFICACIÓN: INFRASTRUCTURE LAYER (ESTRATO L3)
 * RESPONSABILIDAD: ORQUESTACIÓN DE SUBSISTEMAS DE PERSISTENCIA
 *
 * # Mathematical Proof (Modular Encapsulation):
 * El barrel file actúa como una interfaz galvánica: solo las
 * estructuras de autoridad (Repositories) y sus recibos quedan
 * expuestos al exterior, reduciendo el acoplamiento sistémico.
 * =================================================================
 */

/// Mutaciones ACID, veredictos de conflicto y rebalanceo del tablero.
pub mod task_repository;

pub use task_repository::{
    MoveReceipt, MutationOutcome, NewTaskDraft, TaskRepository,
};
