// [libs/domain/models-rs/src/lib.rs]
/*!
 * =================================================================
 * APARATO: DOMAIN MODELS LIBRARY ROOT (V5.0 - SSoT MASTER)
 * CLASIFICACIÓN: CRATE ROOT (ESTRATO L2)
 * RESPONSABILIDAD: EXPOSICIÓN NOMINAL DE CONTRATOS DEL DOMINIO
 *
 * VISION HIPER-HOLÍSTICA 2026:
 * 1. SINGLE SOURCE OF TRUTH: Toda entidad que cruza un estrato (DB,
 *    duplex, HTTP) nace en esta crate y se re-exporta nominalmente.
 * 2. ZERO LOGIC: Los modelos transportan datos y saneamiento de
 *    frontera; la lógica de conflicto y orden vive en sus motores.
 * =================================================================
 */

/// Entrada de presencia efímera y paleta cromática de operadores.
pub mod presence;
/// Gramática discriminada del canal duplex (cliente y servidor).
pub mod protocol;
/// Entidad de tarea, columnas del tablero y sellos de versión por campo.
pub mod task;

pub use presence::{PresencePatch, PresenceUser, PRESENCE_COLOR_PALETTE};
pub use protocol::{
    ClientMessage, ConflictResolution, ConflictResolvedPayload, CreateTaskPayload,
    DeleteTaskPayload, ErrorCode, ErrorPayload, InitialStatePayload, MoveTaskPayload,
    PresenceUpdatePayload, QueuedOperation, RebalancedPayload, ReplayQueuePayload,
    ServerMessage, SyncRequestPayload, TaskContentChanges, TaskCreatedPayload,
    TaskDeletedPayload, UpdateTaskPayload,
};
pub use task::{
    sanitize_description, sanitize_title, BoardColumn, Task, TaskField,
    DEFAULT_TASK_TITLE, DESCRIPTION_MAX_CHARS, TITLE_MAX_CHARS,
};
