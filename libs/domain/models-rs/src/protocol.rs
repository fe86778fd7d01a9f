// [libs/domain/models-rs/src/protocol.rs]
/*!
 * =================================================================
 * APARATO: DUPLEX PROTOCOL CONTRACTS (V12.0 - WIRE PARITY MASTER)
 * CLASIFICACIÓN: DOMAIN MODELS (ESTRATO L2)
 * RESPONSABILIDAD: GRAMÁTICA SOBERANA DEL CANAL DUPLEX
 *
 * VISION HIPER-HOLÍSTICA 2026:
 * 1. POLYMORPHIC FRAMES: Uniones discriminadas con el tag 'type' y el
 *    contenido bajo 'payload', rechazando discriminadores desconocidos
 *    en la frontera de decodificación y no en el despacho profundo.
 * 2. WIRE PARITY: Llaves camelCase y tags SCREAMING_SNAKE idénticos a
 *    los consumidos por el cliente del tablero.
 * 3. REPLAY ENVELOPES: Las operaciones de la cola offline viajan como
 *    sobres sin tipar y re-entran al enrutador por el camino normal.
 *
 * # Mathematical Proof (Boundary Rejection):
 * Toda trama entrante es texto UTF-8 con forma {"type": T, "payload": P}.
 * El decodificador bifurca los fallos en dos clases disjuntas:
 * JSON malformado (INVALID_JSON) y tag desconocido (UNKNOWN_MESSAGE_TYPE),
 * garantizando que ningún frame inválido alcance la capa de servicio.
 * =================================================================
 */

use serde::{Deserialize, Serialize};
use typeshare::typeshare;

use crate::presence::PresenceUser;
use crate::task::{BoardColumn, Task, TaskField};

// --- ESTRATO CLIENTE -> SERVIDOR ---

/// Gramática de mando del cliente del tablero (trama duplex entrante).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClientMessage {
    /// Solicitud explícita del estado inicial completo.
    SyncRequest(SyncRequestPayload),
    /// Alta de una nueva tarea con eco de identificador temporal.
    CreateTask(CreateTaskPayload),
    /// Mutación de contenido (título / descripción) con baseVersion.
    UpdateTask(UpdateTaskPayload),
    /// Reubicación de columna y posición fraccional.
    MoveTask(MoveTaskPayload),
    /// Baja incondicional de una tarea.
    DeleteTask(DeleteTaskPayload),
    /// Parche de actividad efímera del operador.
    PresenceUpdate(PresenceUpdatePayload),
    /// Reinyección secuencial de la cola offline del cliente.
    ReplayQueue(ReplayQueuePayload),
}

#[typeshare]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SyncRequestPayload {
    pub client_id: String,
}

#[typeshare]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskPayload {
    pub client_id: String,
    /// Identificador optimista local, ecoado en TASK_CREATED (no se persiste).
    pub temp_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub column_id: BoardColumn,
    /// Posición propuesta; los valores no estrictamente positivos delegan
    /// el cálculo al final de columna dentro de la transacción.
    #[serde(default)]
    pub position: Option<f64>,
}

/// Subconjunto de contenido mutable vía UPDATE_TASK.
#[typeshare]
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TaskContentChanges {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[typeshare]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskPayload {
    pub client_id: String,
    pub task_id: String,
    /// Versión global observada por el cliente al construir la mutación.
    #[typeshare(serialized_as = "number")]
    pub base_version: i64,
    pub changes: TaskContentChanges,
}

#[typeshare]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MoveTaskPayload {
    pub client_id: String,
    pub task_id: String,
    #[typeshare(serialized_as = "number")]
    pub base_version: i64,
    pub column_id: BoardColumn,
    pub position: f64,
}

#[typeshare]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DeleteTaskPayload {
    pub client_id: String,
    pub task_id: String,
    /// Aceptada pero no aplicada: la baja siempre gana.
    #[serde(default)]
    #[typeshare(serialized_as = "number")]
    pub base_version: i64,
}

#[typeshare]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PresenceUpdatePayload {
    pub client_id: String,
    pub username: String,
    #[serde(default)]
    pub viewing_task: Option<String>,
    #[serde(default)]
    pub editing_task: Option<String>,
}

/// Sobre de una operación encolada offline. El payload permanece sin
/// tipar hasta su re-entrada por el decodificador normal del enrutador.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueuedOperation {
    #[serde(rename = "type")]
    pub operation_type: String,
    pub payload: serde_json::Value,
    /// Milisegundos Unix del encolado en el cliente (informativo).
    #[serde(default)]
    pub enqueued_at: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplayQueuePayload {
    pub client_id: String,
    pub operations: Vec<QueuedOperation>,
}

// --- ESTRATO SERVIDOR -> CLIENTE ---

/// Gramática de difusión del servidor (trama duplex saliente).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ServerMessage {
    /// Instantánea completa de tareas y presencia para un recién llegado.
    InitialState(InitialStatePayload),
    /// Alta confirmada, con eco del identificador temporal del emisor.
    TaskCreated(TaskCreatedPayload),
    /// Estado autoritativo tras una mutación de contenido.
    TaskUpdated(Task),
    /// Estado autoritativo tras una reubicación.
    TaskMoved(Task),
    /// Baja confirmada.
    TaskDeleted(TaskDeletedPayload),
    /// Veredicto del resolutor de conflictos dirigido al emisor perdedor.
    ConflictResolved(ConflictResolvedPayload),
    /// Re-layout atómico de una columna tras agotar la precisión fraccional.
    Rebalanced(RebalancedPayload),
    /// Instantánea completa de presencia tras cualquier cambio de actividad.
    PresenceUpdate(Vec<PresenceUser>),
    /// Fallo de protocolo, de búsqueda o interno, dirigido al emisor.
    Error(ErrorPayload),
}

#[typeshare]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InitialStatePayload {
    pub tasks: Vec<Task>,
    pub presence: Vec<PresenceUser>,
}

#[typeshare]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TaskCreatedPayload {
    pub task: Task,
    pub temp_id: String,
}

#[typeshare]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TaskDeletedPayload {
    pub task_id: String,
}

/// Veredicto de resolución por campo aplicado a una mutación concurrente.
#[typeshare]
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConflictResolution {
    /// Al menos un campo fue fusionado; los rechazados conservan el valor del servidor.
    Merged,
    /// Todos los campos propuestos fueron rechazados; sin escritura.
    Rejected,
}

#[typeshare]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ConflictResolvedPayload {
    pub task_id: String,
    pub resolution: ConflictResolution,
    /// Estado autoritativo vigente de la fila tras el veredicto.
    pub task: Task,
    pub merged_fields: Vec<TaskField>,
    pub rejected_fields: Vec<TaskField>,
    /// Explicación determinista legible por humanos.
    pub reason: String,
}

#[typeshare]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RebalancedPayload {
    pub column_id: BoardColumn,
    /// Filas de la columna en su nuevo orden, con versiones avanzadas.
    pub tasks: Vec<Task>,
}

/// Catálogo cerrado de códigos de error del canal duplex.
#[typeshare]
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    InvalidJson,
    UnknownMessageType,
    NotFound,
    InternalError,
}

#[typeshare]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ErrorPayload {
    pub code: ErrorCode,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,
}
