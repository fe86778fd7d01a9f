// [apps/board-server/src/services/message_router.rs]
/*!
 * =================================================================
 * APARATO: DUPLEX MESSAGE ROUTER (V15.0 - CONFLICT ROUTING MASTER)
 * CLASIFICACIÓN: SERVICE LAYER (ESTRATO L4)
 * RESPONSABILIDAD: DECODIFICACIÓN, DESPACHO Y ORQUESTACIÓN DE DIFUSIÓN
 *
 * VISION HIPER-HOLÍSTICA 2026:
 * 1. BOUNDARY REJECTION: La bifurcación INVALID_JSON vs
 *    UNKNOWN_MESSAGE_TYPE ocurre en la frontera de decodificación,
 *    nunca en el despacho profundo.
 * 2. SESSION IMMUNITY: Ningún fallo descendente derriba la sesión; los
 *    colapsos internos cristalizan como tramas INTERNAL_ERROR.
 * 3. REPLAY RE-ENTRY: Las operaciones de la cola offline re-entran
 *    secuencialmente por el despacho normal reutilizando la identidad
 *    del emisor, sujetas al mismo pipeline de conflictos.
 *
 * # Mathematical Proof (Commit-Ordered Fan-out):
 * Cada mutación compromete su transacción antes de encolar la difusión,
 * por lo que el orden de tramas observado por un receptor coincide con
 * el orden de commit del emisor sobre esa fila.
 * =================================================================
 */

use crate::services::broadcaster::ConnectionRegistry;
use crate::services::snapshot::assemble_initial_state;
use crate::state::AppState;
use futures::future::BoxFuture;
use futures::FutureExt;
use serde_json::{json, Value};
use syncboard_domain_conflict::TaskChangeSet;
use syncboard_domain_models::{
    ClientMessage, ConflictResolution, ConflictResolvedPayload, ErrorCode, ErrorPayload,
    PresencePatch, RebalancedPayload, ServerMessage, Task, TaskCreatedPayload,
    TaskDeletedPayload,
};
use syncboard_infra_db::repositories::{MutationOutcome, NewTaskDraft};
use syncboard_infra_db::DbError;
use tracing::{debug, error, instrument, warn};

/// Discriminadores aceptados por la gramática de mando del tablero.
const KNOWN_CLIENT_MESSAGE_TYPES: [&str; 7] = [
    "SYNC_REQUEST",
    "CREATE_TASK",
    "UPDATE_TASK",
    "MOVE_TASK",
    "DELETE_TASK",
    "PRESENCE_UPDATE",
    "REPLAY_QUEUE",
];

/// Canal de difusión de una mutación: edición de contenido o reubicación.
#[derive(Debug, Clone, Copy)]
enum MutationChannel {
    ContentUpdate,
    Relocation,
}

impl MutationChannel {
    /// Cristaliza el estado autoritativo en su trama de difusión.
    fn wrap(self, task: Task) -> ServerMessage {
        match self {
            MutationChannel::ContentUpdate => ServerMessage::TaskUpdated(task),
            MutationChannel::Relocation => ServerMessage::TaskMoved(task),
        }
    }
}

pub struct MessageRouter;

impl MessageRouter {
    /**
     * Procesa una trama de texto entrante de la sesión indicada.
     * El JSON malformado se responde al emisor sin tocar la sesión.
     */
    #[instrument(skip(application_state, raw_frame), fields(sender = %sender_client_id, frame_len = raw_frame.len()))]
    pub async fn dispatch(
        application_state: &AppState,
        sender_client_id: &str,
        raw_frame: &str,
    ) {
        match serde_json::from_str::<Value>(raw_frame) {
            Ok(frame_value) => {
                Self::dispatch_frame(application_state, sender_client_id, frame_value).await;
            }
            Err(parse_fault) => {
                warn!("⚠️ [PROTOCOL_FAULT]: Malformed JSON from [{}]: {}",
                    sender_client_id, parse_fault);
                send_error(
                    &application_state.connection_registry,
                    sender_client_id,
                    ErrorCode::InvalidJson,
                    format!("Invalid JSON frame: {}", parse_fault),
                    None,
                );
            }
        }
    }

    /**
     * Despacho de una trama ya parseada. Punto de re-entrada de la cola
     * de replay, de ahí el futuro encajonado (recursión asíncrona).
     */
    pub fn dispatch_frame<'a>(
        application_state: &'a AppState,
        sender_client_id: &'a str,
        frame_value: Value,
    ) -> BoxFuture<'a, ()> {
        async move {
            let Some(discriminator) = frame_value
                .get("type")
                .and_then(Value::as_str)
                .map(str::to_owned)
            else {
                send_error(
                    &application_state.connection_registry,
                    sender_client_id,
                    ErrorCode::UnknownMessageType,
                    "Frame carries no message type discriminator".to_string(),
                    None,
                );
                return;
            };

            if !KNOWN_CLIENT_MESSAGE_TYPES.contains(&discriminator.as_str()) {
                warn!("⚠️ [PROTOCOL_FAULT]: Unknown discriminator [{}] from [{}].",
                    discriminator, sender_client_id);
                send_error(
                    &application_state.connection_registry,
                    sender_client_id,
                    ErrorCode::UnknownMessageType,
                    format!("Unknown message type: {}", discriminator),
                    None,
                );
                return;
            }

            let client_message = match serde_json::from_value::<ClientMessage>(frame_value) {
                Ok(decoded_message) => decoded_message,
                Err(decode_fault) => {
                    warn!("⚠️ [PROTOCOL_FAULT]: Undecodable [{}] payload from [{}]: {}",
                        discriminator, sender_client_id, decode_fault);
                    send_error(
                        &application_state.connection_registry,
                        sender_client_id,
                        ErrorCode::InvalidJson,
                        format!("Invalid {} payload: {}", discriminator, decode_fault),
                        None,
                    );
                    return;
                }
            };

            if let Err(internal_fault) =
                Self::route_message(application_state, sender_client_id, client_message).await
            {
                error!("💀 [ROUTER_FAULT]: Internal collapse serving [{}]: {:#}",
                    sender_client_id, internal_fault);
                send_error(
                    &application_state.connection_registry,
                    sender_client_id,
                    ErrorCode::InternalError,
                    internal_fault.to_string(),
                    None,
                );
            }
        }
        .boxed()
    }

    /// Orquestación por tipo de mensaje (tabla de despacho soberana).
    async fn route_message(
        application_state: &AppState,
        sender_client_id: &str,
        client_message: ClientMessage,
    ) -> anyhow::Result<()> {
        match client_message {
            ClientMessage::SyncRequest(_) => {
                let initial_state_frame = assemble_initial_state(application_state).await?;
                application_state
                    .connection_registry
                    .send_to(sender_client_id, &initial_state_frame);
            }

            ClientMessage::CreateTask(create_payload) => {
                let created_task = application_state
                    .task_repository
                    .create_task(NewTaskDraft {
                        title: create_payload.title,
                        description: create_payload.description,
                        column_id: create_payload.column_id,
                        position: create_payload.position,
                    })
                    .await?;

                // El emisor también recibe la difusión: así recupera el
                // eco de su tempId y sella la reconciliación optimista.
                application_state.connection_registry.broadcast_all(
                    &ServerMessage::TaskCreated(TaskCreatedPayload {
                        task: created_task,
                        temp_id: create_payload.temp_id,
                    }),
                );
            }

            ClientMessage::UpdateTask(update_payload) => {
                let mutation_verdict = application_state
                    .task_repository
                    .update_task(
                        &update_payload.task_id,
                        update_payload.base_version,
                        TaskChangeSet {
                            title: update_payload.changes.title,
                            description: update_payload.changes.description,
                            column_id: None,
                            position: None,
                        },
                    )
                    .await;

                match mutation_verdict {
                    Ok(outcome) => route_mutation_outcome(
                        application_state,
                        sender_client_id,
                        outcome,
                        MutationChannel::ContentUpdate,
                    ),
                    Err(DbError::TaskNotFound) => send_task_not_found(
                        application_state,
                        sender_client_id,
                        &update_payload.task_id,
                    ),
                    Err(repository_fault) => return Err(repository_fault.into()),
                }
            }

            ClientMessage::MoveTask(move_payload) => {
                let move_verdict = application_state
                    .task_repository
                    .move_task(
                        &move_payload.task_id,
                        move_payload.base_version,
                        move_payload.column_id,
                        move_payload.position,
                    )
                    .await;

                match move_verdict {
                    Ok(move_receipt) => {
                        let exhausted_column_signal = move_receipt
                            .needs_rebalance
                            .then(|| move_receipt.outcome.task().column_id);

                        route_mutation_outcome(
                            application_state,
                            sender_client_id,
                            move_receipt.outcome,
                            MutationChannel::Relocation,
                        );

                        // Re-layout diferido: transacción posterior e
                        // independiente, difundida a todas las sesiones.
                        if let Some(exhausted_column) = exhausted_column_signal {
                            let rebalanced_rows = application_state
                                .task_repository
                                .rebalance_column(exhausted_column)
                                .await?;
                            application_state.connection_registry.broadcast_all(
                                &ServerMessage::Rebalanced(RebalancedPayload {
                                    column_id: exhausted_column,
                                    tasks: rebalanced_rows,
                                }),
                            );
                        }
                    }
                    Err(DbError::TaskNotFound) => send_task_not_found(
                        application_state,
                        sender_client_id,
                        &move_payload.task_id,
                    ),
                    Err(repository_fault) => return Err(repository_fault.into()),
                }
            }

            ClientMessage::DeleteTask(delete_payload) => {
                // La baja siempre gana: el baseVersion se acepta y descarta.
                let was_deleted = application_state
                    .task_repository
                    .delete_task(&delete_payload.task_id)
                    .await?;

                if was_deleted {
                    application_state.connection_registry.broadcast_all(
                        &ServerMessage::TaskDeleted(TaskDeletedPayload {
                            task_id: delete_payload.task_id,
                        }),
                    );
                } else {
                    send_task_not_found(
                        application_state,
                        sender_client_id,
                        &delete_payload.task_id,
                    );
                }
            }

            ClientMessage::PresenceUpdate(presence_payload) => {
                let activity_patch = PresencePatch {
                    username: presence_payload.username,
                    viewing_task: presence_payload.viewing_task,
                    editing_task: presence_payload.editing_task,
                };

                match application_state
                    .presence_registry
                    .update_user(&presence_payload.client_id, activity_patch)
                {
                    Some(_) => {
                        application_state.connection_registry.broadcast_all(
                            &ServerMessage::PresenceUpdate(
                                application_state.presence_registry.get_all_users(),
                            ),
                        );
                    }
                    None => {
                        debug!("💤 [PRESENCE]: Patch for unknown operator [{}] discarded.",
                            presence_payload.client_id);
                    }
                }
            }

            ClientMessage::ReplayQueue(replay_payload) => {
                debug!("📼 [REPLAY]: Session [{}] re-entering {} queued operations.",
                    sender_client_id, replay_payload.operations.len());

                // Orden de encolado preservado: cada operación completa su
                // despacho (incluida la difusión) antes de la siguiente.
                for queued_operation in replay_payload.operations {
                    let replayed_frame = json!({
                        "type": queued_operation.operation_type,
                        "payload": queued_operation.payload,
                    });
                    Self::dispatch_frame(application_state, sender_client_id, replayed_frame)
                        .await;
                }
            }
        }

        Ok(())
    }
}

// --- ESTRATO DE TRADUCCIÓN DE VEREDICTOS (PRIVADO) ---

/**
 * Traduce un veredicto transaccional a su política de difusión:
 * - Limpio: difusión a todos.
 * - Fusión parcial: CONFLICT_RESOLVED al emisor y difusión a todos (el
 *   estado autoritativo supersede la mutación optimista parcial).
 * - Rechazo total: CONFLICT_RESOLVED al emisor y difusión del estado
 *   vigente a todos EXCEPTO el emisor (que ya lo posee).
 */
fn route_mutation_outcome(
    application_state: &AppState,
    sender_client_id: &str,
    outcome: MutationOutcome,
    channel: MutationChannel,
) {
    match outcome {
        MutationOutcome::Clean(task) => {
            application_state.connection_registry.broadcast_all(&channel.wrap(task));
        }

        MutationOutcome::Merged {
            task,
            merged_fields,
            rejected_fields,
            reason,
        } => {
            application_state.connection_registry.send_to(
                sender_client_id,
                &ServerMessage::ConflictResolved(ConflictResolvedPayload {
                    task_id: task.id.clone(),
                    resolution: ConflictResolution::Merged,
                    task: task.clone(),
                    merged_fields,
                    rejected_fields,
                    reason,
                }),
            );
            application_state.connection_registry.broadcast_all(&channel.wrap(task));
        }

        MutationOutcome::Rejected {
            task,
            rejected_fields,
            reason,
        } => {
            application_state.connection_registry.send_to(
                sender_client_id,
                &ServerMessage::ConflictResolved(ConflictResolvedPayload {
                    task_id: task.id.clone(),
                    resolution: ConflictResolution::Rejected,
                    task: task.clone(),
                    merged_fields: Vec::new(),
                    rejected_fields,
                    reason,
                }),
            );
            application_state
                .connection_registry
                .broadcast(&channel.wrap(task), Some(sender_client_id));
        }
    }
}

fn send_task_not_found(
    application_state: &AppState,
    sender_client_id: &str,
    task_identifier: &str,
) {
    send_error(
        &application_state.connection_registry,
        sender_client_id,
        ErrorCode::NotFound,
        format!("Task {} not found", task_identifier),
        Some(task_identifier.to_string()),
    );
}

fn send_error(
    connection_registry: &ConnectionRegistry,
    sender_client_id: &str,
    code: ErrorCode,
    message: String,
    task_id: Option<String>,
) {
    connection_registry.send_to(
        sender_client_id,
        &ServerMessage::Error(ErrorPayload {
            code,
            message,
            task_id,
        }),
    );
}
