// [apps/board-server/src/handlers/stream.rs]
/**
 * =================================================================
 * APARATO: BOARD SESSION SUPERVISOR (V19.0 - TRIPLE TASK MASTER)
 * CLASIFICACIÓN: API HANDLER (ESTRATO L4)
 * RESPONSABILIDAD: CICLO DE VIDA FULL-DUPLEX Y TRABAJADOR SECUENCIAL
 *
 * VISION HIPER-HOLÍSTICA 2026:
 * 1. RESOURCE SOVEREIGNTY: Orquestación de Triple Tarea (Downstream,
 *    Upstream, Worker) con limpieza determinista vía AbortHandles.
 * 2. ORDERED INGESTION: El worker consume el canal de mando de uno en
 *    uno, garantizando que cada trama complete su despacho antes de la
 *    siguiente (crítico para la cola de replay).
 * 3. ZERO ABBREVIATIONS: Descriptores nominales de la física del sistema.
 *
 * # Mathematical Proof (Lifecycle Determinism):
 * El primer centinela que finalice dispara el colapso controlado de los
 * otros dos; la secuencia de limpieza retira la sesión de los registros
 * de difusión y presencia ANTES de difundir la instantánea de partida,
 * por lo que ningún operador fantasma sobrevive al cierre.
 * =================================================================
 */

use crate::services::message_router::MessageRouter;
use crate::services::snapshot::assemble_initial_state;
use crate::state::AppState;
use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Query, State,
    },
    response::IntoResponse,
};
use chrono::Utc;
use futures::{sink::SinkExt, stream::StreamExt};
use std::collections::HashMap;
use syncboard_domain_models::{ErrorCode, ErrorPayload, ServerMessage};
use tokio::sync::mpsc;
use tokio::time::{interval, Duration};
use tracing::{debug, error, info, instrument, warn};

/// Intervalo de latido (Keep-Alive): 25s.
/// Sintonizado para prevenir cierres por inactividad en proxies Capa 7.
const KEEPALIVE_INTERVAL_SECONDS: u64 = 25;

/// Capacidad del buffer de mando interno: 32 tramas.
/// Previene la saturación del hilo de ejecución ante ráfagas de UI.
const COMMAND_BUFFER_CAPACITY: usize = 32;

/// Identidad extraída del handshake de la sesión (query parameters).
struct SessionIdentity {
    client_identifier: String,
    username: String,
}

/**
 * Deriva la identidad de la sesión con los defaults soberanos:
 * clientId = "anon-<timestamp>", username = "User-<últimos 4>".
 */
fn resolve_session_identity(handshake_parameters: &HashMap<String, String>) -> SessionIdentity {
    let client_identifier = handshake_parameters
        .get("clientId")
        .filter(|value| !value.is_empty())
        .cloned()
        .unwrap_or_else(|| format!("anon-{}", Utc::now().timestamp_millis()));

    let username = handshake_parameters
        .get("username")
        .filter(|value| !value.is_empty())
        .cloned()
        .unwrap_or_else(|| {
            let character_count = client_identifier.chars().count();
            let identity_suffix: String = client_identifier
                .chars()
                .skip(character_count.saturating_sub(4))
                .collect();
            format!("User-{}", identity_suffix)
        });

    SessionIdentity {
        client_identifier,
        username,
    }
}

/**
 * Punto de entrada para la negociación del enlace duplex del tablero.
 * Realiza la transición de protocolo HTTP a WebSocket (RFC 6455).
 */
#[instrument(skip(websocket_upgrade, application_state, handshake_parameters))]
pub async fn establish_board_uplink(
    websocket_upgrade: WebSocketUpgrade,
    Query(handshake_parameters): Query<HashMap<String, String>>,
    State(application_state): State<AppState>,
) -> impl IntoResponse {
    debug!("🔌 [SOCKET_UPGRADE]: Negotiating protocol transition for new operator...");
    websocket_upgrade.on_upgrade(move |socket| {
        handle_active_board_session(socket, application_state, handshake_parameters)
    })
}

/**
 * Orquestador soberano de la sesión WebSocket.
 * Implementa la arquitectura de Triple Tarea: Downstream, Upstream y Worker.
 */
async fn handle_active_board_session(
    socket: WebSocket,
    application_state: AppState,
    handshake_parameters: HashMap<String, String>,
) {
    let (mut socket_sender, mut socket_receiver) = socket.split();

    let session_identity = resolve_session_identity(&handshake_parameters);
    let client_identifier = session_identity.client_identifier;

    info!("⚡ [UPLINK_OPEN]: Board session [{}] established as '{}'.",
        client_identifier, session_identity.username);

    // --- 0. CANALES DE LA SESIÓN (DESACOPLAMIENTO) ---
    let (outbound_frame_sender, mut outbound_frame_receiver) =
        mpsc::unbounded_channel::<String>();
    let (command_transmission_sender, mut command_reception_receiver) =
        mpsc::channel::<String>(COMMAND_BUFFER_CAPACITY);

    // --- 1. REGISTRO EN LOS ESTRATOS DE DIFUSIÓN Y PRESENCIA ---
    application_state
        .connection_registry
        .register(&client_identifier, outbound_frame_sender.clone());
    application_state
        .presence_registry
        .add_user(&client_identifier, &session_identity.username);

    // --- 2. ESTADO INICIAL HACIA EL RECIÉN LLEGADO ---
    match assemble_initial_state(&application_state).await {
        Ok(initial_state_frame) => {
            application_state
                .connection_registry
                .send_to(&client_identifier, &initial_state_frame);
        }
        Err(snapshot_fault) => {
            error!("❌ [SNAPSHOT_FAULT]: Initial state assembly collapsed for [{}]: {}",
                client_identifier, snapshot_fault);
            application_state.connection_registry.send_to(
                &client_identifier,
                &ServerMessage::Error(ErrorPayload {
                    code: ErrorCode::InternalError,
                    message: snapshot_fault.to_string(),
                    task_id: None,
                }),
            );
        }
    }

    // --- 3. ANUNCIO DE PRESENCIA AL RESTO DE OPERADORES ---
    application_state.connection_registry.broadcast(
        &ServerMessage::PresenceUpdate(application_state.presence_registry.get_all_users()),
        Some(&client_identifier),
    );

    // --- TAREA 1: WORKER SECUENCIAL (LÓGICA) ---
    let application_state_for_worker = application_state.clone();
    let client_id_worker_context = client_identifier.clone();
    let mut worker_execution_task = tokio::spawn(async move {
        while let Some(inbound_frame) = command_reception_receiver.recv().await {
            MessageRouter::dispatch(
                &application_state_for_worker,
                &client_id_worker_context,
                &inbound_frame,
            )
            .await;
        }
    });

    // --- TAREA 2: DOWNSTREAM (Servidor -> Tablero) ---
    let client_id_downstream_context = client_identifier.clone();
    let mut sender_transmission_task = tokio::spawn(async move {
        let mut keepalive_timer = interval(Duration::from_secs(KEEPALIVE_INTERVAL_SECONDS));

        loop {
            tokio::select! {
                // Brazo 1: Pulso de vida físico (Ping-Pong)
                _ = keepalive_timer.tick() => {
                    if socket_sender.send(Message::Ping(vec![])).await.is_err() {
                        break;
                    }
                },

                // Brazo 2: Sifón del canal saliente de la sesión
                outbound_frame = outbound_frame_receiver.recv() => {
                    match outbound_frame {
                        Some(encoded_frame) => {
                            if socket_sender.send(Message::Text(encoded_frame)).await.is_err() {
                                warn!("⚠️ [UPLINK_SEVERED]: Session [{}] lost downstream strata.",
                                    client_id_downstream_context);
                                break;
                            }
                        },
                        None => break,
                    }
                },
            }
        }
    });

    // --- TAREA 3: UPSTREAM (Tablero -> Servidor) ---
    let client_id_upstream_context = client_identifier.clone();
    let mut receiver_ingestion_task = tokio::spawn(async move {
        while let Some(network_read_result) = socket_receiver.next().await {
            match network_read_result {
                Ok(Message::Text(raw_command_json)) => {
                    if command_transmission_sender.send(raw_command_json).await.is_err() {
                        error!("❌ [INTERNAL_QUEUE_FAULT]: Command buffer collapsed for [{}]",
                            client_id_upstream_context);
                        break;
                    }
                },
                Ok(Message::Close(_)) => {
                    debug!("🔌 [SOCKET_CLOSE]: Termination signal from [{}].",
                        client_id_upstream_context);
                    break;
                },
                Err(physical_layer_fault) => {
                    error!("❌ [UPLINK_FAULT]: Session [{}] network error: {}",
                        client_id_upstream_context, physical_layer_fault);
                    break;
                },
                _ => {} // Binary y Pong se descartan en este estrato
            }
        }
    });

    // --- LIMPIEZA ATÓMICA DE ESTRATO ---
    // El primer centinela que finalice dispara el colapso de los otros dos.
    tokio::select! {
        _ = (&mut sender_transmission_task) => {
            receiver_ingestion_task.abort();
            worker_execution_task.abort();
        },
        _ = (&mut receiver_ingestion_task) => {
            sender_transmission_task.abort();
            worker_execution_task.abort();
        },
        _ = (&mut worker_execution_task) => {
            sender_transmission_task.abort();
            receiver_ingestion_task.abort();
        },
    };

    // --- 4. RETIRO DE REGISTROS Y DESPEDIDA ---
    application_state.connection_registry.unregister(&client_identifier);
    application_state.presence_registry.remove_user(&client_identifier);
    application_state.connection_registry.broadcast_all(
        &ServerMessage::PresenceUpdate(application_state.presence_registry.get_all_users()),
    );

    info!("💀 [UPLINK_TERMINATED]: Session [{}] resources released.", client_identifier);
}
