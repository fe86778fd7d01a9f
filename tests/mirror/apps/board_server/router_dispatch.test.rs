// [tests/mirror/apps/board_server/router_dispatch.test.rs]
/*!
 * =================================================================
 * APARATO: CERTIFICADOR DE DESPACHO DUPLEX (V8.0 - ZENITH)
 * CLASIFICACIÓN: TRINITY EVIDENCE // ESTRATO L4-MIRROR
 * RESPONSABILIDAD: AUDITORÍA DE POLÍTICAS DE ENRUTADO Y DIFUSIÓN
 *
 * VISION HIPER-HOLÍSTICA 2026:
 * 1. SESSION SIMULATION: Cada operador se simula con un canal saliente
 *    registrado en el broadcaster, capturando las tramas exactas que
 *    una sesión WebSocket real recibiría.
 * 2. POLICY PARITY: Certifica la tríada de políticas de conflicto
 *    (limpio / fusión parcial / rechazo) y el eco del tempId.
 * 3. REPLAY DISCIPLINE: La cola offline re-entra en orden de encolado
 *    y cada operación atraviesa el pipeline normal de conflictos.
 * =================================================================
 */

use serde_json::{json, Value};
use syncboard_domain_conflict::TaskChangeSet;
use syncboard_domain_models::BoardColumn;
use syncboard_infra_db::repositories::NewTaskDraft;
use syncboard_infra_db::BoardStoreClient;
use syncboard_server::services::MessageRouter;
use syncboard_server::state::AppState;
use tokio::sync::mpsc;

/// Ancla un estado de aplicación completo sobre un Ledger volátil.
async fn forge_board_state(memory_namespace: &str) -> AppState {
    let database_client = BoardStoreClient::connect(
        &format!("file:{}?mode=memory&cache=shared", memory_namespace),
        None,
    )
    .await
    .expect("CRITICAL_FAULT: Failed to anchor in-memory board store.");

    AppState::new(database_client)
}

/// Simula una sesión duplex registrando su canal saliente.
fn attach_simulated_session(
    application_state: &AppState,
    client_identifier: &str,
) -> mpsc::UnboundedReceiver<String> {
    let (outbound_sender, outbound_receiver) = mpsc::unbounded_channel();
    application_state
        .connection_registry
        .register(client_identifier, outbound_sender);
    outbound_receiver
}

/// Drena y decodifica todas las tramas capturadas por una sesión.
fn drain_captured_frames(outbound_receiver: &mut mpsc::UnboundedReceiver<String>) -> Vec<Value> {
    let mut captured_frames = Vec::new();
    while let Ok(encoded_frame) = outbound_receiver.try_recv() {
        captured_frames.push(
            serde_json::from_str(&encoded_frame)
                .expect("CAPTURE_FAULT: Outbound frame is not valid JSON."),
        );
    }
    captured_frames
}

fn frame_types(captured_frames: &[Value]) -> Vec<&str> {
    captured_frames
        .iter()
        .map(|frame| frame["type"].as_str().unwrap_or("UNTYPED"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    /**
     * Frontera de protocolo: JSON malformado y discriminador desconocido
     * responden al emisor sin tocar al resto ni derribar la sesión.
     */
    #[tokio::test]
    async fn certify_protocol_boundary_rejection() {
        let application_state = forge_board_state("mem_router_boundary_v8").await;
        let mut alpha_session = attach_simulated_session(&application_state, "alpha");
        let mut beta_session = attach_simulated_session(&application_state, "beta");

        MessageRouter::dispatch(&application_state, "alpha", "{not-json").await;
        MessageRouter::dispatch(
            &application_state,
            "alpha",
            r#"{ "type": "SELF_DESTRUCT", "payload": {} }"#,
        )
        .await;
        MessageRouter::dispatch(&application_state, "alpha", r#"{ "payload": {} }"#).await;

        let alpha_frames = drain_captured_frames(&mut alpha_session);
        assert_eq!(frame_types(&alpha_frames), vec!["ERROR", "ERROR", "ERROR"]);
        assert_eq!(alpha_frames[0]["payload"]["code"], "INVALID_JSON");
        assert_eq!(alpha_frames[1]["payload"]["code"], "UNKNOWN_MESSAGE_TYPE");
        assert_eq!(alpha_frames[2]["payload"]["code"], "UNKNOWN_MESSAGE_TYPE");

        // El resto del tablero permanece en silencio absoluto.
        assert!(drain_captured_frames(&mut beta_session).is_empty());
    }

    /**
     * El alta difunde a TODOS (emisor incluido) con el eco del tempId.
     */
    #[tokio::test]
    async fn certify_create_broadcast_echoes_temp_id() {
        let application_state = forge_board_state("mem_router_create_v8").await;
        let mut alpha_session = attach_simulated_session(&application_state, "alpha");
        let mut beta_session = attach_simulated_session(&application_state, "beta");

        let create_frame = json!({
            "type": "CREATE_TASK",
            "payload": {
                "clientId": "alpha",
                "tempId": "optimistic-77",
                "title": "Board audit",
                "description": "",
                "columnId": "todo",
                "position": 65536.0
            }
        });
        MessageRouter::dispatch(&application_state, "alpha", &create_frame.to_string()).await;

        for session_frames in [
            drain_captured_frames(&mut alpha_session),
            drain_captured_frames(&mut beta_session),
        ] {
            assert_eq!(frame_types(&session_frames), vec!["TASK_CREATED"]);
            assert_eq!(session_frames[0]["payload"]["tempId"], "optimistic-77");
            assert_eq!(session_frames[0]["payload"]["task"]["version"], 1);
            assert!(session_frames[0]["payload"]["task"]["id"].is_string());
        }
    }

    /**
     * Tríada de políticas de conflicto sobre reubicaciones y ediciones.
     */
    #[tokio::test]
    async fn certify_conflict_routing_policies() {
        let application_state = forge_board_state("mem_router_conflict_v8").await;

        let contested_task = application_state
            .task_repository
            .create_task(NewTaskDraft {
                title: "Contested".into(),
                description: String::new(),
                column_id: BoardColumn::Todo,
                position: Some(65536.0),
            })
            .await
            .unwrap();

        let mut alpha_session = attach_simulated_session(&application_state, "alpha");
        let mut beta_session = attach_simulated_session(&application_state, "beta");

        // 1. REUBICACIÓN LIMPIA: difusión a todos.
        let winning_move_frame = json!({
            "type": "MOVE_TASK",
            "payload": {
                "clientId": "alpha",
                "taskId": contested_task.id,
                "baseVersion": 1,
                "columnId": "inprogress",
                "position": 65536.0
            }
        });
        MessageRouter::dispatch(&application_state, "alpha", &winning_move_frame.to_string())
            .await;

        assert_eq!(
            frame_types(&drain_captured_frames(&mut alpha_session)),
            vec!["TASK_MOVED"]
        );
        assert_eq!(
            frame_types(&drain_captured_frames(&mut beta_session)),
            vec!["TASK_MOVED"]
        );

        // 2. RECHAZO TOTAL: veredicto al emisor; re-confirmación al resto.
        let losing_move_frame = json!({
            "type": "MOVE_TASK",
            "payload": {
                "clientId": "beta",
                "taskId": contested_task.id,
                "baseVersion": 1,
                "columnId": "done",
                "position": 65536.0
            }
        });
        MessageRouter::dispatch(&application_state, "beta", &losing_move_frame.to_string()).await;

        let beta_frames = drain_captured_frames(&mut beta_session);
        assert_eq!(frame_types(&beta_frames), vec!["CONFLICT_RESOLVED"]);
        assert_eq!(beta_frames[0]["payload"]["resolution"], "REJECTED");
        assert_eq!(beta_frames[0]["payload"]["rejectedFields"][0], "columnId");
        assert_eq!(beta_frames[0]["payload"]["rejectedFields"][1], "position");
        assert_eq!(beta_frames[0]["payload"]["task"]["columnId"], "inprogress");

        let alpha_frames = drain_captured_frames(&mut alpha_session);
        assert_eq!(frame_types(&alpha_frames), vec!["TASK_MOVED"]);
        assert_eq!(alpha_frames[0]["payload"]["columnId"], "inprogress");

        // 3. FUSIÓN PARCIAL: veredicto al emisor Y difusión a todos.
        let title_seal_frame = json!({
            "type": "UPDATE_TASK",
            "payload": {
                "clientId": "alpha",
                "taskId": contested_task.id,
                "baseVersion": 2,
                "changes": { "title": "A" }
            }
        });
        MessageRouter::dispatch(&application_state, "alpha", &title_seal_frame.to_string()).await;
        drain_captured_frames(&mut alpha_session);
        drain_captured_frames(&mut beta_session);

        let contested_update_frame = json!({
            "type": "UPDATE_TASK",
            "payload": {
                "clientId": "beta",
                "taskId": contested_task.id,
                "baseVersion": 2,
                "changes": { "title": "B", "description": "B-desc" }
            }
        });
        MessageRouter::dispatch(&application_state, "beta", &contested_update_frame.to_string())
            .await;

        let beta_frames = drain_captured_frames(&mut beta_session);
        assert_eq!(
            frame_types(&beta_frames),
            vec!["CONFLICT_RESOLVED", "TASK_UPDATED"]
        );
        assert_eq!(beta_frames[0]["payload"]["resolution"], "MERGED");
        assert_eq!(beta_frames[0]["payload"]["mergedFields"][0], "description");
        assert_eq!(beta_frames[0]["payload"]["rejectedFields"][0], "title");
        assert_eq!(beta_frames[1]["payload"]["title"], "A");
        assert_eq!(beta_frames[1]["payload"]["description"], "B-desc");

        assert_eq!(
            frame_types(&drain_captured_frames(&mut alpha_session)),
            vec!["TASK_UPDATED"]
        );
    }

    /**
     * La baja difunde a todos; la ausencia responde solo al emisor.
     */
    #[tokio::test]
    async fn certify_delete_policies() {
        let application_state = forge_board_state("mem_router_delete_v8").await;

        let doomed_task = application_state
            .task_repository
            .create_task(NewTaskDraft {
                title: "Doomed".into(),
                description: String::new(),
                column_id: BoardColumn::Done,
                position: Some(65536.0),
            })
            .await
            .unwrap();

        let mut alpha_session = attach_simulated_session(&application_state, "alpha");
        let mut beta_session = attach_simulated_session(&application_state, "beta");

        let purge_frame = json!({
            "type": "DELETE_TASK",
            "payload": { "clientId": "alpha", "taskId": doomed_task.id, "baseVersion": 1 }
        });
        MessageRouter::dispatch(&application_state, "alpha", &purge_frame.to_string()).await;

        for session_frames in [
            drain_captured_frames(&mut alpha_session),
            drain_captured_frames(&mut beta_session),
        ] {
            assert_eq!(frame_types(&session_frames), vec!["TASK_DELETED"]);
            assert_eq!(session_frames[0]["payload"]["taskId"], doomed_task.id.as_str());
        }

        // Segunda baja: la fila ya no existe; error dirigido al emisor.
        MessageRouter::dispatch(&application_state, "alpha", &purge_frame.to_string()).await;

        let alpha_frames = drain_captured_frames(&mut alpha_session);
        assert_eq!(frame_types(&alpha_frames), vec!["ERROR"]);
        assert_eq!(alpha_frames[0]["payload"]["code"], "NOT_FOUND");
        assert_eq!(alpha_frames[0]["payload"]["taskId"], doomed_task.id.as_str());
        assert!(drain_captured_frames(&mut beta_session).is_empty());
    }

    /**
     * La cola offline re-entra en orden y respeta el pipeline de conflictos.
     */
    #[tokio::test]
    async fn certify_replay_queue_order_and_conflicts() {
        let application_state = forge_board_state("mem_router_replay_v8").await;

        let contested_task = application_state
            .task_repository
            .create_task(NewTaskDraft {
                title: "Original".into(),
                description: String::new(),
                column_id: BoardColumn::Todo,
                position: Some(65536.0),
            })
            .await
            .unwrap();

        // Mientras la sesión estaba offline, otro operador selló el título.
        application_state
            .task_repository
            .update_task(
                &contested_task.id,
                1,
                TaskChangeSet {
                    title: Some("concurrent".into()),
                    ..TaskChangeSet::default()
                },
            )
            .await
            .unwrap();

        let mut alpha_session = attach_simulated_session(&application_state, "alpha");
        let mut beta_session = attach_simulated_session(&application_state, "beta");

        let replay_frame = json!({
            "type": "REPLAY_QUEUE",
            "payload": {
                "clientId": "alpha",
                "operations": [
                    {
                        "type": "UPDATE_TASK",
                        "payload": {
                            "clientId": "alpha",
                            "taskId": contested_task.id,
                            "baseVersion": 1,
                            "changes": { "title": "x" }
                        },
                        "enqueuedAt": 1767950000000i64
                    },
                    {
                        "type": "MOVE_TASK",
                        "payload": {
                            "clientId": "alpha",
                            "taskId": contested_task.id,
                            "baseVersion": 1,
                            "columnId": "done",
                            "position": 65536.0
                        },
                        "enqueuedAt": 1767950001000i64
                    }
                ]
            }
        });
        MessageRouter::dispatch(&application_state, "alpha", &replay_frame.to_string()).await;

        // Emisor: rechazo del título primero, reubicación limpia después.
        let alpha_frames = drain_captured_frames(&mut alpha_session);
        assert_eq!(
            frame_types(&alpha_frames),
            vec!["CONFLICT_RESOLVED", "TASK_MOVED"]
        );
        assert_eq!(alpha_frames[0]["payload"]["resolution"], "REJECTED");
        assert_eq!(alpha_frames[0]["payload"]["rejectedFields"][0], "title");
        assert_eq!(alpha_frames[1]["payload"]["columnId"], "done");
        assert_eq!(alpha_frames[1]["payload"]["title"], "concurrent");

        // Observador: re-confirmación del rechazo y reubicación, en orden.
        let beta_frames = drain_captured_frames(&mut beta_session);
        assert_eq!(
            frame_types(&beta_frames),
            vec!["TASK_UPDATED", "TASK_MOVED"]
        );
        assert_eq!(beta_frames[0]["payload"]["title"], "concurrent");
    }

    /**
     * El aterrizaje dentro del hueco mínimo dispara el re-layout diferido.
     */
    #[tokio::test]
    async fn certify_starved_move_triggers_rebalance_broadcast() {
        let application_state = forge_board_state("mem_router_rebalance_v8").await;

        application_state
            .task_repository
            .create_task(NewTaskDraft {
                title: "anchor".into(),
                description: String::new(),
                column_id: BoardColumn::Todo,
                position: Some(1000.0),
            })
            .await
            .unwrap();

        let drifting_task = application_state
            .task_repository
            .create_task(NewTaskDraft {
                title: "drifter".into(),
                description: String::new(),
                column_id: BoardColumn::Todo,
                position: Some(2000.0),
            })
            .await
            .unwrap();

        let mut alpha_session = attach_simulated_session(&application_state, "alpha");

        let starved_move_frame = json!({
            "type": "MOVE_TASK",
            "payload": {
                "clientId": "alpha",
                "taskId": drifting_task.id,
                "baseVersion": 1,
                "columnId": "todo",
                "position": 1000.2
            }
        });
        MessageRouter::dispatch(&application_state, "alpha", &starved_move_frame.to_string())
            .await;

        let alpha_frames = drain_captured_frames(&mut alpha_session);
        assert_eq!(frame_types(&alpha_frames), vec!["TASK_MOVED", "REBALANCED"]);
        assert_eq!(alpha_frames[1]["payload"]["columnId"], "todo");

        let rebalanced_tasks = alpha_frames[1]["payload"]["tasks"].as_array().unwrap();
        assert_eq!(rebalanced_tasks.len(), 2);
        assert_eq!(rebalanced_tasks[0]["position"], 65536.0);
        assert_eq!(rebalanced_tasks[1]["position"], 131072.0);
    }

    /**
     * SYNC_REQUEST entrega el estado inicial únicamente al solicitante.
     */
    #[tokio::test]
    async fn certify_sync_request_targets_sender() {
        let application_state = forge_board_state("mem_router_sync_v8").await;

        application_state
            .task_repository
            .create_task(NewTaskDraft {
                title: "Visible".into(),
                description: String::new(),
                column_id: BoardColumn::Todo,
                position: Some(65536.0),
            })
            .await
            .unwrap();
        application_state.presence_registry.add_user("alpha", "Alpha");

        let mut alpha_session = attach_simulated_session(&application_state, "alpha");
        let mut beta_session = attach_simulated_session(&application_state, "beta");

        let sync_frame = json!({
            "type": "SYNC_REQUEST",
            "payload": { "clientId": "alpha" }
        });
        MessageRouter::dispatch(&application_state, "alpha", &sync_frame.to_string()).await;

        let alpha_frames = drain_captured_frames(&mut alpha_session);
        assert_eq!(frame_types(&alpha_frames), vec!["INITIAL_STATE"]);
        assert_eq!(alpha_frames[0]["payload"]["tasks"].as_array().unwrap().len(), 1);
        assert_eq!(alpha_frames[0]["payload"]["presence"][0]["clientId"], "alpha");

        assert!(drain_captured_frames(&mut beta_session).is_empty());
    }

    /**
     * El parche de presencia difunde la instantánea completa a todos;
     * el operador desconocido se descarta sin difusión.
     */
    #[tokio::test]
    async fn certify_presence_update_fanout() {
        let application_state = forge_board_state("mem_router_presence_v8").await;
        application_state.presence_registry.add_user("alpha", "Alpha");

        let mut alpha_session = attach_simulated_session(&application_state, "alpha");
        let mut beta_session = attach_simulated_session(&application_state, "beta");

        let presence_frame = json!({
            "type": "PRESENCE_UPDATE",
            "payload": {
                "clientId": "alpha",
                "username": "Alpha Prime",
                "viewingTask": "T1"
            }
        });
        MessageRouter::dispatch(&application_state, "alpha", &presence_frame.to_string()).await;

        for session_frames in [
            drain_captured_frames(&mut alpha_session),
            drain_captured_frames(&mut beta_session),
        ] {
            assert_eq!(frame_types(&session_frames), vec!["PRESENCE_UPDATE"]);
            assert_eq!(session_frames[0]["payload"][0]["username"], "Alpha Prime");
            assert_eq!(session_frames[0]["payload"][0]["viewingTask"], "T1");
        }

        // Operador fantasma: sin entrada, sin difusión.
        let ghost_frame = json!({
            "type": "PRESENCE_UPDATE",
            "payload": { "clientId": "ghost", "username": "Nobody" }
        });
        MessageRouter::dispatch(&application_state, "ghost", &ghost_frame.to_string()).await;

        assert!(drain_captured_frames(&mut alpha_session).is_empty());
        assert!(drain_captured_frames(&mut beta_session).is_empty());
    }
}
