// [apps/board-server/src/handlers/board_api.rs]
/*!
 * =================================================================
 * APARATO: READ-ONLY BOARD API HANDLER (V4.0 - OBSERVATION DECK)
 * CLASIFICACIÓN: API ADAPTER LAYER (ESTRATO L3)
 * RESPONSABILIDAD: SUPERFICIE HTTP DE SOLO LECTURA
 *
 * # Logic:
 * Toda mutación viaja por el canal duplex; esta superficie expone
 * únicamente la sonda de salud y el listado ordenado de tareas.
 * =================================================================
 */

use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use chrono::Utc;
use serde_json::json;
use tracing::{error, instrument};

pub struct BoardObservationHandler;

impl BoardObservationHandler {
    /**
     * Endpoint: GET /api/health
     * Sonda de vitalidad con el censo de sesiones duplex activas.
     */
    #[instrument(skip(application_state))]
    pub async fn handle_health_probe(
        State(application_state): State<AppState>,
    ) -> impl IntoResponse {
        Json(json!({
            "status": "ok",
            "connections": application_state.connection_registry.active_session_count(),
            "timestamp": Utc::now().to_rfc3339(),
        }))
    }

    /**
     * Endpoint: GET /api/tasks
     * Listado completo ordenado por (columna, posición).
     */
    #[instrument(skip(application_state))]
    pub async fn handle_task_listing(
        State(application_state): State<AppState>,
    ) -> impl IntoResponse {
        match application_state.task_repository.get_all_tasks().await {
            Ok(board_tasks) => Json(json!({ "tasks": board_tasks })).into_response(),
            Err(listing_fault) => {
                error!("❌ [READ_FAULT]: Task listing collapsed: {}", listing_fault);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": listing_fault.to_string() })),
                )
                    .into_response()
            }
        }
    }
}
