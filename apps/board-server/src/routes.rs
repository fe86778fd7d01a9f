// [apps/board-server/src/routes.rs]
/*!
 * =================================================================
 * APARATO: SOVEREIGN ROUTING MATRIX (V10.0 - DUPLEX GATEWAY)
 * CLASIFICACIÓN: API ADAPTER LAYER (ESTRATO L3)
 * RESPONSABILIDAD: TOPOLOGÍA DE RED DEL TABLERO COLABORATIVO
 *
 * VISION HIPER-HOLÍSTICA:
 * La topología soporta:
 * 1. WebSocket en la raíz del servicio (mutaciones en tiempo real).
 * 2. REST de solo lectura (sonda de salud y listado de tareas).
 * =================================================================
 */

use crate::handlers::{board_api, stream};
use crate::state::AppState;
use axum::{
    http::{header, Method},
    routing::get,
    Router,
};
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub fn create_board_router(application_shared_state: AppState) -> Router {
    // Escudo de Red: CORS permisivo para el cliente del tablero y Ops
    let network_security_shield = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .max_age(Duration::from_secs(3600));

    // ESTRATO DE OBSERVACIÓN: Superficie HTTP de solo lectura
    let observation_stratum = Router::new()
        .route("/health", get(board_api::BoardObservationHandler::handle_health_probe))
        .route("/tasks", get(board_api::BoardObservationHandler::handle_task_listing));

    // COMPOSICIÓN GLOBAL (Root Topology)
    Router::new()
        // Singularidad Activa: la raíz del servicio es el enlace duplex
        .route("/", get(stream::establish_board_uplink))
        .nest("/api", observation_stratum)
        .layer(TraceLayer::new_for_http())
        .layer(network_security_shield)
        .with_state(application_shared_state)
}
