// [apps/board-server/src/kernel.rs]
/**
 * =================================================================
 * APARATO: BOARD SOVEREIGN KERNEL (V11.0 - IGNITION MASTER)
 * CLASIFICACIÓN: COMPOSITION ROOT (ESTRATO L1-APP)
 * RESPONSABILIDAD: BOOTSTRAP DE INFRAESTRUCTURA E IGNICIÓN SEGURA
 *
 * VISION HIPER-HOLÍSTICA:
 * Actúa como la placa base donde se conectan todos los servicios.
 * La conexión al Ledger precede a la apertura del socket TCP,
 * previniendo sesiones aceptadas contra un esquema aún no nivelado.
 * =================================================================
 */

use crate::routes::create_board_router;
use crate::state::AppState;
use std::net::{IpAddr, SocketAddr};
use syncboard_infra_db::BoardStoreClient;
use tracing::{error, info, instrument};

pub struct BoardKernel {
    pub server_network_port: u16,
    pub application_shared_state: AppState,
}

impl BoardKernel {
    /**
     * Realiza la ignición del cliente táctico y el estado del tablero.
     * Establece la conexión a la base de datos antes de levantar la red.
     */
    #[instrument(skip(database_access_token))]
    pub async fn ignite(
        database_connection_url: &str,
        database_access_token: Option<String>,
        listening_port: u16,
    ) -> Self {
        let database_client =
            BoardStoreClient::connect(database_connection_url, database_access_token)
                .await
                .expect("FATAL: Database link collapse. Ignition aborted.");

        Self {
            server_network_port: listening_port,
            application_shared_state: AppState::new(database_client),
        }
    }

    /**
     * Lanza el transporte HTTP/WebSocket del tablero colaborativo.
     */
    pub async fn launch_realtime_operations(self) {
        let board_router = create_board_router(self.application_shared_state);

        let bind_address = SocketAddr::new(
            "0.0.0.0".parse::<IpAddr>().expect("FATAL: Invalid bind host."),
            self.server_network_port,
        );

        info!("🚀 [KERNEL_ONLINE]: Board Command Center listening at {}", bind_address);

        let tcp_listener = tokio::net::TcpListener::bind(bind_address)
            .await
            .expect("CRITICAL_FAULT: Failed to bind network port.");

        if let Err(server_error) = axum::serve(tcp_listener, board_router).await {
            error!("💀 [KERNEL_COLLAPSE]: Runtime failure: {}", server_error);
            std::process::exit(1);
        }
    }
}
