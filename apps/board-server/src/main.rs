// [apps/board-server/src/main.rs]
/*!
 * =================================================================
 * APARATO: BOARD SERVER MAIN ENTRY POINT (V7.0 - GOLD MASTER)
 * CLASIFICACIÓN: APPLICATION SHELL (ESTRATO L3)
 * RESPONSABILIDAD: BOOTSTRAP DE INFRAESTRUCTURA E IGNICIÓN SEGURA
 *
 * # Mathematical Proof (Deterministic Ignition):
 * La observabilidad se inicializa antes que cualquier socket y la
 * sincronización del esquema precede a la apertura del puerto TCP,
 * previniendo estados de carrera donde un cliente solicite el estado
 * inicial contra un Ledger aún no nivelado.
 * =================================================================
 */

use syncboard_server::prelude::*;

use dotenvy::dotenv;
use syncboard_shared_watchtower::init_tracing;
use tracing::info;

/**
 * Punto de ignición supremo del binario del servidor del tablero.
 */
fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. CARGA DE ENTORNO SOBERANO
    dotenv().ok();

    // 2. INICIALIZACIÓN DE OBSERVABILIDAD (WATCHTOWER)
    init_tracing("syncboard_server");

    // 3. CONFIGURACIÓN DEL RUNTIME SOBERANO
    let runtime_orchestrator = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime_orchestrator.block_on(async {
        info!("🛰️  [COMMAND_CENTER]: Board ignition sequence starting...");

        // 4. ADQUISICIÓN DE COORDENADAS TÁCTICAS
        let database_connection_url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "file:syncboard.db".to_string());

        let database_access_token = std::env::var("TURSO_AUTH_TOKEN").ok();

        let listening_network_port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .unwrap_or(3000);

        // 5. CONSTRUCCIÓN DEL KERNEL SOBERANO (ESTRATO L1-APP)
        let kernel_instance = BoardKernel::ignite(
            &database_connection_url,
            database_access_token,
            listening_network_port,
        )
        .await;

        // 6. IGNICIÓN DEL TRANSPORTE DUPLEX
        info!("🚀 [SYNCBOARD_ONLINE]: System operational on port {}.", listening_network_port);
        kernel_instance.launch_realtime_operations().await;

        Ok(())
    })
}
