// [apps/board-server/src/state/mod.rs]
/*!
 * =================================================================
 * APARATO: SOVEREIGN STATE ORCHESTRATOR (V8.0 - BOARD SINGULARITY)
 * CLASIFICACIÓN: APPLICATION STATE (ESTRATO L1-APP)
 * RESPONSABILIDAD: ORQUESTACIÓN DE REPOSITORIOS Y ESTRATOS EFÍMEROS
 *
 * VISION HIPER-HOLÍSTICA 2026:
 * 1. COMPOSITION ROOT: Centraliza el repositorio de tareas, el registro
 *    de conexiones y el registro de presencia para su inyección en
 *    handlers y servicios (el enrutador nunca depende del supervisor).
 * 2. NOMINAL PURITY: Uso de 'Arc<T>' para inmutabilidad compartida.
 *
 * # Mathematical Proof (Deterministic State Hub):
 * El Ledger de tareas es el único estado durable; presencia y
 * conexiones son locales al proceso y su ciclo de vida está acotado
 * por las sesiones duplex que las crearon.
 * =================================================================
 */

pub mod presence_registry;

use crate::services::broadcaster::ConnectionRegistry;
use presence_registry::PresenceRegistry;
use std::sync::Arc;
use syncboard_infra_db::repositories::TaskRepository;
use syncboard_infra_db::BoardStoreClient;
use tracing::debug;

/**
 * Contenedor de estado compartido (Thread-Safe) para el servidor.
 * Actúa como la placa base donde se conectan todos los estratos.
 */
#[derive(Clone)]
pub struct AppState {
    /// Cliente táctico hacia el Ledger del tablero (Turso / libSQL).
    pub database_client: BoardStoreClient,
    /// Autoridad transaccional de mutaciones de tareas.
    pub task_repository: Arc<TaskRepository>,
    /// Registro de sesiones duplex abiertas para la difusión dirigida.
    pub connection_registry: Arc<ConnectionRegistry>,
    /// Memoria efímera de actividad de operadores.
    pub presence_registry: Arc<PresenceRegistry>,
}

impl AppState {
    /**
     * Forja una nueva instancia del Estado Maestro inyectando el cliente
     * de persistencia y pre-hidratando los estratos efímeros.
     */
    #[must_use]
    pub fn new(database_client: BoardStoreClient) -> Self {
        debug!("🧬 [APP_STATE]: Executing sovereign ignition sequence V8.0...");

        let task_repository = Arc::new(TaskRepository::new(database_client.clone()));

        Self {
            database_client,
            task_repository,
            connection_registry: Arc::new(ConnectionRegistry::new()),
            presence_registry: Arc::new(PresenceRegistry::new()),
        }
    }
}
