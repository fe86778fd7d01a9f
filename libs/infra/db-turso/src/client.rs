// [libs/infra/db-turso/src/client.rs]
/*!
 * =================================================================
 * APARATO: BOARD STORE CONNECTION CLIENT (V8.3 - MEMORY ANCHORED)
 * CLASIFICACIÓN: INFRASTRUCTURE LAYER (ESTRATO L3)
 * RESPONSABILIDAD: GESTIÓN DE ENLACES TÁCTICOS Y PERSISTENCIA ACID
 *
 * # Mathematical Proof (In-Memory Consistency):
 * En modo RAM el esquema debe ser visible entre hilos. El cliente
 * detecta URLs de memoria y mantiene un ancla de conexión viva ANTES
 * de cualquier otra operación, asegurando que la tabla de tareas
 * resida en un segmento de memoria compartido durante todo el proceso.
 * =================================================================
 */

use crate::errors::DbError;
use crate::schema::apply_board_schema;
use libsql::{Builder, Connection, Database};
use std::sync::Arc;
use tracing::{error, info, instrument};

/**
 * Cliente de conexión hacia el Ledger del tablero (Turso / libSQL).
 * Clonable y compartible entre todos los estratos del orquestador.
 */
#[derive(Clone)]
pub struct BoardStoreClient {
    internal_database_driver: Arc<Database>,
    /// Mantiene viva la base en modo memoria evitando que SQLite la purgue.
    _memory_persistence_anchor: Option<Arc<Connection>>,
}

impl BoardStoreClient {
    /**
     * Establece el enlace con el motor y sincroniza el esquema del tablero.
     *
     * # Errors:
     * - `DbError::ConfigurationError`: URL vacía o token remoto ausente.
     * - `DbError::ConnectionError`: Fallo físico del driver o del esquema.
     */
    #[instrument(skip(database_access_token))]
    pub async fn connect(
        database_connection_url: &str,
        database_access_token: Option<String>,
    ) -> Result<Self, DbError> {
        if database_connection_url.is_empty() {
            return Err(DbError::ConfigurationError("DATABASE_URL_UNDEFINED".into()));
        }

        info!("🔌 [BOARD_STORE]: Initiating tactical link to [{}]", database_connection_url);

        let is_remote_deployment = database_connection_url.starts_with("libsql://")
            || database_connection_url.starts_with("https://");

        let is_memory_strata = database_connection_url.contains(":memory:")
            || database_connection_url.contains("mode=memory");

        let database_driver = if is_remote_deployment {
            let access_token = database_access_token.ok_or_else(|| {
                DbError::ConfigurationError("REMOTE_ACCESS_DENIED_TOKEN_MISSING".into())
            })?;
            Builder::new_remote(database_connection_url.to_string(), access_token)
                .build()
                .await
        } else {
            Builder::new_local(database_connection_url).build().await
        }
        .map_err(|driver_fault| {
            DbError::ConnectionError(format!("DRIVER_IGNITION_FAILURE: {}", driver_fault))
        })?;

        let shared_driver = Arc::new(database_driver);

        // En modo memoria el ancla se abre primero y el esquema se aplica
        // sobre ella; en disco/remoto una conexión de bootstrap basta.
        let memory_anchor = if is_memory_strata {
            let anchor_connection = shared_driver.connect().map_err(|anchor_fault| {
                DbError::ConnectionError(format!("ANCHOR_FAULT: {}", anchor_fault))
            })?;

            apply_board_schema(&anchor_connection).await.map_err(|schema_fault| {
                DbError::ConnectionError(format!("SCHEMA_SYNC_FAULT: {}", schema_fault))
            })?;

            info!("⚓ [BOARD_STORE]: Memory strata solidified and anchored.");
            Some(Arc::new(anchor_connection))
        } else {
            let bootstrap_connection = shared_driver.connect().map_err(|bootstrap_fault| {
                DbError::ConnectionError(format!("BOOTSTRAP_LINK_FAULT: {}", bootstrap_fault))
            })?;

            apply_board_schema(&bootstrap_connection).await.map_err(|schema_fault| {
                DbError::ConnectionError(format!("SCHEMA_SYNC_FAULT: {}", schema_fault))
            })?;

            None
        };

        Ok(Self {
            internal_database_driver: shared_driver,
            _memory_persistence_anchor: memory_anchor,
        })
    }

    /// Asigna una conexión fresca del driver compartido.
    pub fn get_connection(&self) -> Result<Connection, DbError> {
        self.internal_database_driver.connect().map_err(|allocation_fault| {
            error!("⚠️ [POOL_FAULT]: Connection allocation failed: {}", allocation_fault);
            DbError::ConnectionError(allocation_fault.to_string())
        })
    }
}
