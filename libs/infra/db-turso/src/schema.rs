// [libs/infra/db-turso/src/schema.rs]
/**
 * =================================================================
 * APARATO: BOARD SCHEMA ENGINE (V5.0 - FIELD VERSION STRATA)
 * CLASIFICACIÓN: INFRASTRUCTURE LAYER (ESTRATO L3)
 * RESPONSABILIDAD: GOBERNANZA ESTRUCTURAL E IDEMPOTENCIA TOTAL
 *
 * VISION HIPER-HOLÍSTICA:
 * 1. FIELD VERSION EVOLUTION: Los sellos de versión por campo llegan
 *    como estrato evolutivo sobre la tabla base de tareas.
 * 2. IDEMPOTENCIA: Gestión de errores para migraciones en caliente.
 * 3. PERFORMANCE: Índice compuesto (column_id, position) para el
 *    snapshot ordenado y la sonda de vecinas del rebalanceo.
 * =================================================================
 */

use anyhow::{Context, Result};
use libsql::Connection;
use tracing::{debug, info, instrument, warn};

/**
 * ESTRATO 1: SOLIDIFICACIÓN (Génesis de Tablas)
 * La tarea es la única entidad persistida del tablero colaborativo.
 */
const BOARD_TABLES: &[(&str, &str)] = &[(
    "TABLE_TASKS",
    r#"
        CREATE TABLE IF NOT EXISTS tasks (
            id TEXT PRIMARY KEY,
            title TEXT NOT NULL DEFAULT 'New Task',
            description TEXT NOT NULL DEFAULT '',
            column_id TEXT NOT NULL CHECK (column_id IN ('todo', 'inprogress', 'done')),
            position REAL NOT NULL,
            version INTEGER NOT NULL DEFAULT 1,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );
    "#,
)];

/**
 * ESTRATO 2: EVOLUCIÓN (Mutaciones de Columna)
 * Sellos de versión por campo para la resolución de conflictos LWW.
 */
const EVOLUTIONARY_STRATA: &[(&str, &str)] = &[
    ("TASK_TITLE_VERSION", "ALTER TABLE tasks ADD COLUMN title_version INTEGER NOT NULL DEFAULT 1"),
    ("TASK_DESCRIPTION_VERSION", "ALTER TABLE tasks ADD COLUMN description_version INTEGER NOT NULL DEFAULT 1"),
    ("TASK_COLUMN_VERSION", "ALTER TABLE tasks ADD COLUMN column_version INTEGER NOT NULL DEFAULT 1"),
    ("TASK_POSITION_VERSION", "ALTER TABLE tasks ADD COLUMN position_version INTEGER NOT NULL DEFAULT 1"),
];

/**
 * ESTRATO 3: ENDURECIMIENTO (Índices de Aceleración)
 */
const ACCELERATION_INDEXES: &[(&str, &str)] = &[(
    "IDX_TASKS_COLUMN_POSITION",
    "CREATE INDEX IF NOT EXISTS idx_tasks_column_position ON tasks(column_id, position);",
)];

/**
 * Ejecuta la secuencia maestra de sincronización del esquema del tablero.
 *
 * # Errors:
 * Retorna error si la tabla base falla en solidificarse, indicando un
 * colapso en el enlace con el motor.
 */
#[instrument(skip(database_connection))]
pub async fn apply_board_schema(database_connection: &Connection) -> Result<()> {
    info!("🏗️ [SCHEMA_ENGINE]: Initiating structural synchronization V5.0...");

    solidify_base_strata(database_connection).await?;
    execute_evolutionary_repair(database_connection).await?;
    harden_access_layer(database_connection).await?;

    info!("✅ [SCHEMA_ENGINE]: Board store V5.0 level and certified.");
    Ok(())
}

async fn solidify_base_strata(db: &Connection) -> Result<()> {
    for (identifier, sql) in BOARD_TABLES {
        debug!("  ↳ Solidifying: {}", identifier);
        db.execute(*sql, ()).await
            .with_context(|| format!("CRITICAL_SOLIDIFICATION_FAULT: {}", identifier))?;
    }
    Ok(())
}

async fn execute_evolutionary_repair(db: &Connection) -> Result<()> {
    for (identifier, sql) in EVOLUTIONARY_STRATA {
        match db.execute(*sql, ()).await {
            Ok(_) => debug!("  🟢 [REPAIR_OK]: Applied evolutionary stratum {}", identifier),
            Err(repair_fault) => {
                let message = repair_fault.to_string();
                if message.contains("duplicate column name") {
                    debug!("  ⚪ [REPAIR_SKIP]: {} already level.", identifier);
                } else {
                    warn!("  ⚠️ [REPAIR_BYPASS]: {} check incomplete: {}", identifier, message);
                }
            }
        }
    }
    Ok(())
}

async fn harden_access_layer(db: &Connection) -> Result<()> {
    for (identifier, sql) in ACCELERATION_INDEXES {
        debug!("  ↳ Hardening: {}", identifier);
        db.execute(*sql, ()).await
            .with_context(|| format!("CRITICAL_HARDENING_FAULT: {}", identifier))?;
    }
    Ok(())
}
