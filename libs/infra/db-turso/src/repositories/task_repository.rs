// [libs/infra/db-turso/src/repositories/task_repository.rs]
/*!
 * =================================================================
 * APARATO: TASK OMNISCIENT REPOSITORY (V14.0 - ROW LOCK MASTER)
 * CLASIFICACIÓN: INFRASTRUCTURE ADAPTER (ESTRATO L3)
 * RESPONSABILIDAD: MUTACIONES ACID, RESOLUCIÓN LWW Y REBALANCEO
 *
 * VISION HIPER-HOLÍSTICA 2026:
 * 1. ATOMIC INTEGRITY: Toda mutación ejecuta en una transacción
 *    IMMEDIATE que abarca el ciclo leer-analizar-escribir completo,
 *    cerrando la ventana TOCTOU contra mutadores concurrentes.
 * 2. FIELD VERSION LEVELING: Cada escritura exitosa avanza 'version'
 *    exactamente en uno y nivela los sellos de los campos fusionados.
 * 3. DEFERRED REBALANCE: La sonda de vecinas detecta el agotamiento de
 *    precisión; el re-layout se difiere a una transacción posterior
 *    invocada por el enrutador.
 *
 * # Mathematical Proof (Serialized Mutators):
 * El candado de escritura IMMEDIATE del motor serializa a todos los
 * escritores de la fila objetivo. Dos mutaciones concurrentes sobre la
 * misma tarea observan mutuamente su estado comprometido, por lo que el
 * análisis causal por campo nunca razona sobre una lectura obsoleta.
 * =================================================================
 */

use crate::errors::DbError;
use crate::BoardStoreClient;
use chrono::Utc;
use libsql::{params, Connection, Row, TransactionBehavior};
use syncboard_core_ordering::{evenly_spaced_position, position_at_end, MIN_POSITION_GAP};
use syncboard_domain_conflict::{
    analyze_against_current, resolution_reason, ConflictAnalysis, TaskChangeSet,
};
use syncboard_domain_models::{
    sanitize_description, sanitize_title, BoardColumn, Task, TaskField,
};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

/// Proyección canónica de la fila de tareas, alineada con map_task_row.
const TASK_PROJECTION: &str = "id, title, description, column_id, position, version, \
     title_version, description_version, column_version, position_version, \
     created_at, updated_at";

/// Borrador de alta de tarea (el tempId del cliente no se persiste).
#[derive(Debug, Clone)]
pub struct NewTaskDraft {
    pub title: String,
    pub description: String,
    pub column_id: BoardColumn,
    /// Propuesta del cliente; los valores no estrictamente positivos
    /// delegan al cálculo de final de columna dentro de la transacción.
    pub position: Option<f64>,
}

/// Veredicto de una mutación transaccional sobre una tarea.
#[derive(Debug, Clone, PartialEq)]
pub enum MutationOutcome {
    /// Escritura limpia: todos los campos propuestos fusionaron.
    Clean(Task),
    /// Fusión parcial: los campos rechazados conservan el valor del servidor.
    Merged {
        task: Task,
        merged_fields: Vec<TaskField>,
        rejected_fields: Vec<TaskField>,
        reason: String,
    },
    /// Rechazo total: sin escritura; la tarea transporta el estado vigente.
    Rejected {
        task: Task,
        rejected_fields: Vec<TaskField>,
        reason: String,
    },
}

impl MutationOutcome {
    /// Estado autoritativo de la fila tras el veredicto.
    #[must_use]
    pub fn task(&self) -> &Task {
        match self {
            MutationOutcome::Clean(task) => task,
            MutationOutcome::Merged { task, .. } => task,
            MutationOutcome::Rejected { task, .. } => task,
        }
    }

    /// La mutación terminó sin ninguna escritura.
    #[must_use]
    pub fn is_rejected(&self) -> bool {
        matches!(self, MutationOutcome::Rejected { .. })
    }
}

/// Recibo de una reubicación: veredicto más la señal de rebalanceo.
#[derive(Debug, Clone, PartialEq)]
pub struct MoveReceipt {
    pub outcome: MutationOutcome,
    /// Alguna vecina de la nueva posición quedó dentro de MIN_POSITION_GAP.
    pub needs_rebalance: bool,
}

/// Repositorio de autoridad única para la persistencia del tablero.
pub struct TaskRepository {
    /// Cliente táctico para el enlace con el motor libSQL.
    database_client: BoardStoreClient,
}

impl TaskRepository {
    /**
     * Construye una nueva instancia inyectando el cliente táctico.
     */
    #[must_use]
    pub fn new(database_client: BoardStoreClient) -> Self {
        Self { database_client }
    }

    /**
     * Alta transaccional de una tarea con sellos de versión en génesis (1).
     *
     * # Errors:
     * - `DbError::QueryError`: Si el motor rechaza la inserción.
     *
     * # Performance:
     * O(n) sobre la columna solo cuando la posición delega al final;
     * O(1) indexado en caso contrario.
     */
    #[instrument(skip(self, draft), fields(column = draft.column_id.as_str()))]
    pub async fn create_task(&self, draft: NewTaskDraft) -> Result<Task, DbError> {
        let connection = self.database_client.get_connection()?;
        let creation_transaction = connection
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .await
            .map_err(DbError::QueryError)?;

        let assigned_position = match draft.position.filter(|proposed| *proposed > 0.0) {
            Some(proposed_position) => proposed_position,
            None => {
                let column_positions =
                    read_column_positions(&creation_transaction, draft.column_id).await?;
                position_at_end(&column_positions)
            }
        };

        let task_identifier = Uuid::new_v4().to_string();
        let genesis_timestamp = Utc::now().to_rfc3339();

        creation_transaction
            .execute(
                "INSERT INTO tasks (
                    id, title, description, column_id, position,
                    version, title_version, description_version, column_version, position_version,
                    created_at, updated_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, 1, 1, 1, 1, 1, ?6, ?6)",
                params![
                    task_identifier.clone(),
                    sanitize_title(&draft.title),
                    sanitize_description(&draft.description),
                    draft.column_id.as_str(),
                    assigned_position,
                    genesis_timestamp
                ],
            )
            .await
            .map_err(DbError::QueryError)?;

        let created_task = fetch_task(&creation_transaction, &task_identifier)
            .await?
            .ok_or(DbError::TaskNotFound)?;

        creation_transaction.commit().await.map_err(DbError::QueryError)?;

        info!("🆕 [TASK_GENESIS]: Task {} solidified at position {}.",
            created_task.id, created_task.position);
        Ok(created_task)
    }

    /**
     * Mutación de contenido (título / descripción) bajo análisis causal.
     *
     * Bloquea la fila, ejecuta el resolutor y escribe únicamente los
     * campos fusionados, nivelando sus sellos a la nueva versión global.
     *
     * # Errors:
     * - `DbError::TaskNotFound`: La fila no existe en el tablero.
     */
    #[instrument(skip(self, proposed_changes), fields(task = %task_identifier))]
    pub async fn update_task(
        &self,
        task_identifier: &str,
        base_version: i64,
        proposed_changes: TaskChangeSet,
    ) -> Result<MutationOutcome, DbError> {
        let sanitized_changes = TaskChangeSet {
            title: proposed_changes.title.as_deref().map(sanitize_title),
            description: proposed_changes.description.as_deref().map(sanitize_description),
            column_id: None,
            position: None,
        };

        self.execute_analyzed_mutation(task_identifier, base_version, sanitized_changes)
            .await
    }

    /**
     * Reubicación de columna y posición bajo análisis causal, seguida de
     * la sonda de vecinas que decide el rebalanceo diferido.
     */
    #[instrument(skip(self), fields(task = %task_identifier, column = target_column.as_str()))]
    pub async fn move_task(
        &self,
        task_identifier: &str,
        base_version: i64,
        target_column: BoardColumn,
        target_position: f64,
    ) -> Result<MoveReceipt, DbError> {
        let proposed_changes = TaskChangeSet {
            title: None,
            description: None,
            column_id: Some(target_column),
            position: Some(target_position),
        };

        let connection = self.database_client.get_connection()?;
        let move_transaction = connection
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .await
            .map_err(DbError::QueryError)?;

        let current_row = fetch_task(&move_transaction, task_identifier)
            .await?
            .ok_or(DbError::TaskNotFound)?;

        let analysis = analyze_against_current(&current_row, base_version, proposed_changes);

        if analysis.fully_rejected() {
            let reason = resolution_reason(&analysis);
            move_transaction.rollback().await.map_err(DbError::QueryError)?;
            warn!("⛔ [MOVE_REJECTED]: Task {} kept at {} / {}.",
                current_row.id, current_row.column_id.as_str(), current_row.position);
            return Ok(MoveReceipt {
                outcome: MutationOutcome::Rejected {
                    task: current_row,
                    rejected_fields: analysis.rejected_fields,
                    reason,
                },
                needs_rebalance: false,
            });
        }

        let updated_task =
            apply_merged_changes(&move_transaction, &current_row, &analysis).await?;

        let needs_rebalance =
            probe_neighbor_exhaustion(&move_transaction, &updated_task).await?;

        move_transaction.commit().await.map_err(DbError::QueryError)?;

        if needs_rebalance {
            debug!("📐 [GAP_ALERT]: Column {} precision near exhaustion around task {}.",
                updated_task.column_id.as_str(), updated_task.id);
        }

        Ok(MoveReceipt {
            outcome: seal_outcome(updated_task, analysis),
            needs_rebalance,
        })
    }

    /**
     * Baja incondicional: conmuta con cualquier otra operación de la
     * misma fila, evitando bucles fantasma de edición contra borrado.
     * El baseVersion del cliente se acepta pero no se aplica.
     *
     * @returns 'true' si la fila existía y fue incinerada.
     */
    #[instrument(skip(self), fields(task = %task_identifier))]
    pub async fn delete_task(&self, task_identifier: &str) -> Result<bool, DbError> {
        let connection = self.database_client.get_connection()?;
        let incinerated_rows = connection
            .execute("DELETE FROM tasks WHERE id = ?1", params![task_identifier])
            .await
            .map_err(DbError::QueryError)?;

        if incinerated_rows > 0 {
            info!("🗑️ [TASK_PURGE]: Task {} incinerated from the board.", task_identifier);
        }
        Ok(incinerated_rows > 0)
    }

    /**
     * Instantánea completa del tablero ordenada por (columna, posición).
     * Alimenta el estado inicial duplex y el endpoint REST de lectura.
     */
    #[instrument(skip(self))]
    pub async fn get_all_tasks(&self) -> Result<Vec<Task>, DbError> {
        let connection = self.database_client.get_connection()?;
        let sql_statement = format!(
            "SELECT {} FROM tasks ORDER BY column_id, position",
            TASK_PROJECTION
        );

        let mut rows = connection.query(&sql_statement, ()).await.map_err(DbError::QueryError)?;
        let mut board_snapshot = Vec::new();
        while let Some(row) = rows.next().await.map_err(DbError::QueryError)? {
            board_snapshot.push(map_task_row(&row)?);
        }
        Ok(board_snapshot)
    }

    /**
     * Re-layout atómico de una columna: cada fila recibe (i+1)·STEP en su
     * orden previo, avanza 'version' en uno y nivela position_version.
     * Los clientes observan todas las posiciones nuevas o ninguna.
     *
     * # Errors:
     * - `DbError::QueryError`: Si algún paso del sellado colapsa; la
     *   transacción completa se revierte.
     */
    #[instrument(skip(self), fields(column = target_column.as_str()))]
    pub async fn rebalance_column(
        &self,
        target_column: BoardColumn,
    ) -> Result<Vec<Task>, DbError> {
        let connection = self.database_client.get_connection()?;
        let rebalance_transaction = connection
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .await
            .map_err(DbError::QueryError)?;

        let sql_statement = format!(
            "SELECT {} FROM tasks WHERE column_id = ?1 ORDER BY position",
            TASK_PROJECTION
        );
        let mut rows = rebalance_transaction
            .query(&sql_statement, params![target_column.as_str()])
            .await
            .map_err(DbError::QueryError)?;

        let mut column_rows = Vec::new();
        while let Some(row) = rows.next().await.map_err(DbError::QueryError)? {
            column_rows.push(map_task_row(&row)?);
        }

        let relayout_timestamp = Utc::now().to_rfc3339();

        for (row_index, column_task) in column_rows.iter_mut().enumerate() {
            let leveled_position = evenly_spaced_position(row_index);
            let advanced_version = column_task.version + 1;

            rebalance_transaction
                .execute(
                    "UPDATE tasks SET position = ?2, version = ?3,
                        position_version = ?3, updated_at = ?4
                     WHERE id = ?1",
                    params![
                        column_task.id.clone(),
                        leveled_position,
                        advanced_version,
                        relayout_timestamp.clone()
                    ],
                )
                .await
                .map_err(DbError::QueryError)?;

            column_task.position = leveled_position;
            column_task.version = advanced_version;
            column_task.position_version = advanced_version;
            column_task.updated_at = relayout_timestamp.clone();
        }

        rebalance_transaction.commit().await.map_err(DbError::QueryError)?;

        info!("📐 [REBALANCE_SEALED]: Column {} leveled across {} rows.",
            target_column.as_str(), column_rows.len());
        Ok(column_rows)
    }

    /**
     * Tronco común de update: candado de fila, análisis y escritura
     * selectiva de los campos fusionados.
     */
    async fn execute_analyzed_mutation(
        &self,
        task_identifier: &str,
        base_version: i64,
        proposed_changes: TaskChangeSet,
    ) -> Result<MutationOutcome, DbError> {
        let connection = self.database_client.get_connection()?;
        let mutation_transaction = connection
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .await
            .map_err(DbError::QueryError)?;

        let current_row = fetch_task(&mutation_transaction, task_identifier)
            .await?
            .ok_or(DbError::TaskNotFound)?;

        let analysis = analyze_against_current(&current_row, base_version, proposed_changes);

        if analysis.fully_rejected() {
            let reason = resolution_reason(&analysis);
            mutation_transaction.rollback().await.map_err(DbError::QueryError)?;
            warn!("⛔ [UPDATE_REJECTED]: Task {} retains server values.", current_row.id);
            return Ok(MutationOutcome::Rejected {
                task: current_row,
                rejected_fields: analysis.rejected_fields,
                reason,
            });
        }

        let updated_task =
            apply_merged_changes(&mutation_transaction, &current_row, &analysis).await?;

        mutation_transaction.commit().await.map_err(DbError::QueryError)?;

        Ok(seal_outcome(updated_task, analysis))
    }
}

// --- ESTRATO DE SOPORTE TRANSACCIONAL (PRIVADO) ---

/// Traduce el análisis comprometido a su veredicto público.
fn seal_outcome(updated_task: Task, analysis: ConflictAnalysis) -> MutationOutcome {
    if analysis.has_conflict() {
        let reason = resolution_reason(&analysis);
        MutationOutcome::Merged {
            task: updated_task,
            merged_fields: analysis.merged_fields,
            rejected_fields: analysis.rejected_fields,
            reason,
        }
    } else {
        MutationOutcome::Clean(updated_task)
    }
}

/// Lectura bloqueante de una fila bajo la transacción vigente.
async fn fetch_task(
    connection: &Connection,
    task_identifier: &str,
) -> Result<Option<Task>, DbError> {
    let sql_statement = format!("SELECT {} FROM tasks WHERE id = ?1", TASK_PROJECTION);
    let mut rows = connection
        .query(&sql_statement, params![task_identifier])
        .await
        .map_err(DbError::QueryError)?;

    match rows.next().await.map_err(DbError::QueryError)? {
        Some(row) => Ok(Some(map_task_row(&row)?)),
        None => Ok(None),
    }
}

/// Posiciones vigentes de una columna para el cálculo de final de cola.
async fn read_column_positions(
    connection: &Connection,
    column: BoardColumn,
) -> Result<Vec<f64>, DbError> {
    let mut rows = connection
        .query(
            "SELECT position FROM tasks WHERE column_id = ?1",
            params![column.as_str()],
        )
        .await
        .map_err(DbError::QueryError)?;

    let mut column_positions = Vec::new();
    while let Some(row) = rows.next().await.map_err(DbError::QueryError)? {
        column_positions.push(row.get::<f64>(0).map_err(DbError::QueryError)?);
    }
    Ok(column_positions)
}

/**
 * Escribe los campos fusionados del análisis y sella la nueva versión
 * global. Los campos no fusionados retienen valor y sello previos.
 */
async fn apply_merged_changes(
    connection: &Connection,
    current_row: &Task,
    analysis: &ConflictAnalysis,
) -> Result<Task, DbError> {
    let advanced_version = current_row.version + 1;
    let write_timestamp = Utc::now().to_rfc3339();

    if let Some(merged_title) = &analysis.merged_changes.title {
        connection
            .execute(
                "UPDATE tasks SET title = ?2, title_version = ?3 WHERE id = ?1",
                params![current_row.id.clone(), merged_title.clone(), advanced_version],
            )
            .await
            .map_err(DbError::QueryError)?;
    }

    if let Some(merged_description) = &analysis.merged_changes.description {
        connection
            .execute(
                "UPDATE tasks SET description = ?2, description_version = ?3 WHERE id = ?1",
                params![current_row.id.clone(), merged_description.clone(), advanced_version],
            )
            .await
            .map_err(DbError::QueryError)?;
    }

    if let Some(merged_column) = analysis.merged_changes.column_id {
        connection
            .execute(
                "UPDATE tasks SET column_id = ?2, column_version = ?3 WHERE id = ?1",
                params![current_row.id.clone(), merged_column.as_str(), advanced_version],
            )
            .await
            .map_err(DbError::QueryError)?;
    }

    if let Some(merged_position) = analysis.merged_changes.position {
        connection
            .execute(
                "UPDATE tasks SET position = ?2, position_version = ?3 WHERE id = ?1",
                params![current_row.id.clone(), merged_position, advanced_version],
            )
            .await
            .map_err(DbError::QueryError)?;
    }

    connection
        .execute(
            "UPDATE tasks SET version = ?2, updated_at = ?3 WHERE id = ?1",
            params![current_row.id.clone(), advanced_version, write_timestamp],
        )
        .await
        .map_err(DbError::QueryError)?;

    fetch_task(connection, &current_row.id)
        .await?
        .ok_or(DbError::TaskNotFound)
}

/**
 * Sonda de agotamiento: lee hasta dos vecinas de la misma columna
 * ordenadas por distancia absoluta a la nueva posición (excluyendo la
 * tarea movida) y señala rebalanceo si alguna cae dentro del hueco
 * mínimo tolerado.
 */
async fn probe_neighbor_exhaustion(
    connection: &Connection,
    moved_task: &Task,
) -> Result<bool, DbError> {
    let mut rows = connection
        .query(
            "SELECT position FROM tasks
             WHERE column_id = ?1 AND id <> ?2
             ORDER BY ABS(position - ?3) ASC
             LIMIT 2",
            params![
                moved_task.column_id.as_str(),
                moved_task.id.clone(),
                moved_task.position
            ],
        )
        .await
        .map_err(DbError::QueryError)?;

    while let Some(row) = rows.next().await.map_err(DbError::QueryError)? {
        let neighbor_position = row.get::<f64>(0).map_err(DbError::QueryError)?;
        if (neighbor_position - moved_task.position).abs() < MIN_POSITION_GAP {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Transforma una fila del motor en la entidad soberana del dominio.
fn map_task_row(row: &Row) -> Result<Task, DbError> {
    let column_label = row.get::<String>(3).map_err(DbError::QueryError)?;
    let column_id = BoardColumn::parse(&column_label).ok_or_else(|| {
        DbError::MappingError(format!("UNKNOWN_COLUMN_LABEL: {}", column_label))
    })?;

    Ok(Task {
        id: row.get::<String>(0).map_err(DbError::QueryError)?,
        title: row.get::<String>(1).map_err(DbError::QueryError)?,
        description: row.get::<String>(2).map_err(DbError::QueryError)?,
        column_id,
        position: row.get::<f64>(4).map_err(DbError::QueryError)?,
        version: row.get::<i64>(5).map_err(DbError::QueryError)?,
        title_version: row.get::<i64>(6).map_err(DbError::QueryError)?,
        description_version: row.get::<i64>(7).map_err(DbError::QueryError)?,
        column_version: row.get::<i64>(8).map_err(DbError::QueryError)?,
        position_version: row.get::<i64>(9).map_err(DbError::QueryError)?,
        created_at: row.get::<String>(10).map_err(DbError::QueryError)?,
        updated_at: row.get::<String>(11).map_err(DbError::QueryError)?,
    })
}
