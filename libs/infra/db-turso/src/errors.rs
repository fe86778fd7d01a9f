// [libs/infra/db-turso/src/errors.rs]
/*!
 * =================================================================
 * APARATO: DATABASE ERROR CATALOG (V6.1 - SOBERANO)
 * CLASIFICACIÓN: INFRASTRUCTURE CORE (ESTRATO L3)
 * RESPONSABILIDAD: CATALOGACIÓN SEMÁNTICA DE FALLOS DE PERSISTENCIA
 *
 * VISION HIPER-HOLÍSTICA 2026:
 * 1. PANOPTICON COMPLIANCE: Mensajes con prefijos de estrato para su
 *    renderizado cromático en observabilidad.
 * 2. ZERO ABBREVIATIONS: Nomenclatura nominal absoluta.
 * =================================================================
 */

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    /// Error de enlace físico o de red con el motor libSQL.
    #[error("[L3_DB_NET_FAULT]: DATABASE_UPLINK_SEVERED -> {0}")]
    ConnectionError(String),

    /// Fallo en la configuración del entorno (URL vacía o token ausente).
    #[error("[L3_DB_CONFIG_FAULT]: STRATEGIC_ENV_VOID -> {0}")]
    ConfigurationError(String),

    /// Error de sintaxis o ejecución devuelto por el motor libSQL.
    #[error("[L3_DB_QUERY_FAULT]: SQL_QUERY_REJECTED -> {0}")]
    QueryError(#[from] libsql::Error),

    /// Fallo en la transformación de tipos entre SQLite y el Dominio Rust.
    #[error("[L3_DB_MAPPING_FAULT]: DATA_MAPPING_VIOLATION -> {0}")]
    MappingError(String),

    // --- ESTRATO DE CONTROL DE TAREAS (L2/L3) ---

    /// La tarea solicitada no existe en el tablero persistido.
    #[error("[L3_TASK_FAULT]: IDENTIFIER_NOT_FOUND")]
    TaskNotFound,

    /// Error al comprometer o revertir una secuencia transaccional.
    #[error("[L3_DB_FAULT]: TRANSACTION_COLLAPSE")]
    TransactionError,
}
