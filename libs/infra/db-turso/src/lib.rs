// [libs/infra/db-turso/src/lib.rs]
/*!
 * =================================================================
 * APARATO: PERSISTENCE LIBRARY ROOT (V4.0 - SOVEREIGN AUTHORITY)
 * CLASIFICACIÓN: CRATE ROOT (ESTRATO L3)
 * RESPONSABILIDAD: EXPOSICIÓN NOMINAL DEL ADAPTADOR DE PERSISTENCIA
 * =================================================================
 */

/// Cliente de conexión con ancla de memoria compartida.
pub mod client;
/// Catálogo semántico de fallos de persistencia.
pub mod errors;
/// Matriz de acceso a repositorios del tablero.
pub mod repositories;
/// Motor idempotente de sincronización estructural.
pub mod schema;

pub use client::BoardStoreClient;
pub use errors::DbError;
