// [apps/board-server/src/handlers/mod.rs]
/*!
 * =================================================================
 * APARATO: HANDLER ORCHESTRATION HUB (V7.0 - BOARD MATRIX)
 * CLASIFICACIÓN: APPLICATION ADAPTERS (ESTRATO L4)
 * RESPONSABILIDAD: EXPOSICIÓN NOMINAL DE PUNTOS DE ENTRADA
 *
 * # Topología de Módulos:
 * - board_api: Superficie HTTP de solo lectura (salud / listado).
 * - stream:    Supervisor de sesiones duplex en tiempo real.
 * =================================================================
 */

pub mod board_api;
pub mod stream;
