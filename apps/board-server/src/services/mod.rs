// [apps/board-server/src/services/mod.rs]
/*!
 * =================================================================
 * APARATO: SERVICE ORCHESTRATION HUB (V6.0 - REALTIME MATRIX)
 * CLASIFICACIÓN: APPLICATION SERVICES (ESTRATO L4)
 * RESPONSABILIDAD: EXPOSICIÓN NOMINAL DE LOS SERVICIOS DEL TABLERO
 *
 * # Topología de Módulos:
 * - broadcaster:    Registro de sesiones y difusión dirigida / fan-out.
 * - message_router: Decodificación, despacho y políticas de conflicto.
 * - snapshot:       Ensamble del estado inicial para recién llegados.
 * =================================================================
 */

pub mod broadcaster;
pub mod message_router;
pub mod snapshot;

pub use broadcaster::ConnectionRegistry;
pub use message_router::MessageRouter;
