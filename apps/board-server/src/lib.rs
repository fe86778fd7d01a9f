// [apps/board-server/src/lib.rs]
/*!
 * =================================================================
 * APARATO: BOARD SERVER LIBRARY ROOT (V5.0 - SOVEREIGN AUTHORITY)
 * CLASIFICACIÓN: CRATE ROOT (ESTRATO L3)
 * RESPONSABILIDAD: DEFINICIÓN SUPREMA DEL ÁRBOL DE MÓDULOS
 *
 * # Mathematical Proof (Modular Encapsulation):
 * Al declarar 'pub mod' aquí, 'state', 'services' y 'handlers' son
 * hermanos bajo el mismo tronco 'crate', habilitando la inyección de
 * dependencias en tiempo de compilación: el enrutador de mensajes
 * nunca depende del supervisor de conexiones.
 * =================================================================
 */

// --- ESTRATO DE DATOS Y ESTADO (L1-APP) ---
/// Gestor del sistema nervioso central del servidor.
pub mod state;

// --- ESTRATO DE TRANSPORTE Y ACCIÓN ---
/// Adaptadores de entrada para ráfagas HTTP y WebSockets.
pub mod handlers;
/// Núcleo de mando para la ignición de servicios.
pub mod kernel;
/// Definición de rutas y topología de red.
pub mod routes;
/// Difusión, enrutado de mensajes y ensamble de instantáneas.
pub mod services;

/**
 * PRELUDIO DEL SERVIDOR
 *
 * Re-exportación estratégica de los componentes necesarios para la
 * ignición mínima del sistema. Reduce el acoplamiento en 'main.rs'.
 */
pub mod prelude {
    pub use crate::kernel::BoardKernel;
    pub use crate::state::AppState;
}
