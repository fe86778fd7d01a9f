// [libs/domain/models-rs/src/presence.rs]
/*!
 * =================================================================
 * APARATO: PRESENCE DOMAIN MODELS (V4.1 - EPHEMERAL STRATA)
 * CLASIFICACIÓN: DOMAIN MODELS (ESTRATO L2)
 * RESPONSABILIDAD: CONTRATOS DE ACTIVIDAD EFÍMERA POR SESIÓN
 *
 * VISION HIPER-HOLÍSTICA 2026:
 * 1. EPHEMERAL BY DESIGN: La presencia vive exclusivamente en la RAM del
 *    orquestador; su ciclo de vida está acotado por la sesión duplex.
 * 2. PALETTE GOVERNANCE: Paleta fija de ocho colores asignados en
 *    round-robin al conectar. Sin promesa de unicidad más allá del octavo.
 * =================================================================
 */

use serde::{Deserialize, Serialize};
use typeshare::typeshare;

/// Paleta cromática fija para la identificación visual de operadores.
/// El cursor round-robin del registro de presencia la recorre cíclicamente.
pub const PRESENCE_COLOR_PALETTE: [&str; 8] = [
    "#e74c3c", "#3498db", "#2ecc71", "#f39c12",
    "#9b59b6", "#1abc9c", "#e91e63", "#34495e",
];

/**
 * Entrada de presencia de un operador conectado.
 * Nunca se persiste: el supervisor de conexiones la crea al aceptar la
 * sesión y la destruye al cerrarla.
 */
#[typeshare]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PresenceUser {
    /// Identificador del cliente extraído del handshake de la sesión.
    pub client_id: String,
    /// Nombre visible del operador.
    pub username: String,
    /// Color asignado desde la paleta round-robin.
    pub color: String,
    /// Tarea actualmente visualizada, si alguna.
    pub viewing_task: Option<String>,
    /// Tarea actualmente en edición, si alguna.
    pub editing_task: Option<String>,
    /// Marca temporal RFC 3339 del establecimiento de la sesión.
    pub connected_at: String,
}

/**
 * Parche de actividad emitido por un cliente vía PRESENCE_UPDATE.
 * Los campos de actividad ausentes limpian el estado correspondiente.
 */
#[typeshare]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PresencePatch {
    pub username: String,
    #[serde(default)]
    pub viewing_task: Option<String>,
    #[serde(default)]
    pub editing_task: Option<String>,
}
