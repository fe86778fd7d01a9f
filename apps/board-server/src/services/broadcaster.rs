// [apps/board-server/src/services/broadcaster.rs]
/*!
 * =================================================================
 * APARATO: DUPLEX CONNECTION BROADCASTER (V9.0 - FAN-OUT MASTER)
 * CLASIFICACIÓN: APPLICATION SERVICES (ESTRATO L4)
 * RESPONSABILIDAD: REGISTRO DE SESIONES Y DIFUSIÓN AUTORITATIVA
 *
 * VISION HIPER-HOLÍSTICA 2026:
 * 1. AMORTIZED ENCODING: Cada difusión serializa el mensaje UNA vez y
 *    clona la trama por receptor, amortizando el coste de Serde.
 * 2. SILENT DROPS: El envío hacia una sesión colapsada se descarta en
 *    silencio; el evento de cierre retirará la entrada del registro.
 * 3. TRANSPORT AGNOSTIC: El registro entrega tramas de texto a canales
 *    desacoplados; el supervisor las cristaliza en frames WebSocket.
 *
 * # Mathematical Proof (Fan-out Isolation):
 * El fallo de entrega hacia un receptor nunca interrumpe la difusión
 * al resto: cada envío es una operación independiente sobre un canal
 * sin bloqueo, y la serialización ocurre antes del primer envío.
 * =================================================================
 */

use std::collections::HashMap;
use std::sync::RwLock;
use syncboard_domain_models::ServerMessage;
use tokio::sync::mpsc;
use tracing::{debug, error, warn};

/// Canal saliente de una sesión duplex (tramas de texto ya codificadas).
pub type OutboundFrameSender = mpsc::UnboundedSender<String>;

/**
 * Registro de sesiones duplex abiertas, indexado por client_id.
 * El supervisor registra en el accept y retira en el cierre.
 */
pub struct ConnectionRegistry {
    active_sessions: RwLock<HashMap<String, OutboundFrameSender>>,
}

impl Default for ConnectionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ConnectionRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self {
            active_sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Registra el canal saliente de una sesión recién aceptada.
    pub fn register(&self, client_identifier: &str, outbound_sender: OutboundFrameSender) {
        let mut sessions_guard = self.active_sessions.write().expect("LOCK_POISONED");
        if sessions_guard
            .insert(client_identifier.to_string(), outbound_sender)
            .is_some()
        {
            warn!("♻️ [BROADCASTER]: Session [{}] re-registered; previous link superseded.",
                client_identifier);
        }
    }

    /// Retira la sesión del registro tras su cierre.
    pub fn unregister(&self, client_identifier: &str) -> bool {
        let mut sessions_guard = self.active_sessions.write().expect("LOCK_POISONED");
        sessions_guard.remove(client_identifier).is_some()
    }

    #[must_use]
    pub fn active_session_count(&self) -> usize {
        self.active_sessions.read().expect("LOCK_POISONED").len()
    }

    /**
     * Entrega dirigida a una única sesión. No-op si la sesión no existe
     * o su canal ya colapsó.
     */
    pub fn send_to(&self, client_identifier: &str, message: &ServerMessage) {
        let Some(encoded_frame) = encode_frame(message) else {
            return;
        };

        let sessions_guard = self.active_sessions.read().expect("LOCK_POISONED");
        if let Some(outbound_sender) = sessions_guard.get(client_identifier) {
            if outbound_sender.send(encoded_frame).is_err() {
                debug!("💤 [BROADCASTER]: Dropped frame for severed session [{}].",
                    client_identifier);
            }
        }
    }

    /**
     * Difusión a todas las sesiones, con exclusión opcional del emisor.
     */
    pub fn broadcast(&self, message: &ServerMessage, skip_client_id: Option<&str>) {
        let Some(encoded_frame) = encode_frame(message) else {
            return;
        };

        let sessions_guard = self.active_sessions.read().expect("LOCK_POISONED");
        for (session_identifier, outbound_sender) in sessions_guard.iter() {
            if skip_client_id == Some(session_identifier.as_str()) {
                continue;
            }
            if outbound_sender.send(encoded_frame.clone()).is_err() {
                debug!("💤 [BROADCASTER]: Dropped frame for severed session [{}].",
                    session_identifier);
            }
        }
    }

    /// Difusión sin exclusiones (el emisor también recibe).
    pub fn broadcast_all(&self, message: &ServerMessage) {
        self.broadcast(message, None);
    }
}

/// Serialización única por difusión; el fallo se registra y descarta.
fn encode_frame(message: &ServerMessage) -> Option<String> {
    match serde_json::to_string(message) {
        Ok(encoded_frame) => Some(encoded_frame),
        Err(encoding_fault) => {
            error!("💀 [BROADCASTER_FATAL]: Frame serialization collapsed: {}", encoding_fault);
            None
        }
    }
}
