// [apps/board-server/src/state/presence_registry.rs]
/*!
 * =================================================================
 * APARATO: PRESENCE REGISTRY STATE (V5.0 - ROUND ROBIN PALETTE)
 * CLASIFICACIÓN: APPLICATION STATE (ESTRATO L3)
 * RESPONSABILIDAD: MEMORIA EFÍMERA DE ACTIVIDAD POR SESIÓN
 *
 * VISION HIPER-HOLÍSTICA 2026:
 * 1. SESSION BOUNDED: Cada entrada nace en el accept del supervisor y
 *    muere con el cierre de la sesión duplex. Nada se persiste.
 * 2. PALETTE CURSOR: Contador atómico round-robin sobre la paleta fija
 *    de ocho colores; sin promesa de unicidad más allá del octavo.
 * 3. STABLE SNAPSHOTS: Las instantáneas para difusión se ordenan por
 *    (connected_at, client_id) garantizando un arreglo determinista.
 * =================================================================
 */

use chrono::Utc;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;
use syncboard_domain_models::{PresencePatch, PresenceUser, PRESENCE_COLOR_PALETTE};
use tracing::debug;

pub struct PresenceRegistry {
    active_operators: RwLock<HashMap<String, PresenceUser>>,
    palette_cursor: AtomicUsize,
}

impl Default for PresenceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl PresenceRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self {
            active_operators: RwLock::new(HashMap::new()),
            palette_cursor: AtomicUsize::new(0),
        }
    }

    /**
     * Registra un operador recién conectado asignando el siguiente color
     * de la paleta round-robin. Retorna la entrada forjada.
     */
    pub fn add_user(&self, client_identifier: &str, username: &str) -> PresenceUser {
        let palette_index =
            self.palette_cursor.fetch_add(1, Ordering::Relaxed) % PRESENCE_COLOR_PALETTE.len();

        let operator_entry = PresenceUser {
            client_id: client_identifier.to_string(),
            username: username.to_string(),
            color: PRESENCE_COLOR_PALETTE[palette_index].to_string(),
            viewing_task: None,
            editing_task: None,
            connected_at: Utc::now().to_rfc3339(),
        };

        let mut operators_guard = self.active_operators.write().expect("LOCK_POISONED");
        operators_guard.insert(client_identifier.to_string(), operator_entry.clone());
        debug!("👤 [PRESENCE]: Operator [{}] joined with color {}.",
            client_identifier, operator_entry.color);
        operator_entry
    }

    /**
     * Fusiona un parche de actividad sobre una entrada existente.
     * Un client_id desconocido retorna None sin crear la entrada.
     */
    pub fn update_user(
        &self,
        client_identifier: &str,
        activity_patch: PresencePatch,
    ) -> Option<PresenceUser> {
        let mut operators_guard = self.active_operators.write().expect("LOCK_POISONED");
        let operator_entry = operators_guard.get_mut(client_identifier)?;

        operator_entry.username = activity_patch.username;
        operator_entry.viewing_task = activity_patch.viewing_task;
        operator_entry.editing_task = activity_patch.editing_task;

        Some(operator_entry.clone())
    }

    /// Elimina la entrada al cierre de la sesión duplex.
    pub fn remove_user(&self, client_identifier: &str) -> Option<PresenceUser> {
        let mut operators_guard = self.active_operators.write().expect("LOCK_POISONED");
        let removed_entry = operators_guard.remove(client_identifier);
        if removed_entry.is_some() {
            debug!("👋 [PRESENCE]: Operator [{}] departed.", client_identifier);
        }
        removed_entry
    }

    /**
     * Instantánea estable del estrato de presencia para difusión.
     */
    #[must_use]
    pub fn get_all_users(&self) -> Vec<PresenceUser> {
        let operators_guard = self.active_operators.read().expect("LOCK_POISONED");
        let mut presence_snapshot: Vec<PresenceUser> = operators_guard.values().cloned().collect();
        presence_snapshot.sort_by(|left, right| {
            left.connected_at
                .cmp(&right.connected_at)
                .then_with(|| left.client_id.cmp(&right.client_id))
        });
        presence_snapshot
    }

    #[must_use]
    pub fn online_count(&self) -> usize {
        self.active_operators.read().expect("LOCK_POISONED").len()
    }
}
