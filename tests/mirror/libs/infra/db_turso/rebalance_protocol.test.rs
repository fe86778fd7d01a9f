// [tests/mirror/libs/infra/db_turso/rebalance_protocol.test.rs]
/*!
 * =================================================================
 * APARATO: CERTIFICADOR DEL PROTOCOLO DE REBALANCEO (V4.0 - ZENITH)
 * CLASIFICACIÓN: TRINITY EVIDENCE // ESTRATO L3-MIRROR
 * RESPONSABILIDAD: AUDITORÍA DEL RE-LAYOUT ATÓMICO DE COLUMNAS
 *
 * # Mathematical Proof (Atomic Re-Layout):
 * El rebalanceo asigna (i+1)·STEP preservando el orden previo dentro
 * de una única transacción: cualquier observador externo ve todas las
 * posiciones nuevas o ninguna, nunca un estado intermedio.
 * =================================================================
 */

use syncboard_domain_models::{BoardColumn, TaskField};
use syncboard_infra_db::repositories::{NewTaskDraft, TaskRepository};
use syncboard_infra_db::BoardStoreClient;

async fn forge_volatile_board(memory_namespace: &str) -> TaskRepository {
    let database_client = BoardStoreClient::connect(
        &format!("file:{}?mode=memory&cache=shared", memory_namespace),
        None,
    )
    .await
    .expect("CRITICAL_FAULT: Failed to anchor in-memory board store.");

    TaskRepository::new(database_client)
}

async fn seed_compacted_column(task_repository: &TaskRepository) -> Vec<String> {
    let mut seeded_identifiers = Vec::new();
    for (title, starved_position) in [("first", 1.0), ("second", 1.3), ("third", 1.6)] {
        let seeded_task = task_repository
            .create_task(NewTaskDraft {
                title: title.into(),
                description: String::new(),
                column_id: BoardColumn::Todo,
                position: Some(starved_position),
            })
            .await
            .expect("SEED_FAULT: Compacted column genesis collapsed.");
        seeded_identifiers.push(seeded_task.id);
    }
    seeded_identifiers
}

#[cfg(test)]
mod tests {
    use super::*;

    /**
     * El re-layout nivela a múltiplos del paso canónico preservando el
     * orden previo y avanzando versión + sello de posición por fila.
     */
    #[tokio::test]
    async fn certify_rebalance_levels_starved_column() {
        let task_repository = forge_volatile_board("mem_rebalance_level_v4").await;
        let seeded_identifiers = seed_compacted_column(&task_repository).await;

        let rebalanced_rows = task_repository
            .rebalance_column(BoardColumn::Todo)
            .await
            .expect("REBALANCE_FAULT: Atomic re-layout collapsed.");

        // Orden previo preservado, posiciones en múltiplos del paso.
        let relayout_positions: Vec<f64> =
            rebalanced_rows.iter().map(|row| row.position).collect();
        assert_eq!(relayout_positions, vec![65536.0, 131072.0, 196608.0]);

        let relayout_identifiers: Vec<&str> =
            rebalanced_rows.iter().map(|row| row.id.as_str()).collect();
        assert_eq!(relayout_identifiers, seeded_identifiers.iter().map(String::as_str).collect::<Vec<_>>());

        // Cada fila avanza su versión en uno y nivela position_version.
        for rebalanced_row in &rebalanced_rows {
            assert_eq!(rebalanced_row.version, 2, "VERSION_DRIFT on {}", rebalanced_row.id);
            assert_eq!(
                rebalanced_row.position_version, rebalanced_row.version,
                "SEAL_DRIFT on {}", rebalanced_row.id
            );
            assert_eq!(rebalanced_row.field_version(TaskField::Title), 1);
        }

        // El estado persistido coincide con el retorno del re-layout.
        let persisted_rows = task_repository.get_all_tasks().await.unwrap();
        for rebalanced_row in &rebalanced_rows {
            let persisted_twin = persisted_rows
                .iter()
                .find(|row| row.id == rebalanced_row.id)
                .expect("PERSISTENCE_DRIFT: rebalanced row vanished");
            assert_eq!(persisted_twin.position, rebalanced_row.position);
            assert_eq!(persisted_twin.version, rebalanced_row.version);
        }
    }

    /**
     * La sonda de vecinas señala el agotamiento solo dentro del hueco mínimo.
     */
    #[tokio::test]
    async fn certify_neighbor_probe_flags_exhaustion() {
        let task_repository = forge_volatile_board("mem_rebalance_probe_v4").await;

        let anchor_task = task_repository
            .create_task(NewTaskDraft {
                title: "anchor".into(),
                description: String::new(),
                column_id: BoardColumn::Todo,
                position: Some(1000.0),
            })
            .await
            .unwrap();

        let drifting_task = task_repository
            .create_task(NewTaskDraft {
                title: "drifter".into(),
                description: String::new(),
                column_id: BoardColumn::Todo,
                position: Some(2000.0),
            })
            .await
            .unwrap();

        // Aterrizaje a 0.2 de la ancla: dentro del hueco mínimo.
        let starved_receipt = task_repository
            .move_task(&drifting_task.id, 1, BoardColumn::Todo, 1000.2)
            .await
            .unwrap();
        assert!(starved_receipt.needs_rebalance, "PROBE_BLINDNESS: starved gap unnoticed");

        // Aterrizaje lejano: sin señal de rebalanceo.
        let healthy_receipt = task_repository
            .move_task(&drifting_task.id, starved_receipt.outcome.task().version, BoardColumn::Todo, 5000.0)
            .await
            .unwrap();
        assert!(!healthy_receipt.needs_rebalance, "PROBE_PARANOIA: healthy gap flagged");

        let _ = anchor_task;
    }

    /**
     * El re-layout de una columna vacía es un no-op sellado.
     */
    #[tokio::test]
    async fn certify_rebalance_over_empty_column() {
        let task_repository = forge_volatile_board("mem_rebalance_empty_v4").await;
        let rebalanced_rows = task_repository
            .rebalance_column(BoardColumn::Done)
            .await
            .unwrap();
        assert!(rebalanced_rows.is_empty());
    }
}
