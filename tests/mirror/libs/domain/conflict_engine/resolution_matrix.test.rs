// [tests/mirror/libs/domain/conflict_engine/resolution_matrix.test.rs]
/*!
 * =================================================================
 * APARATO: CERTIFICADOR DE LA MATRIZ DE RESOLUCIÓN (V5.1 - ZENITH)
 * CLASIFICACIÓN: TRINITY EVIDENCE // ESTRATO L2-MIRROR
 * RESPONSABILIDAD: AUDITORÍA DEL VEREDICTO CAUSAL POR CAMPO
 *
 * # Mathematical Proof (Field Partition):
 * Para todo análisis, merged_fields y rejected_fields forman una
 * partición exacta de los campos propuestos: disjuntos, y su unión
 * reconstruye el conjunto de entrada. Un campo fusiona si y solo si
 * su sello es <= baseVersion.
 * =================================================================
 */

use proptest::prelude::*;
use syncboard_domain_conflict::{
    analyze_against_current, resolution_reason, TaskChangeSet,
};
use syncboard_domain_models::{BoardColumn, Task, TaskField};

/// Fila de referencia: versión global 3, título tocado por la v3,
/// columna/posición por la v2, descripción intacta desde génesis.
fn forge_current_row() -> Task {
    Task {
        id: "row-under-audit".into(),
        title: "Server title".into(),
        description: "Server description".into(),
        column_id: BoardColumn::InProgress,
        position: 65536.0,
        version: 3,
        title_version: 3,
        description_version: 1,
        column_version: 2,
        position_version: 2,
        created_at: "2026-01-10T09:00:00+00:00".into(),
        updated_at: "2026-01-10T09:05:00+00:00".into(),
    }
}

#[test]
fn certify_clean_merge_over_untouched_fields() {
    // El cliente observó la v3 completa: todo campo fusiona.
    let analysis = analyze_against_current(
        &forge_current_row(),
        3,
        TaskChangeSet {
            title: Some("Leveled".into()),
            description: Some("Fresh".into()),
            column_id: None,
            position: None,
        },
    );

    assert!(!analysis.has_conflict());
    assert!(!analysis.fully_rejected());
    assert_eq!(analysis.merged_fields, vec![TaskField::Title, TaskField::Description]);
    assert!(analysis.rejected_fields.is_empty());
    assert_eq!(analysis.merged_changes.title.as_deref(), Some("Leveled"));

    let reason = resolution_reason(&analysis);
    assert!(reason.contains("no conflicts"), "REASON_DRIFT: {}", reason);
}

#[test]
fn certify_disjoint_sets_merge_losslessly() {
    // Mover (v2) contra editar descripción (v1): el cliente en base 1
    // solo puede tocar la descripción; columna y posición lo rechazan.
    let analysis = analyze_against_current(
        &forge_current_row(),
        1,
        TaskChangeSet {
            title: None,
            description: Some("Offline description".into()),
            column_id: None,
            position: None,
        },
    );

    assert!(!analysis.has_conflict());
    assert_eq!(analysis.merged_fields, vec![TaskField::Description]);
}

#[test]
fn certify_full_rejection_of_stale_relocation() {
    // Reubicación con base 1 contra sellos de columna/posición en v2.
    let analysis = analyze_against_current(
        &forge_current_row(),
        1,
        TaskChangeSet {
            title: None,
            description: None,
            column_id: Some(BoardColumn::Done),
            position: Some(65536.0),
        },
    );

    assert!(analysis.has_conflict());
    assert!(analysis.fully_rejected());
    assert_eq!(analysis.rejected_fields, vec![TaskField::ColumnId, TaskField::Position]);
    assert!(analysis.merged_changes.is_empty());

    let reason = resolution_reason(&analysis);
    assert!(reason.contains("columnId, position"), "REASON_DRIFT: {}", reason);
    assert!(reason.contains("rejected"), "REASON_DRIFT: {}", reason);
}

#[test]
fn certify_partial_merge_degrades_to_lww_per_field() {
    // Título pisado por la v3; descripción intacta: fusión parcial.
    let analysis = analyze_against_current(
        &forge_current_row(),
        2,
        TaskChangeSet {
            title: Some("Loser title".into()),
            description: Some("Winner description".into()),
            column_id: None,
            position: None,
        },
    );

    assert!(analysis.has_conflict());
    assert!(!analysis.fully_rejected());
    assert_eq!(analysis.merged_fields, vec![TaskField::Description]);
    assert_eq!(analysis.rejected_fields, vec![TaskField::Title]);
    assert_eq!(analysis.merged_changes.title, None);
    assert_eq!(
        analysis.merged_changes.description.as_deref(),
        Some("Winner description")
    );

    let reason = resolution_reason(&analysis);
    assert!(reason.contains("description"), "REASON_DRIFT: {}", reason);
    assert!(reason.contains("title"), "REASON_DRIFT: {}", reason);
}

#[test]
fn certify_empty_changeset_yields_silent_verdict() {
    let analysis = analyze_against_current(&forge_current_row(), 1, TaskChangeSet::default());
    assert!(!analysis.has_conflict());
    assert!(!analysis.fully_rejected());
    assert!(analysis.merged_fields.is_empty());
}

proptest! {
    /// Partición exacta: fusionados y rechazados reconstruyen lo propuesto.
    #[test]
    fn property_verdict_partitions_proposed_fields(
        title_version in 1i64..=6,
        description_version in 1i64..=6,
        column_version in 1i64..=6,
        position_version in 1i64..=6,
        base_version in 0i64..=6,
        propose_title in any::<bool>(),
        propose_description in any::<bool>(),
        propose_column in any::<bool>(),
        propose_position in any::<bool>(),
    ) {
        let global_version = title_version
            .max(description_version)
            .max(column_version)
            .max(position_version);

        let current_row = Task {
            version: global_version,
            title_version,
            description_version,
            column_version,
            position_version,
            ..forge_current_row()
        };

        let proposed = TaskChangeSet {
            title: propose_title.then(|| "t".to_string()),
            description: propose_description.then(|| "d".to_string()),
            column_id: propose_column.then_some(BoardColumn::Todo),
            position: propose_position.then_some(7.0),
        };
        let proposed_fields = proposed.proposed_fields();

        let analysis = analyze_against_current(&current_row, base_version, proposed);

        let mut reunified = analysis.merged_fields.clone();
        reunified.extend(analysis.rejected_fields.iter().copied());
        reunified.sort_by_key(|field| field.as_str());

        let mut expected = proposed_fields.clone();
        expected.sort_by_key(|field| field.as_str());
        prop_assert_eq!(reunified, expected);

        for merged_field in &analysis.merged_fields {
            prop_assert!(current_row.field_version(*merged_field) <= base_version);
            prop_assert!(!analysis.rejected_fields.contains(merged_field));
        }
        for rejected_field in &analysis.rejected_fields {
            prop_assert!(current_row.field_version(*rejected_field) > base_version);
        }
    }
}
