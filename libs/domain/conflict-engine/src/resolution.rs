// [libs/domain/conflict-engine/src/resolution.rs]
/*!
 * =================================================================
 * APARATO: FIELD CONFLICT RESOLUTION KERNEL (V11.0 - LWW MASTER)
 * CLASIFICACIÓN: DOMAIN ENGINE (ESTRATO L2)
 * RESPONSABILIDAD: VEREDICTO PURO DE MUTACIONES CONCURRENTES POR CAMPO
 *
 * VISION HIPER-HOLÍSTICA 2026:
 * 1. PURE VERDICT: Función sin suspensión ni efectos; el estrato L3 la
 *    invoca bajo el candado transaccional de la fila objetivo.
 * 2. FIELD GRANULARITY: Conjuntos de campos disjuntos (mover vs editar)
 *    fusionan sin pérdida; los solapados degradan a LWW por campo.
 * 3. DETERMINISTIC REASONING: Tres plantillas cerradas de explicación
 *    nominando los campos afectados, estables para auditoría.
 *
 * # Mathematical Proof (Causal Currency):
 * Cada sello f_version registra la versión global que escribió el campo
 * por última vez. Un cliente que observó baseVersion puede sobreescribir
 * con seguridad exactamente los campos con f_version <= baseVersion; un
 * sello mayor prueba una escritura concurrente ya comprometida, y el
 * servidor conserva ese valor notificando al emisor perdedor.
 * =================================================================
 */

use syncboard_domain_models::{BoardColumn, Task, TaskField};

/**
 * Conjunto de cambios propuestos sobre los campos lógicos de una tarea.
 * Los campos ausentes no participan del análisis.
 */
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskChangeSet {
    pub title: Option<String>,
    pub description: Option<String>,
    pub column_id: Option<BoardColumn>,
    pub position: Option<f64>,
}

impl TaskChangeSet {
    /// Conjunto sin ningún campo propuesto.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.column_id.is_none()
            && self.position.is_none()
    }

    /// Campos propuestos, en el orden canónico de análisis.
    #[must_use]
    pub fn proposed_fields(&self) -> Vec<TaskField> {
        let mut proposed = Vec::with_capacity(4);
        if self.title.is_some() {
            proposed.push(TaskField::Title);
        }
        if self.description.is_some() {
            proposed.push(TaskField::Description);
        }
        if self.column_id.is_some() {
            proposed.push(TaskField::ColumnId);
        }
        if self.position.is_some() {
            proposed.push(TaskField::Position);
        }
        proposed
    }

    /// Descarta del conjunto el campo indicado.
    fn discard_field(&mut self, field: TaskField) {
        match field {
            TaskField::Title => self.title = None,
            TaskField::Description => self.description = None,
            TaskField::ColumnId => self.column_id = None,
            TaskField::Position => self.position = None,
        }
    }
}

/**
 * Veredicto del análisis: partición de los campos propuestos en
 * fusionados y rechazados, con los valores fusionados preservados.
 */
#[derive(Debug, Clone, PartialEq)]
pub struct ConflictAnalysis {
    /// Cambios que superaron el análisis causal y deben escribirse.
    pub merged_changes: TaskChangeSet,
    /// Campos fusionados, en orden canónico.
    pub merged_fields: Vec<TaskField>,
    /// Campos rechazados (valor del servidor preservado), en orden canónico.
    pub rejected_fields: Vec<TaskField>,
}

impl ConflictAnalysis {
    /// Al menos un campo propuesto fue rechazado.
    #[must_use]
    pub fn has_conflict(&self) -> bool {
        !self.rejected_fields.is_empty()
    }

    /// Todos los campos propuestos fueron rechazados: sin escritura.
    #[must_use]
    pub fn fully_rejected(&self) -> bool {
        self.merged_fields.is_empty() && !self.rejected_fields.is_empty()
    }
}

/**
 * Analiza una mutación entrante contra la fila vigente del Ledger.
 *
 * Para cada campo propuesto f: si current.f_version <= base_version el
 * campo se fusiona; en caso contrario un escritor concurrente ya lo tocó
 * y el campo se rechaza. La función es pura y nunca suspende.
 */
#[must_use]
pub fn analyze_against_current(
    current_row: &Task,
    base_version: i64,
    proposed_changes: TaskChangeSet,
) -> ConflictAnalysis {
    let mut merged_changes = proposed_changes.clone();
    let mut merged_fields = Vec::with_capacity(4);
    let mut rejected_fields = Vec::with_capacity(4);

    for proposed_field in proposed_changes.proposed_fields() {
        if current_row.field_version(proposed_field) <= base_version {
            merged_fields.push(proposed_field);
        } else {
            merged_changes.discard_field(proposed_field);
            rejected_fields.push(proposed_field);
        }
    }

    ConflictAnalysis {
        merged_changes,
        merged_fields,
        rejected_fields,
    }
}

/**
 * Explicación determinista del veredicto, seleccionada entre tres
 * plantillas cerradas que nominan los campos afectados.
 */
#[must_use]
pub fn resolution_reason(analysis: &ConflictAnalysis) -> String {
    let merged_labels = join_field_labels(&analysis.merged_fields);
    let rejected_labels = join_field_labels(&analysis.rejected_fields);

    if analysis.fully_rejected() {
        format!(
            "All proposed changes were rejected: [{}] superseded by a newer write",
            rejected_labels
        )
    } else if analysis.has_conflict() {
        format!(
            "Merged [{}]; kept server values for [{}] superseded by a newer write",
            merged_labels, rejected_labels
        )
    } else {
        format!("Applied [{}] with no conflicts", merged_labels)
    }
}

fn join_field_labels(fields: &[TaskField]) -> String {
    fields
        .iter()
        .map(|field| field.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
