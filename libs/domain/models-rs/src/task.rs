// [libs/domain/models-rs/src/task.rs]
/*!
 * =================================================================
 * APARATO: TASK DOMAIN MODELS (V9.0 - FIELD VERSION MASTER)
 * CLASIFICACIÓN: DOMAIN MODELS (ESTRATO L2)
 * RESPONSABILIDAD: DEFINICIÓN DEL CONTRATO SOBERANO DE TAREAS
 *
 * VISION HIPER-HOLÍSTICA 2026:
 * 1. FIELD VERSION STAMPS: Cada campo lógico transporta el sello de la
 *    versión global que lo escribió por última vez, habilitando la
 *    resolución de conflictos con granularidad de campo.
 * 2. TYPESHARE SYNERGY: Mapeo determinista de tipos numéricos para el
 *    Frontend, garantizando paridad en la Tríada.
 * 3. NOMINAL PRECISION: Nomenclatura nominal absoluta en todos los campos.
 *
 * # Mathematical Proof (Version Lattice):
 * Para toda fila persistida se cumple f_version <= version en cada campo f.
 * Toda escritura exitosa de un subconjunto F de campos incrementa 'version'
 * exactamente en uno y nivela f_version = version para cada f en F, dejando
 * intactos los sellos de los campos no tocados.
 * =================================================================
 */

use serde::{Deserialize, Serialize};
use typeshare::typeshare;

/// Longitud máxima permitida para el título de una tarea.
pub const TITLE_MAX_CHARS: usize = 200;

/// Longitud máxima permitida para la descripción de una tarea.
pub const DESCRIPTION_MAX_CHARS: usize = 2000;

/// Título asignado cuando el cliente emite uno vacío o en blanco.
pub const DEFAULT_TASK_TITLE: &str = "New Task";

/// Clasificación de columnas del tablero colaborativo.
#[typeshare]
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum BoardColumn {
    /// Tareas pendientes de ignición.
    Todo,
    /// Tareas en ejecución activa.
    InProgress,
    /// Tareas selladas y certificadas.
    Done,
}

impl BoardColumn {
    /// Etiqueta persistida en la columna 'column_id' del Ledger.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            BoardColumn::Todo => "todo",
            BoardColumn::InProgress => "inprogress",
            BoardColumn::Done => "done",
        }
    }

    /// Reconstruye la columna desde su etiqueta persistida.
    #[must_use]
    pub fn parse(label: &str) -> Option<Self> {
        match label {
            "todo" => Some(BoardColumn::Todo),
            "inprogress" => Some(BoardColumn::InProgress),
            "done" => Some(BoardColumn::Done),
            _ => None,
        }
    }
}

/// Campos lógicos de una tarea sujetos a resolución de conflictos.
/// El discriminador serializado coincide con las llaves del payload duplex.
#[typeshare]
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum TaskField {
    Title,
    Description,
    ColumnId,
    Position,
}

impl TaskField {
    /// Etiqueta de wire del campo ("columnId", "position", ...).
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskField::Title => "title",
            TaskField::Description => "description",
            TaskField::ColumnId => "columnId",
            TaskField::Position => "position",
        }
    }
}

/**
 * Entidad soberana de tarea persistida en el Ledger Táctico.
 *
 * Los sellos '*_version' registran la versión global que escribió cada
 * campo por última vez; el resolutor de conflictos los compara contra el
 * 'baseVersion' observado por el cliente emisor.
 */
#[typeshare]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Identificador opaco (UUID v4) asignado por el servidor al crear.
    pub id: String,
    /// Título acotado (<= 200 caracteres).
    pub title: String,
    /// Descripción acotada (<= 2000 caracteres).
    pub description: String,
    /// Columna actual del tablero.
    pub column_id: BoardColumn,
    /// Índice fraccional estrictamente positivo dentro de la columna.
    pub position: f64,
    /// Contador global de escrituras de la fila (monótono creciente).
    #[typeshare(serialized_as = "number")]
    pub version: i64,
    #[typeshare(serialized_as = "number")]
    pub title_version: i64,
    #[typeshare(serialized_as = "number")]
    pub description_version: i64,
    #[typeshare(serialized_as = "number")]
    pub column_version: i64,
    #[typeshare(serialized_as = "number")]
    pub position_version: i64,
    /// Marca temporal RFC 3339 de creación (UTC).
    pub created_at: String,
    /// Marca temporal RFC 3339 de última escritura (UTC).
    pub updated_at: String,
}

impl Task {
    /// Sello de versión del campo lógico solicitado.
    #[must_use]
    pub fn field_version(&self, field: TaskField) -> i64 {
        match field {
            TaskField::Title => self.title_version,
            TaskField::Description => self.description_version,
            TaskField::ColumnId => self.column_version,
            TaskField::Position => self.position_version,
        }
    }
}

/**
 * Normaliza el título entrante: recorta al límite y sustituye el vacío
 * por el título por defecto del tablero.
 */
#[must_use]
pub fn sanitize_title(raw_title: &str) -> String {
    let trimmed_title = raw_title.trim();
    if trimmed_title.is_empty() {
        return DEFAULT_TASK_TITLE.to_string();
    }
    trimmed_title.chars().take(TITLE_MAX_CHARS).collect()
}

/**
 * Normaliza la descripción entrante recortándola a su cota máxima.
 */
#[must_use]
pub fn sanitize_description(raw_description: &str) -> String {
    raw_description.chars().take(DESCRIPTION_MAX_CHARS).collect()
}
