//! Libro de incidencias (bitacoras.xlsx)
//!
//! Cada operación abre el libro, lo modifica completo y lo guarda. Las
//! incidencias se identifican sólo por su posición (0 = primera fila de datos).

pub mod absence;
pub mod book;
pub mod dashboard;
pub mod layout;
pub mod preserved;

use std::path::{Path, PathBuf};

pub use absence::{AbsenceRow, AbsenceSheet, AbsenceSummary};
pub use book::LedgerBook;
pub use dashboard::{severity_totals, student_totals, DashboardSummary, StudentTally};

use crate::models::IncidentRow;
use crate::utils::date::display_timestamp;
use crate::utils::{AppError, AppResult};

/// Nombre del libro dentro del directorio de datos
pub const LEDGER_FILE_NAME: &str = "bitacoras.xlsx";

/// Resultado de agregar una incidencia
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppendOutcome {
    pub position: usize,
    /// false si Registro de Faltas no se pudo actualizar
    pub counters_updated: bool,
}

pub struct Ledger {
    path: PathBuf,
}

impl Ledger {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Libro estándar dentro del directorio de datos
    pub fn in_data_dir(data_dir: &Path) -> Self {
        Self::new(data_dir.join(LEDGER_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Crear el libro con encabezados si no existe. Devuelve true si se creó.
    pub fn initialize(&self) -> AppResult<bool> {
        if self.path.exists() {
            return Ok(false);
        }
        LedgerBook::default().save(&self.path)?;
        tracing::info!("Libro creado: {:?}", self.path);
        Ok(true)
    }

    fn open(&self) -> AppResult<LedgerBook> {
        self.initialize()?;
        LedgerBook::load(&self.path)
    }

    /// Agregar una fila a Incidencias y sumar las faltas de los participantes
    pub fn append_incident(&self, row: IncidentRow) -> AppResult<AppendOutcome> {
        let mut book = self.open()?;

        let counters_updated = match row.severity_level() {
            Some(severity) => match book.absences.record(&row.participants, severity) {
                Ok(()) => true,
                Err(e) => {
                    tracing::warn!("No se actualizaron las faltas: {}", e);
                    false
                }
            },
            None => {
                tracing::warn!("Gravedad desconocida '{}', faltas sin actualizar", row.severity);
                false
            }
        };

        book.incidents.push(row);
        let position = book.incidents.len() - 1;
        book.save(&self.path)?;

        tracing::info!("Incidencia agregada en la posición {}", position);
        Ok(AppendOutcome {
            position,
            counters_updated,
        })
    }

    /// Borrar la incidencia en `position`; las siguientes se recorren una posición
    pub fn delete_incident(&self, position: usize) -> AppResult<IncidentRow> {
        let mut book = self.open()?;
        let removed = book
            .remove_incident(position)
            .ok_or_else(|| AppError::not_found(format!("Incidencia en la posición {}", position)))?;
        book.save(&self.path)?;

        tracing::info!("Incidencia borrada: {}", removed.display());
        Ok(removed)
    }

    /// Igual que `delete_incident`, pero sólo si la fila sigue mostrando lo esperado
    pub fn delete_incident_checked(&self, position: usize, expected: &str) -> AppResult<IncidentRow> {
        let mut book = self.open()?;
        let current = book
            .incidents
            .get(position)
            .ok_or_else(|| AppError::not_found(format!("Incidencia en la posición {}", position)))?;

        if current.display() != expected {
            return Err(AppError::validation(
                "La lista de incidencias cambió. Actualice la lista e intente de nuevo.",
            ));
        }

        let removed = book
            .remove_incident(position)
            .ok_or_else(|| AppError::not_found(format!("Incidencia en la posición {}", position)))?;
        book.save(&self.path)?;

        tracing::info!("Incidencia borrada: {}", removed.display());
        Ok(removed)
    }

    /// Una línea por incidencia, en orden de la hoja
    pub fn list_incidents(&self) -> AppResult<Vec<String>> {
        Ok(self.incidents()?.iter().map(IncidentRow::display).collect())
    }

    pub fn incidents(&self) -> AppResult<Vec<IncidentRow>> {
        Ok(self.open()?.incidents)
    }

    /// None si la hoja tiene contadores ilegibles
    pub fn absence_rows(&self) -> AppResult<Option<Vec<AbsenceRow>>> {
        Ok(self.open()?.absences.rows().map(<[AbsenceRow]>::to_vec))
    }

    /// Último resumen guardado en la hoja Dashboard
    pub fn dashboard(&self) -> AppResult<Option<DashboardSummary>> {
        Ok(self.open()?.dashboard)
    }

    /// Recalcular totales y gráfico del Dashboard
    pub fn refresh_dashboard(&self) -> AppResult<DashboardSummary> {
        let mut book = self.open()?;
        let summary = DashboardSummary::compute(&book.incidents, display_timestamp());
        book.dashboard = Some(summary.clone());
        book.save(&self.path)?;

        tracing::info!(
            "Dashboard actualizado: {} incidencias únicas",
            summary.totals.total()
        );
        Ok(summary)
    }
}
