//! Registro de incidencias: formulario, validación y orquestación
//!
//! Flujo de "Generar acta + Guardar": validar el formulario, generar el acta y,
//! sólo si se generó, agregar la fila al libro. El Dashboard se recalcula al
//! final si se pidió; si falla queda como advertencia.

use std::path::{Path, PathBuf};

use crate::composer::DocumentComposer;
use crate::ledger::layout::link_text;
use crate::ledger::{DashboardSummary, Ledger};
use crate::models::{Incident, IncidentRow, SchoolConfig, Severity, Student};
use crate::store::ResourceStore;
use crate::utils::date::{now_time_string, today_string};
use crate::utils::path::display_path;
use crate::utils::{AppError, AppResult};

pub const MISSING_PARTICIPANTS: &str = "Debe seleccionar al menos un alumno.";
pub const MISSING_DROPDOWNS: &str = "Complete todos los menús desplegables.";

/// Campos del formulario de registro
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncidentForm {
    pub date: String,
    pub time: String,
    pub location: String,
    pub activity: String,
    pub incident_type: String,
    pub severity: Option<Severity>,
    pub participants: Vec<String>,
    pub narrative: String,
    pub measures: String,
    pub follow_up: String,
}

impl Default for IncidentForm {
    fn default() -> Self {
        Self {
            date: today_string(),
            time: now_time_string(),
            location: String::new(),
            activity: String::new(),
            incident_type: String::new(),
            severity: None,
            participants: Vec::new(),
            narrative: String::new(),
            measures: String::new(),
            follow_up: String::new(),
        }
    }
}

impl IncidentForm {
    pub fn is_selected(&self, student: &str) -> bool {
        self.participants.iter().any(|p| p == student)
    }

    /// Marcar o desmarcar un alumno, conservando el orden de selección
    pub fn toggle_participant(&mut self, student: &str) {
        if let Some(index) = self.participants.iter().position(|p| p == student) {
            self.participants.remove(index);
        } else {
            self.participants.push(student.to_string());
        }
    }

    /// Participantes primero, luego los menús desplegables
    pub fn validate(&self) -> AppResult<Incident> {
        if self.participants.is_empty() {
            return Err(AppError::validation(MISSING_PARTICIPANTS));
        }

        let severity = match self.severity {
            Some(severity) if !self.location.trim().is_empty() && !self.incident_type.trim().is_empty() => severity,
            _ => return Err(AppError::validation(MISSING_DROPDOWNS)),
        };

        Ok(Incident {
            date: self.date.trim().to_string(),
            time: self.time.trim().to_string(),
            location: self.location.trim().to_string(),
            activity: self.activity.trim().to_string(),
            incident_type: self.incident_type.trim().to_string(),
            severity,
            participants: self.participants.clone(),
            narrative: self.narrative.trim().to_string(),
            measures: self.measures.trim().to_string(),
            follow_up: self.follow_up.trim().to_string(),
        })
    }

    /// Limpiar después de guardar; fecha y hora vuelven a "ahora"
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Listas en memoria que usa el formulario; se recargan completas tras cada cambio
#[derive(Debug, Clone, Default)]
pub struct ResourceCache {
    pub students: Vec<Student>,
    pub locations: Vec<String>,
    pub incident_types: Vec<String>,
    pub config: SchoolConfig,
}

impl ResourceCache {
    pub fn load(store: &ResourceStore) -> Self {
        Self {
            students: store.students().find_all(),
            locations: store.locations().find_all(),
            incident_types: store.incident_types().find_all(),
            config: store.config().get(),
        }
    }

    pub fn student_names(&self) -> impl Iterator<Item = &str> {
        self.students.iter().map(|s| s.name.as_str())
    }
}

/// Resultado de registrar una incidencia
#[derive(Debug, Clone)]
pub struct RegistrationOutcome {
    pub document: PathBuf,
    pub position: usize,
    pub counters_updated: bool,
    pub dashboard_refreshed: bool,
    pub warnings: Vec<String>,
}

impl RegistrationOutcome {
    pub fn message(&self) -> String {
        let mut message = format!("Incidencia registrada: {}", display_path(&self.document));
        for warning in &self.warnings {
            message.push_str(". ");
            message.push_str(warning);
        }
        message
    }
}

/// Resultado de borrar una incidencia
#[derive(Debug, Clone)]
pub struct DeletionOutcome {
    pub removed: IncidentRow,
    pub dashboard_refreshed: bool,
    pub warnings: Vec<String>,
}

/// Estado de la aplicación que reciben las vistas
pub struct AppContext {
    store: ResourceStore,
    ledger: Ledger,
    composer: DocumentComposer,
    cache: ResourceCache,
}

impl AppContext {
    /// Abrir la carpeta de datos y crear el libro si falta
    pub fn open(data_dir: &Path) -> AppResult<Self> {
        let store = ResourceStore::open(data_dir)?;
        let ledger = Ledger::in_data_dir(data_dir);
        ledger.initialize()?;

        let cache = ResourceCache::load(&store);
        let composer = DocumentComposer::new(cache.config.output_directory(store.data_dir()));

        Ok(Self {
            store,
            ledger,
            composer,
            cache,
        })
    }

    pub fn store(&self) -> &ResourceStore {
        &self.store
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn composer(&self) -> &DocumentComposer {
        &self.composer
    }

    pub fn cache(&self) -> &ResourceCache {
        &self.cache
    }

    pub fn data_dir(&self) -> &Path {
        self.store.data_dir()
    }

    /// Releer todas las listas y la configuración
    pub fn reload(&mut self) {
        self.cache = ResourceCache::load(&self.store);
        self.composer = DocumentComposer::new(self.cache.config.output_directory(self.store.data_dir()));
        tracing::debug!(
            "Recursos recargados: {} alumnos, {} ubicaciones, {} tipos",
            self.cache.students.len(),
            self.cache.locations.len(),
            self.cache.incident_types.len()
        );
    }

    /// Cambio administrativo seguido de recarga
    pub fn update_resources<F>(&mut self, change: F) -> AppResult<()>
    where
        F: FnOnce(&ResourceStore) -> AppResult<()>,
    {
        let result = change(&self.store);
        self.reload();
        result
    }

    /// Generar el acta, agregarla al libro y opcionalmente recalcular el Dashboard
    pub fn register(&self, form: &IncidentForm, refresh_dashboard: bool) -> AppResult<RegistrationOutcome> {
        let incident = form.validate()?;

        let document = self
            .composer
            .compose(&incident, &self.cache.config, &self.cache.students)?;

        let link = link_text(&document);
        let appended = self.ledger.append_incident(incident.to_ledger_row(link)).map_err(|e| {
            tracing::error!("El acta {:?} quedó sin registro en el libro: {}", document, e);
            e
        })?;

        let mut warnings = Vec::new();
        if !appended.counters_updated {
            warnings.push("No se actualizó el Registro de Faltas".to_string());
        }

        let dashboard_refreshed = refresh_dashboard && self.refresh_after_change(&mut warnings);

        Ok(RegistrationOutcome {
            document,
            position: appended.position,
            counters_updated: appended.counters_updated,
            dashboard_refreshed,
            warnings,
        })
    }

    /// Borrar por posición si la fila aún coincide con la que vio el usuario
    pub fn delete_incident(&self, position: usize, expected_display: &str) -> AppResult<DeletionOutcome> {
        let removed = self.ledger.delete_incident_checked(position, expected_display)?;

        let mut warnings = Vec::new();
        let dashboard_refreshed = self.refresh_after_change(&mut warnings);

        Ok(DeletionOutcome {
            removed,
            dashboard_refreshed,
            warnings,
        })
    }

    pub fn refresh_dashboard(&self) -> AppResult<DashboardSummary> {
        self.ledger.refresh_dashboard()
    }

    fn refresh_after_change(&self, warnings: &mut Vec<String>) -> bool {
        match self.ledger.refresh_dashboard() {
            Ok(_) => true,
            Err(e) => {
                tracing::warn!("No se pudo actualizar el Dashboard: {}", e);
                warnings.push(format!("Dashboard sin actualizar: {}", e.user_message()));
                false
            }
        }
    }
}
