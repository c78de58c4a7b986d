use std::path::PathBuf;

use crate::utils::AppError;

/// Pestaña actual
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Register,
    Incidents,
    Dashboard,
    Admin,
    Settings,
}

impl View {
    pub const ALL: [View; 5] = [
        Self::Register,
        Self::Incidents,
        Self::Dashboard,
        Self::Admin,
        Self::Settings,
    ];
}

/// Estado de la interfaz compartido entre vistas
#[derive(Debug, Default)]
pub struct AppState {
    pub current_view: View,

    /// Diálogo de confirmación
    pub show_confirm_dialog: bool,
    pub confirm_dialog_message: String,
    pub confirm_dialog_action: Option<ConfirmAction>,

    pub status_message: Option<StatusMessage>,

    pub dark_mode: bool,

    /// El libro cambió; las vistas que lo muestran deben releerlo
    pub ledger_changed: bool,
    /// Las listas del almacén cambiaron
    pub resources_changed: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn navigate(&mut self, view: View) {
        self.current_view = view;
    }

    pub fn show_confirm(&mut self, message: &str, action: ConfirmAction) {
        self.confirm_dialog_message = message.to_string();
        self.confirm_dialog_action = Some(action);
        self.show_confirm_dialog = true;
    }

    pub fn close_confirm(&mut self) {
        self.show_confirm_dialog = false;
        self.confirm_dialog_action = None;
    }

    pub fn show_status(&mut self, message: &str, status_type: StatusType) {
        self.status_message = Some(StatusMessage {
            text: message.to_string(),
            status_type,
            created_at: std::time::Instant::now(),
        });
    }

    pub fn show_success(&mut self, message: &str) {
        self.show_status(message, StatusType::Success);
    }

    pub fn show_warning(&mut self, message: &str) {
        self.show_status(message, StatusType::Warning);
    }

    pub fn show_error(&mut self, message: &str) {
        self.show_status(message, StatusType::Error);
    }

    /// Datos incompletos se avisan como advertencia; lo demás es error
    pub fn show_failure(&mut self, error: &AppError) {
        match error {
            AppError::Validation(_) => self.show_warning(&error.user_message()),
            _ => self.show_error(&error.user_message()),
        }
    }

    /// Los mensajes duran 5 segundos; los errores 10
    pub fn clear_old_status(&mut self) {
        if let Some(ref status) = self.status_message {
            let limit = match status.status_type {
                StatusType::Error => 10,
                _ => 5,
            };
            if status.created_at.elapsed().as_secs() > limit {
                self.status_message = None;
            }
        }
    }
}

/// Acción pendiente de confirmación
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmAction {
    /// Posición y texto de la fila tal como se mostró
    DeleteIncident { position: usize, display: String },
    DeleteStudent(String),
    DeleteLocation(String),
    DeleteIncidentType(String),
    DeleteBackup(PathBuf),
}

#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub text: String,
    pub status_type: StatusType,
    pub created_at: std::time::Instant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusType {
    Success,
    Error,
    Warning,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confirm_lifecycle() {
        let mut state = AppState::new();
        state.show_confirm("¿Borrar?", ConfirmAction::DeleteStudent("Ana".into()));
        assert!(state.show_confirm_dialog);
        assert_eq!(state.confirm_dialog_action, Some(ConfirmAction::DeleteStudent("Ana".into())));

        state.close_confirm();
        assert!(!state.show_confirm_dialog);
        assert!(state.confirm_dialog_action.is_none());
    }

    #[test]
    fn test_validation_failures_are_warnings() {
        let mut state = AppState::new();
        state.show_failure(&AppError::validation("Debe seleccionar al menos un alumno."));
        let status = state.status_message.as_ref().unwrap();
        assert_eq!(status.status_type, StatusType::Warning);
        assert_eq!(status.text, "Debe seleccionar al menos un alumno.");

        state.show_failure(&AppError::other("disco lleno"));
        assert_eq!(state.status_message.as_ref().map(|s| s.status_type), Some(StatusType::Error));
    }

    #[test]
    fn test_fresh_status_is_kept() {
        let mut state = AppState::new();
        state.show_warning("Dashboard sin actualizar");
        state.clear_old_status();
        assert_eq!(state.status_message.as_ref().map(|s| s.status_type), Some(StatusType::Warning));
    }
}
