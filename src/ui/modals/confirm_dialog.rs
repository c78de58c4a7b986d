use egui::{self, RichText};

use crate::services::{AppContext, BackupService};
use crate::ui::{
    state::{AppState, ConfirmAction},
    theme::{Colors, Icons},
};

pub struct ConfirmDialog;

impl ConfirmDialog {
    /// Muestra el diálogo; devuelve Some(true) si se confirmó y ejecutó
    pub fn show(ctx: &egui::Context, state: &mut AppState, app: &mut AppContext) -> Option<bool> {
        if !state.show_confirm_dialog {
            return None;
        }

        let mut result = None;

        egui::Window::new("Confirmar")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.set_min_width(320.0);

                ui.vertical_centered(|ui| {
                    ui.label(RichText::new(Icons::DELETE).size(32.0).color(Colors::WARNING));
                    ui.add_space(8.0);
                    ui.label(&state.confirm_dialog_message);
                });

                ui.add_space(16.0);

                ui.horizontal(|ui| {
                    if ui.button("Cancelar").clicked() {
                        state.close_confirm();
                        result = Some(false);
                    }

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button(RichText::new("Borrar").color(Colors::ERROR)).clicked() {
                            if let Some(action) = state.confirm_dialog_action.clone() {
                                Self::execute_action(&action, state, app);
                            }
                            state.close_confirm();
                            result = Some(true);
                        }
                    });
                });
            });

        result
    }

    fn execute_action(action: &ConfirmAction, state: &mut AppState, app: &mut AppContext) {
        match action {
            ConfirmAction::DeleteIncident { position, display } => match app.delete_incident(*position, display) {
                Ok(outcome) => {
                    state.ledger_changed = true;
                    let message = format!("Incidencia borrada: {}", outcome.removed.display());
                    if outcome.warnings.is_empty() {
                        state.show_success(&message);
                    } else {
                        state.show_warning(&format!("{}. {}", message, outcome.warnings.join(". ")));
                    }
                }
                Err(e) => state.show_error(&format!("No se pudo borrar: {}", e.user_message())),
            },
            ConfirmAction::DeleteStudent(name) => {
                Self::report(state, app.update_resources(|store| store.students().delete(name)), "Alumno borrado");
            }
            ConfirmAction::DeleteLocation(entry) => {
                Self::report(state, app.update_resources(|store| store.locations().remove(entry)), "Ubicación borrada");
            }
            ConfirmAction::DeleteIncidentType(entry) => {
                Self::report(
                    state,
                    app.update_resources(|store| store.incident_types().remove(entry)),
                    "Tipo de incidencia borrado",
                );
            }
            ConfirmAction::DeleteBackup(path) => match BackupService::new(app.data_dir()).delete_backup(path) {
                Ok(()) => state.show_success("Respaldo borrado"),
                Err(e) => state.show_error(&format!("No se pudo borrar: {}", e)),
            },
        }
    }

    fn report(state: &mut AppState, result: crate::utils::AppResult<()>, success: &str) {
        match result {
            Ok(()) => {
                state.resources_changed = true;
                state.show_success(success);
            }
            Err(e) => state.show_error(&format!("No se pudo borrar: {}", e.user_message())),
        }
    }
}
