use egui::{self, RichText};

use crate::models::SchoolConfig;
use crate::services::{AppContext, BackupInfo, BackupService};
use crate::ui::{
    state::{AppState, ConfirmAction},
    theme::{Colors, Icons},
};
use crate::utils::path::display_path;

pub struct SettingsView {
    config: SchoolConfig,
    backups: Vec<BackupInfo>,
    needs_refresh: bool,
}

impl Default for SettingsView {
    fn default() -> Self {
        Self::new()
    }
}

impl SettingsView {
    pub fn new() -> Self {
        Self {
            config: SchoolConfig::default(),
            backups: Vec::new(),
            needs_refresh: true,
        }
    }

    pub fn mark_needs_refresh(&mut self) {
        self.needs_refresh = true;
    }

    fn refresh(&mut self, app: &AppContext) {
        self.config = app.cache().config.clone();
        self.backups = BackupService::new(app.data_dir()).list_backups().unwrap_or_else(|e| {
            tracing::warn!("No se pudieron listar los respaldos: {}", e);
            Vec::new()
        });
    }

    pub fn show(&mut self, ui: &mut egui::Ui, state: &mut AppState, app: &mut AppContext) {
        if self.needs_refresh {
            self.refresh(app);
            self.needs_refresh = false;
        }

        egui::ScrollArea::vertical().show(ui, |ui| {
            ui.heading(format!("{} Configuración", Icons::SETTINGS));
            ui.add_space(16.0);

            section(ui, "Apariencia", |ui| {
                ui.checkbox(&mut state.dark_mode, "Modo oscuro");
            });

            ui.add_space(16.0);

            section(ui, "Datos de la escuela", |ui| {
                self.show_school_form(ui, state, app);
            });

            ui.add_space(16.0);

            section(ui, "Respaldos", |ui| {
                self.show_backups(ui, state, app);
            });

            ui.add_space(16.0);

            section(ui, "Carpeta de datos", |ui| {
                ui.label(display_path(app.data_dir()));
                ui.label(
                    RichText::new(format!("Libro: {}", display_path(app.ledger().path())))
                        .small()
                        .color(Colors::TEXT_MUTED),
                );
            });
        });
    }

    fn show_school_form(&mut self, ui: &mut egui::Ui, state: &mut AppState, app: &mut AppContext) {
        egui::Grid::new("school_config")
            .num_columns(2)
            .spacing([12.0, 8.0])
            .show(ui, |ui| {
                let fields = [
                    ("Escuela:", &mut self.config.school_name),
                    ("Ubicación:", &mut self.config.location),
                    ("Director/a:", &mut self.config.director_name),
                    ("Maestro/a titular:", &mut self.config.teacher_name),
                    ("Grado:", &mut self.config.grade),
                    ("Grupo:", &mut self.config.group),
                ];
                for (label, value) in fields {
                    ui.label(label);
                    ui.add(egui::TextEdit::singleline(value).desired_width(320.0));
                    ui.end_row();
                }

                ui.label("Carpeta de actas:");
                ui.horizontal(|ui| {
                    ui.add(egui::TextEdit::singleline(&mut self.config.output_dir).desired_width(250.0));
                    if ui.button("Elegir...").clicked() {
                        if let Some(path) = rfd::FileDialog::new().pick_folder() {
                            self.config.output_dir = path.display().to_string();
                        }
                    }
                });
                ui.end_row();
            });

        ui.label(
            RichText::new(format!(
                "Las actas se guardan en {}",
                display_path(&self.config.output_directory(app.data_dir()))
            ))
            .small()
            .color(Colors::TEXT_MUTED),
        );

        ui.add_space(8.0);
        ui.horizontal(|ui| {
            if ui.button(format!("{} Guardar cambios", Icons::SAVE)).clicked() {
                let config = self.config.clone();
                match app.update_resources(|store| store.config().save(&config)) {
                    Ok(()) => {
                        state.resources_changed = true;
                        state.show_success("Configuración guardada");
                    }
                    Err(e) => state.show_error(&format!("No se pudo guardar: {}", e.user_message())),
                }
            }
            if ui.button("Descartar").clicked() {
                self.config = app.cache().config.clone();
            }
        });
    }

    fn show_backups(&mut self, ui: &mut egui::Ui, state: &mut AppState, app: &AppContext) {
        ui.label("Copia comprimida de la carpeta de datos: listas, libro de Excel y actas.");
        ui.add_space(8.0);

        if ui
            .button(RichText::new(format!("{} Crear respaldo", Icons::BACKUP)).strong())
            .clicked()
        {
            match BackupService::new(app.data_dir()).create_backup() {
                Ok(result) => {
                    state.show_success(&format!(
                        "Respaldo creado: {} archivos, {}",
                        result.file_count,
                        result.size_display()
                    ));
                    self.needs_refresh = true;
                }
                Err(e) => state.show_error(&format!("No se pudo crear el respaldo: {:#}", e)),
            }
        }

        ui.add_space(8.0);

        if self.backups.is_empty() {
            ui.label(RichText::new("No hay respaldos.").color(Colors::TEXT_SECONDARY));
            return;
        }

        for backup in &self.backups {
            ui.horizontal(|ui| {
                ui.label(Icons::FOLDER);
                ui.label(backup.date.as_deref().unwrap_or(&backup.filename));
                ui.label(RichText::new(backup.size_display()).small().color(Colors::TEXT_MUTED));
                if ui.small_button(Icons::DELETE).on_hover_text("Borrar respaldo").clicked() {
                    state.show_confirm(
                        &format!("¿Borrar el respaldo {}?", backup.filename),
                        ConfirmAction::DeleteBackup(backup.path.clone()),
                    );
                }
            });
        }
    }
}

fn section(ui: &mut egui::Ui, title: &str, add_contents: impl FnOnce(&mut egui::Ui)) {
    egui::Frame::none()
        .fill(ui.visuals().extreme_bg_color)
        .rounding(8.0)
        .inner_margin(16.0)
        .show(ui, |ui| {
            ui.set_min_width(ui.available_width());
            ui.label(RichText::new(title).strong());
            ui.add_space(8.0);
            add_contents(ui);
        });
}
