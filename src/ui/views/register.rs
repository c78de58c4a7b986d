//! Formulario de registro de incidencias

use egui::{self, RichText};

use crate::models::Severity;
use crate::services::{AppContext, IncidentForm};
use crate::ui::{
    state::AppState,
    theme::{Colors, Icons},
};

pub struct RegisterView {
    form: IncidentForm,
    student_filter: String,
    /// Recalcular el Dashboard después de guardar
    refresh_dashboard: bool,
}

impl Default for RegisterView {
    fn default() -> Self {
        Self::new()
    }
}

impl RegisterView {
    pub fn new() -> Self {
        Self {
            form: IncidentForm::default(),
            student_filter: String::new(),
            refresh_dashboard: true,
        }
    }

    /// Quitar selecciones que ya no existen tras editar el catálogo
    pub fn sync_with(&mut self, app: &AppContext) {
        let cache = app.cache();
        self.form
            .participants
            .retain(|p| cache.students.iter().any(|s| &s.name == p));
        if !cache.locations.contains(&self.form.location) {
            self.form.location.clear();
        }
        if !cache.incident_types.contains(&self.form.incident_type) {
            self.form.incident_type.clear();
        }
    }

    pub fn show(&mut self, ui: &mut egui::Ui, state: &mut AppState, app: &AppContext) {
        ui.heading(format!("{} Registrar incidencia", Icons::REGISTER));
        ui.add_space(12.0);

        egui::ScrollArea::vertical().show(ui, |ui| {
            ui.columns(2, |columns| {
                self.show_fields(&mut columns[0], app);
                self.show_students(&mut columns[1], app);
            });

            ui.add_space(12.0);
            self.show_texts(ui);

            ui.add_space(16.0);
            ui.horizontal(|ui| {
                let save = ui.button(RichText::new(format!("{} Generar acta + Guardar", Icons::SAVE)).strong());
                if save.clicked() {
                    self.submit(state, app);
                }

                ui.checkbox(&mut self.refresh_dashboard, "Actualizar Dashboard al guardar");

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("Limpiar").clicked() {
                        self.form.reset();
                    }
                });
            });
        });
    }

    fn show_fields(&mut self, ui: &mut egui::Ui, app: &AppContext) {
        let cache = app.cache();

        egui::Grid::new("incident_fields")
            .num_columns(2)
            .spacing([12.0, 8.0])
            .show(ui, |ui| {
                ui.label("Fecha:");
                ui.add(egui::TextEdit::singleline(&mut self.form.date).hint_text("AAAA-MM-DD"));
                ui.end_row();

                ui.label("Hora:");
                ui.add(egui::TextEdit::singleline(&mut self.form.time).hint_text("HH:MM"));
                ui.end_row();

                ui.label("Lugar:");
                egui::ComboBox::from_id_salt("location_combo")
                    .selected_text(self.form.location.as_str())
                    .width(220.0)
                    .show_ui(ui, |ui| {
                        for location in &cache.locations {
                            ui.selectable_value(&mut self.form.location, location.clone(), location);
                        }
                    });
                ui.end_row();

                ui.label("Actividad:");
                ui.add(egui::TextEdit::singleline(&mut self.form.activity).hint_text("el recreo, la clase de..."));
                ui.end_row();

                ui.label("Tipo de incidencia:");
                egui::ComboBox::from_id_salt("type_combo")
                    .selected_text(self.form.incident_type.as_str())
                    .width(220.0)
                    .show_ui(ui, |ui| {
                        for incident_type in &cache.incident_types {
                            ui.selectable_value(&mut self.form.incident_type, incident_type.clone(), incident_type);
                        }
                    });
                ui.end_row();

                ui.label("Gravedad:");
                let selected = self.form.severity.map(|s| s.label()).unwrap_or("");
                egui::ComboBox::from_id_salt("severity_combo")
                    .selected_text(selected)
                    .width(220.0)
                    .show_ui(ui, |ui| {
                        for severity in Severity::ALL {
                            let text = RichText::new(severity.label()).color(Colors::severity(severity));
                            ui.selectable_value(&mut self.form.severity, Some(severity), text);
                        }
                    });
                ui.end_row();
            });
    }

    fn show_students(&mut self, ui: &mut egui::Ui, app: &AppContext) {
        let cache = app.cache();

        ui.horizontal(|ui| {
            ui.label(RichText::new("Alumnos involucrados").strong());
            ui.label(
                RichText::new(format!("({} seleccionados)", self.form.participants.len()))
                    .small()
                    .color(Colors::TEXT_SECONDARY),
            );
        });
        ui.add(egui::TextEdit::singleline(&mut self.student_filter).hint_text("Buscar..."));

        if cache.students.is_empty() {
            ui.label(
                RichText::new("No hay alumnos. Agréguelos en Administración.").color(Colors::TEXT_SECONDARY),
            );
            return;
        }

        let filter = self.student_filter.to_lowercase();
        egui::Frame::none()
            .fill(ui.visuals().extreme_bg_color)
            .rounding(8.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                egui::ScrollArea::vertical()
                    .id_salt("student_list")
                    .max_height(220.0)
                    .show(ui, |ui| {
                        for name in cache.student_names() {
                            if !filter.is_empty() && !name.to_lowercase().contains(&filter) {
                                continue;
                            }
                            let mut selected = self.form.is_selected(name);
                            if ui.checkbox(&mut selected, name).changed() {
                                self.form.toggle_participant(name);
                            }
                        }
                    });
            });
    }

    fn show_texts(&mut self, ui: &mut egui::Ui) {
        ui.label(RichText::new("Narración de los hechos").strong());
        ui.add(
            egui::TextEdit::multiline(&mut self.form.narrative)
                .desired_rows(5)
                .desired_width(f32::INFINITY),
        );

        ui.label(RichText::new("Medidas tomadas").strong());
        ui.add(
            egui::TextEdit::multiline(&mut self.form.measures)
                .desired_rows(2)
                .desired_width(f32::INFINITY),
        );

        ui.label(RichText::new("Seguimiento").strong());
        ui.add(
            egui::TextEdit::multiline(&mut self.form.follow_up)
                .desired_rows(2)
                .desired_width(f32::INFINITY),
        );
    }

    fn submit(&mut self, state: &mut AppState, app: &AppContext) {
        match app.register(&self.form, self.refresh_dashboard) {
            Ok(outcome) => {
                state.ledger_changed = true;
                if outcome.warnings.is_empty() {
                    state.show_success(&outcome.message());
                } else {
                    state.show_warning(&outcome.message());
                }
                self.form.reset();
            }
            Err(e) => {
                tracing::warn!("Registro rechazado: {}", e);
                state.show_failure(&e);
            }
        }
    }
}
