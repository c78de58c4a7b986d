use egui::{self, Color32, RichText};

use crate::ledger::{AbsenceRow, DashboardSummary, StudentTally};
use crate::models::Severity;
use crate::services::AppContext;
use crate::ui::{
    state::AppState,
    theme::{Colors, Icons},
};

pub struct DashboardView {
    summary: Option<DashboardSummary>,
    /// None si Registro de Faltas no se pudo interpretar
    absences: Option<Vec<AbsenceRow>>,
    error: Option<String>,
    needs_refresh: bool,
}

impl Default for DashboardView {
    fn default() -> Self {
        Self::new()
    }
}

impl DashboardView {
    pub fn new() -> Self {
        Self {
            summary: None,
            absences: Some(Vec::new()),
            error: None,
            needs_refresh: true,
        }
    }

    pub fn mark_needs_refresh(&mut self) {
        self.needs_refresh = true;
    }

    fn reload(&mut self, app: &AppContext) {
        let ledger = app.ledger();
        let loaded = ledger
            .dashboard()
            .and_then(|summary| Ok((summary, ledger.absence_rows()?)));

        match loaded {
            Ok((summary, absences)) => {
                self.summary = summary;
                self.absences = absences;
                self.error = None;
            }
            Err(e) => {
                tracing::error!("No se pudo leer el libro: {}", e);
                self.error = Some(e.user_message());
            }
        }
    }

    pub fn show(&mut self, ui: &mut egui::Ui, state: &mut AppState, app: &AppContext) {
        if self.needs_refresh {
            self.reload(app);
            self.needs_refresh = false;
        }

        ui.horizontal(|ui| {
            ui.heading(format!("{} Dashboard", Icons::DASHBOARD));

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button(format!("{} Actualizar Dashboard", Icons::REFRESH)).clicked() {
                    match app.refresh_dashboard() {
                        Ok(summary) => {
                            state.show_success(&format!(
                                "Dashboard actualizado: {} incidencias",
                                summary.totals.total()
                            ));
                            self.needs_refresh = true;
                        }
                        Err(e) => state.show_error(&format!("No se pudo actualizar: {}", e.user_message())),
                    }
                }
            });
        });

        ui.add_space(16.0);

        if let Some(ref error) = self.error {
            ui.label(RichText::new(error).color(Colors::ERROR));
            return;
        }

        egui::ScrollArea::vertical().show(ui, |ui| {
            match &self.summary {
                Some(summary) => {
                    ui.label(
                        RichText::new(format!("Actualizado: {}", summary.updated_at))
                            .small()
                            .color(Colors::TEXT_SECONDARY),
                    );
                    ui.add_space(8.0);
                    ui.horizontal(|ui| {
                        for severity in Severity::ALL {
                            stat_card(
                                ui,
                                severity.label(),
                                summary.totals.get(severity),
                                Colors::severity(severity),
                            );
                            ui.add_space(8.0);
                        }
                        stat_card(ui, "Total", summary.totals.total(), Colors::PRIMARY);
                    });

                    ui.add_space(24.0);
                    ui.heading("Incidencias por Alumno");
                    ui.add_space(8.0);
                    show_student_tallies(ui, &summary.by_student);
                }
                None => {
                    ui.label(
                        RichText::new("El Dashboard aún no se ha calculado. Pulse \"Actualizar Dashboard\".")
                            .color(Colors::TEXT_SECONDARY),
                    );
                }
            }

            ui.add_space(24.0);
            ui.heading("Registro de Faltas");
            ui.add_space(8.0);
            self.show_absences(ui);
        });
    }

    fn show_absences(&self, ui: &mut egui::Ui) {
        let Some(rows) = &self.absences else {
            ui.label(
                RichText::new("La hoja Registro de Faltas tiene contadores no numéricos; revísela en Excel.")
                    .color(Colors::WARNING),
            );
            return;
        };

        if rows.is_empty() {
            ui.label(RichText::new("Sin faltas registradas.").color(Colors::TEXT_SECONDARY));
            return;
        }

        egui::Grid::new("absence_grid")
            .striped(true)
            .num_columns(5)
            .spacing([24.0, 4.0])
            .show(ui, |ui| {
                for header in ["Alumno", "Total", "Leve", "Moderada", "Grave"] {
                    ui.label(RichText::new(header).strong());
                }
                ui.end_row();

                for row in rows {
                    ui.label(&row.student);
                    ui.label(row.total.to_string());
                    for severity in Severity::ALL {
                        ui.label(row.counts.get(severity).to_string());
                    }
                    ui.end_row();
                }
            });
    }
}

fn show_student_tallies(ui: &mut egui::Ui, tallies: &[StudentTally]) {
    if tallies.is_empty() {
        ui.label(RichText::new("Sin incidencias.").color(Colors::TEXT_SECONDARY));
        return;
    }

    egui::Grid::new("student_tally_grid")
        .striped(true)
        .num_columns(5)
        .spacing([24.0, 4.0])
        .show(ui, |ui| {
            for header in ["Alumno", "Leves", "Moderadas", "Graves", "Total"] {
                ui.label(RichText::new(header).strong());
            }
            ui.end_row();

            for tally in tallies {
                ui.label(&tally.student);
                for severity in Severity::ALL {
                    ui.label(
                        RichText::new(tally.counts.get(severity).to_string()).color(Colors::severity(severity)),
                    );
                }
                ui.label(RichText::new(tally.counts.total().to_string()).strong());
                ui.end_row();
            }
        });
}

fn stat_card(ui: &mut egui::Ui, label: &str, value: u32, color: Color32) {
    egui::Frame::none()
        .fill(ui.visuals().extreme_bg_color)
        .rounding(8.0)
        .inner_margin(16.0)
        .show(ui, |ui| {
            ui.set_min_width(120.0);
            ui.vertical(|ui| {
                ui.label(RichText::new(label).color(Colors::TEXT_SECONDARY));
                ui.add_space(8.0);
                ui.label(RichText::new(value.to_string()).size(28.0).strong().color(color));
            });
        });
}
