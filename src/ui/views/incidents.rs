//! Lista de incidencias registradas con opción de borrar

use egui::{self, RichText};

use crate::models::IncidentRow;
use crate::services::AppContext;
use crate::ui::{
    state::{AppState, ConfirmAction},
    theme::{Colors, Icons},
};

pub struct IncidentsView {
    /// Copia de las filas al momento de leer el libro; las posiciones valen para esta copia
    rows: Vec<IncidentRow>,
    selected: Option<usize>,
    error: Option<String>,
    needs_refresh: bool,
}

impl Default for IncidentsView {
    fn default() -> Self {
        Self::new()
    }
}

impl IncidentsView {
    pub fn new() -> Self {
        Self {
            rows: Vec::new(),
            selected: None,
            error: None,
            needs_refresh: true,
        }
    }

    pub fn mark_needs_refresh(&mut self) {
        self.needs_refresh = true;
    }

    fn refresh(&mut self, app: &AppContext) {
        match app.ledger().incidents() {
            Ok(rows) => {
                self.rows = rows;
                self.error = None;
            }
            Err(e) => {
                tracing::error!("No se pudo leer el libro: {}", e);
                self.rows.clear();
                self.error = Some(e.user_message());
            }
        }
        self.selected = None;
    }

    pub fn show(&mut self, ui: &mut egui::Ui, state: &mut AppState, app: &AppContext) {
        if self.needs_refresh {
            self.refresh(app);
            self.needs_refresh = false;
        }

        ui.horizontal(|ui| {
            ui.heading(format!("{} Incidencias", Icons::LIST));
            ui.label(RichText::new(format!("({})", self.rows.len())).color(Colors::TEXT_SECONDARY));

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button(format!("{} Recargar", Icons::REFRESH)).clicked() {
                    self.needs_refresh = true;
                }
            });
        });

        ui.label(
            RichText::new(format!("Libro: {}", app.ledger().path().display()))
                .small()
                .color(Colors::TEXT_MUTED),
        );
        ui.add_space(8.0);

        if let Some(ref error) = self.error {
            ui.label(RichText::new(error).color(Colors::ERROR));
            return;
        }

        if self.rows.is_empty() {
            ui.label(RichText::new("No hay incidencias registradas.").color(Colors::TEXT_SECONDARY));
            return;
        }

        let list_height = (ui.available_height() - 60.0).max(120.0);
        egui::ScrollArea::vertical()
            .max_height(list_height)
            .show(ui, |ui| {
                for (position, row) in self.rows.iter().enumerate() {
                    let color = row
                        .severity_level()
                        .map(Colors::severity)
                        .unwrap_or(Colors::TEXT_SECONDARY);

                    ui.horizontal(|ui| {
                        ui.label(RichText::new("●").color(color));
                        let selected = self.selected == Some(position);
                        if ui.selectable_label(selected, row.display()).clicked() {
                            self.selected = if selected { None } else { Some(position) };
                        }
                    });
                }
            });

        ui.add_space(8.0);
        ui.horizontal(|ui| {
            let selected_row = self.selected.and_then(|i| self.rows.get(i).map(|row| (i, row)));
            let delete = ui.add_enabled(
                selected_row.is_some(),
                egui::Button::new(RichText::new(format!("{} Borrar seleccionada", Icons::DELETE)).color(Colors::ERROR)),
            );

            if delete.clicked() {
                if let Some((position, row)) = selected_row {
                    let display = row.display();
                    state.show_confirm(
                        &format!("¿Borrar la incidencia?\n{}", display),
                        ConfirmAction::DeleteIncident { position, display },
                    );
                }
            }

            if let Some((_, row)) = selected_row {
                if !row.link.is_empty() {
                    ui.label(
                        RichText::new(format!("{} {}", Icons::DOCUMENT, row.link))
                            .small()
                            .color(Colors::TEXT_SECONDARY),
                    );
                }
            }
        });
    }
}
