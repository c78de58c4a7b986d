//! Aplicación principal

use eframe::egui;

use crate::models::config::AppSettings;
use crate::services::AppContext;
use crate::ui::{
    modals::ConfirmDialog,
    state::{AppState, StatusType},
    theme::{configure_style, Colors, Icons},
    views::{AdminView, DashboardView, IncidentsView, RegisterView, SettingsView},
    View,
};

pub struct BitacoraApp {
    app: AppContext,
    state: AppState,
    app_settings: AppSettings,

    register: RegisterView,
    incidents: IncidentsView,
    dashboard: DashboardView,
    admin: AdminView,
    settings: SettingsView,

    applied_dark_mode: Option<bool>,
}

impl BitacoraApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, app: AppContext, app_settings: AppSettings) -> Self {
        let mut state = AppState::new();
        state.dark_mode = app_settings.dark_mode;

        Self {
            app,
            state,
            app_settings,
            register: RegisterView::new(),
            incidents: IncidentsView::new(),
            dashboard: DashboardView::new(),
            admin: AdminView::new(),
            settings: SettingsView::new(),
            applied_dark_mode: None,
        }
    }

    /// Marcar para recarga lo que muestra la vista nueva
    fn handle_view_change(&mut self, new_view: View) {
        match new_view {
            View::Register => self.register.sync_with(&self.app),
            View::Incidents => self.incidents.mark_needs_refresh(),
            View::Dashboard => self.dashboard.mark_needs_refresh(),
            View::Admin => {}
            View::Settings => self.settings.mark_needs_refresh(),
        }
    }

    fn navigate_to(&mut self, view: View) {
        let old = self.state.current_view;
        self.state.navigate(view);
        if old != view {
            self.handle_view_change(view);
        }
    }

    /// Propagar cambios hechos por vistas o diálogos
    fn apply_pending_changes(&mut self) {
        if std::mem::take(&mut self.state.ledger_changed) {
            self.incidents.mark_needs_refresh();
            self.dashboard.mark_needs_refresh();
        }
        if std::mem::take(&mut self.state.resources_changed) {
            self.register.sync_with(&self.app);
            self.settings.mark_needs_refresh();
        }
    }

    fn apply_theme(&mut self, ctx: &egui::Context) {
        if self.applied_dark_mode == Some(self.state.dark_mode) {
            return;
        }
        configure_style(ctx, self.state.dark_mode);

        // La primera aplicación sólo refleja lo ya guardado
        if self.applied_dark_mode.is_some() {
            self.app_settings.dark_mode = self.state.dark_mode;
            if let Err(e) = self.app_settings.save() {
                tracing::warn!("No se pudieron guardar las preferencias: {}", e);
            }
        }
        self.applied_dark_mode = Some(self.state.dark_mode);
    }
}

fn view_label(view: View) -> String {
    match view {
        View::Register => format!("{} Registrar", Icons::REGISTER),
        View::Incidents => format!("{} Incidencias", Icons::LIST),
        View::Dashboard => format!("{} Dashboard", Icons::DASHBOARD),
        View::Admin => format!("{} Administración", Icons::ADMIN),
        View::Settings => format!("{} Configuración", Icons::SETTINGS),
    }
}

impl eframe::App for BitacoraApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.apply_theme(ctx);
        self.state.clear_old_status();

        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("Bitácora");
                ui.separator();

                for view in View::ALL {
                    if ui
                        .selectable_label(self.state.current_view == view, view_label(view))
                        .clicked()
                    {
                        self.navigate_to(view);
                    }
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let mode_icon = if self.state.dark_mode { "🌙" } else { "☀" };
                    if ui.button(mode_icon).on_hover_text("Modo oscuro").clicked() {
                        self.state.dark_mode = !self.state.dark_mode;
                    }

                    ui.separator();
                    ui.label(
                        egui::RichText::new(format!(
                            "{} · v{}",
                            self.app.cache().config.school_name,
                            env!("CARGO_PKG_VERSION")
                        ))
                        .small()
                        .weak(),
                    );
                });
            });
        });

        if let Some(ref status) = self.state.status_message {
            egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
                let color = match status.status_type {
                    StatusType::Success => Colors::SUCCESS,
                    StatusType::Error => Colors::ERROR,
                    StatusType::Warning => Colors::WARNING,
                };
                ui.colored_label(color, &status.text);
            });
        }

        egui::CentralPanel::default().show(ctx, |ui| match self.state.current_view {
            View::Register => self.register.show(ui, &mut self.state, &self.app),
            View::Incidents => self.incidents.show(ui, &mut self.state, &self.app),
            View::Dashboard => self.dashboard.show(ui, &mut self.state, &self.app),
            View::Admin => self.admin.show(ui, &mut self.state, &mut self.app),
            View::Settings => self.settings.show(ui, &mut self.state, &mut self.app),
        });

        if self.state.show_confirm_dialog {
            if let Some(true) = ConfirmDialog::show(ctx, &mut self.state, &mut self.app) {
                self.settings.mark_needs_refresh();
            }
        }

        self.apply_pending_changes();
    }
}
