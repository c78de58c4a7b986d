//! Bitácora de Incidencias - punto de entrada
//!
//! Registro de incidencias escolares con actas en Word y libro de Excel.

#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use bitacora_incidencias::app::BitacoraApp;
use bitacora_incidencias::models::config::AppSettings;
use bitacora_incidencias::services::AppContext;
use bitacora_incidencias::utils::path::get_data_dir;
use eframe::egui;

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_target(false)
        .init();

    tracing::info!("Iniciando Bitácora de Incidencias v{}", env!("CARGO_PKG_VERSION"));

    let data_dir = get_data_dir();
    tracing::info!("Carpeta de datos: {:?}", data_dir);

    // Sin carpeta de datos no hay nada que mostrar
    let app = match AppContext::open(&data_dir) {
        Ok(app) => app,
        Err(e) => {
            tracing::error!("No se pudo abrir la carpeta de datos: {}", e);
            return Err(eframe::Error::AppCreation(e.to_string().into()));
        }
    };

    let app_settings = AppSettings::load();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(format!("Bitácora de Incidencias v{}", env!("CARGO_PKG_VERSION")))
            .with_inner_size([app_settings.window_width, app_settings.window_height])
            .with_min_inner_size([800.0, 600.0])
            .with_app_id("bitacora"),
        ..Default::default()
    };

    eframe::run_native(
        "Bitacora",
        options,
        Box::new(move |cc| Ok(Box::new(BitacoraApp::new(cc, app, app_settings)))),
    )
}
