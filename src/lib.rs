//! Bitácora de Incidencias
//!
//! Aplicación de escritorio para registrar incidencias disciplinarias: genera un
//! acta en Word por incidencia y lleva el libro de Excel con el Dashboard y el
//! Registro de Faltas.

pub mod app;
pub mod composer;
pub mod ledger;
pub mod models;
pub mod services;
pub mod store;
pub mod ui;
pub mod utils;

pub use ledger::Ledger;
pub use models::*;
pub use services::AppContext;
pub use store::ResourceStore;
pub use ui::{AppState, View};
