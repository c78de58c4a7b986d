//! Interfaz de escritorio (egui)

pub mod modals;
pub mod state;
pub mod theme;
pub mod views;

pub use state::{AppState, ConfirmAction, StatusType, View};
