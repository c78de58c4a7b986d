pub mod admin;
pub mod dashboard;
pub mod incidents;
pub mod register;
pub mod settings;

pub use admin::AdminView;
pub use dashboard::DashboardView;
pub use incidents::IncidentsView;
pub use register::RegisterView;
pub use settings::SettingsView;
