//! Servicios de la aplicación
//!
//! Lógica que no pertenece ni a la interfaz ni a los archivos de datos.

pub mod backup;
pub mod legacy_import;
pub mod registration;

pub use backup::{BackupInfo, BackupResult, BackupService};
pub use legacy_import::{ImportResult, LegacyImporter};
pub use registration::{AppContext, DeletionOutcome, IncidentForm, RegistrationOutcome, ResourceCache};
