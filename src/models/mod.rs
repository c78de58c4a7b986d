pub mod config;
pub mod incident;
pub mod student;

pub use config::*;
pub use incident::*;
pub use student::*;
