pub mod confirm_dialog;

pub use confirm_dialog::ConfirmDialog;
