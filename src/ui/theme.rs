use egui::{Color32, FontFamily, FontId, TextStyle, Visuals};

use crate::models::Severity;

/// Aplicar tipografía, espaciado y colores
pub fn configure_style(ctx: &egui::Context, dark_mode: bool) {
    let mut style = (*ctx.style()).clone();

    style.text_styles = [
        (TextStyle::Heading, FontId::new(22.0, FontFamily::Proportional)),
        (TextStyle::Name("heading2".into()), FontId::new(18.0, FontFamily::Proportional)),
        (TextStyle::Body, FontId::new(14.0, FontFamily::Proportional)),
        (TextStyle::Monospace, FontId::new(13.0, FontFamily::Monospace)),
        (TextStyle::Button, FontId::new(14.0, FontFamily::Proportional)),
        (TextStyle::Small, FontId::new(12.0, FontFamily::Proportional)),
    ]
    .into();

    style.spacing.item_spacing = egui::vec2(8.0, 6.0);
    style.spacing.button_padding = egui::vec2(12.0, 6.0);
    style.spacing.window_margin = egui::Margin::same(12.0);

    style.visuals = if dark_mode { dark_visuals() } else { light_visuals() };

    ctx.set_style(style);
}

fn dark_visuals() -> Visuals {
    let mut visuals = Visuals::dark();

    visuals.panel_fill = Color32::from_rgb(28, 31, 36);
    visuals.window_fill = Color32::from_rgb(38, 41, 46);
    visuals.extreme_bg_color = Color32::from_rgb(20, 22, 26);

    visuals.widgets.noninteractive.bg_fill = Color32::from_rgb(44, 47, 53);
    visuals.widgets.inactive.bg_fill = Color32::from_rgb(50, 54, 60);
    visuals.widgets.hovered.bg_fill = Color32::from_rgb(60, 65, 74);
    visuals.widgets.active.bg_fill = Color32::from_rgb(70, 76, 88);

    // Verde escolar
    visuals.selection.bg_fill = Color32::from_rgb(40, 120, 90);
    visuals.hyperlink_color = Color32::from_rgb(110, 200, 160);

    visuals
}

fn light_visuals() -> Visuals {
    let mut visuals = Visuals::light();

    visuals.panel_fill = Color32::from_rgb(247, 248, 246);
    visuals.window_fill = Color32::from_rgb(255, 255, 255);
    visuals.extreme_bg_color = Color32::from_rgb(238, 241, 238);

    visuals.widgets.noninteractive.bg_fill = Color32::from_rgb(233, 236, 233);
    visuals.widgets.inactive.bg_fill = Color32::from_rgb(228, 232, 228);
    visuals.widgets.hovered.bg_fill = Color32::from_rgb(214, 224, 216);
    visuals.widgets.active.bg_fill = Color32::from_rgb(196, 214, 200);

    visuals.selection.bg_fill = Color32::from_rgb(176, 226, 200);
    visuals.hyperlink_color = Color32::from_rgb(20, 110, 80);

    visuals
}

pub struct Colors;

impl Colors {
    pub const PRIMARY: Color32 = Color32::from_rgb(22, 128, 92);

    pub const SUCCESS: Color32 = Color32::from_rgb(34, 197, 94);
    pub const WARNING: Color32 = Color32::from_rgb(234, 179, 8);
    pub const ERROR: Color32 = Color32::from_rgb(239, 68, 68);

    pub const TEXT_SECONDARY: Color32 = Color32::from_rgb(107, 114, 128);
    pub const TEXT_MUTED: Color32 = Color32::from_rgb(156, 163, 175);

    // Gravedad
    pub const LEVE: Color32 = Color32::from_rgb(59, 130, 246);
    pub const MODERADA: Color32 = Color32::from_rgb(234, 150, 8);
    pub const GRAVE: Color32 = Color32::from_rgb(220, 38, 38);

    pub fn severity(severity: Severity) -> Color32 {
        match severity {
            Severity::Leve => Self::LEVE,
            Severity::Moderada => Self::MODERADA,
            Severity::Grave => Self::GRAVE,
        }
    }
}

/// Íconos (Unicode)
pub struct Icons;

impl Icons {
    pub const REGISTER: &'static str = "📝";
    pub const LIST: &'static str = "📋";
    pub const DASHBOARD: &'static str = "📊";
    pub const ADMIN: &'static str = "👥";
    pub const SETTINGS: &'static str = "⚙";
    pub const STUDENT: &'static str = "👤";
    pub const LOCATION: &'static str = "📍";
    pub const TYPE: &'static str = "🏷";
    pub const DOCUMENT: &'static str = "📄";
    pub const FOLDER: &'static str = "📁";
    pub const ADD: &'static str = "➕";
    pub const EDIT: &'static str = "✏";
    pub const DELETE: &'static str = "🗑";
    pub const SAVE: &'static str = "💾";
    pub const REFRESH: &'static str = "🔄";
    pub const IMPORT: &'static str = "📥";
    pub const BACKUP: &'static str = "🗄";
}
