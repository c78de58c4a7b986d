use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::utils::path::{get_settings_path, resolve_against};

/// Datos de la escuela (config.json)
///
/// Cada clave ausente toma su valor por defecto. Las claves desconocidas se
/// conservan al volver a guardar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchoolConfig {
    pub school_name: String,
    pub location: String,
    pub director_name: String,
    pub teacher_name: String,
    pub grade: String,
    pub group: String,
    pub output_dir: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Default for SchoolConfig {
    fn default() -> Self {
        Self {
            school_name: "Nombre Escuela".into(),
            location: "Ubicación Escuela".into(),
            director_name: "Director/a".into(),
            teacher_name: "Maestro Titular".into(),
            grade: "1".into(),
            group: "A".into(),
            output_dir: "incidencias".into(),
            extra: serde_json::Map::new(),
        }
    }
}

impl SchoolConfig {
    /// Carpeta de actas; las rutas relativas cuelgan de la carpeta de datos
    pub fn output_directory(&self, data_dir: &Path) -> PathBuf {
        let configured = self.output_dir.trim();
        let configured = if configured.is_empty() {
            Self::default().output_dir
        } else {
            configured.to_string()
        };
        resolve_against(data_dir, Path::new(&configured))
    }

    /// "2° A"
    pub fn class_label(&self) -> String {
        format!("{} {}", self.grade.trim(), self.group.trim()).trim().to_string()
    }
}

/// Preferencias de la interfaz (no forman parte de los datos escolares)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub dark_mode: bool,
    pub window_width: f32,
    pub window_height: f32,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            dark_mode: false,
            window_width: 1100.0,
            window_height: 760.0,
        }
    }
}

impl AppSettings {
    pub fn load() -> Self {
        Self::load_from(&get_settings_path())
    }

    pub fn load_from(path: &Path) -> Self {
        std::fs::read_to_string(path)
            .ok()
            .and_then(|content| toml::from_str(&content).ok())
            .unwrap_or_default()
    }

    pub fn save(&self) -> anyhow::Result<()> {
        self.save_to(&get_settings_path())
    }

    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_absent_keys_take_defaults() {
        let config: SchoolConfig =
            serde_json::from_str(r#"{"school_name": "Telesecundaria 149", "grade": "2°"}"#).unwrap();
        assert_eq!(config.school_name, "Telesecundaria 149");
        assert_eq!(config.grade, "2°");
        assert_eq!(config.director_name, "Director/a");
        assert_eq!(config.output_dir, "incidencias");
    }

    #[test]
    fn test_unknown_keys_survive_rewrite() {
        let config: SchoolConfig = serde_json::from_str(r#"{"turno": "Matutino"}"#).unwrap();
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["turno"], "Matutino");
        assert_eq!(json["teacher_name"], "Maestro Titular");
    }

    #[test]
    fn test_output_directory_resolution() {
        let data_dir = Path::new("/srv/bitacora");
        let mut config = SchoolConfig::default();
        assert_eq!(config.output_directory(data_dir), data_dir.join("incidencias"));

        config.output_dir = "/tmp/actas".into();
        assert_eq!(config.output_directory(data_dir), PathBuf::from("/tmp/actas"));

        config.output_dir = "  ".into();
        assert_eq!(config.output_directory(data_dir), data_dir.join("incidencias"));
    }

    #[test]
    fn test_class_label() {
        let config = SchoolConfig {
            grade: "2°".into(),
            group: "B".into(),
            ..Default::default()
        };
        assert_eq!(config.class_label(), "2° B");
    }

    #[test]
    fn test_settings_toml_roundtrip_and_fallback() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("conf").join("settings.toml");

        assert_eq!(AppSettings::load_from(&path), AppSettings::default());

        let settings = AppSettings {
            dark_mode: true,
            ..Default::default()
        };
        settings.save_to(&path).unwrap();
        assert_eq!(AppSettings::load_from(&path), settings);

        std::fs::write(&path, "dark_mode = \"quizá\"").unwrap();
        assert_eq!(AppSettings::load_from(&path), AppSettings::default());
    }
}
