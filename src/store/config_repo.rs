use super::{Collection, ResourceStore};
use crate::models::SchoolConfig;
use crate::utils::AppResult;

pub struct ConfigRepository<'a> {
    store: &'a ResourceStore,
}

impl<'a> ConfigRepository<'a> {
    pub fn new(store: &'a ResourceStore) -> Self {
        Self { store }
    }

    /// Configuración de la escuela (se crea con valores por defecto si no existe)
    pub fn get(&self) -> SchoolConfig {
        self.store.get(Collection::Config, SchoolConfig::default)
    }

    pub fn save(&self, config: &SchoolConfig) -> AppResult<()> {
        self.store.put(Collection::Config, config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_get_creates_default_file() {
        let dir = tempdir().unwrap();
        let store = ResourceStore::open(dir.path()).unwrap();

        let config = store.config().get();
        assert_eq!(config, SchoolConfig::default());

        let raw = std::fs::read_to_string(store.path_of(Collection::Config)).unwrap();
        assert!(raw.contains("\"teacher_name\""));
    }

    #[test]
    fn test_partial_file_is_completed_with_defaults() {
        let dir = tempdir().unwrap();
        let store = ResourceStore::open(dir.path()).unwrap();
        std::fs::write(
            store.path_of(Collection::Config),
            r#"{"school_name": "Telesecundaria 149", "director_name": "Mtro. Pedro Sánchez"}"#,
        )
        .unwrap();

        let config = store.config().get();
        assert_eq!(config.school_name, "Telesecundaria 149");
        assert_eq!(config.director_name, "Mtro. Pedro Sánchez");
        assert_eq!(config.group, "A");
    }

    #[test]
    fn test_save_roundtrip() {
        let dir = tempdir().unwrap();
        let store = ResourceStore::open(dir.path()).unwrap();
        let mut config = store.config().get();
        config.teacher_name = "Profr. Rigoberto".into();
        store.config().save(&config).unwrap();

        assert_eq!(store.config().get().teacher_name, "Profr. Rigoberto");
    }
}
