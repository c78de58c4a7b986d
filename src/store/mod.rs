//! Almacén de recursos en JSON
//!
//! Cada colección vive en su propio archivo dentro de la carpeta de datos. Los
//! archivos se leen y se reescriben completos en cada operación; no hay bloqueo,
//! la última escritura gana.

pub mod catalog_repo;
pub mod config_repo;
pub mod student_repo;

use serde::{de::DeserializeOwned, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::utils::{AppError, AppResult};

pub use catalog_repo::CatalogRepository;
pub use config_repo::ConfigRepository;
pub use student_repo::StudentRepository;

/// Colecciones conocidas y su archivo
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Students,
    Locations,
    IncidentTypes,
    Config,
}

impl Collection {
    pub fn file_name(&self) -> &'static str {
        match self {
            Self::Students => "alumnos.json",
            Self::Locations => "ubicaciones.json",
            Self::IncidentTypes => "tipos_incidencia.json",
            Self::Config => "config.json",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Students => "Alumnos",
            Self::Locations => "Ubicaciones",
            Self::IncidentTypes => "Tipos de incidencia",
            Self::Config => "Configuración",
        }
    }
}

/// Acceso a los archivos JSON de la carpeta de datos
#[derive(Debug, Clone)]
pub struct ResourceStore {
    data_dir: PathBuf,
}

impl ResourceStore {
    /// Abrir (o crear) la carpeta de datos
    pub fn open(data_dir: &Path) -> AppResult<Self> {
        fs::create_dir_all(data_dir)?;
        Ok(Self {
            data_dir: data_dir.to_path_buf(),
        })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn path_of(&self, collection: Collection) -> PathBuf {
        self.data_dir.join(collection.file_name())
    }

    /// Leer una colección
    ///
    /// Si el archivo no existe se escribe el valor por defecto y se devuelve.
    /// Un archivo ilegible o mal formado devuelve el valor por defecto sin tocarlo.
    pub fn get<T, F>(&self, collection: Collection, default: F) -> T
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> T,
    {
        let path = self.path_of(collection);

        if !path.exists() {
            let value = default();
            if let Err(e) = write_json(&path, &value) {
                tracing::warn!("No se pudo crear {:?}: {}", path, e);
            } else {
                tracing::info!("Creado {} con valores por defecto", collection.file_name());
            }
            return value;
        }

        match read_json(&path) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!("{} ilegible, se usan valores por defecto: {}", collection.file_name(), e);
                default()
            }
        }
    }

    /// Reescribir una colección completa
    pub fn put<T: Serialize>(&self, collection: Collection, value: &T) -> AppResult<()> {
        let path = self.path_of(collection);
        write_json(&path, value).map_err(|e| {
            tracing::error!("No se pudo guardar {}: {}", collection.file_name(), e);
            e
        })?;
        tracing::info!("Guardado {}", collection.file_name());
        Ok(())
    }

    pub fn students(&self) -> StudentRepository<'_> {
        StudentRepository::new(self)
    }

    pub fn locations(&self) -> CatalogRepository<'_> {
        CatalogRepository::new(self, Collection::Locations)
    }

    pub fn incident_types(&self) -> CatalogRepository<'_> {
        CatalogRepository::new(self, Collection::IncidentTypes)
    }

    pub fn config(&self) -> ConfigRepository<'_> {
        ConfigRepository::new(self)
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> AppResult<T> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> AppResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = serde_json::to_string_pretty(value)?;
    fs::write(path, content).map_err(AppError::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_is_created_with_default() {
        let dir = tempdir().unwrap();
        let store = ResourceStore::open(dir.path()).unwrap();
        let path = store.path_of(Collection::Locations);
        assert!(!path.exists());

        let value: Vec<String> = store.get(Collection::Locations, || vec!["Aula".to_string()]);
        assert_eq!(value, vec!["Aula"]);
        assert!(path.exists());

        let on_disk: Vec<String> = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(on_disk, vec!["Aula"]);
    }

    #[test]
    fn test_malformed_file_degrades_to_default_without_overwrite() {
        let dir = tempdir().unwrap();
        let store = ResourceStore::open(dir.path()).unwrap();
        let path = store.path_of(Collection::IncidentTypes);
        fs::write(&path, "{ esto no es json").unwrap();

        let value: Vec<String> = store.get(Collection::IncidentTypes, || vec!["Otro".to_string()]);
        assert_eq!(value, vec!["Otro"]);
        assert_eq!(fs::read_to_string(&path).unwrap(), "{ esto no es json");
    }

    #[test]
    fn test_put_then_get_preserves_order_and_accents() {
        let dir = tempdir().unwrap();
        let store = ResourceStore::open(dir.path()).unwrap();
        let list = vec!["Patio".to_string(), "Dirección".to_string(), "Aula".to_string()];
        store.put(Collection::Locations, &list).unwrap();

        let raw = fs::read_to_string(store.path_of(Collection::Locations)).unwrap();
        assert!(raw.contains("Dirección"));

        let value: Vec<String> = store.get(Collection::Locations, Vec::new);
        assert_eq!(value, list);
    }

    #[test]
    fn test_open_creates_data_dir() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        let store = ResourceStore::open(&nested).unwrap();
        assert!(nested.is_dir());
        assert_eq!(store.data_dir(), nested.as_path());
    }
}
