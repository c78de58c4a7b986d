use super::{Collection, ResourceStore};
use crate::utils::{AppError, AppResult};

/// Ubicaciones por defecto
pub fn default_locations() -> Vec<String> {
    ["Aula", "Patio", "Dirección"].map(String::from).to_vec()
}

/// Tipos de incidencia por defecto
pub fn default_incident_types() -> Vec<String> {
    ["Accidente", "Pelea", "Indisciplina", "Bullying", "Otro"]
        .map(String::from)
        .to_vec()
}

/// Lista ordenada de textos (ubicaciones o tipos de incidencia)
pub struct CatalogRepository<'a> {
    store: &'a ResourceStore,
    collection: Collection,
}

impl<'a> CatalogRepository<'a> {
    pub fn new(store: &'a ResourceStore, collection: Collection) -> Self {
        Self { store, collection }
    }

    fn defaults(&self) -> Vec<String> {
        match self.collection {
            Collection::IncidentTypes => default_incident_types(),
            Collection::Locations => default_locations(),
            _ => Vec::new(),
        }
    }

    pub fn find_all(&self) -> Vec<String> {
        self.store.get(self.collection, || self.defaults())
    }

    pub fn contains(&self, entry: &str) -> bool {
        self.find_all().iter().any(|e| e == entry)
    }

    /// Agregar al final si no existe
    pub fn add(&self, entry: &str) -> AppResult<()> {
        let entry = entry.trim();
        if entry.is_empty() {
            return Err(AppError::validation("El texto no puede estar vacío"));
        }

        let mut entries = self.find_all();
        if entries.iter().any(|e| e == entry) {
            return Err(AppError::already_exists(format!("'{}' ya está en {}", entry, self.collection.label())));
        }

        entries.push(entry.to_string());
        self.store.put(self.collection, &entries)
    }

    /// Renombrar en su misma posición
    pub fn rename(&self, old: &str, new: &str) -> AppResult<()> {
        let new = new.trim();
        if new.is_empty() {
            return Err(AppError::validation("El texto no puede estar vacío"));
        }

        let mut entries = self.find_all();
        let index = entries
            .iter()
            .position(|e| e == old)
            .ok_or_else(|| AppError::not_found(format!("'{}' en {}", old, self.collection.label())))?;

        if new != old && entries.iter().any(|e| e == new) {
            return Err(AppError::already_exists(format!("'{}' ya está en {}", new, self.collection.label())));
        }

        entries[index] = new.to_string();
        self.store.put(self.collection, &entries)
    }

    pub fn remove(&self, entry: &str) -> AppResult<()> {
        let mut entries = self.find_all();
        let before = entries.len();
        entries.retain(|e| e != entry);
        if entries.len() == before {
            return Err(AppError::not_found(format!("'{}' en {}", entry, self.collection.label())));
        }
        self.store.put(self.collection, &entries)
    }

    /// Agregar varios, omitiendo repetidos. Devuelve (agregados, omitidos).
    pub fn merge(&self, incoming: Vec<String>) -> AppResult<(usize, usize)> {
        let mut entries = self.find_all();
        let mut added = 0;
        let mut skipped = 0;

        for entry in incoming {
            let entry = entry.trim().to_string();
            if entry.is_empty() || entries.contains(&entry) {
                skipped += 1;
                continue;
            }
            entries.push(entry);
            added += 1;
        }

        if added > 0 {
            self.store.put(self.collection, &entries)?;
        }
        Ok((added, skipped))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults_written_on_first_access() {
        let dir = tempdir().unwrap();
        let store = ResourceStore::open(dir.path()).unwrap();

        assert_eq!(store.locations().find_all(), default_locations());
        assert_eq!(store.incident_types().find_all(), default_incident_types());
        assert!(store.path_of(Collection::Locations).exists());
        assert!(store.path_of(Collection::IncidentTypes).exists());
    }

    #[test]
    fn test_add_checks_membership() {
        let dir = tempdir().unwrap();
        let store = ResourceStore::open(dir.path()).unwrap();
        let repo = store.locations();

        repo.add("Biblioteca").unwrap();
        assert!(matches!(repo.add("Biblioteca"), Err(AppError::AlreadyExists(_))));
        assert!(matches!(repo.add("   "), Err(AppError::Validation(_))));
        assert_eq!(repo.find_all().last().map(String::as_str), Some("Biblioteca"));
    }

    #[test]
    fn test_rename_keeps_position() {
        let dir = tempdir().unwrap();
        let store = ResourceStore::open(dir.path()).unwrap();
        let repo = store.incident_types();

        repo.rename("Pelea", "Riña").unwrap();
        assert_eq!(repo.find_all()[1], "Riña");
        assert!(matches!(repo.rename("Pelea", "X"), Err(AppError::NotFound(_))));
        assert!(matches!(repo.rename("Otro", "Riña"), Err(AppError::AlreadyExists(_))));
    }

    #[test]
    fn test_remove_and_merge() {
        let dir = tempdir().unwrap();
        let store = ResourceStore::open(dir.path()).unwrap();
        let repo = store.locations();

        repo.remove("Patio").unwrap();
        assert!(!repo.contains("Patio"));
        assert!(matches!(repo.remove("Patio"), Err(AppError::NotFound(_))));

        let (added, skipped) = repo
            .merge(vec!["Aula".into(), "Cancha".into(), "".into(), "Cancha".into()])
            .unwrap();
        assert_eq!((added, skipped), (1, 3));
        assert_eq!(repo.find_all(), vec!["Aula", "Dirección", "Cancha"]);
    }
}
