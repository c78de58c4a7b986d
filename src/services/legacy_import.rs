//! Importación de la carpeta `recursos` de texto plano
//!
//! - `students.txt`: una línea por alumno, `Alumno$Padre` (sin `$` el tutor queda "N/A")
//! - `locations.txt`: una ubicación por línea
//! - `tipoIncidencia.txt`: un tipo por línea
//!
//! Los archivos ausentes se omiten. Las entradas que ya existen no se tocan.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::models::Student;
use crate::store::ResourceStore;

pub const STUDENTS_FILE: &str = "students.txt";
pub const LOCATIONS_FILE: &str = "locations.txt";
pub const INCIDENT_TYPES_FILE: &str = "tipoIncidencia.txt";

/// Tutor de las líneas sin `$`
pub const UNKNOWN_GUARDIAN: &str = "N/A";

#[derive(Debug, Clone, Default)]
pub struct ImportResult {
    pub students_added: usize,
    pub locations_added: usize,
    pub incident_types_added: usize,
    /// Entradas que ya existían
    pub skipped: usize,
    pub warnings: Vec<String>,
}

impl ImportResult {
    pub fn summary(&self) -> String {
        format!(
            "{} alumnos, {} ubicaciones, {} tipos importados{}",
            self.students_added,
            self.locations_added,
            self.incident_types_added,
            if self.skipped > 0 {
                format!(" ({} ya existían)", self.skipped)
            } else {
                String::new()
            }
        )
    }
}

/// Alumnos de `students.txt`
pub fn parse_students(content: &str) -> Vec<Student> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| match line.split_once('$') {
            Some((name, guardian)) => Student::new(name.trim(), guardian.trim()),
            None => Student::new(line, UNKNOWN_GUARDIAN),
        })
        .filter(|student| !student.name.is_empty())
        .collect()
}

/// Líneas no vacías
pub fn parse_list(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

pub struct LegacyImporter<'a> {
    store: &'a ResourceStore,
}

impl<'a> LegacyImporter<'a> {
    pub fn new(store: &'a ResourceStore) -> Self {
        Self { store }
    }

    /// Importar los archivos encontrados en `dir`
    pub fn import_dir(&self, dir: &Path) -> Result<ImportResult> {
        let mut result = ImportResult::default();
        let config = self.store.config().get();

        if let Some(content) = read_optional(&dir.join(STUDENTS_FILE), &mut result)? {
            // Los alumnos importados pertenecen al grupo configurado
            let students = parse_students(&content)
                .into_iter()
                .map(|s| s.with_class(config.grade.clone(), config.group.clone()))
                .collect();
            let (added, skipped) = self.store.students().merge(students)?;
            result.students_added = added;
            result.skipped += skipped;
        }

        if let Some(content) = read_optional(&dir.join(LOCATIONS_FILE), &mut result)? {
            let (added, skipped) = self.store.locations().merge(parse_list(&content))?;
            result.locations_added = added;
            result.skipped += skipped;
        }

        if let Some(content) = read_optional(&dir.join(INCIDENT_TYPES_FILE), &mut result)? {
            let (added, skipped) = self.store.incident_types().merge(parse_list(&content))?;
            result.incident_types_added = added;
            result.skipped += skipped;
        }

        tracing::info!("Importación desde {:?}: {}", dir, result.summary());
        Ok(result)
    }
}

fn read_optional(path: &Path, result: &mut ImportResult) -> Result<Option<String>> {
    if !path.exists() {
        result.warnings.push(format!(
            "No se encontró {}",
            path.file_name().unwrap_or_default().to_string_lossy()
        ));
        return Ok(None);
    }
    let content = fs::read_to_string(path).with_context(|| format!("No se pudo leer {:?}", path))?;
    Ok(Some(content))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_parse_students() {
        let students = parse_students("Ana López$María López\n\n  Luis  \nPedro $ \n");
        assert_eq!(students.len(), 3);
        assert_eq!(students[0].name, "Ana López");
        assert_eq!(students[0].guardian, "María López");
        assert_eq!(students[1].name, "Luis");
        assert_eq!(students[1].guardian, UNKNOWN_GUARDIAN);
        assert_eq!(students[2].name, "Pedro");
        assert_eq!(students[2].guardian, "");
    }

    #[test]
    fn test_import_dir_merges_and_reports() {
        let data = tempdir().unwrap();
        let recursos = tempdir().unwrap();
        fs::write(recursos.path().join(STUDENTS_FILE), "Ana$María\nLuis\n").unwrap();
        fs::write(recursos.path().join(LOCATIONS_FILE), "Aula\nBiblioteca\n").unwrap();

        let store = ResourceStore::open(data.path()).unwrap();
        store.students().create(Student::new("Ana", "Otra")).unwrap();

        let result = LegacyImporter::new(&store).import_dir(recursos.path()).unwrap();
        assert_eq!(result.students_added, 1);
        assert_eq!(result.locations_added, 1);
        assert_eq!(result.incident_types_added, 0);
        assert_eq!(result.skipped, 2);
        assert_eq!(result.warnings.len(), 1);

        // el alumno existente conserva su tutor
        assert_eq!(store.students().find_by_name("Ana").unwrap().guardian, "Otra");
        let luis = store.students().find_by_name("Luis").unwrap();
        assert_eq!(luis.guardian, UNKNOWN_GUARDIAN);
        assert_eq!(luis.grade, "1");
        assert!(store.locations().contains("Biblioteca"));
    }
}
