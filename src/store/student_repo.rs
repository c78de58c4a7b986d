use super::{Collection, ResourceStore};
use crate::models::Student;
use crate::utils::{AppError, AppResult};

pub struct StudentRepository<'a> {
    store: &'a ResourceStore,
}

impl<'a> StudentRepository<'a> {
    pub fn new(store: &'a ResourceStore) -> Self {
        Self { store }
    }

    pub fn find_all(&self) -> Vec<Student> {
        self.store.get(Collection::Students, Vec::new)
    }

    pub fn find_by_name(&self, name: &str) -> Option<Student> {
        self.find_all().into_iter().find(|s| s.name == name)
    }

    /// Agregar alumno (el nombre debe ser único)
    pub fn create(&self, student: Student) -> AppResult<()> {
        student
            .validate()
            .map_err(|e| AppError::validation(e.to_string()))?;

        let mut students = self.find_all();
        if students.iter().any(|s| s.name == student.name) {
            return Err(AppError::already_exists(format!("El alumno '{}' ya existe", student.name)));
        }

        students.push(student);
        self.store.put(Collection::Students, &students)
    }

    /// Reemplazar el alumno `original_name`
    ///
    /// Un cambio de nombre no se propaga a incidencias ya registradas.
    pub fn update(&self, original_name: &str, student: Student) -> AppResult<()> {
        student
            .validate()
            .map_err(|e| AppError::validation(e.to_string()))?;

        let mut students = self.find_all();
        let index = students
            .iter()
            .position(|s| s.name == original_name)
            .ok_or_else(|| AppError::not_found(format!("Alumno '{}'", original_name)))?;

        if student.name != original_name && students.iter().any(|s| s.name == student.name) {
            return Err(AppError::already_exists(format!("El alumno '{}' ya existe", student.name)));
        }

        students[index] = student;
        self.store.put(Collection::Students, &students)
    }

    pub fn delete(&self, name: &str) -> AppResult<()> {
        let mut students = self.find_all();
        let before = students.len();
        students.retain(|s| s.name != name);
        if students.len() == before {
            return Err(AppError::not_found(format!("Alumno '{}'", name)));
        }
        self.store.put(Collection::Students, &students)
    }

    /// Agregar varios a la vez, omitiendo nombres existentes
    ///
    /// Devuelve (agregados, omitidos).
    pub fn merge(&self, incoming: Vec<Student>) -> AppResult<(usize, usize)> {
        let mut students = self.find_all();
        let mut added = 0;
        let mut skipped = 0;

        for student in incoming {
            if student.validate().is_err() || students.iter().any(|s| s.name == student.name) {
                skipped += 1;
                continue;
            }
            students.push(student);
            added += 1;
        }

        if added > 0 {
            self.store.put(Collection::Students, &students)?;
        }
        Ok((added, skipped))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn store() -> (tempfile::TempDir, ResourceStore) {
        let dir = tempdir().unwrap();
        let store = ResourceStore::open(dir.path()).unwrap();
        (dir, store)
    }

    #[test]
    fn test_starts_empty() {
        let (_dir, store) = store();
        assert!(store.students().find_all().is_empty());
        assert!(store.path_of(Collection::Students).exists());
    }

    #[test]
    fn test_create_rejects_duplicates_and_blank_names() {
        let (_dir, store) = store();
        let repo = store.students();
        repo.create(Student::new("Ana", "Rosa")).unwrap();

        assert!(matches!(
            repo.create(Student::new("Ana", "Otra")),
            Err(AppError::AlreadyExists(_))
        ));
        assert!(matches!(repo.create(Student::new(" ", "")), Err(AppError::Validation(_))));
        assert!(matches!(
            repo.create(Student::new("Pérez, Ana", "")),
            Err(AppError::Validation(_))
        ));
        assert_eq!(repo.find_all().len(), 1);
    }

    #[test]
    fn test_update_and_rename() {
        let (_dir, store) = store();
        let repo = store.students();
        repo.create(Student::new("Ana", "Rosa")).unwrap();
        repo.create(Student::new("Luis", "Juan")).unwrap();

        repo.update("Ana", Student::new("Ana María", "Rosa").with_class("2°", "A"))
            .unwrap();
        let updated = repo.find_by_name("Ana María").unwrap();
        assert_eq!(updated.grade, "2°");
        assert!(repo.find_by_name("Ana").is_none());

        assert!(matches!(
            repo.update("Luis", Student::new("Ana María", "")),
            Err(AppError::AlreadyExists(_))
        ));
        assert!(matches!(
            repo.update("Luis", Student::new("Soto, Luis", "")),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            repo.update("Pedro", Student::new("Pedro", "")),
            Err(AppError::NotFound(_))
        ));
    }

    #[test]
    fn test_delete() {
        let (_dir, store) = store();
        let repo = store.students();
        repo.create(Student::new("Ana", "Rosa")).unwrap();
        repo.delete("Ana").unwrap();
        assert!(repo.find_all().is_empty());
        assert!(matches!(repo.delete("Ana"), Err(AppError::NotFound(_))));
    }

    #[test]
    fn test_merge_skips_existing() {
        let (_dir, store) = store();
        let repo = store.students();
        repo.create(Student::new("Ana", "Rosa")).unwrap();

        let (added, skipped) = repo
            .merge(vec![
                Student::new("Ana", "Otra"),
                Student::new("Luis", "Juan"),
                Student::new("", ""),
            ])
            .unwrap();
        assert_eq!((added, skipped), (1, 2));
        assert_eq!(repo.find_by_name("Ana").unwrap().guardian, "Rosa");
    }
}
