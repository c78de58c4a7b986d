use serde::{Deserialize, Serialize};

/// Tutor que firma cuando no hay uno registrado
pub const DEFAULT_GUARDIAN: &str = "Padre de familia";

/// Alumno tal como se guarda en alumnos.json
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Student {
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "padre", default)]
    pub guardian: String,
    #[serde(rename = "grado", default)]
    pub grade: String,
    #[serde(rename = "grupo", default)]
    pub group: String,
}

impl Student {
    pub fn new(name: impl Into<String>, guardian: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            guardian: guardian.into(),
            ..Default::default()
        }
    }

    pub fn with_class(mut self, grade: impl Into<String>, group: impl Into<String>) -> Self {
        self.grade = grade.into();
        self.group = group.into();
        self
    }

    /// Nombre del tutor para la firma
    pub fn guardian_or_default(&self) -> &str {
        let guardian = self.guardian.trim();
        if guardian.is_empty() {
            DEFAULT_GUARDIAN
        } else {
            guardian
        }
    }

    pub fn class_label(&self) -> String {
        format!("{} {}", self.grade, self.group).trim().to_string()
    }

    pub fn validate(&self) -> Result<(), StudentValidationError> {
        if self.name.trim().is_empty() {
            return Err(StudentValidationError::MissingName);
        }
        // En la hoja los participantes van separados por coma
        if self.name.contains(',') {
            return Err(StudentValidationError::CommaInName);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StudentValidationError {
    #[error("El nombre del alumno es obligatorio")]
    MissingName,
    #[error("El nombre del alumno no puede contener comas")]
    CommaInName,
}

/// Busca el tutor de un alumno por nombre exacto
pub fn guardian_for<'a>(students: &'a [Student], name: &str) -> &'a str {
    students
        .iter()
        .find(|s| s.name == name)
        .map(Student::guardian_or_default)
        .unwrap_or(DEFAULT_GUARDIAN)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_keys_follow_file_format() {
        let student = Student::new("Ana López", "María López").with_class("2°", "A");
        let json = serde_json::to_value(&student).unwrap();
        assert_eq!(json["nombre"], "Ana López");
        assert_eq!(json["padre"], "María López");
        assert_eq!(json["grado"], "2°");
        assert_eq!(json["grupo"], "A");
    }

    #[test]
    fn test_missing_optional_keys_default() {
        let student: Student = serde_json::from_str(r#"{"nombre": "Luis"}"#).unwrap();
        assert_eq!(student.name, "Luis");
        assert_eq!(student.guardian_or_default(), DEFAULT_GUARDIAN);
        assert_eq!(student.class_label(), "");
    }

    #[test]
    fn test_guardian_lookup() {
        let students = vec![Student::new("Ana", "Rosa"), Student::new("Luis", "  ")];
        assert_eq!(guardian_for(&students, "Ana"), "Rosa");
        assert_eq!(guardian_for(&students, "Luis"), DEFAULT_GUARDIAN);
        assert_eq!(guardian_for(&students, "Pedro"), DEFAULT_GUARDIAN);
    }

    #[test]
    fn test_validation() {
        assert!(Student::new("Ana", "").validate().is_ok());
        assert_eq!(
            Student::new("   ", "").validate(),
            Err(StudentValidationError::MissingName)
        );
        assert_eq!(
            Student::new("Pérez, Ana", "").validate(),
            Err(StudentValidationError::CommaInName)
        );
    }

    #[test]
    fn test_validation_messages() {
        assert_eq!(
            StudentValidationError::MissingName.to_string(),
            "El nombre del alumno es obligatorio"
        );
        assert_eq!(
            StudentValidationError::CommaInName.to_string(),
            "El nombre del alumno no puede contener comas"
        );
    }
}
