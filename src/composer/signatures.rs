//! Bloque de firmas según la gravedad

use crate::models::{guardian_for, SchoolConfig, Severity, Student};

/// Espacio para el nombre del testigo
pub const WITNESS_BLANK: &str = "____________________";

/// Una casilla de firma: cargo en negritas y nombre bajo la línea
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureLine {
    pub role: String,
    pub name: String,
}

impl SignatureLine {
    fn new(role: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            name: name.into(),
        }
    }
}

/// Firmas en orden: director (Moderada/Grave), maestro, alumnos, tutores (Grave), testigo
pub fn signature_block(
    severity: Severity,
    participants: &[String],
    config: &SchoolConfig,
    students: &[Student],
) -> Vec<SignatureLine> {
    let mut lines = Vec::new();

    if severity.requires_director() {
        lines.push(SignatureLine::new("Director", config.director_name.as_str()));
    }
    lines.push(SignatureLine::new("Maestro de Grupo", config.teacher_name.as_str()));

    for student in participants {
        lines.push(SignatureLine::new("Alumno", student.as_str()));
    }

    if severity.requires_guardians() {
        for student in participants {
            lines.push(SignatureLine::new(
                format!("Padre/Madre de familia ({})", student),
                guardian_for(students, student),
            ));
        }
    }

    lines.push(SignatureLine::new("Testigo", WITNESS_BLANK));
    lines
}
