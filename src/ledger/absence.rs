//! Hoja "Registro de Faltas"
//!
//! Contadores acumulados por alumno. Se incrementan al registrar una incidencia y
//! nunca se recalculan ni se decrementan, por lo que pueden diferir de la hoja
//! Incidencias después de borrar filas.

use crate::models::{Severity, SeverityCounts};
use crate::utils::{AppError, AppResult};

/// Fila de contadores de un alumno
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AbsenceRow {
    pub student: String,
    pub total: u32,
    pub counts: SeverityCounts,
}

impl AbsenceRow {
    pub fn new(student: impl Into<String>) -> Self {
        Self {
            student: student.into(),
            total: 0,
            counts: SeverityCounts::default(),
        }
    }
}

/// Bloque lateral de resumen (columnas G/H)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AbsenceSummary {
    pub students: usize,
    pub total: u32,
    pub counts: SeverityCounts,
}

impl AbsenceSummary {
    /// Pares (etiqueta, valor) en el orden en que se escriben
    pub fn entries(&self) -> Vec<(&'static str, u32)> {
        vec![
            ("Alumnos con faltas", self.students as u32),
            ("Total de faltas", self.total),
            (Severity::Leve.label(), self.counts.leve),
            (Severity::Moderada.label(), self.counts.moderada),
            (Severity::Grave.label(), self.counts.grave),
        ]
    }
}

/// Contenido de la hoja tal como se leyó
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AbsenceSheet {
    Counters(Vec<AbsenceRow>),
    /// Alguna celda de contador no es numérica; se reescribe sin cambios
    Unreadable { cells: Vec<Vec<String>>, reason: String },
}

impl Default for AbsenceSheet {
    fn default() -> Self {
        Self::Counters(Vec::new())
    }
}

impl AbsenceSheet {
    /// Interpretar las filas de datos (sin encabezado), columnas A..E
    pub fn from_cells(cells: Vec<Vec<String>>) -> Self {
        let mut rows = Vec::new();

        for (index, line) in cells.iter().enumerate() {
            let student = cell_at(line, 0);
            if student.is_empty() {
                continue;
            }

            let parsed = (1..=4)
                .map(|col| parse_count(cell_at(line, col)))
                .collect::<Option<Vec<u32>>>();

            match parsed.as_deref() {
                Some(&[total, leve, moderada, grave]) => rows.push(AbsenceRow {
                    student: student.to_string(),
                    total,
                    counts: SeverityCounts { leve, moderada, grave },
                }),
                _ => {
                    let reason = format!("fila {} ('{}') tiene contadores no numéricos", index + 2, student);
                    return Self::Unreadable { cells, reason };
                }
            }
        }

        Self::Counters(rows)
    }

    pub fn rows(&self) -> Option<&[AbsenceRow]> {
        match self {
            Self::Counters(rows) => Some(rows),
            Self::Unreadable { .. } => None,
        }
    }

    /// Sumar una falta a cada participante (coincidencia exacta de nombre)
    pub fn record(&mut self, participants: &[String], severity: Severity) -> AppResult<()> {
        let rows = match self {
            Self::Counters(rows) => rows,
            Self::Unreadable { reason, .. } => {
                return Err(AppError::other(format!("Registro de Faltas no se pudo leer: {}", reason)))
            }
        };

        for name in participants {
            let index = match rows.iter().position(|r| &r.student == name) {
                Some(index) => index,
                None => {
                    rows.push(AbsenceRow::new(name.clone()));
                    rows.len() - 1
                }
            };
            let row = &mut rows[index];
            row.total += 1;
            row.counts.increment(severity);
        }

        Ok(())
    }

    pub fn summary(&self) -> Option<AbsenceSummary> {
        let rows = self.rows()?;
        let mut summary = AbsenceSummary {
            students: rows.len(),
            ..Default::default()
        };
        for row in rows {
            summary.total += row.total;
            summary.counts += row.counts;
        }
        Some(summary)
    }
}

fn cell_at(line: &[String], col: usize) -> &str {
    line.get(col).map(|s| s.trim()).unwrap_or("")
}

fn parse_count(cell: &str) -> Option<u32> {
    if cell.is_empty() {
        return Some(0);
    }
    if let Ok(n) = cell.parse::<u32>() {
        return Some(n);
    }
    // Excel guarda los números como flotantes
    let value = cell.parse::<f64>().ok()?;
    if value >= 0.0 && value.fract() == 0.0 && value <= u32::MAX as f64 {
        Some(value as u32)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells(rows: &[&[&str]]) -> Vec<Vec<String>> {
        rows.iter()
            .map(|r| r.iter().map(|c| c.to_string()).collect())
            .collect()
    }

    #[test]
    fn test_same_student_leve_then_grave() {
        let mut sheet = AbsenceSheet::default();
        sheet.record(&["Ana".to_string()], Severity::Leve).unwrap();
        sheet.record(&["Ana".to_string()], Severity::Grave).unwrap();

        let rows = sheet.rows().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].total, 2);
        assert_eq!(rows[0].counts.leve, 1);
        assert_eq!(rows[0].counts.moderada, 0);
        assert_eq!(rows[0].counts.grave, 1);
    }

    #[test]
    fn test_unmatched_names_append_rows() {
        let mut sheet = AbsenceSheet::from_cells(cells(&[&["Ana", "3", "1", "1", "1"]]));
        sheet
            .record(&["Luis".to_string(), "Ana".to_string()], Severity::Moderada)
            .unwrap();

        let rows = sheet.rows().unwrap();
        assert_eq!(rows[0].student, "Ana");
        assert_eq!(rows[0].total, 4);
        assert_eq!(rows[0].counts.moderada, 2);
        assert_eq!(rows[1].student, "Luis");
        assert_eq!(rows[1].total, 1);
    }

    #[test]
    fn test_match_is_exact() {
        let mut sheet = AbsenceSheet::from_cells(cells(&[&["ana", "1", "1", "0", "0"]]));
        sheet.record(&["Ana".to_string()], Severity::Leve).unwrap();
        assert_eq!(sheet.rows().unwrap().len(), 2);
    }

    #[test]
    fn test_parses_float_and_blank_cells() {
        let sheet = AbsenceSheet::from_cells(cells(&[&["Ana", "2.0", "", "2", "0"], &["", "", "", "", ""]]));
        let rows = sheet.rows().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].total, 2);
        assert_eq!(rows[0].counts.leve, 0);
        assert_eq!(rows[0].counts.moderada, 2);
    }

    #[test]
    fn test_non_numeric_counter_makes_sheet_unreadable() {
        let mut sheet = AbsenceSheet::from_cells(cells(&[&["Ana", "muchas", "1", "0", "0"]]));
        assert!(sheet.rows().is_none());
        assert!(sheet.summary().is_none());
        assert!(sheet.record(&["Ana".to_string()], Severity::Leve).is_err());

        match sheet {
            AbsenceSheet::Unreadable { cells, .. } => assert_eq!(cells[0][1], "muchas"),
            AbsenceSheet::Counters(_) => panic!("se esperaba hoja ilegible"),
        }
    }

    #[test]
    fn test_summary_block() {
        let mut sheet = AbsenceSheet::default();
        sheet
            .record(&["Ana".to_string(), "Luis".to_string()], Severity::Leve)
            .unwrap();
        sheet.record(&["Ana".to_string()], Severity::Grave).unwrap();

        let summary = sheet.summary().unwrap();
        assert_eq!(summary.students, 2);
        assert_eq!(summary.total, 3);
        assert_eq!(summary.counts.leve, 2);
        assert_eq!(summary.counts.grave, 1);
        assert_eq!(summary.entries()[1], ("Total de faltas", 3));
    }
}
