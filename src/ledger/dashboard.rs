//! Resumen del Dashboard
//!
//! Se recalcula desde la hoja Incidencias sólo cuando se pide. Filas con la misma
//! fecha, gravedad y conjunto de participantes cuentan una sola vez.

use std::collections::{BTreeSet, HashSet};

use crate::models::{IncidentRow, Severity, SeverityCounts};

/// Incidencias de un alumno por gravedad
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentTally {
    pub student: String,
    pub counts: SeverityCounts,
}

/// Tablas del Dashboard: totales por gravedad y desglose por alumno
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardSummary {
    pub updated_at: String,
    pub totals: SeverityCounts,
    pub by_student: Vec<StudentTally>,
}

impl DashboardSummary {
    pub fn compute(rows: &[IncidentRow], updated_at: impl Into<String>) -> Self {
        Self {
            updated_at: updated_at.into(),
            totals: severity_totals(rows),
            by_student: student_totals(rows),
        }
    }
}

type IncidentKey<'a> = (&'a str, Severity, BTreeSet<&'a str>);

/// Incidencias sin repetir, en orden de la hoja
///
/// Clave de unicidad: (fecha, gravedad, participantes sin orden ni repetidos).
/// Las filas sin fecha o con gravedad desconocida no cuentan.
fn unique_incidents(rows: &[IncidentRow]) -> Vec<IncidentKey<'_>> {
    let mut seen: HashSet<IncidentKey<'_>> = HashSet::new();
    let mut unique = Vec::new();

    for row in rows {
        let date = row.date.trim();
        if date.is_empty() {
            continue;
        }
        let Some(severity) = row.severity_level() else {
            continue;
        };

        let participants: BTreeSet<&str> = row
            .participants
            .iter()
            .map(|p| p.trim())
            .filter(|p| !p.is_empty())
            .collect();
        let key = (date, severity, participants);
        if seen.insert(key.clone()) {
            unique.push(key);
        }
    }

    unique
}

/// Totales por gravedad de incidencias únicas
pub fn severity_totals(rows: &[IncidentRow]) -> SeverityCounts {
    let mut totals = SeverityCounts::default();
    for (_, severity, _) in unique_incidents(rows) {
        totals.increment(severity);
    }
    totals
}

/// Desglose por alumno de incidencias únicas, en orden de primera aparición
pub fn student_totals(rows: &[IncidentRow]) -> Vec<StudentTally> {
    let mut tallies: Vec<StudentTally> = Vec::new();

    for (_, severity, participants) in unique_incidents(rows) {
        for name in participants {
            let index = match tallies.iter().position(|t| t.student == name) {
                Some(index) => index,
                None => {
                    tallies.push(StudentTally {
                        student: name.to_string(),
                        counts: SeverityCounts::default(),
                    });
                    tallies.len() - 1
                }
            };
            tallies[index].counts.increment(severity);
        }
    }

    tallies
}
