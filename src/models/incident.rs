use serde::{Deserialize, Serialize};
use std::fmt;

/// Separador de participantes dentro de una celda
pub const PARTICIPANT_SEPARATOR: &str = ", ";

/// Gravedad de una incidencia (ordenada de menor a mayor)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Severity {
    Leve,
    Moderada,
    Grave,
}

impl Severity {
    pub const ALL: [Severity; 3] = [Self::Leve, Self::Moderada, Self::Grave];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Leve => "Leve",
            Self::Moderada => "Moderada",
            Self::Grave => "Grave",
        }
    }

    /// Interpreta el texto guardado en la hoja (sin distinguir mayúsculas)
    pub fn from_label(s: &str) -> Option<Self> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|severity| severity.label().eq_ignore_ascii_case(s))
    }

    /// Requiere firma del director
    pub fn requires_director(&self) -> bool {
        matches!(self, Self::Moderada | Self::Grave)
    }

    /// Requiere firma de los tutores
    pub fn requires_guardians(&self) -> bool {
        matches!(self, Self::Grave)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Conteo por gravedad
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SeverityCounts {
    pub leve: u32,
    pub moderada: u32,
    pub grave: u32,
}

impl SeverityCounts {
    pub fn get(&self, severity: Severity) -> u32 {
        match severity {
            Severity::Leve => self.leve,
            Severity::Moderada => self.moderada,
            Severity::Grave => self.grave,
        }
    }

    pub fn set(&mut self, severity: Severity, value: u32) {
        match severity {
            Severity::Leve => self.leve = value,
            Severity::Moderada => self.moderada = value,
            Severity::Grave => self.grave = value,
        }
    }

    pub fn increment(&mut self, severity: Severity) {
        self.set(severity, self.get(severity) + 1);
    }

    pub fn total(&self) -> u32 {
        self.leve + self.moderada + self.grave
    }
}

impl std::ops::AddAssign for SeverityCounts {
    fn add_assign(&mut self, other: Self) {
        self.leve += other.leve;
        self.moderada += other.moderada;
        self.grave += other.grave;
    }
}

/// Incidencia validada, lista para generar el acta y registrarla
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Incident {
    pub date: String,
    pub time: String,
    pub location: String,
    pub activity: String,
    pub incident_type: String,
    pub severity: Severity,
    pub participants: Vec<String>,
    pub narrative: String,
    pub measures: String,
    pub follow_up: String,
}

impl Incident {
    pub fn participants_joined(&self) -> String {
        self.participants.join(PARTICIPANT_SEPARATOR)
    }

    /// Fila de la hoja Incidencias con el vínculo al acta generada
    pub fn to_ledger_row(&self, link: impl Into<String>) -> IncidentRow {
        IncidentRow {
            date: self.date.clone(),
            time: self.time.clone(),
            location: self.location.clone(),
            severity: self.severity.label().to_string(),
            participants: self.participants.clone(),
            link: link.into(),
        }
    }
}

/// Fila de la hoja Incidencias
///
/// La gravedad se conserva como texto para no perder filas editadas a mano.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncidentRow {
    pub date: String,
    pub time: String,
    pub location: String,
    pub severity: String,
    pub participants: Vec<String>,
    pub link: String,
}

impl IncidentRow {
    pub fn severity_level(&self) -> Option<Severity> {
        Severity::from_label(&self.severity)
    }

    pub fn participants_joined(&self) -> String {
        self.participants.join(PARTICIPANT_SEPARATOR)
    }

    /// Texto de una línea para listas
    pub fn display(&self) -> String {
        format!(
            "{} {} | {} | {} | {}",
            self.date,
            self.time,
            self.location,
            self.severity,
            self.participants_joined()
        )
    }
}

/// Separa la celda de participantes
///
/// Por eso los nombres de alumno no admiten comas (ver `Student::validate`).
pub fn split_participants(cell: &str) -> Vec<String> {
    cell.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Incident {
        Incident {
            date: "2024-05-02".into(),
            time: "10:15".into(),
            location: "Patio".into(),
            activity: "el recreo".into(),
            incident_type: "Pelea".into(),
            severity: Severity::Moderada,
            participants: vec!["Ana".into(), "Luis".into()],
            narrative: "Discutieron".into(),
            measures: String::new(),
            follow_up: String::new(),
        }
    }

    #[test]
    fn test_severity_labels() {
        assert_eq!(Severity::from_label("grave"), Some(Severity::Grave));
        assert_eq!(Severity::from_label(" Leve "), Some(Severity::Leve));
        assert_eq!(Severity::from_label("Alta"), None);
        assert!(Severity::Leve < Severity::Moderada && Severity::Moderada < Severity::Grave);
    }

    #[test]
    fn test_signature_policy_flags() {
        assert!(!Severity::Leve.requires_director());
        assert!(Severity::Moderada.requires_director());
        assert!(!Severity::Moderada.requires_guardians());
        assert!(Severity::Grave.requires_guardians());
    }

    #[test]
    fn test_severity_counts() {
        let mut counts = SeverityCounts::default();
        counts.increment(Severity::Leve);
        counts.increment(Severity::Grave);
        counts.increment(Severity::Grave);
        assert_eq!(counts.get(Severity::Grave), 2);
        assert_eq!(counts.total(), 3);

        let mut sum = SeverityCounts::default();
        sum += counts;
        sum += counts;
        assert_eq!(sum.leve, 2);
        assert_eq!(sum.total(), 6);
    }

    #[test]
    fn test_ledger_row_and_display() {
        let row = sample().to_ledger_row("incidencias/a.docx");
        assert_eq!(row.severity, "Moderada");
        assert_eq!(row.participants_joined(), "Ana, Luis");
        assert_eq!(row.display(), "2024-05-02 10:15 | Patio | Moderada | Ana, Luis");
        assert_eq!(row.severity_level(), Some(Severity::Moderada));
    }

    #[test]
    fn test_split_participants() {
        assert_eq!(split_participants("Ana, Luis,Pedro "), vec!["Ana", "Luis", "Pedro"]);
        assert!(split_participants("  ").is_empty());
    }
}
