//! Generación del acta de incidencia (.docx)

pub mod narrative;
pub mod signatures;

use docx_rs::{
    AlignmentType, Docx, PageMargin, Paragraph, Run, Table, TableCell, TableRow, VAlignType, WidthType,
};
use rand::Rng;
use std::fs::{self, File};
use std::path::{Path, PathBuf};

pub use signatures::{signature_block, SignatureLine};

use crate::models::{Incident, SchoolConfig, Student};
use crate::utils::date::file_timestamp;
use crate::utils::path::{sanitize_filename, unique_path};
use crate::utils::{AppError, AppResult};

// Medidas en twips (1" = 1440)
const PAGE_WIDTH: u32 = 12240;
const PAGE_HEIGHT: u32 = 15840;
const MARGIN: i32 = 1440;
const SIGNATURE_COLUMNS: usize = 2;
const SIGNATURE_COLUMN_WIDTH: usize = 4680;

// Tamaños en medios puntos
const TITLE_SIZE: usize = 28;
const SIGNATURE_ROLE_SIZE: usize = 20;
const SIGNATURE_NAME_SIZE: usize = 18;

const SIGNATURE_RULE: &str = "____________________";

/// Tope en bytes para los nombres dentro del nombre de archivo
const MAX_NAMES_BYTES: usize = 120;

/// Escribe las actas en la carpeta de salida
#[derive(Debug, Clone)]
pub struct DocumentComposer {
    output_dir: PathBuf,
}

impl DocumentComposer {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Generar el acta con redacción variada y devolver su ruta
    pub fn compose(&self, incident: &Incident, config: &SchoolConfig, students: &[Student]) -> AppResult<PathBuf> {
        self.compose_with(incident, config, students, &mut rand::rng())
    }

    pub fn compose_with<R: Rng>(
        &self,
        incident: &Incident,
        config: &SchoolConfig,
        students: &[Student],
        rng: &mut R,
    ) -> AppResult<PathBuf> {
        if incident.participants.is_empty() {
            return Err(AppError::validation("El acta necesita al menos un participante"));
        }

        let narrative = narrative::compose(incident, config, rng);
        let docx = render(incident, config, students, &narrative);

        fs::create_dir_all(&self.output_dir)?;
        let stem = file_stem(&incident.participants, &file_timestamp());
        let path = unique_path(&self.output_dir, &stem, "docx");

        let file = File::create(&path)?;
        docx.build()
            .pack(file)
            .map_err(|e| AppError::document(e.to_string()))?;

        tracing::info!("Acta generada: {:?}", path);
        Ok(path)
    }
}

/// `Incidencia_<participantes>_<marca de tiempo>`
///
/// Con muchos participantes los nombres se recortan a `MAX_NAMES_BYTES`.
pub fn file_stem(participants: &[String], timestamp: &str) -> String {
    let names: Vec<String> = participants
        .iter()
        .map(|name| sanitize_filename(name))
        .filter(|name| !name.is_empty())
        .collect();

    let mut joined = names.join("_");
    if joined.len() > MAX_NAMES_BYTES {
        let mut cut = MAX_NAMES_BYTES;
        while !joined.is_char_boundary(cut) {
            cut -= 1;
        }
        joined.truncate(cut);
        let kept = joined.trim_end_matches('_').len();
        joined.truncate(kept);
    }

    format!("Incidencia_{}_{}", joined, timestamp)
}

/// Documento completo: membrete, narración y firmas
pub fn render(incident: &Incident, config: &SchoolConfig, students: &[Student], narrative: &str) -> Docx {
    let title = Paragraph::new()
        .add_run(
            Run::new()
                .add_text(format!("BITÁCORA DE INCIDENCIA - {}", config.school_name))
                .bold()
                .size(TITLE_SIZE),
        )
        .align(AlignmentType::Center);

    let location = Paragraph::new()
        .add_run(Run::new().add_text(config.location.as_str()).italic())
        .align(AlignmentType::Center);

    let body = Paragraph::new()
        .add_run(Run::new().add_text(narrative))
        .align(AlignmentType::Both);

    let lines = signature_block(incident.severity, &incident.participants, config, students);

    Docx::new()
        .page_size(PAGE_WIDTH, PAGE_HEIGHT)
        .page_margin(
            PageMargin::new()
                .top(MARGIN)
                .bottom(MARGIN)
                .left(MARGIN)
                .right(MARGIN),
        )
        .add_paragraph(title)
        .add_paragraph(location)
        .add_paragraph(Paragraph::new())
        .add_paragraph(body)
        .add_paragraph(Paragraph::new())
        .add_paragraph(Paragraph::new())
        .add_table(signature_table(&lines))
}

fn signature_table(lines: &[SignatureLine]) -> Table {
    let rows = lines
        .chunks(SIGNATURE_COLUMNS)
        .map(|chunk| {
            let mut cells: Vec<TableCell> = chunk.iter().map(signature_cell).collect();
            // Fila impar: la última casilla queda vacía
            while cells.len() < SIGNATURE_COLUMNS {
                cells.push(
                    TableCell::new()
                        .width(SIGNATURE_COLUMN_WIDTH, WidthType::Dxa)
                        .add_paragraph(Paragraph::new()),
                );
            }
            TableRow::new(cells)
        })
        .collect();

    Table::new(rows).set_grid(vec![SIGNATURE_COLUMN_WIDTH; SIGNATURE_COLUMNS])
}

fn signature_cell(line: &SignatureLine) -> TableCell {
    TableCell::new()
        .width(SIGNATURE_COLUMN_WIDTH, WidthType::Dxa)
        .vertical_align(VAlignType::Center)
        .add_paragraph(
            Paragraph::new()
                .add_run(Run::new().add_text(line.role.as_str()).bold().size(SIGNATURE_ROLE_SIZE))
                .align(AlignmentType::Center),
        )
        .add_paragraph(Paragraph::new())
        .add_paragraph(
            Paragraph::new()
                .add_run(Run::new().add_text(SIGNATURE_RULE))
                .align(AlignmentType::Center),
        )
        .add_paragraph(
            Paragraph::new()
                .add_run(Run::new().add_text(line.name.as_str()).size(SIGNATURE_NAME_SIZE))
                .align(AlignmentType::Center),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Severity;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::io::Read;
    use tempfile::tempdir;

    fn incident(severity: Severity) -> Incident {
        Incident {
            date: "2024-05-02".into(),
            time: "10:15".into(),
            location: "Patio".into(),
            activity: "el recreo".into(),
            incident_type: "Pelea".into(),
            severity,
            participants: vec!["Ana López".into(), "Luis".into()],
            narrative: "Se empujaron en la fila".into(),
            measures: "Plática".into(),
            follow_up: String::new(),
        }
    }

    fn document_xml(path: &Path) -> String {
        let mut archive = zip::ZipArchive::new(File::open(path).unwrap()).unwrap();
        let mut xml = String::new();
        archive
            .by_name("word/document.xml")
            .unwrap()
            .read_to_string(&mut xml)
            .unwrap();
        xml
    }

    #[test]
    fn test_file_stem() {
        let names = vec!["Ana López".to_string(), "Luis/Pérez".to_string()];
        assert_eq!(
            file_stem(&names, "20240502_101500"),
            "Incidencia_Ana_López_Luis_Pérez_20240502_101500"
        );
    }

    #[test]
    fn test_file_stem_caps_long_name_lists() {
        let names: Vec<String> = (1..=9)
            .map(|i| format!("María Fernanda López Hernández {}", i))
            .collect();
        let stem = file_stem(&names, "20240502_101500");

        let middle = stem
            .strip_prefix("Incidencia_")
            .and_then(|s| s.strip_suffix("_20240502_101500"))
            .unwrap();
        assert!(middle.len() <= MAX_NAMES_BYTES);
        assert!(middle.starts_with("María_Fernanda_López_Hernández_1_"));
        assert!(!middle.ends_with('_'));
    }

    #[test]
    fn test_many_participants_still_produce_a_document() {
        let dir = tempdir().unwrap();
        let composer = DocumentComposer::new(dir.path());
        let mut inc = incident(Severity::Moderada);
        inc.participants = (1..=9)
            .map(|i| format!("María Fernanda López Hernández {}", i))
            .collect();

        let path = composer
            .compose_with(&inc, &SchoolConfig::default(), &[], &mut StdRng::seed_from_u64(5))
            .unwrap();
        assert!(path.exists());
        assert!(path.file_name().unwrap().len() < 255);

        // Todos figuran en el acta aunque el nombre del archivo se recorte
        let xml = document_xml(&path);
        assert!(xml.contains("María Fernanda López Hernández 9"));
    }

    #[test]
    fn test_compose_writes_document() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("incidencias");
        let composer = DocumentComposer::new(&out);
        let config = SchoolConfig {
            school_name: "Telesecundaria 149".into(),
            ..Default::default()
        };

        let path = composer
            .compose_with(&incident(Severity::Grave), &config, &[], &mut StdRng::seed_from_u64(1))
            .unwrap();

        assert!(path.starts_with(&out));
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("Incidencia_Ana_López_Luis_"));
        assert!(name.ends_with(".docx"));

        let xml = document_xml(&path);
        assert!(xml.contains("BITÁCORA DE INCIDENCIA - Telesecundaria 149"));
        assert!(xml.contains("Pelea"));
        assert!(xml.contains("Plática"));
        assert!(xml.contains("Padre/Madre de familia (Luis)"));
        assert!(xml.contains("Testigo"));
    }

    #[test]
    fn test_leve_document_has_no_director() {
        let dir = tempdir().unwrap();
        let composer = DocumentComposer::new(dir.path());
        let path = composer
            .compose(&incident(Severity::Leve), &SchoolConfig::default(), &[])
            .unwrap();

        let xml = document_xml(&path);
        assert!(xml.contains("Maestro de Grupo"));
        assert!(!xml.contains("Director/a"));
    }

    #[test]
    fn test_same_second_does_not_overwrite() {
        let dir = tempdir().unwrap();
        let composer = DocumentComposer::new(dir.path());
        let mut rng = StdRng::seed_from_u64(3);
        let first = composer
            .compose_with(&incident(Severity::Leve), &SchoolConfig::default(), &[], &mut rng)
            .unwrap();
        let second = composer
            .compose_with(&incident(Severity::Leve), &SchoolConfig::default(), &[], &mut rng)
            .unwrap();
        assert_ne!(first, second);
        assert!(first.exists() && second.exists());
    }

    #[test]
    fn test_requires_participants() {
        let dir = tempdir().unwrap();
        let composer = DocumentComposer::new(dir.path().join("nada"));
        let mut inc = incident(Severity::Leve);
        inc.participants.clear();
        assert!(composer.compose(&inc, &SchoolConfig::default(), &[]).is_err());
        assert!(!dir.path().join("nada").exists());
    }
}
