//! Respaldo de la carpeta de datos en un ZIP

use std::fs::{self, File};
use std::io::{Read, Seek, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

use crate::utils::date::{display_timestamp, file_timestamp};
use crate::utils::path::unique_path;

/// Subcarpeta de la carpeta de datos donde quedan los respaldos
pub const BACKUP_DIR_NAME: &str = "respaldos";
const BACKUP_PREFIX: &str = "bitacora_respaldo_";

/// Tamaño legible
fn format_size(size: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    match size {
        b if b >= GB => format!("{:.1} GB", b as f64 / GB as f64),
        b if b >= MB => format!("{:.1} MB", b as f64 / MB as f64),
        b if b >= KB => format!("{:.1} KB", b as f64 / KB as f64),
        b => format!("{} B", b),
    }
}

/// Resultado de crear un respaldo
#[derive(Debug, Clone)]
pub struct BackupResult {
    pub path: PathBuf,
    pub size: u64,
    pub file_count: usize,
    pub created_at: String,
}

impl BackupResult {
    pub fn size_display(&self) -> String {
        format_size(self.size)
    }
}

/// Respaldo existente
#[derive(Debug, Clone)]
pub struct BackupInfo {
    pub path: PathBuf,
    pub filename: String,
    pub size: u64,
    /// Fecha tomada del nombre del archivo
    pub date: Option<String>,
}

impl BackupInfo {
    pub fn size_display(&self) -> String {
        format_size(self.size)
    }
}

pub struct BackupService {
    data_dir: PathBuf,
}

impl BackupService {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            data_dir: data_dir.to_path_buf(),
        }
    }

    pub fn backup_dir(&self) -> PathBuf {
        self.data_dir.join(BACKUP_DIR_NAME)
    }

    /// Comprimir la carpeta de datos completa, sin los respaldos anteriores
    pub fn create_backup(&self) -> Result<BackupResult> {
        let backup_dir = self.backup_dir();
        fs::create_dir_all(&backup_dir).context("No se pudo crear la carpeta de respaldos")?;

        let stem = format!("{}{}", BACKUP_PREFIX, file_timestamp());
        let backup_path = unique_path(&backup_dir, &stem, "zip");

        let file = File::create(&backup_path).context("No se pudo crear el archivo de respaldo")?;
        let mut zip = ZipWriter::new(file);

        let options = SimpleFileOptions::default()
            .compression_method(zip::CompressionMethod::Deflated)
            .compression_level(Some(6));

        let mut file_count = 0;

        let walker = WalkDir::new(&self.data_dir)
            .into_iter()
            .filter_entry(|e| e.path() != backup_dir.as_path());

        for entry in walker.filter_map(|e| e.ok()) {
            let path = entry.path();
            if path == self.data_dir.as_path() {
                continue;
            }
            let relative = path.strip_prefix(&self.data_dir).unwrap_or(path);
            let archive_name = relative.to_string_lossy().replace('\\', "/");

            if path.is_file() {
                add_file_to_zip(&mut zip, path, &archive_name, options)?;
                file_count += 1;
            } else if path.is_dir() {
                zip.add_directory(archive_name.as_str(), options)?;
            }
        }

        zip.finish().context("No se pudo cerrar el ZIP")?;

        let metadata = fs::metadata(&backup_path)?;
        tracing::info!("Respaldo creado: {:?} ({} archivos)", backup_path, file_count);

        Ok(BackupResult {
            path: backup_path,
            size: metadata.len(),
            file_count,
            created_at: display_timestamp(),
        })
    }

    /// Respaldos existentes, el más reciente primero
    pub fn list_backups(&self) -> Result<Vec<BackupInfo>> {
        let backup_dir = self.backup_dir();
        if !backup_dir.exists() {
            return Ok(Vec::new());
        }

        let mut backups = Vec::new();

        for entry in fs::read_dir(&backup_dir)? {
            let path = entry?.path();
            if path.extension().map(|e| e == "zip").unwrap_or(false) {
                let filename = path
                    .file_name()
                    .unwrap_or_default()
                    .to_string_lossy()
                    .to_string();
                let size = fs::metadata(&path)?.len();
                let date = extract_date_from_filename(&filename);

                backups.push(BackupInfo {
                    path,
                    filename,
                    size,
                    date,
                });
            }
        }

        backups.sort_by(|a, b| b.filename.cmp(&a.filename));
        Ok(backups)
    }

    pub fn delete_backup(&self, path: &Path) -> Result<()> {
        fs::remove_file(path).context("No se pudo borrar el respaldo")?;
        tracing::info!("Respaldo borrado: {:?}", path);
        Ok(())
    }
}

fn add_file_to_zip<W: Write + Seek>(
    zip: &mut ZipWriter<W>,
    file_path: &Path,
    archive_name: &str,
    options: SimpleFileOptions,
) -> Result<()> {
    zip.start_file(archive_name, options)?;

    let mut buffer = Vec::new();
    File::open(file_path)?.read_to_end(&mut buffer)?;
    zip.write_all(&buffer)?;

    Ok(())
}

/// bitacora_respaldo_AAAAMMDD_HHMMSS[_n].zip -> "AAAA-MM-DD HH:MM:SS"
fn extract_date_from_filename(filename: &str) -> Option<String> {
    let stamp = filename.strip_prefix(BACKUP_PREFIX)?.strip_suffix(".zip")?;
    let stamp = stamp.get(..15)?;
    NaiveDateTime::parse_from_str(stamp, "%Y%m%d_%H%M%S")
        .ok()
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_extract_date_from_filename() {
        assert_eq!(
            extract_date_from_filename("bitacora_respaldo_20260130_143022.zip"),
            Some("2026-01-30 14:30:22".to_string())
        );
        assert_eq!(
            extract_date_from_filename("bitacora_respaldo_20260130_143022_2.zip"),
            Some("2026-01-30 14:30:22".to_string())
        );
        assert_eq!(extract_date_from_filename("otro.zip"), None);
    }

    #[test]
    fn test_backup_skips_previous_backups() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("alumnos.json"), "[]").unwrap();
        fs::create_dir_all(dir.path().join("incidencias")).unwrap();
        fs::write(dir.path().join("incidencias").join("a.docx"), b"doc").unwrap();

        let service = BackupService::new(dir.path());
        let first = service.create_backup().unwrap();
        assert_eq!(first.file_count, 2);

        let second = service.create_backup().unwrap();
        assert_eq!(second.file_count, 2);

        let mut archive = zip::ZipArchive::new(File::open(&second.path).unwrap()).unwrap();
        assert!(archive.by_name("alumnos.json").is_ok());
        assert!(archive.by_name("incidencias/a.docx").is_ok());

        let listed = service.list_backups().unwrap();
        assert_eq!(listed.len(), 2);
        assert!(listed[0].filename >= listed[1].filename);

        service.delete_backup(&listed[0].path).unwrap();
        assert_eq!(service.list_backups().unwrap().len(), 1);
    }
}
