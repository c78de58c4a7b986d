use std::path::{Path, PathBuf};

const QUALIFIER: &str = "mx";
const ORGANIZATION: &str = "bitacora";
const APPLICATION: &str = "Bitacora";

/// Carpeta de datos (JSON, libro de Excel, actas)
pub fn get_data_dir() -> PathBuf {
    directories::ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION)
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("data"))
}

/// Ruta de settings.toml (preferencias de la interfaz)
pub fn get_settings_path() -> PathBuf {
    directories::ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION)
        .map(|dirs| dirs.config_dir().join("settings.toml"))
        .unwrap_or_else(|| PathBuf::from("settings.toml"))
}

/// Resuelve una ruta relativa contra la carpeta base
pub fn resolve_against(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

/// Normalizar ruta para mostrarla
pub fn display_path(path: &Path) -> String {
    // Abreviar el directorio personal como ~
    if let Some(home) = dirs::home_dir() {
        if let Ok(stripped) = path.strip_prefix(&home) {
            return format!("~/{}", stripped.display());
        }
    }
    path.display().to_string()
}

/// Nombre de archivo seguro a partir de un texto libre
pub fn sanitize_filename(name: &str) -> String {
    name.trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() || c.is_whitespace() => '_',
            c => c,
        })
        .collect()
}

/// Primera ruta libre: `base.ext`, `base_2.ext`, `base_3.ext`...
pub fn unique_path(dir: &Path, stem: &str, extension: &str) -> PathBuf {
    let first = dir.join(format!("{}.{}", stem, extension));
    if !first.exists() {
        return first;
    }

    let mut counter = 2;
    loop {
        let candidate = dir.join(format!("{}_{}.{}", stem, counter, extension));
        if !candidate.exists() {
            return candidate;
        }
        counter += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("Ana López"), "Ana_López");
        assert_eq!(sanitize_filename("a/b"), "a_b");
        assert_eq!(sanitize_filename("hora:10"), "hora_10");
        assert_eq!(sanitize_filename("  x<>y  "), "x__y");
    }

    #[test]
    fn test_resolve_against() {
        let base = Path::new("/datos");
        assert_eq!(resolve_against(base, Path::new("incidencias")), PathBuf::from("/datos/incidencias"));
        assert_eq!(resolve_against(base, Path::new("/otra")), PathBuf::from("/otra"));
    }

    #[test]
    fn test_unique_path_appends_counter() {
        let dir = tempdir().unwrap();
        let first = unique_path(dir.path(), "Incidencia", "docx");
        assert_eq!(first, dir.path().join("Incidencia.docx"));

        std::fs::write(&first, b"x").unwrap();
        let second = unique_path(dir.path(), "Incidencia", "docx");
        assert_eq!(second, dir.path().join("Incidencia_2.docx"));
    }
}
