//! Nombres de hojas, encabezados y ancho de columnas del libro

use rust_xlsxwriter::{ColNum, Format, RowNum, Url, Worksheet};
use std::path::Path;

use crate::utils::AppResult;

pub const SHEET_DASHBOARD: &str = "Dashboard";
pub const SHEET_INCIDENTS: &str = "Incidencias";
pub const SHEET_ABSENCES: &str = "Registro de Faltas";

pub const DASHBOARD_TITLE: &str = "Dashboard de Incidencias";
pub const DASHBOARD_UPDATED_PREFIX: &str = "Actualizado: ";
pub const DASHBOARD_TABLE_HEADERS: [&str; 2] = ["Gravedad", "Incidencias"];
pub const DASHBOARD_CHART_TITLE: &str = "Distribución por Gravedad";
/// Fila (0-based) del encabezado de la tabla del Dashboard (A3)
pub const DASHBOARD_TABLE_ROW: RowNum = 2;
pub const DASHBOARD_STUDENT_HEADERS: [&str; 5] = ["Alumno", "Leves", "Moderadas", "Graves", "Total"];
pub const DASHBOARD_STUDENT_CHART_TITLE: &str = "Incidencias por Alumno";
/// Desglose por alumno en A20, debajo del gráfico de pastel
pub const DASHBOARD_STUDENT_ROW: RowNum = 19;
/// Columna G, junto al desglose
pub const DASHBOARD_STUDENT_CHART_COL: ColNum = 6;

pub const INCIDENT_HEADERS: [&str; 6] = ["Fecha", "Hora", "Lugar", "Gravedad", "Participantes", "Link al Documento"];
pub const ABSENCE_HEADERS: [&str; 5] = ["Alumno", "Total de Faltas", "Leve", "Moderada", "Grave"];
pub const ABSENCE_SUMMARY_TITLE: &str = "Resumen";
/// Columna G
pub const ABSENCE_SUMMARY_COL: ColNum = 6;
/// Filas que ocupa el resumen: título y cinco renglones
pub const ABSENCE_SUMMARY_ROWS: RowNum = 6;

pub const MIN_COLUMN_WIDTH: usize = 10;
pub const MAX_COLUMN_WIDTH: usize = 60;

/// Ancho para el texto más largo visto en una columna
pub fn column_width(max_chars: usize) -> f64 {
    (max_chars + 2).clamp(MIN_COLUMN_WIDTH, MAX_COLUMN_WIDTH) as f64
}

/// Vínculo file:/// al acta
pub fn file_url(path: &str) -> String {
    let normalized = path.replace('\\', "/");
    format!("file:///{}", normalized.trim_start_matches('/'))
}

/// Escribe celdas y recuerda el texto más largo de cada columna
pub struct SheetWriter<'a> {
    sheet: &'a mut Worksheet,
    widths: Vec<usize>,
}

impl<'a> SheetWriter<'a> {
    pub fn new(sheet: &'a mut Worksheet) -> Self {
        Self {
            sheet,
            widths: Vec::new(),
        }
    }

    fn observe(&mut self, col: ColNum, text: &str) {
        let col = col as usize;
        if self.widths.len() <= col {
            self.widths.resize(col + 1, 0);
        }
        let chars = text.chars().count();
        if chars > self.widths[col] {
            self.widths[col] = chars;
        }
    }

    pub fn text(&mut self, row: RowNum, col: ColNum, text: &str) -> AppResult<()> {
        self.observe(col, text);
        self.sheet.write_string(row, col, text)?;
        Ok(())
    }

    pub fn styled(&mut self, row: RowNum, col: ColNum, text: &str, format: &Format) -> AppResult<()> {
        self.observe(col, text);
        self.sheet.write_string_with_format(row, col, text, format)?;
        Ok(())
    }

    pub fn number(&mut self, row: RowNum, col: ColNum, value: u32) -> AppResult<()> {
        self.observe(col, &value.to_string());
        self.sheet.write_number(row, col, f64::from(value))?;
        Ok(())
    }

    /// Texto clicable que abre el acta
    pub fn link(&mut self, row: RowNum, col: ColNum, path: &str) -> AppResult<()> {
        if path.trim().is_empty() {
            return self.text(row, col, path);
        }
        self.observe(col, path);
        self.sheet
            .write_url(row, col, Url::new(file_url(path)).set_text(path))?;
        Ok(())
    }

    /// Acceso directo a la hoja; lo escrito aquí no cuenta para los anchos
    pub fn sheet(&mut self) -> &mut Worksheet {
        &mut *self.sheet
    }

    /// Aplica los anchos: máximo observado + 2, con piso y tope
    pub fn finish(self) -> AppResult<()> {
        for (col, chars) in self.widths.iter().enumerate() {
            self.sheet.set_column_width(col as ColNum, column_width(*chars))?;
        }
        Ok(())
    }
}

/// Ruta de un acta tal como se muestra en la hoja
pub fn link_text(path: &Path) -> String {
    path.display().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_width_floor_and_cap() {
        assert_eq!(column_width(0), MIN_COLUMN_WIDTH as f64);
        assert_eq!(column_width(20), 22.0);
        assert_eq!(column_width(500), MAX_COLUMN_WIDTH as f64);
    }

    #[test]
    fn test_file_url() {
        assert_eq!(file_url("/home/ana/Incidencia.docx"), "file:///home/ana/Incidencia.docx");
        assert_eq!(file_url("C:\\datos\\a.docx"), "file:///C:/datos/a.docx");
    }

    #[test]
    fn test_writer_tracks_longest_text() {
        let mut sheet = Worksheet::new();
        let mut writer = SheetWriter::new(&mut sheet);
        writer.text(0, 0, "Fecha").unwrap();
        writer.text(1, 0, "2024-05-01").unwrap();
        writer.number(1, 2, 12345).unwrap();
        assert_eq!(writer.widths, vec![10, 0, 5]);
        writer.finish().unwrap();
    }
}
