//! Libro de Excel en memoria
//!
//! Se lee completo con calamine y se reescribe completo con rust_xlsxwriter en
//! cada operación. El Dashboard guardado se vuelve a leer para que agregar o
//! borrar filas no lo pierda; cada escritura genera exactamente un gráfico de
//! pastel y, si hay alumnos, uno de barras. Hojas y columnas agregadas a mano se
//! conservan por valor (ver `preserved`); el Dashboard se reescribe completo.

use calamine::{open_workbook_auto, Data, Range, Reader};
use rust_xlsxwriter::{Chart, ChartType, ColNum, Format, FormatAlign, RowNum, Workbook, Worksheet};
use std::path::Path;

use super::absence::AbsenceSheet;
use super::dashboard::{DashboardSummary, StudentTally};
use super::layout::*;
use super::preserved::{remap_rows, remove_data_row, used_cells, write_cells, ExtraSheet, LooseCell};
use crate::models::{split_participants, IncidentRow, Severity, SeverityCounts};
use crate::utils::AppResult;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LedgerBook {
    pub incidents: Vec<IncidentRow>,
    pub absences: AbsenceSheet,
    pub dashboard: Option<DashboardSummary>,
    /// Celdas de Incidencias a partir de la columna G
    pub incident_extras: Vec<LooseCell>,
    /// Celdas de Registro de Faltas fuera de A..E y del resumen G/H
    pub absence_extras: Vec<LooseCell>,
    pub extra_sheets: Vec<ExtraSheet>,
}

impl LedgerBook {
    pub fn load(path: &Path) -> AppResult<Self> {
        let mut workbook = open_workbook_auto(path)?;

        // Sin la hoja Incidencias no hay libro que valga
        let range = workbook.worksheet_range(SHEET_INCIDENTS)?;
        let (kept, incidents): (Vec<RowNum>, Vec<IncidentRow>) =
            parse_incidents(&sheet_grid(&range)).into_iter().unzip();
        let own_cols = INCIDENT_HEADERS.len() as ColNum;
        let incident_extras = keep_extras(
            SHEET_INCIDENTS,
            used_cells(&range, |_, col| col >= own_cols),
            &kept,
        );

        let (absences, absence_extras) = match workbook.worksheet_range(SHEET_ABSENCES) {
            Ok(range) => load_absences(&range),
            Err(e) => {
                tracing::warn!("Hoja '{}' no disponible, se recrea vacía: {}", SHEET_ABSENCES, e);
                (AbsenceSheet::default(), Vec::new())
            }
        };

        let dashboard = match workbook.worksheet_range(SHEET_DASHBOARD) {
            Ok(range) => parse_dashboard(&sheet_grid(&range)),
            Err(e) => {
                tracing::warn!("Hoja '{}' no disponible: {}", SHEET_DASHBOARD, e);
                None
            }
        };

        let mut extra_sheets = Vec::new();
        for name in workbook.sheet_names() {
            if [SHEET_DASHBOARD, SHEET_INCIDENTS, SHEET_ABSENCES].contains(&name.as_str()) {
                continue;
            }
            match workbook.worksheet_range(&name) {
                Ok(range) => {
                    let cells = used_cells(&range, |_, _| true);
                    extra_sheets.push(ExtraSheet { name, cells });
                }
                Err(e) => tracing::warn!("La hoja '{}' no se puede leer y no se conservará: {}", name, e),
            }
        }
        if !extra_sheets.is_empty() {
            tracing::debug!("Se conservan {} hojas adicionales", extra_sheets.len());
        }

        Ok(Self {
            incidents,
            absences,
            dashboard,
            incident_extras,
            absence_extras,
            extra_sheets,
        })
    }

    pub fn save(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let mut workbook = Workbook::new();
        workbook.push_worksheet(self.dashboard_sheet()?);
        workbook.push_worksheet(self.incidents_sheet()?);
        workbook.push_worksheet(self.absences_sheet()?);
        for extra in &self.extra_sheets {
            let mut sheet = Worksheet::new();
            sheet.set_name(extra.name.as_str())?;
            write_cells(&mut sheet, &extra.cells)?;
            workbook.push_worksheet(sheet);
        }
        workbook.save(path)?;
        Ok(())
    }

    /// Quitar la incidencia en `position` junto con sus celdas adicionales
    pub fn remove_incident(&mut self, position: usize) -> Option<IncidentRow> {
        if position >= self.incidents.len() {
            return None;
        }
        remove_data_row(&mut self.incident_extras, position);
        Some(self.incidents.remove(position))
    }

    fn dashboard_sheet(&self) -> AppResult<Worksheet> {
        let mut sheet = Worksheet::new();
        sheet.set_name(SHEET_DASHBOARD)?;

        let title = Format::new()
            .set_bold()
            .set_font_size(14)
            .set_align(FormatAlign::Center);
        let header = Format::new().set_bold();

        let mut writer = SheetWriter::new(&mut sheet);
        writer.sheet().merge_range(0, 0, 0, 4, DASHBOARD_TITLE, &title)?;

        if let Some(summary) = &self.dashboard {
            let stamp = format!("{}{}", DASHBOARD_UPDATED_PREFIX, summary.updated_at);
            writer.sheet().write_string(1, 0, stamp.as_str())?;

            let top = DASHBOARD_TABLE_ROW;
            for (col, text) in DASHBOARD_TABLE_HEADERS.iter().enumerate() {
                writer.styled(top, col as ColNum, text, &header)?;
            }
            for (offset, severity) in Severity::ALL.iter().enumerate() {
                let row = top + 1 + offset as RowNum;
                writer.text(row, 0, severity.label())?;
                writer.number(row, 1, summary.totals.get(*severity))?;
            }
            let total_row = top + 1 + Severity::ALL.len() as RowNum;
            writer.styled(total_row, 0, "Total", &header)?;
            writer.number(total_row, 1, summary.totals.total())?;

            let first = top + 1;
            let last = top + Severity::ALL.len() as RowNum;
            let mut chart = Chart::new(ChartType::Pie);
            chart.title().set_name(DASHBOARD_CHART_TITLE);
            chart
                .add_series()
                .set_name(DASHBOARD_TABLE_HEADERS[1])
                .set_categories((SHEET_DASHBOARD, first, 0, last, 0))
                .set_values((SHEET_DASHBOARD, first, 1, last, 1));
            writer.sheet().insert_chart(top, 3, &chart)?;

            write_student_table(&mut writer, &summary.by_student, &header)?;
        }

        writer.finish()?;
        Ok(sheet)
    }

    fn incidents_sheet(&self) -> AppResult<Worksheet> {
        let mut sheet = Worksheet::new();
        sheet.set_name(SHEET_INCIDENTS)?;
        let header = Format::new().set_bold();

        let mut writer = SheetWriter::new(&mut sheet);
        for (col, text) in INCIDENT_HEADERS.iter().enumerate() {
            writer.styled(0, col as ColNum, text, &header)?;
        }

        for (index, incident) in self.incidents.iter().enumerate() {
            let row = index as RowNum + 1;
            writer.text(row, 0, &incident.date)?;
            writer.text(row, 1, &incident.time)?;
            writer.text(row, 2, &incident.location)?;
            writer.text(row, 3, &incident.severity)?;
            writer.text(row, 4, &incident.participants_joined())?;
            writer.link(row, 5, &incident.link)?;
        }

        writer.finish()?;
        write_cells(&mut sheet, &self.incident_extras)?;
        Ok(sheet)
    }

    fn absences_sheet(&self) -> AppResult<Worksheet> {
        let mut sheet = Worksheet::new();
        sheet.set_name(SHEET_ABSENCES)?;
        let header = Format::new().set_bold();

        let mut writer = SheetWriter::new(&mut sheet);
        for (col, text) in ABSENCE_HEADERS.iter().enumerate() {
            writer.styled(0, col as ColNum, text, &header)?;
        }

        match &self.absences {
            AbsenceSheet::Counters(rows) => {
                for (index, absence) in rows.iter().enumerate() {
                    let row = index as RowNum + 1;
                    writer.text(row, 0, &absence.student)?;
                    writer.number(row, 1, absence.total)?;
                    writer.number(row, 2, absence.counts.leve)?;
                    writer.number(row, 3, absence.counts.moderada)?;
                    writer.number(row, 4, absence.counts.grave)?;
                }
            }
            AbsenceSheet::Unreadable { cells, .. } => {
                for (index, line) in cells.iter().enumerate() {
                    for (col, value) in line.iter().enumerate() {
                        if !value.is_empty() {
                            writer.text(index as RowNum + 1, col as ColNum, value)?;
                        }
                    }
                }
            }
        }

        if let Some(summary) = self.absences.summary() {
            let col = ABSENCE_SUMMARY_COL;
            writer.styled(0, col, ABSENCE_SUMMARY_TITLE, &header)?;
            for (offset, (label, value)) in summary.entries().into_iter().enumerate() {
                let row = offset as RowNum + 1;
                writer.text(row, col, label)?;
                writer.number(row, col + 1, value)?;
            }
        }

        writer.finish()?;
        write_cells(&mut sheet, &self.absence_extras)?;
        Ok(sheet)
    }
}

/// Texto de una celda tal como se muestra
pub fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", *f as i64),
        Data::Float(f) => f.to_string(),
        Data::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}

/// Celdas de una hoja con coordenadas absolutas desde A1
fn sheet_grid(range: &Range<Data>) -> Vec<Vec<String>> {
    let Some((start_row, start_col)) = range.start() else {
        return Vec::new();
    };
    let (start_row, start_col) = (start_row as usize, start_col as usize);

    let mut grid = vec![Vec::new(); start_row];
    for row in range.rows() {
        let mut line = vec![String::new(); start_col];
        line.extend(row.iter().map(cell_text));
        grid.push(line);
    }
    grid
}

fn cell(grid: &[Vec<String>], row: usize, col: usize) -> &str {
    grid.get(row)
        .and_then(|line| line.get(col))
        .map(|s| s.trim())
        .unwrap_or("")
}

/// Filas de incidencias junto con la fila de hoja de donde salieron
fn parse_incidents(grid: &[Vec<String>]) -> Vec<(RowNum, IncidentRow)> {
    (1..grid.len())
        .filter(|&row| (0..INCIDENT_HEADERS.len()).any(|col| !cell(grid, row, col).is_empty()))
        .map(|row| {
            let incident = IncidentRow {
                date: cell(grid, row, 0).to_string(),
                time: cell(grid, row, 1).to_string(),
                location: cell(grid, row, 2).to_string(),
                severity: cell(grid, row, 3).to_string(),
                participants: split_participants(cell(grid, row, 4)),
                link: cell(grid, row, 5).to_string(),
            };
            (row as RowNum, incident)
        })
        .collect()
}

fn keep_extras(sheet: &str, cells: Vec<LooseCell>, kept: &[RowNum]) -> Vec<LooseCell> {
    let (cells, dropped) = remap_rows(cells, kept);
    if dropped > 0 {
        tracing::warn!(
            "Hoja '{}': {} celdas en filas sin datos propios no se conservarán",
            sheet,
            dropped
        );
    }
    cells
}

fn load_absences(range: &Range<Data>) -> (AbsenceSheet, Vec<LooseCell>) {
    let grid = sheet_grid(range);
    let data = grid
        .iter()
        .skip(1)
        .map(|row| row.iter().take(ABSENCE_HEADERS.len()).cloned().collect())
        .collect();
    let absences = AbsenceSheet::from_cells(data);

    let own_cols = ABSENCE_HEADERS.len() as ColNum;
    let summary_cols = ABSENCE_SUMMARY_COL..=ABSENCE_SUMMARY_COL + 1;

    let extras = match &absences {
        // Los contadores se reescriben compactos; el resumen G/H se recalcula
        AbsenceSheet::Counters(_) => {
            let cells = used_cells(range, |row, col| {
                col >= own_cols && !(row < ABSENCE_SUMMARY_ROWS && summary_cols.contains(&col))
            });
            let kept: Vec<RowNum> = (1..grid.len())
                .filter(|&row| !cell(&grid, row, 0).is_empty())
                .map(|row| row as RowNum)
                .collect();
            keep_extras(SHEET_ABSENCES, cells, &kept)
        }
        // Sin resumen: todo lo que no sea A..E vuelve a su lugar
        AbsenceSheet::Unreadable { .. } => used_cells(range, |_, col| col >= own_cols),
    };

    (absences, extras)
}

fn write_student_table(writer: &mut SheetWriter<'_>, tallies: &[StudentTally], header: &Format) -> AppResult<()> {
    let top = DASHBOARD_STUDENT_ROW;
    for (col, text) in DASHBOARD_STUDENT_HEADERS.iter().enumerate() {
        writer.styled(top, col as ColNum, text, header)?;
    }
    for (offset, tally) in tallies.iter().enumerate() {
        let row = top + 1 + offset as RowNum;
        writer.text(row, 0, &tally.student)?;
        for (col, severity) in Severity::ALL.iter().enumerate() {
            writer.number(row, col as ColNum + 1, tally.counts.get(*severity))?;
        }
        writer.number(row, 4, tally.counts.total())?;
    }

    if tallies.is_empty() {
        return Ok(());
    }

    let first = top + 1;
    let last = top + tallies.len() as RowNum;
    let mut chart = Chart::new(ChartType::Bar);
    chart.title().set_name(DASHBOARD_STUDENT_CHART_TITLE);
    chart.x_axis().set_name(DASHBOARD_STUDENT_HEADERS[0]);
    chart.y_axis().set_name("Número de incidencias");
    for col in 1..=Severity::ALL.len() as ColNum {
        chart
            .add_series()
            .set_name((SHEET_DASHBOARD, top, col))
            .set_categories((SHEET_DASHBOARD, first, 0, last, 0))
            .set_values((SHEET_DASHBOARD, first, col, last, col));
    }
    writer.sheet().insert_chart(top, DASHBOARD_STUDENT_CHART_COL, &chart)?;
    Ok(())
}

fn parse_dashboard(grid: &[Vec<String>]) -> Option<DashboardSummary> {
    let top = DASHBOARD_TABLE_ROW as usize;
    if cell(grid, top, 0) != DASHBOARD_TABLE_HEADERS[0] {
        return None;
    }

    let mut totals = SeverityCounts::default();
    for offset in 0..Severity::ALL.len() {
        let row = top + 1 + offset;
        if let Some(severity) = Severity::from_label(cell(grid, row, 0)) {
            let value = cell(grid, row, 1).parse::<u32>().unwrap_or(0);
            totals.set(severity, value);
        }
    }

    let updated_at = cell(grid, 1, 0)
        .trim_start_matches(DASHBOARD_UPDATED_PREFIX.trim_end())
        .trim()
        .to_string();

    Some(DashboardSummary {
        updated_at,
        totals,
        by_student: parse_student_table(grid),
    })
}

fn parse_student_table(grid: &[Vec<String>]) -> Vec<StudentTally> {
    let top = DASHBOARD_STUDENT_ROW as usize;
    if cell(grid, top, 0) != DASHBOARD_STUDENT_HEADERS[0] {
        return Vec::new();
    }

    ((top + 1)..grid.len())
        .take_while(|&row| !cell(grid, row, 0).is_empty())
        .map(|row| {
            let mut counts = SeverityCounts::default();
            for (col, severity) in Severity::ALL.iter().enumerate() {
                counts.set(*severity, cell(grid, row, col + 1).parse::<u32>().unwrap_or(0));
            }
            StudentTally {
                student: cell(grid, row, 0).to_string(),
                counts,
            }
        })
        .collect()
}
