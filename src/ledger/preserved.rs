//! Contenido del libro que la bitácora no administra
//!
//! Hojas agregadas a mano y celdas fuera de las columnas propias se leen con
//! calamine y se vuelven a escribir en cada guardado. Sólo se conservan los
//! valores: formatos, fórmulas y gráficos ajenos se pierden.

use calamine::{Data, Range};
use rust_xlsxwriter::{ColNum, Format, RowNum, Worksheet};

use crate::utils::AppResult;

const DATE_FORMAT: &str = "yyyy-mm-dd";
const DATE_TIME_FORMAT: &str = "yyyy-mm-dd hh:mm";

/// Celda con valor en coordenadas absolutas (0 = A1)
#[derive(Debug, Clone, PartialEq)]
pub struct LooseCell {
    pub row: RowNum,
    pub col: ColNum,
    pub value: Data,
}

impl LooseCell {
    pub fn new(row: RowNum, col: ColNum, value: Data) -> Self {
        Self { row, col, value }
    }
}

/// Hoja agregada por el usuario
#[derive(Debug, Clone, PartialEq)]
pub struct ExtraSheet {
    pub name: String,
    pub cells: Vec<LooseCell>,
}

/// Celdas no vacías de una hoja que cumplen `keep(fila, columna)`
pub fn used_cells(range: &Range<Data>, keep: impl Fn(RowNum, ColNum) -> bool) -> Vec<LooseCell> {
    let Some((start_row, start_col)) = range.start() else {
        return Vec::new();
    };

    range
        .used_cells()
        .filter_map(|(row, col, value)| {
            let row = start_row + row as u32;
            let col = (start_col as usize + col) as ColNum;
            keep(row, col).then(|| LooseCell::new(row, col, value.clone()))
        })
        .collect()
}

/// Renumera las filas de datos: la fila de hoja `kept[i]` pasa a ser `i + 1`
///
/// El encabezado se queda en la fila 0. Devuelve cuántas celdas quedaron en
/// filas que ya no existen y se descartaron.
pub fn remap_rows(cells: Vec<LooseCell>, kept: &[RowNum]) -> (Vec<LooseCell>, usize) {
    let mut remapped = Vec::with_capacity(cells.len());
    let mut dropped = 0;

    for mut cell in cells {
        if cell.row == 0 {
            remapped.push(cell);
            continue;
        }
        match kept.iter().position(|&row| row == cell.row) {
            Some(index) => {
                cell.row = index as RowNum + 1;
                remapped.push(cell);
            }
            None => dropped += 1,
        }
    }

    (remapped, dropped)
}

/// Quita las celdas de la fila de datos `position` y sube las siguientes
pub fn remove_data_row(cells: &mut Vec<LooseCell>, position: usize) {
    let row = position as RowNum + 1;
    cells.retain(|cell| cell.row != row);
    for cell in cells.iter_mut() {
        if cell.row > row {
            cell.row -= 1;
        }
    }
}

pub fn write_cells(sheet: &mut Worksheet, cells: &[LooseCell]) -> AppResult<()> {
    let date = Format::new().set_num_format(DATE_FORMAT);
    let date_time = Format::new().set_num_format(DATE_TIME_FORMAT);

    for LooseCell { row, col, value } in cells {
        let (row, col) = (*row, *col);
        match value {
            Data::Empty => {}
            Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => {
                sheet.write_string(row, col, s.as_str())?;
            }
            Data::Float(f) => {
                sheet.write_number(row, col, *f)?;
            }
            Data::Int(i) => {
                sheet.write_number(row, col, *i as f64)?;
            }
            Data::Bool(b) => {
                sheet.write_boolean(row, col, *b)?;
            }
            Data::DateTime(dt) => {
                let serial = dt.as_f64();
                let format = if serial.fract() == 0.0 { &date } else { &date_time };
                sheet.write_number_with_format(row, col, serial, format)?;
            }
            other => {
                sheet.write_string(row, col, other.to_string())?;
            }
        }
    }

    Ok(())
}
