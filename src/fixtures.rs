//! Datasheet fixtures shared by unit and end-to-end tests.

use std::path::Path;

use calamine::Data;
use rust_xlsxwriter::XlsxError;

use crate::car::{MAIN_PARAMETERS_SHEET, RESISTANCE_SHEET};
use crate::excel::{Sheet, Workbook};
use crate::locomotive::{BRAKING_SHEET, THERMAL_SHEET, TRACTION_SHEET};

pub type Cells = Vec<((u32, u32), Data)>;
pub type SheetCells = Vec<(&'static str, Cells)>;

fn text(s: &str) -> Data {
    Data::String(s.to_string())
}

fn row(row: u32, values: &[f64]) -> Cells {
    (2..)
        .zip(values)
        .map(|(col, v)| ((row, col), Data::Float(*v)))
        .collect()
}

pub fn car_sheets(name: &str, axles: f64) -> SheetCells {
    let main = vec![
        ((1, 2), text(name)),
        ((2, 2), Data::Float(axles)),
        ((3, 2), Data::Float(50.1234)),
        ((4, 2), Data::Float(12.3456)),
    ];
    let mut resistance = vec![((1, 1), text("Коэффициенты"))];
    resistance.extend(row(2, &[0.7, 3.0, 0.1, 0.0025]));
    resistance.extend(row(3, &[0.7, 3.0, 0.09, 0.002]));

    vec![
        (MAIN_PARAMETERS_SHEET, main),
        (RESISTANCE_SHEET, resistance),
    ]
}

fn block(first_row: u32, name: &str, samples: &[Vec<f64>]) -> Cells {
    let mut cells = vec![((first_row, 1), text(name))];
    for (offset, values) in (1..).zip(samples) {
        cells.extend(row(first_row + offset, values));
    }
    cells
}

/// A complete locomotive datasheet; `current_code` picks the AC or DC layout.
pub fn locomotive_sheets(name: &str, current_code: &str) -> SheetCells {
    let ac = current_code == "25000";
    let sample = |speed: f64, force: f64| -> Vec<f64> {
        if ac {
            vec![speed, force, 800.0, -5.0, 300.0]
        } else {
            vec![speed, force, 800.0, 300.0]
        }
    };

    let main = vec![
        ((1, 2), text(name)),
        ((2, 2), text("груз")),
        ((3, 2), text(current_code)),
        ((4, 2), Data::Float(6_160.0)),
        ((5, 2), Data::Float(192.0)),
        ((6, 2), Data::Float(32.8)),
        ((7, 2), Data::Float(110.0)),
        ((8, 2), text("НБ-418К6")),
        ((9, 2), Data::Float(120.0)),
        ((10, 2), Data::Float(40.0)),
    ];

    let mut resistance = Cells::new();
    resistance.extend(row(2, &[1.9, 0.01, 0.0003]));
    resistance.extend(row(3, &[2.4, 0.011, 0.000_35]));
    resistance.extend(row(4, &[1.9, 0.008, 0.000_25]));
    resistance.extend(row(5, &[2.4, 0.009, 0.0003]));

    let mut traction = block(
        2,
        "1 позиция",
        &[sample(0.0, 50_000.0), sample(10.0, 48_000.0)],
    );
    traction.extend(block(33, "2 позиция", &[sample(0.0, 60_000.0)]));

    let mut braking = block(
        2,
        "Ограничение",
        &[sample(90.0, 20_000.0), sample(60.0, 30_000.0)],
    );
    braking.extend(block(33, "Максимум", &[sample(90.0, 25_000.0)]));

    let mut thermal = vec![((2, 2), Data::Float(25.0))];
    thermal.extend(row(4, &[400.0, 600.0, 800.0]));
    thermal.extend(row(5, &[40.0, 75.0, 120.0]));

    vec![
        (MAIN_PARAMETERS_SHEET, main),
        (RESISTANCE_SHEET, resistance),
        (TRACTION_SHEET, traction),
        (BRAKING_SHEET, braking),
        (THERMAL_SHEET, thermal),
    ]
}

pub fn in_memory(sheets: &SheetCells) -> Workbook {
    Workbook::from_sheets(
        "fixture.xlsx",
        sheets
            .iter()
            .map(|(name, cells)| Sheet::from_cells(name, cells))
            .collect(),
    )
}

/// Replaces the cell at `pos` on sheet `name`, or adds it.
pub fn set_cell(sheets: &mut SheetCells, name: &str, pos: (u32, u32), value: Data) {
    if let Some((_, cells)) = sheets.iter_mut().find(|(n, _)| *n == name) {
        cells.retain(|(p, _)| *p != pos);
        if value != Data::Empty {
            cells.push((pos, value));
        }
    }
}

pub fn write_xlsx(path: &Path, sheets: &SheetCells) -> Result<(), XlsxError> {
    let mut workbook = rust_xlsxwriter::Workbook::new();
    for (name, cells) in sheets {
        let sheet = workbook.add_worksheet();
        sheet.set_name(*name)?;
        for ((r, c), value) in cells {
            let col = u16::try_from(c - 1).unwrap();
            match value {
                Data::Float(f) => {
                    sheet.write_number(r - 1, col, *f)?;
                }
                Data::String(s) => {
                    sheet.write_string(r - 1, col, s)?;
                }
                _ => {}
            }
        }
    }
    workbook.save(path)?;
    Ok(())
}
