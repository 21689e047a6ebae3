//! Car datasheet parsing.

use serde::Serialize;

use crate::error::{ConvertError, Result};
use crate::excel::{cell_ref, Workbook};
use crate::types::{kgf_to_n, round_to, AxleCount};

pub const MAIN_PARAMETERS_SHEET: &str = "Основные параметры";
pub const RESISTANCE_SHEET: &str = "Осн. удельн. сопр. движ.";

/// Decimal places of the four resistance coefficients, by position.
const RESISTANCE_PRECISIONS: [usize; 4] = [3, 3, 4, 7];
const FIRST_RESISTANCE_COLUMN: u32 = 2;
const COMPONENT_RAIL_ROW: u32 = 2;
const CONTINUOUS_RAIL_ROW: u32 = 3;

/// Basic resistance-to-motion coefficients of a car, in N.
///
/// The first coefficient is optional; the other three are always present.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CarResistance {
    pub component_rail: Vec<Option<f64>>,
    pub continuous_rail: Vec<Option<f64>>,
}

/// One car datasheet.
#[derive(Debug, Clone, PartialEq)]
pub struct Car {
    /// Display name, wrapped in `*` markers.
    pub name: String,
    pub axle_count: AxleCount,
    /// Not present on the datasheet and never written.
    pub self_weight: Option<f64>,
    pub weight: f64,
    pub length: f64,
    pub resistance: CarResistance,
}

impl Car {
    pub fn from_workbook(workbook: &Workbook) -> Result<Self> {
        let main = workbook.sheet(MAIN_PARAMETERS_SHEET)?;

        let name = format!("*{}*", main.string(1, 2)?);
        let axle_count = AxleCount::try_from(main.int(2, 2)?)?;
        let weight = round_to(main.float(3, 2)?, 3);
        let length = round_to(main.float(4, 2)?, 3);

        let resistance = parse_resistance(workbook)?;

        tracing::debug!(%name, axles = axle_count.code(), "car parsed");
        Ok(Self {
            name,
            axle_count,
            self_weight: None,
            weight,
            length,
            resistance,
        })
    }
}

fn parse_resistance(workbook: &Workbook) -> Result<CarResistance> {
    let sheet = workbook.sheet(RESISTANCE_SHEET)?;

    let mut resistance = CarResistance {
        component_rail: Vec::with_capacity(RESISTANCE_PRECISIONS.len()),
        continuous_rail: Vec::with_capacity(RESISTANCE_PRECISIONS.len()),
    };

    for (col, precision) in (FIRST_RESISTANCE_COLUMN..).zip(RESISTANCE_PRECISIONS) {
        let optional = col == FIRST_RESISTANCE_COLUMN;

        let coefficient = |row: u32| -> Result<Option<f64>> {
            match sheet.opt_float(row, col)? {
                Some(value) => Ok(Some(kgf_to_n(value, precision))),
                None if optional => Ok(None),
                None => Err(ConvertError::MissingCoefficient {
                    sheet: sheet.name().to_string(),
                    cell: cell_ref(row, col),
                }),
            }
        };

        resistance
            .component_rail
            .push(coefficient(COMPONENT_RAIL_ROW)?);
        resistance
            .continuous_rail
            .push(coefficient(CONTINUOUS_RAIL_ROW)?);
    }

    Ok(resistance)
}
