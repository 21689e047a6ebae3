//! Locomotive datasheet parsing.
//!
//! A locomotive workbook holds five sheets: main parameters, basic
//! resistance to motion, traction characteristics, regenerative braking
//! characteristics and motor thermal characteristics. The current kind read
//! from the main sheet selects the AC or DC layout of the curve sheets.

use serde::Serialize;

use crate::car::{MAIN_PARAMETERS_SHEET, RESISTANCE_SHEET};
use crate::error::{ConvertError, Result};
use crate::excel::{Sheet, Workbook};
use crate::scanner::{scan_blocks, ElectricalPosition};
use crate::types::{kgf_to_n, CurrentKind, ElectricalCharacteristic, LocomotiveType};

pub const TRACTION_SHEET: &str = "Хар. тяг. режима";
pub const BRAKING_SHEET: &str = "Хар. рекуп. торм.";
pub const THERMAL_SHEET: &str = "Тепловые хар. двиг.";

const RESISTANCE_PRECISIONS: [usize; 3] = [4, 5, 7];

const DEFAULT_OVERHEAT_TOLERANCE: f64 = 100.0;
const DEFAULT_THERMAL_TIME_CONSTANT: f64 = 20.0;
const THERMAL_AMPERAGE_ROW: u32 = 4;
const THERMAL_OVERHEAT_ROW: u32 = 5;
/// Columns B..=R.
const THERMAL_COLUMNS: std::ops::RangeInclusive<u32> = 2..=18;

/// Scalar parameters from the main sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct MainParameters {
    /// Display name, wrapped in `*` markers.
    pub name: String,
    pub locomotive_type: LocomotiveType,
    pub current: CurrentKind,
    pub power: f64,
    pub weight: f64,
    pub length: f64,
    pub max_speed: i64,
    pub motor_type: Option<String>,
    pub power_self_consumption: Option<f64>,
    pub amperage_self_consumption: Option<f64>,
}

impl MainParameters {
    pub fn parse(sheet: &Sheet) -> Result<Self> {
        let name = format!("*{}*", sheet.string(1, 2)?);
        let locomotive_type = sheet.string(2, 2)?.parse::<LocomotiveType>()?;
        let current = sheet.string(3, 2)?.parse::<CurrentKind>()?;
        let power = sheet.opt_float(4, 2)?.unwrap_or(0.0);
        let weight = sheet.float(5, 2)?;
        let length = sheet.float(6, 2)?;
        let max_speed = sheet.int(7, 2)?;
        let motor_type = sheet.opt_string(8, 2);
        let amperage_self_consumption = sheet.opt_float(10, 2)?;

        // DC units rate self-consumption in amperes; power is only kept when
        // no amperage is given.
        let power_self_consumption =
            if current == CurrentKind::Alternating || amperage_self_consumption.is_none() {
                sheet.opt_float(9, 2)?
            } else {
                None
            };

        Ok(Self {
            name,
            locomotive_type,
            current,
            power,
            weight,
            length,
            max_speed,
            motor_type,
            power_self_consumption,
            amperage_self_consumption,
        })
    }
}

/// Coefficients of the three-term resistance formula, in N.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RailCoefficients {
    pub component_rail: [f64; 3],
    pub continuous_rail: [f64; 3],
}

/// Basic resistance to motion while idling and under power.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocomotiveResistance {
    pub idle_resistance_coefficients: RailCoefficients,
    pub motoring_resistance_coefficients: RailCoefficients,
}

impl LocomotiveResistance {
    pub fn parse(sheet: &Sheet) -> Result<Self> {
        Ok(Self {
            idle_resistance_coefficients: RailCoefficients {
                component_rail: read_coefficients(sheet, 3)?,
                continuous_rail: read_coefficients(sheet, 5)?,
            },
            motoring_resistance_coefficients: RailCoefficients {
                component_rail: read_coefficients(sheet, 2)?,
                continuous_rail: read_coefficients(sheet, 4)?,
            },
        })
    }
}

fn read_coefficients(sheet: &Sheet, row: u32) -> Result<[f64; 3]> {
    let mut coefficients = [0.0; 3];
    for ((slot, col), precision) in coefficients
        .iter_mut()
        .zip(2..)
        .zip(RESISTANCE_PRECISIONS)
    {
        *slot = kgf_to_n(sheet.float(row, col)?, precision);
    }
    Ok(coefficients)
}

impl ElectricalPosition {
    /// Loads every tractive position from the traction sheet.
    pub fn load_all(sheet: &Sheet, current: CurrentKind) -> Result<Vec<Self>> {
        scan_blocks(sheet, current)
    }
}

/// Regenerative braking curves: the limiting curve, then the maximum one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BrakingCharacteristics {
    pub limit: Vec<ElectricalCharacteristic>,
    pub max: Vec<ElectricalCharacteristic>,
}

impl BrakingCharacteristics {
    /// The sheet must hold exactly two blocks.
    pub fn parse(sheet: &Sheet, current: CurrentKind) -> Result<Self> {
        let blocks = scan_blocks(sheet, current)?;
        match <[ElectricalPosition; 2]>::try_from(blocks) {
            Ok([limit, max]) => Ok(Self {
                limit: limit.characteristics,
                max: max.characteristics,
            }),
            Err(blocks) => Err(ConvertError::BrakingBlockCount(blocks.len())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MotorThermalCharacteristic {
    pub motor_amperage: f64,
    pub balancing_overheat: f64,
}

/// Traction motor heating model.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MotorThermalCharacteristics {
    pub overheat_tolerance: f64,
    pub thermal_time_constant: f64,
    pub characteristics: Vec<MotorThermalCharacteristic>,
}

impl MotorThermalCharacteristics {
    /// Blank or zero tolerance and time constant fall back to 100 and 20.
    pub fn parse(sheet: &Sheet) -> Result<Self> {
        let overheat_tolerance = non_zero(sheet.opt_float(1, 2)?)
            .unwrap_or(DEFAULT_OVERHEAT_TOLERANCE);
        let thermal_time_constant = non_zero(sheet.opt_float(2, 2)?)
            .unwrap_or(DEFAULT_THERMAL_TIME_CONSTANT);

        let mut characteristics = Vec::new();
        for col in THERMAL_COLUMNS {
            let Some(motor_amperage) = sheet.opt_float(THERMAL_AMPERAGE_ROW, col)? else {
                break;
            };
            characteristics.push(MotorThermalCharacteristic {
                motor_amperage,
                balancing_overheat: sheet.float(THERMAL_OVERHEAT_ROW, col)?,
            });
        }

        Ok(Self {
            overheat_tolerance,
            thermal_time_constant,
            characteristics,
        })
    }
}

fn non_zero(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.abs() > 0.0)
}

/// One locomotive datasheet.
#[derive(Debug, Clone, PartialEq)]
pub struct Locomotive {
    pub main: MainParameters,
    pub resistance: LocomotiveResistance,
    pub traction: Vec<ElectricalPosition>,
    pub braking: BrakingCharacteristics,
    pub thermal: MotorThermalCharacteristics,
}

impl Locomotive {
    pub fn from_workbook(workbook: &Workbook) -> Result<Self> {
        let main = MainParameters::parse(workbook.sheet(MAIN_PARAMETERS_SHEET)?)?;
        let current = main.current;

        let resistance = LocomotiveResistance::parse(workbook.sheet(RESISTANCE_SHEET)?)?;
        let traction = ElectricalPosition::load_all(workbook.sheet(TRACTION_SHEET)?, current)?;
        let braking = BrakingCharacteristics::parse(workbook.sheet(BRAKING_SHEET)?, current)?;
        let thermal = MotorThermalCharacteristics::parse(workbook.sheet(THERMAL_SHEET)?)?;

        tracing::debug!(
            name = %main.name,
            current = current.code(),
            positions = traction.len(),
            "locomotive parsed"
        );
        Ok(Self {
            main,
            resistance,
            traction,
            braking,
            thermal,
        })
    }

    pub fn name(&self) -> &str {
        &self.main.name
    }
}
