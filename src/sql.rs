//! SQL rendering of parsed datasheets.
//!
//! Nested records are embedded as compact JSON text literals.

use std::fmt;

use serde::Serialize;

use crate::car::Car;
use crate::error::Result;
use crate::locomotive::Locomotive;

pub const CAR_TABLE: &str = "asu_ter_k_main_car";
pub const LOCOMOTIVE_TABLE: &str = "asu_ter.asu_ter_k_main_locomotive";

const CAR_COLUMNS: &str =
    "active, change_time, name, number_of_axles, weight, length, resistance_to_motion";

const LOCOMOTIVE_COLUMNS: &str = "active, change_time, name, current, type, power, weight, length, \
max_speed, motor_type, power_self_consumption, amperage_self_consumption, \
motor_thermal_characteristics, resistance_to_motion, electrical_characteristics, \
braking_characteristics";

/// A literal in a `VALUES` list.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    /// Inserted verbatim, e.g. `now()`.
    Expr(&'static str),
}

impl SqlValue {
    /// Serializes `value` to JSON and wraps it as a text literal.
    pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<Self> {
        Ok(Self::Text(serde_json::to_string(value)?))
    }
}

impl fmt::Display for SqlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("NULL"),
            Self::Bool(true) => f.write_str("TRUE"),
            Self::Bool(false) => f.write_str("FALSE"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) if x.is_finite() => write!(f, "{x}"),
            Self::Float(_) => f.write_str("NULL"),
            Self::Text(s) => write!(f, "'{}'", s.replace('\'', "''")),
            Self::Expr(e) => f.write_str(e),
        }
    }
}

impl From<bool> for SqlValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for SqlValue {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<f64> for SqlValue {
    fn from(x: f64) -> Self {
        Self::Float(x)
    }
}

impl From<&str> for SqlValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl<T: Into<Self>> From<Option<T>> for SqlValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

fn join(values: &[SqlValue], separator: &str) -> String {
    values
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(separator)
}

/// One `(...)` value tuple for the multi-row car insert.
pub fn car_row(car: &Car) -> Result<String> {
    let values = [
        SqlValue::Bool(true),
        SqlValue::Expr("now()"),
        car.name.as_str().into(),
        car.axle_count.code().into(),
        car.weight.into(),
        car.length.into(),
        SqlValue::json(&car.resistance)?,
    ];
    Ok(format!("({})", join(&values, ", ")))
}

/// A single `INSERT` covering all cars. `cars` must not be empty.
pub fn cars_insert(cars: &[Car]) -> Result<String> {
    let rows = cars.iter().map(car_row).collect::<Result<Vec<_>>>()?;
    Ok(format!(
        "INSERT INTO {CAR_TABLE} ({CAR_COLUMNS}) VALUES\n{};",
        rows.join(",\n")
    ))
}

/// A standalone `INSERT` for one locomotive.
pub fn locomotive_insert(loco: &Locomotive) -> Result<String> {
    let main = &loco.main;
    let values = [
        SqlValue::Bool(true),
        SqlValue::Expr("now()"),
        main.name.as_str().into(),
        main.current.code().into(),
        main.locomotive_type.code().into(),
        main.power.into(),
        main.weight.into(),
        main.length.into(),
        main.max_speed.into(),
        main.motor_type.clone().into(),
        main.power_self_consumption.into(),
        main.amperage_self_consumption.into(),
        SqlValue::json(&loco.thermal)?,
        SqlValue::json(&loco.resistance)?,
        SqlValue::json(&loco.traction)?,
        SqlValue::json(&loco.braking)?,
    ];

    Ok(format!(
        "INSERT INTO {LOCOMOTIVE_TABLE} ({LOCOMOTIVE_COLUMNS})\nVALUES (\n    {}\n);",
        join(&values, ",\n    ")
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{car_sheets, in_memory, locomotive_sheets};
    use pretty_assertions::assert_eq;

    #[test]
    fn literals_render_as_sql() {
        assert_eq!(SqlValue::Null.to_string(), "NULL");
        assert_eq!(SqlValue::from(Some(1.5)).to_string(), "1.5");
        assert_eq!(SqlValue::from(None::<f64>).to_string(), "NULL");
        assert_eq!(SqlValue::from(110_i64).to_string(), "110");
        assert_eq!(SqlValue::from(9.8e-7).to_string(), "0.00000098");
        assert_eq!(SqlValue::from(f64::NAN).to_string(), "NULL");
        assert_eq!(SqlValue::Expr("now()").to_string(), "now()");
    }

    #[test]
    fn text_escapes_single_quotes() {
        assert_eq!(SqlValue::from("*O'Brien*").to_string(), "'*O''Brien*'");
    }

    #[test]
    fn json_keeps_non_ascii() {
        let value = SqlValue::json(&["позиция"]).unwrap();
        assert_eq!(value.to_string(), r#"'["позиция"]'"#);
    }

    #[test]
    fn car_row_matches_column_order() {
        let car = Car::from_workbook(&in_memory(&car_sheets("Test", 4.0))).unwrap();
        assert_eq!(
            car_row(&car).unwrap(),
            r#"(TRUE, now(), '*Test*', 'FOUR_AXLES', 50.123, 12.346, '{"componentRail":[6.86,29.4,0.98,0.0245],"continuousRail":[6.86,29.4,0.882,0.0196]}')"#
        );
    }

    #[test]
    fn car_json_keeps_null_first_coefficient() {
        let mut car = Car::from_workbook(&in_memory(&car_sheets("Test", 6.0))).unwrap();
        car.resistance.component_rail[0] = None;
        let row = car_row(&car).unwrap();
        assert!(row.contains(r#""componentRail":[null,29.4"#));
        assert!(row.contains("'SIX_AXLES'"));
    }

    #[test]
    fn cars_insert_joins_rows() {
        let a = Car::from_workbook(&in_memory(&car_sheets("A", 4.0))).unwrap();
        let b = Car::from_workbook(&in_memory(&car_sheets("B", 8.0))).unwrap();
        let sql = cars_insert(&[a, b]).unwrap();

        assert!(sql.starts_with(
            "INSERT INTO asu_ter_k_main_car (active, change_time, name, number_of_axles, weight, length, resistance_to_motion) VALUES\n(TRUE, now(), '*A*'"
        ));
        assert!(sql.contains("),\n(TRUE, now(), '*B*', 'EIGHT_AXLES'"));
        assert!(sql.ends_with(");"));
    }

    #[test]
    fn locomotive_insert_renders_scalars_and_payloads() {
        let loco =
            Locomotive::from_workbook(&in_memory(&locomotive_sheets("ВЛ10", "3000"))).unwrap();
        let sql = locomotive_insert(&loco).unwrap();

        assert!(sql.starts_with(
            "INSERT INTO asu_ter.asu_ter_k_main_locomotive (active, change_time, name, current, type,"
        ));
        assert!(sql.contains(
            "TRUE,\n    now(),\n    '*ВЛ10*',\n    'DIRECT_CURRENT',\n    'FREIGHT_LOCOMOTIVE',\n    6160,\n    192,\n    32.8,\n    110,\n    'НБ-418К6',\n    NULL,\n    40,\n"
        ));
        assert!(sql.contains(
            r#"'{"overheatTolerance":100.0,"thermalTimeConstant":25.0,"characteristics":[{"motorAmperage":400.0,"balancingOverheat":40.0}"#
        ));
        assert!(sql.contains(r#""idleResistanceCoefficients":{"componentRail":[23.52,"#));
        assert!(sql.contains(
            r#"'[{"name":"1 позиция","characteristics":[{"type":"DirectCharacteristic","speed":0.0,"force":490.0,"#
        ));
        assert!(sql.contains(
            r#"'{"limit":[{"type":"DirectCharacteristic","speed":90.0,"force":196.0,"#
        ));
        assert!(sql.ends_with("\n);"));
    }

    #[test]
    fn missing_motor_type_renders_null() {
        let mut loco =
            Locomotive::from_workbook(&in_memory(&locomotive_sheets("ЭП1", "25000"))).unwrap();
        loco.main.motor_type = None;
        let sql = locomotive_insert(&loco).unwrap();
        assert!(sql.contains("110,\n    NULL,\n    120,\n    40,"));
    }
}
