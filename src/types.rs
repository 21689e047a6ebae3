//! Common types for rollstock-sql.
//!
//! Closed code sets read from the datasheets, the electrical characteristic
//! sample shared by traction and braking curves, and unit conversion helpers.

use std::str::FromStr;

use serde::Serialize;

use crate::error::{ConvertError, Result};

/// kgf to N conversion factor used throughout the datasheets.
pub const KGF_TO_N: f64 = 9.8;

/// kgf to kN factor applied to tractive and braking force.
pub const KGF_TO_KN: f64 = 9.8e-3;

/// Rounds `value` to `precision` decimal places.
///
/// Rounding works on the exact binary value, so `round_to(0.0735, 3)` is
/// 0.073: the nearest double to 0.0735 lies just below the midpoint.
pub fn round_to(value: f64, precision: usize) -> f64 {
    format!("{value:.precision$}").parse().unwrap_or(value)
}

/// Converts a kgf-based coefficient to N and rounds it.
pub fn kgf_to_n(value: f64, precision: usize) -> f64 {
    round_to(KGF_TO_N * value, precision)
}

/// Axle-count category of a car.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxleCount {
    Four,
    Six,
    Eight,
    Ten,
    Twelve,
}

impl AxleCount {
    /// Code stored in the `number_of_axles` column.
    pub const fn code(self) -> &'static str {
        match self {
            Self::Four => "FOUR_AXLES",
            Self::Six => "SIX_AXLES",
            Self::Eight => "EIGHT_AXLES",
            Self::Ten => "TEN_AXLES",
            Self::Twelve => "TWELVE_AXLES",
        }
    }
}

impl TryFrom<i64> for AxleCount {
    type Error = ConvertError;

    fn try_from(n: i64) -> Result<Self> {
        match n {
            4 => Ok(Self::Four),
            6 => Ok(Self::Six),
            8 => Ok(Self::Eight),
            10 => Ok(Self::Ten),
            12 => Ok(Self::Twelve),
            _ => Err(ConvertError::unrecognized("number of axles", n)),
        }
    }
}

/// Locomotive service type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocomotiveType {
    Freight,
    Passenger,
    ElectricTrain,
}

impl LocomotiveType {
    pub const fn code(self) -> &'static str {
        match self {
            Self::Freight => "FREIGHT_LOCOMOTIVE",
            Self::Passenger => "PASSENGER_LOCOMOTIVE",
            Self::ElectricTrain => "ELECTRIC_TRAIN",
        }
    }
}

impl FromStr for LocomotiveType {
    type Err = ConvertError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "груз" => Ok(Self::Freight),
            "пасс" => Ok(Self::Passenger),
            "электричка" => Ok(Self::ElectricTrain),
            _ => Err(ConvertError::unrecognized("locomotive type", s)),
        }
    }
}

/// Traction supply, written on the datasheet as the line voltage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurrentKind {
    Direct,
    Alternating,
}

impl CurrentKind {
    pub const fn code(self) -> &'static str {
        match self {
            Self::Direct => "DIRECT_CURRENT",
            Self::Alternating => "ALTERNATING_CURRENT",
        }
    }
}

impl FromStr for CurrentKind {
    type Err = ConvertError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "3000" => Ok(Self::Direct),
            "25000" => Ok(Self::Alternating),
            _ => Err(ConvertError::unrecognized("current code", s)),
        }
    }
}

/// Curve sample of an AC locomotive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AcCharacteristic {
    pub speed: f64,
    pub force: f64,
    pub motor_amperage: f64,
    pub commutate_current_amperage: f64,
    pub active_current_amperage: f64,
}

impl AcCharacteristic {
    /// Builds a sample from raw datasheet values (force in kgf).
    pub fn new(
        speed: f64,
        force: f64,
        motor_amperage: f64,
        commutate_current_amperage: f64,
        active_current_amperage: f64,
    ) -> Self {
        Self {
            speed,
            force: round_to(KGF_TO_KN * force, 4),
            motor_amperage: motor_amperage.max(0.0),
            commutate_current_amperage: commutate_current_amperage.max(0.0),
            active_current_amperage: active_current_amperage.max(0.0),
        }
    }
}

/// Curve sample of a DC locomotive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DcCharacteristic {
    pub speed: f64,
    pub force: f64,
    pub motor_amperage: f64,
    pub active_current_amperage: f64,
}

impl DcCharacteristic {
    /// Builds a sample from raw datasheet values (force in kgf).
    pub fn new(speed: f64, force: f64, motor_amperage: f64, active_current_amperage: f64) -> Self {
        Self {
            speed,
            force: round_to(KGF_TO_KN * force, 4),
            motor_amperage: motor_amperage.max(0.0),
            active_current_amperage: active_current_amperage.max(0.0),
        }
    }
}

/// One sample on a traction or braking curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum ElectricalCharacteristic {
    #[serde(rename = "AlternateCharacteristic")]
    Alternating(AcCharacteristic),
    #[serde(rename = "DirectCharacteristic")]
    Direct(DcCharacteristic),
}

impl ElectricalCharacteristic {
    pub const fn speed(&self) -> f64 {
        match self {
            Self::Alternating(c) => c.speed,
            Self::Direct(c) => c.speed,
        }
    }

    pub const fn force(&self) -> f64 {
        match self {
            Self::Alternating(c) => c.force,
            Self::Direct(c) => c.force,
        }
    }

    pub const fn motor_amperage(&self) -> f64 {
        match self {
            Self::Alternating(c) => c.motor_amperage,
            Self::Direct(c) => c.motor_amperage,
        }
    }

    pub const fn active_current_amperage(&self) -> f64 {
        match self {
            Self::Alternating(c) => c.active_current_amperage,
            Self::Direct(c) => c.active_current_amperage,
        }
    }

    /// Only AC samples carry a commutating current.
    pub const fn commutate_current_amperage(&self) -> Option<f64> {
        match self {
            Self::Alternating(c) => Some(c.commutate_current_amperage),
            Self::Direct(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn axle_count_maps_closed_set() {
        for (n, code) in [
            (4, "FOUR_AXLES"),
            (6, "SIX_AXLES"),
            (8, "EIGHT_AXLES"),
            (10, "TEN_AXLES"),
            (12, "TWELVE_AXLES"),
        ] {
            assert_eq!(AxleCount::try_from(n).unwrap().code(), code);
        }
    }

    #[test]
    fn axle_count_rejects_other_integers() {
        for n in [0, 2, 5, 7, 14, -4] {
            assert!(matches!(
                AxleCount::try_from(n),
                Err(ConvertError::UnrecognizedEnumCode { kind: "number of axles", .. })
            ));
        }
    }

    #[test]
    fn current_codes() {
        assert_eq!("3000".parse::<CurrentKind>().unwrap(), CurrentKind::Direct);
        assert_eq!("25000".parse::<CurrentKind>().unwrap(), CurrentKind::Alternating);
        let err = "1500".parse::<CurrentKind>().unwrap_err();
        assert_eq!(err.to_string(), "unrecognized current code: '1500'");
    }

    #[test]
    fn locomotive_type_codes() {
        assert_eq!(
            "груз".parse::<LocomotiveType>().unwrap().code(),
            "FREIGHT_LOCOMOTIVE"
        );
        assert_eq!(
            "пасс".parse::<LocomotiveType>().unwrap().code(),
            "PASSENGER_LOCOMOTIVE"
        );
        assert_eq!(
            "электричка".parse::<LocomotiveType>().unwrap().code(),
            "ELECTRIC_TRAIN"
        );
        assert!("маневровый".parse::<LocomotiveType>().is_err());
    }

    #[test]
    fn kgf_conversion_rounds_to_precision() {
        assert_eq!(kgf_to_n(1.0, 3), 9.8);
        assert_eq!(kgf_to_n(0.5, 4), 4.9);
        assert_eq!(kgf_to_n(1.0, 7), 9.8);
        assert_eq!(kgf_to_n(0.012_345, 4), 0.121);
    }

    #[test]
    fn rounding_uses_exact_binary_value() {
        // 9.8 * 0.0075 is just below 0.0735, 9.8 * 0.1025 just below 1.0045
        assert_eq!(kgf_to_n(0.0075, 3), 0.073);
        assert_eq!(kgf_to_n(0.1025, 3), 1.004);
        assert_eq!(round_to(120.981_000_000_000_01, 4), 120.981);
    }

    #[test]
    fn ac_characteristic_clamps_negative_amperage() {
        let c = AcCharacteristic::new(10.0, 1000.0, -2.0, -5.0, -1.0);
        assert_eq!(c.motor_amperage, 0.0);
        assert_eq!(c.commutate_current_amperage, 0.0);
        assert_eq!(c.active_current_amperage, 0.0);
        assert_eq!(c.force, 9.8);
    }

    #[test]
    fn dc_characteristic_converts_force() {
        let c = DcCharacteristic::new(50.0, 12_345.0, 400.0, -3.0);
        assert_eq!(c.force, 120.981);
        assert_eq!(c.motor_amperage, 400.0);
        assert_eq!(c.active_current_amperage, 0.0);
    }

    #[test]
    fn characteristic_json_carries_type_tag() {
        let ac = ElectricalCharacteristic::Alternating(AcCharacteristic::new(
            10.0, 1000.0, 100.0, 50.0, 25.0,
        ));
        assert_eq!(ac.commutate_current_amperage(), Some(50.0));
        assert_eq!(
            serde_json::to_string(&ac).unwrap(),
            r#"{"type":"AlternateCharacteristic","speed":10.0,"force":9.8,"motorAmperage":100.0,"commutateCurrentAmperage":50.0,"activeCurrentAmperage":25.0}"#
        );

        let dc =
            ElectricalCharacteristic::Direct(DcCharacteristic::new(10.0, 1000.0, 100.0, 25.0));
        assert_eq!(dc.commutate_current_amperage(), None);
        assert_eq!(
            serde_json::to_string(&dc).unwrap(),
            r#"{"type":"DirectCharacteristic","speed":10.0,"force":9.8,"motorAmperage":100.0,"activeCurrentAmperage":25.0}"#
        );
    }
}
