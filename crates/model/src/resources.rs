//! Shared resources referenced by components and setpoint managers.

use serde::{Deserialize, Serialize};

/// What a schedule's values mean.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleType {
    Temperature,
    OnOff,
    Fraction,
    Any,
}

impl ScheduleType {
    /// EnergyPlus `ScheduleTypeLimits` name.
    pub fn limits_name(&self) -> &'static str {
        match self {
            ScheduleType::Temperature => "Temperature",
            ScheduleType::OnOff => "OnOff",
            ScheduleType::Fraction => "Fraction",
            ScheduleType::Any => "Any Number",
        }
    }

    pub fn from_limits_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "temperature" => ScheduleType::Temperature,
            "onoff" | "on/off" => ScheduleType::OnOff,
            "fraction" => ScheduleType::Fraction,
            _ => ScheduleType::Any,
        }
    }
}

/// Constant-value schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    pub schedule_type: ScheduleType,
    pub value: f64,
}

impl Schedule {
    pub fn constant(schedule_type: ScheduleType, value: f64) -> Self {
        Self { schedule_type, value }
    }
}

/// Performance curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "form", rename_all = "snake_case")]
pub enum Curve {
    /// `c0 + c1 x + c2 x² + c3 x³`
    Cubic {
        coefficients: [f64; 4],
        minimum_x: f64,
        maximum_x: f64,
    },
    /// `c0 + c1 x + c2 x²`
    Quadratic {
        coefficients: [f64; 3],
        minimum_x: f64,
        maximum_x: f64,
    },
    /// `c0 + c1 x + c2 x² + c3 y + c4 y² + c5 x y`
    Biquadratic {
        coefficients: [f64; 6],
        minimum_x: f64,
        maximum_x: f64,
        minimum_y: f64,
        maximum_y: f64,
    },
}

impl Curve {
    pub fn evaluate(&self, x: f64, y: f64) -> f64 {
        match self {
            Curve::Cubic { coefficients: c, minimum_x, maximum_x } => {
                let x = x.clamp(*minimum_x, *maximum_x);
                c[0] + c[1] * x + c[2] * x * x + c[3] * x * x * x
            }
            Curve::Quadratic { coefficients: c, minimum_x, maximum_x } => {
                let x = x.clamp(*minimum_x, *maximum_x);
                c[0] + c[1] * x + c[2] * x * x
            }
            Curve::Biquadratic { coefficients: c, minimum_x, maximum_x, minimum_y, maximum_y } => {
                let x = x.clamp(*minimum_x, *maximum_x);
                let y = y.clamp(*minimum_y, *maximum_y);
                c[0] + c[1] * x + c[2] * x * x + c[3] * y + c[4] * y * y + c[5] * x * y
            }
        }
    }

    /// EnergyPlus object type for this curve form.
    pub fn idf_type(&self) -> &'static str {
        match self {
            Curve::Cubic { .. } => "Curve:Cubic",
            Curve::Quadratic { .. } => "Curve:Quadratic",
            Curve::Biquadratic { .. } => "Curve:Biquadratic",
        }
    }

    pub fn coefficients(&self) -> &[f64] {
        match self {
            Curve::Cubic { coefficients, .. } => coefficients,
            Curve::Quadratic { coefficients, .. } => coefficients,
            Curve::Biquadratic { coefficients, .. } => coefficients,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn biquadratic_clamps_inputs() {
        let curve = Curve::Biquadratic {
            coefficients: [1.0, 0.1, 0.0, 0.0, 0.0, 0.0],
            minimum_x: 0.0,
            maximum_x: 10.0,
            minimum_y: 0.0,
            maximum_y: 10.0,
        };
        assert!((curve.evaluate(20.0, 0.0) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn schedule_type_limits_round_trip_by_name() {
        for t in [ScheduleType::Temperature, ScheduleType::OnOff, ScheduleType::Fraction] {
            assert_eq!(ScheduleType::from_limits_name(t.limits_name()), t);
        }
        assert_eq!(ScheduleType::from_limits_name("whatever"), ScheduleType::Any);
    }
}
