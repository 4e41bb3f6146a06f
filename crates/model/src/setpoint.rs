//! Setpoint manager types.
//!
//! A [`SetpointManager`] controls one [`ControlVariable`] at (at most) one
//! node. The attachment protocol itself lives on [`Model`](crate::Model)
//! because it needs the loop topology and the node → manager index.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{error::ModelError, objects::Handle};

// ---------------------------------------------------------------------------
// ControlVariable
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ControlVariable {
    Temperature,
    MaximumTemperature,
    MinimumTemperature,
    HumidityRatio,
    MaximumHumidityRatio,
    MinimumHumidityRatio,
    MassFlowRate,
    MaximumMassFlowRate,
    MinimumMassFlowRate,
}

impl ControlVariable {
    pub const ALL: [ControlVariable; 9] = [
        ControlVariable::Temperature,
        ControlVariable::MaximumTemperature,
        ControlVariable::MinimumTemperature,
        ControlVariable::HumidityRatio,
        ControlVariable::MaximumHumidityRatio,
        ControlVariable::MinimumHumidityRatio,
        ControlVariable::MassFlowRate,
        ControlVariable::MaximumMassFlowRate,
        ControlVariable::MinimumMassFlowRate,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ControlVariable::Temperature => "Temperature",
            ControlVariable::MaximumTemperature => "MaximumTemperature",
            ControlVariable::MinimumTemperature => "MinimumTemperature",
            ControlVariable::HumidityRatio => "HumidityRatio",
            ControlVariable::MaximumHumidityRatio => "MaximumHumidityRatio",
            ControlVariable::MinimumHumidityRatio => "MinimumHumidityRatio",
            ControlVariable::MassFlowRate => "MassFlowRate",
            ControlVariable::MaximumMassFlowRate => "MaximumMassFlowRate",
            ControlVariable::MinimumMassFlowRate => "MinimumMassFlowRate",
        }
    }

    /// Case-insensitive lookup by EnergyPlus key.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|cv| cv.as_str().eq_ignore_ascii_case(name.trim()))
    }
}

impl fmt::Display for ControlVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const TEMPERATURE_ONLY: &[ControlVariable] = &[ControlVariable::Temperature];
const TEMPERATURE_FAMILY: &[ControlVariable] = &[
    ControlVariable::Temperature,
    ControlVariable::MaximumTemperature,
    ControlVariable::MinimumTemperature,
];

// ---------------------------------------------------------------------------
// Kind-specific parameters
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReferenceTemperatureType {
    OutdoorAirWetBulb,
    OutdoorAirDryBulb,
}

impl ReferenceTemperatureType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReferenceTemperatureType::OutdoorAirWetBulb => "OutdoorAirWetBulb",
            ReferenceTemperatureType::OutdoorAirDryBulb => "OutdoorAirDryBulb",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "outdoorairwetbulb" => Some(ReferenceTemperatureType::OutdoorAirWetBulb),
            "outdoorairdrybulb" => Some(ReferenceTemperatureType::OutdoorAirDryBulb),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WarmestStrategy {
    TemperatureFirst,
    FlowFirst,
}

impl WarmestStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            WarmestStrategy::TemperatureFirst => "TemperatureFirst",
            WarmestStrategy::FlowFirst => "FlowFirst",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "temperaturefirst" => Some(WarmestStrategy::TemperatureFirst),
            "flowfirst" => Some(WarmestStrategy::FlowFirst),
            _ => None,
        }
    }
}

/// Linear reset of the setpoint against outdoor dry-bulb temperature, with an
/// optional second reset line selected by `schedule`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutdoorAirReset {
    pub setpoint_at_outdoor_low_temperature: f64,
    pub outdoor_low_temperature: f64,
    pub setpoint_at_outdoor_high_temperature: f64,
    pub outdoor_high_temperature: f64,
    pub schedule: Option<Handle>,
    pub setpoint_at_outdoor_low_temperature_2: Option<f64>,
    pub outdoor_low_temperature_2: Option<f64>,
    pub setpoint_at_outdoor_high_temperature_2: Option<f64>,
    pub outdoor_high_temperature_2: Option<f64>,
}

impl Default for OutdoorAirReset {
    fn default() -> Self {
        Self {
            setpoint_at_outdoor_low_temperature: 22.0,
            outdoor_low_temperature: 10.0,
            setpoint_at_outdoor_high_temperature: 10.0,
            outdoor_high_temperature: 24.0,
            schedule: None,
            setpoint_at_outdoor_low_temperature_2: None,
            outdoor_low_temperature_2: None,
            setpoint_at_outdoor_high_temperature_2: None,
            outdoor_high_temperature_2: None,
        }
    }
}

impl OutdoorAirReset {
    /// Setpoint for an outdoor temperature on the primary reset line.
    pub fn setpoint_at(&self, outdoor: f64) -> f64 {
        let (lo, hi) = (self.outdoor_low_temperature, self.outdoor_high_temperature);
        let (sp_lo, sp_hi) = (
            self.setpoint_at_outdoor_low_temperature,
            self.setpoint_at_outdoor_high_temperature,
        );
        if outdoor <= lo || hi <= lo {
            sp_lo
        } else if outdoor >= hi {
            sp_hi
        } else {
            sp_lo + (outdoor - lo) * (sp_hi - sp_lo) / (hi - lo)
        }
    }
}

// ---------------------------------------------------------------------------
// SpmKind
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SpmKind {
    Scheduled {
        schedule: Option<Handle>,
    },
    SingleZoneReheat {
        minimum_supply_air_temperature: f64,
        maximum_supply_air_temperature: f64,
        control_zone: Option<Handle>,
    },
    MixedAir {
        reference_setpoint_node: Option<Handle>,
        fan_inlet_node: Option<Handle>,
        fan_outlet_node: Option<Handle>,
    },
    OutdoorAirReset(OutdoorAirReset),
    FollowOutdoorAirTemperature {
        reference_temperature_type: ReferenceTemperatureType,
        offset_temperature_difference: f64,
        maximum_setpoint_temperature: f64,
        minimum_setpoint_temperature: f64,
    },
    Warmest {
        minimum_setpoint_temperature: f64,
        maximum_setpoint_temperature: f64,
    },
    WarmestTemperatureFlow {
        minimum_setpoint_temperature: f64,
        maximum_setpoint_temperature: f64,
        strategy: WarmestStrategy,
        minimum_turndown_ratio: f64,
    },
}

impl SpmKind {
    pub fn name(&self) -> &'static str {
        match self {
            SpmKind::Scheduled { .. } => "SetpointManager:Scheduled",
            SpmKind::SingleZoneReheat { .. } => "SetpointManager:SingleZone:Reheat",
            SpmKind::MixedAir { .. } => "SetpointManager:MixedAir",
            SpmKind::OutdoorAirReset(_) => "SetpointManager:OutdoorAirReset",
            SpmKind::FollowOutdoorAirTemperature { .. } => {
                "SetpointManager:FollowOutdoorAirTemperature"
            }
            SpmKind::Warmest { .. } => "SetpointManager:Warmest",
            SpmKind::WarmestTemperatureFlow { .. } => "SetpointManager:WarmestTemperatureFlow",
        }
    }

    pub fn allowed_control_variables(&self) -> &'static [ControlVariable] {
        match self {
            SpmKind::Scheduled { .. } => &ControlVariable::ALL,
            SpmKind::OutdoorAirReset(_) | SpmKind::FollowOutdoorAirTemperature { .. } => {
                TEMPERATURE_FAMILY
            }
            _ => TEMPERATURE_ONLY,
        }
    }

    /// Whether this kind may control a plant loop supply node.
    pub fn allows_plant_supply(&self) -> bool {
        matches!(
            self,
            SpmKind::Scheduled { .. }
                | SpmKind::OutdoorAirReset(_)
                | SpmKind::FollowOutdoorAirTemperature { .. }
        )
    }

    pub fn references(&self) -> Vec<Handle> {
        match self {
            SpmKind::Scheduled { schedule } => schedule.iter().copied().collect(),
            SpmKind::SingleZoneReheat { control_zone, .. } => control_zone.iter().copied().collect(),
            SpmKind::MixedAir { reference_setpoint_node, fan_inlet_node, fan_outlet_node } => {
                [reference_setpoint_node, fan_inlet_node, fan_outlet_node]
                    .into_iter()
                    .flatten()
                    .copied()
                    .collect()
            }
            SpmKind::OutdoorAirReset(r) => r.schedule.iter().copied().collect(),
            _ => Vec::new(),
        }
    }

    pub(crate) fn clear_reference(&mut self, target: Handle) {
        let clear = |slot: &mut Option<Handle>| {
            if *slot == Some(target) {
                *slot = None;
            }
        };
        match self {
            SpmKind::Scheduled { schedule } => clear(schedule),
            SpmKind::SingleZoneReheat { control_zone, .. } => clear(control_zone),
            SpmKind::MixedAir { reference_setpoint_node, fan_inlet_node, fan_outlet_node } => {
                clear(reference_setpoint_node);
                clear(fan_inlet_node);
                clear(fan_outlet_node);
            }
            SpmKind::OutdoorAirReset(r) => clear(&mut r.schedule),
            _ => {}
        }
    }
}

// ---------------------------------------------------------------------------
// SetpointManager
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetpointManager {
    control_variable: ControlVariable,
    setpoint_node: Option<Handle>,
    kind: SpmKind,
}

impl SetpointManager {
    /// Unattached manager controlling `Temperature`.
    pub fn new(kind: SpmKind) -> Self {
        Self {
            control_variable: ControlVariable::Temperature,
            setpoint_node: None,
            kind,
        }
    }

    pub fn scheduled(schedule: Handle) -> Self {
        Self::new(SpmKind::Scheduled { schedule: Some(schedule) })
    }

    pub fn single_zone_reheat() -> Self {
        Self::new(SpmKind::SingleZoneReheat {
            minimum_supply_air_temperature: -99.0,
            maximum_supply_air_temperature: 99.0,
            control_zone: None,
        })
    }

    pub fn mixed_air() -> Self {
        Self::new(SpmKind::MixedAir {
            reference_setpoint_node: None,
            fan_inlet_node: None,
            fan_outlet_node: None,
        })
    }

    pub fn outdoor_air_reset() -> Self {
        Self::new(SpmKind::OutdoorAirReset(OutdoorAirReset::default()))
    }

    pub fn follow_outdoor_air_temperature() -> Self {
        Self::new(SpmKind::FollowOutdoorAirTemperature {
            reference_temperature_type: ReferenceTemperatureType::OutdoorAirWetBulb,
            offset_temperature_difference: 1.5,
            maximum_setpoint_temperature: 80.0,
            minimum_setpoint_temperature: 6.0,
        })
    }

    pub fn warmest() -> Self {
        Self::new(SpmKind::Warmest {
            minimum_setpoint_temperature: 12.2,
            maximum_setpoint_temperature: 15.6,
        })
    }

    pub fn warmest_temperature_flow() -> Self {
        Self::new(SpmKind::WarmestTemperatureFlow {
            minimum_setpoint_temperature: 12.2,
            maximum_setpoint_temperature: 18.0,
            strategy: WarmestStrategy::TemperatureFirst,
            minimum_turndown_ratio: 0.2,
        })
    }

    /// Builder form of a control variable change for unattached managers.
    pub fn with_control_variable(mut self, cv: ControlVariable) -> Result<Self, ModelError> {
        self.check_control_variable(cv)?;
        self.control_variable = cv;
        Ok(self)
    }

    pub fn control_variable(&self) -> ControlVariable {
        self.control_variable
    }

    pub fn setpoint_node(&self) -> Option<Handle> {
        self.setpoint_node
    }

    pub fn kind(&self) -> &SpmKind {
        &self.kind
    }

    pub(crate) fn kind_mut(&mut self) -> &mut SpmKind {
        &mut self.kind
    }

    /// Edit the parameters of this manager's kind in place.
    ///
    /// # Errors
    /// [`ModelError::KindChanged`] if `edit` swaps in another kind. The
    /// manager is left as it was.
    pub fn edit_kind(&mut self, edit: impl FnOnce(&mut SpmKind)) -> Result<(), ModelError> {
        let before = self.kind.clone();
        edit(&mut self.kind);
        if std::mem::discriminant(&before) != std::mem::discriminant(&self.kind) {
            let to = self.kind.name();
            self.kind = before;
            return Err(ModelError::KindChanged { from: self.kind.name(), to });
        }
        Ok(())
    }

    pub fn check_control_variable(&self, cv: ControlVariable) -> Result<(), ModelError> {
        if self.kind.allowed_control_variables().contains(&cv) {
            Ok(())
        } else {
            Err(ModelError::InvalidControlVariable {
                kind: self.kind.name(),
                control_variable: cv.as_str().to_owned(),
            })
        }
    }

    pub(crate) fn set_control_variable_unchecked(&mut self, cv: ControlVariable) {
        self.control_variable = cv;
    }

    pub(crate) fn set_setpoint_node(&mut self, node: Option<Handle>) {
        self.setpoint_node = node;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn control_variable_names_parse_case_insensitively() {
        assert_eq!(
            ControlVariable::from_name("maximumtemperature"),
            Some(ControlVariable::MaximumTemperature)
        );
        assert_eq!(ControlVariable::from_name("Pressure"), None);
    }

    #[test]
    fn single_zone_reheat_only_accepts_temperature() {
        let spm = SetpointManager::single_zone_reheat();
        assert!(matches!(
            spm.with_control_variable(ControlVariable::HumidityRatio),
            Err(ModelError::InvalidControlVariable { .. })
        ));
    }

    #[test]
    fn scheduled_accepts_every_control_variable() {
        for cv in ControlVariable::ALL {
            let spm = SetpointManager::scheduled(Handle::new());
            assert_eq!(spm.with_control_variable(cv).unwrap().control_variable(), cv);
        }
    }

    #[test]
    fn outdoor_air_reset_defaults_interpolate() {
        let reset = OutdoorAirReset::default();
        assert_eq!(reset.setpoint_at(0.0), 22.0);
        assert_eq!(reset.setpoint_at(30.0), 10.0);
        assert!((reset.setpoint_at(17.0) - 16.0).abs() < 1e-9);
    }

    #[test]
    fn new_managers_are_unattached() {
        assert!(SetpointManager::warmest().setpoint_node().is_none());
        assert!(SetpointManager::mixed_air().setpoint_node().is_none());
    }
}
