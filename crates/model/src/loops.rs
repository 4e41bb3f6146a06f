//! Loop records: air loops, plant loops, outdoor air systems and zones.
//!
//! The handles of a loop's fixed nodes, splitters and mixers are private.
//! They are created by [`Model::add_air_loop`](crate::Model::add_air_loop)
//! and friends and never change afterwards.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::objects::Handle;

// ---------------------------------------------------------------------------
// Locations
// ---------------------------------------------------------------------------

/// The kind of path a node or component lies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PathSide {
    AirSupply,
    AirDemand,
    OutdoorAir,
    Relief,
    PlantSupply,
    PlantDemand,
}

/// Where a node sits in the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeLocation {
    AirSupply { air_loop: Handle },
    AirDemand { air_loop: Handle },
    OutdoorAir { oa_system: Handle, outboard: bool },
    Relief { oa_system: Handle },
    PlantSupply { plant_loop: Handle },
    PlantDemand { plant_loop: Handle },
    Unattached,
}

impl NodeLocation {
    pub fn side(&self) -> Option<PathSide> {
        match self {
            NodeLocation::AirSupply { .. } => Some(PathSide::AirSupply),
            NodeLocation::AirDemand { .. } => Some(PathSide::AirDemand),
            NodeLocation::OutdoorAir { .. } => Some(PathSide::OutdoorAir),
            NodeLocation::Relief { .. } => Some(PathSide::Relief),
            NodeLocation::PlantSupply { .. } => Some(PathSide::PlantSupply),
            NodeLocation::PlantDemand { .. } => Some(PathSide::PlantDemand),
            NodeLocation::Unattached => None,
        }
    }

    /// The loop (or OA system) owning the path.
    pub fn owner(&self) -> Option<Handle> {
        match *self {
            NodeLocation::AirSupply { air_loop } | NodeLocation::AirDemand { air_loop } => {
                Some(air_loop)
            }
            NodeLocation::OutdoorAir { oa_system, .. } | NodeLocation::Relief { oa_system } => {
                Some(oa_system)
            }
            NodeLocation::PlantSupply { plant_loop } | NodeLocation::PlantDemand { plant_loop } => {
                Some(plant_loop)
            }
            NodeLocation::Unattached => None,
        }
    }
}

impl fmt::Display for NodeLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            NodeLocation::AirSupply { .. } => "air loop supply side",
            NodeLocation::AirDemand { .. } => "air loop demand side",
            NodeLocation::OutdoorAir { outboard: true, .. } => "outboard outdoor air node",
            NodeLocation::OutdoorAir { .. } => "outdoor air stream",
            NodeLocation::Relief { .. } => "relief stream",
            NodeLocation::PlantSupply { .. } => "plant loop supply side",
            NodeLocation::PlantDemand { .. } => "plant loop demand side",
            NodeLocation::Unattached => "not on a loop",
        };
        f.write_str(text)
    }
}

// ---------------------------------------------------------------------------
// AirLoopHVAC
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NightCycleControl {
    StayOff,
    CycleOnAny,
    CycleOnControlZone,
    CycleOnAnyZoneFansOnly,
}

impl NightCycleControl {
    pub fn as_str(&self) -> &'static str {
        match self {
            NightCycleControl::StayOff => "StayOff",
            NightCycleControl::CycleOnAny => "CycleOnAny",
            NightCycleControl::CycleOnControlZone => "CycleOnControlZone",
            NightCycleControl::CycleOnAnyZoneFansOnly => "CycleOnAnyZoneFansOnly",
        }
    }
}

/// `Sizing:System`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SizingSystem {
    pub type_of_load_to_size_on: String,
    pub design_outdoor_air_flow_rate: Option<f64>,
    pub minimum_system_air_flow_ratio: f64,
    pub preheat_design_temperature: f64,
    pub preheat_design_humidity_ratio: f64,
    pub precool_design_temperature: f64,
    pub precool_design_humidity_ratio: f64,
    pub central_cooling_design_supply_air_temperature: f64,
    pub central_heating_design_supply_air_temperature: f64,
    pub central_cooling_design_supply_air_humidity_ratio: f64,
    pub central_heating_design_supply_air_humidity_ratio: f64,
    pub all_outdoor_air_in_cooling: bool,
    pub all_outdoor_air_in_heating: bool,
}

impl Default for SizingSystem {
    fn default() -> Self {
        Self {
            type_of_load_to_size_on: "Sensible".to_owned(),
            design_outdoor_air_flow_rate: None,
            minimum_system_air_flow_ratio: 0.3,
            preheat_design_temperature: 7.0,
            preheat_design_humidity_ratio: 0.008,
            precool_design_temperature: 12.8,
            precool_design_humidity_ratio: 0.008,
            central_cooling_design_supply_air_temperature: 12.8,
            central_heating_design_supply_air_temperature: 16.7,
            central_cooling_design_supply_air_humidity_ratio: 0.008,
            central_heating_design_supply_air_humidity_ratio: 0.008,
            all_outdoor_air_in_cooling: false,
            all_outdoor_air_in_heating: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AirLoopHvac {
    supply_inlet_node: Handle,
    supply_outlet_node: Handle,
    demand_inlet_node: Handle,
    demand_outlet_node: Handle,
    zone_splitter: Handle,
    zone_mixer: Handle,
    pub availability_schedule: Option<Handle>,
    pub night_cycle_control: NightCycleControl,
    pub design_supply_air_flow_rate: Option<f64>,
    pub sizing: SizingSystem,
}

impl AirLoopHvac {
    pub(crate) fn new(
        supply_inlet_node: Handle,
        supply_outlet_node: Handle,
        demand_inlet_node: Handle,
        demand_outlet_node: Handle,
        zone_splitter: Handle,
        zone_mixer: Handle,
    ) -> Self {
        Self {
            supply_inlet_node,
            supply_outlet_node,
            demand_inlet_node,
            demand_outlet_node,
            zone_splitter,
            zone_mixer,
            availability_schedule: None,
            night_cycle_control: NightCycleControl::StayOff,
            design_supply_air_flow_rate: None,
            sizing: SizingSystem::default(),
        }
    }

    pub fn supply_inlet_node(&self) -> Handle {
        self.supply_inlet_node
    }

    pub fn supply_outlet_node(&self) -> Handle {
        self.supply_outlet_node
    }

    pub fn demand_inlet_node(&self) -> Handle {
        self.demand_inlet_node
    }

    pub fn demand_outlet_node(&self) -> Handle {
        self.demand_outlet_node
    }

    pub fn zone_splitter(&self) -> Handle {
        self.zone_splitter
    }

    pub fn zone_mixer(&self) -> Handle {
        self.zone_mixer
    }

    pub(crate) fn fixed_objects(&self) -> [Handle; 6] {
        [
            self.supply_inlet_node,
            self.supply_outlet_node,
            self.demand_inlet_node,
            self.demand_outlet_node,
            self.zone_splitter,
            self.zone_mixer,
        ]
    }
}

// ---------------------------------------------------------------------------
// PlantLoop
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlantLoopType {
    Heating,
    Cooling,
    Condenser,
}

impl PlantLoopType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlantLoopType::Heating => "Heating",
            PlantLoopType::Cooling => "Cooling",
            PlantLoopType::Condenser => "Condenser",
        }
    }
}

/// `Sizing:Plant`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SizingPlant {
    pub loop_type: PlantLoopType,
    pub design_loop_exit_temperature: f64,
    pub loop_design_temperature_difference: f64,
}

impl Default for SizingPlant {
    fn default() -> Self {
        Self {
            loop_type: PlantLoopType::Heating,
            design_loop_exit_temperature: 82.0,
            loop_design_temperature_difference: 11.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommonPipeSimulation {
    None,
    CommonPipe,
    TwoWayCommonPipe,
}

impl CommonPipeSimulation {
    pub fn as_str(&self) -> &'static str {
        match self {
            CommonPipeSimulation::None => "None",
            CommonPipeSimulation::CommonPipe => "CommonPipe",
            CommonPipeSimulation::TwoWayCommonPipe => "TwoWayCommonPipe",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlantLoop {
    supply_inlet_node: Handle,
    supply_outlet_node: Handle,
    supply_splitter: Handle,
    supply_mixer: Handle,
    demand_inlet_node: Handle,
    demand_outlet_node: Handle,
    demand_splitter: Handle,
    demand_mixer: Handle,
    pub fluid_type: String,
    pub maximum_loop_temperature: f64,
    pub minimum_loop_temperature: f64,
    pub maximum_loop_flow_rate: Option<f64>,
    pub minimum_loop_flow_rate: f64,
    pub common_pipe_simulation: CommonPipeSimulation,
    pub sizing: SizingPlant,
}

impl PlantLoop {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        supply_inlet_node: Handle,
        supply_outlet_node: Handle,
        supply_splitter: Handle,
        supply_mixer: Handle,
        demand_inlet_node: Handle,
        demand_outlet_node: Handle,
        demand_splitter: Handle,
        demand_mixer: Handle,
    ) -> Self {
        Self {
            supply_inlet_node,
            supply_outlet_node,
            supply_splitter,
            supply_mixer,
            demand_inlet_node,
            demand_outlet_node,
            demand_splitter,
            demand_mixer,
            fluid_type: "Water".to_owned(),
            maximum_loop_temperature: 100.0,
            minimum_loop_temperature: 0.0,
            maximum_loop_flow_rate: None,
            minimum_loop_flow_rate: 0.0,
            common_pipe_simulation: CommonPipeSimulation::None,
            sizing: SizingPlant::default(),
        }
    }

    pub fn supply_inlet_node(&self) -> Handle {
        self.supply_inlet_node
    }

    pub fn supply_outlet_node(&self) -> Handle {
        self.supply_outlet_node
    }

    pub fn supply_splitter(&self) -> Handle {
        self.supply_splitter
    }

    pub fn supply_mixer(&self) -> Handle {
        self.supply_mixer
    }

    pub fn demand_inlet_node(&self) -> Handle {
        self.demand_inlet_node
    }

    pub fn demand_outlet_node(&self) -> Handle {
        self.demand_outlet_node
    }

    pub fn demand_splitter(&self) -> Handle {
        self.demand_splitter
    }

    pub fn demand_mixer(&self) -> Handle {
        self.demand_mixer
    }

    pub(crate) fn fixed_objects(&self) -> [Handle; 8] {
        [
            self.supply_inlet_node,
            self.supply_outlet_node,
            self.supply_splitter,
            self.supply_mixer,
            self.demand_inlet_node,
            self.demand_outlet_node,
            self.demand_splitter,
            self.demand_mixer,
        ]
    }
}

// ---------------------------------------------------------------------------
// OutdoorAirSystem
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EconomizerControlType {
    NoEconomizer,
    FixedDryBulb,
    FixedEnthalpy,
    DifferentialDryBulb,
    DifferentialEnthalpy,
    FixedDewPointAndDryBulb,
    DifferentialDryBulbAndEnthalpy,
}

impl EconomizerControlType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EconomizerControlType::NoEconomizer => "NoEconomizer",
            EconomizerControlType::FixedDryBulb => "FixedDryBulb",
            EconomizerControlType::FixedEnthalpy => "FixedEnthalpy",
            EconomizerControlType::DifferentialDryBulb => "DifferentialDryBulb",
            EconomizerControlType::DifferentialEnthalpy => "DifferentialEnthalpy",
            EconomizerControlType::FixedDewPointAndDryBulb => "FixedDewPointAndDryBulb",
            EconomizerControlType::DifferentialDryBulbAndEnthalpy => {
                "DifferentialDryBulbAndEnthalpy"
            }
        }
    }
}

/// `Controller:OutdoorAir`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControllerOutdoorAir {
    pub economizer_control_type: EconomizerControlType,
    pub economizer_maximum_limit_dry_bulb_temperature: Option<f64>,
    pub economizer_maximum_limit_enthalpy: Option<f64>,
    pub economizer_minimum_limit_dry_bulb_temperature: Option<f64>,
    pub lockout_type: String,
    pub minimum_outdoor_air_flow_rate: Option<f64>,
    pub maximum_outdoor_air_flow_rate: Option<f64>,
    pub minimum_outdoor_air_schedule: Option<Handle>,
    pub minimum_fraction_of_outdoor_air_schedule: Option<Handle>,
    pub maximum_fraction_of_outdoor_air_schedule: Option<Handle>,
}

impl Default for ControllerOutdoorAir {
    fn default() -> Self {
        Self {
            economizer_control_type: EconomizerControlType::NoEconomizer,
            economizer_maximum_limit_dry_bulb_temperature: Some(28.0),
            economizer_maximum_limit_enthalpy: Some(64_000.0),
            economizer_minimum_limit_dry_bulb_temperature: Some(-100.0),
            lockout_type: "NoLockout".to_owned(),
            minimum_outdoor_air_flow_rate: None,
            maximum_outdoor_air_flow_rate: None,
            minimum_outdoor_air_schedule: None,
            minimum_fraction_of_outdoor_air_schedule: None,
            maximum_fraction_of_outdoor_air_schedule: None,
        }
    }
}

impl ControllerOutdoorAir {
    pub fn references(&self) -> Vec<Handle> {
        [
            self.minimum_outdoor_air_schedule,
            self.minimum_fraction_of_outdoor_air_schedule,
            self.maximum_fraction_of_outdoor_air_schedule,
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    pub(crate) fn clear_reference(&mut self, target: Handle) {
        if self.minimum_outdoor_air_schedule == Some(target) {
            self.minimum_outdoor_air_schedule = None;
        }
        if self.minimum_fraction_of_outdoor_air_schedule == Some(target) {
            self.minimum_fraction_of_outdoor_air_schedule = None;
        }
        if self.maximum_fraction_of_outdoor_air_schedule == Some(target) {
            self.maximum_fraction_of_outdoor_air_schedule = None;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutdoorAirSystem {
    outboard_oa_node: Handle,
    relief_node: Handle,
    pub controller: ControllerOutdoorAir,
}

impl OutdoorAirSystem {
    pub(crate) fn new(outboard_oa_node: Handle, relief_node: Handle, controller: ControllerOutdoorAir) -> Self {
        Self { outboard_oa_node, relief_node, controller }
    }

    /// First node of the outdoor air stream.
    pub fn outboard_oa_node(&self) -> Handle {
        self.outboard_oa_node
    }

    /// Last node of the relief stream.
    pub fn relief_node(&self) -> Handle {
        self.relief_node
    }
}

// ---------------------------------------------------------------------------
// ThermalZone
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThermalZone {
    pub multiplier: u32,
    pub floor_area: Option<f64>,
}

impl Default for ThermalZone {
    fn default() -> Self {
        Self { multiplier: 1, floor_area: None }
    }
}
