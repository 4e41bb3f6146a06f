//! HVAC components that sit on loop paths.
//!
//! Autosizable quantities are `Option<f64>`; `None` means autosized.

use serde::{Deserialize, Serialize};

use crate::connection::{Port, INLET, OUTLET, SECONDARY_INLET, SECONDARY_OUTLET};
use crate::loops::PathSide;
use crate::objects::Handle;

// ---------------------------------------------------------------------------
// Shared enums
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FuelType {
    Electricity,
    NaturalGas,
    FuelOil2,
    Propane,
}

impl FuelType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FuelType::Electricity => "Electricity",
            FuelType::NaturalGas => "NaturalGas",
            FuelType::FuelOil2 => "FuelOil#2",
            FuelType::Propane => "Propane",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "electricity" | "electric" => Some(FuelType::Electricity),
            "naturalgas" | "gas" => Some(FuelType::NaturalGas),
            "fueloil#2" | "fueloilno2" | "oil" => Some(FuelType::FuelOil2),
            "propane" | "propanegas" => Some(FuelType::Propane),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PumpControlType {
    Continuous,
    Intermittent,
}

impl PumpControlType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PumpControlType::Continuous => "Continuous",
            PumpControlType::Intermittent => "Intermittent",
        }
    }
}

// ---------------------------------------------------------------------------
// Air-side components
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fan {
    pub availability_schedule: Option<Handle>,
    pub fan_efficiency: f64,
    /// Pa
    pub pressure_rise: f64,
    /// m³/s
    pub maximum_flow_rate: Option<f64>,
    pub motor_efficiency: f64,
    pub motor_in_airstream_fraction: f64,
}

impl Fan {
    pub fn constant_volume() -> Self {
        Self {
            availability_schedule: None,
            fan_efficiency: 0.7,
            pressure_rise: 250.0,
            maximum_flow_rate: None,
            motor_efficiency: 0.9,
            motor_in_airstream_fraction: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FanVariableVolume {
    pub fan: Fan,
    pub minimum_flow_fraction: f64,
    pub power_coefficients: [f64; 5],
}

impl Default for FanVariableVolume {
    fn default() -> Self {
        Self {
            fan: Fan {
                availability_schedule: None,
                fan_efficiency: 0.6045,
                pressure_rise: 1017.592,
                maximum_flow_rate: None,
                motor_efficiency: 0.93,
                motor_in_airstream_fraction: 1.0,
            },
            minimum_flow_fraction: 0.25,
            power_coefficients: [0.040_759_894, 0.088_044_97, -0.072_926_12, 0.943_739_823, 0.0],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoilCoolingDx {
    pub availability_schedule: Option<Handle>,
    /// W
    pub rated_total_cooling_capacity: Option<f64>,
    pub rated_sensible_heat_ratio: Option<f64>,
    pub rated_cop: f64,
    pub rated_air_flow_rate: Option<f64>,
    pub total_cooling_capacity_curve: Option<Handle>,
    pub energy_input_ratio_curve: Option<Handle>,
}

impl Default for CoilCoolingDx {
    fn default() -> Self {
        Self {
            availability_schedule: None,
            rated_total_cooling_capacity: None,
            rated_sensible_heat_ratio: None,
            rated_cop: 3.0,
            rated_air_flow_rate: None,
            total_cooling_capacity_curve: None,
            energy_input_ratio_curve: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoilHeatingFuel {
    pub availability_schedule: Option<Handle>,
    pub fuel_type: FuelType,
    pub burner_efficiency: f64,
    pub nominal_capacity: Option<f64>,
    pub parasitic_electric_load: f64,
}

impl Default for CoilHeatingFuel {
    fn default() -> Self {
        Self {
            availability_schedule: None,
            fuel_type: FuelType::NaturalGas,
            burner_efficiency: 0.8,
            nominal_capacity: None,
            parasitic_electric_load: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoilHeatingElectric {
    pub availability_schedule: Option<Handle>,
    pub efficiency: f64,
    pub nominal_capacity: Option<f64>,
}

impl Default for CoilHeatingElectric {
    fn default() -> Self {
        Self { availability_schedule: None, efficiency: 1.0, nominal_capacity: None }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoilHeatingWater {
    pub availability_schedule: Option<Handle>,
    pub u_factor_times_area: Option<f64>,
    pub maximum_water_flow_rate: Option<f64>,
    pub rated_capacity: Option<f64>,
    pub rated_inlet_water_temperature: f64,
    pub rated_inlet_air_temperature: f64,
    pub rated_outlet_water_temperature: f64,
    pub rated_outlet_air_temperature: f64,
}

impl Default for CoilHeatingWater {
    fn default() -> Self {
        Self {
            availability_schedule: None,
            u_factor_times_area: None,
            maximum_water_flow_rate: None,
            rated_capacity: None,
            rated_inlet_water_temperature: 82.2,
            rated_inlet_air_temperature: 16.6,
            rated_outlet_water_temperature: 71.1,
            rated_outlet_air_temperature: 32.2,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CoilCoolingWater {
    pub availability_schedule: Option<Handle>,
    pub design_water_flow_rate: Option<f64>,
    pub design_air_flow_rate: Option<f64>,
    pub design_inlet_water_temperature: Option<f64>,
    pub design_inlet_air_temperature: Option<f64>,
    pub design_outlet_air_temperature: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HeatExchangerType {
    Plate,
    Rotary,
}

impl HeatExchangerType {
    pub fn as_str(&self) -> &'static str {
        match self {
            HeatExchangerType::Plate => "Plate",
            HeatExchangerType::Rotary => "Rotary",
        }
    }
}

/// `HeatExchanger:AirToAir:SensibleAndLatent`. Primary ports carry outdoor
/// (supply) air, secondary ports carry relief (exhaust) air.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatExchangerAirToAir {
    pub availability_schedule: Option<Handle>,
    pub nominal_supply_air_flow_rate: Option<f64>,
    pub sensible_effectiveness_100_heating: f64,
    pub latent_effectiveness_100_heating: f64,
    pub sensible_effectiveness_75_heating: f64,
    pub latent_effectiveness_75_heating: f64,
    pub sensible_effectiveness_100_cooling: f64,
    pub latent_effectiveness_100_cooling: f64,
    pub sensible_effectiveness_75_cooling: f64,
    pub latent_effectiveness_75_cooling: f64,
    pub nominal_electric_power: f64,
    pub supply_air_outlet_temperature_control: bool,
    pub heat_exchanger_type: HeatExchangerType,
    pub frost_control_type: String,
    pub threshold_temperature: f64,
    pub initial_defrost_time_fraction: Option<f64>,
    pub rate_of_defrost_time_fraction_increase: Option<f64>,
    pub economizer_lockout: bool,
}

impl Default for HeatExchangerAirToAir {
    fn default() -> Self {
        Self {
            availability_schedule: None,
            nominal_supply_air_flow_rate: None,
            sensible_effectiveness_100_heating: 0.76,
            latent_effectiveness_100_heating: 0.68,
            sensible_effectiveness_75_heating: 0.81,
            latent_effectiveness_75_heating: 0.73,
            sensible_effectiveness_100_cooling: 0.76,
            latent_effectiveness_100_cooling: 0.68,
            sensible_effectiveness_75_cooling: 0.81,
            latent_effectiveness_75_cooling: 0.73,
            nominal_electric_power: 0.0,
            supply_air_outlet_temperature_control: true,
            heat_exchanger_type: HeatExchangerType::Plate,
            frost_control_type: "None".to_owned(),
            threshold_temperature: 1.7,
            initial_defrost_time_fraction: None,
            rate_of_defrost_time_fraction_increase: None,
            economizer_lockout: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AirTerminalUncontrolled {
    pub availability_schedule: Option<Handle>,
    pub maximum_air_flow_rate: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AirTerminalVav {
    pub availability_schedule: Option<Handle>,
    pub maximum_air_flow_rate: Option<f64>,
    pub constant_minimum_air_flow_fraction: f64,
    /// Heating coil owned by the terminal. Not on any air path; a water coil
    /// may sit on a plant demand branch.
    pub reheat_coil: Option<Handle>,
}

impl Default for AirTerminalVav {
    fn default() -> Self {
        Self {
            availability_schedule: None,
            maximum_air_flow_rate: None,
            constant_minimum_air_flow_fraction: 0.3,
            reheat_coil: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Zone equipment
// ---------------------------------------------------------------------------

/// `ZoneHVAC:Baseboard:Convective:Electric`. Sits in a zone, on no path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaseboardElectric {
    pub availability_schedule: Option<Handle>,
    pub thermal_zone: Option<Handle>,
    /// W
    pub nominal_capacity: Option<f64>,
    pub efficiency: f64,
}

impl Default for BaseboardElectric {
    fn default() -> Self {
        Self { availability_schedule: None, thermal_zone: None, nominal_capacity: None, efficiency: 1.0 }
    }
}

/// `ZoneHVAC:Baseboard:Convective:Water`. Its water ports go on a plant
/// demand branch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaseboardWater {
    pub availability_schedule: Option<Handle>,
    pub thermal_zone: Option<Handle>,
    /// W/K
    pub u_factor_times_area: Option<f64>,
    /// m³/s
    pub maximum_water_flow_rate: Option<f64>,
    pub convergence_tolerance: f64,
}

impl Default for BaseboardWater {
    fn default() -> Self {
        Self {
            availability_schedule: None,
            thermal_zone: None,
            u_factor_times_area: None,
            maximum_water_flow_rate: None,
            convergence_tolerance: 0.001,
        }
    }
}

// ---------------------------------------------------------------------------
// Plant components
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pump {
    /// m³/s
    pub rated_flow_rate: Option<f64>,
    /// Pa
    pub rated_pump_head: f64,
    /// W
    pub rated_power_consumption: Option<f64>,
    pub motor_efficiency: f64,
    pub fraction_of_motor_inefficiencies_to_fluid_stream: f64,
    /// m³/s
    pub minimum_flow_rate: f64,
    pub control_type: PumpControlType,
}

impl Default for Pump {
    fn default() -> Self {
        Self {
            rated_flow_rate: None,
            rated_pump_head: 179_352.0,
            rated_power_consumption: None,
            motor_efficiency: 0.9,
            fraction_of_motor_inefficiencies_to_fluid_stream: 0.0,
            minimum_flow_rate: 0.0,
            control_type: PumpControlType::Intermittent,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Boiler {
    pub fuel_type: FuelType,
    pub nominal_capacity: Option<f64>,
    pub nominal_thermal_efficiency: f64,
    pub design_water_outlet_temperature: Option<f64>,
    pub parasitic_electric_load: f64,
    pub efficiency_curve: Option<Handle>,
}

impl Default for Boiler {
    fn default() -> Self {
        Self {
            fuel_type: FuelType::NaturalGas,
            nominal_capacity: None,
            nominal_thermal_efficiency: 0.8,
            design_water_outlet_temperature: None,
            parasitic_electric_load: 0.0,
            efficiency_curve: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chiller {
    /// W
    pub reference_capacity: Option<f64>,
    pub reference_cop: f64,
    pub reference_leaving_chilled_water_temperature: f64,
    pub reference_entering_condenser_fluid_temperature: f64,
    pub reference_chilled_water_flow_rate: Option<f64>,
    pub reference_condenser_fluid_flow_rate: Option<f64>,
    pub minimum_part_load_ratio: f64,
    pub minimum_unloading_ratio: f64,
    pub cooling_capacity_f_temperature: Option<Handle>,
    pub eir_f_temperature: Option<Handle>,
    pub eir_f_part_load_ratio: Option<Handle>,
}

impl Default for Chiller {
    fn default() -> Self {
        Self {
            reference_capacity: None,
            reference_cop: 5.5,
            reference_leaving_chilled_water_temperature: 6.67,
            reference_entering_condenser_fluid_temperature: 29.4,
            reference_chilled_water_flow_rate: None,
            reference_condenser_fluid_flow_rate: None,
            minimum_part_load_ratio: 0.1,
            minimum_unloading_ratio: 0.2,
            cooling_capacity_f_temperature: None,
            eir_f_temperature: None,
            eir_f_part_load_ratio: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CoolingTower {
    pub design_water_flow_rate: Option<f64>,
    pub design_air_flow_rate: Option<f64>,
    pub fan_power_at_design_air_flow_rate: Option<f64>,
    pub u_factor_times_area_at_design_air_flow_rate: Option<f64>,
}

// ---------------------------------------------------------------------------
// HvacComponent
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "component", rename_all = "snake_case")]
pub enum HvacComponent {
    FanConstantVolume(Fan),
    FanVariableVolume(FanVariableVolume),
    CoilCoolingDxSingleSpeed(CoilCoolingDx),
    CoilHeatingGas(CoilHeatingFuel),
    CoilHeatingElectric(CoilHeatingElectric),
    CoilHeatingWater(CoilHeatingWater),
    CoilCoolingWater(CoilCoolingWater),
    HeatExchangerAirToAir(HeatExchangerAirToAir),
    PumpConstantSpeed(Pump),
    PumpVariableSpeed(Pump),
    BoilerHotWater(Boiler),
    ChillerElectricEir(Chiller),
    CoolingTowerSingleSpeed(CoolingTower),
    PipeAdiabatic,
    AirTerminalUncontrolled(AirTerminalUncontrolled),
    AirTerminalVavReheat(AirTerminalVav),
    AirTerminalVavNoReheat(AirTerminalVav),
    BaseboardConvectiveElectric(BaseboardElectric),
    BaseboardConvectiveWater(BaseboardWater),
}

impl HvacComponent {
    /// EnergyPlus object type of the component.
    pub fn type_name(&self) -> &'static str {
        match self {
            HvacComponent::FanConstantVolume(_) => "Fan:ConstantVolume",
            HvacComponent::FanVariableVolume(_) => "Fan:VariableVolume",
            HvacComponent::CoilCoolingDxSingleSpeed(_) => "Coil:Cooling:DX:SingleSpeed",
            HvacComponent::CoilHeatingGas(_) => "Coil:Heating:Fuel",
            HvacComponent::CoilHeatingElectric(_) => "Coil:Heating:Electric",
            HvacComponent::CoilHeatingWater(_) => "Coil:Heating:Water",
            HvacComponent::CoilCoolingWater(_) => "Coil:Cooling:Water",
            HvacComponent::HeatExchangerAirToAir(_) => "HeatExchanger:AirToAir:SensibleAndLatent",
            HvacComponent::PumpConstantSpeed(_) => "Pump:ConstantSpeed",
            HvacComponent::PumpVariableSpeed(_) => "Pump:VariableSpeed",
            HvacComponent::BoilerHotWater(_) => "Boiler:HotWater",
            HvacComponent::ChillerElectricEir(_) => "Chiller:Electric:EIR",
            HvacComponent::CoolingTowerSingleSpeed(_) => "CoolingTower:SingleSpeed",
            HvacComponent::PipeAdiabatic => "Pipe:Adiabatic",
            HvacComponent::AirTerminalUncontrolled(_) => "AirTerminal:SingleDuct:Uncontrolled",
            HvacComponent::AirTerminalVavReheat(_) => "AirTerminal:SingleDuct:VAV:Reheat",
            HvacComponent::AirTerminalVavNoReheat(_) => "AirTerminal:SingleDuct:VAV:NoReheat",
            HvacComponent::BaseboardConvectiveElectric(_) => "ZoneHVAC:Baseboard:Convective:Electric",
            HvacComponent::BaseboardConvectiveWater(_) => "ZoneHVAC:Baseboard:Convective:Water",
        }
    }

    pub fn is_fan(&self) -> bool {
        matches!(self, HvacComponent::FanConstantVolume(_) | HvacComponent::FanVariableVolume(_))
    }

    pub fn is_cooling_coil(&self) -> bool {
        matches!(
            self,
            HvacComponent::CoilCoolingDxSingleSpeed(_) | HvacComponent::CoilCoolingWater(_)
        )
    }

    pub fn is_heating_coil(&self) -> bool {
        matches!(
            self,
            HvacComponent::CoilHeatingGas(_)
                | HvacComponent::CoilHeatingElectric(_)
                | HvacComponent::CoilHeatingWater(_)
        )
    }

    pub fn is_water_coil(&self) -> bool {
        matches!(self, HvacComponent::CoilHeatingWater(_) | HvacComponent::CoilCoolingWater(_))
    }

    pub fn is_pump(&self) -> bool {
        matches!(self, HvacComponent::PumpConstantSpeed(_) | HvacComponent::PumpVariableSpeed(_))
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            HvacComponent::AirTerminalUncontrolled(_)
                | HvacComponent::AirTerminalVavReheat(_)
                | HvacComponent::AirTerminalVavNoReheat(_)
        )
    }

    /// Whether the component is placed in a thermal zone.
    pub fn is_zone_equipment(&self) -> bool {
        matches!(
            self,
            HvacComponent::BaseboardConvectiveElectric(_) | HvacComponent::BaseboardConvectiveWater(_)
        )
    }

    /// Zone the equipment sits in.
    pub fn thermal_zone(&self) -> Option<Handle> {
        match self {
            HvacComponent::BaseboardConvectiveElectric(b) => b.thermal_zone,
            HvacComponent::BaseboardConvectiveWater(b) => b.thermal_zone,
            _ => None,
        }
    }

    pub(crate) fn set_thermal_zone(&mut self, zone: Option<Handle>) {
        match self {
            HvacComponent::BaseboardConvectiveElectric(b) => b.thermal_zone = zone,
            HvacComponent::BaseboardConvectiveWater(b) => b.thermal_zone = zone,
            _ => {}
        }
    }

    /// Whether the component has a second port pair.
    pub fn has_secondary_ports(&self) -> bool {
        matches!(
            self,
            HvacComponent::CoilHeatingWater(_)
                | HvacComponent::CoilCoolingWater(_)
                | HvacComponent::ChillerElectricEir(_)
                | HvacComponent::HeatExchangerAirToAir(_)
        )
    }

    /// Inlet/outlet ports used when the component is placed on `side`, or
    /// `None` if it cannot go there.
    pub fn port_pair(&self, side: PathSide) -> Option<(Port, Port)> {
        use HvacComponent as C;
        use PathSide as S;

        let primary = Some((INLET, OUTLET));
        let secondary = Some((SECONDARY_INLET, SECONDARY_OUTLET));
        match (self, side) {
            (
                C::FanConstantVolume(_)
                | C::FanVariableVolume(_)
                | C::CoilCoolingDxSingleSpeed(_)
                | C::CoilHeatingGas(_)
                | C::CoilHeatingElectric(_),
                S::AirSupply | S::OutdoorAir,
            ) => primary,
            (C::CoilHeatingWater(_) | C::CoilCoolingWater(_), S::AirSupply | S::OutdoorAir) => {
                primary
            }
            (C::CoilHeatingWater(_) | C::CoilCoolingWater(_), S::PlantDemand) => secondary,
            (C::ChillerElectricEir(_), S::PlantSupply) => primary,
            (C::ChillerElectricEir(_), S::PlantDemand) => secondary,
            (C::PumpConstantSpeed(_) | C::PumpVariableSpeed(_) | C::PipeAdiabatic, S::PlantSupply | S::PlantDemand) => {
                primary
            }
            (C::BaseboardConvectiveWater(_), S::PlantDemand) => primary,
            (C::BoilerHotWater(_) | C::CoolingTowerSingleSpeed(_), S::PlantSupply) => primary,
            (
                C::AirTerminalUncontrolled(_) | C::AirTerminalVavReheat(_) | C::AirTerminalVavNoReheat(_),
                S::AirDemand,
            ) => primary,
            (C::HeatExchangerAirToAir(_), S::OutdoorAir) => primary,
            (C::HeatExchangerAirToAir(_), S::Relief) => secondary,
            _ => None,
        }
    }

    pub fn availability_schedule(&self) -> Option<Handle> {
        match self {
            HvacComponent::FanConstantVolume(f) => f.availability_schedule,
            HvacComponent::FanVariableVolume(f) => f.fan.availability_schedule,
            HvacComponent::CoilCoolingDxSingleSpeed(c) => c.availability_schedule,
            HvacComponent::CoilHeatingGas(c) => c.availability_schedule,
            HvacComponent::CoilHeatingElectric(c) => c.availability_schedule,
            HvacComponent::CoilHeatingWater(c) => c.availability_schedule,
            HvacComponent::CoilCoolingWater(c) => c.availability_schedule,
            HvacComponent::HeatExchangerAirToAir(h) => h.availability_schedule,
            HvacComponent::AirTerminalUncontrolled(t) => t.availability_schedule,
            HvacComponent::AirTerminalVavReheat(t) | HvacComponent::AirTerminalVavNoReheat(t) => {
                t.availability_schedule
            }
            HvacComponent::BaseboardConvectiveElectric(b) => b.availability_schedule,
            HvacComponent::BaseboardConvectiveWater(b) => b.availability_schedule,
            _ => None,
        }
    }

    fn handle_slots(&mut self) -> Vec<&mut Option<Handle>> {
        match self {
            HvacComponent::FanConstantVolume(f) => vec![&mut f.availability_schedule],
            HvacComponent::FanVariableVolume(f) => vec![&mut f.fan.availability_schedule],
            HvacComponent::CoilCoolingDxSingleSpeed(c) => vec![
                &mut c.availability_schedule,
                &mut c.total_cooling_capacity_curve,
                &mut c.energy_input_ratio_curve,
            ],
            HvacComponent::CoilHeatingGas(c) => vec![&mut c.availability_schedule],
            HvacComponent::CoilHeatingElectric(c) => vec![&mut c.availability_schedule],
            HvacComponent::CoilHeatingWater(c) => vec![&mut c.availability_schedule],
            HvacComponent::CoilCoolingWater(c) => vec![&mut c.availability_schedule],
            HvacComponent::HeatExchangerAirToAir(h) => vec![&mut h.availability_schedule],
            HvacComponent::BoilerHotWater(b) => vec![&mut b.efficiency_curve],
            HvacComponent::ChillerElectricEir(c) => vec![
                &mut c.cooling_capacity_f_temperature,
                &mut c.eir_f_temperature,
                &mut c.eir_f_part_load_ratio,
            ],
            HvacComponent::AirTerminalUncontrolled(t) => vec![&mut t.availability_schedule],
            HvacComponent::AirTerminalVavReheat(t) | HvacComponent::AirTerminalVavNoReheat(t) => {
                vec![&mut t.availability_schedule, &mut t.reheat_coil]
            }
            HvacComponent::BaseboardConvectiveElectric(b) => {
                vec![&mut b.availability_schedule, &mut b.thermal_zone]
            }
            HvacComponent::BaseboardConvectiveWater(b) => {
                vec![&mut b.availability_schedule, &mut b.thermal_zone]
            }
            HvacComponent::PumpConstantSpeed(_)
            | HvacComponent::PumpVariableSpeed(_)
            | HvacComponent::CoolingTowerSingleSpeed(_)
            | HvacComponent::PipeAdiabatic => Vec::new(),
        }
    }

    pub fn references(&self) -> Vec<Handle> {
        self.clone().handle_slots().into_iter().filter_map(|s| *s).collect()
    }

    pub(crate) fn clear_reference(&mut self, target: Handle) {
        for slot in self.handle_slots() {
            if *slot == Some(target) {
                *slot = None;
            }
        }
    }

    /// Reheat coil owned by a VAV terminal.
    pub fn reheat_coil(&self) -> Option<Handle> {
        match self {
            HvacComponent::AirTerminalVavReheat(t) => t.reheat_coil,
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn water_coil_uses_secondary_ports_on_plant_demand() {
        let coil = HvacComponent::CoilHeatingWater(CoilHeatingWater::default());
        assert_eq!(coil.port_pair(PathSide::AirSupply), Some((INLET, OUTLET)));
        assert_eq!(
            coil.port_pair(PathSide::PlantDemand),
            Some((SECONDARY_INLET, SECONDARY_OUTLET))
        );
        assert_eq!(coil.port_pair(PathSide::PlantSupply), None);
    }

    #[test]
    fn boiler_only_goes_on_plant_supply() {
        let boiler = HvacComponent::BoilerHotWater(Boiler::default());
        assert!(boiler.port_pair(PathSide::PlantSupply).is_some());
        assert!(boiler.port_pair(PathSide::PlantDemand).is_none());
        assert!(boiler.port_pair(PathSide::AirSupply).is_none());
    }

    #[test]
    fn terminal_only_goes_on_air_demand() {
        let terminal = HvacComponent::AirTerminalUncontrolled(AirTerminalUncontrolled::default());
        assert!(terminal.port_pair(PathSide::AirDemand).is_some());
        assert!(terminal.port_pair(PathSide::AirSupply).is_none());
    }

    #[test]
    fn water_baseboard_only_goes_on_plant_demand() {
        let baseboard = HvacComponent::BaseboardConvectiveWater(BaseboardWater::default());
        assert!(baseboard.is_zone_equipment());
        assert_eq!(baseboard.port_pair(PathSide::PlantDemand), Some((INLET, OUTLET)));
        assert_eq!(baseboard.port_pair(PathSide::PlantSupply), None);
        assert_eq!(baseboard.port_pair(PathSide::AirDemand), None);

        let electric = HvacComponent::BaseboardConvectiveElectric(BaseboardElectric::default());
        for side in [PathSide::AirSupply, PathSide::AirDemand, PathSide::PlantSupply, PathSide::PlantDemand] {
            assert_eq!(electric.port_pair(side), None);
        }
    }

    #[test]
    fn references_lists_set_handles_only() {
        let curve = Handle::new();
        let chiller = HvacComponent::ChillerElectricEir(Chiller {
            eir_f_temperature: Some(curve),
            ..Chiller::default()
        });
        assert_eq!(chiller.references(), vec![curve]);
    }

    #[test]
    fn fuel_type_parses_common_spellings() {
        assert_eq!(FuelType::from_name("Gas"), Some(FuelType::NaturalGas));
        assert_eq!(FuelType::from_name("FuelOil#2"), Some(FuelType::FuelOil2));
        assert_eq!(FuelType::from_name("coal"), None);
    }
}
