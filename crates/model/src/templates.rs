//! Canned system topologies.
//!
//! Each builder wires a complete loop with its components and setpoint
//! managers and returns the loop handle. Plants are created on demand.

use tracing::info;

use crate::components::{
    Boiler, Chiller, CoilCoolingDx, CoilCoolingWater, CoilHeatingFuel, CoilHeatingWater,
    CoolingTower, Fan, FanVariableVolume, HvacComponent, Pump,
};
use crate::connection::MIXED_AIR;
use crate::error::ModelError;
use crate::loops::{ControllerOutdoorAir, EconomizerControlType, PlantLoopType};
use crate::objects::Handle;
use crate::resources::{Curve, Schedule, ScheduleType};
use crate::setpoint::SetpointManager;
use crate::Model;

// ---------------------------------------------------------------------------
// Default performance curves
// ---------------------------------------------------------------------------

/// Chiller curves: capacity f(T), EIR f(T), EIR f(PLR).
pub fn add_default_chiller_curves(model: &mut Model) -> (Handle, Handle, Handle) {
    let cap = model.add_curve(
        "Chiller Cap fTemp",
        Curve::Biquadratic {
            coefficients: [1.0215158, 0.037035864, 0.0002332476, -0.003894048, -6.52536e-5, -0.0002680452],
            minimum_x: 5.0,
            maximum_x: 10.0,
            minimum_y: 24.0,
            maximum_y: 35.0,
        },
    );
    let eir = model.add_curve(
        "Chiller EIR fTemp",
        Curve::Biquadratic {
            coefficients: [0.70176857, -0.00452016, 0.0005331096, -0.005498208, 0.0005445792, -0.0007290324],
            minimum_x: 5.0,
            maximum_x: 10.0,
            minimum_y: 24.0,
            maximum_y: 35.0,
        },
    );
    let plr = model.add_curve(
        "Chiller EIR fPLR",
        Curve::Quadratic {
            coefficients: [0.06369119, 0.58488832, 0.35280274],
            minimum_x: 0.0,
            maximum_x: 1.0,
        },
    );
    (cap, eir, plr)
}

/// DX cooling coil curves: total capacity f(T), EIR f(T).
pub fn add_default_dx_curves(model: &mut Model) -> (Handle, Handle) {
    let cap = model.add_curve(
        "DX Cap fTemp",
        Curve::Biquadratic {
            coefficients: [0.942587793, 0.009543347, 0.00068377, -0.011042676, 0.000005249, -0.00000972],
            minimum_x: 17.0,
            maximum_x: 22.0,
            minimum_y: 13.0,
            maximum_y: 46.0,
        },
    );
    let eir = model.add_curve(
        "DX EIR fTemp",
        Curve::Biquadratic {
            coefficients: [0.342414409, 0.034885008, -0.0006237, 0.004977216, 0.000437951, -0.000728028],
            minimum_x: 17.0,
            maximum_x: 22.0,
            minimum_y: 13.0,
            maximum_y: 46.0,
        },
    );
    (cap, eir)
}

pub fn dx_cooling_coil(model: &mut Model) -> HvacComponent {
    let (cap, eir) = add_default_dx_curves(model);
    HvacComponent::CoilCoolingDxSingleSpeed(CoilCoolingDx {
        total_cooling_capacity_curve: Some(cap),
        energy_input_ratio_curve: Some(eir),
        ..CoilCoolingDx::default()
    })
}

pub fn chiller(model: &mut Model) -> HvacComponent {
    let (cap, eir, plr) = add_default_chiller_curves(model);
    HvacComponent::ChillerElectricEir(Chiller {
        cooling_capacity_f_temperature: Some(cap),
        eir_f_temperature: Some(eir),
        eir_f_part_load_ratio: Some(plr),
        ..Chiller::default()
    })
}

// ---------------------------------------------------------------------------
// Plants
// ---------------------------------------------------------------------------

fn scheduled_supply_setpoint(
    model: &mut Model,
    plant: Handle,
    label: &str,
    temperature: f64,
) -> Result<(), ModelError> {
    let schedule = model.add_schedule(
        &format!("{label} Temp - {temperature}C"),
        Schedule::constant(ScheduleType::Temperature, temperature),
    );
    let spm = model.add_setpoint_manager(
        &format!("{label} Setpoint Manager"),
        SetpointManager::scheduled(schedule),
    );
    let outlet = model.plant_loop(plant)?.supply_outlet_node();
    model.add_setpoint_manager_to_node(spm, outlet)
}

/// Pump, boiler, supply bypass, demand bypass and a 67 °C scheduled setpoint.
pub fn add_hot_water_plant(model: &mut Model) -> Result<Handle, ModelError> {
    let plant = model.add_plant_loop("Hot Water Loop")?;
    {
        let l = model.plant_loop_mut(plant)?;
        l.sizing.loop_type = PlantLoopType::Heating;
        l.sizing.design_loop_exit_temperature = 82.0;
        l.sizing.loop_design_temperature_difference = 11.0;
    }
    let inlet = model.plant_loop(plant)?.supply_inlet_node();

    let pump = model.add_component("Hot Water Pump", HvacComponent::PumpVariableSpeed(Pump::default()));
    model.add_to_node(pump, inlet)?;
    let boiler = model.add_component("Boiler", HvacComponent::BoilerHotWater(Boiler::default()));
    model.add_supply_branch_for_component(plant, boiler)?;
    let bypass = model.add_component("Hot Water Supply Bypass", HvacComponent::PipeAdiabatic);
    model.add_supply_branch_for_component(plant, bypass)?;
    let demand_bypass = model.add_component("Hot Water Demand Bypass", HvacComponent::PipeAdiabatic);
    model.add_demand_branch_for_component(plant, demand_bypass)?;

    scheduled_supply_setpoint(model, plant, "Hot Water Loop", 67.0)?;
    info!(%plant, "hot water plant created");
    Ok(plant)
}

/// Pump, chiller, bypasses and a 6.7 °C scheduled setpoint. The chiller's
/// condenser side joins `condenser` when given.
pub fn add_chilled_water_plant(model: &mut Model, condenser: Option<Handle>) -> Result<Handle, ModelError> {
    let plant = model.add_plant_loop("Chilled Water Loop")?;
    {
        let l = model.plant_loop_mut(plant)?;
        l.sizing.loop_type = PlantLoopType::Cooling;
        l.sizing.design_loop_exit_temperature = 7.22;
        l.sizing.loop_design_temperature_difference = 6.67;
    }
    let inlet = model.plant_loop(plant)?.supply_inlet_node();

    let pump = model.add_component("Chilled Water Pump", HvacComponent::PumpVariableSpeed(Pump::default()));
    model.add_to_node(pump, inlet)?;
    let chiller_kind = chiller(model);
    let chiller = model.add_component("Chiller", chiller_kind);
    model.add_supply_branch_for_component(plant, chiller)?;
    let bypass = model.add_component("Chilled Water Supply Bypass", HvacComponent::PipeAdiabatic);
    model.add_supply_branch_for_component(plant, bypass)?;
    let demand_bypass = model.add_component("Chilled Water Demand Bypass", HvacComponent::PipeAdiabatic);
    model.add_demand_branch_for_component(plant, demand_bypass)?;

    if let Some(condenser) = condenser {
        model.add_demand_branch_for_component(condenser, chiller)?;
    }

    scheduled_supply_setpoint(model, plant, "Chilled Water Loop", 6.7)?;
    info!(%plant, "chilled water plant created");
    Ok(plant)
}

/// Pump, cooling tower, bypasses and a wet-bulb following setpoint.
pub fn add_condenser_loop(model: &mut Model) -> Result<Handle, ModelError> {
    let plant = model.add_plant_loop("Condenser Water Loop")?;
    {
        let l = model.plant_loop_mut(plant)?;
        l.sizing.loop_type = PlantLoopType::Condenser;
        l.sizing.design_loop_exit_temperature = 29.4;
        l.sizing.loop_design_temperature_difference = 5.6;
    }
    let (inlet, outlet) = {
        let l = model.plant_loop(plant)?;
        (l.supply_inlet_node(), l.supply_outlet_node())
    };

    let pump = model.add_component("Condenser Water Pump", HvacComponent::PumpConstantSpeed(Pump::default()));
    model.add_to_node(pump, inlet)?;
    let tower = model.add_component(
        "Cooling Tower",
        HvacComponent::CoolingTowerSingleSpeed(CoolingTower::default()),
    );
    model.add_supply_branch_for_component(plant, tower)?;
    let bypass = model.add_component("Condenser Water Supply Bypass", HvacComponent::PipeAdiabatic);
    model.add_supply_branch_for_component(plant, bypass)?;
    let demand_bypass = model.add_component("Condenser Water Demand Bypass", HvacComponent::PipeAdiabatic);
    model.add_demand_branch_for_component(plant, demand_bypass)?;

    let spm = model.add_setpoint_manager(
        "Condenser Water Loop Setpoint Manager",
        SetpointManager::follow_outdoor_air_temperature(),
    );
    model.add_setpoint_manager_to_node(spm, outlet)?;
    info!(%plant, "condenser loop created");
    Ok(plant)
}

// ---------------------------------------------------------------------------
// Air systems
// ---------------------------------------------------------------------------

fn add_outdoor_air(model: &mut Model, air_loop: Handle, economizer: EconomizerControlType) -> Result<Handle, ModelError> {
    let controller = ControllerOutdoorAir {
        economizer_control_type: economizer,
        ..ControllerOutdoorAir::default()
    };
    let oa = model.add_outdoor_air_system("Outdoor Air System", controller)?;
    let outlet = model.air_loop(air_loop)?.supply_outlet_node();
    model.add_to_node(oa, outlet)?;
    Ok(oa)
}

fn supply_outlet(model: &Model, air_loop: Handle) -> Result<Handle, ModelError> {
    Ok(model.air_loop(air_loop)?.supply_outlet_node())
}

/// Packaged rooftop unit: OA system, DX cooling, gas heating, constant
/// volume fan, single-zone reheat control.
pub fn add_system_type_3(model: &mut Model) -> Result<Handle, ModelError> {
    let air_loop = model.add_air_loop("Packaged Rooftop Unit")?;
    add_outdoor_air(model, air_loop, EconomizerControlType::NoEconomizer)?;
    let outlet = supply_outlet(model, air_loop)?;

    let cooling_kind = dx_cooling_coil(model);
    let cooling = model.add_component("DX Cooling Coil", cooling_kind);
    model.add_to_node(cooling, outlet)?;
    let heating = model.add_component("Gas Heating Coil", HvacComponent::CoilHeatingGas(CoilHeatingFuel::default()));
    model.add_to_node(heating, outlet)?;
    let fan = model.add_component("Supply Fan", HvacComponent::FanConstantVolume(Fan::constant_volume()));
    model.add_to_node(fan, outlet)?;

    let spm = model.add_setpoint_manager(
        "Single Zone Reheat Setpoint Manager",
        SetpointManager::single_zone_reheat(),
    );
    model.add_setpoint_manager_to_node(spm, outlet)?;
    info!(%air_loop, "system type 3 created");
    Ok(air_loop)
}

/// Packaged VAV with hot water reheat: OA system, DX cooling, hot water
/// heating on a new hot water plant, variable volume fan, 12.8 °C deck.
pub fn add_system_type_5(model: &mut Model) -> Result<Handle, ModelError> {
    let air_loop = model.add_air_loop("Packaged VAV with Reheat")?;
    add_outdoor_air(model, air_loop, EconomizerControlType::NoEconomizer)?;
    let outlet = supply_outlet(model, air_loop)?;

    let cooling_kind = dx_cooling_coil(model);
    let cooling = model.add_component("DX Cooling Coil", cooling_kind);
    model.add_to_node(cooling, outlet)?;
    let heating = model.add_component("Hot Water Heating Coil", HvacComponent::CoilHeatingWater(CoilHeatingWater::default()));
    model.add_to_node(heating, outlet)?;
    let fan = model.add_component("Supply Fan", HvacComponent::FanVariableVolume(FanVariableVolume::default()));
    model.add_to_node(fan, outlet)?;

    let hot_water = add_hot_water_plant(model)?;
    model.add_demand_branch_for_component(hot_water, heating)?;

    deck_temperature_setpoint(model, air_loop, 12.8)?;
    info!(%air_loop, "system type 5 created");
    Ok(air_loop)
}

/// Central VAV: chilled and hot water coils, chiller plant with condenser
/// loop, boiler plant, a mixed air manager behind the OA system.
pub fn add_system_type_7(model: &mut Model) -> Result<Handle, ModelError> {
    let air_loop = model.add_air_loop("VAV with Reheat")?;
    let oa = add_outdoor_air(model, air_loop, EconomizerControlType::DifferentialDryBulb)?;
    let outlet = supply_outlet(model, air_loop)?;

    let cooling = model.add_component("Chilled Water Cooling Coil", HvacComponent::CoilCoolingWater(CoilCoolingWater::default()));
    model.add_to_node(cooling, outlet)?;
    let heating = model.add_component("Hot Water Heating Coil", HvacComponent::CoilHeatingWater(CoilHeatingWater::default()));
    model.add_to_node(heating, outlet)?;
    let fan = model.add_component("Supply Fan", HvacComponent::FanVariableVolume(FanVariableVolume::default()));
    model.add_to_node(fan, outlet)?;

    let condenser = add_condenser_loop(model)?;
    let chilled_water = add_chilled_water_plant(model, Some(condenser))?;
    let hot_water = add_hot_water_plant(model)?;
    model.add_demand_branch_for_component(chilled_water, cooling)?;
    model.add_demand_branch_for_component(hot_water, heating)?;

    deck_temperature_setpoint(model, air_loop, 12.8)?;

    let mixed_air_node = model
        .outlet_node_of(oa, MIXED_AIR)
        .ok_or(ModelError::Topology { handle: oa, message: "outdoor air system has no mixed air node".into() })?;
    let spm = model.add_setpoint_manager("Mixed Air Setpoint Manager", SetpointManager::mixed_air());
    model.add_setpoint_manager_to_node(spm, mixed_air_node)?;

    info!(%air_loop, "system type 7 created");
    Ok(air_loop)
}

fn deck_temperature_setpoint(model: &mut Model, air_loop: Handle, temperature: f64) -> Result<(), ModelError> {
    let schedule = model.add_schedule(
        &format!("Deck Temperature - {temperature}C"),
        Schedule::constant(ScheduleType::Temperature, temperature),
    );
    let spm = model.add_setpoint_manager("Deck Temperature Setpoint Manager", SetpointManager::scheduled(schedule));
    let outlet = supply_outlet(model, air_loop)?;
    model.add_setpoint_manager_to_node(spm, outlet)
}
