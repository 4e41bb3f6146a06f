//! Integration tests for loop editing and the setpoint manager protocol.
//!
//! Everything runs against an in-memory `Model`; no files are touched.

use crate::components::{
    AirTerminalVav, BaseboardElectric, BaseboardWater, CoilHeatingElectric, CoilHeatingWater, Fan,
    HeatExchangerAirToAir, HvacComponent, Pump,
};
use crate::connection::{INLET, MIXED_AIR, OUTLET, SECONDARY_INLET};
use crate::loops::{ControllerOutdoorAir, NodeLocation, ThermalZone};
use crate::resources::{Schedule, ScheduleType};
use crate::setpoint::{ControlVariable, SetpointManager, SpmKind};
use crate::templates;
use crate::topology::{validate_loop, validate_model};
use crate::{Handle, Model, ModelError};

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Air loop with an OA system and one fan; returns (loop, oa system, fan).
fn air_loop_with_fan(model: &mut Model) -> (Handle, Handle, Handle) {
    let air_loop = model.add_air_loop("AHU").unwrap();
    let outlet = model.air_loop(air_loop).unwrap().supply_outlet_node();
    let oa = model
        .add_outdoor_air_system("OA System", ControllerOutdoorAir::default())
        .unwrap();
    model.add_to_node(oa, outlet).unwrap();
    let fan = model.add_component("Fan", HvacComponent::FanConstantVolume(Fan::constant_volume()));
    model.add_to_node(fan, outlet).unwrap();
    (air_loop, oa, fan)
}

fn temperature_schedule(model: &mut Model, value: f64) -> Handle {
    model.add_schedule("Temp", Schedule::constant(ScheduleType::Temperature, value))
}

fn non_node_names(model: &Model, path: &[Handle]) -> Vec<String> {
    path.iter()
        .filter(|h| !model.object(**h).unwrap().is_node())
        .map(|h| model.name(*h).unwrap().to_owned())
        .collect()
}

// ---------------------------------------------------------------------------
// Setpoint manager attachment
// ---------------------------------------------------------------------------

#[test]
fn second_manager_with_same_variable_evicts_first() {
    let mut model = Model::new();
    let (air_loop, _, _) = air_loop_with_fan(&mut model);
    let outlet = model.air_loop(air_loop).unwrap().supply_outlet_node();

    let first = model.add_setpoint_manager("SZR", SetpointManager::single_zone_reheat());
    model.add_setpoint_manager_to_node(first, outlet).unwrap();
    let schedule = temperature_schedule(&mut model, 13.0);
    let second = model.add_setpoint_manager("Scheduled", SetpointManager::scheduled(schedule));
    model.add_setpoint_manager_to_node(second, outlet).unwrap();

    assert!(!model.contains(first));
    assert_eq!(model.setpoint_managers(outlet), vec![second]);
    assert_eq!(model.setpoint_manager(second).unwrap().setpoint_node(), Some(outlet));
}

#[test]
fn managers_with_different_variables_coexist() {
    let mut model = Model::new();
    let (air_loop, _, _) = air_loop_with_fan(&mut model);
    let outlet = model.air_loop(air_loop).unwrap().supply_outlet_node();
    let schedule = temperature_schedule(&mut model, 13.0);

    let temperature = model.add_setpoint_manager("T", SetpointManager::scheduled(schedule));
    let humidity = model.add_setpoint_manager(
        "H",
        SetpointManager::scheduled(schedule)
            .with_control_variable(ControlVariable::MaximumHumidityRatio)
            .unwrap(),
    );
    model.add_setpoint_manager_to_node(temperature, outlet).unwrap();
    model.add_setpoint_manager_to_node(humidity, outlet).unwrap();

    assert_eq!(model.setpoint_managers(outlet).len(), 2);
    assert_eq!(
        model.setpoint_manager_for(outlet, ControlVariable::MaximumHumidityRatio),
        Some(humidity)
    );
}

#[test]
fn failed_attach_changes_nothing() {
    let mut model = Model::new();
    let (air_loop, _, _) = air_loop_with_fan(&mut model);
    let demand_inlet = model.air_loop(air_loop).unwrap().demand_inlet_node();
    let spm = model.add_setpoint_manager("SZR", SetpointManager::single_zone_reheat());
    let before = model.to_json().unwrap();

    let err = model.add_setpoint_manager_to_node(spm, demand_inlet).unwrap_err();
    assert!(matches!(err, ModelError::IncompatibleSetpointManager { node, .. } if node == demand_inlet));
    assert_eq!(model.to_json().unwrap(), before);
    assert_eq!(model.setpoint_manager(spm).unwrap().setpoint_node(), None);
}

#[test]
fn handle_from_another_model_is_rejected() {
    let mut model = Model::new();
    let (air_loop, _, _) = air_loop_with_fan(&mut model);
    let outlet = model.air_loop(air_loop).unwrap().supply_outlet_node();

    let mut other = Model::new();
    let foreign = other.add_setpoint_manager("Foreign", SetpointManager::single_zone_reheat());

    assert!(matches!(
        model.add_setpoint_manager_to_node(foreign, outlet),
        Err(ModelError::NotInModel(h)) if h == foreign
    ));
    assert!(model.setpoint_managers(outlet).is_empty());
}

#[test]
fn plant_supply_accepts_only_plant_capable_managers() {
    let mut model = Model::new();
    let plant = model.add_plant_loop("HW").unwrap();
    let outlet = model.plant_loop(plant).unwrap().supply_outlet_node();

    let szr = model.add_setpoint_manager("SZR", SetpointManager::single_zone_reheat());
    assert!(matches!(
        model.add_setpoint_manager_to_node(szr, outlet),
        Err(ModelError::IncompatibleSetpointManager { .. })
    ));

    let follow = model.add_setpoint_manager("Follow", SetpointManager::follow_outdoor_air_temperature());
    model.add_setpoint_manager_to_node(follow, outlet).unwrap();
    let reset = model.add_setpoint_manager("Reset", SetpointManager::outdoor_air_reset());
    model.add_setpoint_manager_to_node(reset, outlet).unwrap();

    // same control variable, so the reset manager replaced the follower
    assert!(!model.contains(follow));
    assert_eq!(model.setpoint_managers(outlet), vec![reset]);
}

#[test]
fn plant_demand_rejects_every_manager() {
    let mut model = Model::new();
    let plant = model.add_plant_loop("HW").unwrap();
    let demand_inlet = model.plant_loop(plant).unwrap().demand_inlet_node();
    let schedule = temperature_schedule(&mut model, 60.0);
    let spm = model.add_setpoint_manager("Scheduled", SetpointManager::scheduled(schedule));

    assert!(matches!(
        model.add_setpoint_manager_to_node(spm, demand_inlet),
        Err(ModelError::IncompatibleSetpointManager { .. })
    ));
}

#[test]
fn outboard_outdoor_air_node_is_rejected_but_stream_is_accepted() {
    let mut model = Model::new();
    let (_, oa, _) = air_loop_with_fan(&mut model);
    let outboard = model.outdoor_air_system(oa).unwrap().outboard_oa_node();
    assert!(matches!(model.node_location(outboard), NodeLocation::OutdoorAir { outboard: true, .. }));

    let spm = model.add_setpoint_manager("Mixed", SetpointManager::mixed_air());
    assert!(matches!(
        model.add_setpoint_manager_to_node(spm, outboard),
        Err(ModelError::IncompatibleSetpointManager { .. })
    ));

    let hx = model.add_component("HX", HvacComponent::HeatExchangerAirToAir(HeatExchangerAirToAir::default()));
    model.add_to_node(hx, outboard).unwrap();
    let hx_outlet = model.outlet_node_of(hx, OUTLET).unwrap();
    assert!(matches!(model.node_location(hx_outlet), NodeLocation::OutdoorAir { outboard: false, .. }));
    model.add_setpoint_manager_to_node(spm, hx_outlet).unwrap();
}

#[test]
fn mixed_air_manager_tracks_the_supply_fan() {
    let mut model = Model::new();
    let (air_loop, oa, fan) = air_loop_with_fan(&mut model);
    let mixed = model.outlet_node_of(oa, MIXED_AIR).unwrap();
    // a coil between the OA system and the fan keeps the mixed air node
    // alive when the fan goes
    let coil = model.add_component("Heat", HvacComponent::CoilHeatingElectric(CoilHeatingElectric::default()));
    model.add_to_node(coil, mixed).unwrap();
    let spm = model.add_setpoint_manager("Mixed", SetpointManager::mixed_air());
    model.add_setpoint_manager_to_node(spm, mixed).unwrap();

    let fan_inlet = model.inlet_node_of(fan, INLET);
    let reference = model.air_loop(air_loop).unwrap().supply_outlet_node();
    match model.setpoint_manager(spm).unwrap().kind() {
        SpmKind::MixedAir { reference_setpoint_node, fan_inlet_node, fan_outlet_node } => {
            assert_eq!(*reference_setpoint_node, Some(reference));
            assert_eq!(*fan_inlet_node, fan_inlet);
            assert_eq!(*fan_outlet_node, Some(reference));
        }
        other => panic!("unexpected kind {other:?}"),
    }

    model.remove(fan).unwrap();
    assert_eq!(model.outlet_node_of(oa, MIXED_AIR), Some(mixed));
    assert!(matches!(
        model.setpoint_manager(spm).unwrap().kind(),
        SpmKind::MixedAir { fan_inlet_node: None, fan_outlet_node: None, .. }
    ));
}

#[test]
fn changing_control_variable_evicts_clash() {
    let mut model = Model::new();
    let (air_loop, _, _) = air_loop_with_fan(&mut model);
    let outlet = model.air_loop(air_loop).unwrap().supply_outlet_node();
    let schedule = temperature_schedule(&mut model, 13.0);

    let a = model.add_setpoint_manager("A", SetpointManager::scheduled(schedule));
    let b = model.add_setpoint_manager(
        "B",
        SetpointManager::scheduled(schedule)
            .with_control_variable(ControlVariable::HumidityRatio)
            .unwrap(),
    );
    model.add_setpoint_manager_to_node(a, outlet).unwrap();
    model.add_setpoint_manager_to_node(b, outlet).unwrap();

    model.set_control_variable(b, ControlVariable::Temperature).unwrap();
    assert!(!model.contains(a));
    assert_eq!(model.setpoint_managers(outlet), vec![b]);

    let szr = model.add_setpoint_manager("SZR", SetpointManager::single_zone_reheat());
    assert!(matches!(
        model.set_control_variable(szr, ControlVariable::HumidityRatio),
        Err(ModelError::InvalidControlVariable { .. })
    ));
}

// ---------------------------------------------------------------------------
// Cloning and removal
// ---------------------------------------------------------------------------

#[test]
fn attached_manager_keeps_its_kind() {
    let mut model = Model::new();
    let (air_loop, _, _) = air_loop_with_fan(&mut model);
    let outlet = model.air_loop(air_loop).unwrap().supply_outlet_node();
    let schedule = temperature_schedule(&mut model, 0.008);
    let humidity = SetpointManager::scheduled(schedule)
        .with_control_variable(ControlVariable::HumidityRatio)
        .unwrap();
    let spm = model.add_setpoint_manager("Humidity", humidity);
    model.add_setpoint_manager_to_node(spm, outlet).unwrap();

    let swapped =
        model.edit_setpoint_manager(spm, |kind| *kind = SetpointManager::single_zone_reheat().kind().clone());
    assert!(matches!(
        swapped,
        Err(ModelError::KindChanged { to: "SetpointManager:SingleZone:Reheat", .. })
    ));
    assert_eq!(
        model.setpoint_manager(spm).unwrap().kind(),
        &SpmKind::Scheduled { schedule: Some(schedule) }
    );

    model
        .edit_setpoint_manager(spm, |kind| {
            if let SpmKind::Scheduled { schedule } = kind {
                *schedule = None;
            }
        })
        .unwrap();
    assert_eq!(model.setpoint_manager(spm).unwrap().kind(), &SpmKind::Scheduled { schedule: None });
    validate_model(&model).unwrap();
}

#[test]
fn cloned_manager_is_unattached() {
    let mut model = Model::new();
    let (air_loop, _, _) = air_loop_with_fan(&mut model);
    let outlet = model.air_loop(air_loop).unwrap().supply_outlet_node();
    let spm = model.add_setpoint_manager("SZR", SetpointManager::single_zone_reheat());
    model.add_setpoint_manager_to_node(spm, outlet).unwrap();

    let copy = model.clone_object(spm).unwrap();
    assert_ne!(copy, spm);
    assert_eq!(model.name(copy), Some("SZR 1"));
    assert_eq!(model.setpoint_manager(copy).unwrap().setpoint_node(), None);
    assert_eq!(model.setpoint_managers(outlet), vec![spm]);
}

#[test]
fn loops_cannot_be_cloned() {
    let mut model = Model::new();
    let air_loop = model.add_air_loop("AHU").unwrap();
    assert!(matches!(model.clone_object(air_loop), Err(ModelError::CannotClone(h)) if h == air_loop));
}

#[test]
fn cloned_reheat_terminal_gets_its_own_coil() {
    let mut model = Model::new();
    let coil = model.add_component("Reheat", HvacComponent::CoilHeatingElectric(CoilHeatingElectric::default()));
    let terminal = model.add_component(
        "VAV",
        HvacComponent::AirTerminalVavReheat(AirTerminalVav { reheat_coil: Some(coil), ..AirTerminalVav::default() }),
    );

    let copy = model.clone_object(terminal).unwrap();
    let copied_coil = model.component(copy).unwrap().reheat_coil().unwrap();
    assert_ne!(copied_coil, coil);
    assert!(model.component(copied_coil).unwrap().is_heating_coil());
}

#[test]
fn removing_node_removes_its_managers() {
    let mut model = Model::new();
    let (_, _, fan) = air_loop_with_fan(&mut model);
    let fan_inlet = model.inlet_node_of(fan, INLET).unwrap();
    let schedule = temperature_schedule(&mut model, 13.0);
    let spm = model.add_setpoint_manager("Scheduled", SetpointManager::scheduled(schedule));
    model.add_setpoint_manager_to_node(spm, fan_inlet).unwrap();

    model.remove(fan_inlet).unwrap();
    assert!(!model.contains(spm));
    assert!(model.contains(schedule));
}

#[test]
fn removing_component_closes_the_gap() {
    let mut model = Model::new();
    let (air_loop, _, fan) = air_loop_with_fan(&mut model);
    let outlet = model.air_loop(air_loop).unwrap().supply_outlet_node();
    let coil = model.add_component("Heat", HvacComponent::CoilHeatingElectric(CoilHeatingElectric::default()));
    model.add_to_node(coil, outlet).unwrap();
    let before = model.supply_components(air_loop).unwrap().len();

    model.remove(fan).unwrap();
    let supply = validate_loop(&model, air_loop).unwrap();
    assert_eq!(supply.len(), before - 2);
    assert_eq!(non_node_names(&model, &supply), vec!["OA System", "Heat"]);
}

#[test]
fn fixed_loop_nodes_cannot_be_removed() {
    let mut model = Model::new();
    let air_loop = model.add_air_loop("AHU").unwrap();
    let outlet = model.air_loop(air_loop).unwrap().supply_outlet_node();
    assert!(matches!(
        model.remove(outlet),
        Err(ModelError::ObjectInUse { by, .. }) if by == air_loop
    ));
}

#[test]
fn referenced_schedule_is_in_use() {
    let mut model = Model::new();
    let schedule = temperature_schedule(&mut model, 13.0);
    let spm = model.add_setpoint_manager("Scheduled", SetpointManager::scheduled(schedule));

    assert!(matches!(
        model.remove(schedule),
        Err(ModelError::ObjectInUse { by, .. }) if by == spm
    ));
    model.remove(spm).unwrap();
    model.remove(schedule).unwrap();
    assert!(!model.contains(schedule));
}

#[test]
fn removing_air_loop_keeps_zones() {
    let mut model = Model::new();
    let (air_loop, oa, fan) = air_loop_with_fan(&mut model);
    let zone = model.add_thermal_zone("Zone 1", ThermalZone::default());
    model.add_branch_for_zone(air_loop, zone, None).unwrap();

    model.remove(air_loop).unwrap();
    assert!(model.contains(zone));
    for gone in [air_loop, oa, fan] {
        assert!(!model.contains(gone));
    }
    assert!(model.connections().connections_of(zone).is_empty());
}

#[test]
fn removing_plant_keeps_air_side_of_water_coil() {
    let mut model = Model::new();
    let air_loop = model.add_air_loop("AHU").unwrap();
    let outlet = model.air_loop(air_loop).unwrap().supply_outlet_node();
    let coil = model.add_component("HW Coil", HvacComponent::CoilHeatingWater(CoilHeatingWater::default()));
    model.add_to_node(coil, outlet).unwrap();
    let plant = model.add_plant_loop("HW").unwrap();
    model.add_demand_branch_for_component(plant, coil).unwrap();
    assert!(model.connections().is_port_connected(coil, SECONDARY_INLET));

    model.remove(plant).unwrap();
    assert!(model.contains(coil));
    assert!(!model.connections().is_port_connected(coil, SECONDARY_INLET));
    validate_loop(&model, air_loop).unwrap();
}

// ---------------------------------------------------------------------------
// Insertion
// ---------------------------------------------------------------------------

#[test]
fn second_outdoor_air_system_is_rejected() {
    let mut model = Model::new();
    let (air_loop, _, _) = air_loop_with_fan(&mut model);
    let outlet = model.air_loop(air_loop).unwrap().supply_outlet_node();
    let extra = model
        .add_outdoor_air_system("Extra OA", ControllerOutdoorAir::default())
        .unwrap();
    assert!(matches!(
        model.add_to_node(extra, outlet),
        Err(ModelError::DuplicateOutdoorAirSystem(h)) if h == air_loop
    ));
}

#[test]
fn heat_exchanger_on_outdoor_air_also_joins_relief() {
    let mut model = Model::new();
    let (air_loop, oa, _) = air_loop_with_fan(&mut model);
    let outboard = model.outdoor_air_system(oa).unwrap().outboard_oa_node();
    let hx = model.add_component("HX", HvacComponent::HeatExchangerAirToAir(HeatExchangerAirToAir::default()));
    model.add_to_node(hx, outboard).unwrap();

    assert!(model.oa_components(oa).unwrap().contains(&hx));
    let relief = model.relief_components(oa).unwrap();
    assert!(relief.contains(&hx));
    assert_eq!(relief.last(), Some(&model.outdoor_air_system(oa).unwrap().relief_node()));
    validate_loop(&model, air_loop).unwrap();
}

#[test]
fn heat_exchanger_cannot_start_on_relief() {
    let mut model = Model::new();
    let (_, oa, _) = air_loop_with_fan(&mut model);
    let relief = model.outdoor_air_system(oa).unwrap().relief_node();
    let hx = model.add_component("HX", HvacComponent::HeatExchangerAirToAir(HeatExchangerAirToAir::default()));
    assert!(matches!(
        model.add_to_node(hx, relief),
        Err(ModelError::IncompatibleComponent { .. })
    ));
}

#[test]
fn chiller_cannot_join_both_sides_of_its_own_plant() {
    let mut model = Model::new();
    let plant = model.add_plant_loop("Chilled Water").unwrap();
    let condenser = model.add_plant_loop("Condenser Water").unwrap();
    let component = templates::chiller(&mut model);
    let chiller = model.add_component("Chiller", component);
    model.add_supply_branch_for_component(plant, chiller).unwrap();

    assert!(matches!(
        model.add_demand_branch_for_component(plant, chiller),
        Err(ModelError::SameLoop { component, loop_handle }) if component == chiller && loop_handle == plant
    ));

    let demand_inlet = model.plant_loop(plant).unwrap().demand_inlet_node();
    assert!(matches!(
        model.add_to_node(chiller, demand_inlet),
        Err(ModelError::SameLoop { .. })
    ));
    assert!(!model.connections().is_port_connected(chiller, SECONDARY_INLET));

    model.add_demand_branch_for_component(condenser, chiller).unwrap();
    validate_model(&model).unwrap();
}

#[test]
fn component_edits_keep_its_type() {
    let mut model = Model::new();
    let (air_loop, _, fan) = air_loop_with_fan(&mut model);

    let swapped = model.edit_component(fan, |c| *c = HvacComponent::PumpConstantSpeed(Pump::default()));
    assert!(matches!(swapped, Err(ModelError::KindChanged { .. })));
    assert!(matches!(model.component(fan).unwrap(), HvacComponent::FanConstantVolume(_)));

    model
        .edit_component(fan, |c| {
            if let HvacComponent::FanConstantVolume(f) = c {
                f.fan_efficiency = 0.6;
            }
        })
        .unwrap();
    validate_loop(&model, air_loop).unwrap();
}

#[test]
fn pump_cannot_go_on_air_loop() {
    let mut model = Model::new();
    let air_loop = model.add_air_loop("AHU").unwrap();
    let outlet = model.air_loop(air_loop).unwrap().supply_outlet_node();
    let pump = model.add_component("Pump", HvacComponent::PumpConstantSpeed(Pump::default()));
    assert!(matches!(
        model.add_to_node(pump, outlet),
        Err(ModelError::IncompatibleComponent { .. })
    ));
}

#[test]
fn unattached_node_is_not_on_a_loop() {
    let mut model = Model::new();
    let node = model.add_node("Loose");
    let fan = model.add_component("Fan", HvacComponent::FanConstantVolume(Fan::constant_volume()));
    assert!(matches!(model.add_to_node(fan, node), Err(ModelError::NodeNotOnLoop(h)) if h == node));
}

#[test]
fn zone_branch_sets_single_zone_reheat_control_zone() {
    let mut model = Model::new();
    let (air_loop, _, _) = air_loop_with_fan(&mut model);
    let outlet = model.air_loop(air_loop).unwrap().supply_outlet_node();
    let spm = model.add_setpoint_manager("SZR", SetpointManager::single_zone_reheat());
    model.add_setpoint_manager_to_node(spm, outlet).unwrap();

    let first = model.add_thermal_zone("Zone 1", ThermalZone::default());
    let second = model.add_thermal_zone("Zone 2", ThermalZone::default());
    let terminal = model.add_component("VAV", HvacComponent::AirTerminalVavNoReheat(AirTerminalVav::default()));
    model.add_branch_for_zone(air_loop, first, Some(terminal)).unwrap();
    model.add_branch_for_zone(air_loop, second, None).unwrap();

    assert!(matches!(
        model.setpoint_manager(spm).unwrap().kind(),
        SpmKind::SingleZoneReheat { control_zone: Some(z), .. } if *z == first
    ));
    assert_eq!(model.served_zones(air_loop).unwrap(), vec![first, second]);
    assert_eq!(model.zone_terminal(first), Some(terminal));
    assert_eq!(model.zone_air_loop(second), Some(air_loop));
    validate_loop(&model, air_loop).unwrap();
}

// ---------------------------------------------------------------------------
// Persistence and templates
// ---------------------------------------------------------------------------

#[test]
fn baseboard_sits_in_one_zone_at_a_time() {
    let mut model = Model::new();
    let office = model.add_thermal_zone("Office", ThermalZone::default());
    let lobby = model.add_thermal_zone("Lobby", ThermalZone::default());
    let baseboard = model.add_component(
        "Office Baseboard",
        HvacComponent::BaseboardConvectiveElectric(BaseboardElectric::default()),
    );

    model.add_to_thermal_zone(baseboard, office).unwrap();
    assert_eq!(model.zone_equipment(office), vec![baseboard]);

    model.add_to_thermal_zone(baseboard, lobby).unwrap();
    assert!(model.zone_equipment(office).is_empty());
    assert_eq!(model.zone_equipment(lobby), vec![baseboard]);

    let copy = model.clone_object(baseboard).unwrap();
    assert_eq!(model.component(copy).unwrap().thermal_zone(), None);

    model.remove(lobby).unwrap();
    assert_eq!(model.component(baseboard).unwrap().thermal_zone(), None);

    let fan = model.add_component("Fan", HvacComponent::FanConstantVolume(Fan::constant_volume()));
    assert!(matches!(
        model.add_to_thermal_zone(fan, office),
        Err(ModelError::WrongKind { expected: "zone equipment", .. })
    ));
    assert!(matches!(
        model.add_to_thermal_zone(copy, fan),
        Err(ModelError::WrongKind { .. })
    ));
}

#[test]
fn water_baseboard_joins_the_hot_water_demand_side() {
    let mut model = Model::new();
    let plant = templates::add_hot_water_plant(&mut model).unwrap();
    let zone = model.add_thermal_zone("Office", ThermalZone::default());
    let baseboard = model.add_component(
        "Office Baseboard",
        HvacComponent::BaseboardConvectiveWater(BaseboardWater::default()),
    );
    model.add_demand_branch_for_component(plant, baseboard).unwrap();
    model.add_to_thermal_zone(baseboard, zone).unwrap();

    assert!(model.demand_components(plant).unwrap().contains(&baseboard));
    assert!(matches!(
        model.add_supply_branch_for_component(plant, baseboard),
        Err(ModelError::IncompatibleComponent { .. })
    ));
    validate_model(&model).unwrap();

    model.remove_from_thermal_zone(baseboard).unwrap();
    assert!(model.zone_equipment(zone).is_empty());
    assert!(model.demand_components(plant).unwrap().contains(&baseboard));

    model.remove(baseboard).unwrap();
    validate_model(&model).unwrap();
}

#[test]
fn json_round_trip_rebuilds_indices() {
    let mut model = Model::new();
    let air_loop = templates::add_system_type_3(&mut model).unwrap();
    let outlet = model.air_loop(air_loop).unwrap().supply_outlet_node();
    let json = model.to_json().unwrap();

    let loaded = Model::from_json(&json).unwrap();
    assert_eq!(loaded.len(), model.len());
    assert_eq!(loaded.connections().all(), model.connections().all());
    assert_eq!(loaded.setpoint_managers(outlet), model.setpoint_managers(outlet));
    assert_eq!(loaded.unique_name("Supply Fan"), "Supply Fan 1");
    validate_model(&loaded).unwrap();
}

#[test]
fn document_with_unknown_connection_end_is_rejected() {
    let mut model = Model::new();
    let air_loop = model.add_air_loop("AHU").unwrap();
    let inlet = model.air_loop(air_loop).unwrap().supply_inlet_node();
    let json = model.to_json().unwrap();
    let doc = json.replacen(&inlet.to_string(), &Handle::new().to_string(), 1);

    assert!(matches!(Model::from_json(&doc), Err(ModelError::InvalidDocument(_))));
}

#[test]
fn every_template_validates() {
    let mut model = Model::new();
    templates::add_system_type_3(&mut model).unwrap();
    let vav = templates::add_system_type_5(&mut model).unwrap();
    templates::add_system_type_7(&mut model).unwrap();

    let loops = validate_model(&model).unwrap();
    assert_eq!(loops.len(), 3 + 4);
    assert_eq!(
        non_node_names(&model, &model.supply_components(vav).unwrap()),
        vec!["Outdoor Air System 1", "DX Cooling Coil 1", "Hot Water Heating Coil", "Supply Fan 1"]
    );
}
