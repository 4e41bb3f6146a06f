//! Model ⇄ IDF tests over whole systems.

use model::components::{Fan, HvacComponent};
use model::loops::ThermalZone;
use model::{templates, ControlVariable, Handle, Model, Schedule, ScheduleType, SetpointManager, SpmKind};

use crate::fields::*;
use crate::{ForwardTranslator, IdfFile, ReverseTranslator};

/// Air loop "AHU" with a constant volume fan and nothing else.
fn bare_air_loop(model: &mut Model) -> (Handle, Handle) {
    let air_loop = model.add_air_loop("AHU").unwrap();
    let outlet = model.air_loop(air_loop).unwrap().supply_outlet_node();
    let fan = model.add_component("Supply Fan", HvacComponent::FanConstantVolume(Fan::constant_volume()));
    model.add_to_node(fan, outlet).unwrap();
    (air_loop, outlet)
}

#[test]
fn all_templates_translate_and_reparse() {
    let mut model = Model::new();
    let type_3 = templates::add_system_type_3(&mut model).unwrap();
    templates::add_system_type_5(&mut model).unwrap();
    templates::add_system_type_7(&mut model).unwrap();
    let zone = model.add_thermal_zone("Office", ThermalZone::default());
    model.add_branch_for_zone(type_3, zone, None).unwrap();

    let mut translator = ForwardTranslator::default();
    let idf = translator.translate_model(&model);
    assert!(translator.errors().is_empty(), "{:?}", translator.errors());
    assert_eq!(idf.objects_of_type("AirLoopHVAC").count(), 3);
    assert_eq!(idf.objects_of_type("PlantLoop").count(), 4);

    let szr = idf
        .object_by_name(setpoint_manager_single_zone_reheat::OBJECT_TYPE, "Single Zone Reheat Setpoint Manager")
        .unwrap();
    assert_eq!(szr.get_string(setpoint_manager_single_zone_reheat::CONTROL_ZONE), Some("Office"));
    assert_eq!(szr.get_string(setpoint_manager_single_zone_reheat::ZONE_NODE), Some("Office Zone Air Node"));
    assert_eq!(szr.get_string(setpoint_manager_single_zone_reheat::ZONE_INLET_NODE), Some("Office Inlet Node"));

    let text = idf.to_string();
    let reparsed: IdfFile = text.parse().unwrap();
    assert_eq!(reparsed, idf);
}

#[test]
fn setpoint_managers_survive_a_round_trip() {
    let mut source = Model::new();
    let (_, outlet) = bare_air_loop(&mut source);
    let schedule = source.add_schedule("Deck", Schedule::constant(ScheduleType::Temperature, 12.8));
    let deck = source.add_setpoint_manager("Deck SPM", SetpointManager::scheduled(schedule));
    source.add_setpoint_manager_to_node(deck, outlet).unwrap();
    let reset = source.add_setpoint_manager(
        "Reset SPM",
        SetpointManager::outdoor_air_reset()
            .with_control_variable(ControlVariable::MaximumTemperature)
            .unwrap(),
    );
    source.add_setpoint_manager_to_node(reset, outlet).unwrap();

    let text = ForwardTranslator::default().translate_model(&source).to_string();
    let idf = IdfFile::parse(&text).unwrap();

    let mut target = Model::new();
    let (_, target_outlet) = bare_air_loop(&mut target);
    let mut reverse = ReverseTranslator::new();
    reverse.translate_into(&idf, &mut target);
    assert!(reverse.errors().is_empty(), "{:?}", reverse.errors());

    let temperature = target.setpoint_manager_for(target_outlet, ControlVariable::Temperature).unwrap();
    assert_eq!(target.name(temperature), Some("Deck SPM"));
    let SpmKind::Scheduled { schedule: Some(schedule) } = target.setpoint_manager(temperature).unwrap().kind() else {
        panic!("expected a scheduled manager with its schedule");
    };
    assert_eq!(target.schedule(*schedule).unwrap().value, 12.8);

    let maximum = target
        .setpoint_manager_for(target_outlet, ControlVariable::MaximumTemperature)
        .unwrap();
    assert_eq!(target.name(maximum), Some("Reset SPM"));
    assert_eq!(target.setpoint_managers(target_outlet).len(), 2);
}

#[test]
fn imported_manager_evicts_the_one_on_its_control_variable() {
    let mut model = Model::new();
    let air_loop = templates::add_system_type_7(&mut model).unwrap();
    let outlet = model.air_loop(air_loop).unwrap().supply_outlet_node();
    let deck = model.setpoint_manager_for(outlet, ControlVariable::Temperature).unwrap();

    let idf = IdfFile::parse(
        "SetpointManager:Warmest,Warmest SPM,Temperature,VAV with Reheat,12,16,MaximumTemperature,\
         VAV with Reheat Supply Outlet Node;",
    )
    .unwrap();
    let created = ReverseTranslator::new().translate_into(&idf, &mut model);
    assert_eq!(created.len(), 1);
    assert_eq!(model.setpoint_manager_for(outlet, ControlVariable::Temperature), Some(created[0]));
    assert_eq!(model.setpoint_manager(deck).unwrap().setpoint_node(), None);

    let mut forward = ForwardTranslator::default();
    let out = forward.translate_model(&model);
    let warmest = out.object_by_name(setpoint_manager_warmest::OBJECT_TYPE, "Warmest SPM").unwrap();
    assert_eq!(warmest.get_string(setpoint_manager_warmest::AIR_LOOP), Some("VAV with Reheat"));
    assert!(out
        .object_by_name(setpoint_manager_scheduled::OBJECT_TYPE, "Deck Temperature Setpoint Manager")
        .is_none());
    assert!(forward.warnings().iter().any(|w| w.contains("Deck Temperature Setpoint Manager")));
}

#[test]
fn manager_rejected_by_its_node_is_kept_unattached() {
    let mut model = Model::new();
    templates::add_hot_water_plant(&mut model).unwrap();

    let idf = IdfFile::parse(
        "SetpointManager:SingleZone:Reheat,SZR,Temperature,10,50,,,,Hot Water Loop Supply Outlet Node;",
    )
    .unwrap();
    let mut reverse = ReverseTranslator::new();
    let created = reverse.translate_into(&idf, &mut model);

    let spm = model.setpoint_manager(created[0]).unwrap();
    assert_eq!(spm.setpoint_node(), None);
    assert!(matches!(
        spm.kind(),
        SpmKind::SingleZoneReheat { minimum_supply_air_temperature, .. } if *minimum_supply_air_temperature == 10.0
    ));
    assert!(reverse.warnings().iter().any(|w| w.contains("left unattached")));
}

#[test]
fn imported_schedule_wins_over_a_namesake_in_the_model() {
    let mut model = Model::new();
    let (_, outlet) = bare_air_loop(&mut model);
    let existing = model.add_schedule("Deck Temp", Schedule::constant(ScheduleType::Temperature, 99.0));

    let idf = IdfFile::parse(
        "Schedule:Constant,Deck Temp,Temperature,12.8;\n\
         SetpointManager:Scheduled,Deck SPM,Temperature,Deck Temp,AHU Supply Outlet Node;",
    )
    .unwrap();
    let mut reverse = ReverseTranslator::new();
    reverse.translate_into(&idf, &mut model);
    assert!(reverse.errors().is_empty(), "{:?}", reverse.errors());

    let spm = model.setpoint_manager_for(outlet, ControlVariable::Temperature).unwrap();
    let SpmKind::Scheduled { schedule: Some(schedule) } = model.setpoint_manager(spm).unwrap().kind() else {
        panic!("expected a scheduled manager with a schedule");
    };
    assert_ne!(*schedule, existing);
    assert_eq!(model.name(*schedule), Some("Deck Temp 1"));
    assert_eq!(model.schedule(*schedule).unwrap().value, 12.8);
}
