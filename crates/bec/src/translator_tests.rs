//! Model → BEC → model tests over whole systems.

use model::components::{BaseboardElectric, BaseboardWater, HvacComponent};
use model::loops::{PathSide, ThermalZone};
use model::{templates, ControlVariable, Curve, Handle, Model, Schedule, ScheduleType, SpmKind};

use crate::{Element, ForwardTranslator, ReverseTranslator, ReverseTranslatorOptions};

fn non_node_names(model: &Model, path: &[Handle]) -> Vec<String> {
    path.iter()
        .filter(|h| !model.object(**h).unwrap().is_node())
        .map(|h| model.name(*h).unwrap().to_owned())
        .collect()
}

fn round_trip(source: &Model) -> (Model, ReverseTranslator) {
    let mut forward = ForwardTranslator::new();
    let text = forward.translate_model(source).to_xml().unwrap();
    let doc = Element::parse(&text).unwrap();
    let mut reverse = ReverseTranslator::new(ReverseTranslatorOptions::default());
    let target = reverse.translate(&doc);
    (target, reverse)
}

#[test]
fn central_vav_survives_a_round_trip() {
    let mut source = Model::new();
    templates::add_system_type_7(&mut source).unwrap();
    let (target, reverse) = round_trip(&source);
    assert!(reverse.errors().is_empty(), "{:?}", reverse.errors());

    assert_eq!(target.air_loops().len(), 1);
    assert_eq!(target.plant_loops().len(), 3);

    let air_loop = target.object_by_name("VAV with Reheat").unwrap().handle();
    let supply = target.supply_components(air_loop).unwrap();
    assert_eq!(
        non_node_names(&target, &supply),
        vec![
            "VAV with Reheat OA System",
            "Chilled Water Cooling Coil",
            "Hot Water Heating Coil",
            "Supply Fan"
        ]
    );

    let outlet = target.air_loop(air_loop).unwrap().supply_outlet_node();
    let deck = target.setpoint_manager_for(outlet, ControlVariable::Temperature).unwrap();
    let SpmKind::Scheduled { schedule: Some(schedule) } = target.setpoint_manager(deck).unwrap().kind() else {
        panic!("expected a scheduled deck manager");
    };
    assert!((target.schedule(*schedule).unwrap().value - 12.8).abs() < 1e-3);

    let chilled = target.object_by_name("Chilled Water Loop").unwrap().handle();
    let plant_outlet = target.plant_loop(chilled).unwrap().supply_outlet_node();
    let spm = target.setpoint_manager_for(plant_outlet, ControlVariable::Temperature).unwrap();
    let SpmKind::Scheduled { schedule: Some(schedule) } = target.setpoint_manager(spm).unwrap().kind() else {
        panic!("expected a scheduled plant manager");
    };
    assert!((target.schedule(*schedule).unwrap().value - 6.7).abs() < 1e-3);
}

#[test]
fn water_coils_and_chiller_land_on_their_plants() {
    let mut source = Model::new();
    templates::add_system_type_7(&mut source).unwrap();
    let (target, _) = round_trip(&source);

    let coil = target.object_by_name("Chilled Water Cooling Coil").unwrap().handle();
    let chilled = target.object_by_name("Chilled Water Loop").unwrap().handle();
    assert!(target.path_memberships(coil).contains(&(PathSide::PlantDemand, chilled)));

    let chiller = target.object_by_name("Chiller").unwrap().handle();
    let condenser = target.object_by_name("Condenser Water Loop").unwrap().handle();
    assert!(target.path_memberships(chiller).contains(&(PathSide::PlantDemand, condenser)));

    // The supply bypass comes back as a chiller bypass branch.
    let runs = target.branches(chilled, PathSide::PlantSupply).unwrap();
    assert_eq!(runs.len(), 4);

    let HvacComponent::ChillerElectricEir(c) = target.component(chiller).unwrap() else {
        panic!("expected a chiller");
    };
    let curve = c.eir_f_part_load_ratio.unwrap();
    assert_eq!(target.name(curve), Some("Chiller EIR fPLR"));
}

#[test]
fn rooftop_unit_keeps_single_zone_control_and_its_zone() {
    let mut source = Model::new();
    let air_loop = templates::add_system_type_3(&mut source).unwrap();
    let zone = source.add_thermal_zone("Office", ThermalZone { multiplier: 3, ..ThermalZone::default() });
    source.add_branch_for_zone(air_loop, zone, None).unwrap();

    let (target, reverse) = round_trip(&source);
    assert!(reverse.errors().is_empty(), "{:?}", reverse.errors());

    let air_loop = target.object_by_name("Packaged Rooftop Unit").unwrap().handle();
    let zone = target.object_by_name("Office").unwrap().handle();
    assert_eq!(target.thermal_zone(zone).unwrap().multiplier, 3);
    assert_eq!(target.zone_air_loop(zone), Some(air_loop));

    let outlet = target.air_loop(air_loop).unwrap().supply_outlet_node();
    let deck = target.setpoint_manager_for(outlet, ControlVariable::Temperature).unwrap();
    assert!(matches!(
        target.setpoint_manager(deck).unwrap().kind(),
        SpmKind::SingleZoneReheat { control_zone: Some(z), .. } if *z == zone
    ));
}

#[test]
fn translating_into_an_existing_model_resolves_schedule_references() {
    let mut model = Model::new();
    let schedule = model.add_schedule(
        "Hot Water Reset",
        Schedule::constant(ScheduleType::Temperature, 60.0),
    );
    let doc = Element::parse(
        "<SDDXML><FluidSys><Name>HW</Name><Type>HotWater</Type>
           <TempCtrl>Scheduled</TempCtrl><TempSetptSchRef>Hot Water Reset</TempSetptSchRef>
         </FluidSys></SDDXML>",
    )
    .unwrap();

    let mut reverse = ReverseTranslator::new(ReverseTranslatorOptions::default());
    let created = reverse.translate_into(&doc, &mut model);
    assert_eq!(created.len(), 1);
    assert!(reverse.errors().is_empty(), "{:?}", reverse.errors());

    let outlet = model.plant_loop(created[0]).unwrap().supply_outlet_node();
    let spm = model.setpoint_manager_for(outlet, ControlVariable::Temperature).unwrap();
    assert_eq!(
        model.setpoint_manager(spm).unwrap().kind(),
        &SpmKind::Scheduled { schedule: Some(schedule) }
    );
}

#[test]
fn document_curve_wins_over_a_namesake_in_the_model() {
    let mut model = Model::new();
    let existing = model.add_curve(
        "Boiler PLR",
        Curve::Quadratic { coefficients: [9.0, 9.0, 9.0], minimum_x: 0.0, maximum_x: 1.0 },
    );
    let doc = Element::parse(
        "<SDDXML>
           <CrvQuad><Name>Boiler PLR</Name><Coef1>0.97</Coef1><Coef2>0.06</Coef2><Coef3>-0.03</Coef3></CrvQuad>
           <FluidSys><Name>HW</Name><Type>HotWater</Type><TempCtrl>Fixed</TempCtrl><FixedSupTemp>180</FixedSupTemp>
             <Blr><Name>Boiler</Name><HIR_fPLRCrvRef>Boiler PLR</HIR_fPLRCrvRef></Blr>
           </FluidSys></SDDXML>",
    )
    .unwrap();

    let mut reverse = ReverseTranslator::new(ReverseTranslatorOptions::default());
    reverse.translate_into(&doc, &mut model);
    assert!(reverse.errors().is_empty(), "{:?}", reverse.errors());

    let boiler = model.object_by_name("Boiler").unwrap().handle();
    let HvacComponent::BoilerHotWater(b) = model.component(boiler).unwrap() else {
        panic!("expected a boiler");
    };
    let curve = b.efficiency_curve.unwrap();
    assert_ne!(curve, existing);
    assert_eq!(model.name(curve), Some("Boiler PLR 1"));
    assert_eq!(model.curve(curve).unwrap().coefficients(), &[0.97, 0.06, -0.03]);
}

#[test]
fn baseboards_survive_a_round_trip() {
    let mut source = Model::new();
    let plant = templates::add_hot_water_plant(&mut source).unwrap();
    let office = source.add_thermal_zone("Office", ThermalZone::default());
    let closet = source.add_thermal_zone("Closet", ThermalZone::default());
    let water = source.add_component(
        "Office Baseboard",
        HvacComponent::BaseboardConvectiveWater(BaseboardWater::default()),
    );
    source.add_demand_branch_for_component(plant, water).unwrap();
    source.add_to_thermal_zone(water, office).unwrap();
    let electric = source.add_component(
        "Closet Heater",
        HvacComponent::BaseboardConvectiveElectric(BaseboardElectric {
            nominal_capacity: Some(750.0),
            ..BaseboardElectric::default()
        }),
    );
    source.add_to_thermal_zone(electric, closet).unwrap();

    let (target, reverse) = round_trip(&source);
    assert!(reverse.errors().is_empty(), "{:?}", reverse.errors());

    let office = target.object_by_name("Office").unwrap().handle();
    let equipment = target.zone_equipment(office);
    assert_eq!(non_node_names(&target, &equipment), vec!["Office Baseboard"]);
    let plant = target.object_by_name("Hot Water Loop").unwrap().handle();
    assert!(target.demand_components(plant).unwrap().contains(&equipment[0]));

    let closet = target.object_by_name("Closet").unwrap().handle();
    let heater = target.zone_equipment(closet)[0];
    let HvacComponent::BaseboardConvectiveElectric(b) = target.component(heater).unwrap() else {
        panic!("expected an electric baseboard");
    };
    assert!((b.nominal_capacity.unwrap() - 750.0).abs() < 0.01);
}
