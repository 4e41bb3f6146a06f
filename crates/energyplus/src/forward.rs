//! Model → IDF.
//!
//! Every object is written in arena order, after the `ScheduleTypeLimits`
//! its schedules need. Node, splitter and mixer objects have no IDF
//! counterpart of their own; they appear only as names inside the objects
//! that use them.

use std::collections::{HashMap, HashSet};

use indexmap::IndexSet;
use tracing::{debug, info, instrument, warn};

use model::components::HvacComponent;
use model::connection::{
    INLET, MIXED_AIR, OUTDOOR_AIR, OUTLET, RELIEF_AIR, RETURN_AIR, SECONDARY_INLET, SECONDARY_OUTLET,
};
use model::loops::PathSide;
use model::setpoint::SpmKind;
use model::{Curve, Handle, Model, ModelObject, ObjectKind, Schedule, ScheduleType, SetpointManager};

use crate::fields::*;
use crate::idf::{IdfFile, IdfObject};

/// Translation switches.
#[derive(Debug, Clone, Default)]
pub struct ForwardTranslatorOptions {
    /// Write managers without a setpoint node (with a blank node field)
    /// instead of skipping them.
    pub include_unattached_setpoint_managers: bool,
}

/// Writes a [`Model`] as an [`IdfFile`], collecting warnings and errors.
#[derive(Debug, Default)]
pub struct ForwardTranslator {
    options: ForwardTranslatorOptions,
    warnings: Vec<String>,
    errors: Vec<String>,
}

struct Context<'a> {
    model: &'a Model,
    /// reheat coil → (damper outlet node, terminal outlet node)
    reheat_air_nodes: HashMap<Handle, (String, String)>,
    limits: IndexSet<&'static str>,
}

impl Context<'_> {
    fn name(&self, handle: Handle) -> String {
        self.model.name(handle).unwrap_or_default().to_owned()
    }

    fn opt_name(&self, handle: Option<Handle>) -> String {
        handle.map(|h| self.name(h)).unwrap_or_default()
    }

    fn inlet(&self, handle: Handle, port: u32) -> String {
        self.opt_name(self.model.inlet_node_of(handle, port))
    }

    fn outlet(&self, handle: Handle, port: u32) -> String {
        self.opt_name(self.model.outlet_node_of(handle, port))
    }
}

impl ForwardTranslator {
    pub fn new(options: ForwardTranslatorOptions) -> Self {
        Self { options, ..Self::default() }
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    fn warn(&mut self, message: String) {
        warn!("{message}");
        self.warnings.push(message);
    }

    fn error(&mut self, message: String) {
        tracing::error!("{message}");
        self.errors.push(message);
    }

    /// Translate the whole model. Problems are logged and collected; the
    /// objects that could be written are always returned.
    #[instrument(skip_all, fields(objects = model.len()))]
    pub fn translate_model(&mut self, model: &Model) -> IdfFile {
        self.warnings.clear();
        self.errors.clear();

        let mut ctx = Context { model, reheat_air_nodes: HashMap::new(), limits: IndexSet::new() };
        for obj in model.objects() {
            if let Some(HvacComponent::AirTerminalVavReheat(t)) = obj.as_component() {
                if let Some(coil) = t.reheat_coil {
                    let damper = format!("{} Damper Outlet Node", obj.name());
                    let outlet = ctx.outlet(obj.handle(), OUTLET);
                    ctx.reheat_air_nodes.insert(coil, (damper, outlet));
                }
            }
        }

        let mut body = Vec::new();
        for obj in model.objects() {
            body.extend(self.translate_object(&mut ctx, obj));
        }

        let mut idf = IdfFile::new();
        for limits in &ctx.limits {
            idf.add(schedule_type_limits_object(limits));
        }
        let mut replaced = HashSet::new();
        for mut object in body {
            for (index, original) in object.sanitize() {
                if replaced.insert(original.clone()) {
                    self.warn(format!(
                        "{} '{}': {} '{original}' contains ',' ';' or '!', replaced with '_'",
                        object.object_type(),
                        object.name().unwrap_or_default(),
                        label(object.object_type(), index)
                    ));
                }
            }
            idf.add(object);
        }
        info!(
            objects = idf.len(),
            warnings = self.warnings.len(),
            errors = self.errors.len(),
            "model translated to IDF"
        );
        idf
    }

    fn translate_object(&mut self, ctx: &mut Context<'_>, obj: &ModelObject) -> Vec<IdfObject> {
        let handle = obj.handle();
        match obj.kind() {
            ObjectKind::Node | ObjectKind::Splitter | ObjectKind::Mixer => Vec::new(),
            ObjectKind::Schedule(s) => vec![translate_schedule(ctx, obj.name(), s)],
            ObjectKind::Curve(c) => vec![translate_curve(obj.name(), c)],
            ObjectKind::ThermalZone(z) => {
                let mut idf = IdfObject::named(zone::OBJECT_TYPE, obj.name());
                for index in [zone::DIRECTION_OF_RELATIVE_NORTH, zone::X_ORIGIN, zone::Y_ORIGIN, zone::Z_ORIGIN] {
                    idf.set_f64(index, 0.0);
                }
                idf.set(zone::TYPE, "1");
                idf.set(zone::MULTIPLIER, z.multiplier.to_string());
                idf.set(zone::CEILING_HEIGHT, "Autocalculate");
                idf.set(zone::VOLUME, "Autocalculate");
                match z.floor_area {
                    Some(area) => idf.set_f64(zone::FLOOR_AREA, area),
                    None => idf.set(zone::FLOOR_AREA, "Autocalculate"),
                }
                let mut objects = vec![idf];
                objects.extend(zone_equipment_objects(ctx, handle, obj.name()));
                objects
            }
            ObjectKind::SetpointManager(spm) => self.translate_setpoint_manager(ctx, handle, spm).into_iter().collect(),
            ObjectKind::Component(c) => {
                if c.is_zone_equipment() && c.thermal_zone().is_none() {
                    self.warn(format!("{} '{}' is not in a thermal zone", c.type_name(), obj.name()));
                }
                vec![translate_component(ctx, handle, c)]
            }
            ObjectKind::AirLoop(_) => self.translate_air_loop(ctx, handle),
            ObjectKind::PlantLoop(_) => self.translate_plant_loop(ctx, handle),
            ObjectKind::OutdoorAirSystem(_) => self.translate_outdoor_air_system(ctx, handle),
        }
    }

    // -----------------------------------------------------------------------
    // Setpoint managers
    // -----------------------------------------------------------------------

    fn translate_setpoint_manager(
        &mut self,
        ctx: &Context<'_>,
        handle: Handle,
        spm: &SetpointManager,
    ) -> Option<IdfObject> {
        let name = ctx.name(handle);
        let node = match spm.setpoint_node() {
            Some(node) => ctx.name(node),
            None if self.options.include_unattached_setpoint_managers => {
                self.warn(format!("{} '{name}' has no setpoint node", spm.kind().name()));
                String::new()
            }
            None => {
                self.warn(format!("{} '{name}' has no setpoint node and is not translated", spm.kind().name()));
                return None;
            }
        };
        let cv = spm.control_variable().as_str();

        let idf = match spm.kind() {
            SpmKind::Scheduled { schedule } => {
                use setpoint_manager_scheduled as f;
                let mut idf = IdfObject::named(f::OBJECT_TYPE, &name);
                idf.set(f::CONTROL_VARIABLE, cv);
                idf.set(f::SCHEDULE, ctx.opt_name(*schedule));
                idf.set(f::SETPOINT_NODE, node);
                idf
            }
            SpmKind::SingleZoneReheat { minimum_supply_air_temperature, maximum_supply_air_temperature, control_zone } => {
                use setpoint_manager_single_zone_reheat as f;
                let mut idf = IdfObject::named(f::OBJECT_TYPE, &name);
                idf.set(f::CONTROL_VARIABLE, cv);
                idf.set_f64(f::MINIMUM_SUPPLY_AIR_TEMPERATURE, *minimum_supply_air_temperature);
                idf.set_f64(f::MAXIMUM_SUPPLY_AIR_TEMPERATURE, *maximum_supply_air_temperature);
                match control_zone {
                    Some(zone) => {
                        let zone_name = ctx.name(*zone);
                        idf.set(f::CONTROL_ZONE, &zone_name);
                        idf.set(f::ZONE_NODE, format!("{zone_name} Zone Air Node"));
                        idf.set(f::ZONE_INLET_NODE, ctx.inlet(*zone, INLET));
                    }
                    None => self.warn(format!("{} '{name}' has no control zone", f::OBJECT_TYPE)),
                }
                idf.set(f::SETPOINT_NODE, node);
                idf
            }
            SpmKind::MixedAir { reference_setpoint_node, fan_inlet_node, fan_outlet_node } => {
                use setpoint_manager_mixed_air as f;
                let mut idf = IdfObject::named(f::OBJECT_TYPE, &name);
                idf.set(f::CONTROL_VARIABLE, cv);
                idf.set(f::REFERENCE_SETPOINT_NODE, ctx.opt_name(*reference_setpoint_node));
                idf.set(f::FAN_INLET_NODE, ctx.opt_name(*fan_inlet_node));
                idf.set(f::FAN_OUTLET_NODE, ctx.opt_name(*fan_outlet_node));
                idf.set(f::SETPOINT_NODE, node);
                idf
            }
            SpmKind::OutdoorAirReset(r) => {
                use setpoint_manager_outdoor_air_reset as f;
                let mut idf = IdfObject::named(f::OBJECT_TYPE, &name);
                idf.set(f::CONTROL_VARIABLE, cv);
                idf.set_f64(f::SETPOINT_AT_OUTDOOR_LOW, r.setpoint_at_outdoor_low_temperature);
                idf.set_f64(f::OUTDOOR_LOW, r.outdoor_low_temperature);
                idf.set_f64(f::SETPOINT_AT_OUTDOOR_HIGH, r.setpoint_at_outdoor_high_temperature);
                idf.set_f64(f::OUTDOOR_HIGH, r.outdoor_high_temperature);
                idf.set(f::SETPOINT_NODE, node);
                if let Some(schedule) = r.schedule {
                    idf.set(f::SCHEDULE, ctx.name(schedule));
                    let second = [
                        (f::SETPOINT_AT_OUTDOOR_LOW_2, r.setpoint_at_outdoor_low_temperature_2),
                        (f::OUTDOOR_LOW_2, r.outdoor_low_temperature_2),
                        (f::SETPOINT_AT_OUTDOOR_HIGH_2, r.setpoint_at_outdoor_high_temperature_2),
                        (f::OUTDOOR_HIGH_2, r.outdoor_high_temperature_2),
                    ];
                    for (index, value) in second {
                        if let Some(v) = value {
                            idf.set_f64(index, v);
                        }
                    }
                }
                idf
            }
            SpmKind::FollowOutdoorAirTemperature {
                reference_temperature_type,
                offset_temperature_difference,
                maximum_setpoint_temperature,
                minimum_setpoint_temperature,
            } => {
                use setpoint_manager_follow_outdoor_air_temperature as f;
                let mut idf = IdfObject::named(f::OBJECT_TYPE, &name);
                idf.set(f::CONTROL_VARIABLE, cv);
                idf.set(f::REFERENCE_TEMPERATURE_TYPE, reference_temperature_type.as_str());
                idf.set_f64(f::OFFSET_TEMPERATURE_DIFFERENCE, *offset_temperature_difference);
                idf.set_f64(f::MAXIMUM_SETPOINT_TEMPERATURE, *maximum_setpoint_temperature);
                idf.set_f64(f::MINIMUM_SETPOINT_TEMPERATURE, *minimum_setpoint_temperature);
                idf.set(f::SETPOINT_NODE, node);
                idf
            }
            SpmKind::Warmest { minimum_setpoint_temperature, maximum_setpoint_temperature } => {
                use setpoint_manager_warmest as f;
                let mut idf = IdfObject::named(f::OBJECT_TYPE, &name);
                idf.set(f::CONTROL_VARIABLE, cv);
                idf.set(f::AIR_LOOP, self.air_loop_name(ctx, spm, &name));
                idf.set_f64(f::MINIMUM_SETPOINT_TEMPERATURE, *minimum_setpoint_temperature);
                idf.set_f64(f::MAXIMUM_SETPOINT_TEMPERATURE, *maximum_setpoint_temperature);
                idf.set(f::STRATEGY, "MaximumTemperature");
                idf.set(f::SETPOINT_NODE, node);
                idf
            }
            SpmKind::WarmestTemperatureFlow {
                minimum_setpoint_temperature,
                maximum_setpoint_temperature,
                strategy,
                minimum_turndown_ratio,
            } => {
                use setpoint_manager_warmest_temperature_flow as f;
                let mut idf = IdfObject::named(f::OBJECT_TYPE, &name);
                idf.set(f::CONTROL_VARIABLE, cv);
                idf.set(f::AIR_LOOP, self.air_loop_name(ctx, spm, &name));
                idf.set_f64(f::MINIMUM_SETPOINT_TEMPERATURE, *minimum_setpoint_temperature);
                idf.set_f64(f::MAXIMUM_SETPOINT_TEMPERATURE, *maximum_setpoint_temperature);
                idf.set(f::STRATEGY, strategy.as_str());
                idf.set(f::SETPOINT_NODE, node);
                idf.set_f64(f::MINIMUM_TURNDOWN_RATIO, *minimum_turndown_ratio);
                idf
            }
        };
        Some(idf)
    }

    fn air_loop_name(&mut self, ctx: &Context<'_>, spm: &SetpointManager, name: &str) -> String {
        let air_loop = spm.setpoint_node().and_then(|node| ctx.model.air_loop_of_node(node));
        if air_loop.is_none() {
            self.warn(format!("{} '{name}' is not on an air loop", spm.kind().name()));
        }
        ctx.opt_name(air_loop)
    }

    // -----------------------------------------------------------------------
    // Loops
    // -----------------------------------------------------------------------

    fn translate_air_loop(&mut self, ctx: &Context<'_>, handle: Handle) -> Vec<IdfObject> {
        let Ok(l) = ctx.model.air_loop(handle) else {
            return Vec::new();
        };
        let name = ctx.name(handle);
        let mut out = Vec::new();

        let branch_list = format!("{name} Supply Branches");
        let mut idf = IdfObject::named(air_loop_hvac::OBJECT_TYPE, &name);
        idf.set(air_loop_hvac::CONTROLLER_LIST, "");
        idf.set(air_loop_hvac::AVAILABILITY_MANAGER_LIST, "");
        idf.set_autosizable(air_loop_hvac::DESIGN_SUPPLY_AIR_FLOW_RATE, l.design_supply_air_flow_rate);
        idf.set(air_loop_hvac::BRANCH_LIST, &branch_list);
        idf.set(air_loop_hvac::CONNECTOR_LIST, "");
        idf.set(air_loop_hvac::SUPPLY_SIDE_INLET_NODE, ctx.name(l.supply_inlet_node()));
        idf.set(air_loop_hvac::DEMAND_SIDE_OUTLET_NODE, ctx.name(l.demand_outlet_node()));
        idf.set(air_loop_hvac::DEMAND_SIDE_INLET_NODES, ctx.name(l.demand_inlet_node()));
        idf.set(air_loop_hvac::SUPPLY_SIDE_OUTLET_NODES, ctx.name(l.supply_outlet_node()));
        out.push(idf);

        let s = &l.sizing;
        let mut sizing = IdfObject::named(sizing_system::OBJECT_TYPE, &name);
        sizing.set(sizing_system::TYPE_OF_LOAD_TO_SIZE_ON, &s.type_of_load_to_size_on);
        sizing.set_autosizable(sizing_system::DESIGN_OUTDOOR_AIR_FLOW_RATE, s.design_outdoor_air_flow_rate);
        sizing.set_f64(sizing_system::CENTRAL_HEATING_MAXIMUM_SYSTEM_AIR_FLOW_RATIO, s.minimum_system_air_flow_ratio);
        sizing.set_f64(sizing_system::PREHEAT_DESIGN_TEMPERATURE, s.preheat_design_temperature);
        sizing.set_f64(sizing_system::PREHEAT_DESIGN_HUMIDITY_RATIO, s.preheat_design_humidity_ratio);
        sizing.set_f64(sizing_system::PRECOOL_DESIGN_TEMPERATURE, s.precool_design_temperature);
        sizing.set_f64(sizing_system::PRECOOL_DESIGN_HUMIDITY_RATIO, s.precool_design_humidity_ratio);
        sizing.set_f64(
            sizing_system::CENTRAL_COOLING_DESIGN_SUPPLY_AIR_TEMPERATURE,
            s.central_cooling_design_supply_air_temperature,
        );
        sizing.set_f64(
            sizing_system::CENTRAL_HEATING_DESIGN_SUPPLY_AIR_TEMPERATURE,
            s.central_heating_design_supply_air_temperature,
        );
        sizing.set(sizing_system::TYPE_OF_ZONE_SUM_TO_USE, "NonCoincident");
        sizing.set_bool(sizing_system::ALL_OUTDOOR_AIR_IN_COOLING, s.all_outdoor_air_in_cooling);
        sizing.set_bool(sizing_system::ALL_OUTDOOR_AIR_IN_HEATING, s.all_outdoor_air_in_heating);
        sizing.set_f64(
            sizing_system::CENTRAL_COOLING_DESIGN_SUPPLY_AIR_HUMIDITY_RATIO,
            s.central_cooling_design_supply_air_humidity_ratio,
        );
        sizing.set_f64(
            sizing_system::CENTRAL_HEATING_DESIGN_SUPPLY_AIR_HUMIDITY_RATIO,
            s.central_heating_design_supply_air_humidity_ratio,
        );
        out.push(sizing);

        out.extend(self.translate_branches(ctx, handle, PathSide::AirSupply, &format!("{name} Supply"), &branch_list));
        out
    }

    fn translate_plant_loop(&mut self, ctx: &Context<'_>, handle: Handle) -> Vec<IdfObject> {
        let Ok(l) = ctx.model.plant_loop(handle) else {
            return Vec::new();
        };
        let name = ctx.name(handle);
        let supply_list = format!("{name} Supply Branches");
        let demand_list = format!("{name} Demand Branches");
        let mut out = Vec::new();

        let mut idf = IdfObject::named(plant_loop::OBJECT_TYPE, &name);
        idf.set(plant_loop::FLUID_TYPE, &l.fluid_type);
        idf.set(plant_loop::USER_DEFINED_FLUID_TYPE, "");
        idf.set(plant_loop::OPERATION_SCHEME, "");
        idf.set(plant_loop::LOOP_TEMPERATURE_SETPOINT_NODE, ctx.name(l.supply_outlet_node()));
        idf.set_f64(plant_loop::MAXIMUM_LOOP_TEMPERATURE, l.maximum_loop_temperature);
        idf.set_f64(plant_loop::MINIMUM_LOOP_TEMPERATURE, l.minimum_loop_temperature);
        idf.set_autosizable(plant_loop::MAXIMUM_LOOP_FLOW_RATE, l.maximum_loop_flow_rate);
        idf.set_f64(plant_loop::MINIMUM_LOOP_FLOW_RATE, l.minimum_loop_flow_rate);
        idf.set(plant_loop::PLANT_LOOP_VOLUME, "Autocalculate");
        idf.set(plant_loop::PLANT_SIDE_INLET_NODE, ctx.name(l.supply_inlet_node()));
        idf.set(plant_loop::PLANT_SIDE_OUTLET_NODE, ctx.name(l.supply_outlet_node()));
        idf.set(plant_loop::PLANT_SIDE_BRANCH_LIST, &supply_list);
        idf.set(plant_loop::PLANT_SIDE_CONNECTOR_LIST, "");
        idf.set(plant_loop::DEMAND_SIDE_INLET_NODE, ctx.name(l.demand_inlet_node()));
        idf.set(plant_loop::DEMAND_SIDE_OUTLET_NODE, ctx.name(l.demand_outlet_node()));
        idf.set(plant_loop::DEMAND_SIDE_BRANCH_LIST, &demand_list);
        idf.set(plant_loop::DEMAND_SIDE_CONNECTOR_LIST, "");
        idf.set(plant_loop::LOAD_DISTRIBUTION_SCHEME, "Optimal");
        idf.set(plant_loop::AVAILABILITY_MANAGER_LIST, "");
        idf.set(plant_loop::DEMAND_CALCULATION_SCHEME, "SingleSetpoint");
        idf.set(plant_loop::COMMON_PIPE_SIMULATION, l.common_pipe_simulation.as_str());
        out.push(idf);

        let mut sizing = IdfObject::named(sizing_plant::OBJECT_TYPE, &name);
        sizing.set(sizing_plant::LOOP_TYPE, l.sizing.loop_type.as_str());
        sizing.set_f64(sizing_plant::DESIGN_LOOP_EXIT_TEMPERATURE, l.sizing.design_loop_exit_temperature);
        sizing.set_f64(sizing_plant::LOOP_DESIGN_TEMPERATURE_DIFFERENCE, l.sizing.loop_design_temperature_difference);
        out.push(sizing);

        out.extend(self.translate_branches(ctx, handle, PathSide::PlantSupply, &format!("{name} Supply"), &supply_list));
        out.extend(self.translate_branches(ctx, handle, PathSide::PlantDemand, &format!("{name} Demand"), &demand_list));
        out
    }

    /// One `Branch` per run of the loop side plus their `BranchList`. A run
    /// without components gets a generated adiabatic pipe.
    fn translate_branches(
        &mut self,
        ctx: &Context<'_>,
        loop_handle: Handle,
        side: PathSide,
        prefix: &str,
        list_name: &str,
    ) -> Vec<IdfObject> {
        let runs = match ctx.model.branches(loop_handle, side) {
            Ok(runs) => runs,
            Err(e) => {
                self.error(format!("{prefix} branches not translated: {e}"));
                return Vec::new();
            }
        };

        let mut out = Vec::new();
        let mut list = IdfObject::named(branch_list::OBJECT_TYPE, list_name);
        for (i, run) in runs.iter().enumerate() {
            let branch_name = format!("{prefix} Branch {}", i + 1);
            let mut branch_obj = IdfObject::named(branch::OBJECT_TYPE, &branch_name);
            branch_obj.set(branch::PRESSURE_DROP_CURVE, "");

            let mut any = false;
            for (pos, handle) in run.iter().enumerate() {
                let object_type = match ctx.model.object(*handle).map(|o| o.kind()) {
                    Some(ObjectKind::Component(c)) => c.type_name(),
                    Some(ObjectKind::OutdoorAirSystem(_)) => outdoor_air_system::OBJECT_TYPE,
                    _ => continue,
                };
                let inlet = pos.checked_sub(1).and_then(|p| run.get(p)).copied();
                let outlet = run.get(pos + 1).copied();
                branch_obj.push(object_type);
                branch_obj.push(ctx.name(*handle));
                branch_obj.push(ctx.opt_name(inlet));
                branch_obj.push(ctx.opt_name(outlet));
                any = true;
            }

            if !any {
                let (Some(first), Some(last)) = (run.first(), run.last()) else {
                    continue;
                };
                let pipe_name = format!("{branch_name} Pipe");
                let inlet = ctx.name(*first);
                let outlet = if first == last { format!("{pipe_name} Outlet Node") } else { ctx.name(*last) };
                debug!(branch = %branch_name, "empty branch gets a pipe");
                let mut pipe = IdfObject::named(pipe_adiabatic::OBJECT_TYPE, &pipe_name);
                pipe.set(pipe_adiabatic::INLET_NODE, &inlet);
                pipe.set(pipe_adiabatic::OUTLET_NODE, &outlet);
                out.push(pipe);
                for value in [pipe_adiabatic::OBJECT_TYPE.to_owned(), pipe_name, inlet, outlet] {
                    branch_obj.push(value);
                }
            }

            list.push(branch_name);
            out.push(branch_obj);
        }
        out.push(list);
        out
    }

    // -----------------------------------------------------------------------
    // Outdoor air
    // -----------------------------------------------------------------------

    fn translate_outdoor_air_system(&mut self, ctx: &Context<'_>, handle: Handle) -> Vec<IdfObject> {
        let Ok(oa) = ctx.model.outdoor_air_system(handle) else {
            return Vec::new();
        };
        let name = ctx.name(handle);
        let controller_name = format!("{name} Controller");
        let controller_list_name = format!("{name} Controller List");
        let equipment_list_name = format!("{name} Equipment List");
        let mixer_name = format!("{name} Mixer");

        let mixed = ctx.outlet(handle, MIXED_AIR);
        let outdoor = ctx.inlet(handle, OUTDOOR_AIR);
        let relief = ctx.outlet(handle, RELIEF_AIR);
        let ret = ctx.inlet(handle, RETURN_AIR);
        if mixed.is_empty() || ret.is_empty() {
            self.warn(format!("outdoor air system '{name}' is not on an air loop"));
        }

        let mut system = IdfObject::named(outdoor_air_system::OBJECT_TYPE, &name);
        system.set(outdoor_air_system::CONTROLLER_LIST, &controller_list_name);
        system.set(outdoor_air_system::EQUIPMENT_LIST, &equipment_list_name);

        let mut controllers = IdfObject::named(controller_list::OBJECT_TYPE, &controller_list_name);
        controllers.push(controller_outdoor_air::OBJECT_TYPE);
        controllers.push(&controller_name);

        let mut equipment = IdfObject::named(outdoor_air_equipment_list::OBJECT_TYPE, &equipment_list_name);
        match ctx.model.oa_components(handle) {
            Ok(stream) => {
                for h in stream {
                    if let Ok(c) = ctx.model.component(h) {
                        equipment.push(c.type_name());
                        equipment.push(ctx.name(h));
                    }
                }
            }
            Err(e) => self.error(format!("outdoor air stream of '{name}' not translated: {e}")),
        }
        equipment.push(outdoor_air_mixer::OBJECT_TYPE);
        equipment.push(&mixer_name);

        let mut mixer = IdfObject::named(outdoor_air_mixer::OBJECT_TYPE, &mixer_name);
        mixer.set(outdoor_air_mixer::MIXED_AIR_NODE, &mixed);
        mixer.set(outdoor_air_mixer::OUTDOOR_AIR_STREAM_NODE, &outdoor);
        mixer.set(outdoor_air_mixer::RELIEF_AIR_STREAM_NODE, &relief);
        mixer.set(outdoor_air_mixer::RETURN_AIR_STREAM_NODE, &ret);

        use controller_outdoor_air as f;
        let c = &oa.controller;
        let mut controller = IdfObject::named(f::OBJECT_TYPE, &controller_name);
        controller.set(f::RELIEF_AIR_OUTLET_NODE, &relief);
        controller.set(f::RETURN_AIR_NODE, &ret);
        controller.set(f::MIXED_AIR_NODE, &mixed);
        controller.set(f::ACTUATOR_NODE, &outdoor);
        controller.set_autosizable(f::MINIMUM_OUTDOOR_AIR_FLOW_RATE, c.minimum_outdoor_air_flow_rate);
        controller.set_autosizable(f::MAXIMUM_OUTDOOR_AIR_FLOW_RATE, c.maximum_outdoor_air_flow_rate);
        controller.set(f::ECONOMIZER_CONTROL_TYPE, c.economizer_control_type.as_str());
        controller.set(f::ECONOMIZER_CONTROL_ACTION_TYPE, "ModulateFlow");
        set_optional(&mut controller, f::ECONOMIZER_MAXIMUM_LIMIT_DRY_BULB, c.economizer_maximum_limit_dry_bulb_temperature);
        set_optional(&mut controller, f::ECONOMIZER_MAXIMUM_LIMIT_ENTHALPY, c.economizer_maximum_limit_enthalpy);
        controller.set(f::ECONOMIZER_MAXIMUM_LIMIT_DEWPOINT, "");
        controller.set(f::ELECTRONIC_ENTHALPY_LIMIT_CURVE, "");
        set_optional(&mut controller, f::ECONOMIZER_MINIMUM_LIMIT_DRY_BULB, c.economizer_minimum_limit_dry_bulb_temperature);
        controller.set(f::LOCKOUT_TYPE, &c.lockout_type);
        controller.set(f::MINIMUM_LIMIT_TYPE, "FixedMinimum");
        controller.set(f::MINIMUM_OUTDOOR_AIR_SCHEDULE, ctx.opt_name(c.minimum_outdoor_air_schedule));
        controller.set(f::MINIMUM_FRACTION_OF_OUTDOOR_AIR_SCHEDULE, ctx.opt_name(c.minimum_fraction_of_outdoor_air_schedule));
        controller.set(f::MAXIMUM_FRACTION_OF_OUTDOOR_AIR_SCHEDULE, ctx.opt_name(c.maximum_fraction_of_outdoor_air_schedule));

        vec![system, controllers, equipment, mixer, controller]
    }
}

fn set_optional(idf: &mut IdfObject, index: usize, value: Option<f64>) {
    match value {
        Some(v) => idf.set_f64(index, v),
        None => idf.set(index, ""),
    }
}

// ---------------------------------------------------------------------------
// Resources
// ---------------------------------------------------------------------------

fn schedule_type_limits_object(name: &str) -> IdfObject {
    use schedule_type_limits as f;
    let mut idf = IdfObject::named(f::OBJECT_TYPE, name);
    match ScheduleType::from_limits_name(name) {
        ScheduleType::Temperature => {
            idf.set_f64(f::LOWER_LIMIT, -60.0);
            idf.set_f64(f::UPPER_LIMIT, 200.0);
            idf.set(f::NUMERIC_TYPE, "Continuous");
            idf.set(f::UNIT_TYPE, "Temperature");
        }
        ScheduleType::OnOff => {
            idf.set_f64(f::LOWER_LIMIT, 0.0);
            idf.set_f64(f::UPPER_LIMIT, 1.0);
            idf.set(f::NUMERIC_TYPE, "Discrete");
            idf.set(f::UNIT_TYPE, "Availability");
        }
        ScheduleType::Fraction => {
            idf.set_f64(f::LOWER_LIMIT, 0.0);
            idf.set_f64(f::UPPER_LIMIT, 1.0);
            idf.set(f::NUMERIC_TYPE, "Continuous");
        }
        ScheduleType::Any => {}
    }
    idf
}

fn translate_schedule(ctx: &mut Context<'_>, name: &str, schedule: &Schedule) -> IdfObject {
    let limits = schedule.schedule_type.limits_name();
    ctx.limits.insert(limits);
    let mut idf = IdfObject::named(schedule_constant::OBJECT_TYPE, name);
    idf.set(schedule_constant::SCHEDULE_TYPE_LIMITS, limits);
    idf.set_f64(schedule_constant::HOURLY_VALUE, schedule.value);
    idf
}

fn translate_curve(name: &str, curve: &Curve) -> IdfObject {
    let mut idf = IdfObject::named(curve.idf_type(), name);
    for c in curve.coefficients() {
        idf.push(c.to_string());
    }
    match curve {
        Curve::Cubic { minimum_x, maximum_x, .. } | Curve::Quadratic { minimum_x, maximum_x, .. } => {
            idf.push(minimum_x.to_string());
            idf.push(maximum_x.to_string());
        }
        Curve::Biquadratic { minimum_x, maximum_x, minimum_y, maximum_y, .. } => {
            for v in [minimum_x, maximum_x, minimum_y, maximum_y] {
                idf.push(v.to_string());
            }
        }
    }
    idf
}

/// Equipment list and connections of a zone that holds zone equipment.
fn zone_equipment_objects(ctx: &Context<'_>, zone: Handle, zone_name: &str) -> Vec<IdfObject> {
    let equipment = ctx.model.zone_equipment(zone);
    if equipment.is_empty() {
        return Vec::new();
    }
    let list_name = format!("{zone_name} Equipment List");
    let mut list = IdfObject::named(zone_hvac_equipment_list::OBJECT_TYPE, &list_name);
    list.set(zone_hvac_equipment_list::LOAD_DISTRIBUTION_SCHEME, "SequentialLoad");
    for (i, handle) in equipment.iter().enumerate() {
        let type_name = ctx.model.component(*handle).map(|c| c.type_name()).unwrap_or_default();
        let sequence = (i + 1).to_string();
        list.push(type_name);
        list.push(ctx.name(*handle));
        list.push(sequence.clone());
        list.push(sequence);
    }

    use zone_hvac_equipment_connections as f;
    let mut connections = IdfObject::new(f::OBJECT_TYPE);
    connections.set(f::ZONE, zone_name);
    connections.set(f::EQUIPMENT_LIST, list_name);
    connections.set(f::AIR_INLET_NODE, ctx.inlet(zone, INLET));
    connections.set(f::AIR_EXHAUST_NODE, "");
    connections.set(f::AIR_NODE, format!("{zone_name} Zone Air Node"));
    connections.set(f::RETURN_AIR_NODE, ctx.outlet(zone, OUTLET));
    vec![list, connections]
}

// ---------------------------------------------------------------------------
// Components
// ---------------------------------------------------------------------------

fn translate_component(ctx: &Context<'_>, handle: Handle, component: &HvacComponent) -> IdfObject {
    let name = ctx.name(handle);
    let mut idf = IdfObject::named(component.type_name(), &name);
    let schedule = ctx.opt_name(component.availability_schedule());
    let air_in = ctx.inlet(handle, INLET);
    let air_out = ctx.outlet(handle, OUTLET);

    match component {
        HvacComponent::FanConstantVolume(fan) => {
            use fan_constant_volume as f;
            idf.set(f::AVAILABILITY_SCHEDULE, schedule);
            idf.set_f64(f::FAN_TOTAL_EFFICIENCY, fan.fan_efficiency);
            idf.set_f64(f::PRESSURE_RISE, fan.pressure_rise);
            idf.set_autosizable(f::MAXIMUM_FLOW_RATE, fan.maximum_flow_rate);
            idf.set_f64(f::MOTOR_EFFICIENCY, fan.motor_efficiency);
            idf.set_f64(f::MOTOR_IN_AIRSTREAM_FRACTION, fan.motor_in_airstream_fraction);
            idf.set(f::AIR_INLET_NODE, air_in);
            idf.set(f::AIR_OUTLET_NODE, air_out);
        }
        HvacComponent::FanVariableVolume(v) => {
            use fan_variable_volume as f;
            idf.set(f::AVAILABILITY_SCHEDULE, schedule);
            idf.set_f64(f::FAN_TOTAL_EFFICIENCY, v.fan.fan_efficiency);
            idf.set_f64(f::PRESSURE_RISE, v.fan.pressure_rise);
            idf.set_autosizable(f::MAXIMUM_FLOW_RATE, v.fan.maximum_flow_rate);
            idf.set(f::MINIMUM_FLOW_RATE_INPUT_METHOD, "Fraction");
            idf.set_f64(f::MINIMUM_FLOW_FRACTION, v.minimum_flow_fraction);
            idf.set(f::MINIMUM_AIR_FLOW_RATE, "");
            idf.set_f64(f::MOTOR_EFFICIENCY, v.fan.motor_efficiency);
            idf.set_f64(f::MOTOR_IN_AIRSTREAM_FRACTION, v.fan.motor_in_airstream_fraction);
            for (i, c) in v.power_coefficients.iter().enumerate() {
                idf.set_f64(f::COEFFICIENT_1 + i, *c);
            }
            idf.set(f::AIR_INLET_NODE, air_in);
            idf.set(f::AIR_OUTLET_NODE, air_out);
        }
        HvacComponent::CoilCoolingDxSingleSpeed(c) => {
            use coil_cooling_dx_single_speed as f;
            idf.set(f::AVAILABILITY_SCHEDULE, schedule);
            idf.set_autosizable(f::GROSS_RATED_TOTAL_COOLING_CAPACITY, c.rated_total_cooling_capacity);
            idf.set_autosizable(f::GROSS_RATED_SENSIBLE_HEAT_RATIO, c.rated_sensible_heat_ratio);
            idf.set_f64(f::GROSS_RATED_COOLING_COP, c.rated_cop);
            idf.set_autosizable(f::RATED_AIR_FLOW_RATE, c.rated_air_flow_rate);
            idf.set_f64(f::RATED_EVAPORATOR_FAN_POWER, 773.3);
            idf.set(f::AIR_INLET_NODE, air_in);
            idf.set(f::AIR_OUTLET_NODE, air_out);
            idf.set(f::TOTAL_COOLING_CAPACITY_F_TEMPERATURE, ctx.opt_name(c.total_cooling_capacity_curve));
            idf.set(f::TOTAL_COOLING_CAPACITY_F_FLOW, "");
            idf.set(f::EIR_F_TEMPERATURE, ctx.opt_name(c.energy_input_ratio_curve));
        }
        HvacComponent::CoilHeatingGas(c) => {
            use coil_heating_fuel as f;
            let (air_in, air_out) = reheat_air_nodes(ctx, handle, air_in, air_out);
            idf.set(f::AVAILABILITY_SCHEDULE, schedule);
            idf.set(f::FUEL_TYPE, c.fuel_type.as_str());
            idf.set_f64(f::BURNER_EFFICIENCY, c.burner_efficiency);
            idf.set_autosizable(f::NOMINAL_CAPACITY, c.nominal_capacity);
            idf.set(f::AIR_INLET_NODE, air_in);
            idf.set(f::AIR_OUTLET_NODE, air_out);
            idf.set(f::TEMPERATURE_SETPOINT_NODE, "");
            idf.set_f64(f::PARASITIC_ELECTRIC_LOAD, c.parasitic_electric_load);
        }
        HvacComponent::CoilHeatingElectric(c) => {
            use coil_heating_electric as f;
            let (air_in, air_out) = reheat_air_nodes(ctx, handle, air_in, air_out);
            idf.set(f::AVAILABILITY_SCHEDULE, schedule);
            idf.set_f64(f::EFFICIENCY, c.efficiency);
            idf.set_autosizable(f::NOMINAL_CAPACITY, c.nominal_capacity);
            idf.set(f::AIR_INLET_NODE, air_in);
            idf.set(f::AIR_OUTLET_NODE, air_out);
        }
        HvacComponent::CoilHeatingWater(c) => {
            use coil_heating_water as f;
            let (air_in, air_out) = reheat_air_nodes(ctx, handle, air_in, air_out);
            idf.set(f::AVAILABILITY_SCHEDULE, schedule);
            idf.set_autosizable(f::U_FACTOR_TIMES_AREA, c.u_factor_times_area);
            idf.set_autosizable(f::MAXIMUM_WATER_FLOW_RATE, c.maximum_water_flow_rate);
            idf.set(f::WATER_INLET_NODE, ctx.inlet(handle, SECONDARY_INLET));
            idf.set(f::WATER_OUTLET_NODE, ctx.outlet(handle, SECONDARY_OUTLET));
            idf.set(f::AIR_INLET_NODE, air_in);
            idf.set(f::AIR_OUTLET_NODE, air_out);
            idf.set(f::PERFORMANCE_INPUT_METHOD, "UFactorTimesAreaAndDesignWaterFlowRate");
            idf.set_autosizable(f::RATED_CAPACITY, c.rated_capacity);
            idf.set_f64(f::RATED_INLET_WATER_TEMPERATURE, c.rated_inlet_water_temperature);
            idf.set_f64(f::RATED_INLET_AIR_TEMPERATURE, c.rated_inlet_air_temperature);
            idf.set_f64(f::RATED_OUTLET_WATER_TEMPERATURE, c.rated_outlet_water_temperature);
            idf.set_f64(f::RATED_OUTLET_AIR_TEMPERATURE, c.rated_outlet_air_temperature);
        }
        HvacComponent::CoilCoolingWater(c) => {
            use coil_cooling_water as f;
            idf.set(f::AVAILABILITY_SCHEDULE, schedule);
            idf.set_autosizable(f::DESIGN_WATER_FLOW_RATE, c.design_water_flow_rate);
            idf.set_autosizable(f::DESIGN_AIR_FLOW_RATE, c.design_air_flow_rate);
            idf.set_autosizable(f::DESIGN_INLET_WATER_TEMPERATURE, c.design_inlet_water_temperature);
            idf.set_autosizable(f::DESIGN_INLET_AIR_TEMPERATURE, c.design_inlet_air_temperature);
            idf.set_autosizable(f::DESIGN_OUTLET_AIR_TEMPERATURE, c.design_outlet_air_temperature);
            idf.set(f::DESIGN_INLET_AIR_HUMIDITY_RATIO, "Autosize");
            idf.set(f::DESIGN_OUTLET_AIR_HUMIDITY_RATIO, "Autosize");
            idf.set(f::WATER_INLET_NODE, ctx.inlet(handle, SECONDARY_INLET));
            idf.set(f::WATER_OUTLET_NODE, ctx.outlet(handle, SECONDARY_OUTLET));
            idf.set(f::AIR_INLET_NODE, air_in);
            idf.set(f::AIR_OUTLET_NODE, air_out);
        }
        HvacComponent::HeatExchangerAirToAir(hx) => {
            use heat_exchanger_air_to_air_sensible_and_latent as f;
            idf.set(f::AVAILABILITY_SCHEDULE, schedule);
            idf.set_autosizable(f::NOMINAL_SUPPLY_AIR_FLOW_RATE, hx.nominal_supply_air_flow_rate);
            idf.set_f64(f::SENSIBLE_EFFECTIVENESS_100_HEATING, hx.sensible_effectiveness_100_heating);
            idf.set_f64(f::LATENT_EFFECTIVENESS_100_HEATING, hx.latent_effectiveness_100_heating);
            idf.set_f64(f::SENSIBLE_EFFECTIVENESS_75_HEATING, hx.sensible_effectiveness_75_heating);
            idf.set_f64(f::LATENT_EFFECTIVENESS_75_HEATING, hx.latent_effectiveness_75_heating);
            idf.set_f64(f::SENSIBLE_EFFECTIVENESS_100_COOLING, hx.sensible_effectiveness_100_cooling);
            idf.set_f64(f::LATENT_EFFECTIVENESS_100_COOLING, hx.latent_effectiveness_100_cooling);
            idf.set_f64(f::SENSIBLE_EFFECTIVENESS_75_COOLING, hx.sensible_effectiveness_75_cooling);
            idf.set_f64(f::LATENT_EFFECTIVENESS_75_COOLING, hx.latent_effectiveness_75_cooling);
            idf.set(f::SUPPLY_AIR_INLET_NODE, air_in);
            idf.set(f::SUPPLY_AIR_OUTLET_NODE, air_out);
            idf.set(f::EXHAUST_AIR_INLET_NODE, ctx.inlet(handle, SECONDARY_INLET));
            idf.set(f::EXHAUST_AIR_OUTLET_NODE, ctx.outlet(handle, SECONDARY_OUTLET));
            idf.set_f64(f::NOMINAL_ELECTRIC_POWER, hx.nominal_electric_power);
            idf.set_bool(f::SUPPLY_AIR_OUTLET_TEMPERATURE_CONTROL, hx.supply_air_outlet_temperature_control);
            idf.set(f::HEAT_EXCHANGER_TYPE, hx.heat_exchanger_type.as_str());
            idf.set(f::FROST_CONTROL_TYPE, &hx.frost_control_type);
            idf.set_f64(f::THRESHOLD_TEMPERATURE, hx.threshold_temperature);
            set_optional(&mut idf, f::INITIAL_DEFROST_TIME_FRACTION, hx.initial_defrost_time_fraction);
            set_optional(&mut idf, f::RATE_OF_DEFROST_TIME_FRACTION_INCREASE, hx.rate_of_defrost_time_fraction_increase);
            idf.set_bool(f::ECONOMIZER_LOCKOUT, hx.economizer_lockout);
        }
        HvacComponent::PumpConstantSpeed(p) => {
            use pump_constant_speed as f;
            idf.set(f::INLET_NODE, air_in);
            idf.set(f::OUTLET_NODE, air_out);
            idf.set_autosizable(f::DESIGN_FLOW_RATE, p.rated_flow_rate);
            idf.set_f64(f::DESIGN_PUMP_HEAD, p.rated_pump_head);
            idf.set_autosizable(f::DESIGN_POWER_CONSUMPTION, p.rated_power_consumption);
            idf.set_f64(f::MOTOR_EFFICIENCY, p.motor_efficiency);
            idf.set_f64(f::FRACTION_OF_MOTOR_INEFFICIENCIES_TO_FLUID, p.fraction_of_motor_inefficiencies_to_fluid_stream);
            idf.set(f::PUMP_CONTROL_TYPE, p.control_type.as_str());
        }
        HvacComponent::PumpVariableSpeed(p) => {
            use pump_variable_speed as f;
            idf.set(f::INLET_NODE, air_in);
            idf.set(f::OUTLET_NODE, air_out);
            idf.set_autosizable(f::DESIGN_MAXIMUM_FLOW_RATE, p.rated_flow_rate);
            idf.set_f64(f::DESIGN_PUMP_HEAD, p.rated_pump_head);
            idf.set_autosizable(f::DESIGN_POWER_CONSUMPTION, p.rated_power_consumption);
            idf.set_f64(f::MOTOR_EFFICIENCY, p.motor_efficiency);
            idf.set_f64(f::FRACTION_OF_MOTOR_INEFFICIENCIES_TO_FLUID, p.fraction_of_motor_inefficiencies_to_fluid_stream);
            for (index, c) in [(f::COEFFICIENT_1, 0.0), (f::COEFFICIENT_2, 1.0), (f::COEFFICIENT_3, 0.0), (f::COEFFICIENT_4, 0.0)] {
                idf.set_f64(index, c);
            }
            idf.set_f64(f::DESIGN_MINIMUM_FLOW_RATE, p.minimum_flow_rate);
            idf.set(f::PUMP_CONTROL_TYPE, p.control_type.as_str());
        }
        HvacComponent::BoilerHotWater(b) => {
            use boiler_hot_water as f;
            idf.set(f::FUEL_TYPE, b.fuel_type.as_str());
            idf.set_autosizable(f::NOMINAL_CAPACITY, b.nominal_capacity);
            idf.set_f64(f::NOMINAL_THERMAL_EFFICIENCY, b.nominal_thermal_efficiency);
            idf.set(f::EFFICIENCY_CURVE_TEMPERATURE_EVALUATION_VARIABLE, "LeavingBoiler");
            idf.set(f::NORMALIZED_BOILER_EFFICIENCY_CURVE, ctx.opt_name(b.efficiency_curve));
            idf.set(f::DESIGN_WATER_FLOW_RATE, "Autosize");
            idf.set_f64(f::MINIMUM_PART_LOAD_RATIO, 0.0);
            idf.set_f64(f::MAXIMUM_PART_LOAD_RATIO, 1.2);
            idf.set_f64(f::OPTIMUM_PART_LOAD_RATIO, 1.0);
            idf.set(f::WATER_INLET_NODE, air_in);
            idf.set(f::WATER_OUTLET_NODE, air_out);
            idf.set_f64(f::WATER_OUTLET_UPPER_TEMPERATURE_LIMIT, b.design_water_outlet_temperature.unwrap_or(99.0));
            idf.set(f::BOILER_FLOW_MODE, "NotModulated");
            idf.set_f64(f::PARASITIC_ELECTRIC_LOAD, b.parasitic_electric_load);
        }
        HvacComponent::ChillerElectricEir(c) => {
            use chiller_electric_eir as f;
            let condenser_in = ctx.inlet(handle, SECONDARY_INLET);
            let condenser_type = if condenser_in.is_empty() { "AirCooled" } else { "WaterCooled" };
            idf.set_autosizable(f::REFERENCE_CAPACITY, c.reference_capacity);
            idf.set_f64(f::REFERENCE_COP, c.reference_cop);
            idf.set_f64(f::REFERENCE_LEAVING_CHILLED_WATER_TEMPERATURE, c.reference_leaving_chilled_water_temperature);
            idf.set_f64(
                f::REFERENCE_ENTERING_CONDENSER_FLUID_TEMPERATURE,
                c.reference_entering_condenser_fluid_temperature,
            );
            idf.set_autosizable(f::REFERENCE_CHILLED_WATER_FLOW_RATE, c.reference_chilled_water_flow_rate);
            idf.set_autosizable(f::REFERENCE_CONDENSER_FLUID_FLOW_RATE, c.reference_condenser_fluid_flow_rate);
            idf.set(f::COOLING_CAPACITY_F_TEMPERATURE, ctx.opt_name(c.cooling_capacity_f_temperature));
            idf.set(f::EIR_F_TEMPERATURE, ctx.opt_name(c.eir_f_temperature));
            idf.set(f::EIR_F_PART_LOAD_RATIO, ctx.opt_name(c.eir_f_part_load_ratio));
            idf.set_f64(f::MINIMUM_PART_LOAD_RATIO, c.minimum_part_load_ratio);
            idf.set_f64(f::MAXIMUM_PART_LOAD_RATIO, 1.0);
            idf.set_f64(f::OPTIMUM_PART_LOAD_RATIO, 1.0);
            idf.set_f64(f::MINIMUM_UNLOADING_RATIO, c.minimum_unloading_ratio);
            idf.set(f::CHILLED_WATER_INLET_NODE, air_in);
            idf.set(f::CHILLED_WATER_OUTLET_NODE, air_out);
            idf.set(f::CONDENSER_INLET_NODE, condenser_in);
            idf.set(f::CONDENSER_OUTLET_NODE, ctx.outlet(handle, SECONDARY_OUTLET));
            idf.set(f::CONDENSER_TYPE, condenser_type);
        }
        HvacComponent::CoolingTowerSingleSpeed(t) => {
            use cooling_tower_single_speed as f;
            idf.set(f::WATER_INLET_NODE, air_in);
            idf.set(f::WATER_OUTLET_NODE, air_out);
            idf.set_autosizable(f::DESIGN_WATER_FLOW_RATE, t.design_water_flow_rate);
            idf.set_autosizable(f::DESIGN_AIR_FLOW_RATE, t.design_air_flow_rate);
            idf.set_autosizable(f::DESIGN_FAN_POWER, t.fan_power_at_design_air_flow_rate);
            idf.set_autosizable(f::DESIGN_U_FACTOR_TIMES_AREA, t.u_factor_times_area_at_design_air_flow_rate);
        }
        HvacComponent::PipeAdiabatic => {
            idf.set(pipe_adiabatic::INLET_NODE, air_in);
            idf.set(pipe_adiabatic::OUTLET_NODE, air_out);
        }
        HvacComponent::AirTerminalUncontrolled(t) => {
            use air_terminal_uncontrolled as f;
            idf.set(f::AVAILABILITY_SCHEDULE, schedule);
            idf.set(f::ZONE_SUPPLY_AIR_NODE, air_out);
            idf.set_autosizable(f::MAXIMUM_AIR_FLOW_RATE, t.maximum_air_flow_rate);
        }
        HvacComponent::AirTerminalVavReheat(t) => {
            use air_terminal_vav_reheat as f;
            idf.set(f::AVAILABILITY_SCHEDULE, schedule);
            idf.set(f::DAMPER_AIR_OUTLET_NODE, format!("{name} Damper Outlet Node"));
            idf.set(f::AIR_INLET_NODE, air_in);
            idf.set_autosizable(f::MAXIMUM_AIR_FLOW_RATE, t.maximum_air_flow_rate);
            idf.set(f::ZONE_MINIMUM_AIR_FLOW_INPUT_METHOD, "Constant");
            idf.set_f64(f::CONSTANT_MINIMUM_AIR_FLOW_FRACTION, t.constant_minimum_air_flow_fraction);
            idf.set(f::FIXED_MINIMUM_AIR_FLOW_RATE, "");
            idf.set(f::MINIMUM_AIR_FLOW_FRACTION_SCHEDULE, "");
            let coil_type = t
                .reheat_coil
                .and_then(|coil| ctx.model.component(coil).ok())
                .map(|c| c.type_name())
                .unwrap_or_default();
            idf.set(f::REHEAT_COIL_OBJECT_TYPE, coil_type);
            idf.set(f::REHEAT_COIL, ctx.opt_name(t.reheat_coil));
            idf.set(f::MAXIMUM_HOT_WATER_FLOW_RATE, "Autosize");
            idf.set_f64(f::MINIMUM_HOT_WATER_FLOW_RATE, 0.0);
            idf.set(f::AIR_OUTLET_NODE, air_out);
        }
        HvacComponent::AirTerminalVavNoReheat(t) => {
            use air_terminal_vav_no_reheat as f;
            idf.set(f::AVAILABILITY_SCHEDULE, schedule);
            idf.set(f::AIR_OUTLET_NODE, air_out);
            idf.set(f::AIR_INLET_NODE, air_in);
            idf.set_autosizable(f::MAXIMUM_AIR_FLOW_RATE, t.maximum_air_flow_rate);
            idf.set(f::ZONE_MINIMUM_AIR_FLOW_INPUT_METHOD, "Constant");
            idf.set_f64(f::CONSTANT_MINIMUM_AIR_FLOW_FRACTION, t.constant_minimum_air_flow_fraction);
        }
        HvacComponent::BaseboardConvectiveElectric(b) => {
            use zone_hvac_baseboard_convective_electric as f;
            idf.set(f::AVAILABILITY_SCHEDULE, schedule);
            idf.set(f::HEATING_DESIGN_CAPACITY_METHOD, "HeatingDesignCapacity");
            idf.set_autosizable(f::HEATING_DESIGN_CAPACITY, b.nominal_capacity);
            idf.set(f::HEATING_DESIGN_CAPACITY_PER_FLOOR_AREA, "");
            idf.set(f::FRACTION_OF_AUTOSIZED_HEATING_DESIGN_CAPACITY, "");
            idf.set_f64(f::EFFICIENCY, b.efficiency);
        }
        HvacComponent::BaseboardConvectiveWater(b) => {
            use zone_hvac_baseboard_convective_water as f;
            idf.set(f::AVAILABILITY_SCHEDULE, schedule);
            idf.set(f::INLET_NODE, air_in);
            idf.set(f::OUTLET_NODE, air_out);
            idf.set(f::HEATING_DESIGN_CAPACITY_METHOD, "HeatingDesignCapacity");
            idf.set(f::HEATING_DESIGN_CAPACITY, "Autosize");
            idf.set(f::HEATING_DESIGN_CAPACITY_PER_FLOOR_AREA, "");
            idf.set(f::FRACTION_OF_AUTOSIZED_HEATING_DESIGN_CAPACITY, "");
            idf.set_autosizable(f::U_FACTOR_TIMES_AREA, b.u_factor_times_area);
            idf.set_autosizable(f::MAXIMUM_WATER_FLOW_RATE, b.maximum_water_flow_rate);
            idf.set_f64(f::CONVERGENCE_TOLERANCE, b.convergence_tolerance);
        }
    }
    idf
}

/// A terminal's reheat coil sits between the damper and the terminal outlet.
fn reheat_air_nodes(ctx: &Context<'_>, coil: Handle, air_in: String, air_out: String) -> (String, String) {
    match ctx.reheat_air_nodes.get(&coil) {
        Some((damper, outlet)) if air_in.is_empty() && air_out.is_empty() => (damper.clone(), outlet.clone()),
        _ => (air_in, air_out),
    }
}

// ============================================================
// Unit tests
// ============================================================
#[cfg(test)]
mod tests {
    use super::*;
    use model::components::{AirTerminalVav, BaseboardElectric, BaseboardWater, CoilHeatingElectric, Fan};
    use model::loops::ThermalZone;
    use model::templates;

    fn types(idf: &IdfFile) -> Vec<&str> {
        idf.objects().iter().map(|o| o.object_type()).collect()
    }

    #[test]
    fn scheduled_manager_names_its_node_and_schedule() {
        let mut model = Model::new();
        let air_loop = model.add_air_loop("AHU").unwrap();
        let outlet = model.air_loop(air_loop).unwrap().supply_outlet_node();
        let schedule = model.add_schedule("Deck", Schedule::constant(ScheduleType::Temperature, 12.8));
        let spm = model.add_setpoint_manager("Deck SPM", SetpointManager::scheduled(schedule));
        model.add_setpoint_manager_to_node(spm, outlet).unwrap();

        let mut translator = ForwardTranslator::default();
        let idf = translator.translate_model(&model);

        assert_eq!(idf.objects()[0].object_type(), "ScheduleTypeLimits");
        let obj = idf.object_by_name(setpoint_manager_scheduled::OBJECT_TYPE, "Deck SPM").unwrap();
        assert_eq!(obj.get_string(setpoint_manager_scheduled::CONTROL_VARIABLE), Some("Temperature"));
        assert_eq!(obj.get_string(setpoint_manager_scheduled::SCHEDULE), Some("Deck"));
        assert_eq!(obj.get_string(setpoint_manager_scheduled::SETPOINT_NODE), Some("AHU Supply Outlet Node"));
        assert!(translator.warnings().is_empty());
    }

    #[test]
    fn unattached_manager_is_skipped_unless_requested() {
        let mut model = Model::new();
        model.add_setpoint_manager("Loose", SetpointManager::single_zone_reheat());

        let mut translator = ForwardTranslator::default();
        let idf = translator.translate_model(&model);
        assert!(idf.is_empty());
        assert_eq!(translator.warnings().len(), 1);

        let mut translator = ForwardTranslator::new(ForwardTranslatorOptions {
            include_unattached_setpoint_managers: true,
        });
        let idf = translator.translate_model(&model);
        let obj = idf.object_by_name(setpoint_manager_single_zone_reheat::OBJECT_TYPE, "Loose").unwrap();
        assert_eq!(obj.get_string(setpoint_manager_single_zone_reheat::SETPOINT_NODE), None);
    }

    #[test]
    fn air_loop_supply_branch_lists_components_between_nodes() {
        let mut model = Model::new();
        let air_loop = model.add_air_loop("AHU").unwrap();
        let outlet = model.air_loop(air_loop).unwrap().supply_outlet_node();
        let fan = model.add_component("Fan", HvacComponent::FanConstantVolume(Fan::constant_volume()));
        model.add_to_node(fan, outlet).unwrap();

        let idf = ForwardTranslator::default().translate_model(&model);
        let branch = idf.object_by_name(branch::OBJECT_TYPE, "AHU Supply Branch 1").unwrap();
        assert_eq!(
            &branch.fields()[2..],
            &["Fan:ConstantVolume", "Fan", "Fan Inlet Node", "AHU Supply Outlet Node"]
        );
        let fan_obj = idf.object_by_name("Fan:ConstantVolume", "Fan").unwrap();
        assert_eq!(fan_obj.get_string(fan_constant_volume::AIR_OUTLET_NODE), Some("AHU Supply Outlet Node"));
        assert!(fan_obj.is_autosized(fan_constant_volume::MAXIMUM_FLOW_RATE));
    }

    #[test]
    fn empty_plant_branch_gets_a_pipe() {
        let mut model = Model::new();
        model.add_plant_loop("HW").unwrap();

        let idf = ForwardTranslator::default().translate_model(&model);
        let pipes = idf.objects_of_type(pipe_adiabatic::OBJECT_TYPE).count();
        // head, one branch and tail on each side
        assert_eq!(pipes, 6);
        let list = idf.object_by_name(branch_list::OBJECT_TYPE, "HW Supply Branches").unwrap();
        assert_eq!(list.fields().len(), 4);
    }

    #[test]
    fn reheat_coil_uses_the_terminal_air_nodes() {
        let mut model = Model::new();
        let air_loop = model.add_air_loop("AHU").unwrap();
        let zone = model.add_thermal_zone("Office", ThermalZone::default());
        let coil = model.add_component("Reheat", HvacComponent::CoilHeatingElectric(CoilHeatingElectric::default()));
        let terminal = model.add_component(
            "VAV",
            HvacComponent::AirTerminalVavReheat(AirTerminalVav { reheat_coil: Some(coil), ..AirTerminalVav::default() }),
        );
        model.add_branch_for_zone(air_loop, zone, Some(terminal)).unwrap();

        let idf = ForwardTranslator::default().translate_model(&model);
        let coil_obj = idf.object_by_name("Coil:Heating:Electric", "Reheat").unwrap();
        assert_eq!(coil_obj.get_string(coil_heating_electric::AIR_INLET_NODE), Some("VAV Damper Outlet Node"));
        assert_eq!(coil_obj.get_string(coil_heating_electric::AIR_OUTLET_NODE), Some("Office Inlet Node"));
        let vav = idf.object_by_name("AirTerminal:SingleDuct:VAV:Reheat", "VAV").unwrap();
        assert_eq!(vav.get_string(air_terminal_vav_reheat::REHEAT_COIL_OBJECT_TYPE), Some("Coil:Heating:Electric"));
    }

    #[test]
    fn baseboards_write_zone_equipment_lists() {
        let mut model = Model::new();
        let plant = templates::add_hot_water_plant(&mut model).unwrap();
        let air_loop = model.add_air_loop("AHU").unwrap();
        let office = model.add_thermal_zone("Office", ThermalZone::default());
        model.add_branch_for_zone(air_loop, office, None).unwrap();
        let water = model.add_component(
            "Office Baseboard",
            HvacComponent::BaseboardConvectiveWater(BaseboardWater::default()),
        );
        model.add_demand_branch_for_component(plant, water).unwrap();
        model.add_to_thermal_zone(water, office).unwrap();
        let electric = model.add_component(
            "Office Trim Heater",
            HvacComponent::BaseboardConvectiveElectric(BaseboardElectric {
                nominal_capacity: Some(1500.0),
                ..BaseboardElectric::default()
            }),
        );
        model.add_to_thermal_zone(electric, office).unwrap();
        model.add_thermal_zone("Storage", ThermalZone::default());

        let mut translator = ForwardTranslator::default();
        let idf = translator.translate_model(&model);
        assert!(translator.warnings().is_empty(), "{:?}", translator.warnings());

        let list = idf.object_by_name(zone_hvac_equipment_list::OBJECT_TYPE, "Office Equipment List").unwrap();
        assert_eq!(
            &list.fields()[2..],
            &[
                "ZoneHVAC:Baseboard:Convective:Water",
                "Office Baseboard",
                "1",
                "1",
                "ZoneHVAC:Baseboard:Convective:Electric",
                "Office Trim Heater",
                "2",
                "2",
            ]
        );
        let connections = idf.object_by_name(zone_hvac_equipment_connections::OBJECT_TYPE, "Office").unwrap();
        assert_eq!(connections.get_string(zone_hvac_equipment_connections::AIR_INLET_NODE), Some("Office Inlet Node"));
        assert_eq!(connections.get_string(zone_hvac_equipment_connections::AIR_NODE), Some("Office Zone Air Node"));
        assert_eq!(idf.objects_of_type(zone_hvac_equipment_connections::OBJECT_TYPE).count(), 1);

        let water_obj = idf.object_by_name(zone_hvac_baseboard_convective_water::OBJECT_TYPE, "Office Baseboard").unwrap();
        assert_eq!(
            water_obj.get_string(zone_hvac_baseboard_convective_water::INLET_NODE),
            Some("Office Baseboard Inlet Node")
        );
        let demand = idf.object_by_name(branch_list::OBJECT_TYPE, "Hot Water Loop Demand Branches").unwrap();
        let on_demand = demand.fields()[1..].iter().any(|b| {
            idf.object_by_name(branch::OBJECT_TYPE, b)
                .is_some_and(|o| o.fields().iter().any(|f| f == "Office Baseboard"))
        });
        assert!(on_demand);

        let electric_obj = idf
            .object_by_name(zone_hvac_baseboard_convective_electric::OBJECT_TYPE, "Office Trim Heater")
            .unwrap();
        assert_eq!(
            electric_obj.get_f64(zone_hvac_baseboard_convective_electric::HEATING_DESIGN_CAPACITY).unwrap(),
            Some(1500.0)
        );
    }

    #[test]
    fn baseboard_outside_a_zone_is_written_with_a_warning() {
        let mut model = Model::new();
        model.add_component("Spare", HvacComponent::BaseboardConvectiveElectric(BaseboardElectric::default()));

        let mut translator = ForwardTranslator::default();
        let idf = translator.translate_model(&model);
        assert!(idf.object_by_name(zone_hvac_baseboard_convective_electric::OBJECT_TYPE, "Spare").is_some());
        assert!(translator.warnings().iter().any(|w| w.contains("not in a thermal zone")));
    }

    #[test]
    fn separators_in_names_are_replaced_consistently() {
        let mut model = Model::new();
        let air_loop = model.add_air_loop("AHU").unwrap();
        let outlet = model.air_loop(air_loop).unwrap().supply_outlet_node();
        let fan = model.add_component("Supply, Fan!", HvacComponent::FanConstantVolume(Fan::constant_volume()));
        model.add_to_node(fan, outlet).unwrap();

        let mut translator = ForwardTranslator::default();
        let idf = translator.translate_model(&model);
        let fan_obj = idf.object_by_name("Fan:ConstantVolume", "Supply_ Fan_").unwrap();
        assert_eq!(fan_obj.get_string(fan_constant_volume::AIR_INLET_NODE), Some("Supply_ Fan_ Inlet Node"));
        let branch = idf.object_by_name(branch::OBJECT_TYPE, "AHU Supply Branch 1").unwrap();
        assert_eq!(branch.get_string(3), Some("Supply_ Fan_"));

        let about_fan = translator.warnings().iter().filter(|w| w.contains("'Supply, Fan!'")).count();
        assert_eq!(about_fan, 1);
        assert!(translator.errors().is_empty());

        let reparsed = IdfFile::parse(&idf.to_string()).unwrap();
        assert_eq!(reparsed, idf);
    }

    #[test]
    fn system_type_7_translates_without_errors() {
        let mut model = Model::new();
        templates::add_system_type_7(&mut model).unwrap();

        let mut translator = ForwardTranslator::default();
        let idf = translator.translate_model(&model);
        assert!(translator.errors().is_empty(), "{:?}", translator.errors());
        let types = types(&idf);
        for expected in ["AirLoopHVAC", "PlantLoop", "Chiller:Electric:EIR", "SetpointManager:MixedAir", "OutdoorAir:Mixer"] {
            assert!(types.contains(&expected), "missing {expected}");
        }
        assert_eq!(types.iter().filter(|t| **t == "PlantLoop").count(), 3);
    }
}
