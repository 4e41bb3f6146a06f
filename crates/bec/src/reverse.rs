//! BEC XML → Model.
//!
//! Translation order: curves, thermal zones, fluid systems, air systems, and
//! finally the zone systems and air systems the zones name that no terminal
//! unit has attached yet. A fluid
//! system referenced through a `FluidSeg` before its own turn is translated
//! on demand; the name index makes the later visit return the same loop.
//!
//! BEC values are IP; everything written into the model is SI. With
//! [`ReverseTranslatorOptions::autosize`] set, capacities and flow rates are
//! left autosized instead of read.

use std::collections::HashMap;

use tracing::{debug, info, instrument, warn};

use model::components::{
    AirTerminalUncontrolled, AirTerminalVav, BaseboardElectric, BaseboardWater, Boiler, Chiller, CoilCoolingDx, CoilCoolingWater,
    CoilHeatingElectric, CoilHeatingFuel, CoilHeatingWater, CoolingTower, Fan, FanVariableVolume, FuelType,
    HvacComponent, Pump,
};
use model::connection::{INLET, MIXED_AIR, OUTLET};
use model::loops::{
    CommonPipeSimulation, ControllerOutdoorAir, EconomizerControlType, NightCycleControl, PathSide,
    PlantLoopType, SizingSystem, ThermalZone,
};
use model::setpoint::{OutdoorAirReset, ReferenceTemperatureType, WarmestStrategy};
use model::{templates, Curve, Handle, Model, ObjectKind, Schedule, ScheduleType, SetpointManager, SpmKind};

use crate::error::BecError;
use crate::units::*;
use crate::xml::Element;

/// Water properties for design flow estimates.
const WATER_CP: f64 = 4180.0;
const WATER_DENSITY: f64 = 1000.0;

/// Supply temperature used when a fixed plant setpoint cannot be read (°C).
const DEFAULT_PLANT_SETPOINT: f64 = 21.1;
/// Supply air temperature used when a cooling setpoint cannot be read (°C).
const DEFAULT_DECK_SETPOINT: f64 = 12.8;
/// Default pump head (Pa) when flow and power do not give one.
const DEFAULT_PUMP_HEAD: f64 = 149_453.0;

#[derive(Debug, Clone, Default)]
pub struct ReverseTranslatorOptions {
    /// Leave capacities and flow rates autosized instead of reading them.
    pub autosize: bool,
}

/// Builds air loops, plant loops and zones out of a BEC document.
#[derive(Debug, Default)]
pub struct ReverseTranslator {
    options: ReverseTranslatorOptions,
    warnings: Vec<String>,
    errors: Vec<String>,
}

impl ReverseTranslator {
    pub fn new(options: ReverseTranslatorOptions) -> Self {
        Self { options, ..Self::default() }
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn translate(&mut self, doc: &Element) -> Model {
        let mut model = Model::new();
        self.translate_into(doc, &mut model);
        model
    }

    /// Translate into an existing model, whose schedules and curves can be
    /// referenced by name, and return the loops created.
    #[instrument(skip_all, fields(root = %doc.name, autosize = self.options.autosize))]
    pub fn translate_into(&mut self, doc: &Element, model: &mut Model) -> Vec<Handle> {
        let mut session = Session {
            doc,
            model,
            autosize: self.options.autosize,
            plants: HashMap::new(),
            segments: HashMap::new(),
            zone_systems: HashMap::new(),
            names: HashMap::new(),
            created: Vec::new(),
            warnings: Vec::new(),
            errors: Vec::new(),
        };
        session.run();

        let Session { created, warnings, errors, .. } = session;
        self.warnings = warnings;
        self.errors = errors;
        info!(
            created = created.len(),
            warnings = self.warnings.len(),
            errors = self.errors.len(),
            "BEC document translated to model"
        );
        created
    }
}

/// The loop an air-side coil must also join.
struct Coil {
    component: Handle,
    plant: Option<Handle>,
}

/// State for one document.
struct Session<'a> {
    doc: &'a Element,
    model: &'a mut Model,
    autosize: bool,
    /// Translated fluid systems by lowercase name.
    plants: HashMap<String, Handle>,
    /// `FluidSeg` lowercase name → owning `FluidSys` element.
    segments: HashMap<String, &'a Element>,
    /// `ZnSys` elements by lowercase name.
    zone_systems: HashMap<String, &'a Element>,
    /// Objects created this run by lowercase document name. The model
    /// renames them when the target already holds that name.
    names: HashMap<String, Handle>,
    created: Vec<Handle>,
    warnings: Vec<String>,
    errors: Vec<String>,
}

impl<'a> Session<'a> {
    fn run(&mut self) {
        let doc = self.doc;

        for system in doc.descendants("FluidSys") {
            for segment in system.descendants("FluidSeg") {
                if let Some(name) = segment.child_text("Name") {
                    self.segments.insert(name.to_lowercase(), system);
                }
            }
        }

        for system in doc.descendants("ZnSys") {
            if let Some(name) = system.child_text("Name") {
                self.zone_systems.insert(name.to_lowercase(), system);
            }
        }

        for tag in ["CrvCubic", "CrvQuad", "CrvDblQuad"] {
            for el in doc.descendants(tag) {
                let result = self.translate_curve(el);
                self.report(result);
            }
        }
        for el in doc.descendants("ThrmlZn") {
            let result = self.translate_zone(el);
            self.report(result);
        }
        for el in doc.descendants("FluidSys") {
            let result = self.translate_fluid_system(el);
            self.report(result);
        }
        for el in doc.descendants("AirSys") {
            let result = self.translate_air_system(el);
            self.report(result);
        }
        for el in doc.descendants("ThrmlZn") {
            let result = self.attach_zone_to_system(el);
            self.report(result);
        }
    }

    // -----------------------------------------------------------------------
    // Reporting and field helpers
    // -----------------------------------------------------------------------

    fn warn(&mut self, message: String) {
        warn!("{message}");
        self.warnings.push(message);
    }

    fn error(&mut self, message: String) {
        tracing::error!("{message}");
        self.errors.push(message);
    }

    /// Record a failed translation step and carry on with the next one.
    fn report<T>(&mut self, result: Result<T, BecError>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(e) => {
                self.error(e.to_string());
                None
            }
        }
    }

    /// Numeric child. Malformed text is warned about and reads as missing.
    fn number(&mut self, el: &Element, child: &str) -> Option<f64> {
        match el.child_f64(child) {
            Ok(value) => value,
            Err(e) => {
                self.warn(format!("{e}; using the default"));
                None
            }
        }
    }

    fn number_or(&mut self, el: &Element, child: &str, default: f64) -> f64 {
        self.number(el, child).unwrap_or(default)
    }

    /// Like [`Self::number_or`], but a missing value is warned about too.
    fn expect_number(&mut self, el: &Element, child: &str, default: f64) -> f64 {
        match el.child_f64(child) {
            Ok(Some(value)) => value,
            Ok(None) => {
                self.warn(format!("{} has no <{child}>; using {default}", describe(el)));
                default
            }
            Err(e) => {
                self.warn(format!("{e}; using {default}"));
                default
            }
        }
    }

    /// A capacity or flow that is only read when not autosizing.
    fn sized(&mut self, el: &Element, child: &str, convert: fn(f64) -> f64) -> Option<f64> {
        if self.autosize {
            return None;
        }
        self.number(el, child).map(convert)
    }

    fn flag(el: &Element, child: &str) -> bool {
        el.child_text(child)
            .is_some_and(|t| matches!(t.to_ascii_lowercase().as_str(), "1" | "yes" | "true"))
    }

    /// Object called `name` in the document, else in the target model.
    fn find(&self, name: &str, pred: impl Fn(&ObjectKind) -> bool) -> Option<Handle> {
        let object = match self.names.get(&name.to_lowercase()) {
            Some(handle) => self.model.object(*handle),
            None => self.model.object_by_name(name),
        };
        object.filter(|o| pred(o.kind())).map(|o| o.handle())
    }

    fn record(&mut self, name: &str, handle: Handle) -> Handle {
        self.names.insert(name.to_lowercase(), handle);
        handle
    }

    /// Schedule named by `child`. An unknown name is warned about.
    fn schedule_ref(&mut self, el: &Element, child: &str) -> Option<Handle> {
        let name = el.child_text(child)?;
        let found = self.find(name, |k| matches!(k, ObjectKind::Schedule(_)));
        if found.is_none() {
            self.warn(format!("{} refers to unknown schedule '{name}' in <{child}>", describe(el)));
        }
        found
    }

    /// Curve named by `child` whose form satisfies `pred`.
    fn curve_ref(&mut self, el: &Element, child: &str, pred: fn(&Curve) -> bool) -> Option<Handle> {
        let name = el.child_text(child)?;
        let found = self.find(name, |k| matches!(k, ObjectKind::Curve(c) if pred(c)));
        if found.is_none() {
            self.warn(format!("{} refers to unknown or mismatched curve '{name}' in <{child}>", describe(el)));
        }
        found
    }

    /// Keep the curves that were found and the defaults for the rest.
    fn fill_curves<const N: usize>(
        &mut self,
        found: [Option<Handle>; N],
        defaults: [Handle; N],
    ) -> Result<[Handle; N], BecError> {
        let mut chosen = defaults;
        for ((slot, found), default) in chosen.iter_mut().zip(found).zip(defaults) {
            if let Some(curve) = found {
                *slot = curve;
                self.model.remove(default)?;
            }
        }
        Ok(chosen)
    }

    fn temperature_schedule(&mut self, name: &str, value: f64) -> Handle {
        self.model
            .add_schedule(name, Schedule::constant(ScheduleType::Temperature, value))
    }

    fn attach_manager(&mut self, name: &str, spm: SetpointManager, node: Handle) -> Result<Handle, BecError> {
        let handle = self.model.add_setpoint_manager(name, spm);
        self.model.add_setpoint_manager_to_node(handle, node)?;
        Ok(handle)
    }

    /// Reset line from `{prefix}SupHi`, `{prefix}SupLow`, `{prefix}OutdrHi`
    /// and `{prefix}OutdrLow`, all °F. Incomplete input keeps the defaults.
    fn outdoor_air_reset(&mut self, el: &Element, prefix: &str) -> OutdoorAirReset {
        let values = ["SupHi", "SupLow", "OutdrHi", "OutdrLow"]
            .map(|suffix| self.number(el, &format!("{prefix}{suffix}")).map(f_to_c));
        match values {
            [Some(supply_high), Some(supply_low), Some(outdoor_high), Some(outdoor_low)] => {
                let ((high, at_high), (low, at_low)) = if outdoor_high > outdoor_low {
                    ((outdoor_high, supply_high), (outdoor_low, supply_low))
                } else {
                    ((outdoor_low, supply_low), (outdoor_high, supply_high))
                };
                OutdoorAirReset {
                    setpoint_at_outdoor_low_temperature: at_low,
                    outdoor_low_temperature: low,
                    setpoint_at_outdoor_high_temperature: at_high,
                    outdoor_high_temperature: high,
                    ..OutdoorAirReset::default()
                }
            }
            _ => {
                self.warn(format!(
                    "{} uses an outside air reset without all four reset temperatures; using defaults",
                    describe(el)
                ));
                OutdoorAirReset::default()
            }
        }
    }

    // -----------------------------------------------------------------------
    // Resources and zones
    // -----------------------------------------------------------------------

    fn translate_curve(&mut self, el: &Element) -> Result<Handle, BecError> {
        let name = require_name(el)?;
        let minimum_x = self.expect_number(el, "MinVar1", 0.0);
        let maximum_x = self.expect_number(el, "MaxVar1", 100.0);
        let curve = if el.is("CrvCubic") {
            Curve::Cubic { coefficients: self.coefficients(el), minimum_x, maximum_x }
        } else if el.is("CrvQuad") {
            Curve::Quadratic { coefficients: self.coefficients(el), minimum_x, maximum_x }
        } else {
            Curve::Biquadratic {
                coefficients: self.coefficients(el),
                minimum_x,
                maximum_x,
                minimum_y: self.expect_number(el, "MinVar2", 0.0),
                maximum_y: self.expect_number(el, "MaxVar2", 100.0),
            }
        };
        let handle = self.model.add_curve(name, curve);
        Ok(self.record(name, handle))
    }

    fn coefficients<const N: usize>(&mut self, el: &Element) -> [f64; N] {
        let mut coefficients = [0.0; N];
        for (i, slot) in coefficients.iter_mut().enumerate() {
            *slot = self.number_or(el, &format!("Coef{}", i + 1), 0.0);
        }
        coefficients
    }

    fn translate_zone(&mut self, el: &Element) -> Result<Handle, BecError> {
        let name = require_name(el)?;
        if let Some(existing) = self.find(name, |k| matches!(k, ObjectKind::ThermalZone(_))) {
            return Ok(existing);
        }
        let multiplier = self.number_or(el, "Mult", 1.0).round().max(1.0) as u32;
        let handle = self
            .model
            .add_thermal_zone(name, ThermalZone { multiplier, ..ThermalZone::default() });
        Ok(self.record(name, handle))
    }

    /// Put the zone system named by `PriAirCondgSysRef` in the zone, and serve
    /// a zone that names an air system but has no terminal unit with a direct
    /// branch. Every zone gets its own copy of a shared zone system.
    fn attach_zone_to_system(&mut self, el: &Element) -> Result<(), BecError> {
        let Some(name) = el.child_text("Name") else {
            return Ok(());
        };
        let Some(zone) = self.find(name, |k| matches!(k, ObjectKind::ThermalZone(_))) else {
            return Ok(());
        };
        let zone_system = el
            .child_text("PriAirCondgSysRef")
            .and_then(|system| self.zone_systems.get(&system.to_lowercase()).copied());
        if let Some(zone_system) = zone_system {
            if let Some(equipment) = self.translate_zone_system(zone_system)? {
                self.model.add_to_thermal_zone(equipment, zone)?;
                debug!(zone = name, "zone system added");
            }
        }
        if self.model.zone_air_loop(zone).is_some() {
            return Ok(());
        }
        let Some(system) = el.child_text("VentSysRef").or(el.child_text("PriAirCondgSysRef")) else {
            return Ok(());
        };
        let Some(air_loop) = self.find(system, |k| matches!(k, ObjectKind::AirLoop(_))) else {
            debug!(zone = name, system, "zone system is not an air loop");
            return Ok(());
        };
        self.model.add_branch_for_zone(air_loop, zone, None)?;
        debug!(zone = name, system, "zone served without a terminal unit");
        Ok(())
    }

    /// Zone equipment for a `ZnSys`. Baseboards are the only type read.
    fn translate_zone_system(&mut self, el: &Element) -> Result<Option<Handle>, BecError> {
        let name = require_name(el)?;
        let kind = el.child_text("Type").unwrap_or_default();
        if !kind.eq_ignore_ascii_case("Baseboard") {
            self.warn(format!("ZnSys '{name}' has unsupported Type '{kind}'; it is not translated"));
            return Ok(None);
        }
        let Some(coil) = el.first_child("CoilHtg") else {
            self.warn(format!("ZnSys '{name}' has no <CoilHtg>; it is not translated"));
            return Ok(None);
        };
        let availability = self.schedule_ref(el, "AvailSchRef");

        let coil_type = coil.child_text("Type").unwrap_or_default();
        match coil_type.to_ascii_lowercase().as_str() {
            "resistance" => {
                let baseboard = BaseboardElectric {
                    availability_schedule: availability,
                    nominal_capacity: self.sized(coil, "CapTotGrossRtdSim", btuh_to_w),
                    ..BaseboardElectric::default()
                };
                let handle = self
                    .model
                    .add_component(name, HvacComponent::BaseboardConvectiveElectric(baseboard));
                Ok(Some(handle))
            }
            "hotwater" => {
                let baseboard = BaseboardWater {
                    availability_schedule: availability,
                    maximum_water_flow_rate: self.sized(coil, "FluidFlowRtDsgnSim", gpm_to_m3s),
                    ..BaseboardWater::default()
                };
                let handle = self
                    .model
                    .add_component(name, HvacComponent::BaseboardConvectiveWater(baseboard));
                match self.plant_for(coil, "FluidSegInRef")? {
                    Some(plant) => self.model.add_demand_branch_for_component(plant, handle)?,
                    None => self.warn(format!("ZnSys '{name}' has a hot water coil on no fluid system")),
                }
                Ok(Some(handle))
            }
            _ => {
                self.warn(format!("ZnSys '{name}' has unsupported CoilHtg Type '{coil_type}'; it is not translated"));
                Ok(None)
            }
        }
    }

    // -----------------------------------------------------------------------
    // Fluid systems
    // -----------------------------------------------------------------------

    fn loop_for_segment(&mut self, segment: &str) -> Result<Option<Handle>, BecError> {
        let Some(system) = self.segments.get(&segment.to_lowercase()).copied() else {
            self.warn(format!("fluid segment '{segment}' does not belong to any FluidSys"));
            return Ok(None);
        };
        self.translate_fluid_system(system).map(Some)
    }

    fn plant_for(&mut self, el: &Element, child: &str) -> Result<Option<Handle>, BecError> {
        match el.child_text(child) {
            Some(segment) => self.loop_for_segment(segment),
            None => Ok(None),
        }
    }

    fn translate_fluid_system(&mut self, el: &Element) -> Result<Handle, BecError> {
        let name = require_name(el)?;
        let key = name.to_lowercase();
        if let Some(existing) = self.plants.get(&key) {
            return Ok(*existing);
        }
        if let Some(existing) = self.find(name, |k| matches!(k, ObjectKind::PlantLoop(_))) {
            self.plants.insert(key, existing);
            return Ok(existing);
        }

        let plant = self.model.add_plant_loop(name)?;
        self.record(name, plant);
        self.plants.insert(key, plant);
        self.created.push(plant);
        let loop_name = self.model.name(plant).unwrap_or(name).to_owned();

        let loop_type = match el.child_text("Type").map(str::to_ascii_lowercase).as_deref() {
            Some("hotwater") => PlantLoopType::Heating,
            Some("chilledwater") => PlantLoopType::Cooling,
            Some("condenserwater") => PlantLoopType::Condenser,
            other => {
                self.warn(format!(
                    "FluidSys '{loop_name}' has unsupported Type '{}'; sizing it as a heating loop",
                    other.unwrap_or_default()
                ));
                PlantLoopType::Heating
            }
        };
        let exit = self.number(el, "DsgnSupWtrTemp").map(f_to_c);
        let delta = self.number(el, "DsgnSupWtrDelT").map(delta_f_to_c);
        {
            let sizing = &mut self.model.plant_loop_mut(plant)?.sizing;
            sizing.loop_type = loop_type;
            if let Some(exit) = exit {
                sizing.design_loop_exit_temperature = exit;
            }
            if let Some(delta) = delta {
                sizing.loop_design_temperature_difference = delta;
            }
        }

        let mut bypass = false;
        for boiler in el.descendants("Blr") {
            let result = self.translate_boiler(boiler);
            if let Some(component) = self.report(result) {
                let result = self.add_supply_equipment(plant, component, boiler);
                self.report(result);
            }
        }
        for chiller in el.descendants("Chlr") {
            bypass |= chiller.child_text("EvapHasBypass") == Some("1");
            let result = self.translate_chiller(chiller);
            if let Some(component) = self.report(result) {
                let result = self.add_supply_equipment(plant, component, chiller);
                self.report(result);
            }
        }
        for tower in el.descendants("HtRej") {
            let result = self.translate_cooling_tower(tower);
            if let Some(component) = self.report(result) {
                let result = self.add_supply_equipment(plant, component, tower);
                self.report(result);
            }
        }
        if bypass {
            let pipe = self
                .model
                .add_component(&format!("{loop_name} Chiller Bypass"), HvacComponent::PipeAdiabatic);
            self.model.add_supply_branch_for_component(plant, pipe)?;
        }

        for segment in el.descendants("FluidSeg") {
            let result = self.translate_segment_pump(plant, segment);
            self.report(result);
        }

        if !self.autosize {
            if let Some(flow) = self.loop_flow_from_pumps(plant)? {
                self.model.plant_loop_mut(plant)?.maximum_loop_flow_rate = Some(flow);
            }
        }

        let result = self.translate_plant_temperature_control(el, plant, &loop_name);
        self.report(result);

        info!(%plant, name = %loop_name, "fluid system translated");
        Ok(plant)
    }

    /// Put `component` on its own supply branch, with the element's `Pump`
    /// (if any) just upstream of it.
    fn add_supply_equipment(&mut self, plant: Handle, component: Handle, el: &Element) -> Result<(), BecError> {
        self.model.add_supply_branch_for_component(plant, component)?;
        if let Some(pump_el) = el.first_child("Pump") {
            let pump = self.translate_pump(pump_el)?;
            if let Some(inlet) = self.model.inlet_node_of(component, INLET) {
                self.model.add_to_node(pump, inlet)?;
            }
        }
        Ok(())
    }

    fn translate_segment_pump(&mut self, plant: Handle, segment: &Element) -> Result<(), BecError> {
        let Some(pump_el) = segment.first_child("Pump") else {
            return Ok(());
        };
        let kind = segment.child_text("Type").unwrap_or_default().to_ascii_lowercase();
        let node = match kind.as_str() {
            "secondarysupply" => {
                let plant_loop = self.model.plant_loop_mut(plant)?;
                plant_loop.common_pipe_simulation = CommonPipeSimulation::CommonPipe;
                plant_loop.demand_inlet_node()
            }
            "primarysupply" | "primaryreturn" => self.model.plant_loop(plant)?.supply_inlet_node(),
            _ => {
                debug!(segment = ?segment.child_text("Name"), kind, "fluid segment pump ignored");
                return Ok(());
            }
        };
        let pump = self.translate_pump(pump_el)?;
        self.model.add_to_node(pump, node)?;
        Ok(())
    }

    /// The first constant then first variable speed pump ahead of the
    /// supply splitter sets the loop flow; without one, branch pumps add up.
    fn loop_flow_from_pumps(&self, plant: Handle) -> Result<Option<f64>, BecError> {
        let runs = self.model.branches(plant, PathSide::PlantSupply)?;
        let rated = |h: Handle| match self.model.component(h) {
            Ok(HvacComponent::PumpConstantSpeed(p) | HvacComponent::PumpVariableSpeed(p)) => p.rated_flow_rate,
            _ => None,
        };

        let head = runs.first().map(Vec::as_slice).unwrap_or_default();
        let constant = self
            .model
            .components_on(head, |c| matches!(c, HvacComponent::PumpConstantSpeed(_)));
        let variable = self
            .model
            .components_on(head, |c| matches!(c, HvacComponent::PumpVariableSpeed(_)));
        if let Some(first) = constant.first().or(variable.first()) {
            return Ok(rated(*first));
        }

        let branch_runs = runs.len().saturating_sub(2);
        let total: f64 = runs
            .iter()
            .skip(1)
            .take(branch_runs)
            .flat_map(|run| self.model.components_on(run, HvacComponent::is_pump))
            .filter_map(rated)
            .sum();
        Ok((total > 0.0).then_some(total))
    }

    fn translate_plant_temperature_control(
        &mut self,
        el: &Element,
        plant: Handle,
        loop_name: &str,
    ) -> Result<(), BecError> {
        let outlet = self.model.plant_loop(plant)?.supply_outlet_node();
        let method = el.child_text("TempCtrl").unwrap_or_default().to_ascii_lowercase();
        let manager_name = format!("{loop_name} Supply Temp Manager");

        match method.as_str() {
            "fixed" => {
                let temperature = match self.number(el, "FixedSupTemp") {
                    Some(t) => f_to_c(t),
                    None => match self.number(el, "DsgnSupWtrTemp") {
                        Some(t) => {
                            self.warn(format!(
                                "FluidSys '{loop_name}' has no FixedSupTemp; using its design supply temperature"
                            ));
                            f_to_c(t)
                        }
                        None => {
                            self.error(format!(
                                "FluidSys '{loop_name}' has no fixed supply temperature; using {DEFAULT_PLANT_SETPOINT} C"
                            ));
                            DEFAULT_PLANT_SETPOINT
                        }
                    },
                };
                let schedule = self.temperature_schedule(&format!("{loop_name} Supply Temp Schedule"), temperature);
                self.attach_manager(&manager_name, SetpointManager::scheduled(schedule), outlet)?;
            }
            "scheduled" => {
                let schedule = match self.schedule_ref(el, "TempSetptSchRef") {
                    Some(schedule) => schedule,
                    None => {
                        self.error(format!(
                            "FluidSys '{loop_name}' has no usable TempSetptSchRef; using {DEFAULT_PLANT_SETPOINT} C"
                        ));
                        self.temperature_schedule(&format!("{loop_name} Supply Temp Schedule"), DEFAULT_PLANT_SETPOINT)
                    }
                };
                self.attach_manager(&manager_name, SetpointManager::scheduled(schedule), outlet)?;
            }
            "wetbulbreset" => {
                let high = self.number(el, "RstSupHi").map(f_to_c);
                let low = self.number(el, "RstSupLow").map(f_to_c);
                let approach = self.number(el, "WetBulbApproach").map(delta_f_to_c);
                let mut spm = SetpointManager::follow_outdoor_air_temperature();
                spm.edit_kind(|kind| {
                    if let SpmKind::FollowOutdoorAirTemperature {
                        reference_temperature_type,
                        offset_temperature_difference,
                        maximum_setpoint_temperature,
                        minimum_setpoint_temperature,
                    } = kind
                    {
                        *reference_temperature_type = ReferenceTemperatureType::OutdoorAirWetBulb;
                        if let (Some(high), Some(low)) = (high, low) {
                            *maximum_setpoint_temperature = high;
                            *minimum_setpoint_temperature = low;
                        }
                        if let Some(approach) = approach {
                            *offset_temperature_difference = approach;
                        }
                    }
                })?;
                self.attach_manager(&manager_name, spm, outlet)?;
            }
            "outsideairreset" => {
                let reset = self.outdoor_air_reset(el, "Rst");
                self.attach_manager(&manager_name, SetpointManager::new(SpmKind::OutdoorAirReset(reset)), outlet)?;
            }
            "loadreset" => match self.number(el, "DsgnSupWtrTemp") {
                Some(t) => {
                    self.warn(format!(
                        "FluidSys '{loop_name}' load reset is held at its design supply temperature"
                    ));
                    let schedule =
                        self.temperature_schedule(&format!("{loop_name} Supply Temp Schedule"), f_to_c(t));
                    self.attach_manager(&manager_name, SetpointManager::scheduled(schedule), outlet)?;
                }
                None => {
                    self.error(format!("FluidSys '{loop_name}' uses load reset without DsgnSupWtrTemp"));
                }
            },
            "fixeddualsetpoint" => self.fixed_dual_setpoint(el, plant, loop_name, outlet)?,
            _ => self.error(format!("FluidSys '{loop_name}' does not have a setpoint")),
        }
        Ok(())
    }

    /// One setpoint on the supply outlet and one per heating or cooling
    /// component outlet.
    fn fixed_dual_setpoint(
        &mut self,
        el: &Element,
        plant: Handle,
        loop_name: &str,
        outlet: Handle,
    ) -> Result<(), BecError> {
        let cooling = self.number(el, "FixedSupTemp").map(f_to_c).unwrap_or(10.0);
        let heating = self.number(el, "HtgFixedSupTemp").map(f_to_c).unwrap_or(26.7);
        let cooling_schedule = self.temperature_schedule(&format!("{loop_name} Cooling Supply Temp"), cooling);
        let heating_schedule = self.temperature_schedule(&format!("{loop_name} Heating Supply Temp"), heating);
        self.attach_manager(
            &format!("{loop_name} Supply Outlet SPM"),
            SetpointManager::scheduled(cooling_schedule),
            outlet,
        )?;

        let supply = self.model.supply_components(plant)?;
        let heaters = self
            .model
            .components_on(&supply, |c| matches!(c, HvacComponent::BoilerHotWater(_)));
        let coolers = self.model.components_on(&supply, |c| {
            matches!(c, HvacComponent::ChillerElectricEir(_) | HvacComponent::CoolingTowerSingleSpeed(_))
        });
        let targets = heaters
            .into_iter()
            .map(|c| (c, heating_schedule))
            .chain(coolers.into_iter().map(|c| (c, cooling_schedule)));
        for (component, schedule) in targets.collect::<Vec<_>>() {
            let Some(node) = self.model.outlet_node_of(component, OUTLET) else {
                continue;
            };
            let name = format!("{} SPM", self.model.name(component).unwrap_or_default());
            self.attach_manager(&name, SetpointManager::scheduled(schedule), node)?;
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Plant equipment
    // -----------------------------------------------------------------------

    fn translate_pump(&mut self, el: &Element) -> Result<Handle, BecError> {
        let name = require_name(el)?;
        let constant = el
            .child_text("SpdCtrl")
            .is_some_and(|s| s.eq_ignore_ascii_case("ConstantSpeed"));

        let mut pump = Pump { rated_pump_head: DEFAULT_PUMP_HEAD, ..Pump::default() };
        pump.motor_efficiency = self.number_or(el, "MtrEff", pump.motor_efficiency);
        if self.autosize {
            if let Some(head) = self.number(el, "TotHd") {
                pump.rated_pump_head = ft_h2o_to_pa(head);
            }
        } else {
            let flow = self.number(el, "FlowCap").map(gpm_to_m3s).unwrap_or(0.0);
            let power = self.number(el, "Pwr").map(kw_to_w).unwrap_or(0.0);
            if flow > 0.0 && power > 0.0 {
                pump.rated_flow_rate = Some(flow);
                pump.rated_power_consumption = Some(power);
                pump.rated_pump_head = 0.8 * power / flow;
            } else {
                self.warn(format!("Pump '{name}' has no flow capacity or power; leaving it autosized"));
            }
        }

        let component = if constant {
            HvacComponent::PumpConstantSpeed(pump)
        } else {
            debug!(pump = name, "variable speed pump minimum flow set to zero");
            HvacComponent::PumpVariableSpeed(Pump { minimum_flow_rate: 0.0, ..pump })
        };
        Ok(self.model.add_component(name, component))
    }

    fn translate_boiler(&mut self, el: &Element) -> Result<Handle, BecError> {
        let name = require_name(el)?;
        let mut boiler = Boiler::default();
        boiler.nominal_thermal_efficiency = self.number_or(el, "ThrmlEff", boiler.nominal_thermal_efficiency);
        if let Some(fuel) = el.child_text("FuelSrc") {
            match FuelType::from_name(fuel) {
                Some(fuel) => boiler.fuel_type = fuel,
                None => self.warn(format!("Blr '{name}' has unknown FuelSrc '{fuel}'; using natural gas")),
            }
        }
        if let Some(load) = self.number(el, "ParasiticLd") {
            boiler.parasitic_electric_load = btuh_to_w(load);
        }
        boiler.design_water_outlet_temperature = self.number(el, "LvgTempDsgn").map(f_to_c);
        boiler.nominal_capacity = self.sized(el, "CapRtd", btuh_to_w);
        boiler.efficiency_curve = self.curve_ref(el, "HIR_fPLRCrvRef", |_| true);
        Ok(self.model.add_component(name, HvacComponent::BoilerHotWater(boiler)))
    }

    fn translate_chiller(&mut self, el: &Element) -> Result<Handle, BecError> {
        let name = require_name(el)?;
        let found = [
            self.curve_ref(el, "Cap_fTempCrvRef", is_biquadratic),
            self.curve_ref(el, "EIR_fTempCrvRef", is_biquadratic),
            self.curve_ref(el, "EIR_fPLRCrvRef", is_quadratic),
        ];
        let [capacity_curve, eir_curve, part_load_curve] = match found {
            [Some(a), Some(b), Some(c)] => [a, b, c],
            _ => {
                self.error(format!("Chlr '{name}' is missing performance curves; using default curves"));
                let (a, b, c) = templates::add_default_chiller_curves(self.model);
                self.fill_curves(found, [a, b, c])?
            }
        };

        let mut chiller = Chiller {
            cooling_capacity_f_temperature: Some(capacity_curve),
            eir_f_temperature: Some(eir_curve),
            eir_f_part_load_ratio: Some(part_load_curve),
            ..Chiller::default()
        };
        let cop = self.number(el, "COP");
        if let Some(cop) = cop {
            chiller.reference_cop = cop;
        }
        chiller.minimum_part_load_ratio = self.number_or(el, "PartLdRatMin", chiller.minimum_part_load_ratio);
        chiller.minimum_unloading_ratio = self.number_or(el, "UnldRatMin", chiller.minimum_unloading_ratio);
        let entering = self.number(el, "EntTempDsgn").map(f_to_c);
        let leaving = self.number(el, "LvgTempDsgn").map(f_to_c);
        if let Some(leaving) = leaving {
            chiller.reference_leaving_chilled_water_temperature = leaving;
        }

        let condenser = self.plant_for(el, "CndsrFluidSegInRef")?;

        if let Some(capacity) = self.sized(el, "CapRtd", btuh_to_w) {
            chiller.reference_capacity = Some(capacity);
            if let (Some(entering), Some(leaving)) = (entering, leaving) {
                if entering > leaving {
                    chiller.reference_chilled_water_flow_rate =
                        Some(capacity / (WATER_CP * WATER_DENSITY * (entering - leaving)));
                }
            }
            if let (Some(cop), Some(condenser)) = (cop, condenser) {
                let delta = self
                    .model
                    .plant_loop(condenser)?
                    .sizing
                    .loop_design_temperature_difference;
                if delta > 0.0 && cop > 0.0 {
                    chiller.reference_condenser_fluid_flow_rate =
                        Some(capacity * (1.0 + 1.0 / cop) / (WATER_CP * WATER_DENSITY * delta));
                }
            }
        }

        let handle = self
            .model
            .add_component(name, HvacComponent::ChillerElectricEir(chiller));
        if let Some(condenser) = condenser {
            self.model.add_demand_branch_for_component(condenser, handle)?;
        }
        Ok(handle)
    }

    fn translate_cooling_tower(&mut self, el: &Element) -> Result<Handle, BecError> {
        let name = require_name(el)?;
        if let Some(control) = el.child_text("ModCtrl") {
            if !control.eq_ignore_ascii_case("Cycling") {
                self.warn(format!("HtRej '{name}' ModCtrl '{control}' is modelled as a single speed tower"));
            }
        }
        let tower = CoolingTower {
            design_air_flow_rate: self.sized(el, "AirFlowCap", cfm_to_m3s),
            design_water_flow_rate: self.sized(el, "WtrFlowCap", gpm_to_m3s),
            fan_power_at_design_air_flow_rate: self.sized(el, "TotFanHP", hp_to_w),
            ..CoolingTower::default()
        };
        Ok(self
            .model
            .add_component(name, HvacComponent::CoolingTowerSingleSpeed(tower)))
    }

    // -----------------------------------------------------------------------
    // Air systems
    // -----------------------------------------------------------------------

    fn translate_air_system(&mut self, el: &Element) -> Result<Option<Handle>, BecError> {
        let system_type = el.child_text("Type").unwrap_or_default();
        if system_type.eq_ignore_ascii_case("Exhaust") {
            info!(name = ?el.child_text("Name"), "exhaust AirSys skipped");
            return Ok(None);
        }
        let name = require_name(el)?;
        let air_loop = self.model.add_air_loop(name)?;
        self.record(name, air_loop);
        self.created.push(air_loop);
        let loop_name = self.model.name(air_loop).unwrap_or(name).to_owned();

        let availability = self.schedule_ref(el, "AvailSchRef");
        let night_cycle = match el.child_text("NightCycleFanCtrl").map(str::to_ascii_lowercase).as_deref() {
            Some("cycleoncallanyzone") => NightCycleControl::CycleOnAny,
            Some("cycleoncallprimaryzone") => {
                self.warn(format!(
                    "AirSys '{loop_name}' cycles on its primary zone; cycling on any zone instead"
                ));
                NightCycleControl::CycleOnAny
            }
            Some("cyclezonefansonly") => NightCycleControl::CycleOnAnyZoneFansOnly,
            _ => NightCycleControl::StayOff,
        };
        let sizing = self.sizing_system(el);
        {
            let l = self.model.air_loop_mut(air_loop)?;
            l.availability_schedule = availability;
            l.night_cycle_control = night_cycle;
            l.sizing = sizing;
        }
        let draw_through = el
            .child_text("FanPos")
            .is_some_and(|p| p.eq_ignore_ascii_case("DrawThrough"));
        let supply_inlet = self.model.air_loop(air_loop)?.supply_inlet_node();

        for segment in el.children_named("AirSeg") {
            if segment.child_text("Type").is_some_and(|t| t.eq_ignore_ascii_case("Supply")) {
                let result = self.translate_supply_segment(air_loop, segment, draw_through);
                self.report(result);
            }
        }

        if let Some(controller) = el.first_child("OACtrl") {
            let result = self.translate_outdoor_air(controller, &loop_name, supply_inlet);
            self.report(result);
        }

        for segment in el.children_named("AirSeg") {
            let kind = segment.child_text("Type").unwrap_or_default().to_ascii_lowercase();
            let Some(fan_el) = segment.first_child("Fan") else {
                continue;
            };
            match kind.as_str() {
                "return" => {
                    let result = self
                        .translate_fan(fan_el)
                        .and_then(|fan| Ok(self.model.add_to_node(fan, supply_inlet)?));
                    self.report(result);
                }
                "relief" | "exhaust" => self.warn(format!(
                    "AirSys '{loop_name}' {kind} fan is not translated; fans are not allowed on the relief stream"
                )),
                _ => {}
            }
        }

        let deck = {
            let result = self.translate_cooling_control(el, air_loop, &loop_name, system_type);
            self.report(result).flatten()
        };
        let result = self.distribute_air_setpoints(air_loop, deck, draw_through);
        self.report(result);

        for terminal in el.descendants("TrmlUnit") {
            let result = self.translate_terminal(terminal, air_loop);
            self.report(result);
        }

        info!(%air_loop, name = %loop_name, draw_through, "air system translated");
        Ok(Some(air_loop))
    }

    fn sizing_system(&mut self, el: &Element) -> SizingSystem {
        SizingSystem {
            central_cooling_design_supply_air_temperature: self
                .number(el, "ClgDsgnSupAirTemp")
                .map(f_to_c)
                .unwrap_or(12.8),
            central_heating_design_supply_air_temperature: self
                .number(el, "HtgDsgnSupAirTemp")
                .map(f_to_c)
                .unwrap_or(40.0),
            minimum_system_air_flow_ratio: self.number_or(el, "DsgnAirFlowMin", 0.3),
            preheat_design_temperature: self.number(el, "DsgnPrehtTemp").map(f_to_c).unwrap_or(7.0),
            preheat_design_humidity_ratio: self.number_or(el, "DsgnPrehtHumidityRat", 0.008),
            precool_design_temperature: self.number(el, "DsgnPreclTemp").map(f_to_c).unwrap_or(12.8),
            precool_design_humidity_ratio: self.number_or(el, "DsgnPreclHumidityRat", 0.008),
            central_cooling_design_supply_air_humidity_ratio: self.number_or(el, "ClgDsgnHumidityRat", 0.008),
            central_heating_design_supply_air_humidity_ratio: self.number_or(el, "HtgDsgnHumidityRat", 0.008),
            all_outdoor_air_in_cooling: Self::flag(el, "ClgFullOutsdAir"),
            all_outdoor_air_in_heating: Self::flag(el, "HtgFullOutsdAir"),
            ..SizingSystem::default()
        }
    }

    /// Fan at the supply outlet, then coils in reverse document order, each
    /// one ahead of the last.
    fn translate_supply_segment(&mut self, air_loop: Handle, segment: &Element, draw_through: bool) -> Result<(), BecError> {
        let outlet = self.model.air_loop(air_loop)?.supply_outlet_node();
        let mut drop_node = outlet;

        if let Some(fan_el) = segment.first_child("Fan") {
            let fan = self.translate_fan(fan_el)?;
            self.model.add_to_node(fan, outlet)?;
            if draw_through {
                if let Some(inlet) = self.model.inlet_node_of(fan, INLET) {
                    drop_node = inlet;
                }
            }
            let flow = match self.model.component(fan)? {
                HvacComponent::FanConstantVolume(f) => f.maximum_flow_rate,
                HvacComponent::FanVariableVolume(v) => v.fan.maximum_flow_rate,
                _ => None,
            };
            if flow.is_some() {
                self.model.air_loop_mut(air_loop)?.design_supply_air_flow_rate = flow;
            }
        }

        for child in segment.children.iter().rev() {
            let coil = if child.is("CoilClg") {
                self.translate_cooling_coil(child, segment)
            } else if child.is("CoilHtg") {
                self.translate_heating_coil(child)
            } else {
                if child.is("EvapClr") || child.is("HtRcvry") || child.is("CoilHtRcvry") {
                    self.warn(format!("{} is not translated", describe(child)));
                }
                continue;
            };
            let Some(coil) = self.report(coil) else {
                continue;
            };
            self.model.add_to_node(coil.component, drop_node)?;
            if let Some(plant) = coil.plant {
                self.model.add_demand_branch_for_component(plant, coil.component)?;
            }
            if let Some(inlet) = self.model.inlet_node_of(coil.component, INLET) {
                drop_node = inlet;
            }
        }
        Ok(())
    }

    fn translate_outdoor_air(&mut self, el: &Element, loop_name: &str, supply_inlet: Handle) -> Result<Handle, BecError> {
        let minimum_fraction = self.schedule_ref(el, "MinOAFracSchRef");
        let maximum_fraction = match self.schedule_ref(el, "MaxOAFracSchRef") {
            Some(schedule) => Some(schedule),
            None => self.number(el, "MaxOARat").map(|ratio| {
                self.model.add_schedule(
                    &format!("{loop_name} Max OA Fraction"),
                    Schedule::constant(ScheduleType::Fraction, ratio.clamp(0.0, 1.0)),
                )
            }),
        };
        let minimum_schedule = match el.child_text("OASchMthd").map(str::to_ascii_lowercase).as_deref() {
            Some("constant") => Some(self.model.always_on_schedule()),
            Some("scheduled") => self.schedule_ref(el, "OASchRef"),
            _ => None,
        };
        let economizer = match el.child_text("EconoCtrlMthd").map(str::to_ascii_lowercase).as_deref() {
            None | Some("noeconomizer") => EconomizerControlType::NoEconomizer,
            Some("fixeddrybulb") => EconomizerControlType::FixedDryBulb,
            Some("fixedenthalpy") => EconomizerControlType::FixedEnthalpy,
            Some("differentialdrybulb") => EconomizerControlType::DifferentialDryBulb,
            Some("differentialenthalpy") | Some("differentialdrybulbandenthalpy") => {
                EconomizerControlType::DifferentialEnthalpy
            }
            Some(other) => {
                self.warn(format!("OACtrl on '{loop_name}' has unsupported EconoCtrlMthd '{other}'; no economizer"));
                EconomizerControlType::NoEconomizer
            }
        };
        let lockout = match el.child_text("EconoIntegration").map(str::to_ascii_lowercase).as_deref() {
            Some("nonintegrated") => "LockoutWithCompressor",
            _ => "NoLockout",
        };

        let controller = ControllerOutdoorAir {
            economizer_control_type: economizer,
            economizer_maximum_limit_dry_bulb_temperature: self.number(el, "EconoHiTempLockout").map(f_to_c),
            economizer_minimum_limit_dry_bulb_temperature: self.number(el, "EconoLowTempLockout").map(f_to_c),
            lockout_type: lockout.to_owned(),
            minimum_outdoor_air_schedule: minimum_schedule,
            minimum_fraction_of_outdoor_air_schedule: minimum_fraction,
            maximum_fraction_of_outdoor_air_schedule: maximum_fraction,
            ..ControllerOutdoorAir::default()
        };
        let oa = self
            .model
            .add_outdoor_air_system(&format!("{loop_name} OA System"), controller)?;
        self.model.add_to_node(oa, supply_inlet)?;
        Ok(oa)
    }

    /// Deck temperature manager on the supply outlet from `ClgCtrl`.
    fn translate_cooling_control(
        &mut self,
        el: &Element,
        air_loop: Handle,
        loop_name: &str,
        system_type: &str,
    ) -> Result<Option<Handle>, BecError> {
        let Some(method) = el.child_text("ClgCtrl") else {
            return Ok(None);
        };
        let (outlet, sizing) = {
            let l = self.model.air_loop(air_loop)?;
            (l.supply_outlet_node(), l.sizing.clone())
        };

        let spm = match method.to_ascii_lowercase().as_str() {
            "fixed" => {
                let temperature = match self.number(el, "ClgFixedSupTemp") {
                    Some(t) => f_to_c(t),
                    None => {
                        self.warn(format!(
                            "AirSys '{loop_name}' has no ClgFixedSupTemp; using {DEFAULT_DECK_SETPOINT} C"
                        ));
                        DEFAULT_DECK_SETPOINT
                    }
                };
                let schedule = self.temperature_schedule(&format!("{loop_name} Supply Air Temp"), temperature);
                SetpointManager::scheduled(schedule)
            }
            "nosatcontrol" => {
                let mut spm = SetpointManager::single_zone_reheat();
                let variable_volume = ["SZVAVAC", "SZVAVHP"]
                    .iter()
                    .any(|t| system_type.eq_ignore_ascii_case(t));
                spm.edit_kind(|kind| {
                    if let SpmKind::SingleZoneReheat {
                        minimum_supply_air_temperature,
                        maximum_supply_air_temperature,
                        ..
                    } = kind
                    {
                        if variable_volume {
                            *minimum_supply_air_temperature = sizing.central_cooling_design_supply_air_temperature;
                            *maximum_supply_air_temperature = sizing.central_heating_design_supply_air_temperature;
                        }
                    }
                })?;
                spm
            }
            m @ ("warmestresetflowfirst" | "warmestresettemperaturefirst") => {
                let low = self.number(el, "ClRstSupLow").map(f_to_c);
                let high = self.number(el, "ClRstSupHi").map(f_to_c);
                let mut spm = SetpointManager::warmest_temperature_flow();
                spm.edit_kind(|kind| {
                    if let SpmKind::WarmestTemperatureFlow {
                        minimum_setpoint_temperature,
                        maximum_setpoint_temperature,
                        strategy,
                        minimum_turndown_ratio,
                    } = kind
                    {
                        if let Some(low) = low {
                            *minimum_setpoint_temperature = low;
                        }
                        if let Some(high) = high {
                            *maximum_setpoint_temperature = high;
                        }
                        *strategy = if m == "warmestresetflowfirst" {
                            WarmestStrategy::FlowFirst
                        } else {
                            WarmestStrategy::TemperatureFirst
                        };
                        *minimum_turndown_ratio = sizing.minimum_system_air_flow_ratio;
                    }
                })?;
                spm
            }
            "warmestreset" => {
                let low = self.number(el, "ClRstSupLow").map(f_to_c);
                let high = self.number(el, "ClRstSupHi").map(f_to_c);
                let mut spm = SetpointManager::warmest();
                spm.edit_kind(|kind| {
                    if let SpmKind::Warmest { minimum_setpoint_temperature, maximum_setpoint_temperature } = kind {
                        if let Some(low) = low {
                            *minimum_setpoint_temperature = low;
                        }
                        if let Some(high) = high {
                            *maximum_setpoint_temperature = high;
                        }
                    }
                })?;
                spm
            }
            "scheduled" => {
                let schedule = match self.schedule_ref(el, "ClgSetptSchRef") {
                    Some(schedule) => schedule,
                    None => {
                        self.error(format!(
                            "AirSys '{loop_name}' has no usable ClgSetptSchRef; using {DEFAULT_DECK_SETPOINT} C"
                        ));
                        self.temperature_schedule(&format!("{loop_name} Supply Air Temp"), DEFAULT_DECK_SETPOINT)
                    }
                };
                SetpointManager::scheduled(schedule)
            }
            "outsideairreset" => {
                let reset = self.outdoor_air_reset(el, "ClRst");
                SetpointManager::new(SpmKind::OutdoorAirReset(reset))
            }
            _ => {
                self.error(format!("AirSys '{loop_name}' has unsupported ClgCtrl '{method}'"));
                return Ok(None);
            }
        };
        let handle = self.attach_manager(&format!("{loop_name} Deck SPM"), spm, outlet)?;
        Ok(Some(handle))
    }

    /// Setpoints for the nodes between the supply inlet and outlet. A draw
    /// through fan gets mixed air managers everywhere; otherwise the mixed
    /// air node gets one and the nodes after it copy the deck manager.
    fn distribute_air_setpoints(&mut self, air_loop: Handle, deck: Option<Handle>, draw_through: bool) -> Result<(), BecError> {
        let supply = self.model.supply_components(air_loop)?;
        let nodes: Vec<Handle> = supply
            .into_iter()
            .filter(|h| self.model.object(*h).is_some_and(|o| o.is_node()))
            .collect();
        let interior: &[Handle] = if nodes.len() > 2 { &nodes[1..nodes.len() - 1] } else { &[] };

        if draw_through {
            for node in interior {
                let name = format!("{} Mixed Air SPM", self.model.name(*node).unwrap_or_default());
                self.attach_manager(&name, SetpointManager::mixed_air(), *node)?;
            }
            return Ok(());
        }

        let Some(deck) = deck else {
            return Ok(());
        };
        let mixed = self
            .model
            .air_loop_outdoor_air_system(air_loop)
            .and_then(|oa| self.model.outlet_node_of(oa, MIXED_AIR));
        let mut start = 0;
        if let Some(mixed) = mixed {
            let name = format!("{} Mixed Air SPM", self.model.name(mixed).unwrap_or_default());
            self.attach_manager(&name, SetpointManager::mixed_air(), mixed)?;
            start = interior.iter().position(|n| *n == mixed).map_or(0, |i| i + 1);
        }
        for node in &interior[start..] {
            let copy = self.model.clone_object(deck)?;
            self.model.add_setpoint_manager_to_node(copy, *node)?;
        }
        Ok(())
    }

    fn translate_terminal(&mut self, el: &Element, air_loop: Handle) -> Result<Option<Handle>, BecError> {
        let name = require_name(el)?;
        let zone = el
            .child_text("ZnServedRef")
            .and_then(|z| self.find(z, |k| matches!(k, ObjectKind::ThermalZone(_))));
        let Some(zone) = zone else {
            self.warn(format!("TrmlUnit '{name}' does not serve a known zone; it is not translated"));
            return Ok(None);
        };
        if self.model.zone_air_loop(zone).is_some() {
            self.warn(format!("TrmlUnit '{name}' serves a zone that already has an air loop"));
            return Ok(None);
        }

        let availability = self.schedule_ref(el, "AvailSchRef");
        let maximum = self.sized(el, "PriAirFlowMaxSim", cfm_to_m3s);
        let minimum = self.number(el, "PriAirFlowMinSim").map(cfm_to_m3s);
        let fraction = |default: f64| match (minimum, maximum) {
            (Some(min), Some(max)) if max > 0.0 => (min / max).clamp(0.0, 1.0),
            _ => default,
        };

        let kind = el.child_text("Type").unwrap_or_default();
        let component = match kind.to_ascii_lowercase().as_str() {
            "uncontrolled" => HvacComponent::AirTerminalUncontrolled(AirTerminalUncontrolled {
                availability_schedule: availability,
                maximum_air_flow_rate: maximum,
            }),
            "vavnoreheatbox" => HvacComponent::AirTerminalVavNoReheat(AirTerminalVav {
                availability_schedule: availability,
                maximum_air_flow_rate: maximum,
                constant_minimum_air_flow_fraction: fraction(0.5),
                reheat_coil: None,
            }),
            other => {
                if other != "vavreheatbox" {
                    self.error(format!("TrmlUnit '{name}' has unsupported Type '{kind}'; using a VAV reheat box"));
                }
                let coil = match el.first_child("CoilHtg") {
                    Some(coil_el) => {
                        let coil = self.translate_heating_coil(coil_el)?;
                        if let Some(plant) = coil.plant {
                            self.model.add_demand_branch_for_component(plant, coil.component)?;
                        }
                        coil.component
                    }
                    None => self.model.add_component(
                        &format!("{name} Reheat Coil"),
                        HvacComponent::CoilHeatingElectric(CoilHeatingElectric::default()),
                    ),
                };
                HvacComponent::AirTerminalVavReheat(AirTerminalVav {
                    availability_schedule: availability,
                    maximum_air_flow_rate: maximum,
                    constant_minimum_air_flow_fraction: fraction(0.2),
                    reheat_coil: Some(coil),
                })
            }
        };
        let terminal = self.model.add_component(name, component);
        self.model.add_branch_for_zone(air_loop, zone, Some(terminal))?;
        Ok(Some(terminal))
    }

    // -----------------------------------------------------------------------
    // Air-side components
    // -----------------------------------------------------------------------

    fn translate_fan(&mut self, el: &Element) -> Result<Handle, BecError> {
        let name = require_name(el)?;
        let method = el.child_text("CtrlMthd").unwrap_or("ConstantVolume");
        let variable = match method.to_ascii_lowercase().as_str() {
            "constantvolume" | "twospeed" => false,
            "variablespeeddrive" => true,
            _ => {
                self.error(format!("Fan '{name}' has unsupported CtrlMthd '{method}'; using a constant volume fan"));
                false
            }
        };

        let mut fan = if variable { FanVariableVolume::default().fan } else { Fan::constant_volume() };
        fan.fan_efficiency = self.number_or(el, "TotEff", fan.fan_efficiency);
        fan.motor_efficiency = self.number_or(el, "MtrEff", fan.motor_efficiency);
        if let Some(pressure) = self.number(el, "TotStaticPress") {
            fan.pressure_rise = in_h2o_to_pa(pressure);
        }
        if let Some(position) = el.child_text("MtrPos") {
            fan.motor_in_airstream_fraction = if position.eq_ignore_ascii_case("InAirStream") { 1.0 } else { 0.0 };
        }
        fan.maximum_flow_rate = self.sized(el, "FlowCapSim", cfm_to_m3s);

        let component = if variable {
            let mut vav = FanVariableVolume { fan, ..FanVariableVolume::default() };
            let minimum = self.number(el, "FlowMinSim").map(cfm_to_m3s);
            if let (Some(min), Some(max)) = (minimum, vav.fan.maximum_flow_rate) {
                if max > 0.0 {
                    vav.minimum_flow_fraction = (min / max).clamp(0.0, 1.0);
                }
            }
            if let Some(curve) = self.curve_ref(el, "Pwr_fPLRCrvRef", |c| matches!(c, Curve::Cubic { .. })) {
                if let Ok(Curve::Cubic { coefficients: c, .. }) = self.model.curve(curve) {
                    vav.power_coefficients = [c[0], c[1], c[2], c[3], 0.0];
                }
            }
            HvacComponent::FanVariableVolume(vav)
        } else {
            HvacComponent::FanConstantVolume(fan)
        };
        Ok(self.model.add_component(name, component))
    }

    fn translate_cooling_coil(&mut self, el: &Element, segment: &Element) -> Result<Coil, BecError> {
        let name = require_name(el)?;
        let kind = el.child_text("Type").unwrap_or_default();
        if kind.eq_ignore_ascii_case("ChilledWater") {
            let plant = self.plant_for(el, "FluidSegInRef")?;
            if plant.is_none() {
                self.warn(format!("CoilClg '{name}' is not connected to a fluid system"));
            }
            let mut coil = CoilCoolingWater::default();
            if !self.autosize {
                coil.design_water_flow_rate = self.number(el, "FluidFlowRtDsgnSim").map(gpm_to_m3s);
                coil.design_inlet_water_temperature = Some(match plant {
                    Some(plant) => self.model.plant_loop(plant)?.sizing.design_loop_exit_temperature,
                    None => 7.22,
                });
                coil.design_air_flow_rate = segment
                    .first_child("Fan")
                    .and_then(|fan| self.number(fan, "FlowCapSim"))
                    .map(cfm_to_m3s);
            }
            let component = self.model.add_component(name, HvacComponent::CoilCoolingWater(coil));
            return Ok(Coil { component, plant });
        }

        if !kind.eq_ignore_ascii_case("DirectExpansion") {
            self.error(format!("CoilClg '{name}' has unsupported Type '{kind}'; using a DX coil"));
        }
        if self.number(el, "NumClgStages").is_some_and(|stages| stages > 1.0) {
            self.warn(format!("CoilClg '{name}' has several stages; only one is modelled"));
        }
        let mut coil = CoilCoolingDx::default();
        let total = self.sized(el, "CapTotGrossRtdSim", btuh_to_w);
        let sensible = self.sized(el, "CapSensGrossRtdSim", btuh_to_w);
        coil.rated_total_cooling_capacity = total;
        if let (Some(total), Some(sensible)) = (total, sensible) {
            if total > 0.0 {
                coil.rated_sensible_heat_ratio = Some((sensible / total).clamp(0.0, 1.0));
            }
        }
        if let Some(eir) = self.number(el, "DXEIR") {
            if eir > 0.0 {
                coil.rated_cop = 1.0 / eir;
            }
        }
        let found = [
            self.curve_ref(el, "Cap_fTempCrvRef", is_biquadratic),
            self.curve_ref(el, "DXEIR_fTempCrvRef", is_biquadratic),
        ];
        let [capacity_curve, eir_curve] = match found {
            [Some(a), Some(b)] => [a, b],
            _ => {
                self.warn(format!("CoilClg '{name}' is missing performance curves; using default curves"));
                let (a, b) = templates::add_default_dx_curves(self.model);
                self.fill_curves(found, [a, b])?
            }
        };
        coil.total_cooling_capacity_curve = Some(capacity_curve);
        coil.energy_input_ratio_curve = Some(eir_curve);
        let component = self
            .model
            .add_component(name, HvacComponent::CoilCoolingDxSingleSpeed(coil));
        Ok(Coil { component, plant: None })
    }

    fn translate_heating_coil(&mut self, el: &Element) -> Result<Coil, BecError> {
        let name = require_name(el)?;
        let kind = el.child_text("Type").unwrap_or_default();
        let capacity = self.sized(el, "CapTotGrossRtdSim", btuh_to_w);

        match kind.to_ascii_lowercase().as_str() {
            "furnace" => {
                let mut coil = CoilHeatingFuel { nominal_capacity: capacity, ..CoilHeatingFuel::default() };
                coil.burner_efficiency = self.number_or(el, "FurnThrmlEff", coil.burner_efficiency);
                if let Some(pilot) = self.number(el, "FurnPilotFuelInp") {
                    coil.parasitic_electric_load = btuh_to_w(pilot);
                }
                if let Some(fuel) = el.child_text("FuelSrc") {
                    match FuelType::from_name(fuel) {
                        Some(fuel) => coil.fuel_type = fuel,
                        None => self.warn(format!("CoilHtg '{name}' has unknown FuelSrc '{fuel}'; using natural gas")),
                    }
                }
                let component = self.model.add_component(name, HvacComponent::CoilHeatingGas(coil));
                Ok(Coil { component, plant: None })
            }
            "hotwater" => {
                let plant = self.plant_for(el, "FluidSegInRef")?;
                if plant.is_none() {
                    self.warn(format!("CoilHtg '{name}' is not connected to a fluid system"));
                }
                let coil = CoilHeatingWater {
                    rated_capacity: capacity,
                    maximum_water_flow_rate: self.sized(el, "FluidFlowRtDsgnSim", gpm_to_m3s),
                    ..CoilHeatingWater::default()
                };
                let component = self.model.add_component(name, HvacComponent::CoilHeatingWater(coil));
                Ok(Coil { component, plant })
            }
            other => {
                if other != "resistance" {
                    self.error(format!("CoilHtg '{name}' has unsupported Type '{kind}'; using an electric coil"));
                }
                let coil = CoilHeatingElectric { nominal_capacity: capacity, ..CoilHeatingElectric::default() };
                let component = self
                    .model
                    .add_component(name, HvacComponent::CoilHeatingElectric(coil));
                Ok(Coil { component, plant: None })
            }
        }
    }
}

fn require_name(el: &Element) -> Result<&str, BecError> {
    el.child_text("Name").ok_or_else(|| BecError::MissingElement {
        element: el.name.clone(),
        child: "Name".into(),
    })
}

/// `<Tag> 'Name'` for messages.
fn describe(el: &Element) -> String {
    format!("{} '{}'", el.name, el.child_text("Name").unwrap_or_default())
}

fn is_biquadratic(curve: &Curve) -> bool {
    matches!(curve, Curve::Biquadratic { .. })
}

fn is_quadratic(curve: &Curve) -> bool {
    matches!(curve, Curve::Quadratic { .. })
}

// ============================================================
// Unit tests
// ============================================================
#[cfg(test)]
mod tests {
    use super::*;
    use model::ControlVariable;

    fn translate(xml: &str) -> (Model, ReverseTranslator) {
        let doc = Element::parse(xml).unwrap();
        let mut translator = ReverseTranslator::new(ReverseTranslatorOptions::default());
        let model = translator.translate(&doc);
        (model, translator)
    }

    fn names(model: &Model, path: &[Handle]) -> Vec<String> {
        path.iter()
            .filter(|h| !model.object(**h).unwrap().is_node())
            .map(|h| model.name(*h).unwrap().to_owned())
            .collect()
    }

    fn handle(model: &Model, name: &str) -> Handle {
        model.object_by_name(name).unwrap().handle()
    }

    #[test]
    fn hot_water_system_gets_boiler_pump_and_fixed_setpoint() {
        let (model, translator) = translate(
            "<SDDXML><FluidSys>
               <Name>HW</Name><Type>HotWater</Type><TempCtrl>Fixed</TempCtrl>
               <FixedSupTemp>180</FixedSupTemp><DsgnSupWtrTemp>180</DsgnSupWtrTemp><DsgnSupWtrDelT>20</DsgnSupWtrDelT>
               <Blr><Name>Boiler</Name><FuelSrc>Gas</FuelSrc><ThrmlEff>0.85</ThrmlEff><CapRtd>1000000</CapRtd>
                 <Pump><Name>Boiler Pump</Name><SpdCtrl>ConstantSpeed</SpdCtrl><FlowCap>100</FlowCap><Pwr>1.5</Pwr></Pump>
               </Blr>
             </FluidSys></SDDXML>",
        );
        assert!(translator.errors().is_empty(), "{:?}", translator.errors());
        let plant = handle(&model, "HW");
        let sizing = &model.plant_loop(plant).unwrap().sizing;
        assert_eq!(sizing.loop_type, PlantLoopType::Heating);
        assert!((sizing.design_loop_exit_temperature - 82.222).abs() < 1e-3);
        assert!((sizing.loop_design_temperature_difference - 11.111).abs() < 1e-3);

        let runs = model.branches(plant, PathSide::PlantSupply).unwrap();
        assert_eq!(runs.len(), 3);
        assert_eq!(names(&model, &runs[1]), vec!["Boiler Pump", "Boiler"]);
        let HvacComponent::BoilerHotWater(boiler) = model.component(handle(&model, "Boiler")).unwrap() else {
            panic!("expected a boiler");
        };
        assert_eq!(boiler.nominal_thermal_efficiency, 0.85);
        assert!((boiler.nominal_capacity.unwrap() - 293_071.07).abs() < 0.1);

        // No pump ahead of the splitter, so the branch pump sets the loop flow.
        let flow = model.plant_loop(plant).unwrap().maximum_loop_flow_rate.unwrap();
        assert!((flow - gpm_to_m3s(100.0)).abs() < 1e-9);

        let outlet = model.plant_loop(plant).unwrap().supply_outlet_node();
        let spm = model.setpoint_managers(outlet)[0];
        let SpmKind::Scheduled { schedule: Some(schedule) } = model.setpoint_manager(spm).unwrap().kind() else {
            panic!("expected a scheduled manager");
        };
        assert!((model.schedule(*schedule).unwrap().value - 82.222).abs() < 1e-3);
    }

    #[test]
    fn duplicate_fluid_system_name_reuses_the_loop() {
        let (model, _) = translate(
            "<SDDXML>
               <FluidSys><Name>CHW</Name><Type>ChilledWater</Type></FluidSys>
               <FluidSys><Name>chw</Name><Type>ChilledWater</Type></FluidSys>
             </SDDXML>",
        );
        assert_eq!(model.plant_loops().len(), 1);
    }

    #[test]
    fn secondary_pump_goes_on_the_demand_inlet() {
        let (model, _) = translate(
            "<SDDXML><FluidSys><Name>CHW</Name><Type>ChilledWater</Type>
               <FluidSeg><Name>CHW Secondary</Name><Type>SecondarySupply</Type>
                 <Pump><Name>Secondary Pump</Name><SpdCtrl>VariableSpeed</SpdCtrl></Pump>
               </FluidSeg>
             </FluidSys></SDDXML>",
        );
        let plant = handle(&model, "CHW");
        let demand = model.demand_components(plant).unwrap();
        assert_eq!(names(&model, &demand)[0], "Secondary Pump");
        assert_eq!(
            model.plant_loop(plant).unwrap().common_pipe_simulation,
            CommonPipeSimulation::CommonPipe
        );
    }

    #[test]
    fn chiller_condenser_joins_a_later_fluid_system() {
        let (model, translator) = translate(
            "<SDDXML>
               <FluidSys><Name>CHW</Name><Type>ChilledWater</Type><TempCtrl>Fixed</TempCtrl><FixedSupTemp>44</FixedSupTemp>
                 <Chlr><Name>Chiller</Name><COP>6</COP><CndsrFluidSegInRef>CW Supply</CndsrFluidSegInRef></Chlr>
               </FluidSys>
               <FluidSys><Name>CW</Name><Type>CondenserWater</Type><TempCtrl>WetBulbReset</TempCtrl>
                 <FluidSeg><Name>CW Supply</Name><Type>PrimarySupply</Type></FluidSeg>
                 <HtRej><Name>Tower</Name></HtRej>
               </FluidSys>
             </SDDXML>",
        );
        assert_eq!(model.plant_loops().len(), 2);
        let chiller = handle(&model, "Chiller");
        let condenser = handle(&model, "CW");
        assert!(model.path_memberships(chiller).contains(&(PathSide::PlantDemand, condenser)));
        assert!(model.path_memberships(chiller).contains(&(PathSide::PlantSupply, handle(&model, "CHW"))));

        // Curves were missing: defaults fill in and the error is recorded.
        assert!(translator.errors().iter().any(|e| e.contains("Chiller")));
        let HvacComponent::ChillerElectricEir(c) = model.component(chiller).unwrap() else {
            panic!("expected a chiller");
        };
        assert_eq!(c.reference_cop, 6.0);
        assert!(c.eir_f_part_load_ratio.is_some());
    }

    const AIR_SYSTEM: &str = "<SDDXML>
      <ThrmlZn><Name>Office</Name><Mult>2</Mult></ThrmlZn>
      <AirSys>
        <Name>RTU</Name><Type>SZAC</Type><FanPos>BlowThrough</FanPos>
        <ClgCtrl>Fixed</ClgCtrl><ClgFixedSupTemp>55</ClgFixedSupTemp>
        <NightCycleFanCtrl>CycleOnCallAnyZone</NightCycleFanCtrl>
        <AirSeg><Name>Supply</Name><Type>Supply</Type>
          <Fan><Name>Supply Fan</Name><CtrlMthd>ConstantVolume</CtrlMthd><FlowCapSim>2000</FlowCapSim>
               <TotEff>0.6</TotEff><TotStaticPress>2</TotStaticPress><MtrPos>InAirStream</MtrPos></Fan>
          <CoilClg><Name>DX</Name><Type>DirectExpansion</Type><DXEIR>0.25</DXEIR></CoilClg>
          <CoilHtg><Name>Furnace</Name><Type>Furnace</Type><FurnThrmlEff>0.78</FurnThrmlEff></CoilHtg>
        </AirSeg>
        <OACtrl><Name>OA</Name><EconoCtrlMthd>DifferentialDryBulb</EconoCtrlMthd>
          <EconoIntegration>NonIntegrated</EconoIntegration><EconoHiTempLockout>75</EconoHiTempLockout></OACtrl>
        <TrmlUnit><Name>Office Box</Name><Type>Uncontrolled</Type><ZnServedRef>Office</ZnServedRef></TrmlUnit>
      </AirSys>
    </SDDXML>";

    #[test]
    fn air_system_orders_blow_through_supply_components() {
        let (model, translator) = translate(AIR_SYSTEM);
        let air_loop = handle(&model, "RTU");
        let supply = model.supply_components(air_loop).unwrap();
        assert_eq!(names(&model, &supply), vec!["RTU OA System", "Supply Fan", "DX", "Furnace"]);
        // Only the DX coil curves fell back to defaults.
        assert!(translator.errors().is_empty(), "{:?}", translator.errors());
        assert!(translator.warnings().iter().any(|w| w.contains("DX")));

        let l = model.air_loop(air_loop).unwrap();
        assert_eq!(l.night_cycle_control, NightCycleControl::CycleOnAny);
        assert!((l.design_supply_air_flow_rate.unwrap() - cfm_to_m3s(2000.0)).abs() < 1e-9);

        let HvacComponent::CoilCoolingDxSingleSpeed(dx) = model.component(handle(&model, "DX")).unwrap() else {
            panic!("expected a DX coil");
        };
        assert_eq!(dx.rated_cop, 4.0);

        let oa = model.air_loop_outdoor_air_system(air_loop).unwrap();
        let controller = &model.outdoor_air_system(oa).unwrap().controller;
        assert_eq!(controller.economizer_control_type, EconomizerControlType::DifferentialDryBulb);
        assert_eq!(controller.lockout_type, "LockoutWithCompressor");
        assert!((controller.economizer_maximum_limit_dry_bulb_temperature.unwrap() - 23.889).abs() < 1e-3);
    }

    #[test]
    fn blow_through_copies_the_deck_manager_downstream_of_the_mixed_air_node() {
        let (model, _) = translate(AIR_SYSTEM);
        let air_loop = handle(&model, "RTU");
        let outlet = model.air_loop(air_loop).unwrap().supply_outlet_node();
        let deck = model.setpoint_manager_for(outlet, ControlVariable::Temperature).unwrap();
        assert_eq!(model.name(deck), Some("RTU Deck SPM"));

        let oa = model.air_loop_outdoor_air_system(air_loop).unwrap();
        let mixed = model.outlet_node_of(oa, MIXED_AIR).unwrap();
        let mixed_spm = model.setpoint_managers(mixed)[0];
        assert!(matches!(model.setpoint_manager(mixed_spm).unwrap().kind(), SpmKind::MixedAir { .. }));

        let fan = handle(&model, "Supply Fan");
        let fan_outlet = model.outlet_node_of(fan, OUTLET).unwrap();
        let copy = model.setpoint_managers(fan_outlet)[0];
        assert!(matches!(model.setpoint_manager(copy).unwrap().kind(), SpmKind::Scheduled { .. }));
    }

    #[test]
    fn terminal_attaches_its_zone() {
        let (model, _) = translate(AIR_SYSTEM);
        let zone = handle(&model, "Office");
        assert_eq!(model.thermal_zone(zone).unwrap().multiplier, 2);
        assert_eq!(model.zone_air_loop(zone), Some(handle(&model, "RTU")));
        assert_eq!(model.zone_terminal(zone), Some(handle(&model, "Office Box")));
    }

    #[test]
    fn draw_through_puts_coils_ahead_of_the_fan() {
        let (model, _) = translate(
            "<SDDXML><AirSys><Name>AHU</Name><FanPos>DrawThrough</FanPos>
               <AirSeg><Type>Supply</Type>
                 <Fan><Name>Fan</Name><CtrlMthd>VariableSpeedDrive</CtrlMthd></Fan>
                 <CoilClg><Name>Cooling</Name><Type>DirectExpansion</Type></CoilClg>
                 <CoilHtg><Name>Heating</Name><Type>Resistance</Type></CoilHtg>
               </AirSeg>
             </AirSys></SDDXML>",
        );
        let air_loop = handle(&model, "AHU");
        let supply = model.supply_components(air_loop).unwrap();
        assert_eq!(names(&model, &supply), vec!["Cooling", "Heating", "Fan"]);

        let fan_inlet = model.inlet_node_of(handle(&model, "Fan"), INLET).unwrap();
        let spm = model.setpoint_managers(fan_inlet)[0];
        assert!(matches!(model.setpoint_manager(spm).unwrap().kind(), SpmKind::MixedAir { .. }));
    }

    #[test]
    fn exhaust_systems_are_skipped() {
        let (model, translator) =
            translate("<SDDXML><AirSys><Name>EF</Name><Type>Exhaust</Type></AirSys></SDDXML>");
        assert!(model.air_loops().is_empty());
        assert!(translator.errors().is_empty());
    }

    #[test]
    fn outside_air_reset_orders_its_reset_points() {
        let (model, _) = translate(
            "<SDDXML><AirSys><Name>AHU</Name><ClgCtrl>OutsideAirReset</ClgCtrl>
               <ClRstSupHi>60</ClRstSupHi><ClRstSupLow>55</ClRstSupLow>
               <ClRstOutdrHi>50</ClRstOutdrHi><ClRstOutdrLow>80</ClRstOutdrLow>
             </AirSys></SDDXML>",
        );
        let outlet = model.air_loop(handle(&model, "AHU")).unwrap().supply_outlet_node();
        let spm = model.setpoint_managers(outlet)[0];
        let SpmKind::OutdoorAirReset(reset) = model.setpoint_manager(spm).unwrap().kind() else {
            panic!("expected an outdoor air reset manager");
        };
        assert!((reset.outdoor_high_temperature - f_to_c(80.0)).abs() < 1e-9);
        assert!((reset.setpoint_at_outdoor_high_temperature - f_to_c(55.0)).abs() < 1e-9);
        assert!((reset.outdoor_low_temperature - f_to_c(50.0)).abs() < 1e-9);
        assert!((reset.setpoint_at_outdoor_low_temperature - f_to_c(60.0)).abs() < 1e-9);
    }

    #[test]
    fn incomplete_reset_and_bad_numbers_fall_back_with_warnings() {
        let (model, translator) = translate(
            "<SDDXML><AirSys><Name>AHU</Name><ClgCtrl>OutsideAirReset</ClgCtrl><ClRstSupHi>abc</ClRstSupHi></AirSys></SDDXML>",
        );
        let outlet = model.air_loop(handle(&model, "AHU")).unwrap().supply_outlet_node();
        let spm = model.setpoint_managers(outlet)[0];
        assert_eq!(
            model.setpoint_manager(spm).unwrap().kind(),
            &SpmKind::OutdoorAirReset(OutdoorAirReset::default())
        );
        assert!(translator.warnings().iter().any(|w| w.contains("'abc' is not a number")));
        assert!(translator.warnings().iter().any(|w| w.contains("reset temperatures")));
    }

    #[test]
    fn unknown_terminal_type_degrades_to_vav_reheat() {
        let (model, translator) = translate(
            "<SDDXML><ThrmlZn><Name>Z</Name></ThrmlZn>
               <AirSys><Name>AHU</Name>
                 <TrmlUnit><Name>Box</Name><Type>SeriesFanBox</Type><ZnServedRef>Z</ZnServedRef></TrmlUnit>
               </AirSys></SDDXML>",
        );
        assert!(translator.errors().iter().any(|e| e.contains("SeriesFanBox")));
        let terminal = handle(&model, "Box");
        let HvacComponent::AirTerminalVavReheat(vav) = model.component(terminal).unwrap() else {
            panic!("expected a VAV reheat terminal");
        };
        let coil = vav.reheat_coil.unwrap();
        assert!(matches!(model.component(coil).unwrap(), HvacComponent::CoilHeatingElectric(_)));
        assert_eq!(vav.constant_minimum_air_flow_fraction, 0.2);
    }

    #[test]
    fn zone_naming_a_system_without_terminal_gets_a_direct_branch() {
        let (model, _) = translate(
            "<SDDXML><ThrmlZn><Name>Z</Name><PriAirCondgSysRef>AHU</PriAirCondgSysRef></ThrmlZn>
               <AirSys><Name>AHU</Name></AirSys></SDDXML>",
        );
        let zone = handle(&model, "Z");
        assert_eq!(model.zone_air_loop(zone), Some(handle(&model, "AHU")));
        assert_eq!(model.zone_terminal(zone), None);
    }

    #[test]
    fn baseboard_zone_systems_join_their_zones() {
        let (model, translator) = translate(
            "<SDDXML>
               <ThrmlZn><Name>Office</Name><PriAirCondgSysRef>Perimeter Heat</PriAirCondgSysRef></ThrmlZn>
               <ThrmlZn><Name>Lobby</Name><PriAirCondgSysRef>Perimeter Heat</PriAirCondgSysRef></ThrmlZn>
               <ThrmlZn><Name>Closet</Name><PriAirCondgSysRef>Trim Heat</PriAirCondgSysRef></ThrmlZn>
               <FluidSys><Name>HW</Name><Type>HotWater</Type><TempCtrl>Fixed</TempCtrl><FixedSupTemp>180</FixedSupTemp>
                 <FluidSeg><Name>HW Supply</Name><Type>PrimarySupply</Type></FluidSeg>
               </FluidSys>
               <ZnSys><Name>Perimeter Heat</Name><Type>Baseboard</Type>
                 <CoilHtg><Name>Perimeter Coil</Name><Type>HotWater</Type>
                   <FluidSegInRef>HW Supply</FluidSegInRef><FluidFlowRtDsgnSim>2</FluidFlowRtDsgnSim></CoilHtg>
               </ZnSys>
               <ZnSys><Name>Trim Heat</Name><Type>Baseboard</Type>
                 <CoilHtg><Name>Trim Coil</Name><Type>Resistance</Type><CapTotGrossRtdSim>3412.14</CapTotGrossRtdSim></CoilHtg>
               </ZnSys>
             </SDDXML>",
        );
        assert!(translator.errors().is_empty(), "{:?}", translator.errors());

        let office = model.zone_equipment(handle(&model, "Office"));
        let lobby = model.zone_equipment(handle(&model, "Lobby"));
        assert_eq!(names(&model, &office), vec!["Perimeter Heat"]);
        assert_eq!(names(&model, &lobby), vec!["Perimeter Heat 1"]);

        let plant = handle(&model, "HW");
        let demand = model.demand_components(plant).unwrap();
        assert!(demand.contains(&office[0]) && demand.contains(&lobby[0]));
        let HvacComponent::BaseboardConvectiveWater(water) = model.component(office[0]).unwrap() else {
            panic!("expected a hot water baseboard");
        };
        assert!((water.maximum_water_flow_rate.unwrap() - gpm_to_m3s(2.0)).abs() < 1e-9);

        let closet = model.zone_equipment(handle(&model, "Closet"));
        let HvacComponent::BaseboardConvectiveElectric(electric) = model.component(closet[0]).unwrap() else {
            panic!("expected an electric baseboard");
        };
        assert!((electric.nominal_capacity.unwrap() - 1000.0).abs() < 0.1);
        model::validate_model(&model).unwrap();
    }

    #[test]
    fn unsupported_zone_systems_are_skipped_with_a_warning() {
        let (model, translator) = translate(
            "<SDDXML><ThrmlZn><Name>Z</Name><PriAirCondgSysRef>Unit</PriAirCondgSysRef></ThrmlZn>
               <ZnSys><Name>Unit</Name><Type>PTAC</Type></ZnSys></SDDXML>",
        );
        assert!(model.zone_equipment(handle(&model, "Z")).is_empty());
        assert!(translator.warnings().iter().any(|w| w.contains("unsupported Type 'PTAC'")));
    }

    #[test]
    fn autosize_leaves_capacities_unset() {
        let doc = Element::parse(
            "<SDDXML><FluidSys><Name>HW</Name><Type>HotWater</Type>
               <Blr><Name>Boiler</Name><CapRtd>500000</CapRtd></Blr></FluidSys></SDDXML>",
        )
        .unwrap();
        let mut translator = ReverseTranslator::new(ReverseTranslatorOptions { autosize: true });
        let model = translator.translate(&doc);
        let HvacComponent::BoilerHotWater(boiler) = model.component(handle(&model, "Boiler")).unwrap() else {
            panic!("expected a boiler");
        };
        assert_eq!(boiler.nominal_capacity, None);
        assert!(translator.errors().iter().any(|e| e.contains("does not have a setpoint")));
    }
}
