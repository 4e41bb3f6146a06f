//! Model → BEC XML.
//!
//! Output order is curves, thermal zones, fluid systems, air systems and
//! zone systems, which is also the order [`crate::ReverseTranslator`] reads
//! them in. A zone names one zone system; only its first zone equipment is
//! written.
//! Values are written in IP units. Schedules are referenced by name only.

use tracing::{debug, info, instrument, warn};

use model::components::{FuelType, HvacComponent};
use model::loops::{EconomizerControlType, NightCycleControl, PathSide, PlantLoopType};
use model::setpoint::{ReferenceTemperatureType, WarmestStrategy};
use model::{ControlVariable, Curve, Handle, Model, ModelError, ObjectKind, SpmKind};

use crate::units::*;
use crate::xml::Element;

/// Writes the HVAC part of a [`Model`] as a BEC document.
#[derive(Debug, Default)]
pub struct ForwardTranslator {
    warnings: Vec<String>,
    errors: Vec<String>,
}

struct Context<'a> {
    model: &'a Model,
    /// Curves made up for fan power coefficients.
    fan_curves: Vec<Element>,
}

impl Context<'_> {
    fn name(&self, handle: Handle) -> String {
        self.model.name(handle).unwrap_or_default().to_owned()
    }

    /// Name of the primary fluid segment of the plant loop on whose demand
    /// side `component` sits.
    fn demand_segment(&self, component: Handle) -> Option<String> {
        self.model
            .path_memberships(component)
            .into_iter()
            .find(|(side, _)| *side == PathSide::PlantDemand)
            .map(|(_, plant)| supply_segment_name(&self.name(plant)))
    }
}

fn supply_segment_name(loop_name: &str) -> String {
    format!("{loop_name} Supply")
}

/// Rounded to four decimals, without a trailing `.0`.
fn format_number(value: f64) -> String {
    let rounded = (value * 10_000.0).round() / 10_000.0;
    if rounded == 0.0 {
        "0".to_owned()
    } else {
        format!("{rounded}")
    }
}

fn push_number(el: &mut Element, name: &str, value: f64) {
    el.push_text(name, format_number(value));
}

fn push_optional(el: &mut Element, name: &str, value: Option<f64>) {
    if let Some(value) = value {
        push_number(el, name, value);
    }
}

fn push_reference(el: &mut Element, ctx: &Context<'_>, name: &str, handle: Option<Handle>) {
    if let Some(handle) = handle {
        el.push_text(name, ctx.name(handle));
    }
}

fn fuel_source(fuel: FuelType) -> &'static str {
    match fuel {
        FuelType::Electricity => "Electric",
        FuelType::NaturalGas => "Gas",
        FuelType::FuelOil2 => "Oil",
        FuelType::Propane => "Propane",
    }
}

impl ForwardTranslator {
    pub fn new() -> Self {
        Self::default()
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

    /// Translate the model's curves, zones, plant loops and air loops.
    #[instrument(skip_all, fields(objects = model.len()))]
    pub fn translate_model(&mut self, model: &Model) -> Element {
        self.warnings.clear();
        self.errors.clear();

        let mut ctx = Context { model, fan_curves: Vec::new() };
        let mut root = Element::new("BECInput");

        for obj in model.objects() {
            if let ObjectKind::Curve(curve) = obj.kind() {
                root.push(translate_curve(obj.name(), curve));
            }
        }
        for zone in model.thermal_zones() {
            root.push(self.translate_zone(&ctx, zone));
        }
        for plant in model.plant_loops() {
            match self.translate_plant_loop(&ctx, plant) {
                Ok(el) => root.push(el),
                Err(e) => self.error(format!("plant loop '{}' not translated: {e}", ctx.name(plant))),
            }
        }
        for air_loop in model.air_loops() {
            match self.translate_air_loop(&mut ctx, air_loop) {
                Ok(el) => root.push(el),
                Err(e) => self.error(format!("air loop '{}' not translated: {e}", ctx.name(air_loop))),
            }
        }
        for zone in model.thermal_zones() {
            if let Some(equipment) = model.zone_equipment(zone).first() {
                if let Some(el) = self.translate_zone_system(&ctx, *equipment) {
                    root.push(el);
                }
            }
        }
        root.children.append(&mut ctx.fan_curves);

        info!(
            elements = root.children.len(),
            warnings = self.warnings.len(),
            errors = self.errors.len(),
            "model translated to BEC"
        );
        root
    }

    fn translate_zone(&mut self, ctx: &Context<'_>, zone: Handle) -> Element {
        let mut el = Element::new("ThrmlZn");
        el.push_text("Name", ctx.name(zone));
        if let Ok(z) = ctx.model.thermal_zone(zone) {
            el.push_text("Mult", z.multiplier.to_string());
        }
        let equipment = ctx.model.zone_equipment(zone);
        let air_loop = ctx.model.zone_air_loop(zone);
        if let Some(primary) = equipment.first().copied().or(air_loop) {
            el.push_text("PriAirCondgSysRef", ctx.name(primary));
        }
        if let Some(air_loop) = air_loop {
            el.push_text("VentSysRef", ctx.name(air_loop));
        }
        if equipment.len() > 1 {
            self.warn(format!(
                "zone '{}' has {} pieces of zone equipment; only '{}' is written",
                ctx.name(zone),
                equipment.len(),
                ctx.name(equipment[0])
            ));
        }
        el
    }

    /// A `ZnSys` of type `Baseboard` with the baseboard's heating coil.
    fn translate_zone_system(&mut self, ctx: &Context<'_>, equipment: Handle) -> Option<Element> {
        let component = ctx.model.component(equipment).ok()?;
        let name = ctx.name(equipment);
        let mut coil = Element::new("CoilHtg");
        coil.push_text("Name", format!("{name} Coil"));
        match component {
            HvacComponent::BaseboardConvectiveElectric(b) => {
                coil.push_text("Type", "Resistance");
                push_optional(&mut coil, "CapTotGrossRtdSim", b.nominal_capacity.map(w_to_btuh));
            }
            HvacComponent::BaseboardConvectiveWater(b) => {
                coil.push_text("Type", "HotWater");
                self.push_segment(ctx, &mut coil, equipment, &name);
                push_optional(&mut coil, "FluidFlowRtDsgnSim", b.maximum_water_flow_rate.map(m3s_to_gpm));
            }
            other => {
                self.warn(format!("{} '{name}' is not zone equipment BEC can express", other.type_name()));
                return None;
            }
        }

        let mut el = Element::new("ZnSys");
        el.push_text("Name", name);
        el.push_text("Type", "Baseboard");
        push_reference(&mut el, ctx, "AvailSchRef", component.availability_schedule());
        el.push(coil);
        Some(el)
    }

    // -----------------------------------------------------------------------
    // Plant loops
    // -----------------------------------------------------------------------

    fn translate_plant_loop(&mut self, ctx: &Context<'_>, plant: Handle) -> Result<Element, ModelError> {
        let model = ctx.model;
        let l = model.plant_loop(plant)?;
        let loop_name = ctx.name(plant);

        let mut el = Element::new("FluidSys");
        el.push_text("Name", loop_name.clone());
        el.push_text(
            "Type",
            match l.sizing.loop_type {
                PlantLoopType::Heating => "HotWater",
                PlantLoopType::Cooling => "ChilledWater",
                PlantLoopType::Condenser => "CondenserWater",
            },
        );
        push_number(&mut el, "DsgnSupWtrTemp", c_to_f(l.sizing.design_loop_exit_temperature));
        push_number(&mut el, "DsgnSupWtrDelT", delta_c_to_f(l.sizing.loop_design_temperature_difference));
        self.plant_temperature_control(ctx, &mut el, l.supply_outlet_node(), &loop_name);

        let runs = model.branches(plant, PathSide::PlantSupply)?;
        let mut primary = Element::new("FluidSeg");
        primary.push_text("Name", supply_segment_name(&loop_name));
        primary.push_text("Type", "PrimarySupply");
        if let Some(head) = runs.first() {
            if let Some(pump) = model.components_on(head, HvacComponent::is_pump).first() {
                primary.push(translate_pump(ctx, *pump)?);
            }
        }
        el.push(primary);

        let branch_count = runs.len().saturating_sub(2);
        let mut has_bypass = false;
        let mut equipment_elements = Vec::new();
        for run in runs.iter().skip(1).take(branch_count) {
            let components = model.components_on(run, |_| true);
            if !components.is_empty()
                && components
                    .iter()
                    .all(|c| matches!(model.component(*c), Ok(HvacComponent::PipeAdiabatic)))
            {
                has_bypass = true;
                continue;
            }

            let mut pumps = Vec::new();
            let mut equipment: Vec<Element> = Vec::new();
            for component in components {
                match model.component(component)? {
                    c if c.is_pump() => pumps.push(translate_pump(ctx, component)?),
                    HvacComponent::PipeAdiabatic => {}
                    HvacComponent::BoilerHotWater(b) => {
                        let mut blr = Element::new("Blr");
                        blr.push_text("Name", ctx.name(component));
                        blr.push_text("FuelSrc", fuel_source(b.fuel_type));
                        push_number(&mut blr, "ThrmlEff", b.nominal_thermal_efficiency);
                        push_number(&mut blr, "ParasiticLd", w_to_btuh(b.parasitic_electric_load));
                        push_optional(&mut blr, "LvgTempDsgn", b.design_water_outlet_temperature.map(c_to_f));
                        push_optional(&mut blr, "CapRtd", b.nominal_capacity.map(w_to_btuh));
                        push_reference(&mut blr, ctx, "HIR_fPLRCrvRef", b.efficiency_curve);
                        equipment.push(blr);
                    }
                    HvacComponent::ChillerElectricEir(c) => {
                        let mut chlr = Element::new("Chlr");
                        chlr.push_text("Name", ctx.name(component));
                        push_number(&mut chlr, "COP", c.reference_cop);
                        push_number(&mut chlr, "PartLdRatMin", c.minimum_part_load_ratio);
                        push_number(&mut chlr, "UnldRatMin", c.minimum_unloading_ratio);
                        let leaving = c.reference_leaving_chilled_water_temperature;
                        push_number(&mut chlr, "LvgTempDsgn", c_to_f(leaving));
                        push_number(
                            &mut chlr,
                            "EntTempDsgn",
                            c_to_f(leaving + l.sizing.loop_design_temperature_difference),
                        );
                        push_optional(&mut chlr, "CapRtd", c.reference_capacity.map(w_to_btuh));
                        push_reference(&mut chlr, ctx, "Cap_fTempCrvRef", c.cooling_capacity_f_temperature);
                        push_reference(&mut chlr, ctx, "EIR_fTempCrvRef", c.eir_f_temperature);
                        push_reference(&mut chlr, ctx, "EIR_fPLRCrvRef", c.eir_f_part_load_ratio);
                        if let Some(segment) = ctx.demand_segment(component) {
                            chlr.push_text("CndsrFluidSegInRef", segment);
                        }
                        equipment.push(chlr);
                    }
                    HvacComponent::CoolingTowerSingleSpeed(t) => {
                        let mut tower = Element::new("HtRej");
                        tower.push_text("Name", ctx.name(component));
                        tower.push_text("ModCtrl", "Cycling");
                        push_optional(&mut tower, "AirFlowCap", t.design_air_flow_rate.map(m3s_to_cfm));
                        push_optional(&mut tower, "WtrFlowCap", t.design_water_flow_rate.map(m3s_to_gpm));
                        push_optional(&mut tower, "TotFanHP", t.fan_power_at_design_air_flow_rate.map(w_to_hp));
                        equipment.push(tower);
                    }
                    other => self.warn(format!(
                        "{} '{}' on plant loop '{loop_name}' has no BEC equivalent",
                        other.type_name(),
                        ctx.name(component)
                    )),
                }
            }
            match equipment.first_mut() {
                Some(first) => first.children.extend(pumps),
                None if !pumps.is_empty() => self.warn(format!(
                    "branch pump on plant loop '{loop_name}' has no equipment to belong to"
                )),
                None => {}
            }
            equipment_elements.extend(equipment);
        }
        if has_bypass {
            if let Some(chiller) = equipment_elements.iter_mut().find(|e| e.is("Chlr")) {
                chiller.push_text("EvapHasBypass", "1");
            }
        }
        el.children.extend(equipment_elements);

        let demand = model.branches(plant, PathSide::PlantDemand)?;
        if let Some(head) = demand.first() {
            if let Some(pump) = model.components_on(head, HvacComponent::is_pump).first() {
                let mut secondary = Element::new("FluidSeg");
                secondary.push_text("Name", format!("{loop_name} Secondary Supply"));
                secondary.push_text("Type", "SecondarySupply");
                secondary.push(translate_pump(ctx, *pump)?);
                el.push(secondary);
            }
        }

        debug!(%plant, name = %loop_name, "plant loop written");
        Ok(el)
    }

    fn plant_temperature_control(&mut self, ctx: &Context<'_>, el: &mut Element, outlet: Handle, loop_name: &str) {
        let model = ctx.model;
        let Some(spm) = model.setpoint_manager_for(outlet, ControlVariable::Temperature) else {
            self.warn(format!("plant loop '{loop_name}' has no supply temperature control"));
            return;
        };
        let Ok(manager) = model.setpoint_manager(spm) else {
            return;
        };
        match manager.kind() {
            SpmKind::Scheduled { schedule: Some(schedule) } => match model.schedule(*schedule) {
                Ok(s) => {
                    el.push_text("TempCtrl", "Fixed");
                    push_number(el, "FixedSupTemp", c_to_f(s.value));
                }
                Err(e) => self.error(format!("plant loop '{loop_name}' setpoint schedule: {e}")),
            },
            SpmKind::OutdoorAirReset(r) => {
                el.push_text("TempCtrl", "OutsideAirReset");
                push_reset(el, "Rst", r);
            }
            SpmKind::FollowOutdoorAirTemperature {
                reference_temperature_type,
                offset_temperature_difference,
                maximum_setpoint_temperature,
                minimum_setpoint_temperature,
            } => {
                if *reference_temperature_type != ReferenceTemperatureType::OutdoorAirWetBulb {
                    self.warn(format!("plant loop '{loop_name}' follows dry bulb; written as a wet bulb reset"));
                }
                el.push_text("TempCtrl", "WetBulbReset");
                push_number(el, "RstSupHi", c_to_f(*maximum_setpoint_temperature));
                push_number(el, "RstSupLow", c_to_f(*minimum_setpoint_temperature));
                push_number(el, "WetBulbApproach", delta_c_to_f(*offset_temperature_difference));
            }
            other => self.error(format!(
                "plant loop '{loop_name}' uses {} which BEC cannot express",
                other.name()
            )),
        }
    }

    // -----------------------------------------------------------------------
    // Air loops
    // -----------------------------------------------------------------------

    fn translate_air_loop(&mut self, ctx: &mut Context<'_>, air_loop: Handle) -> Result<Element, ModelError> {
        let model = ctx.model;
        let l = model.air_loop(air_loop)?;
        let loop_name = ctx.name(air_loop);
        let outlet = l.supply_outlet_node();

        let supply = model.supply_components(air_loop)?;
        let oa = model.air_loop_outdoor_air_system(air_loop);
        let oa_index = oa.and_then(|oa| supply.iter().position(|h| *h == oa));
        let (before_oa, after_oa) = match oa_index {
            Some(i) => (&supply[..i], &supply[i + 1..]),
            None => (&supply[..0], &supply[..]),
        };
        let after_components = model.components_on(after_oa, |_| true);
        let deck = model
            .setpoint_manager_for(outlet, ControlVariable::Temperature)
            .and_then(|h| model.setpoint_manager(h).ok())
            .map(|m| m.kind());

        let mut el = Element::new("AirSys");
        el.push_text("Name", loop_name.clone());
        el.push_text("Type", self.classify(ctx, &loop_name, &after_components, deck));
        match l.night_cycle_control {
            NightCycleControl::CycleOnAny => el.push_text("NightCycleFanCtrl", "CycleOnCallAnyZone"),
            NightCycleControl::CycleOnAnyZoneFansOnly => el.push_text("NightCycleFanCtrl", "CycleZoneFansOnly"),
            NightCycleControl::CycleOnControlZone => {
                self.warn(format!("air loop '{loop_name}' cycles on its control zone; written as any zone"));
                el.push_text("NightCycleFanCtrl", "CycleOnCallAnyZone");
            }
            NightCycleControl::StayOff => {}
        }
        let draw_through = after_components
            .last()
            .and_then(|h| model.component(*h).ok())
            .is_some_and(HvacComponent::is_fan);
        el.push_text("FanPos", if draw_through { "DrawThrough" } else { "BlowThrough" });
        push_reference(&mut el, ctx, "AvailSchRef", l.availability_schedule);

        let s = &l.sizing;
        push_number(&mut el, "ClgDsgnSupAirTemp", c_to_f(s.central_cooling_design_supply_air_temperature));
        push_number(&mut el, "HtgDsgnSupAirTemp", c_to_f(s.central_heating_design_supply_air_temperature));
        push_number(&mut el, "DsgnPrehtTemp", c_to_f(s.preheat_design_temperature));
        push_number(&mut el, "DsgnPrehtHumidityRat", s.preheat_design_humidity_ratio);
        push_number(&mut el, "DsgnPreclTemp", c_to_f(s.precool_design_temperature));
        push_number(&mut el, "DsgnPreclHumidityRat", s.precool_design_humidity_ratio);
        push_number(&mut el, "ClgDsgnHumidityRat", s.central_cooling_design_supply_air_humidity_ratio);
        push_number(&mut el, "HtgDsgnHumidityRat", s.central_heating_design_supply_air_humidity_ratio);
        el.push_text("ClgFullOutsdAir", if s.all_outdoor_air_in_cooling { "Yes" } else { "No" });
        el.push_text("HtgFullOutsdAir", if s.all_outdoor_air_in_heating { "Yes" } else { "No" });
        let minimum_ratio = match deck {
            Some(SpmKind::WarmestTemperatureFlow { minimum_turndown_ratio, .. }) => *minimum_turndown_ratio,
            _ => s.minimum_system_air_flow_ratio,
        };
        push_number(&mut el, "DsgnAirFlowMin", minimum_ratio);

        self.cooling_control(ctx, &mut el, deck, &loop_name);

        if let Some(oa) = oa {
            el.push(self.translate_outdoor_air(ctx, oa)?);
        }

        let mut segment = Element::new("AirSeg");
        segment.push_text("Name", format!("{loop_name} Supply"));
        segment.push_text("Type", "Supply");
        for component in &after_components {
            if let Some(child) = self.translate_air_component(ctx, *component, &loop_name)? {
                segment.push(child);
            }
        }
        el.push(segment);

        let return_fans = model.components_on(before_oa, HvacComponent::is_fan);
        if let Some(fan) = return_fans.first() {
            let mut segment = Element::new("AirSeg");
            segment.push_text("Name", format!("{loop_name} Return"));
            segment.push_text("Type", "Return");
            segment.push(self.translate_fan(ctx, *fan)?);
            el.push(segment);
        }

        for zone in model.served_zones(air_loop)? {
            let Some(terminal) = model.zone_terminal(zone) else {
                continue;
            };
            el.push(self.translate_terminal(ctx, terminal, zone)?);
        }

        debug!(%air_loop, name = %loop_name, draw_through, "air loop written");
        Ok(el)
    }

    /// BEC system type from the supply fan, the cooling coils and the deck
    /// manager.
    fn classify(
        &mut self,
        ctx: &Context<'_>,
        loop_name: &str,
        supply: &[Handle],
        deck: Option<&SpmKind>,
    ) -> &'static str {
        let model = ctx.model;
        let components: Vec<&HvacComponent> = supply.iter().filter_map(|h| model.component(*h).ok()).collect();
        let variable_fan = components
            .iter()
            .find(|c| c.is_fan())
            .is_some_and(|c| matches!(c, HvacComponent::FanVariableVolume(_)));
        let has_cooling = components.iter().any(|c| c.is_cooling_coil());
        let chilled_water = components
            .iter()
            .any(|c| matches!(c, HvacComponent::CoilCoolingWater(_)));
        let single_zone = matches!(deck, Some(SpmKind::SingleZoneReheat { .. }));

        match (has_cooling, variable_fan, single_zone) {
            (false, _, _) => "HV",
            (true, true, true) => "SZVAVAC",
            (true, true, false) if chilled_water => "VAV",
            (true, true, false) => "PVAV",
            (true, false, true) => "SZAC",
            (true, false, false) => {
                self.warn(format!(
                    "air loop '{loop_name}' has a constant volume fan without single zone control; written as VAV"
                ));
                "VAV"
            }
        }
    }

    fn cooling_control(&mut self, ctx: &Context<'_>, el: &mut Element, deck: Option<&SpmKind>, loop_name: &str) {
        let Some(deck) = deck else {
            self.warn(format!("air loop '{loop_name}' has no supply air temperature control"));
            return;
        };
        match deck {
            SpmKind::Scheduled { schedule: Some(schedule) } => match ctx.model.schedule(*schedule) {
                Ok(s) => {
                    el.push_text("ClgCtrl", "Fixed");
                    push_number(el, "ClgFixedSupTemp", c_to_f(s.value));
                }
                Err(e) => self.error(format!("air loop '{loop_name}' deck schedule: {e}")),
            },
            SpmKind::SingleZoneReheat { .. } => el.push_text("ClgCtrl", "NoSATControl"),
            SpmKind::WarmestTemperatureFlow {
                minimum_setpoint_temperature,
                maximum_setpoint_temperature,
                strategy,
                ..
            } => {
                el.push_text(
                    "ClgCtrl",
                    match strategy {
                        WarmestStrategy::FlowFirst => "WarmestResetFlowFirst",
                        WarmestStrategy::TemperatureFirst => "WarmestResetTemperatureFirst",
                    },
                );
                push_number(el, "ClRstSupHi", c_to_f(*maximum_setpoint_temperature));
                push_number(el, "ClRstSupLow", c_to_f(*minimum_setpoint_temperature));
            }
            SpmKind::Warmest { minimum_setpoint_temperature, maximum_setpoint_temperature } => {
                el.push_text("ClgCtrl", "WarmestReset");
                push_number(el, "ClRstSupHi", c_to_f(*maximum_setpoint_temperature));
                push_number(el, "ClRstSupLow", c_to_f(*minimum_setpoint_temperature));
            }
            SpmKind::OutdoorAirReset(r) => {
                el.push_text("ClgCtrl", "OutsideAirReset");
                push_reset(el, "ClRst", r);
            }
            SpmKind::FollowOutdoorAirTemperature { .. } => {
                self.warn(format!(
                    "air loop '{loop_name}' follows outdoor air temperature; written as an unbounded outside air reset"
                ));
                el.push_text("ClgCtrl", "OutsideAirReset");
                push_number(el, "ClRstSupHi", 100.0);
                push_number(el, "ClRstSupLow", 0.0);
                push_number(el, "ClRstOutdrHi", 100.0);
                push_number(el, "ClRstOutdrLow", 0.0);
            }
            other => self.error(format!(
                "air loop '{loop_name}' supply outlet uses {} which BEC cannot express",
                other.name()
            )),
        }
    }

    fn translate_outdoor_air(&mut self, ctx: &Context<'_>, oa: Handle) -> Result<Element, ModelError> {
        let c = &ctx.model.outdoor_air_system(oa)?.controller;
        let mut el = Element::new("OACtrl");
        el.push_text("Name", ctx.name(oa));
        let method = match c.economizer_control_type {
            EconomizerControlType::DifferentialDryBulbAndEnthalpy => {
                self.warn(format!(
                    "'{}' differential dry bulb and enthalpy economizer written as differential enthalpy",
                    ctx.name(oa)
                ));
                "DifferentialEnthalpy"
            }
            EconomizerControlType::FixedDewPointAndDryBulb => {
                self.warn(format!("'{}' dew point economizer written as fixed dry bulb", ctx.name(oa)));
                "FixedDryBulb"
            }
            other => other.as_str(),
        };
        el.push_text("EconoCtrlMthd", method);
        el.push_text(
            "EconoIntegration",
            if c.lockout_type.eq_ignore_ascii_case("NoLockout") { "Integrated" } else { "NonIntegrated" },
        );
        push_optional(&mut el, "EconoHiTempLockout", c.economizer_maximum_limit_dry_bulb_temperature.map(c_to_f));
        push_optional(&mut el, "EconoLowTempLockout", c.economizer_minimum_limit_dry_bulb_temperature.map(c_to_f));
        push_reference(&mut el, ctx, "MinOAFracSchRef", c.minimum_fraction_of_outdoor_air_schedule);
        push_reference(&mut el, ctx, "MaxOAFracSchRef", c.maximum_fraction_of_outdoor_air_schedule);
        if let Some(schedule) = c.minimum_outdoor_air_schedule {
            el.push_text("OASchMthd", "Scheduled");
            el.push_text("OASchRef", ctx.name(schedule));
        }
        Ok(el)
    }

    fn translate_air_component(
        &mut self,
        ctx: &mut Context<'_>,
        component: Handle,
        loop_name: &str,
    ) -> Result<Option<Element>, ModelError> {
        let model = ctx.model;
        let c = model.component(component)?;
        if c.is_fan() {
            return self.translate_fan(ctx, component).map(Some);
        }
        if c.is_cooling_coil() || c.is_heating_coil() {
            return Ok(self.translate_coil(ctx, component));
        }
        self.warn(format!(
            "{} '{}' on air loop '{loop_name}' has no BEC equivalent",
            c.type_name(),
            ctx.name(component)
        ));
        Ok(None)
    }

    fn translate_fan(&mut self, ctx: &mut Context<'_>, fan: Handle) -> Result<Element, ModelError> {
        let name = ctx.name(fan);
        let mut el = Element::new("Fan");
        el.push_text("Name", name.clone());
        let model = ctx.model;
        let (f, variable) = match model.component(fan)? {
            HvacComponent::FanConstantVolume(f) => (f, None),
            HvacComponent::FanVariableVolume(v) => (&v.fan, Some(v)),
            other => {
                self.error(format!("'{name}' is a {}, not a fan", other.type_name()));
                return Ok(el);
            }
        };
        el.push_text("CtrlMthd", if variable.is_some() { "VariableSpeedDrive" } else { "ConstantVolume" });
        push_optional(&mut el, "FlowCapSim", f.maximum_flow_rate.map(m3s_to_cfm));
        if let (Some(v), Some(max)) = (variable, f.maximum_flow_rate) {
            push_number(&mut el, "FlowMinSim", m3s_to_cfm(max * v.minimum_flow_fraction));
        }
        push_number(&mut el, "TotEff", f.fan_efficiency);
        push_number(&mut el, "TotStaticPress", pa_to_in_h2o(f.pressure_rise));
        push_number(&mut el, "MtrEff", f.motor_efficiency);
        el.push_text(
            "MtrPos",
            if f.motor_in_airstream_fraction >= 0.5 { "InAirStream" } else { "NotInAirStream" },
        );
        if let Some(v) = variable {
            if v.power_coefficients[4] != 0.0 {
                self.warn(format!("fan '{name}' power curve is quartic; the fourth order term is dropped"));
            }
            let curve_name = format!("{name} Pwr fPLR");
            let [c1, c2, c3, c4, _] = v.power_coefficients;
            ctx.fan_curves.push(translate_curve(
                &curve_name,
                &Curve::Cubic { coefficients: [c1, c2, c3, c4], minimum_x: 0.0, maximum_x: 1.0 },
            ));
            el.push_text("Pwr_fPLRCrvRef", curve_name);
        }
        Ok(el)
    }

    fn translate_coil(&mut self, ctx: &Context<'_>, coil: Handle) -> Option<Element> {
        let component = ctx.model.component(coil).ok()?;
        let name = ctx.name(coil);
        let mut el = match component {
            HvacComponent::CoilCoolingDxSingleSpeed(_) | HvacComponent::CoilCoolingWater(_) => Element::new("CoilClg"),
            _ => Element::new("CoilHtg"),
        };
        el.push_text("Name", name.clone());

        match component {
            HvacComponent::CoilCoolingDxSingleSpeed(c) => {
                el.push_text("Type", "DirectExpansion");
                el.push_text("NumClgStages", "1");
                push_optional(&mut el, "CapTotGrossRtdSim", c.rated_total_cooling_capacity.map(w_to_btuh));
                if let (Some(total), Some(shr)) = (c.rated_total_cooling_capacity, c.rated_sensible_heat_ratio) {
                    push_number(&mut el, "CapSensGrossRtdSim", w_to_btuh(total * shr));
                }
                if c.rated_cop > 0.0 {
                    push_number(&mut el, "DXEIR", 1.0 / c.rated_cop);
                }
                push_reference(&mut el, ctx, "Cap_fTempCrvRef", c.total_cooling_capacity_curve);
                push_reference(&mut el, ctx, "DXEIR_fTempCrvRef", c.energy_input_ratio_curve);
            }
            HvacComponent::CoilCoolingWater(c) => {
                el.push_text("Type", "ChilledWater");
                self.push_segment(ctx, &mut el, coil, &name);
                push_optional(&mut el, "FluidFlowRtDsgnSim", c.design_water_flow_rate.map(m3s_to_gpm));
            }
            HvacComponent::CoilHeatingGas(c) => {
                el.push_text("Type", "Furnace");
                el.push_text("FuelSrc", fuel_source(c.fuel_type));
                push_number(&mut el, "FurnThrmlEff", c.burner_efficiency);
                push_number(&mut el, "FurnPilotFuelInp", w_to_btuh(c.parasitic_electric_load));
                push_optional(&mut el, "CapTotGrossRtdSim", c.nominal_capacity.map(w_to_btuh));
            }
            HvacComponent::CoilHeatingElectric(c) => {
                el.push_text("Type", "Resistance");
                push_optional(&mut el, "CapTotGrossRtdSim", c.nominal_capacity.map(w_to_btuh));
            }
            HvacComponent::CoilHeatingWater(c) => {
                el.push_text("Type", "HotWater");
                self.push_segment(ctx, &mut el, coil, &name);
                push_optional(&mut el, "CapTotGrossRtdSim", c.rated_capacity.map(w_to_btuh));
                push_optional(&mut el, "FluidFlowRtDsgnSim", c.maximum_water_flow_rate.map(m3s_to_gpm));
            }
            other => {
                self.warn(format!("{} '{name}' is not a coil BEC can express", other.type_name()));
                return None;
            }
        }
        Some(el)
    }

    fn push_segment(&mut self, ctx: &Context<'_>, el: &mut Element, coil: Handle, name: &str) {
        match ctx.demand_segment(coil) {
            Some(segment) => el.push_text("FluidSegInRef", segment),
            None => self.warn(format!("water coil '{name}' is not on a plant loop")),
        }
    }

    fn translate_terminal(&mut self, ctx: &Context<'_>, terminal: Handle, zone: Handle) -> Result<Element, ModelError> {
        let mut el = Element::new("TrmlUnit");
        el.push_text("Name", ctx.name(terminal));
        let (kind, maximum, fraction, reheat) = match ctx.model.component(terminal)? {
            HvacComponent::AirTerminalUncontrolled(t) => ("Uncontrolled", t.maximum_air_flow_rate, None, None),
            HvacComponent::AirTerminalVavNoReheat(t) => (
                "VAVNoReheatBox",
                t.maximum_air_flow_rate,
                Some(t.constant_minimum_air_flow_fraction),
                None,
            ),
            HvacComponent::AirTerminalVavReheat(t) => (
                "VAVReheatBox",
                t.maximum_air_flow_rate,
                Some(t.constant_minimum_air_flow_fraction),
                t.reheat_coil,
            ),
            other => {
                self.error(format!("'{}' is a {}, not an air terminal", ctx.name(terminal), other.type_name()));
                return Ok(el);
            }
        };
        el.push_text("Type", kind);
        el.push_text("ZnServedRef", ctx.name(zone));
        push_reference(&mut el, ctx, "AvailSchRef", ctx.model.component(terminal)?.availability_schedule());
        push_optional(&mut el, "PriAirFlowMaxSim", maximum.map(m3s_to_cfm));
        if let (Some(max), Some(fraction)) = (maximum, fraction) {
            push_number(&mut el, "PriAirFlowMinSim", m3s_to_cfm(max * fraction));
        }
        if let Some(coil) = reheat.and_then(|coil| self.translate_coil(ctx, coil)) {
            el.push(coil);
        }
        Ok(el)
    }
}

fn push_reset(el: &mut Element, prefix: &str, reset: &model::setpoint::OutdoorAirReset) {
    push_number(el, &format!("{prefix}SupHi"), c_to_f(reset.setpoint_at_outdoor_high_temperature));
    push_number(el, &format!("{prefix}SupLow"), c_to_f(reset.setpoint_at_outdoor_low_temperature));
    push_number(el, &format!("{prefix}OutdrHi"), c_to_f(reset.outdoor_high_temperature));
    push_number(el, &format!("{prefix}OutdrLow"), c_to_f(reset.outdoor_low_temperature));
}

fn translate_pump(ctx: &Context<'_>, pump: Handle) -> Result<Element, ModelError> {
    let (p, constant) = match ctx.model.component(pump)? {
        HvacComponent::PumpConstantSpeed(p) => (p, true),
        HvacComponent::PumpVariableSpeed(p) => (p, false),
        _ => return Ok(Element::new("Pump")),
    };
    let mut el = Element::new("Pump");
    el.push_text("Name", ctx.name(pump));
    el.push_text("SpdCtrl", if constant { "ConstantSpeed" } else { "VariableSpeed" });
    push_number(&mut el, "MtrEff", p.motor_efficiency);
    push_number(&mut el, "TotHd", pa_to_ft_h2o(p.rated_pump_head));
    push_optional(&mut el, "FlowCap", p.rated_flow_rate.map(m3s_to_gpm));
    push_optional(&mut el, "Pwr", p.rated_power_consumption.map(w_to_kw));
    Ok(el)
}

fn translate_curve(name: &str, curve: &Curve) -> Element {
    let (tag, y_limits) = match curve {
        Curve::Cubic { .. } => ("CrvCubic", None),
        Curve::Quadratic { .. } => ("CrvQuad", None),
        Curve::Biquadratic { minimum_y, maximum_y, .. } => ("CrvDblQuad", Some((*minimum_y, *maximum_y))),
    };
    let (minimum_x, maximum_x) = match curve {
        Curve::Cubic { minimum_x, maximum_x, .. }
        | Curve::Quadratic { minimum_x, maximum_x, .. }
        | Curve::Biquadratic { minimum_x, maximum_x, .. } => (*minimum_x, *maximum_x),
    };

    let mut el = Element::new(tag);
    el.push_text("Name", name);
    for (i, coefficient) in curve.coefficients().iter().enumerate() {
        // full precision; curve terms are often tiny
        el.push_text(&format!("Coef{}", i + 1), coefficient.to_string());
    }
    push_number(&mut el, "MinVar1", minimum_x);
    push_number(&mut el, "MaxVar1", maximum_x);
    if let Some((minimum_y, maximum_y)) = y_limits {
        push_number(&mut el, "MinVar2", minimum_y);
        push_number(&mut el, "MaxVar2", maximum_y);
    }
    el
}

// ============================================================
// Unit tests
// ============================================================
#[cfg(test)]
mod tests {
    use super::*;
    use model::components::BaseboardWater;
    use model::loops::ThermalZone;
    use model::templates;

    #[test]
    fn numbers_are_rounded_without_trailing_zeros() {
        assert_eq!(format_number(55.04), "55.04");
        assert_eq!(format_number(1.0), "1");
        assert_eq!(format_number(0.123_456), "0.1235");
        assert_eq!(format_number(-0.000_01), "0");
    }

    #[test]
    fn templates_classify_by_fan_coil_and_control() {
        let mut model = Model::new();
        templates::add_system_type_3(&mut model).unwrap();
        templates::add_system_type_5(&mut model).unwrap();
        templates::add_system_type_7(&mut model).unwrap();

        let mut translator = ForwardTranslator::new();
        let doc = translator.translate_model(&model);
        let types: Vec<(&str, &str)> = doc
            .descendants("AirSys")
            .into_iter()
            .map(|s| (s.child_text("Name").unwrap(), s.child_text("Type").unwrap()))
            .collect();
        assert_eq!(
            types,
            vec![
                ("Packaged Rooftop Unit", "SZAC"),
                ("Packaged VAV with Reheat", "PVAV"),
                ("VAV with Reheat", "VAV"),
            ]
        );
        assert!(translator.errors().is_empty(), "{:?}", translator.errors());
    }

    #[test]
    fn draw_through_fan_and_fixed_deck_are_written() {
        let mut model = Model::new();
        templates::add_system_type_7(&mut model).unwrap();
        let doc = ForwardTranslator::new().translate_model(&model);

        let system = doc.descendants("AirSys")[0];
        assert_eq!(system.child_text("FanPos"), Some("DrawThrough"));
        assert_eq!(system.child_text("ClgCtrl"), Some("Fixed"));
        assert_eq!(system.child_text("ClgFixedSupTemp"), Some("55.04"));
        assert_eq!(system.first_child("OACtrl").unwrap().child_text("EconoCtrlMthd"), Some("DifferentialDryBulb"));

        let supply = system.first_child("AirSeg").unwrap();
        let tags: Vec<&str> = supply.children.iter().skip(2).map(|c| c.name.as_str()).collect();
        assert_eq!(tags, vec!["CoilClg", "CoilHtg", "Fan"]);
        let coil = supply.first_child("CoilClg").unwrap();
        assert_eq!(coil.child_text("FluidSegInRef"), Some("Chilled Water Loop Supply"));
    }

    #[test]
    fn plant_equipment_carries_pumps_and_condenser_reference() {
        let mut model = Model::new();
        templates::add_system_type_7(&mut model).unwrap();
        let doc = ForwardTranslator::new().translate_model(&model);

        let chilled = doc
            .descendants("FluidSys")
            .into_iter()
            .find(|s| s.child_text("Name") == Some("Chilled Water Loop"))
            .unwrap();
        assert_eq!(chilled.child_text("Type"), Some("ChilledWater"));
        assert_eq!(chilled.child_text("TempCtrl"), Some("Fixed"));
        let segment = chilled.first_child("FluidSeg").unwrap();
        assert_eq!(segment.child_text("Name"), Some("Chilled Water Loop Supply"));
        assert_eq!(
            segment.first_child("Pump").unwrap().child_text("SpdCtrl"),
            Some("VariableSpeed")
        );
        let chiller = chilled.first_child("Chlr").unwrap();
        assert_eq!(chiller.child_text("CndsrFluidSegInRef"), Some("Condenser Water Loop Supply"));
        assert_eq!(chiller.child_text("EvapHasBypass"), Some("1"));
        assert_eq!(chiller.child_text("EIR_fPLRCrvRef"), Some("Chiller EIR fPLR"));

        let condenser = doc
            .descendants("FluidSys")
            .into_iter()
            .find(|s| s.child_text("Type") == Some("CondenserWater"))
            .unwrap();
        assert_eq!(condenser.child_text("TempCtrl"), Some("WetBulbReset"));
        assert_eq!(condenser.child_text("RstSupHi"), Some("176"));
    }

    #[test]
    fn variable_fan_power_becomes_a_cubic_curve() {
        let mut model = Model::new();
        templates::add_system_type_5(&mut model).unwrap();
        let doc = ForwardTranslator::new().translate_model(&model);

        let fan = doc.descendants("Fan")[0];
        assert_eq!(fan.child_text("CtrlMthd"), Some("VariableSpeedDrive"));
        let curve_name = fan.child_text("Pwr_fPLRCrvRef").unwrap();
        let curve = doc
            .descendants("CrvCubic")
            .into_iter()
            .find(|c| c.child_text("Name") == Some(curve_name))
            .unwrap();
        assert_eq!(curve.child_f64("Coef4").unwrap(), Some(0.943_739_823));
    }

    #[test]
    fn zone_with_a_baseboard_names_it_as_primary_system() {
        let mut model = Model::new();
        let air_loop = templates::add_system_type_3(&mut model).unwrap();
        let plant = templates::add_hot_water_plant(&mut model).unwrap();
        let zone = model.add_thermal_zone("Office", ThermalZone::default());
        model.add_branch_for_zone(air_loop, zone, None).unwrap();
        let baseboard = model.add_component(
            "Office Baseboard",
            HvacComponent::BaseboardConvectiveWater(BaseboardWater {
                maximum_water_flow_rate: Some(gpm_to_m3s(2.0)),
                ..BaseboardWater::default()
            }),
        );
        model.add_demand_branch_for_component(plant, baseboard).unwrap();
        model.add_to_thermal_zone(baseboard, zone).unwrap();

        let doc = ForwardTranslator::new().translate_model(&model);
        let z = doc.descendants("ThrmlZn")[0];
        assert_eq!(z.child_text("PriAirCondgSysRef"), Some("Office Baseboard"));
        assert_eq!(z.child_text("VentSysRef"), Some("Packaged Rooftop Unit"));

        let system = doc.descendants("ZnSys")[0];
        assert_eq!(system.child_text("Type"), Some("Baseboard"));
        let coil = system.first_child("CoilHtg").unwrap();
        assert_eq!(coil.child_text("Type"), Some("HotWater"));
        assert_eq!(coil.child_text("FluidSegInRef"), Some("Hot Water Loop Supply"));
        assert_eq!(coil.child_text("FluidFlowRtDsgnSim"), Some("2"));
    }

    #[test]
    fn served_zones_name_their_system() {
        let mut model = Model::new();
        let air_loop = templates::add_system_type_3(&mut model).unwrap();
        let zone = model.add_thermal_zone("Office", ThermalZone::default());
        model.add_branch_for_zone(air_loop, zone, None).unwrap();

        let doc = ForwardTranslator::new().translate_model(&model);
        let z = doc.descendants("ThrmlZn")[0];
        assert_eq!(z.child_text("PriAirCondgSysRef"), Some("Packaged Rooftop Unit"));
        assert!(doc.descendants("TrmlUnit").is_empty());
    }
}
