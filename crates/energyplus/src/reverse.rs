//! IDF → Model.
//!
//! Resources (schedules and curves) are read first so that managers and heat
//! exchangers can refer to them by name. Setpoint nodes are looked up among
//! the nodes already in the target model; a manager whose node cannot be
//! found, or whose node rejects it, is kept unattached.

use std::collections::HashMap;

use tracing::{debug, info, instrument, warn};

use model::components::{HeatExchangerAirToAir, HeatExchangerType, HvacComponent};
use model::setpoint::{OutdoorAirReset, ReferenceTemperatureType, WarmestStrategy};
use model::{
    ControlVariable, Curve, Handle, Model, ObjectKind, Schedule, ScheduleType, SetpointManager, SpmKind,
};

use crate::error::IdfError;
use crate::fields::*;
use crate::idf::{IdfFile, IdfObject};

/// Object types that are consumed by other objects or carry nothing the
/// model keeps.
const SILENT: &[&str] = &["Version", "ScheduleTypeLimits", "Timestep", "SimulationControl"];

/// Reads the setpoint managers, heat exchangers and their resources out of
/// an [`IdfFile`].
#[derive(Debug, Default)]
pub struct ReverseTranslator {
    warnings: Vec<String>,
    errors: Vec<String>,
    /// Resources created this run, by lowercase IDF name. The model may
    /// have renamed them to avoid a clash with an existing object.
    resources: HashMap<String, Handle>,
}

impl ReverseTranslator {
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

    /// Translate into a fresh model. Only unattached managers result, since
    /// a fresh model has no nodes.
    pub fn translate(&mut self, idf: &IdfFile) -> Model {
        let mut model = Model::new();
        self.translate_into(idf, &mut model);
        model
    }

    /// Translate into an existing model and return the handles created.
    #[instrument(skip_all, fields(objects = idf.len()))]
    pub fn translate_into(&mut self, idf: &IdfFile, model: &mut Model) -> Vec<Handle> {
        self.warnings.clear();
        self.errors.clear();
        self.resources.clear();
        let mut created = Vec::new();

        for obj in idf.objects() {
            let result = if obj.is_type(schedule_constant::OBJECT_TYPE) {
                self.translate_schedule(obj, model).map(Some)
            } else if is_curve(obj) {
                self.translate_curve(obj, model).map(Some)
            } else {
                Ok(None)
            };
            self.collect(result, &mut created);
        }

        for obj in idf.objects() {
            let result = match obj.object_type().to_ascii_lowercase().as_str() {
                t if t.starts_with("setpointmanager:") => self.translate_setpoint_manager(obj, model),
                t if t == heat_exchanger_air_to_air_sensible_and_latent::OBJECT_TYPE.to_ascii_lowercase() => {
                    self.translate_heat_exchanger(obj, model).map(Some)
                }
                _ => {
                    let handled = obj.is_type(schedule_constant::OBJECT_TYPE)
                        || is_curve(obj)
                        || SILENT.iter().any(|t| obj.is_type(t));
                    if !handled {
                        self.warn(format!("{} '{}' is not translated", obj.object_type(), obj.name().unwrap_or_default()));
                    }
                    Ok(None)
                }
            };
            self.collect(result, &mut created);
        }

        info!(
            created = created.len(),
            warnings = self.warnings.len(),
            errors = self.errors.len(),
            "IDF translated to model"
        );
        created
    }

    fn collect(&mut self, result: Result<Option<Handle>, IdfError>, created: &mut Vec<Handle>) {
        match result {
            Ok(Some(handle)) => created.push(handle),
            Ok(None) => {}
            Err(e) => {
                tracing::error!("{e}");
                self.errors.push(e.to_string());
            }
        }
    }

    // -----------------------------------------------------------------------
    // Field helpers
    // -----------------------------------------------------------------------

    fn require_name<'a>(&self, obj: &'a IdfObject) -> Result<&'a str, IdfError> {
        obj.name().ok_or_else(|| IdfError::MissingField {
            object_type: obj.object_type().to_owned(),
            name: String::new(),
            field: label(obj.object_type(), 0),
        })
    }

    /// Numeric field or `default`. Bad numbers are warned about.
    fn number(&mut self, obj: &IdfObject, index: usize, default: f64) -> f64 {
        self.optional(obj, index).unwrap_or(default)
    }

    fn optional(&mut self, obj: &IdfObject, index: usize) -> Option<f64> {
        match obj.get_f64(index) {
            Ok(value) => value,
            Err(e) => {
                self.warn(format!("{e}; using the default"));
                None
            }
        }
    }

    fn yes_no(&self, obj: &IdfObject, index: usize, default: bool) -> bool {
        match obj.get_string(index) {
            Some(v) => v.eq_ignore_ascii_case("yes"),
            None => default,
        }
    }

    /// Handle of the object named by field `index`, if it has the wanted kind.
    fn reference(
        &mut self,
        model: &Model,
        obj: &IdfObject,
        index: usize,
        expected: &str,
        matches: impl Fn(&ObjectKind) -> bool,
    ) -> Option<Handle> {
        let name = obj.get_string(index)?;
        let target = match self.resources.get(&name.to_lowercase()) {
            Some(handle) => model.object(*handle),
            None => model.object_by_name(name),
        };
        match target {
            Some(target) if matches(target.kind()) => Some(target.handle()),
            _ => {
                self.warn(format!(
                    "{} '{}': {} '{name}' not found",
                    obj.object_type(),
                    obj.name().unwrap_or_default(),
                    expected
                ));
                None
            }
        }
    }

    fn node(&mut self, model: &Model, obj: &IdfObject, index: usize) -> Option<Handle> {
        self.reference(model, obj, index, "node", |k| matches!(k, ObjectKind::Node))
    }

    fn schedule(&mut self, model: &Model, obj: &IdfObject, index: usize) -> Option<Handle> {
        self.reference(model, obj, index, "schedule", |k| matches!(k, ObjectKind::Schedule(_)))
    }

    // -----------------------------------------------------------------------
    // Resources
    // -----------------------------------------------------------------------

    fn translate_schedule(&mut self, obj: &IdfObject, model: &mut Model) -> Result<Handle, IdfError> {
        use schedule_constant as f;
        let name = self.require_name(obj)?;
        let schedule_type = obj
            .get_string(f::SCHEDULE_TYPE_LIMITS)
            .map(ScheduleType::from_limits_name)
            .unwrap_or(ScheduleType::Any);
        let value = self.number(obj, f::HOURLY_VALUE, 0.0);
        let handle = model.add_schedule(name, Schedule::constant(schedule_type, value));
        self.resources.insert(name.to_lowercase(), handle);
        Ok(handle)
    }

    fn translate_curve(&mut self, obj: &IdfObject, model: &mut Model) -> Result<Handle, IdfError> {
        let name = self.require_name(obj)?;
        let curve = if obj.is_type(curve_cubic::OBJECT_TYPE) {
            use curve_cubic as f;
            Curve::Cubic {
                coefficients: [
                    self.number(obj, f::C1, 0.0),
                    self.number(obj, f::C2, 0.0),
                    self.number(obj, f::C3, 0.0),
                    self.number(obj, f::C4, 0.0),
                ],
                minimum_x: self.number(obj, f::MINIMUM_X, 0.0),
                maximum_x: self.number(obj, f::MAXIMUM_X, 1.0),
            }
        } else if obj.is_type(curve_quadratic::OBJECT_TYPE) {
            use curve_quadratic as f;
            Curve::Quadratic {
                coefficients: [
                    self.number(obj, f::C1, 0.0),
                    self.number(obj, f::C2, 0.0),
                    self.number(obj, f::C3, 0.0),
                ],
                minimum_x: self.number(obj, f::MINIMUM_X, 0.0),
                maximum_x: self.number(obj, f::MAXIMUM_X, 1.0),
            }
        } else {
            use curve_biquadratic as f;
            Curve::Biquadratic {
                coefficients: [
                    self.number(obj, f::C1, 0.0),
                    self.number(obj, f::C2, 0.0),
                    self.number(obj, f::C3, 0.0),
                    self.number(obj, f::C4, 0.0),
                    self.number(obj, f::C5, 0.0),
                    self.number(obj, f::C6, 0.0),
                ],
                minimum_x: self.number(obj, f::MINIMUM_X, 0.0),
                maximum_x: self.number(obj, f::MAXIMUM_X, 1.0),
                minimum_y: self.number(obj, f::MINIMUM_Y, 0.0),
                maximum_y: self.number(obj, f::MAXIMUM_Y, 1.0),
            }
        };
        let handle = model.add_curve(name, curve);
        self.resources.insert(name.to_lowercase(), handle);
        Ok(handle)
    }

    // -----------------------------------------------------------------------
    // Setpoint managers
    // -----------------------------------------------------------------------

    fn translate_setpoint_manager(&mut self, obj: &IdfObject, model: &mut Model) -> Result<Option<Handle>, IdfError> {
        let name = self.require_name(obj)?;

        // (kind, control variable field, setpoint node field)
        let (kind, cv_index, node_index) = if obj.is_type(setpoint_manager_scheduled::OBJECT_TYPE) {
            use setpoint_manager_scheduled as f;
            let schedule = self.schedule(model, obj, f::SCHEDULE);
            (SpmKind::Scheduled { schedule }, f::CONTROL_VARIABLE, f::SETPOINT_NODE)
        } else if obj.is_type(setpoint_manager_single_zone_reheat::OBJECT_TYPE) {
            use setpoint_manager_single_zone_reheat as f;
            let control_zone =
                self.reference(model, obj, f::CONTROL_ZONE, "thermal zone", |k| matches!(k, ObjectKind::ThermalZone(_)));
            let kind = SpmKind::SingleZoneReheat {
                minimum_supply_air_temperature: self.number(obj, f::MINIMUM_SUPPLY_AIR_TEMPERATURE, -99.0),
                maximum_supply_air_temperature: self.number(obj, f::MAXIMUM_SUPPLY_AIR_TEMPERATURE, 99.0),
                control_zone,
            };
            (kind, f::CONTROL_VARIABLE, f::SETPOINT_NODE)
        } else if obj.is_type(setpoint_manager_mixed_air::OBJECT_TYPE) {
            use setpoint_manager_mixed_air as f;
            let kind = SpmKind::MixedAir {
                reference_setpoint_node: self.node(model, obj, f::REFERENCE_SETPOINT_NODE),
                fan_inlet_node: self.node(model, obj, f::FAN_INLET_NODE),
                fan_outlet_node: self.node(model, obj, f::FAN_OUTLET_NODE),
            };
            (kind, f::CONTROL_VARIABLE, f::SETPOINT_NODE)
        } else if obj.is_type(setpoint_manager_outdoor_air_reset::OBJECT_TYPE) {
            use setpoint_manager_outdoor_air_reset as f;
            let defaults = OutdoorAirReset::default();
            let reset = OutdoorAirReset {
                setpoint_at_outdoor_low_temperature: self.number(
                    obj,
                    f::SETPOINT_AT_OUTDOOR_LOW,
                    defaults.setpoint_at_outdoor_low_temperature,
                ),
                outdoor_low_temperature: self.number(obj, f::OUTDOOR_LOW, defaults.outdoor_low_temperature),
                setpoint_at_outdoor_high_temperature: self.number(
                    obj,
                    f::SETPOINT_AT_OUTDOOR_HIGH,
                    defaults.setpoint_at_outdoor_high_temperature,
                ),
                outdoor_high_temperature: self.number(obj, f::OUTDOOR_HIGH, defaults.outdoor_high_temperature),
                schedule: self.schedule(model, obj, f::SCHEDULE),
                setpoint_at_outdoor_low_temperature_2: self.optional(obj, f::SETPOINT_AT_OUTDOOR_LOW_2),
                outdoor_low_temperature_2: self.optional(obj, f::OUTDOOR_LOW_2),
                setpoint_at_outdoor_high_temperature_2: self.optional(obj, f::SETPOINT_AT_OUTDOOR_HIGH_2),
                outdoor_high_temperature_2: self.optional(obj, f::OUTDOOR_HIGH_2),
            };
            (SpmKind::OutdoorAirReset(reset), f::CONTROL_VARIABLE, f::SETPOINT_NODE)
        } else if obj.is_type(setpoint_manager_follow_outdoor_air_temperature::OBJECT_TYPE) {
            use setpoint_manager_follow_outdoor_air_temperature as f;
            let reference_temperature_type = obj
                .get_string(f::REFERENCE_TEMPERATURE_TYPE)
                .and_then(ReferenceTemperatureType::from_name)
                .unwrap_or(ReferenceTemperatureType::OutdoorAirWetBulb);
            let kind = SpmKind::FollowOutdoorAirTemperature {
                reference_temperature_type,
                offset_temperature_difference: self.number(obj, f::OFFSET_TEMPERATURE_DIFFERENCE, 0.0),
                maximum_setpoint_temperature: self.number(obj, f::MAXIMUM_SETPOINT_TEMPERATURE, 80.0),
                minimum_setpoint_temperature: self.number(obj, f::MINIMUM_SETPOINT_TEMPERATURE, 6.0),
            };
            (kind, f::CONTROL_VARIABLE, f::SETPOINT_NODE)
        } else if obj.is_type(setpoint_manager_warmest::OBJECT_TYPE) {
            use setpoint_manager_warmest as f;
            let kind = SpmKind::Warmest {
                minimum_setpoint_temperature: self.number(obj, f::MINIMUM_SETPOINT_TEMPERATURE, 12.2),
                maximum_setpoint_temperature: self.number(obj, f::MAXIMUM_SETPOINT_TEMPERATURE, 15.6),
            };
            (kind, f::CONTROL_VARIABLE, f::SETPOINT_NODE)
        } else if obj.is_type(setpoint_manager_warmest_temperature_flow::OBJECT_TYPE) {
            use setpoint_manager_warmest_temperature_flow as f;
            let strategy = obj
                .get_string(f::STRATEGY)
                .and_then(WarmestStrategy::from_name)
                .unwrap_or(WarmestStrategy::TemperatureFirst);
            let kind = SpmKind::WarmestTemperatureFlow {
                minimum_setpoint_temperature: self.number(obj, f::MINIMUM_SETPOINT_TEMPERATURE, 12.2),
                maximum_setpoint_temperature: self.number(obj, f::MAXIMUM_SETPOINT_TEMPERATURE, 18.0),
                strategy,
                minimum_turndown_ratio: self.number(obj, f::MINIMUM_TURNDOWN_RATIO, 0.2),
            };
            (kind, f::CONTROL_VARIABLE, f::SETPOINT_NODE)
        } else {
            self.warn(format!("{} '{name}' is not translated", obj.object_type()));
            return Ok(None);
        };

        let mut spm = SetpointManager::new(kind);
        if let Some(text) = obj.get_string(cv_index) {
            match ControlVariable::from_name(text) {
                Some(cv) => match spm.clone().with_control_variable(cv) {
                    Ok(with_cv) => spm = with_cv,
                    Err(e) => self.warn(format!("{} '{name}': {e}", obj.object_type())),
                },
                None => self.warn(format!("{} '{name}': unknown control variable '{text}'", obj.object_type())),
            }
        }

        let handle = model.add_setpoint_manager(name, spm);
        debug!(spm = %handle, %name, "setpoint manager read");

        if let Some(node) = self.node(model, obj, node_index) {
            if let Err(e) = model.add_setpoint_manager_to_node(handle, node) {
                self.warn(format!("{} '{name}' left unattached: {e}", obj.object_type()));
            }
        } else if obj.get_string(node_index).is_none() {
            self.warn(format!("{} '{name}' has no setpoint node", obj.object_type()));
        }
        Ok(Some(handle))
    }

    // -----------------------------------------------------------------------
    // Heat exchanger
    // -----------------------------------------------------------------------

    fn translate_heat_exchanger(&mut self, obj: &IdfObject, model: &mut Model) -> Result<Handle, IdfError> {
        use heat_exchanger_air_to_air_sensible_and_latent as f;
        let name = self.require_name(obj)?;
        let d = HeatExchangerAirToAir::default();
        let heat_exchanger_type = match obj.get_string(f::HEAT_EXCHANGER_TYPE) {
            Some(t) if t.eq_ignore_ascii_case("rotary") => HeatExchangerType::Rotary,
            _ => HeatExchangerType::Plate,
        };
        let hx = HeatExchangerAirToAir {
            availability_schedule: self.schedule(model, obj, f::AVAILABILITY_SCHEDULE),
            nominal_supply_air_flow_rate: self.optional(obj, f::NOMINAL_SUPPLY_AIR_FLOW_RATE),
            sensible_effectiveness_100_heating: self.number(
                obj,
                f::SENSIBLE_EFFECTIVENESS_100_HEATING,
                d.sensible_effectiveness_100_heating,
            ),
            latent_effectiveness_100_heating: self.number(
                obj,
                f::LATENT_EFFECTIVENESS_100_HEATING,
                d.latent_effectiveness_100_heating,
            ),
            sensible_effectiveness_75_heating: self.number(
                obj,
                f::SENSIBLE_EFFECTIVENESS_75_HEATING,
                d.sensible_effectiveness_75_heating,
            ),
            latent_effectiveness_75_heating: self.number(
                obj,
                f::LATENT_EFFECTIVENESS_75_HEATING,
                d.latent_effectiveness_75_heating,
            ),
            sensible_effectiveness_100_cooling: self.number(
                obj,
                f::SENSIBLE_EFFECTIVENESS_100_COOLING,
                d.sensible_effectiveness_100_cooling,
            ),
            latent_effectiveness_100_cooling: self.number(
                obj,
                f::LATENT_EFFECTIVENESS_100_COOLING,
                d.latent_effectiveness_100_cooling,
            ),
            sensible_effectiveness_75_cooling: self.number(
                obj,
                f::SENSIBLE_EFFECTIVENESS_75_COOLING,
                d.sensible_effectiveness_75_cooling,
            ),
            latent_effectiveness_75_cooling: self.number(
                obj,
                f::LATENT_EFFECTIVENESS_75_COOLING,
                d.latent_effectiveness_75_cooling,
            ),
            nominal_electric_power: self.number(obj, f::NOMINAL_ELECTRIC_POWER, d.nominal_electric_power),
            supply_air_outlet_temperature_control: self.yes_no(
                obj,
                f::SUPPLY_AIR_OUTLET_TEMPERATURE_CONTROL,
                d.supply_air_outlet_temperature_control,
            ),
            heat_exchanger_type,
            frost_control_type: obj
                .get_string(f::FROST_CONTROL_TYPE)
                .map(str::to_owned)
                .unwrap_or(d.frost_control_type),
            threshold_temperature: self.number(obj, f::THRESHOLD_TEMPERATURE, d.threshold_temperature),
            initial_defrost_time_fraction: self.optional(obj, f::INITIAL_DEFROST_TIME_FRACTION),
            rate_of_defrost_time_fraction_increase: self.optional(obj, f::RATE_OF_DEFROST_TIME_FRACTION_INCREASE),
            economizer_lockout: self.yes_no(obj, f::ECONOMIZER_LOCKOUT, d.economizer_lockout),
        };
        Ok(model.add_component(name, HvacComponent::HeatExchangerAirToAir(hx)))
    }
}

fn is_curve(obj: &IdfObject) -> bool {
    obj.is_type(curve_cubic::OBJECT_TYPE)
        || obj.is_type(curve_quadratic::OBJECT_TYPE)
        || obj.is_type(curve_biquadratic::OBJECT_TYPE)
}

// ============================================================
// Unit tests
// ============================================================
#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> IdfFile {
        IdfFile::parse(text).unwrap()
    }

    #[test]
    fn schedule_and_curve_are_read() {
        let idf = parse(
            "Schedule:Constant,Deck,Temperature,12.8;\n\
             Curve:Quadratic,PLR,0.2,0.4,0.4,0,1;",
        );
        let mut translator = ReverseTranslator::new();
        let model = translator.translate(&idf);

        let deck = model.object_by_name("Deck").unwrap().handle();
        let schedule = model.schedule(deck).unwrap();
        assert_eq!(schedule.schedule_type, ScheduleType::Temperature);
        assert_eq!(schedule.value, 12.8);
        let plr = model.object_by_name("PLR").unwrap().handle();
        assert_eq!(model.curve(plr).unwrap().coefficients(), &[0.2, 0.4, 0.4]);
        assert!(translator.warnings().is_empty());
    }

    #[test]
    fn manager_without_matching_node_stays_unattached() {
        let idf = parse(
            "Schedule:Constant,Deck,Temperature,12.8;\n\
             SetpointManager:Scheduled,Deck SPM,Temperature,Deck,Nowhere Node;",
        );
        let mut translator = ReverseTranslator::new();
        let model = translator.translate(&idf);

        let spm = model.object_by_name("Deck SPM").unwrap().handle();
        let spm = model.setpoint_manager(spm).unwrap();
        assert_eq!(spm.setpoint_node(), None);
        assert!(matches!(spm.kind(), SpmKind::Scheduled { schedule: Some(_) }));
        assert_eq!(translator.warnings().len(), 1);
    }

    #[test]
    fn bad_number_falls_back_to_default() {
        let idf = parse("SetpointManager:Warmest,W,Temperature,Loop,abc,16,MaximumTemperature,;");
        let mut translator = ReverseTranslator::new();
        let model = translator.translate(&idf);

        let spm = model.object_by_name("W").unwrap().handle();
        let SpmKind::Warmest { minimum_setpoint_temperature, maximum_setpoint_temperature } =
            model.setpoint_manager(spm).unwrap().kind().clone()
        else {
            panic!("expected a warmest manager");
        };
        assert_eq!(minimum_setpoint_temperature, 12.2);
        assert_eq!(maximum_setpoint_temperature, 16.0);
        assert!(translator.warnings().iter().any(|w| w.contains("abc")));
    }

    #[test]
    fn unknown_types_warn_and_nameless_objects_error() {
        let idf = parse("Version,9.6;\nBuilding,HQ;\nCurve:Cubic,,1,0,0,0,0,1;");
        let mut translator = ReverseTranslator::new();
        let model = translator.translate(&idf);

        assert!(model.is_empty());
        assert_eq!(translator.warnings().len(), 1);
        assert_eq!(translator.errors().len(), 1);
    }

    #[test]
    fn heat_exchanger_is_created_unconnected() {
        let idf = parse(
            "HeatExchanger:AirToAir:SensibleAndLatent,ERV,,Autosize,0.7,0.6,0.75,0.65,0.7,0.6,0.75,0.65,\
             OA In,OA Out,Relief In,Relief Out,50,No,Rotary,None,1.7,,,Yes;",
        );
        let model = ReverseTranslator::new().translate(&idf);

        let erv = model.object_by_name("ERV").unwrap().handle();
        let HvacComponent::HeatExchangerAirToAir(hx) = model.component(erv).unwrap() else {
            panic!("expected a heat exchanger");
        };
        assert_eq!(hx.nominal_supply_air_flow_rate, None);
        assert_eq!(hx.sensible_effectiveness_100_heating, 0.7);
        assert_eq!(hx.nominal_electric_power, 50.0);
        assert!(!hx.supply_air_outlet_temperature_control);
        assert_eq!(hx.heat_exchanger_type, HeatExchangerType::Rotary);
        assert!(model.connections().is_empty());
    }
}
