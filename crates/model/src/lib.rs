//! `model` crate — HVAC object arena, typed connections, loops, setpoint
//! managers, topology validation and template systems.

pub mod objects;
pub mod connection;
pub mod components;
pub mod setpoint;
pub mod resources;
pub mod loops;
pub mod error;
pub mod model;
pub mod paths;
pub mod hvac;
pub mod topology;
pub mod templates;

pub use objects::{Handle, ModelObject, ObjectKind};
pub use connection::{Connection, Port};
pub use components::HvacComponent;
pub use setpoint::{ControlVariable, SetpointManager, SpmKind};
pub use resources::{Curve, Schedule, ScheduleType};
pub use loops::{AirLoopHvac, PlantLoop, OutdoorAirSystem, ThermalZone, NodeLocation};
pub use error::ModelError;
pub use model::Model;
pub use topology::{validate_loop, validate_model};

#[cfg(test)]
mod model_tests;
