//! Handles and the object arena's element type.
//!
//! Every entity in a [`Model`](crate::Model) is a [`ModelObject`] identified
//! by a [`Handle`]. What the object *is* lives in its [`ObjectKind`].

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::components::HvacComponent;
use crate::loops::{AirLoopHvac, OutdoorAirSystem, PlantLoop, ThermalZone};
use crate::resources::{Curve, Schedule};
use crate::setpoint::SetpointManager;

// ---------------------------------------------------------------------------
// Handle
// ---------------------------------------------------------------------------

/// Opaque identity of a model object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Handle(Uuid);

impl Handle {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for Handle {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}}}", self.0)
    }
}

// ---------------------------------------------------------------------------
// ObjectKind
// ---------------------------------------------------------------------------

/// The typed payload of a model object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ObjectKind {
    Node,
    Splitter,
    Mixer,
    Component(HvacComponent),
    SetpointManager(SetpointManager),
    AirLoop(AirLoopHvac),
    PlantLoop(PlantLoop),
    OutdoorAirSystem(OutdoorAirSystem),
    ThermalZone(ThermalZone),
    Schedule(Schedule),
    Curve(Curve),
}

impl ObjectKind {
    /// Short, stable name of the kind, used in error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            ObjectKind::Node => "node",
            ObjectKind::Splitter => "splitter",
            ObjectKind::Mixer => "mixer",
            ObjectKind::Component(c) => c.type_name(),
            ObjectKind::SetpointManager(_) => "setpoint manager",
            ObjectKind::AirLoop(_) => "air loop",
            ObjectKind::PlantLoop(_) => "plant loop",
            ObjectKind::OutdoorAirSystem(_) => "outdoor air system",
            ObjectKind::ThermalZone(_) => "thermal zone",
            ObjectKind::Schedule(_) => "schedule",
            ObjectKind::Curve(_) => "curve",
        }
    }

    /// Handles of resources (schedules, curves, zones, child coils) this
    /// object points at. Connections are not included.
    pub fn references(&self) -> Vec<Handle> {
        match self {
            ObjectKind::Component(c) => c.references(),
            ObjectKind::SetpointManager(spm) => spm.kind().references(),
            ObjectKind::AirLoop(l) => l.availability_schedule.into_iter().collect(),
            ObjectKind::OutdoorAirSystem(oa) => oa.controller.references(),
            _ => Vec::new(),
        }
    }

    /// Clear every resource pointer equal to `target`.
    pub(crate) fn clear_reference(&mut self, target: Handle) {
        match self {
            ObjectKind::Component(c) => c.clear_reference(target),
            ObjectKind::SetpointManager(spm) => spm.kind_mut().clear_reference(target),
            ObjectKind::AirLoop(l) => {
                if l.availability_schedule == Some(target) {
                    l.availability_schedule = None;
                }
            }
            ObjectKind::OutdoorAirSystem(oa) => oa.controller.clear_reference(target),
            _ => {}
        }
    }
}

// ---------------------------------------------------------------------------
// ModelObject
// ---------------------------------------------------------------------------

/// One entry of the model arena.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelObject {
    pub(crate) handle: Handle,
    pub(crate) name: String,
    pub(crate) kind: ObjectKind,
}

impl ModelObject {
    pub fn handle(&self) -> Handle {
        self.handle
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &ObjectKind {
        &self.kind
    }

    pub fn as_component(&self) -> Option<&HvacComponent> {
        match &self.kind {
            ObjectKind::Component(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_setpoint_manager(&self) -> Option<&SetpointManager> {
        match &self.kind {
            ObjectKind::SetpointManager(spm) => Some(spm),
            _ => None,
        }
    }

    pub fn as_air_loop(&self) -> Option<&AirLoopHvac> {
        match &self.kind {
            ObjectKind::AirLoop(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_plant_loop(&self) -> Option<&PlantLoop> {
        match &self.kind {
            ObjectKind::PlantLoop(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_outdoor_air_system(&self) -> Option<&OutdoorAirSystem> {
        match &self.kind {
            ObjectKind::OutdoorAirSystem(oa) => Some(oa),
            _ => None,
        }
    }

    pub fn as_thermal_zone(&self) -> Option<&ThermalZone> {
        match &self.kind {
            ObjectKind::ThermalZone(z) => Some(z),
            _ => None,
        }
    }

    pub fn as_schedule(&self) -> Option<&Schedule> {
        match &self.kind {
            ObjectKind::Schedule(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_curve(&self) -> Option<&Curve> {
        match &self.kind {
            ObjectKind::Curve(c) => Some(c),
            _ => None,
        }
    }

    pub fn is_node(&self) -> bool {
        matches!(self.kind, ObjectKind::Node)
    }
}
