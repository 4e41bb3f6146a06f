//! The object arena.
//!
//! `Model` owns every object, the connection index and the node → setpoint
//! manager multimap. All mutations go through it so the derived indices
//! never drift from the objects.

use std::collections::HashMap;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::components::HvacComponent;
use crate::connection::{Connection, ConnectionIndex, Port};
use crate::error::ModelError;
use crate::loops::{AirLoopHvac, NodeLocation, OutdoorAirSystem, PlantLoop, ThermalZone};
use crate::objects::{Handle, ModelObject, ObjectKind};
use crate::paths::wrong_kind;
use crate::resources::{Curve, Schedule, ScheduleType};
use crate::setpoint::{ControlVariable, SetpointManager, SpmKind};

/// Name of the shared on/off schedule.
pub const ALWAYS_ON_SCHEDULE: &str = "Always On Discrete";

// ---------------------------------------------------------------------------
// Persistence format
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, Deserialize)]
struct ModelDocument {
    objects: Vec<ModelObject>,
    connections: Vec<Connection>,
}

// ---------------------------------------------------------------------------
// Model
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct Model {
    objects: IndexMap<Handle, ModelObject>,
    pub(crate) connections: ConnectionIndex,
    names: HashMap<String, Handle>,
    setpoint_index: HashMap<Handle, Vec<Handle>>,
}

impl Model {
    pub fn new() -> Self {
        Self::default()
    }

    // -----------------------------------------------------------------------
    // Lookup
    // -----------------------------------------------------------------------

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn contains(&self, handle: Handle) -> bool {
        self.objects.contains_key(&handle)
    }

    pub fn object(&self, handle: Handle) -> Option<&ModelObject> {
        self.objects.get(&handle)
    }

    /// Objects in insertion order.
    pub fn objects(&self) -> impl Iterator<Item = &ModelObject> {
        self.objects.values()
    }

    pub(crate) fn kind_of(&self, handle: Handle) -> Option<&ObjectKind> {
        self.objects.get(&handle).map(|o| &o.kind)
    }

    fn kind_mut(&mut self, handle: Handle) -> Result<&mut ObjectKind, ModelError> {
        self.objects
            .get_mut(&handle)
            .map(|o| &mut o.kind)
            .ok_or(ModelError::NotInModel(handle))
    }

    fn existing(&self, handle: Handle) -> Result<&ModelObject, ModelError> {
        self.objects.get(&handle).ok_or(ModelError::NotInModel(handle))
    }

    /// Case-insensitive lookup by name.
    pub fn object_by_name(&self, name: &str) -> Option<&ModelObject> {
        self.names
            .get(&name.to_lowercase())
            .and_then(|h| self.objects.get(h))
    }

    pub fn name(&self, handle: Handle) -> Option<&str> {
        self.objects.get(&handle).map(|o| o.name.as_str())
    }

    /// Handles of every object whose kind matches `pred`, in insertion order.
    pub fn handles_where(&self, pred: impl Fn(&ObjectKind) -> bool) -> Vec<Handle> {
        self.objects
            .values()
            .filter(|o| pred(&o.kind))
            .map(|o| o.handle)
            .collect()
    }

    pub fn air_loops(&self) -> Vec<Handle> {
        self.handles_where(|k| matches!(k, ObjectKind::AirLoop(_)))
    }

    pub fn plant_loops(&self) -> Vec<Handle> {
        self.handles_where(|k| matches!(k, ObjectKind::PlantLoop(_)))
    }

    pub fn thermal_zones(&self) -> Vec<Handle> {
        self.handles_where(|k| matches!(k, ObjectKind::ThermalZone(_)))
    }

    pub fn setpoint_manager_handles(&self) -> Vec<Handle> {
        self.handles_where(|k| matches!(k, ObjectKind::SetpointManager(_)))
    }

    pub fn connections(&self) -> &ConnectionIndex {
        &self.connections
    }

    // -----------------------------------------------------------------------
    // Typed access
    // -----------------------------------------------------------------------

    pub fn component(&self, handle: Handle) -> Result<&HvacComponent, ModelError> {
        match &self.existing(handle)?.kind {
            ObjectKind::Component(c) => Ok(c),
            other => Err(wrong_kind(handle, "component", other)),
        }
    }

    /// Edit a component's parameters in place.
    ///
    /// # Errors
    /// [`ModelError::KindChanged`] if `edit` turns it into another component
    /// type. The component is left as it was.
    pub fn edit_component(&mut self, handle: Handle, edit: impl FnOnce(&mut HvacComponent)) -> Result<(), ModelError> {
        let component = match self.kind_mut(handle)? {
            ObjectKind::Component(c) => c,
            other => return Err(wrong_kind(handle, "component", other)),
        };
        let before = component.clone();
        edit(&mut *component);
        if std::mem::discriminant(&before) != std::mem::discriminant(component) {
            let to = component.type_name();
            *component = before;
            return Err(ModelError::KindChanged { from: component.type_name(), to });
        }
        Ok(())
    }

    pub fn setpoint_manager(&self, handle: Handle) -> Result<&SetpointManager, ModelError> {
        match &self.existing(handle)?.kind {
            ObjectKind::SetpointManager(spm) => Ok(spm),
            other => Err(wrong_kind(handle, "setpoint manager", other)),
        }
    }

    pub(crate) fn setpoint_manager_mut(&mut self, handle: Handle) -> Result<&mut SetpointManager, ModelError> {
        match self.kind_mut(handle)? {
            ObjectKind::SetpointManager(spm) => Ok(spm),
            other => Err(wrong_kind(handle, "setpoint manager", other)),
        }
    }

    /// Edit a manager's parameters. The kind, setpoint node and control
    /// variable only change through the attachment protocol.
    ///
    /// # Errors
    /// [`ModelError::KindChanged`] if `edit` swaps the kind.
    pub fn edit_setpoint_manager(&mut self, handle: Handle, edit: impl FnOnce(&mut SpmKind)) -> Result<(), ModelError> {
        self.setpoint_manager_mut(handle)?.edit_kind(edit)
    }

    pub fn air_loop(&self, handle: Handle) -> Result<&AirLoopHvac, ModelError> {
        match &self.existing(handle)?.kind {
            ObjectKind::AirLoop(l) => Ok(l),
            other => Err(wrong_kind(handle, "air loop", other)),
        }
    }

    pub fn air_loop_mut(&mut self, handle: Handle) -> Result<&mut AirLoopHvac, ModelError> {
        match self.kind_mut(handle)? {
            ObjectKind::AirLoop(l) => Ok(l),
            other => Err(wrong_kind(handle, "air loop", other)),
        }
    }

    pub fn plant_loop(&self, handle: Handle) -> Result<&PlantLoop, ModelError> {
        match &self.existing(handle)?.kind {
            ObjectKind::PlantLoop(l) => Ok(l),
            other => Err(wrong_kind(handle, "plant loop", other)),
        }
    }

    pub fn plant_loop_mut(&mut self, handle: Handle) -> Result<&mut PlantLoop, ModelError> {
        match self.kind_mut(handle)? {
            ObjectKind::PlantLoop(l) => Ok(l),
            other => Err(wrong_kind(handle, "plant loop", other)),
        }
    }

    pub fn outdoor_air_system(&self, handle: Handle) -> Result<&OutdoorAirSystem, ModelError> {
        match &self.existing(handle)?.kind {
            ObjectKind::OutdoorAirSystem(oa) => Ok(oa),
            other => Err(wrong_kind(handle, "outdoor air system", other)),
        }
    }

    pub fn outdoor_air_system_mut(&mut self, handle: Handle) -> Result<&mut OutdoorAirSystem, ModelError> {
        match self.kind_mut(handle)? {
            ObjectKind::OutdoorAirSystem(oa) => Ok(oa),
            other => Err(wrong_kind(handle, "outdoor air system", other)),
        }
    }

    pub fn thermal_zone(&self, handle: Handle) -> Result<&ThermalZone, ModelError> {
        match &self.existing(handle)?.kind {
            ObjectKind::ThermalZone(z) => Ok(z),
            other => Err(wrong_kind(handle, "thermal zone", other)),
        }
    }

    pub fn thermal_zone_mut(&mut self, handle: Handle) -> Result<&mut ThermalZone, ModelError> {
        match self.kind_mut(handle)? {
            ObjectKind::ThermalZone(z) => Ok(z),
            other => Err(wrong_kind(handle, "thermal zone", other)),
        }
    }

    pub fn schedule(&self, handle: Handle) -> Result<&Schedule, ModelError> {
        match &self.existing(handle)?.kind {
            ObjectKind::Schedule(s) => Ok(s),
            other => Err(wrong_kind(handle, "schedule", other)),
        }
    }

    pub fn curve(&self, handle: Handle) -> Result<&Curve, ModelError> {
        match &self.existing(handle)?.kind {
            ObjectKind::Curve(c) => Ok(c),
            other => Err(wrong_kind(handle, "curve", other)),
        }
    }

    pub(crate) fn require_node(&self, handle: Handle) -> Result<(), ModelError> {
        match &self.existing(handle)?.kind {
            ObjectKind::Node => Ok(()),
            other => Err(wrong_kind(handle, "node", other)),
        }
    }

    // -----------------------------------------------------------------------
    // Names
    // -----------------------------------------------------------------------

    /// `base` if free, otherwise `base 1`, `base 2`, …
    pub fn unique_name(&self, base: &str) -> String {
        let base = base.trim();
        if !self.names.contains_key(&base.to_lowercase()) {
            return base.to_owned();
        }
        (1..)
            .map(|i| format!("{base} {i}"))
            .find(|candidate| !self.names.contains_key(&candidate.to_lowercase()))
            .unwrap_or_else(|| base.to_owned())
    }

    /// Rename an object and return the name actually given.
    pub fn set_name(&mut self, handle: Handle, name: &str) -> Result<String, ModelError> {
        let current = self.existing(handle)?.name.clone();
        if current.eq_ignore_ascii_case(name.trim()) {
            return Ok(current);
        }
        let unique = self.unique_name(name);
        self.names.remove(&current.to_lowercase());
        self.names.insert(unique.to_lowercase(), handle);
        if let Some(obj) = self.objects.get_mut(&handle) {
            obj.name = unique.clone();
        }
        Ok(unique)
    }

    // -----------------------------------------------------------------------
    // Insertion
    // -----------------------------------------------------------------------

    pub(crate) fn insert_object(&mut self, name: &str, kind: ObjectKind) -> Handle {
        let handle = Handle::new();
        let name = self.unique_name(name);
        debug!(%handle, %name, kind = kind.kind_name(), "adding object");
        self.names.insert(name.to_lowercase(), handle);
        self.objects.insert(handle, ModelObject { handle, name, kind });
        handle
    }

    pub fn add_node(&mut self, name: &str) -> Handle {
        self.insert_object(name, ObjectKind::Node)
    }

    pub fn add_component(&mut self, name: &str, component: HvacComponent) -> Handle {
        self.insert_object(name, ObjectKind::Component(component))
    }

    /// Add an unattached setpoint manager.
    pub fn add_setpoint_manager(&mut self, name: &str, mut spm: SetpointManager) -> Handle {
        spm.set_setpoint_node(None);
        self.insert_object(name, ObjectKind::SetpointManager(spm))
    }

    pub fn add_schedule(&mut self, name: &str, schedule: Schedule) -> Handle {
        self.insert_object(name, ObjectKind::Schedule(schedule))
    }

    pub fn add_curve(&mut self, name: &str, curve: Curve) -> Handle {
        self.insert_object(name, ObjectKind::Curve(curve))
    }

    pub fn add_thermal_zone(&mut self, name: &str, zone: ThermalZone) -> Handle {
        self.insert_object(name, ObjectKind::ThermalZone(zone))
    }

    /// The shared always-on schedule, created on first use.
    pub fn always_on_schedule(&mut self) -> Handle {
        if let Some(obj) = self.object_by_name(ALWAYS_ON_SCHEDULE) {
            if obj.as_schedule().is_some() {
                return obj.handle;
            }
        }
        self.add_schedule(ALWAYS_ON_SCHEDULE, Schedule::constant(ScheduleType::OnOff, 1.0))
    }

    pub(crate) fn connect(
        &mut self,
        source: Handle,
        source_port: Port,
        target: Handle,
        target_port: Port,
    ) -> Result<(), ModelError> {
        self.connections
            .connect(Connection::new(source, source_port, target, target_port))
    }

    // -----------------------------------------------------------------------
    // References
    // -----------------------------------------------------------------------

    /// Objects whose resource pointers include `target`.
    pub fn sources_of(&self, target: Handle) -> Vec<Handle> {
        self.objects
            .values()
            .filter(|o| o.kind.references().contains(&target))
            .map(|o| o.handle)
            .collect()
    }

    // -----------------------------------------------------------------------
    // Setpoint manager attachment
    // -----------------------------------------------------------------------

    /// Attach `spm` to `node`.
    ///
    /// The node must be on an air loop supply side, on an outdoor air stream
    /// (not the outboard node) or, for scheduled / outdoor air reset / follow
    /// outdoor air managers, on a plant loop supply side. Any other manager on
    /// the node with the same control variable is removed from the model.
    ///
    /// # Errors
    /// Nothing is changed on error.
    /// - [`ModelError::NotInModel`] if either handle belongs elsewhere.
    /// - [`ModelError::WrongKind`] if the handles are not a manager and a node.
    /// - [`ModelError::IncompatibleSetpointManager`] for a disallowed location.
    #[instrument(skip(self), fields(spm = %spm, node = %node))]
    pub fn add_setpoint_manager_to_node(&mut self, spm: Handle, node: Handle) -> Result<(), ModelError> {
        let manager = self.setpoint_manager(spm)?.clone();
        self.require_node(node)?;

        let location = self.node_location(node);
        let compatible = match location {
            NodeLocation::AirSupply { .. } => true,
            NodeLocation::OutdoorAir { outboard, .. } => !outboard,
            NodeLocation::PlantSupply { .. } => manager.kind().allows_plant_supply(),
            _ => false,
        };
        if !compatible {
            warn!("{} cannot control a node on the {}", manager.kind().name(), location);
            return Err(ModelError::IncompatibleSetpointManager {
                spm,
                node,
                location: location.to_string(),
            });
        }

        if let Some(existing) = self.setpoint_manager_for(node, manager.control_variable()) {
            if existing != spm {
                info!(evicted = %existing, "replacing setpoint manager with the same control variable");
                self.erase(existing);
            }
        }

        self.attach_setpoint_manager(spm, node);

        if matches!(manager.kind(), SpmKind::MixedAir { .. }) {
            if let Some(air_loop) = self.air_loop_of_node(node) {
                self.refresh_mixed_air_managers(air_loop)?;
            }
        }
        Ok(())
    }

    /// Clear a manager's setpoint node without removing it.
    pub fn detach_setpoint_manager(&mut self, spm: Handle) -> Result<(), ModelError> {
        self.setpoint_manager(spm)?;
        self.unindex_setpoint_manager(spm);
        if let Ok(manager) = self.setpoint_manager_mut(spm) {
            manager.set_setpoint_node(None);
        }
        Ok(())
    }

    /// Change the control variable. On an attached manager any other manager
    /// on the node with the new control variable is evicted.
    pub fn set_control_variable(&mut self, spm: Handle, cv: ControlVariable) -> Result<(), ModelError> {
        let manager = self.setpoint_manager(spm)?;
        manager.check_control_variable(cv)?;
        if let Some(node) = manager.setpoint_node() {
            if let Some(existing) = self.setpoint_manager_for(node, cv) {
                if existing != spm {
                    self.erase(existing);
                }
            }
        }
        self.setpoint_manager_mut(spm)?.set_control_variable_unchecked(cv);
        Ok(())
    }

    /// Every manager currently controlling `node`.
    pub fn setpoint_managers(&self, node: Handle) -> Vec<Handle> {
        self.setpoint_index.get(&node).cloned().unwrap_or_default()
    }

    /// The manager controlling `cv` at `node`, if any.
    pub fn setpoint_manager_for(&self, node: Handle, cv: ControlVariable) -> Option<Handle> {
        self.setpoint_index.get(&node)?.iter().copied().find(|h| {
            self.setpoint_manager(*h)
                .map(|m| m.control_variable() == cv)
                .unwrap_or(false)
        })
    }

    fn attach_setpoint_manager(&mut self, spm: Handle, node: Handle) {
        self.unindex_setpoint_manager(spm);
        if let Ok(manager) = self.setpoint_manager_mut(spm) {
            manager.set_setpoint_node(Some(node));
        }
        self.setpoint_index.entry(node).or_default().push(spm);
    }

    fn unindex_setpoint_manager(&mut self, spm: Handle) {
        let node = self.setpoint_manager(spm).ok().and_then(|m| m.setpoint_node());
        if let Some(node) = node {
            if let Some(list) = self.setpoint_index.get_mut(&node) {
                list.retain(|h| *h != spm);
                if list.is_empty() {
                    self.setpoint_index.remove(&node);
                }
            }
        }
    }

    // -----------------------------------------------------------------------
    // Erasure
    // -----------------------------------------------------------------------

    /// Drop one object with its connections, index entries and every pointer
    /// to it. A node's managers go first.
    pub(crate) fn erase(&mut self, handle: Handle) {
        if matches!(self.kind_of(handle), Some(ObjectKind::Node)) {
            for spm in self.setpoint_managers(handle) {
                self.erase(spm);
            }
        }
        if matches!(self.kind_of(handle), Some(ObjectKind::SetpointManager(_))) {
            self.unindex_setpoint_manager(handle);
        }
        self.connections.disconnect_all(handle);
        if let Some(obj) = self.objects.shift_remove(&handle) {
            debug!(%handle, name = %obj.name, "removed object");
            self.names.remove(&obj.name.to_lowercase());
        }
        for obj in self.objects.values_mut() {
            obj.kind.clear_reference(handle);
        }
    }

    // -----------------------------------------------------------------------
    // Cloning
    // -----------------------------------------------------------------------

    /// Copy an object's data under a new handle and name, without
    /// connections. A cloned setpoint manager has no setpoint node, cloned
    /// zone equipment has no zone and a cloned VAV reheat terminal gets its
    /// own copy of the reheat coil.
    pub fn clone_object(&mut self, handle: Handle) -> Result<Handle, ModelError> {
        let obj = self.existing(handle)?.clone();
        let mut kind = match obj.kind {
            ObjectKind::Node
            | ObjectKind::Component(_)
            | ObjectKind::SetpointManager(_)
            | ObjectKind::ThermalZone(_)
            | ObjectKind::Schedule(_)
            | ObjectKind::Curve(_) => obj.kind,
            _ => return Err(ModelError::CannotClone(handle)),
        };

        match &mut kind {
            ObjectKind::SetpointManager(spm) => spm.set_setpoint_node(None),
            ObjectKind::Component(c) if c.is_zone_equipment() => c.set_thermal_zone(None),
            ObjectKind::Component(HvacComponent::AirTerminalVavReheat(t)) => {
                if let Some(coil) = t.reheat_coil {
                    t.reheat_coil = Some(self.clone_object(coil)?);
                }
            }
            _ => {}
        }
        Ok(self.insert_object(&obj.name, kind))
    }

    // -----------------------------------------------------------------------
    // Persistence
    // -----------------------------------------------------------------------

    pub fn to_json(&self) -> Result<String, ModelError> {
        let doc = ModelDocument {
            objects: self.objects.values().cloned().collect(),
            connections: self.connections.all(),
        };
        Ok(serde_json::to_string_pretty(&doc)?)
    }

    /// Load a document and rebuild the name, connection and setpoint indices.
    pub fn from_json(json: &str) -> Result<Self, ModelError> {
        let doc: ModelDocument = serde_json::from_str(json)?;
        let mut model = Model::new();

        for obj in doc.objects {
            let key = obj.name.to_lowercase();
            if model.names.contains_key(&key) {
                return Err(ModelError::InvalidDocument(format!("duplicate name '{}'", obj.name)));
            }
            if model.objects.contains_key(&obj.handle) {
                return Err(ModelError::InvalidDocument(format!("duplicate handle {}", obj.handle)));
            }
            model.names.insert(key, obj.handle);
            model.objects.insert(obj.handle, obj);
        }

        for conn in doc.connections {
            for end in [conn.source, conn.target] {
                if !model.contains(end) {
                    return Err(ModelError::InvalidDocument(format!(
                        "connection references unknown object {end}"
                    )));
                }
            }
            model.connections.connect(conn)?;
        }

        let attached: Vec<(Handle, Handle, ControlVariable)> = model
            .objects
            .values()
            .filter_map(|o| {
                let spm = o.as_setpoint_manager()?;
                Some((o.handle, spm.setpoint_node()?, spm.control_variable()))
            })
            .collect();
        for (spm, node, cv) in attached {
            model.require_node(node).map_err(|_| {
                ModelError::InvalidDocument(format!("setpoint manager {spm} points at non-node {node}"))
            })?;
            if model.setpoint_manager_for(node, cv).is_some() {
                return Err(ModelError::DuplicateControlVariable {
                    node,
                    control_variable: cv.as_str().to_owned(),
                });
            }
            model.setpoint_index.entry(node).or_default().push(spm);
        }

        info!(objects = model.len(), connections = model.connections.len(), "model loaded");
        Ok(model)
    }
}
