//! Building and editing loop topology: loop creation, component insertion,
//! plant and zone branches, and removal with splicing.

use tracing::{info, instrument, warn};

use crate::components::HvacComponent;
use crate::connection::{
    Connection, Port, BRANCH_BASE, INLET, MIXED_AIR, OUTDOOR_AIR, OUTLET, RELIEF_AIR, RETURN_AIR,
    SECONDARY_INLET, SECONDARY_OUTLET,
};
use crate::error::ModelError;
use crate::loops::{
    AirLoopHvac, ControllerOutdoorAir, NodeLocation, OutdoorAirSystem, PathSide, PlantLoop,
};
use crate::objects::{Handle, ObjectKind};
use crate::paths::wrong_kind;
use crate::setpoint::SpmKind;
use crate::Model;

const PORT_PAIRS: [(Port, Port); 2] = [(INLET, OUTLET), (SECONDARY_INLET, SECONDARY_OUTLET)];

impl Model {
    // -----------------------------------------------------------------------
    // Loop creation
    // -----------------------------------------------------------------------

    /// New air loop with an empty supply side and no zones.
    pub fn add_air_loop(&mut self, name: &str) -> Result<Handle, ModelError> {
        let name = self.unique_name(name);
        let supply_inlet = self.add_node(&format!("{name} Supply Inlet Node"));
        let supply_outlet = self.add_node(&format!("{name} Supply Outlet Node"));
        let demand_inlet = self.add_node(&format!("{name} Demand Inlet Node"));
        let demand_outlet = self.add_node(&format!("{name} Demand Outlet Node"));
        let splitter = self.insert_object(&format!("{name} Zone Splitter"), ObjectKind::Splitter);
        let mixer = self.insert_object(&format!("{name} Zone Mixer"), ObjectKind::Mixer);

        self.connect(supply_inlet, OUTLET, supply_outlet, INLET)?;
        self.connect(demand_inlet, OUTLET, splitter, INLET)?;
        self.connect(mixer, OUTLET, demand_outlet, INLET)?;

        let record = AirLoopHvac::new(supply_inlet, supply_outlet, demand_inlet, demand_outlet, splitter, mixer);
        let handle = self.insert_object(&name, ObjectKind::AirLoop(record));
        info!(air_loop = %handle, %name, "air loop created");
        Ok(handle)
    }

    /// New plant loop with one empty branch on each side.
    pub fn add_plant_loop(&mut self, name: &str) -> Result<Handle, ModelError> {
        let name = self.unique_name(name);
        let (supply_inlet, supply_outlet, supply_splitter, supply_mixer) =
            self.plant_side(&name, "Supply")?;
        let (demand_inlet, demand_outlet, demand_splitter, demand_mixer) =
            self.plant_side(&name, "Demand")?;

        let record = PlantLoop::new(
            supply_inlet,
            supply_outlet,
            supply_splitter,
            supply_mixer,
            demand_inlet,
            demand_outlet,
            demand_splitter,
            demand_mixer,
        );
        let handle = self.insert_object(&name, ObjectKind::PlantLoop(record));
        info!(plant_loop = %handle, %name, "plant loop created");
        Ok(handle)
    }

    fn plant_side(&mut self, name: &str, side: &str) -> Result<(Handle, Handle, Handle, Handle), ModelError> {
        let inlet = self.add_node(&format!("{name} {side} Inlet Node"));
        let outlet = self.add_node(&format!("{name} {side} Outlet Node"));
        let splitter = self.insert_object(&format!("{name} {side} Splitter"), ObjectKind::Splitter);
        let mixer = self.insert_object(&format!("{name} {side} Mixer"), ObjectKind::Mixer);
        let branch = self.add_node(&format!("{name} {side} Branch Node"));

        self.connect(inlet, OUTLET, splitter, INLET)?;
        self.connect(splitter, BRANCH_BASE, branch, INLET)?;
        self.connect(branch, OUTLET, mixer, BRANCH_BASE)?;
        self.connect(mixer, OUTLET, outlet, INLET)?;
        Ok((inlet, outlet, splitter, mixer))
    }

    /// New outdoor air system, not yet on a loop.
    pub fn add_outdoor_air_system(
        &mut self,
        name: &str,
        controller: ControllerOutdoorAir,
    ) -> Result<Handle, ModelError> {
        let name = self.unique_name(name);
        let outboard = self.add_node(&format!("{name} Outdoor Air Node"));
        let relief = self.add_node(&format!("{name} Relief Air Node"));
        let handle = self.insert_object(
            &name,
            ObjectKind::OutdoorAirSystem(OutdoorAirSystem::new(outboard, relief, controller)),
        );
        self.connect(outboard, OUTLET, handle, OUTDOOR_AIR)?;
        self.connect(handle, RELIEF_AIR, relief, INLET)?;
        Ok(handle)
    }

    // -----------------------------------------------------------------------
    // Insertion
    // -----------------------------------------------------------------------

    /// Insert a component (or an outdoor air system) at `node`.
    ///
    /// The component goes immediately downstream of the node when the node
    /// has a downstream connection, otherwise immediately upstream, and a
    /// new node is created on the far side of the component.
    ///
    /// # Errors
    /// Nothing is changed on error.
    /// - [`ModelError::NotInModel`] / [`ModelError::WrongKind`] for bad handles.
    /// - [`ModelError::NodeNotOnLoop`] if the node is on no path.
    /// - [`ModelError::IncompatibleComponent`] if the component cannot go on
    ///   that side.
    /// - [`ModelError::AlreadyConnected`] if the component's ports are taken.
    /// - [`ModelError::SameLoop`] if the component is already on the other
    ///   side of the node's loop.
    /// - [`ModelError::DuplicateOutdoorAirSystem`] for a second OA system.
    #[instrument(skip(self), fields(component = %component, node = %node))]
    pub fn add_to_node(&mut self, component: Handle, node: Handle) -> Result<(), ModelError> {
        let kind = self
            .kind_of(component)
            .ok_or(ModelError::NotInModel(component))?
            .clone();
        self.require_node(node)?;

        let location = self.node_location(node);
        let side = location.side().ok_or(ModelError::NodeNotOnLoop(node))?;
        let incompatible = || ModelError::IncompatibleComponent {
            component,
            node,
            location: location.to_string(),
        };

        match kind {
            ObjectKind::Component(c) => {
                let pair = match (&c, side) {
                    // the relief side of a heat exchanger follows its OA side
                    (HvacComponent::HeatExchangerAirToAir(_), PathSide::Relief) => None,
                    _ => c.port_pair(side),
                }
                .ok_or_else(incompatible)?;
                self.require_free_ports(component, pair)?;
                if let Some(owner) = location.owner() {
                    self.require_other_loop(component, owner)?;
                }

                let relief = match (&c, location) {
                    (HvacComponent::HeatExchangerAirToAir(_), NodeLocation::OutdoorAir { oa_system, .. }) => {
                        self.require_free_ports(component, (SECONDARY_INLET, SECONDARY_OUTLET))?;
                        Some(self.outdoor_air_system(oa_system)?.relief_node())
                    }
                    _ => None,
                };

                self.insert_at_node(component, pair, node)?;
                if let Some(relief_node) = relief {
                    self.insert_at_node(component, (SECONDARY_INLET, SECONDARY_OUTLET), relief_node)?;
                }

                if c.is_fan() {
                    if let Some(air_loop) = self.air_loop_of_node(node) {
                        self.refresh_mixed_air_managers(air_loop)?;
                    }
                }
                Ok(())
            }
            ObjectKind::OutdoorAirSystem(_) => {
                let NodeLocation::AirSupply { air_loop } = location else {
                    return Err(incompatible());
                };
                if self.air_loop_outdoor_air_system(air_loop).is_some() {
                    return Err(ModelError::DuplicateOutdoorAirSystem(air_loop));
                }
                self.require_free_ports(component, (RETURN_AIR, MIXED_AIR))?;
                self.insert_at_node(component, (RETURN_AIR, MIXED_AIR), node)?;
                Ok(())
            }
            other => Err(wrong_kind(component, "component", &other)),
        }
    }

    fn require_free_ports(&self, handle: Handle, (inlet, outlet): (Port, Port)) -> Result<(), ModelError> {
        for port in [inlet, outlet] {
            if self.connections.is_port_connected(handle, port) {
                return Err(ModelError::AlreadyConnected { handle, port });
            }
        }
        Ok(())
    }

    /// Both port pairs of one component may not sit on the same loop.
    fn require_other_loop(&self, component: Handle, owner: Handle) -> Result<(), ModelError> {
        if self.path_memberships(component).iter().any(|(_, o)| *o == owner) {
            return Err(ModelError::SameLoop { component, loop_handle: owner });
        }
        Ok(())
    }

    /// Splice `component` in next to `node` and return the new node.
    fn insert_at_node(
        &mut self,
        component: Handle,
        (inlet, outlet): (Port, Port),
        node: Handle,
    ) -> Result<Handle, ModelError> {
        let component_name = self.name(component).unwrap_or("Component").to_owned();

        if let Some(down) = self.connections.outgoing(node, OUTLET) {
            self.connections.disconnect(&down);
            let new_node = self.add_node(&format!("{component_name} Outlet Node"));
            self.connect(node, OUTLET, component, inlet)?;
            self.connect(component, outlet, new_node, INLET)?;
            self.connect(new_node, OUTLET, down.target, down.target_port)?;
            return Ok(new_node);
        }

        if let Some(up) = self.connections.incoming(node, INLET) {
            self.connections.disconnect(&up);
            let new_node = self.add_node(&format!("{component_name} Inlet Node"));
            self.connect(up.source, up.source_port, new_node, INLET)?;
            self.connect(new_node, OUTLET, component, inlet)?;
            self.connect(component, outlet, node, INLET)?;
            return Ok(new_node);
        }

        Err(ModelError::NodeNotOnLoop(node))
    }

    // -----------------------------------------------------------------------
    // Plant branches
    // -----------------------------------------------------------------------

    pub fn add_supply_branch_for_component(&mut self, plant: Handle, component: Handle) -> Result<(), ModelError> {
        let l = self.plant_loop(plant)?;
        let (splitter, mixer) = (l.supply_splitter(), l.supply_mixer());
        self.add_branch_for_component(plant, splitter, mixer, PathSide::PlantSupply, component)
    }

    pub fn add_demand_branch_for_component(&mut self, plant: Handle, component: Handle) -> Result<(), ModelError> {
        let l = self.plant_loop(plant)?;
        let (splitter, mixer) = (l.demand_splitter(), l.demand_mixer());
        self.add_branch_for_component(plant, splitter, mixer, PathSide::PlantDemand, component)
    }

    /// Put `component` on its own branch between `splitter` and `mixer`,
    /// reusing the single empty branch when there is one.
    fn add_branch_for_component(
        &mut self,
        plant: Handle,
        splitter: Handle,
        mixer: Handle,
        side: PathSide,
        component: Handle,
    ) -> Result<(), ModelError> {
        let pair = self
            .component(component)?
            .port_pair(side)
            .ok_or_else(|| ModelError::IncompatibleComponent {
                component,
                node: splitter,
                location: format!("{side:?} branch"),
            })?;
        self.require_free_ports(component, pair)?;
        self.require_other_loop(component, plant)?;

        let branch_ports = self.connections.outgoing_ports_from(splitter, BRANCH_BASE);
        if let [only] = branch_ports.as_slice() {
            if let Some(node) = self.connections.outgoing(splitter, *only).map(|c| c.target) {
                let empty = self.kind_of(node) == Some(&ObjectKind::Node)
                    && self.connections.outgoing(node, OUTLET).map(|c| c.target) == Some(mixer);
                if empty {
                    return self.add_to_node(component, node);
                }
            }
        }

        let out_port = next_branch_port(&self.connections.outgoing_ports_from(splitter, BRANCH_BASE));
        let in_port = next_branch_port(&self.connections.incoming_ports_from(mixer, BRANCH_BASE));
        let component_name = self.name(component).unwrap_or("Component").to_owned();
        let inlet_node = self.add_node(&format!("{component_name} Inlet Node"));
        let outlet_node = self.add_node(&format!("{component_name} Outlet Node"));

        self.connect(splitter, out_port, inlet_node, INLET)?;
        self.connect(inlet_node, OUTLET, component, pair.0)?;
        self.connect(component, pair.1, outlet_node, INLET)?;
        self.connect(outlet_node, OUTLET, mixer, in_port)?;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Zones
    // -----------------------------------------------------------------------

    /// Add a demand branch serving `zone`, optionally through `terminal`.
    ///
    /// A zone without an air terminal is served directly. When the supply
    /// outlet is controlled by a single-zone reheat manager without a control
    /// zone, `zone` becomes its control zone.
    #[instrument(skip(self), fields(air_loop = %air_loop, zone = %zone))]
    pub fn add_branch_for_zone(
        &mut self,
        air_loop: Handle,
        zone: Handle,
        terminal: Option<Handle>,
    ) -> Result<(), ModelError> {
        let l = self.air_loop(air_loop)?;
        let (splitter, mixer, supply_outlet) = (l.zone_splitter(), l.zone_mixer(), l.supply_outlet_node());
        self.thermal_zone(zone)?;
        self.require_free_ports(zone, (INLET, OUTLET))?;
        if let Some(terminal) = terminal {
            let c = self.component(terminal)?;
            if !c.is_terminal() {
                return Err(wrong_kind(terminal, "air terminal", &ObjectKind::Component(c.clone())));
            }
            self.require_free_ports(terminal, (INLET, OUTLET))?;
        }

        let zone_name = self.name(zone).unwrap_or("Zone").to_owned();
        let out_port = next_branch_port(&self.connections.outgoing_ports_from(splitter, BRANCH_BASE));
        let in_port = next_branch_port(&self.connections.incoming_ports_from(mixer, BRANCH_BASE));

        let zone_inlet = self.add_node(&format!("{zone_name} Inlet Node"));
        let zone_return = self.add_node(&format!("{zone_name} Return Air Node"));
        match terminal {
            Some(terminal) => {
                let terminal_name = self.name(terminal).unwrap_or("Terminal").to_owned();
                let terminal_inlet = self.add_node(&format!("{terminal_name} Inlet Node"));
                self.connect(splitter, out_port, terminal_inlet, INLET)?;
                self.connect(terminal_inlet, OUTLET, terminal, INLET)?;
                self.connect(terminal, OUTLET, zone_inlet, INLET)?;
            }
            None => self.connect(splitter, out_port, zone_inlet, INLET)?,
        }
        self.connect(zone_inlet, OUTLET, zone, INLET)?;
        self.connect(zone, OUTLET, zone_return, INLET)?;
        self.connect(zone_return, OUTLET, mixer, in_port)?;

        for spm in self.setpoint_managers(supply_outlet) {
            if let SpmKind::SingleZoneReheat { control_zone, .. } = self.setpoint_manager_mut(spm)?.kind_mut() {
                if control_zone.is_none() {
                    *control_zone = Some(zone);
                }
            }
        }
        info!(%zone_name, "zone added to air loop");
        Ok(())
    }

    /// Zones served by an air loop, in branch order.
    pub fn served_zones(&self, air_loop: Handle) -> Result<Vec<Handle>, ModelError> {
        Ok(self
            .demand_components(air_loop)?
            .into_iter()
            .filter(|h| matches!(self.kind_of(*h), Some(ObjectKind::ThermalZone(_))))
            .collect())
    }

    /// Air terminal feeding `zone`, if any.
    pub fn zone_terminal(&self, zone: Handle) -> Option<Handle> {
        let inlet = self.connections.incoming(zone, INLET)?.source;
        let terminal = self.connections.incoming(inlet, INLET)?.source;
        self.object(terminal)?
            .as_component()
            .filter(|c| c.is_terminal())
            .map(|_| terminal)
    }

    /// Air loop serving `zone`, if any.
    pub fn zone_air_loop(&self, zone: Handle) -> Option<Handle> {
        self.path_memberships(zone)
            .into_iter()
            .find(|(side, _)| *side == PathSide::AirDemand)
            .map(|(_, owner)| owner)
    }

    /// Remove the demand branch serving `zone`, keeping the zone itself.
    pub fn detach_zone(&mut self, zone: Handle) -> Result<(), ModelError> {
        self.thermal_zone(zone)?;
        let mut doomed = Vec::new();

        let mut cursor = self.connections.incoming(zone, INLET);
        while let Some(conn) = cursor {
            if matches!(self.kind_of(conn.source), Some(ObjectKind::Splitter)) {
                break;
            }
            doomed.push(conn.source);
            cursor = self.connections.incoming(conn.source, INLET);
        }
        let mut cursor = self.connections.outgoing(zone, OUTLET);
        while let Some(conn) = cursor {
            if matches!(self.kind_of(conn.target), Some(ObjectKind::Mixer)) {
                break;
            }
            doomed.push(conn.target);
            cursor = self.connections.outgoing(conn.target, OUTLET);
        }

        self.connections.disconnect_all(zone);
        for handle in doomed {
            if self.component(handle).map(|c| c.is_terminal()).unwrap_or(false) {
                self.remove_terminal_children(handle)?;
            }
            self.erase(handle);
        }
        Ok(())
    }

    /// Put zone equipment in `zone`, moving it out of the zone it was in.
    ///
    /// # Errors
    /// [`ModelError::WrongKind`] when `equipment` is not zone equipment or
    /// `zone` is not a thermal zone.
    #[instrument(skip(self), fields(equipment = %equipment, zone = %zone))]
    pub fn add_to_thermal_zone(&mut self, equipment: Handle, zone: Handle) -> Result<(), ModelError> {
        self.thermal_zone(zone)?;
        self.require_zone_equipment(equipment)?;
        self.edit_component(equipment, |c| c.set_thermal_zone(Some(zone)))?;
        info!(zone = self.name(zone).unwrap_or_default(), "equipment added to zone");
        Ok(())
    }

    /// Take zone equipment out of its zone. Plant connections are kept.
    pub fn remove_from_thermal_zone(&mut self, equipment: Handle) -> Result<(), ModelError> {
        self.require_zone_equipment(equipment)?;
        self.edit_component(equipment, |c| c.set_thermal_zone(None))
    }

    /// Zone equipment in `zone`, in creation order.
    pub fn zone_equipment(&self, zone: Handle) -> Vec<Handle> {
        self.objects()
            .filter(|o| o.as_component().is_some_and(|c| c.thermal_zone() == Some(zone)))
            .map(|o| o.handle())
            .collect()
    }

    fn require_zone_equipment(&self, equipment: Handle) -> Result<(), ModelError> {
        let c = self.component(equipment)?;
        if !c.is_zone_equipment() {
            return Err(wrong_kind(equipment, "zone equipment", &ObjectKind::Component(c.clone())));
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Mixed air managers
    // -----------------------------------------------------------------------

    /// Point every mixed air manager on the loop at the supply outlet and the
    /// current supply fan.
    pub(crate) fn refresh_mixed_air_managers(&mut self, air_loop: Handle) -> Result<(), ModelError> {
        let reference = self.air_loop(air_loop)?.supply_outlet_node();
        let fan = self.supply_fan(air_loop);
        let fan_inlet = fan.and_then(|f| self.inlet_node_of(f, INLET));
        let fan_outlet = fan.and_then(|f| self.outlet_node_of(f, OUTLET));

        let mut nodes = self.supply_components(air_loop)?;
        if let Some(oa) = self.air_loop_outdoor_air_system(air_loop) {
            nodes.extend(self.oa_components(oa)?);
        }
        for node in nodes {
            for spm in self.setpoint_managers(node) {
                if let SpmKind::MixedAir { reference_setpoint_node, fan_inlet_node, fan_outlet_node } =
                    self.setpoint_manager_mut(spm)?.kind_mut()
                {
                    *reference_setpoint_node = Some(reference);
                    *fan_inlet_node = fan_inlet;
                    *fan_outlet_node = fan_outlet;
                }
            }
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Removal
    // -----------------------------------------------------------------------

    /// Remove an object and everything that only exists because of it.
    ///
    /// Components are spliced out of their paths; nodes take their setpoint
    /// managers with them; loops take every object on their paths except
    /// zones, which are detached.
    ///
    /// # Errors
    /// - [`ModelError::NotInModel`] for a foreign handle.
    /// - [`ModelError::ObjectInUse`] for a referenced schedule or curve, or
    ///   a loop's fixed node, splitter or mixer.
    #[instrument(skip(self), fields(handle = %handle))]
    pub fn remove(&mut self, handle: Handle) -> Result<(), ModelError> {
        let kind = self.kind_of(handle).ok_or(ModelError::NotInModel(handle))?.clone();
        match kind {
            ObjectKind::Node => self.remove_node(handle),
            ObjectKind::Splitter | ObjectKind::Mixer => {
                if let Some(owner) = self.fixed_owner(handle) {
                    return Err(ModelError::ObjectInUse { handle, by: owner });
                }
                self.erase(handle);
                Ok(())
            }
            ObjectKind::Component(_) => self.remove_component(handle),
            ObjectKind::SetpointManager(_) => {
                self.erase(handle);
                Ok(())
            }
            ObjectKind::ThermalZone(_) => {
                self.detach_zone(handle)?;
                self.erase(handle);
                Ok(())
            }
            ObjectKind::AirLoop(_) => self.remove_air_loop(handle),
            ObjectKind::PlantLoop(_) => self.remove_plant_loop(handle),
            ObjectKind::OutdoorAirSystem(_) => self.remove_outdoor_air_system(handle),
            ObjectKind::Schedule(_) | ObjectKind::Curve(_) => {
                if let Some(by) = self.sources_of(handle).first() {
                    warn!(by = %by, "resource still referenced");
                    return Err(ModelError::ObjectInUse { handle, by: *by });
                }
                self.erase(handle);
                Ok(())
            }
        }
    }

    fn is_plain_node(&self, handle: Handle) -> bool {
        matches!(self.kind_of(handle), Some(ObjectKind::Node)) && self.fixed_owner(handle).is_none()
    }

    fn remove_node(&mut self, node: Handle) -> Result<(), ModelError> {
        if let Some(owner) = self.fixed_owner(node) {
            return Err(ModelError::ObjectInUse { handle: node, by: owner });
        }
        let up = self.connections.incoming(node, INLET);
        let down = self.connections.outgoing(node, OUTLET);
        self.erase(node);
        if let (Some(up), Some(down)) = (up, down) {
            self.connect(up.source, up.source_port, down.target, down.target_port)?;
        }
        Ok(())
    }

    /// Take one port pair of `component` out of its path and close the gap,
    /// dropping the adjacent node that no loop depends on.
    fn splice_out(&mut self, component: Handle, (inlet, outlet): (Port, Port)) -> Result<(), ModelError> {
        let up = self.connections.incoming(component, inlet);
        let down = self.connections.outgoing(component, outlet);
        let (Some(up), Some(down)) = (up, down) else {
            for conn in [up, down].into_iter().flatten() {
                self.connections.disconnect(&conn);
            }
            return Ok(());
        };
        self.connections.disconnect(&up);
        self.connections.disconnect(&down);

        let mut from = (up.source, up.source_port);
        let mut to = (down.target, down.target_port);
        let next = if self.is_plain_node(down.target) {
            self.connections.outgoing(down.target, OUTLET)
        } else {
            None
        };
        let prev = if self.is_plain_node(up.source) {
            self.connections.incoming(up.source, INLET)
        } else {
            None
        };
        if let Some(next) = next {
            to = (next.target, next.target_port);
            self.erase(down.target);
        } else if let Some(prev) = prev {
            from = (prev.source, prev.source_port);
            self.erase(up.source);
        }
        self.connections.connect(Connection::new(from.0, from.1, to.0, to.1))
    }

    fn remove_component(&mut self, component: Handle) -> Result<(), ModelError> {
        let is_fan = self.component(component)?.is_fan();
        let air_loop = if is_fan {
            self.path_memberships(component)
                .into_iter()
                .find(|(side, _)| *side == PathSide::AirSupply)
                .map(|(_, owner)| owner)
        } else {
            None
        };

        for pair in PORT_PAIRS {
            self.splice_out(component, pair)?;
        }
        self.remove_terminal_children(component)?;
        self.erase(component);

        if let Some(air_loop) = air_loop {
            self.refresh_mixed_air_managers(air_loop)?;
        }
        Ok(())
    }

    fn remove_terminal_children(&mut self, terminal: Handle) -> Result<(), ModelError> {
        if let Some(coil) = self.component(terminal)?.reheat_coil() {
            if self.contains(coil) {
                self.remove_component(coil)?;
            }
        }
        Ok(())
    }

    /// Drop the path objects of a loop side. Components that also sit on
    /// another loop through their other port pair are only disconnected here.
    fn clear_path(&mut self, objects: Vec<Handle>, keep_dual: bool) -> Result<(), ModelError> {
        for handle in objects {
            if !self.contains(handle) {
                continue;
            }
            match self.kind_of(handle).cloned() {
                Some(ObjectKind::ThermalZone(_)) => {
                    self.connections.disconnect_all(handle);
                }
                Some(ObjectKind::Component(c)) if c.has_secondary_ports() => {
                    let on_other_pair = |model: &Model, pair: (Port, Port)| {
                        model.connections.incoming(handle, pair.0).is_some()
                            || model.connections.outgoing(handle, pair.1).is_some()
                    };
                    let primary_here = self
                        .connections
                        .connections_of(handle)
                        .iter()
                        .any(|conn| conn.target == handle && conn.target_port == INLET);
                    if keep_dual {
                        // plant demand: keep the air-side or chiller-side role
                        for conn in self.connections.connections_of(handle) {
                            let secondary = (conn.target == handle && conn.target_port == SECONDARY_INLET)
                                || (conn.source == handle && conn.source_port == SECONDARY_OUTLET);
                            if secondary {
                                self.connections.disconnect(&conn);
                            }
                        }
                        if !on_other_pair(self, (INLET, OUTLET)) {
                            self.erase(handle);
                        }
                    } else {
                        if primary_here && on_other_pair(self, (SECONDARY_INLET, SECONDARY_OUTLET)) {
                            self.splice_out(handle, (SECONDARY_INLET, SECONDARY_OUTLET))?;
                        }
                        self.remove_terminal_children(handle)?;
                        self.erase(handle);
                    }
                }
                Some(ObjectKind::Component(_)) => {
                    self.remove_terminal_children(handle)?;
                    self.erase(handle);
                }
                _ => self.erase(handle),
            }
        }
        Ok(())
    }

    fn remove_air_loop(&mut self, air_loop: Handle) -> Result<(), ModelError> {
        if let Some(oa) = self.air_loop_outdoor_air_system(air_loop) {
            self.remove_outdoor_air_system(oa)?;
        }
        let supply = self.supply_components(air_loop)?;
        let demand = self.demand_components(air_loop)?;
        self.clear_path(supply, false)?;
        self.clear_path(demand, false)?;
        self.erase(air_loop);
        info!(%air_loop, "air loop removed");
        Ok(())
    }

    fn remove_plant_loop(&mut self, plant: Handle) -> Result<(), ModelError> {
        let supply = self.supply_components(plant)?;
        let demand = self.demand_components(plant)?;
        self.clear_path(demand, true)?;
        self.clear_path(supply, false)?;
        self.erase(plant);
        info!(%plant, "plant loop removed");
        Ok(())
    }

    fn remove_outdoor_air_system(&mut self, oa: Handle) -> Result<(), ModelError> {
        let air_loop = self.air_loop_of_outdoor_air_system(oa);
        self.splice_out(oa, (RETURN_AIR, MIXED_AIR))?;
        let mut objects = self.oa_components(oa)?;
        objects.extend(self.relief_components(oa)?);
        self.clear_path(objects, false)?;
        self.erase(oa);
        if let Some(air_loop) = air_loop {
            self.refresh_mixed_air_managers(air_loop)?;
        }
        Ok(())
    }
}

fn next_branch_port(used: &[Port]) -> Port {
    used.iter().max().map(|p| p + 1).unwrap_or(BRANCH_BASE)
}
