//! Loop path traversal.
//!
//! Every path is walked from its start node along outgoing connections until
//! its end object. A splitter fans out to its branches in port order and the
//! walk resumes at the matching mixer once every branch has reached it.

use std::collections::HashSet;

use crate::connection::{Port, BRANCH_BASE, INLET, MIXED_AIR, OUTLET, RELIEF_AIR, RETURN_AIR,
    SECONDARY_INLET, SECONDARY_OUTLET};
use crate::error::ModelError;
use crate::loops::{NodeLocation, PathSide};
use crate::objects::{Handle, ObjectKind};
use crate::Model;

/// One walked path together with the object that owns it.
#[derive(Debug, Clone)]
pub struct LoopPath {
    pub side: PathSide,
    pub owner: Handle,
    pub objects: Vec<Handle>,
}

impl Model {
    // -----------------------------------------------------------------------
    // Walking
    // -----------------------------------------------------------------------

    /// Objects after `from.0` up to `end`, leaving `from.0` through `from.1`.
    pub(crate) fn walk(
        &self,
        from: (Handle, Port),
        end: Handle,
        include_end: bool,
        branch: Option<(Handle, Handle)>,
    ) -> Result<Vec<Handle>, ModelError> {
        let mut out = Vec::new();
        let mut visited = HashSet::new();
        visited.insert(from.0);
        self.walk_segment(from, end, include_end, branch, &mut out, &mut visited)?;
        Ok(out)
    }

    fn walk_segment(
        &self,
        from: (Handle, Port),
        end: Handle,
        include_end: bool,
        branch: Option<(Handle, Handle)>,
        out: &mut Vec<Handle>,
        visited: &mut HashSet<Handle>,
    ) -> Result<(), ModelError> {
        let (mut current, mut port) = from;
        loop {
            let conn = self.connections.outgoing(current, port).ok_or_else(|| {
                ModelError::Topology {
                    handle: current,
                    message: format!("path stops at port {port} before reaching {end}"),
                }
            })?;
            let next = conn.target;

            if next == end {
                if include_end {
                    if !visited.insert(next) {
                        return Err(ModelError::CycleDetected(next));
                    }
                    out.push(next);
                }
                return Ok(());
            }

            if !visited.insert(next) {
                return Err(ModelError::CycleDetected(next));
            }
            out.push(next);

            if matches!(self.kind_of(next), Some(ObjectKind::Splitter)) {
                let mixer = match branch {
                    Some((splitter, mixer)) if splitter == next => mixer,
                    _ => {
                        return Err(ModelError::Topology {
                            handle: next,
                            message: "splitter without a matching mixer on this path".into(),
                        })
                    }
                };
                for branch_port in self.connections.outgoing_ports_from(next, BRANCH_BASE) {
                    self.walk_segment((next, branch_port), mixer, false, None, out, visited)?;
                }
                if !visited.insert(mixer) {
                    return Err(ModelError::CycleDetected(mixer));
                }
                out.push(mixer);
                if mixer == end {
                    return Ok(());
                }
                current = mixer;
                port = OUTLET;
                continue;
            }

            port = self.exit_port(next, conn.target_port)?;
            current = next;
        }
    }

    /// The port a walk leaves `handle` through after arriving at `in_port`.
    fn exit_port(&self, handle: Handle, in_port: Port) -> Result<Port, ModelError> {
        let exit = match (self.kind_of(handle), in_port) {
            (Some(ObjectKind::Node | ObjectKind::ThermalZone(_)), INLET) => Some(OUTLET),
            (Some(ObjectKind::Component(_)), INLET) => Some(OUTLET),
            (Some(ObjectKind::Component(_)), SECONDARY_INLET) => Some(SECONDARY_OUTLET),
            (Some(ObjectKind::OutdoorAirSystem(_)), RETURN_AIR) => Some(MIXED_AIR),
            (Some(ObjectKind::Mixer), p) if p >= BRANCH_BASE => Some(OUTLET),
            _ => None,
        };
        exit.ok_or_else(|| ModelError::Topology {
            handle,
            message: format!("cannot pass through port {in_port}"),
        })
    }

    // -----------------------------------------------------------------------
    // Named paths
    // -----------------------------------------------------------------------

    /// Ordered objects on a loop's supply side, inlet node to outlet node.
    pub fn supply_components(&self, loop_handle: Handle) -> Result<Vec<Handle>, ModelError> {
        let obj = self.object(loop_handle).ok_or(ModelError::NotInModel(loop_handle))?;
        let (start, end, branch) = match obj.kind() {
            ObjectKind::AirLoop(l) => (l.supply_inlet_node(), l.supply_outlet_node(), None),
            ObjectKind::PlantLoop(l) => (
                l.supply_inlet_node(),
                l.supply_outlet_node(),
                Some((l.supply_splitter(), l.supply_mixer())),
            ),
            other => return Err(wrong_kind(loop_handle, "loop", other)),
        };
        let mut objects = vec![start];
        objects.extend(self.walk((start, OUTLET), end, true, branch)?);
        Ok(objects)
    }

    /// Ordered objects on a loop's demand side, inlet node to outlet node.
    pub fn demand_components(&self, loop_handle: Handle) -> Result<Vec<Handle>, ModelError> {
        let obj = self.object(loop_handle).ok_or(ModelError::NotInModel(loop_handle))?;
        let (start, end, branch) = match obj.kind() {
            ObjectKind::AirLoop(l) => (
                l.demand_inlet_node(),
                l.demand_outlet_node(),
                (l.zone_splitter(), l.zone_mixer()),
            ),
            ObjectKind::PlantLoop(l) => (
                l.demand_inlet_node(),
                l.demand_outlet_node(),
                (l.demand_splitter(), l.demand_mixer()),
            ),
            other => return Err(wrong_kind(loop_handle, "loop", other)),
        };
        let mut objects = vec![start];
        objects.extend(self.walk((start, OUTLET), end, true, Some(branch))?);
        Ok(objects)
    }

    /// Outdoor air stream, outboard node first, excluding the OA system.
    pub fn oa_components(&self, oa_system: Handle) -> Result<Vec<Handle>, ModelError> {
        let oa = self.outdoor_air_system(oa_system)?;
        let start = oa.outboard_oa_node();
        let mut objects = vec![start];
        objects.extend(self.walk((start, OUTLET), oa_system, false, None)?);
        Ok(objects)
    }

    /// Relief stream, ending at the relief node, excluding the OA system.
    pub fn relief_components(&self, oa_system: Handle) -> Result<Vec<Handle>, ModelError> {
        let relief = self.outdoor_air_system(oa_system)?.relief_node();
        self.walk((oa_system, RELIEF_AIR), relief, true, None)
    }

    /// A loop side cut into branches: the run up to the splitter, one run per
    /// splitter outlet in port order, and the run after the mixer. Splitters
    /// and mixers are left out. An air supply side is a single run.
    pub fn branches(&self, loop_handle: Handle, side: PathSide) -> Result<Vec<Vec<Handle>>, ModelError> {
        let obj = self.object(loop_handle).ok_or(ModelError::NotInModel(loop_handle))?;
        let (inlet, outlet, splitter, mixer) = match (obj.kind(), side) {
            (ObjectKind::AirLoop(_), PathSide::AirSupply) => {
                return Ok(vec![self.supply_components(loop_handle)?]);
            }
            (ObjectKind::AirLoop(l), PathSide::AirDemand) => {
                (l.demand_inlet_node(), l.demand_outlet_node(), l.zone_splitter(), l.zone_mixer())
            }
            (ObjectKind::PlantLoop(l), PathSide::PlantSupply) => {
                (l.supply_inlet_node(), l.supply_outlet_node(), l.supply_splitter(), l.supply_mixer())
            }
            (ObjectKind::PlantLoop(l), PathSide::PlantDemand) => {
                (l.demand_inlet_node(), l.demand_outlet_node(), l.demand_splitter(), l.demand_mixer())
            }
            (other, _) => return Err(wrong_kind(loop_handle, "loop owning that side", other)),
        };

        let mut head = vec![inlet];
        head.extend(self.walk((inlet, OUTLET), splitter, false, None)?);
        let mut runs = vec![head];
        for port in self.connections.outgoing_ports_from(splitter, BRANCH_BASE) {
            runs.push(self.walk((splitter, port), mixer, false, None)?);
        }
        runs.push(self.walk((mixer, OUTLET), outlet, true, None)?);
        Ok(runs)
    }

    /// Every walkable path in the model. Broken paths are skipped.
    pub fn loop_paths(&self) -> Vec<LoopPath> {
        let mut paths = Vec::new();
        for obj in self.objects() {
            let owner = obj.handle();
            let walked: Vec<(PathSide, Result<Vec<Handle>, ModelError>)> = match obj.kind() {
                ObjectKind::AirLoop(_) => vec![
                    (PathSide::AirSupply, self.supply_components(owner)),
                    (PathSide::AirDemand, self.demand_components(owner)),
                ],
                ObjectKind::PlantLoop(_) => vec![
                    (PathSide::PlantSupply, self.supply_components(owner)),
                    (PathSide::PlantDemand, self.demand_components(owner)),
                ],
                ObjectKind::OutdoorAirSystem(_) => vec![
                    (PathSide::OutdoorAir, self.oa_components(owner)),
                    (PathSide::Relief, self.relief_components(owner)),
                ],
                _ => Vec::new(),
            };
            for (side, objects) in walked {
                if let Ok(objects) = objects {
                    paths.push(LoopPath { side, owner, objects });
                }
            }
        }
        paths
    }

    /// Where `node` sits. Nodes off every path are `Unattached`.
    pub fn node_location(&self, node: Handle) -> NodeLocation {
        for path in self.loop_paths() {
            if !path.objects.contains(&node) {
                continue;
            }
            return match path.side {
                PathSide::AirSupply => NodeLocation::AirSupply { air_loop: path.owner },
                PathSide::AirDemand => NodeLocation::AirDemand { air_loop: path.owner },
                PathSide::OutdoorAir => {
                    let outboard = self
                        .outdoor_air_system(path.owner)
                        .map(|oa| oa.outboard_oa_node() == node)
                        .unwrap_or(false);
                    NodeLocation::OutdoorAir { oa_system: path.owner, outboard }
                }
                PathSide::Relief => NodeLocation::Relief { oa_system: path.owner },
                PathSide::PlantSupply => NodeLocation::PlantSupply { plant_loop: path.owner },
                PathSide::PlantDemand => NodeLocation::PlantDemand { plant_loop: path.owner },
            };
        }
        NodeLocation::Unattached
    }

    /// Every path `handle` lies on, as `(side, owner)`.
    pub fn path_memberships(&self, handle: Handle) -> Vec<(PathSide, Handle)> {
        self.loop_paths()
            .into_iter()
            .filter(|p| p.objects.contains(&handle))
            .map(|p| (p.side, p.owner))
            .collect()
    }

    // -----------------------------------------------------------------------
    // Loop queries
    // -----------------------------------------------------------------------

    /// The outdoor air system on an air loop's supply side.
    pub fn air_loop_outdoor_air_system(&self, air_loop: Handle) -> Option<Handle> {
        self.supply_components(air_loop)
            .ok()?
            .into_iter()
            .find(|h| matches!(self.kind_of(*h), Some(ObjectKind::OutdoorAirSystem(_))))
    }

    /// The air loop whose supply side carries `oa_system`.
    pub fn air_loop_of_outdoor_air_system(&self, oa_system: Handle) -> Option<Handle> {
        self.path_memberships(oa_system)
            .into_iter()
            .find(|(side, _)| *side == PathSide::AirSupply)
            .map(|(_, owner)| owner)
    }

    /// The air loop a node belongs to, through its OA system if needed.
    pub fn air_loop_of_node(&self, node: Handle) -> Option<Handle> {
        match self.node_location(node) {
            NodeLocation::AirSupply { air_loop } | NodeLocation::AirDemand { air_loop } => {
                Some(air_loop)
            }
            NodeLocation::OutdoorAir { oa_system, .. } | NodeLocation::Relief { oa_system } => {
                self.air_loop_of_outdoor_air_system(oa_system)
            }
            _ => None,
        }
    }

    /// First fan on an air loop's supply side.
    pub fn supply_fan(&self, air_loop: Handle) -> Option<Handle> {
        self.supply_components(air_loop).ok()?.into_iter().find(|h| {
            self.object(*h)
                .and_then(|o| o.as_component())
                .map(|c| c.is_fan())
                .unwrap_or(false)
        })
    }

    /// Node feeding `component`'s inlet port.
    pub fn inlet_node_of(&self, component: Handle, port: Port) -> Option<Handle> {
        self.connections.incoming(component, port).map(|c| c.source)
    }

    /// Node fed by `component`'s outlet port.
    pub fn outlet_node_of(&self, component: Handle, port: Port) -> Option<Handle> {
        self.connections.outgoing(component, port).map(|c| c.target)
    }

    /// Components (in order) on one path that match `pred`.
    pub fn components_on(
        &self,
        path: &[Handle],
        pred: impl Fn(&crate::HvacComponent) -> bool,
    ) -> Vec<Handle> {
        path.iter()
            .copied()
            .filter(|h| {
                self.object(*h)
                    .and_then(|o| o.as_component())
                    .map(&pred)
                    .unwrap_or(false)
            })
            .collect()
    }

    /// Fixed nodes, splitters and mixers of loops and OA systems, with the
    /// owning object.
    pub(crate) fn fixed_owner(&self, handle: Handle) -> Option<Handle> {
        self.objects().find_map(|obj| {
            let fixed = match obj.kind() {
                ObjectKind::AirLoop(l) => l.fixed_objects().contains(&handle),
                ObjectKind::PlantLoop(l) => l.fixed_objects().contains(&handle),
                ObjectKind::OutdoorAirSystem(oa) => {
                    oa.outboard_oa_node() == handle || oa.relief_node() == handle
                }
                _ => false,
            };
            fixed.then_some(obj.handle())
        })
    }
}

pub(crate) fn wrong_kind(handle: Handle, expected: &'static str, found: &ObjectKind) -> ModelError {
    ModelError::WrongKind { handle, expected, found: found.kind_name() }
}
