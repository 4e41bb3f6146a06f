//! Loop validation. Run this after building or loading a model.
//!
//! Rules enforced per loop:
//! 1. Every connection is recorded identically at both of its ends.
//! 2. Every path walk reaches its end without revisiting an object.
//! 3. No node occurs twice within the loop, and no component lies on two
//!    of its paths. An air-to-air heat exchanger spanning the outdoor air
//!    and relief streams is the one exception.
//! 4. No node carries two setpoint managers with the same control variable,
//!    and every attached manager is indexed under its node.
//!
//! Returns the ordered supply path on success.

use std::collections::{HashMap, HashSet};

use tracing::{debug, instrument};

use crate::components::HvacComponent;
use crate::error::ModelError;
use crate::objects::{Handle, ObjectKind};
use crate::paths::wrong_kind;
use crate::Model;

// Path order of an air loop: supply, demand, outdoor air, relief.
const OA_PATH: usize = 2;
const RELIEF_PATH: usize = 3;

/// Validate one air or plant loop and return its supply path in order.
///
/// # Errors
/// - [`ModelError::Topology`] for an asymmetric connection or a dead end.
/// - [`ModelError::CycleDetected`] if a path walk revisits an object.
/// - [`ModelError::DuplicateNode`] if a node occurs twice in the loop.
/// - [`ModelError::MultiPathComponent`] if a component is on two paths.
/// - [`ModelError::DuplicateControlVariable`] for clashing managers.
#[instrument(skip(model), fields(loop_handle = %loop_handle))]
pub fn validate_loop(model: &Model, loop_handle: Handle) -> Result<Vec<Handle>, ModelError> {
    // -----------------------------------------------------------------------
    // 1. Connection symmetry
    // -----------------------------------------------------------------------
    if let Some(conn) = model.connections().first_asymmetry() {
        return Err(ModelError::Topology {
            handle: conn.source,
            message: format!("connection to {} is not recorded at both ends", conn.target),
        });
    }

    // -----------------------------------------------------------------------
    // 2. Walk every path of the loop
    // -----------------------------------------------------------------------
    let obj = model.object(loop_handle).ok_or(ModelError::NotInModel(loop_handle))?;
    let mut paths: Vec<Vec<Handle>> = Vec::new();
    match obj.kind() {
        ObjectKind::AirLoop(_) => {
            paths.push(model.supply_components(loop_handle)?);
            paths.push(model.demand_components(loop_handle)?);
            if let Some(oa) = model.air_loop_outdoor_air_system(loop_handle) {
                paths.push(model.oa_components(oa)?);
                paths.push(model.relief_components(oa)?);
            }
        }
        ObjectKind::PlantLoop(_) => {
            paths.push(model.supply_components(loop_handle)?);
            paths.push(model.demand_components(loop_handle)?);
        }
        other => return Err(wrong_kind(loop_handle, "loop", other)),
    }

    // -----------------------------------------------------------------------
    // 3. Node uniqueness across the loop
    // -----------------------------------------------------------------------
    let mut seen_nodes: HashSet<Handle> = HashSet::new();
    for node in paths.iter().flatten().filter(|h| model.object(**h).is_some_and(|o| o.is_node())) {
        if !seen_nodes.insert(*node) {
            return Err(ModelError::DuplicateNode(*node));
        }
    }

    let mut seen_components: HashMap<Handle, usize> = HashMap::new();
    for (index, path) in paths.iter().enumerate() {
        for handle in path {
            let Some(ObjectKind::Component(c)) = model.object(*handle).map(|o| o.kind()) else {
                continue;
            };
            if let Some(first) = seen_components.insert(*handle, index) {
                let heat_recovery = matches!(c, HvacComponent::HeatExchangerAirToAir(_))
                    && (first, index) == (OA_PATH, RELIEF_PATH);
                if !heat_recovery {
                    return Err(ModelError::MultiPathComponent(*handle));
                }
            }
        }
    }

    // -----------------------------------------------------------------------
    // 4. Setpoint managers
    // -----------------------------------------------------------------------
    for node in &seen_nodes {
        let mut by_variable: HashMap<_, Handle> = HashMap::new();
        for spm in model.setpoint_managers(*node) {
            let manager = model.setpoint_manager(spm)?;
            if manager.setpoint_node() != Some(*node) {
                return Err(ModelError::Topology {
                    handle: spm,
                    message: format!("indexed under {node} but points elsewhere"),
                });
            }
            if by_variable.insert(manager.control_variable(), spm).is_some() {
                return Err(ModelError::DuplicateControlVariable {
                    node: *node,
                    control_variable: manager.control_variable().as_str().to_owned(),
                });
            }
        }
    }

    debug!(nodes = seen_nodes.len(), "loop validated");
    Ok(paths.swap_remove(0))
}

/// Validate every loop in the model and return the handles checked.
pub fn validate_model(model: &Model) -> Result<Vec<Handle>, ModelError> {
    let loops: Vec<Handle> = model
        .air_loops()
        .into_iter()
        .chain(model.plant_loops())
        .collect();
    for handle in &loops {
        validate_loop(model, *handle)?;
    }

    // Managers outside any loop still have to be indexed consistently.
    for spm in model.setpoint_manager_handles() {
        if let Some(node) = model.setpoint_manager(spm)?.setpoint_node() {
            if !model.setpoint_managers(node).contains(&spm) {
                return Err(ModelError::Topology {
                    handle: spm,
                    message: format!("not indexed under its node {node}"),
                });
            }
        }
    }
    Ok(loops)
}

// ============================================================
// Unit tests
// ============================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{Fan, HvacComponent};
    use crate::connection::{Connection, BRANCH_BASE, INLET, OUTLET, SECONDARY_INLET, SECONDARY_OUTLET};

    #[test]
    fn empty_air_loop_is_valid() {
        let mut model = Model::new();
        let air_loop = model.add_air_loop("AHU").unwrap();
        let supply = validate_loop(&model, air_loop).expect("should be valid");
        let l = model.air_loop(air_loop).unwrap();
        assert_eq!(supply, vec![l.supply_inlet_node(), l.supply_outlet_node()]);
    }

    #[test]
    fn supply_path_is_returned_in_flow_order() {
        let mut model = Model::new();
        let air_loop = model.add_air_loop("AHU").unwrap();
        let outlet = model.air_loop(air_loop).unwrap().supply_outlet_node();
        let fan = model.add_component("Fan", HvacComponent::FanConstantVolume(Fan::constant_volume()));
        model.add_to_node(fan, outlet).unwrap();

        let supply = validate_loop(&model, air_loop).unwrap();
        assert_eq!(supply.len(), 4);
        assert_eq!(supply[2], fan);
        assert_eq!(*supply.last().unwrap(), outlet);
    }

    #[test]
    fn cycle_is_detected() {
        let mut model = Model::new();
        let air_loop = model.add_air_loop("AHU").unwrap();
        let l = model.air_loop(air_loop).unwrap().clone();
        let (a, b) = (model.add_node("A"), model.add_node("B"));

        // inlet → A → B → A  (back-edge, never reaches the outlet)
        let first = model.connections().outgoing(l.supply_inlet_node(), OUTLET).unwrap();
        model.connections.disconnect(&first);
        model.connections.connect(Connection::new(l.supply_inlet_node(), OUTLET, a, INLET)).unwrap();
        model.connections.connect(Connection::new(a, OUTLET, b, INLET)).unwrap();
        let c = model.add_component("Fan", HvacComponent::FanConstantVolume(Fan::constant_volume()));
        model.connections.connect(Connection::new(b, OUTLET, c, INLET)).unwrap();
        model.connections.connect(Connection::new(c, OUTLET, a, 5)).unwrap();

        assert!(matches!(
            validate_loop(&model, air_loop),
            Err(ModelError::CycleDetected(h)) if h == a
        ));
    }

    #[test]
    fn dead_end_is_reported() {
        let mut model = Model::new();
        let air_loop = model.add_air_loop("AHU").unwrap();
        let inlet = model.air_loop(air_loop).unwrap().supply_inlet_node();
        let first = model.connections().outgoing(inlet, OUTLET).unwrap();
        model.connections.disconnect(&first);

        assert!(matches!(
            validate_loop(&model, air_loop),
            Err(ModelError::Topology { handle, .. }) if handle == inlet
        ));
    }

    #[test]
    fn component_on_two_paths_of_one_loop_is_rejected() {
        let mut model = Model::new();
        let plant = model.add_plant_loop("Chilled Water").unwrap();
        let component = crate::templates::chiller(&mut model);
        let chiller = model.add_component("Chiller", component);
        model.add_supply_branch_for_component(plant, chiller).unwrap();

        // wire the condenser side onto the same plant's demand branch by hand
        let splitter = model.plant_loop(plant).unwrap().demand_splitter();
        let branch = model.connections().outgoing(splitter, BRANCH_BASE).unwrap().target;
        let down = model.connections().outgoing(branch, OUTLET).unwrap();
        model.connections.disconnect(&down);
        model.connections.connect(Connection::new(branch, OUTLET, chiller, SECONDARY_INLET)).unwrap();
        model
            .connections
            .connect(Connection::new(chiller, SECONDARY_OUTLET, down.target, down.target_port))
            .unwrap();

        assert!(matches!(
            validate_loop(&model, plant),
            Err(ModelError::MultiPathComponent(h)) if h == chiller
        ));
    }

    #[test]
    fn non_loop_handle_is_rejected() {
        let mut model = Model::new();
        let node = model.add_node("Lonely");
        assert!(matches!(
            validate_loop(&model, node),
            Err(ModelError::WrongKind { expected: "loop", .. })
        ));
    }
}
