//! Typed edges between object ports and the two-way index over them.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{error::ModelError, objects::Handle};

/// Port number on an object.
pub type Port = u32;

// ---------------------------------------------------------------------------
// Port conventions
// ---------------------------------------------------------------------------

pub const INLET: Port = 0;
pub const OUTLET: Port = 1;
/// Water side of water coils, condenser side of chillers, relief stream of
/// air-to-air heat exchangers.
pub const SECONDARY_INLET: Port = 2;
pub const SECONDARY_OUTLET: Port = 3;

pub const RETURN_AIR: Port = 0;
pub const MIXED_AIR: Port = 1;
pub const OUTDOOR_AIR: Port = 2;
pub const RELIEF_AIR: Port = 3;

/// First splitter outlet / mixer inlet port.
pub const BRANCH_BASE: Port = 10;

// ---------------------------------------------------------------------------
// Connection
// ---------------------------------------------------------------------------

/// Directed edge from `source`'s port to `target`'s port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Connection {
    pub source: Handle,
    pub source_port: Port,
    pub target: Handle,
    pub target_port: Port,
}

impl Connection {
    pub fn new(source: Handle, source_port: Port, target: Handle, target_port: Port) -> Self {
        Self { source, source_port, target, target_port }
    }
}

// ---------------------------------------------------------------------------
// ConnectionIndex
// ---------------------------------------------------------------------------

/// Every connection keyed by both of its endpoints.
#[derive(Debug, Clone, Default)]
pub struct ConnectionIndex {
    by_source: HashMap<(Handle, Port), Connection>,
    by_target: HashMap<(Handle, Port), Connection>,
}

impl ConnectionIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an edge. Both ports must be free.
    pub fn connect(&mut self, connection: Connection) -> Result<(), ModelError> {
        if self.by_source.contains_key(&(connection.source, connection.source_port)) {
            return Err(ModelError::AlreadyConnected {
                handle: connection.source,
                port: connection.source_port,
            });
        }
        if self.by_target.contains_key(&(connection.target, connection.target_port)) {
            return Err(ModelError::AlreadyConnected {
                handle: connection.target,
                port: connection.target_port,
            });
        }
        self.by_source
            .insert((connection.source, connection.source_port), connection);
        self.by_target
            .insert((connection.target, connection.target_port), connection);
        Ok(())
    }

    /// Edge leaving `port` of `handle`.
    pub fn outgoing(&self, handle: Handle, port: Port) -> Option<Connection> {
        self.by_source.get(&(handle, port)).copied()
    }

    /// Edge arriving at `port` of `handle`.
    pub fn incoming(&self, handle: Handle, port: Port) -> Option<Connection> {
        self.by_target.get(&(handle, port)).copied()
    }

    /// Whether any edge touches `port` of `handle`, in either direction.
    pub fn is_port_connected(&self, handle: Handle, port: Port) -> bool {
        self.by_source.contains_key(&(handle, port)) || self.by_target.contains_key(&(handle, port))
    }

    pub fn disconnect(&mut self, connection: &Connection) {
        self.by_source.remove(&(connection.source, connection.source_port));
        self.by_target.remove(&(connection.target, connection.target_port));
    }

    /// All edges touching `handle`.
    pub fn connections_of(&self, handle: Handle) -> Vec<Connection> {
        let mut found: Vec<Connection> = self
            .by_source
            .values()
            .filter(|c| c.source == handle || c.target == handle)
            .copied()
            .collect();
        found.sort();
        found
    }

    /// Remove every edge touching `handle` and return them.
    pub fn disconnect_all(&mut self, handle: Handle) -> Vec<Connection> {
        let found = self.connections_of(handle);
        for c in &found {
            self.disconnect(c);
        }
        found
    }

    /// Outgoing ports of `handle` at or above `base`, ascending.
    pub fn outgoing_ports_from(&self, handle: Handle, base: Port) -> Vec<Port> {
        let mut ports: Vec<Port> = self
            .by_source
            .keys()
            .filter(|(h, p)| *h == handle && *p >= base)
            .map(|(_, p)| *p)
            .collect();
        ports.sort_unstable();
        ports
    }

    /// Incoming ports of `handle` at or above `base`, ascending.
    pub fn incoming_ports_from(&self, handle: Handle, base: Port) -> Vec<Port> {
        let mut ports: Vec<Port> = self
            .by_target
            .keys()
            .filter(|(h, p)| *h == handle && *p >= base)
            .map(|(_, p)| *p)
            .collect();
        ports.sort_unstable();
        ports
    }

    /// Every edge, sorted.
    pub fn all(&self) -> Vec<Connection> {
        let mut all: Vec<Connection> = self.by_source.values().copied().collect();
        all.sort();
        all
    }

    pub fn len(&self) -> usize {
        self.by_source.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_source.is_empty()
    }

    /// First edge whose two index entries disagree, if any.
    pub fn first_asymmetry(&self) -> Option<Connection> {
        let forward = self.by_source.values().find(|c| {
            self.by_target.get(&(c.target, c.target_port)) != Some(*c)
        });
        if let Some(c) = forward {
            return Some(*c);
        }
        self.by_target
            .values()
            .find(|c| self.by_source.get(&(c.source, c.source_port)) != Some(*c))
            .copied()
    }
}

// ============================================================
// Unit tests
// ============================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connect_is_visible_from_both_ends() {
        let (a, b) = (Handle::new(), Handle::new());
        let mut index = ConnectionIndex::new();
        index.connect(Connection::new(a, OUTLET, b, INLET)).unwrap();

        assert_eq!(index.outgoing(a, OUTLET).map(|c| c.target), Some(b));
        assert_eq!(index.incoming(b, INLET).map(|c| c.source), Some(a));
        assert!(index.first_asymmetry().is_none());
    }

    #[test]
    fn occupied_port_is_rejected() {
        let (a, b, c) = (Handle::new(), Handle::new(), Handle::new());
        let mut index = ConnectionIndex::new();
        index.connect(Connection::new(a, OUTLET, b, INLET)).unwrap();

        assert!(matches!(
            index.connect(Connection::new(a, OUTLET, c, INLET)),
            Err(ModelError::AlreadyConnected { handle, port: OUTLET }) if handle == a
        ));
        assert!(matches!(
            index.connect(Connection::new(c, OUTLET, b, INLET)),
            Err(ModelError::AlreadyConnected { handle, port: INLET }) if handle == b
        ));
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn disconnect_all_clears_every_edge_of_an_object() {
        let (a, b, c) = (Handle::new(), Handle::new(), Handle::new());
        let mut index = ConnectionIndex::new();
        index.connect(Connection::new(a, OUTLET, b, INLET)).unwrap();
        index.connect(Connection::new(b, OUTLET, c, INLET)).unwrap();

        let removed = index.disconnect_all(b);
        assert_eq!(removed.len(), 2);
        assert!(index.is_empty());
    }

    #[test]
    fn branch_ports_are_listed_in_order() {
        let splitter = Handle::new();
        let mut index = ConnectionIndex::new();
        for port in [BRANCH_BASE + 2, BRANCH_BASE, BRANCH_BASE + 1] {
            index
                .connect(Connection::new(splitter, port, Handle::new(), INLET))
                .unwrap();
        }
        assert_eq!(
            index.outgoing_ports_from(splitter, BRANCH_BASE),
            vec![BRANCH_BASE, BRANCH_BASE + 1, BRANCH_BASE + 2]
        );
    }
}
