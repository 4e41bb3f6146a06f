//! Model-level error types.

use thiserror::Error;

use crate::objects::Handle;

/// Errors produced by model mutations, loop traversal and validation.
#[derive(Debug, Error)]
pub enum ModelError {
    // ------ Lookup errors ------

    /// The handle does not belong to this model.
    #[error("object {0} is not in this model")]
    NotInModel(Handle),

    /// The object exists but is of the wrong kind for the operation.
    #[error("object {handle} is a {found}, expected {expected}")]
    WrongKind {
        handle: Handle,
        expected: &'static str,
        found: &'static str,
    },

    // ------ Connection errors ------

    /// The node does not lie on any loop path.
    #[error("node {0} is not on a loop")]
    NodeNotOnLoop(Handle),

    /// The component cannot be placed on the side of the loop the node is on.
    #[error("component {component} cannot be placed at node {node} ({location})")]
    IncompatibleComponent {
        component: Handle,
        node: Handle,
        location: String,
    },

    /// A port that must be free is already connected.
    #[error("port {port} of {handle} is already connected")]
    AlreadyConnected { handle: Handle, port: u32 },

    /// The component already sits on the other side of this loop.
    #[error("component {component} is already on loop {loop_handle}")]
    SameLoop { component: Handle, loop_handle: Handle },

    /// An air loop already owns an outdoor air system.
    #[error("air loop {0} already has an outdoor air system")]
    DuplicateOutdoorAirSystem(Handle),

    // ------ Setpoint manager errors ------

    /// The manager kind may not control a node at this location.
    #[error("setpoint manager {spm} cannot be placed at node {node} ({location})")]
    IncompatibleSetpointManager {
        spm: Handle,
        node: Handle,
        location: String,
    },

    /// The control variable is not accepted by this manager kind.
    #[error("control variable '{control_variable}' is not valid for {kind}")]
    InvalidControlVariable {
        kind: &'static str,
        control_variable: String,
    },

    /// A component's type or a manager's kind is fixed once created.
    #[error("object kind cannot change from {from} to {to}")]
    KindChanged { from: &'static str, to: &'static str },

    // ------ Removal / cloning ------

    /// Another object still points at this one.
    #[error("object {handle} is still used by {by}")]
    ObjectInUse { handle: Handle, by: Handle },

    /// Loops and their fixed parts are not cloneable.
    #[error("object {0} cannot be cloned")]
    CannotClone(Handle),

    // ------ Topology errors ------

    /// A structural invariant does not hold.
    #[error("topology error at {handle}: {message}")]
    Topology { handle: Handle, message: String },

    /// Walking a loop path revisited an object.
    #[error("loop path revisits object {0}")]
    CycleDetected(Handle),

    /// A component lies on two paths of one loop.
    #[error("component {0} lies on more than one path of the loop")]
    MultiPathComponent(Handle),

    /// A node occurs more than once within one loop.
    #[error("node {0} occurs more than once in the loop")]
    DuplicateNode(Handle),

    /// Two managers on one node share a control variable.
    #[error("node {node} has more than one '{control_variable}' setpoint manager")]
    DuplicateControlVariable {
        node: Handle,
        control_variable: String,
    },

    // ------ Persistence ------

    /// JSON (de)serialisation failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A loaded document is internally inconsistent.
    #[error("invalid model document: {0}")]
    InvalidDocument(String),
}
