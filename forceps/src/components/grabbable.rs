use hecs::Entity;

/// Tag component for objects that a tool is allowed to pick up.
#[derive(Debug, Clone, Copy)]
pub struct Grabbable;

/// Added to an object while a tool holds it. Removed again when the tool lets go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grabbed {
    /// The tool holding this object
    pub tool: Entity,
}
