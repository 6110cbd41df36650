use glam::{Quat, Vec3};
use hecs::Entity;

/// Receives the transforms a tool produces each frame.
pub trait TransformSink {
    /// Set a rig part's translation relative to its parent.
    fn set_local_translation(&mut self, part: Entity, translation: Vec3);

    /// Set a rig part's rotation relative to its parent.
    fn set_local_rotation(&mut self, part: Entity, rotation: Quat);

    /// Move a held object to a position in world space.
    fn set_world_position(&mut self, object: Entity, position: Vec3);
}
