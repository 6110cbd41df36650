use glam::Vec3;
use hecs::Entity;

/// The narrow slice of a physics engine that a tool needs.
///
/// Objects are identified by their [`Entity`] handle. Implementations must treat an entity they
/// don't know about (never registered, or since destroyed) as absent: queries return `None` or
/// `false` and mutations do nothing.
pub trait SpatialQuery {
    /// Every object whose shape overlaps a sphere of `radius` around `origin`. The result is a
    /// one-shot snapshot; order is unspecified.
    fn overlap_near(&self, origin: Vec3, radius: f32) -> Vec<Entity>;

    /// Is this object still part of the simulation?
    fn contains(&self, entity: Entity) -> bool;

    /// The object's position in world space.
    fn position(&self, entity: Entity) -> Option<Vec3>;

    /// Teleport the object to a new world position.
    fn set_position(&mut self, entity: Entity, position: Vec3);

    /// `true` takes the object out of the simulation so it can be positioned externally,
    /// `false` hands it back to the simulation.
    fn set_kinematic(&mut self, entity: Entity, kinematic: bool);

    /// Is the object currently positioned externally?
    fn is_kinematic(&self, entity: Entity) -> Option<bool>;
}
