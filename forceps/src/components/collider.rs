use rapier3d::prelude::ColliderHandle;

/// Links an entity to its collider in [`crate::contexts::PhysicsContext`].
#[derive(Debug, Clone, Copy)]
pub struct Collider {
    /// Handle into the physics context's collider set
    pub handle: ColliderHandle,
}
