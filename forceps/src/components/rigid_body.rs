use rapier3d::prelude::RigidBodyHandle;

/// Links an entity to its rigid body in [`crate::contexts::PhysicsContext`].
#[derive(Debug, Clone, Copy)]
pub struct RigidBody {
    /// Handle into the physics context's rigid body set
    pub handle: RigidBodyHandle,
}
