use hecs::World;

use crate::{
    components::{Forceps, GlobalTransform, LocalTransform, RigidBody},
    contexts::PhysicsContext,
    util::affine_from_isometry,
    Scene,
};

/// Update the physics simulation.
///
/// Tools are moved by the host, so their bodies follow their [`GlobalTransform`] into the step.
/// Everything else is moved by the simulation, so their transforms follow their bodies out of it.
pub fn physics_system(scene: &mut Scene, dt: f32) {
    physics_system_inner(&mut scene.world, &mut scene.physics_context, dt);
}

pub(crate) fn physics_system_inner(
    world: &mut World,
    physics_context: &mut PhysicsContext,
    dt: f32,
) {
    for (tool, (_, global_transform)) in world.query::<(&Forceps, &GlobalTransform)>().iter() {
        physics_context.set_kinematic_pose(tool, global_transform.to_isometry());
    }

    physics_context.update(dt);

    for (_, (rigid_body, global_transform, local_transform)) in world
        .query::<(&RigidBody, &mut GlobalTransform, Option<&mut LocalTransform>)>()
        .without::<&Forceps>()
        .iter()
    {
        let Some(body) = physics_context.rigid_bodies.get(rigid_body.handle) else {
            continue;
        };

        global_transform.0 = affine_from_isometry(body.position());
        if let Some(local_transform) = local_transform {
            let (_, rotation, translation) = global_transform.0.to_scale_rotation_translation();
            local_transform.translation = translation;
            local_transform.rotation = rotation;
        }
    }
}
