use glam::Vec3;
use hecs::{Entity, World};

use crate::{
    components::{Forceps, GlobalTransform, LocalTransform, RigPart},
    contexts::TransformSink,
    Scene,
};

/// A transform the animation system wants written this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PoseWrite {
    /// A rig part's pose, relative to the tool
    Part {
        entity: Entity,
        pose: LocalTransform,
    },
    /// A held object pinned to the tool's grip anchor, in world space
    HeldObject { entity: Entity, position: Vec3 },
}

impl PoseWrite {
    pub fn apply<S: TransformSink>(self, sink: &mut S) {
        match self {
            PoseWrite::Part { entity, pose } => {
                sink.set_local_translation(entity, pose.translation);
                sink.set_local_rotation(entity, pose.rotation);
            }
            PoseWrite::HeldObject { entity, position } => {
                sink.set_world_position(entity, position);
            }
        }
    }
}

/// Forceps animation system
/// Eases each tool's openness toward what its grasp wants, poses the rig to match, and keeps any
/// held object on the grip anchor.
pub fn forceps_animation_system(scene: &mut Scene, dt: f32) {
    let writes = forceps_animation_system_inner(&mut scene.world, dt);
    for write in writes {
        write.apply(&mut *scene);
    }
}

pub(crate) fn forceps_animation_system_inner(world: &mut World, dt: f32) -> Vec<PoseWrite> {
    let mut writes = Vec::new();

    for (_, (forceps, global_transform)) in
        world.query_mut::<(&mut Forceps, &GlobalTransform)>()
    {
        let target = forceps.target_openness();
        let speed = forceps.settings.animation_speed;
        let openness = forceps.openness.step(target, speed, dt);

        for part in RigPart::ALL {
            let (Some(entity), Some(pose)) = (
                forceps.rig.entity(part),
                forceps.rig.pose(part, openness, &forceps.settings),
            ) else {
                continue;
            };
            writes.push(PoseWrite::Part { entity, pose });
        }

        let Some(entity) = forceps.held() else {
            continue;
        };
        if let Some(position) = forceps.grip_anchor(&global_transform.0) {
            writes.push(PoseWrite::HeldObject { entity, position });
        }
    }

    writes
}
