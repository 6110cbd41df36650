use hecs::{Entity, World};
use log::debug;

use crate::{
    components::{Forceps, GlobalTransform, Grabbable, Grabbed, GraspChange, GraspState},
    contexts::{PhysicsContext, SpatialQuery},
    Scene, SelectionPolicy,
};

/// Grasping system
/// Drops held objects and candidates that have been destroyed, then lets tools that pick objects
/// up by pinching check whether anything is caught between their jaw tips.
pub fn grasping_system(scene: &mut Scene) {
    let world = &mut scene.world;
    let physics_context = &mut scene.physics_context;
    grasping_system_inner(world, physics_context);
}

pub(crate) fn grasping_system_inner(world: &mut World, physics_context: &mut PhysicsContext) {
    let mut changes = Vec::new();

    for (tool, (forceps, global_transform)) in
        world.query::<(&mut Forceps, &GlobalTransform)>().iter()
    {
        if let Some(change) = forceps.validate(&*physics_context) {
            changes.push((tool, change));
        }

        if forceps.settings.selection_policy != SelectionPolicy::Pinch
            || forceps.state() != GraspState::Closing
        {
            continue;
        }

        let nearby = physics_context
            .overlap_near(
                global_transform.translation(),
                forceps.settings.detection_radius,
            )
            .into_iter()
            .filter(|entity| {
                *entity != tool
                    && world.get::<&Grabbable>(*entity).is_ok()
                    && is_available(world, &changes, *entity)
            });

        let change = forceps.try_pinch(nearby, &global_transform.0, physics_context);
        changes.extend(change.map(|change| (tool, change)));
    }

    apply_grasp_changes(world, changes);
}

/// Whether `object` is free to be picked up. `changes` are this frame's grasp changes, which
/// haven't reached the [`Grabbed`] markers yet.
pub(crate) fn is_available(
    world: &World,
    changes: &[(Entity, GraspChange)],
    object: Entity,
) -> bool {
    for (_, change) in changes.iter().rev() {
        match *change {
            GraspChange::Grabbed(entity) if entity == object => return false,
            GraspChange::Released(entity) | GraspChange::Lost(entity) if entity == object => {
                return true;
            }
            _ => {}
        }
    }

    world.get::<&Grabbed>(object).is_err()
}

/// Keep the [`Grabbed`] markers in `world` in step with what tools did this frame.
pub(crate) fn apply_grasp_changes(
    world: &mut World,
    changes: impl IntoIterator<Item = (Entity, GraspChange)>,
) {
    for (tool, change) in changes {
        match change {
            GraspChange::Grabbed(object) => {
                let _ = world.insert_one(object, Grabbed { tool });
            }
            GraspChange::Released(object) => {
                let _ = world.remove_one::<Grabbed>(object);
            }
            GraspChange::Lost(object) => {
                debug!("[FORCEPS_GRASPING] {tool:?} lost {object:?}");
            }
        }
    }
}
