use hecs::{Entity, World};

use crate::{
    components::{Forceps, GlobalTransform, GraspChange},
    contexts::{InputContext, IntentEdge, PhysicsContext},
    systems::grasping::{apply_grasp_changes, is_available},
    Scene,
};

/// Turns this frame's activate control edges into open and closed intents for every bound tool.
pub fn forceps_input_system(scene: &mut Scene) {
    forceps_input_system_inner(
        &mut scene.world,
        &mut scene.physics_context,
        &scene.input_context,
    );
}

pub(crate) fn forceps_input_system_inner(
    world: &mut World,
    physics_context: &mut PhysicsContext,
    input_context: &InputContext,
) {
    let mut changes: Vec<(Entity, GraspChange)> = Vec::new();

    for (tool, (forceps, global_transform)) in
        world.query::<(&mut Forceps, &GlobalTransform)>().iter()
    {
        // Unbound, or torn down
        let Some(trigger_mode) = forceps.trigger_mode() else {
            continue;
        };

        let change = match input_context.intent_edge(trigger_mode) {
            Some(IntentEdge::Activate) => {
                forceps.activate(&global_transform.0, physics_context, |entity| {
                    is_available(world, &changes, entity)
                })
            }
            Some(IntentEdge::Deactivate) => forceps.deactivate(physics_context),
            None => None,
        };
        changes.extend(change.map(|change| (tool, change)));
    }

    apply_grasp_changes(world, changes);
}
