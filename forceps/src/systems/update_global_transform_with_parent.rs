use crate::{
    components::{GlobalTransform, LocalTransform, Parent},
    Scene,
};
use hecs::World;

/// Update global transform with parent transform system
/// Walks through each entity that has a Parent and builds a hierarchy
/// Then transforms each entity based on the hierarchy
pub fn update_global_transform_with_parent_system(scene: &mut Scene) {
    let world = &mut scene.world;
    update_global_transform_with_parent_system_inner(world);
}

pub(crate) fn update_global_transform_with_parent_system_inner(world: &mut World) {
    // Random access into every entity that has a parent, for walking up the hierarchy.
    let mut parents = world.query::<(&Parent, &LocalTransform)>();
    let parents = parents.view();

    // Roots of the hierarchy, such as the tool itself.
    let mut roots = world.query::<&GlobalTransform>().without::<&Parent>();
    let roots = roots.view();

    // Can't alias `roots`: everything here has a `Parent`, nothing there does.
    for (_, (parent, local_transform, global_transform)) in world
        .query::<(&Parent, &LocalTransform, &mut GlobalTransform)>()
        .iter()
    {
        let mut relative = local_transform.to_affine();
        let mut ancestor = parent.0;
        while let Some((next, next_local_transform)) = parents.get(ancestor) {
            relative = next_local_transform.to_affine() * relative;
            ancestor = next.0;
        }

        // The root may have been despawned out from under us
        if let Some(root) = roots.get(ancestor) {
            global_transform.0 = root.0 * relative;
        }
    }
}
