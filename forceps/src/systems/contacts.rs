use hecs::World;
use rapier3d::prelude::CollisionEvent;

use crate::{
    components::{Forceps, Grabbable},
    contexts::PhysicsContext,
    Scene,
};

/// Contacts system
/// Drains the collision events produced by the last physics step and tells each tool when a
/// grabbable object starts or stops touching it.
pub fn contacts_system(scene: &mut Scene) {
    let world = &mut scene.world;
    let physics_context = &mut scene.physics_context;
    contacts_system_inner(world, physics_context);
}

pub(crate) fn contacts_system_inner(world: &mut World, physics_context: &mut PhysicsContext) {
    // Contact force events are never requested, but don't let them pile up if a host does.
    physics_context.contact_force_recv.try_iter().for_each(drop);

    let events = physics_context.collision_recv.try_iter().collect::<Vec<_>>();
    for event in events {
        let (Some(a), Some(b)) = (
            physics_context.entity_for_collider(event.collider1()),
            physics_context.entity_for_collider(event.collider2()),
        ) else {
            continue;
        };

        for (tool, other) in [(a, b), (b, a)] {
            if world.get::<&Grabbable>(other).is_err() {
                continue;
            }
            let Ok(mut forceps) = world.get::<&mut Forceps>(tool) else {
                continue;
            };

            match event {
                CollisionEvent::Started(..) => forceps.on_contact_begin(other),
                CollisionEvent::Stopped(..) => forceps.on_contact_end(other),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hecs::Entity;
    use rapier3d::prelude::*;

    use crate::{components::Rig, ToolSettings};

    fn add_tool(world: &mut World, physics_context: &mut PhysicsContext) -> Entity {
        let forceps = Forceps::new(ToolSettings::forceps(), Rig::default()).unwrap();
        let tool = world.spawn((forceps,));
        let collider = ColliderBuilder::ball(0.05)
            .sensor(true)
            .active_events(ActiveEvents::COLLISION_EVENTS)
            .active_collision_types(ActiveCollisionTypes::all())
            .build();
        let components = physics_context.create_rigid_body_and_collider(
            tool,
            RigidBodyBuilder::kinematic_position_based().build(),
            collider,
        );
        world.insert(tool, components).unwrap();
        tool
    }

    fn add_object(
        world: &mut World,
        physics_context: &mut PhysicsContext,
        x: f32,
        grabbable: bool,
    ) -> Entity {
        let entity = world.spawn(());
        if grabbable {
            world.insert_one(entity, Grabbable).unwrap();
        }
        let components = physics_context.create_rigid_body_and_collider(
            entity,
            RigidBodyBuilder::dynamic()
                .translation(vector![x, 0., 0.])
                .build(),
            ColliderBuilder::ball(0.01).build(),
        );
        world.insert(entity, components).unwrap();
        entity
    }

    #[test]
    pub fn test_contacts() {
        let mut world = World::new();
        let mut physics_context = PhysicsContext::default();
        physics_context.gravity = vector![0., 0., 0.];

        let tool = add_tool(&mut world, &mut physics_context);
        let touching = add_object(&mut world, &mut physics_context, 0.03, true);
        let not_grabbable = add_object(&mut world, &mut physics_context, -0.03, false);
        let far = add_object(&mut world, &mut physics_context, 1., true);

        physics_context.update(1. / 72.);
        contacts_system_inner(&mut world, &mut physics_context);

        {
            let forceps = world.get::<&Forceps>(tool).unwrap();
            assert!(forceps.candidates.contains(touching));
            assert!(!forceps.candidates.contains(not_grabbable));
            assert!(!forceps.candidates.contains(far));
        }

        // Move the tool away: the contact ends
        physics_context.set_kinematic_pose(tool, Isometry::translation(10., 0., 0.));
        for _ in 0..3 {
            physics_context.update(1. / 72.);
            contacts_system_inner(&mut world, &mut physics_context);
        }

        let forceps = world.get::<&Forceps>(tool).unwrap();
        assert!(forceps.candidates.is_empty());
    }
}
