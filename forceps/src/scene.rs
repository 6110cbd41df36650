use glam::{Affine3A, Quat, Vec3};
use hecs::{Entity, World};
use log::{debug, info, warn};
use rapier3d::prelude::{ActiveCollisionTypes, ActiveEvents, ColliderBuilder, RigidBodyBuilder};

use crate::{
    components::{
        Forceps, GlobalTransform, Grabbable, Grabbed, LocalTransform, Parent, Rig, RigPart,
    },
    contexts::{InputContext, PhysicsContext, SpatialQuery, TransformSink},
    systems::{
        contacts_system, forceps_animation_system, forceps_input_system,
        grasping::apply_grasp_changes, grasping_system, physics_system,
        update_global_transform_with_parent_system,
    },
    util::na_vector_from_vec3,
    ForcepsError, ForcepsResult, ToolSettings,
};

/// The world a tool lives in: entities, the physics simulation and the activate control.
///
/// Hosts move each tool by writing its root [`GlobalTransform`], feed the activate control into
/// `input_context` and call [`Scene::tick`] once per frame.
#[derive(Default)]
pub struct Scene {
    /// All entities in the scene
    pub world: World,
    /// The physics simulation the tool picks objects out of
    pub physics_context: PhysicsContext,
    /// State of the activate control
    pub input_context: InputContext,
}

impl Scene {
    /// Create an empty scene.
    pub fn new() -> Self {
        Default::default()
    }

    /// Advance the scene by `dt` seconds.
    ///
    /// Order matters: contacts come from this frame's physics step, intent edges are applied
    /// before grasping so a pinch can happen on the frame the tool closes, and held objects are
    /// pinned after the grasp for this frame is settled.
    pub fn tick(&mut self, dt: f32) {
        physics_system(self, dt);
        contacts_system(self);
        forceps_input_system(self);
        grasping_system(self);
        forceps_animation_system(self, dt);
        update_global_transform_with_parent_system(self);
    }

    /// Add a dynamic ball that tools can pick up.
    pub fn add_grabbable(&mut self, position: Vec3, radius: f32) -> Entity {
        let local_transform = LocalTransform::from_rotation_translation(Quat::IDENTITY, position);
        let entity = self.world.spawn((
            Grabbable,
            local_transform,
            GlobalTransform::from(local_transform),
        ));

        let rigid_body = RigidBodyBuilder::dynamic()
            .translation(na_vector_from_vec3(position))
            .build();
        let collider = ColliderBuilder::ball(radius).build();
        let components =
            self.physics_context
                .create_rigid_body_and_collider(entity, rigid_body, collider);
        // The entity was spawned just above.
        let _ = self.world.insert(entity, components);

        debug!("[FORCEPS_SCENE] Added grabbable {entity:?} at {position:?}");
        entity
    }

    /// Spawn a tool at `global_transform`, with one child entity per rig part.
    pub fn add_forceps(
        &mut self,
        settings: ToolSettings,
        global_transform: Affine3A,
        parts: impl IntoIterator<Item = (RigPart, LocalTransform)>,
    ) -> ForcepsResult<Entity> {
        settings.validate()?;

        let tool = self.world.spawn((GlobalTransform(global_transform),));
        let parts = parts
            .into_iter()
            .map(|(part, local_transform)| {
                let entity = self.world.spawn((
                    part,
                    local_transform,
                    GlobalTransform::default(),
                    Parent(tool),
                ));
                (part, entity)
            })
            .collect::<Vec<_>>();

        self.attach_forceps(tool, settings, parts)?;
        Ok(tool)
    }

    /// Turn an existing entity into a tool. Each of `parts` must already have a [`LocalTransform`]
    /// relative to `tool`: that is taken as the part's rest pose.
    pub fn attach_forceps(
        &mut self,
        tool: Entity,
        settings: ToolSettings,
        parts: impl IntoIterator<Item = (RigPart, Entity)>,
    ) -> ForcepsResult<()> {
        if !self.world.contains(tool) {
            return Err(ForcepsError::NoSuchEntity(tool));
        }

        let mut rig = Rig::default();
        for (part, entity) in parts {
            let Ok(rest) = self.world.get::<&LocalTransform>(entity).map(|l| *l) else {
                warn!("[FORCEPS_SCENE] {part:?} {entity:?} has no LocalTransform, ignoring it");
                continue;
            };
            rig = rig.with_part(part, entity, rest);
            if self.world.get::<&Parent>(entity).is_err() {
                let _ = self.world.insert_one(entity, Parent(tool));
            }
        }

        let global_transform = match self.world.get::<&GlobalTransform>(tool) {
            Ok(global_transform) => *global_transform,
            Err(_) => GlobalTransform::default(),
        };

        // The contact sensor sits where held objects end up.
        let sensor_offset = rig
            .grip_anchor(&Affine3A::IDENTITY, settings.initial_openness, &settings)
            .unwrap_or(Vec3::ZERO);
        let rigid_body = RigidBodyBuilder::kinematic_position_based()
            .position(global_transform.to_isometry())
            .build();
        let collider = ColliderBuilder::ball(settings.contact_radius)
            .translation(na_vector_from_vec3(sensor_offset))
            .sensor(true)
            .active_events(ActiveEvents::COLLISION_EVENTS)
            .active_collision_types(ActiveCollisionTypes::all())
            .build();

        let forceps = Forceps::new(settings, rig)?;
        let (rigid_body, collider) =
            self.physics_context
                .create_rigid_body_and_collider(tool, rigid_body, collider);
        self.world
            .insert(tool, (forceps, global_transform, rigid_body, collider))
            .map_err(|_| ForcepsError::NoSuchEntity(tool))?;

        update_global_transform_with_parent_system(self);
        info!("[FORCEPS_SCENE] Attached forceps to {tool:?}");
        Ok(())
    }

    /// Remove a tool and its rig parts from the scene. Anything it was holding goes back to the
    /// physics simulation.
    pub fn remove_forceps(&mut self, tool: Entity) -> ForcepsResult<()> {
        let (change, parts) = {
            let mut forceps = self
                .world
                .get::<&mut Forceps>(tool)
                .map_err(|_| ForcepsError::NoSuchEntity(tool))?;
            let change = forceps.teardown(&mut self.physics_context);
            let parts = RigPart::ALL
                .into_iter()
                .filter_map(|part| forceps.rig.entity(part))
                .collect::<Vec<_>>();
            (change, parts)
        };
        apply_grasp_changes(&mut self.world, change.map(|change| (tool, change)));

        for part in parts {
            let _ = self.world.despawn(part);
        }
        self.physics_context.remove_rigid_body(tool);
        let _ = self.world.despawn(tool);

        info!("[FORCEPS_SCENE] Removed forceps {tool:?}");
        Ok(())
    }

    /// Remove an entity and its rigid body. Tools are torn down first, see
    /// [`Scene::remove_forceps`].
    pub fn despawn(&mut self, entity: Entity) -> ForcepsResult<()> {
        if self.world.get::<&Forceps>(entity).is_ok() {
            return self.remove_forceps(entity);
        }

        self.physics_context.remove_rigid_body(entity);
        self.world
            .despawn(entity)
            .map_err(|_| ForcepsError::NoSuchEntity(entity))
    }

    /// Which tool, if any, is holding `object`.
    pub fn held_by(&self, object: Entity) -> Option<Entity> {
        self.world.get::<&Grabbed>(object).ok().map(|g| g.tool)
    }
}

impl TransformSink for Scene {
    fn set_local_translation(&mut self, part: Entity, translation: Vec3) {
        if let Ok(mut local_transform) = self.world.get::<&mut LocalTransform>(part) {
            local_transform.translation = translation;
        }
    }

    fn set_local_rotation(&mut self, part: Entity, rotation: Quat) {
        if let Ok(mut local_transform) = self.world.get::<&mut LocalTransform>(part) {
            local_transform.rotation = rotation;
        }
    }

    fn set_world_position(&mut self, object: Entity, position: Vec3) {
        self.physics_context.set_position(object, position);
        if let Ok(mut global_transform) = self.world.get::<&mut GlobalTransform>(object) {
            global_transform.0.translation = position.into();
        }
        if let Ok(mut local_transform) = self.world.get::<&mut LocalTransform>(object) {
            local_transform.translation = position;
        }
    }
}
