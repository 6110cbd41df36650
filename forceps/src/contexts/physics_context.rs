use std::collections::HashMap;

use crossbeam::channel::Receiver;
use glam::Vec3;
use hecs::Entity;
use rapier3d::na::Matrix3x1;
use rapier3d::prelude::*;

use crate::{
    components::{Collider as ColliderComponent, RigidBody as RigidBodyComponent},
    contexts::SpatialQuery,
    util::{na_vector_from_vec3, vec3_from_na_vector},
};

/// Everything rapier needs to step the simulation, plus a lookup from scene entities to the
/// rigid bodies that represent them.
pub struct PhysicsContext {
    pub physics_pipeline: PhysicsPipeline,
    pub gravity: Matrix3x1<f32>,
    pub colliders: ColliderSet,
    pub broad_phase: BroadPhase,
    pub narrow_phase: NarrowPhase,
    pub rigid_bodies: RigidBodySet,
    pub island_manager: IslandManager,
    pub collision_recv: Receiver<CollisionEvent>,
    pub contact_force_recv: Receiver<ContactForceEvent>,
    pub event_handler: ChannelEventCollector,
    pub integration_parameters: IntegrationParameters,
    pub impulse_joints: ImpulseJointSet,
    pub multibody_joints: MultibodyJointSet,
    pub ccd_solver: CCDSolver,
    pub query_pipeline: QueryPipeline,
    body_handles: HashMap<Entity, RigidBodyHandle>,
}

impl Default for PhysicsContext {
    fn default() -> Self {
        let (collision_send, collision_recv) = crossbeam::channel::unbounded();
        let (contact_force_send, contact_force_recv) = crossbeam::channel::unbounded();
        let event_handler = ChannelEventCollector::new(collision_send, contact_force_send);
        let gravity: Matrix3x1<f32> = vector![0.0, -9.81, 0.0];
        let mut integration_parameters = IntegrationParameters::default();

        // Matches the frame rate the tool is usually driven at; hosts can override it.
        integration_parameters.dt = 1. / 72.;

        PhysicsContext {
            physics_pipeline: PhysicsPipeline::new(),
            gravity,
            colliders: ColliderSet::new(),
            broad_phase: BroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            rigid_bodies: RigidBodySet::new(),
            island_manager: IslandManager::new(),
            collision_recv,
            contact_force_recv,
            event_handler,
            integration_parameters,
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            body_handles: Default::default(),
        }
    }
}

impl PhysicsContext {
    /// Step the simulation by `dt` seconds. Collision events end up in `collision_recv`.
    ///
    /// A frame with no elapsed time leaves the simulation where it is.
    pub fn update(&mut self, dt: f32) {
        if dt <= 0. {
            return;
        }
        self.integration_parameters.dt = dt;

        self.physics_pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            &self.event_handler,
        );
    }

    /// Add a rigid body and its collider to the simulation on behalf of `entity`.
    pub fn create_rigid_body_and_collider(
        &mut self,
        entity: Entity,
        rigid_body: RigidBody,
        mut collider: Collider,
    ) -> (RigidBodyComponent, ColliderComponent) {
        collider.user_data = entity.to_bits().get() as _;
        let rigid_body_handle = self.rigid_bodies.insert(rigid_body);
        let collider_handle =
            self.colliders
                .insert_with_parent(collider, rigid_body_handle, &mut self.rigid_bodies);

        self.body_handles.insert(entity, rigid_body_handle);
        self.query_pipeline.update(&self.rigid_bodies, &self.colliders);

        (
            RigidBodyComponent {
                handle: rigid_body_handle,
            },
            ColliderComponent {
                handle: collider_handle,
            },
        )
    }

    /// Remove the rigid body (and its colliders) belonging to `entity`. Does nothing if `entity`
    /// never had one.
    pub fn remove_rigid_body(&mut self, entity: Entity) {
        let Some(handle) = self.body_handles.remove(&entity) else {
            return;
        };

        self.rigid_bodies.remove(
            handle,
            &mut self.island_manager,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            true,
        );
        self.query_pipeline.update(&self.rigid_bodies, &self.colliders);
    }

    /// Find the entity a collider was created for.
    pub fn entity_for_collider(&self, handle: ColliderHandle) -> Option<Entity> {
        let collider = self.colliders.get(handle)?;
        Entity::from_bits(collider.user_data as u64)
    }

    /// Move an externally driven body, such as the tool itself, to a new pose.
    pub fn set_kinematic_pose(&mut self, entity: Entity, pose: Isometry<Real>) {
        if let Some(rigid_body) = self.rigid_body_mut(entity) {
            rigid_body.set_next_kinematic_position(pose);
        }
    }

    fn rigid_body(&self, entity: Entity) -> Option<&RigidBody> {
        let handle = self.body_handles.get(&entity)?;
        self.rigid_bodies.get(*handle)
    }

    fn rigid_body_mut(&mut self, entity: Entity) -> Option<&mut RigidBody> {
        let handle = self.body_handles.get(&entity)?;
        self.rigid_bodies.get_mut(*handle)
    }
}

impl SpatialQuery for PhysicsContext {
    fn overlap_near(&self, origin: Vec3, radius: f32) -> Vec<Entity> {
        let sphere = Ball::new(radius);
        let sphere_position = Isometry::translation(origin.x, origin.y, origin.z);
        let mut found = Vec::new();

        self.query_pipeline.intersections_with_shape(
            &self.rigid_bodies,
            &self.colliders,
            &sphere_position,
            &sphere,
            QueryFilter::default(),
            |handle| {
                if let Some(entity) = self.entity_for_collider(handle) {
                    if !found.contains(&entity) {
                        found.push(entity);
                    }
                }
                true
            },
        );

        found
    }

    fn contains(&self, entity: Entity) -> bool {
        self.rigid_body(entity).is_some()
    }

    fn position(&self, entity: Entity) -> Option<Vec3> {
        self.rigid_body(entity)
            .map(|rigid_body| vec3_from_na_vector(rigid_body.translation()))
    }

    fn set_position(&mut self, entity: Entity, position: Vec3) {
        let Some(rigid_body) = self.rigid_body_mut(entity) else {
            return;
        };

        let translation = na_vector_from_vec3(position);
        rigid_body.set_translation(translation, true);
        if rigid_body.is_kinematic() {
            rigid_body.set_next_kinematic_translation(translation);
        }
    }

    fn set_kinematic(&mut self, entity: Entity, kinematic: bool) {
        let Some(rigid_body) = self.rigid_body_mut(entity) else {
            return;
        };

        // Kinematic position based so it can be updated with the tool
        let body_type = if kinematic {
            RigidBodyType::KinematicPositionBased
        } else {
            RigidBodyType::Dynamic
        };
        rigid_body.set_body_type(body_type, true);
    }

    fn is_kinematic(&self, entity: Entity) -> Option<bool> {
        self.rigid_body(entity)
            .map(|rigid_body| rigid_body.is_kinematic())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use hecs::World;

    fn add_ball(
        world: &mut World,
        physics_context: &mut PhysicsContext,
        position: [f32; 3],
    ) -> Entity {
        let entity = world.spawn(());
        let rigid_body = RigidBodyBuilder::dynamic()
            .translation(vector![position[0], position[1], position[2]])
            .build();
        let collider = ColliderBuilder::ball(0.01).build();
        let components =
            physics_context.create_rigid_body_and_collider(entity, rigid_body, collider);
        world.insert(entity, components).unwrap();
        entity
    }

    #[test]
    fn test_overlap_near() {
        let mut world = World::default();
        let mut physics_context = PhysicsContext::default();
        let near = add_ball(&mut world, &mut physics_context, [0.05, 0., 0.]);
        let far = add_ball(&mut world, &mut physics_context, [1., 0., 0.]);

        let found = physics_context.overlap_near(Vec3::ZERO, 0.1);
        assert_eq!(found, vec![near]);

        let found = physics_context.overlap_near(Vec3::ZERO, 2.);
        assert!(found.contains(&near));
        assert!(found.contains(&far));
    }

    #[test]
    fn test_overlap_follows_the_simulation() {
        let mut world = World::default();
        let mut physics_context = PhysicsContext::default();
        let ball = add_ball(&mut world, &mut physics_context, [0., 0., 0.]);

        for _ in 0..36 {
            physics_context.update(1. / 72.);
        }

        let position = physics_context.position(ball).unwrap();
        assert!(position.y < -0.5);
        assert!(physics_context.overlap_near(Vec3::ZERO, 0.1).is_empty());
        assert_eq!(physics_context.overlap_near(position, 0.1), vec![ball]);
    }

    #[test]
    fn test_zero_dt_does_not_step() {
        let mut world = World::default();
        let mut physics_context = PhysicsContext::default();
        let ball = add_ball(&mut world, &mut physics_context, [5., 1., 0.]);

        for _ in 0..10 {
            physics_context.update(0.);
            physics_context.update(-1.);
        }

        assert_eq!(physics_context.position(ball), Some(Vec3::new(5., 1., 0.)));
        assert_relative_eq!(physics_context.integration_parameters.dt, 1. / 72.);
    }

    #[test]
    fn test_kinematic_flag_and_position() {
        let mut world = World::default();
        let mut physics_context = PhysicsContext::default();
        let ball = add_ball(&mut world, &mut physics_context, [0., 1., 0.]);

        assert_eq!(physics_context.is_kinematic(ball), Some(false));
        physics_context.set_kinematic(ball, true);
        assert_eq!(physics_context.is_kinematic(ball), Some(true));

        physics_context.set_position(ball, Vec3::new(0.5, 0.5, 0.5));
        assert_relative_eq!(
            physics_context.position(ball).unwrap(),
            Vec3::new(0.5, 0.5, 0.5)
        );

        physics_context.set_kinematic(ball, false);
        assert_eq!(physics_context.is_kinematic(ball), Some(false));
    }

    #[test]
    fn test_removed_bodies_are_absent() {
        let mut world = World::default();
        let mut physics_context = PhysicsContext::default();
        let ball = add_ball(&mut world, &mut physics_context, [0., 0., 0.]);
        assert!(physics_context.contains(ball));

        physics_context.remove_rigid_body(ball);

        assert!(!physics_context.contains(ball));
        assert_eq!(physics_context.position(ball), None);
        assert_eq!(physics_context.is_kinematic(ball), None);
        assert!(physics_context.overlap_near(Vec3::ZERO, 1.).is_empty());

        // Mutations on absent entities are ignored
        physics_context.set_kinematic(ball, true);
        physics_context.set_position(ball, Vec3::ONE);
        physics_context.remove_rigid_body(ball);
    }

    #[test]
    fn test_entity_for_collider() {
        let mut world = World::default();
        let mut physics_context = PhysicsContext::default();
        let ball = add_ball(&mut world, &mut physics_context, [0., 0., 0.]);
        let handle = world
            .get::<&crate::components::Collider>(ball)
            .unwrap()
            .handle;

        assert_eq!(physics_context.entity_for_collider(handle), Some(ball));
    }
}
