use glam::{Affine3A, Vec3};
use rapier3d::na;

/// Move `current` toward `target` by at most `max_delta`, without overshooting.
#[inline]
pub fn move_towards(current: f32, target: f32, max_delta: f32) -> f32 {
    let delta = target - current;
    if delta.abs() <= max_delta {
        target
    } else {
        current + delta.signum() * max_delta
    }
}

#[inline]
/// Convert a [`glam::Vec3`] into a [`rapier3d::na::Vector3`]
pub fn na_vector_from_vec3(v: Vec3) -> na::Vector3<f32> {
    na::Vector3::new(v.x, v.y, v.z)
}

#[inline]
/// Convert a [`rapier3d::na::Vector3`] into a [`glam::Vec3`]
pub fn vec3_from_na_vector(v: &na::Vector3<f32>) -> Vec3 {
    Vec3::new(v.x, v.y, v.z)
}

#[inline]
/// Convert a [`glam::Affine3A`] into a [`rapier3d::na::Isometry3`], dropping any scale
pub fn isometry_from_affine(a: &Affine3A) -> na::Isometry3<f32> {
    let (_, r, t) = a.to_scale_rotation_translation();
    let translation = na::Translation3::new(t.x, t.y, t.z);
    let rotation = na::UnitQuaternion::new_normalize(na::Quaternion::new(r.w, r.x, r.y, r.z));
    na::Isometry3::from_parts(translation, rotation)
}

#[inline]
/// Convert a [`rapier3d::na::Isometry3`] into a [`glam::Affine3A`]
pub fn affine_from_isometry(i: &na::Isometry3<f32>) -> Affine3A {
    let t = i.translation.vector;
    let r = i.rotation;
    Affine3A::from_rotation_translation(
        glam::Quat::from_xyzw(r.i, r.j, r.k, r.w),
        Vec3::new(t.x, t.y, t.z),
    )
}

#[cfg(test)]
use {
    crate::contexts::SpatialQuery,
    hecs::{Entity, World},
    std::collections::HashMap,
};

/// An in-memory stand-in for the physics context, for tests that only care about positions and
/// kinematic flags.
#[cfg(test)]
#[derive(Default)]
pub(crate) struct FakeSpace {
    world: World,
    objects: HashMap<Entity, (Vec3, bool)>,
}

#[cfg(test)]
impl FakeSpace {
    pub fn add(&mut self, position: [f32; 3]) -> Entity {
        let entity = self.world.spawn(());
        self.objects.insert(entity, (position.into(), false));
        entity
    }

    pub fn remove(&mut self, entity: Entity) {
        self.objects.remove(&entity);
        let _ = self.world.despawn(entity);
    }
}

#[cfg(test)]
impl SpatialQuery for FakeSpace {
    fn overlap_near(&self, origin: Vec3, radius: f32) -> Vec<Entity> {
        self.objects
            .iter()
            .filter(|(_, (position, _))| position.distance(origin) <= radius)
            .map(|(entity, _)| *entity)
            .collect()
    }

    fn contains(&self, entity: Entity) -> bool {
        self.objects.contains_key(&entity)
    }

    fn position(&self, entity: Entity) -> Option<Vec3> {
        self.objects.get(&entity).map(|(position, _)| *position)
    }

    fn set_position(&mut self, entity: Entity, position: Vec3) {
        if let Some(object) = self.objects.get_mut(&entity) {
            object.0 = position;
        }
    }

    fn set_kinematic(&mut self, entity: Entity, kinematic: bool) {
        if let Some(object) = self.objects.get_mut(&entity) {
            object.1 = kinematic;
        }
    }

    fn is_kinematic(&self, entity: Entity) -> Option<bool> {
        self.objects.get(&entity).map(|(_, kinematic)| *kinematic)
    }
}

#[cfg(test)]
impl crate::contexts::TransformSink for FakeSpace {
    fn set_local_translation(&mut self, _: Entity, _: Vec3) {}

    fn set_local_rotation(&mut self, _: Entity, _: glam::Quat) {}

    fn set_world_position(&mut self, object: Entity, position: Vec3) {
        self.set_position(object, position);
    }
}
