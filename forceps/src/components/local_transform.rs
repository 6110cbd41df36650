use glam::{Affine3A, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// The entity's position relative to its [`super::Parent`], or in global space if it has none.
///
/// Rig parts are driven through this component: the animation system rewrites translation and
/// rotation every frame and `update_global_transform_with_parent_system` turns the result into a
/// [`super::GlobalTransform`].
#[derive(Clone, PartialEq, Debug, Copy, Deserialize, Serialize)]
pub struct LocalTransform {
    /// The translation of the entity
    pub translation: Vec3,
    /// The rotation of the entity
    pub rotation: Quat,
    /// The non-uniform scale of the entity
    pub scale: Vec3,
}

impl Default for LocalTransform {
    fn default() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl LocalTransform {
    /// Create a transform with unit scale
    pub fn from_rotation_translation(rotation: Quat, translation: Vec3) -> Self {
        Self {
            translation,
            rotation,
            scale: Vec3::ONE,
        }
    }

    /// Convert the `LocalTransform` into an affine transform
    pub fn to_affine(&self) -> Affine3A {
        Affine3A::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }
}
