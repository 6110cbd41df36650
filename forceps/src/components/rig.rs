use glam::{Affine3A, Quat, Vec3};
use hecs::Entity;

use crate::{components::LocalTransform, GripAnchor, ToolSettings};

/// The named parts of a tool's rig.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RigPart {
    /// Slides forward as the tool opens
    Stem,
    /// Follows the stem, a little behind
    Pusher,
    /// Swings open one way
    LeftJaw,
    /// Swings open the other way
    RightJaw,
    /// Where held objects are pinned
    GripAnchor,
}

impl RigPart {
    /// Every part, in the order the animation system drives them.
    pub const ALL: [RigPart; 5] = [
        RigPart::Stem,
        RigPart::Pusher,
        RigPart::LeftJaw,
        RigPart::RightJaw,
        RigPart::GripAnchor,
    ];

    fn index(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct BoundPart {
    entity: Entity,
    rest: LocalTransform,
}

/// A tool's rig: which entity plays each [`RigPart`], and the pose each part had when the tool was
/// set up (its *rest* pose).
///
/// Rest poses never change after capture. A part's current pose is always [`Rig::pose`] of the
/// rest pose and the tool's openness, so the rig has no animation state of its own. Parts that
/// weren't supplied are simply not animated.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Rig {
    parts: [Option<BoundPart>; 5],
}

impl Rig {
    /// Bind `entity` to `part`, with `rest` as its rest pose. Binding the same part twice replaces
    /// the earlier binding.
    pub fn with_part(mut self, part: RigPart, entity: Entity, rest: LocalTransform) -> Self {
        self.parts[part.index()] = Some(BoundPart { entity, rest });
        self
    }

    /// The entity bound to `part`.
    pub fn entity(&self, part: RigPart) -> Option<Entity> {
        self.parts[part.index()].map(|p| p.entity)
    }

    pub fn rest_pose(&self, part: RigPart) -> Option<LocalTransform> {
        self.parts[part.index()].map(|p| p.rest)
    }

    /// Parts that have no entity bound to them.
    pub fn missing_parts(&self) -> impl Iterator<Item = RigPart> + '_ {
        RigPart::ALL
            .into_iter()
            .filter(|part| self.parts[part.index()].is_none())
    }

    /// The pose of `part`, relative to the tool root, at the given openness.
    pub fn pose(
        &self,
        part: RigPart,
        openness: f32,
        settings: &ToolSettings,
    ) -> Option<LocalTransform> {
        let rest = self.rest_pose(part)?;
        Some(pose_at(&rest, part, openness, settings))
    }

    /// The world space positions of the left and right jaw tips.
    pub fn jaw_tips(
        &self,
        global_from_tool: &Affine3A,
        openness: f32,
        settings: &ToolSettings,
    ) -> Option<(Vec3, Vec3)> {
        let tip = |part| {
            let tool_from_jaw = self.pose(part, openness, settings)?.to_affine();
            Some((*global_from_tool * tool_from_jaw).transform_point3(settings.jaw_tip_offset))
        };

        Some((tip(RigPart::LeftJaw)?, tip(RigPart::RightJaw)?))
    }

    /// Where a held object should be, in world space.
    pub fn grip_anchor(
        &self,
        global_from_tool: &Affine3A,
        openness: f32,
        settings: &ToolSettings,
    ) -> Option<Vec3> {
        match settings.grip_anchor {
            GripAnchor::Part => {
                let anchor = self.pose(RigPart::GripAnchor, openness, settings)?;
                Some(global_from_tool.transform_point3(anchor.translation))
            }
            GripAnchor::JawTips => {
                let (left, right) = self.jaw_tips(global_from_tool, openness, settings)?;
                Some((left + right) * 0.5)
            }
        }
    }
}

/// Offset `rest` by the amount `part` moves at the given openness.
///
/// The stem and pusher slide along the tool's forward axis (+Z). The jaws rotate about their own
/// Z axis by an angle interpolated between the closed and open angles; the left jaw turns one way
/// and the right jaw the other.
pub fn pose_at(
    rest: &LocalTransform,
    part: RigPart,
    openness: f32,
    settings: &ToolSettings,
) -> LocalTransform {
    let jaw_angle = || {
        let degrees = settings.jaw_closed_angle
            + (settings.jaw_open_angle - settings.jaw_closed_angle) * openness;
        degrees.to_radians()
    };

    let mut pose = *rest;
    match part {
        RigPart::Stem => {
            pose.translation += Vec3::Z * settings.stem_travel * openness;
        }
        RigPart::Pusher => {
            pose.translation +=
                Vec3::Z * settings.stem_travel * settings.pusher_travel_ratio * openness;
        }
        RigPart::LeftJaw => {
            pose.rotation = rest.rotation * Quat::from_rotation_z(jaw_angle());
        }
        RigPart::RightJaw => {
            pose.rotation = rest.rotation * Quat::from_rotation_z(-jaw_angle());
        }
        RigPart::GripAnchor => {}
    }

    pose
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use hecs::World;

    fn rig(world: &mut World) -> Rig {
        let mut rig = Rig::default();
        for (part, translation) in [
            (RigPart::Stem, Vec3::new(0., 0., -0.05)),
            (RigPart::Pusher, Vec3::new(0., 0., -0.03)),
            (RigPart::LeftJaw, Vec3::new(-0.01, 0., 0.)),
            (RigPart::RightJaw, Vec3::new(0.01, 0., 0.)),
            (RigPart::GripAnchor, Vec3::new(0., 0., 0.1)),
        ] {
            let entity = world.spawn(());
            let rest = LocalTransform::from_rotation_translation(Quat::IDENTITY, translation);
            rig = rig.with_part(part, entity, rest);
        }
        rig
    }

    #[test]
    fn test_closed_pose_is_rest_pose() {
        let mut world = World::new();
        let rig = rig(&mut world);
        let settings = ToolSettings::forceps();

        for part in RigPart::ALL {
            assert_eq!(
                rig.pose(part, 0., &settings),
                rig.rest_pose(part),
                "{part:?}"
            );
        }
    }

    #[test]
    fn test_open_pose() {
        let mut world = World::new();
        let rig = rig(&mut world);
        let settings = ToolSettings::forceps();

        let stem = rig.pose(RigPart::Stem, 1., &settings).unwrap();
        assert_relative_eq!(stem.translation, Vec3::new(0., 0., -0.03));

        let pusher = rig.pose(RigPart::Pusher, 0.5, &settings).unwrap();
        assert_relative_eq!(pusher.translation, Vec3::new(0., 0., -0.03 + 0.008));

        // Jaws swing symmetrically
        let left = rig.pose(RigPart::LeftJaw, 1., &settings).unwrap();
        let right = rig.pose(RigPart::RightJaw, 1., &settings).unwrap();
        let (axis, angle) = left.rotation.to_axis_angle();
        assert_relative_eq!(axis, Vec3::Z, epsilon = 1e-5);
        assert_relative_eq!(angle, 15f32.to_radians(), epsilon = 1e-5);
        assert_relative_eq!(
            right.rotation,
            Quat::from_rotation_z(-15f32.to_radians()),
            epsilon = 1e-6
        );

        // The anchor doesn't move
        assert_eq!(
            rig.pose(RigPart::GripAnchor, 1., &settings),
            rig.rest_pose(RigPart::GripAnchor)
        );
    }

    #[test]
    fn test_pose_composes_with_rest_rotation() {
        let mut world = World::new();
        let rest_rotation = Quat::from_rotation_x(90f32.to_radians());
        let rig = Rig::default().with_part(
            RigPart::LeftJaw,
            world.spawn(()),
            LocalTransform::from_rotation_translation(rest_rotation, Vec3::ZERO),
        );
        let settings = ToolSettings::tweezers();

        let left = rig.pose(RigPart::LeftJaw, 0., &settings).unwrap();
        assert_relative_eq!(
            left.rotation,
            rest_rotation * Quat::from_rotation_z(2f32.to_radians()),
            epsilon = 1e-6
        );
    }

    #[test]
    fn test_missing_parts_are_skipped() {
        let mut world = World::new();
        let rig = Rig::default().with_part(
            RigPart::Stem,
            world.spawn(()),
            LocalTransform::default(),
        );
        let settings = ToolSettings::forceps();

        assert!(rig.pose(RigPart::Pusher, 1., &settings).is_none());
        assert!(rig
            .grip_anchor(&Affine3A::IDENTITY, 1., &settings)
            .is_none());
        assert_eq!(rig.missing_parts().count(), 4);
    }

    #[test]
    fn test_grip_anchor_follows_tool() {
        let mut world = World::new();
        let rig = rig(&mut world);
        let settings = ToolSettings::forceps();
        let global_from_tool = Affine3A::from_translation(Vec3::new(1., 2., 3.));

        let anchor = rig.grip_anchor(&global_from_tool, 0.5, &settings).unwrap();
        assert_relative_eq!(anchor, Vec3::new(1., 2., 3.1));
    }

    #[test]
    fn test_jaw_tip_anchor_is_between_the_tips() {
        let mut world = World::new();
        let rig = rig(&mut world);
        let settings = ToolSettings::tweezers();

        let (left, right) = rig.jaw_tips(&Affine3A::IDENTITY, 1., &settings).unwrap();
        let anchor = rig.grip_anchor(&Affine3A::IDENTITY, 1., &settings).unwrap();
        assert_relative_eq!(anchor, (left + right) * 0.5);

        // Opening pushes the tips apart
        let (closed_left, closed_right) =
            rig.jaw_tips(&Affine3A::IDENTITY, 0., &settings).unwrap();
        assert!(left.distance(right) > closed_left.distance(closed_right));
    }
}
