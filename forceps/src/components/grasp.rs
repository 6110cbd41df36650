use glam::Vec3;
use hecs::Entity;
use log::info;

use crate::contexts::SpatialQuery;

/// Where a tool is in its grab cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraspState {
    /// The user wants the tool open. Nothing is held.
    Open,
    /// The user wants the tool closed, but it hasn't caught anything (yet).
    Closing,
    /// The tool is holding an object.
    Holding,
}

/// Something a grasp did to an object, so callers can update the rest of the scene to match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraspChange {
    /// The object is now held and positioned externally
    Grabbed(Entity),
    /// The object has been handed back to the physics simulation
    Released(Entity),
    /// The held object disappeared from the scene
    Lost(Entity),
}

/// The grab state machine: the user's open/closed intent and the (at most one) held object.
///
/// While an object is held it is *kinematic*: the physics simulation stops moving it and the tool
/// positions it instead. Every path that stops holding an object hands it back to the simulation,
/// except when the object no longer exists.
#[derive(Debug, Clone, Default)]
pub struct Grasp {
    closing: bool,
    held: Option<Entity>,
}

impl Grasp {
    pub fn state(&self) -> GraspState {
        match (self.closing, self.held) {
            (_, Some(_)) => GraspState::Holding,
            (true, None) => GraspState::Closing,
            (false, None) => GraspState::Open,
        }
    }

    /// Does the user want the tool closed?
    pub fn is_closing(&self) -> bool {
        self.closing
    }

    /// The object currently held, if any.
    pub fn held(&self) -> Option<Entity> {
        self.held
    }

    /// Set the intent to closed. Selecting an object is up to the caller.
    pub fn activate(&mut self) {
        self.closing = true;
    }

    /// Set the intent to open and let go of anything held.
    pub fn deactivate<Q: SpatialQuery>(&mut self, query: &mut Q) -> Option<GraspChange> {
        self.closing = false;
        self.release(query)
    }

    /// Take hold of `entity`, unless something is already held.
    pub fn grab<Q: SpatialQuery>(&mut self, entity: Entity, query: &mut Q) -> Option<GraspChange> {
        if self.held.is_some() || !query.contains(entity) {
            return None;
        }

        query.set_kinematic(entity, true);
        self.held = Some(entity);
        info!("[FORCEPS_GRASP] Grabbed {entity:?}");
        Some(GraspChange::Grabbed(entity))
    }

    /// Hand the held object back to the physics simulation. Does nothing if empty handed.
    pub fn release<Q: SpatialQuery>(&mut self, query: &mut Q) -> Option<GraspChange> {
        let entity = self.held.take()?;
        query.set_kinematic(entity, false);
        info!("[FORCEPS_GRASP] Released {entity:?}");
        Some(GraspChange::Released(entity))
    }

    /// Forget the held object if it has been destroyed since it was grabbed.
    pub fn validate<Q: SpatialQuery>(&mut self, query: &Q) -> Option<GraspChange> {
        let entity = self.held?;
        if query.contains(entity) {
            return None;
        }

        info!("[FORCEPS_GRASP] {entity:?} was destroyed while held");
        self.held = None;
        Some(GraspChange::Lost(entity))
    }
}

/// The candidate closest to `anchor`, ignoring anything further away than `grip_distance`.
/// Equally distant candidates resolve to the one that comes first.
pub fn nearest_candidate<Q: SpatialQuery>(
    candidates: impl IntoIterator<Item = Entity>,
    anchor: Vec3,
    grip_distance: f32,
    query: &Q,
) -> Option<Entity> {
    let mut closest = None;
    let mut min_distance = f32::MAX;

    for entity in candidates {
        let Some(position) = query.position(entity) else {
            continue;
        };
        let distance = position.distance(anchor);
        if distance <= grip_distance && distance < min_distance {
            min_distance = distance;
            closest = Some(entity);
        }
    }

    closest
}

/// The candidate caught between two jaw tips: closer than `tip_grip_distance` to *both* of them.
/// If several qualify, the one whose further tip is closest wins, then the lowest entity id.
pub fn pinched_candidate<Q: SpatialQuery>(
    candidates: impl IntoIterator<Item = Entity>,
    left_tip: Vec3,
    right_tip: Vec3,
    tip_grip_distance: f32,
    query: &Q,
) -> Option<Entity> {
    candidates
        .into_iter()
        .filter_map(|entity| {
            let position = query.position(entity)?;
            let left_distance = position.distance(left_tip);
            let right_distance = position.distance(right_tip);
            (left_distance < tip_grip_distance && right_distance < tip_grip_distance)
                .then(|| (left_distance.max(right_distance), entity))
        })
        .min_by(|(a_distance, a), (b_distance, b)| {
            a_distance
                .total_cmp(b_distance)
                .then_with(|| a.to_bits().cmp(&b.to_bits()))
        })
        .map(|(_, entity)| entity)
}
