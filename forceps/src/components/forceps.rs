use glam::{Affine3A, Vec3};
use hecs::Entity;
use log::{debug, warn};

use crate::{
    components::{
        grasp::{nearest_candidate, pinched_candidate},
        CandidateRegistry, Grasp, GraspChange, GraspState, Openness, Rig,
    },
    contexts::SpatialQuery,
    ForcepsResult, SelectionPolicy, ToolSettings, TriggerMode,
};

/// A component that turns an entity into a grasping tool.
///
/// Ties together the tool's settings, its rig, the objects in reach, what it is holding and how
/// open it is. Requires `forceps_input_system`, `grasping_system` and `forceps_animation_system`
/// (or [`crate::Scene::tick`], which runs all of them).
#[derive(Debug, Clone)]
pub struct Forceps {
    /// Tunables
    pub settings: ToolSettings,
    /// The parts this tool animates
    pub rig: Rig,
    /// Grabbable objects currently touching the tool
    pub candidates: CandidateRegistry,
    /// Intent and held object
    pub grasp: Grasp,
    /// Current jaw separation
    pub openness: Openness,
}

impl Forceps {
    /// Create a tool, checking its settings.
    pub fn new(settings: ToolSettings, rig: Rig) -> ForcepsResult<Forceps> {
        settings.validate()?;

        for part in rig.missing_parts() {
            warn!("[FORCEPS] Rig has no {part:?}, it won't be animated");
        }
        if settings.trigger_mode.is_none() {
            warn!("[FORCEPS] No input binding, the tool can't be activated");
        }

        // A tool that closes on release rests closed until the control is pressed.
        let mut grasp = Grasp::default();
        if settings.trigger_mode == Some(TriggerMode::ReleaseToClose) {
            grasp.activate();
        }

        Ok(Forceps {
            openness: Openness(settings.initial_openness),
            settings,
            rig,
            candidates: Default::default(),
            grasp,
        })
    }

    pub fn state(&self) -> GraspState {
        self.grasp.state()
    }

    pub fn held(&self) -> Option<Entity> {
        self.grasp.held()
    }

    /// A grabbable object started touching the tool.
    pub fn on_contact_begin(&mut self, entity: Entity) {
        self.candidates.register(entity);
    }

    /// A grabbable object stopped touching the tool.
    pub fn on_contact_end(&mut self, entity: Entity) {
        self.candidates.unregister(entity);
    }

    /// How the activate control drives this tool. `None` once the tool has been torn down, or if
    /// it was never bound.
    pub fn trigger_mode(&self) -> Option<TriggerMode> {
        self.settings.trigger_mode
    }

    /// Close the tool. With [`SelectionPolicy::OnConfirm`] this is the moment the closest
    /// `available` candidate gets picked up.
    pub fn activate<Q: SpatialQuery>(
        &mut self,
        global_from_tool: &Affine3A,
        query: &mut Q,
        available: impl Fn(Entity) -> bool,
    ) -> Option<GraspChange> {
        self.grasp.activate();
        match self.settings.selection_policy {
            SelectionPolicy::OnConfirm => self.select_nearest(global_from_tool, query, available),
            SelectionPolicy::Pinch => None,
        }
    }

    /// Open the tool and drop whatever it holds.
    pub fn deactivate<Q: SpatialQuery>(&mut self, query: &mut Q) -> Option<GraspChange> {
        self.grasp.deactivate(query)
    }

    /// Pick up the registered candidate closest to the grip anchor, skipping any that are not
    /// `available`. Does nothing if the tool is already holding something, or if the rig has no
    /// grip anchor.
    pub fn select_nearest<Q: SpatialQuery>(
        &mut self,
        global_from_tool: &Affine3A,
        query: &mut Q,
        available: impl Fn(Entity) -> bool,
    ) -> Option<GraspChange> {
        if self.grasp.held().is_some() {
            return None;
        }

        let Some(anchor) = self.grip_anchor(global_from_tool) else {
            debug!("[FORCEPS] No grip anchor, skipping selection");
            return None;
        };

        let nearest = nearest_candidate(
            self.candidates
                .snapshot(&*query)
                .filter(|entity| available(*entity)),
            anchor,
            self.settings.grip_distance,
            &*query,
        );
        let Some(entity) = nearest else {
            debug!("[FORCEPS] Nothing in reach");
            return None;
        };

        self.grasp.grab(entity, query)
    }

    /// Try to pinch one of `candidates` between the jaw tips. Only does anything while closing and
    /// empty handed.
    pub fn try_pinch<Q: SpatialQuery>(
        &mut self,
        candidates: impl IntoIterator<Item = Entity>,
        global_from_tool: &Affine3A,
        query: &mut Q,
    ) -> Option<GraspChange> {
        if self.grasp.state() != GraspState::Closing {
            return None;
        }

        let (left_tip, right_tip) =
            self.rig.jaw_tips(global_from_tool, self.openness.0, &self.settings)?;
        let pinched = pinched_candidate(
            candidates,
            left_tip,
            right_tip,
            self.settings.tip_grip_distance,
            &*query,
        )?;

        self.grasp.grab(pinched, query)
    }

    /// Let go of the held object.
    pub fn release<Q: SpatialQuery>(&mut self, query: &mut Q) -> Option<GraspChange> {
        self.grasp.release(query)
    }

    /// Drop stale references: the held object and candidates that no longer exist.
    pub fn validate<Q: SpatialQuery>(&mut self, query: &Q) -> Option<GraspChange> {
        self.candidates.prune(query);
        self.grasp.validate(query)
    }

    /// The openness the tool is animating toward.
    pub fn target_openness(&self) -> f32 {
        Openness::target(
            self.grasp.is_closing(),
            self.grasp.held().is_some(),
            self.settings.holding_open_amount,
        )
    }

    /// Where a held object should be pinned, in world space.
    pub fn grip_anchor(&self, global_from_tool: &Affine3A) -> Option<Vec3> {
        self.rig
            .grip_anchor(global_from_tool, self.openness.0, &self.settings)
    }

    /// Shut the tool down: unbind its input and hand any held object back to the simulation.
    pub fn teardown<Q: SpatialQuery>(&mut self, query: &mut Q) -> Option<GraspChange> {
        self.settings.trigger_mode = None;
        self.candidates.clear();
        self.grasp.deactivate(query)
    }
}
