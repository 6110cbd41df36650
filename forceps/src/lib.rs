#![deny(missing_docs)]

//! G'day! `forceps` drives a hand-held, two-jaw grasping tool inside a physics-driven scene.
//!
//! A tool is a small rig of parts (stem, pusher, two jaws and a grip anchor) attached to a root
//! entity that the host moves around, usually from a tracked controller. Each frame the tool:
//!
//! 1. learns which grabbable objects are touching its tips (from the physics simulation),
//! 2. turns the activate control into an open or closed intent,
//! 3. decides which object, if any, it is holding, and takes that object out of the physics
//!    simulation while it is held,
//! 4. animates its rig toward the matching openness and pins the held object to its grip anchor.
//!
//! Everything hangs off a [`Scene`]: call [`Scene::add_forceps`] once, feed input through
//! [`contexts::InputContext`], and call [`Scene::tick`] every frame.

pub use glam;
pub use hecs;
pub use rapier3d;

pub use forceps_error::ForcepsError;
pub use scene::Scene;
pub use settings::{GripAnchor, SelectionPolicy, ToolSettings, TriggerMode};

/// Components are data attached to entities in the scene's world
pub mod components;
/// Contexts wrap the external state the tool interacts with: physics, input and transforms
pub mod contexts;
mod forceps_error;
mod scene;
mod settings;
/// Systems are functions called each frame to update the tool and the objects it holds
pub mod systems;
/// Kitchen sink utility functions
pub mod util;

/// Forceps result type
pub type ForcepsResult<T> = std::result::Result<T, ForcepsError>;
