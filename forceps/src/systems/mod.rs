#![allow(missing_docs)]
pub mod contacts;
pub mod forceps_animation;
pub mod forceps_input;
pub mod grasping;
pub mod physics;
pub mod update_global_transform_with_parent;

pub use contacts::contacts_system;
pub use forceps_animation::{forceps_animation_system, PoseWrite};
pub use forceps_input::forceps_input_system;
pub use grasping::grasping_system;
pub use physics::physics_system;
pub use update_global_transform_with_parent::update_global_transform_with_parent_system;
