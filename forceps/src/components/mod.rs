#![allow(missing_docs)]
pub mod candidate_registry;
pub mod collider;
pub mod forceps;
pub mod global_transform;
pub mod grabbable;
pub mod grasp;
pub mod local_transform;
pub mod openness;
pub mod parent;
pub mod rig;
pub mod rigid_body;

pub use candidate_registry::CandidateRegistry;
pub use collider::Collider;
pub use forceps::Forceps;
pub use global_transform::GlobalTransform;
pub use grabbable::{Grabbable, Grabbed};
pub use grasp::{Grasp, GraspChange, GraspState};
pub use local_transform::LocalTransform;
pub use openness::Openness;
pub use parent::Parent;
pub use rig::{Rig, RigPart};
pub use rigid_body::RigidBody;
