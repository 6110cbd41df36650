#![allow(missing_docs)]
pub mod input_context;
pub mod physics_context;
pub mod spatial_query;
pub mod transform_sink;

pub use input_context::{InputContext, IntentEdge};
pub use physics_context::PhysicsContext;
pub use spatial_query::SpatialQuery;
pub use transform_sink::TransformSink;
