//! Similarity metrics.

mod cosine;
pub(crate) mod dot;
mod jaccard;

pub use cosine::sim_cosine_f32;
pub use dot::sim_dot_f32;
pub use jaccard::sim_jaccard_u16;
