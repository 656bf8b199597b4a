//! Distance metrics.

mod hamming;
mod manhattan;
mod sqeuclidean;

pub use hamming::dist_hamming_u8;
pub use manhattan::dist_manhattan_f32;
pub use sqeuclidean::dist_sqeuclidean_f32;
