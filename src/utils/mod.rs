pub mod normalizer;
pub mod distance;
pub mod math;
