pub mod clean;
pub mod normalize;
