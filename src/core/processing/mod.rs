pub mod normalize;
pub mod pack;
pub mod pipeline;
pub mod resize;
