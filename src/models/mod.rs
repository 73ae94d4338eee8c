pub mod layer;
pub mod position;
