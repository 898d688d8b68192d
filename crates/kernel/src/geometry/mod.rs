pub mod bezier;
pub mod point;
pub mod rotation;
pub mod vector;
