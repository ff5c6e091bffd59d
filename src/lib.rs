pub mod color;
pub mod config;
pub mod engine;
pub mod fast_math;
pub mod field;
pub mod input;
pub mod layout;
pub mod particles;
pub mod render;
pub mod shape;
pub mod viewport;
