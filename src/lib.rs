pub mod config;
pub mod constraints;
pub mod error;
pub mod export;
pub mod field;
pub mod geometry;
pub mod optimizer;
pub mod pipeline;
pub mod render;
