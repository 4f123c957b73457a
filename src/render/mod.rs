// src/render/mod.rs
pub mod capability;
pub mod heuristic;
pub mod renderer;
pub mod response;
pub mod sanitize;
