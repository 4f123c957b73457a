// src/client/mod.rs
pub mod connector;
pub mod remote;
pub mod request;
