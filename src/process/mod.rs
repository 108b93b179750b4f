// src/process/mod.rs

pub mod filter;
pub mod split;
pub mod stitch;
pub mod validate;
