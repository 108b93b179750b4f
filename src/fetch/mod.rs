// src/fetch/mod.rs

pub mod links;
pub mod pdfs;
