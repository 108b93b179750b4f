pub mod config;
pub mod extract;
pub mod fetch;
pub mod history;
pub mod pipeline;
pub mod process;
pub mod table;
