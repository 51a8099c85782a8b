pub mod config;
pub mod engine;
pub mod error;
pub mod grid;
pub mod layout;
pub mod movement;
pub mod path;
pub mod policy;
pub mod puzzle;
pub mod stat;
pub mod state;
