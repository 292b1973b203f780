pub mod api;
pub mod catalog;
pub mod config;
pub mod engine;
pub mod error;
pub mod report;
// cmd and reports belong to the binary (main.rs).
