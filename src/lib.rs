pub mod app;
pub mod browse;
pub mod config;
pub mod content;
pub mod glitch;
pub mod render;
pub mod surface;
pub mod terminal;
