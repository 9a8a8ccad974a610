pub mod app;
pub mod audio;
pub mod config;
pub mod engine;
pub mod field;
pub mod levels;
pub mod palette;
pub mod params;
pub mod presets;
pub mod render;
pub mod terminal;
