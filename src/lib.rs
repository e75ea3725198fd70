pub mod app;
pub mod assets;
pub mod blend;
pub mod buffer;
pub mod config;
pub mod heightmap;
pub mod noise;
pub mod render;
pub mod rng;
pub mod terminal;
pub mod visual;
