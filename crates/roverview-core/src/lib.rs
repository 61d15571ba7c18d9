pub mod base_image;
pub mod collab;
pub mod config;
pub mod consts;
pub mod controller;
pub mod error;
pub mod export;
pub mod overlay;
pub mod render;
pub mod rover;
pub mod scene;
pub mod transform;
