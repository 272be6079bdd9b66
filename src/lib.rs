pub mod assets;
pub mod engine;
pub mod error;
pub mod menubar;
pub mod player;
pub mod renderer;
pub mod settings;
pub mod surface;
pub mod types;
