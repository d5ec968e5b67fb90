// Presentation layer - terminal screens over the application services
pub mod app_state;
pub mod commands;
pub mod navigation;
pub mod render;
pub mod session;
