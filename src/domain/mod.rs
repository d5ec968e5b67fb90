// Domain layer - grid model and view entities, no I/O
pub mod color;
pub mod grid;
pub mod view;
