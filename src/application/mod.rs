// Application layer - use cases over the domain, storage behind traits
pub mod canvas_editor;
pub mod error;
pub mod import_service;
pub mod spreadsheet_parser;
pub mod view_repository;
pub mod view_service;
