// Errors surfaced by the application services
use crate::application::spreadsheet_parser::ImportError;
use crate::application::view_repository::StoreError;
use crate::domain::grid::PlacementError;
use crate::domain::view::EditError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Placement(#[from] PlacementError),

    #[error(transparent)]
    Edit(#[from] EditError),

    #[error(transparent)]
    Import(#[from] ImportError),

    #[error("pick a box size first")]
    NoPendingSize,

    #[error("select a box first")]
    NoBoxSelected,

    #[error("cell {0} is outside the grid")]
    NoSuchCell(u32),
}

pub type ServiceResult<T> = Result<T, ServiceError>;
