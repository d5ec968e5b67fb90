// Canvas editor - Use cases for placing and styling boxes on a view
use crate::application::error::{ServiceError, ServiceResult};
use crate::application::import_service::{ImportService, ImportedTable};
use crate::application::view_service::ViewService;
use crate::domain::grid::{cell_at, BoxSize, GridSize};
use crate::domain::view::{BoxTemplate, BoxUpdate, EditError, FontPolicy, GridBox, View};
use std::path::Path;

#[derive(Debug, Clone, Default)]
pub struct EditorOptions {
    pub grid: GridSize,
    pub template: BoxTemplate,
    pub fonts: FontPolicy,
}

/// Outcome of clicking a grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellClick {
    Placed(usize),
    Selected(usize),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImportReport {
    pub source_name: String,
    pub sheet_name: Option<String>,
    pub columns: usize,
    pub rows: usize,
    pub truncated: bool,
    /// Boxes whose column disappeared and were unbound
    pub unbound: Vec<usize>,
}

/// Editing session for one view. Every change is persisted before it is
/// committed to the session's copy, so a failed write leaves the view as it was.
pub struct CanvasEditor {
    view: View,
    views: ViewService,
    importer: ImportService,
    options: EditorOptions,
    pending_size: Option<BoxSize>,
    selected: Option<usize>,
}

impl CanvasEditor {
    pub fn new(
        view: View,
        views: ViewService,
        importer: ImportService,
        options: EditorOptions,
    ) -> Self {
        Self {
            view,
            views,
            importer,
            options,
            pending_size: None,
            selected: None,
        }
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    pub fn into_view(self) -> View {
        self.view
    }

    pub fn options(&self) -> &EditorOptions {
        &self.options
    }

    pub fn pending_size(&self) -> Option<BoxSize> {
        self.pending_size
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn select_size(&mut self, size: BoxSize) {
        tracing::debug!("Pending box size {}", size);
        self.pending_size = Some(size);
    }

    /// Place the pending box with its top-left corner at `index`, or, with no
    /// size pending, open the box that covers the cell.
    ///
    /// The pending size is consumed whether or not placement succeeds.
    pub async fn click_cell(&mut self, index: u32) -> ServiceResult<CellClick> {
        let pending = self.pending_size.take();
        let (col, row) =
            cell_at(index, self.options.grid).ok_or(ServiceError::NoSuchCell(index))?;

        let Some(size) = pending else {
            let covering = self
                .view
                .boxes
                .iter()
                .position(|b| b.footprint().contains_cell(col, row))
                .ok_or(ServiceError::NoPendingSize)?;
            self.selected = Some(covering);
            return Ok(CellClick::Selected(covering));
        };

        let mut updated = self.view.clone();
        let placed = updated.place_box(size.at(col, row), &self.options.template, self.options.grid)?;
        self.commit(updated).await?;

        tracing::debug!("Placed {} box at ({},{}) in view {}", size, col, row, self.view.id);
        Ok(CellClick::Placed(placed))
    }

    pub fn select_box(&mut self, index: usize) -> ServiceResult<&GridBox> {
        let selected = self
            .view
            .boxes
            .get(index)
            .ok_or(EditError::NoSuchBox(index))?;
        self.selected = Some(index);
        Ok(selected)
    }

    pub fn close_box_editor(&mut self) {
        self.selected = None;
    }

    pub async fn apply(&mut self, update: BoxUpdate) -> ServiceResult<()> {
        let index = self.selected.ok_or(ServiceError::NoBoxSelected)?;
        let mut updated = self.view.clone();
        updated.apply(index, update, &self.options.fonts)?;
        self.commit(updated).await
    }

    pub async fn remove_selected(&mut self) -> ServiceResult<GridBox> {
        let index = self.selected.ok_or(ServiceError::NoBoxSelected)?;
        let mut updated = self.view.clone();
        let removed = updated.remove_box(index)?;
        self.commit(updated).await?;
        self.selected = None;
        Ok(removed)
    }

    pub async fn import_path(&mut self, path: &Path) -> ServiceResult<ImportReport> {
        let table = self.importer.import_path(path).await?;
        self.apply_import(table).await
    }

    #[cfg(test)]
    pub async fn import_bytes(&mut self, file_name: &str, bytes: Vec<u8>) -> ServiceResult<ImportReport> {
        let table = self.importer.import_bytes(file_name.to_string(), bytes).await?;
        self.apply_import(table).await
    }

    async fn apply_import(&mut self, table: ImportedTable) -> ServiceResult<ImportReport> {
        let mut updated = self.view.clone();
        let columns = table.headers.len();
        let rows = table.rows.len();
        let unbound = updated.replace_data(table.headers, table.rows, Some(table.source_name.clone()));
        self.commit(updated).await?;

        if !unbound.is_empty() {
            tracing::warn!(
                "Import of {} unbound {} box(es) whose column disappeared",
                table.source_name,
                unbound.len()
            );
        }
        tracing::info!(
            "Imported {} into view {}: {} columns, {} rows",
            table.source_name,
            self.view.id,
            columns,
            rows
        );

        Ok(ImportReport {
            source_name: table.source_name,
            sheet_name: table.sheet_name,
            columns,
            rows,
            truncated: table.truncated,
            unbound,
        })
    }

    /// Persist the view with a fresh `updated_at`.
    pub async fn save(&mut self) -> ServiceResult<()> {
        self.commit(self.view.clone()).await?;
        tracing::info!("Saved view {} ({})", self.view.name, self.view.id);
        Ok(())
    }

    async fn commit(&mut self, mut updated: View) -> ServiceResult<()> {
        self.views.save_view(&mut updated).await?;
        self.view = updated;
        Ok(())
    }
}
