// Application state shared by the session
use crate::application::canvas_editor::{CanvasEditor, EditorOptions};
use crate::application::import_service::ImportService;
use crate::application::view_service::ViewService;
use crate::domain::view::View;

#[derive(Clone)]
pub struct AppState {
    pub view_service: ViewService,
    pub import_service: ImportService,
    pub editor_options: EditorOptions,
}

impl AppState {
    pub fn open_editor(&self, view: View) -> CanvasEditor {
        CanvasEditor::new(
            view,
            self.view_service.clone(),
            self.import_service.clone(),
            self.editor_options.clone(),
        )
    }
}
