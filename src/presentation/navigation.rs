// Screen navigation - Home, per-view action menu, editor and placeholder screens
use crate::domain::view::ViewId;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Home,
    Menu(ViewId),
    Editor(ViewId),
    /// Presentation mode, not implemented beyond a placeholder
    Viewer(ViewId),
    /// Export, not implemented beyond a placeholder
    Exporter(ViewId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Open(ViewId),
    Edit,
    Present,
    Export,
    SaveAndNext,
    Deleted,
    Back,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("cannot {transition} from the {from} screen")]
pub struct NavigationError {
    pub from: Screen,
    pub transition: Transition,
}

impl Screen {
    pub fn apply(self, transition: Transition) -> Result<Screen, NavigationError> {
        let next = match (self, transition) {
            (Screen::Home, Transition::Open(id)) => Screen::Menu(id),
            (Screen::Menu(id), Transition::Edit) => Screen::Editor(id),
            (Screen::Menu(id), Transition::Present) => Screen::Viewer(id),
            (Screen::Menu(id), Transition::Export) => Screen::Exporter(id),
            (Screen::Menu(_), Transition::Back | Transition::Deleted) => Screen::Home,
            (Screen::Editor(id), Transition::SaveAndNext) => Screen::Menu(id),
            (Screen::Viewer(id) | Screen::Exporter(id), Transition::Back) => Screen::Menu(id),
            (from, transition) => return Err(NavigationError { from, transition }),
        };
        Ok(next)
    }
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Screen::Home => "home",
            Screen::Menu(_) => "menu",
            Screen::Editor(_) => "editor",
            Screen::Viewer(_) => "viewer",
            Screen::Exporter(_) => "export",
        })
    }
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Transition::Open(_) => "open a view",
            Transition::Edit => "edit",
            Transition::Present => "present",
            Transition::Export => "export",
            Transition::SaveAndNext => "save",
            Transition::Deleted => "delete",
            Transition::Back => "go back",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edit_round_trip() {
        let id = ViewId::new();
        let screen = Screen::Home
            .apply(Transition::Open(id))
            .and_then(|s| s.apply(Transition::Edit))
            .and_then(|s| s.apply(Transition::SaveAndNext))
            .and_then(|s| s.apply(Transition::Back))
            .unwrap();
        assert_eq!(screen, Screen::Home);
    }

    #[test]
    fn test_placeholders_return_to_menu() {
        let id = ViewId::new();
        let menu = Screen::Menu(id);
        assert_eq!(menu.apply(Transition::Present), Ok(Screen::Viewer(id)));
        assert_eq!(menu.apply(Transition::Export), Ok(Screen::Exporter(id)));
        assert_eq!(Screen::Viewer(id).apply(Transition::Back), Ok(menu));
        assert_eq!(Screen::Exporter(id).apply(Transition::Back), Ok(menu));
    }

    #[test]
    fn test_delete_returns_home() {
        let id = ViewId::new();
        assert_eq!(Screen::Menu(id).apply(Transition::Deleted), Ok(Screen::Home));
    }

    #[test]
    fn test_invalid_transitions() {
        let id = ViewId::new();
        for (from, transition) in [
            (Screen::Home, Transition::Edit),
            (Screen::Home, Transition::Back),
            (Screen::Editor(id), Transition::Back),
            (Screen::Editor(id), Transition::Deleted),
            (Screen::Menu(id), Transition::Open(id)),
            (Screen::Viewer(id), Transition::Edit),
        ] {
            assert_eq!(
                from.apply(transition),
                Err(NavigationError { from, transition })
            );
        }
    }

    #[test]
    fn test_error_message() {
        let err = Screen::Home.apply(Transition::Edit).unwrap_err();
        assert_eq!(err.to_string(), "cannot edit from the home screen");
    }
}
