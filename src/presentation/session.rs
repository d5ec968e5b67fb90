// Interactive session - routes commands to services for the current screen
use crate::application::canvas_editor::{CanvasEditor, CellClick};
use crate::domain::view::{BoxUpdate, View, ViewId};
use crate::presentation::app_state::AppState;
use crate::presentation::commands::{Command, FontChange, HELP};
use crate::presentation::navigation::{Screen, Transition};
use crate::presentation::render;
use anyhow::{anyhow, Context};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub quit: bool,
}

impl Reply {
    fn show(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            quit: false,
        }
    }
}

/// One user's walk through the screens. The view being worked on lives here,
/// passed to each handler, rather than in any shared state.
pub struct Session {
    state: AppState,
    screen: Screen,
    /// View shown by the action menu and placeholder screens
    current: Option<View>,
    editor: Option<CanvasEditor>,
    /// Ids in the order of the last rendered home list
    listed: Vec<ViewId>,
    confirming_delete: bool,
}

impl Session {
    pub fn new(state: AppState) -> Self {
        Self {
            state,
            screen: Screen::Home,
            current: None,
            editor: None,
            listed: Vec::new(),
            confirming_delete: false,
        }
    }

    pub fn prompt(&self) -> String {
        match (&self.editor, &self.current) {
            (Some(editor), _) => format!("{}:{}> ", editor.view().name, self.screen),
            (None, Some(view)) => format!("{}:{}> ", view.name, self.screen),
            (None, None) => format!("{}> ", self.screen),
        }
    }

    /// Handle one input line. Failures become an `error:` reply and leave the
    /// session on the screen it was on.
    pub async fn handle_line(&mut self, line: &str) -> Reply {
        let line = line.trim();
        if line.is_empty() {
            return Reply::show("");
        }

        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(e) => return Reply::show(format!("error: {}", e)),
        };

        if command == Command::Quit {
            return Reply {
                text: "bye".to_string(),
                quit: true,
            };
        }

        let confirming = std::mem::take(&mut self.confirming_delete);
        match self.dispatch(command, confirming).await {
            Ok(text) => Reply::show(text),
            Err(e) => {
                tracing::debug!("Command failed on {} screen: {:#}", self.screen, e);
                Reply::show(format!("error: {:#}", e))
            }
        }
    }

    pub async fn home(&mut self) -> anyhow::Result<String> {
        let views = self.state.view_service.list_views().await?;
        self.listed = views.iter().map(|v| v.id).collect();
        Ok(render::home(&views))
    }

    async fn dispatch(&mut self, command: Command, confirming: bool) -> anyhow::Result<String> {
        match command {
            Command::Help => Ok(HELP.to_string()),
            Command::Quit => Ok(String::new()),
            Command::List => {
                self.navigate_check(Screen::Home)?;
                self.home().await
            }
            Command::New(name) => {
                self.navigate_check(Screen::Home)?;
                let view = self.state.view_service.create_view(&name).await?;
                self.enter_menu(view)
            }
            Command::Open(target) => {
                self.navigate_check(Screen::Home)?;
                let id = self.resolve_view(&target).await?;
                let view = self.state.view_service.get_view(&id).await?;
                self.enter_menu(view)
            }
            Command::Edit => {
                let next = self.screen.apply(Transition::Edit)?;
                let view = self.current.take().context("no view is open")?;
                self.screen = next;
                let editor = self.state.open_editor(view);
                let text = render_editor(&editor);
                self.editor = Some(editor);
                Ok(text)
            }
            Command::Present => {
                self.screen = self.screen.apply(Transition::Present)?;
                Ok("Presentation mode is not available yet. Type 'back' to return.".to_string())
            }
            Command::Export => {
                self.screen = self.screen.apply(Transition::Export)?;
                Ok("Export is not available yet. Type 'back' to return.".to_string())
            }
            Command::Rename(name) => {
                let id = self.on_menu()?;
                let view = self.state.view_service.rename_view(&id, &name).await?;
                let text = render::menu(&view);
                self.current = Some(view);
                Ok(text)
            }
            Command::Delete => {
                self.on_menu()?;
                let name = self.menu_view()?.name.clone();
                self.confirming_delete = true;
                Ok(format!("Delete '{}' and all its boxes? (y/n)", name))
            }
            Command::Confirm(yes) => {
                if !confirming {
                    return Err(anyhow!("nothing to confirm"));
                }
                if !yes {
                    return Ok("Kept.".to_string());
                }
                let id = self.on_menu()?;
                self.state.view_service.delete_view(&id).await?;
                self.screen = self.screen.apply(Transition::Deleted)?;
                self.current = None;
                self.home().await
            }
            Command::Back => {
                self.screen = self.screen.apply(Transition::Back)?;
                match self.screen {
                    Screen::Home => {
                        self.current = None;
                        self.home().await
                    }
                    _ => Ok(render::menu(self.menu_view()?)),
                }
            }
            Command::Save => {
                let next = self.screen.apply(Transition::SaveAndNext)?;
                let editor = self.editor_mut()?;
                editor.save().await?;
                let view = self.editor.take().map(CanvasEditor::into_view);
                self.screen = next;
                self.current = view;
                Ok(format!("Saved.\n{}", render::menu(self.menu_view()?)))
            }
            command => self.edit(command).await,
        }
    }

    async fn edit(&mut self, command: Command) -> anyhow::Result<String> {
        let editor = self.editor_mut()?;

        match command {
            Command::Size(size) => {
                editor.select_size(size);
                Ok(format!("Pick the top-left cell for the {} box.", size))
            }
            Command::Click(cell) => match editor.click_cell(cell).await? {
                CellClick::Placed(_) => Ok(render_editor(editor)),
                CellClick::Selected(index) => Ok(render::box_editor(editor.view(), index)),
            },
            Command::SelectBox(index) => {
                editor.select_box(index)?;
                Ok(render::box_editor(editor.view(), index))
            }
            Command::Close => {
                editor.close_box_editor();
                Ok(render_editor(editor))
            }
            Command::Remove => {
                let removed = editor.remove_selected().await?;
                Ok(format!(
                    "Removed '{}'.\n{}",
                    removed.title,
                    render_editor(editor)
                ))
            }
            Command::Import(path) => {
                let report = editor.import_path(&path).await?;
                let mut text = format!(
                    "Imported {}: {} column(s), {} row(s).",
                    report.source_name, report.columns, report.rows
                );
                if report.truncated {
                    text.push_str(" Extra rows were dropped.");
                }
                if !report.unbound.is_empty() {
                    let boxes: Vec<String> =
                        report.unbound.iter().map(|i| format!("#{}", i + 1)).collect();
                    text.push_str(&format!(
                        " Unbound {} (their column is gone).",
                        boxes.join(", ")
                    ));
                }
                Ok(format!("{}\n{}", text, render_editor(editor)))
            }
            Command::Show => Ok(render_editor(editor)),
            command => {
                let update = match command {
                    Command::Title(title) => BoxUpdate::SetTitle(title),
                    Command::Background(color) => BoxUpdate::SetBgColor(color),
                    Command::Foreground(color) => BoxUpdate::SetTextColor(color),
                    Command::Font(FontChange::Up) => BoxUpdate::IncreaseFont,
                    Command::Font(FontChange::Down) => BoxUpdate::DecreaseFont,
                    Command::Font(FontChange::Set(size)) => BoxUpdate::SetFontSize(size),
                    Command::Bind(column) => BoxUpdate::SetVariable(Some(column)),
                    Command::Unbind => BoxUpdate::SetVariable(None),
                    other => return Err(anyhow!("{:?} is not available here", other)),
                };
                editor.apply(update).await?;
                let index = editor.selected().context("no box selected")?;
                Ok(render::box_editor(editor.view(), index))
            }
        }
    }

    fn enter_menu(&mut self, view: View) -> anyhow::Result<String> {
        self.screen = self.screen.apply(Transition::Open(view.id))?;
        let text = render::menu(&view);
        self.current = Some(view);
        Ok(text)
    }

    /// Fail unless the session is on `expected`.
    fn navigate_check(&self, expected: Screen) -> anyhow::Result<()> {
        if self.screen == expected {
            Ok(())
        } else {
            Err(anyhow!("not available on the {} screen", self.screen))
        }
    }

    fn menu_view(&self) -> anyhow::Result<&View> {
        match (self.screen, &self.current) {
            (Screen::Menu(_) | Screen::Viewer(_) | Screen::Exporter(_), Some(view)) => Ok(view),
            _ => Err(anyhow!("not available on the {} screen", self.screen)),
        }
    }

    fn on_menu(&self) -> anyhow::Result<ViewId> {
        match self.screen {
            Screen::Menu(id) => Ok(id),
            screen => Err(anyhow!("not available on the {} screen", screen)),
        }
    }

    fn editor_mut(&mut self) -> anyhow::Result<&mut CanvasEditor> {
        let screen = self.screen;
        self.editor
            .as_mut()
            .ok_or_else(|| anyhow!("not available on the {} screen", screen))
    }

    async fn resolve_view(&mut self, target: &str) -> anyhow::Result<ViewId> {
        if let Ok(n) = target.parse::<usize>() {
            if self.listed.is_empty() {
                self.home().await?;
            }
            return n
                .checked_sub(1)
                .and_then(|i| self.listed.get(i).copied())
                .ok_or_else(|| anyhow!("there is no view number {}", n));
        }
        target
            .parse::<ViewId>()
            .map_err(|_| anyhow!("'{}' is neither a list number nor a view id", target))
    }
}

fn render_editor(editor: &CanvasEditor) -> String {
    render::grid(
        editor.view(),
        editor.options().grid,
        editor.selected(),
        editor.pending_size(),
    )
}
