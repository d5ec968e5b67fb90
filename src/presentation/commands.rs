// Command parsing for the interactive session
use crate::domain::color::Color;
use crate::domain::grid::BoxSize;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontChange {
    Up,
    Down,
    Set(u32),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Help,
    Quit,
    // Home
    List,
    New(String),
    Open(String),
    // Action menu
    Edit,
    Present,
    Export,
    Rename(String),
    Delete,
    Confirm(bool),
    Back,
    // Editor
    Size(BoxSize),
    Click(u32),
    /// Zero-based box index
    SelectBox(usize),
    Close,
    Title(String),
    Background(Color),
    Foreground(Color),
    Font(FontChange),
    Bind(String),
    Unbind,
    Remove,
    Import(PathBuf),
    Show,
    Save,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("unknown command '{0}', try 'help'")]
    Unknown(String),

    #[error("'{command}' needs {expected}")]
    MissingArgument {
        command: &'static str,
        expected: &'static str,
    },

    #[error("{0}")]
    InvalidArgument(String),
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        let required = |command: &'static str, expected: &'static str| {
            if rest.is_empty() {
                Err(CommandError::MissingArgument { command, expected })
            } else {
                Ok(rest.to_string())
            }
        };
        let invalid = |e: &dyn std::fmt::Display| CommandError::InvalidArgument(e.to_string());

        let command = match word.to_ascii_lowercase().as_str() {
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            "list" | "ls" => Command::List,
            "new" => Command::New(required("new", "a view name")?),
            "open" => Command::Open(required("open", "a list number or view id")?),
            "edit" => Command::Edit,
            "present" => Command::Present,
            "export" => Command::Export,
            "rename" => Command::Rename(required("rename", "a new name")?),
            "delete" => Command::Delete,
            "y" | "yes" => Command::Confirm(true),
            "n" | "no" => Command::Confirm(false),
            "back" => Command::Back,
            "size" => {
                let size = required("size", "a palette size such as 2x2")?;
                Command::Size(size.parse().map_err(|e| invalid(&e))?)
            }
            "click" | "place" => {
                let cell = required("click", "a cell number")?;
                Command::Click(
                    cell.parse()
                        .map_err(|_| CommandError::InvalidArgument(format!("'{}' is not a cell number", cell)))?,
                )
            }
            "box" => {
                let number = required("box", "a box number")?;
                match number.parse::<usize>() {
                    Ok(n) if n >= 1 => Command::SelectBox(n - 1),
                    _ => {
                        return Err(CommandError::InvalidArgument(format!(
                            "'{}' is not a box number",
                            number
                        )));
                    }
                }
            }
            "close" => Command::Close,
            "title" => Command::Title(required("title", "some text")?),
            "bg" => Command::Background(required("bg", "a color")?.parse().map_err(|e| invalid(&e))?),
            "fg" | "color" => {
                Command::Foreground(required("fg", "a color")?.parse().map_err(|e| invalid(&e))?)
            }
            "font" => {
                let change = required("font", "+, - or a size")?;
                Command::Font(match change.as_str() {
                    "+" | "up" => FontChange::Up,
                    "-" | "down" => FontChange::Down,
                    size => FontChange::Set(size.parse().map_err(|_| {
                        CommandError::InvalidArgument(format!("'{}' is not a font size", size))
                    })?),
                })
            }
            "bind" => Command::Bind(required("bind", "a column name")?),
            "unbind" => Command::Unbind,
            "remove" => Command::Remove,
            "import" => Command::Import(PathBuf::from(required("import", "a file path")?)),
            "show" => Command::Show,
            "save" => Command::Save,
            other => return Err(CommandError::Unknown(other.to_string())),
        };

        Ok(command)
    }
}

pub const HELP: &str = "\
home:    list | new <name> | open <n|id> | quit
menu:    edit | present | export | rename <name> | delete | back
editor:  size <WxH> | click <cell> | box <n> | close | show | save
box:     title <text> | bg <color> | fg <color> | font <+|-|n> | bind <column> | unbind | remove
data:    import <path to .xlsx/.xls/.ods/.csv>";
