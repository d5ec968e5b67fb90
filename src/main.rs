// Main entry point - Dependency injection and interactive session
mod application;
mod domain;
mod infrastructure;
mod presentation;

use std::io::Write;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

use crate::application::import_service::ImportService;
use crate::application::view_repository::ViewRepository;
use crate::application::view_service::ViewService;
use crate::infrastructure::config::{load_app_config, StorageBackend};
use crate::infrastructure::file_repository::FileViewRepository;
use crate::infrastructure::memory_repository::InMemoryViewRepository;
use crate::infrastructure::spreadsheet::WorkbookParser;
use crate::presentation::app_state::AppState;
use crate::presentation::commands::HELP;
use crate::presentation::session::Session;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing on stderr so screens on stdout stay readable
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("gridboard=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    // Load configuration
    let config = load_app_config()?;
    let editor_options = config.editor.to_options()?;

    // Create repository (infrastructure layer)
    let repository: Arc<dyn ViewRepository> = match config.storage.backend {
        StorageBackend::File => Arc::new(FileViewRepository::open(&config.storage.path).await?),
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; views are lost on exit");
            Arc::new(InMemoryViewRepository::new())
        }
    };

    // Create services (application layer)
    let view_service = ViewService::new(repository);
    let import_service = ImportService::new(Arc::new(WorkbookParser::new()), config.import.max_rows);

    let state = AppState {
        view_service,
        import_service,
        editor_options,
    };

    // Run the session (presentation layer)
    let mut session = Session::new(state);
    println!("{}\n", HELP);
    println!("{}", session.home().await?);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("{}", session.prompt());
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        let reply = session.handle_line(&line).await;
        if !reply.text.is_empty() {
            println!("{}", reply.text);
        }
        if reply.quit {
            break;
        }
    }

    Ok(())
}
