use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use tomo_api::{ApiClient, HttpAuthService, HttpChatService, HttpDocumentService};
use tomo_application::AppController;
use tomo_core::auth::AuthService;
use tomo_core::chat::ChatService;
use tomo_core::document::DocumentService;
use tomo_core::state::StateRepository;
use tomo_infrastructure::StateRepositoryImpl;

mod commands;

#[derive(Parser)]
#[command(name = "tomo")]
#[command(about = "Tomo - chat with your documents", long_about = None)]
struct Cli {
    /// Base URL of the Tomo API.
    #[arg(long, env = "TOMO_API_URL", default_value = "http://localhost:8000/api")]
    api_url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in and store the credential
    Login { username: String, password: String },
    /// Create a new account
    Register { email: String, password: String },
    /// Discard the stored credential
    Logout,
    /// Show the signed-in account
    Whoami,
    /// Send a message in the active conversation
    Send { message: String },
    /// Start a fresh conversation
    New,
    /// Manage conversations
    Sessions {
        #[command(subcommand)]
        action: SessionsAction,
    },
    /// Manage documents
    Docs {
        #[command(subcommand)]
        action: DocsAction,
    },
}

#[derive(Subcommand)]
enum SessionsAction {
    /// List conversations
    List,
    /// Delete a conversation
    Delete { session_id: String },
}

#[derive(Subcommand)]
enum DocsAction {
    /// List documents
    List,
    /// Upload a file
    Upload { path: std::path::PathBuf },
    /// Delete a document
    Delete { document_id: String },
    /// Print a download URL for a document
    Url { document_id: String },
}

/// The wired-up application stack for one CLI invocation.
struct App {
    controller: Arc<AppController>,
    auth: Arc<dyn AuthService>,
}

async fn build_app(api_url: &str) -> Result<App> {
    let state: Arc<dyn StateRepository> = Arc::new(StateRepositoryImpl::new().await?);
    let client = Arc::new(ApiClient::new(api_url, state.clone()));

    let auth: Arc<dyn AuthService> = Arc::new(HttpAuthService::new(client.clone()));
    let chat: Arc<dyn ChatService> = Arc::new(HttpChatService::new(client.clone()));
    let documents: Arc<dyn DocumentService> = Arc::new(HttpDocumentService::new(client.clone()));

    let controller = AppController::new(auth.clone(), state, chat, documents);
    controller.attach_to(&client);

    Ok(App { controller, auth })
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let cli = Cli::parse();
    let app = build_app(&cli.api_url).await?;

    match cli.command {
        Commands::Login { username, password } => {
            commands::auth::login(&app.controller, &username, &password).await?
        }
        Commands::Register { email, password } => {
            commands::auth::register(app.auth.as_ref(), &email, &password).await?
        }
        Commands::Logout => commands::auth::logout(&app.controller).await?,
        Commands::Whoami => commands::auth::whoami(&app.controller).await?,
        Commands::Send { message } => commands::chat::send(&app.controller, &message).await?,
        Commands::New => commands::chat::new_session(&app.controller).await?,
        Commands::Sessions { action } => match action {
            SessionsAction::List => commands::chat::list_sessions(&app.controller).await?,
            SessionsAction::Delete { session_id } => {
                commands::chat::delete_session(&app.controller, &session_id).await?
            }
        },
        Commands::Docs { action } => match action {
            DocsAction::List => commands::docs::list(&app.controller).await?,
            DocsAction::Upload { path } => commands::docs::upload(&app.controller, &path).await?,
            DocsAction::Delete { document_id } => {
                commands::docs::delete(&app.controller, &document_id).await?
            }
            DocsAction::Url { document_id } => {
                commands::docs::url(&app.controller, &document_id).await?
            }
        },
    }

    Ok(())
}
