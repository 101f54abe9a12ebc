use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub mod auth;
pub mod chat;
pub mod chats;

use crate::client::HttpChatService;
use crate::core::{AppConfig, FileCredentialStore};

#[derive(Subcommand)]
enum Command {
    /// Create an account
    Register {
        #[arg(long)]
        username: String,
        #[arg(long)]
        email: Option<String>,
        /// Prompted for when not given
        #[arg(long)]
        password: Option<String>,
    },
    /// Log in and store the access token
    Login {
        #[arg(long)]
        username: String,
        /// Prompted for when not given
        #[arg(long)]
        password: Option<String>,
    },
    /// Forget the stored access token
    Logout {},
    /// List saved conversations
    Chats {
        /// Only show conversations whose title contains this
        #[arg(long)]
        search: Option<String>,
    },
    /// Start an interactive chat session
    Chat {},
}

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Base URL of the chat service, overrides NAFAS_API_URL
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                // Keep the terminal quiet unless asked otherwise with RUST_LOG
                format!("{}=warn", env!("CARGO_CRATE_NAME")).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

pub fn http_service(config: &AppConfig) -> Result<HttpChatService> {
    let credentials = FileCredentialStore::new(&config.storage_path);
    let service = HttpChatService::from_config(config, Box::new(credentials))?;
    Ok(service)
}

pub async fn run() -> Result<()> {
    let args = Cli::parse();
    init_tracing();

    let mut config = AppConfig::default();
    if let Some(api_url) = args.api_url {
        config.api_url = api_url;
    }
    tracing::debug!("Using chat service at {}", config.api_url);

    // Handle each sub command
    match args.command {
        Some(Command::Register {
            username,
            email,
            password,
        }) => {
            auth::register(&config, username, email, password).await?;
        }
        Some(Command::Login { username, password }) => {
            auth::login(&config, username, password).await?;
        }
        Some(Command::Logout {}) => {
            auth::logout(&config)?;
        }
        Some(Command::Chats { search }) => {
            chats::run(&config, search).await?;
        }
        Some(Command::Chat {}) => {
            chat::run(&config).await?;
        }
        None => {}
    }

    Ok(())
}
