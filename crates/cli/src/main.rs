//! OmniOrder CLI - sign in, recover a password and manage orders.
//!
//! # Usage
//!
//! ```bash
//! # Sign in (the password is prompted for)
//! omniorder login -e asha@example.com
//!
//! # Create an account
//! omniorder register --first-name Asha --last-name Rao -e asha@example.com -m 9876543210
//!
//! # Reset a forgotten password
//! omniorder forgot-password -e asha@example.com
//!
//! # List, inspect and place orders
//! omniorder orders list
//! omniorder orders show 65f1c2
//! omniorder orders new --item-name "Fruit basket" --price 499.99 --items "Apple, Banana"
//! ```
//!
//! # Environment Variables
//!
//! - `OMNIORDER_API_URL` - Backend base URL, absolute or relative (default: `/v1`)
//! - `OMNIORDER_ORIGIN` - Origin a relative base URL is resolved against
//! - `OMNIORDER_TOKEN_PATH` - Where the access token is kept
//! - `RUST_LOG`, `SENTRY_DSN`, `SENTRY_ENVIRONMENT` - see `telemetry`

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Arc;

use clap::{Args, Parser, Subcommand};

use omniorder_client::{ApiClient, ClientConfig, FileTokenStore, SessionStore};
use omniorder_core::{Address, DEFAULT_COUNTRY};

mod commands;
mod telemetry;

use commands::CliError;
use commands::auth::RegisterArgs;
use commands::orders::NewOrderArgs;

#[derive(Parser)]
#[command(name = "omniorder")]
#[command(author, version, about = "OmniOrder command-line client")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in with email and password
    Login {
        /// Account email
        #[arg(short, long)]
        email: Option<String>,
    },
    /// Create an account and sign in
    Register(RegisterCommand),
    /// Forget the stored access token
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Reset a forgotten password with an emailed code
    ForgotPassword {
        /// Account email
        #[arg(short, long)]
        email: Option<String>,
    },
    /// Work with orders
    Orders {
        #[command(subcommand)]
        action: OrdersAction,
    },
}

#[derive(Args)]
struct RegisterCommand {
    /// Given name
    #[arg(long)]
    first_name: Option<String>,
    /// Family name
    #[arg(long)]
    last_name: Option<String>,
    /// Account email
    #[arg(short, long)]
    email: Option<String>,
    /// Mobile number
    #[arg(short, long)]
    mobile_number: Option<String>,
    #[command(flatten)]
    address: AddressArgs,
}

/// Address fields; on `orders new` these override the saved address.
#[derive(Args)]
struct AddressArgs {
    #[arg(long)]
    street_address: Option<String>,
    #[arg(long)]
    city: Option<String>,
    #[arg(long)]
    state: Option<String>,
    #[arg(long)]
    postal_code: Option<String>,
    #[arg(long)]
    country: Option<String>,
}

#[derive(Subcommand)]
enum OrdersAction {
    /// List your orders
    List,
    /// Show one order
    Show {
        /// Order id
        id: String,
    },
    /// Place a new order
    New {
        #[arg(long)]
        item_name: Option<String>,
        #[arg(long)]
        price: Option<String>,
        /// Comma-separated items
        #[arg(long)]
        items: Option<String>,
        #[command(flatten)]
        address: AddressArgs,
    },
}

impl From<RegisterCommand> for RegisterArgs {
    fn from(cmd: RegisterCommand) -> Self {
        let address = cmd.address;
        Self {
            first_name: cmd.first_name,
            last_name: cmd.last_name,
            email: cmd.email,
            mobile_number: cmd.mobile_number,
            address: Address {
                street_address: address.street_address.unwrap_or_default(),
                city: address.city.unwrap_or_default(),
                state: address.state.unwrap_or_default(),
                postal_code: address.postal_code.unwrap_or_default(),
                country: address.country.unwrap_or_else(|| DEFAULT_COUNTRY.to_owned()),
            },
        }
    }
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let _sentry = telemetry::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("{e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let config = ClientConfig::from_env()?;
    tracing::debug!(api = %config.api_base_url, token = %config.token_path.display(), "Loaded configuration");

    let tokens = Arc::new(FileTokenStore::new(config.token_path.clone()));
    let api = ApiClient::new(&config, tokens)?.with_unauthorized_hook(|path| {
        tracing::warn!(%path, "Backend rejected the stored token");
    });

    let mut session = SessionStore::new(api);
    session.restore().await;
    if let Some(user) = session.user() {
        telemetry::set_user(user);
    }

    match cli.command {
        Commands::Login { email } => commands::auth::login(&mut session, email).await,
        Commands::Register(cmd) => commands::auth::register(&mut session, cmd.into()).await,
        Commands::Logout => {
            commands::auth::logout(&mut session);
            Ok(())
        }
        Commands::Whoami => commands::auth::whoami(&session),
        Commands::ForgotPassword { email } => commands::recovery::run(&mut session, email).await,
        Commands::Orders { action } => match action {
            OrdersAction::List => commands::orders::list(&session).await,
            OrdersAction::Show { id } => commands::orders::show(&session, id).await,
            OrdersAction::New {
                item_name,
                price,
                items,
                address,
            } => {
                let args = NewOrderArgs {
                    item_name,
                    price,
                    items,
                    street_address: address.street_address,
                    city: address.city,
                    state: address.state,
                    postal_code: address.postal_code,
                    country: address.country,
                };
                commands::orders::create(&session, args).await
            }
        },
    }
}
