//! Command-line definition.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use marquee_domain::{MovieId, PaymentMethod};
use marquee_infrastructure::{ClientConfig, ConfigError};

#[derive(Parser, Debug)]
#[command(name = "marquee")]
#[command(version)]
#[command(about = "Browse, rent, and manage movies from the Marquee storefront")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub connection: ConnectionArgs,
}

/// Overrides for values otherwise read from the environment.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct ConnectionArgs {
    /// Storefront origin (overrides MARQUEE_API_URL)
    #[arg(long, global = true, value_name = "URL")]
    pub api_url: Option<String>,

    /// Request timeout in seconds (overrides MARQUEE_TIMEOUT_SECS)
    #[arg(long, global = true, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Credential file (overrides MARQUEE_TOKEN_FILE)
    #[arg(long, global = true, value_name = "PATH")]
    pub token_file: Option<PathBuf>,
}

impl ConnectionArgs {
    /// Applies the flags on top of `config`.
    pub fn apply(&self, mut config: ClientConfig) -> Result<ClientConfig, ConfigError> {
        if let Some(url) = &self.api_url {
            config = config.with_api_url(url)?;
        }
        if let Some(secs) = self.timeout {
            config = config.with_timeout_secs(secs)?;
        }
        if let Some(path) = &self.token_file {
            config = config.with_token_path(path);
        }
        Ok(config)
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the home page rows
    Home,

    /// Search the catalog
    Search {
        /// Search text
        key: String,

        /// Result page, starting at 1
        #[arg(short, long, default_value_t = 1)]
        page: u32,
    },

    /// Show a movie page
    Movie {
        /// Movie identifier
        id: MovieId,

        /// Add the movie to the watchlist, or remove it if already listed
        #[arg(long)]
        toggle_watchlist: bool,
    },

    /// Open a movie's player, spending coins if it is premium
    Play {
        /// Movie identifier
        id: MovieId,

        /// Find the movie in these search results instead of the home page
        #[arg(long, value_name = "TERM")]
        search: Option<String>,

        /// Confirm the coin cost without asking
        #[arg(short, long)]
        yes: bool,
    },

    /// Sign in with email and password
    Login {
        /// Account email
        #[arg(long)]
        email: String,

        /// Account password
        #[arg(long, env = "MARQUEE_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Create an account and sign in
    Register {
        /// Account email
        #[arg(long)]
        email: String,

        /// Display name
        #[arg(long)]
        username: String,

        /// Account password
        #[arg(long, env = "MARQUEE_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Sign out and forget the stored credential
    Logout,

    /// Show the signed-in account and its watchlist
    Whoami,

    /// Change the account's display name
    Rename {
        /// New display name
        username: String,
    },

    /// List coin plans
    Plans,

    /// Buy a coin plan by uploading a payment screenshot
    Buy {
        /// Plan name, e.g. "200 Coins"
        #[arg(long)]
        plan: String,

        /// Payment method used
        #[arg(long, value_parser = parse_method, default_value = "kbzpay")]
        method: PaymentMethod,

        /// Image proving the payment
        #[arg(long, value_name = "PATH")]
        screenshot: PathBuf,
    },

    /// List past coin orders
    Orders,

    /// Reset a forgotten password with an emailed code
    ResetPassword {
        /// Account email
        #[arg(long)]
        email: String,
    },

    /// Open a screen by path, e.g. "/movie/3" or "/search?key=dune"
    Open {
        /// Screen path
        path: String,
    },
}

fn parse_method(raw: &str) -> Result<PaymentMethod, String> {
    PaymentMethod::from_id(&raw.to_ascii_lowercase()).ok_or_else(|| {
        let known: Vec<&str> = PaymentMethod::ALL.iter().map(|m| m.id()).collect();
        format!("unknown payment method '{raw}' (expected one of: {})", known.join(", "))
    })
}
