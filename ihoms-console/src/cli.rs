//! Command-line interface

use clap::{Args, Parser, Subcommand};
use ihoms_client::{ClientConfig, TicketTab};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "ihoms-console")]
#[command(about = "Terminal client for the IHOMS helpdesk", version)]
pub struct Cli {
    /// Backend base URL
    #[arg(long, env = "IHOMS_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long, env = "IHOMS_TIMEOUT_SECS", global = true)]
    pub timeout: Option<u64>,

    /// Directory holding the session token
    #[arg(long, env = "IHOMS_SESSION_DIR", global = true)]
    pub session_dir: Option<PathBuf>,

    /// Also write JSON logs to a daily file in this directory
    #[arg(long, env = "IHOMS_LOG_DIR", global = true)]
    pub log_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Environment defaults, overridden by explicit flags
    pub fn config(&self) -> ClientConfig {
        let mut config = ClientConfig::from_env();
        if let Some(url) = &self.api_url {
            config = config.with_base_url(url.clone());
        }
        if let Some(timeout) = self.timeout {
            config = config.with_timeout(timeout);
        }
        if let Some(dir) = &self.session_dir {
            config = config.with_session_dir(dir.clone());
        }
        config
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Log in and remember the session
    Login(LoginArgs),
    /// End the session
    Logout,
    /// Show the logged-in user
    Whoami,
    /// List tickets
    Tickets(TicketListArgs),
    /// Show one ticket with its actions and comment thread
    Show { id: String },
    /// Assign a ticket to yourself (admins take it over from its owner)
    Assign { id: String },
    /// Release a ticket you own
    Unassign { id: String },
    /// Resolve a ticket you own
    Resolve { id: String },
    /// Open a new ticket
    Create(CreateArgs),
    /// Add a comment to a ticket
    Comment { id: String, text: String },
    /// List users (user management)
    Users(UserListArgs),
}

#[derive(Args, Debug)]
pub struct LoginArgs {
    #[arg(long, env = "IHOMS_EMAIL")]
    pub email: String,

    #[arg(long, env = "IHOMS_PASSWORD", hide_env_values = true)]
    pub password: String,

    #[arg(long)]
    pub remember: bool,
}

#[derive(Args, Debug)]
pub struct TicketListArgs {
    /// Search title, description and requester
    #[arg(long, default_value = "")]
    pub query: String,

    /// all, open or assigned
    #[arg(long, default_value = "open")]
    pub tab: TicketTab,

    /// low, medium, high, critical or all
    #[arg(long, default_value = "all")]
    pub priority: String,

    /// Category name, or all
    #[arg(long, default_value = "all")]
    pub category: String,

    #[arg(long, default_value_t = 1)]
    pub page: usize,

    /// Defaults to IHOMS_PAGE_SIZE
    #[arg(long)]
    pub page_size: Option<usize>,
}

#[derive(Args, Debug)]
pub struct UserListArgs {
    /// Search names, email and department
    #[arg(long, default_value = "")]
    pub search: String,

    /// Role name, or all
    #[arg(long, default_value = "all")]
    pub role: String,

    /// active, inactive, pending or all
    #[arg(long, default_value = "all")]
    pub status: String,

    #[arg(long, default_value_t = 1)]
    pub page: usize,

    #[arg(long)]
    pub page_size: Option<usize>,
}

#[derive(Args, Debug)]
pub struct CreateArgs {
    #[arg(long)]
    pub category: Option<i64>,

    #[arg(long, default_value = "")]
    pub title: String,

    #[arg(long, default_value = "")]
    pub description: String,

    #[arg(long)]
    pub location: Option<i64>,

    #[arg(long)]
    pub department: Option<i64>,

    #[arg(long, default_value = "")]
    pub contact: String,

    /// low, medium, high or critical
    #[arg(long, default_value = "low")]
    pub priority: String,

    /// Required for high and critical priority
    #[arg(long, default_value = "")]
    pub urgency_reason: String,

    #[arg(long, default_value = "")]
    pub patient: String,

    #[arg(long, default_value = "")]
    pub equipment: String,
}
