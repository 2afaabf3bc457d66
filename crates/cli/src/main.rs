//! Gemini Glam CLI - session store migration and operator tools.
//!
//! # Usage
//!
//! ```bash
//! # Create the session store schema
//! glam-cli migrate
//!
//! # Grant a role (bootstraps the first admin)
//! glam-cli role set --user 7c9e6679-7425-40de-944b-e07fc1f90ae7 --role admin
//!
//! # Print the product inventory
//! glam-cli products list
//! ```
//!
//! # Commands
//!
//! - `migrate` - Create the session table
//! - `role set` - Update or create a user's role record
//! - `products list` - List products, newest first

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

use gemini_glam_core::{AppRole, UserId};

mod commands;

#[derive(Parser)]
#[command(name = "glam-cli")]
#[command(author, version, about = "Gemini Glam CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the session store schema
    Migrate,
    /// Manage user roles
    Role {
        #[command(subcommand)]
        action: RoleAction,
    },
    /// Inspect the product inventory
    Products {
        #[command(subcommand)]
        action: ProductsAction,
    },
}

#[derive(Subcommand)]
enum RoleAction {
    /// Set a user's role, creating the role record if missing
    Set {
        /// User id (profile id)
        #[arg(short, long)]
        user: UserId,

        /// Role (`user`, `moderator`, `admin`)
        #[arg(short, long)]
        role: AppRole,
    },
}

#[derive(Subcommand)]
enum ProductsAction {
    /// List products, newest first
    List,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::sessions().await?,
        Commands::Role { action } => match action {
            RoleAction::Set { user, role } => {
                commands::role::set(user, role).await?;
            }
        },
        Commands::Products { action } => match action {
            ProductsAction::List => commands::products::list().await?,
        },
    }
    Ok(())
}
