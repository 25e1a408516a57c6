//! CLI administration tool for catalog-api.
//!
//! Provides commands for managing accounts and performing database checks
//! without requiring HTTP API access. The first administrator account is
//! created here.
//!
//! # Usage
//!
//! ```bash
//! # Create an administrator (prompts for missing fields)
//! cargo run --bin admin -- user create --role admin
//!
//! # List accounts
//! cargo run --bin admin -- user list
//!
//! # Promote a user
//! cargo run --bin admin -- user set-role alice moderator
//!
//! # Issue a fresh confirmation key
//! cargo run --bin admin -- user rotate-key alice
//!
//! # Set a password (for LOGIN_MODE=password)
//! cargo run --bin admin -- user set-password alice
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` or `DB_*` components (required)
//! - `CONFIRMATION_KEY_LENGTH` (optional, default 12)

use catalog_api::application::services::{UserDraft, UserService};
use catalog_api::config::{CONFIRMATION_KEY_LENGTH_RANGE, Config, mask_connection_string};
use catalog_api::domain::entities::{Role, User, UserChanges};
use catalog_api::domain::repositories::UserRepository;
use catalog_api::infrastructure::persistence::PgUserRepository;
use catalog_api::utils::{confirmation_key, password};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::{Confirm, Input, Password};
use sqlx::PgPool;
use std::sync::Arc;

/// CLI tool for managing catalog-api.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Manage user accounts
    User {
        #[command(subcommand)]
        action: UserAction,
    },

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// Account management subcommands.
#[derive(Subcommand)]
enum UserAction {
    /// Create an account and print its confirmation key
    Create {
        #[arg(short, long)]
        username: Option<String>,

        #[arg(short, long)]
        email: Option<String>,

        /// user, moderator or admin
        #[arg(short, long, default_value = "user")]
        role: Role,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// List accounts
    List {
        /// Substring of the username
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Change an account's role
    SetRole { username: String, role: Role },

    /// Generate and print a new confirmation key
    RotateKey { username: String },

    /// Set an account password (used when LOGIN_MODE=password)
    SetPassword { username: String },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Show server version and row counts
    Info,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let database_url = Config::load_database_url()?;

    let pool = PgPool::connect(&database_url)
        .await
        .with_context(|| {
            format!(
                "Failed to connect to database at {}",
                mask_connection_string(&database_url)
            )
        })?;

    match cli.command {
        Commands::User { action } => handle_user_action(action, &pool).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

fn key_length() -> Result<usize> {
    let length = match std::env::var("CONFIRMATION_KEY_LENGTH") {
        Ok(v) => v
            .parse()
            .context("CONFIRMATION_KEY_LENGTH must be a number")?,
        Err(_) => 12,
    };

    if !CONFIRMATION_KEY_LENGTH_RANGE.contains(&length) {
        anyhow::bail!(
            "CONFIRMATION_KEY_LENGTH must be between {} and {}",
            CONFIRMATION_KEY_LENGTH_RANGE.start(),
            CONFIRMATION_KEY_LENGTH_RANGE.end()
        );
    }

    Ok(length)
}

/// Dispatches account management commands.
async fn handle_user_action(action: UserAction, pool: &PgPool) -> Result<()> {
    let repo: Arc<dyn UserRepository> = Arc::new(PgUserRepository::new(Arc::new(pool.clone())));
    let service = UserService::new(repo.clone(), key_length()?);

    match action {
        UserAction::Create {
            username,
            email,
            role,
            yes,
        } => create_user(&service, username, email, role, yes).await?,
        UserAction::List { search } => list_users(&service, search).await?,
        UserAction::SetRole { username, role } => set_role(&service, &username, role).await?,
        UserAction::RotateKey { username } => rotate_key(&service, repo, &username).await?,
        UserAction::SetPassword { username } => set_password(&service, repo, &username).await?,
    }

    Ok(())
}

/// Creates an account with interactive prompts.
///
/// # Flow
///
/// 1. Prompt for username and email (or use provided)
/// 2. Confirm creation (unless `--yes` flag)
/// 3. Store the account with a generated confirmation key
/// 4. Print the key so it can be handed to the owner
async fn create_user(
    service: &UserService,
    username: Option<String>,
    email: Option<String>,
    role: Role,
    skip_confirm: bool,
) -> Result<()> {
    println!("{}", "👤 Create Account".bright_blue().bold());
    println!();

    let username = match username {
        Some(u) => u,
        None => Input::new().with_prompt("Username").interact_text()?,
    };

    let email = match email {
        Some(e) => e,
        None => Input::new().with_prompt("Email").interact_text()?,
    };

    println!();
    println!("{}", "Account details:".bright_white().bold());
    println!("  Username: {}", username.cyan());
    println!("  Email:    {}", email.cyan());
    println!("  Role:     {}", role.to_string().cyan());
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Create this account?")
            .default(true)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    let user = service
        .create_user(UserDraft {
            username,
            email,
            first_name: String::new(),
            last_name: String::new(),
            bio: String::new(),
            role,
        })
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create account: {}", e))?;

    println!();
    println!("{}", "✅ Account created!".green().bold());
    print_key(&user, &user.confirmation_key);

    Ok(())
}

/// Lists accounts.
///
/// # Output Format
///
/// ```text
/// 📋 Accounts
///
///   ID    Username             Email                          Role       Joined
///   ─────────────────────────────────────────────────────────────────────────────
///   1     admin                admin@example.com              admin      2026-01-15
/// ```
async fn list_users(service: &UserService, search: Option<String>) -> Result<()> {
    println!("{}", "📋 Accounts".bright_blue().bold());
    println!();

    let (users, total) = service
        .list_users(search, 0, 1000)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list accounts: {}", e))?;

    if users.is_empty() {
        println!("{}", "  No accounts found".yellow());
        println!();
        println!(
            "  Create one with: {} admin user create",
            "cargo run --bin".bright_cyan()
        );
        return Ok(());
    }

    println!(
        "  {:<5} {:<20} {:<30} {:<10} {}",
        "ID".bright_white().bold(),
        "Username".bright_white().bold(),
        "Email".bright_white().bold(),
        "Role".bright_white().bold(),
        "Joined".bright_white().bold()
    );
    println!("  {}", "─".repeat(77).bright_black());

    for user in &users {
        let role = match user.role {
            Role::Admin => user.role.to_string().red(),
            Role::Moderator => user.role.to_string().yellow(),
            Role::User => user.role.to_string().normal(),
        };

        println!(
            "  {:<5} {:<20} {:<30} {:<10} {}",
            user.id.to_string().bright_black(),
            user.username.cyan(),
            user.email,
            role,
            user.created_at.format("%Y-%m-%d").to_string().bright_black()
        );
    }

    println!();
    println!("  Total: {}", total.to_string().bright_white().bold());
    println!();

    Ok(())
}

async fn set_role(service: &UserService, username: &str, role: Role) -> Result<()> {
    let user = service
        .update_user(
            username,
            UserChanges {
                role: Some(role),
                ..Default::default()
            },
        )
        .await
        .map_err(|e| anyhow::anyhow!("Failed to update role: {}", e))?;

    println!(
        "{} {} is now {}",
        "✅".green(),
        user.username.cyan(),
        user.role.to_string().bright_white().bold()
    );

    Ok(())
}

/// Replaces an account's confirmation key and prints the new one.
///
/// Tokens issued with the old key stay valid until they expire.
async fn rotate_key(
    service: &UserService,
    repo: Arc<dyn UserRepository>,
    username: &str,
) -> Result<()> {
    let user = service
        .get_user(username)
        .await
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    let key = confirmation_key::generate(key_length()?);
    repo.set_confirmation_key(user.id, &key)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to store key: {}", e))?;

    println!("{}", "🔑 Confirmation key rotated".green().bold());
    print_key(&user, &key);

    Ok(())
}

/// Prompts for a password twice and stores its Argon2 hash.
async fn set_password(
    service: &UserService,
    repo: Arc<dyn UserRepository>,
    username: &str,
) -> Result<()> {
    let user = service
        .get_user(username)
        .await
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    let plain = Password::new()
        .with_prompt(format!("New password for {}", user.username))
        .with_confirmation("Repeat password", "Passwords do not match")
        .interact()?;

    if plain.chars().count() < password::MIN_PASSWORD_LENGTH {
        anyhow::bail!(
            "Password must be at least {} characters",
            password::MIN_PASSWORD_LENGTH
        );
    }

    let hash = password::hash_password(&plain)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?;

    repo.set_password_hash(user.id, &hash)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to store password: {}", e))?;

    println!("{}", "✅ Password updated".green().bold());

    Ok(())
}

fn print_key(user: &User, key: &str) {
    println!();
    println!("  Username: {}", user.username.cyan());
    println!("  Key:      {}", key.bright_yellow().bold());
    println!();
    println!("{}", "Exchange it for a token:".bright_white());
    println!(
        "  curl -X POST http://localhost:3000/api/v1/auth/token \\\n    -H 'Content-Type: application/json' \\\n    -d '{{\"email\": \"{}\", \"confirmation_key\": \"{}\"}}'",
        user.email, key
    );
    println!();
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            println!("{}", "✅ Database connection OK".green().bold());
        }
        DbAction::Info => {
            println!("{}", "ℹ️  Database Information".bright_blue().bold());
            println!();

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;

            println!("  PostgreSQL: {}", version.bright_white());
            println!();

            for table in ["users", "categories", "genres", "titles", "reviews", "comments"] {
                let count: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
                    .fetch_one(pool)
                    .await?;
                println!(
                    "  {:<12} {}",
                    format!("{table}:"),
                    count.to_string().bright_green().bold()
                );
            }
            println!();
        }
    }

    Ok(())
}
