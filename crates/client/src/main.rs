use account_manager_client::config::ClientConfig;
use account_manager_client::display::render_table;
use account_manager_client::{
    AccountDraft, AccountManager, AccountsApi, AddOutcome, ClientError, EditFields, RefreshOutcome,
};

use chrono::Local;
use clap::{Parser, Subcommand};
use std::io::{self, BufRead, Write};
use std::time::Duration;
use tracing::{error, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(author, version, about = "Manage shared accounts on an account server", long_about = None)]
struct Args {
    /// Path to the configuration file
    #[arg(short, long)]
    config: Option<String>,

    /// Server base URL, overrides the configuration
    #[arg(short, long)]
    server: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch and print the account table
    List,
    /// Add a new account
    Add {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
        /// "YYYY-MM-DD HH:MM:SS", defaults to now
        #[arg(long)]
        added_time: Option<String>,
        #[arg(long, default_value = "")]
        remark: String,
    },
    /// Edit an account; omitted fields keep their current value
    Edit {
        id: i32,
        #[arg(long)]
        password: Option<String>,
        #[arg(long)]
        gpt: Option<bool>,
        #[arg(long)]
        midjourney: Option<bool>,
        #[arg(long)]
        usage_count: Option<i32>,
        #[arg(long)]
        added_time: Option<String>,
        #[arg(long)]
        remark: Option<String>,
    },
    /// Replace the remark of an account
    Remark { id: i32, text: String },
    /// Delete an account (admin only)
    Delete {
        id: i32,
        #[arg(long)]
        admin_user: Option<String>,
        #[arg(long)]
        admin_password: Option<String>,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Refresh the table periodically until interrupted
    Watch {
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
        interval_secs: Option<u64>,
    },
}

fn init_logging(log_dir: &str) -> WorkerGuard {
    // Log to a file: JSON format, daily rotation
    let file_appender = rolling::daily(log_dir, "client.log");
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);
    let file_layer = fmt::layer()
        .with_writer(file_writer)
        .with_ansi(false)
        .json();

    // Console logs go to stderr so the table on stdout stays clean
    let stderr_layer = fmt::layer().with_writer(io::stderr);

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(stderr_layer)
        .init();

    guard
}

fn prompt(label: &str) -> io::Result<String> {
    print!("{label}");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

fn confirm(question: &str) -> io::Result<bool> {
    let answer = prompt(&format!("{question} [y/N] "))?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes" | "Yes"))
}

async fn load_and_print(manager: &AccountManager) -> Result<(), ClientError> {
    match manager.refresh().await? {
        RefreshOutcome::Loaded(accounts) => {
            print!("{}", render_table(&accounts, Local::now().naive_local()));
        }
        RefreshOutcome::Skipped => info!("Refresh skipped, another fetch is running."),
    }
    Ok(())
}

/// Loads the table and returns the row with `id`. The later update is a
/// separate request; nothing guards against a concurrent change in between.
async fn fetch_account(
    manager: &AccountManager,
    id: i32,
) -> Result<account_manager_common::Account, ClientError> {
    manager.refresh().await?;
    manager.find_account(id).await
}

async fn run_watch(manager: &AccountManager, interval: Duration) {
    let mut ticker = tokio::time::interval(interval);
    info!(interval_secs = interval.as_secs(), "Auto refresh started.");
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if let Err(e) = load_and_print(manager).await {
                    error!(error = %e, "Auto refresh failed.");
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Auto refresh stopped.");
                break;
            }
        }
    }
}

async fn run(
    command: Command,
    manager: &AccountManager,
    config: &ClientConfig,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    match command {
        Command::List => {
            if let Err(e) = load_and_print(manager).await {
                error!(error = %e, "Failed to load accounts.");
                println!("Failed to load accounts.");
            }
        }
        Command::Add {
            username,
            password,
            added_time,
            remark,
        } => {
            let draft = AccountDraft {
                username,
                password,
                added_time,
                remark,
            };
            match manager.add_account(draft).await {
                Ok(AddOutcome::Added) => println!("Account added successfully."),
                Ok(AddOutcome::Skipped) => println!("Add button is already processing."),
                Err(e) if e.is_validation() => println!("{e}"),
                Err(e) => {
                    error!(error = %e, "Add account failed.");
                    println!("Failed to add account.");
                }
            }
        }
        Command::Edit {
            id,
            password,
            gpt,
            midjourney,
            usage_count,
            added_time,
            remark,
        } => {
            let result = async {
                let account = fetch_account(manager, id).await?;
                let mut fields = EditFields::from(&account);
                if let Some(password) = password {
                    fields.password = password;
                }
                if let Some(gpt) = gpt {
                    fields.gpt_status = gpt;
                }
                if let Some(midjourney) = midjourney {
                    fields.midjourney_status = midjourney;
                }
                if let Some(usage_count) = usage_count {
                    fields.usage_count = usage_count;
                }
                if let Some(added_time) = added_time {
                    fields.added_time = added_time;
                }
                if let Some(remark) = remark {
                    fields.remark = remark;
                }
                manager.edit_account(&account, fields).await
            }
            .await;
            match result {
                Ok(_) => println!("Account updated successfully."),
                Err(e) => {
                    error!(account_id = id, error = %e, "Edit account failed.");
                    println!("Failed to update account.");
                }
            }
        }
        Command::Remark { id, text } => {
            let result = async {
                let account = fetch_account(manager, id).await?;
                manager.edit_remark(&account, &text).await
            }
            .await;
            match result {
                Ok(_) => println!("Remark updated successfully."),
                Err(e) => {
                    error!(account_id = id, error = %e, "Edit remark failed.");
                    println!("Failed to update remark.");
                }
            }
        }
        Command::Delete {
            id,
            admin_user,
            admin_password,
            yes,
        } => {
            let username = match admin_user.or_else(|| config.admin_username.clone()) {
                Some(username) => username,
                None => prompt("Admin username: ")?,
            };
            let password = match admin_password.or_else(|| config.admin_password.clone()) {
                Some(password) => password,
                None => prompt("Admin password: ")?,
            };

            match manager.login_admin(&username, &password).await {
                Ok(true) => {}
                Ok(false) => {
                    println!("{}", ClientError::Unauthorized);
                    return Ok(());
                }
                Err(e) => {
                    error!(error = %e, "Admin verification failed.");
                    println!("Failed to delete account.");
                    return Ok(());
                }
            }

            let account = match fetch_account(manager, id).await {
                Ok(account) => account,
                Err(e) => {
                    error!(account_id = id, error = %e, "Could not load account to delete.");
                    println!("Failed to delete account.");
                    return Ok(());
                }
            };
            if !yes
                && !confirm(&format!(
                    "Are you sure you want to delete the account {}?",
                    account.username
                ))?
            {
                return Ok(());
            }

            match manager.delete_account(&account).await {
                Ok(_) => println!("Account deleted successfully."),
                Err(e) => {
                    error!(account_id = id, error = %e, "Delete account failed.");
                    println!("Failed to delete account.");
                }
            }
        }
        Command::Watch { interval_secs } => {
            let interval = interval_secs
                .map(Duration::from_secs)
                .unwrap_or_else(|| config.refresh_interval());
            run_watch(manager, interval).await;
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let args = Args::parse();

    let mut config = ClientConfig::load(args.config.as_deref()).map_err(ClientError::Config)?;
    if let Some(server) = args.server {
        config.server_url = server;
    }

    let _log_guard = init_logging(&config.log_dir);
    info!(server_url = %config.server_url, "Starting account client.");

    let api = AccountsApi::new(&config.server_url, config.request_timeout())?;
    let manager = AccountManager::new(api, config.retry_policy());

    run(args.command, &manager, &config).await
}
