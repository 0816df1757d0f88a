//! Eduhub Telegram Bot binary.
//!
//! Start the bot with:
//! ```bash
//! TELEGRAM_BOT_TOKEN=xxx cargo run -p eduhub-telegram
//! ```

use std::path::PathBuf;

use clap::Parser;
use eduhub_core::config::{self, Settings, STATE_DIR_ENV};
use eduhub_telegram::TelegramBot;
use tracing_subscriber::EnvFilter;

/// Eduhub Bot - NEET and JEE practice on Telegram
#[derive(Parser, Debug)]
#[command(name = "eduhub-telegram")]
#[command(about = "Telegram bot for NEET and JEE quiz practice")]
struct Args {
    /// State directory (default: ~/.eduhub or $EDUHUB_STATE_DIR)
    #[arg(long)]
    state_dir: Option<PathBuf>,

    /// Verbose logging (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    if let Some(dir) = &args.state_dir {
        std::env::set_var(STATE_DIR_ENV, dir);
    }

    // Load environment variables from the state directory first
    let env_path = config::env_file();
    if env_path.exists() {
        let _ = dotenvy::from_path(&env_path);
    }
    // Then a local .env.local or .env
    let _ = dotenvy::from_filename(".env.local").or_else(|_| dotenvy::dotenv());

    let filter = match args.verbose {
        0 => "eduhub_telegram=info,eduhub_core=info,teloxide=warn",
        1 => "eduhub_telegram=debug,eduhub_core=debug,teloxide=info",
        2 => "eduhub_telegram=trace,eduhub_core=trace,teloxide=debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    if let Err(e) = config::ensure_all_dirs() {
        tracing::warn!(error = %e, "Failed to create all directories");
    }

    let settings = Settings::from_env()?;
    tracing::info!(
        state_dir = %settings.state_dir.display(),
        font_dir = %settings.font_dir.display(),
        admin = settings.admin_id.is_some(),
        "Configuration loaded"
    );

    let bot = TelegramBot::new(settings)?;

    match bot.get_me().await {
        Ok(username) => {
            tracing::info!(username = %username, "Bot initialized successfully");
            println!("\n📚 Eduhub Bot");
            println!("   Bot: @{}", username);
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to get bot info");
            return Err(e.into());
        }
    }

    println!("\n   Open Telegram and send /start to begin");
    println!("   Press Ctrl+C to stop\n");

    bot.start_polling().await?;

    Ok(())
}
