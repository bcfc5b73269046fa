use clap::Parser;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::fs::File;
use std::path::PathBuf;

use streems::core::config::{self, CliOverrides};
use streems::core::mention::MentionMatch;
use streems::tui;

#[derive(Parser)]
#[command(name = "streems", about = "Terminal Twitch chat client")]
struct Args {
    /// Twitch login (defaults to $TWUSER)
    #[arg(short, long)]
    user: Option<String>,

    /// Channel to join (defaults to your own)
    #[arg(short, long)]
    channel: Option<String>,

    /// Log in with the oauth token from $TT and enable sending
    #[arg(short, long)]
    auth: bool,

    /// How to detect messages that mention you
    #[arg(long, value_enum)]
    mention_match: Option<MentionMatch>,

    /// Write every processed action as a JSON line to this file
    #[arg(long, value_name = "PATH")]
    debug_dump: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // Initialize file logger - writes to streems.log in current directory
    let log_config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .build();

    if let Ok(log_file) = File::create("streems.log") {
        let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
    }

    let file_config = match config::load_config() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("streems: {e}");
            std::process::exit(1);
        }
    };

    let cli = CliOverrides {
        user: args.user,
        channel: args.channel,
        auth: args.auth,
        mention_match: args.mention_match,
    };

    let resolved = match config::resolve(&file_config, &cli, |key| std::env::var(key).ok()) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("streems: {e}");
            std::process::exit(1);
        }
    };

    log::info!(
        "Streems starting up: channel #{}, {}",
        resolved.session.channel,
        if resolved.session.authenticated { "authenticated" } else { "anonymous" }
    );

    tui::run(resolved, args.debug_dump).await
}
