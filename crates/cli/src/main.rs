use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser, Debug)]
#[command(name = "signal-front", about = "Drive the audition and signal-bank pages from the terminal.")]
struct Cli {
    /// Settings file; falls back to signal_front.json, then defaults
    #[arg(short, long, global = true)]
    settings: Option<PathBuf>,

    /// Page origin, e.g. http://localhost:8081 (overrides settings)
    #[arg(long, global = true)]
    origin: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Submit the public audition form
    Audition {
        #[arg(long)]
        name: String,
        #[arg(long)]
        country: String,
        #[arg(long)]
        video_url: String,
        #[arg(long)]
        social_handle: Option<String>,
        #[arg(long)]
        message: Option<String>,
    },
    /// List submissions as the admin review page does
    Admin {
        #[arg(long, default_value = "")]
        token: String,
        #[arg(long)]
        country: Option<String>,
        #[arg(long)]
        limit: Option<String>,
    },
    /// Show the signal-bank ledger and total
    Ledger,
    /// Log a signal-bank contribution, then show the ledger
    Contribute {
        #[arg(long)]
        amount: String,
        #[arg(long, default_value = "")]
        name: String,
        #[arg(long, default_value = "")]
        message: String,
    },
    /// Landing page actions
    Landing {
        #[command(subcommand)]
        action: LandingAction,
    },
    /// Serve the in-memory API
    MockServer {
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
        #[arg(long, default_value_t = api_client::base::DEFAULT_LOCAL_PORT)]
        port: u16,
        /// Require this token when listing auditions
        #[arg(long)]
        admin_token: Option<String>,
        /// Start the stats from the launch figures instead of zero
        #[arg(long)]
        launch_baseline: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum LandingAction {
    /// Load stats, ledger and requests once
    Show,
    /// Keep polling until Ctrl-C
    Watch,
    Contribute {
        #[arg(long, default_value = "")]
        email: String,
        #[arg(long)]
        amount: String,
        #[arg(long, default_value = "")]
        message: String,
    },
    /// Submit a help request
    Request {
        #[arg(long, default_value = "")]
        name: String,
        #[arg(long, default_value = "")]
        email: String,
        #[arg(long, default_value = "")]
        story: String,
        #[arg(long, default_value = "")]
        video_url: String,
        #[arg(long, default_value = "")]
        amount: String,
    },
    Subscribe {
        #[arg(long, default_value = "")]
        email: String,
    },
    Vote {
        request_id: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    logger::init(logger::DEFAULT_FILTER);

    let cli = Cli::parse();
    let mut settings = settings_loader::resolve_settings(cli.settings.as_ref())?;
    if let Some(origin) = cli.origin {
        settings.origin = origin;
    }
    tracing::debug!(origin = %settings.origin, "settings resolved");

    let ctx = commands::Context::new(settings);
    match cli.command {
        Command::Audition { name, country, video_url, social_handle, message } => {
            let mut fields = vec![
                ("name", name),
                ("country", country),
                ("videoUrl", video_url),
            ];
            fields.extend(social_handle.map(|h| ("socialHandle", h)));
            fields.extend(message.map(|m| ("message", m)));
            commands::audition(&ctx, fields).await
        }
        Command::Admin { token, country, limit } => commands::admin(&ctx, token, country, limit).await,
        Command::Ledger => commands::ledger(&ctx).await,
        Command::Contribute { amount, name, message } => {
            commands::contribute(&ctx, name, amount, message).await
        }
        Command::Landing { action } => commands::landing(&ctx, action).await,
        Command::MockServer { host, port, admin_token, launch_baseline } => {
            let baseline = if launch_baseline {
                mock_api::StatsBaseline::launch()
            } else {
                mock_api::StatsBaseline::default()
            };
            let config = mock_api::MockConfig { admin_token, baseline };
            mock_api::run_server(config, &host, port).await
        }
    }
}
