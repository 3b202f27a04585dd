use std::path::PathBuf;

use {
    clap::{Parser, Subcommand},
    tracing::warn,
    tracing_subscriber::EnvFilter,
};

use {
    wagate_config::WagateConfig,
    wagate_whatsapp::CloudApiClient,
};

#[derive(Parser)]
#[command(name = "wagate", about = "wagate — WhatsApp Cloud API relay gateway")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Output logs as JSON instead of human-readable.
    #[arg(long, global = true, default_value_t = false)]
    json_logs: bool,

    /// Config file path (skips the standard discovery locations).
    #[arg(long, global = true, env = "WAGATE_CONFIG")]
    config: Option<PathBuf>,

    /// Address to bind to (overrides config value).
    #[arg(long, global = true)]
    bind: Option<String>,

    /// Port to listen on (overrides config value).
    #[arg(long, global = true)]
    port: Option<u16>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the relay server (default when no subcommand is provided).
    Serve,
    /// Send one text message through the Cloud API.
    Send {
        /// Recipient contact id (phone number).
        #[arg(long)]
        to: String,
        /// Message text.
        #[arg(short, long)]
        message: String,
        /// Quoted message id (wamid) for a threaded reply.
        #[arg(long)]
        reply_to: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level, cli.json_logs);

    let mut config = match &cli.config {
        Some(path) => wagate_config::load_config(path)?,
        None => wagate_config::discover_and_load(),
    };
    wagate_config::apply_env_overrides(&mut config);
    if let Some(bind) = cli.bind {
        config.server.bind = bind;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => wagate_gateway::start_gateway(config).await,
        Commands::Send {
            to,
            message,
            reply_to,
        } => send_once(config, &to, &message, reply_to.as_deref()).await,
    }
}

/// One-shot outbound send, bypassing the HTTP surface.
async fn send_once(
    config: WagateConfig,
    to: &str,
    text: &str,
    reply_to: Option<&str>,
) -> anyhow::Result<()> {
    for diagnostic in wagate_config::validate(&config) {
        warn!(field = diagnostic.field, "{}", diagnostic.message);
    }

    let client = CloudApiClient::new(config.whatsapp);
    let reply = client.send_text(to, text, reply_to).await?;
    if !reply.is_success() {
        anyhow::bail!(
            "cloud api rejected the send ({}): {}",
            reply.status,
            reply.body
        );
    }
    println!("{}", reply.body);
    Ok(())
}

fn init_logging(level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}
