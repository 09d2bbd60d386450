use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

/// triage — terminal client for an email/document classification service.
///
/// Upload a .pdf/.txt file or paste email text, submit it to the remote
/// classifier, and review the suggested classification, subject, and
/// automatic reply.
#[derive(Parser, Debug)]
#[command(name = "triage", version, about)]
struct Cli {
    /// File to stage for upload before the TUI opens.
    #[arg(short, long)]
    file: Option<String>,

    /// Text to pre-fill in paste mode (switches to text mode).
    #[arg(short, long, conflicts_with = "file")]
    text: Option<String>,

    /// Base URL of the classification service (overrides the config file).
    #[arg(long)]
    endpoint: Option<String>,

    /// Increase logging verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging.
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    // Log to a file to avoid corrupting the TUI output. If the log file
    // can't be opened, silently discard logs rather than polluting the
    // alternate screen buffer.
    let log_dir = dirs::cache_dir()
        .unwrap_or_else(|| std::path::PathBuf::from("."))
        .join("triage");
    let _ = std::fs::create_dir_all(&log_dir);
    let log_path = log_dir.join("triage.log");
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path);

    match log_file {
        Ok(file) => {
            tracing_subscriber::fmt()
                .with_env_filter(
                    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
                )
                .with_writer(std::sync::Mutex::new(file))
                .with_ansi(false)
                .init();
        }
        Err(_) => {
            // Fallback: discard all logs to avoid TUI corruption.
            tracing_subscriber::fmt()
                .with_env_filter(EnvFilter::new("off"))
                .with_writer(std::io::sink)
                .init();
        }
    }

    // Load config.
    let mut config = triage_core::TriageConfig::load().unwrap_or_else(|e| {
        eprintln!("Warning: Failed to load config: {}. Using defaults.", e);
        triage_core::TriageConfig::default()
    });
    if let Some(endpoint) = cli.endpoint {
        config.api.base_url = endpoint;
    }

    tracing::info!(
        endpoint = %config.api.base_url,
        "Starting triage v{}",
        env!("CARGO_PKG_VERSION")
    );

    // Start the TUI.
    let mut app = triage_tui::App::new(&config)?;

    // Pre-stage input from CLI args if provided.
    if let Some(file) = cli.file {
        app.set_initial_file(file);
    }
    if let Some(text) = cli.text {
        app.set_initial_text(text);
    }

    app.run().await?;

    tracing::info!("triage exited cleanly");
    Ok(())
}
