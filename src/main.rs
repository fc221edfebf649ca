use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use console::style;
use tokio::runtime::Runtime;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use docweave::{
    ConfigOverrides, ConfigurationManager, DocGenerator, DocTransformer, DocumentationService,
    DocweaveError, FileSystemService, OpenAiCompatProvider, PresetRegistry, RunSummary,
    ShutdownFlag, create_shared_tracker,
};

#[derive(Parser)]
#[command(name = "docweave")]
#[command(
    version,
    about = "AI-powered docstring generation for Python codebases"
)]
struct Cli {
    /// Files or directories to document
    #[arg(required = true)]
    paths: Vec<PathBuf>,

    /// Use a local Ollama endpoint (phi4)
    #[arg(long, group = "preset")]
    ollama: bool,

    /// Use the OpenAI endpoint (gpt-4o-mini)
    #[arg(long, group = "preset")]
    openai: bool,

    /// Use the Gemini OpenAI-compatible endpoint (gemini-2.0-flash-exp)
    #[arg(long, group = "preset")]
    gemini: bool,

    /// Use the DeepSeek endpoint (deepseek-chat)
    #[arg(long, group = "preset")]
    deepseek: bool,

    /// OpenAI-compatible API base URL
    #[arg(short = 'b', long)]
    base_url: Option<String>,

    /// API key for the endpoint
    #[arg(short = 'k', long, env = "DOCWEAVE_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Model identifier sent with every request
    #[arg(short = 'm', long)]
    model: Option<String>,

    /// Context window size in tokens
    #[arg(long)]
    max_context: Option<usize>,

    /// Generation constraint (repeatable, replaces the defaults)
    #[arg(short = 'c', long = "constraint")]
    constraints: Vec<String>,

    /// Configuration file (default: discover .docweave.yml and friends)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Analyze and report without writing any file
    #[arg(short = 'd', long)]
    dry_run: bool,

    /// Regenerate docstrings for declarations that already have one
    #[arg(short = 'o', long)]
    overwrite: bool,

    #[arg(long, short)]
    verbose: bool,

    #[arg(long, short)]
    quiet: bool,
}

impl Cli {
    fn preset(&self) -> Option<String> {
        if self.ollama {
            Some("ollama".to_string())
        } else if self.openai {
            Some("openai".to_string())
        } else if self.gemini {
            Some("gemini".to_string())
        } else if self.deepseek {
            Some("deepseek".to_string())
        } else {
            None
        }
    }

    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            preset: self.preset(),
            config_file: self.config.clone(),
            base_url: self.base_url.clone(),
            api_key: self.api_key.clone(),
            model: self.model.clone(),
            max_context: self.max_context,
            constraints: self.constraints.clone(),
        }
    }
}

/// Panic hook that reports the failure before the default backtrace hook.
fn setup_panic_handler() {
    let default_hook = std::panic::take_hook();

    std::panic::set_hook(Box::new(move |panic_info| {
        let message = panic_info
            .payload()
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| panic_info.payload().downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "Unknown panic".to_string());

        eprintln!(
            "\n{} {}",
            style("Docweave encountered an unexpected error:").red().bold(),
            message
        );
        if let Some(location) = panic_info.location() {
            eprintln!(
                "  at {}:{}:{}",
                location.file(),
                location.line(),
                location.column()
            );
        }

        default_hook(panic_info);
    }));
}

/// First interrupt requests a graceful stop between files; a second
/// interrupt forces the process down.
fn spawn_signal_listener(shutdown: ShutdownFlag) {
    tokio::spawn(async move {
        loop {
            if tokio::signal::ctrl_c().await.is_err() {
                return;
            }
            if shutdown.is_requested() {
                warn!("Forcing shutdown...");
                std::process::exit(1);
            }
            info!("Graceful shutdown requested...");
            shutdown.request();
        }
    });
}

fn print_summary(summary: &RunSummary, dry_run: bool) {
    let suffix = if dry_run { " [dry-run]" } else { "" };
    println!(
        "{} Processed {} files ({} updated){}",
        style("✓").green(),
        summary.total,
        summary.updated,
        suffix
    );
}

fn main() -> ExitCode {
    setup_panic_handler();

    match run_cli() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let fs = FileSystemService::new();
    if !fs.is_valid_paths(&cli.paths) {
        return Err(DocweaveError::Config("Invalid path provided".to_string()).into());
    }

    let config =
        ConfigurationManager::new().resolve_config(&PresetRegistry::new(), &cli.overrides())?;

    let provider = OpenAiCompatProvider::new(&config.api, &config.generation.model)?;
    let generator = Arc::new(DocGenerator::new(Arc::new(provider), &config.generation));
    let transformer = DocTransformer::new(
        generator,
        create_shared_tracker(),
        &config.generation,
        cli.overwrite,
    )?;
    let service = DocumentationService::new(transformer, fs, cli.dry_run);

    let rt = Runtime::new()?;
    let summary = rt.block_on(async {
        let shutdown = ShutdownFlag::new();
        spawn_signal_listener(shutdown.clone());
        service.process_paths(&cli.paths, &shutdown).await
    });

    print_summary(&summary, cli.dry_run);
    Ok(())
}
