use anyhow::Result;
use clap::Parser;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use noseprint::domain::{
    AMBIGUITY_GAP, DUPLICATE_THRESHOLD, LIVE_VERIFY_THRESHOLD, STRICT_THRESHOLD_ADMIN,
    STRICT_THRESHOLD_LIVE, STRICT_THRESHOLD_MOBILE, VERIFY_THRESHOLD,
};
use noseprint::{CallerRole, Commands, Container, ContainerConfig, MatchThresholds, Router};

#[derive(Parser)]
#[command(name = "noseprint")]
#[command(author, version, about = "Livestock nose-print identity registry", long_about = None)]
struct Cli {
    #[arg(short, long, global = true)]
    verbose: bool,

    #[arg(short, long, global = true, default_value = "~/.noseprint")]
    data_dir: String,

    /// Keep the registry in memory; nothing survives the process
    #[arg(long, global = true)]
    memory_storage: bool,

    /// Embedding model endpoint (token read from NOSEPRINT_MODEL_TOKEN)
    #[arg(long, global = true, env = "NOSEPRINT_MODEL_URL")]
    model_url: Option<String>,

    /// Optional nose detection endpoint
    #[arg(long, global = true, env = "NOSEPRINT_DETECTOR_URL")]
    detector_url: Option<String>,

    /// Demo mode: derive vectors from image bytes instead of a model
    #[arg(long, global = true)]
    synthetic_embeddings: bool,

    /// Samples captured per registration
    #[arg(long, global = true, default_value = "3")]
    samples: usize,

    #[arg(long, global = true, default_value_t = DUPLICATE_THRESHOLD)]
    duplicate_threshold: f32,

    #[arg(long, global = true, default_value_t = VERIFY_THRESHOLD)]
    verify_threshold: f32,

    #[arg(long, global = true, default_value_t = AMBIGUITY_GAP)]
    ambiguity_gap: f32,

    #[arg(long, global = true, default_value_t = STRICT_THRESHOLD_MOBILE)]
    strict_threshold_mobile: f32,

    #[arg(long, global = true, default_value_t = STRICT_THRESHOLD_ADMIN)]
    strict_threshold_admin: f32,

    /// Admission threshold for live-camera frames
    #[arg(long, global = true, default_value_t = LIVE_VERIFY_THRESHOLD)]
    verify_threshold_live: f32,

    #[arg(long, global = true, default_value_t = STRICT_THRESHOLD_LIVE)]
    strict_threshold_live: f32,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    fn thresholds(&self) -> MatchThresholds {
        MatchThresholds::default()
            .with_duplicate(self.duplicate_threshold)
            .with_verify(self.verify_threshold)
            .with_ambiguity_gap(self.ambiguity_gap)
            .with_strict(CallerRole::Mobile, self.strict_threshold_mobile)
            .with_strict(CallerRole::Admin, self.strict_threshold_admin)
            .with_live_verify(self.verify_threshold_live)
            .with_strict(CallerRole::Live, self.strict_threshold_live)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let data_dir = expand_tilde(&cli.data_dir);
    if !cli.memory_storage {
        std::fs::create_dir_all(&data_dir)?;
    }

    let config = ContainerConfig {
        data_dir,
        memory_storage: cli.memory_storage,
        model_url: cli.model_url.clone(),
        detector_url: cli.detector_url.clone(),
        synthetic_embeddings: cli.synthetic_embeddings,
        samples: cli.samples,
        thresholds: cli.thresholds(),
    };

    let container = Container::new(config).await?;
    let router = Router::new(&container);
    let output = router.route(cli.command).await?;
    println!("{}", output);

    Ok(())
}

fn expand_tilde(path: &str) -> String {
    if path == "~" || path.starts_with("~/") {
        if let Some(home) = std::env::var_os("HOME") {
            if path == "~" {
                return home.to_string_lossy().to_string();
            }
            return path.replacen("~", &home.to_string_lossy(), 1);
        }
    }
    path.to_string()
}
