mod run;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use shelfwatch_core::Platform;
use shelfwatch_sov::RankWeighting;

use crate::run::RunOptions;

#[derive(Debug, Parser)]
#[command(name = "shelfwatch")]
#[command(about = "Shelf visibility tracking for quick-commerce storefronts")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Drive the keyword × region matrix against one platform and write
    /// product, share-of-voice, and run-report files
    Run {
        /// Platform to scrape
        #[arg(long)]
        platform: Platform,

        /// Comma-separated keywords; overrides the task manifest
        #[arg(long, value_delimiter = ',')]
        keywords: Option<Vec<String>>,

        /// Comma-separated delivery pincodes; overrides the task manifest
        #[arg(long, value_delimiter = ',')]
        regions: Option<Vec<String>>,

        /// Task manifest path (defaults to SHELFWATCH_TASKS_PATH)
        #[arg(long)]
        tasks_file: Option<PathBuf>,

        /// Force headless mode regardless of SHELFWATCH_HEADLESS
        #[arg(long)]
        headless: bool,

        /// Rank weighting curve: reciprocal, exponential[:base], or uniform
        #[arg(long, default_value = "reciprocal")]
        weighting: RankWeighting,

        /// Output directory (defaults to SHELFWATCH_OUTPUT_DIR)
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Per-task timeout in seconds (defaults to SHELFWATCH_TASK_TIMEOUT_SECS)
        #[arg(long)]
        task_timeout_secs: Option<u64>,

        /// Also write each captured response body under <output-dir>/raw/
        #[arg(long)]
        dump_raw: bool,
    },
    /// List the supported platforms
    Platforms,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let mut config = shelfwatch_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    match cli.command {
        Commands::Run {
            platform,
            keywords,
            regions,
            tasks_file,
            headless,
            weighting,
            output_dir,
            task_timeout_secs,
            dump_raw,
        } => {
            if headless {
                config.headless = true;
            }
            if let Some(path) = tasks_file {
                config.tasks_path = path;
            }
            if let Some(dir) = output_dir {
                config.output_dir = dir;
            }
            if let Some(secs) = task_timeout_secs {
                config.task_timeout_secs = secs;
            }

            let tasks = run::resolve_tasks(&config, keywords, regions)?;
            let options = RunOptions {
                platform,
                weighting,
                dump_raw,
            };
            run::run_matrix(&config, &options, &tasks).await
        }
        Commands::Platforms => {
            for platform in Platform::ALL {
                println!("{platform}");
            }
            Ok(())
        }
    }
}
