use anyhow::Context;
use async_import::config::toml_config::TomlConfig;
use async_import::core::ConfigProvider;
use async_import::run_import;
use async_import::utils::{logger, validation::Validate};
use clap::Parser;

#[derive(Parser)]
#[command(name = "toml-import")]
#[command(about = "Bulk-import files into a job store using a TOML configuration")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "import-config.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override monitoring setting from config
    #[arg(long)]
    monitor: Option<bool>,

    /// Override the worker limit from config
    #[arg(long)]
    max_threads: Option<usize>,

    /// Dry run - show what would be imported without importing
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // 載入 TOML 配置
    let mut config = TomlConfig::from_file(&args.config)
        .with_context(|| format!("Failed to load config file '{}'", args.config))?;

    if config.json_logs() {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(args.verbose);
    }

    tracing::info!("🚀 Starting TOML-based import");
    tracing::info!("📁 Loaded configuration from: {}", args.config);

    // 應用命令列覆蓋設定
    if let Some(max_threads) = args.max_threads {
        config.import.max_threads = Some(max_threads);
        tracing::info!("🔧 max_threads overridden to: {}", max_threads);
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    display_config_summary(&config, &args);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No files will be imported");
        return Ok(());
    }

    let monitor_enabled = args.monitor.unwrap_or_else(|| config.monitoring_enabled());

    match run_import(&config, monitor_enabled).await {
        Ok(summary) => {
            println!(
                "✅ Imported {} files ({} bytes) in {:.3}s",
                summary.files.len(),
                summary.total_size(),
                summary.elapsed.as_secs_f64()
            );
            for file in &summary.files {
                println!(
                    "  {} -> {} ({} bytes)",
                    file.source, file.handle.file_id, file.handle.size
                );
            }
            if let Some(manifest) = &summary.manifest_path {
                println!("📁 Manifest saved to: {}", manifest);
            }
        }
        Err(e) => {
            tracing::error!(
                "❌ Import failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            let exit_code = e.severity().exit_code();
            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}

fn display_config_summary(config: &TomlConfig, args: &Args) {
    println!("📋 Configuration Summary:");
    println!("  Job store: {}", config.job_store());
    println!("  Workers: {}", ConfigProvider::max_threads(config));
    println!("  Sources: {}", config.sources().len());
    for source in config.sources() {
        println!("    - {}", source);
    }
    if let Some(manifest) = config.manifest_name() {
        println!("  Manifest: {}", manifest);
    }

    if args.dry_run {
        println!("  🔍 DRY RUN MODE ENABLED");
    }

    println!();
}
