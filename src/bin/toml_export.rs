use ai_social_etl::core::ConfigProvider;
use ai_social_etl::utils::{logger, validation::Validate};
use ai_social_etl::{EtlEngine, LocalStorage, SocialPipeline, TomlConfig};
use anyhow::Context;
use clap::Parser;

#[derive(Parser)]
#[command(name = "toml-export")]
#[command(about = "Category social export driven by a TOML configuration file")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "export-config.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Show the resolved settings without making any request
    #[arg(long)]
    dry_run: bool,
}

fn display_config_summary(config: &TomlConfig) {
    tracing::info!("📋 Export settings:");
    tracing::info!("   Category: {}", config.category());
    tracing::info!(
        "   Listing: {} (per page {}, paginate {}, max pages {:?})",
        config.api_base(),
        config.per_page(),
        config.paginate(),
        config.max_pages()
    );
    tracing::info!(
        "   Handles: {:?}, delay {:?}, API key {}",
        config.handle_source(),
        config.request_delay(),
        if config.api_key().is_some() { "set" } else { "not set" }
    );
    tracing::info!(
        "   Output: {}/{} ({:?}, include id: {})",
        config.output_path(),
        config.output_file(),
        config.export_schema(),
        config.include_id()
    );
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = TomlConfig::from_file(&args.config)
        .with_context(|| format!("Failed to load config file '{}'", args.config))?;

    logger::init_logger(args.verbose || config.verbose(), config.json_logs());
    tracing::info!("📁 Loaded configuration from: {}", args.config);

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());
        std::process::exit(e.severity().exit_code().max(1));
    }

    display_config_summary(&config);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - no requests will be made");
        return Ok(());
    }

    let storage = LocalStorage::new(config.output_path().to_string());
    let pipeline = SocialPipeline::new(storage, config)?;
    let engine = EtlEngine::new(pipeline);

    match engine.run().await {
        Ok(report) => {
            println!(
                "✅ {} rows ({} resolved) saved to {}",
                report.rows, report.summary.resolved, report.output_path
            );
            Ok(())
        }
        Err(e) => {
            tracing::error!("❌ Export failed: {}", e);
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(e.severity().exit_code());
        }
    }
}
