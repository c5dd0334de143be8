use ai_social_etl::core::etl::RunReport;
use ai_social_etl::utils::{error::EtlError, logger, validation::Validate};
use ai_social_etl::{CliConfig, EtlEngine, LocalStorage, SocialPipeline};
use clap::Parser;

fn exit_with(e: EtlError) -> ! {
    tracing::error!(
        "❌ Export failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());

    std::process::exit(e.severity().exit_code());
}

fn print_report(report: &RunReport) {
    println!("✅ Export completed in {:.1?}", report.elapsed);
    println!(
        "   {} rows: {} resolved, {} without handle, {} failed",
        report.rows, report.summary.resolved, report.summary.absent, report.summary.failed
    );
    println!("🎉 Data saved to {}", report.output_path);
}

#[tokio::main]
async fn main() {
    let config = CliConfig::parse();

    logger::init_logger(config.verbose, config.log_json);

    tracing::info!("Starting ai-social-etl CLI");
    tracing::debug!("CLI config: {:?}", config);

    if let Err(e) = config.validate() {
        exit_with(e);
    }

    let storage = LocalStorage::new(config.output_path.clone());
    let pipeline = match SocialPipeline::new(storage, config) {
        Ok(pipeline) => pipeline,
        Err(e) => exit_with(e),
    };

    let engine = EtlEngine::new(pipeline);

    match engine.run().await {
        Ok(report) => print_report(&report),
        Err(e) => exit_with(e),
    }
}
