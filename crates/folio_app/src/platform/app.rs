use folio_engine::{ensure_output_dir, BatchEngine, BatchReport, NullSink, ProbeOutcome};
use folio_logging::{folio_info, folio_warn};

use super::confirm;
use super::persistence::{load_config_file, ConfigFile};
use super::plan::RunPlan;
use crate::cli::Args;

pub async fn run(args: Args) -> anyhow::Result<()> {
    let file = match &args.config {
        Some(path) => load_config_file(path)?,
        None => ConfigFile::default(),
    };
    let plan = RunPlan::resolve(&args, file)?;

    let output_dir = plan.config.output_dir().to_path_buf();
    if !output_dir.exists() {
        folio_info!("Created output directory: {:?}", output_dir);
    }
    ensure_output_dir(&output_dir)?;

    let engine = BatchEngine::new(plan.config, plan.settings)?;
    engine.log_configuration();

    if let ProbeOutcome::NeedsConfirmation(failure) = engine.probe().await {
        if !confirm::should_continue(&failure, plan.assume_yes)? {
            folio_info!("Download canceled. Please check authentication and try again.");
            return Ok(());
        }
    }

    let report = engine.run(&NullSink).await;
    if report.credentials_likely_expired() {
        print_troubleshooting(&report);
    }
    Ok(())
}

fn print_troubleshooting(report: &BatchReport) {
    folio_warn!(
        "Troubleshooting: none of {} requests returned a page",
        report.failure_count
    );
    folio_info!("1. The authentication cookies might have expired.");
    folio_info!("2. To get fresh cookies:");
    folio_info!("   - Open your browser and navigate to the book viewer");
    folio_info!("   - Press F12 to open Developer Tools");
    folio_info!("   - Go to the Application tab (Chrome) or Storage tab (Firefox)");
    folio_info!("   - Select Cookies from the left sidebar");
    folio_info!("   - Copy the values of the JSESSIONID and dspacc cookies");
    folio_info!("   - Run again with --session-id and --access-token");
}
