use anyhow::Context;
use bingo_faces::domain::ports::Storage;
use bingo_faces::utils::error::{BingoError, ErrorSeverity};
use bingo_faces::utils::{logger, validation::Validate};
use bingo_faces::{BatchPlan, CliConfig, GenerationEngine, LocalStorage, RunReport, TomlConfig};
use clap::Parser;

fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // Logging
    if cli.log_json {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("🚀 Starting bingo-faces");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    if let Err(e) = cli.validate() {
        fail("Command line validation failed", &e);
    }

    tracing::info!("📁 Loading batch plan from: {}", cli.plan);
    let mut config = match TomlConfig::from_file(&cli.plan) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load batch plan '{}': {}", cli.plan, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    // Command line overrides
    if cli.extended {
        config.batch.extended = Some(true);
        tracing::info!("🔧 Extended catalog selected from the command line");
    }

    if let Err(e) = config.validate() {
        fail("Batch plan validation failed", &e);
    }
    let plan = match config.to_batch_plan() {
        Ok(plan) => plan,
        Err(e) => fail("Batch plan is not schedulable", &e),
    };
    tracing::info!("✅ Batch plan loaded and validated successfully");

    let seed = cli.seed.or(config.batch.seed).unwrap_or_else(rand::random);
    tracing::info!("🎲 Seed: {} (rerun with --seed {} to reproduce)", seed, seed);

    let output_path = cli.output.clone().unwrap_or_else(|| {
        format!(
            "{}/{}",
            config.output_directory().trim_end_matches('/'),
            config.output_filename()
        )
    });
    display_plan_summary(&config, &plan, &output_path, seed);

    let monitor_enabled = cli.monitor || config.monitoring_enabled();
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    let engine = GenerationEngine::new_with_monitoring(config.face_source(), monitor_enabled);

    if cli.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No tickets will be generated");
        let preview = match engine.preview(&plan, config.catalog_size(), seed) {
            Ok(preview) => preview,
            Err(e) => fail("Catalog import failed", &e),
        };
        let rendered =
            serde_json::to_string_pretty(&preview).context("rendering catalog preview")?;
        println!("{}", rendered);
        return Ok(());
    }

    let report = match engine.run(&plan, config.catalog_size(), seed) {
        Ok(report) => report,
        Err(e) => fail("Ticket generation failed", &e),
    };

    if let Err(e) = write_report(&report, &output_path, config.pretty_output()) {
        fail("Writing the run report failed", &e);
    }
    tracing::info!("📁 Output saved to: {}", output_path);
    println!("📁 Output saved to: {}", output_path);

    match &report.failure {
        None => {
            tracing::info!("✅ Generated {} tickets", report.output.ticket_count());
            println!("✅ Generated {} tickets", report.output.ticket_count());
        }
        Some(exhaustion) => {
            let e = BingoError::from(exhaustion.clone());
            tracing::error!(
                "❌ Batch stopped after {} tickets: {}",
                report.output.ticket_count(),
                exhaustion
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
            std::process::exit(exit_code(e.severity()));
        }
    }

    Ok(())
}

fn write_report(report: &RunReport, path: &str, pretty: bool) -> bingo_faces::Result<()> {
    let bytes = if pretty {
        serde_json::to_vec_pretty(report)?
    } else {
        serde_json::to_vec(report)?
    };
    LocalStorage::new(".".to_string()).write_file(path, &bytes)
}

fn display_plan_summary(config: &TomlConfig, plan: &BatchPlan, output_path: &str, seed: u64) {
    println!("📋 Batch Plan Summary:");
    println!("  Batch: {}", config.batch.name);
    if let Some(description) = &config.batch.description {
        println!("  Description: {}", description);
    }
    println!("  Catalog: {}", config.catalog_size());
    println!(
        "  Permutations: {} (reset per permutation: {})",
        plan.permutations(),
        plan.reset_per_permutation()
    );
    println!("  Seed: {}", seed);
    println!("  Output: {}", output_path);
    for request in plan.schedule() {
        println!("  - {} x {}", request.category, request.quantity);
    }
    println!();
}

// Exit code by error severity
fn exit_code(severity: ErrorSeverity) -> i32 {
    match severity {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    }
}

fn fail(context: &str, e: &BingoError) -> ! {
    tracing::error!(
        "❌ {}: {} (Category: {:?}, Severity: {:?})",
        context,
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

    std::process::exit(exit_code(e.severity()).max(1))
}
