//! Application startup
//!
//! Wires the CLI to the pipeline: parse arguments, initialise logging,
//! build the orchestrator, run it, and report the final statistics.

use crate::app::cli::Args;
use crate::core::logging::init_logging;
use crate::pipeline::{Orchestrator, PipelineResult, PipelineStats};
use clap::Parser;
use colored::Colorize;
use std::io::IsTerminal;
use std::time::Duration;

/// Initialize application startup
pub fn startup() {
    let args = Args::parse();

    let use_color = (args.color || std::io::stdout().is_terminal()) && !args.no_color;
    colored::control::set_override(use_color);

    if let Err(err) = init_logging(
        Some(&args.log_level),
        args.log_format.as_deref(),
        args.log_file.as_ref().and_then(|p| p.to_str()),
        use_color,
    ) {
        eprintln!("Failed to initialise logging: {}", err);
        std::process::exit(1);
    }

    log::info!("linepipe starting");

    match run_pipeline(&args) {
        Ok(stats) => report_stats(&stats, args.json),
        Err(err) => {
            log::error!("pipeline failed: {}", err);
            std::process::exit(1);
        }
    }
}

fn run_pipeline(args: &Args) -> PipelineResult<PipelineStats> {
    let orchestrator =
        Orchestrator::new(args.capacity)?.with_grace_period(Duration::from_millis(args.grace_ms));

    for path in &args.inputs {
        orchestrator.add_producer(path, None)?;
    }
    for path in &args.outputs {
        orchestrator.add_consumer(path, None)?;
    }

    orchestrator.run()?;
    Ok(orchestrator.stats())
}

fn report_stats(stats: &PipelineStats, json: bool) {
    if json {
        match serde_json::to_string_pretty(stats) {
            Ok(rendered) => println!("{}", rendered),
            Err(err) => log::error!("failed to serialise stats: {}", err),
        }
        return;
    }

    println!("{}", "Pipeline complete".green().bold());
    println!("  produced:   {}", stats.total_produced);
    println!("  consumed:   {}", stats.total_consumed);
    println!("  queue size: {}", stats.queue_size);
    println!("  producers:  {}", stats.producers);
    println!("  consumers:  {}", stats.consumers);

    if stats.total_consumed < stats.total_produced {
        println!(
            "  {}",
            format!(
                "{} records were not drained before the forced stop",
                stats.total_produced - stats.total_consumed
            )
            .yellow()
        );
    }
}
