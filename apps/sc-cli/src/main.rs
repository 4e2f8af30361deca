use clap::{Parser, Subcommand};
use sc_app::{
    AppError, AppResult, RunMode, RunOptions, RunProgressEvent, RunReport, RunStage,
    project_service, run_service,
};
use sc_controls::ControlCurve;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sewerctl")]
#[command(about = "Real-time control of sewer networks", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate scenario file syntax and references
    Validate {
        /// Path to the scenario YAML file
        scenario_path: PathBuf,
        /// Print the scenario with defaults filled in
        #[arg(long)]
        print: bool,
    },
    /// Run a scenario once
    Run {
        /// Path to the scenario YAML file
        scenario_path: PathBuf,
        /// Run without the scenario's controls
        #[arg(long)]
        uncontrolled: bool,
        /// Write the JSON run report to this path
        #[arg(long)]
        report: Option<PathBuf>,
        /// Export the recorded series as CSV
        #[arg(long)]
        export: Option<PathBuf>,
        /// Store the run summary next to the scenario
        #[arg(long)]
        save: bool,
    },
    /// Run without and with controls and print the volume table
    Compare {
        /// Path to the scenario YAML file
        scenario_path: PathBuf,
        /// Store both run summaries next to the scenario
        #[arg(long)]
        save: bool,
    },
    /// List stored runs for a scenario
    Runs {
        /// Path to the scenario YAML file
        scenario_path: PathBuf,
    },
    /// Evaluate a control curve
    Curve {
        /// Breakpoint inputs, ascending
        #[arg(long, value_delimiter = ',', num_args = 1.., allow_negative_numbers = true)]
        xs: Vec<f64>,
        /// Breakpoint outputs
        #[arg(long, value_delimiter = ',', num_args = 1.., allow_negative_numbers = true)]
        ys: Vec<f64>,
        /// Inputs to evaluate
        #[arg(long, value_delimiter = ',', num_args = 1.., allow_negative_numbers = true)]
        at: Vec<f64>,
    },
}

fn main() -> AppResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate {
            scenario_path,
            print,
        } => cmd_validate(&scenario_path, print),
        Commands::Run {
            scenario_path,
            uncontrolled,
            report,
            export,
            save,
        } => {
            let mode = if uncontrolled {
                RunMode::Uncontrolled
            } else {
                RunMode::Controlled
            };
            cmd_run(&scenario_path, mode, report, export.as_deref(), save)
        }
        Commands::Compare {
            scenario_path,
            save,
        } => cmd_compare(&scenario_path, save),
        Commands::Runs { scenario_path } => cmd_runs(&scenario_path),
        Commands::Curve { xs, ys, at } => cmd_curve(xs, ys, &at),
    }
}

fn cmd_validate(scenario_path: &Path, print: bool) -> AppResult<()> {
    println!("Validating scenario: {}", scenario_path.display());
    let scenario = project_service::load_scenario(scenario_path)?;
    let summary = project_service::describe_scenario(&scenario);
    println!("✓ Scenario is valid");
    println!(
        "  {}: {} storage nodes, {} outfalls, {} links, {} rules, {} metrics",
        summary.name,
        summary.storage_count,
        summary.outfall_count,
        summary.link_count,
        summary.rule_count,
        summary.metric_count
    );

    if print {
        let yaml = serde_yaml::to_string(&scenario)
            .map_err(|e| AppError::Project(format!("Failed to serialize scenario: {}", e)))?;
        println!("\n{}", yaml);
    }
    Ok(())
}

fn cmd_run(
    scenario_path: &Path,
    mode: RunMode,
    report_path: Option<PathBuf>,
    export: Option<&Path>,
    save: bool,
) -> AppResult<()> {
    let scenario = project_service::load_scenario(scenario_path)?;
    println!("Running {} ({})", scenario.name, mode.as_str());

    let options = RunOptions {
        report_path: report_path.clone(),
        ..RunOptions::default()
    };
    let mut last_emit = Instant::now();
    let mut last_fraction = -1.0f64;
    let report = run_service::run_scenario_with_progress(
        &scenario,
        mode,
        &options,
        Some(&mut |event| {
            let fraction = event
                .step
                .as_ref()
                .map(|s| s.fraction_complete)
                .unwrap_or(-1.0);
            let emit_now = (fraction >= 0.0 && (fraction - last_fraction).abs() >= 0.01)
                || last_emit.elapsed().as_millis() >= 100;
            if emit_now {
                render_cli_progress(&event);
                if fraction >= 0.0 {
                    last_fraction = fraction;
                }
                last_emit = Instant::now();
            }
        }),
    )?;
    clear_progress_line();

    println!("✓ Simulation completed: {}", report.run_id);
    print_run_summary(&report);

    if let Some(path) = report_path {
        println!("  Report: {}", path.display());
    }
    if let Some(path) = export {
        export_record(&report, path)?;
    }
    if save {
        let path = run_service::save_run(scenario_path, &scenario, &report)?;
        println!("✓ Saved summary to {}", path.display());
    }
    Ok(())
}

fn cmd_compare(scenario_path: &Path, save: bool) -> AppResult<()> {
    let scenario = project_service::load_scenario(scenario_path)?;
    println!("Comparing {} without and with control", scenario.name);

    let report = run_service::compare_scenario(&scenario)?;
    debug!(
        uncontrolled_steps = report.uncontrolled.steps,
        controlled_steps = report.controlled.steps,
        "comparison finished"
    );
    println!();
    print!("{}", report.comparison.render_table());

    if save {
        for run in [&report.uncontrolled, &report.controlled] {
            let path = run_service::save_run(scenario_path, &scenario, run)?;
            println!("✓ Saved {} summary to {}", run.mode.as_str(), path.display());
        }
    }
    Ok(())
}

fn cmd_runs(scenario_path: &Path) -> AppResult<()> {
    let scenario = project_service::load_scenario(scenario_path)?;
    let runs = run_service::list_runs(scenario_path, &scenario)?;

    if runs.is_empty() {
        println!("No stored runs found for scenario: {}", scenario.name);
    } else {
        println!("Stored runs for scenario '{}':", scenario.name);
        for manifest in runs {
            println!(
                "  {} {:>12} ({})",
                manifest.run_id,
                manifest.mode.as_str(),
                manifest.timestamp
            );
        }
    }
    Ok(())
}

fn cmd_curve(xs: Vec<f64>, ys: Vec<f64>, at: &[f64]) -> AppResult<()> {
    let curve = ControlCurve::new(xs, ys)?;
    for x in at {
        println!("{} -> {}", x, curve.evaluate(*x));
    }
    Ok(())
}

fn print_run_summary(report: &RunReport) {
    println!("  Steps: {}", report.steps);
    println!(
        "  Continuity error: {:.4}%",
        report.session.continuity_error_pct
    );
    println!("\nRun summary:");
    for (name, value) in report.summary.iter() {
        println!("  {:27} {:>12.3}", name, value);
    }
}

fn export_record(report: &RunReport, path: &Path) -> AppResult<()> {
    let record = &report.record;
    let mut csv = String::from("time");
    for label in &record.labels {
        csv.push(',');
        csv.push_str(label);
    }
    csv.push('\n');
    for (t, row) in record.time.iter().zip(&record.rows) {
        csv.push_str(&t.to_string());
        for value in row {
            csv.push_str(&format!(",{}", value));
        }
        csv.push('\n');
    }

    std::fs::write(path, csv)?;
    println!("✓ Exported {} rows to {}", record.len(), path.display());
    Ok(())
}

fn clear_progress_line() {
    print!("\r{}\r", " ".repeat(100));
    let _ = io::stdout().flush();
}

fn render_cli_progress(event: &RunProgressEvent) {
    match (&event.stage, &event.step) {
        (RunStage::Simulating, Some(s)) => {
            let width = 28usize;
            let filled = ((s.fraction_complete * width as f64).round() as usize).min(width);
            let bar = format!(
                "{}{}",
                "#".repeat(filled),
                "-".repeat(width.saturating_sub(filled))
            );
            print!(
                "\r[{}] {:>6.2}%  t={}  step={}  elapsed={:.1}s",
                bar,
                s.fraction_complete * 100.0,
                s.sim_time,
                s.step,
                event.elapsed_wall_s
            );
            let _ = io::stdout().flush();
        }
        _ => {
            let mut line = format!(
                "\r{}  elapsed={:.2}s",
                event.stage.label(),
                event.elapsed_wall_s
            );
            if let Some(msg) = &event.message {
                line.push_str(&format!("  {}", msg));
            }
            print!("{}", line);
            let _ = io::stdout().flush();
        }
    }
}
