//! CLI command handling
//!
//! Dispatches CLI commands to the library and formats output.

use std::sync::Arc;

use colored::Colorize;
use serde_json::json;

use crate::commands::Commands;
use crate::common::{config::Config, Result};
use crate::plan::{self, LoadedPlan};
use crate::program::{registry, DutFeatures, TestProgram};
use crate::queue::{ExecutionQueue, TaskRange};
use crate::worker::{self, DryRunExecutor, RunReport, TaskOutcome};

/// Dispatch a CLI command
pub async fn dispatch(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Show { plan, json } => {
            let loaded = plan::load_plan(&plan)?;

            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&json!({
                        "program": &loaded.program,
                        "eligible": loaded
                            .program
                            .eligible_test_cases()
                            .map(|c| c.case_name())
                            .collect::<Vec<_>>(),
                        "missing_features": &loaded.missing_features,
                    }))?
                );
            } else {
                print_program(&loaded);
            }
            Ok(())
        }

        Commands::Features {
            plan,
            delimiter,
            json,
        } => {
            let loaded = plan::load_plan(&plan)?;
            let features = DutFeatures::new(&loaded.program);

            if json {
                println!("{}", serde_json::to_string_pretty(&features.dut_features())?);
            } else {
                let delimiter = delimiter.as_deref().unwrap_or(&config.features.delimiter);
                println!("{}", features.dut_feature_list(delimiter));
            }
            Ok(())
        }

        Commands::Queue {
            plan,
            offset,
            length,
            json,
        } => {
            let range = TaskRange::from_raw(offset, length)?;
            let loaded = plan::load_plan(&plan)?;
            let queue = ExecutionQueue::new(config.queue.name.clone());
            plan::enqueue_eligible(&loaded.program, &queue);

            let ids = queue.get_task_ids(range);
            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&json!({
                        "queue": queue.name(),
                        "count": queue.count(),
                        "offset": range.offset,
                        "task_ids": ids,
                    }))?
                );
            } else {
                println!(
                    "{} {} ({} queued)",
                    "Queue:".blue().bold(),
                    queue.name().white().bold(),
                    queue.count()
                );
                if ids.is_empty() {
                    println!("  {}", "(no tasks in range)".dimmed());
                }
                for (i, id) in ids.iter().enumerate() {
                    println!("  {:>3}  {}", range.offset + i, id);
                }
            }
            Ok(())
        }

        Commands::Run {
            plan,
            workers,
            json,
        } => {
            let loaded = plan::load_plan(&plan)?;
            let queue = Arc::new(ExecutionQueue::new(config.queue.name.clone()));
            plan::enqueue_eligible(&loaded.program, &queue);

            let executor = Arc::new(DryRunExecutor::new());
            let report = worker::run_pool(
                Arc::clone(&queue),
                Arc::clone(&executor),
                workers.unwrap_or(config.worker.count),
                config.worker.idle_timeout(),
            )
            .await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_report(loaded.program.name(), &report);
            }
            Ok(())
        }

        Commands::Programs { json } => {
            if json {
                let programs: Vec<_> = registry::all_programs()
                    .iter()
                    .map(|p| {
                        json!({
                            "name": p.name,
                            "description": p.description,
                            "throughput": p.throughput,
                        })
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&programs)?);
            } else {
                println!("{}", "Certification programs:".blue().bold());
                for p in registry::all_programs() {
                    let marker = if p.throughput {
                        "throughput".yellow().to_string()
                    } else {
                        String::new()
                    };
                    println!("  {:<6} {:<32} {}", p.name.bold(), p.description, marker);
                }
            }
            Ok(())
        }
    }
}

fn print_program(loaded: &LoadedPlan) {
    let program: &TestProgram = &loaded.program;

    println!(
        "\n{} {}",
        "Program:".blue().bold(),
        program.name().white().bold()
    );
    if let Some(version) = &program.plan_version {
        println!("  Plan version: {}", version.dimmed());
    }
    if program.is_throughput_program() {
        println!("  {}", "Throughput program".yellow());
    }

    println!("\n{}", "Features:".cyan());
    if program.features().is_empty() {
        println!("  {}", "(none)".dimmed());
    }
    for feature in program.features() {
        let flag = if feature.flagged { "*" } else { " " };
        println!(
            "  {} {} = {} ({})",
            flag,
            feature.name,
            feature.value.white().bold(),
            feature.class.to_string().dimmed()
        );
    }

    println!("\n{}", "Test cases:".cyan());
    for case in program.test_cases() {
        let mark = if program.is_eligible(case) {
            "✓".green()
        } else {
            "✗".red()
        };
        match &case.required_feature {
            Some(feature) => println!(
                "  {} {} {}",
                mark,
                case.case_name(),
                format!("(requires {})", feature).dimmed()
            ),
            None => println!("  {} {}", mark, case.case_name()),
        }
    }

    for feature in &loaded.missing_features {
        println!(
            "\n{} feature '{}' is required but not described",
            "Warning:".yellow().bold(),
            feature.name()
        );
    }
    println!();
}

fn print_report(program: &str, report: &RunReport) {
    println!(
        "\n{} {}",
        "Dry run:".blue().bold(),
        program.white().bold()
    );
    for record in &report.records {
        match &record.outcome {
            TaskOutcome::Passed => println!(
                "  {} {} {}",
                "✓".green(),
                record.task_id,
                format!("(worker {})", record.worker).dimmed()
            ),
            TaskOutcome::Failed { error } => {
                println!("  {} {}: {}", "✗".red(), record.task_id, error)
            }
        }
    }
    println!(
        "\n{} passed, {} failed\n",
        report.passed().to_string().green().bold(),
        report.failed().to_string().red().bold()
    );
}
