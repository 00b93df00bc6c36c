//! Planner command-line probe.
//!
//! # Responsibility
//! - Verify `planner_core` linkage (`ping`, `version`).
//! - Print a read-only text dashboard of a planner data file.

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use planner_core::{
    sip_final_value, status_distribution, subject_progress, DocumentStore, FinancePlan,
    JsonFileStore, SipPlan, DEFAULT_DATA_FILE_NAME,
};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "planner", about = "College planner: finance plans and study tasks")]
struct Cli {
    /// Planner data file (overrides PLANNER_DATA_PATH env var)
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    /// Log level (trace|debug|info|warn|error)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Absolute directory for rolling log files; logging is off when unset
    #[arg(long, global = true)]
    log_dir: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check core linkage
    Ping,
    /// Print core version
    Version,
    /// Print finance plans and subject progress
    Show,
    /// Project a SIP without saving it
    Sip {
        /// Monthly contribution, non-negative
        #[arg(long)]
        amount: f64,
        /// Expected annual return in percent (0-20)
        #[arg(long)]
        rate: f64,
        /// Duration in years (1-50)
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=50))]
        years: u32,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Some(log_dir) = cli.log_dir.as_deref() {
        let level = cli
            .log_level
            .as_deref()
            .unwrap_or_else(|| planner_core::default_log_level());
        if let Err(err) = planner_core::init_logging(level, log_dir) {
            bail!("failed to initialize logging: {err}");
        }
    }

    match cli.command {
        Commands::Ping => println!("planner_core ping={}", planner_core::ping()),
        Commands::Version => println!("planner_core version={}", planner_core::core_version()),
        Commands::Show => show(&resolve_data_path(cli.data))?,
        Commands::Sip {
            amount,
            rate,
            years,
        } => {
            SipPlan::check_inputs(amount, rate, years).context("invalid SIP input")?;
            println!(
                "Projected SIP value after {years} years: {:.2}",
                sip_final_value(amount, rate, years)
            );
        }
    }
    Ok(())
}

fn resolve_data_path(flag: Option<PathBuf>) -> PathBuf {
    flag.or_else(|| {
        std::env::var("PLANNER_DATA_PATH")
            .ok()
            .map(|raw| raw.trim().to_string())
            .filter(|raw| !raw.is_empty())
            .map(PathBuf::from)
    })
    .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_FILE_NAME))
}

fn show(path: &Path) -> anyhow::Result<()> {
    let store = JsonFileStore::new(path);
    let document = store.load().with_context(|| {
        format!(
            "failed to load planner data from {}",
            store.path().display()
        )
    })?;

    println!("Finance");
    if document.finance.is_empty() {
        println!("  No finance plans yet.");
    }
    for (index, plan) in document.finance.iter().enumerate() {
        println!("  {}. {}", index + 1, plan.label());
        println!("     {}", plan_detail(plan));
    }

    println!();
    println!("Learning");
    if document.learning.is_empty() {
        println!("  No subjects yet.");
    }
    for (subject, tasks) in &document.learning {
        let progress = subject_progress(tasks);
        let distribution = status_distribution(tasks);
        let counts = distribution
            .entries()
            .iter()
            .map(|(status, count)| format!("{} {count}", status.label()))
            .collect::<Vec<_>>()
            .join(", ");
        println!(
            "  {subject}: {:.1}% ({}/{} tasks done) [{counts}]",
            progress.percent, progress.done, progress.total
        );
    }
    Ok(())
}

fn plan_detail(plan: &FinancePlan) -> String {
    match plan {
        FinancePlan::Sip(sip) => format!(
            "{:.2}/month at {:.1}% for {} years -> {:.2}",
            sip.amount,
            sip.rate,
            sip.years,
            sip_final_value(sip.amount, sip.rate, sip.years)
        ),
        FinancePlan::MonthlyBudget(budget) => {
            let categories = budget
                .category_entries()
                .into_iter()
                .map(|(name, amount)| format!("{name} {amount:.2}"))
                .collect::<Vec<_>>();
            if categories.is_empty() {
                format!(
                    "income {:.2}, expenses {:.2}",
                    budget.income, budget.expenses
                )
            } else {
                format!(
                    "income {:.2}, expenses {:.2}, categories: {}",
                    budget.income,
                    budget.expenses,
                    categories.join(", ")
                )
            }
        }
        FinancePlan::SavingsGoal(goal) => format!(
            "progress {:.1}% ({:.0} / {:.0})",
            goal.percent(),
            goal.saved,
            goal.target
        ),
        FinancePlan::StockExperiment(experiment) => format!(
            "{}: invested {:.2}, current {:.2}",
            experiment.stock, experiment.invested, experiment.result
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::Cli;
    use clap::Parser;

    #[test]
    fn sip_years_outside_range_fail_to_parse() {
        for years in ["0", "51", "4294967295"] {
            let parsed = Cli::try_parse_from([
                "planner", "sip", "--amount", "100", "--rate", "8", "--years", years,
            ]);
            assert!(parsed.is_err(), "years={years} should be rejected");
        }
        assert!(Cli::try_parse_from([
            "planner", "sip", "--amount", "100", "--rate", "8", "--years", "50",
        ])
        .is_ok());
    }
}
