use anyhow::Result;
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use colored::*;
use std::path::PathBuf;
use std::process::ExitCode;
use tabled::{Table, Tabled};
use tracing::{error, warn, Level};

use liftrs::config::AppConfig;
use liftrs::error::LiftRsError;
use liftrs::estimation::{self, OneRmFormula};
use liftrs::fatigue::{FatigueAnalyzer, FatigueInput, OvertrainingIndicator, RiskLevel};
use liftrs::import::{load_training_log, TrainingLog};
use liftrs::logging::{init_logging, LogLevel};
use liftrs::models::{OneRmSource, SetEntry};
use liftrs::progression::{ProgressionAnalyzer, Recommendation, RecommendationAction};
use liftrs::records;

/// LiftRS - Strength Progression CLI
///
/// Estimates one-rep maxes, recommends progression steps and scores
/// overtraining risk from logged sets.
#[derive(Parser)]
#[command(name = "liftrs")]
#[command(author = "LiftRS Contributors")]
#[command(version)]
#[command(about = "Strength progression CLI", long_about = None)]
struct Cli {
    /// Sets a custom config file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Increase verbosity of output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Estimate a one-rep max from a single set
    Estimate {
        /// Weight lifted in kg (added load for bodyweight exercises)
        #[arg(short, long)]
        weight: f64,

        /// Repetitions performed
        #[arg(short, long)]
        reps: u32,

        /// Treat the exercise as a bodyweight movement
        #[arg(short, long)]
        bodyweight: bool,

        /// Athlete bodyweight in kg
        #[arg(short, long)]
        athlete_weight: Option<f64>,
    },

    /// Show predicted rep maxes for a one-rep max
    Table {
        /// One-rep max in kg
        #[arg(short, long)]
        one_rm: f64,

        /// Highest rep count to show
        #[arg(short, long)]
        max_reps: Option<u32>,
    },

    /// Weight to use for a target rep count and intensity
    Weight {
        /// One-rep max in kg
        #[arg(short, long)]
        one_rm: f64,

        /// Target repetitions
        #[arg(short, long)]
        reps: u32,

        /// Intensity as a percentage of the one-rep max
        #[arg(short, long, default_value = "100")]
        intensity: f64,
    },

    /// Recommend a one-rep-max change from a training log
    Recommend {
        /// Training log (CSV or JSON)
        #[arg(short, long)]
        input: PathBuf,

        /// Exercise ID to analyze
        #[arg(short, long)]
        exercise: String,

        /// Number of most recent sessions to analyze
        #[arg(short, long, default_value = "1")]
        sessions: usize,

        /// Current one-rep max, overriding the log
        #[arg(long)]
        one_rm: Option<f64>,

        /// Strength-focus session count, overriding the log
        #[arg(long)]
        focus_sessions: Option<u32>,

        /// Athlete bodyweight in kg, overriding the log
        #[arg(short, long)]
        athlete_weight: Option<f64>,
    },

    /// Score overtraining risk
    Fatigue {
        /// Training log (CSV or JSON)
        #[arg(short, long, conflicts_with = "volumes")]
        input: Option<PathBuf>,

        /// Weeks of history to consider
        #[arg(short, long)]
        weeks: Option<usize>,

        /// Last day of the window (YYYY-MM-DD, default today)
        #[arg(long)]
        as_of: Option<String>,

        /// Weekly volumes, oldest first
        #[arg(long, value_delimiter = ',')]
        volumes: Option<Vec<f64>>,

        /// Recent mean intensity (0-10)
        #[arg(long)]
        intensity: Option<f64>,

        /// Baseline intensity (0-10)
        #[arg(long)]
        baseline: Option<f64>,

        /// Sessions in the current week
        #[arg(long, default_value = "0")]
        sessions_per_week: f64,
    },
}

#[derive(Tabled)]
struct FormulaRow {
    #[tabled(rename = "Formula")]
    formula: String,
    #[tabled(rename = "1RM (kg)")]
    one_rm: String,
}

#[derive(Tabled)]
struct RepMaxRow {
    #[tabled(rename = "Reps")]
    reps: u32,
    #[tabled(rename = "Weight (kg)")]
    weight: String,
    #[tabled(rename = "% 1RM")]
    percent: String,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report_error(&err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => AppConfig::load_from_file(path)
            .map_err(|err| LiftRsError::Configuration(format!("{:#}", err)))?,
        None => AppConfig::load_or_default(),
    };

    let mut log_config = config.logging.clone();
    log_config.level = LogLevel::from_verbosity(log_config.level, cli.verbose);
    init_logging(&log_config)?;

    match cli.command {
        Commands::Estimate {
            weight,
            reps,
            bodyweight,
            athlete_weight,
        } => {
            let athlete_weight = athlete_weight.or(config.defaults.athlete_weight_kg);
            let load = estimation::get_effective_load(weight, bodyweight, athlete_weight);
            let estimate = estimation::estimate_all(load, reps);

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&estimate)?);
                return Ok(());
            }

            println!("{}", "Estimating one-rep max...".green().bold());
            println!("  Load: {:.1} kg x {} reps", load, reps);
            if reps > estimation::MAX_ESTIMATION_REPS {
                println!(
                    "{}",
                    format!(
                        "  Sets above {} reps are excluded from progression analysis",
                        estimation::MAX_ESTIMATION_REPS
                    )
                    .yellow()
                );
            }
            let rows: Vec<FormulaRow> = OneRmFormula::all()
                .iter()
                .map(|formula| FormulaRow {
                    formula: formula.to_string(),
                    one_rm: format!("{:.1}", formula.estimate(load, reps)),
                })
                .collect();
            println!("{}", Table::new(rows));
        }

        Commands::Table { one_rm, max_reps } => {
            let max_reps = max_reps.unwrap_or(config.defaults.table_max_reps);
            let table = estimation::rep_max_table(one_rm, max_reps);

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&table)?);
                return Ok(());
            }

            println!("{}", format!("Rep maxes for a {:.1} kg 1RM", one_rm).cyan().bold());
            let rows: Vec<RepMaxRow> = table
                .iter()
                .map(|(reps, weight)| RepMaxRow {
                    reps: *reps,
                    weight: format!("{:.1}", weight),
                    percent: if one_rm > 0.0 {
                        format!("{:.0}%", weight / one_rm * 100.0)
                    } else {
                        "-".to_string()
                    },
                })
                .collect();
            println!("{}", Table::new(rows));
        }

        Commands::Weight {
            one_rm,
            reps,
            intensity,
        } => {
            let weight = estimation::calculate_weight_for_reps(one_rm, reps, intensity);

            if cli.json {
                println!("{}", serde_json::json!({ "weight": weight }));
                return Ok(());
            }

            println!(
                "{} {:.1} kg x {} reps at {:.0}% of {:.1} kg",
                "Suggested load:".blue().bold(),
                weight,
                reps,
                intensity,
                one_rm
            );
        }

        Commands::Recommend {
            input,
            exercise,
            sessions,
            one_rm,
            focus_sessions,
            athlete_weight,
        } => {
            let mut log = load_training_log(&input)?;
            let athlete_weight = athlete_weight.or(config.defaults.athlete_weight_kg);
            prepare_log(&mut log, &exercise, one_rm, focus_sessions, athlete_weight);

            let recent = log.sessions_for(&exercise);
            if recent.is_empty() {
                return Err(LiftRsError::Validation(format!(
                    "No sessions found for exercise '{}'",
                    exercise
                ))
                .into());
            }
            let sets: Vec<SetEntry> = recent
                .iter()
                .rev()
                .take(sessions.max(1))
                .flat_map(|s| s.sets.iter().cloned())
                .collect();

            let analyzer = ProgressionAnalyzer::with_config(config.progression.clone());
            let recommendation =
                analyzer.analyze(&log.athlete, &exercise, log.exercise(&exercise), &sets);

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&recommendation)?);
            } else {
                print_recommendation(&recommendation);
            }
        }

        Commands::Fatigue {
            input,
            weeks,
            as_of,
            volumes,
            intensity,
            baseline,
            sessions_per_week,
        } => {
            let fatigue_input = match (input, volumes) {
                (Some(path), _) => {
                    let log = load_training_log(&path)?;
                    let as_of = match as_of {
                        Some(date) => NaiveDate::parse_from_str(&date, "%Y-%m-%d").map_err(|_| {
                            LiftRsError::Validation(format!(
                                "Invalid --as-of date '{}', expected YYYY-MM-DD",
                                date
                            ))
                        })?,
                        None => Local::now().date_naive(),
                    };
                    let weeks = weeks.unwrap_or(config.defaults.fatigue_weeks);
                    FatigueInput::from_sessions(&log.sessions, as_of, weeks)
                }
                (None, Some(volumes)) => FatigueInput {
                    weekly_volumes: volumes,
                    recent_intensity: intensity,
                    average_intensity: baseline,
                    sessions_per_week,
                },
                (None, None) => {
                    return Err(LiftRsError::Validation(
                        "Provide either --input or --volumes".to_string(),
                    )
                    .into())
                }
            };

            let indicator = FatigueAnalyzer::with_config(config.fatigue.clone()).assess(&fatigue_input);

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&indicator)?);
            } else {
                print_indicator(&indicator);
            }
        }
    }

    Ok(())
}

/// Print a failed command, using the friendlier message for LiftRS errors
fn report_error(err: &anyhow::Error) {
    let Some(lift_err) = err.downcast_ref::<LiftRsError>() else {
        error!(error = %err, "Command failed");
        eprintln!("{} {:#}", "Error:".red().bold(), err);
        return;
    };

    let message = lift_err.user_message();
    if lift_err.severity().to_tracing_level() == Level::WARN {
        warn!(error = %lift_err, "Command rejected");
    } else {
        error!(error = %lift_err, "Command failed");
    }
    eprintln!("{} {}", "Error:".red().bold(), message);
}

/// Apply command line overrides to an imported log
fn prepare_log(
    log: &mut TrainingLog,
    exercise: &str,
    one_rm: Option<f64>,
    focus_sessions: Option<u32>,
    athlete_weight: Option<f64>,
) {
    if athlete_weight.is_some() {
        log.athlete.current_weight_kg = athlete_weight;
    }

    if let Some(value) = one_rm {
        let existing = log.athlete.one_rm_records.get(exercise).cloned();
        let mut record = match existing {
            Some(record) => records::update_one_rm_record(&record, value, OneRmSource::Manual, None),
            None => {
                let mut record = records::create_one_rm_record(exercise, value, OneRmSource::Manual, None);
                let focused = log
                    .sessions_for(exercise)
                    .iter()
                    .filter(|s| s.strength_focus)
                    .count();
                for _ in 0..focused {
                    record = records::record_strength_focus_session(&record);
                }
                record
            }
        };
        if let Some(count) = focus_sessions {
            record.strength_focus_sessions = count;
        }
        log.athlete.one_rm_records.insert(exercise.to_string(), record);
    } else if let Some(count) = focus_sessions {
        if let Some(record) = log.athlete.one_rm_records.get_mut(exercise) {
            record.strength_focus_sessions = count;
        }
    }
}

fn print_recommendation(recommendation: &Recommendation) {
    let action = recommendation.action.to_string();
    let action = match recommendation.action {
        RecommendationAction::Increase => action.green().bold(),
        RecommendationAction::Decrease => action.red().bold(),
        RecommendationAction::SetInitial => action.cyan().bold(),
        RecommendationAction::Keep => action.white().bold(),
    };

    println!("{}", format!("Recommendation for {}", recommendation.exercise_id).bold());
    println!("  Action:     {}", action);
    match recommendation.current_one_rm {
        Some(current) => println!(
            "  1RM:        {:.1} kg -> {:.1} kg",
            current, recommendation.suggested_one_rm
        ),
        None => println!("  1RM:        {:.1} kg", recommendation.suggested_one_rm),
    }
    println!("  Confidence: {:.0}%", recommendation.confidence * 100.0);
    println!("  Sets:       {}", recommendation.based_on_sets);
    println!("  {}", recommendation.rationale.dimmed());
}

fn print_indicator(indicator: &OvertrainingIndicator) {
    let level = indicator.level.to_string().to_uppercase();
    let level = match indicator.level {
        RiskLevel::Low => level.green().bold(),
        RiskLevel::Moderate => level.yellow().bold(),
        RiskLevel::High => level.magenta().bold(),
        RiskLevel::Critical => level.red().bold(),
    };

    println!("{} {} ({:.0}/100)", "Overtraining risk:".bold(), level, indicator.score);
    for factor in &indicator.factors {
        println!("  - {}", factor);
    }
    println!("  {}", indicator.recommendation.dimmed());
}
