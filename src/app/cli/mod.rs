//! CLI Adapter.

mod output;

use std::io::ErrorKind;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use dialoguer::{Error as DialoguerError, Input};

use crate::app::api::{self, AskOutcome, RefinementMode, RefinementStatus, Settings};
use crate::domain::AppError;

/// Exit code for a run that ended without a confirmed query.
const EXIT_UNCONFIRMED: i32 = 2;

#[derive(Parser)]
#[command(name = "nlsql")]
#[command(version)]
#[command(
    about = "Turn natural-language questions into SQL and refine the query with an LLM",
    long_about = None
)]
struct Cli {
    /// Configuration file (defaults to ./nlsql.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Database schema document (JSON or YAML)
    #[arg(long, global = true, default_value = "schema.json")]
    schema: PathBuf,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a query for a question and refine it
    #[clap(visible_alias = "a")]
    Ask {
        /// Question in plain language
        question: String,
        /// Execute each candidate and refine on database errors
        #[arg(short = 'x', long)]
        execute: bool,
        /// SQLite database file (overrides [database].path)
        #[arg(long)]
        database: Option<PathBuf>,
        /// Answer to give if the model asks a clarifying question
        #[arg(long)]
        answer: Option<String>,
        /// Session file carrying the last question and query between runs
        #[arg(long)]
        session: Option<PathBuf>,
    },
    /// Generate a first query without refinement
    #[clap(visible_alias = "g")]
    Generate {
        /// Question in plain language
        question: String,
    },
    /// Refine an existing query
    #[clap(visible_alias = "r")]
    Refine {
        /// Query to refine (defaults to the session's last query)
        query: Option<String>,
        /// Extra requirement the refined query must satisfy
        #[arg(short, long)]
        requirement: Option<String>,
        /// Execute each candidate and refine on database errors
        #[arg(short = 'x', long)]
        execute: bool,
        /// SQLite database file (overrides [database].path)
        #[arg(long)]
        database: Option<PathBuf>,
        /// Session file carrying the last question and query between runs
        #[arg(long)]
        session: Option<PathBuf>,
    },
    /// Execute a query once and print the rows
    Exec {
        /// SQL query
        query: String,
        /// SQLite database file (overrides [database].path)
        #[arg(long)]
        database: Option<PathBuf>,
    },
    /// Print the initial prompt without calling the model
    Prompt {
        /// Question in plain language
        question: String,
    },
}

/// Entry point for the CLI.
pub fn run() {
    let cli = Cli::parse();
    let mut settings = Settings::new(cli.schema);
    settings.config = cli.config;

    let result: Result<i32, AppError> = match cli.command {
        Commands::Ask { question, execute, database, answer, session } => {
            settings.database = database;
            settings.session = session;
            run_ask(&settings, &question, mode_for(execute), answer)
        }
        Commands::Generate { question } => run_generate(&settings, &question).map(|_| 0),
        Commands::Refine { query, requirement, execute, database, session } => {
            settings.database = database;
            settings.session = session;
            run_refine(&settings, query.as_deref(), requirement.as_deref(), mode_for(execute))
        }
        Commands::Exec { query, database } => {
            settings.database = database;
            run_exec(&settings, &query).map(|_| 0)
        }
        Commands::Prompt { question } => {
            api::prompt_preview(&settings, &question).map(|prompt| {
                println!("{}", prompt);
                0
            })
        }
    };

    match result {
        Ok(exit_code) => {
            if exit_code != 0 {
                std::process::exit(exit_code);
            }
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

fn mode_for(execute: bool) -> RefinementMode {
    if execute { RefinementMode::WithExecution } else { RefinementMode::SyntaxOnly }
}

fn run_ask(
    settings: &Settings,
    question: &str,
    mode: RefinementMode,
    answer: Option<String>,
) -> Result<i32, AppError> {
    let mut result = api::ask(settings, question, mode)?;

    if let RefinementStatus::NeedsClarification { question: asked } = &result.outcome.status {
        println!("🤔 {}", asked);
        let answer = match answer {
            Some(answer) => answer,
            None => match prompt_answer()? {
                Some(answer) => answer,
                None => return Ok(EXIT_UNCONFIRMED),
            },
        };
        result = api::clarify(settings, question, &answer, mode)?;
    }

    Ok(report_ask(&result))
}

fn prompt_answer() -> Result<Option<String>, AppError> {
    match Input::<String>::new().with_prompt("Your answer").interact_text() {
        Ok(value) => Ok(Some(value)),
        Err(DialoguerError::IO(err)) if err.kind() == ErrorKind::Interrupted => Ok(None),
        Err(err) => Err(AppError::Validation(format!("Failed to read answer: {}", err))),
    }
}

fn report_ask(result: &AskOutcome) -> i32 {
    if let Some(initial) = &result.initial_query
        && *initial != result.outcome.final_query
    {
        tracing::debug!(initial = %initial, "initial candidate replaced during refinement");
    }
    output::print_outcome(&result.outcome);
    exit_code_for(&result.outcome.status)
}

fn run_generate(settings: &Settings, question: &str) -> Result<(), AppError> {
    let query = api::generate(settings, question)?;
    println!("{}", query);
    Ok(())
}

fn run_refine(
    settings: &Settings,
    query: Option<&str>,
    requirement: Option<&str>,
    mode: RefinementMode,
) -> Result<i32, AppError> {
    let outcome = api::refine(settings, query, requirement, mode)?;
    output::print_outcome(&outcome);
    Ok(exit_code_for(&outcome.status))
}

fn run_exec(settings: &Settings, query: &str) -> Result<(), AppError> {
    match api::execute(settings, query)? {
        api::ExecutionResult::Success(rows) => {
            output::print_rows(&rows);
            Ok(())
        }
        api::ExecutionResult::Failure(message) => {
            Err(AppError::Validation(format!("Query failed: {}", message)))
        }
    }
}

fn exit_code_for(status: &RefinementStatus) -> i32 {
    match status {
        RefinementStatus::Succeeded => 0,
        _ => EXIT_UNCONFIRMED,
    }
}
