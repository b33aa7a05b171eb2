mod commands;
mod registry;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use lendcheck_core::CoreError;
use lendcheck_prep::{MissingStrategy, PrepError};
use lendcheck_validate::ValidationError;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
enum CliError {
    #[error("registry error: {0}")]
    Registry(#[from] registry::RegistryError),
    #[error("core error: {0}")]
    Core(#[from] CoreError),
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),
    #[error("preprocessing error: {0}")]
    Prep(#[from] PrepError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "lendcheck", version, about = "Loan dataset validation and preparation")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate a raw loan CSV and record a run report.
    Validate(ValidateArgs),
    /// Validate, then write seeded train/test partitions.
    Split(SplitArgs),
    /// Fill missing values and add derived loan features.
    Clean(CleanArgs),
    /// Fit the preprocessor on the training split and scale both splits.
    Preprocess(PreprocessArgs),
    /// Print the JSON Schema of the validation config.
    ConfigSchema,
}

#[derive(Args, Debug, Serialize)]
struct ValidateArgs {
    /// Raw loan CSV.
    #[arg(long, value_name = "CSV")]
    data: PathBuf,
    /// Validation config (TOML); defaults to the built-in loan schema.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Output directory for runs.
    #[arg(long, default_value = "runs")]
    run_dir: PathBuf,
}

#[derive(Args, Debug, Serialize)]
struct SplitArgs {
    /// Raw loan CSV.
    #[arg(long, value_name = "CSV")]
    data_from: PathBuf,
    /// Directory for loan_train.csv and loan_test.csv.
    #[arg(long, value_name = "DIR")]
    data_to: PathBuf,
    /// Validation config (TOML); defaults to the built-in loan schema.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Output directory for runs.
    #[arg(long, default_value = "runs")]
    run_dir: PathBuf,
}

#[derive(Args, Debug, Serialize)]
struct CleanArgs {
    /// Loan CSV to clean.
    #[arg(long, value_name = "CSV")]
    data_from: PathBuf,
    /// Directory for loan_clean.csv.
    #[arg(long, value_name = "DIR")]
    data_to: PathBuf,
    /// How missing values are handled.
    #[arg(long, value_enum, default_value_t = StrategyArg::Mean)]
    strategy: StrategyArg,
    /// Output directory for runs.
    #[arg(long, default_value = "runs")]
    run_dir: PathBuf,
}

#[derive(Args, Debug, Serialize)]
struct PreprocessArgs {
    /// Directory holding loan_train.csv and loan_test.csv.
    #[arg(long, value_name = "DIR")]
    data_from: PathBuf,
    /// Directory for the scaled CSVs.
    #[arg(long, value_name = "DIR")]
    data_to: PathBuf,
    /// Directory for preprocessor.json.
    #[arg(long, value_name = "DIR")]
    preprocessor_to: PathBuf,
    /// Output directory for runs.
    #[arg(long, default_value = "runs")]
    run_dir: PathBuf,
}

#[derive(Debug, Clone, Copy, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
enum StrategyArg {
    Mean,
    Median,
    Drop,
}

impl From<StrategyArg> for MissingStrategy {
    fn from(value: StrategyArg) -> Self {
        match value {
            StrategyArg::Mean => MissingStrategy::Mean,
            StrategyArg::Median => MissingStrategy::Median,
            StrategyArg::Drop => MissingStrategy::Drop,
        }
    }
}

fn main() -> Result<(), CliError> {
    let cli = Cli::parse();

    match cli.command {
        Command::Validate(args) => commands::run_validate(args),
        Command::Split(args) => commands::run_split(args),
        Command::Clean(args) => commands::run_clean(args),
        Command::Preprocess(args) => commands::run_preprocess(args),
        Command::ConfigSchema => commands::print_config_schema(),
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn split_flags_use_kebab_case() {
        let cli = Cli::try_parse_from([
            "lendcheck",
            "split",
            "--data-from",
            "data/raw/loan.csv",
            "--data-to",
            "data/processed",
        ])
        .expect("parse");
        match cli.command {
            Command::Split(args) => {
                assert_eq!(args.data_to, PathBuf::from("data/processed"));
                assert_eq!(args.run_dir, PathBuf::from("runs"));
                assert!(args.config.is_none());
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn clean_strategy_defaults_to_mean() {
        let cli = Cli::try_parse_from([
            "lendcheck",
            "clean",
            "--data-from",
            "a.csv",
            "--data-to",
            "out",
        ])
        .expect("parse");
        match cli.command {
            Command::Clean(args) => {
                assert_eq!(MissingStrategy::from(args.strategy), MissingStrategy::Mean)
            }
            other => panic!("unexpected command {other:?}"),
        }

        assert!(
            Cli::try_parse_from([
                "lendcheck",
                "clean",
                "--data-from",
                "a.csv",
                "--data-to",
                "out",
                "--strategy",
                "mode",
            ])
            .is_err()
        );
    }
}
