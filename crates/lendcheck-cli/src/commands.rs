use std::fs::create_dir_all;
use std::path::Path;
use std::time::Instant;

use lendcheck_core::{CsvWriteSummary, Table, ValidationConfig, read_table, write_csv};
use lendcheck_prep::{
    ANNUAL_INCOME_COLUMN, MissingStrategy, Preprocessor, add_annual_income, add_loan_categories,
    add_loan_income_ratio, add_risk_categories, handle_missing_values,
};
use lendcheck_validate::{
    SchemaReport, ValidationError, ValidationSummary, Validator, render_report, train_test_split,
};
use serde::Serialize;

use crate::registry::{
    DatasetInfo, RunContext, RunPaths, init_run_logging, start_run, write_report, write_summary,
};
use crate::{CleanArgs, CliError, PreprocessArgs, SplitArgs, ValidateArgs};

const TRAIN_FILE: &str = "loan_train.csv";
const TEST_FILE: &str = "loan_test.csv";
const CLEAN_FILE: &str = "loan_clean.csv";
const SCALED_TRAIN_FILE: &str = "scaled_loan_train.csv";
const SCALED_TEST_FILE: &str = "scaled_loan_test.csv";
const PREPROCESSOR_FILE: &str = "preprocessor.json";

const FICO_COLUMN: &str = "fico";
const INSTALLMENT_COLUMN: &str = "installment";
const LOG_INCOME_COLUMN: &str = "log.annual.inc";

/// `summary.json` of the validating commands.
#[derive(Debug, Serialize)]
struct ValidationRecord<'a> {
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<&'a ValidationSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    schema: Option<&'a SchemaReport>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    outputs: Vec<CsvWriteSummary>,
}

impl<'a> ValidationRecord<'a> {
    fn new(outcome: &'a Result<ValidationSummary, ValidationError>) -> Self {
        match outcome {
            Ok(summary) => Self {
                status: "passed",
                summary: Some(summary),
                error: None,
                schema: None,
                outputs: Vec::new(),
            },
            Err(err) => Self {
                status: err.code(),
                summary: None,
                error: Some(err.to_string()),
                schema: err.schema_report(),
                outputs: Vec::new(),
            },
        }
    }
}

#[derive(Debug, Serialize)]
struct CleanRecord<'a> {
    strategy: &'static str,
    rows_in: usize,
    rows_out: usize,
    columns: Vec<&'a str>,
    output: CsvWriteSummary,
}

#[derive(Debug, Serialize)]
struct PreprocessRecord {
    features: Vec<String>,
    preprocessor: String,
    outputs: Vec<CsvWriteSummary>,
}

pub fn run_validate(args: ValidateArgs) -> Result<(), CliError> {
    let config = load_config(args.config.as_deref())?;
    let table = read_table(&args.data)?;
    let paths = open_run(
        "validate",
        &args.run_dir,
        &args,
        Some(DatasetInfo::describe(&args.data, &table)),
    )?;
    let timer = Instant::now();

    let result = validate_stage(&table, &config, &args.data, &paths);
    finish(result, timer)
}

fn validate_stage(
    table: &Table,
    config: &ValidationConfig,
    data: &Path,
    paths: &RunPaths,
) -> Result<(), CliError> {
    let outcome = check_dataset(table, config, data, paths)?;
    write_summary(paths, &ValidationRecord::new(&outcome))?;
    outcome?;
    Ok(())
}

pub fn run_split(args: SplitArgs) -> Result<(), CliError> {
    let config = load_config(args.config.as_deref())?;
    let table = read_table(&args.data_from)?;
    let paths = open_run(
        "split",
        &args.run_dir,
        &args,
        Some(DatasetInfo::describe(&args.data_from, &table)),
    )?;
    let timer = Instant::now();

    let result = split_stage(&table, &config, &args, &paths);
    finish(result, timer)
}

fn split_stage(
    table: &Table,
    config: &ValidationConfig,
    args: &SplitArgs,
    paths: &RunPaths,
) -> Result<(), CliError> {
    let outcome = check_dataset(table, config, &args.data_from, paths)?;
    let mut record = ValidationRecord::new(&outcome);

    if outcome.is_ok() {
        create_dir_all(&args.data_to)?;
        let split = train_test_split(table, &config.split);
        record
            .outputs
            .push(write_output(&split.train, &args.data_to, TRAIN_FILE)?);
        record
            .outputs
            .push(write_output(&split.test, &args.data_to, TEST_FILE)?);
    }

    write_summary(paths, &record)?;
    outcome?;
    Ok(())
}

pub fn run_clean(args: CleanArgs) -> Result<(), CliError> {
    let table = read_table(&args.data_from)?;
    let paths = open_run(
        "clean",
        &args.run_dir,
        &args,
        Some(DatasetInfo::describe(&args.data_from, &table)),
    )?;
    let timer = Instant::now();

    let result = clean_stage(&table, &args, &paths);
    finish(result, timer)
}

fn clean_stage(table: &Table, args: &CleanArgs, paths: &RunPaths) -> Result<(), CliError> {
    let strategy = MissingStrategy::from(args.strategy);
    let mut cleaned = handle_missing_values(table, strategy, None)?;
    add_loan_categories(&mut cleaned, FICO_COLUMN)?;
    add_risk_categories(&mut cleaned, FICO_COLUMN)?;
    add_annual_income(&mut cleaned, LOG_INCOME_COLUMN)?;
    add_loan_income_ratio(&mut cleaned, INSTALLMENT_COLUMN, ANNUAL_INCOME_COLUMN)?;
    tracing::info!(
        event = "features_added",
        strategy = strategy.as_str(),
        rows_in = table.n_rows(),
        rows_out = cleaned.n_rows(),
        columns = cleaned.n_cols()
    );

    create_dir_all(&args.data_to)?;
    let output = write_output(&cleaned, &args.data_to, CLEAN_FILE)?;

    let record = CleanRecord {
        strategy: strategy.as_str(),
        rows_in: table.n_rows(),
        rows_out: cleaned.n_rows(),
        columns: cleaned.column_names(),
        output,
    };
    write_summary(paths, &record)?;
    Ok(())
}

pub fn run_preprocess(args: PreprocessArgs) -> Result<(), CliError> {
    let train_path = args.data_from.join(TRAIN_FILE);
    let train = read_table(&train_path)?;
    let test = read_table(&args.data_from.join(TEST_FILE))?;
    let paths = open_run(
        "preprocess",
        &args.run_dir,
        &args,
        Some(DatasetInfo::describe(&train_path, &train)),
    )?;
    let timer = Instant::now();

    let result = preprocess_stage(&train, &test, &args, &paths);
    finish(result, timer)
}

fn preprocess_stage(
    train: &Table,
    test: &Table,
    args: &PreprocessArgs,
    paths: &RunPaths,
) -> Result<(), CliError> {
    let preprocessor = Preprocessor::fit_default(train)?;
    let features = preprocessor.feature_names();
    tracing::info!(event = "preprocessor_fitted", features = features.len());

    let scaled_train = preprocessor.transform(train)?;
    let scaled_test = preprocessor.transform(test)?;

    create_dir_all(&args.preprocessor_to)?;
    let preprocessor_path = args.preprocessor_to.join(PREPROCESSOR_FILE);
    preprocessor.save(&preprocessor_path)?;
    tracing::info!(event = "preprocessor_written", path = %preprocessor_path.display());

    create_dir_all(&args.data_to)?;
    let outputs = vec![
        write_output(&scaled_train, &args.data_to, SCALED_TRAIN_FILE)?,
        write_output(&scaled_test, &args.data_to, SCALED_TEST_FILE)?,
    ];

    let record = PreprocessRecord {
        features,
        preprocessor: preprocessor_path.display().to_string(),
        outputs,
    };
    write_summary(paths, &record)?;
    Ok(())
}

pub fn print_config_schema() -> Result<(), CliError> {
    let schema = ValidationConfig::json_schema();
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<ValidationConfig, CliError> {
    match path {
        Some(path) => Ok(ValidationConfig::load(path)?),
        None => Ok(ValidationConfig::default()),
    }
}

fn open_run<T: Serialize>(
    command: &str,
    run_dir: &Path,
    options: &T,
    dataset: Option<DatasetInfo>,
) -> Result<RunPaths, CliError> {
    let ctx = RunContext::new(
        command,
        run_dir.to_path_buf(),
        serde_json::to_value(options)?,
        dataset,
    );
    let paths = start_run(&ctx)?;
    init_run_logging(&paths.logs_path)?;

    tracing::info!(
        event = "run_started",
        run_id = %ctx.run_id,
        command = %ctx.command,
        run_root = %paths.root.display()
    );
    if let Some(dataset) = &ctx.dataset {
        tracing::info!(
            event = "dataset_loaded",
            path = %dataset.path,
            rows = dataset.rows,
            columns = dataset.columns,
            fingerprint = %dataset.fingerprint
        );
    }
    Ok(paths)
}

/// Run validation and write `report.md`; the outcome is returned, not raised.
fn check_dataset(
    table: &Table,
    config: &ValidationConfig,
    data: &Path,
    paths: &RunPaths,
) -> Result<Result<ValidationSummary, ValidationError>, CliError> {
    let outcome = Validator::new(config.clone()).run(table);
    match &outcome {
        Ok(summary) => tracing::info!(
            event = "validation_finished",
            status = "passed",
            train_rows = summary.train_rows,
            test_rows = summary.test_rows
        ),
        Err(err) => tracing::error!(
            event = "validation_finished",
            status = err.code(),
            error = %err
        ),
    }

    let report = render_report(&outcome, config, &data.display().to_string());
    write_report(paths, &report)?;
    tracing::info!(event = "report_written", path = %paths.report_path.display());

    Ok(outcome)
}

fn write_output(
    table: &Table,
    directory: &Path,
    filename: &str,
) -> Result<CsvWriteSummary, CliError> {
    let summary = write_csv(table, directory, filename, false)?;
    tracing::info!(
        event = "csv_written",
        path = %summary.path.display(),
        rows = summary.rows,
        bytes = summary.bytes
    );
    Ok(summary)
}

fn finish(result: Result<(), CliError>, timer: Instant) -> Result<(), CliError> {
    let duration_ms = timer.elapsed().as_millis();
    match &result {
        Ok(()) => tracing::info!(
            event = "run_finished",
            status = "success",
            duration_ms = duration_ms
        ),
        Err(err) => tracing::error!(
            event = "run_finished",
            status = "failed",
            duration_ms = duration_ms,
            error = %err
        ),
    }
    result
}
