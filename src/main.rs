use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use producao_tools::config::{DEFAULT_OUTPUT, DuplicatePolicy, ReportConfig};
use producao_tools::logging::init_tracing;
use producao_tools::{Result, ToolError, sync};
use tracing::info;

fn main() {
    let cli = Cli::parse();
    if let Err(error) = run(cli) {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    init_tracing(&cli.log_level)?;
    match cli.command {
        Command::Report(args) => execute_report(args),
        Command::Config(args) => print_config(args),
    }
}

fn execute_report(args: ReportArgs) -> Result<()> {
    if !args.dir.exists() {
        return Err(ToolError::MissingInput(args.dir));
    }

    let config = args.overrides.resolve()?;
    info!(
        dir = %args.dir.display(),
        output = %args.output.display(),
        period = %config.period_label,
        sheet = %config.sheet_name,
        "starting report"
    );
    sync::directory_to_report(&args.dir, &args.output, &config)?;
    info!("Pronto.");
    Ok(())
}

fn print_config(args: ConfigArgs) -> Result<()> {
    let config = args.overrides.resolve()?;
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Consolidate research group productivity workbooks into a single report."
)]
struct Cli {
    /// Log level used when RUST_LOG is not set (error, warn, info, debug, trace).
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Aggregate every workbook in a directory into the consolidated report.
    Report(ReportArgs),
    /// Print the effective configuration as JSON.
    Config(ConfigArgs),
}

#[derive(clap::Args)]
struct ReportArgs {
    /// Directory searched recursively for group workbooks.
    #[arg(long, short = 'd', default_value = ".")]
    dir: PathBuf,

    /// Report file to write.
    #[arg(long, short = 's', default_value = DEFAULT_OUTPUT)]
    output: PathBuf,

    #[command(flatten)]
    overrides: ConfigOverrides,
}

#[derive(clap::Args)]
struct ConfigArgs {
    #[command(flatten)]
    overrides: ConfigOverrides,
}

#[derive(clap::Args)]
struct ConfigOverrides {
    /// JSON configuration file; omitted fields keep their defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Header label of the period to report, e.g. 2018/2019.
    #[arg(long, short = 'a')]
    period: Option<String>,

    /// Sheet read from every workbook.
    #[arg(long)]
    sheet: Option<String>,

    /// Row holding the period labels.
    #[arg(long)]
    header_row: Option<u32>,

    /// Exclusive upper bound of the header column search.
    #[arg(long)]
    max_columns: Option<u32>,

    /// Handling of workbooks that map to the same group.
    #[arg(long, value_enum)]
    duplicates: Option<DuplicateMode>,
}

impl ConfigOverrides {
    fn resolve(&self) -> Result<ReportConfig> {
        let mut config = match &self.config {
            Some(path) => {
                if !path.exists() {
                    return Err(ToolError::MissingInput(path.clone()));
                }
                ReportConfig::load(path)?
            }
            None => ReportConfig::default(),
        };

        if let Some(period) = &self.period {
            config.period_label = period.clone();
        }
        if let Some(sheet) = &self.sheet {
            config.sheet_name = sheet.clone();
        }
        if let Some(row) = self.header_row {
            config.header_row = row;
        }
        if let Some(bound) = self.max_columns {
            config.max_columns = bound;
        }
        if let Some(mode) = self.duplicates {
            config.duplicate_groups = mode.into();
        }
        Ok(config)
    }
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum DuplicateMode {
    Overwrite,
    Reject,
    Merge,
}

impl From<DuplicateMode> for DuplicatePolicy {
    fn from(mode: DuplicateMode) -> Self {
        match mode {
            DuplicateMode::Overwrite => DuplicatePolicy::Overwrite,
            DuplicateMode::Reject => DuplicatePolicy::Reject,
            DuplicateMode::Merge => DuplicatePolicy::Merge,
        }
    }
}
