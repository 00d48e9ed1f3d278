use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use envelope_planner::cli::{
    handle_coverage_command, handle_envelope_command, handle_forecast_command,
    handle_income_command, handle_plan_command, handle_status_command, CoverageArgs, EnvelopeArgs,
    ForecastArgs, IncomeCommands, PlanCommands, StatusArgs,
};
use envelope_planner::config::paths::{PlannerPaths, DATA_DIR_ENV};
use envelope_planner::config::settings::Settings;
use envelope_planner::logging::init_tracing;
use envelope_planner::storage::{init::initialize_storage, Storage};

#[derive(Parser)]
#[command(
    name = "envelope-plan",
    version,
    about = "Envelope funding and cash flow planner",
    long_about = "envelope-plan tracks expense plans as virtual envelopes. It tells you \
                  which plans are on track, how much is due in a period, what each \
                  envelope holds, and where your balance is heading month by month."
)]
struct Cli {
    /// Data directory (overrides the default location)
    #[arg(long, global = true, env = DATA_DIR_ENV)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the data directory
    Init,

    /// Show current configuration and paths
    Config,

    /// Expense plan commands
    #[command(subcommand)]
    Plan(PlanCommands),

    /// Funding status of every active plan
    Status(StatusArgs),

    /// Obligations in a period against account balances
    Coverage(CoverageArgs),

    /// A plan's envelope balance for a month
    Envelope(EnvelopeArgs),

    /// Month-by-month cash flow forecast
    Forecast(ForecastArgs),

    /// Income plan commands
    #[command(subcommand)]
    Income(IncomeCommands),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize paths and settings
    let paths = match cli.data_dir {
        Some(dir) => PlannerPaths::with_base_dir(dir),
        None => PlannerPaths::new()?,
    };
    let settings = Settings::load_or_create(&paths)?;
    init_tracing(&settings.log_filter);

    // Initialize storage
    let storage = Storage::new(paths.clone())?;
    storage.load_all()?;

    match cli.command {
        Some(Commands::Init) => {
            println!("Initializing envelope-plan at: {}", paths.base_dir().display());
            let created = initialize_storage(&paths)?;
            settings.save(&paths)?;
            println!("Initialization complete! Created {} data file(s).", created);
            println!();
            println!("Add expense plans to {}", paths.plans_file().display());
            println!("then run 'envelope-plan status' to see how they are funded.");
        }
        Some(Commands::Config) => {
            println!("envelope-plan Configuration");
            println!("===========================");
            println!("Base directory:   {}", paths.base_dir().display());
            println!("Data directory:   {}", paths.data_dir().display());
            println!("Settings file:    {}", paths.settings_file().display());
            println!(
                "Initialized:      {}",
                if paths.is_initialized() { "yes" } else { "no" }
            );
            println!();
            println!("Settings:");
            println!("  Currency symbol:  {}", settings.currency_symbol);
            println!("  Date format:      {}", settings.date_format);
            println!("  Forecast months:  {}", settings.forecast_months);
            println!("  History months:   {}", settings.history_months);
            println!("  Default period:   {}", settings.default_period);
            println!("  Log filter:       {}", settings.log_filter);
        }
        Some(Commands::Plan(cmd)) => handle_plan_command(&storage, &settings, cmd)?,
        Some(Commands::Status(args)) => handle_status_command(&storage, &settings, args)?,
        Some(Commands::Coverage(args)) => handle_coverage_command(&storage, &settings, args)?,
        Some(Commands::Envelope(args)) => handle_envelope_command(&storage, &settings, args)?,
        Some(Commands::Forecast(args)) => handle_forecast_command(&storage, &settings, args)?,
        Some(Commands::Income(cmd)) => handle_income_command(&storage, &settings, cmd)?,
        None => {
            println!("envelope-plan - Envelope funding and cash flow planner");
            println!();
            println!("Run 'envelope-plan --help' for usage information.");
        }
    }

    Ok(())
}
