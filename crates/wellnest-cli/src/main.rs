use clap::{CommandFactory, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "wellnest", version, about = "Wellnest CLI")]
struct Cli {
    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 4-7-8 breathing exercise
    Breathe {
        #[command(subcommand)]
        action: commands::breathe::BreatheAction,
    },
    /// Guided stretch routine
    Stretch {
        #[command(subcommand)]
        action: commands::stretch::StretchAction,
    },
    /// Step a persisted sequencer by hand
    Session {
        #[command(subcommand)]
        action: commands::session::SessionAction,
    },
    /// Water intake
    Water {
        #[command(subcommand)]
        action: commands::water::WaterAction,
    },
    /// Sleep log
    Sleep {
        #[command(subcommand)]
        action: commands::sleep::SleepAction,
    },
    /// Weight log and goal
    Weight {
        #[command(subcommand)]
        action: commands::weight::WeightAction,
    },
    /// Daily mood
    Mood {
        #[command(subcommand)]
        action: commands::mood::MoodAction,
    },
    /// Journal entries
    Journal {
        #[command(subcommand)]
        action: commands::journal::JournalAction,
    },
    /// Meals and calorie budget
    Meals {
        #[command(subcommand)]
        action: commands::meals::MealsAction,
    },
    /// Fitness plan and timed workouts
    Fitness {
        #[command(subcommand)]
        action: commands::fitness::FitnessAction,
    },
    /// Today at a glance
    Dashboard,
    /// Session statistics
    Stats {
        #[command(subcommand)]
        action: commands::stats::StatsAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Print shell completions
    Completions {
        shell: clap_complete::Shell,
    },
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env("WELLNEST_LOG").unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Breathe { action } => commands::breathe::run(action),
        Commands::Stretch { action } => commands::stretch::run(action),
        Commands::Session { action } => commands::session::run(action),
        Commands::Water { action } => commands::water::run(action),
        Commands::Sleep { action } => commands::sleep::run(action),
        Commands::Weight { action } => commands::weight::run(action),
        Commands::Mood { action } => commands::mood::run(action),
        Commands::Journal { action } => commands::journal::run(action),
        Commands::Meals { action } => commands::meals::run(action),
        Commands::Fitness { action } => commands::fitness::run(action),
        Commands::Dashboard => commands::dashboard::run(),
        Commands::Stats { action } => commands::stats::run(action),
        Commands::Config { action } => commands::config::run(action),
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "wellnest", &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
