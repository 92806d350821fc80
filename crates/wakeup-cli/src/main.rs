use clap::{Parser, Subcommand};

mod commands;
mod logging;
mod source;

#[derive(Parser)]
#[command(name = "wakeup-cli", version, about = "Wake-up challenge CLI")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate the check-in window for a wake-up time
    Window(commands::window::WindowArgs),
    /// Show whether a challenge date can still be cancelled (no request is sent)
    Cancel(commands::cancel::CancelArgs),
    /// Dashboard view: today's challenge, next upcoming, pending count
    Today(commands::today::TodayArgs),
    /// Live countdown for today's challenge
    Watch(commands::watch::WatchArgs),
    /// Resolved challenges, most recent first
    History(commands::history::HistoryArgs),
    /// Pending challenges from today on
    Upcoming(commands::upcoming::UpcomingArgs),
    /// Month calendar with each day's challenges
    Calendar(commands::calendar::CalendarArgs),
    /// Challenge statistics
    Stats(commands::stats::StatsArgs),
    /// Challenge lookups and writes: show, cancel, verify, can-create
    Challenge {
        #[command(subcommand)]
        action: commands::challenge::ChallengeAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let result = match cli.command {
        Commands::Window(args) => commands::window::run(args),
        Commands::Cancel(args) => commands::cancel::run(args),
        Commands::Today(args) => commands::today::run(args),
        Commands::Watch(args) => commands::watch::run(args),
        Commands::History(args) => commands::history::run(args),
        Commands::Upcoming(args) => commands::upcoming::run(args),
        Commands::Calendar(args) => commands::calendar::run(args),
        Commands::Stats(args) => commands::stats::run(args),
        Commands::Challenge { action } => commands::challenge::run(action),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
