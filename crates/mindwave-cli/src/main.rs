use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "mindwave-cli", version, about = "MindWave mini-games CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a mini-game
    Game {
        #[command(subcommand)]
        action: commands::game::GameAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn main() {
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Game { action } => commands::game::run(action),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
