//! Terminal frontend for the dots engine.
//!
//! - `dots play` - Play in the terminal (pvp, pvc, sandbox, network)
//! - `dots records` - Show the best recorded scores

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use dots_engine::{Difficulty, Mode};

mod net;
mod records;
mod session;

#[derive(Parser)]
#[command(name = "dots")]
#[command(about = "Territory-capture dots game")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ModeArg {
    /// Two players at one keyboard
    Pvp,
    /// Against the computer
    Pvc,
    /// Free placement for either color, no turn order
    Sandbox,
    /// Against a remote peer
    Network,
}

impl From<ModeArg> for Mode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Pvp => Mode::TwoPlayer,
            ModeArg::Pvc => Mode::VsComputer,
            ModeArg::Sandbox => Mode::Sandbox,
            ModeArg::Network => Mode::Network,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum DifficultyArg {
    Weak,
    Strong,
}

impl From<DifficultyArg> for Difficulty {
    fn from(arg: DifficultyArg) -> Self {
        match arg {
            DifficultyArg::Weak => Difficulty::Weak,
            DifficultyArg::Strong => Difficulty::Strong,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Play a game in the terminal
    Play {
        #[arg(long, default_value_t = 20)]
        width: u8,
        #[arg(long, default_value_t = 20)]
        height: u8,
        #[arg(long, value_enum, default_value = "pvp")]
        mode: ModeArg,
        /// Computer strength for pvc games
        #[arg(long, value_enum, default_value = "strong")]
        difficulty: DifficultyArg,
        /// Seed for the computer's fallback picks
        #[arg(long)]
        seed: Option<u64>,
        /// Name recorded in the score ledger
        #[arg(long, default_value = "anonymous")]
        name: String,
        /// Host a network game on this address (e.g. 0.0.0.0:3840)
        #[arg(long)]
        listen: Option<String>,
        /// Join a network game at this address
        #[arg(long)]
        connect: Option<String>,
        /// Score ledger location
        #[arg(long, default_value = "dots-records.jsonl")]
        records: PathBuf,
    },
    /// Show the best recorded scores
    Records {
        #[arg(long, default_value = "dots-records.jsonl")]
        path: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dots_cli=info".into()),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Play {
            width,
            height,
            mode,
            difficulty,
            seed,
            name,
            listen,
            connect,
            records,
        } => session::run(session::Options {
            width,
            height,
            mode: mode.into(),
            difficulty: difficulty.into(),
            seed,
            name,
            listen,
            connect,
            records,
        }),
        Commands::Records { path } => records::print_best(&path),
    }
}
