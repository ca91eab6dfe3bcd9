use clap::{Parser, ValueEnum};
use schach::board::Color;
use schach::game::{Game, GameConfig};
use schach::search::DEFAULT_DEPTH;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Side {
    White,
    Black,
}

impl From<Side> for Color {
    fn from(side: Side) -> Self {
        match side {
            Side::White => Color::White,
            Side::Black => Color::Black,
        }
    }
}

/// Play chess against a minimax engine in the terminal.
#[derive(Debug, Parser)]
#[command(name = "schach", version)]
struct Args {
    /// Side the engine plays
    #[arg(long, value_enum, default_value = "black")]
    engine: Side,

    /// Plies searched below each candidate move
    #[arg(long, default_value_t = DEFAULT_DEPTH)]
    depth: u32,

    /// Let the engine play both sides
    #[arg(long)]
    engine_only: bool,

    /// Stop engine-only games after this many plies
    #[arg(long, default_value_t = 200)]
    max_plies: usize,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = GameConfig {
        engine: args.engine.into(),
        depth: args.depth,
        self_play: args.engine_only,
        max_plies: args.max_plies,
    };

    let mut game = Game::new(config);
    game.run()
}
