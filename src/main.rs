//! Topas Othello: a bitboard Othello engine built around iterative
//! deepening negamax, alpha-beta pruning, and a Zobrist-hashed
//! transposition table.
//!
//! This binary is a self-contained demo: it plays one full game against
//! itself from the standard starting position, logging each decision.
//! It does not talk to any external game server.

mod bitboard;
mod driver;
mod evaluate;
mod search;
mod transposition;
mod zobrist;

use clap::Parser;
use log::info;

use bitboard::{Board, NO_MOVE};
use driver::Engine;

#[derive(Parser, Debug)]
#[command(name = "topas-othello", version, about = "A bitboard Othello engine")]
struct Args {
    /// Per-move search time budget, in seconds.
    #[arg(long, default_value_t = 5.0)]
    seconds: f64,

    /// Raise the log level to debug.
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let args = Args::parse();

    let level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    info!("Topas Othello 0.1.0 - self-play demo, {:.1}s per move", args.seconds);

    let mut engine = Engine::new();
    engine.new_game();

    let mut board = Board::starting_position();
    let mut player = 1u8; // black moves first
    let mut consecutive_passes = 0;

    loop {
        let legal = bitboard::gen_moves(&board, player);
        let mov = if legal == 0 {
            consecutive_passes += 1;
            NO_MOVE
        } else {
            consecutive_passes = 0;
            let (mov, score) = engine.decide(&board, player, args.seconds);
            info!(
                "player {} plays {} (score {})",
                player,
                bitboard::move_to_string(mov),
                score
            );
            mov
        };

        if consecutive_passes >= 2 {
            break;
        }

        board = bitboard::make_move(&board, mov, player);
        player = 1 - player;
    }

    println!("{}", bitboard::pretty_print(&board));
}
