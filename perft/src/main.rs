use std::time::{Duration, Instant};

use clap::Parser;
use skakmat_core::{
    board::{CoordMove, Position},
    perft::{perft, perft_divide},
};

/// Perft runner for the skakmat move generator.
///
/// Counts the nodes of the legal-move tree from a position, for checking
/// the generator against published perft numbers and for timing it.
#[derive(Parser, Debug)]
struct Args {
    /// Starting position.
    ///
    /// Either the string "startpos" or a position in Forsyth-Edwards
    /// Notation. Combine with --moves to reach variations of it.
    #[arg(short, long, default_value = "startpos", value_parser = parse_position)]
    position: Position,

    /// Moves to play before counting, as coordinate moves (`e2e4`, `e7e8q`).
    #[arg(short, long, num_args(0..))]
    moves: Vec<CoordMove>,

    /// Depth to count to.
    #[arg(short, long, value_parser = clap::value_parser!(u8).range(1..), default_value_t = 6)]
    depth: u8,

    /// List each root move with the node count beneath it instead of
    /// counting depth by depth. Useful for diffing against a reference
    /// engine to find the branch that disagrees.
    #[arg(long)]
    divide: bool,
}

fn parse_position(s: &str) -> Result<Position, String> {
    if s == "startpos" {
        Ok(Position::starting_position())
    } else {
        Position::try_parse_fen(s)
            .map_err(|e| format!("expected `startpos` or a valid FEN string: {e}"))
    }
}

fn depth_by_depth(position: &Position, max_depth: usize) {
    let mut total_time = Duration::ZERO;
    let mut last_depth_time = Duration::ZERO;
    let mut total_nodes = 0;

    for depth in 0..=max_depth {
        let start_time = Instant::now();
        let nodes = perft(position, depth);
        let time_taken = start_time.elapsed();

        println!(
            "Depth: {depth}\tNodes: {nodes}\tTime taken: {:.3}s",
            time_taken.as_secs_f64()
        );

        total_time += time_taken;
        last_depth_time = time_taken;
        total_nodes += nodes;
    }

    let nodes_per_second = total_nodes as f64 / last_depth_time.as_secs_f64();
    println!();
    println!(
        "Total nodes: {total_nodes}\tTotal time: {:.3}s\tNodes per second: {:.3}",
        total_time.as_secs_f64(),
        nodes_per_second
    );
}

fn divide(position: &Position, depth: usize) {
    let mut total_nodes = 0;

    for (mv, nodes) in perft_divide(position, depth) {
        total_nodes += nodes;
        println!("{}: {nodes}", CoordMove::from(mv));
    }

    println!();
    println!("Nodes searched: {total_nodes}");
}

fn main() -> Result<(), String> {
    let Args {
        position,
        moves,
        depth,
        divide: divide_mode,
    } = Args::parse();

    let mut position = position;
    for coord in moves {
        position = match position.find_move(coord.from, coord.to, coord.promotion) {
            Some(mv) => position
                .apply_move(mv)
                .map_err(|e| format!("rejected {coord}: {e}"))?,
            None => {
                return Err(format!(
                    "move `{coord}` is not legal in this position ({})",
                    position.fen()
                ))
            }
        };
    }

    if divide_mode {
        divide(&position, depth as usize);
    } else {
        depth_by_depth(&position, depth as usize);
    }

    Ok(())
}
