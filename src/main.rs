use std::time::Instant;

mod board;
mod coords;
mod engine;
mod moves;
mod notation;
mod session;
mod ui;

use board::fen::INITIAL_POSITION;
use board::{Board, Color};
use engine::search::find_best_move;
use ui::setup_ui;

use clap::arg;
use clap::command;
use clap::Command;

use tabled::settings::Style;
use tabled::Table;
use tabled::Tabled;

slint::include_modules!();

fn main() {
    let matches = command!()
        .version("v0.1.0")
        .propagate_version(true)
        .subcommand(Command::new("benchmark").about("Runs a search benchmark"))
        .subcommand(
            Command::new("play")
                .about("Play a game against the engine")
                .arg(
                    arg!(
                    -f --fen <FEN> "Starting position"
                            )
                    .default_value(INITIAL_POSITION),
                )
                .arg(arg!(
                    -b --black "Play the black pieces"
                )),
        )
        .get_matches();

    match matches.subcommand() {
        Some(("benchmark", _)) => {
            benchmark();
        }
        Some(("play", arg_matches)) => {
            let fen = arg_matches.get_one::<String>("fen").unwrap();
            let color = if arg_matches.get_flag("black") {
                Color::Black
            } else {
                Color::White
            };
            run_game(fen, color);
        }
        None => {
            play_with_ui();
        }
        _ => unreachable!("Exhausted list of subcommands"),
    }
}

#[cfg_attr(target_arch = "wasm32", wasm_bindgen::prelude::wasm_bindgen(start))]
fn play_with_ui() {
    run_game(INITIAL_POSITION, Color::White);
}

fn run_game(fen: &str, color: Color) {
    if let Err(message) = setup_ui(fen, color) {
        eprintln!("{}", message);
        std::process::exit(1);
    }
}

#[derive(Tabled)]
struct BenchmarkRow {
    ply: i32,
    score: i32,
    node_count: u64,
    elapsed_time: f32,
    move_per_sec: f32,
    best_move: String,
}

fn benchmark() {
    let fen = "1rb2rk1/p4ppp/1p1qp1n1/3n2N1/2pP4/2P3P1/PPQ2PBP/R1B1R1K1 w - - 4 17";
    let board = Board::from_fen(fen).expect("Invalid FEN string");
    let mut table_rows = Vec::new();
    for d in 0..6 {
        let start_time = Instant::now();
        if let Some((m, score, node_count)) = find_best_move(&board, d, false) {
            let elapsed = start_time.elapsed();
            table_rows.push(BenchmarkRow {
                ply: d,
                score,
                node_count,
                elapsed_time: elapsed.as_secs_f32(),
                move_per_sec: node_count as f32 / elapsed.as_secs_f32() / 1000f32,
                best_move: m.to_string(),
            });
            if elapsed.as_secs() > 10 {
                break;
            }
        } else {
            println!("No best move found!");
        }
    }
    println!("{}", Table::new(table_rows).with(Style::modern()));
}
