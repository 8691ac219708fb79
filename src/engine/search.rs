use crate::board::{Board, Color, PieceType, Square};
use crate::moves::Move;
use rand::prelude::SliceRandom;
use std::time::Duration;

#[cfg(not(target_arch = "wasm32"))]
use std::time::Instant;
#[cfg(target_arch = "wasm32")]
use web_time::Instant;

pub fn find_best_move(board: &Board, depth: i32, random: bool) -> Option<(Move, i32, u64)> {
    find_best_move_with_timeout(board, depth, random, Duration::from_secs(60 * 60))
}

pub fn find_best_move_with_timeout(
    board: &Board,
    depth: i32,
    random: bool,
    remaining_time: Duration,
) -> Option<(Move, i32, u64)> {
    let mut best_move = None;
    let mut best_score = i32::MIN;
    let mut node_count = 0;

    let mut moves = board.generate_legal_moves();
    if random {
        moves.shuffle(&mut rand::thread_rng());
    }
    let start_time = Instant::now();

    for mv in moves {
        if start_time.elapsed() > remaining_time {
            return None;
        }
        let mut new_board = board.clone();
        new_board.apply(mv);

        // Negamax for the opponent's position (invert the returned evaluation)
        let score = -negamax(&new_board, depth, &mut node_count);

        if score > best_score {
            best_score = score;
            best_move = Some(mv);
        }
    }

    best_move.map(|mv| (mv, best_score, node_count))
}

pub fn find_best_move_iterative(board: &Board, time_limit: Duration) -> Option<(Move, i32, u64, i32)> {
    let mut best_move = None;
    let mut total_node_count = 0;

    let start_time = Instant::now();
    let mut depth = 1;

    while start_time.elapsed() < time_limit {
        let remaining_time = time_limit - start_time.elapsed();

        if let Some((current_move, current_score, node_count)) =
            find_best_move_with_timeout(board, depth, true, remaining_time)
        {
            best_move = Some((current_move, current_score, total_node_count + node_count, depth));
            total_node_count += node_count;
        } else {
            break;
        }

        depth += 1;
    }

    best_move
}

const MIN_EVALUATION: i32 = i32::MIN + 1; // +1 is important because -MIN is not a i32 number
const WIN: i32 = 10_000_000;
const LOSS: i32 = -10_000_000;
const DRAW: i32 = 0;

fn negamax(board: &Board, depth: i32, node_count: &mut u64) -> i32 {
    *node_count += 1;
    if depth <= 0 {
        return evaluate_board(board) * if board.active_color == Color::White { 1 } else { -1 };
    }

    let mut max_score = MIN_EVALUATION;

    for mv in board.generate_pseudo_moves() {
        let mut new_board = board.clone();
        new_board.apply(mv);
        if !new_board.in_check(board.active_color) {
            // Negate the evaluation of the next level (opponent's perspective)
            let score = -negamax(&new_board, depth - 1, node_count);
            max_score = max_score.max(score);
        }
    }

    if max_score == MIN_EVALUATION {
        // no legal moves
        if board.in_check(board.active_color) {
            LOSS - depth // closer loss is punished harder
        } else {
            DRAW // stalemate
        }
    } else {
        max_score
    }
}

/// Evaluates the board state and assigns a score based on material balance.
fn evaluate_board(board: &Board) -> i32 {
    let mut evaluation = 0;

    for row in 0..8 {
        for col in 0..8 {
            if let Square::Occupied(piece) = board.squares[row][col] {
                let piece_value = match piece.kind {
                    PieceType::Pawn => 1_000,
                    PieceType::Knight => 3_000,
                    PieceType::Bishop => 3_000,
                    PieceType::Rook => 5_000,
                    PieceType::Queen => 9_000,
                    PieceType::King => WIN,
                };

                evaluation += match piece.color {
                    Color::White => piece_value,
                    Color::Black => -piece_value,
                };
            }
        }
    }

    evaluation
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_takes_the_hanging_queen() {
        // white rook a1 can take the undefended queen on a8
        let board = Board::from_fen("q3k3/8/8/8/8/8/8/R3K3 w - - 0 1").unwrap();
        let (best_move, score, _) = find_best_move(&board, 1, false).unwrap();
        assert_eq!(best_move.to_square(), 0);
        assert!(score > 0);
    }

    #[test]
    fn test_search_finds_back_rank_mate_in_one() {
        let board = Board::from_fen("6k1/5ppp/8/8/8/8/8/R3K3 w - - 0 1").unwrap();
        let (best_move, score, _) = find_best_move(&board, 2, false).unwrap();
        assert_eq!(best_move.to_string(), "a1a8");
        assert!(score > 1_000_000);
    }

    #[test]
    fn test_iterative_search_respects_the_clock() {
        let board = Board::from_fen(crate::board::fen::INITIAL_POSITION).unwrap();
        let start = std::time::Instant::now();
        let result = find_best_move_iterative(&board, Duration::from_millis(100));
        assert!(result.is_some());
        assert!(start.elapsed() < Duration::from_secs(10));
    }
}
