use crate::board::{back_rank, promotion_row, Board, Color, Piece, PieceType};
use crate::coords::square_to_row_col;
use crate::moves::{Move, MoveKind};
use std::time::Duration;

pub mod movegen;
pub mod search;

/// How a finished game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Checkmate { winner: Color },
    Stalemate,
}

impl Outcome {
    pub fn describe(&self) -> String {
        match self {
            Outcome::Checkmate { winner: Color::White } => String::from("Checkmate - White wins"),
            Outcome::Checkmate { winner: Color::Black } => String::from("Checkmate - Black wins"),
            Outcome::Stalemate => String::from("Stalemate - draw"),
        }
    }
}

/// The move oracle the turn orchestrator talks to. It classifies gestures
/// into move kinds, validates candidates against the current legal move set,
/// applies committed moves and computes the opponent's reply. The orchestrator
/// never second-guesses these answers.
pub trait Engine {
    fn piece_on(&self, square: u8) -> Option<Piece>;
    fn side_to_move(&self) -> Color;
    /// The kind of move the user is attempting between two squares, judged
    /// from board facts alone; validation happens separately.
    fn classify(&self, from: u8, to: u8) -> MoveKind;
    /// Checks a candidate, given as raw board cells, against the legal move
    /// set. Returns the packed move on success.
    fn validate(&self, from_row: u8, from_col: u8, to_row: u8, to_col: u8, kind: MoveKind) -> Option<Move>;
    /// Legal moves available from one square, for highlighting.
    fn moves_from(&self, square: u8) -> Vec<Move>;
    fn commit(&mut self, mv: Move);
    /// Recomputes the legal move set for the side to move.
    fn rebuild_move_set(&mut self);
    /// Blocking search for the opponent's reply. May take a while.
    fn best_reply(&mut self) -> Option<Move>;
    fn outcome(&self) -> Option<Outcome>;
}

/// The built-in engine: board state, the current legal move set and a
/// time-boxed negamax for replies.
pub struct GameEngine {
    board: Board,
    legal_moves: Vec<Move>,
    search_time: Duration,
}

impl GameEngine {
    pub fn from_fen(fen: &str) -> Result<Self, String> {
        let board = Board::from_fen(fen)?;
        let legal_moves = board.generate_legal_moves();
        Ok(Self {
            board,
            legal_moves,
            search_time: Duration::from_secs(2),
        })
    }

    /// Shrinks or widens the opponent's thinking time.
    pub fn with_search_time(mut self, search_time: Duration) -> Self {
        self.search_time = search_time;
        self
    }

    pub fn board(&self) -> &Board {
        &self.board
    }
}

impl Engine for GameEngine {
    fn piece_on(&self, square: u8) -> Option<Piece> {
        self.board.piece_on_square(square)
    }

    fn side_to_move(&self) -> Color {
        self.board.active_color
    }

    fn classify(&self, from: u8, to: u8) -> MoveKind {
        let (from_row, from_col) = square_to_row_col(from);
        let (to_row, to_col) = square_to_row_col(to);
        let mover = match self.board.piece_at(from_row, from_col) {
            Some(piece) => piece,
            None => return MoveKind::Quiet,
        };
        let target = self.board.piece_at(to_row, to_col);

        // king onto own rook reads as a castle attempt
        if mover.kind == PieceType::King {
            if let Some(target) = target {
                if target.color == mover.color && target.kind == PieceType::Rook && to_row == back_rank(mover.color) {
                    return if to_col > from_col {
                        MoveKind::KingCastle
                    } else {
                        MoveKind::QueenCastle
                    };
                }
            }
        }

        if mover.kind == PieceType::Pawn {
            let promoting = to_row == promotion_row(mover.color);
            if from_col != to_col {
                if target.is_none() {
                    return MoveKind::EnPassant;
                }
                return if promoting {
                    MoveKind::QueenPromotionCapture
                } else {
                    MoveKind::Capture
                };
            }
            if promoting {
                return MoveKind::QueenPromotion;
            }
            if from_row.abs_diff(to_row) == 2 {
                return MoveKind::DoublePawnPush;
            }
            return MoveKind::Quiet;
        }

        if target.is_some() {
            MoveKind::Capture
        } else {
            MoveKind::Quiet
        }
    }

    fn validate(&self, from_row: u8, from_col: u8, to_row: u8, to_col: u8, kind: MoveKind) -> Option<Move> {
        let candidate = Move::from_cells(from_row, from_col, to_row, to_col, kind);
        self.legal_moves.iter().copied().find(|mv| *mv == candidate)
    }

    fn moves_from(&self, square: u8) -> Vec<Move> {
        self.legal_moves
            .iter()
            .copied()
            .filter(|mv| mv.from_square() == square)
            .collect()
    }

    fn commit(&mut self, mv: Move) {
        self.board.apply(mv);
        // stale until rebuild_move_set runs for the new position
        self.legal_moves.clear();
    }

    fn rebuild_move_set(&mut self) {
        self.legal_moves = self.board.generate_legal_moves();
    }

    fn best_reply(&mut self) -> Option<Move> {
        search::find_best_move_iterative(&self.board, self.search_time).map(|(mv, _, _, _)| mv)
    }

    fn outcome(&self) -> Option<Outcome> {
        if !self.board.generate_legal_moves().is_empty() {
            return None;
        }
        if self.board.in_check(self.board.active_color) {
            Some(Outcome::Checkmate {
                winner: self.board.active_color.opposite(),
            })
        } else {
            Some(Outcome::Stalemate)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::fen::INITIAL_POSITION;
    use crate::coords::row_col_to_square;

    #[test]
    fn test_classify_pawn_moves() {
        let engine = GameEngine::from_fen(INITIAL_POSITION).unwrap();
        let e2 = row_col_to_square(6, 4);
        assert_eq!(engine.classify(e2, row_col_to_square(4, 4)), MoveKind::DoublePawnPush);
        assert_eq!(engine.classify(e2, row_col_to_square(5, 4)), MoveKind::Quiet);

        let engine = GameEngine::from_fen("1r2k3/P7/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        let a7 = row_col_to_square(1, 0);
        assert_eq!(engine.classify(a7, row_col_to_square(0, 0)), MoveKind::QueenPromotion);
        assert_eq!(
            engine.classify(a7, row_col_to_square(0, 1)),
            MoveKind::QueenPromotionCapture
        );
    }

    #[test]
    fn test_classify_king_onto_own_rook_as_castle() {
        let engine = GameEngine::from_fen("4k3/8/8/8/8/8/8/R3K2R w KQ - 0 1").unwrap();
        let e1 = row_col_to_square(7, 4);
        assert_eq!(engine.classify(e1, row_col_to_square(7, 7)), MoveKind::KingCastle);
        assert_eq!(engine.classify(e1, row_col_to_square(7, 0)), MoveKind::QueenCastle);
        // a plain king step is not a castle
        assert_eq!(engine.classify(e1, row_col_to_square(7, 3)), MoveKind::Quiet);
    }

    #[test]
    fn test_validate_accepts_legal_and_rejects_illegal() {
        let engine = GameEngine::from_fen(INITIAL_POSITION).unwrap();
        assert!(engine.validate(6, 4, 4, 4, MoveKind::DoublePawnPush).is_some());
        // a rook cannot jump over its own pawn
        assert!(engine.validate(7, 0, 4, 0, MoveKind::Quiet).is_none());
        // right squares, wrong kind
        assert!(engine.validate(6, 4, 4, 4, MoveKind::Quiet).is_none());
    }

    #[test]
    fn test_moves_from_reports_highlight_targets() {
        let engine = GameEngine::from_fen(INITIAL_POSITION).unwrap();
        let targets = engine.moves_from(row_col_to_square(6, 4));
        assert_eq!(targets.len(), 2);
        assert!(targets.iter().all(|mv| mv.from_square() == row_col_to_square(6, 4)));
    }

    #[test]
    fn test_outcome_detection() {
        let engine = GameEngine::from_fen(INITIAL_POSITION).unwrap();
        assert_eq!(engine.outcome(), None);

        // smothered corner: the white king cannot move and nothing can take c2
        let engine = GameEngine::from_fen("1k6/8/8/8/8/8/PPn5/KN6 w - - 0 1").unwrap();
        assert_eq!(engine.outcome(), Some(Outcome::Checkmate { winner: Color::Black }));

        let engine = GameEngine::from_fen("1k6/8/8/8/8/1r6/7r/K7 w - - 0 1").unwrap();
        assert_eq!(engine.outcome(), Some(Outcome::Stalemate));
    }

    #[test]
    fn test_commit_invalidates_until_rebuild() {
        let mut engine = GameEngine::from_fen(INITIAL_POSITION).unwrap();
        let mv = engine.validate(6, 4, 4, 4, MoveKind::DoublePawnPush).unwrap();
        engine.commit(mv);
        assert!(engine.moves_from(row_col_to_square(1, 4)).is_empty());
        engine.rebuild_move_set();
        assert_eq!(engine.moves_from(row_col_to_square(1, 4)).len(), 2);
        assert_eq!(engine.side_to_move(), Color::Black);
    }
}
