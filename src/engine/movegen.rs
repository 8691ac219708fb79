use crate::board::{back_rank, pawn_direction, promotion_row, Board, Color, PieceType};
use crate::coords::row_col_to_square;
use crate::moves::{Move, MoveKind};

const PROMOTION_KINDS: [MoveKind; 4] = [
    MoveKind::QueenPromotion,
    MoveKind::RookPromotion,
    MoveKind::BishopPromotion,
    MoveKind::KnightPromotion,
];

const PROMOTION_CAPTURE_KINDS: [MoveKind; 4] = [
    MoveKind::QueenPromotionCapture,
    MoveKind::RookPromotionCapture,
    MoveKind::BishopPromotionCapture,
    MoveKind::KnightPromotionCapture,
];

impl Board {
    /// All moves of the active color that leave its own king safe. Castle
    /// moves are encoded with the rook's square as destination.
    pub fn generate_legal_moves(&self) -> Vec<Move> {
        self.generate_pseudo_moves()
            .into_iter()
            .filter(|mv| self.is_legal(*mv))
            .collect()
    }

    fn is_legal(&self, mv: Move) -> bool {
        let mut next = self.clone();
        next.apply(mv);
        !next.in_check(self.active_color)
    }

    pub fn generate_pseudo_moves(&self) -> Vec<Move> {
        let mut all_moves = Vec::with_capacity(64);
        for row in 0..8 {
            for col in 0..8 {
                all_moves.extend(self.generate_pseudo_moves_from_position(row, col));
            }
        }
        all_moves
    }

    pub fn generate_pseudo_moves_from_position(&self, row: u8, col: u8) -> Vec<Move> {
        match self.piece_at(row, col) {
            Some(piece) if piece.color == self.active_color => match piece.kind {
                PieceType::Pawn => self.generate_pawn_moves(row, col),
                PieceType::Knight => self.generate_knight_moves(row, col),
                PieceType::Bishop => self.generate_bishop_moves(row, col),
                PieceType::Rook => self.generate_rook_moves(row, col),
                PieceType::Queen => self.generate_queen_moves(row, col),
                PieceType::King => self.generate_king_moves(row, col),
            },
            _ => Vec::new(),
        }
    }

    fn generate_pawn_moves(&self, row: u8, col: u8) -> Vec<Move> {
        let mut moves = Vec::new();
        let color = self.active_color;
        let forward = pawn_direction(color);
        let start_row = match color {
            Color::White => 6,
            Color::Black => 1,
        };

        // pawns never stand on their promotion row, so one step stays on board
        let new_row = (row as isize + forward) as u8;

        if self.piece_at(new_row, col).is_none() {
            Self::add_pawn_moves_with_and_without_promotion(row, col, new_row, col, color, false, &mut moves);

            if row == start_row {
                let two_forward = (row as isize + 2 * forward) as u8;
                if self.piece_at(two_forward, col).is_none() {
                    moves.push(Move::from_cells(row, col, two_forward, col, MoveKind::DoublePawnPush));
                }
            }
        }

        for dc in [-1, 1] {
            let new_col = col as isize + dc;
            if !(0..8).contains(&new_col) {
                continue;
            }
            let new_col = new_col as u8;
            if let Some(target) = self.piece_at(new_row, new_col) {
                if target.color != color {
                    Self::add_pawn_moves_with_and_without_promotion(
                        row, col, new_row, new_col, color, true, &mut moves,
                    );
                }
            } else if self.en_passant == Some(row_col_to_square(new_row, new_col)) {
                moves.push(Move::from_cells(row, col, new_row, new_col, MoveKind::EnPassant));
            }
        }

        moves
    }

    fn add_pawn_moves_with_and_without_promotion(
        from_row: u8,
        from_col: u8,
        to_row: u8,
        to_col: u8,
        color: Color,
        capture: bool,
        moves: &mut Vec<Move>,
    ) {
        if to_row == promotion_row(color) {
            let kinds = if capture { &PROMOTION_CAPTURE_KINDS } else { &PROMOTION_KINDS };
            for &kind in kinds {
                moves.push(Move::from_cells(from_row, from_col, to_row, to_col, kind));
            }
        } else {
            let kind = if capture { MoveKind::Capture } else { MoveKind::Quiet };
            moves.push(Move::from_cells(from_row, from_col, to_row, to_col, kind));
        }
    }

    fn generate_knight_moves(&self, row: u8, col: u8) -> Vec<Move> {
        const KNIGHT_MOVES: [(isize, isize); 8] =
            [(-2, -1), (-1, -2), (1, -2), (2, -1), (2, 1), (1, 2), (-1, 2), (-2, 1)];
        self.generate_moves_from_directions(row, col, &KNIGHT_MOVES)
    }

    fn generate_bishop_moves(&self, row: u8, col: u8) -> Vec<Move> {
        const BISHOP_DIRECTIONS: [(isize, isize); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];
        self.generate_sliding_moves(row, col, &BISHOP_DIRECTIONS)
    }

    fn generate_rook_moves(&self, row: u8, col: u8) -> Vec<Move> {
        const ROOK_DIRECTIONS: [(isize, isize); 4] = [(0, -1), (0, 1), (-1, 0), (1, 0)];
        self.generate_sliding_moves(row, col, &ROOK_DIRECTIONS)
    }

    fn generate_queen_moves(&self, row: u8, col: u8) -> Vec<Move> {
        const QUEEN_DIRECTIONS: [(isize, isize); 8] =
            [(-1, -1), (-1, 1), (1, -1), (1, 1), (0, -1), (0, 1), (-1, 0), (1, 0)];
        self.generate_sliding_moves(row, col, &QUEEN_DIRECTIONS)
    }

    fn generate_king_moves(&self, row: u8, col: u8) -> Vec<Move> {
        const KING_MOVES: [(isize, isize); 8] = [(-1, -1), (-1, 0), (-1, 1), (0, -1), (0, 1), (1, -1), (1, 0), (1, 1)];

        let mut moves = self.generate_moves_from_directions(row, col, &KING_MOVES);

        let color = self.active_color;
        let rank = back_rank(color);
        if row != rank || col != 4 {
            return moves;
        }

        let opponent = color.opposite();
        let rights_offset = if color == Color::White { 0 } else { 2 };

        if self.castling_rights[rights_offset]
            && self.piece_at(rank, 5).is_none()
            && self.piece_at(rank, 6).is_none()
            && !self.is_square_attacked(rank, 4, opponent)
            && !self.is_square_attacked(rank, 5, opponent)
            && !self.is_square_attacked(rank, 6, opponent)
        {
            moves.push(Move::from_cells(rank, 4, rank, 7, MoveKind::KingCastle));
        }

        if self.castling_rights[rights_offset + 1]
            && self.piece_at(rank, 1).is_none()
            && self.piece_at(rank, 2).is_none()
            && self.piece_at(rank, 3).is_none()
            && !self.is_square_attacked(rank, 4, opponent)
            && !self.is_square_attacked(rank, 3, opponent)
            && !self.is_square_attacked(rank, 2, opponent)
        {
            moves.push(Move::from_cells(rank, 4, rank, 0, MoveKind::QueenCastle));
        }

        moves
    }

    fn generate_moves_from_directions(&self, row: u8, col: u8, directions: &[(isize, isize)]) -> Vec<Move> {
        let mut moves = Vec::new();

        for &(dr, dc) in directions {
            let new_row = row as isize + dr;
            let new_col = col as isize + dc;
            if !(0..8).contains(&new_row) || !(0..8).contains(&new_col) {
                continue;
            }
            match self.piece_at(new_row as u8, new_col as u8) {
                None => moves.push(Move::from_cells(row, col, new_row as u8, new_col as u8, MoveKind::Quiet)),
                Some(piece) if piece.color != self.active_color => {
                    moves.push(Move::from_cells(row, col, new_row as u8, new_col as u8, MoveKind::Capture))
                }
                Some(_) => {}
            }
        }

        moves
    }

    fn generate_sliding_moves(&self, row: u8, col: u8, directions: &[(isize, isize)]) -> Vec<Move> {
        let mut moves = Vec::new();

        for &(dr, dc) in directions {
            let mut new_row = row as isize;
            let mut new_col = col as isize;

            loop {
                new_row += dr;
                new_col += dc;

                if !(0..8).contains(&new_row) || !(0..8).contains(&new_col) {
                    break;
                }

                match self.piece_at(new_row as u8, new_col as u8) {
                    None => moves.push(Move::from_cells(row, col, new_row as u8, new_col as u8, MoveKind::Quiet)),
                    Some(piece) => {
                        if piece.color != self.active_color {
                            moves.push(Move::from_cells(row, col, new_row as u8, new_col as u8, MoveKind::Capture));
                        }
                        break; // blocked
                    }
                }
            }
        }

        moves
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::fen::INITIAL_POSITION;

    #[test]
    fn test_initial_position_has_twenty_moves() {
        let board = Board::from_fen(INITIAL_POSITION).unwrap();
        let moves = board.generate_legal_moves();
        assert_eq!(moves.len(), 20);

        let e2e4 = Move::from_cells(6, 4, 4, 4, MoveKind::DoublePawnPush);
        assert!(moves.contains(&e2e4));
        let e2e3 = Move::from_cells(6, 4, 5, 4, MoveKind::Quiet);
        assert!(moves.contains(&e2e3));
        let g1f3 = Move::from_cells(7, 6, 5, 5, MoveKind::Quiet);
        assert!(moves.contains(&g1f3));
    }

    #[test]
    fn test_castle_moves_target_the_rook_square() {
        let board = Board::from_fen("4k3/8/8/8/8/8/8/R3K2R w KQ - 0 1").unwrap();
        let moves = board.generate_legal_moves();
        assert!(moves.contains(&Move::from_cells(7, 4, 7, 7, MoveKind::KingCastle)));
        assert!(moves.contains(&Move::from_cells(7, 4, 7, 0, MoveKind::QueenCastle)));
    }

    #[test]
    fn test_castle_excluded_when_path_blocked_or_attacked() {
        // bishop on f1 blocks the king side
        let board = Board::from_fen("4k3/8/8/8/8/8/8/R3KB1R w KQ - 0 1").unwrap();
        let moves = board.generate_legal_moves();
        assert!(!moves.contains(&Move::from_cells(7, 4, 7, 7, MoveKind::KingCastle)));
        assert!(moves.contains(&Move::from_cells(7, 4, 7, 0, MoveKind::QueenCastle)));

        // black rook on f8 attacks f1, the king's transit square
        let board = Board::from_fen("4kr2/8/8/8/8/8/8/4K2R w K - 0 1").unwrap();
        let moves = board.generate_legal_moves();
        assert!(!moves.contains(&Move::from_cells(7, 4, 7, 7, MoveKind::KingCastle)));
    }

    #[test]
    fn test_promotion_generates_all_four_kinds() {
        let board = Board::from_fen("1r2k3/P7/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        let moves = board.generate_legal_moves();
        for kind in PROMOTION_KINDS {
            assert!(moves.contains(&Move::from_cells(1, 0, 0, 0, kind)));
        }
        for kind in PROMOTION_CAPTURE_KINDS {
            assert!(moves.contains(&Move::from_cells(1, 0, 0, 1, kind)));
        }
    }

    #[test]
    fn test_en_passant_generated_only_when_available() {
        let board = Board::from_fen("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1").unwrap();
        let moves = board.generate_legal_moves();
        assert!(moves.contains(&Move::from_cells(3, 4, 2, 3, MoveKind::EnPassant)));

        let board = Board::from_fen("4k3/8/8/3pP3/8/8/8/4K3 w - - 0 1").unwrap();
        let moves = board.generate_legal_moves();
        assert!(!moves.contains(&Move::from_cells(3, 4, 2, 3, MoveKind::EnPassant)));
    }

    #[test]
    fn test_moves_that_leave_the_king_in_check_are_filtered() {
        // the knight on e2 is pinned by the rook on e8
        let board = Board::from_fen("4r1k1/8/8/8/8/8/4N3/4K3 w - - 0 1").unwrap();
        let moves = board.generate_legal_moves();
        assert!(!moves.iter().any(|mv| mv.from_square() == 6 * 8 + 4));
        assert!(moves.contains(&Move::from_cells(7, 4, 7, 3, MoveKind::Quiet)));
    }
}
