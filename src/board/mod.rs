use crate::coords::{row_col_to_square, square_to_row_col};
use crate::moves::{Move, MoveKind};
use std::fmt;

pub mod fen;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub fn opposite(&self) -> Self {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PieceType {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl fmt::Display for PieceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PieceType::Pawn => write!(f, "P"),
            PieceType::Knight => write!(f, "N"),
            PieceType::Bishop => write!(f, "B"),
            PieceType::Rook => write!(f, "R"),
            PieceType::Queen => write!(f, "Q"),
            PieceType::King => write!(f, "K"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece {
    pub color: Color,
    pub kind: PieceType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Square {
    Occupied(Piece),
    Empty,
}

/// Board state indexed as `squares[row][col]` with row 0 at the top of the
/// screen grid (rank 8) and column 0 on the a-file. White moves toward
/// smaller rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    pub squares: [[Square; 8]; 8],
    pub active_color: Color,
    /// White king-side, White queen-side, Black king-side, Black queen-side.
    pub castling_rights: [bool; 4],
    /// Square a double pawn push just passed over, if any.
    pub en_passant: Option<u8>,
    pub halfmove_clock: u8,
    pub fullmove_number: u16,
}

pub fn back_rank(color: Color) -> u8 {
    match color {
        Color::White => 7,
        Color::Black => 0,
    }
}

pub fn promotion_row(color: Color) -> u8 {
    match color {
        Color::White => 0,
        Color::Black => 7,
    }
}

/// Row delta of a forward pawn step.
pub fn pawn_direction(color: Color) -> isize {
    match color {
        Color::White => -1,
        Color::Black => 1,
    }
}

impl Board {
    /// Creates an empty board.
    pub fn new() -> Self {
        Self {
            squares: [[Square::Empty; 8]; 8],
            active_color: Color::White,
            castling_rights: [false; 4],
            en_passant: None,
            halfmove_clock: 0,
            fullmove_number: 1,
        }
    }

    /// Delegates FEN parsing to the `fen` module.
    pub fn from_fen(fen: &str) -> Result<Self, String> {
        fen::from_fen(fen)
    }

    pub fn piece_at(&self, row: u8, col: u8) -> Option<Piece> {
        match self.squares[row as usize][col as usize] {
            Square::Occupied(piece) => Some(piece),
            Square::Empty => None,
        }
    }

    pub fn piece_on_square(&self, square: u8) -> Option<Piece> {
        let (row, col) = square_to_row_col(square);
        self.piece_at(row, col)
    }

    /// Applies an already validated move. Calling this with an empty source
    /// square is a contract violation.
    pub fn apply(&mut self, mv: Move) {
        let (from_row, from_col) = square_to_row_col(mv.from_square());
        let (to_row, to_col) = square_to_row_col(mv.to_square());
        let kind = mv.kind();
        let piece = match self.squares[from_row as usize][from_col as usize] {
            Square::Occupied(piece) => piece,
            Square::Empty => panic!("no piece on source square of move {}", mv),
        };

        if piece.kind == PieceType::Pawn || kind.is_capture() {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock += 1;
        }

        self.update_castling_rights(piece, mv);

        self.squares[from_row as usize][from_col as usize] = Square::Empty;
        match kind {
            MoveKind::KingCastle | MoveKind::QueenCastle => {
                // the destination square is the rook's square
                self.squares[to_row as usize][to_col as usize] = Square::Empty;
                let (king_col, rook_col) = if kind == MoveKind::KingCastle { (6, 5) } else { (2, 3) };
                self.squares[from_row as usize][king_col] = Square::Occupied(piece);
                self.squares[from_row as usize][rook_col] = Square::Occupied(Piece {
                    color: piece.color,
                    kind: PieceType::Rook,
                });
            }
            MoveKind::EnPassant => {
                self.squares[to_row as usize][to_col as usize] = Square::Occupied(piece);
                // the captured pawn sits beside the mover, not on the target
                self.squares[from_row as usize][to_col as usize] = Square::Empty;
            }
            kind if kind.is_promotion() => {
                self.squares[to_row as usize][to_col as usize] = Square::Occupied(Piece {
                    color: piece.color,
                    kind: kind.promotion_piece().unwrap(),
                });
            }
            _ => {
                self.squares[to_row as usize][to_col as usize] = Square::Occupied(piece);
            }
        }

        self.en_passant = if kind == MoveKind::DoublePawnPush {
            Some(row_col_to_square((from_row + to_row) / 2, from_col))
        } else {
            None
        };

        if self.active_color == Color::Black {
            self.fullmove_number += 1;
        }
        self.active_color = self.active_color.opposite();
    }

    fn update_castling_rights(&mut self, piece: Piece, mv: Move) {
        if piece.kind == PieceType::King {
            let offset = if piece.color == Color::White { 0 } else { 2 };
            self.castling_rights[offset] = false;
            self.castling_rights[offset + 1] = false;
        }
        for square in [mv.from_square(), mv.to_square()] {
            match square_to_row_col(square) {
                (7, 7) => self.castling_rights[0] = false,
                (7, 0) => self.castling_rights[1] = false,
                (0, 7) => self.castling_rights[2] = false,
                (0, 0) => self.castling_rights[3] = false,
                _ => {}
            }
        }
    }

    pub fn find_king(&self, color: Color) -> Option<(u8, u8)> {
        for row in 0..8 {
            for col in 0..8 {
                if self.piece_at(row, col)
                    == Some(Piece {
                        color,
                        kind: PieceType::King,
                    })
                {
                    return Some((row, col));
                }
            }
        }
        None
    }

    pub fn in_check(&self, color: Color) -> bool {
        match self.find_king(color) {
            Some((row, col)) => self.is_square_attacked(row, col, color.opposite()),
            None => false,
        }
    }

    /// Whether any piece of `by` attacks the given cell.
    pub fn is_square_attacked(&self, row: u8, col: u8, by: Color) -> bool {
        let row = row as isize;
        let col = col as isize;

        // pawns attack diagonally against their direction of travel
        let pawn_row = row - pawn_direction(by);
        for dc in [-1, 1] {
            if let Some(piece) = self.piece_at_signed(pawn_row, col + dc) {
                if piece.color == by && piece.kind == PieceType::Pawn {
                    return true;
                }
            }
        }

        const KNIGHT_OFFSETS: [(isize, isize); 8] =
            [(-2, -1), (-1, -2), (1, -2), (2, -1), (2, 1), (1, 2), (-1, 2), (-2, 1)];
        for (dr, dc) in KNIGHT_OFFSETS {
            if let Some(piece) = self.piece_at_signed(row + dr, col + dc) {
                if piece.color == by && piece.kind == PieceType::Knight {
                    return true;
                }
            }
        }

        const KING_OFFSETS: [(isize, isize); 8] =
            [(-1, -1), (-1, 0), (-1, 1), (0, -1), (0, 1), (1, -1), (1, 0), (1, 1)];
        for (dr, dc) in KING_OFFSETS {
            if let Some(piece) = self.piece_at_signed(row + dr, col + dc) {
                if piece.color == by && piece.kind == PieceType::King {
                    return true;
                }
            }
        }

        const DIAGONALS: [(isize, isize); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];
        const ORTHOGONALS: [(isize, isize); 4] = [(0, -1), (0, 1), (-1, 0), (1, 0)];
        for (directions, slider) in [
            (&DIAGONALS, PieceType::Bishop),
            (&ORTHOGONALS, PieceType::Rook),
        ] {
            for &(dr, dc) in directions {
                let mut r = row + dr;
                let mut c = col + dc;
                while (0..8).contains(&r) && (0..8).contains(&c) {
                    if let Some(piece) = self.piece_at_signed(r, c) {
                        if piece.color == by && (piece.kind == slider || piece.kind == PieceType::Queen) {
                            return true;
                        }
                        break;
                    }
                    r += dr;
                    c += dc;
                }
            }
        }

        false
    }

    fn piece_at_signed(&self, row: isize, col: isize) -> Option<Piece> {
        if (0..8).contains(&row) && (0..8).contains(&col) {
            self.piece_at(row as u8, col as u8)
        } else {
            None
        }
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}
