use super::{Board, Color, Piece, PieceType, Square};
use crate::coords::row_col_to_square;

pub const INITIAL_POSITION: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Parses a square like "e3" into its board index.
fn parse_square(square: &str) -> Result<u8, String> {
    if square.len() != 2 {
        return Err(format!("Invalid square: {}", square));
    }
    let file = square.chars().next().unwrap();
    let rank = square.chars().nth(1).unwrap();
    if ('a'..='h').contains(&file) && ('1'..='8').contains(&rank) {
        let col = file as u8 - b'a';
        let row = 7 - (rank as u8 - b'1');
        Ok(row_col_to_square(row, col))
    } else {
        Err(format!("Invalid square: {}", square))
    }
}

/// Parses a FEN string and sets up a `Board`. The first FEN rank is the far
/// rank, which is also row 0 of the board grid, so ranks map to rows directly.
pub fn from_fen(fen: &str) -> Result<Board, String> {
    let mut board = Board::new();
    let parts: Vec<&str> = fen.split(' ').collect();
    if parts.len() != 6 {
        return Err(String::from("Invalid FEN string: must have 6 parts."));
    }

    let rows: Vec<&str> = parts[0].split('/').collect();
    if rows.len() != 8 {
        return Err(String::from("Invalid FEN string: expected 8 rows"));
    }

    for (row_index, row) in rows.iter().enumerate() {
        let mut col_index = 0;

        for c in row.chars() {
            if col_index > 7 {
                return Err(String::from("Invalid FEN string: too many columns"));
            }
            if c.is_ascii_digit() {
                col_index += c.to_digit(10).unwrap() as usize;
            } else {
                let piece = match c {
                    'p' => Some((Color::Black, PieceType::Pawn)),
                    'r' => Some((Color::Black, PieceType::Rook)),
                    'n' => Some((Color::Black, PieceType::Knight)),
                    'b' => Some((Color::Black, PieceType::Bishop)),
                    'q' => Some((Color::Black, PieceType::Queen)),
                    'k' => Some((Color::Black, PieceType::King)),
                    'P' => Some((Color::White, PieceType::Pawn)),
                    'R' => Some((Color::White, PieceType::Rook)),
                    'N' => Some((Color::White, PieceType::Knight)),
                    'B' => Some((Color::White, PieceType::Bishop)),
                    'Q' => Some((Color::White, PieceType::Queen)),
                    'K' => Some((Color::White, PieceType::King)),
                    _ => None,
                };

                if let Some((color, kind)) = piece {
                    board.squares[row_index][col_index] = Square::Occupied(Piece { color, kind });
                    col_index += 1;
                } else {
                    return Err(format!("Invalid piece character in FEN string: {}", c));
                }
            }
        }
        if col_index > 8 {
            return Err(format!("Too many squares in row {} when parsing FEN", row_index));
        }
    }

    board.active_color = match parts[1] {
        "w" => Color::White,
        "b" => Color::Black,
        _ => return Err(String::from("Invalid FEN string: invalid active color.")),
    };

    board.castling_rights = [
        parts[2].contains('K'),
        parts[2].contains('Q'),
        parts[2].contains('k'),
        parts[2].contains('q'),
    ];

    board.en_passant = if parts[3] == "-" {
        None
    } else {
        Some(parse_square(parts[3])?)
    };

    board.halfmove_clock = parts[4]
        .parse::<u8>()
        .map_err(|_| format!("Invalid FEN string: halfmove clock is not a valid number: {}", parts[4]))?;

    board.fullmove_number = parts[5].parse::<u16>().map_err(|_| {
        format!(
            "Invalid FEN string: fullmove number is not a valid number: {}",
            parts[5]
        )
    })?;

    Ok(board)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_position() {
        let board = from_fen(INITIAL_POSITION).unwrap();

        // far rank (row 0) holds Black's pieces, near rank White's
        assert_eq!(
            board.piece_at(0, 0),
            Some(Piece {
                color: Color::Black,
                kind: PieceType::Rook
            })
        );
        assert_eq!(
            board.piece_at(0, 4),
            Some(Piece {
                color: Color::Black,
                kind: PieceType::King
            })
        );
        assert_eq!(
            board.piece_at(6, 4),
            Some(Piece {
                color: Color::White,
                kind: PieceType::Pawn
            })
        );
        assert_eq!(
            board.piece_at(7, 3),
            Some(Piece {
                color: Color::White,
                kind: PieceType::Queen
            })
        );
        assert_eq!(board.piece_at(4, 4), None);

        assert_eq!(board.active_color, Color::White);
        assert_eq!(board.castling_rights, [true; 4]);
        assert_eq!(board.en_passant, None);
        assert_eq!(board.halfmove_clock, 0);
        assert_eq!(board.fullmove_number, 1);
    }

    #[test]
    fn test_en_passant_square() {
        let board = from_fen("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1").unwrap();
        assert_eq!(board.en_passant, Some(row_col_to_square(5, 4)));
    }

    #[test]
    fn test_malformed_fen_is_rejected() {
        assert!(from_fen("").is_err());
        assert!(from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP w KQkq - 0 1").is_err());
        assert!(from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNX w KQkq - 0 1").is_err());
        assert!(from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR x KQkq - 0 1").is_err());
        assert!(from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq z9 0 1").is_err());
        assert!(from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - x 1").is_err());
    }
}
