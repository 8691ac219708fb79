use crate::board::{Piece, PieceType};
use crate::coords::square_to_row_col;
use crate::moves::{Move, MoveKind};

/// Name of a square in algebraic notation, e.g. square 36 -> "e4".
pub fn square_name(square: u8) -> String {
    let (row, col) = square_to_row_col(square);
    format!("{}{}", (b'a' + col) as char, 8 - row)
}

/// Renders a move as the short notation shown in the move-history log, e.g.
/// "e4", "Nf3", "exd5", "O-O", "e8=Q". The piece is looked up through the
/// callback before the move is committed, so the source square still holds it.
/// Disambiguation between equal pieces is not attempted.
pub fn render(mv: Move, piece_on: impl Fn(u8) -> Option<Piece>) -> String {
    let kind = mv.kind();
    match kind {
        MoveKind::KingCastle => return String::from("O-O"),
        MoveKind::QueenCastle => return String::from("O-O-O"),
        _ => {}
    }

    let target = square_name(mv.to_square());
    let piece = piece_on(mv.from_square());
    let is_pawn = matches!(
        piece,
        None | Some(Piece {
            kind: PieceType::Pawn,
            ..
        })
    );

    let mut text = String::new();
    if is_pawn {
        if kind.is_capture() {
            let (_, from_col) = square_to_row_col(mv.from_square());
            text.push((b'a' + from_col) as char);
            text.push('x');
        }
    } else {
        text.push_str(&piece.unwrap().kind.to_string());
        if kind.is_capture() {
            text.push('x');
        }
    }
    text.push_str(&target);
    if let Some(promotion) = kind.promotion_piece() {
        text.push('=');
        text.push_str(&promotion.to_string());
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Board, fen::INITIAL_POSITION};

    fn lookup(board: &Board) -> impl Fn(u8) -> Option<Piece> + '_ {
        |square| board.piece_on_square(square)
    }

    #[test]
    fn test_square_name() {
        assert_eq!(square_name(0), "a8");
        assert_eq!(square_name(63), "h1");
        assert_eq!(square_name(4 * 8 + 4), "e4");
    }

    #[test]
    fn test_pawn_and_piece_moves() {
        let board = Board::from_fen(INITIAL_POSITION).unwrap();
        assert_eq!(
            render(Move::from_cells(6, 4, 4, 4, MoveKind::DoublePawnPush), lookup(&board)),
            "e4"
        );
        assert_eq!(
            render(Move::from_cells(7, 6, 5, 5, MoveKind::Quiet), lookup(&board)),
            "Nf3"
        );
    }

    #[test]
    fn test_captures() {
        let board = Board::from_fen("rnbqkbnr/ppp1pppp/8/3p4/4P3/8/PPPP1PPP/RNBQKBNR w KQkq d6 0 2").unwrap();
        assert_eq!(
            render(Move::from_cells(4, 4, 3, 3, MoveKind::Capture), lookup(&board)),
            "exd5"
        );

        let board = Board::from_fen("rnbqkb1r/pppppppp/5n2/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 2").unwrap();
        assert_eq!(
            render(Move::from_cells(2, 5, 4, 4, MoveKind::Capture), lookup(&board)),
            "Nxe4"
        );
    }

    #[test]
    fn test_castles() {
        let board = Board::from_fen("4k3/8/8/8/8/8/8/R3K2R w KQ - 0 1").unwrap();
        assert_eq!(
            render(Move::from_cells(7, 4, 7, 7, MoveKind::KingCastle), lookup(&board)),
            "O-O"
        );
        assert_eq!(
            render(Move::from_cells(7, 4, 7, 0, MoveKind::QueenCastle), lookup(&board)),
            "O-O-O"
        );
    }

    #[test]
    fn test_promotions() {
        let board = Board::from_fen("1r2k3/P7/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        assert_eq!(
            render(Move::from_cells(1, 0, 0, 0, MoveKind::QueenPromotion), lookup(&board)),
            "a8=Q"
        );
        assert_eq!(
            render(
                Move::from_cells(1, 0, 0, 1, MoveKind::RookPromotionCapture),
                lookup(&board)
            ),
            "axb8=R"
        );
    }
}
