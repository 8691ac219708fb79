use crate::coords::{row_col_to_square, square_to_row_col};
use std::fmt;

const SQUARE_MASK: u16 = 0x3f;
const KIND_MASK: u16 = 0xf;
const FROM_SHIFT: u16 = 6;
const KIND_SHIFT: u16 = 12;

/// Classification of a move. The promotion ordinals are a wire contract shared
/// with the promotion picker: capture promotions sit exactly four above their
/// quiet counterparts, and each group runs Knight, Bishop, Rook, Queen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum MoveKind {
    Quiet = 0,
    DoublePawnPush = 1,
    KingCastle = 2,
    QueenCastle = 3,
    Capture = 4,
    EnPassant = 5,
    // 6 and 7 are reserved
    KnightPromotion = 8,
    BishopPromotion = 9,
    RookPromotion = 10,
    QueenPromotion = 11,
    KnightPromotionCapture = 12,
    BishopPromotionCapture = 13,
    RookPromotionCapture = 14,
    QueenPromotionCapture = 15,
}

impl MoveKind {
    fn from_bits(bits: u16) -> Self {
        match bits {
            0 => MoveKind::Quiet,
            1 => MoveKind::DoublePawnPush,
            2 => MoveKind::KingCastle,
            3 => MoveKind::QueenCastle,
            4 => MoveKind::Capture,
            5 => MoveKind::EnPassant,
            8 => MoveKind::KnightPromotion,
            9 => MoveKind::BishopPromotion,
            10 => MoveKind::RookPromotion,
            11 => MoveKind::QueenPromotion,
            12 => MoveKind::KnightPromotionCapture,
            13 => MoveKind::BishopPromotionCapture,
            14 => MoveKind::RookPromotionCapture,
            15 => MoveKind::QueenPromotionCapture,
            _ => panic!("reserved move kind: {}", bits),
        }
    }

    pub fn is_capture(self) -> bool {
        matches!(self, MoveKind::Capture | MoveKind::EnPassant) || self as u16 > MoveKind::QueenPromotion as u16
    }

    pub fn is_castle(self) -> bool {
        matches!(self, MoveKind::KingCastle | MoveKind::QueenCastle)
    }

    pub fn is_promotion(self) -> bool {
        self as u16 >= MoveKind::KnightPromotion as u16
    }

    /// The two codes a freshly validated promotion move carries while the
    /// user's piece choice is still pending.
    pub fn is_queen_promotion(self) -> bool {
        matches!(self, MoveKind::QueenPromotion | MoveKind::QueenPromotionCapture)
    }

    pub fn promotion_piece(self) -> Option<crate::board::PieceType> {
        use crate::board::PieceType;
        match self {
            MoveKind::KnightPromotion | MoveKind::KnightPromotionCapture => Some(PieceType::Knight),
            MoveKind::BishopPromotion | MoveKind::BishopPromotionCapture => Some(PieceType::Bishop),
            MoveKind::RookPromotion | MoveKind::RookPromotionCapture => Some(PieceType::Rook),
            MoveKind::QueenPromotion | MoveKind::QueenPromotionCapture => Some(PieceType::Queen),
            _ => None,
        }
    }
}

/// A move packed into 16 bits: destination square in bits 0-5, source square
/// in bits 6-11, move kind in bits 12-15. Out-of-range inputs are truncated
/// by the masks; keeping squares in 0..64 is the caller's contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Move(u16);

impl Move {
    pub fn new(from: u8, to: u8, kind: MoveKind) -> Self {
        Move(((kind as u16 & KIND_MASK) << KIND_SHIFT)
            | ((from as u16 & SQUARE_MASK) << FROM_SHIFT)
            | (to as u16 & SQUARE_MASK))
    }

    pub fn from_cells(from_row: u8, from_col: u8, to_row: u8, to_col: u8, kind: MoveKind) -> Self {
        Move::new(
            row_col_to_square(from_row, from_col),
            row_col_to_square(to_row, to_col),
            kind,
        )
    }

    pub fn from_square(self) -> u8 {
        ((self.0 >> FROM_SHIFT) & SQUARE_MASK) as u8
    }

    pub fn to_square(self) -> u8 {
        (self.0 & SQUARE_MASK) as u8
    }

    pub fn kind(self) -> MoveKind {
        MoveKind::from_bits((self.0 >> KIND_SHIFT) & KIND_MASK)
    }

    /// Resolves a pending queen-promotion move with the user's choice, given
    /// as the screen column of the picker: 2=Queen, 3=Rook, 4=Bishop,
    /// 5=Knight. Only the kind bits change; from/to are preserved.
    pub fn with_promotion_choice(self, column: u8) -> Self {
        assert!(
            (2..=5).contains(&column),
            "promotion choice column out of range: {}",
            column
        );
        debug_assert!(self.kind().is_queen_promotion());
        let is_capture = (self.0 >> KIND_SHIFT) > MoveKind::QueenPromotion as u16;
        let base = if is_capture {
            MoveKind::QueenPromotionCapture
        } else {
            MoveKind::QueenPromotion
        };
        let offset = (column - 2) as u16;
        Move((self.0 & !(KIND_MASK << KIND_SHIFT)) | ((base as u16 - offset) << KIND_SHIFT))
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (from_row, from_col) = square_to_row_col(self.from_square());
        let (to_row, to_col) = square_to_row_col(self.to_square());
        write!(
            f,
            "{}{}{}{}",
            (b'a' + from_col) as char,
            8 - from_row,
            (b'a' + to_col) as char,
            8 - to_row
        )?;
        if let Some(piece) = self.kind().promotion_piece() {
            write!(f, "{}", piece.to_string().to_lowercase())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_decode_round_trip() {
        for from in 0..64u8 {
            let to = 63 - from;
            let mv = Move::new(from, to, MoveKind::Capture);
            assert_eq!(mv.from_square(), from);
            assert_eq!(mv.to_square(), to);
            assert_eq!(mv.kind(), MoveKind::Capture);
        }

        let mv = Move::from_cells(6, 4, 4, 4, MoveKind::DoublePawnPush);
        assert_eq!(mv.from_square(), 6 * 8 + 4);
        assert_eq!(mv.to_square(), 4 * 8 + 4);
        assert_eq!(mv.kind(), MoveKind::DoublePawnPush);
    }

    #[test]
    fn test_promotion_ordinals_are_fixed() {
        assert_eq!(MoveKind::KnightPromotion as u16, 8);
        assert_eq!(MoveKind::BishopPromotion as u16, 9);
        assert_eq!(MoveKind::RookPromotion as u16, 10);
        assert_eq!(MoveKind::QueenPromotion as u16, 11);
        assert_eq!(MoveKind::KnightPromotionCapture as u16, 12);
        assert_eq!(MoveKind::BishopPromotionCapture as u16, 13);
        assert_eq!(MoveKind::RookPromotionCapture as u16, 14);
        assert_eq!(MoveKind::QueenPromotionCapture as u16, 15);
    }

    #[test]
    fn test_promotion_choice_table() {
        let pending = Move::from_cells(1, 0, 0, 0, MoveKind::QueenPromotion);
        let expected = [
            (2, MoveKind::QueenPromotion),
            (3, MoveKind::RookPromotion),
            (4, MoveKind::BishopPromotion),
            (5, MoveKind::KnightPromotion),
        ];
        for (column, kind) in expected {
            let resolved = pending.with_promotion_choice(column);
            assert_eq!(resolved.kind(), kind);
            assert_eq!(resolved.from_square(), pending.from_square());
            assert_eq!(resolved.to_square(), pending.to_square());
        }

        let pending = Move::from_cells(1, 0, 0, 1, MoveKind::QueenPromotionCapture);
        let expected = [
            (2, MoveKind::QueenPromotionCapture),
            (3, MoveKind::RookPromotionCapture),
            (4, MoveKind::BishopPromotionCapture),
            (5, MoveKind::KnightPromotionCapture),
        ];
        for (column, kind) in expected {
            assert_eq!(pending.with_promotion_choice(column).kind(), kind);
        }
    }

    #[test]
    #[should_panic(expected = "promotion choice column out of range")]
    fn test_promotion_choice_out_of_range_panics() {
        Move::from_cells(1, 0, 0, 0, MoveKind::QueenPromotion).with_promotion_choice(6);
    }

    #[test]
    fn test_capture_predicate() {
        assert!(MoveKind::Capture.is_capture());
        assert!(MoveKind::EnPassant.is_capture());
        assert!(MoveKind::RookPromotionCapture.is_capture());
        assert!(!MoveKind::Quiet.is_capture());
        assert!(!MoveKind::QueenPromotion.is_capture());
        assert!(!MoveKind::KingCastle.is_capture());
    }

    #[test]
    fn test_display() {
        assert_eq!(Move::from_cells(6, 4, 4, 4, MoveKind::DoublePawnPush).to_string(), "e2e4");
        assert_eq!(
            Move::from_cells(1, 0, 0, 0, MoveKind::QueenPromotion).to_string(),
            "a7a8q"
        );
    }
}
