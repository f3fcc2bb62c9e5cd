use std::{fmt::Debug, num::NonZeroU32};

use bitflags::bitflags;
use num_traits::FromPrimitive;

use super::{Piece, PieceType, Square};

bitflags! {
    /// Markers for moves that need special handling when applied.
    ///
    /// At most one flag is set on any move.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct MoveFlags: u32 {
        /// The initial two-square advance of a pawn; opens the en passant
        /// window for the reply.
        const DOUBLE_PAWN_PUSH = 0b001 << 28;
        /// A castling move. Encoded as the two-square king move; the rook's
        /// relocation is implied.
        const CASTLE           = 0b010 << 28;
        /// An en passant capture; the captured pawn is not on the
        /// destination square.
        const EN_PASSANT       = 0b100 << 28;
    }
}

/// A move, packed into 32 bits.
///
/// Carries everything needed to apply the move to the position it was
/// generated for: squares, the moving piece, any captured piece, any
/// promotion target, and the special-move flags.
///
/// ```txt
/// bits  0..6   from square
/// bits  6..12  to square
/// bits 12..16  captured piece code (0 if none)
/// bits 16..20  moved piece code (never 0, giving the NonZeroU32 niche)
/// bits 20..23  promotion kind (0 if none)
/// bits 28..31  flags
/// ```
///
/// Moves are only ever built by the move generator (via [`MoveBuilder`]), so
/// a `Move` in client hands is one the engine itself produced.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Move(NonZeroU32);

const TO_SHIFT: u32 = 6;
const CAPTURED_SHIFT: u32 = 12;
const PIECE_SHIFT: u32 = 16;
const PROMOTION_SHIFT: u32 = 20;

impl Move {
    pub(crate) const fn new(
        from: Square,
        to: Square,
        piece: Piece,
        captured: Option<Piece>,
        promotion: Option<PieceType>,
        flags: MoveFlags,
    ) -> Self {
        let captured = match captured {
            Some(piece) => piece.code() as u32,
            None => 0,
        };
        let promotion = match promotion {
            Some(kind) => kind as u32,
            None => 0,
        };

        let bits = flags.bits()
            | (promotion << PROMOTION_SHIFT)
            | ((piece.code() as u32) << PIECE_SHIFT)
            | (captured << CAPTURED_SHIFT)
            | ((to.get() as u32) << TO_SHIFT)
            | from.get() as u32;

        // Safety: the moved piece code is never 0
        unsafe { Self(NonZeroU32::new_unchecked(bits)) }
    }

    pub const fn from_square(self) -> Square {
        Square::from_index_unchecked((self.0.get() & 0x3F) as usize)
    }

    pub const fn to_square(self) -> Square {
        Square::from_index_unchecked(((self.0.get() >> TO_SHIFT) & 0x3F) as usize)
    }

    /// The piece being moved.
    pub fn piece(self) -> Piece {
        Piece::from_code(((self.0.get() >> PIECE_SHIFT) & 0x0F) as u8)
            .expect("move encodes a valid moved piece")
    }

    /// The captured piece, if any. It sits on [`to_square`](Self::to_square)
    /// unless this is an en passant capture, in which case it sits on
    /// [`en_passant_victim`](Self::en_passant_victim).
    pub const fn captured_piece(self) -> Option<Piece> {
        Piece::from_code(((self.0.get() >> CAPTURED_SHIFT) & 0x0F) as u8)
    }

    /// For a pawn move onto the final rank, the kind the pawn becomes.
    pub fn promotion(self) -> Option<PieceType> {
        PieceType::from_u32((self.0.get() >> PROMOTION_SHIFT) & 0x07)
    }

    pub const fn flags(self) -> MoveFlags {
        MoveFlags::from_bits_truncate(self.0.get())
    }

    pub const fn is_capture(self) -> bool {
        self.captured_piece().is_some()
    }

    pub const fn is_double_pawn_push(self) -> bool {
        self.flags().contains(MoveFlags::DOUBLE_PAWN_PUSH)
    }

    pub const fn is_castle(self) -> bool {
        self.flags().contains(MoveFlags::CASTLE)
    }

    pub const fn is_en_passant(self) -> bool {
        self.flags().contains(MoveFlags::EN_PASSANT)
    }

    /// Whether the moved piece is of the given kind.
    pub const fn is_move_of(self, piece_type: PieceType) -> bool {
        ((self.0.get() >> PIECE_SHIFT) & 0x07) as u8 == piece_type as u8
    }

    /// For an en passant capture, the square the captured pawn stands on:
    /// the from-square's rank crossed with the to-square's file.
    pub const fn en_passant_victim(self) -> Square {
        Square::new_unchecked(self.from_square().rank(), self.to_square().file())
    }

    /// For a castling move, the rook's start and end squares. (The move's
    /// own squares describe the king.)
    pub const fn castling_rook_squares(self) -> (Square, Square) {
        let (from, to) = (self.from_square(), self.to_square());
        let rook_from = Square::new_unchecked(
            from.rank(),
            if from.file() < to.file() { 7 } else { 0 },
        );
        let rook_to = Square::new_unchecked(from.rank(), (from.file() + to.file()) / 2);
        (rook_from, rook_to)
    }

    pub(crate) const fn builder(from: Square, to: Square, piece: Piece) -> MoveBuilder {
        MoveBuilder::new(from, to, piece)
    }
}

impl Debug for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Move")
            .field("from", &self.from_square())
            .field("to", &self.to_square())
            .field("piece", &self.piece())
            .field("captured_piece", &self.captured_piece())
            .field("promotion", &self.promotion())
            .field("flags", &self.flags())
            .finish()
    }
}

/// Incremental construction of a [`Move`], for the generator's benefit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct MoveBuilder {
    from: Square,
    to: Square,
    piece: Piece,
    captured: Option<Piece>,
    promotion: Option<PieceType>,
    flags: MoveFlags,
}

impl MoveBuilder {
    pub const fn new(from: Square, to: Square, piece: Piece) -> Self {
        Self {
            from,
            to,
            piece,
            captured: None,
            promotion: None,
            flags: MoveFlags::empty(),
        }
    }

    pub const fn captures(self, captured: Piece) -> Self {
        Self {
            captured: Some(captured),
            ..self
        }
    }

    pub const fn promotes_to(self, kind: PieceType) -> Self {
        Self {
            promotion: Some(kind),
            ..self
        }
    }

    pub const fn double_pawn_push(self) -> Self {
        Self {
            flags: MoveFlags::DOUBLE_PAWN_PUSH,
            ..self
        }
    }

    pub const fn castle(self) -> Self {
        Self {
            flags: MoveFlags::CASTLE,
            ..self
        }
    }

    pub const fn en_passant(self) -> Self {
        Self {
            flags: MoveFlags::EN_PASSANT,
            ..self
        }
    }

    pub const fn build(self) -> Move {
        Move::new(
            self.from,
            self.to,
            self.piece,
            self.captured,
            self.promotion,
            self.flags,
        )
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    struct Case {
        builder: MoveBuilder,
        captured: Option<Piece>,
        promotion: Option<PieceType>,
        flags: MoveFlags,
    }

    fn cases() -> Vec<Case> {
        vec![
            Case {
                builder: MoveBuilder::new(Square::G1, Square::F3, Piece::WHITE_KNIGHT),
                captured: None,
                promotion: None,
                flags: MoveFlags::empty(),
            },
            Case {
                builder: MoveBuilder::new(Square::E2, Square::E4, Piece::WHITE_PAWN)
                    .double_pawn_push(),
                captured: None,
                promotion: None,
                flags: MoveFlags::DOUBLE_PAWN_PUSH,
            },
            Case {
                builder: MoveBuilder::new(Square::D3, Square::H7, Piece::BLACK_BISHOP)
                    .captures(Piece::WHITE_QUEEN),
                captured: Some(Piece::WHITE_QUEEN),
                promotion: None,
                flags: MoveFlags::empty(),
            },
            Case {
                builder: MoveBuilder::new(Square::B5, Square::A6, Piece::WHITE_PAWN)
                    .captures(Piece::BLACK_PAWN)
                    .en_passant(),
                captured: Some(Piece::BLACK_PAWN),
                promotion: None,
                flags: MoveFlags::EN_PASSANT,
            },
            Case {
                builder: MoveBuilder::new(Square::H2, Square::G1, Piece::BLACK_PAWN)
                    .captures(Piece::WHITE_ROOK)
                    .promotes_to(PieceType::Queen),
                captured: Some(Piece::WHITE_ROOK),
                promotion: Some(PieceType::Queen),
                flags: MoveFlags::empty(),
            },
            Case {
                builder: MoveBuilder::new(Square::E8, Square::C8, Piece::BLACK_KING).castle(),
                captured: None,
                promotion: None,
                flags: MoveFlags::CASTLE,
            },
        ]
    }

    #[test]
    fn pack_and_unpack() {
        for case in cases() {
            let mv = case.builder.build();
            let rebuilt = MoveBuilder::new(mv.from_square(), mv.to_square(), mv.piece());
            assert_eq!(rebuilt.from, case.builder.from);
            assert_eq!(rebuilt.to, case.builder.to);
            assert_eq!(rebuilt.piece, case.builder.piece);
            assert_eq!(mv.captured_piece(), case.captured);
            assert_eq!(mv.promotion(), case.promotion);
            assert_eq!(mv.flags(), case.flags);
        }
    }

    #[test]
    fn flag_queries() {
        let ep = MoveBuilder::new(Square::F4, Square::G3, Piece::BLACK_PAWN)
            .captures(Piece::WHITE_PAWN)
            .en_passant()
            .build();
        assert!(ep.is_en_passant());
        assert!(ep.is_capture());
        assert!(!ep.is_castle());
        assert!(!ep.is_double_pawn_push());

        let castle = MoveBuilder::new(Square::E1, Square::G1, Piece::WHITE_KING)
            .castle()
            .build();
        assert!(castle.is_castle());
        assert!(!castle.is_capture());
    }

    #[test]
    fn is_move_of() {
        let mv = MoveBuilder::new(Square::E2, Square::E3, Piece::WHITE_PAWN).build();
        assert!(mv.is_move_of(PieceType::Pawn));
        assert!(!mv.is_move_of(PieceType::King));
    }

    #[test]
    fn en_passant_victim_square() {
        let mv = MoveBuilder::new(Square::B5, Square::A6, Piece::WHITE_PAWN)
            .captures(Piece::BLACK_PAWN)
            .en_passant()
            .build();
        assert_eq!(mv.en_passant_victim(), Square::A5);
    }

    #[test]
    fn castling_rook_squares() {
        let short = MoveBuilder::new(Square::E1, Square::G1, Piece::WHITE_KING)
            .castle()
            .build();
        assert_eq!(short.castling_rook_squares(), (Square::H1, Square::F1));

        let long = MoveBuilder::new(Square::E8, Square::C8, Piece::BLACK_KING)
            .castle()
            .build();
        assert_eq!(long.castling_rook_squares(), (Square::A8, Square::D8));
    }
}
