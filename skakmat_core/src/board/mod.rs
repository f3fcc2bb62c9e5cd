//! The board representation: squares, pieces, positions, and moves.

mod castling;
mod coord_move;
mod fen;
mod grid;
mod move_repr;
mod piece;
mod san;
mod square;
mod zobrist;

use thiserror::Error;

pub use castling::Castling;
pub use coord_move::{CoordMove, ParseCoordMoveError};
pub use fen::FenError;
pub use grid::Grid;
pub use move_repr::{Move, MoveFlags};
pub(crate) use move_repr::MoveBuilder;
pub use piece::{Color, Piece, PieceType};
pub use san::San;
pub use square::{OutOfBoundsError, ParseSquareError, Square};
pub use zobrist::ZobristKey;

use crate::move_gen::{self, MoveVec};

pub const STARTING_POSITION_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// A move that is not in the legal set of the position it was offered to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("move {from}{to} is not legal in this position")]
pub struct InvalidMoveError {
    pub from: Square,
    pub to: Square,
}

impl InvalidMoveError {
    pub(crate) fn new(mv: Move) -> Self {
        Self {
            from: mv.from_square(),
            to: mv.to_square(),
        }
    }
}

/// A starting configuration that violates the basic board invariants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum IllegalSetupError {
    #[error("no {0} king on the board")]
    MissingKing(Color),
    #[error("more than one {0} king on the board")]
    MultipleKings(Color),
    #[error("pawn on its back rank at {0}")]
    PawnOnBackRank(Square),
    #[error("en passant target {0} does not follow a double pawn push")]
    BadEnPassantTarget(Square),
    #[error("castling rights claimed without the king and rook on their home squares")]
    InconsistentCastlingRights(Castling),
    #[error("the side not to move is in check")]
    OpponentInCheck,
}

/// A full game position: piece placement plus side to move, castling rights,
/// en passant target, and the two move counters.
///
/// A `Position` is a value. [`apply_move`](Self::apply_move) does not touch
/// the receiver; it hands back the successor position, so a rejected move
/// can never leave partial mutations behind, and history keeps earlier
/// positions around at no extra bookkeeping cost.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    grid: Grid,
    to_move: Color,
    castling: Castling,
    en_passant: Option<Square>,
    halfmove_clock: u32,
    fullmoves: u32,
    key: ZobristKey,
}

impl Position {
    /// Builds and validates a position from its parts.
    ///
    /// Validation enforces the invariants the rest of the engine depends on:
    /// exactly one king per side, no pawns on promotion ranks, an en passant
    /// target consistent with the side to move, castling rights matched by
    /// their king and rook, and the side that just moved not left in check.
    pub fn new(
        cells: [Option<Piece>; 64],
        to_move: Color,
        castling: Castling,
        en_passant: Option<Square>,
        halfmove_clock: u32,
        fullmoves: u32,
    ) -> Result<Self, IllegalSetupError> {
        let grid = Grid::from_array(cells);
        validate_setup(&grid, to_move, castling, en_passant)?;

        let key = ZobristKey::of(&grid, to_move, castling, en_passant);
        Ok(Self {
            grid,
            to_move,
            castling,
            en_passant,
            halfmove_clock,
            fullmoves,
            key,
        })
    }

    /// The standard initial setup, white to move.
    pub fn starting_position() -> Self {
        Self::try_parse_fen(STARTING_POSITION_FEN).expect("starting position FEN is valid")
    }

    /// Parses a position from Forsyth-Edwards Notation.
    pub fn try_parse_fen(fen: &str) -> Result<Self, FenError> {
        fen::parse(fen)
    }

    /// This position in Forsyth-Edwards Notation.
    pub fn fen(&self) -> String {
        fen::format(self)
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.grid.piece_at(square)
    }

    pub fn to_move(&self) -> Color {
        self.to_move
    }

    pub fn castling(&self) -> Castling {
        self.castling
    }

    pub fn en_passant(&self) -> Option<Square> {
        self.en_passant
    }

    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    pub fn fullmove_number(&self) -> u32 {
        self.fullmoves
    }

    /// The Zobrist key identifying this position for the repetition rule.
    pub fn repetition_key(&self) -> ZobristKey {
        self.key
    }

    /// All legal moves for the side to move.
    pub fn legal_moves(&self) -> MoveVec {
        move_gen::legal_moves(self)
    }

    /// The legal moves leaving `from` — what a front end highlights for a
    /// selected piece.
    pub fn moves_from(&self, from: Square) -> MoveVec {
        let mut moves = self.legal_moves();
        moves.retain(|mv| mv.from_square() == from);
        moves
    }

    /// Looks up the legal move matching a from/to/promotion description, the
    /// form collaborators (a front end's drag-and-drop, an AI's coordinate
    /// reply) describe moves in. Returns [`None`] when no legal move
    /// matches.
    pub fn find_move(
        &self,
        from: Square,
        to: Square,
        promotion: Option<PieceType>,
    ) -> Option<Move> {
        self.legal_moves()
            .iter()
            .copied()
            .find(|mv| {
                mv.from_square() == from && mv.to_square() == to && mv.promotion() == promotion
            })
    }

    /// Whether the side to move's king is attacked.
    pub fn is_in_check(&self) -> bool {
        match self.grid.king_square(self.to_move) {
            Some(king) => move_gen::is_square_attacked(&self.grid, king, self.to_move.opponent()),
            None => false,
        }
    }

    /// Applies a legal move, producing the successor position.
    ///
    /// Fails with [`InvalidMoveError`] unless `mv` is a member of
    /// [`legal_moves`](Self::legal_moves); the receiver is untouched either
    /// way.
    pub fn apply_move(&self, mv: Move) -> Result<Position, InvalidMoveError> {
        if !self.legal_moves().contains(&mv) {
            return Err(InvalidMoveError::new(mv));
        }
        Ok(self.apply_unchecked(mv))
    }

    /// Applies a move that is known to be legal for this position.
    pub(crate) fn apply_unchecked(&self, mv: Move) -> Position {
        let mut grid = self.grid;
        grid.apply_unchecked(mv);

        // Rights are lost when the king or a rook leaves its home square,
        // and when a capture lands on a rook's home square.
        let castling = self.castling
            & !Castling::revoked_by(mv.from_square())
            & !Castling::revoked_by(mv.to_square());

        let en_passant = if mv.is_double_pawn_push() {
            mv.from_square().offset(self.to_move.pawn_direction(), 0)
        } else {
            None
        };

        let halfmove_clock = if mv.is_move_of(PieceType::Pawn) || mv.is_capture() {
            0
        } else {
            self.halfmove_clock + 1
        };

        let fullmoves = match self.to_move {
            Color::White => self.fullmoves,
            Color::Black => self.fullmoves + 1,
        };

        let to_move = self.to_move.opponent();
        let key = ZobristKey::of(&grid, to_move, castling, en_passant);

        Position {
            grid,
            to_move,
            castling,
            en_passant,
            halfmove_clock,
            fullmoves,
            key,
        }
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::starting_position()
    }
}

fn validate_setup(
    grid: &Grid,
    to_move: Color,
    castling: Castling,
    en_passant: Option<Square>,
) -> Result<(), IllegalSetupError> {
    for color in [Color::White, Color::Black] {
        match grid.count_of(color, PieceType::King) {
            0 => return Err(IllegalSetupError::MissingKing(color)),
            1 => (),
            _ => return Err(IllegalSetupError::MultipleKings(color)),
        }
    }

    for (square, piece) in grid.pieces() {
        if piece.piece_type() == PieceType::Pawn && (square.rank() == 0 || square.rank() == 7) {
            return Err(IllegalSetupError::PawnOnBackRank(square));
        }
    }

    if let Some(target) = en_passant {
        // A valid target sits on the rank the opposing pawn skipped, with
        // the pushed pawn directly behind it.
        let (target_rank, pawn_offset) = match to_move {
            Color::White => (5, -1),
            Color::Black => (2, 1),
        };
        let pushed_pawn = Piece::new(to_move.opponent(), PieceType::Pawn);
        let consistent = target.rank() == target_rank
            && grid.piece_at(target).is_none()
            && target
                .offset(pawn_offset, 0)
                .is_some_and(|sq| grid.piece_at(sq) == Some(pushed_pawn));
        if !consistent {
            return Err(IllegalSetupError::BadEnPassantTarget(target));
        }
    }

    let mut unmatched = Castling::empty();
    for color in [Color::White, Color::Black] {
        let home = color.home_rank();
        let king_at_home = grid.piece_at(Square::new_unchecked(home, 4))
            == Some(Piece::new(color, PieceType::King));
        let rook = Some(Piece::new(color, PieceType::Rook));

        let kingside = Castling::kingside(color);
        if castling.contains(kingside)
            && !(king_at_home && grid.piece_at(Square::new_unchecked(home, 7)) == rook)
        {
            unmatched |= kingside;
        }

        let queenside = Castling::queenside(color);
        if castling.contains(queenside)
            && !(king_at_home && grid.piece_at(Square::new_unchecked(home, 0)) == rook)
        {
            unmatched |= queenside;
        }
    }
    if !unmatched.is_empty() {
        return Err(IllegalSetupError::InconsistentCastlingRights(unmatched));
    }

    let opponent = to_move.opponent();
    if let Some(their_king) = grid.king_square(opponent) {
        if move_gen::is_square_attacked(grid, their_king, to_move) {
            return Err(IllegalSetupError::OpponentInCheck);
        }
    }

    Ok(())
}
