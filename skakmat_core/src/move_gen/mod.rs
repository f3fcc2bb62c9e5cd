//! Move generation and attack queries.
//!
//! Generation runs in two stages: pseudo-legal moves per piece movement
//! pattern, then a legality filter that applies each candidate to a scratch
//! grid and rejects it if the mover's own king ends up attacked. Castling is
//! generated with its extra conditions checked up front.

use arrayvec::ArrayVec;

use crate::board::{Castling, Color, Grid, Move, Piece, PieceType, Position, Square};

/// Upper bound on the number of legal moves in any position, sized for
/// stack-allocated move lists. The known maximum for a legal position is
/// 218; 256 leaves headroom.
pub const MAX_MOVES: usize = 256;

/// A stack-allocated list of moves.
pub type MoveVec = ArrayVec<Move, MAX_MOVES>;

/// Promotion targets, in the order they are generated.
const PROMOTION_TARGETS: [PieceType; 4] = [
    PieceType::Queen,
    PieceType::Knight,
    PieceType::Rook,
    PieceType::Bishop,
];

const KNIGHT_JUMPS: [(i8, i8); 8] = [
    (2, 1),
    (1, 2),
    (-1, 2),
    (-2, 1),
    (-2, -1),
    (-1, -2),
    (1, -2),
    (2, -1),
];

const KING_STEPS: [(i8, i8); 8] = [
    (1, -1),
    (1, 0),
    (1, 1),
    (0, -1),
    (0, 1),
    (-1, -1),
    (-1, 0),
    (-1, 1),
];

const BISHOP_RAYS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];
const ROOK_RAYS: [(i8, i8); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

/// Generates all legal moves for the side to move in `position`.
pub(crate) fn legal_moves(position: &Position) -> MoveVec {
    let mover = position.to_move();

    let mut candidates = MoveVec::new();
    MoveGenerator {
        grid: *position.grid(),
        to_move: mover,
        en_passant: position.en_passant(),
        castling: position.castling(),
        out_moves: &mut candidates,
    }
    .generate();

    // Keep only the candidates that leave the mover's king safe.
    let mut legal = MoveVec::new();
    for mv in candidates {
        let mut grid = *position.grid();
        grid.apply_unchecked(mv);

        let king_safe = match grid.king_square(mover) {
            Some(king) => !is_square_attacked(&grid, king, mover.opponent()),
            None => false,
        };
        if king_safe {
            legal.push(mv);
        }
    }

    legal
}

/// Whether any piece of `by` attacks `target` on `grid`.
///
/// This is the one attack query in the engine; check detection, castling
/// legality, terminal-state classification, and SAN suffixes all route
/// through it.
pub(crate) fn is_square_attacked(grid: &Grid, target: Square, by: Color) -> bool {
    // A pawn of `by` attacks `target` if it stands one rank back of it on an
    // adjacent file.
    let pawn = Piece::new(by, PieceType::Pawn);
    for delta_file in [-1, 1] {
        if let Some(square) = target.offset(-by.pawn_direction(), delta_file) {
            if grid.piece_at(square) == Some(pawn) {
                return true;
            }
        }
    }

    let knight = Piece::new(by, PieceType::Knight);
    for &(dr, df) in &KNIGHT_JUMPS {
        if let Some(square) = target.offset(dr, df) {
            if grid.piece_at(square) == Some(knight) {
                return true;
            }
        }
    }

    let king = Piece::new(by, PieceType::King);
    for &(dr, df) in &KING_STEPS {
        if let Some(square) = target.offset(dr, df) {
            if grid.piece_at(square) == Some(king) {
                return true;
            }
        }
    }

    for &(dr, df) in &BISHOP_RAYS {
        if let Some(piece) = first_piece_on_ray(grid, target, dr, df) {
            if piece.color() == by
                && matches!(piece.piece_type(), PieceType::Bishop | PieceType::Queen)
            {
                return true;
            }
        }
    }

    for &(dr, df) in &ROOK_RAYS {
        if let Some(piece) = first_piece_on_ray(grid, target, dr, df) {
            if piece.color() == by
                && matches!(piece.piece_type(), PieceType::Rook | PieceType::Queen)
            {
                return true;
            }
        }
    }

    false
}

fn first_piece_on_ray(grid: &Grid, from: Square, dr: i8, df: i8) -> Option<Piece> {
    let mut square = from;
    while let Some(next) = square.offset(dr, df) {
        if let Some(piece) = grid.piece_at(next) {
            return Some(piece);
        }
        square = next;
    }
    None
}

struct MoveGenerator<'moves> {
    grid: Grid,
    to_move: Color,
    en_passant: Option<Square>,
    castling: Castling,
    out_moves: &'moves mut MoveVec,
}

impl MoveGenerator<'_> {
    fn generate(mut self) {
        for square in Square::all() {
            let Some(piece) = self.grid.piece_at(square) else {
                continue;
            };
            if piece.color() != self.to_move {
                continue;
            }

            match piece.piece_type() {
                PieceType::Pawn => self.pawn_moves(square, piece),
                PieceType::Knight => self.leaper_moves(square, piece, &KNIGHT_JUMPS),
                PieceType::King => self.leaper_moves(square, piece, &KING_STEPS),
                PieceType::Bishop => self.slider_moves(square, piece, &BISHOP_RAYS),
                PieceType::Rook => self.slider_moves(square, piece, &ROOK_RAYS),
                PieceType::Queen => {
                    self.slider_moves(square, piece, &BISHOP_RAYS);
                    self.slider_moves(square, piece, &ROOK_RAYS);
                }
            }
        }

        self.castling_moves();
    }

    fn pawn_moves(&mut self, from: Square, piece: Piece) {
        let color = self.to_move;
        let direction = color.pawn_direction();

        if let Some(one_up) = from.offset(direction, 0) {
            if self.grid.piece_at(one_up).is_none() {
                self.pawn_advance(from, one_up, piece, None);

                if from.rank() == color.pawn_start_rank() {
                    if let Some(two_up) = one_up.offset(direction, 0) {
                        if self.grid.piece_at(two_up).is_none() {
                            self.out_moves.push(
                                Move::builder(from, two_up, piece)
                                    .double_pawn_push()
                                    .build(),
                            );
                        }
                    }
                }
            }
        }

        for delta_file in [-1, 1] {
            let Some(to) = from.offset(direction, delta_file) else {
                continue;
            };

            match self.grid.piece_at(to) {
                Some(target) if target.color() != color => {
                    self.pawn_advance(from, to, piece, Some(target));
                }
                None if self.en_passant == Some(to) => {
                    let victim = Piece::new(color.opponent(), PieceType::Pawn);
                    self.out_moves.push(
                        Move::builder(from, to, piece)
                            .captures(victim)
                            .en_passant()
                            .build(),
                    );
                }
                _ => (),
            }
        }
    }

    /// Emits a pawn push or capture, fanning out into the four promotion
    /// moves when the destination is the final rank. Promotion is mandatory:
    /// no plain pawn move onto that rank is ever produced.
    fn pawn_advance(&mut self, from: Square, to: Square, piece: Piece, captured: Option<Piece>) {
        let mut builder = Move::builder(from, to, piece);
        if let Some(captured) = captured {
            builder = builder.captures(captured);
        }

        if to.rank() == self.to_move.promotion_rank() {
            for kind in PROMOTION_TARGETS {
                self.out_moves.push(builder.promotes_to(kind).build());
            }
        } else {
            self.out_moves.push(builder.build());
        }
    }

    fn leaper_moves(&mut self, from: Square, piece: Piece, steps: &[(i8, i8)]) {
        for &(dr, df) in steps {
            let Some(to) = from.offset(dr, df) else {
                continue;
            };

            match self.grid.piece_at(to) {
                None => self.out_moves.push(Move::builder(from, to, piece).build()),
                Some(target) if target.color() != self.to_move => self
                    .out_moves
                    .push(Move::builder(from, to, piece).captures(target).build()),
                Some(_) => (),
            }
        }
    }

    fn slider_moves(&mut self, from: Square, piece: Piece, rays: &[(i8, i8)]) {
        for &(dr, df) in rays {
            let mut to = from;
            while let Some(next) = to.offset(dr, df) {
                match self.grid.piece_at(next) {
                    None => {
                        self.out_moves
                            .push(Move::builder(from, next, piece).build());
                        to = next;
                    }
                    Some(target) => {
                        if target.color() != self.to_move {
                            self.out_moves.push(
                                Move::builder(from, next, piece).captures(target).build(),
                            );
                        }
                        break;
                    }
                }
            }
        }
    }

    fn castling_moves(&mut self) {
        let color = self.to_move;
        if (self.castling & Castling::both(color)).is_empty() {
            return;
        }

        let Some(king_square) = self.grid.king_square(color) else {
            return;
        };

        // A king in check may not castle at all.
        if is_square_attacked(&self.grid, king_square, color.opponent()) {
            return;
        }

        self.try_castle(Castling::kingside(color), king_square, 5, 6, 7);
        self.try_castle(Castling::queenside(color), king_square, 3, 2, 0);
    }

    fn try_castle(
        &mut self,
        right: Castling,
        king_square: Square,
        pass_file: u8,
        to_file: u8,
        rook_file: u8,
    ) {
        if !self.castling.contains(right) {
            return;
        }

        let color = self.to_move;
        let rank = king_square.rank();
        let rook_square = Square::new_unchecked(rank, rook_file);

        if self.grid.piece_at(rook_square) != Some(Piece::new(color, PieceType::Rook)) {
            return;
        }

        // Every square between the king and the rook must be empty.
        let (low, high) = if rook_file < king_square.file() {
            (rook_file + 1, king_square.file())
        } else {
            (king_square.file() + 1, rook_file)
        };
        for file in low..high {
            if self.grid.piece_at(Square::new_unchecked(rank, file)).is_some() {
                return;
            }
        }

        // The king may not pass through or land on an attacked square.
        for file in [pass_file, to_file] {
            let square = Square::new_unchecked(rank, file);
            if is_square_attacked(&self.grid, square, color.opponent()) {
                return;
            }
        }

        let king = Piece::new(color, PieceType::King);
        let to = Square::new_unchecked(rank, to_file);
        self.out_moves
            .push(Move::builder(king_square, to, king).castle().build());
    }
}
