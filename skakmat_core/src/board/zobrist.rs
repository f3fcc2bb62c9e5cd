use std::{
    fmt::Debug,
    ops::{BitXor, BitXorAssign},
    sync::OnceLock,
};

use rand::{RngCore, SeedableRng};

use super::{Castling, Color, Grid, Piece, Square};

/// A Zobrist key identifying a position for the repetition rule.
///
/// Two positions compare equal exactly when they agree on piece placement,
/// side to move, castling rights, and en passant target — the identity the
/// threefold-repetition rule is defined over. Keys are XOR-composed from a
/// fixed table, so they are stable across runs.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ZobristKey(pub u64);

impl ZobristKey {
    /// Computes the key of a full position.
    pub fn of(
        grid: &Grid,
        to_move: Color,
        castling: Castling,
        en_passant: Option<Square>,
    ) -> Self {
        let table = ZobristTable::get_instance();

        let mut key = ZobristKey::default();
        for (square, piece) in grid.pieces() {
            key ^= Self::piece(piece, square);
        }
        if !to_move.is_white() {
            key ^= ZobristKey(table.black_to_move);
        }
        key ^= ZobristKey(table.castling[castling.bits() as usize]);
        if let Some(square) = en_passant {
            key ^= ZobristKey(table.en_passant_file[square.file() as usize]);
        }
        key
    }

    fn piece(piece: Piece, square: Square) -> Self {
        let table = ZobristTable::get_instance();
        Self(table.pieces[piece.code() as usize][square.index()])
    }
}

impl BitXor for ZobristKey {
    type Output = Self;

    fn bitxor(self, rhs: Self) -> Self::Output {
        Self(self.0 ^ rhs.0)
    }
}

impl BitXorAssign for ZobristKey {
    fn bitxor_assign(&mut self, rhs: Self) {
        *self = *self ^ rhs;
    }
}

impl Debug for ZobristKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ZobristKey")
            .field(&format_args!("{:#018x}", self.0))
            .finish()
    }
}

/// The random tables backing [`ZobristKey`]. Piece rows are indexed by the
/// 4-bit piece code (some rows unused), en passant by file only: the rank of
/// a target square is implied by the side to move, which has its own key.
struct ZobristTable {
    pieces: [[u64; 64]; 16],
    black_to_move: u64,
    castling: [u64; 16],
    en_passant_file: [u64; 8],
}

impl ZobristTable {
    fn new() -> Self {
        // Fixed seed: keys must not vary between runs or across the
        // library's users, or stored game records would disagree on
        // repetition.
        let mut rng = rand_chacha::ChaCha12Rng::from_seed([
            0x5e, 0x21, 0xc9, 0x07, 0x44, 0xba, 0x3d, 0xee, 0x81, 0x06, 0x5a, 0x19, 0xd4, 0x40,
            0x9f, 0x62, 0x33, 0xfd, 0x0b, 0x77, 0xa8, 0x54, 0xe0, 0x2c, 0x48, 0x8b, 0xc1, 0x3a,
            0x96, 0x11, 0x6d, 0xf5,
        ]);

        let mut pieces = [[0u64; 64]; 16];
        for row in pieces.iter_mut() {
            row.fill_with(|| rng.next_u64());
        }

        let black_to_move = rng.next_u64();

        let mut castling = [0u64; 16];
        castling.fill_with(|| rng.next_u64());

        let mut en_passant_file = [0u64; 8];
        en_passant_file.fill_with(|| rng.next_u64());

        Self {
            pieces,
            black_to_move,
            castling,
            en_passant_file,
        }
    }

    fn get_instance() -> &'static Self {
        static INSTANCE: OnceLock<ZobristTable> = OnceLock::new();
        INSTANCE.get_or_init(Self::new)
    }
}
