//! Board-to-feature encoding.
//!
//! A position becomes 189 signed integers:
//!
//! * five 32-slot positional planes (knight, bishop, rook, queen, king) at
//!   `class * 32`, addressed by `rank * 4 + file`;
//! * a pawn plane based at `5 * 32`, addressed one row lower;
//! * six material-balance slots at 183..=188 (pawn, king, queen, rook,
//!   bishop, knight).
//!
//! Ranks are taken from each piece's own side (black rows are flipped) and
//! files are folded onto a..d, so a piece and its left/right mirror land on
//! the same slot. Every write is `+= 1` for white and `+= -1` for black.
//! Side to move is not encoded.
//!
//! The pawn addressing reaches below its own block (mirrored rank 0 lands in
//! the king plane) and its upper rows overlap the material slots. These
//! addresses are part of the dataset format and must not change.

use std::fmt;
use std::str::FromStr;

use cozy_chess::{Board, Color, Piece, Square};

use crate::board::{Placement, Position};
use crate::error::{Error, Result};

pub const FEATURE_LEN: usize = 189;
pub const PLANE_LEN: usize = 32;
pub const MATERIAL_START: usize = FEATURE_LEN - CLASS_COUNT;
pub const CLASS_COUNT: usize = 6;
const PAWN_CLASS: usize = 5;

/// Class order used for both plane offsets and material slots.
pub const CLASS_ORDER: [Piece; CLASS_COUNT] = [
    Piece::Knight,
    Piece::Bishop,
    Piece::Rook,
    Piece::Queen,
    Piece::King,
    Piece::Pawn,
];

const MAX_PIECES: usize = 32;
const MAX_PIECES_PER_SIDE: usize = 16;

/// Anything that can answer "what stands on this square".
pub trait PieceSource {
    fn piece_on(&self, sq: Square) -> Option<(Piece, Color)>;
}

impl PieceSource for Board {
    fn piece_on(&self, sq: Square) -> Option<(Piece, Color)> {
        Board::piece_on(self, sq).zip(self.color_on(sq))
    }
}

impl PieceSource for Position {
    fn piece_on(&self, sq: Square) -> Option<(Piece, Color)> {
        PieceSource::piece_on(self.board(), sq)
    }
}

impl PieceSource for Placement {
    fn piece_on(&self, sq: Square) -> Option<(Piece, Color)> { self.get(sq) }
}

#[inline]
pub fn class_index(piece: Piece) -> usize {
    match piece {
        Piece::Knight => 0,
        Piece::Bishop => 1,
        Piece::Rook => 2,
        Piece::Queen => 3,
        Piece::King => 4,
        Piece::Pawn => 5,
    }
}

#[inline]
fn sign(color: Color) -> i32 {
    if color == Color::White { 1 } else { -1 }
}

/// Row seen from the piece's own side: 0 is its back rank.
#[inline]
pub fn relative_rank(sq: Square, color: Color) -> usize {
    let row = sq.rank() as usize;
    if color == Color::White { row } else { 7 - row }
}

/// Column folded onto a..d.
#[inline]
pub fn folded_file(sq: Square) -> usize {
    let col = sq.file() as usize;
    if col > 3 { 7 - col } else { col }
}

/// Slot written for a piece of `class` on (`rank`, `file`).
///
/// Pawns are addressed one row lower, so the pawn range is 156..=187 and
/// never leaves the vector.
#[inline]
pub fn plane_slot(class: usize, rank: usize, file: usize) -> usize {
    let slot = class * PLANE_LEN + rank * 4 + file;
    if class == PAWN_CLASS { slot - 4 } else { slot }
}

#[inline]
pub fn material_slot(class: usize) -> usize { FEATURE_LEN - 1 - class }

/// One encoded position.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Features([i32; FEATURE_LEN]);

impl Default for Features {
    fn default() -> Self { Self([0; FEATURE_LEN]) }
}

impl Features {
    pub fn as_slice(&self) -> &[i32] { &self.0 }

    pub fn len(&self) -> usize { self.0.len() }

    pub fn is_empty(&self) -> bool { false }

    pub fn is_zero(&self) -> bool { self.0.iter().all(|&v| v == 0) }

    /// Material balance (white minus black) for a piece type.
    pub fn material(&self, piece: Piece) -> i32 { self.0[material_slot(class_index(piece))] }

    /// The 32 slots starting at a class's plane offset.
    pub fn plane(&self, piece: Piece) -> &[i32] {
        let start = class_index(piece) * PLANE_LEN;
        &self.0[start..start + PLANE_LEN]
    }

    /// Model input: the same values as `f32`.
    pub fn to_input(&self) -> Vec<f32> { self.0.iter().map(|&v| v as f32).collect() }

    fn add(&mut self, slot: usize, delta: i32) { self.0[slot] += delta; }
}

impl std::ops::Index<usize> for Features {
    type Output = i32;
    fn index(&self, i: usize) -> &i32 { &self.0[i] }
}

impl fmt::Debug for Features {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { fmt::Display::fmt(self, f) }
}

/// Dataset line form: `[v0, v1, ..., v188]`.
impl fmt::Display for Features {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, v) in self.0.iter().enumerate() {
            if i > 0 { f.write_str(", ")?; }
            write!(f, "{}", v)?;
        }
        f.write_str("]")
    }
}

impl FromStr for Features {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let body = s
            .trim()
            .strip_prefix('[')
            .and_then(|rest| rest.strip_suffix(']'))
            .ok_or_else(|| Error::InvalidPosition(format!("feature line not bracketed: {s:?}")))?;
        let mut out = Features::default();
        let mut n = 0usize;
        for tok in body.split(',') {
            if n >= FEATURE_LEN {
                return Err(Error::InvalidPosition(format!("feature line longer than {FEATURE_LEN}")));
            }
            out.0[n] = tok
                .trim()
                .parse()
                .map_err(|e| Error::InvalidPosition(format!("feature {n} {tok:?}: {e}")))?;
            n += 1;
        }
        if n != FEATURE_LEN {
            return Err(Error::InvalidPosition(format!("feature line has {n} values, expected {FEATURE_LEN}")));
        }
        Ok(out)
    }
}

/// Encode a position. Does not look at side to move.
pub fn encode<S: PieceSource + ?Sized>(src: &S) -> Result<Features> {
    let mut out = Features::default();
    let mut pieces = 0usize;
    let mut per_side = [0usize; 2];
    for sq in Square::ALL {
        let Some((piece, color)) = src.piece_on(sq) else { continue };
        pieces += 1;
        per_side[color as usize] += 1;
        if pieces > MAX_PIECES {
            return Err(Error::InvalidPosition(format!("more than {MAX_PIECES} pieces on the board")));
        }
        if per_side[color as usize] > MAX_PIECES_PER_SIDE {
            return Err(Error::InvalidPosition(format!("{color:?} has more than {MAX_PIECES_PER_SIDE} pieces")));
        }
        let delta = sign(color);
        let class = class_index(piece);
        out.add(material_slot(class), delta);
        out.add(plane_slot(class, relative_rank(sq, color), folded_file(sq)), delta);
    }
    Ok(out)
}
