use cozy_chess::{Board, Color, File, Piece, Rank, Square};

use crate::error::{Error, Result};

/// Raw piece map over the 64 squares, a1 = 0 .. h8 = 63.
///
/// Unlike a cozy `Board` this holds any arrangement at all: empty boards,
/// king-less fragments, pawns on the back rank. Legality is not checked.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Placement {
    squares: [Option<(Piece, Color)>; 64],
}

impl Default for Placement {
    fn default() -> Self { Self::empty() }
}

impl Placement {
    pub fn empty() -> Self { Self { squares: [None; 64] } }

    pub fn from_board(board: &Board) -> Self {
        let mut out = Self::empty();
        for sq in Square::ALL {
            out.squares[sq as usize] = board.piece_on(sq).zip(board.color_on(sq));
        }
        out
    }

    /// Parse the piece-placement field of a FEN (`rnbqkbnr/pppppppp/8/...`).
    /// Trailing FEN fields, if present, are ignored.
    pub fn from_board_fen(fen: &str) -> Result<Self> {
        let field = fen.split_whitespace().next().unwrap_or("");
        let rows: Vec<&str> = field.split('/').collect();
        if rows.len() != 8 {
            return Err(Error::InvalidPosition(format!("expected 8 ranks in {field:?}, got {}", rows.len())));
        }
        let mut out = Self::empty();
        for (i, row) in rows.iter().enumerate() {
            let rank = Rank::index(7 - i);
            let mut file = 0usize;
            for ch in row.chars() {
                if let Some(d) = ch.to_digit(10) {
                    if !(1..=8).contains(&d) {
                        return Err(Error::InvalidPosition(format!("bad skip {ch:?} in rank {}", 8 - i)));
                    }
                    file += d as usize;
                    continue;
                }
                let (piece, color) = piece_from_char(ch)
                    .ok_or_else(|| Error::InvalidPosition(format!("bad piece {ch:?} in rank {}", 8 - i)))?;
                if file >= 8 {
                    return Err(Error::InvalidPosition(format!("rank {} overflows", 8 - i)));
                }
                out.put(Square::new(File::index(file), rank), piece, color);
                file += 1;
            }
            if file != 8 {
                return Err(Error::InvalidPosition(format!("rank {} has {} files", 8 - i, file)));
            }
        }
        Ok(out)
    }

    pub fn put(&mut self, sq: Square, piece: Piece, color: Color) {
        self.squares[sq as usize] = Some((piece, color));
    }

    pub fn clear(&mut self, sq: Square) { self.squares[sq as usize] = None; }

    pub fn get(&self, sq: Square) -> Option<(Piece, Color)> { self.squares[sq as usize] }

    pub fn count(&self) -> usize { self.squares.iter().flatten().count() }

    pub fn count_color(&self, color: Color) -> usize {
        self.squares.iter().flatten().filter(|(_, c)| *c == color).count()
    }

    /// Reflect every piece across the d/e file boundary, colors unchanged.
    pub fn mirror_files(&self) -> Self {
        let mut out = Self::empty();
        for sq in Square::ALL {
            if let Some((p, c)) = self.get(sq) {
                let file = File::index(7 - sq.file() as usize);
                out.put(Square::new(file, sq.rank()), p, c);
            }
        }
        out
    }

    pub fn diagram(&self) -> String {
        let mut rows = Vec::with_capacity(8);
        for rank in Rank::ALL.iter().rev() {
            let row: Vec<String> = File::ALL
                .iter()
                .map(|&file| match self.get(Square::new(file, *rank)) {
                    Some((p, c)) => piece_char(p, c).to_string(),
                    None => ".".to_string(),
                })
                .collect();
            rows.push(row.join(" "));
        }
        rows.join("\n")
    }
}

fn piece_from_char(ch: char) -> Option<(Piece, Color)> {
    let color = if ch.is_ascii_uppercase() { Color::White } else { Color::Black };
    let piece = match ch.to_ascii_lowercase() {
        'p' => Piece::Pawn,
        'n' => Piece::Knight,
        'b' => Piece::Bishop,
        'r' => Piece::Rook,
        'q' => Piece::Queen,
        'k' => Piece::King,
        _ => return None,
    };
    Some((piece, color))
}

fn piece_char(piece: Piece, color: Color) -> char {
    let ch = match piece {
        Piece::Pawn => 'p',
        Piece::Knight => 'n',
        Piece::Bishop => 'b',
        Piece::Rook => 'r',
        Piece::Queen => 'q',
        Piece::King => 'k',
    };
    if color == Color::White { ch.to_ascii_uppercase() } else { ch }
}
