use cozy_chess::{Board as CozyBoard, Color, File, Move, Piece, Square};

use crate::board::Placement;
use crate::error::{Error, Result};

/// Owned game board. One instance lives for one game (or one inference
/// call) and is mutated in place move by move.
#[derive(Clone, Debug)]
pub struct Position {
    board: CozyBoard,
    plies: usize,
}

impl Position {
    pub fn startpos() -> Self {
        Self { board: CozyBoard::default(), plies: 0 }
    }

    pub fn from_fen(fen: &str) -> Result<Self> {
        CozyBoard::from_fen(fen.trim(), false)
            .map(|b| Self { board: b, plies: 0 })
            .map_err(|e| Error::InvalidPosition(format!("FEN {fen:?}: {e:?}")))
    }

    pub fn board(&self) -> &CozyBoard { &self.board }

    /// Number of moves applied since construction.
    pub fn plies(&self) -> usize { self.plies }

    pub fn side_to_move(&self) -> Color { self.board.side_to_move() }

    pub fn fen(&self) -> String { format!("{}", self.board) }

    /// Apply a move in UCI notation. Castling is accepted in standard form
    /// (`e1g1`) as well as king-takes-rook form (`e1h1`).
    pub fn make_move_uci(&mut self, mv_uci: &str) -> Result<()> {
        let mv_uci = mv_uci.trim();
        let mut found = None;
        self.board.generate_moves(|moves| {
            for m in moves {
                if uci_string(&self.board, m) == mv_uci || format!("{}", m) == mv_uci {
                    found = Some(m);
                    break;
                }
            }
            found.is_some()
        });
        match found {
            Some(m) => {
                self.board.play(m);
                self.plies += 1;
                Ok(())
            }
            None => Err(Error::IllegalMove {
                ply: self.plies + 1,
                mv: mv_uci.to_string(),
                reason: format!("not legal in {}", self.fen()),
            }),
        }
    }

    pub fn set_from_start_and_moves(moves: &[String]) -> Result<Self> {
        let mut pos = Self::startpos();
        for m in moves { pos.make_move_uci(m)?; }
        Ok(pos)
    }

    /// Eight text rows, rank 8 first, `.` for empty squares.
    pub fn diagram(&self) -> String {
        Placement::from_board(&self.board).diagram()
    }
}

/// UCI text for a cozy move, rewriting king-takes-rook castling to the
/// king's destination square.
pub fn uci_string(board: &CozyBoard, mv: Move) -> String {
    let castles = board.piece_on(mv.from) == Some(Piece::King)
        && board.color_on(mv.to) == Some(board.side_to_move());
    if castles {
        let file = if (mv.to.file() as u8) > (mv.from.file() as u8) { File::G } else { File::C };
        let to = Square::new(file, mv.to.rank());
        return format!("{}{}", mv.from, to);
    }
    format!("{}", mv)
}
