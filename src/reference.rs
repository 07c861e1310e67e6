use std::fmt;
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

use cozy_chess::{Color, Piece};
use log::debug;

use crate::board::Position;
use crate::error::{Error, Result};

/// Score of a position from white's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Score {
    /// Centipawns
    Cp(i32),
    /// Mate in n (negative: white gets mated)
    Mate(i32),
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Score::Cp(cp) => write!(f, "{:+.2}", *cp as f32 / 100.0),
            Score::Mate(n) => write!(f, "#{}", n),
        }
    }
}

/// Something that can score a FEN for comparison with the model.
pub trait ReferenceEval {
    fn evaluate(&mut self, fen: &str) -> Result<Score>;
}

const PAWN: i32 = 100;
const KNIGHT: i32 = 320;
const BISHOP: i32 = 330;
const ROOK: i32 = 500;
const QUEEN: i32 = 900;

/// Plain material count; used when no engine is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct MaterialEval;

impl MaterialEval {
    pub fn score(pos: &Position) -> i32 {
        let board = pos.board();
        let count = |color: Color, piece: Piece| (board.colors(color) & board.pieces(piece)).into_iter().count() as i32;
        let diff = |piece: Piece| count(Color::White, piece) - count(Color::Black, piece);
        diff(Piece::Pawn) * PAWN
            + diff(Piece::Knight) * KNIGHT
            + diff(Piece::Bishop) * BISHOP
            + diff(Piece::Rook) * ROOK
            + diff(Piece::Queen) * QUEEN
    }
}

impl ReferenceEval for MaterialEval {
    fn evaluate(&mut self, fen: &str) -> Result<Score> {
        Ok(Score::Cp(Self::score(&Position::from_fen(fen)?)))
    }
}

/// Minimal UCI client: `position fen` + `go depth N`, keeps the last score
/// reported before `bestmove`.
pub struct UciEngine {
    binary: PathBuf,
    depth: u32,
    child: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
}

impl UciEngine {
    pub fn spawn<P: AsRef<Path>>(binary: P, depth: u32) -> Result<Self> {
        let binary = binary.as_ref().to_path_buf();
        let mut child = Command::new(&binary)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| Error::io(&binary, e))?;
        let stdin = child.stdin.take().ok_or_else(|| Error::Engine("no stdin pipe".into()))?;
        let stdout = child.stdout.take().ok_or_else(|| Error::Engine("no stdout pipe".into()))?;
        let mut engine = Self { binary, depth, child, stdin, stdout: BufReader::new(stdout) };
        engine.send("uci")?;
        engine.wait_for("uciok")?;
        engine.send("isready")?;
        engine.wait_for("readyok")?;
        Ok(engine)
    }

    fn send(&mut self, line: &str) -> Result<()> {
        debug!("> {}", line);
        writeln!(self.stdin, "{}", line)
            .and_then(|_| self.stdin.flush())
            .map_err(|e| Error::io(&self.binary, e))
    }

    fn read_line(&mut self) -> Result<String> {
        let mut line = String::new();
        let n = self.stdout.read_line(&mut line).map_err(|e| Error::io(&self.binary, e))?;
        if n == 0 {
            return Err(Error::Engine(format!("{} closed its output", self.binary.display())));
        }
        Ok(line.trim_end().to_string())
    }

    fn wait_for(&mut self, token: &str) -> Result<()> {
        loop {
            if self.read_line()? == token { return Ok(()); }
        }
    }
}

impl ReferenceEval for UciEngine {
    fn evaluate(&mut self, fen: &str) -> Result<Score> {
        let white_to_move = Position::from_fen(fen)?.side_to_move() == Color::White;
        self.send(&format!("position fen {}", fen))?;
        self.send(&format!("go depth {}", self.depth))?;
        let mut score = None;
        loop {
            let line = self.read_line()?;
            debug!("< {}", line);
            if line.starts_with("info") {
                if let Some(s) = parse_info_score(&line) { score = Some(s); }
            } else if line.starts_with("bestmove") {
                break;
            }
        }
        let s = score.ok_or_else(|| Error::Engine(format!("no score reported for {fen}")))?;
        // engines report from the side to move
        Ok(if white_to_move { s } else { negate(s) })
    }
}

impl Drop for UciEngine {
    fn drop(&mut self) {
        let _ = writeln!(self.stdin, "quit");
        let _ = self.stdin.flush();
        let _ = self.child.wait();
    }
}

fn negate(s: Score) -> Score {
    match s {
        Score::Cp(cp) => Score::Cp(-cp),
        Score::Mate(n) => Score::Mate(-n),
    }
}

fn parse_info_score(line: &str) -> Option<Score> {
    let mut parts = line.split_whitespace();
    parts.position(|p| p == "score")?;
    let kind = parts.next()?;
    let value = parts.next()?.parse::<i32>().ok()?;
    match kind {
        "cp" => Some(Score::Cp(value)),
        "mate" => Some(Score::Mate(value)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn info_score_parsing() {
        assert_eq!(parse_info_score("info depth 12 seldepth 18 score cp 35 nodes 1000 pv e2e4"), Some(Score::Cp(35)));
        assert_eq!(parse_info_score("info depth 5 score mate -3 pv a1a2"), Some(Score::Mate(-3)));
        assert_eq!(parse_info_score("info string hello"), None);
    }

    #[test]
    fn material_from_whites_view() {
        let mut m = MaterialEval;
        assert_eq!(m.evaluate("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1").unwrap(), Score::Cp(0));
        assert_eq!(m.evaluate("4k3/8/8/8/8/8/8/3QK3 b - - 0 1").unwrap(), Score::Cp(900));
        assert_eq!(format!("{}", Score::Cp(-150)), "-1.50");
    }
}
