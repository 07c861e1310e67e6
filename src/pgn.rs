use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use pgn_reader::{BufferedReader, RawHeader, SanPlus, Skip, Visitor};
use shakmaty::{CastlingMode, Chess, Position as _};

use crate::error::{Error, Result};

/// Mainline of one game as UCI moves from the standard starting position.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GameRecord {
    pub moves: Vec<String>,
}

impl GameRecord {
    pub fn from_uci<S: AsRef<str>>(moves: &[S]) -> Self {
        Self { moves: moves.iter().map(|m| m.as_ref().to_string()).collect() }
    }
}

/// Collects the mainline, resolving SAN against a shakmaty position.
/// The first bad move poisons the game; the rest of it is ignored.
struct MainlineVisitor {
    pos: Chess,
    moves: Vec<String>,
    error: Option<String>,
}

impl MainlineVisitor {
    fn new() -> Self {
        Self { pos: Chess::default(), moves: Vec::new(), error: None }
    }
}

impl Visitor for MainlineVisitor {
    type Result = std::result::Result<GameRecord, String>;

    fn begin_game(&mut self) {
        self.pos = Chess::default();
        self.moves.clear();
        self.error = None;
    }

    fn header(&mut self, key: &[u8], value: RawHeader<'_>) {
        // games are always replayed from the standard start
        if key == b"FEN" && self.error.is_none() {
            let fen = String::from_utf8_lossy(value.as_bytes());
            self.error = Some(format!("custom start position {fen:?} is not supported"));
        }
    }

    fn begin_variation(&mut self) -> Skip {
        Skip(true)
    }

    fn san(&mut self, san_plus: SanPlus) {
        if self.error.is_some() {
            return;
        }
        match san_plus.san.to_move(&self.pos) {
            Ok(m) => {
                self.moves.push(m.to_uci(CastlingMode::Standard).to_string());
                self.pos.play_unchecked(&m);
            }
            Err(e) => {
                self.error = Some(format!("move {} ({}): {}", self.moves.len() + 1, san_plus, e));
            }
        }
    }

    fn end_game(&mut self) -> Self::Result {
        match self.error.take() {
            Some(e) => Err(e),
            None => Ok(GameRecord { moves: std::mem::take(&mut self.moves) }),
        }
    }
}

/// Lazy game sequence over a PGN stream. Restart by reopening.
pub struct PgnGames<R: Read> {
    reader: BufferedReader<R>,
    visitor: MainlineVisitor,
    source: PathBuf,
    games: usize,
    done: bool,
}

impl PgnGames<File> {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| Error::io(path, e))?;
        let mut games = Self::new(f);
        games.source = path.to_path_buf();
        Ok(games)
    }
}

impl<R: Read> PgnGames<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader: BufferedReader::new(reader),
            visitor: MainlineVisitor::new(),
            source: PathBuf::from("<stream>"),
            games: 0,
            done: false,
        }
    }

    /// Games yielded so far.
    pub fn games_read(&self) -> usize { self.games }
}

impl<R: Read> Iterator for PgnGames<R> {
    type Item = Result<GameRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.reader.read_game(&mut self.visitor) {
            Ok(Some(res)) => {
                self.games += 1;
                Some(res.map_err(|reason| Error::GameParse { game: self.games, reason }))
            }
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(Error::io(&self.source, e)))
            }
        }
    }
}
