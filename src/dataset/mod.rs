use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use indicatif::ProgressBar;
use log::{debug, info};

use crate::board::Position;
use crate::encoder::{encode, Features};
use crate::error::{Error, Result};
use crate::pgn::{GameRecord, PgnGames};

pub const DEFAULT_PROGRESS_EVERY: usize = 1000;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BuildOutcome {
    /// Target already existed; nothing was read or written.
    Skipped,
    Written { games: usize, positions: usize },
}

/// Replays games and writes one feature line per ply.
pub struct DatasetBuilder {
    path: PathBuf,
    progress_every: usize,
    progress: Option<ProgressBar>,
}

impl DatasetBuilder {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self { path: path.as_ref().to_path_buf(), progress_every: DEFAULT_PROGRESS_EVERY, progress: None }
    }

    pub fn progress_every(mut self, n: usize) -> Self {
        self.progress_every = n.max(1);
        self
    }

    pub fn with_progress_bar(mut self, bar: ProgressBar) -> Self {
        self.progress = Some(bar);
        self
    }

    pub fn path(&self) -> &Path { &self.path }

    /// Encode every ply of every game into the target file.
    ///
    /// If the target exists the whole step is skipped and `games` is never
    /// pulled. Otherwise the file is created (zero lines for zero games) and
    /// lines go out in game order, then move order. A failing game aborts the
    /// run and leaves what was already written in place.
    pub fn build<I>(&self, games: I) -> Result<BuildOutcome>
    where
        I: IntoIterator<Item = Result<GameRecord>>,
    {
        let file = match OpenOptions::new().write(true).create_new(true).open(&self.path) {
            Ok(f) => f,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                info!("{} already exists, skipping dataset generation", self.path.display());
                return Ok(BuildOutcome::Skipped);
            }
            Err(e) => return Err(Error::io(&self.path, e)),
        };
        let mut w = BufWriter::new(file);
        let mut positions = 0usize;
        let mut games_done = 0usize;

        for (gi, game) in games.into_iter().enumerate() {
            let game = game?;
            let mut pos = Position::startpos();
            for mv in &game.moves {
                pos.make_move_uci(mv).map_err(|e| Error::GameParse { game: gi + 1, reason: e.to_string() })?;
                let feats = encode(&pos)?;
                if positions % self.progress_every == 0 {
                    info!("encoding position {}", positions);
                }
                write_line(&mut w, &feats).map_err(|e| Error::io(&self.path, e))?;
                positions += 1;
                if let Some(bar) = &self.progress { bar.inc(1); }
            }
            games_done += 1;
            debug!("game {} done: {} plies", gi + 1, game.moves.len());
        }

        w.flush().map_err(|e| Error::io(&self.path, e))?;
        if let Some(bar) = &self.progress { bar.finish(); }
        info!("wrote {} positions from {} games to {}", positions, games_done, self.path.display());
        Ok(BuildOutcome::Written { games: games_done, positions })
    }

    /// `build` over the games of a PGN file. An existing target is still a
    /// skip when the PGN cannot be opened.
    pub fn build_pgn<P: AsRef<Path>>(&self, pgn: P) -> Result<BuildOutcome> {
        match PgnGames::open(pgn) {
            Ok(games) => self.build(games),
            Err(Error::Io { .. }) if self.path.exists() => {
                info!("{} already exists, skipping dataset generation", self.path.display());
                Ok(BuildOutcome::Skipped)
            }
            Err(e) => Err(e),
        }
    }
}

fn write_line<W: Write>(w: &mut W, feats: &Features) -> std::io::Result<()> {
    writeln!(w, "{}", feats)
}

/// Read a dataset file back, one `Features` per non-empty line.
pub fn read_dataset<P: AsRef<Path>>(path: P) -> Result<Vec<Features>> {
    let path = path.as_ref();
    let f = File::open(path).map_err(|e| Error::io(path, e))?;
    let mut out = Vec::new();
    for (i, line) in BufReader::new(f).lines().enumerate() {
        let line = line.map_err(|e| Error::io(path, e))?;
        if line.trim().is_empty() { continue; }
        let feats = line
            .parse::<Features>()
            .map_err(|e| Error::InvalidPosition(format!("{} line {}: {}", path.display(), i + 1, e)))?;
        out.push(feats);
    }
    Ok(out)
}
