use pretty_assertions::assert_eq;
use std::fs::{self, create_dir_all, remove_file};
use std::path::PathBuf;
use valuenet::board::Position;
use valuenet::dataset::{read_dataset, BuildOutcome, DatasetBuilder};
use valuenet::encode;
use valuenet::pgn::{GameRecord, PgnGames};
use valuenet::Error;

fn scratch(name: &str) -> PathBuf {
    let dir = PathBuf::from("target/dataset_test");
    create_dir_all(&dir).unwrap();
    let p = dir.join(name);
    let _ = remove_file(&p);
    p
}

#[test]
fn empty_game_list_gives_zero_lines() {
    let path = scratch("empty.txt");
    let out = DatasetBuilder::new(&path).build(Vec::<valuenet::Result<GameRecord>>::new()).unwrap();
    assert_eq!(out, BuildOutcome::Written { games: 0, positions: 0 });
    assert_eq!(fs::read_to_string(&path).unwrap(), "");
}

#[test]
fn existing_file_is_left_untouched() {
    let path = scratch("existing.txt");
    let seeded = "[1, 2, 3]\nnot even a feature line\n";
    fs::write(&path, seeded).unwrap();
    let games = vec![Ok(GameRecord::from_uci(&["e2e4", "e7e5"]))];
    let out = DatasetBuilder::new(&path).build(games).unwrap();
    assert_eq!(out, BuildOutcome::Skipped);
    assert_eq!(fs::read(&path).unwrap(), seeded.as_bytes());
}

#[test]
fn skipped_run_never_pulls_games() {
    let path = scratch("lazy.txt");
    fs::write(&path, "").unwrap();
    let games = std::iter::from_fn(|| -> Option<valuenet::Result<GameRecord>> { panic!("games were read") });
    assert_eq!(DatasetBuilder::new(&path).build(games).unwrap(), BuildOutcome::Skipped);
}

#[test]
fn single_e4_game_writes_one_line() {
    let path = scratch("e4.txt");
    let out = DatasetBuilder::new(&path).build(vec![Ok(GameRecord::from_uci(&["e2e4"]))]).unwrap();
    assert_eq!(out, BuildOutcome::Written { games: 1, positions: 1 });

    let mut pos = Position::startpos();
    pos.make_move_uci("e2e4").unwrap();
    let expected = format!("{}\n", encode(&pos).unwrap());
    let text = fs::read_to_string(&path).unwrap();
    assert_eq!(text, expected);
    assert_eq!(text.lines().count(), 1);
    assert!(text.starts_with("[0, 0, 0, "));
}

#[test]
fn lines_follow_game_then_move_order() {
    let path = scratch("order.txt");
    let g1 = GameRecord::from_uci(&["e2e4", "e7e5", "g1f3"]);
    let g2 = GameRecord::from_uci(&["d2d4", "d7d5"]);
    let out = DatasetBuilder::new(&path).progress_every(2).build(vec![Ok(g1.clone()), Ok(g2.clone())]).unwrap();
    assert_eq!(out, BuildOutcome::Written { games: 2, positions: 5 });

    let mut expected = Vec::new();
    for g in [&g1, &g2] {
        let mut pos = Position::startpos();
        for m in &g.moves {
            pos.make_move_uci(m).unwrap();
            expected.push(encode(&pos).unwrap());
        }
    }
    assert_eq!(read_dataset(&path).unwrap(), expected);
}

#[test]
fn illegal_move_aborts_with_game_number() {
    let path = scratch("illegal.txt");
    let games = vec![Ok(GameRecord::from_uci(&["e2e4"])), Ok(GameRecord::from_uci(&["e2e5"]))];
    match DatasetBuilder::new(&path).build(games) {
        Err(Error::GameParse { game, .. }) => assert_eq!(game, 2),
        other => panic!("expected GameParse, got {other:?}"),
    }
    // what was written before the failure stays; a rerun is a skip
    assert_eq!(fs::read_to_string(&path).unwrap().lines().count(), 1);
    let rerun = DatasetBuilder::new(&path).build(Vec::<valuenet::Result<GameRecord>>::new()).unwrap();
    assert_eq!(rerun, BuildOutcome::Skipped);
}

#[test]
fn reader_errors_propagate() {
    let path = scratch("reader_err.txt");
    let games = vec![Err(Error::GameParse { game: 1, reason: "boom".into() })];
    assert!(matches!(DatasetBuilder::new(&path).build(games), Err(Error::GameParse { game: 1, .. })));
}

#[test]
fn pgn_file_end_to_end() {
    let pgn = scratch("games.pgn");
    fs::write(
        &pgn,
        "[Event \"a\"]\n[Result \"1-0\"]\n\n1. e4 e5 2. Nf3 Nc6 3. Bb5 a6 4. O-O 1-0\n\n\
         [Event \"b\"]\n[Result \"*\"]\n\n1. d4 *\n",
    )
    .unwrap();
    let path = scratch("games.txt");
    let out = DatasetBuilder::new(&path).build(PgnGames::open(&pgn).unwrap()).unwrap();
    assert_eq!(out, BuildOutcome::Written { games: 2, positions: 8 });
    let feats = read_dataset(&path).unwrap();
    assert_eq!(feats.len(), 8);

    let moves: Vec<String> = ["e2e4", "e7e5", "g1f3", "b8c6", "f1b5", "a7a6", "e1g1"].iter().map(|s| s.to_string()).collect();
    let castled = Position::set_from_start_and_moves(&moves).unwrap();
    assert_eq!(feats[6], encode(&castled).unwrap());
}

#[test]
fn missing_pgn_is_an_io_error() {
    assert!(matches!(PgnGames::open("target/dataset_test/does_not_exist.pgn"), Err(Error::Io { .. })));
}

#[test]
fn pgn_build_skips_existing_target_even_without_pgn() {
    let path = scratch("pgn_existing.txt");
    fs::write(&path, "kept\n").unwrap();
    let out = DatasetBuilder::new(&path).build_pgn("target/dataset_test/no_such_input.pgn").unwrap();
    assert_eq!(out, BuildOutcome::Skipped);
    assert_eq!(fs::read_to_string(&path).unwrap(), "kept\n");
}

#[test]
fn pgn_build_with_missing_input_creates_nothing() {
    let path = scratch("pgn_missing_input.txt");
    let res = DatasetBuilder::new(&path).build_pgn("target/dataset_test/no_such_input.pgn");
    assert!(matches!(res, Err(Error::Io { .. })));
    assert!(!path.exists());
}

#[test]
fn pgn_build_writes_then_skips() {
    let pgn = scratch("twice.pgn");
    fs::write(&pgn, "[Event \"a\"]\n[Result \"*\"]\n\n1. e4 e5 *\n").unwrap();
    let path = scratch("twice.txt");
    let builder = DatasetBuilder::new(&path);
    assert_eq!(builder.build_pgn(&pgn).unwrap(), BuildOutcome::Written { games: 1, positions: 2 });
    let first = fs::read(&path).unwrap();
    assert_eq!(builder.build_pgn(&pgn).unwrap(), BuildOutcome::Skipped);
    assert_eq!(fs::read(&path).unwrap(), first);
}
