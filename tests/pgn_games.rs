use valuenet::pgn::{GameRecord, PgnGames};
use valuenet::Error;

const TWO_GAMES: &str = "[Event \"one\"]\n[Site \"?\"]\n[Result \"0-1\"]\n\n\
1. f3 e5 2. g4 Qh4# 0-1\n\n\
[Event \"two\"]\n[Result \"1/2-1/2\"]\n\n\
1. e4 {book} e5 2. Nf3 $1 Nc6 1/2-1/2\n";

#[test]
fn reads_games_lazily_in_order() {
    let mut games = PgnGames::new(TWO_GAMES.as_bytes());
    let g1 = games.next().unwrap().unwrap();
    assert_eq!(games.games_read(), 1);
    assert_eq!(g1, GameRecord::from_uci(&["f2f3", "e7e5", "g2g4", "d8h4"]));
    let g2 = games.next().unwrap().unwrap();
    assert_eq!(g2.moves, vec!["e2e4", "e7e5", "g1f3", "b8c6"]);
    assert!(games.next().is_none());
    assert!(games.next().is_none());
}

#[test]
fn castling_comes_out_in_standard_uci() {
    let pgn = "1. e4 e5 2. Nf3 Nc6 3. Bc4 Bc5 4. O-O Nf6 5. d3 O-O *\n";
    let g = PgnGames::new(pgn.as_bytes()).next().unwrap().unwrap();
    assert_eq!(g.moves[6], "e1g1");
    assert_eq!(g.moves[9], "e8g8");
}

#[test]
fn unresolvable_san_is_a_game_parse_error() {
    let pgn = "1. e4 e5 2. Ke3 *\n\n1. d4 *\n";
    let mut games = PgnGames::new(pgn.as_bytes());
    assert!(matches!(games.next(), Some(Err(Error::GameParse { game: 1, .. }))));
    // the next game is still readable
    assert_eq!(games.next().unwrap().unwrap().moves, vec!["d2d4"]);
}

#[test]
fn empty_input_has_no_games() {
    assert_eq!(PgnGames::new(&b""[..]).count(), 0);
}
