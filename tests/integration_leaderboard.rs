use oche::{
    leaderboard::{Leaderboard, LeaderboardEntry, LeaderboardKey, MAX_ENTRIES},
    store::{KeyValueStore, SqliteStore},
    targets::{EndOption, GameMode},
};
use tempfile::tempdir;

/// Leaderboards persisted to an on-disk SQLite file

#[test]
fn keeps_best_ten_across_reopens() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("leaderboard.db");
    let key = LeaderboardKey::new(GameMode::Doubles, EndOption::End, false);

    {
        let mut board = Leaderboard::new(SqliteStore::open(&path).unwrap());
        for darts in (30..41).rev() {
            board.submit(&format!("p{darts}"), darts, key).unwrap();
        }
    }

    let board = Leaderboard::new(SqliteStore::open(&path).unwrap());
    let entries = board.load(key);
    assert_eq!(entries.len(), MAX_ENTRIES);
    assert_eq!(entries.first(), Some(&LeaderboardEntry::new("p30", 30)));
    assert_eq!(entries.last(), Some(&LeaderboardEntry::new("p39", 39)));
    assert!(entries.windows(2).all(|w| w[0].darts_thrown <= w[1].darts_thrown));
}

#[test]
fn boards_are_separate_per_key() {
    let dir = tempdir().unwrap();
    let mut board = Leaderboard::new(SqliteStore::open(dir.path().join("lb.db")).unwrap());
    let plain = LeaderboardKey::new(GameMode::Singles, EndOption::Bull, false);
    let skip = LeaderboardKey::new(GameMode::Singles, EndOption::Bull, true);

    board.submit("ann", 40, plain).unwrap();
    board.submit("bo", 22, skip).unwrap();

    assert_eq!(board.load(plain), vec![LeaderboardEntry::new("ann", 40)]);
    assert_eq!(board.load(skip), vec![LeaderboardEntry::new("bo", 22)]);
    assert_eq!(
        board.store().keys().unwrap(),
        vec![
            "leaderboard_singles_bull".to_string(),
            "leaderboard_singles_skip_bull".to_string()
        ]
    );
}

#[test]
fn stored_json_matches_wire_format() {
    let dir = tempdir().unwrap();
    let mut board = Leaderboard::new(SqliteStore::open(dir.path().join("lb.db")).unwrap());
    let key = LeaderboardKey::new(GameMode::Trebles, EndOption::Inner, false);
    board.submit("cy", 57, key).unwrap();

    let raw = board.store().get("leaderboard_trebles_inner").unwrap().unwrap();
    assert_eq!(raw, r#"[{"username":"cy","darts":57}]"#);
}

#[test]
fn malformed_stored_board_loads_empty_and_is_replaced() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("lb.db");
    let key = LeaderboardKey::new(GameMode::Doubles, EndOption::Bull, true);
    {
        let mut store = SqliteStore::open(&path).unwrap();
        store.set(&key.storage_key(), "{not json").unwrap();
    }

    let mut board = Leaderboard::new(SqliteStore::open(&path).unwrap());
    assert!(board.load(key).is_empty());
    let updated = board.submit("dee", 19, key).unwrap();
    assert_eq!(updated, vec![LeaderboardEntry::new("dee", 19)]);
}
