//! Score list tests - ranking and JSON persistence

use tetris3d::core::{ScoreBoard, ScoreBoardError};

fn names(board: &ScoreBoard) -> Vec<&str> {
    board.ranked().iter().map(|e| e.name.as_str()).collect()
}

#[test]
fn test_ranked_ascending() {
    let mut board = ScoreBoard::new();
    board.add_entry("mid", 500);
    board.add_entry("low", 100);
    board.add_entry("high", 900);

    assert_eq!(names(&board), vec!["low", "mid", "high"]);
    assert_eq!(board.best().map(|e| e.score), Some(900));
    assert_eq!(board.len(), 3);
}

#[test]
fn test_ties_keep_insertion_order() {
    let mut board = ScoreBoard::new();
    board.add_entry("first", 300);
    board.add_entry("second", 300);
    board.add_entry("zero", 0);
    board.add_entry("third", 300);

    assert_eq!(names(&board), vec!["zero", "first", "second", "third"]);
}

#[test]
fn test_save_and_load_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scores.json");

    let mut board = ScoreBoard::new();
    board.add_entry("ana", 1200);
    board.add_entry("bo", 400);
    board.save(&path).unwrap();

    let loaded = ScoreBoard::load(&path).unwrap();
    assert_eq!(loaded, board);
}

#[test]
fn test_missing_file_loads_empty() {
    let dir = tempfile::tempdir().unwrap();
    let board = ScoreBoard::load(dir.path().join("nope.json")).unwrap();
    assert!(board.is_empty());
}

#[test]
fn test_corrupt_file_is_a_json_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scores.json");
    std::fs::write(&path, "{ not json").unwrap();

    assert!(matches!(
        ScoreBoard::load(&path),
        Err(ScoreBoardError::Json(_))
    ));
}

#[test]
fn test_hand_edited_list_is_resorted() {
    let raw = r#"{"entries":[{"name":"b","score":50},{"name":"a","score":10}]}"#;
    let board = ScoreBoard::from_json(raw).unwrap();
    assert_eq!(names(&board), vec!["a", "b"]);
}
