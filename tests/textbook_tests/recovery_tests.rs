//! Tests for TextBook recovery
//!
//! These tests verify:
//! - Restart reproduces posts and comments exactly
//! - Last id is the highest recovered id
//! - Removed posts stay removed across restarts
//! - Missing or corrupt post files abort the open
//! - Malformed index contents abort the open

use std::fs;

use tempfile::TempDir;
use textbook::config::{Config, SyncStrategy};
use textbook::{FeedPost, PostStore, TextBook, TextBookError};

// =============================================================================
// Helper Functions
// =============================================================================

fn config_for(temp_dir: &TempDir) -> Config {
    Config::builder()
        .data_dir(temp_dir.path())
        .sync_strategy(SyncStrategy::EveryWrite)
        .build()
}

fn open(temp_dir: &TempDir) -> TextBook {
    TextBook::open(config_for(temp_dir)).unwrap()
}

/// Populate a store with three posts and three comments, then drop it
fn populate(temp_dir: &TempDir) -> Vec<textbook::Post> {
    let mut textbook = open(temp_dir);
    textbook.add_post("AdaLovelace", "I am much pleased to find how very well I stand work.").unwrap();
    textbook.add_post("KatherineJohnson", "Girls are capable of doing everything men are capable of doing.").unwrap();
    textbook.add_post("GraceHopper", "One accurate measurement is worth a thousand expert opinions.").unwrap();
    textbook.add_comment(0, "GraceHopper", "Go ahead and do it. You can always apologize later.").unwrap();
    textbook.add_comment(0, "KatherineJones", "I like to learn. That's an art and a science.").unwrap();
    textbook.add_comment(2, "AdaLovelace", "The mental and the material are brought into connection.").unwrap();
    textbook.posts()
}

// =============================================================================
// Round-trip Tests
// =============================================================================

#[test]
fn test_recover_empty_index() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("posts.txt"), "").unwrap();

    let textbook = open(&temp);

    assert_eq!(textbook.post_count(), 0);
    assert_eq!(textbook.last_id(), 0);
    assert!(textbook.recovery_result().index_found);
}

#[test]
fn test_recover_reproduces_posts_exactly() {
    let temp = TempDir::new().unwrap();
    let before = populate(&temp);

    let recovered = open(&temp);

    assert_eq!(recovered.post_count(), 3);
    assert_eq!(recovered.last_id(), 3);
    assert_eq!(recovered.posts(), before);
    for (old, new) in before.iter().zip(recovered.iter()) {
        assert_eq!(old.id(), new.id());
        assert_eq!(old.timestamp(), new.timestamp());
        assert_eq!(old.comments(), new.comments());
        assert_eq!(old.render(), new.render());
        assert!(new.is_valid());
    }
}

#[test]
fn test_recovery_result_counts() {
    let temp = TempDir::new().unwrap();
    populate(&temp);

    let recovered = open(&temp);
    let result = recovered.recovery_result();

    assert!(result.index_found);
    assert_eq!(result.posts_recovered, 3);
    assert_eq!(result.comments_recovered, 3);
    assert_eq!(result.last_id, 3);
}

#[test]
fn test_recover_twice_is_stable() {
    let temp = TempDir::new().unwrap();
    populate(&temp);

    let first = open(&temp).render();
    let second = open(&temp).render();

    assert_eq!(first, second);
}

#[test]
fn test_comments_after_restart_append_to_recovered_file() {
    let temp = TempDir::new().unwrap();
    populate(&temp);

    let mut textbook = open(&temp);
    textbook.add_comment(1, "Luke", "Late to the party.").unwrap();
    drop(textbook);

    let recovered = open(&temp);
    let rendered = recovered.post_string(1).unwrap();
    assert!(rendered.contains("Luke Late to the party."));
    assert_eq!(recovered.get(1).unwrap().comment_count(), 1);
}

// =============================================================================
// Removal Across Restarts
// =============================================================================

#[test]
fn test_removed_post_absent_after_restart() {
    let temp = TempDir::new().unwrap();
    populate(&temp);

    let mut textbook = open(&temp);
    let removed = textbook.remove_post(1).unwrap().unwrap();
    drop(textbook);

    let recovered = open(&temp);
    let ids: Vec<u32> = recovered.iter().map(|p| p.id()).collect();
    assert_eq!(ids, vec![1, 3]);
    assert_eq!(recovered.position_of(removed.id()), None);
    assert_eq!(recovered.last_id(), 3);
}

#[test]
fn test_last_id_is_max_of_recovered_ids() {
    let temp = TempDir::new().unwrap();
    populate(&temp);

    // Removing the newest post lowers the recovered high-water mark
    let mut textbook = open(&temp);
    textbook.remove_post(2).unwrap();
    drop(textbook);

    let mut recovered = open(&temp);
    assert_eq!(recovered.last_id(), 2);
    assert_eq!(recovered.add_post("Luke", "Heckled Mason.").unwrap(), 3);
}

#[test]
fn test_recover_preserves_index_order_not_id_order() {
    let temp = TempDir::new().unwrap();
    populate(&temp);
    fs::write(temp.path().join("posts.txt"), "3\n1\n2\n").unwrap();

    let recovered = open(&temp);

    let ids: Vec<u32> = recovered.iter().map(|p| p.id()).collect();
    assert_eq!(ids, vec![3, 1, 2]);
    assert_eq!(recovered.last_id(), 3);
}

#[test]
fn test_add_post_after_index_without_final_newline() {
    let temp = TempDir::new().unwrap();
    populate(&temp);
    fs::write(temp.path().join("posts.txt"), "1\n2\n3").unwrap();

    let mut textbook = open(&temp);
    assert_eq!(textbook.add_post("Luke", "Heckled Mason.").unwrap(), 4);
    drop(textbook);

    let recovered = open(&temp);
    let ids: Vec<u32> = recovered.iter().map(|p| p.id()).collect();
    assert_eq!(ids, vec![1, 2, 3, 4]);
}

// =============================================================================
// Failure Tests
// =============================================================================

#[test]
fn test_missing_post_file_aborts_open() {
    let temp = TempDir::new().unwrap();
    populate(&temp);
    fs::remove_file(temp.path().join("Post-00002.txt")).unwrap();

    let result = TextBook::open(config_for(&temp));

    assert!(matches!(
        result,
        Err(TextBookError::RecoveryFailure { id: Some(2), .. })
    ));
}

#[test]
fn test_corrupt_post_file_aborts_open() {
    let temp = TempDir::new().unwrap();
    populate(&temp);
    fs::write(temp.path().join("Post-00001.txt"), "garbage\n").unwrap();

    let result = TextBook::open(config_for(&temp));

    match result {
        Err(TextBookError::RecoveryFailure { id, reason }) => {
            assert_eq!(id, Some(1));
            assert!(reason.contains("Corrupt record"), "{}", reason);
        }
        other => panic!("expected RecoveryFailure, got {:?}", other.map(|t| t.post_count())),
    }
}

#[test]
fn test_corrupt_comment_line_aborts_open() {
    let temp = TempDir::new().unwrap();
    populate(&temp);
    let path = temp.path().join("Post-00003.txt");
    let mut contents = fs::read_to_string(&path).unwrap();
    contents.push_str("not a comment\n");
    fs::write(&path, contents).unwrap();

    assert!(TextBook::open(config_for(&temp)).is_err());
}

#[test]
fn test_malformed_index_aborts_open() {
    let temp = TempDir::new().unwrap();
    populate(&temp);
    fs::write(temp.path().join("posts.txt"), "1\nfoo\n3\n").unwrap();

    let result = TextBook::open(config_for(&temp));

    assert!(matches!(
        result,
        Err(TextBookError::RecoveryFailure { id: None, .. })
    ));
}

#[test]
fn test_unreferenced_post_files_are_ignored() {
    let temp = TempDir::new().unwrap();
    populate(&temp);
    fs::write(temp.path().join("posts.txt"), "1\n").unwrap();

    let recovered = open(&temp);

    assert_eq!(recovered.post_count(), 1);
    assert_eq!(recovered.last_id(), 1);
}

// =============================================================================
// End-to-end Scenarios
// =============================================================================

#[test]
fn test_scenario_post_comment_restart() {
    let temp = TempDir::new().unwrap();

    let mut textbook = open(&temp);
    textbook.add_post("AdaLovelace", "Did stuff.").unwrap();
    assert_eq!(textbook.last_id(), 1);
    assert_eq!(textbook.post_count(), 1);

    assert!(textbook.add_comment(0, "GraceHopper", "Nice.").unwrap());
    let rendered = textbook.post_string(0).unwrap();
    assert!(rendered.contains("AdaLovelace"));
    assert!(rendered.contains("GraceHopper"));
    drop(textbook);

    let recovered = open(&temp);
    assert_eq!(recovered.last_id(), 1);
    assert_eq!(recovered.post_count(), 1);
    let rendered = recovered.post_string(0).unwrap();
    assert!(rendered.contains("AdaLovelace"));
    assert!(rendered.contains("GraceHopper"));
}

#[test]
fn test_scenario_render_three_posts() {
    let temp = TempDir::new().unwrap();
    let mut textbook = open(&temp);
    textbook.add_post("Mason", "Did stuff.").unwrap();
    textbook.add_post("Luke", "Heckled Mason.").unwrap();
    textbook.add_post("Kathryn", "Sided with Luke.").unwrap();

    let rendered = textbook.render();
    let lines: Vec<&str> = rendered.lines().collect();

    assert_eq!(lines.len(), 4);
    assert!(lines[1].starts_with("0 - 00001 ") && lines[1].contains("Mason"));
    assert!(lines[2].starts_with("1 - 00002 ") && lines[2].contains("Luke"));
    assert!(lines[3].starts_with("2 - 00003 ") && lines[3].contains("Kathryn"));
}
