//! Reads back what an archive run delivered.

use std::fs;
use std::path::Path;

/// Returns every message in `new/`, sorted by file name.
///
/// # Panics
///
/// Panics if the maildir cannot be read.
pub fn delivered_messages(root: &Path) -> Vec<String> {
    let mut entries: Vec<_> = fs::read_dir(root.join("new"))
        .unwrap_or_else(|error| panic!("failed to read maildir: {error}"))
        .map(|entry| entry.unwrap_or_else(|error| panic!("failed to read entry: {error}")))
        .map(|entry| entry.path())
        .collect();
    entries.sort();
    entries
        .iter()
        .map(|path| {
            fs::read_to_string(path)
                .unwrap_or_else(|error| panic!("failed to read {}: {error}", path.display()))
        })
        .collect()
}

/// Counts delivered messages whose subject names pull request `number`.
pub fn messages_for(messages: &[String], number: u64) -> usize {
    let marker = format!("[#{number}]");
    messages
        .iter()
        .filter(|message| {
            message
                .lines()
                .any(|line| line.starts_with("Subject: ") && line.contains(&marker))
        })
        .count()
}
