use std::collections::BTreeMap;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

/// One finished game, as appended to the score ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub name: String,
    pub cols: u8,
    pub rows: u8,
    pub score: u32,
}

/// Append one entry to the ledger. The file is never rewritten.
pub fn append(path: &Path, entry: &Entry) -> anyhow::Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("opening ledger {}", path.display()))?;
    let mut line = serde_json::to_string(entry)?;
    line.push('\n');
    file.write_all(line.as_bytes())?;
    Ok(())
}

pub fn load(path: &Path) -> anyhow::Result<Vec<Entry>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let file = File::open(path).with_context(|| format!("opening ledger {}", path.display()))?;
    let mut entries = Vec::new();
    for line in BufReader::new(file).lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        entries.push(serde_json::from_str(&line).context("malformed ledger line")?);
    }
    Ok(entries)
}

/// Best score for a player on a given board size.
pub fn best(entries: &[Entry], name: &str, cols: u8, rows: u8) -> Option<u32> {
    entries
        .iter()
        .filter(|e| e.name == name && e.cols == cols && e.rows == rows)
        .map(|e| e.score)
        .max()
}

/// Print the best score per player and board size.
pub fn print_best(path: &Path) -> anyhow::Result<()> {
    let entries = load(path)?;
    if entries.is_empty() {
        println!("no recorded games");
        return Ok(());
    }

    let mut table: BTreeMap<(String, u8, u8), u32> = BTreeMap::new();
    for e in entries {
        let key = (e.name, e.cols, e.rows);
        let slot = table.entry(key).or_insert(e.score);
        if e.score > *slot {
            *slot = e.score;
        }
    }
    for ((name, cols, rows), score) in table {
        println!("{name} ({cols}x{rows}): {score}");
    }
    Ok(())
}
