//! Bulk registration import from CSV (one player per row).

use crate::logic::xp::XpWeights;
use crate::models::{Candidate, CandidateStats};
use serde::Deserialize;
use std::io;

/// Errors from reading a registration CSV.
#[derive(Debug)]
pub enum ImportError {
    /// Malformed CSV or a field that does not parse.
    Csv(csv::Error),
    /// Data row (1-based, header excluded) has a blank name.
    EmptyName { row: usize },
}

impl std::fmt::Display for ImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImportError::Csv(e) => write!(f, "Invalid CSV: {}", e),
            ImportError::EmptyName { row } => write!(f, "Row {} has no player name", row),
        }
    }
}

impl std::error::Error for ImportError {}

impl From<csv::Error> for ImportError {
    fn from(e: csv::Error) -> Self {
        ImportError::Csv(e)
    }
}

/// Columns other than `name` may be missing or empty.
#[derive(Deserialize)]
struct CandidateRow {
    name: String,
    #[serde(default)]
    xp: Option<u32>,
    #[serde(default)]
    games_played: Option<u32>,
    #[serde(default)]
    streak: Option<u32>,
    #[serde(default)]
    bonuses: Option<u32>,
    #[serde(default)]
    penalties: Option<u32>,
}

/// Read candidates from CSV with a header row.
///
/// Recognised columns: `name`, `xp`, `games_played`, `streak`, `bonuses`, `penalties`.
/// Rows without an `xp` value get XP computed from their stats with `weights`.
pub fn candidates_from_csv<R: io::Read>(
    reader: R,
    weights: &XpWeights,
) -> Result<Vec<Candidate>, ImportError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut candidates = Vec::new();
    for (i, row) in rdr.deserialize::<CandidateRow>().enumerate() {
        let row = row?;
        if row.name.is_empty() {
            return Err(ImportError::EmptyName { row: i + 1 });
        }
        let stats = CandidateStats {
            games_played: row.games_played.unwrap_or(0),
            streak: row.streak.unwrap_or(0),
            bonuses: row.bonuses.unwrap_or(0),
            penalties: row.penalties.unwrap_or(0),
        };
        let candidate = match row.xp {
            Some(xp) => Candidate::new(row.name, xp).with_stats(stats),
            None => Candidate::from_stats(row.name, stats, weights),
        };
        candidates.push(candidate);
    }
    log::debug!("Imported {} candidate(s) from CSV", candidates.len());
    Ok(candidates)
}
