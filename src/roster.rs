//! Entry list and winner history
//!
//! The engine only ever reads a snapshot of the entries. Editing the list,
//! resolving a typed-in winner name and removing winners happen here, on
//! the caller's side, between spins.

use crate::common::traits::ExclusionRule;
use crate::common::types::SpinOutcome;
use crate::errors::RosterError;
use crate::wheel::selector::eligible_indices;
use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One settled spin kept in the history
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct WinnerRecord {
    pub label: String,
    pub index: usize,
    pub session_id: Uuid,
    pub settled_at: DateTime<Utc>,
}

impl From<&SpinOutcome> for WinnerRecord {
    fn from(outcome: &SpinOutcome) -> Self {
        Self {
            label: outcome.winner_label.clone(),
            index: outcome.winner_index,
            session_id: outcome.session_id,
            settled_at: outcome.settled_at,
        }
    }
}

/// Wheel label for a person and the entity they represent
pub fn entity_label(name: &str, entity: &str) -> String {
    format!("{} - {}", name.trim().to_uppercase(), entity.trim().to_uppercase())
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct Roster {
    entries: Vec<String>,
    winners: Vec<WinnerRecord>,
}

impl Roster {
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            entries: entries.into_iter().map(Into::into).collect(),
            winners: Vec::new(),
        }
    }

    /// One entry per line; labels are trimmed and blank lines dropped
    pub fn from_lines(text: &str) -> Self {
        Self::new(
            text.lines()
                .map(str::trim)
                .filter(|line| !line.is_empty()),
        )
    }

    /// Entries labelled `"NAME - ENTITY"` from name/entity pairs
    pub fn from_name_entity_rows<I, N, E>(rows: I) -> Self
    where
        I: IntoIterator<Item = (N, E)>,
        N: AsRef<str>,
        E: AsRef<str>,
    {
        Self::new(rows.into_iter().filter_map(|(name, entity)| {
            let name: &str = name.as_ref();
            (!name.trim().is_empty()).then(|| entity_label(name, entity.as_ref()))
        }))
    }

    /// Comma- or tab-separated `name,entity` rows, as exported from a
    /// spreadsheet. A leading `name,entity` header row is skipped; rows
    /// without an entity column are dropped.
    pub fn from_delimited(text: &str) -> Self {
        let rows = text
            .lines()
            .filter_map(|line| line.split_once(|c: char| c == ',' || c == '\t'))
            .map(|(name, entity)| (name.trim(), entity.trim()))
            .enumerate()
            .filter(|(row, (name, entity))| {
                !(*row == 0 && name.eq_ignore_ascii_case("name") && entity.eq_ignore_ascii_case("entity"))
            })
            .map(|(_, pair)| pair);
        Self::from_name_entity_rows(rows)
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn winners(&self) -> &[WinnerRecord] {
        &self.winners
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn shuffle<G: Rng + ?Sized>(&mut self, rng: &mut G) {
        self.entries.shuffle(rng);
    }

    pub fn sort(&mut self) {
        self.entries.sort();
    }

    pub fn eligible_count<R: ExclusionRule + ?Sized>(&self, rule: &R) -> usize {
        eligible_indices(&self.entries, rule).len()
    }

    /// Index to force a spin onto the entry called `name`.
    ///
    /// Takes the first matching entry. Unlike a raw target index, a named
    /// winner must also pass the exclusion rule.
    pub fn target_for<R: ExclusionRule + ?Sized>(
        &self,
        name: &str,
        rule: &R,
    ) -> Result<usize, RosterError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(RosterError::EmptyName);
        }

        let index = self
            .entries
            .iter()
            .position(|entry| entry == name)
            .ok_or_else(|| RosterError::UnknownEntry(name.to_string()))?;

        if rule.is_excluded(name) {
            return Err(RosterError::ExcludedEntry(name.to_string()));
        }
        Ok(index)
    }

    /// Append the outcome to the history; with `remove`, drop every entry
    /// carrying the winner's label. Returns how many entries were removed.
    pub fn record_winner(&mut self, outcome: &SpinOutcome, remove: bool) -> usize {
        self.winners.push(WinnerRecord::from(outcome));

        if !remove {
            return 0;
        }
        let before = self.entries.len();
        self.entries.retain(|entry| *entry != outcome.winner_label);
        let removed = before - self.entries.len();
        tracing::debug!("Removed {} entries labelled '{}'", removed, outcome.winner_label);
        removed
    }

    pub fn clear_winners(&mut self) {
        self.winners.clear();
    }
}
