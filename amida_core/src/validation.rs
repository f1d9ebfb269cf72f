//! Validation Module - Roster of participant and result entries
//! ==============================================================
//!
//! The roster is the caller-owned form state: two editable lists of text
//! entries. Neither list is ever empty; removing the last slot leaves a
//! single blank slot behind, the way an entry form keeps one empty field.
//!
//! Before a draw, blank entries are dropped and the remainder trimmed.
//! Callers that want the strict experience use [`Roster::validate`], which
//! rejects empty or unequal lists. The generator itself stays tolerant.
//!
//! Usage:
//! ```ignore
//! use amida_core::validation::Roster;
//!
//! let mut roster = Roster::new();
//! roster.set_participant(0, "Alice");
//! roster.add_participant();
//! roster.set_participant(1, "Bob");
//! roster.set_result(0, "Tea");
//! roster.add_result();
//! roster.set_result(1, "Coffee");
//!
//! let entries = roster.validate()?;
//! ```

use thiserror::Error;

/// Reasons a roster is not ready for a draw.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RosterError {
    /// One of the lists has no non-blank entries
    #[error("Enter at least one participant and one result")]
    Empty,

    /// The filtered lists differ in length
    #[error("Participant count ({participants}) must match result count ({results})")]
    LengthMismatch { participants: usize, results: usize },
}

/// Trimmed, non-blank entries ready to hand to the generator.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Entries {
    pub participants: Vec<String>,
    pub results: Vec<String>,
}

impl Entries {
    /// True when both lists are non-empty and equally long.
    pub fn is_balanced(&self) -> bool {
        !self.participants.is_empty() && self.participants.len() == self.results.len()
    }
}

/// Editable entry lists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Roster {
    participants: Vec<String>,
    results: Vec<String>,
}

impl Default for Roster {
    fn default() -> Self {
        Self::new()
    }
}

impl Roster {
    /// A roster with one blank slot in each list.
    pub fn new() -> Self {
        Self {
            participants: vec![String::new()],
            results: vec![String::new()],
        }
    }

    /// Builds a roster from pre-filled entries (blank lists get one slot).
    pub fn from_entries<P, Q>(participants: P, results: Q) -> Self
    where
        P: IntoIterator,
        P::Item: Into<String>,
        Q: IntoIterator,
        Q::Item: Into<String>,
    {
        let mut roster = Self {
            participants: participants.into_iter().map(Into::into).collect(),
            results: results.into_iter().map(Into::into).collect(),
        };
        ensure_slot(&mut roster.participants);
        ensure_slot(&mut roster.results);
        roster
    }

    pub fn participants(&self) -> &[String] {
        &self.participants
    }

    pub fn results(&self) -> &[String] {
        &self.results
    }

    pub fn add_participant(&mut self) {
        self.participants.push(String::new());
    }

    pub fn add_result(&mut self) {
        self.results.push(String::new());
    }

    /// Overwrites a slot; returns false if the index does not exist.
    pub fn set_participant(&mut self, index: usize, value: impl Into<String>) -> bool {
        set_slot(&mut self.participants, index, value.into())
    }

    pub fn set_result(&mut self, index: usize, value: impl Into<String>) -> bool {
        set_slot(&mut self.results, index, value.into())
    }

    /// Removes a slot, leaving one blank slot if the list would be empty.
    pub fn remove_participant(&mut self, index: usize) -> bool {
        remove_slot(&mut self.participants, index)
    }

    pub fn remove_result(&mut self, index: usize) -> bool {
        remove_slot(&mut self.results, index)
    }

    /// Trimmed non-blank copies of both lists, without further checks.
    pub fn entries(&self) -> Entries {
        Entries {
            participants: filled(&self.participants),
            results: filled(&self.results),
        }
    }

    /// Entries, if both lists are non-empty and equally long.
    pub fn validate(&self) -> Result<Entries, RosterError> {
        let entries = self.entries();
        if entries.participants.is_empty() || entries.results.is_empty() {
            return Err(RosterError::Empty);
        }
        if entries.participants.len() != entries.results.len() {
            return Err(RosterError::LengthMismatch {
                participants: entries.participants.len(),
                results: entries.results.len(),
            });
        }
        Ok(entries)
    }
}

fn ensure_slot(list: &mut Vec<String>) {
    if list.is_empty() {
        list.push(String::new());
    }
}

fn set_slot(list: &mut [String], index: usize, value: String) -> bool {
    match list.get_mut(index) {
        Some(slot) => {
            *slot = value;
            true
        }
        None => false,
    }
}

fn remove_slot(list: &mut Vec<String>, index: usize) -> bool {
    if index >= list.len() {
        return false;
    }
    list.remove(index);
    ensure_slot(list);
    true
}

fn filled(list: &[String]) -> Vec<String> {
    list.iter()
        .map(|entry| entry.trim())
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}

// =============================================================================
// TESTS
// =============================================================================
