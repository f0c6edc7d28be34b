use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use crate::error::HabitError;

/// Reserved top-level key for store metadata; never a habit name.
pub const META_KEY: &str = "_meta";

/// Starter habits seeded into a brand-new store.
pub const DEFAULT_HABITS: &[&str] = &["Drink Water", "Exercise", "Read", "Sleep Early"];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HabitRecord {
    pub done: bool,
    pub streak: u32,
    pub last_done: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meta {
    #[serde(default)]
    pub last_reset: Option<NaiveDate>,
}

/// The whole persisted document: habit name -> record, plus the reserved
/// `_meta` entry. Serializes as a single flat JSON object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HabitStore {
    #[serde(rename = "_meta", default)]
    meta: Meta,
    #[serde(flatten)]
    habits: BTreeMap<String, HabitRecord>,
}

impl HabitStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a fresh record (not done, streak 0, never completed).
    pub fn add(&mut self, name: &str) -> Result<(), HabitError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(HabitError::EmptyName);
        }
        if name == META_KEY {
            return Err(HabitError::ReservedName(name.to_string()));
        }
        match self.habits.entry(name.to_string()) {
            Entry::Occupied(_) => Err(HabitError::Duplicate(name.to_string())),
            Entry::Vacant(slot) => {
                slot.insert(HabitRecord::default());
                Ok(())
            }
        }
    }

    /// Marks a habit completed for `today` and updates its streak.
    ///
    /// The streak extends only when the previous completion was exactly
    /// yesterday; a same-day re-mark is a no-op for the counter, and any
    /// other prior date (including none) restarts the streak at 1.
    pub fn mark_done(&mut self, name: &str, today: NaiveDate) -> Result<(), HabitError> {
        let record = self
            .habits
            .get_mut(name)
            .ok_or_else(|| HabitError::NotFound(name.to_string()))?;

        record.streak = match record.last_done {
            Some(last) if last == today => record.streak,
            Some(last) if last.succ_opt() == Some(today) => record.streak + 1,
            _ => 1,
        };
        record.done = true;
        record.last_done = Some(today);
        Ok(())
    }

    /// Clears today's done flag. Streak and last_done are left as the
    /// preceding mark set them; mark/unmark is not a true inverse.
    pub fn unmark(&mut self, name: &str) -> Result<(), HabitError> {
        let record = self
            .habits
            .get_mut(name)
            .ok_or_else(|| HabitError::NotFound(name.to_string()))?;
        record.done = false;
        Ok(())
    }

    pub fn delete(&mut self, name: &str) -> Result<(), HabitError> {
        self.habits
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| HabitError::NotFound(name.to_string()))
    }

    /// Clears every done flag once per calendar day. Streaks are untouched;
    /// repeat calls with the same date are no-ops.
    pub fn reset_daily(&mut self, today: NaiveDate) {
        if self.meta.last_reset == Some(today) {
            return;
        }
        for record in self.habits.values_mut() {
            record.done = false;
        }
        self.meta.last_reset = Some(today);
    }

    /// Seeds the starter habits into an otherwise empty store and stamps the
    /// reset date. Intended to run once, at first-ever launch.
    pub fn ensure_defaults(&mut self, today: NaiveDate) {
        if !self.habits.is_empty() {
            return;
        }
        for name in DEFAULT_HABITS {
            self.habits.entry((*name).to_string()).or_default();
        }
        self.meta.last_reset = Some(today);
    }

    pub fn get(&self, name: &str) -> Option<&HabitRecord> {
        self.habits.get(name)
    }

    /// Habit entries in name order; the meta record is not a habit.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &HabitRecord)> {
        self.habits.iter().map(|(name, record)| (name.as_str(), record))
    }

    pub fn is_empty(&self) -> bool {
        self.habits.is_empty()
    }

    pub fn last_reset(&self) -> Option<NaiveDate> {
        self.meta.last_reset
    }
}
