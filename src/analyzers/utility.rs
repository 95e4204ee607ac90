use std::collections::HashMap;
use std::hash::Hash;

use crate::analyzers::types::Tally;
use crate::dataset::{Dataset, TripRecord};
use crate::error::{Result, StatsError};

/// Value counts that remember first-seen order.
///
/// Entries are stored in the order their key first appeared, so a scan for
/// the maximum that only replaces on a strictly larger count resolves ties to
/// the earliest value.
#[derive(Debug, Clone)]
pub struct FrequencyTable<K> {
    entries: Vec<(K, usize)>,
    positions: HashMap<K, usize>,
}

impl<K> Default for FrequencyTable<K> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            positions: HashMap::new(),
        }
    }
}

impl<K: Eq + Hash + Clone> FrequencyTable<K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, key: K) {
        match self.positions.get(&key) {
            Some(&pos) => self.entries[pos].1 += 1,
            None => {
                self.positions.insert(key.clone(), self.entries.len());
                self.entries.push((key, 1));
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `(key, count)` pairs in first-seen order.
    pub fn entries(&self) -> &[(K, usize)] {
        &self.entries
    }

    /// Most frequent key; the earliest one wins a tie.
    pub fn mode(&self) -> Option<Tally<K>> {
        let mut best: Option<&(K, usize)> = None;
        for entry in &self.entries {
            if best.is_none_or(|b| entry.1 > b.1) {
                best = Some(entry);
            }
        }
        best.map(|(value, count)| Tally::new(value.clone(), *count))
    }

    /// Every key by count, highest first; equal counts keep first-seen order.
    pub fn ranked(&self) -> Vec<Tally<K>> {
        let mut ranked: Vec<_> = self
            .entries
            .iter()
            .map(|(value, count)| Tally::new(value.clone(), *count))
            .collect();
        ranked.sort_by(|a, b| b.count.cmp(&a.count));
        ranked
    }
}

impl<K: Eq + Hash + Clone> FromIterator<K> for FrequencyTable<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut table = Self::new();
        for key in iter {
            table.record(key);
        }
        table
    }
}

/// Mode of `key` across the dataset.
///
/// # Errors
///
/// Returns [`StatsError::EmptyDataset`] naming `statistic` when there are no
/// trips.
pub fn mode_of<K, F>(dataset: &Dataset, statistic: &'static str, key: F) -> Result<Tally<K>>
where
    K: Eq + Hash + Clone,
    F: Fn(&TripRecord) -> K,
{
    dataset
        .iter()
        .map(key)
        .collect::<FrequencyTable<K>>()
        .mode()
        .ok_or(StatsError::EmptyDataset { statistic })
}

/// Fills gaps by linear interpolation over position.
///
/// Interior gaps are spread evenly between their known neighbours, trailing
/// gaps repeat the last known value, and leading gaps stay empty.
pub fn interpolate_linear(values: &mut [Option<f64>]) {
    let mut last_known: Option<(usize, f64)> = None;

    for i in 0..values.len() {
        let Some(current) = values[i] else {
            continue;
        };

        if let Some((prev_idx, prev)) = last_known {
            let span = (i - prev_idx) as f64;
            for (offset, slot) in values[prev_idx + 1..i].iter_mut().enumerate() {
                let step = (offset + 1) as f64;
                *slot = Some(prev + (current - prev) * step / span);
            }
        }

        last_known = Some((i, current));
    }

    if let Some((idx, value)) = last_known {
        for slot in &mut values[idx + 1..] {
            *slot = Some(value);
        }
    }
}
