//! Fund history model and merge rules

use chrono::NaiveDate;
use std::collections::HashSet;

/// One trading day's closing price and outstanding share amount for a fund.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub date: NaiveDate,
    pub price: f64,
    pub amount: f64,
}

impl Observation {
    pub fn new(date: NaiveDate, price: f64, amount: f64) -> Self {
        Observation {
            date,
            price,
            amount,
        }
    }
}

/// Date-deduplicated history for one fund.
///
/// Observations are held oldest first; the remote source delivers rows
/// newest first and providers reverse them before they reach this type.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Series {
    observations: Vec<Observation>,
}

impl Series {
    pub fn new() -> Self {
        Series::default()
    }

    pub fn from_observations(observations: Vec<Observation>) -> Self {
        Series { observations }
    }

    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    pub fn latest(&self) -> Option<&Observation> {
        self.observations.last()
    }

    /// Prices in series order. Derived for display, never stored.
    pub fn prices(&self) -> Vec<f64> {
        self.observations.iter().map(|obs| obs.price).collect()
    }

    /// Share amounts in series order. Derived for display, never stored.
    pub fn amounts(&self) -> Vec<f64> {
        self.observations.iter().map(|obs| obs.amount).collect()
    }

    /// Combines this series with a freshly fetched batch and an optional
    /// intraday quote into a new date-deduplicated series.
    ///
    /// An incoming observation is appended only if its date is not already
    /// present, so a stored closing figure always wins over a re-fetched
    /// one. Duplicate dates within `incoming` keep the first occurrence.
    /// `today` is appended at the live end unless its date already exists;
    /// a collision drops the intraday estimate silently.
    ///
    /// Both inputs must already be ascending by date; merge deduplicates
    /// but never re-sorts.
    pub fn merge(&self, incoming: &[Observation], today: Option<Observation>) -> Series {
        let mut seen: HashSet<NaiveDate> =
            self.observations.iter().map(|obs| obs.date).collect();
        let mut merged = self.observations.clone();

        for obs in incoming {
            if seen.insert(obs.date) {
                merged.push(obs.clone());
            }
        }

        if let Some(today) = today {
            if seen.insert(today.date) {
                merged.push(today);
            }
        }

        Series {
            observations: merged,
        }
    }
}
