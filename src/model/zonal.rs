// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Newtype wrapper for the zone id -> mean surface value mapping.
///
/// Zones that cover no surface cell have no entry at all; an entry of `0.0`
/// is a real measurement.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ZonalStatistic(pub BTreeMap<String, f64>);

impl ZonalStatistic {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    pub fn insert(&mut self, zone_id: impl Into<String>, mean: f64) {
        self.0.insert(zone_id.into(), mean);
    }

    pub fn get(&self, zone_id: &str) -> Option<f64> {
        self.0.get(zone_id).copied()
    }

    pub fn contains(&self, zone_id: &str) -> bool {
        self.0.contains_key(zone_id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, f64)> for ZonalStatistic {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
