//! Disease risk scoring
//!
//! Each disease is scored by scanning the start of a forecast series. A sample
//! that meets the disease's temperature/humidity/wetness conditions adds a flat
//! number of points (plus a bonus when wet) and extends the current run of
//! qualifying samples; any other sample resets the run. Once the run reaches the
//! disease's threshold, the run bonus is added for that sample and for every
//! following sample while the run lasts. The total is clamped to 0..=100.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::models::HourlySample;

/// Lowest possible risk score
pub const MIN_SCORE: i32 = 0;

/// Highest possible risk score
pub const MAX_SCORE: i32 = 100;

/// Diseases tracked for every terrain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Disease {
    /// Brown rust
    RouilleBrune,
    /// Black (stem) rust
    RouilleNoire,
    /// Yellow (stripe) rust
    RouilleJaune,
    /// Septoria leaf blotch
    Septoriose,
}

impl Disease {
    pub const ALL: [Disease; 4] = [
        Disease::RouilleBrune,
        Disease::RouilleNoire,
        Disease::RouilleJaune,
        Disease::Septoriose,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Disease::RouilleBrune => "rouille_brune",
            Disease::RouilleNoire => "rouille_noire",
            Disease::RouilleJaune => "rouille_jaune",
            Disease::Septoriose => "septoriose",
        }
    }

    /// Fixed scoring parameters for this disease
    pub fn rule(&self) -> &'static RiskRule {
        match self {
            Disease::RouilleBrune => &ROUILLE_BRUNE,
            Disease::RouilleNoire => &ROUILLE_NOIRE,
            Disease::RouilleJaune => &ROUILLE_JAUNE,
            Disease::Septoriose => &SEPTORIOSE,
        }
    }

    /// Score a forecast series for this disease
    pub fn score(&self, series: &[HourlySample]) -> i32 {
        self.rule().score(series)
    }
}

impl fmt::Display for Disease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown disease: {0}")]
pub struct UnknownDisease(pub String);

impl FromStr for Disease {
    type Err = UnknownDisease;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Disease::ALL
            .into_iter()
            .find(|d| d.as_str() == s)
            .ok_or_else(|| UnknownDisease(s.to_string()))
    }
}

/// Thresholds and points for one disease
#[derive(Debug, Clone, PartialEq)]
pub struct RiskRule {
    /// Number of leading samples scanned
    pub window: usize,
    /// Inclusive temperature bounds in °C
    pub min_temperature: f64,
    pub max_temperature: f64,
    /// Humidity floor in percent, if the disease has one
    pub min_humidity: Option<f64>,
    pub requires_wet: bool,
    pub points_per_sample: i32,
    /// Extra points when a qualifying sample is wet
    pub wet_bonus: i32,
    pub run_threshold: u32,
    pub run_bonus: i32,
}

const ROUILLE_BRUNE: RiskRule = RiskRule {
    window: 24,
    min_temperature: 15.0,
    max_temperature: 25.0,
    min_humidity: Some(85.0),
    requires_wet: false,
    points_per_sample: 5,
    wet_bonus: 3,
    run_threshold: 6,
    run_bonus: 20,
};

const ROUILLE_NOIRE: RiskRule = RiskRule {
    window: 24,
    min_temperature: 18.0,
    max_temperature: 30.0,
    min_humidity: Some(90.0),
    requires_wet: false,
    points_per_sample: 6,
    wet_bonus: 0,
    run_threshold: 8,
    run_bonus: 25,
};

const ROUILLE_JAUNE: RiskRule = RiskRule {
    window: 24,
    min_temperature: 7.0,
    max_temperature: 18.0,
    min_humidity: Some(87.0),
    requires_wet: false,
    points_per_sample: 5,
    wet_bonus: 4,
    run_threshold: 5,
    run_bonus: 20,
};

const SEPTORIOSE: RiskRule = RiskRule {
    window: 48,
    min_temperature: 15.0,
    max_temperature: 20.0,
    min_humidity: None,
    requires_wet: true,
    points_per_sample: 4,
    wet_bonus: 0,
    run_threshold: 20,
    run_bonus: 30,
};

impl RiskRule {
    /// Whether a sample meets every condition of this rule
    pub fn qualifies(&self, sample: &HourlySample) -> bool {
        let temperature_ok = (self.min_temperature..=self.max_temperature)
            .contains(&sample.temperature);
        let humidity_ok = self
            .min_humidity
            .map_or(true, |floor| sample.humidity >= floor);
        let wet_ok = !self.requires_wet || sample.is_wet();

        temperature_ok && humidity_ok && wet_ok
    }

    pub fn score(&self, series: &[HourlySample]) -> i32 {
        let mut score = 0;
        let mut run: u32 = 0;

        for sample in series.iter().take(self.window) {
            if self.qualifies(sample) {
                run += 1;
                score += self.points_per_sample;
                if sample.is_wet() {
                    score += self.wet_bonus;
                }
            } else {
                run = 0;
            }

            // The run is not reset after the bonus, so it repeats every sample past the threshold.
            if run >= self.run_threshold {
                score += self.run_bonus;
            }
        }

        clamp_score(score)
    }
}

pub fn clamp_score(raw: i32) -> i32 {
    raw.clamp(MIN_SCORE, MAX_SCORE)
}

/// Risk score per disease, every disease always present
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskScores {
    pub rouille_brune: i32,
    pub rouille_noire: i32,
    pub rouille_jaune: i32,
    pub septoriose: i32,
}

impl RiskScores {
    /// Score every disease independently over the same series
    pub fn compute(series: &[HourlySample]) -> Self {
        Self {
            rouille_brune: Disease::RouilleBrune.score(series),
            rouille_noire: Disease::RouilleNoire.score(series),
            rouille_jaune: Disease::RouilleJaune.score(series),
            septoriose: Disease::Septoriose.score(series),
        }
    }

    pub fn get(&self, disease: Disease) -> i32 {
        match disease {
            Disease::RouilleBrune => self.rouille_brune,
            Disease::RouilleNoire => self.rouille_noire,
            Disease::RouilleJaune => self.rouille_jaune,
            Disease::Septoriose => self.septoriose,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Disease, i32)> + '_ {
        Disease::ALL.into_iter().map(move |d| (d, self.get(d)))
    }
}
