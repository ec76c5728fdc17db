//! Distance-banded level of detail
//!
//! Three ascending thresholds split view distance into four tiers. The
//! selection is a pure function of the distance and the current thresholds;
//! there is no hysteresis, so a distance sitting on a boundary can flip tiers
//! from one frame to the next.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::LodConfig;

/// Discrete visual-fidelity tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LodTier {
    /// Full mesh with details
    High,
    /// Simplified mesh
    Medium,
    /// Simple primitive
    Low,
    /// Point sprite
    UltraLow,
}

impl LodTier {
    /// Continuous detail factor for consumers that blend instead of switching
    pub fn detail_factor(self) -> f32 {
        match self {
            Self::High => 1.0,
            Self::Medium => 0.75,
            Self::Low => 0.5,
            Self::UltraLow => 0.25,
        }
    }
}

impl fmt::Display for LodTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::High => "HIGH",
            Self::Medium => "MEDIUM",
            Self::Low => "LOW",
            Self::UltraLow => "ULTRA_LOW",
        };
        f.write_str(name)
    }
}

/// Maps camera distance to a [`LodTier`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LodSelector {
    thresholds: LodConfig,
}

impl Default for LodSelector {
    fn default() -> Self {
        Self {
            thresholds: LodConfig::default(),
        }
    }
}

impl LodSelector {
    /// Create a selector from configured thresholds.
    ///
    /// Invalid thresholds fall back to the defaults.
    pub fn new(config: LodConfig) -> Self {
        let mut selector = Self::default();
        selector.set_thresholds(config.high, config.medium, config.low);
        selector
    }

    /// Current thresholds
    pub fn thresholds(&self) -> LodConfig {
        self.thresholds
    }

    /// Replace the thresholds; takes effect on the next evaluation.
    ///
    /// Rejected (returns `false`, previous thresholds kept) unless all three
    /// are finite, non-negative and ascending.
    pub fn set_thresholds(&mut self, high: f32, medium: f32, low: f32) -> bool {
        let candidate = LodConfig { high, medium, low };
        if !candidate.is_valid() {
            log::warn!(
                "Ignoring LOD thresholds ({high}, {medium}, {low}); keeping ({}, {}, {})",
                self.thresholds.high,
                self.thresholds.medium,
                self.thresholds.low
            );
            return false;
        }
        self.thresholds = candidate;
        true
    }

    /// Tier for a view distance
    pub fn tier_for(&self, distance: f32) -> LodTier {
        if distance < self.thresholds.high {
            LodTier::High
        } else if distance < self.thresholds.medium {
            LodTier::Medium
        } else if distance < self.thresholds.low {
            LodTier::Low
        } else {
            LodTier::UltraLow
        }
    }

    /// Detail factor for a view distance (same bands as [`LodSelector::tier_for`])
    pub fn detail_factor(&self, distance: f32) -> f32 {
        self.tier_for(distance).detail_factor()
    }
}
