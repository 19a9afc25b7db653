//! Engine configuration.
//!
//! Configuration is plain data: it can be built in code, taken from
//! `Default`, or deserialized from JSON with missing fields falling back to
//! their defaults.

use crate::decay::{DecayPolicy, ExponentialDecay, NoDecay};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Top-level configuration for a [`crate::engine::MemoryEngine`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Confidence decay applied when pruning the memory graph
    #[serde(default)]
    pub decay: DecayConfig,

    /// Tuning for semantic tag ingestion into the lattice
    #[serde(default)]
    pub lattice: LatticeConfig,
}

impl EngineConfig {
    /// Configuration under which memory confidence never decays.
    pub fn no_decay() -> Self {
        Self {
            decay: DecayConfig::disabled(),
            lattice: LatticeConfig::default(),
        }
    }

    /// Parse a configuration from JSON and validate it.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check every section for out-of-range values.
    pub fn validate(&self) -> Result<()> {
        self.decay.validate()?;
        self.lattice.validate()
    }
}

/// Configuration for temporal decay of memory confidence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecayConfig {
    /// Fraction of confidence retained per day of age, in (0, 1].
    /// A value of 1.0 disables decay.
    #[serde(default = "default_daily_retention")]
    pub daily_retention: f64,
}

fn default_daily_retention() -> f64 {
    ExponentialDecay::DEFAULT_DAILY_RETENTION
}

impl Default for DecayConfig {
    fn default() -> Self {
        Self {
            daily_retention: default_daily_retention(),
        }
    }
}

impl DecayConfig {
    /// Decay disabled: effective confidence equals stored confidence.
    pub fn disabled() -> Self {
        Self {
            daily_retention: 1.0,
        }
    }

    /// Validate the retention range.
    pub fn validate(&self) -> Result<()> {
        if !(self.daily_retention > 0.0 && self.daily_retention <= 1.0) {
            return Err(Error::Config(format!(
                "decay.daily_retention must be in (0, 1], got {}",
                self.daily_retention
            )));
        }
        Ok(())
    }

    /// Build the decay policy this configuration describes.
    pub fn policy(&self) -> Arc<dyn DecayPolicy> {
        if self.daily_retention >= 1.0 {
            Arc::new(NoDecay)
        } else {
            Arc::new(ExponentialDecay::new(self.daily_retention))
        }
    }
}

/// Configuration for concept ingestion into the symbolic lattice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatticeConfig {
    /// Weight of a co-occurrence edge when first created
    #[serde(default = "default_initial_edge_weight")]
    pub initial_edge_weight: f64,

    /// Amount added to an existing co-occurrence edge on each repeat
    #[serde(default = "default_weight_increment")]
    pub weight_increment: f64,

    /// Confidence assigned to concepts created by ingestion
    #[serde(default = "default_concept_confidence")]
    pub concept_confidence: f64,
}

fn default_initial_edge_weight() -> f64 {
    1.0
}

fn default_weight_increment() -> f64 {
    1.0
}

fn default_concept_confidence() -> f64 {
    1.0
}

impl Default for LatticeConfig {
    fn default() -> Self {
        Self {
            initial_edge_weight: default_initial_edge_weight(),
            weight_increment: default_weight_increment(),
            concept_confidence: default_concept_confidence(),
        }
    }
}

impl LatticeConfig {
    /// Validate weights and confidence.
    pub fn validate(&self) -> Result<()> {
        if !(self.initial_edge_weight.is_finite() && self.initial_edge_weight >= 0.0) {
            return Err(Error::Config(format!(
                "lattice.initial_edge_weight must be a non-negative number, got {}",
                self.initial_edge_weight
            )));
        }
        if !(self.weight_increment.is_finite() && self.weight_increment > 0.0) {
            return Err(Error::Config(format!(
                "lattice.weight_increment must be positive, got {}",
                self.weight_increment
            )));
        }
        if !(0.0..=1.0).contains(&self.concept_confidence) {
            return Err(Error::Config(format!(
                "lattice.concept_confidence must be in [0, 1], got {}",
                self.concept_confidence
            )));
        }
        Ok(())
    }
}
