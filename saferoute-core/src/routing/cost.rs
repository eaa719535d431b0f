//! Composite length/safety edge weight

use serde::{Deserialize, Serialize};

use crate::{Error, MIN_EDGE_WEIGHT, RoadEdge};

/// Shape of the safety penalty term
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SafetyPenalty {
    /// `(1 - s / safety_max) * length`, unsafe long segments cost more than
    /// unsafe short ones
    #[default]
    LengthScaled,
    /// `1 - s / safety_max`, independent of segment length
    Flat,
}

/// Converts edge attributes into a single scalar search weight:
///
/// `weight = length_weight * length + safety_weight * penalty(safety)`
///
/// The penalty decreases monotonically with safety. Weights are floored at
/// [`MIN_EDGE_WEIGHT`] so every edge costs something.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CostModel {
    pub length_weight: f64,
    pub safety_weight: f64,
    /// Upper bound of the safety score scale
    pub safety_max: f64,
    pub penalty: SafetyPenalty,
}

impl Default for CostModel {
    fn default() -> Self {
        Self {
            length_weight: 1.0,
            safety_weight: 1.0,
            safety_max: 1.0,
            penalty: SafetyPenalty::LengthScaled,
        }
    }
}

impl CostModel {
    /// Creates a model with the given coefficients and default safety scale
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] if a coefficient is negative or
    /// non-finite, or both are zero.
    pub fn new(length_weight: f64, safety_weight: f64) -> Result<Self, Error> {
        let model = Self {
            length_weight,
            safety_weight,
            ..Self::default()
        };
        model.validate()?;
        Ok(model)
    }

    #[must_use]
    pub fn with_safety_max(mut self, safety_max: f64) -> Self {
        self.safety_max = safety_max;
        self
    }

    #[must_use]
    pub fn with_penalty(mut self, penalty: SafetyPenalty) -> Self {
        self.penalty = penalty;
        self
    }

    pub fn validate(&self) -> Result<(), Error> {
        for (name, value) in [
            ("length_weight", self.length_weight),
            ("safety_weight", self.safety_weight),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::InvalidParameter(format!(
                    "{name} must be a finite non-negative number, got {value}"
                )));
            }
        }
        if self.length_weight == 0.0 && self.safety_weight == 0.0 {
            return Err(Error::InvalidParameter(
                "length_weight and safety_weight cannot both be zero".to_string(),
            ));
        }
        if !self.safety_max.is_finite() || self.safety_max <= 0.0 {
            return Err(Error::InvalidParameter(format!(
                "safety_max must be positive, got {}",
                self.safety_max
            )));
        }
        Ok(())
    }

    /// Penalty term for an edge, `0` for a perfectly safe edge
    pub fn penalty(&self, edge: &RoadEdge) -> f64 {
        let safety = edge.safety_score.clamp(0.0, self.safety_max);
        let unsafety = 1.0 - safety / self.safety_max;
        match self.penalty {
            SafetyPenalty::LengthScaled => unsafety * edge.length_m,
            SafetyPenalty::Flat => unsafety,
        }
    }

    pub fn weight(&self, edge: &RoadEdge) -> f64 {
        let weight = self.length_weight * edge.length_m + self.safety_weight * self.penalty(edge);
        weight.max(MIN_EDGE_WEIGHT)
    }
}
