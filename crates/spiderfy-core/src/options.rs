use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::f64::consts::TAU;

/// Tunables of the spiderfier.
///
/// Field names serialize in camelCase so option objects written for the JavaScript plugin load
/// unchanged. Missing fields keep their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SpiderfyOptions {
    /// Re-clicking a spiderfied marker leaves the cluster spread out.
    pub keep_spiderfied: bool,
    /// Markers within this many pixels of the clicked one form the cluster.
    pub nearby_distance: f64,
    /// Clusters of at least this many markers use a spiral instead of a circle.
    /// `0` always spirals, `usize::MAX` always uses a circle.
    pub circle_spiral_switchover: usize,
    pub circle_foot_separation: f64,
    pub circle_start_angle: f64,
    pub spiral_foot_separation: f64,
    pub spiral_length_start: f64,
    pub spiral_length_factor: f64,
    pub leg_weight: f64,
    pub leg_colors: LegColors,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LegColors {
    pub usual: String,
    pub highlighted: String,
}

impl Default for LegColors {
    fn default() -> Self {
        Self {
            usual: "#222".to_string(),
            highlighted: "#f00".to_string(),
        }
    }
}

impl Default for SpiderfyOptions {
    fn default() -> Self {
        Self {
            keep_spiderfied: false,
            nearby_distance: 20.0,
            circle_spiral_switchover: 9,
            circle_foot_separation: 25.0,
            circle_start_angle: TAU / 12.0,
            spiral_foot_separation: 28.0,
            spiral_length_start: 11.0,
            spiral_length_factor: 5.0,
            leg_weight: 1.5,
            leg_colors: LegColors::default(),
        }
    }
}

impl SpiderfyOptions {
    pub fn from_json_str(raw: &str) -> Result<Self> {
        let opts: Self = serde_json::from_str(raw)?;
        opts.validate()?;
        Ok(opts)
    }

    pub fn from_value(value: Value) -> Result<Self> {
        let opts: Self = serde_json::from_value(value)?;
        opts.validate()?;
        Ok(opts)
    }

    /// Whether hovering a displaced marker should recolor its leg.
    pub fn highlights_legs(&self) -> bool {
        self.leg_colors.highlighted != self.leg_colors.usual
    }

    pub fn validate(&self) -> Result<()> {
        non_negative("nearbyDistance", self.nearby_distance)?;
        positive("circleFootSeparation", self.circle_foot_separation)?;
        positive("spiralFootSeparation", self.spiral_foot_separation)?;
        positive("spiralLengthStart", self.spiral_length_start)?;
        positive("spiralLengthFactor", self.spiral_length_factor)?;
        non_negative("legWeight", self.leg_weight)?;
        if !self.circle_start_angle.is_finite() {
            return Err(Error::InvalidOption {
                name: "circleStartAngle",
                reason: format!("expected a finite angle, got {}", self.circle_start_angle),
            });
        }
        Ok(())
    }
}

fn non_negative(name: &'static str, v: f64) -> Result<()> {
    if v.is_finite() && v >= 0.0 {
        return Ok(());
    }
    Err(Error::InvalidOption {
        name,
        reason: format!("expected a finite non-negative number, got {v}"),
    })
}

fn positive(name: &'static str, v: f64) -> Result<()> {
    if v.is_finite() && v > 0.0 {
        return Ok(());
    }
    Err(Error::InvalidOption {
        name,
        reason: format!("expected a finite positive number, got {v}"),
    })
}
