//! Tactical profiles.
//!
//! A club's tactic is a closed set of three axes validated at the boundary.
//! The simulation never inspects free-form tactic payloads; everything the
//! statistical model needs is exposed through the numeric bias accessors.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mentality {
    Defensive,
    Balanced,
    Attacking,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pressing {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tempo {
    Low,
    Normal,
    High,
}

/// Team-wide tactical settings read by the event generator and the
/// possession model.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct TacticalProfile {
    pub mentality: Mentality,
    pub pressing: Pressing,
    pub tempo: Tempo,
}

impl Default for TacticalProfile {
    fn default() -> Self {
        Self { mentality: Mentality::Balanced, pressing: Pressing::Medium, tempo: Tempo::Normal }
    }
}

impl TacticalProfile {
    /// Additive per-minute goal-chance adjustment.
    ///
    /// Attacking mentality adds roughly two thirds of the base chance; tempo
    /// extremes nudge it either way.
    pub fn goal_bias(&self) -> f64 {
        let mentality = match self.mentality {
            Mentality::Attacking => 0.012,
            Mentality::Balanced => 0.0,
            Mentality::Defensive => -0.008,
        };
        let tempo = match self.tempo {
            Tempo::High => 0.006,
            Tempo::Normal => 0.0,
            Tempo::Low => -0.006,
        };
        mentality + tempo
    }

    /// Possession-percentage bias contributed by this side.
    pub fn possession_bias(&self) -> f64 {
        let pressing = match self.pressing {
            Pressing::High => 3.0,
            Pressing::Medium => 0.0,
            Pressing::Low => -3.0,
        };
        let mentality = match self.mentality {
            Mentality::Attacking => 2.0,
            Mentality::Balanced => 0.0,
            Mentality::Defensive => -2.0,
        };
        pressing + mentality
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_profile_is_neutral() {
        let profile = TacticalProfile::default();
        assert_eq!(profile.goal_bias(), 0.0);
        assert_eq!(profile.possession_bias(), 0.0);
    }

    #[test]
    fn attacking_high_tempo_maximizes_goal_bias() {
        let profile = TacticalProfile {
            mentality: Mentality::Attacking,
            pressing: Pressing::High,
            tempo: Tempo::High,
        };
        assert!((profile.goal_bias() - 0.018).abs() < 1e-9);
        assert_eq!(profile.possession_bias(), 5.0);
    }

    #[test]
    fn serde_round_trip_uses_snake_case() {
        let profile = TacticalProfile {
            mentality: Mentality::Defensive,
            pressing: Pressing::Low,
            tempo: Tempo::Normal,
        };
        let json = serde_json::to_string(&profile).expect("serialize");
        assert!(json.contains("\"defensive\""));
        let back: TacticalProfile = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, profile);
    }
}
