use crate::models::PlayerInfo;

/// Strength assumed for a club whose roster is empty.
pub const DEFAULT_STRENGTH: f64 = 70.0;

/// Numeric club strength: the average overall rating of the roster.
///
/// Only ever used to bias event probabilities; never written back.
pub fn club_strength(roster: &[PlayerInfo]) -> f64 {
    if roster.is_empty() {
        return DEFAULT_STRENGTH;
    }
    let total: u32 = roster.iter().map(|p| u32::from(p.overall)).sum();
    f64::from(total) / roster.len() as f64
}
