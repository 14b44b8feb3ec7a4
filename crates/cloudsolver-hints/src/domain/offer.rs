//! When to proactively offer a hint.

use cloudsolver_scoring::domain::question::Difficulty;

/// Seconds after which a player stuck on a question is offered a hint.
#[must_use]
pub fn stuck_threshold_secs(difficulty: Difficulty) -> f64 {
    match difficulty {
        Difficulty::Easy => 45.0,
        Difficulty::Medium => 60.0,
        Difficulty::Hard => 90.0,
    }
}

/// Whether the UI should offer a hint: always for levels 1-3 or accuracy
/// under 60%, otherwise once the player has been stuck past the threshold.
#[must_use]
pub fn should_offer_hint(
    level: u32,
    accuracy_percent: u32,
    elapsed_secs: f64,
    difficulty: Difficulty,
) -> bool {
    level <= 3 || accuracy_percent < 60 || elapsed_secs > stuck_threshold_secs(difficulty)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_beginners_are_always_offered_hints() {
        assert!(should_offer_hint(1, 100, 0.0, Difficulty::Hard));
        assert!(should_offer_hint(3, 100, 0.0, Difficulty::Hard));
    }

    #[test]
    fn test_low_accuracy_is_offered_hints() {
        assert!(should_offer_hint(10, 59, 0.0, Difficulty::Easy));
    }

    #[test]
    fn test_experienced_player_offered_only_when_stuck() {
        assert!(!should_offer_hint(10, 90, 45.0, Difficulty::Easy));
        assert!(should_offer_hint(10, 90, 45.5, Difficulty::Easy));
        assert!(!should_offer_hint(10, 90, 60.0, Difficulty::Medium));
        assert!(!should_offer_hint(10, 90, 89.0, Difficulty::Hard));
        assert!(should_offer_hint(10, 90, 91.0, Difficulty::Hard));
    }
}
