//! Level thresholds and rank titles.

/// Highest attainable level.
pub const MAX_LEVEL: u32 = 20;

/// Cumulative experience required to reach each level, ascending. Index 0 is
/// level 1.
pub const LEVEL_THRESHOLDS: [u64; MAX_LEVEL as usize] = [
    0, 100, 300, 600, 1_000, 1_500, 2_100, 2_800, 3_600, 4_500, 5_500, 6_600, 7_800, 9_100,
    10_500, 12_000, 13_600, 15_300, 17_100, 19_000,
];

/// The greatest level whose threshold `experience` has reached. Experience
/// past the top threshold stays at [`MAX_LEVEL`].
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn level_for_experience(experience: u64) -> u32 {
    let reached = LEVEL_THRESHOLDS
        .iter()
        .rposition(|&threshold| experience >= threshold)
        .unwrap_or(0);
    reached as u32 + 1
}

/// Experience needed for the level after `level`, or `None` at the cap.
#[must_use]
pub fn next_level_threshold(level: u32) -> Option<u64> {
    if level >= MAX_LEVEL {
        return None;
    }
    LEVEL_THRESHOLDS.get(level.max(1) as usize).copied()
}

/// Rank title shown alongside a level.
#[must_use]
pub fn rank_for_level(level: u32) -> &'static str {
    match level {
        0..=3 => "Junior Solutions Architect",
        4..=6 => "Solutions Architect",
        7..=9 => "Senior Solutions Architect",
        10..=12 => "Principal Solutions Architect",
        _ => "Distinguished Solutions Architect",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thresholds_are_strictly_ascending_from_zero() {
        assert_eq!(LEVEL_THRESHOLDS[0], 0);
        assert!(LEVEL_THRESHOLDS.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_level_for_experience_at_boundaries() {
        assert_eq!(level_for_experience(0), 1);
        assert_eq!(level_for_experience(99), 1);
        assert_eq!(level_for_experience(100), 2);
        assert_eq!(level_for_experience(105), 2);
        assert_eq!(level_for_experience(10_499), 14);
        assert_eq!(level_for_experience(19_000), 20);
    }

    #[test]
    fn test_level_for_experience_clamps_at_max_level() {
        assert_eq!(level_for_experience(u64::MAX), MAX_LEVEL);
    }

    #[test]
    fn test_next_level_threshold() {
        assert_eq!(next_level_threshold(1), Some(100));
        assert_eq!(next_level_threshold(19), Some(19_000));
        assert_eq!(next_level_threshold(20), None);
    }

    #[test]
    fn test_rank_for_level_bands() {
        assert_eq!(rank_for_level(1), "Junior Solutions Architect");
        assert_eq!(rank_for_level(6), "Solutions Architect");
        assert_eq!(rank_for_level(9), "Senior Solutions Architect");
        assert_eq!(rank_for_level(12), "Principal Solutions Architect");
        assert_eq!(rank_for_level(20), "Distinguished Solutions Architect");
    }
}
