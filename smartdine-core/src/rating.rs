//! Rating badge derivation.

use std::fmt;

/// Highest rating the badge will show.
pub const MAX_RATING: f64 = 5.0;

/// Display bucket for a numeric rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RatingTier {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl RatingTier {
    /// Tier for a rating already clamped to `[0, 5]`.
    pub fn for_rating(rating: f64) -> Self {
        if rating >= 4.5 {
            RatingTier::Excellent
        } else if rating >= 4.0 {
            RatingTier::Good
        } else if rating >= 3.5 {
            RatingTier::Fair
        } else {
            RatingTier::Poor
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RatingTier::Excellent => "excellent",
            RatingTier::Good => "good",
            RatingTier::Fair => "fair",
            RatingTier::Poor => "poor",
        }
    }

    /// Badge background color.
    pub fn color(&self) -> &'static str {
        match self {
            RatingTier::Excellent => "green-700",
            RatingTier::Good => "green-600",
            RatingTier::Fair => "yellow-500",
            RatingTier::Poor => "red-500",
        }
    }
}

impl fmt::Display for RatingTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The badge shown in a recommendation card's corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RatingBadge {
    /// No usable rating; shown as a neutral "Popular pick".
    Unrated,
    Rated { value: f64, tier: RatingTier },
}

impl RatingBadge {
    pub const UNRATED_LABEL: &'static str = "Popular pick";
    pub const UNRATED_COLOR: &'static str = "gray-200";

    /// Derive a badge from an optional raw rating. NaN counts as missing and
    /// everything else is clamped to `[0, 5]`.
    pub fn from_rating(rating: Option<f64>) -> Self {
        match rating {
            Some(raw) if !raw.is_nan() => {
                let value = raw.clamp(0.0, MAX_RATING);
                RatingBadge::Rated {
                    value,
                    tier: RatingTier::for_rating(value),
                }
            }
            _ => RatingBadge::Unrated,
        }
    }

    pub fn tier(&self) -> Option<RatingTier> {
        match self {
            RatingBadge::Rated { tier, .. } => Some(*tier),
            RatingBadge::Unrated => None,
        }
    }

    /// Tier name, or `"unrated"`.
    pub fn tier_name(&self) -> &'static str {
        self.tier().map_or("unrated", |t| t.as_str())
    }

    pub fn color(&self) -> &'static str {
        self.tier().map_or(Self::UNRATED_COLOR, |t| t.color())
    }

    /// Text on the badge: the rating to one decimal, or the unrated label.
    pub fn label(&self) -> String {
        match self {
            RatingBadge::Rated { value, .. } => format!("{:.1}", value),
            RatingBadge::Unrated => Self::UNRATED_LABEL.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_boundaries_are_inclusive() {
        assert_eq!(RatingTier::for_rating(4.5), RatingTier::Excellent);
        assert_eq!(RatingTier::for_rating(4.49), RatingTier::Good);
        assert_eq!(RatingTier::for_rating(4.0), RatingTier::Good);
        assert_eq!(RatingTier::for_rating(3.99), RatingTier::Fair);
        assert_eq!(RatingTier::for_rating(3.5), RatingTier::Fair);
        assert_eq!(RatingTier::for_rating(3.49), RatingTier::Poor);
        assert_eq!(RatingTier::for_rating(0.0), RatingTier::Poor);
        assert_eq!(RatingTier::for_rating(5.0), RatingTier::Excellent);
    }

    #[test]
    fn test_clamp_stays_in_range() {
        for raw in [-10.0, -0.1, 0.0, 2.7, 5.0, 5.01, 42.0, f64::INFINITY, f64::NEG_INFINITY] {
            match RatingBadge::from_rating(Some(raw)) {
                RatingBadge::Rated { value, .. } => {
                    assert!((0.0..=MAX_RATING).contains(&value), "{} -> {}", raw, value)
                }
                RatingBadge::Unrated => panic!("{} should be rated", raw),
            }
        }
    }

    #[test]
    fn test_out_of_range_is_clamped_not_rejected() {
        let badge = RatingBadge::from_rating(Some(7.2));
        assert_eq!(
            badge,
            RatingBadge::Rated {
                value: 5.0,
                tier: RatingTier::Excellent
            }
        );
        assert_eq!(badge.label(), "5.0");

        let badge = RatingBadge::from_rating(Some(-1.0));
        assert_eq!(badge.tier(), Some(RatingTier::Poor));
        assert_eq!(badge.label(), "0.0");
    }

    #[test]
    fn test_tier_partition_is_total() {
        // Every tenth in [0, 5] lands in exactly one tier, in ascending order.
        let mut counts = std::collections::HashMap::new();
        let mut previous = RatingTier::Poor;
        let order = |t: RatingTier| match t {
            RatingTier::Poor => 0,
            RatingTier::Fair => 1,
            RatingTier::Good => 2,
            RatingTier::Excellent => 3,
        };
        for step in 0..=50 {
            let tier = RatingTier::for_rating(step as f64 / 10.0);
            assert!(order(tier) >= order(previous));
            previous = tier;
            *counts.entry(tier).or_insert(0) += 1;
        }
        assert_eq!(counts[&RatingTier::Poor], 35);
        assert_eq!(counts[&RatingTier::Fair], 5);
        assert_eq!(counts[&RatingTier::Good], 5);
        assert_eq!(counts[&RatingTier::Excellent], 6);
    }

    #[test]
    fn test_unrated() {
        for rating in [None, Some(f64::NAN)] {
            let badge = RatingBadge::from_rating(rating);
            assert_eq!(badge, RatingBadge::Unrated);
            assert_eq!(badge.label(), "Popular pick");
            assert_eq!(badge.tier_name(), "unrated");
            assert_eq!(badge.color(), "gray-200");
        }
    }

    #[test]
    fn test_label_rounds_to_one_decimal() {
        assert_eq!(RatingBadge::from_rating(Some(4.26)).label(), "4.3");
        assert_eq!(RatingBadge::from_rating(Some(4.0)).label(), "4.0");
        assert_eq!(RatingBadge::from_rating(Some(3.5)).color(), "yellow-500");
    }
}
