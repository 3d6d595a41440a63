//! Slate scoring: win counts, base points, and threshold multipliers.

use serde::{Deserialize, Serialize};

use crate::models::{Outcome, Pick, ResolvedPick, ScoreBreakdown};

/// One multiplier rule: applies once `total_wins` reaches `threshold`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MultiplierTier {
    pub threshold: u32,
    pub multiplier: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    pub team_hit_value: f64,
    pub player_hit_value: f64,
    pub tiers: Vec<MultiplierTier>,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            team_hit_value: 10.0,
            player_hit_value: 20.0,
            tiers: vec![
                MultiplierTier {
                    threshold: 0,
                    multiplier: 1.0,
                },
                MultiplierTier {
                    threshold: 3,
                    multiplier: 2.0,
                },
                MultiplierTier {
                    threshold: 5,
                    multiplier: 3.0,
                },
            ],
        }
    }
}

impl ScoringConfig {
    /// Highest-qualifying tier for a win count. The table is sorted here,
    /// descending by threshold, so callers may declare tiers in any order.
    /// With no qualifying tier (no threshold-0 rule) the multiplier is 1.
    pub fn multiplier_for(&self, total_wins: u32) -> f64 {
        let mut tiers = self.tiers.clone();
        tiers.sort_by(|a, b| b.threshold.cmp(&a.threshold));
        tiers
            .iter()
            .find(|tier| tier.threshold <= total_wins)
            .map_or(1.0, |tier| tier.multiplier)
    }
}

/// Recompute the full slate score from the resolved outcome set. Stateless:
/// called after any pick or winner change, it always reflects the inputs as
/// given.
pub fn score_slate(resolved: &[ResolvedPick], config: &ScoringConfig) -> ScoreBreakdown {
    let mut team_wins = 0u32;
    let mut player_wins = 0u32;
    for entry in resolved {
        if entry.outcome != Outcome::Win {
            continue;
        }
        match entry.pick {
            Pick::Team(_) => team_wins += 1,
            Pick::Player(_) => player_wins += 1,
        }
    }

    let base_team_points = f64::from(team_wins) * config.team_hit_value;
    let base_player_points = f64::from(player_wins) * config.player_hit_value;
    let total_wins = team_wins + player_wins;
    let multiplier = config.multiplier_for(total_wins);

    ScoreBreakdown {
        team_wins,
        player_wins,
        base_team_points,
        base_player_points,
        total_wins,
        multiplier,
        total_points: (base_team_points + base_player_points) * multiplier,
    }
}
