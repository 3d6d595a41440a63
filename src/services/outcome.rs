//! Win/loss/pending resolution for saved picks.
//!
//! Pure recomputation over whatever picks and declared winners are currently
//! loaded. There is no stored verdict and no invalidation step: re-invoking
//! after either input changes is the whole consistency mechanism, so a late
//! winner correction is reflected on the very next call.

use crate::models::{
    Outcome, Pick, PlayerPick, PlayerWinner, ResolvedPick, SlateWinners, TeamIdentity, TeamPick,
    TeamWinner,
};
use crate::normalize::{name_key, normalize_id, normalize_provider_id};
use crate::services::identity::{matches_team_identity, IdentityRegistry};

/// Resolve every pick in a slate against the declared winners.
pub fn resolve_outcomes(
    picks: &[Pick],
    winners: &SlateWinners,
    registry: &IdentityRegistry,
) -> Vec<ResolvedPick> {
    picks
        .iter()
        .map(|pick| ResolvedPick {
            pick: pick.clone(),
            outcome: resolve_pick(pick, winners, registry),
        })
        .collect()
}

pub fn resolve_pick(pick: &Pick, winners: &SlateWinners, registry: &IdentityRegistry) -> Outcome {
    match pick {
        Pick::Team(team_pick) => resolve_team_pick(team_pick, &winners.team_winners, registry),
        Pick::Player(player_pick) => resolve_player_pick(player_pick, &winners.player_winners),
    }
}

/// A team pick is pending until its game has a declared winner, then settles
/// by team-identity equality against the winning side.
pub fn resolve_team_pick(
    pick: &TeamPick,
    team_winners: &[TeamWinner],
    registry: &IdentityRegistry,
) -> Outcome {
    let Some(winner_row) = team_winners
        .iter()
        .find(|w| normalize_id(&w.game_id) == normalize_id(&pick.game_id))
    else {
        return Outcome::Pending;
    };
    let Some(winner_team_id) = winner_row.winner_team_id.as_deref().filter(|s| !s.trim().is_empty())
    else {
        return Outcome::Pending;
    };

    let declared = declared_winner_identity(winner_row, winner_team_id, registry);
    let selected = registry.resolve(
        Some(&pick.selected_team_id),
        pick.selected_team_name.as_deref(),
        pick.selected_team_abbr.as_deref(),
    );

    if matches_team_identity(&selected, &declared) {
        Outcome::Win
    } else {
        Outcome::Loss
    }
}

/// Build the winning side's identity, pulling abbr/name from whichever of
/// the row's home/away snapshots the winner id points at.
fn declared_winner_identity(
    row: &TeamWinner,
    winner_team_id: &str,
    registry: &IdentityRegistry,
) -> TeamIdentity {
    let winner_key = normalize_id(winner_team_id);
    let side = [&row.home, &row.away].into_iter().find(|side| {
        side.id
            .as_deref()
            .map_or(false, |id| normalize_id(id) == winner_key)
    });
    match side {
        Some(side) => registry.resolve(
            Some(winner_team_id),
            side.name.as_deref(),
            side.abbreviation.as_deref(),
        ),
        None => registry.resolve(Some(winner_team_id), None, None),
    }
}

/// A player pick settles against the declared-winner set for its
/// `(game, category)`. An empty or absent set means the category is not yet
/// settled, which is pending, not a loss.
///
/// Matching is a three-way key union: the pick's primary id, provider id,
/// and first+last name key are each tested against the corresponding keys
/// of every declared winner in the category. One hit on any key wins. The
/// union exists because the same player may be referenced by primary id in
/// one source and by provider id or raw name in another. Empty keys never
/// match empty keys.
pub fn resolve_player_pick(pick: &PlayerPick, player_winners: &[PlayerWinner]) -> Outcome {
    let game_key = normalize_id(&pick.game_id);
    let declared: Vec<&PlayerWinner> = player_winners
        .iter()
        .filter(|w| w.category == pick.category && normalize_id(&w.game_id) == game_key)
        .collect();
    if declared.is_empty() {
        return Outcome::Pending;
    }

    let pick_id = normalize_id(&pick.player_id);
    let pick_provider_id = pick
        .provider_player_id
        .as_deref()
        .map(normalize_provider_id)
        .unwrap_or_default();
    let pick_name_key = name_key(pick.first_name.as_deref(), pick.last_name.as_deref());

    for winner in declared {
        let winner_id = normalize_id(&winner.player_id);
        if !pick_id.is_empty() && pick_id == winner_id {
            return Outcome::Win;
        }
        let winner_provider_id = winner
            .provider_player_id
            .as_deref()
            .map(normalize_provider_id)
            .unwrap_or_default();
        if !pick_provider_id.is_empty() && pick_provider_id == winner_provider_id {
            return Outcome::Win;
        }
        let winner_name_key = name_key(winner.first_name.as_deref(), winner.last_name.as_deref());
        if !pick_name_key.is_empty() && pick_name_key == winner_name_key {
            return Outcome::Win;
        }
    }
    Outcome::Loss
}
