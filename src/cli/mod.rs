use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::de::DeserializeOwned;

use slatescore::models::{GameMeta, Outcome, Pick, ResolvedPick, RosterEntry, ScoreBreakdown, SlateWinners, StatCategory};
use slatescore::services::autofill::propose_slate;
use slatescore::services::{
    nba_team_metadata, resolve_outcomes, score_slate, BoxScoreClient, GameProposal,
    IdentityRegistry, NameResolver, PlayerOption, ProposedPlayer, ScoringConfig,
};

fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let raw =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))
}

/// Resolve and score one slate from JSON snapshots of picks and winners.
pub fn score(
    picks_path: &Path,
    winners_path: &Path,
    roster_path: Option<&Path>,
    config_path: Option<&Path>,
    json: bool,
) -> Result<()> {
    let picks: Vec<Pick> = load_json(picks_path)?;
    let winners: SlateWinners = load_json(winners_path)?;
    let rosters: HashMap<String, Vec<RosterEntry>> = match roster_path {
        Some(path) => load_json(path)?,
        None => HashMap::new(),
    };
    let config: ScoringConfig = match config_path {
        Some(path) => load_json(path)?,
        None => ScoringConfig::default(),
    };

    let mut registry = IdentityRegistry::with_metadata(nba_team_metadata());
    registry.load_slate(&picks, &winners);
    let names = NameResolver::from_roster(rosters.values());

    let resolved = resolve_outcomes(&picks, &winners, &registry);
    let breakdown = score_slate(&resolved, &config);

    if json {
        #[derive(serde::Serialize)]
        struct Output<'a> {
            picks: &'a [ResolvedPick],
            score: &'a ScoreBreakdown,
        }
        println!(
            "{}",
            serde_json::to_string_pretty(&Output {
                picks: &resolved,
                score: &breakdown,
            })?
        );
        return Ok(());
    }

    println!("🏀 Slate results ({} picks):\n", resolved.len());
    for entry in &resolved {
        let icon = match entry.outcome {
            Outcome::Win => "✅",
            Outcome::Loss => "❌",
            Outcome::Pending => "⏳",
        };
        match &entry.pick {
            Pick::Team(tp) => {
                let team = registry.resolve(
                    Some(&tp.selected_team_id),
                    tp.selected_team_name.as_deref(),
                    tp.selected_team_abbr.as_deref(),
                );
                println!(
                    "{} [game {}] {}: {}",
                    icon,
                    tp.game_id,
                    team.name.as_deref().unwrap_or(&tp.selected_team_id),
                    entry.outcome
                );
            }
            Pick::Player(pp) => {
                let name = names.resolve(&pp.player_reference());
                println!(
                    "{} [game {}] {} ({}): {}",
                    icon, pp.game_id, name.full_name, pp.category, entry.outcome
                );
            }
        }
    }

    println!("\n📊 Score breakdown:");
    println!(
        "   Team wins: {} × {} = {:.1}",
        breakdown.team_wins, config.team_hit_value, breakdown.base_team_points
    );
    println!(
        "   Player wins: {} × {} = {:.1}",
        breakdown.player_wins, config.player_hit_value, breakdown.base_player_points
    );
    println!(
        "   Multiplier: ×{} ({} total wins)",
        breakdown.multiplier, breakdown.total_wins
    );
    println!("   Total: {:.1} points", breakdown.total_points);

    Ok(())
}

/// Fetch the box-score feed for a date and print winner proposals for review.
pub async fn autofill(
    date: NaiveDate,
    games_path: &Path,
    options_path: Option<&Path>,
    json: bool,
) -> Result<()> {
    let games: Vec<GameMeta> = load_json(games_path)?;
    let options: Vec<PlayerOption> = match options_path {
        Some(path) => load_json(path)?,
        None => Vec::new(),
    };

    let client = BoxScoreClient::from_env()?;
    println!("📥 Fetching box scores for {}...", date);
    let box_scores = client.fetch(date).await?;
    println!("📥 {} box-score entries received", box_scores.len());

    let categories = [
        StatCategory::TopScorer,
        StatCategory::TopAssist,
        StatCategory::TopRebound,
    ];
    let proposals = propose_slate(&games, &box_scores, &options, &categories);

    if json {
        println!("{}", serde_json::to_string_pretty(&proposals)?);
        return Ok(());
    }

    print_proposals(&proposals, games.len());
    Ok(())
}

fn print_proposals(proposals: &[GameProposal], slate_games: usize) {
    println!(
        "\n🎯 Proposals for {} of {} slate games (review before committing):\n",
        proposals.len(),
        slate_games
    );
    for proposal in proposals {
        println!("Game {}:", proposal.game_id);
        match &proposal.team_winner {
            Some(team) => println!(
                "   🏆 Winner: {} {}",
                team.abbreviation.as_deref().unwrap_or("?"),
                team.team_id
            ),
            None => println!("   ⚠️  Tied final score, enter winner manually"),
        }
        for pp in &proposal.player_proposals {
            match &pp.candidate {
                ProposedPlayer::Matched { label, score, .. } => println!(
                    "   {} ({:.0}): {} [match score {}]",
                    pp.category, pp.performer_value, label, score
                ),
                ProposedPlayer::Degraded { name, team_abbr } => println!(
                    "   {} ({:.0}): {}{} ⚠️  no roster match",
                    pp.category,
                    pp.performer_value,
                    name,
                    team_abbr
                        .as_deref()
                        .map(|a| format!(" ({})", a))
                        .unwrap_or_default()
                ),
            }
        }
        println!();
    }
}
