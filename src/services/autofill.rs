//! Admin autofill: propose slate winners from a raw provider box-score.
//!
//! Proposals are review material only. Nothing here writes to the winners
//! feed; an administrator confirms or discards each proposal before the
//! scoring inputs change. Ambiguity is resolved toward the human: a tied
//! final score proposes no team winner, and a performer no roster option
//! matches still surfaces as a degraded candidate instead of vanishing.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strsim::jaro_winkler;
use thiserror::Error;

use crate::models::{GameMeta, StatBucket, StatCategory};
use crate::normalize::{normalize_name, normalize_provider_id, strip_diacritics};

// ── Match scoring weights ─────────────────────────────────────────────────────

// Provider-id equality is near-certain; everything below is name evidence in
// decreasing order of specificity. The abbreviation tiebreak only counts on
// top of a positive name/id score, so a teammate can never match on team
// alone.
const W_PROVIDER_ID: u32 = 100;
const W_FULL_NAME: u32 = 40;
const W_FIRST_LAST: u32 = 25;
const W_LAST_NAME: u32 = 10;
const W_CLOSE_NAME: u32 = 8;
const W_TEAM_ABBR: u32 = 3;

const CLOSE_NAME_THRESHOLD: f64 = 0.92;

// ── Input types ───────────────────────────────────────────────────────────────

/// One ranked performer from the provider box-score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoxScorePerformer {
    pub name: String,
    #[serde(default)]
    pub provider_player_id: Option<String>,
    #[serde(default)]
    pub team_abbr: Option<String>,
    pub value: f64,
}

/// Top performers per stat bucket for one game.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PerformerBuckets {
    #[serde(default)]
    pub points: Vec<BoxScorePerformer>,
    #[serde(default)]
    pub assists: Vec<BoxScorePerformer>,
    #[serde(default)]
    pub rebounds: Vec<BoxScorePerformer>,
}

impl PerformerBuckets {
    pub fn bucket(&self, bucket: StatBucket) -> &[BoxScorePerformer] {
        match bucket {
            StatBucket::Points => &self.points,
            StatBucket::Assists => &self.assists,
            StatBucket::Rebounds => &self.rebounds,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameBoxScore {
    pub home_abbr: String,
    pub away_abbr: String,
    pub home_score: u32,
    pub away_score: u32,
    #[serde(default)]
    pub performers: PerformerBuckets,
}

/// A selectable player the admin UI knows about, offered as a match target.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerOption {
    pub player_id: String,
    #[serde(default)]
    pub provider_player_id: Option<String>,
    pub label: String,
    #[serde(default)]
    pub team_abbr: Option<String>,
}

// ── Proposal types ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct ProposedTeam {
    pub team_id: String,
    pub abbreviation: Option<String>,
}

/// A performer matched (or not) against the slate's player options.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProposedPlayer {
    /// A roster option scored positively; safe to preselect for review.
    Matched {
        player_id: String,
        label: String,
        score: u32,
    },
    /// No option scored; built straight from the raw performer so the
    /// administrator still sees the row.
    Degraded { name: String, team_abbr: Option<String> },
}

#[derive(Debug, Clone, Serialize)]
pub struct PlayerProposal {
    pub category: StatCategory,
    pub performer_name: String,
    pub performer_value: f64,
    pub candidate: ProposedPlayer,
}

#[derive(Debug, Clone, Serialize)]
pub struct GameProposal {
    pub game_id: String,
    pub team_winner: Option<ProposedTeam>,
    pub player_proposals: Vec<PlayerProposal>,
}

// ── Proposal construction ─────────────────────────────────────────────────────

/// Propose winners for every slate game that has a matching box-score entry.
/// Games without one are skipped; the caller reports them as unmatched.
pub fn propose_slate(
    games: &[GameMeta],
    box_scores: &[GameBoxScore],
    options: &[PlayerOption],
    categories: &[StatCategory],
) -> Vec<GameProposal> {
    let mut proposals = Vec::new();
    for game in games {
        let Some(entry) = box_scores.iter().find(|bs| box_score_matches_game(bs, game)) else {
            tracing::warn!(game_id = %game.game_id, "no box-score entry for game");
            continue;
        };
        proposals.push(propose_game(game, entry, options, categories));
    }
    proposals
}

/// Abbreviation equality is the only game-matching key. Both sides must
/// agree exactly (case-insensitive, diacritics stripped); there is no fuzzy
/// fallback at this level.
fn box_score_matches_game(entry: &GameBoxScore, game: &GameMeta) -> bool {
    abbr_eq(Some(&entry.home_abbr), game.home.abbreviation.as_deref())
        && abbr_eq(Some(&entry.away_abbr), game.away.abbreviation.as_deref())
}

pub fn propose_game(
    game: &GameMeta,
    entry: &GameBoxScore,
    options: &[PlayerOption],
    categories: &[StatCategory],
) -> GameProposal {
    GameProposal {
        game_id: game.game_id.clone(),
        team_winner: winning_side(game, entry),
        player_proposals: categories
            .iter()
            .flat_map(|&category| {
                entry
                    .performers
                    .bucket(category.bucket())
                    .iter()
                    .map(move |performer| PlayerProposal {
                        category,
                        performer_name: performer.name.clone(),
                        performer_value: performer.value,
                        candidate: match_option(performer, options),
                    })
            })
            .collect(),
    }
}

/// The higher-scoring side's team id, or nothing on a tie (ambiguous, left
/// for manual entry).
fn winning_side(game: &GameMeta, entry: &GameBoxScore) -> Option<ProposedTeam> {
    let side = match entry.home_score.cmp(&entry.away_score) {
        std::cmp::Ordering::Greater => &game.home,
        std::cmp::Ordering::Less => &game.away,
        std::cmp::Ordering::Equal => {
            tracing::warn!(game_id = %game.game_id, "tied final score, no proposal");
            return None;
        }
    };
    side.id.as_ref().map(|id| ProposedTeam {
        team_id: id.clone(),
        abbreviation: side.abbreviation.clone(),
    })
}

/// Score every option against the performer and keep the best positive one.
/// Ties break toward the shorter label, the more specific match.
pub fn match_option(performer: &BoxScorePerformer, options: &[PlayerOption]) -> ProposedPlayer {
    let best = options
        .iter()
        .map(|option| (option, score_option(performer, option)))
        .filter(|(_, score)| *score > 0)
        .max_by(|(a, sa), (b, sb)| sa.cmp(sb).then(b.label.len().cmp(&a.label.len())));

    match best {
        Some((option, score)) => ProposedPlayer::Matched {
            player_id: option.player_id.clone(),
            label: option.label.clone(),
            score,
        },
        None => ProposedPlayer::Degraded {
            name: performer.name.clone(),
            team_abbr: performer.team_abbr.clone(),
        },
    }
}

fn score_option(performer: &BoxScorePerformer, option: &PlayerOption) -> u32 {
    let mut score = 0u32;

    if let (Some(a), Some(b)) = (
        performer.provider_player_id.as_deref(),
        option.provider_player_id.as_deref(),
    ) {
        let (a, b) = (normalize_provider_id(a), normalize_provider_id(b));
        if !a.is_empty() && a == b {
            score += W_PROVIDER_ID;
        }
    }

    let performer_name = normalize_name(&performer.name);
    let option_label = normalize_name(&option.label);
    if !performer_name.is_empty() && !option_label.is_empty() {
        if option_label.contains(&performer_name) || performer_name.contains(&option_label) {
            score += W_FULL_NAME;
        } else {
            let mut tokens = performer_name.split_whitespace();
            let first = tokens.next();
            let last = performer_name.split_whitespace().last();
            let first_hit = first.map_or(false, |t| contains_token(&option_label, t));
            let last_hit = last.map_or(false, |t| t != first.unwrap_or("") && contains_token(&option_label, t));
            if first_hit && last_hit {
                score += W_FIRST_LAST;
            } else if last_hit {
                score += W_LAST_NAME;
            } else if jaro_winkler(&performer_name, &option_label) > CLOSE_NAME_THRESHOLD {
                score += W_CLOSE_NAME;
            }
        }
    }

    // Team agreement is a tiebreak only, never sufficient alone
    if score > 0 && abbr_eq(performer.team_abbr.as_deref(), option.team_abbr.as_deref()) {
        score += W_TEAM_ABBR;
    }
    score
}

fn contains_token(haystack: &str, token: &str) -> bool {
    haystack.split_whitespace().any(|t| t == token)
}

fn abbr_eq(a: Option<&str>, b: Option<&str>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => {
            let a = strip_diacritics(a).trim().to_lowercase();
            let b = strip_diacritics(b).trim().to_lowercase();
            !a.is_empty() && a == b
        }
        _ => false,
    }
}

// ── Box-score feed client ─────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("box-score API key not configured (set BOXSCORE_API_KEY)")]
    MissingApiKey,
    #[error("box-score feed HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("box-score feed transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Thin client for the provider box-score feed. One request per call, no
/// retry or backoff of its own; failures surface to the caller, who owns the
/// retry decision.
pub struct BoxScoreClient {
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct RawBoxScoreResponse {
    #[serde(default)]
    games: Vec<RawGame>,
}

#[derive(Debug, Deserialize)]
struct RawGame {
    home: RawTeamLine,
    away: RawTeamLine,
    #[serde(default)]
    top_performers: Vec<RawPerformer>,
}

#[derive(Debug, Deserialize)]
struct RawTeamLine {
    abbreviation: String,
    score: u32,
}

#[derive(Debug, Deserialize)]
struct RawPerformer {
    /// Provider stat label, e.g. "Points", "Top Assists".
    category: String,
    name: String,
    #[serde(default)]
    player_id: Option<String>,
    #[serde(default)]
    team_abbr: Option<String>,
    value: f64,
}

impl From<RawGame> for GameBoxScore {
    fn from(raw: RawGame) -> Self {
        let mut performers = PerformerBuckets::default();
        for p in raw.top_performers {
            let performer = BoxScorePerformer {
                name: p.name,
                provider_player_id: p.player_id,
                team_abbr: p.team_abbr,
                value: p.value,
            };
            match StatCategory::from_label(&p.category).bucket() {
                StatBucket::Points => performers.points.push(performer),
                StatBucket::Assists => performers.assists.push(performer),
                StatBucket::Rebounds => performers.rebounds.push(performer),
            }
        }
        GameBoxScore {
            home_abbr: raw.home.abbreviation,
            away_abbr: raw.away.abbreviation,
            home_score: raw.home.score,
            away_score: raw.away.score,
            performers,
        }
    }
}

impl BoxScoreClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            client: reqwest::Client::new(),
        }
    }

    /// Build from `BOXSCORE_API_URL` / `BOXSCORE_API_KEY`.
    pub fn from_env() -> Result<Self, FeedError> {
        let base_url = std::env::var("BOXSCORE_API_URL")
            .unwrap_or_else(|_| "https://api.boxscores.example.com/v1".to_string());
        let api_key = std::env::var("BOXSCORE_API_KEY").map_err(|_| FeedError::MissingApiKey)?;
        Ok(Self::new(base_url, api_key))
    }

    /// Fetch final scores and top performers for one slate date.
    pub async fn fetch(&self, date: NaiveDate) -> Result<Vec<GameBoxScore>, FeedError> {
        let url = format!(
            "{}/box_scores?date={}",
            self.base_url.trim_end_matches('/'),
            date.format("%Y-%m-%d")
        );
        tracing::info!(%url, "fetching box scores");

        let resp = self
            .client
            .get(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .timeout(std::time::Duration::from_secs(20))
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(FeedError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: RawBoxScoreResponse = resp.json().await?;
        Ok(parsed.games.into_iter().map(GameBoxScore::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TeamRef;

    fn game(id: &str, home: (&str, &str), away: (&str, &str)) -> GameMeta {
        GameMeta {
            game_id: id.into(),
            home: TeamRef {
                id: Some(home.0.into()),
                abbreviation: Some(home.1.into()),
                name: None,
            },
            away: TeamRef {
                id: Some(away.0.into()),
                abbreviation: Some(away.1.into()),
                name: None,
            },
        }
    }

    fn box_score(home_abbr: &str, hs: u32, away_abbr: &str, as_: u32) -> GameBoxScore {
        GameBoxScore {
            home_abbr: home_abbr.into(),
            away_abbr: away_abbr.into(),
            home_score: hs,
            away_score: as_,
            performers: PerformerBuckets::default(),
        }
    }

    fn performer(name: &str) -> BoxScorePerformer {
        BoxScorePerformer {
            name: name.into(),
            provider_player_id: None,
            team_abbr: None,
            value: 30.0,
        }
    }

    fn option(id: &str, label: &str) -> PlayerOption {
        PlayerOption {
            player_id: id.into(),
            provider_player_id: None,
            label: label.into(),
            team_abbr: None,
        }
    }

    #[test]
    fn higher_score_proposes_that_side() {
        let g = game("g1", ("home-id", "BOS"), ("away-id", "NYK"));
        let entry = box_score("BOS", 110, "NYK", 108);
        let proposal = propose_game(&g, &entry, &[], &[]);
        assert_eq!(
            proposal.team_winner.as_ref().map(|t| t.team_id.as_str()),
            Some("home-id")
        );

        let entry = box_score("BOS", 101, "NYK", 108);
        let proposal = propose_game(&g, &entry, &[], &[]);
        assert_eq!(
            proposal.team_winner.as_ref().map(|t| t.team_id.as_str()),
            Some("away-id")
        );
    }

    #[test]
    fn tied_score_proposes_nothing() {
        let g = game("g1", ("home-id", "BOS"), ("away-id", "NYK"));
        let entry = box_score("BOS", 100, "NYK", 100);
        let proposal = propose_game(&g, &entry, &[], &[]);
        assert!(proposal.team_winner.is_none());
    }

    #[test]
    fn game_matching_requires_both_abbreviations() {
        let games = vec![game("g1", ("h", "BOS"), ("a", "NYK"))];
        let scores = vec![box_score("bos", 1, "nyk", 0), box_score("BOS", 1, "LAL", 0)];
        let proposals = propose_slate(&games, &scores, &[], &[]);
        // Case-insensitive hit on the first entry; the LAL entry never matches
        assert_eq!(proposals.len(), 1);
        assert!(proposals[0].team_winner.is_some());
    }

    #[test]
    fn provider_id_match_beats_name_evidence() {
        let mut p = performer("N. Jokic");
        p.provider_player_id = Some("nikola-jokic".into());

        let mut by_id = option("p1", "Someone Else");
        by_id.provider_player_id = Some("Nikola-Jokic".into());
        let by_name = option("p2", "N. Jokic");

        let candidate = match_option(&p, &[by_name, by_id]);
        match candidate {
            ProposedPlayer::Matched { player_id, .. } => assert_eq!(player_id, "p1"),
            ProposedPlayer::Degraded { .. } => panic!("expected a match"),
        }
    }

    #[test]
    fn full_name_containment_matches_with_diacritics() {
        let p = performer("Nikola Jokić");
        let candidate = match_option(&p, &[option("p1", "Nikola Jokic")]);
        match candidate {
            ProposedPlayer::Matched { player_id, score, .. } => {
                assert_eq!(player_id, "p1");
                assert_eq!(score, W_FULL_NAME);
            }
            ProposedPlayer::Degraded { .. } => panic!("expected a match"),
        }
    }

    #[test]
    fn last_name_only_is_weak_evidence() {
        let p = performer("Jaylen Brown");
        let candidate = match_option(&p, &[option("p1", "Bruce Brown")]);
        match candidate {
            ProposedPlayer::Matched { score, .. } => assert_eq!(score, W_LAST_NAME),
            ProposedPlayer::Degraded { .. } => panic!("expected a weak match"),
        }
    }

    #[test]
    fn team_abbreviation_alone_never_matches() {
        let mut p = performer("Completely Unknown");
        p.team_abbr = Some("BOS".into());
        let mut opt = option("p1", "Jayson Tatum");
        opt.team_abbr = Some("BOS".into());

        match match_option(&p, &[opt]) {
            ProposedPlayer::Degraded { name, .. } => assert_eq!(name, "Completely Unknown"),
            ProposedPlayer::Matched { .. } => panic!("abbr-only must not match"),
        }
    }

    #[test]
    fn team_abbreviation_breaks_name_ties() {
        let mut p = performer("Jaylen Brown");
        p.team_abbr = Some("BOS".into());

        let wrong_team = option("p1", "Jaylen Brown");
        let mut right_team = option("p2", "Jaylen Brown");
        right_team.team_abbr = Some("bos".into());

        match match_option(&p, &[wrong_team, right_team]) {
            ProposedPlayer::Matched { player_id, .. } => assert_eq!(player_id, "p2"),
            ProposedPlayer::Degraded { .. } => panic!("expected a match"),
        }
    }

    #[test]
    fn equal_scores_prefer_shorter_label() {
        let p = performer("Jaylen Brown");
        let longer = option("p1", "Jaylen Brown Jr Extended");
        let shorter = option("p2", "Jaylen Brown");
        match match_option(&p, &[longer, shorter]) {
            ProposedPlayer::Matched { player_id, .. } => assert_eq!(player_id, "p2"),
            ProposedPlayer::Degraded { .. } => panic!("expected a match"),
        }
    }

    #[test]
    fn unmatched_performer_degrades_instead_of_dropping() {
        let mut p = performer("Obscure Rookie");
        p.team_abbr = Some("SAS".into());
        match match_option(&p, &[option("p1", "Victor Wembanyama")]) {
            ProposedPlayer::Degraded { name, team_abbr } => {
                assert_eq!(name, "Obscure Rookie");
                assert_eq!(team_abbr.as_deref(), Some("SAS"));
            }
            ProposedPlayer::Matched { .. } => panic!("nothing should score here"),
        }
    }

    #[test]
    fn performers_route_to_category_buckets() {
        let g = game("g1", ("h", "BOS"), ("a", "NYK"));
        let mut entry = box_score("BOS", 110, "NYK", 100);
        entry.performers.points.push(performer("Jayson Tatum"));
        entry.performers.assists.push(performer("Jalen Brunson"));

        let options = vec![option("p1", "Jayson Tatum"), option("p2", "Jalen Brunson")];
        let categories = [StatCategory::TopScorer, StatCategory::TopAssist];
        let proposal = propose_game(&g, &entry, &options, &categories);

        assert_eq!(proposal.player_proposals.len(), 2);
        assert_eq!(proposal.player_proposals[0].category, StatCategory::TopScorer);
        assert_eq!(proposal.player_proposals[1].category, StatCategory::TopAssist);
        match &proposal.player_proposals[1].candidate {
            ProposedPlayer::Matched { player_id, .. } => assert_eq!(player_id, "p2"),
            ProposedPlayer::Degraded { .. } => panic!("expected a match"),
        }
    }

    #[test]
    fn raw_game_labels_route_by_substring() {
        let raw = RawGame {
            home: RawTeamLine {
                abbreviation: "BOS".into(),
                score: 110,
            },
            away: RawTeamLine {
                abbreviation: "NYK".into(),
                score: 108,
            },
            top_performers: vec![
                RawPerformer {
                    category: "Top Rebounds".into(),
                    name: "A".into(),
                    player_id: None,
                    team_abbr: None,
                    value: 14.0,
                },
                RawPerformer {
                    category: "scoring leader".into(),
                    name: "B".into(),
                    player_id: None,
                    team_abbr: None,
                    value: 41.0,
                },
            ],
        };
        let parsed = GameBoxScore::from(raw);
        assert_eq!(parsed.performers.rebounds.len(), 1);
        assert_eq!(parsed.performers.points.len(), 1);
        assert!(parsed.performers.assists.is_empty());
    }
}
