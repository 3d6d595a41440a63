use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One team as referenced from any source (declared winner, user pick,
/// static metadata). Fragments for the same real team may disagree on which
/// fields are populated; the identity registry merges them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamIdentity {
    pub id: Option<String>,
    pub abbreviation: Option<String>,
    pub name: Option<String>,
}

/// Denormalized per-side team snapshot embedded in games and winner rows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamRef {
    pub id: Option<String>,
    #[serde(default)]
    pub abbreviation: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

/// A slate game, decoded once at the ingestion boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameMeta {
    pub game_id: String,
    pub home: TeamRef,
    pub away: TeamRef,
}

/// A player as referenced from a pick or winner row. The name fields may
/// hold a stray slug or UUID instead of a real name (known upstream data
/// quality issue); the name resolver tolerates that rather than failing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlayerReference {
    pub player_id: String,
    #[serde(default)]
    pub provider_player_id: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub team_id: Option<String>,
}

/// Entry in the static per-team roster snapshot, used only as a naming
/// fallback when nothing better is available.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterEntry {
    pub id: String,
    pub name: String,
}

/// Static team metadata row (the read-only `teamId -> {name, abbreviation}`
/// table).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamMeta {
    pub name: String,
    pub abbreviation: String,
}

/// Player statistical categories a pick can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatCategory {
    TopScorer,
    TopAssist,
    TopRebound,
}

/// Box-score stat buckets the provider reports top performers under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatBucket {
    Points,
    Assists,
    Rebounds,
}

impl StatCategory {
    /// Map a raw provider label to a category: a label containing "assist"
    /// settles from assists, "rebound" from rebounds, anything else from
    /// points. Applied once when the label crosses the ingestion boundary.
    pub fn from_label(label: &str) -> Self {
        let label = label.to_lowercase();
        if label.contains("assist") {
            StatCategory::TopAssist
        } else if label.contains("rebound") {
            StatCategory::TopRebound
        } else {
            StatCategory::TopScorer
        }
    }

    /// The box-score bucket this category settles from.
    pub fn bucket(&self) -> StatBucket {
        match self {
            StatCategory::TopScorer => StatBucket::Points,
            StatCategory::TopAssist => StatBucket::Assists,
            StatCategory::TopRebound => StatBucket::Rebounds,
        }
    }

    pub fn display_str(&self) -> &'static str {
        match self {
            StatCategory::TopScorer => "top scorer",
            StatCategory::TopAssist => "top assist",
            StatCategory::TopRebound => "top rebound",
        }
    }
}

impl fmt::Display for StatCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_str())
    }
}

/// A user's prediction for one game on one slate.
///
/// At most one active `Team` pick per `game_id` and one `Player` pick per
/// `(game_id, category)` per user per slate; edits overwrite in place and
/// bump `changes_count` rather than creating new rows.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Pick {
    Team(TeamPick),
    Player(PlayerPick),
}

impl Pick {
    pub fn game_id(&self) -> &str {
        match self {
            Pick::Team(p) => &p.game_id,
            Pick::Player(p) => &p.game_id,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamPick {
    pub game_id: String,
    pub selected_team_id: String,
    #[serde(default)]
    pub selected_team_abbr: Option<String>,
    #[serde(default)]
    pub selected_team_name: Option<String>,
    /// Game snapshot captured when the pick was saved, when the store has one.
    #[serde(default)]
    pub game: Option<GameMeta>,
    pub pick_date: NaiveDate,
    #[serde(default)]
    pub changes_count: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerPick {
    pub game_id: String,
    pub category: StatCategory,
    pub player_id: String,
    #[serde(default)]
    pub provider_player_id: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    pub pick_date: NaiveDate,
    #[serde(default)]
    pub changes_count: u32,
}

impl PlayerPick {
    pub fn player_reference(&self) -> PlayerReference {
        PlayerReference {
            player_id: self.player_id.clone(),
            provider_player_id: self.provider_player_id.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            team_id: None,
        }
    }
}

/// Declared team result for one game. `winner_team_id == None` means the
/// game is not yet final.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamWinner {
    pub game_id: String,
    #[serde(default)]
    pub home: TeamRef,
    #[serde(default)]
    pub away: TeamRef,
    pub winner_team_id: Option<String>,
}

/// Declared statistical-category winner for one game. Absence of any row for
/// a `(game_id, category)` means that category is not yet settled. Ties
/// produce multiple rows for the same category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerWinner {
    pub game_id: String,
    pub category: StatCategory,
    pub player_id: String,
    #[serde(default)]
    pub provider_player_id: Option<String>,
    #[serde(default)]
    pub team_id: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

/// All declared winners currently loaded for one slate.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SlateWinners {
    #[serde(default)]
    pub team_winners: Vec<TeamWinner>,
    #[serde(default)]
    pub player_winners: Vec<PlayerWinner>,
}

/// Win/loss/pending verdict for one pick. Computed, never stored: always a
/// pure function of (pick, declared winners, identity registry) at read time,
/// so recomputing it on every call is safe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Win,
    Loss,
    Pending,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Outcome::Win => "win",
            Outcome::Loss => "loss",
            Outcome::Pending => "pending",
        };
        write!(f, "{}", s)
    }
}

/// One pick paired with its resolved outcome.
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedPick {
    pub pick: Pick,
    pub outcome: Outcome,
}

/// Derived slate score. Always reproducible from (picks, declared winners)
/// alone; never stored independently of its inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub team_wins: u32,
    pub player_wins: u32,
    pub base_team_points: f64,
    pub base_player_points: f64,
    pub total_wins: u32,
    pub multiplier: f64,
    pub total_points: f64,
}
