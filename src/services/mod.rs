pub mod autofill;
pub mod identity;
pub mod names;
pub mod outcome;
pub mod score;

pub use autofill::{
    BoxScoreClient, BoxScorePerformer, FeedError, GameBoxScore, GameProposal, PerformerBuckets,
    PlayerOption, PlayerProposal, ProposedPlayer, ProposedTeam,
};
pub use identity::{matches_team_identity, nba_team_metadata, IdentityRegistry};
pub use names::{NameResolver, ResolvedName, UNKNOWN_PLAYER};
pub use outcome::{resolve_outcomes, resolve_pick, resolve_player_pick, resolve_team_pick};
pub use score::{score_slate, MultiplierTier, ScoringConfig};
