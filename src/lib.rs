//! Pick reconciliation and scoring for a daily NBA picks game.
//!
//! Given a user's saved picks for a slate and whatever winners have been
//! declared so far, the engine resolves each pick to win/loss/pending and
//! aggregates a multiplied slate score. A separate admin path proposes
//! winners from a raw box-score feed for human review.

pub mod models;
pub mod normalize;
pub mod services;
