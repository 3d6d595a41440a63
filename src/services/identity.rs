//! Canonical team identity for one slate view.
//!
//! The registry merges team fragments from declared winners, user picks (and
//! their embedded game snapshots), and a static metadata table into a single
//! `teamId -> TeamIdentity` lookup. It is caller-owned with an explicit
//! `load_slate`/`invalidate` lifecycle so tests get fresh, isolated
//! registries per case. It never errors: absent data degrades to `None` or a
//! fallback value, because the caller must still render partially loaded
//! slates.

use std::collections::HashMap;

use crate::models::{Pick, SlateWinners, TeamIdentity, TeamMeta, TeamRef};
use crate::normalize::normalize_id;

pub struct IdentityRegistry {
    /// Slate-derived entries, keyed by normalized team id.
    entries: HashMap<String, TeamIdentity>,
    /// Static metadata table, keyed by normalized team id. Consulted only
    /// when no slate entry exists.
    metadata: HashMap<String, TeamMeta>,
}

impl IdentityRegistry {
    pub fn new() -> Self {
        Self::with_metadata(HashMap::new())
    }

    pub fn with_metadata(metadata: HashMap<String, TeamMeta>) -> Self {
        let metadata = metadata
            .into_iter()
            .map(|(k, v)| (normalize_id(&k), v))
            .collect();
        Self {
            entries: HashMap::new(),
            metadata,
        }
    }

    /// Seed the registry from every team fragment in the currently loaded
    /// slate records.
    pub fn load_slate(&mut self, picks: &[Pick], winners: &SlateWinners) {
        for winner in &winners.team_winners {
            self.register_ref(&winner.home);
            self.register_ref(&winner.away);
        }
        for winner in &winners.player_winners {
            if let Some(team_id) = winner.team_id.as_deref() {
                self.register(team_id, None, None);
            }
        }
        for pick in picks {
            if let Pick::Team(team_pick) = pick {
                self.register(
                    &team_pick.selected_team_id,
                    team_pick.selected_team_name.as_deref(),
                    team_pick.selected_team_abbr.as_deref(),
                );
                if let Some(game) = &team_pick.game {
                    self.register_ref(&game.home);
                    self.register_ref(&game.away);
                }
            }
        }
        tracing::debug!(teams = self.entries.len(), "identity registry loaded");
    }

    fn register_ref(&mut self, team: &TeamRef) {
        if let Some(id) = team.id.as_deref() {
            self.register(id, team.name.as_deref(), team.abbreviation.as_deref());
        }
    }

    /// Drop all slate-derived entries. Static metadata is kept.
    pub fn invalidate(&mut self) {
        self.entries.clear();
    }

    /// Merge a team fragment into the entry for `id`, creating it if needed.
    ///
    /// A name is accepted only when the stored name is absent or degenerate
    /// (equal to the id itself): any real name beats a "name == id"
    /// placeholder. The first non-empty abbreviation wins and is never
    /// overwritten.
    pub fn register(&mut self, id: &str, name: Option<&str>, abbr: Option<&str>) {
        let key = normalize_id(id);
        if key.is_empty() {
            return;
        }
        let entry = self.entries.entry(key.clone()).or_insert_with(|| TeamIdentity {
            id: Some(id.trim().to_string()),
            abbreviation: None,
            name: None,
        });
        if let Some(name) = name.map(str::trim).filter(|s| !s.is_empty()) {
            let stored_is_degenerate = entry
                .name
                .as_deref()
                .map_or(true, |stored| normalize_id(stored) == key);
            if stored_is_degenerate {
                entry.name = Some(name.to_string());
            }
        }
        if entry.abbreviation.is_none() {
            if let Some(abbr) = abbr.map(str::trim).filter(|s| !s.is_empty()) {
                entry.abbreviation = Some(abbr.to_string());
            }
        }
    }

    /// Resolve a team reference to its best available identity.
    ///
    /// A missing id yields a fallback-only identity. A registry entry's name
    /// is preferred unless degenerate, in which case the chain is
    /// `fallback_name`, then the entry's own name, then the id itself. A
    /// registry miss falls through to the static metadata table with the
    /// same fallback chain.
    pub fn resolve(
        &self,
        team_id: Option<&str>,
        fallback_name: Option<&str>,
        fallback_abbr: Option<&str>,
    ) -> TeamIdentity {
        let Some(id) = team_id.map(str::trim).filter(|s| !s.is_empty()) else {
            return TeamIdentity {
                id: None,
                name: fallback_name.map(str::to_string),
                abbreviation: fallback_abbr.map(str::to_string),
            };
        };
        let key = normalize_id(id);

        if let Some(entry) = self.entries.get(&key) {
            return with_fallbacks(
                id,
                entry.name.as_deref(),
                entry.abbreviation.as_deref(),
                fallback_name,
                fallback_abbr,
            );
        }
        if let Some(meta) = self.metadata.get(&key) {
            return with_fallbacks(
                id,
                Some(&meta.name),
                Some(&meta.abbreviation),
                fallback_name,
                fallback_abbr,
            );
        }
        with_fallbacks(id, None, None, fallback_name, fallback_abbr)
    }
}

impl Default for IdentityRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn with_fallbacks(
    id: &str,
    entry_name: Option<&str>,
    entry_abbr: Option<&str>,
    fallback_name: Option<&str>,
    fallback_abbr: Option<&str>,
) -> TeamIdentity {
    let key = normalize_id(id);
    let degenerate = entry_name.map_or(true, |n| normalize_id(n) == key);
    let name = if degenerate {
        fallback_name
            .map(str::to_string)
            .or_else(|| entry_name.map(str::to_string))
            .or_else(|| Some(id.to_string()))
    } else {
        entry_name.map(str::to_string)
    };
    let abbreviation = entry_abbr
        .map(str::to_string)
        .or_else(|| fallback_abbr.map(str::to_string));
    TeamIdentity {
        id: Some(id.to_string()),
        name,
        abbreviation,
    }
}

/// Whether two team references point at the same team.
///
/// Normalized-id equality is checked first and is authoritative when it
/// holds; normalized-abbreviation equality is the fallback for rows that
/// store an abbreviation where an id was expected. Empty identifiers never
/// match each other. Symmetric by construction.
///
/// Known limitation inherited from upstream data: two franchises sharing an
/// abbreviation across seasons/relocations can conflate here if the registry
/// is ever seeded from stale metadata.
pub fn matches_team_identity(a: &TeamIdentity, b: &TeamIdentity) -> bool {
    if let (Some(a_id), Some(b_id)) = (a.id.as_deref(), b.id.as_deref()) {
        let (a_id, b_id) = (normalize_id(a_id), normalize_id(b_id));
        if !a_id.is_empty() && a_id == b_id {
            return true;
        }
    }
    if let (Some(a_abbr), Some(b_abbr)) = (a.abbreviation.as_deref(), b.abbreviation.as_deref()) {
        let (a_abbr, b_abbr) = (normalize_id(a_abbr), normalize_id(b_abbr));
        if !a_abbr.is_empty() && a_abbr == b_abbr {
            return true;
        }
    }
    false
}

/// The stock NBA metadata table, keyed by provider slug.
pub fn nba_team_metadata() -> HashMap<String, TeamMeta> {
    let teams = [
        ("atlanta-hawks", "Atlanta Hawks", "ATL"),
        ("boston-celtics", "Boston Celtics", "BOS"),
        ("brooklyn-nets", "Brooklyn Nets", "BKN"),
        ("charlotte-hornets", "Charlotte Hornets", "CHA"),
        ("chicago-bulls", "Chicago Bulls", "CHI"),
        ("cleveland-cavaliers", "Cleveland Cavaliers", "CLE"),
        ("dallas-mavericks", "Dallas Mavericks", "DAL"),
        ("denver-nuggets", "Denver Nuggets", "DEN"),
        ("detroit-pistons", "Detroit Pistons", "DET"),
        ("golden-state-warriors", "Golden State Warriors", "GSW"),
        ("houston-rockets", "Houston Rockets", "HOU"),
        ("indiana-pacers", "Indiana Pacers", "IND"),
        ("la-clippers", "LA Clippers", "LAC"),
        ("los-angeles-lakers", "Los Angeles Lakers", "LAL"),
        ("memphis-grizzlies", "Memphis Grizzlies", "MEM"),
        ("miami-heat", "Miami Heat", "MIA"),
        ("milwaukee-bucks", "Milwaukee Bucks", "MIL"),
        ("minnesota-timberwolves", "Minnesota Timberwolves", "MIN"),
        ("new-orleans-pelicans", "New Orleans Pelicans", "NOP"),
        ("new-york-knicks", "New York Knicks", "NYK"),
        ("oklahoma-city-thunder", "Oklahoma City Thunder", "OKC"),
        ("orlando-magic", "Orlando Magic", "ORL"),
        ("philadelphia-76ers", "Philadelphia 76ers", "PHI"),
        ("phoenix-suns", "Phoenix Suns", "PHX"),
        ("portland-trail-blazers", "Portland Trail Blazers", "POR"),
        ("sacramento-kings", "Sacramento Kings", "SAC"),
        ("san-antonio-spurs", "San Antonio Spurs", "SAS"),
        ("toronto-raptors", "Toronto Raptors", "TOR"),
        ("utah-jazz", "Utah Jazz", "UTA"),
        ("washington-wizards", "Washington Wizards", "WAS"),
    ];
    teams
        .into_iter()
        .map(|(slug, name, abbr)| {
            (
                slug.to_string(),
                TeamMeta {
                    name: name.to_string(),
                    abbreviation: abbr.to_string(),
                },
            )
        })
        .collect()
}
