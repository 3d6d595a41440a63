//! Best-effort display names for player references.
//!
//! The upstream feed sometimes stores a provider slug or UUID in the
//! first/last-name fields instead of a real name. The resolver copes by
//! trying sources in a fixed priority order: the static roster snapshot is
//! the only ground truth, raw name fields are trusted only when they do not
//! look like identifiers, and a non-UUID provider id can be un-slugged into
//! something readable. A UUID that resolves to nothing becomes a fixed
//! placeholder rather than leaking into the UI.

use std::collections::HashMap;

use crate::models::{PlayerReference, RosterEntry};
use crate::normalize::{is_uuid_shaped, normalize_provider_id, unslug};

pub const UNKNOWN_PLAYER: &str = "Unknown Player";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedName {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub full_name: String,
}

pub struct NameResolver {
    /// Normalized player id -> roster display name, flattened across teams.
    roster: HashMap<String, String>,
}

impl NameResolver {
    pub fn new() -> Self {
        Self {
            roster: HashMap::new(),
        }
    }

    /// Build from the static roster snapshot (`teamId -> RosterEntry[]`).
    pub fn from_roster<'a, I>(rosters: I) -> Self
    where
        I: IntoIterator<Item = &'a Vec<RosterEntry>>,
    {
        let mut roster = HashMap::new();
        for entries in rosters {
            for entry in entries {
                let key = normalize_provider_id(&entry.id);
                if !key.is_empty() && !entry.name.trim().is_empty() {
                    roster.insert(key, entry.name.trim().to_string());
                }
            }
        }
        Self { roster }
    }

    /// Resolve a display name. First matching rule wins:
    /// roster entry, then usable raw first/last fields, then un-slugging a
    /// non-UUID id, then the "Unknown Player" placeholder for UUID ids, and
    /// finally the raw id itself.
    pub fn resolve(&self, player: &PlayerReference) -> ResolvedName {
        let lookup_id = player
            .provider_player_id
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(player.player_id.trim());

        if let Some(name) = self.roster.get(&normalize_provider_id(lookup_id)) {
            return split_full_name(name);
        }

        let first = usable_name_component(player.first_name.as_deref());
        let last = usable_name_component(player.last_name.as_deref());
        if first.is_some() || last.is_some() {
            let full = [first, last]
                .iter()
                .flatten()
                .copied()
                .collect::<Vec<_>>()
                .join(" ");
            return ResolvedName {
                first_name: first.map(str::to_string),
                last_name: last.map(str::to_string),
                full_name: full,
            };
        }

        if !lookup_id.is_empty() && !is_uuid_shaped(lookup_id) {
            let readable = unslug(lookup_id);
            if !readable.is_empty() {
                return split_full_name(&readable);
            }
        }

        if is_uuid_shaped(lookup_id) {
            tracing::debug!(id = lookup_id, "player id is a bare uuid, using placeholder");
            return ResolvedName {
                first_name: None,
                last_name: None,
                full_name: UNKNOWN_PLAYER.to_string(),
            };
        }

        ResolvedName {
            first_name: None,
            last_name: None,
            full_name: lookup_id.to_string(),
        }
    }
}

impl Default for NameResolver {
    fn default() -> Self {
        Self::new()
    }
}

/// A raw name field is usable only when non-empty and hyphen-free. Hyphens
/// mark slug/UUID fragments stored where a name was expected.
fn usable_name_component(s: Option<&str>) -> Option<&str> {
    s.map(str::trim)
        .filter(|s| !s.is_empty() && !s.contains('-'))
}

fn split_full_name(name: &str) -> ResolvedName {
    let mut tokens = name.split_whitespace();
    let first = tokens.next().map(str::to_string);
    let rest = tokens.collect::<Vec<_>>().join(" ");
    ResolvedName {
        first_name: first,
        last_name: (!rest.is_empty()).then_some(rest),
        full_name: name.split_whitespace().collect::<Vec<_>>().join(" "),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference(id: &str) -> PlayerReference {
        PlayerReference {
            player_id: id.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn roster_entry_wins_over_everything() {
        let roster = vec![vec![RosterEntry {
            id: "cooper-flagg".into(),
            name: "Cooper Flagg".into(),
        }]];
        let resolver = NameResolver::from_roster(&roster);

        let mut player = reference("COOPER-FLAGG");
        player.first_name = Some("Wrong".into());
        player.last_name = Some("Name".into());

        let resolved = resolver.resolve(&player);
        assert_eq!(resolved.full_name, "Cooper Flagg");
        assert_eq!(resolved.first_name.as_deref(), Some("Cooper"));
        assert_eq!(resolved.last_name.as_deref(), Some("Flagg"));
    }

    #[test]
    fn raw_name_fields_used_when_clean() {
        let resolver = NameResolver::new();
        let mut player = reference("6ba7b810-9dad-11d1-80b4-00c04fd430c8");
        player.first_name = Some("Nikola".into());
        player.last_name = Some("Jokić".into());

        let resolved = resolver.resolve(&player);
        assert_eq!(resolved.full_name, "Nikola Jokić");
    }

    #[test]
    fn hyphenated_name_fields_rejected_as_identifier_leaks() {
        let resolver = NameResolver::new();
        let mut player = reference("cooper-flagg");
        player.first_name = Some("cooper-flagg".into());

        let resolved = resolver.resolve(&player);
        assert_eq!(resolved.full_name, "Cooper Flagg");
        assert_eq!(resolved.first_name.as_deref(), Some("Cooper"));
    }

    #[test]
    fn single_usable_component_is_enough() {
        let resolver = NameResolver::new();
        let mut player = reference("6ba7b810-9dad-11d1-80b4-00c04fd430c8");
        player.last_name = Some("Wembanyama".into());

        let resolved = resolver.resolve(&player);
        assert_eq!(resolved.full_name, "Wembanyama");
        assert_eq!(resolved.first_name, None);
        assert_eq!(resolved.last_name.as_deref(), Some("Wembanyama"));
    }

    #[test]
    fn slug_id_is_unslugged() {
        let resolver = NameResolver::new();
        let resolved = resolver.resolve(&reference("jalen-williams-g-8"));
        assert_eq!(resolved.full_name, "Jalen Williams");
    }

    #[test]
    fn provider_id_preferred_over_primary_id_for_unslugging() {
        let resolver = NameResolver::new();
        let mut player = reference("6ba7b810-9dad-11d1-80b4-00c04fd430c8");
        player.provider_player_id = Some("lebron-james".into());

        let resolved = resolver.resolve(&player);
        assert_eq!(resolved.full_name, "Lebron James");
    }

    #[test]
    fn bare_uuid_becomes_placeholder() {
        let resolver = NameResolver::new();
        let resolved = resolver.resolve(&reference("6ba7b810-9dad-11d1-80b4-00c04fd430c8"));
        assert_eq!(resolved.full_name, UNKNOWN_PLAYER);
    }

    #[test]
    fn plain_id_falls_through_as_is() {
        let resolver = NameResolver::new();
        let resolved = resolver.resolve(&reference("p123"));
        assert_eq!(resolved.full_name, "P123");
    }
}
