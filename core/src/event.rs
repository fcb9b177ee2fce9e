//! Event definitions and the registry that holds them.
//!
//! The registry is built once at startup (from the built-in catalog or a
//! JSON file) and shared read-only by every request handler.

use crate::error::{FestivalError, Result};
use crate::validation::is_safe_identifier;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// How a team roster is counted against [`TeamBounds`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberCounting {
    /// Count only the members besides the team leader.
    AdditionalMembers,
    /// Count every member including the team leader.
    TotalMembers,
}

/// Half-open team size bound: `min <= size < max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamBounds {
    /// Smallest accepted size.
    pub min: u32,
    /// First rejected size.
    pub max: u32,
    /// What the size counts.
    pub counting: MemberCounting,
}

impl TeamBounds {
    /// Size of a roster with `additional` members besides the leader, as
    /// counted by this bound.
    #[must_use]
    pub const fn counted_size(&self, additional: u32) -> u32 {
        match self.counting {
            MemberCounting::AdditionalMembers => additional,
            MemberCounting::TotalMembers => additional + 1,
        }
    }

    /// Whether a roster with `additional` members besides the leader fits.
    #[must_use]
    pub const fn accepts(&self, additional: u32) -> bool {
        let size = self.counted_size(additional);
        size >= self.min && size < self.max
    }

    /// Human-readable description used in validation messages.
    #[must_use]
    pub fn describe(&self) -> String {
        let largest = self.max.saturating_sub(1);
        match self.counting {
            MemberCounting::AdditionalMembers => format!(
                "between {} and {largest} members in addition to the team leader",
                self.min
            ),
            MemberCounting::TotalMembers => format!(
                "between {} and {largest} members including the team leader",
                self.min
            ),
        }
    }
}

/// One entry of a multi-event catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubEvent {
    /// Identifier used in submissions.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Fee for this sub-event.
    pub fee: i64,
    /// Roster bounds for team sub-events.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team: Option<TeamBounds>,
}

/// Registration shape of an event.
///
/// Selects both the field validator and the confirmation email template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventKind {
    /// Individual participant.
    Solo,
    /// Team with a named leader and a roster.
    Team {
        /// Roster bounds.
        bounds: TeamBounds,
    },
    /// Street play troupe: a team that also submits a synopsis.
    StreetPlay {
        /// Roster bounds.
        bounds: TeamBounds,
    },
    /// Participant choosing one or more sub-events, each with its own fee.
    MultiEvent {
        /// Available sub-events.
        sub_events: Vec<SubEvent>,
    },
}

impl EventKind {
    /// Short label for logs and the public catalog.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Solo => "solo",
            Self::Team { .. } => "team",
            Self::StreetPlay { .. } => "street_play",
            Self::MultiEvent { .. } => "multi_event",
        }
    }

    /// Roster bounds for team-shaped events.
    #[must_use]
    pub const fn team_bounds(&self) -> Option<&TeamBounds> {
        match self {
            Self::Team { bounds } | Self::StreetPlay { bounds } => Some(bounds),
            Self::Solo | Self::MultiEvent { .. } => None,
        }
    }
}

/// Static configuration of one festival event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventDefinition {
    /// Identifier used in URLs and sessions.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Backing table.
    pub table_name: String,
    /// Registration shape.
    pub kind: EventKind,
    /// Fixed fee (ignored for multi-event, where sub-event fees apply).
    #[serde(default)]
    pub fee: i64,
    /// Whether a 12-digit UTR must accompany the submission.
    #[serde(default)]
    pub requires_payment_proof: bool,
    /// Sender address for confirmation emails.
    pub sender: String,
    /// Venue and schedule line shown in the confirmation email.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub venue: Option<String>,
}

impl EventDefinition {
    /// Look up a sub-event of a multi-event by id.
    #[must_use]
    pub fn sub_event(&self, id: &str) -> Option<&SubEvent> {
        match &self.kind {
            EventKind::MultiEvent { sub_events } => sub_events.iter().find(|s| s.id == id),
            _ => None,
        }
    }
}

/// Read-only catalog of every configured event.
#[derive(Debug, Clone)]
pub struct EventRegistry {
    events: Vec<EventDefinition>,
}

impl EventRegistry {
    /// Build a registry, checking the catalog for consistency.
    ///
    /// # Errors
    ///
    /// Returns [`FestivalError::Configuration`] if:
    /// - an event id or table name is duplicated
    /// - a table name is not a plain SQL identifier
    /// - team bounds are empty (`min >= max`)
    /// - a multi-event has no sub-events or duplicate sub-event ids
    pub fn new(events: Vec<EventDefinition>) -> Result<Self> {
        let mut ids = HashSet::new();
        let mut tables = HashSet::new();

        for event in &events {
            if !ids.insert(event.id.as_str()) {
                return Err(FestivalError::Configuration(format!(
                    "duplicate event id {}",
                    event.id
                )));
            }
            if !tables.insert(event.table_name.as_str()) {
                return Err(FestivalError::Configuration(format!(
                    "duplicate table name {}",
                    event.table_name
                )));
            }
            if !is_safe_identifier(&event.table_name) {
                return Err(FestivalError::Configuration(format!(
                    "table name {} is not a valid identifier",
                    event.table_name
                )));
            }
            if let Some(bounds) = event.kind.team_bounds() {
                check_bounds(&event.id, bounds)?;
            }
            if let EventKind::MultiEvent { sub_events } = &event.kind {
                if sub_events.is_empty() {
                    return Err(FestivalError::Configuration(format!(
                        "multi-event {} has no sub-events",
                        event.id
                    )));
                }
                let mut sub_ids = HashSet::new();
                for sub in sub_events {
                    if !sub_ids.insert(sub.id.as_str()) {
                        return Err(FestivalError::Configuration(format!(
                            "duplicate sub-event {} in {}",
                            sub.id, event.id
                        )));
                    }
                    if let Some(bounds) = &sub.team {
                        check_bounds(&sub.id, bounds)?;
                    }
                }
            }
        }

        Ok(Self { events })
    }

    /// Parse a registry from a JSON array of event definitions.
    ///
    /// # Errors
    ///
    /// Returns [`FestivalError::Configuration`] if the JSON is malformed or
    /// the catalog is inconsistent.
    pub fn from_json(json: &str) -> Result<Self> {
        let events: Vec<EventDefinition> = serde_json::from_str(json)
            .map_err(|e| FestivalError::Configuration(format!("malformed events file: {e}")))?;
        Self::new(events)
    }

    /// Look up an event by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&EventDefinition> {
        self.events.iter().find(|e| e.id == id)
    }

    /// Look up an event by its table name.
    #[must_use]
    pub fn by_table(&self, table_name: &str) -> Option<&EventDefinition> {
        self.events.iter().find(|e| e.table_name == table_name)
    }

    /// Iterate over events in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &EventDefinition> {
        self.events.iter()
    }

    /// Number of configured events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// The festival's default lineup.
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            events: builtin_events(),
        }
    }
}

fn check_bounds(owner: &str, bounds: &TeamBounds) -> Result<()> {
    if bounds.min >= bounds.max {
        return Err(FestivalError::Configuration(format!(
            "team bounds of {owner} are empty ({}..{})",
            bounds.min, bounds.max
        )));
    }
    Ok(())
}

fn builtin_events() -> Vec<EventDefinition> {
    vec![
        EventDefinition {
            id: "solo-singing".into(),
            name: "Solo Singing".into(),
            table_name: "solo_singing_registrations".into(),
            kind: EventKind::Solo,
            fee: 100,
            requires_payment_proof: true,
            sender: "music@festival.example.edu".into(),
            venue: Some("Open Air Theatre, Day 1, 5:00 PM".into()),
        },
        EventDefinition {
            id: "hackathon".into(),
            name: "24h Hackathon".into(),
            table_name: "hackathon_registrations".into(),
            kind: EventKind::Team {
                bounds: TeamBounds {
                    min: 2,
                    max: 5,
                    counting: MemberCounting::TotalMembers,
                },
            },
            fee: 0,
            requires_payment_proof: false,
            sender: "hackathon@festival.example.edu".into(),
            venue: Some("Computer Centre, Day 1, 9:00 AM".into()),
        },
        EventDefinition {
            id: "street-play".into(),
            name: "Nukkad Natak (Street Play)".into(),
            table_name: "street_play_registrations".into(),
            kind: EventKind::StreetPlay {
                bounds: TeamBounds {
                    min: 3,
                    max: 16,
                    counting: MemberCounting::TotalMembers,
                },
            },
            fee: 500,
            requires_payment_proof: true,
            sender: "theatre@festival.example.edu".into(),
            venue: Some("Main Quadrangle, Day 2, 11:00 AM".into()),
        },
        EventDefinition {
            id: "battle-of-bands".into(),
            name: "Battle of Bands".into(),
            table_name: "battle_of_bands_registrations".into(),
            kind: EventKind::Team {
                bounds: TeamBounds {
                    min: 2,
                    max: 8,
                    counting: MemberCounting::AdditionalMembers,
                },
            },
            fee: 300,
            requires_payment_proof: true,
            sender: "music@festival.example.edu".into(),
            venue: Some("Main Stage, Day 3, 6:00 PM".into()),
        },
        EventDefinition {
            id: "cultural-fest".into(),
            name: "Cultural Fest".into(),
            table_name: "cultural_fest_registrations".into(),
            kind: EventKind::MultiEvent {
                sub_events: vec![
                    SubEvent {
                        id: "solo-dance".into(),
                        name: "Solo Dance".into(),
                        fee: 150,
                        team: None,
                    },
                    SubEvent {
                        id: "group-dance".into(),
                        name: "Group Dance".into(),
                        fee: 400,
                        team: Some(TeamBounds {
                            min: 4,
                            max: 13,
                            counting: MemberCounting::TotalMembers,
                        }),
                    },
                    SubEvent {
                        id: "poetry".into(),
                        name: "Poetry Slam".into(),
                        fee: 100,
                        team: None,
                    },
                    SubEvent {
                        id: "quiz".into(),
                        name: "General Quiz".into(),
                        fee: 200,
                        team: Some(TeamBounds {
                            min: 2,
                            max: 4,
                            counting: MemberCounting::TotalMembers,
                        }),
                    },
                ],
            },
            fee: 0,
            requires_payment_proof: true,
            sender: "culturals@festival.example.edu".into(),
            venue: None,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog_is_consistent() {
        let builtin = EventRegistry::builtin();
        let rebuilt = EventRegistry::new(builtin.iter().cloned().collect());
        assert!(rebuilt.is_ok());
        assert_eq!(builtin.len(), 5);
    }

    #[test]
    fn test_lookup_by_id_and_table() {
        let registry = EventRegistry::builtin();
        let event = registry.get("street-play");
        assert_eq!(
            event.map(|e| e.table_name.as_str()),
            Some("street_play_registrations")
        );
        assert_eq!(
            registry
                .by_table("hackathon_registrations")
                .map(|e| e.id.as_str()),
            Some("hackathon")
        );
        assert!(registry.get("nope").is_none());
    }

    #[test]
    fn test_bounds_are_half_open() {
        let bounds = TeamBounds {
            min: 2,
            max: 5,
            counting: MemberCounting::TotalMembers,
        };
        assert!(!bounds.accepts(0));
        assert!(bounds.accepts(1));
        assert!(bounds.accepts(3));
        assert!(!bounds.accepts(4));
    }

    #[test]
    fn test_additional_member_counting_excludes_leader() {
        let bounds = TeamBounds {
            min: 2,
            max: 8,
            counting: MemberCounting::AdditionalMembers,
        };
        assert!(!bounds.accepts(1));
        assert!(bounds.accepts(2));
        assert!(bounds.accepts(7));
        assert!(!bounds.accepts(8));
    }

    #[test]
    fn test_rejects_duplicate_tables() {
        let mut events = EventRegistry::builtin().iter().cloned().collect::<Vec<_>>();
        events[1].table_name = events[0].table_name.clone();
        assert!(matches!(
            EventRegistry::new(events),
            Err(FestivalError::Configuration(_))
        ));
    }

    #[test]
    fn test_rejects_unsafe_table_name() {
        let mut events = EventRegistry::builtin().iter().cloned().collect::<Vec<_>>();
        events[0].table_name = "users; drop table x".into();
        assert!(EventRegistry::new(events).is_err());
    }

    #[test]
    fn test_from_json() {
        let json = r#"[
            {
                "id": "chess",
                "name": "Chess",
                "table_name": "chess_registrations",
                "kind": { "type": "solo" },
                "fee": 50,
                "sender": "chess@festival.example.edu"
            },
            {
                "id": "relay",
                "name": "Relay",
                "table_name": "relay_registrations",
                "kind": {
                    "type": "team",
                    "bounds": { "min": 4, "max": 5, "counting": "total_members" }
                },
                "sender": "sports@festival.example.edu"
            }
        ]"#;
        let registry = EventRegistry::from_json(json);
        assert!(registry.is_ok());
        let registry = registry.unwrap_or_else(|_| EventRegistry::builtin());
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get("relay").map(|e| e.fee), Some(0));
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(EventRegistry::from_json("{not json").is_err());
    }
}
