//! Per-event aggregates and the public event catalog.

use super::FestivalApp;
use festival_auth::CredentialStore;
use festival_core::{
    EventCounts, EventDefinition, EventKind, Mailer, RegistrationStore, SubEvent, TeamBounds,
};
use serde::Serialize;
use tracing::warn;

/// Aggregate counts of one event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventSummary {
    /// Event id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Backing table.
    pub table_name: String,
    /// Counts; all zero when the table could not be read.
    #[serde(flatten)]
    pub counts: EventCounts,
}

/// Public description of an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntry {
    /// Event id used in registration URLs.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Registration shape.
    pub kind: &'static str,
    /// Fixed fee.
    pub fee: i64,
    /// Whether a UTR must be submitted.
    pub requires_payment_proof: bool,
    /// Roster bounds for team events.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team: Option<TeamBounds>,
    /// Sub-events of a multi-event.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sub_events: Vec<SubEvent>,
    /// Venue and schedule.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub venue: Option<String>,
}

impl From<&EventDefinition> for CatalogEntry {
    fn from(event: &EventDefinition) -> Self {
        Self {
            id: event.id.clone(),
            name: event.name.clone(),
            kind: event.kind.label(),
            fee: event.fee,
            requires_payment_proof: event.requires_payment_proof,
            team: event.kind.team_bounds().copied(),
            sub_events: match &event.kind {
                EventKind::MultiEvent { sub_events } => sub_events.clone(),
                _ => Vec::new(),
            },
            venue: event.venue.clone(),
        }
    }
}

impl<S, C, M> FestivalApp<S, C, M>
where
    S: RegistrationStore,
    C: CredentialStore,
    M: Mailer,
{
    /// Counts for every configured event, in catalog order.
    ///
    /// Never fails: an event whose table cannot be read is reported with
    /// zero counts.
    #[tracing::instrument(skip(self))]
    pub async fn event_stats(&self) -> Vec<EventSummary> {
        let mut summaries = Vec::with_capacity(self.registry.len());
        for event in self.registry.iter() {
            let counts = match self.store.stats(&event.table_name).await {
                Ok(counts) => counts,
                Err(e) => {
                    warn!(table = %event.table_name, error = %e, "stats unavailable, reporting zeros");
                    EventCounts::default()
                }
            };
            summaries.push(EventSummary {
                id: event.id.clone(),
                name: event.name.clone(),
                table_name: event.table_name.clone(),
                counts,
            });
        }
        summaries
    }

    /// Public catalog of configured events.
    #[must_use]
    pub fn catalog(&self) -> Vec<CatalogEntry> {
        self.registry.iter().map(CatalogEntry::from).collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::pipeline::test_support::{app, Harness};
    use crate::pipeline::StatusUpdate;
    use festival_auth::AdminClaims;
    use festival_core::RegistrationStatus;
    use festival_testing::fixtures::{hackathon_form, solo_form};

    #[tokio::test]
    async fn test_failing_table_reports_zeros() {
        let Harness { app, store, .. } = app();
        let id = app
            .register("solo-singing", solo_form("a@example.com"))
            .await
            .unwrap()
            .registration_id;
        app.register("solo-singing", solo_form("b@example.com"))
            .await
            .unwrap();
        app.register("hackathon", hackathon_form("c@example.com", 2))
            .await
            .unwrap();
        let admin = AdminClaims {
            admin_id: 1,
            username: "root".into(),
            role: "super_admin".into(),
        };
        app.update_status(
            &admin,
            StatusUpdate {
                registration_id: id.to_string(),
                table_name: "solo_singing_registrations".into(),
                registration_status: RegistrationStatus::Verified,
                payment_verified: true,
                message: None,
                recipient: None,
            },
        )
        .await
        .unwrap();
        store.fail_table("hackathon_registrations");

        let stats = app.event_stats().await;
        assert_eq!(stats.len(), app.registry.len());

        let solo = stats.iter().find(|s| s.id == "solo-singing").unwrap();
        assert_eq!(solo.counts.total, 2);
        assert_eq!(solo.counts.verified, 1);
        assert_eq!(solo.counts.pending, 1);
        assert_eq!(solo.counts.collected_amount, 100);

        let hackathon = stats.iter().find(|s| s.id == "hackathon").unwrap();
        assert_eq!(hackathon.counts, EventCounts::default());

        let json = serde_json::to_value(solo).unwrap();
        assert_eq!(json["tableName"], "solo_singing_registrations");
        assert_eq!(json["collectedAmount"], 100);
        assert_eq!(json["checkedIn"], 0);
    }

    #[tokio::test]
    async fn test_catalog_lists_team_bounds_and_sub_events() {
        let Harness { app, .. } = app();
        let catalog = app.catalog();

        let hackathon = catalog.iter().find(|e| e.id == "hackathon").unwrap();
        assert_eq!(hackathon.kind, "team");
        assert_eq!(hackathon.team.map(|t| (t.min, t.max)), Some((2, 5)));

        let fest = catalog.iter().find(|e| e.id == "cultural-fest").unwrap();
        assert_eq!(fest.kind, "multi_event");
        assert_eq!(fest.sub_events.len(), 4);
        assert!(fest.team.is_none());
    }
}
