//! Business metrics for the festival service.
//!
//! # Exported Metrics
//!
//! ## Counters
//! - `festival_registrations_total{event,outcome}` - Registration attempts by outcome
//! - `festival_emails_total{kind,outcome}` - Email sends by template kind
//! - `festival_check_ins_total{outcome}` - Check-in attempts by outcome
//! - `festival_logins_total{role,outcome}` - Back-office logins by role

use metrics::describe_counter;

/// Initialize and register all business metrics descriptions.
///
/// This should be called once at application startup, before any metrics are recorded.
pub fn register_business_metrics() {
    describe_counter!(
        "festival_registrations_total",
        "Registration attempts by event and outcome (created, rejected, duplicate, failed)"
    );
    describe_counter!(
        "festival_emails_total",
        "Emails by kind (confirmation, status) and outcome (sent, failed)"
    );
    describe_counter!(
        "festival_check_ins_total",
        "Check-in attempts by outcome (checked_in, already_checked_in, not_found)"
    );
    describe_counter!(
        "festival_logins_total",
        "Back-office logins by role (organizer, admin) and outcome (success, rejected, failed)"
    );

    tracing::info!("Business metrics registered");
}

/// Record the outcome of a registration attempt.
pub fn record_registration(event: &str, outcome: &'static str) {
    metrics::counter!(
        "festival_registrations_total",
        "event" => event.to_string(),
        "outcome" => outcome
    )
    .increment(1);
}

/// Record an email send.
pub fn record_email(kind: &'static str, sent: bool) {
    let outcome = if sent { "sent" } else { "failed" };
    metrics::counter!("festival_emails_total", "kind" => kind, "outcome" => outcome).increment(1);
}

/// Record the outcome of a check-in attempt.
pub fn record_check_in(outcome: &'static str) {
    metrics::counter!("festival_check_ins_total", "outcome" => outcome).increment(1);
}

/// Record the outcome of a login attempt.
pub fn record_login(role: &'static str, outcome: &'static str) {
    metrics::counter!("festival_logins_total", "role" => role, "outcome" => outcome).increment(1);
}
