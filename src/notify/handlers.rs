use axum::{extract::State, routing::post, Json, Router};
use serde::Serialize;
use tracing::{info, instrument, warn};

use super::mailer::{tax_reminder_body, TAX_REMINDER_SUBJECT};
use crate::auth::AdminAuth;
use crate::error::ApiError;
use crate::families::repo::Family;
use crate::state::AppState;

pub fn admin_router() -> Router<AppState> {
    Router::new().route("/families/notify", post(notify_unpaid))
}

/// Per-recipient outcome counters. One bad address never aborts the batch.
#[derive(Debug, Default, Serialize, PartialEq, Eq)]
pub struct NotifyReport {
    pub attempted: u32,
    pub sent: u32,
    pub failed: u32,
}

impl NotifyReport {
    pub fn record(&mut self, ok: bool) {
        self.attempted += 1;
        if ok {
            self.sent += 1;
        } else {
            self.failed += 1;
        }
    }
}

#[instrument(skip(state, _admin))]
pub async fn notify_unpaid(
    State(state): State<AppState>,
    _admin: AdminAuth,
) -> Result<Json<NotifyReport>, ApiError> {
    let families = Family::with_unpaid_tax(&state.db).await?;

    let mut report = NotifyReport::default();
    for family in &families {
        let body = tax_reminder_body(&family.leader_name);
        match state
            .mailer
            .send(&family.email, TAX_REMINDER_SUBJECT, &body)
            .await
        {
            Ok(()) => report.record(true),
            Err(e) => {
                warn!(family_id = %family.family_id, error = %e, "tax reminder failed");
                report.record(false);
            }
        }
    }

    info!(
        attempted = report.attempted,
        sent = report.sent,
        failed = report.failed,
        "tax reminders processed"
    );
    Ok(Json(report))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_counts_successes_and_failures() {
        let mut report = NotifyReport::default();
        report.record(true);
        report.record(false);
        report.record(true);
        assert_eq!(
            report,
            NotifyReport {
                attempted: 3,
                sent: 2,
                failed: 1,
            }
        );
    }
}
