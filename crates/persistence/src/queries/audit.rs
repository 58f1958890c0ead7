// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Audit event queries.

use diesel::SqliteConnection;
use diesel::prelude::*;
use leave_desk_audit::{Action, Actor, AuditEvent, Cause, StateSnapshot};

use crate::data_models::{ActionData, ActorData, CauseData, StateSnapshotData};
use crate::diesel_schema::audit_events;
use crate::error::PersistenceError;

/// Diesel Queryable struct for audit event rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = audit_events)]
struct AuditEventRow {
    application_id: Option<i64>,
    actor_json: String,
    cause_json: String,
    action_json: String,
    before_snapshot_json: String,
    after_snapshot_json: String,
}

impl AuditEventRow {
    fn into_event(self) -> Result<AuditEvent, PersistenceError> {
        let actor_data: ActorData = serde_json::from_str(&self.actor_json)?;
        let cause_data: CauseData = serde_json::from_str(&self.cause_json)?;
        let action_data: ActionData = serde_json::from_str(&self.action_json)?;
        let before_data: StateSnapshotData = serde_json::from_str(&self.before_snapshot_json)?;
        let after_data: StateSnapshotData = serde_json::from_str(&self.after_snapshot_json)?;

        Ok(AuditEvent::new(
            self.application_id,
            Actor::new(actor_data.id, actor_data.role),
            Cause::new(cause_data.id, cause_data.description),
            Action::new(action_data.name, action_data.details),
            StateSnapshot::new(before_data.data),
            StateSnapshot::new(after_data.data),
        ))
    }
}

/// Retrieves the audit trail of one application, oldest first.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `application_id` - The application whose history to load
///
/// # Errors
///
/// Returns an error if events cannot be retrieved or deserialized.
pub fn get_application_history(
    conn: &mut SqliteConnection,
    application_id: i64,
) -> Result<Vec<AuditEvent>, PersistenceError> {
    let rows: Vec<AuditEventRow> = audit_events::table
        .filter(audit_events::application_id.eq(application_id))
        .order(audit_events::event_id.asc())
        .select(AuditEventRow::as_select())
        .load::<AuditEventRow>(conn)?;

    rows.into_iter().map(AuditEventRow::into_event).collect()
}
