//! Notification emission.
//!
//! Emission happens inside the same transaction as the triggering write, so
//! subscribers never observe an effect without its notification. Fan-out
//! targets ("all managers of company X") are expanded from the membership
//! table at emission time.

use rusqlite::Connection;
use werknet_shared::constants::{MAX_NOTIFICATION_BODY, MAX_NOTIFICATION_TITLE};
use werknet_shared::{Identity, NotificationKind};
use werknet_store::notifications::{insert_notification, NewNotification};
use werknet_store::memberships;

use crate::error::Result;

/// Insert one notification for a single recipient.
pub fn notify_identity(
    conn: &Connection,
    now: i64,
    recipient: Identity,
    company_id: i64,
    kind: NotificationKind,
    title: &str,
    body: &str,
) -> Result<()> {
    insert_notification(
        conn,
        &NewNotification {
            recipient_identity: recipient,
            company_id,
            kind,
            title: &clip(title, MAX_NOTIFICATION_TITLE),
            body: &clip(body, MAX_NOTIFICATION_BODY),
        },
        now,
    )?;
    Ok(())
}

/// Insert one notification per manager (Owner or Admin) of `company_id`.
pub fn notify_company_managers(
    conn: &Connection,
    now: i64,
    company_id: i64,
    kind: NotificationKind,
    title: &str,
    body: &str,
) -> Result<()> {
    for manager in memberships::managers_of_company(conn, company_id)? {
        notify_identity(conn, now, manager, company_id, kind, title, body)?;
    }
    Ok(())
}

/// Truncate to `max` characters, ellipsis included. Bodies quote chat text,
/// which may exceed the notification column bound.
fn clip(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut clipped: String = text.chars().take(max.saturating_sub(1)).collect();
    clipped.push('…');
    clipped
}
