//! Notification inbox operations. All of them are scoped to the caller:
//! nobody reads or clears someone else's rows.

use werknet_shared::Identity;
use werknet_store::notifications;

use crate::error::{or_not_found, EngineError, Result};
use crate::Engine;

impl Engine {
    /// Mark a single notification read. Idempotent.
    pub fn mark_notification_read(&mut self, caller: Identity, notification_id: i64) -> Result<()> {
        self.with_tx("mark_notification_read", |tx, _now| {
            let notification = notifications::get_notification(tx, notification_id)
                .map_err(|e| or_not_found(e, EngineError::NotificationNotFound))?;
            if notification.recipient_identity != caller {
                return Err(EngineError::NotYourNotification);
            }

            notifications::mark_read(tx, notification_id)?;
            Ok(())
        })
    }

    /// Mark all of the caller's notifications for one company read.
    pub fn mark_all_notifications_read(&mut self, caller: Identity, company_id: i64) -> Result<()> {
        self.with_tx("mark_all_notifications_read", |tx, _now| {
            notifications::mark_all_read(tx, &caller, company_id)?;
            Ok(())
        })
    }

    /// Delete the caller's read notifications for one company.
    pub fn clear_notifications(&mut self, caller: Identity, company_id: i64) -> Result<()> {
        self.with_tx("clear_notifications", |tx, _now| {
            notifications::clear_read(tx, &caller, company_id)?;
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use werknet_shared::NotificationKind;

    fn setup() -> (Engine, Identity, Identity, i64) {
        let mut engine = Engine::in_memory().unwrap();
        let alice = Identity([1; 32]);
        let bob = Identity([2; 32]);
        engine
            .create_account(alice, "Alice", "alice", "alice@a.test")
            .unwrap();
        engine.create_account(bob, "Bob", "bob", "bob@b.test").unwrap();
        let company = engine
            .create_company(alice, "Alpha Signs", "alpha-signs", "Amsterdam, NL")
            .unwrap();
        // Bob's join produces a MemberJoined notification for Alice
        let code = engine.generate_invite_code(alice, 1).unwrap();
        engine.join_company(bob, &code).unwrap();
        (engine, alice, bob, company)
    }

    #[test]
    fn only_the_recipient_marks() {
        let (mut engine, alice, bob, company) = setup();
        let inbox =
            notifications::list_for_recipient(engine.database().conn(), &alice, company).unwrap();
        let id = inbox[0].id;

        assert!(matches!(
            engine.mark_notification_read(bob, id),
            Err(EngineError::NotYourNotification)
        ));

        engine.mark_notification_read(alice, id).unwrap();
        // Marking twice is fine
        engine.mark_notification_read(alice, id).unwrap();

        let inbox =
            notifications::list_for_recipient(engine.database().conn(), &alice, company).unwrap();
        assert!(inbox[0].is_read);
    }

    #[test]
    fn missing_notification() {
        let (mut engine, alice, _bob, _company) = setup();
        assert!(matches!(
            engine.mark_notification_read(alice, 999),
            Err(EngineError::NotificationNotFound)
        ));
    }

    #[test]
    fn mark_all_then_clear() {
        let (mut engine, alice, _bob, company) = setup();
        assert_eq!(
            notifications::list_for_recipient(engine.database().conn(), &alice, company)
                .unwrap()
                .len(),
            1
        );
        assert_eq!(
            notifications::list_for_recipient(engine.database().conn(), &alice, company)
                .unwrap()[0]
                .kind,
            NotificationKind::MemberJoined
        );

        // Clearing before anything is read removes nothing
        engine.clear_notifications(alice, company).unwrap();
        assert_eq!(
            notifications::list_for_recipient(engine.database().conn(), &alice, company)
                .unwrap()
                .len(),
            1
        );

        engine.mark_all_notifications_read(alice, company).unwrap();
        engine.clear_notifications(alice, company).unwrap();
        assert!(
            notifications::list_for_recipient(engine.database().conn(), &alice, company)
                .unwrap()
                .is_empty()
        );
    }
}
