//! Inter-company connection state machine and connection chat.
//!
//! All operations address the counterpart company; the store keeps a single
//! canonical row per pair. Blocking is opaque: a blocked requester receives
//! the same success as a fresh request and no row or notification betrays
//! the block.

use rusqlite::Connection as SqlConnection;
use werknet_shared::constants::{MAX_INITIAL_MESSAGE, MAX_MESSAGE};
use werknet_shared::{ConnectionStatus, Identity, NotificationKind};
use werknet_store::connections::{self, NewConnection};
use werknet_store::{companies, connection_chat, memberships, Connection};

use crate::auth::AuthContext;
use crate::cascade;
use crate::error::{EngineError, Result};
use crate::notify::notify_company_managers;
use crate::validate::{require_max_len, require_non_empty};
use crate::Engine;

/// Which side of the pair issued the pending request. Derived from the
/// requester's membership at decision time.
fn requester_company(conn: &SqlConnection, connection: &Connection) -> Result<i64> {
    if memberships::find_membership(conn, &connection.requested_by, connection.company_a)?.is_some()
    {
        Ok(connection.company_a)
    } else if memberships::find_membership(conn, &connection.requested_by, connection.company_b)?
        .is_some()
    {
        Ok(connection.company_b)
    } else {
        // Requester left both companies; nobody can claim the request side
        Err(EngineError::NotPermitted)
    }
}

impl Engine {
    /// Ask another company to connect. Succeeds silently when the target has
    /// blocked the caller's company.
    pub fn request_connection(
        &mut self,
        caller: Identity,
        target_company_id: i64,
        message: &str,
    ) -> Result<()> {
        let message = message.trim().to_string();

        self.with_tx("request_connection", |tx, now| {
            require_max_len(&message, "Message", MAX_INITIAL_MESSAGE)?;

            let ctx = AuthContext::resolve(tx, &caller)?;
            let my_company_id = ctx.require_manager()?.company_id;

            if my_company_id == target_company_id {
                return Err(EngineError::CannotConnectToSelf);
            }
            if !companies::company_exists(tx, target_company_id)? {
                return Err(EngineError::CompanyNotFound);
            }

            if let Some(existing) = connections::find_between(tx, my_company_id, target_company_id)? {
                if existing.status == ConnectionStatus::Blocked {
                    // Ghosting: no row, no notification, the reply a fresh
                    // request would get.
                    return Ok(());
                }
                return Err(EngineError::ConnectionAlreadyExists);
            }

            connections::insert_connection(
                tx,
                &NewConnection {
                    company_x: my_company_id,
                    company_y: target_company_id,
                    status: ConnectionStatus::Pending,
                    requested_by: caller,
                    initial_message: &message,
                    blocking_company_id: None,
                },
                now,
            )?;

            let my_company = companies::get_company(tx, my_company_id)?;
            notify_company_managers(
                tx,
                now,
                target_company_id,
                NotificationKind::ConnectionRequested,
                "Connection request",
                &format!("{} wants to connect", my_company.name),
            )?;

            Ok(())
        })
    }

    /// Accept a pending request from the other side.
    pub fn accept_connection(&mut self, caller: Identity, target_company_id: i64) -> Result<()> {
        self.with_tx("accept_connection", |tx, now| {
            let ctx = AuthContext::resolve(tx, &caller)?;
            let my_company_id = ctx.require_manager()?.company_id;

            let connection = connections::find_between(tx, my_company_id, target_company_id)?
                .ok_or(EngineError::ConnectionNotFound)?;
            if connection.status != ConnectionStatus::Pending {
                return Err(EngineError::NotPending);
            }

            let requester_side = requester_company(tx, &connection)?;
            if requester_side == my_company_id {
                return Err(EngineError::CannotAcceptOwnRequest);
            }

            connections::set_status(tx, connection.id, ConnectionStatus::Accepted, None, now)?;

            let my_company = companies::get_company(tx, my_company_id)?;
            notify_company_managers(
                tx,
                now,
                requester_side,
                NotificationKind::ConnectionAccepted,
                "Connection accepted",
                &format!("{} accepted your connection request", my_company.name),
            )?;

            Ok(())
        })
    }

    /// Decline a pending request from the other side. The row and its chat
    /// are deleted.
    pub fn decline_connection(&mut self, caller: Identity, target_company_id: i64) -> Result<()> {
        self.with_tx("decline_connection", |tx, _now| {
            let ctx = AuthContext::resolve(tx, &caller)?;
            let my_company_id = ctx.require_manager()?.company_id;

            let connection = connections::find_between(tx, my_company_id, target_company_id)?
                .ok_or(EngineError::ConnectionNotFound)?;
            if connection.status != ConnectionStatus::Pending {
                return Err(EngineError::NotPending);
            }
            if requester_company(tx, &connection)? == my_company_id {
                return Err(EngineError::CannotDeclineOwnRequest);
            }

            cascade::connection_deleted(tx, &connection)?;
            connections::delete_connection(tx, connection.id)?;
            Ok(())
        })
    }

    /// Withdraw the caller's own pending request.
    pub fn cancel_request(&mut self, caller: Identity, target_company_id: i64) -> Result<()> {
        self.with_tx("cancel_request", |tx, _now| {
            let ctx = AuthContext::resolve(tx, &caller)?;
            let my_company_id = ctx.require_manager()?.company_id;

            let connection = connections::find_between(tx, my_company_id, target_company_id)?
                .ok_or(EngineError::ConnectionNotFound)?;
            if connection.status != ConnectionStatus::Pending {
                return Err(EngineError::NotPending);
            }
            if requester_company(tx, &connection)? != my_company_id {
                return Err(EngineError::OnlyRequesterCanCancel);
            }

            cascade::connection_deleted(tx, &connection)?;
            connections::delete_connection(tx, connection.id)?;
            Ok(())
        })
    }

    /// Sever an accepted connection. Either party may do it; chat and any
    /// invites that depended on the connection go with it.
    pub fn disconnect_company(&mut self, caller: Identity, target_company_id: i64) -> Result<()> {
        self.with_tx("disconnect_company", |tx, _now| {
            let ctx = AuthContext::resolve(tx, &caller)?;
            let my_company_id = ctx.require_manager()?.company_id;

            let connection = connections::find_between(tx, my_company_id, target_company_id)?
                .ok_or(EngineError::ConnectionNotFound)?;
            if connection.status != ConnectionStatus::Accepted {
                return Err(EngineError::ConnectionNotActive);
            }

            cascade::connection_deleted(tx, &connection)?;
            connections::delete_connection(tx, connection.id)?;
            Ok(())
        })
    }

    /// Block another company, from any prior state. Idempotent when the row
    /// is already blocked; the original blocker is never overwritten.
    pub fn block_company(&mut self, caller: Identity, target_company_id: i64) -> Result<()> {
        self.with_tx("block_company", |tx, now| {
            let ctx = AuthContext::resolve(tx, &caller)?;
            let my_company_id = ctx.require_manager()?.company_id;

            if my_company_id == target_company_id {
                return Err(EngineError::CannotBlockSelf);
            }
            if !companies::company_exists(tx, target_company_id)? {
                return Err(EngineError::CompanyNotFound);
            }

            match connections::find_between(tx, my_company_id, target_company_id)? {
                Some(existing) if existing.status == ConnectionStatus::Blocked => {
                    return Ok(());
                }
                Some(existing) => {
                    connection_chat::delete_for_connection(tx, existing.id)?;
                    connections::set_status(
                        tx,
                        existing.id,
                        ConnectionStatus::Blocked,
                        Some(my_company_id),
                        now,
                    )?;
                }
                None => {
                    connections::insert_connection(
                        tx,
                        &NewConnection {
                            company_x: my_company_id,
                            company_y: target_company_id,
                            status: ConnectionStatus::Blocked,
                            requested_by: caller,
                            initial_message: "",
                            blocking_company_id: Some(my_company_id),
                        },
                        now,
                    )?;
                }
            }

            tracing::info!(
                caller = %caller.short(),
                company_id = my_company_id,
                blocked = target_company_id,
                "company blocked"
            );

            Ok(())
        })
    }

    /// Lift a block. Only the company that placed it may do so; the row is
    /// deleted entirely.
    pub fn unblock_company(&mut self, caller: Identity, target_company_id: i64) -> Result<()> {
        self.with_tx("unblock_company", |tx, _now| {
            let ctx = AuthContext::resolve(tx, &caller)?;
            let my_company_id = ctx.require_manager()?.company_id;

            let connection = connections::find_between(tx, my_company_id, target_company_id)?
                .ok_or(EngineError::ConnectionNotFound)?;
            if connection.status != ConnectionStatus::Blocked {
                return Err(EngineError::NotBlocked);
            }
            if connection.blocking_company_id != Some(my_company_id) {
                return Err(EngineError::OnlyBlockerCanUnblock);
            }

            cascade::connection_deleted(tx, &connection)?;
            connections::delete_connection(tx, connection.id)?;

            tracing::info!(
                caller = %caller.short(),
                company_id = my_company_id,
                unblocked = target_company_id,
                "company unblocked"
            );

            Ok(())
        })
    }

    /// Send a message on a pending or accepted connection the caller's
    /// active company is party to.
    pub fn send_connection_chat(
        &mut self,
        caller: Identity,
        connection_id: i64,
        text: &str,
    ) -> Result<i64> {
        let text = text.trim().to_string();

        self.with_tx("send_connection_chat", |tx, now| {
            require_non_empty(&text, "Message")?;
            require_max_len(&text, "Message", MAX_MESSAGE)?;

            let ctx = AuthContext::resolve(tx, &caller)?;
            let my_company_id = ctx.require_member()?.company_id;

            let connection = connections::get_connection(tx, connection_id)
                .map_err(|e| crate::error::or_not_found(e, EngineError::ConnectionNotFound))?;
            if connection.status == ConnectionStatus::Blocked {
                return Err(EngineError::BlockedConnection);
            }
            if !connection.involves(my_company_id) {
                return Err(EngineError::NotPermitted);
            }

            let chat_id = connection_chat::insert_chat(tx, connection_id, &caller, &text, now)?;

            let other = connection.other_party(my_company_id);
            notify_company_managers(
                tx,
                now,
                other,
                NotificationKind::ChatMessage,
                "New message",
                &format!("{}: {}", ctx.account.nickname, text),
            )?;

            Ok(chat_id)
        })
    }
}
