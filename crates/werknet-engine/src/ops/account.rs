//! Account self-service operations.

use werknet_shared::constants::{MAX_EMAIL, MAX_FULL_NAME, MAX_NICKNAME};
use werknet_shared::Identity;
use werknet_store::{accounts, Account};

use crate::error::{or_not_found, EngineError, Result};
use crate::validate::{require_email, require_max_len, require_non_empty};
use crate::Engine;

impl Engine {
    /// Register an account for the calling identity.
    pub fn create_account(
        &mut self,
        caller: Identity,
        full_name: &str,
        nickname: &str,
        email: &str,
    ) -> Result<()> {
        let full_name = full_name.trim().to_string();
        let nickname = nickname.trim().to_string();
        let email = email.trim().to_string();

        self.with_tx("create_account", |tx, now| {
            require_non_empty(&full_name, "Full name")?;
            require_non_empty(&nickname, "Nickname")?;
            require_non_empty(&email, "Email")?;
            require_max_len(&full_name, "Full name", MAX_FULL_NAME)?;
            require_max_len(&nickname, "Nickname", MAX_NICKNAME)?;
            require_max_len(&email, "Email", MAX_EMAIL)?;
            require_email(&email)?;

            if accounts::account_exists(tx, &caller)? {
                return Err(EngineError::AccountAlreadyExists);
            }

            accounts::insert_account(
                tx,
                &Account {
                    identity: caller,
                    full_name: full_name.clone(),
                    nickname: nickname.clone(),
                    email: email.clone(),
                    active_company_id: None,
                    created_at: now,
                },
            )?;

            Ok(())
        })
    }

    /// Update the caller's nickname and email. Nothing else is touched.
    pub fn update_profile(&mut self, caller: Identity, nickname: &str, email: &str) -> Result<()> {
        let nickname = nickname.trim().to_string();
        let email = email.trim().to_string();

        self.with_tx("update_profile", |tx, _now| {
            require_non_empty(&nickname, "Nickname")?;
            require_non_empty(&email, "Email")?;
            require_max_len(&nickname, "Nickname", MAX_NICKNAME)?;
            require_max_len(&email, "Email", MAX_EMAIL)?;
            require_email(&email)?;

            accounts::update_profile(tx, &caller, &nickname, &email)
                .map_err(|e| or_not_found(e, EngineError::AccountNotFound))?;

            Ok(())
        })
    }
}
