//! Operation error taxonomy.
//!
//! Every error aborts the surrounding transaction with no partial writes.
//! Display strings are stable: transports and test suites match on them.

use thiserror::Error;
use werknet_store::StoreError;

/// Coarse classification of an [`EngineError`], mirrored in transport replies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    NotFound,
    Conflict,
    Permission,
    State,
    Timeout,
    Internal,
}

#[derive(Debug, Error)]
pub enum EngineError {
    // Validation
    #[error("{field} cannot be empty")]
    Empty { field: &'static str },

    #[error("{field} is too long (max {max} characters)")]
    TooLong { field: &'static str, max: usize },

    #[error("Invalid email format")]
    InvalidEmail,

    #[error("max_uses must be at least 1")]
    MaxUsesTooSmall,

    // Not found
    #[error("Account not found")]
    AccountNotFound,

    #[error("Company not found")]
    CompanyNotFound,

    #[error("Connection not found")]
    ConnectionNotFound,

    #[error("Project not found")]
    ProjectNotFound,

    #[error("Notification not found")]
    NotificationNotFound,

    #[error("Invalid invite code")]
    InviteCodeInvalid,

    // Conflict
    #[error("Account already exists")]
    AccountAlreadyExists,

    #[error("Slug is already taken")]
    SlugTaken,

    #[error("A connection already exists between these companies")]
    ConnectionAlreadyExists,

    #[error("This company has already been invited")]
    AlreadyInvited,

    #[error("Already a member of this company")]
    AlreadyMember,

    // Permission
    #[error("Not permitted")]
    NotPermitted,

    #[error("Cannot change your own role")]
    CannotChangeOwnRole,

    #[error("Use transfer_ownership to assign the Owner role")]
    UseTransferOwnership,

    #[error("Only the owner can assign the Admin role")]
    OnlyOwnerCanAssignAdmin,

    #[error("You are already the owner")]
    AlreadyOwner,

    #[error("Cannot remove yourself")]
    CannotRemoveSelf,

    #[error("You can only manage members with a lower role than yours")]
    InsufficientRank,

    #[error("Target is not a member of your company")]
    TargetNotInCompany,

    #[error("Cannot connect to your own company")]
    CannotConnectToSelf,

    #[error("Cannot block your own company")]
    CannotBlockSelf,

    #[error("Cannot invite your own company")]
    CannotInviteOwnCompany,

    #[error("Cannot kick your own company")]
    CannotKickSelf,

    #[error("Owner company cannot leave")]
    OwnerCannotLeave,

    #[error("Only the requesting company can cancel a request")]
    OnlyRequesterCanCancel,

    #[error("You cannot accept your own connection request")]
    CannotAcceptOwnRequest,

    #[error("You cannot decline your own connection request")]
    CannotDeclineOwnRequest,

    #[error("Only the company that blocked it can unblock")]
    OnlyBlockerCanUnblock,

    #[error("Only the owner company can invite")]
    OnlyOwnerCompanyCanInvite,

    #[error("Only the owner company can kick")]
    OnlyOwnerCompanyCanKick,

    #[error("Only the owner company can delete the project")]
    OnlyOwnerCompanyCanDelete,

    #[error("Not your notification")]
    NotYourNotification,

    // State
    #[error("Connection is not pending")]
    NotPending,

    #[error("Connection is not active")]
    ConnectionNotActive,

    #[error("Connection is not blocked")]
    NotBlocked,

    #[error("Cannot chat on a blocked connection")]
    BlockedConnection,

    #[error("No pending invite for this project")]
    NoPendingInvite,

    #[error("An accepted connection is required to invite this company")]
    NoAcceptedConnection,

    #[error("Your company is not a member of this project")]
    NotProjectMember,

    // Infrastructure
    #[error("Operation timed out")]
    Timeout,

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl EngineError {
    pub fn kind(&self) -> ErrorKind {
        use EngineError::*;
        match self {
            Empty { .. } | TooLong { .. } | InvalidEmail | MaxUsesTooSmall => ErrorKind::Validation,
            AccountNotFound | CompanyNotFound | ConnectionNotFound | ProjectNotFound
            | NotificationNotFound | InviteCodeInvalid => ErrorKind::NotFound,
            AccountAlreadyExists | SlugTaken | ConnectionAlreadyExists | AlreadyInvited
            | AlreadyMember => ErrorKind::Conflict,
            NotPermitted
            | CannotChangeOwnRole
            | UseTransferOwnership
            | OnlyOwnerCanAssignAdmin
            | AlreadyOwner
            | CannotRemoveSelf
            | InsufficientRank
            | TargetNotInCompany
            | CannotConnectToSelf
            | CannotBlockSelf
            | CannotInviteOwnCompany
            | CannotKickSelf
            | OwnerCannotLeave
            | OnlyRequesterCanCancel
            | CannotAcceptOwnRequest
            | CannotDeclineOwnRequest
            | OnlyBlockerCanUnblock
            | OnlyOwnerCompanyCanInvite
            | OnlyOwnerCompanyCanKick
            | OnlyOwnerCompanyCanDelete
            | NotYourNotification => ErrorKind::Permission,
            NotPending | ConnectionNotActive | NotBlocked | BlockedConnection | NoPendingInvite
            | NoAcceptedConnection | NotProjectMember => ErrorKind::State,
            Timeout => ErrorKind::Timeout,
            Store(_) => ErrorKind::Internal,
        }
    }
}

/// Map a store-level `NotFound` to a domain error, passing other store
/// failures through.
pub(crate) fn or_not_found(e: StoreError, not_found: EngineError) -> EngineError {
    match e {
        StoreError::NotFound => not_found,
        other => EngineError::Store(other),
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
