/// Maximum length of an account's full name, after trimming.
pub const MAX_FULL_NAME: usize = 50;

/// Maximum length of an account's nickname, after trimming.
pub const MAX_NICKNAME: usize = 30;

/// Maximum length of an account's email address, after trimming.
pub const MAX_EMAIL: usize = 100;

/// Maximum length of a company name.
pub const MAX_COMPANY_NAME: usize = 100;

/// Maximum length of a company slug.
pub const MAX_SLUG: usize = 50;

/// Maximum length of a company location.
pub const MAX_LOCATION: usize = 100;

/// Maximum length of a company bio (may be empty).
pub const MAX_BIO: usize = 500;

/// Maximum length of a KVK registration number (may be empty).
pub const MAX_KVK_NUMBER: usize = 20;

/// Maximum length of a chat message (connection and project chat).
pub const MAX_MESSAGE: usize = 500;

/// Maximum length of the message attached to a connection request.
pub const MAX_INITIAL_MESSAGE: usize = 500;

/// Maximum length of a project name.
pub const MAX_PROJECT_NAME: usize = 80;

/// Maximum length of a project description (may be empty).
pub const MAX_PROJECT_DESCRIPTION: usize = 500;

/// Maximum length of a notification title.
pub const MAX_NOTIFICATION_TITLE: usize = 100;

/// Maximum length of a notification body.
pub const MAX_NOTIFICATION_BODY: usize = 300;
