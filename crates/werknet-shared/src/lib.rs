pub mod constants;
pub mod invite;
pub mod types;

mod error;

pub use error::SharedError;
pub use types::*;
