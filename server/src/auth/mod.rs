mod crypto;
mod extractor;

pub use crypto::{generate_token, hash_password, hash_token, verify_password};
pub use extractor::{AuthUser, SessionToken, SESSION_COOKIE};
