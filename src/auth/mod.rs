pub mod password;
pub mod session;
pub mod token;

/// Name of the session cookie carrying the signed token.
pub const SESSION_COOKIE: &str = "token";
