pub mod blueprint;
pub mod entitlement;
pub mod error;
pub mod extract;
pub mod profile;
pub mod prompt;
