#![doc = include_str!("../README.md")]

pub mod options;
pub mod profile;
pub mod provider;

pub use options::{ProfileMapper, WildApricotEndpoints, WildApricotOptions};
pub use profile::{MembershipLevel, MembershipStatus, WildApricotProfile};
pub use provider::{WildApricotProvider, DEFAULT_SCOPE, PROVIDER_ID, PROVIDER_NAME};
