// Social provider registry.
//
// Each provider crate implements `OAuthProvider`; the host application
// registers the ones it enables here and the framework dispatches by id.

pub mod registry;
pub use registry::ProviderRegistry;
