// Port Layer - Interfaces for external dependencies

pub mod process_launcher;
pub mod readiness_probe;
pub mod search_gateway;
pub mod search_source;
pub mod time_provider;

// Re-exports
pub use process_launcher::{ChildHandle, ExitOutcome, LaunchError, ProcessLauncher};
pub use readiness_probe::ReadinessProbe;
pub use search_gateway::{GatewayError, SearchGateway};
pub use search_source::{RedditSource, SourceError, TwitterSource, WebSearchSource};
pub use time_provider::TimeProvider;
