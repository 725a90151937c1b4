//! Kernel module - server infrastructure and dependencies.

pub mod deps;
pub mod notify;
pub mod stream_hub;
pub mod test_dependencies;

pub use deps::ServerDeps;
pub use notify::{party_topic, NotificationEvent, Notifier, StreamHubNotifier};
pub use stream_hub::StreamHub;
pub use test_dependencies::{test_deps, RecordingNotifier};
