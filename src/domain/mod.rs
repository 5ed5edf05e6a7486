//! Domain logic - pure release rules independent of processes and files

pub mod channel;
pub mod tag;
pub mod version;

pub use channel::{PublishChannel, DEFAULT_CHANNEL};
pub use tag::ReleaseTag;
pub use version::{bump, parse_custom, parse_version, BumpKind};
