pub mod artifact_discovery;
pub mod build_runner;
pub mod catalog;
pub mod channel;
pub mod cli;
pub mod coordinate;
pub mod dependencies;
pub mod error;
pub mod lockfile;
pub mod logging;
pub mod metadata;
pub mod pipeline;
pub mod pom;
pub mod project;
pub mod publish;
pub mod resolution;
pub mod version;

pub use channel::{Channel, ChannelPolicy, ChannelRule};
pub use coordinate::Coordinate;
pub use project::ProjectManifest;
pub use version::VersionId;
