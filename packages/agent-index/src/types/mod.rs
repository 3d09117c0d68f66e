pub mod agent;
pub mod snapshot;

pub use agent::{profile_url, twitter_url, AgentRecord};
pub use snapshot::Snapshot;
