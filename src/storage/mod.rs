mod error;
mod params;
mod shard;
mod squared;
mod store;

pub use error::{Result, StorageErr};
pub use params::ParameterStore;
pub use shard::{DEFAULT_SHARDS, ShardedMap};
pub use squared::SquaredGradients;
pub use store::FeatureStore;
