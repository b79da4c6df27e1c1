//! Load tests for concurrent hash map implementations.
//!
//! The `mapbench` binary drives two load shapes against either a sharded
//! `DashMap` or a `RwLock<HashMap>` baseline: a rate-paced read/write
//! contention test and a bulk allocation test. Durations are reported on
//! stdout as plain text; the `mapbench_sweep` crate generates whole matrices
//! of these runs and post-processes the captured output.

pub mod contention;
pub mod init;
pub mod map;
pub mod report;

pub use contention::{run_contention, ContentionConfig, ContentionFocus};
pub use init::run_init;
pub use map::{dashmap_factory, rwlock_hashmap, SharedMap};
