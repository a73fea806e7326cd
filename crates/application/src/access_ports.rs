mod cache;
mod repository;

pub use cache::{AccessDecisionCache, AccessDecisionKey};
pub use repository::{PolicyRepository, VersionedPolicy};
