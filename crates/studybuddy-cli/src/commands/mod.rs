pub mod config;
pub mod sessions;
pub mod stats;
pub mod timer;

use std::sync::Arc;

use studybuddy_core::{Database, Repository};

/// Repository over the store in the data directory.
fn open_repository() -> Result<Repository, Box<dyn std::error::Error>> {
    let db = Database::open()?;
    Ok(Repository::new(Arc::new(db)))
}
