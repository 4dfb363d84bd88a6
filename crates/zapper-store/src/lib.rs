//! # Zapper Store
//!
//! Storage backends behind [`ZapStore`]:
//!
//! - [`MemoryZapStore`] keeps values for the life of the process
//! - [`FileZapStore`] keeps one JSON object on disk, the layout an
//!   extension's local storage area exports to

mod file;
mod memory;

use std::sync::Arc;

use tracing::info;
use zapper_config::{ConfigLoader, StorageBackend, StorageConfig};
use zapper_protocols::{StoreError, ZapStore};

pub use file::FileZapStore;
pub use memory::MemoryZapStore;

/// Open the backend selected by `config`.
pub async fn open_store(config: &StorageConfig) -> Result<Arc<dyn ZapStore>, StoreError> {
    match config.backend {
        StorageBackend::Memory => {
            info!("Using in-memory zap storage");
            Ok(Arc::new(MemoryZapStore::new()))
        }
        StorageBackend::File => {
            let path = ConfigLoader::expand_path(&config.path.to_string_lossy());
            info!("Using file zap storage at {}", path);
            Ok(Arc::new(FileZapStore::open(path).await?))
        }
    }
}
