use std::sync::Arc;

use modkit::Module;
use security::SecurityModule;
use storage::StorageModule;

/// Modules hosted by this binary, in initialization order.
///
/// Storage comes first: security asks the storage topics while it initializes.
pub fn all() -> Vec<Arc<dyn Module>> {
    vec![
        Arc::new(StorageModule::default()),
        Arc::new(SecurityModule::default()),
    ]
}
