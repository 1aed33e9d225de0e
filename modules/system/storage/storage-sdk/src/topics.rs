//! Request bus topics answered by the storage engine once it is initialized.

/// `String` (index name) → `bool`.
pub const INDEX_IS_VALID: &str = "store:index:isValid";

/// `String` (collection name) → `bool`.
pub const COLLECTION_IS_VALID: &str = "store:collection:isValid";
