use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the two isolated storage namespaces.
///
/// `Public` holds user-facing indexes; `Private` holds internal ones. The two
/// never share an index name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreScope {
    Public,
    Private,
}

impl StoreScope {
    pub const ALL: [StoreScope; 2] = [StoreScope::Public, StoreScope::Private];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            StoreScope::Public => "public",
            StoreScope::Private => "private",
        }
    }
}

impl fmt::Display for StoreScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn serializes_lowercase() {
        assert_eq!(serde_json::to_string(&StoreScope::Public).unwrap(), "\"public\"");
        let scope: StoreScope = serde_json::from_str("\"private\"").unwrap();
        assert_eq!(scope, StoreScope::Private);
    }

    #[test]
    fn display_matches_wire_name() {
        for scope in StoreScope::ALL {
            assert_eq!(scope.to_string(), scope.as_str());
        }
    }
}
