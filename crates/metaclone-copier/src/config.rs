//! Copier configuration.

use serde::{Deserialize, Serialize};

/// Options controlling a [`Copier`](crate::Copier) session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CopierConfig {
    /// Sort each copied module's type table back into the original module's
    /// order. When off, the table keeps traversal order.
    pub preserve_type_order: bool,

    /// Ask the [`MetadataHost`](crate::MetadataHost) for the assembly an
    /// assembly reference denotes when the identity cache has no answer.
    pub resolve_through_host: bool,
}

impl Default for CopierConfig {
    fn default() -> Self {
        CopierConfig {
            preserve_type_order: true,
            resolve_through_host: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = CopierConfig::default();
        assert!(config.preserve_type_order);
        assert!(config.resolve_through_host);
    }

    #[test]
    fn config_serde_roundtrip() {
        let config = CopierConfig {
            preserve_type_order: false,
            resolve_through_host: true,
        };
        let json = serde_json::to_string(&config).unwrap();
        let back: CopierConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, back);
    }
}
