//! The fixed catalog of (port, protocol) pairs probed on every host.

use super::target::{Protocol, Target};

/// One catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogEntry {
    pub port: u16,
    pub protocol: Protocol,
}

impl CatalogEntry {
    pub const fn new(port: u16, protocol: Protocol) -> Self {
        Self { port, protocol }
    }

    /// Combine this entry with a normalized host.
    pub fn target(&self, host: &str) -> Target {
        Target::new(host, self.port, self.protocol)
    }
}

/// Ports tried against every host, in probe order.
pub const TARGET_CATALOG: [CatalogEntry; 10] = [
    CatalogEntry::new(80, Protocol::Http),
    CatalogEntry::new(443, Protocol::Https),
    CatalogEntry::new(8080, Protocol::Http),
    CatalogEntry::new(8443, Protocol::Https),
    CatalogEntry::new(8888, Protocol::Http),
    CatalogEntry::new(8000, Protocol::Http),
    CatalogEntry::new(8081, Protocol::Http),
    CatalogEntry::new(8444, Protocol::Https),
    CatalogEntry::new(9000, Protocol::Http),
    CatalogEntry::new(9080, Protocol::Http),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_order() {
        let ports: Vec<u16> = TARGET_CATALOG.iter().map(|e| e.port).collect();
        assert_eq!(
            ports,
            vec![80, 443, 8080, 8443, 8888, 8000, 8081, 8444, 9000, 9080]
        );
        assert_eq!(TARGET_CATALOG[0].protocol, Protocol::Http);
        assert_eq!(TARGET_CATALOG[1].protocol, Protocol::Https);
    }

    #[test]
    fn test_https_ports() {
        let https: Vec<u16> = TARGET_CATALOG
            .iter()
            .filter(|e| e.protocol == Protocol::Https)
            .map(|e| e.port)
            .collect();
        assert_eq!(https, vec![443, 8443, 8444]);
    }

    #[test]
    fn test_entry_target() {
        let target = TARGET_CATALOG[3].target("example.com");
        assert_eq!(target.url(), "https://example.com:8443");
    }
}
