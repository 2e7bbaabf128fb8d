use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use floe_client::{FlightClient, Settings};
use floe_common::Result;

use crate::options::ScanOptions;
use crate::scan::{RemoteScan, Scan};
use crate::table::TableHandle;

/// A data source capable of resolving tables and producing scans over them.
#[async_trait]
pub trait Connector: Send + Sync {
    /// Resolve the named table's metadata from the backend.
    async fn open_table(&self, options: &ScanOptions) -> Result<TableHandle>;

    /// Create a scan over a previously resolved table.
    fn scan(&self, table: Arc<TableHandle>, options: &ScanOptions) -> Arc<dyn Scan>;
}

/// Connector backed by an Arrow Flight query engine.
pub struct FlightConnector {
    settings: Settings,
}

impl FlightConnector {
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }
}

#[async_trait]
impl Connector for FlightConnector {
    async fn open_table(&self, options: &ScanOptions) -> Result<TableHandle> {
        let mut client = FlightClient::connect(&options.host, options.port, &self.settings).await?;
        let schema = client.table_schema(&options.table).await?;
        Ok(TableHandle::new(options.table.clone(), schema))
    }

    fn scan(&self, table: Arc<TableHandle>, options: &ScanOptions) -> Arc<dyn Scan> {
        Arc::new(RemoteScan::new(
            table,
            &options.host,
            options.port,
            self.settings.clone(),
        ))
    }
}

/// Explicit format-name to connector mapping, built by the embedding
/// application at startup and passed to whatever needs to resolve scans.
#[derive(Default)]
pub struct ConnectorRegistry {
    connectors: HashMap<String, Arc<dyn Connector>>,
}

impl ConnectorRegistry {
    pub fn new() -> Self {
        Self {
            connectors: HashMap::new(),
        }
    }

    pub fn register(&mut self, format: String, connector: Arc<dyn Connector>) {
        self.connectors.insert(format, connector);
    }

    pub fn get(&self, format: &str) -> Option<Arc<dyn Connector>> {
        self.connectors.get(format).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn returns_registered_connectors() {
        let mut registry = ConnectorRegistry::new();
        registry.register(
            "flight".to_string(),
            Arc::new(FlightConnector::new(Settings::default())),
        );

        assert!(registry.get("flight").is_some());
        assert!(registry.get("csv").is_none());
    }
}
