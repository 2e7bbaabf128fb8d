use std::sync::Arc;

use arrow::datatypes::SchemaRef;
use async_trait::async_trait;

use floe_client::Settings;
use floe_common::{Error, Result};

use crate::batch::BatchPlan;
use crate::table::TableHandle;

/// Capability interface for a logical table scan: what to read, not how.
///
/// Only static (batch) reads are implemented. The streaming entry points are
/// part of the surface so callers can probe for the capability, but they
/// always fail with [`Error::Unsupported`].
#[async_trait]
pub trait Scan: Send + Sync {
    /// Schema of the rows this scan produces.
    fn schema(&self) -> SchemaRef;

    /// Human-readable description of the scan target.
    fn description(&self) -> String;

    /// Build a one-shot batch read plan over the table's partitions.
    async fn to_batch(&self) -> Result<BatchPlan>;

    fn to_micro_batch_stream(&self, _checkpoint_location: &str) -> Result<StreamPlan> {
        Err(Error::Unsupported("micro-batch streaming".to_string()))
    }

    fn to_continuous_stream(&self, _checkpoint_location: &str) -> Result<StreamPlan> {
        Err(Error::Unsupported("continuous streaming".to_string()))
    }
}

/// Read plan for a streaming scan. No streaming backend exists, so the type
/// is uninhabited and the entry points above can only ever return an error.
pub enum StreamPlan {}

/// A scan over a table served by a remote Flight backend.
pub struct RemoteScan {
    table: Arc<TableHandle>,
    host: String,
    port: u16,
    settings: Settings,
}

impl RemoteScan {
    pub fn new(table: Arc<TableHandle>, host: &str, port: u16, settings: Settings) -> Self {
        Self {
            table,
            host: host.to_string(),
            port,
            settings,
        }
    }
}

#[async_trait]
impl Scan for RemoteScan {
    fn schema(&self) -> SchemaRef {
        self.table.schema()
    }

    fn description(&self) -> String {
        self.table.name().to_string()
    }

    async fn to_batch(&self) -> Result<BatchPlan> {
        BatchPlan::plan(
            self.table.clone(),
            &self.host,
            self.port,
            self.settings.clone(),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::datatypes::{DataType, Field, Schema};

    fn test_scan() -> RemoteScan {
        let schema = Arc::new(Schema::new(vec![Field::new("id", DataType::Int32, false)]));
        let table = Arc::new(TableHandle::new("t1", schema));
        RemoteScan::new(table, "localhost", 50051, Settings::default())
    }

    #[test]
    fn reports_the_wrapped_table_identity() {
        let scan = test_scan();

        assert_eq!(scan.description(), "t1");
        let expected = Arc::new(Schema::new(vec![Field::new("id", DataType::Int32, false)]));
        assert_eq!(scan.schema(), expected);
    }

    #[test]
    fn micro_batch_streaming_is_unsupported() {
        let scan = test_scan();
        let result = scan.to_micro_batch_stream("/tmp/ckpt");
        assert!(matches!(result, Err(Error::Unsupported(_))));
    }

    #[test]
    fn continuous_streaming_is_unsupported() {
        let scan = test_scan();
        let result = scan.to_continuous_stream("/tmp/ckpt");
        assert!(matches!(result, Err(Error::Unsupported(_))));
    }
}
