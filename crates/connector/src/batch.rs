use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use arrow::record_batch::RecordBatch;
use futures::Stream;
use prost::bytes::Bytes;
use tracing::debug;
use uuid::Uuid;

use floe_client::{FlightClient, RecordBatchStream, Settings};
use floe_common::{Error, Result};

use crate::table::TableHandle;

/// An independently readable shard of a remote table.
#[derive(Debug, Clone, PartialEq)]
pub struct Partition {
    pub index: usize,
    /// Candidate endpoints serving this shard. Empty means the shard is
    /// served by the endpoint the plan was built against.
    pub locations: Vec<String>,
    /// Opaque token minted by the backend identifying the shard's data.
    pub ticket: Bytes,
}

/// One-shot read plan over a remote table, split into partitions.
///
/// The partition set is fixed once computed. Partitions carry no ordering
/// guarantee and share no mutable state; each one is read over its own
/// connection, so an external framework may drive the readers in parallel.
#[derive(Debug)]
pub struct BatchPlan {
    plan_id: Uuid,
    table: Arc<TableHandle>,
    origin: String,
    partitions: Vec<Partition>,
    settings: Settings,
}

impl BatchPlan {
    /// Enumerate the table's partitions by asking the backend at
    /// `host:port`. Fails with [`Error::Connectivity`] when the backend is
    /// unreachable and [`Error::SchemaMismatch`] when the backend reports a
    /// schema different from the handle's; no partial partition list is ever
    /// returned.
    pub(crate) async fn plan(
        table: Arc<TableHandle>,
        host: &str,
        port: u16,
        settings: Settings,
    ) -> Result<Self> {
        let origin = format!("http://{host}:{port}");
        let mut client = FlightClient::connect_uri(&origin, &settings).await?;
        let (remote_schema, endpoints) = client.plan_partitions(table.name()).await?;

        let expected = table.schema();
        if remote_schema.fields() != expected.fields() {
            return Err(Error::schema_mismatch(
                table.name(),
                expected.fields(),
                remote_schema.fields(),
            ));
        }

        let partitions = endpoints
            .into_iter()
            .enumerate()
            .map(|(index, endpoint)| {
                let ticket = endpoint.ticket.ok_or_else(|| {
                    Error::Internal(format!(
                        "remote backend returned partition {index} without a ticket"
                    ))
                })?;
                Ok(Partition {
                    index,
                    locations: endpoint.location.into_iter().map(|loc| loc.uri).collect(),
                    ticket: ticket.ticket,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let plan_id = Uuid::new_v4();
        debug!(
            plan_id = %plan_id,
            table = table.name(),
            partitions = partitions.len(),
            "planned batch read"
        );

        Ok(Self {
            plan_id,
            table,
            origin,
            partitions,
            settings,
        })
    }

    pub fn plan_id(&self) -> Uuid {
        self.plan_id
    }

    pub fn table(&self) -> &TableHandle {
        &self.table
    }

    pub fn partitions(&self) -> &[Partition] {
        &self.partitions
    }

    /// Open an independent reader for one partition.
    ///
    /// The reader dials its own connection and releases it when the stream
    /// ends or is dropped; dropping the reader cancels an in-flight fetch.
    pub async fn open_partition(&self, partition: &Partition) -> Result<PartitionReader> {
        let uri = partition
            .locations
            .first()
            .cloned()
            .unwrap_or_else(|| self.origin.clone());
        let client = FlightClient::connect_uri(&uri, &self.settings).await?;
        let stream = client
            .fetch(
                partition.ticket.clone(),
                self.table.name(),
                self.table.schema(),
            )
            .await?;
        Ok(PartitionReader {
            partition_index: partition.index,
            stream,
        })
    }
}

/// Streaming reader over a single partition.
pub struct PartitionReader {
    partition_index: usize,
    stream: RecordBatchStream,
}

impl PartitionReader {
    pub fn partition_index(&self) -> usize {
        self.partition_index
    }
}

impl Stream for PartitionReader {
    type Item = Result<RecordBatch>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.get_mut().stream.as_mut().poll_next(cx)
    }
}
