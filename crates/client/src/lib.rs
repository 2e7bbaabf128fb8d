//! Arrow Flight client for the Floe connector.
//!
//! This crate owns every RPC the connector makes against the remote backend:
//! schema lookup, partition enumeration and partition data fetch. Transport
//! details (tonic channels, gRPC statuses) do not leak past this boundary;
//! failures surface as [`floe_common::Error::Connectivity`].

mod config;

pub use config::Settings;

use std::collections::HashMap;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use arrow::array::ArrayRef;
use arrow::datatypes::{Schema, SchemaRef};
use arrow::record_batch::RecordBatch;
use arrow_flight::flight_service_client::FlightServiceClient;
use arrow_flight::utils::flight_data_to_arrow_batch;
use arrow_flight::{FlightData, FlightDescriptor, FlightEndpoint, IpcMessage, Ticket};
use arrow_ipc::{root_as_message, MessageHeader};
use backoff::{future::retry, Error as BackoffError, ExponentialBackoff};
use futures::Stream;
use prost::bytes::Bytes;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tonic::transport::{Channel, Endpoint};
use tracing::debug;

use floe_common::{Error, Result};

/// Stream of record batches read from one partition.
pub type RecordBatchStream = Pin<Box<dyn Stream<Item = Result<RecordBatch>> + Send>>;

/// A connection to one Flight endpoint of the remote backend.
pub struct FlightClient {
    endpoint: String,
    inner: FlightServiceClient<Channel>,
}

impl FlightClient {
    pub async fn connect(host: &str, port: u16, settings: &Settings) -> Result<Self> {
        Self::connect_uri(&format!("http://{host}:{port}"), settings).await
    }

    /// Dial `uri` with the configured per-attempt timeout, retrying transient
    /// failures within the configured window.
    pub async fn connect_uri(uri: &str, settings: &Settings) -> Result<Self> {
        debug!(endpoint = uri, "connecting to remote backend");
        let policy = ExponentialBackoff {
            max_elapsed_time: Some(Duration::from_secs(settings.connect_retry_window_secs)),
            ..ExponentialBackoff::default()
        };
        let channel = retry(policy, || async {
            Endpoint::from_shared(uri.to_string())
                .map_err(BackoffError::permanent)?
                .connect_timeout(Duration::from_secs(settings.connect_timeout_secs))
                .connect()
                .await
                .map_err(BackoffError::transient)
        })
        .await
        .map_err(|e| Error::connectivity(uri, e))?;

        Ok(Self {
            endpoint: uri.to_string(),
            inner: FlightServiceClient::new(channel),
        })
    }

    /// The URI this client is connected to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Fetch the schema the backend declares for `table`.
    pub async fn table_schema(&mut self, table: &str) -> Result<SchemaRef> {
        let descriptor = FlightDescriptor::new_path(vec![table.to_string()]);
        let response = self
            .inner
            .get_schema(descriptor)
            .await
            .map_err(|status| Error::connectivity(&self.endpoint, status))?
            .into_inner();
        let schema = Schema::try_from(IpcMessage(response.schema))?;
        Ok(Arc::new(schema))
    }

    /// Enumerate the partitions the backend would serve for a full read of
    /// `table`, along with the schema it reports for the result.
    pub async fn plan_partitions(&mut self, table: &str) -> Result<(SchemaRef, Vec<FlightEndpoint>)> {
        let descriptor = FlightDescriptor::new_path(vec![table.to_string()]);
        let info = self
            .inner
            .get_flight_info(descriptor)
            .await
            .map_err(|status| Error::connectivity(&self.endpoint, status))?
            .into_inner();
        let schema = Schema::try_from(IpcMessage(info.schema))?;
        debug!(
            endpoint = %self.endpoint,
            table,
            partitions = info.endpoint.len(),
            "enumerated partitions"
        );
        Ok((Arc::new(schema), info.endpoint))
    }

    /// Stream the data behind one partition ticket.
    ///
    /// Consumes the client: each partition read owns its connection and
    /// releases it when the stream ends, fails, or is dropped. Dropping the
    /// returned stream cancels the in-flight fetch.
    pub async fn fetch(mut self, ticket: Bytes, table: &str, expected: SchemaRef) -> Result<RecordBatchStream> {
        let mut stream = self
            .inner
            .do_get(Ticket::new(ticket))
            .await
            .map_err(|status| Error::connectivity(&self.endpoint, status))?
            .into_inner();

        let endpoint = self.endpoint;
        let table = table.to_string();
        let (tx, rx) = mpsc::channel(2);
        tokio::spawn(async move {
            let dictionaries_by_id: HashMap<i64, ArrayRef> = HashMap::new();
            loop {
                let flight_data = match stream.message().await {
                    Ok(Some(data)) => data,
                    Ok(None) => break,
                    Err(status) => {
                        let _ = tx.send(Err(Error::connectivity(&endpoint, status))).await;
                        break;
                    }
                };

                if is_schema_message(&flight_data) {
                    match Schema::try_from(&flight_data) {
                        Ok(remote) if remote.fields() != expected.fields() => {
                            let _ = tx
                                .send(Err(Error::schema_mismatch(
                                    &table,
                                    expected.fields(),
                                    remote.fields(),
                                )))
                                .await;
                            break;
                        }
                        Ok(_) => continue,
                        Err(e) => {
                            let _ = tx.send(Err(Error::Arrow(e))).await;
                            break;
                        }
                    }
                }

                let batch = flight_data_to_arrow_batch(&flight_data, expected.clone(), &dictionaries_by_id)
                    .map_err(Error::Arrow);
                let failed = batch.is_err();
                if tx.send(batch).await.is_err() {
                    // Receiver dropped: the read was cancelled.
                    break;
                }
                if failed {
                    break;
                }
            }
        });

        Ok(Box::pin(ReceiverStream::new(rx)))
    }
}

fn is_schema_message(data: &FlightData) -> bool {
    matches!(
        root_as_message(&data.data_header[..]).map(|message| message.header_type()),
        Ok(MessageHeader::Schema)
    )
}
