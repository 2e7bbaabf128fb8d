//! Connector crate
//!
//! Exposes tables served by a remote query engine as partitioned batch
//! scans. A scan is resolved in three steps: a [`Connector`] turns scan
//! options into a [`TableHandle`], the handle is wrapped by a [`Scan`], and
//! the scan produces a [`BatchPlan`] whose partitions are read independently.
//!
//! # Example
//! ```rust
//! use std::sync::Arc;
//! use floe_client::Settings;
//! use floe_connector::{ConnectorRegistry, FlightConnector};
//!
//! let mut registry = ConnectorRegistry::new();
//! registry.register(
//!     "flight".to_string(),
//!     Arc::new(FlightConnector::new(Settings::default())),
//! );
//! assert!(registry.get("flight").is_some());
//! ```

pub mod batch;
pub mod options;
pub mod registry;
pub mod scan;
pub mod table;

pub use batch::{BatchPlan, Partition, PartitionReader};
pub use options::ScanOptions;
pub use registry::{Connector, ConnectorRegistry, FlightConnector};
pub use scan::{RemoteScan, Scan, StreamPlan};
pub use table::TableHandle;
