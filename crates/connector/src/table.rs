use arrow::datatypes::SchemaRef;

/// Resolved identity and schema of a remote table.
///
/// A pure data holder: the schema is immutable once constructed and the name
/// is expected to be non-empty (the options layer validates user input before
/// a handle is ever built).
#[derive(Debug, Clone)]
pub struct TableHandle {
    name: String,
    schema: SchemaRef,
}

impl TableHandle {
    pub fn new(name: impl Into<String>, schema: SchemaRef) -> Self {
        Self {
            name: name.into(),
            schema,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn schema(&self) -> SchemaRef {
        self.schema.clone()
    }
}
