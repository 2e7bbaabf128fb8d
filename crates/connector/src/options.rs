use std::collections::HashMap;

use floe_common::{Error, Result};

pub const TABLE: &str = "table";
pub const HOST: &str = "host";
pub const PORT: &str = "port";

/// A single recognized scan option.
struct OptionDef {
    key: &'static str,
    _description: &'static str,
    default_value: Option<&'static str>,
}

impl OptionDef {
    fn new(key: &'static str, description: &'static str, default_value: Option<&'static str>) -> Self {
        Self {
            key,
            _description: description,
            default_value,
        }
    }
}

/// Caller-supplied option map joined with the declared option table.
struct Options<'a> {
    defs: Vec<OptionDef>,
    settings: &'a HashMap<String, String>,
}

impl<'a> Options<'a> {
    fn new(settings: &'a HashMap<String, String>) -> Self {
        let defs = vec![
            OptionDef::new(TABLE, "Name of the remote table to scan", None),
            OptionDef::new(HOST, "Remote backend address", Some("localhost")),
            OptionDef::new(PORT, "Remote backend port", Some("50051")),
        ];
        Self { defs, settings }
    }

    fn get_setting(&self, name: &str) -> Option<String> {
        match self.settings.get(name) {
            Some(value) => Some(value.clone()),
            None => self
                .defs
                .iter()
                .find(|def| def.key == name)
                .and_then(|def| def.default_value.map(|v| v.to_string())),
        }
    }
}

/// Options consumed at scan-open time, parsed from the caller-supplied map.
#[derive(Debug, Clone)]
pub struct ScanOptions {
    pub table: String,
    pub host: String,
    pub port: u16,
}

impl ScanOptions {
    pub fn from_map(settings: &HashMap<String, String>) -> Result<Self> {
        let options = Options::new(settings);

        let table = options
            .get_setting(TABLE)
            .ok_or_else(|| Error::MissingOption(TABLE.to_string()))?;
        if table.is_empty() {
            return Err(Error::InvalidOption {
                key: TABLE.to_string(),
                message: "table name must be non-empty".to_string(),
            });
        }

        let host = options
            .get_setting(HOST)
            .ok_or_else(|| Error::MissingOption(HOST.to_string()))?;
        let port_raw = options
            .get_setting(PORT)
            .ok_or_else(|| Error::MissingOption(PORT.to_string()))?;
        let port = port_raw.parse::<u16>().map_err(|e| Error::InvalidOption {
            key: PORT.to_string(),
            message: format!("'{port_raw}' is not a valid port: {e}"),
        })?;

        Ok(Self { table, host, port })
    }
}
