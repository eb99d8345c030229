//! Raw metadata records as written on a class.
//!
//! Unset strings are `""` and unset lists are `[]`, never missing. The
//! resolver relies on that to tell "no override" apart from a real value.

use serde::{Deserialize, Serialize};

/// Default for `allow` on every record kind.
pub const DEFAULT_ALLOW: &str = "any";

fn default_allow() -> String {
    DEFAULT_ALLOW.to_string()
}

/// Service metadata. Used for both the class-level (service) record and the
/// base-class (common) record; the two kinds carry the same fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServiceRecord {
    pub schema: String,
    pub name: String,
    pub description: String,
    pub version: String,
    pub vendor: String,
    pub allow: String,
    pub license: String,
    pub license_desc: String,
    pub encoding: String,
    pub requires_encoding: String,
    pub produces_encoding: String,
    pub language: Vec<String>,
    pub requires_language: Vec<String>,
    pub produces_language: Vec<String>,
    pub format: Vec<String>,
    pub requires_format: Vec<String>,
    pub produces_format: Vec<String>,
    pub requires: Vec<String>,
    pub produces: Vec<String>,
    pub requires_tagsets: Vec<String>,
    pub produces_tagsets: Vec<String>,
}

impl Default for ServiceRecord {
    fn default() -> Self {
        Self {
            schema: String::new(),
            name: String::new(),
            description: String::new(),
            version: String::new(),
            vendor: String::new(),
            allow: default_allow(),
            license: String::new(),
            license_desc: String::new(),
            encoding: String::new(),
            requires_encoding: String::new(),
            produces_encoding: String::new(),
            language: Vec::new(),
            requires_language: Vec::new(),
            produces_language: Vec::new(),
            format: Vec::new(),
            requires_format: Vec::new(),
            produces_format: Vec::new(),
            requires: Vec::new(),
            produces: Vec::new(),
            requires_tagsets: Vec::new(),
            produces_tagsets: Vec::new(),
        }
    }
}

/// Data source metadata. Single direction, no requires/produces split.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DataSourceRecord {
    pub schema: String,
    pub name: String,
    pub description: String,
    pub version: String,
    pub vendor: String,
    pub allow: String,
    pub license: String,
    pub license_desc: String,
    pub encoding: String,
    pub language: Vec<String>,
    pub format: Vec<String>,
}

impl Default for DataSourceRecord {
    fn default() -> Self {
        Self {
            schema: String::new(),
            name: String::new(),
            description: String::new(),
            version: String::new(),
            vendor: String::new(),
            allow: default_allow(),
            license: String::new(),
            license_desc: String::new(),
            encoding: String::new(),
            language: Vec::new(),
            format: Vec::new(),
        }
    }
}
