//! Class manifest: the input handed over by a source-scanning front end.
//!
//! ```json
//! {
//!   "classes": [
//!     { "name": "org.example.Base", "abstract": true,
//!       "common": { "vendor": "anc", "license": "apache2" } },
//!     { "name": "org.example.Tagger", "extends": "org.example.Base",
//!       "service": { "requires": ["token"], "produces": ["pos"] } }
//!   ]
//! }
//! ```
//!
//! Metadata records are inherited: a class without its own record of a kind
//! gets the nearest superclass's record of that kind.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{MetadataError, Result};
use crate::record::{DataSourceRecord, ServiceRecord};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    #[default]
    Class,
    Interface,
    Enum,
    Annotation,
    Record,
}

/// A class as declared in the manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClassDecl {
    /// Fully-qualified name.
    pub name: String,
    #[serde(default)]
    pub kind: ElementKind,
    #[serde(default, rename = "abstract")]
    pub is_abstract: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extends: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub common: Option<ServiceRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service: Option<ServiceRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_source: Option<DataSourceRecord>,
}

/// A class with its effective (own or inherited) metadata records.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    pub kind: ElementKind,
    pub is_abstract: bool,
    pub common: Option<ServiceRecord>,
    pub service: Option<ServiceRecord>,
    pub data_source: Option<DataSourceRecord>,
}

impl Element {
    pub fn class(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_service(mut self, record: ServiceRecord) -> Self {
        self.service = Some(record);
        self
    }

    pub fn with_common(mut self, record: ServiceRecord) -> Self {
        self.common = Some(record);
        self
    }

    pub fn with_data_source(mut self, record: DataSourceRecord) -> Self {
        self.data_source = Some(record);
        self
    }

    /// Descriptors are only generated for concrete classes.
    pub fn is_concrete_class(&self) -> bool {
        self.kind == ElementKind::Class && !self.is_abstract
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub classes: Vec<ClassDecl>,
}

impl Manifest {
    pub fn parse(text: &str) -> Result<Self> {
        let manifest: Manifest = serde_json::from_str(text)?;
        manifest.validate()?;
        Ok(manifest)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| MetadataError::io(path, e))?;
        Self::parse(&text)
    }

    fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for decl in &self.classes {
            if decl.name.trim().is_empty() {
                return Err(MetadataError::Manifest("class with an empty name".to_string()));
            }
            if !seen.insert(decl.name.as_str()) {
                return Err(MetadataError::Manifest(format!(
                    "class `{}` is declared more than once",
                    decl.name
                )));
            }
        }
        Ok(())
    }

    /// Expand declarations into elements, in declaration order.
    pub fn elements(&self) -> Vec<Element> {
        let index: HashMap<&str, &ClassDecl> =
            self.classes.iter().map(|d| (d.name.as_str(), d)).collect();

        self.classes
            .iter()
            .map(|decl| Element {
                name: decl.name.clone(),
                kind: decl.kind,
                is_abstract: decl.is_abstract,
                common: inherited(&index, decl, |d| d.common.as_ref()),
                service: inherited(&index, decl, |d| d.service.as_ref()),
                data_source: inherited(&index, decl, |d| d.data_source.as_ref()),
            })
            .collect()
    }
}

/// Walk the superclass chain until `pick` finds a record. Superclasses
/// outside the manifest and cycles end the walk.
fn inherited<T: Clone>(
    index: &HashMap<&str, &ClassDecl>,
    decl: &ClassDecl,
    pick: impl Fn(&ClassDecl) -> Option<&T>,
) -> Option<T> {
    let mut visited = HashSet::new();
    let mut current = decl;
    loop {
        if let Some(record) = pick(current) {
            return Some(record.clone());
        }
        let parent = current.extends.as_deref()?;
        if !visited.insert(parent) {
            tracing::warn!(class = %decl.name, parent, "superclass cycle in manifest");
            return None;
        }
        current = *index.get(parent)?;
    }
}
