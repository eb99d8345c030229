//! JSON descriptors and the builder that fills them in.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::record::{DataSourceRecord, ServiceRecord};
use crate::resolve::ResolvedMetadata;
use crate::version::{DescriptorKind, VersionResolver};
use crate::vocabulary::Vocabulary;

/// One direction (input or output) of a service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IoSpecification {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub format: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub language: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encoding: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<String>,
    /// Annotation type URI → tagset URI.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub tagsets: BTreeMap<String, String>,
}

impl IoSpecification {
    pub fn is_empty(&self) -> bool {
        self.format.is_empty()
            && self.language.is_empty()
            && self.encoding.is_none()
            && self.annotations.is_empty()
            && self.tagsets.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceDescriptor {
    #[serde(rename = "$schema", skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vendor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
    #[serde(rename = "licenseDesc", skip_serializing_if = "Option::is_none")]
    pub license_desc: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow: Option<String>,
    #[serde(skip_serializing_if = "IoSpecification::is_empty")]
    pub requires: IoSpecification,
    #[serde(skip_serializing_if = "IoSpecification::is_empty")]
    pub produces: IoSpecification,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataSourceDescriptor {
    #[serde(rename = "$schema", skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vendor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
    #[serde(rename = "licenseDesc", skip_serializing_if = "Option::is_none")]
    pub license_desc: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encoding: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub language: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub format: Vec<String>,
}

/// Pretty-printed JSON with absent fields left out.
pub fn to_json<T: Serialize>(descriptor: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(descriptor)?)
}

fn non_empty(s: &str) -> Option<String> {
    (!s.is_empty()).then(|| s.to_string())
}

pub struct DescriptorBuilder<'a> {
    vocabulary: &'a Vocabulary,
    versions: &'a VersionResolver,
}

impl<'a> DescriptorBuilder<'a> {
    pub fn new(vocabulary: &'a Vocabulary, versions: &'a VersionResolver) -> Self {
        Self {
            vocabulary,
            versions,
        }
    }

    fn uri(&self, value: Option<&str>) -> Option<String> {
        value.and_then(|v| self.vocabulary.resolve_opt(v))
    }

    fn uris(&self, values: Option<&Vec<String>>) -> Vec<String> {
        values
            .map(|v| self.vocabulary.resolve_all(v))
            .unwrap_or_default()
    }

    /// `"<annotation-type> <tagset>"` pairs into a type → tagset map.
    fn tagsets(&self, class_name: &str, entries: Option<&Vec<String>>) -> BTreeMap<String, String> {
        let mut map = BTreeMap::new();
        for entry in entries.into_iter().flatten() {
            let mut parts = entry.split_whitespace();
            match (parts.next(), parts.next(), parts.next()) {
                (Some(kind), Some(tagset), None) => {
                    map.insert(self.vocabulary.resolve(kind), self.vocabulary.resolve(tagset));
                }
                _ => {
                    tracing::warn!(
                        class = class_name,
                        entry = %entry,
                        "ignoring tagset entry; expected `<annotation-type> <tagset>`"
                    );
                }
            }
        }
        map
    }

    pub fn build_service(
        &self,
        class_name: &str,
        common: Option<&ServiceRecord>,
        local: &ServiceRecord,
    ) -> ServiceDescriptor {
        let merged = ResolvedMetadata::merge(common, local);
        merged.log_debug(class_name);

        let requires = IoSpecification {
            format: self.uris(merged.input_format.as_ref()),
            language: self.uris(merged.input_language.as_ref()),
            encoding: self.uri(merged.input_encoding.as_deref()),
            annotations: self.uris(merged.requires.as_ref()),
            tagsets: self.tagsets(class_name, merged.requires_tagsets.as_ref()),
        };
        let produces = IoSpecification {
            format: self.uris(merged.output_format.as_ref()),
            language: self.uris(merged.output_language.as_ref()),
            encoding: self.uri(merged.output_encoding.as_deref()),
            annotations: self.uris(merged.produces.as_ref()),
            tagsets: self.tagsets(class_name, merged.produces_tagsets.as_ref()),
        };

        ServiceDescriptor {
            schema: merged.schema,
            name: merged.name.unwrap_or_else(|| class_name.to_string()),
            description: merged.description,
            version: self
                .versions
                .resolve(merged.version.as_deref(), DescriptorKind::Service),
            vendor: merged.vendor,
            license: self.uri(merged.license.as_deref()),
            license_desc: merged.license_desc,
            allow: self.uri(merged.allow.as_deref()),
            requires,
            produces,
        }
    }

    pub fn build_data_source(&self, class_name: &str, record: &DataSourceRecord) -> DataSourceDescriptor {
        tracing::debug!(class = class_name, ?record, "data source metadata");
        DataSourceDescriptor {
            schema: non_empty(&record.schema),
            name: non_empty(&record.name).unwrap_or_else(|| class_name.to_string()),
            description: non_empty(&record.description),
            version: self
                .versions
                .resolve(Some(record.version.as_str()), DescriptorKind::DataSource),
            vendor: non_empty(&record.vendor),
            license: self.vocabulary.resolve_opt(&record.license),
            license_desc: non_empty(&record.license_desc),
            allow: self.vocabulary.resolve_opt(&record.allow),
            encoding: self.vocabulary.resolve_opt(&record.encoding),
            language: self.vocabulary.resolve_all(&record.language),
            format: self.vocabulary.resolve_all(&record.format),
        }
    }
}
