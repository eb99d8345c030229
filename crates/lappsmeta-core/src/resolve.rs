//! Merging of common (base class) and service (class) metadata.
//!
//! Record kinds cannot inherit from each other, so a base class carries the
//! common record and each concrete service carries its own. The service
//! value wins whenever it was set; the common value only fills gaps.

use crate::record::ServiceRecord;

fn has_value(s: &str) -> bool {
    !s.is_empty()
}

fn scalar(local: &str, common: Option<&str>) -> Option<String> {
    if has_value(local) {
        return Some(local.to_string());
    }
    common.filter(|c| has_value(c)).map(str::to_string)
}

fn list(local: &[String], common: Option<&[String]>) -> Option<Vec<String>> {
    if !local.is_empty() {
        return Some(local.to_vec());
    }
    common.filter(|c| !c.is_empty()).map(<[String]>::to_vec)
}

/// Directional value first (local, then common), then the shared value
/// (local, then common).
fn directional_scalar(
    local_dir: &str,
    common_dir: Option<&str>,
    local_shared: &str,
    common_shared: Option<&str>,
) -> Option<String> {
    scalar(local_dir, common_dir).or_else(|| scalar(local_shared, common_shared))
}

fn directional_list(
    local_dir: &[String],
    common_dir: Option<&[String]>,
    local_shared: &[String],
    common_shared: Option<&[String]>,
) -> Option<Vec<String>> {
    list(local_dir, common_dir).or_else(|| list(local_shared, common_shared))
}

/// Effective metadata for one service class. Values are raw (not yet
/// passed through the vocabulary).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedMetadata {
    pub schema: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub version: Option<String>,
    pub vendor: Option<String>,
    pub allow: Option<String>,
    pub license: Option<String>,
    pub license_desc: Option<String>,
    pub input_encoding: Option<String>,
    pub output_encoding: Option<String>,
    pub input_language: Option<Vec<String>>,
    pub output_language: Option<Vec<String>>,
    pub input_format: Option<Vec<String>>,
    pub output_format: Option<Vec<String>>,
    pub requires: Option<Vec<String>>,
    pub produces: Option<Vec<String>>,
    pub requires_tagsets: Option<Vec<String>>,
    pub produces_tagsets: Option<Vec<String>>,
}

impl ResolvedMetadata {
    pub fn merge(common: Option<&ServiceRecord>, local: &ServiceRecord) -> Self {
        let c = common;
        Self {
            schema: scalar(&local.schema, c.map(|c| c.schema.as_str())),
            name: scalar(&local.name, c.map(|c| c.name.as_str())),
            description: scalar(&local.description, c.map(|c| c.description.as_str())),
            version: scalar(&local.version, c.map(|c| c.version.as_str())),
            vendor: scalar(&local.vendor, c.map(|c| c.vendor.as_str())),
            allow: scalar(&local.allow, c.map(|c| c.allow.as_str())),
            license: scalar(&local.license, c.map(|c| c.license.as_str())),
            license_desc: scalar(&local.license_desc, c.map(|c| c.license_desc.as_str())),
            input_encoding: directional_scalar(
                &local.requires_encoding,
                c.map(|c| c.requires_encoding.as_str()),
                &local.encoding,
                c.map(|c| c.encoding.as_str()),
            ),
            output_encoding: directional_scalar(
                &local.produces_encoding,
                c.map(|c| c.produces_encoding.as_str()),
                &local.encoding,
                c.map(|c| c.encoding.as_str()),
            ),
            input_language: directional_list(
                &local.requires_language,
                c.map(|c| c.requires_language.as_slice()),
                &local.language,
                c.map(|c| c.language.as_slice()),
            ),
            output_language: directional_list(
                &local.produces_language,
                c.map(|c| c.produces_language.as_slice()),
                &local.language,
                c.map(|c| c.language.as_slice()),
            ),
            input_format: directional_list(
                &local.requires_format,
                c.map(|c| c.requires_format.as_slice()),
                &local.format,
                c.map(|c| c.format.as_slice()),
            ),
            output_format: directional_list(
                &local.produces_format,
                c.map(|c| c.produces_format.as_slice()),
                &local.format,
                c.map(|c| c.format.as_slice()),
            ),
            requires: list(&local.requires, c.map(|c| c.requires.as_slice())),
            produces: list(&local.produces, c.map(|c| c.produces.as_slice())),
            requires_tagsets: list(
                &local.requires_tagsets,
                c.map(|c| c.requires_tagsets.as_slice()),
            ),
            produces_tagsets: list(
                &local.produces_tagsets,
                c.map(|c| c.produces_tagsets.as_slice()),
            ),
        }
    }

    pub(crate) fn log_debug(&self, class_name: &str) {
        tracing::debug!(
            class = class_name,
            vendor = ?self.vendor,
            version = ?self.version,
            description = ?self.description,
            allow = ?self.allow,
            encoding = ?(&self.input_encoding, &self.output_encoding),
            format = ?(&self.input_format, &self.output_format),
            language = ?(&self.input_language, &self.output_language),
            requires = ?self.requires,
            produces = ?self.produces,
            "combined metadata"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn local_scalar_wins() {
        let common = ServiceRecord {
            vendor: "anc".into(),
            license: "gpl".into(),
            ..Default::default()
        };
        let local = ServiceRecord {
            license: "apache2".into(),
            ..Default::default()
        };
        let merged = ResolvedMetadata::merge(Some(&common), &local);
        assert_eq!(merged.license.as_deref(), Some("apache2"));
        assert_eq!(merged.vendor.as_deref(), Some("anc"));
        assert_eq!(merged.description, None);
    }

    #[test]
    fn without_common_unset_fields_are_absent() {
        let merged = ResolvedMetadata::merge(None, &ServiceRecord::default());
        assert_eq!(merged.name, None);
        assert_eq!(merged.version, None);
        assert_eq!(merged.input_encoding, None);
        assert_eq!(merged.requires, None);
        assert_eq!(merged.allow.as_deref(), Some("any"));
    }

    #[test]
    fn directional_encoding_beats_shared() {
        let local = ServiceRecord {
            requires_encoding: "A".into(),
            encoding: "B".into(),
            ..Default::default()
        };
        let merged = ResolvedMetadata::merge(None, &local);
        assert_eq!(merged.input_encoding.as_deref(), Some("A"));
        assert_eq!(merged.output_encoding.as_deref(), Some("B"));

        let shared_only = ServiceRecord {
            encoding: "B".into(),
            ..Default::default()
        };
        let merged = ResolvedMetadata::merge(None, &shared_only);
        assert_eq!(merged.input_encoding.as_deref(), Some("B"));
    }

    #[test]
    fn common_directional_beats_local_shared() {
        let common = ServiceRecord {
            produces_format: strings(&["lif"]),
            ..Default::default()
        };
        let local = ServiceRecord {
            format: strings(&["text"]),
            ..Default::default()
        };
        let merged = ResolvedMetadata::merge(Some(&common), &local);
        assert_eq!(merged.input_format, Some(strings(&["text"])));
        assert_eq!(merged.output_format, Some(strings(&["lif"])));
    }

    #[test]
    fn language_falls_back_to_common_shared() {
        let common = ServiceRecord {
            language: strings(&["en"]),
            ..Default::default()
        };
        let local = ServiceRecord {
            requires_language: strings(&["de"]),
            ..Default::default()
        };
        let merged = ResolvedMetadata::merge(Some(&common), &local);
        assert_eq!(merged.input_language, Some(strings(&["de"])));
        assert_eq!(merged.output_language, Some(strings(&["en"])));
    }

    #[test]
    fn annotation_types_use_two_tiers_only() {
        let common = ServiceRecord {
            requires: strings(&["token"]),
            ..Default::default()
        };
        let local = ServiceRecord {
            produces: strings(&["pos"]),
            ..Default::default()
        };
        let merged = ResolvedMetadata::merge(Some(&common), &local);
        assert_eq!(merged.requires, Some(strings(&["token"])));
        assert_eq!(merged.produces, Some(strings(&["pos"])));
    }
}
