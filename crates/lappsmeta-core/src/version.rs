//! Version lookup: explicit value, then `VERSION`, then `pom.xml`.

use std::fs;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use quick_xml::events::Event;
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::reader::NsReader;

use crate::error::{MetadataError, Result};

pub const VERSION_FILE: &str = "VERSION";
pub const POM_FILE: &str = "pom.xml";
pub const MAVEN_NAMESPACE: &str = "http://maven.apache.org/POM/4.0.0";

/// Reported for data sources when neither `VERSION` nor `pom.xml` exists.
pub const UNKNOWN_VERSION: &str = "0.0.0.UNKNOWN";

/// Which descriptor a version is being resolved for.
///
/// The two kinds disagree on what a project without `pom.xml` gets: data
/// sources report [`UNKNOWN_VERSION`], services report nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DescriptorKind {
    Service,
    DataSource,
}

impl DescriptorKind {
    fn without_pom(self) -> Option<String> {
        match self {
            DescriptorKind::Service => None,
            DescriptorKind::DataSource => Some(UNKNOWN_VERSION.to_string()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct VersionResolver {
    working_dir: PathBuf,
}

impl VersionResolver {
    pub fn new(working_dir: impl Into<PathBuf>) -> Self {
        Self {
            working_dir: working_dir.into(),
        }
    }

    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    pub fn resolve(&self, explicit: Option<&str>, kind: DescriptorKind) -> Option<String> {
        if let Some(version) = explicit.filter(|v| !v.is_empty()) {
            tracing::debug!(version, "using version given in the metadata");
            return Some(version.to_string());
        }

        let version_file = self.working_dir.join(VERSION_FILE);
        if version_file.exists() {
            if let Some(line) = first_line(&version_file) {
                tracing::debug!(version = %line, "using version from VERSION file");
                return Some(line);
            }
        }

        let pom = self.working_dir.join(POM_FILE);
        if !pom.exists() {
            return kind.without_pom();
        }
        match read_pom_version(&pom) {
            Ok(Some(version)) => {
                tracing::debug!(%version, "using version from pom.xml");
                Some(version)
            }
            Ok(None) => {
                tracing::debug!(path = %pom.display(), "pom.xml has no project version");
                None
            }
            Err(err) => {
                tracing::error!(error = %err, "error reading version from pom.xml");
                None
            }
        }
    }
}

/// `None` when the file can't be read or its first line is empty.
fn first_line(path: &Path) -> Option<String> {
    let file = fs::File::open(path).ok()?;
    let mut line = String::new();
    BufReader::new(file).read_line(&mut line).ok()?;
    let line = line.trim_end_matches(['\n', '\r']);
    if line.is_empty() {
        None
    } else {
        Some(line.to_string())
    }
}

/// Read `/project/version` from a Maven POM. Both elements must be in the
/// Maven POM namespace.
pub fn read_pom_version(path: &Path) -> Result<Option<String>> {
    let text = fs::read_to_string(path).map_err(|e| MetadataError::io(path, e))?;
    parse_pom_version(&text).map_err(|e| MetadataError::Xml {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

fn is_maven(ns: &ResolveResult) -> bool {
    matches!(ns, ResolveResult::Bound(Namespace(uri)) if *uri == MAVEN_NAMESPACE.as_bytes())
}

pub fn parse_pom_version(xml: &str) -> std::result::Result<Option<String>, quick_xml::Error> {
    let mut reader = NsReader::from_str(xml);
    let mut depth = 0usize;
    let mut version: Option<String> = None;

    loop {
        match reader.read_resolved_event()? {
            (ns, Event::Start(e)) => {
                depth += 1;
                let local = e.local_name();
                match depth {
                    1 if !(is_maven(&ns) && local.as_ref() == b"project") => return Ok(None),
                    2 if is_maven(&ns) && local.as_ref() == b"version" => {
                        version = Some(String::new());
                    }
                    _ => {}
                }
            }
            (_, Event::End(_)) => {
                if depth == 2 && version.is_some() {
                    break;
                }
                depth = depth.saturating_sub(1);
            }
            (_, Event::Text(text)) => {
                if let Some(buf) = version.as_mut() {
                    buf.push_str(&text.unescape()?);
                }
            }
            (_, Event::CData(data)) => {
                if let Some(buf) = version.as_mut() {
                    buf.push_str(&String::from_utf8_lossy(&data.into_inner()));
                }
            }
            (_, Event::Eof) => break,
            _ => {}
        }
    }

    Ok(version
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const POM: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<project xmlns="http://maven.apache.org/POM/4.0.0">
  <modelVersion>4.0.0</modelVersion>
  <parent>
    <groupId>org.lappsgrid.maven</groupId>
    <version>9.9.9</version>
  </parent>
  <artifactId>demo</artifactId>
  <version>1.4.0-SNAPSHOT</version>
</project>
"#;

    #[test]
    fn explicit_version_wins() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(VERSION_FILE), "2.0.0\n").unwrap();
        let resolver = VersionResolver::new(dir.path());
        assert_eq!(
            resolver.resolve(Some("1.0.0"), DescriptorKind::Service).as_deref(),
            Some("1.0.0")
        );
    }

    #[test]
    fn version_file_before_pom() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(VERSION_FILE), "2.3.1\n").unwrap();
        // Unparseable on purpose: it must never be read.
        fs::write(dir.path().join(POM_FILE), "<project").unwrap();
        let resolver = VersionResolver::new(dir.path());
        assert_eq!(
            resolver.resolve(Some(""), DescriptorKind::Service).as_deref(),
            Some("2.3.1")
        );
    }

    #[test]
    fn pom_version_from_project_not_parent() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(POM_FILE), POM).unwrap();
        let resolver = VersionResolver::new(dir.path());
        assert_eq!(
            resolver.resolve(None, DescriptorKind::Service).as_deref(),
            Some("1.4.0-SNAPSHOT")
        );
    }

    #[test]
    fn empty_version_file_falls_through_to_pom() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(VERSION_FILE), "").unwrap();
        fs::write(dir.path().join(POM_FILE), POM).unwrap();
        let resolver = VersionResolver::new(dir.path());
        assert_eq!(
            resolver.resolve(None, DescriptorKind::DataSource).as_deref(),
            Some("1.4.0-SNAPSHOT")
        );
    }

    #[test]
    fn missing_pom_depends_on_kind() {
        let dir = tempdir().unwrap();
        let resolver = VersionResolver::new(dir.path());
        assert_eq!(resolver.resolve(None, DescriptorKind::Service), None);
        assert_eq!(
            resolver.resolve(None, DescriptorKind::DataSource).as_deref(),
            Some(UNKNOWN_VERSION)
        );
    }

    #[test]
    fn malformed_pom_yields_none() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join(POM_FILE),
            r#"<project xmlns="http://maven.apache.org/POM/4.0.0"><version>1.0</versio></project>"#,
        )
        .unwrap();
        let resolver = VersionResolver::new(dir.path());
        assert_eq!(resolver.resolve(None, DescriptorKind::DataSource), None);
        assert!(read_pom_version(&dir.path().join(POM_FILE)).is_err());
    }

    #[test]
    fn namespace_is_required() {
        let plain = "<project><version>1.0</version></project>";
        assert_eq!(parse_pom_version(plain).unwrap(), None);

        let prefixed = r#"<m:project xmlns:m="http://maven.apache.org/POM/4.0.0"><m:version> 3.1 </m:version></m:project>"#;
        assert_eq!(parse_pom_version(prefixed).unwrap().as_deref(), Some("3.1"));
    }
}
