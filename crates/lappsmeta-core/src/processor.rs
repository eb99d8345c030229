//! Batch descriptor generation.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::descriptor::{to_json, DescriptorBuilder};
use crate::error::{MetadataError, Result};
use crate::manifest::Element;
use crate::version::VersionResolver;
use crate::vocabulary::Vocabulary;

pub const DEFAULT_OUTPUT_ROOT: &str = "src/main/resources/metadata";

#[derive(Debug, Clone)]
pub struct ProcessorConfig {
    /// Directory the `<class>.json` files are written to.
    pub output_root: PathBuf,
    /// Where `VERSION` and `pom.xml` are looked up.
    pub working_dir: PathBuf,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            output_root: PathBuf::from(DEFAULT_OUTPUT_ROOT),
            working_dir: PathBuf::from("."),
        }
    }
}

/// Outcome of one batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessReport {
    pub written: Vec<PathBuf>,
    /// Classes carrying metadata that are not concrete classes.
    pub skipped: Vec<String>,
    /// Classes whose descriptor could not be written, with the reason.
    pub failed: Vec<(String, String)>,
}

impl ProcessReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

pub struct MetadataProcessor {
    config: ProcessorConfig,
    vocabulary: Vocabulary,
    versions: VersionResolver,
}

impl MetadataProcessor {
    pub fn new(config: ProcessorConfig, vocabulary: Vocabulary) -> Self {
        let versions = VersionResolver::new(config.working_dir.clone());
        Self {
            config,
            vocabulary,
            versions,
        }
    }

    pub fn config(&self) -> &ProcessorConfig {
        &self.config
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    pub fn descriptor_path(&self, class_name: &str) -> PathBuf {
        self.config.output_root.join(format!("{class_name}.json"))
    }

    /// Generate descriptors for every concrete class in `elements`.
    ///
    /// Fails only when the output root can't be created; per-class write
    /// failures are logged and reported.
    pub fn process(&self, elements: &[Element]) -> Result<ProcessReport> {
        let root = &self.config.output_root;
        tracing::info!(root = %root.display(), "running the metadata processor");
        fs::create_dir_all(root).map_err(|source| {
            tracing::error!(
                root = %root.display(),
                error = %source,
                "could not create output directory; metadata files will not be generated"
            );
            MetadataError::OutputRoot {
                path: root.clone(),
                source,
            }
        })?;

        let mut report = ProcessReport::default();
        self.process_services(elements, &mut report);
        self.process_data_sources(elements, &mut report);
        Ok(report)
    }

    fn process_services(&self, elements: &[Element], report: &mut ProcessReport) {
        let builder = DescriptorBuilder::new(&self.vocabulary, &self.versions);
        for element in elements {
            let Some(service) = element.service.as_ref() else {
                continue;
            };
            if !element.is_concrete_class() {
                tracing::debug!(class = %element.name, "skipping non-concrete class");
                report.skipped.push(element.name.clone());
                continue;
            }
            if element.common.is_some() {
                tracing::debug!(class = %element.name, "superclass has common metadata");
            }
            let descriptor = builder.build_service(&element.name, element.common.as_ref(), service);
            self.emit(&element.name, &descriptor, report);
        }
    }

    fn process_data_sources(&self, elements: &[Element], report: &mut ProcessReport) {
        let builder = DescriptorBuilder::new(&self.vocabulary, &self.versions);
        for element in elements {
            let Some(record) = element.data_source.as_ref() else {
                continue;
            };
            if !element.is_concrete_class() {
                tracing::debug!(class = %element.name, "skipping non-concrete class");
                report.skipped.push(element.name.clone());
                continue;
            }
            let descriptor = builder.build_data_source(&element.name, record);
            self.emit(&element.name, &descriptor, report);
        }
    }

    fn emit<T: Serialize>(&self, class_name: &str, descriptor: &T, report: &mut ProcessReport) {
        let path = self.descriptor_path(class_name);
        match write_descriptor(&path, descriptor) {
            Ok(()) => {
                tracing::info!(path = %path.display(), "wrote descriptor");
                report.written.push(path);
            }
            Err(err) => {
                tracing::error!(class = class_name, error = ?err, "failed to write descriptor");
                report.failed.push((class_name.to_string(), err.to_string()));
            }
        }
    }
}

fn write_descriptor<T: Serialize>(path: &Path, descriptor: &T) -> Result<()> {
    let json = to_json(descriptor)?;
    fs::write(path, json.as_bytes()).map_err(|e| MetadataError::io(path, e))
}
