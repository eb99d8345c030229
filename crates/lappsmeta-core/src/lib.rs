//! LAPPS service metadata generation
//!
//! Turns per-class metadata records into JSON descriptors:
//!
//! ```text
//!   manifest ──► Element { common?, service?, data_source? }
//!                  │
//!                  ▼
//!   ResolvedMetadata::merge(common, service)   (local wins, common falls back)
//!                  │
//!                  ▼
//!   DescriptorBuilder ── Vocabulary (short name → URI)
//!                     └─ VersionResolver (annotation → VERSION → pom.xml)
//!                  │
//!                  ▼
//!   <output-root>/<fully.qualified.Class>.json
//! ```
//!
//! The crate never inspects source code itself. Whatever front end scans the
//! sources hands over a [`manifest::Manifest`] (or a slice of
//! [`manifest::Element`]s) and the [`processor::MetadataProcessor`] does the
//! rest.

pub mod descriptor;
pub mod error;
pub mod manifest;
pub mod processor;
pub mod record;
pub mod resolve;
pub mod version;
pub mod vocabulary;

pub use descriptor::{DataSourceDescriptor, DescriptorBuilder, IoSpecification, ServiceDescriptor};
pub use error::{MetadataError, Result};
pub use manifest::{ClassDecl, Element, ElementKind, Manifest};
pub use processor::{MetadataProcessor, ProcessReport, ProcessorConfig};
pub use record::{DataSourceRecord, ServiceRecord};
pub use resolve::ResolvedMetadata;
pub use version::{DescriptorKind, VersionResolver, UNKNOWN_VERSION};
pub use vocabulary::{Vocabulary, VocabularyEntry};
