//! Discriminator vocabulary: short names to canonical URIs.
//!
//! The table is built once and handed to the resolver by reference; nothing
//! in this crate mutates it while descriptors are being produced.

use std::collections::{BTreeMap, HashMap};
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{MetadataError, Result};

/// Values starting with this prefix are treated as URIs already.
pub const URI_PREFIX: &str = "http";

const VOCAB: &str = "http://vocab.lappsgrid.org";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VocabularyEntry {
    pub name: String,
    pub uri: String,
}

impl VocabularyEntry {
    pub fn new(name: impl Into<String>, uri: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            uri: uri.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum VocabularyFile {
    Entries(Vec<VocabularyEntry>),
    Map(BTreeMap<String, String>),
}

#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    entries: Vec<VocabularyEntry>,
    by_name: HashMap<String, usize>,
    by_uri: HashMap<String, usize>,
}

impl Vocabulary {
    pub fn new() -> Self {
        Self::default()
    }

    /// The standard discriminators (usage restrictions, licenses, media
    /// formats, annotation types and tagsets).
    pub fn builtin() -> Self {
        let mut vocab = Self::new();
        for (name, path) in BUILTIN {
            vocab.insert(VocabularyEntry::new(*name, format!("{VOCAB}/{path}")));
        }
        vocab
    }

    /// Add an entry. An existing entry with the same name is replaced.
    pub fn insert(&mut self, entry: VocabularyEntry) {
        let index = match self.by_name.get(&entry.name) {
            Some(&index) => {
                let old_uri = std::mem::replace(&mut self.entries[index], entry).uri;
                if self.by_uri.get(&old_uri) == Some(&index) {
                    // Another name may still carry the old URI.
                    match self.entries.iter().position(|e| e.uri == old_uri) {
                        Some(other) => self.by_uri.insert(old_uri, other),
                        None => self.by_uri.remove(&old_uri),
                    };
                }
                index
            }
            None => {
                self.entries.push(entry);
                let index = self.entries.len() - 1;
                self.by_name.insert(self.entries[index].name.clone(), index);
                index
            }
        };
        self.by_uri.insert(self.entries[index].uri.clone(), index);
    }

    /// Layer `other` on top of this table; its entries win on name clashes.
    pub fn extend(&mut self, other: Vocabulary) {
        for entry in other.entries {
            self.insert(entry);
        }
    }

    /// Accepts either `[{"name": .., "uri": ..}, ..]` or `{"name": "uri", ..}`.
    pub fn from_json_reader<R: Read>(reader: R) -> Result<Self> {
        let file: VocabularyFile = serde_json::from_reader(reader)?;
        let mut vocab = Self::new();
        match file {
            VocabularyFile::Entries(entries) => {
                for entry in entries {
                    if entry.name.is_empty() || entry.uri.is_empty() {
                        return Err(MetadataError::Vocabulary(format!(
                            "entry with empty name or uri: {entry:?}"
                        )));
                    }
                    vocab.insert(entry);
                }
            }
            VocabularyFile::Map(map) => {
                for (name, uri) in map {
                    vocab.insert(VocabularyEntry::new(name, uri));
                }
            }
        }
        Ok(vocab)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path).map_err(|e| MetadataError::io(path, e))?;
        Self::from_json_reader(std::io::BufReader::new(file))
    }

    pub fn get_by_name(&self, name: &str) -> Option<&VocabularyEntry> {
        self.by_name.get(name).map(|&i| &self.entries[i])
    }

    pub fn get_by_uri(&self, uri: &str) -> Option<&VocabularyEntry> {
        self.by_uri.get(uri).map(|&i| &self.entries[i])
    }

    /// Canonicalize a discriminator value. Never fails: an unknown key comes
    /// back unchanged.
    pub fn resolve(&self, key: &str) -> String {
        if key.starts_with(URI_PREFIX) {
            return key.to_string();
        }
        if let Some(entry) = self.get_by_name(key).or_else(|| self.get_by_uri(key)) {
            return entry.uri.clone();
        }
        key.to_string()
    }

    /// Like [`Vocabulary::resolve`] but maps the empty string to `None`.
    pub fn resolve_opt(&self, key: &str) -> Option<String> {
        if key.is_empty() {
            None
        } else {
            Some(self.resolve(key))
        }
    }

    pub fn resolve_all(&self, keys: &[String]) -> Vec<String> {
        keys.iter()
            .filter(|k| !k.is_empty())
            .map(|k| self.resolve(k))
            .collect()
    }

    pub fn entries(&self) -> &[VocabularyEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

const BUILTIN: &[(&str, &str)] = &[
    // usage restrictions
    ("any", "ns/allow#any"),
    ("all", "ns/allow#any"),
    ("commercial", "ns/allow#commercial"),
    ("research", "ns/allow#research"),
    ("education", "ns/allow#education"),
    // licenses
    ("apache2", "ns/license#apache-2.0"),
    ("gpl", "ns/license#gpl"),
    ("lgpl", "ns/license#lgpl"),
    ("mit", "ns/license#mit"),
    ("public-domain", "ns/license#public-domain"),
    // media formats
    ("text", "ns/media/text"),
    ("xml", "ns/media/xml"),
    ("json", "ns/media/json"),
    ("jsonld", "ns/media/jsonld"),
    ("lif", "ns/media/jsonld#lif"),
    ("gate", "ns/media/xml#gate"),
    ("uima", "ns/media/xml#uima-cas"),
    ("tcf", "ns/media/xml#tcf"),
    // annotation types
    ("token", "Token"),
    ("pos", "Token#pos"),
    ("lemma", "Token#lemma"),
    ("sentence", "Sentence"),
    ("paragraph", "Paragraph"),
    ("ne", "NamedEntity"),
    ("person", "Person"),
    ("location", "Location"),
    ("organization", "Organization"),
    ("date", "Date"),
    ("noun-chunk", "NounChunk"),
    ("verb-chunk", "VerbChunk"),
    ("constituent", "Constituent"),
    ("phrase-structure", "PhraseStructure"),
    ("dependency", "Dependency"),
    ("dependency-structure", "DependencyStructure"),
    ("coref", "Coreference"),
    ("markable", "Markable"),
    // tagsets
    ("tags-pos-penntb", "ns/tagset/pos#penntb"),
    ("tags-pos-ud", "ns/tagset/pos#ud"),
    ("tags-ner-stanford", "ns/tagset/ner#stanford"),
    ("tags-ner-opennlp", "ns/tagset/ner#opennlp"),
    ("tags-dep-stanford", "ns/tagset/dep#stanford"),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_resolves_short_names() {
        let vocab = Vocabulary::builtin();
        assert_eq!(vocab.resolve("text"), "http://vocab.lappsgrid.org/ns/media/text");
        assert_eq!(vocab.resolve("apache2"), "http://vocab.lappsgrid.org/ns/license#apache-2.0");
        assert_eq!(vocab.resolve("token"), "http://vocab.lappsgrid.org/Token");
    }

    #[test]
    fn http_prefix_passes_through() {
        let mut vocab = Vocabulary::new();
        vocab.insert(VocabularyEntry::new("http://shadow", "urn:other"));
        assert_eq!(vocab.resolve("http://shadow"), "http://shadow");
        assert_eq!(vocab.resolve("https://example.org/x"), "https://example.org/x");
    }

    #[test]
    fn unknown_name_is_kept() {
        let vocab = Vocabulary::builtin();
        assert_eq!(vocab.resolve("Apache 2.0"), "Apache 2.0");
        assert_eq!(vocab.resolve_opt(""), None);
    }

    #[test]
    fn uri_lookup_is_idempotent() {
        let mut vocab = Vocabulary::new();
        vocab.insert(VocabularyEntry::new("thing", "urn:lapps:thing"));
        assert_eq!(vocab.resolve("urn:lapps:thing"), "urn:lapps:thing");
        assert_eq!(vocab.get_by_uri("urn:lapps:thing").unwrap().name, "thing");
    }

    #[test]
    fn insert_replaces_by_name() {
        let mut vocab = Vocabulary::new();
        vocab.insert(VocabularyEntry::new("x", "urn:one"));
        vocab.insert(VocabularyEntry::new("x", "urn:two"));
        assert_eq!(vocab.len(), 1);
        assert_eq!(vocab.resolve("x"), "urn:two");
        assert!(vocab.get_by_uri("urn:one").is_none());
    }

    #[test]
    fn replacing_one_alias_keeps_uri_lookup_for_the_other() {
        let mut vocab = Vocabulary::builtin();
        let any = "http://vocab.lappsgrid.org/ns/allow#any";
        vocab.insert(VocabularyEntry::new("all", "urn:other"));
        assert_eq!(vocab.get_by_uri(any).unwrap().name, "any");
        assert_eq!(vocab.get_by_uri("urn:other").unwrap().name, "all");
        assert_eq!(vocab.resolve("any"), any);
    }

    #[test]
    fn resolve_all_drops_blank_entries() {
        let vocab = Vocabulary::builtin();
        let keys = vec![String::new(), "text".to_string(), String::new()];
        assert_eq!(
            vocab.resolve_all(&keys),
            vec!["http://vocab.lappsgrid.org/ns/media/text".to_string()]
        );
    }

    #[test]
    fn loads_both_file_shapes() {
        let list = r#"[{"name": "foo", "uri": "urn:foo"}]"#;
        let map = r#"{"bar": "urn:bar", "text": "urn:custom-text"}"#;

        let vocab = Vocabulary::from_json_reader(list.as_bytes()).unwrap();
        assert_eq!(vocab.resolve("foo"), "urn:foo");

        let mut layered = Vocabulary::builtin();
        layered.extend(Vocabulary::from_json_reader(map.as_bytes()).unwrap());
        assert_eq!(layered.resolve("bar"), "urn:bar");
        assert_eq!(layered.resolve("text"), "urn:custom-text");
        assert_eq!(layered.resolve("xml"), "http://vocab.lappsgrid.org/ns/media/xml");
    }

    #[test]
    fn rejects_blank_entries() {
        let err = Vocabulary::from_json_reader(r#"[{"name": "", "uri": "urn:x"}]"#.as_bytes());
        assert!(matches!(err, Err(MetadataError::Vocabulary(_))));
    }
}
