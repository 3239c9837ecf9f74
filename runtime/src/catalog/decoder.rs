//! Streaming decoder for compressed manifest catalogs.
//!
//! A catalog is a gzip-compressed tar archive whose single root-level `.json`
//! member holds the package manifests, in one of two layouts:
//!
//! ```text
//! [ {manifest}, {manifest}, ... ]                         (bare array)
//! { "namespace": "core", "manifests": [ {manifest}, ... ] } (wrapped)
//! ```
//!
//! The layout is detected from the first structural token. The decoder then
//! yields one manifest at a time; nothing beyond the current element is held
//! in memory, and dropping the decoder releases the tar, gzip and file handles.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use flate2::read::GzDecoder;
use please_core::error::{PleaseError, Result};
use please_core::manifest::PackageManifest;
use tar::{Archive, Entries, Entry};

use super::stream::{describe, JsonStream, Token};

/// A tar member of an open catalog.
pub(crate) type CatalogEntry<'a> = Entry<'a, GzDecoder<File>>;

/// An open catalog archive (file → gzip → tar).
pub struct CatalogFile {
    path: PathBuf,
    archive: Archive<GzDecoder<File>>,
}

impl CatalogFile {
    /// Open a catalog archive for a single sequential pass.
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                PleaseError::MissingFile {
                    path: path.to_path_buf(),
                }
            } else {
                PleaseError::IoError(e)
            }
        })?;

        Ok(Self {
            path: path.to_path_buf(),
            archive: Archive::new(GzDecoder::new(file)),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Iterate the raw tar members. Can only be called once per open file.
    pub(crate) fn entries(&mut self) -> Result<Entries<'_, GzDecoder<File>>> {
        let path = &self.path;
        self.archive
            .entries()
            .map_err(|e| corrupt(path, format!("failed to read tar entries: {}", e)))
    }

    /// Locate the manifest member and position a decoder at its first element.
    pub fn manifests(&mut self) -> Result<ManifestDecoder<'_>> {
        let path = self.path.clone();
        let mut entries = self.entries()?;

        let member = loop {
            match entries.next() {
                None => return Err(PleaseError::NoStructuredMember { path }),
                Some(Err(e)) => {
                    return Err(corrupt(&path, format!("failed to read tar entry: {}", e)))
                }
                Some(Ok(entry)) => {
                    if is_manifest_member(&entry) {
                        break entry;
                    }
                }
            }
        };

        ManifestDecoder::new(member, &path)
    }
}

/// Root-level regular file with a `.json` extension.
fn is_manifest_member(entry: &CatalogEntry<'_>) -> bool {
    if !entry.header().entry_type().is_file() {
        return false;
    }
    let Ok(path) = entry.path() else {
        return false;
    };
    let name = path.to_string_lossy();
    let name = name.strip_prefix("./").unwrap_or(&name);
    !name.contains('/') && name.ends_with(".json")
}

pub(crate) fn corrupt(path: &Path, message: impl Into<String>) -> PleaseError {
    PleaseError::CorruptArchive {
        path: path.to_path_buf(),
        message: message.into(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ArrayState {
    /// Just after `[`.
    First,
    /// Just after an element.
    AfterElement,
    /// Positioned at the start of an element.
    Ready,
    /// The closing `]` has been consumed.
    Done,
    /// A previous read failed; the stream position is unreliable.
    Failed,
}

/// Element-by-element reader over the manifest array of a catalog member.
pub struct ManifestDecoder<'a> {
    stream: JsonStream<BufReader<CatalogEntry<'a>>>,
    namespace: String,
    state: ArrayState,
}

impl<'a> ManifestDecoder<'a> {
    fn new(member: CatalogEntry<'a>, path: &Path) -> Result<Self> {
        let mut stream = JsonStream::new(BufReader::new(member), path);
        let namespace = read_preamble(&mut stream)?;

        tracing::debug!(
            path = %path.display(),
            namespace = %namespace,
            "Opened manifest catalog"
        );

        Ok(Self {
            stream,
            namespace,
            state: ArrayState::First,
        })
    }

    /// Namespace label from the catalog header; empty for the bare-array layout.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Whether another manifest follows. Idempotent until `decode_next` is called.
    pub fn has_next(&mut self) -> Result<bool> {
        match self.state {
            ArrayState::Ready => return Ok(true),
            ArrayState::Done | ArrayState::Failed => return Ok(false),
            ArrayState::First | ArrayState::AfterElement => {}
        }

        let result = self.advance();
        if result.is_err() {
            self.state = ArrayState::Failed;
        }
        result
    }

    fn advance(&mut self) -> Result<bool> {
        let next = self.stream.peek_non_whitespace()?;
        match (self.state, next) {
            (_, Some(b']')) => {
                self.stream.consume();
                self.state = ArrayState::Done;
                Ok(false)
            }
            (ArrayState::AfterElement, Some(b',')) => {
                self.stream.consume();
                match self.stream.peek_non_whitespace()? {
                    Some(b']') => Err(self.unexpected("manifest", "']'")),
                    next => self.element_start(next),
                }
            }
            (ArrayState::First, next) => self.element_start(next),
            (_, None) => Err(self.stream.decode_error("unexpected end of input")),
            (_, Some(b)) => Err(self.unexpected("',' or ']'", &format!("'{}'", b as char))),
        }
    }

    /// Accept `next` as the first byte of an array element.
    fn element_start(&mut self, next: Option<u8>) -> Result<bool> {
        match next {
            None => Err(self.stream.decode_error("unexpected end of input")),
            Some(b @ (b',' | b':' | b'}')) => {
                Err(self.unexpected("manifest", &format!("'{}'", b as char)))
            }
            Some(_) => {
                self.state = ArrayState::Ready;
                Ok(true)
            }
        }
    }

    /// Decode the next manifest, or `None` once the array is exhausted.
    pub fn decode_next(&mut self) -> Result<Option<PackageManifest>> {
        if !self.has_next()? {
            return Ok(None);
        }

        let result = self.stream.read_value_raw().and_then(|raw| {
            serde_json::from_slice::<PackageManifest>(&raw)
                .map_err(|e| self.stream.decode_error(format!("failed to decode object: {}", e)))
        });

        match result {
            Ok(manifest) => {
                self.state = ArrayState::AfterElement;
                Ok(Some(manifest))
            }
            Err(e) => {
                self.state = ArrayState::Failed;
                Err(e)
            }
        }
    }

    fn unexpected(&self, expected: &str, found: &str) -> PleaseError {
        PleaseError::UnexpectedToken {
            path: self.stream.path().to_path_buf(),
            expected: expected.to_string(),
            found: found.to_string(),
        }
    }
}

impl Iterator for ManifestDecoder<'_> {
    type Item = Result<PackageManifest>;

    fn next(&mut self) -> Option<Self::Item> {
        self.decode_next().transpose()
    }
}

/// Consume the opening tokens up to and including the manifest array's `[`,
/// returning the namespace (empty for a bare array).
fn read_preamble<R: std::io::BufRead>(stream: &mut JsonStream<R>) -> Result<String> {
    let path = stream.path().to_path_buf();
    let unexpected = |expected: &str, found: &Option<Token>| PleaseError::UnexpectedToken {
        path: path.clone(),
        expected: expected.to_string(),
        found: describe(found),
    };

    match stream.next_token()? {
        Some(Token::BeginArray) => Ok(String::new()),
        Some(Token::BeginObject) => {
            let mut namespace = String::new();
            loop {
                let key = match stream.next_token()? {
                    Some(Token::Str(key)) => key,
                    other => return Err(unexpected("'manifests' key", &other)),
                };
                stream.expect_byte(b':')?;

                match key.as_str() {
                    "namespace" => match stream.next_token()? {
                        Some(Token::Str(ns)) => namespace = ns,
                        other => return Err(unexpected("string for namespace", &other)),
                    },
                    "manifests" => match stream.next_token()? {
                        Some(Token::BeginArray) => return Ok(namespace),
                        other => return Err(unexpected("array for manifests", &other)),
                    },
                    _ => stream.skip_value()?,
                }

                // `manifests` not reached yet, so another member follows
                stream.expect_byte(b',')?;
            }
        }
        other => Err(unexpected("'[' or '{'", &other)),
    }
}
