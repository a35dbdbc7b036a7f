//! Hierarchical key/value configuration store.
//!
//! Keys are paths into nested tables, written either as a dotted string
//! (`chains.ethereum.networks.mainnet.sender`) or as a slice of segments.
//! Segments are taken verbatim, so a quoted TOML key such as
//! `"eth.classic"` is a single segment. [`ConfigStore`] is the minimal
//! contract the registry needs; [`TomlStore`] backs it with a TOML document
//! on disk that keeps its comments and layout across writes.
//! [`SenderSelections`] layers typed accessors for the
//! chain → network → sender hierarchy on top of any store.

use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::de::DeserializeOwned;
use toml_edit::{DocumentMut, InlineTable, Item, Table, TableLike};

use crate::error::Error;
use crate::transport::TransportKind;

/// Segment-addressed configuration store.
pub trait ConfigStore {
    /// Keys of the table at `segments`, sorted, or an empty list if there
    /// is no table.
    fn string_map_at(&self, segments: &[&str]) -> Vec<String>;

    /// The string stored at `segments`, if any.
    fn string_at(&self, segments: &[&str]) -> Option<String>;

    /// Store `value` at `segments`, creating intermediate tables as needed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if `segments` is empty or a prefix of it
    /// holds a non-table value.
    fn set_at(&mut self, segments: &[&str], value: &str) -> Result<(), Error>;

    /// [`ConfigStore::string_map_at`] for a dotted path.
    fn string_map(&self, path: &str) -> Vec<String> {
        self.string_map_at(&split_path(path))
    }

    /// [`ConfigStore::string_at`] for a dotted path.
    fn string(&self, path: &str) -> Option<String> {
        self.string_at(&split_path(path))
    }

    /// [`ConfigStore::set_at`] for a dotted path.
    ///
    /// # Errors
    ///
    /// See [`ConfigStore::set_at`].
    fn set(&mut self, path: &str, value: &str) -> Result<(), Error> {
        self.set_at(&split_path(path), value)
    }
}

fn split_path(path: &str) -> Vec<&str> {
    path.split('.').collect()
}

/// Segments of the sender selection for a chain/network pair.
#[must_use]
pub const fn sender_segments<'a>(chain: &'a str, network: &'a str) -> [&'a str; 5] {
    ["chains", chain, "networks", network, "sender"]
}

/// Typed view of the `chains` hierarchy.
///
/// Chain and network names are passed through as single segments, so names
/// containing dots stay addressable.
pub trait SenderSelections: ConfigStore {
    /// Every configured chain.
    fn chains(&self) -> Vec<String> {
        self.string_map_at(&["chains"])
    }

    /// Every configured network of `chain`.
    fn networks(&self, chain: &str) -> Vec<String> {
        self.string_map_at(&["chains", chain, "networks"])
    }

    /// Raw sender kind name persisted for the pair.
    fn sender_kind(&self, chain: &str, network: &str) -> Option<String> {
        self.string_at(&sender_segments(chain, network))
    }

    /// Persist `kind` as the sender for the pair.
    ///
    /// # Errors
    ///
    /// Propagates [`ConfigStore::set_at`] failures.
    fn set_sender_kind(
        &mut self,
        chain: &str,
        network: &str,
        kind: TransportKind,
    ) -> Result<(), Error> {
        self.set_at(&sender_segments(chain, network), kind.as_str())
    }
}

impl<S: ConfigStore + ?Sized> SenderSelections for S {}

/// [`ConfigStore`] backed by an editable TOML document.
///
/// Two stores are equal when their documents render identically.
#[derive(Debug, Clone, Default)]
pub struct TomlStore {
    doc: DocumentMut,
}

impl TomlStore {
    /// Read and parse the TOML file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid TOML.
    pub fn load(path: &Path) -> Result<Self, Error> {
        let content = fs::read_to_string(path)
            .map_err(|e| Error::config_with(format!("failed to read '{}'", path.display()), e))?;
        content
            .parse()
            .map_err(|e| Error::config_with(format!("in '{}'", path.display()), e))
    }

    /// Like [`TomlStore::load`], but a missing file yields an empty store.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing file cannot be read or parsed.
    pub fn load_or_default(path: &Path) -> Result<Self, Error> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Write the document to `path`, replacing any previous content.
    ///
    /// Comments and formatting of the loaded document are kept.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub fn save(&self, path: &Path) -> Result<(), Error> {
        fs::write(path, self.doc.to_string())
            .map_err(|e| Error::config_with(format!("failed to write '{}'", path.display()), e))
    }

    /// Deserialise the subtree at the dotted `path` into `T`.
    ///
    /// Returns `Ok(None)` when nothing is stored at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the subtree does not match `T`.
    pub fn section<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>, Error> {
        let table: toml::Table = toml::from_str(&self.doc.to_string())
            .map_err(|e| Error::config_with("failed to decode document", e))?;

        let mut value = toml::Value::Table(table);
        for segment in path.split('.') {
            let Some(child) = value.as_table_mut().and_then(|t| t.remove(segment)) else {
                return Ok(None);
            };
            value = child;
        }
        value
            .try_into()
            .map(Some)
            .map_err(|e| Error::config_with(format!("invalid [{path}] section"), e))
    }

    fn lookup(&self, segments: &[&str]) -> Option<&Item> {
        let (first, rest) = segments.split_first()?;
        let mut current = self.doc.get(first)?;
        for segment in rest {
            current = current.as_table_like()?.get(segment)?;
        }
        Some(current)
    }
}

/// Empty table for a missing path segment, matching the parent's style.
fn child_table(inline: bool) -> Item {
    if inline {
        Item::Value(InlineTable::new().into())
    } else {
        let mut table = Table::new();
        table.set_implicit(true);
        Item::Table(table)
    }
}

impl PartialEq for TomlStore {
    fn eq(&self, other: &Self) -> bool {
        self.doc.to_string() == other.doc.to_string()
    }
}

impl FromStr for TomlStore {
    type Err = toml_edit::TomlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self { doc: s.parse()? })
    }
}

impl ConfigStore for TomlStore {
    fn string_map_at(&self, segments: &[&str]) -> Vec<String> {
        let mut keys: Vec<String> = self
            .lookup(segments)
            .and_then(Item::as_table_like)
            .map(|table| table.iter().map(|(key, _)| key.to_owned()).collect())
            .unwrap_or_default();
        keys.sort_unstable();
        keys
    }

    fn string_at(&self, segments: &[&str]) -> Option<String> {
        self.lookup(segments)
            .and_then(Item::as_str)
            .map(ToOwned::to_owned)
    }

    fn set_at(&mut self, segments: &[&str], value: &str) -> Result<(), Error> {
        let Some((leaf, parents)) = segments.split_last() else {
            return Err(Error::config("cannot set an empty path"));
        };

        let mut table: &mut dyn TableLike = self.doc.as_table_mut();
        let mut inline = false;
        for segment in parents {
            let item = table
                .entry(segment)
                .or_insert_with(|| child_table(inline));
            inline = item.is_inline_table();
            table = item.as_table_like_mut().ok_or_else(|| {
                Error::config(format!(
                    "cannot set '{}': '{segment}' is not a table",
                    segments.join(".")
                ))
            })?;
        }
        table.insert(leaf, toml_edit::value(value));
        Ok(())
    }
}
