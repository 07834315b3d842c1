use std::fmt::Display;
use std::str::FromStr;

use tracing::{debug, instrument};

use crate::storage::sled::error::SledStorageError;
use strum::AsRefStr;
use strum_macros::{Display, EnumString};

#[derive(Debug, EnumString, AsRefStr, Display, PartialEq, Eq, Copy, Clone)]
#[strum(serialize_all = "lowercase")]
pub(crate) enum PrefixKind {
    Post,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct KeyPrefix {
    prefix: String,
}

impl KeyPrefix {
    pub fn from_kind(kind: PrefixKind) -> Self {
        Self {
            prefix: format!("{}:", kind.as_ref()),
        }
    }

    pub(crate) fn as_str(&self) -> &str {
        self.prefix.as_str()
    }

    pub(crate) fn as_bytes(&self) -> &[u8] {
        self.prefix.as_bytes()
    }
}

impl std::fmt::Display for KeyPrefix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.prefix.fmt(f)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Key {
    prefix: KeyPrefix,
    full_key: String,
}

impl Key {
    pub fn new(prefix: KeyPrefix, value: impl Display) -> Self {
        Self {
            full_key: format!("{}{}", prefix.as_str(), value),
            prefix,
        }
    }

    /// Parses a raw tree key of the form `<kind>:<id>`.
    #[instrument(name = "Key::from_bytes", skip_all, level = "debug")]
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SledStorageError> {
        let full_key = std::str::from_utf8(bytes)
            .map_err(SledStorageError::Conversion)?
            .to_string();

        match full_key.split_once(':') {
            Some((kind, id)) if !id.is_empty() && !id.contains(':') => {
                let kind = PrefixKind::from_str(kind)
                    .map_err(|_| SledStorageError::InvalidKey(full_key.clone()))?;
                let prefix = KeyPrefix::from_kind(kind);

                debug!(key = %full_key, prefix = %prefix, "created key from bytes");

                Ok(Self { prefix, full_key })
            }
            _ => Err(SledStorageError::InvalidKey(full_key)),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.full_key.as_bytes()
    }

    pub fn prefix(&self) -> &KeyPrefix {
        &self.prefix
    }
}

impl std::fmt::Display for Key {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.full_key.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key() {
        let key1 = Key::new(KeyPrefix::from_kind(PrefixKind::Post), "xxx");
        assert_eq!(key1.full_key, "post:xxx");

        let key2 = Key::from_bytes("post:xxx".as_bytes()).unwrap();
        assert_eq!(key2.prefix().as_str(), "post:");
        assert_eq!(key2, key1);

        assert!(Key::from_bytes("post".as_bytes()).is_err());
        assert!(Key::from_bytes("post:".as_bytes()).is_err());
        assert!(Key::from_bytes("post:xxx:yyy".as_bytes()).is_err());
        assert!(Key::from_bytes("comment:xxx".as_bytes()).is_err());
    }
}
