//! Content names.
//!
//! The store only needs byte-exact equality and hashing on names; parsing names
//! off the wire belongs to the codec layer. Components are reference counted so
//! cloning a `Name` into the recency list and time indices is cheap.

use bytes::Bytes;
use std::fmt;
use std::sync::Arc;

/// A single name component.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NameComponent(pub Bytes);

impl NameComponent {
    /// Creates a new name component from bytes.
    pub fn new(bytes: impl Into<Bytes>) -> Self {
        Self(bytes.into())
    }

    /// Returns the component as bytes.
    pub fn as_bytes(&self) -> &Bytes {
        &self.0
    }
}

impl fmt::Display for NameComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Printable ASCII goes out as-is, anything else as hex
        let printable = self.0.iter().all(|&b| b.is_ascii_graphic() && b != b'/');

        if printable {
            write!(f, "{}", String::from_utf8_lossy(&self.0))
        } else {
            write!(f, "0x")?;
            for &b in self.0.iter() {
                write!(f, "{:02x}", b)?;
            }
            Ok(())
        }
    }
}

/// An exact-match content name: an ordered sequence of components.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Name {
    components: Arc<[NameComponent]>,
}

impl Name {
    /// Creates a name from already-split components.
    pub fn from_components(components: impl IntoIterator<Item = NameComponent>) -> Self {
        Self {
            components: components.into_iter().collect(),
        }
    }

    /// Creates a name from a URI-like string with '/' as the component separator.
    ///
    /// Empty segments are skipped, so `"/a//b/"` and `"a/b"` are the same name.
    pub fn from_uri(uri: &str) -> Self {
        Self::from_components(
            uri.split('/')
                .filter(|segment| !segment.is_empty())
                .map(|segment| NameComponent::new(segment.as_bytes().to_vec())),
        )
    }

    /// Returns the number of components in the name.
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Returns true if the name has no components.
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Returns an iterator over the name components.
    pub fn components(&self) -> impl Iterator<Item = &NameComponent> {
        self.components.iter()
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.components.is_empty() {
            return write!(f, "/");
        }
        for component in self.components.iter() {
            write!(f, "/{}", component)?;
        }
        Ok(())
    }
}

impl From<&str> for Name {
    fn from(uri: &str) -> Self {
        Self::from_uri(uri)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_from_uri_skips_empty_segments() {
        let name = Name::from_uri("/a//b/");
        assert_eq!(name.len(), 2);
        assert_eq!(name, Name::from_uri("a/b"));
        assert_eq!(name.to_string(), "/a/b");
    }

    #[test]
    fn test_empty_name_displays_root() {
        let name = Name::from_uri("/");
        assert!(name.is_empty());
        assert_eq!(name.to_string(), "/");
    }

    #[test]
    fn test_exact_match_only() {
        let mut set = HashSet::new();
        set.insert(Name::from_uri("/video/seg1"));

        assert!(set.contains(&Name::from_uri("/video/seg1")));
        assert!(!set.contains(&Name::from_uri("/video")));
        assert!(!set.contains(&Name::from_uri("/video/seg1/v2")));
    }

    #[test]
    fn test_binary_component_displays_as_hex() {
        let name = Name::from_components([
            NameComponent::new(&b"app"[..]),
            NameComponent::new(vec![0x00, 0xff]),
        ]);
        assert_eq!(name.to_string(), "/app/0x00ff");
    }
}
