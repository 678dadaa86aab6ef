/// Provides the PackURI value type and utilities for working with package URIs.
///
/// A PackURI represents a part name within an OPC package, following the URI format
/// defined by the Open Packaging Conventions specification. Relationship targets
/// are relative references that only make sense once resolved against the
/// directory of the part that owns the `.rels` file.

/// Represents a package URI, which is a partname within an OPC package.
///
/// PackURIs always begin with a forward slash and use forward slashes as path separators.
/// The zip membername is the same string without the leading slash.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PackURI {
    /// The full pack URI string (e.g., "/word/document.xml")
    uri: String,
}

impl PackURI {
    /// Create a PackURI from a zip membername such as `word/media/image1.png`.
    pub fn from_membername(membername: &str) -> Self {
        PackURI {
            uri: format!("/{}", membername.trim_start_matches('/')),
        }
    }

    /// Resolve a relationship target against the directory of its source part.
    ///
    /// `media/image1.png` against `/word` yields `/word/media/image1.png`;
    /// `../customXml/item1.xml` against `/word` yields `/customXml/item1.xml`.
    /// Targets that are already absolute (`/word/media/image1.png`) are only
    /// normalized.
    pub fn from_rel_ref(base_uri: &str, relative_ref: &str) -> Self {
        let joined = if relative_ref.starts_with('/') {
            relative_ref.to_string()
        } else {
            Self::join_paths(base_uri, relative_ref)
        };
        PackURI {
            uri: Self::normalize_path(&joined),
        }
    }

    /// Get the base URI (directory portion) of this PackURI.
    ///
    /// For example, "/word/media" for "/word/media/image1.png".
    /// For the package pseudo-partname "/", returns "/".
    pub fn base_uri(&self) -> &str {
        match self.uri.rfind('/') {
            Some(0) | None => "/",
            Some(pos) => &self.uri[..pos],
        }
    }

    /// Get the membername (URI with leading slash stripped).
    ///
    /// This is the form used as the Zip file membername for the package item.
    pub fn membername(&self) -> &str {
        &self.uri[1..]
    }

    /// Get the relative reference from a base URI to this PackURI.
    ///
    /// For example, PackURI("/word/numbering.xml") gives "numbering.xml"
    /// for base_uri "/word" and "../word/numbering.xml" for "/customXml".
    pub fn relative_ref(&self, base_uri: &str) -> String {
        if base_uri == "/" {
            return self.membername().to_string();
        }

        let from_parts: Vec<&str> = base_uri.split('/').filter(|s| !s.is_empty()).collect();
        let to_parts: Vec<&str> = self.uri.split('/').filter(|s| !s.is_empty()).collect();

        let common = from_parts
            .iter()
            .zip(to_parts.iter())
            .take_while(|(a, b)| a == b)
            .count();

        let mut segments: Vec<&str> = vec![".."; from_parts.len() - common];
        segments.extend_from_slice(&to_parts[common..]);
        segments.join("/")
    }

    /// Get the full URI string.
    pub fn as_str(&self) -> &str {
        &self.uri
    }

    fn join_paths(base: &str, rel: &str) -> String {
        if base.ends_with('/') {
            format!("{}{}", base, rel)
        } else {
            format!("{}/{}", base, rel)
        }
    }

    /// Resolve "." and ".." segments and collapse repeated slashes
    fn normalize_path(path: &str) -> String {
        let mut parts: Vec<&str> = Vec::new();

        for part in path.split('/') {
            match part {
                "" | "." => {},
                ".." => {
                    parts.pop();
                },
                _ => parts.push(part),
            }
        }

        format!("/{}", parts.join("/"))
    }
}

impl std::fmt::Display for PackURI {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.uri)
    }
}

impl AsRef<str> for PackURI {
    fn as_ref(&self) -> &str {
        &self.uri
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_membername() {
        let uri = PackURI::from_membername("word/media/image1.png");
        assert_eq!(uri.as_str(), "/word/media/image1.png");
        assert_eq!(uri.membername(), "word/media/image1.png");
    }

    #[test]
    fn test_base_uri() {
        let uri = PackURI::from_membername("word/media/image1.png");
        assert_eq!(uri.base_uri(), "/word/media");

        let root = PackURI::from_membername("");
        assert_eq!(root.base_uri(), "/");
        assert_eq!(root.membername(), "");
    }

    #[test]
    fn test_from_rel_ref() {
        let uri = PackURI::from_rel_ref("/word", "media/image1.png");
        assert_eq!(uri.membername(), "word/media/image1.png");

        let uri = PackURI::from_rel_ref("/word", "../customXml/item1.xml");
        assert_eq!(uri.as_str(), "/customXml/item1.xml");

        let uri = PackURI::from_rel_ref("/word", "/word/media/image2.png");
        assert_eq!(uri.as_str(), "/word/media/image2.png");

        let uri = PackURI::from_rel_ref("/word", "./media//image3.png");
        assert_eq!(uri.as_str(), "/word/media/image3.png");
    }

    #[test]
    fn test_relative_ref() {
        let uri = PackURI::from_membername("word/numbering.xml");
        assert_eq!(uri.relative_ref("/word"), "numbering.xml");
        assert_eq!(uri.relative_ref("/customXml"), "../word/numbering.xml");
        assert_eq!(uri.relative_ref("/"), "word/numbering.xml");
    }
}
