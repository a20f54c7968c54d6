use crate::error::XmlError;
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};

/// Resolves a URI to XML document text.
///
/// The transformer consults its resolver when a stylesheet is loaded by URI,
/// when a stylesheet pulls another in via `xsl:include` or `xsl:import`, and
/// (if the document function is enabled on the settings) for `document()`
/// calls during execution. Implementations decide which URI schemes they
/// accept.
pub trait DocumentResolver: Send + Sync {
    /// Returns the document text the URI refers to.
    fn resolve(&self, uri: &str) -> Result<String, XmlError>;
}

/// The default resolver: reads filesystem paths and `file://` URIs,
/// resolving relative paths against an optional base directory.
#[derive(Debug, Clone, Default)]
pub struct FileResolver {
    base: Option<PathBuf>,
}

impl FileResolver {
    /// A resolver without a base directory; relative paths resolve against
    /// the current working directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// A resolver that resolves relative paths against `base`.
    pub fn with_base<P: AsRef<Path>>(base: P) -> Self {
        Self {
            base: Some(base.as_ref().to_path_buf()),
        }
    }
}

impl DocumentResolver for FileResolver {
    fn resolve(&self, uri: &str) -> Result<String, XmlError> {
        let path = match uri.strip_prefix("file://") {
            Some(rest) => PathBuf::from(rest),
            None => PathBuf::from(uri),
        };
        let path = match &self.base {
            Some(base) if path.is_relative() => base.join(path),
            _ => path,
        };
        debug!("resolving document at {}", path.display());
        fs::read_to_string(&path)
            .map_err(|e| XmlError::Resolver(format!("cannot read '{}': {}", path.display(), e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{NamedTempFile, tempdir};

    #[test]
    fn resolves_an_absolute_path() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"<root/>").unwrap();

        let resolver = FileResolver::new();
        let text = resolver.resolve(file.path().to_str().unwrap()).unwrap();
        assert_eq!(text, "<root/>");
    }

    #[test]
    fn resolves_relative_paths_against_the_base() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("other.xml"), "<other/>").unwrap();

        let resolver = FileResolver::with_base(dir.path());
        assert_eq!(resolver.resolve("other.xml").unwrap(), "<other/>");
    }

    #[test]
    fn strips_the_file_scheme() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"<root/>").unwrap();

        let resolver = FileResolver::new();
        let uri = format!("file://{}", file.path().display());
        assert_eq!(resolver.resolve(&uri).unwrap(), "<root/>");
    }

    #[test]
    fn missing_target_is_a_resolver_error() {
        let resolver = FileResolver::new();
        let result = resolver.resolve("/nonexistent/stylesheet.xslt");
        assert!(matches!(result, Err(XmlError::Resolver(_))));
    }
}
