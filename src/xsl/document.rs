use crate::error::XmlError;
use log::error;
use std::fmt;
use std::fs;
use std::io::Read;
use std::path::Path;
use xrust::Node;
use xrust::parser::xml::parse;
use xrust::trees::smite::RNode;

/// A parsed, navigable XML document.
///
/// Used both for transform input and for stylesheets handed to
/// [`Transformer::load`](super::Transformer::load). Parsing is the engine's;
/// this type only carries the document tree. Cloning is cheap (the tree is
/// reference counted) and clones share the same underlying nodes.
///
/// # Examples
///
/// ```
/// use xml_kit::xsl::XmlDocument;
///
/// let document = XmlDocument::parse_str("<catalog><product id=\"P001\"/></catalog>").unwrap();
/// let clone = document.clone();
/// # let _ = clone;
/// ```
#[derive(Clone)]
pub struct XmlDocument {
    node: RNode,
}

impl XmlDocument {
    /// Parses a document from XML text.
    pub fn parse_str(text: &str) -> Result<Self, XmlError> {
        let doc = RNode::new_document();
        parse(doc.clone(), text, None).map_err(|e| {
            error!("failed to parse XML document: {}", e);
            XmlError::Parse(e.to_string())
        })?;
        Ok(Self { node: doc })
    }

    /// Reads `reader` to the end and parses the text as a document.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self, XmlError> {
        let mut text = String::new();
        reader.read_to_string(&mut text)?;
        Self::parse_str(&text)
    }

    /// Parses the file at `path` as a document.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, XmlError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| {
            error!("failed to read XML file {}: {}", path.display(), e);
            XmlError::Io(e)
        })?;
        Self::parse_str(&text)
    }

    /// The engine node backing this document.
    pub(crate) fn node(&self) -> RNode {
        self.node.clone()
    }
}

impl fmt::Debug for XmlDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("XmlDocument").finish_non_exhaustive()
    }
}
