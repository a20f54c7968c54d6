use thiserror::Error;

/// Errors surfaced by the XML wrappers.
///
/// Most variants carry a message straight from the underlying engine; the
/// wrappers only add the argument and sequencing checks documented on the
/// operations that raise them.
#[derive(Error, Debug)]
pub enum XmlError {
    /// Serialization or deserialization failed in the XML engine.
    #[error("Serializer error: {0}")]
    Serializer(String),

    /// Stylesheet compilation or execution failed in the transform engine.
    #[error("Transform error: {0}")]
    Transform(String),

    /// A document could not be parsed as XML.
    #[error("Parse error: {0}")]
    Parse(String),

    /// An operation was invoked before a prerequisite method was called.
    #[error("method '{0}' must be called first")]
    MethodCallRequired(&'static str),

    /// The same namespace was registered by extension providers of different types.
    #[error("namespace '{namespace}' is registered by more than one extension provider type")]
    DuplicateNamespace {
        /// The contested namespace URI.
        namespace: String,
    },

    /// A required argument was empty.
    #[error("invalid argument '{name}': {reason}")]
    InvalidArgument {
        /// Name of the offending argument.
        name: &'static str,
        /// Why the argument was rejected.
        reason: String,
    },

    /// A file or stream could not be read or written.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A URI could not be resolved to a document.
    #[error("Resolver error: {0}")]
    Resolver(String),
}
