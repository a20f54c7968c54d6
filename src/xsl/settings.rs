use super::resolver::{DocumentResolver, FileResolver};
use std::fmt;
use std::sync::Arc;

/// The features a transformer supports while compiling and executing a
/// stylesheet.
///
/// Settings are read-only once built: the [`Transformer`](super::Transformer)
/// consumes them at construction and exposes them by shared reference only,
/// so a stylesheet cannot have its environment changed under it mid-flight.
///
/// # Examples
///
/// ```
/// use xml_kit::xsl::{FileResolver, TransformerSettings};
/// use std::sync::Arc;
///
/// let settings = TransformerSettings::builder()
///     .document_function(true)
///     .messages(true)
///     .resolver(Arc::new(FileResolver::with_base("stylesheets")))
///     .build();
///
/// assert!(settings.document_function());
/// assert!(settings.messages());
/// ```
pub struct TransformerSettings {
    document_function: bool,
    messages: bool,
    resolver: Arc<dyn DocumentResolver>,
}

impl TransformerSettings {
    /// Starts building a settings object.
    pub fn builder() -> TransformerSettingsBuilder {
        TransformerSettingsBuilder::new()
    }

    /// Whether `document()` calls may fetch external documents through the
    /// resolver during execution.
    pub fn document_function(&self) -> bool {
        self.document_function
    }

    /// Whether `xsl:message` output is routed to the log at debug level.
    pub fn messages(&self) -> bool {
        self.messages
    }

    /// The resolver used for external documents.
    pub fn resolver(&self) -> &Arc<dyn DocumentResolver> {
        &self.resolver
    }
}

impl Default for TransformerSettings {
    fn default() -> Self {
        TransformerSettingsBuilder::new().build()
    }
}

impl fmt::Debug for TransformerSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransformerSettings")
            .field("document_function", &self.document_function)
            .field("messages", &self.messages)
            .finish_non_exhaustive()
    }
}

/// Builder for [`TransformerSettings`].
#[derive(Default)]
pub struct TransformerSettingsBuilder {
    document_function: bool,
    messages: bool,
    resolver: Option<Arc<dyn DocumentResolver>>,
}

impl TransformerSettingsBuilder {
    /// Creates a builder with all features disabled and no resolver.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables support for the `document()` function.
    pub fn document_function(mut self, enable: bool) -> Self {
        self.document_function = enable;
        self
    }

    /// Routes `xsl:message` output to the log at debug level.
    pub fn messages(mut self, enable: bool) -> Self {
        self.messages = enable;
        self
    }

    /// Sets the resolver used for external documents.
    pub fn resolver(mut self, resolver: Arc<dyn DocumentResolver>) -> Self {
        self.resolver = Some(resolver);
        self
    }

    /// Builds the settings.
    ///
    /// The transformer always has a resolver; when none was supplied the
    /// filesystem resolver is used.
    pub fn build(self) -> TransformerSettings {
        TransformerSettings {
            document_function: self.document_function,
            messages: self.messages,
            resolver: self
                .resolver
                .unwrap_or_else(|| Arc::new(FileResolver::new())),
        }
    }
}
