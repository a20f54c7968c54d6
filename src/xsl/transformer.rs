use super::arguments::{ParamValue, TransformArguments};
use super::document::XmlDocument;
use super::settings::TransformerSettings;
use crate::error::XmlError;
use log::{debug, error};
use std::io::{Read, Write};
use std::path::Path;
use std::rc::Rc;
use std::sync::Arc;
use xrust::item::{Item, Node, SequenceTrait};
use xrust::parser::xml::parse;
use xrust::transform::context::{Context, ContextBuilder, StaticContextBuilder};
use xrust::trees::smite::RNode;
use xrust::value::Value;
use xrust::xslt::from_document;
use xrust::{Error as EngineError, ErrorKind};

/// Output information derived from the stylesheet's `xsl:output` element.
///
/// Available once a stylesheet has been loaded; callers producing output
/// themselves can consult it to match what the stylesheet asked for.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputSettings {
    method: Option<String>,
    encoding: Option<String>,
    indent: bool,
    omit_xml_declaration: bool,
}

impl OutputSettings {
    /// The requested output method (`xml`, `html`, `text`), if declared.
    pub fn method(&self) -> Option<&str> {
        self.method.as_deref()
    }

    /// The requested output encoding, if declared.
    pub fn encoding(&self) -> Option<&str> {
        self.encoding.as_deref()
    }

    /// Whether the stylesheet asked for indented output.
    pub fn indent(&self) -> bool {
        self.indent
    }

    /// Whether the stylesheet asked to omit the XML declaration.
    pub fn omit_xml_declaration(&self) -> bool {
        self.omit_xml_declaration
    }
}

/// A wrapper that organizes and simplifies stylesheet compilation and
/// execution on top of the `xrust` engine.
///
/// The life cycle is load-then-transform: one of the `load*` methods parses
/// and installs a stylesheet (surfacing compilation problems immediately),
/// after which any number of `transform*` calls run it over input documents.
/// Calling a transform method, or [`output_settings`](Self::output_settings),
/// before a load is an error.
///
/// # Examples
///
/// ```
/// use xml_kit::error::XmlError;
/// use xml_kit::xsl::{Transformer, TransformerSettings, XmlDocument};
///
/// fn main() -> Result<(), XmlError> {
///     let stylesheet = r#"<xsl:stylesheet version="1.0"
///         xmlns:xsl="http://www.w3.org/1999/XSL/Transform">
///       <xsl:template match="/">
///         <greeting><xsl:value-of select="/name"/></greeting>
///       </xsl:template>
///     </xsl:stylesheet>"#;
///
///     let mut transformer = Transformer::new(TransformerSettings::default());
///     transformer.load_str(stylesheet)?;
///
///     let input = XmlDocument::parse_str("<name>world</name>")?;
///     let output = transformer.transform(&input, None)?;
///     assert!(output.contains("world"));
///     Ok(())
/// }
/// ```
pub struct Transformer {
    settings: TransformerSettings,
    stylesheet: Option<XmlDocument>,
    output_settings: Option<OutputSettings>,
}

impl Transformer {
    /// Creates a transformer configured by `settings`.
    ///
    /// The settings are consumed; they stay observable through
    /// [`settings`](Self::settings) but can no longer be changed.
    pub fn new(settings: TransformerSettings) -> Self {
        Self {
            settings,
            stylesheet: None,
            output_settings: None,
        }
    }

    /// The features this transformer supports, read-only.
    pub fn settings(&self) -> &TransformerSettings {
        &self.settings
    }

    /// Output information from the loaded stylesheet's `xsl:output` element.
    ///
    /// # Errors
    ///
    /// [`XmlError::MethodCallRequired`] until a `load*` method has been
    /// called.
    pub fn output_settings(&self) -> Result<&OutputSettings, XmlError> {
        self.output_settings
            .as_ref()
            .ok_or(XmlError::MethodCallRequired("load"))
    }

    /// Loads the stylesheet contained in an already parsed document.
    pub fn load(&mut self, stylesheet: &XmlDocument) -> Result<(), XmlError> {
        self.install(stylesheet.clone())
    }

    /// Loads the stylesheet from XML text.
    pub fn load_str(&mut self, stylesheet: &str) -> Result<(), XmlError> {
        self.install(XmlDocument::parse_str(stylesheet)?)
    }

    /// Loads the stylesheet from a reader.
    pub fn load_reader<R: Read>(&mut self, stylesheet: R) -> Result<(), XmlError> {
        self.install(XmlDocument::from_reader(stylesheet)?)
    }

    /// Loads the stylesheet from a file.
    pub fn load_path<P: AsRef<Path>>(&mut self, stylesheet: P) -> Result<(), XmlError> {
        self.install(XmlDocument::from_path(stylesheet)?)
    }

    /// Loads the stylesheet located at a URI, through the configured
    /// resolver.
    pub fn load_uri(&mut self, stylesheet_uri: &str) -> Result<(), XmlError> {
        let text = self.settings.resolver().resolve(stylesheet_uri)?;
        self.install(XmlDocument::parse_str(&text)?)
    }

    /// Transforms a parsed input document and returns the result as text.
    pub fn transform(
        &self,
        input: &XmlDocument,
        arguments: Option<&TransformArguments>,
    ) -> Result<String, XmlError> {
        self.execute(input.node(), arguments)
    }

    /// Transforms a parsed input document into an output sink.
    pub fn transform_to_writer<W: Write>(
        &self,
        input: &XmlDocument,
        result: W,
        arguments: Option<&TransformArguments>,
    ) -> Result<(), XmlError> {
        let text = self.execute(input.node(), arguments)?;
        write_text(result, &text)
    }

    /// Transforms input XML text and returns the result as text.
    pub fn transform_str(
        &self,
        input: &str,
        arguments: Option<&TransformArguments>,
    ) -> Result<String, XmlError> {
        let document = XmlDocument::parse_str(input)?;
        self.execute(document.node(), arguments)
    }

    /// Transforms the input document read from `input` and returns the
    /// result as text.
    pub fn transform_reader<R: Read>(
        &self,
        input: R,
        arguments: Option<&TransformArguments>,
    ) -> Result<String, XmlError> {
        let document = XmlDocument::from_reader(input)?;
        self.execute(document.node(), arguments)
    }

    /// Transforms the input document read from `input` into an output sink.
    pub fn transform_reader_to_writer<R: Read, W: Write>(
        &self,
        input: R,
        result: W,
        arguments: Option<&TransformArguments>,
    ) -> Result<(), XmlError> {
        let document = XmlDocument::from_reader(input)?;
        let text = self.execute(document.node(), arguments)?;
        write_text(result, &text)
    }

    /// Transforms the input document located at a URI, through the
    /// configured resolver, and returns the result as text.
    pub fn transform_uri(
        &self,
        input_uri: &str,
        arguments: Option<&TransformArguments>,
    ) -> Result<String, XmlError> {
        let text = self.settings.resolver().resolve(input_uri)?;
        let document = XmlDocument::parse_str(&text)?;
        self.execute(document.node(), arguments)
    }

    /// Transforms the input document located at a URI into an output sink.
    pub fn transform_uri_to_writer<W: Write>(
        &self,
        input_uri: &str,
        result: W,
        arguments: Option<&TransformArguments>,
    ) -> Result<(), XmlError> {
        let text = self.transform_uri(input_uri, arguments)?;
        write_text(result, &text)
    }

    /// Installs a parsed stylesheet: compiles it once to surface errors at
    /// load time, and derives the output settings.
    fn install(&mut self, stylesheet: XmlDocument) -> Result<(), XmlError> {
        let output_settings = extract_output_settings(&stylesheet);
        self.stylesheet = Some(stylesheet);
        self.output_settings = None;
        if let Err(e) = self.compile() {
            self.stylesheet = None;
            return Err(e);
        }
        debug!(
            "stylesheet loaded, output method {:?}",
            output_settings.method()
        );
        self.output_settings = Some(output_settings);
        Ok(())
    }

    /// Compiles the loaded stylesheet. `xsl:include` and `xsl:import` pulls
    /// are routed through the configured resolver.
    fn compile(&self) -> Result<Context<RNode>, XmlError> {
        let stylesheet = self
            .stylesheet
            .as_ref()
            .ok_or(XmlError::MethodCallRequired("load"))?;
        let resolver = Arc::clone(self.settings.resolver());

        from_document(stylesheet.node(), None, parse_rnode, move |url| {
            let text = resolver.resolve(url.as_str()).map_err(engine_error)?;
            Ok(text)
        })
        .map_err(|e| {
            error!("failed to compile stylesheet: {}", e);
            XmlError::Transform(e.to_string())
        })
    }

    fn execute(
        &self,
        source: RNode,
        arguments: Option<&TransformArguments>,
    ) -> Result<String, XmlError> {
        let compiled = self.compile()?;

        let mut builder = ContextBuilder::from(&compiled)
            .context(vec![Item::Node(source)])
            .result_document(RNode::new_document());
        if let Some(arguments) = arguments {
            for (name, value) in arguments.bindings()? {
                builder = builder.variable(name, param_to_sequence(value));
            }
        }
        let mut context = builder.build();

        let resolver = Arc::clone(self.settings.resolver());
        let document_function = self.settings.document_function();
        let messages = self.settings.messages();
        let mut static_context = StaticContextBuilder::new()
            .message(move |message| {
                if messages {
                    debug!("xsl:message: {}", message);
                }
                Ok(())
            })
            .fetcher(move |url| {
                if document_function {
                    resolver.resolve(url.as_str()).map_err(engine_error)
                } else {
                    Err(EngineError::new(
                        ErrorKind::Unknown,
                        "the document function is disabled".to_string(),
                    ))
                }
            })
            .parser(|text| parse_rnode(text))
            .build();

        let sequence = context.evaluate(&mut static_context).map_err(|e| {
            error!("transform failed: {}", e);
            XmlError::Transform(e.to_string())
        })?;
        Ok(sequence.to_xml())
    }
}

impl Default for Transformer {
    fn default() -> Self {
        Self::new(TransformerSettings::default())
    }
}

fn write_text<W: Write>(mut sink: W, text: &str) -> Result<(), XmlError> {
    sink.write_all(text.as_bytes())?;
    Ok(())
}

/// Parses text into an engine document node.
fn parse_rnode(text: &str) -> Result<RNode, EngineError> {
    let document = RNode::new_document();
    parse(document.clone(), text, None)?;
    Ok(document)
}

fn engine_error(error: XmlError) -> EngineError {
    EngineError::new(ErrorKind::Unknown, error.to_string())
}

fn param_to_sequence(value: ParamValue) -> Vec<Item<RNode>> {
    match value {
        ParamValue::String(s) => vec![Item::Value(Rc::new(Value::from(s)))],
        ParamValue::Boolean(b) => vec![Item::Value(Rc::new(Value::from(b)))],
        ParamValue::Integer(i) => vec![Item::Value(Rc::new(Value::from(i)))],
        ParamValue::Double(d) => vec![Item::Value(Rc::new(Value::from(d)))],
        ParamValue::Nodes(document) => vec![Item::Node(document.node())],
    }
}

/// Walks the stylesheet for its `xsl:output` element. Prefix handling is by
/// name shape only; the engine is the authority on namespace semantics, this
/// record is informational.
fn extract_output_settings(stylesheet: &XmlDocument) -> OutputSettings {
    let mut settings = OutputSettings::default();

    let document = stylesheet.node();
    let root = document.child_iter().find(|child| {
        let name = local_name(child);
        name == "stylesheet" || name == "transform"
    });
    let Some(root) = root else {
        return settings;
    };

    for child in root.child_iter() {
        if local_name(&child) != "output" {
            continue;
        }
        for attribute in child.attribute_iter() {
            let value = attribute.value().to_string();
            match local_name(&attribute).as_str() {
                "method" => settings.method = Some(value),
                "encoding" => settings.encoding = Some(value),
                "indent" => settings.indent = value == "yes",
                "omit-xml-declaration" => settings.omit_xml_declaration = value == "yes",
                _ => {}
            }
        }
    }
    settings
}

fn local_name(node: &RNode) -> String {
    let name = node.name().to_string();
    name.rsplit(':').next().unwrap_or_default().to_string()
}
