/// Stylesheet transformation support.
///
/// This module wraps the `xrust` XSLT engine behind a small, overload-rich
/// surface: load a stylesheet from a parsed document, file, URI, reader or
/// string; run it over an input document; send the result to a `String` or
/// any `io::Write` sink. Parameters and namespaced extension values are
/// collected in [`TransformArguments`] and marshalled into the engine per
/// run. Compilation and execution semantics are entirely the engine's.
///
/// External resources (a stylesheet loaded by URI, `xsl:include` and
/// `xsl:import` pulls, and `document()` calls at execution time) go through
/// the [`DocumentResolver`] configured on [`TransformerSettings`]; the
/// default resolver reads from the filesystem.
///
/// # Examples
///
/// ```no_run
/// use xml_kit::error::XmlError;
/// use xml_kit::xsl::{Transformer, TransformerSettings, XmlDocument};
///
/// fn main() -> Result<(), XmlError> {
///     let mut transformer = Transformer::new(TransformerSettings::default());
///     transformer.load_path("stylesheets/report.xslt")?;
///
///     let input = XmlDocument::parse_str("<data><item>a</item></data>")?;
///     let html = transformer.transform(&input, None)?;
///     println!("{}", html);
///     Ok(())
/// }
/// ```
pub mod arguments;
pub mod document;
pub mod resolver;
pub mod settings;
pub mod transformer;

pub use arguments::{ExtensionProvider, ParamValue, ParameterCollection, TransformArguments};
pub use document::XmlDocument;
pub use resolver::{DocumentResolver, FileResolver};
pub use settings::{TransformerSettings, TransformerSettingsBuilder};
pub use transformer::{OutputSettings, Transformer};
