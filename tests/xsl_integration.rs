pub mod common;

use std::fs;
use std::sync::Arc;

use common::mocks::MockResolver;
use mockall::predicate;
use tempfile::tempdir;
use xml_kit::error::XmlError;
use xml_kit::xsl::{
    ExtensionProvider, FileResolver, ParamValue, TransformArguments, Transformer,
    TransformerSettings, XmlDocument,
};

const LISTING: &str = r#"<xsl:stylesheet version="1.0"
    xmlns:xsl="http://www.w3.org/1999/XSL/Transform">
  <xsl:template match="/">
    <report><xsl:apply-templates select="//item"/></report>
  </xsl:template>
  <xsl:template match="item">
    <line><xsl:value-of select="."/></line>
  </xsl:template>
</xsl:stylesheet>"#;

const GREETING: &str = r#"<xsl:stylesheet version="1.0"
    xmlns:xsl="http://www.w3.org/1999/XSL/Transform">
  <xsl:param name="greeting" select="'missing'"/>
  <xsl:template match="/">
    <out><xsl:value-of select="$greeting"/></out>
  </xsl:template>
</xsl:stylesheet>"#;

struct BuildStamp;

impl ExtensionProvider for BuildStamp {
    fn namespace_uri(&self) -> &str {
        "urn:build"
    }

    fn values(&self) -> Vec<(String, ParamValue)> {
        vec![("stamp".to_string(), ParamValue::from("build-42"))]
    }
}

struct StampImpostor;

impl ExtensionProvider for StampImpostor {
    fn namespace_uri(&self) -> &str {
        "urn:build"
    }

    fn values(&self) -> Vec<(String, ParamValue)> {
        vec![("stamp".to_string(), ParamValue::from("other"))]
    }
}

#[test]
fn transforms_items_into_report_lines() {
    let mut transformer = Transformer::default();
    transformer.load_str(LISTING).unwrap();

    let input = XmlDocument::parse_str("<items><item>alpha</item><item>beta</item></items>").unwrap();
    let output = transformer.transform(&input, None).unwrap();

    assert!(output.contains("<line>alpha</line>"));
    assert!(output.contains("<line>beta</line>"));
}

#[test]
fn the_loaded_stylesheet_is_reusable_across_inputs() {
    let mut transformer = Transformer::default();
    transformer.load_str(LISTING).unwrap();

    let first = transformer
        .transform_str("<items><item>one</item></items>", None)
        .unwrap();
    let second = transformer
        .transform_str("<items><item>two</item></items>", None)
        .unwrap();

    assert!(first.contains("<line>one</line>"));
    assert!(second.contains("<line>two</line>"));
}

#[test]
fn parameters_reach_the_stylesheet() {
    let mut transformer = Transformer::default();
    transformer.load_str(GREETING).unwrap();

    let mut arguments = TransformArguments::new();
    arguments.parameters_mut().add("greeting", "hello");

    let output = transformer
        .transform_str("<root/>", Some(&arguments))
        .unwrap();
    assert!(output.contains("hello"));
    assert!(!output.contains("missing"));
}

#[test]
fn extension_provider_values_reach_the_stylesheet() {
    let stylesheet = r#"<xsl:stylesheet version="1.0"
        xmlns:xsl="http://www.w3.org/1999/XSL/Transform">
      <xsl:param name="stamp" select="'unstamped'"/>
      <xsl:template match="/">
        <out><xsl:value-of select="$stamp"/></out>
      </xsl:template>
    </xsl:stylesheet>"#;

    let mut transformer = Transformer::default();
    transformer.load_str(stylesheet).unwrap();

    let mut arguments = TransformArguments::new();
    arguments.add_provider(Arc::new(BuildStamp));

    let output = transformer
        .transform_str("<root/>", Some(&arguments))
        .unwrap();
    assert!(output.contains("build-42"));
}

#[test]
fn conflicting_extension_namespaces_fail_the_transform() {
    let mut transformer = Transformer::default();
    transformer.load_str(LISTING).unwrap();

    let mut arguments = TransformArguments::new();
    arguments.add_provider(Arc::new(BuildStamp));
    arguments.add_provider(Arc::new(StampImpostor));

    let result = transformer.transform_str("<items/>", Some(&arguments));
    assert!(matches!(
        result,
        Err(XmlError::DuplicateNamespace { namespace }) if namespace == "urn:build"
    ));
}

#[test]
fn transform_before_load_is_rejected() {
    let transformer = Transformer::default();
    let result = transformer.transform_str("<root/>", None);
    assert!(matches!(result, Err(XmlError::MethodCallRequired("load"))));
}

#[test]
fn stylesheets_load_through_the_resolver_by_uri() {
    let mut resolver = MockResolver::new();
    resolver
        .expect_resolve()
        .with(predicate::eq("urn:stylesheets:listing"))
        .times(1)
        .returning(|_| Ok(LISTING.to_string()));

    let settings = TransformerSettings::builder()
        .resolver(Arc::new(resolver))
        .build();
    let mut transformer = Transformer::new(settings);
    transformer.load_uri("urn:stylesheets:listing").unwrap();

    let output = transformer
        .transform_str("<items><item>via uri</item></items>", None)
        .unwrap();
    assert!(output.contains("<line>via uri</line>"));
}

#[test]
fn a_failing_resolver_surfaces_as_a_resolver_error() {
    let mut resolver = MockResolver::new();
    resolver
        .expect_resolve()
        .returning(|uri| Err(XmlError::Resolver(format!("unknown uri '{}'", uri))));

    let settings = TransformerSettings::builder()
        .resolver(Arc::new(resolver))
        .build();
    let mut transformer = Transformer::new(settings);

    let result = transformer.load_uri("urn:stylesheets:absent");
    assert!(matches!(result, Err(XmlError::Resolver(_))));
}

#[test]
fn included_stylesheets_resolve_through_the_file_resolver() {
    let dir = tempdir().unwrap();
    let fragment_path = dir.path().join("lines.xslt");
    fs::write(
        &fragment_path,
        r#"<xsl:stylesheet version="1.0"
            xmlns:xsl="http://www.w3.org/1999/XSL/Transform">
          <xsl:template match="item">
            <line><xsl:value-of select="."/></line>
          </xsl:template>
        </xsl:stylesheet>"#,
    )
    .unwrap();

    let stylesheet = format!(
        r#"<xsl:stylesheet version="1.0"
            xmlns:xsl="http://www.w3.org/1999/XSL/Transform">
          <xsl:include href="file://{}"/>
          <xsl:template match="/">
            <report><xsl:apply-templates select="//item"/></report>
          </xsl:template>
        </xsl:stylesheet>"#,
        fragment_path.display()
    );

    let mut transformer = Transformer::default();
    transformer.load_str(&stylesheet).unwrap();

    let output = transformer
        .transform_str("<items><item>included</item></items>", None)
        .unwrap();
    assert!(output.contains("<line>included</line>"));
}

#[test]
fn the_document_function_fetches_through_the_resolver_when_enabled() {
    let dir = tempdir().unwrap();
    let lookup_path = dir.path().join("departments.xml");
    fs::write(
        &lookup_path,
        "<departments><department>Engineering</department></departments>",
    )
    .unwrap();

    let stylesheet = format!(
        r#"<xsl:stylesheet version="1.0"
            xmlns:xsl="http://www.w3.org/1999/XSL/Transform">
          <xsl:template match="/">
            <out><xsl:copy-of select="document('file://{}')"/></out>
          </xsl:template>
        </xsl:stylesheet>"#,
        lookup_path.display()
    );

    let settings = TransformerSettings::builder()
        .document_function(true)
        .resolver(Arc::new(FileResolver::new()))
        .build();
    let mut transformer = Transformer::new(settings);
    transformer.load_str(&stylesheet).unwrap();

    let output = transformer.transform_str("<root/>", None).unwrap();
    assert!(output.contains("Engineering"));
}

#[test]
fn the_document_function_is_refused_when_disabled() {
    let dir = tempdir().unwrap();
    let lookup_path = dir.path().join("departments.xml");
    fs::write(&lookup_path, "<departments/>").unwrap();

    let stylesheet = format!(
        r#"<xsl:stylesheet version="1.0"
            xmlns:xsl="http://www.w3.org/1999/XSL/Transform">
          <xsl:template match="/">
            <out><xsl:copy-of select="document('file://{}')"/></out>
          </xsl:template>
        </xsl:stylesheet>"#,
        lookup_path.display()
    );

    let mut transformer = Transformer::default();
    transformer.load_str(&stylesheet).unwrap();

    // Disabled document() must not silently read the file; the engine
    // reports the refused fetch as a transform failure.
    let result = transformer.transform_str("<root/>", None);
    assert!(result.is_err());
}
