use anyhow::Result;
use log::info;
use rand::RngExt;
use std::sync::Arc;
use xml_kit::xsl::{
    ExtensionProvider, ParamValue, TransformArguments, Transformer, TransformerSettings,
    XmlDocument,
};

const STYLESHEET: &str = r#"<xsl:stylesheet version="1.0"
    xmlns:xsl="http://www.w3.org/1999/XSL/Transform">
  <xsl:param name="title" select="'untitled'"/>
  <xsl:param name="numbers"/>
  <xsl:template match="/">
    <report>
      <title><xsl:value-of select="$title"/></title>
      <xsl:for-each select="$numbers//Number">
        <value><xsl:value-of select="."/></value>
      </xsl:for-each>
    </report>
  </xsl:template>
</xsl:stylesheet>"#;

/// Contributes a fragment of random numbers under the `urn:report`
/// namespace.
struct RandomNumbers {
    min: i32,
    max: i32,
    count: usize,
}

impl ExtensionProvider for RandomNumbers {
    fn namespace_uri(&self) -> &str {
        "urn:report"
    }

    fn values(&self) -> Vec<(String, ParamValue)> {
        let mut rng = rand::rng();
        let mut xml = String::from("<Numbers>");
        for _ in 0..self.count {
            let number = rng.random_range(self.min..self.max);
            xml.push_str(&format!("<Number>{}</Number>", number));
        }
        xml.push_str("</Numbers>");

        let fragment = XmlDocument::parse_str(&xml).expect("generated fragment is well-formed");
        vec![("numbers".to_string(), ParamValue::Nodes(fragment))]
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let settings = TransformerSettings::builder().messages(true).build();
    let mut transformer = Transformer::new(settings);
    transformer.load_str(STYLESHEET)?;
    info!(
        "stylesheet loaded, output method: {:?}",
        transformer.output_settings()?.method()
    );

    let mut arguments = TransformArguments::new();
    arguments.parameters_mut().add("title", "Nightly numbers");
    arguments.add_provider(Arc::new(RandomNumbers {
        min: 1,
        max: 100,
        count: 5,
    }));

    let input = XmlDocument::parse_str("<report-request/>")?;
    let output = transformer.transform(&input, Some(&arguments))?;
    println!("{}", output);

    Ok(())
}
