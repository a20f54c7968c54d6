use anyhow::Result;
use log::info;
use std::fs;
use std::sync::Arc;
use xml_kit::xsl::{FileResolver, Transformer, TransformerSettings, XmlDocument};

fn main() -> Result<()> {
    env_logger::init();

    // A second document the stylesheet pulls in with document().
    let dir = tempfile::tempdir()?;
    let departments = dir.path().join("departments.xml");
    fs::write(
        &departments,
        "<departments>\
           <department id=\"d1\">Engineering</department>\
           <department id=\"d2\">Support</department>\
         </departments>",
    )?;
    info!("wrote lookup document to {}", departments.display());

    let stylesheet = format!(
        r#"<xsl:stylesheet version="1.0"
            xmlns:xsl="http://www.w3.org/1999/XSL/Transform">
          <xsl:template match="/">
            <staff>
              <xsl:copy-of select="document('file://{}')//department"/>
            </staff>
          </xsl:template>
        </xsl:stylesheet>"#,
        departments.display()
    );

    let settings = TransformerSettings::builder()
        .document_function(true)
        .resolver(Arc::new(FileResolver::new()))
        .build();
    let mut transformer = Transformer::new(settings);
    transformer.load_str(&stylesheet)?;

    let input = XmlDocument::parse_str("<root/>")?;
    let output = transformer.transform(&input, None)?;
    println!("{}", output);

    Ok(())
}
