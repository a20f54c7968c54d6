//! Mock version of xml_kit::xsl::DocumentResolver;
use mockall::mock;

use xml_kit::error::XmlError;
use xml_kit::xsl::DocumentResolver;

mock! {
    pub Resolver {}
    impl DocumentResolver for Resolver {
        fn resolve(&self, uri: &str) -> Result<String, XmlError>;
    }
}
