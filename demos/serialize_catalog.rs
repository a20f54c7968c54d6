use anyhow::Result;
use log::info;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use xml_kit::serializer::{XmlOverrides, XmlRoot, XmlSerializerFactory};

#[derive(Debug, Serialize, Deserialize, PartialEq)]
struct Product {
    #[serde(rename = "@id")]
    id: String,
    name: String,
    price: f64,
}

fn main() -> Result<()> {
    env_logger::init();

    let factory = XmlSerializerFactory::global();

    // Every caller asking for this configuration gets the same shared
    // serializer instance.
    let root = XmlRoot::new("product").with_namespace("urn:catalog");
    let serializer = factory.create_with_root::<Product>(&root)?;
    let again = factory.create_with_root::<Product>(&root)?;
    info!(
        "root-override serializer shared: {}",
        Arc::ptr_eq(&serializer, &again)
    );

    let product = Product {
        id: "P001".to_string(),
        name: "Wireless Headphones".to_string(),
        price: 79.99,
    };

    let xml = serializer.to_string(&product)?;
    println!("compact:\n{}\n", xml);

    // An open-ended override set has no equality of its own, so it is cached
    // under an explicit key.
    let overrides = XmlOverrides::new()
        .root(XmlRoot::new("product"))
        .xml_declaration(true)
        .indent(' ', 2);
    let pretty = factory.create_with_overrides::<Product>("catalog-pretty", &overrides)?;
    println!("pretty:\n{}\n", pretty.to_string(&product)?);

    // Round trip through the shared instance.
    let back: Product = serializer.from_str(&xml)?;
    println!("round-tripped: {:?}", back);

    Ok(())
}
