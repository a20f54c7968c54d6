/// Cached XML serialization support.
///
/// This module provides a factory that hands out configured serializer
/// instances and memoizes the configured ones in a process-lifetime
/// concurrent cache. Serialization itself is `quick-xml`'s; the wrapper only
/// carries the configuration (root-element override, indentation, namespace
/// declarations) that is not derivable from the item type.
///
/// Serializers obtained with a root override are cached under the composite
/// key `(item type, root override)`, with structural equality of the
/// override. Serializers built from an open-ended [`XmlOverrides`] set are
/// cached under an explicit caller-chosen key instead, because the override
/// set has no useful equality of its own. Entries are never evicted; the
/// expected type cardinality is low.
///
/// # Examples
///
/// ```
/// use serde::{Deserialize, Serialize};
/// use xml_kit::serializer::{XmlRoot, XmlSerializerFactory};
///
/// #[derive(Debug, Serialize, Deserialize, PartialEq)]
/// struct Product {
///     name: String,
///     price: f64,
/// }
///
/// let factory = XmlSerializerFactory::new();
///
/// // A cached serializer with a root override.
/// let serializer = factory
///     .create_with_root::<Product>(&XmlRoot::new("product"))
///     .unwrap();
///
/// let product = Product {
///     name: "Wireless Headphones".to_string(),
///     price: 79.99,
/// };
///
/// let xml = serializer.to_string(&product).unwrap();
/// assert_eq!(
///     xml,
///     "<product><name>Wireless Headphones</name><price>79.99</price></product>"
/// );
///
/// // Deserialization goes through the same instance.
/// let back: Product = serializer.from_str(&xml).unwrap();
/// assert_eq!(back, product);
/// ```
pub mod factory;
pub mod xml_serializer;

pub use factory::XmlSerializerFactory;
pub use xml_serializer::{XmlOverrides, XmlRoot, XmlSerializer};
