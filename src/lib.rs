#![cfg_attr(docsrs, feature(doc_cfg))]

/*!
 # xml-kit

 Thin convenience wrappers around the Rust XML ecosystem: a cached
 serializer factory on top of `serde` + `quick-xml`, and a stylesheet
 transformation wrapper on top of the `xrust` XSLT engine. The crate adds no
 XML semantics of its own; parsing, serialization, XPath evaluation and XSLT
 execution all happen in the underlying engines.

 What the wrappers do add:

 - **A concurrent serializer cache.** Serializers configured with a root
   override or an open-ended override set are constructed once per
   `(type, configuration)` key and shared for the lifetime of the process.
 - **A read-only settings façade.** A transformer is configured once, up
   front; its settings are observable but can no longer be changed.
 - **Convenience overloads.** Stylesheets load from documents, files, URIs,
   readers or in-memory text; transform output goes to a `String` or any
   `io::Write` sink; parameters and namespaced extension values are
   marshalled into the engine per run.

 ## Features

 The crate is modular, allowing you to enable only the features you need:

 | **Feature**   | **Description**                                              |
 |---------------|--------------------------------------------------------------|
 | serializer    | Enables the cached XML serializer factory (`quick-xml`)      |
 | xslt          | Enables the stylesheet transformation wrappers (`xrust`)     |
 | full          | Enables all available features                               |

 ## Getting Started

 Make sure you activated the suitable features on Cargo.toml:

```toml
[dependencies]
xml-kit = { version = "<version>", features = ["<full|serializer|xslt>"] }
```

 Then, serializing with a shared, cached serializer:

```rust
use serde::Serialize;
use std::sync::Arc;
use xml_kit::error::XmlError;
use xml_kit::serializer::{XmlRoot, XmlSerializerFactory};

#[derive(Serialize)]
struct Car {
    make: String,
    year: u16,
}

fn main() -> Result<(), XmlError> {
    let factory = XmlSerializerFactory::global();

    let root = XmlRoot::new("vehicle").with_namespace("urn:cars");
    let serializer = factory.create_with_root::<Car>(&root)?;

    let xml = serializer.to_string(&Car {
        make: "Mazda".to_string(),
        year: 2021,
    })?;
    assert!(xml.starts_with("<vehicle"));
    assert!(xml.contains("xmlns=\"urn:cars\""));

    // Structurally equal keys share one instance.
    let again =
        factory.create_with_root::<Car>(&XmlRoot::new("vehicle").with_namespace("urn:cars"))?;
    assert!(Arc::ptr_eq(&serializer, &again));

    Ok(())
}
```

 ## License
 Licensed under either of

 -   Apache License, Version 2.0
     ([LICENSE-APACHE](LICENSE-APACHE) or <http://www.apache.org/licenses/LICENSE-2.0>)
 -   MIT license
     ([LICENSE-MIT](LICENSE-MIT) or <http://opensource.org/licenses/MIT>)

 at your option.
 */

/// Error types for the XML wrappers
pub mod error;

#[doc(inline)]
pub use error::*;

/// Cached XML serializer factory
#[cfg(feature = "serializer")]
pub mod serializer;

/// Stylesheet transformation wrappers
#[cfg(feature = "xslt")]
pub mod xsl;
