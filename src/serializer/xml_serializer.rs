use crate::error::XmlError;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use quick_xml::{Reader, Writer};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::io::{BufRead, Write};

const XSI_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema-instance";

/// Override information for the root element of a serialized document.
///
/// Two overrides with the same element name, namespace, nullability and data
/// type compare equal, and equal overrides map to the same cached serializer
/// instance in [`XmlSerializerFactory`](super::XmlSerializerFactory).
///
/// # Examples
///
/// ```
/// use xml_kit::serializer::XmlRoot;
///
/// let root = XmlRoot::new("invoice")
///     .with_namespace("urn:billing")
///     .with_nullable(true);
///
/// assert_eq!(root.element_name(), "invoice");
/// assert_eq!(root.namespace(), Some("urn:billing"));
/// assert!(root.is_nullable());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct XmlRoot {
    element_name: String,
    namespace: Option<String>,
    nullable: bool,
    data_type: Option<String>,
}

impl XmlRoot {
    /// Creates an override that renames the root element to `element_name`.
    pub fn new<S: AsRef<str>>(element_name: S) -> Self {
        Self {
            element_name: element_name.as_ref().to_string(),
            ..Self::default()
        }
    }

    /// Declares `namespace` as the default namespace of the root element.
    pub fn with_namespace<S: AsRef<str>>(mut self, namespace: S) -> Self {
        self.namespace = Some(namespace.as_ref().to_string());
        self
    }

    /// When `true`, a root element that serialized empty is marked with
    /// `xsi:nil="true"`.
    pub fn with_nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    /// Declares the XSD data type of the root element, emitted as `xsi:type`.
    pub fn with_data_type<S: AsRef<str>>(mut self, data_type: S) -> Self {
        self.data_type = Some(data_type.as_ref().to_string());
        self
    }

    /// The overriding root element name.
    pub fn element_name(&self) -> &str {
        &self.element_name
    }

    /// The default namespace declared on the root, if any.
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// Whether an empty root is marked `xsi:nil`.
    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    /// The XSD data type of the root, if any.
    pub fn data_type(&self) -> Option<&str> {
        self.data_type.as_deref()
    }
}

/// Open-ended serializer configuration that is not derivable from the item
/// type: root override, indentation, document declaration, empty-element
/// style and extra namespace declarations.
///
/// Unlike [`XmlRoot`], an override set has no useful structural equality, so
/// serializers built from one are cached under an explicit caller-chosen key
/// (see
/// [`XmlSerializerFactory::create_with_overrides`](super::XmlSerializerFactory::create_with_overrides)).
#[derive(Debug, Clone, Default)]
pub struct XmlOverrides {
    root: Option<XmlRoot>,
    indent: Option<(char, usize)>,
    xml_declaration: bool,
    expand_empty_elements: bool,
    namespaces: Vec<(String, String)>,
}

impl XmlOverrides {
    /// Creates an empty override set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies a root-element override.
    pub fn root(mut self, root: XmlRoot) -> Self {
        self.root = Some(root);
        self
    }

    /// Indents output with `indent_size` repetitions of `indent_char` per level.
    pub fn indent(mut self, indent_char: char, indent_size: usize) -> Self {
        self.indent = Some((indent_char, indent_size));
        self
    }

    /// Emits an XML declaration before the root element.
    pub fn xml_declaration(mut self, emit: bool) -> Self {
        self.xml_declaration = emit;
        self
    }

    /// Writes empty elements as a start/end pair instead of self-closing.
    pub fn expand_empty_elements(mut self, expand: bool) -> Self {
        self.expand_empty_elements = expand;
        self
    }

    /// Declares an additional prefixed namespace on the root element.
    pub fn namespace<S: AsRef<str>>(mut self, prefix: S, uri: S) -> Self {
        self.namespaces
            .push((prefix.as_ref().to_string(), uri.as_ref().to_string()));
        self
    }
}

/// A configured XML serializer.
///
/// Instances are immutable and stateless after construction, so one instance
/// can be shared freely between threads; the factory relies on this to hand
/// the same instance to every caller with an equal configuration key.
///
/// All encoding and decoding work is delegated to `quick-xml`; this type
/// only applies its configured root decoration on the way out.
///
/// # Examples
///
/// ```
/// use serde::Serialize;
/// use xml_kit::serializer::{XmlRoot, XmlSerializerFactory};
///
/// #[derive(Serialize)]
/// struct Note {
///     body: String,
/// }
///
/// let factory = XmlSerializerFactory::new();
/// let serializer = factory
///     .create_with_root::<Note>(&XmlRoot::new("memo").with_namespace("urn:notes"))
///     .unwrap();
///
/// let xml = serializer
///     .to_string(&Note {
///         body: "call back".to_string(),
///     })
///     .unwrap();
/// assert_eq!(xml, "<memo xmlns=\"urn:notes\"><body>call back</body></memo>");
/// ```
#[derive(Debug, Clone)]
pub struct XmlSerializer {
    root: Option<XmlRoot>,
    indent: Option<(char, usize)>,
    xml_declaration: bool,
    expand_empty_elements: bool,
    namespaces: Vec<(String, String)>,
}

impl XmlSerializer {
    /// A serializer with no configuration; output is driven entirely by the
    /// item type.
    pub(crate) fn plain() -> Self {
        Self {
            root: None,
            indent: None,
            xml_declaration: false,
            expand_empty_elements: false,
            namespaces: Vec::new(),
        }
    }

    pub(crate) fn with_root(root: XmlRoot) -> Self {
        Self {
            root: Some(root),
            ..Self::plain()
        }
    }

    pub(crate) fn from_overrides(overrides: &XmlOverrides) -> Self {
        Self {
            root: overrides.root.clone(),
            indent: overrides.indent,
            xml_declaration: overrides.xml_declaration,
            expand_empty_elements: overrides.expand_empty_elements,
            namespaces: overrides.namespaces.clone(),
        }
    }

    /// The root override this serializer was configured with, if any.
    pub fn root(&self) -> Option<&XmlRoot> {
        self.root.as_ref()
    }

    /// Serializes `value` to an XML string.
    pub fn to_string<T: Serialize>(&self, value: &T) -> Result<String, XmlError> {
        let mut body = String::new();
        let root_tag = self.root.as_ref().map(XmlRoot::element_name);
        let mut serializer = quick_xml::se::Serializer::with_root(&mut body, root_tag)
            .map_err(|e| XmlError::Serializer(e.to_string()))?;
        if let Some((indent_char, indent_size)) = self.indent {
            serializer.indent(indent_char, indent_size);
        }
        value
            .serialize(serializer)
            .map_err(|e| XmlError::Serializer(e.to_string()))?;

        if self.needs_decoration() {
            self.decorate(&body)
        } else {
            Ok(body)
        }
    }

    /// Serializes `value` and writes the result to `sink`.
    pub fn to_writer<T: Serialize, W: Write>(&self, value: &T, mut sink: W) -> Result<(), XmlError> {
        let text = self.to_string(value)?;
        sink.write_all(text.as_bytes())?;
        Ok(())
    }

    /// Deserializes a value from XML text.
    pub fn from_str<T: DeserializeOwned>(&self, text: &str) -> Result<T, XmlError> {
        quick_xml::de::from_str(text).map_err(|e| XmlError::Serializer(e.to_string()))
    }

    /// Deserializes a value from a buffered reader.
    pub fn from_reader<T: DeserializeOwned, R: BufRead>(&self, reader: R) -> Result<T, XmlError> {
        quick_xml::de::from_reader(reader).map_err(|e| XmlError::Serializer(e.to_string()))
    }

    fn needs_decoration(&self) -> bool {
        self.xml_declaration
            || self.expand_empty_elements
            || !self.namespaces.is_empty()
            || self.root.as_ref().is_some_and(|root| {
                root.namespace.is_some() || root.data_type.is_some() || root.nullable
            })
    }

    /// Re-reads serialized text as an event stream and rewrites the root
    /// start event with the configured declarations. The serialized content
    /// itself passes through untouched.
    fn decorate(&self, xml: &str) -> Result<String, XmlError> {
        let mut reader = Reader::from_str(xml);
        let mut writer = Writer::new(Vec::new());
        let mut root_seen = false;

        if self.xml_declaration {
            writer
                .write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))
                .map_err(|e| XmlError::Serializer(e.to_string()))?;
        }

        loop {
            let event = reader
                .read_event()
                .map_err(|e| XmlError::Serializer(e.to_string()))?;
            match event {
                Event::Start(ref start) if !root_seen => {
                    root_seen = true;
                    let rewritten = self.decorate_root(start, false)?;
                    writer
                        .write_event(Event::Start(rewritten))
                        .map_err(|e| XmlError::Serializer(e.to_string()))?;
                }
                Event::Empty(ref start) => {
                    let name = element_name(start)?;
                    let rewritten = if root_seen {
                        copy_element(start)?
                    } else {
                        root_seen = true;
                        self.decorate_root(start, true)?
                    };
                    if self.expand_empty_elements {
                        writer
                            .write_event(Event::Start(rewritten))
                            .and_then(|_| writer.write_event(Event::End(BytesEnd::new(name))))
                            .map_err(|e| XmlError::Serializer(e.to_string()))?;
                    } else {
                        writer
                            .write_event(Event::Empty(rewritten))
                            .map_err(|e| XmlError::Serializer(e.to_string()))?;
                    }
                }
                Event::Eof => break,
                other => {
                    writer
                        .write_event(other)
                        .map_err(|e| XmlError::Serializer(e.to_string()))?;
                }
            }
        }

        String::from_utf8(writer.into_inner())
            .map_err(|e| XmlError::Serializer(format!("serialized output is not UTF-8: {}", e)))
    }

    fn decorate_root(
        &self,
        start: &BytesStart<'_>,
        is_empty: bool,
    ) -> Result<BytesStart<'static>, XmlError> {
        let mut element = copy_element(start)?;
        let mut xsi_declared = false;

        if let Some(root) = &self.root {
            if let Some(namespace) = root.namespace() {
                element.push_attribute(("xmlns", namespace));
            }
            if let Some(data_type) = root.data_type() {
                element.push_attribute(("xmlns:xsi", XSI_NAMESPACE));
                element.push_attribute(("xsi:type", data_type));
                xsi_declared = true;
            }
            if root.is_nullable() && is_empty {
                if !xsi_declared {
                    element.push_attribute(("xmlns:xsi", XSI_NAMESPACE));
                }
                element.push_attribute(("xsi:nil", "true"));
            }
        }
        for (prefix, uri) in &self.namespaces {
            if prefix.is_empty() {
                element.push_attribute(("xmlns", uri.as_str()));
            } else {
                element.push_attribute((format!("xmlns:{}", prefix).as_str(), uri.as_str()));
            }
        }
        Ok(element)
    }
}

fn copy_element(start: &BytesStart<'_>) -> Result<BytesStart<'static>, XmlError> {
    let mut element = BytesStart::new(element_name(start)?);
    for attribute in start.attributes() {
        let attribute = attribute.map_err(|e| XmlError::Serializer(e.to_string()))?;
        element.push_attribute(attribute);
    }
    Ok(element.into_owned())
}

fn element_name(start: &BytesStart<'_>) -> Result<String, XmlError> {
    std::str::from_utf8(start.name().as_ref())
        .map(str::to_string)
        .map_err(|e| XmlError::Serializer(format!("element name is not UTF-8: {}", e)))
}
