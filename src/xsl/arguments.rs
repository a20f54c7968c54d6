use super::document::XmlDocument;
use crate::error::XmlError;
use std::any::Any;
use std::collections::BTreeMap;
use std::sync::Arc;

/// A value that can be passed to a stylesheet.
///
/// The variants are the W3C value kinds a stylesheet parameter can carry:
/// strings, booleans, numbers and node sets.
#[derive(Debug, Clone)]
pub enum ParamValue {
    /// A string value.
    String(String),
    /// A boolean value.
    Boolean(bool),
    /// An integer value.
    Integer(i64),
    /// A double-precision number.
    Double(f64),
    /// A set of nodes, addressable with path expressions from the stylesheet.
    Nodes(XmlDocument),
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::String(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::String(value)
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        ParamValue::Boolean(value)
    }
}

impl From<i32> for ParamValue {
    fn from(value: i32) -> Self {
        ParamValue::Integer(i64::from(value))
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        ParamValue::Integer(value)
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        ParamValue::Double(value)
    }
}

impl From<XmlDocument> for ParamValue {
    fn from(value: XmlDocument) -> Self {
        ParamValue::Nodes(value)
    }
}

/// Named parameters passed to a stylesheet.
///
/// # Examples
///
/// ```
/// use xml_kit::xsl::ParameterCollection;
///
/// let mut parameters = ParameterCollection::new();
/// parameters.add("title", "Quarterly report");
/// parameters.add("draft", true);
/// parameters.add("revision", 3);
///
/// assert_eq!(parameters.len(), 3);
/// parameters.remove("draft");
/// assert_eq!(parameters.len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ParameterCollection {
    parameters: BTreeMap<String, ParamValue>,
}

impl ParameterCollection {
    /// Creates an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a parameter, replacing any previous value under the same name.
    pub fn add<S: AsRef<str>, V: Into<ParamValue>>(&mut self, name: S, value: V) {
        self.parameters
            .insert(name.as_ref().to_string(), value.into());
    }

    /// Removes the parameter with the given name.
    pub fn remove(&mut self, name: &str) {
        self.parameters.remove(name);
    }

    /// Clears all parameters from the collection.
    pub fn clear(&mut self) {
        self.parameters.clear();
    }

    /// Number of parameters in the collection.
    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    /// Whether the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }

    /// Iterates over the parameters in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.parameters.iter().map(|(name, value)| (name.as_str(), value))
    }
}

/// A namespaced extension object whose values a stylesheet can use.
///
/// Each provider owns a namespace URI and contributes named values, computed
/// once per transform run and bound as stylesheet parameters before
/// execution. Values must be of the kinds [`ParamValue`] supports.
///
/// Registering two providers with the same namespace is allowed when they
/// are the same concrete type (the duplicates collapse to one); two
/// *different* types claiming one namespace is an error surfaced by the
/// transform call.
pub trait ExtensionProvider: Any + Send + Sync {
    /// The uniform resource identifier used to refer to this provider.
    fn namespace_uri(&self) -> &str;

    /// The named values this provider contributes to a transform run.
    fn values(&self) -> Vec<(String, ParamValue)>;
}

/// Parameters and extension providers for a transform run.
///
/// # Examples
///
/// ```
/// use xml_kit::xsl::TransformArguments;
///
/// let mut arguments = TransformArguments::new();
/// arguments.parameters_mut().add("title", "Inventory");
/// ```
#[derive(Default, Clone)]
pub struct TransformArguments {
    parameters: ParameterCollection,
    providers: Vec<Arc<dyn ExtensionProvider>>,
}

impl TransformArguments {
    /// Creates an empty argument set.
    pub fn new() -> Self {
        Self::default()
    }

    /// The parameters passed to the stylesheet.
    pub fn parameters(&self) -> &ParameterCollection {
        &self.parameters
    }

    /// Mutable access to the parameters.
    pub fn parameters_mut(&mut self) -> &mut ParameterCollection {
        &mut self.parameters
    }

    /// Registers an extension provider.
    pub fn add_provider(&mut self, provider: Arc<dyn ExtensionProvider>) {
        self.providers.push(provider);
    }

    /// The registered extension providers, unnormalized.
    pub fn providers(&self) -> &[Arc<dyn ExtensionProvider>] {
        &self.providers
    }

    /// Collapses duplicate registrations of the same provider type per
    /// namespace; a namespace claimed by two different types is an error.
    fn normalized_providers(&self) -> Result<Vec<&Arc<dyn ExtensionProvider>>, XmlError> {
        let mut seen: Vec<(&str, std::any::TypeId, &Arc<dyn ExtensionProvider>)> = Vec::new();
        for provider in &self.providers {
            let namespace = provider.namespace_uri();
            let type_id = provider.as_ref().type_id();
            match seen.iter().find(|(ns, _, _)| *ns == namespace) {
                Some((_, existing, _)) if *existing == type_id => {}
                Some(_) => {
                    return Err(XmlError::DuplicateNamespace {
                        namespace: namespace.to_string(),
                    });
                }
                None => seen.push((namespace, type_id, provider)),
            }
        }
        Ok(seen.into_iter().map(|(_, _, provider)| provider).collect())
    }

    /// Builder method that flattens parameters and provider values into the
    /// named bindings handed to the engine.
    pub(crate) fn bindings(&self) -> Result<Vec<(String, ParamValue)>, XmlError> {
        let mut bindings: Vec<(String, ParamValue)> = self
            .parameters
            .iter()
            .map(|(name, value)| (name.to_string(), value.clone()))
            .collect();
        for provider in self.normalized_providers()? {
            bindings.extend(provider.values());
        }
        Ok(bindings)
    }
}
