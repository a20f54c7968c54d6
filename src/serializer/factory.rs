use super::xml_serializer::{XmlOverrides, XmlRoot, XmlSerializer};
use crate::error::XmlError;
use dashmap::DashMap;
use log::debug;
use std::any::{TypeId, type_name};
use std::sync::{Arc, OnceLock};

/// Cache key for serializers configured with a root override. Structural
/// equality of the override is the collision rule: equal overrides for the
/// same item type must map to the same instance.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct RootKey {
    type_id: TypeId,
    root: XmlRoot,
}

/// Cache key for serializers built from an open-ended override set. The
/// override set itself has no equality, so the caller names the entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct OverridesKey {
    type_id: TypeId,
    cache_key: String,
}

/// A factory that creates serializers and caches the configured ones.
///
/// Configured serializer instances are shared: every call with an equal
/// composite key receives the same `Arc`, for the lifetime of the process.
/// Entries are never evicted; the expected number of distinct item types and
/// configurations is small, and unbounded growth is the accepted tradeoff.
///
/// Lookups and insertions are safe from any number of threads. Get-or-create
/// is atomic per key, so two threads racing on the same key still observe a
/// single shared instance.
///
/// # Examples
///
/// ```
/// use serde::Serialize;
/// use std::sync::Arc;
/// use xml_kit::serializer::{XmlRoot, XmlSerializerFactory};
///
/// #[derive(Serialize)]
/// struct Invoice {
///     total: f64,
/// }
///
/// let factory = XmlSerializerFactory::new();
/// let root = XmlRoot::new("invoice");
///
/// let first = factory.create_with_root::<Invoice>(&root).unwrap();
/// let second = factory.create_with_root::<Invoice>(&root).unwrap();
/// assert!(Arc::ptr_eq(&first, &second));
///
/// // A different override is a different entry.
/// let renamed = factory
///     .create_with_root::<Invoice>(&XmlRoot::new("bill"))
///     .unwrap();
/// assert!(!Arc::ptr_eq(&first, &renamed));
/// ```
#[derive(Debug, Default)]
pub struct XmlSerializerFactory {
    with_root: DashMap<RootKey, Arc<XmlSerializer>>,
    with_overrides: DashMap<OverridesKey, Arc<XmlSerializer>>,
}

impl XmlSerializerFactory {
    /// Creates a factory with empty caches.
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide shared factory.
    ///
    /// Callers that do not manage their own factory instance should use this
    /// one, so that equal configuration keys collide across the whole
    /// process.
    pub fn global() -> &'static XmlSerializerFactory {
        static GLOBAL: OnceLock<XmlSerializerFactory> = OnceLock::new();
        GLOBAL.get_or_init(XmlSerializerFactory::new)
    }

    /// Creates an unconfigured serializer.
    ///
    /// Construction is cheap and the result carries no configuration, so no
    /// caching is involved; every call returns a fresh instance.
    pub fn create(&self) -> Arc<XmlSerializer> {
        Arc::new(XmlSerializer::plain())
    }

    /// Returns the shared serializer for `T` configured with `root`,
    /// creating it on first use.
    ///
    /// Structurally equal overrides collide to the same instance; see the
    /// type-level example.
    ///
    /// # Errors
    ///
    /// [`XmlError::InvalidArgument`] if the override's element name is
    /// empty.
    pub fn create_with_root<T: 'static>(&self, root: &XmlRoot) -> Result<Arc<XmlSerializer>, XmlError> {
        if root.element_name().is_empty() {
            return Err(XmlError::InvalidArgument {
                name: "root",
                reason: "root element name must not be empty".to_string(),
            });
        }

        let key = RootKey {
            type_id: TypeId::of::<T>(),
            root: root.clone(),
        };
        let serializer = self
            .with_root
            .entry(key)
            .or_insert_with(|| {
                debug!(
                    "caching serializer for {} with root '{}'",
                    type_name::<T>(),
                    root.element_name()
                );
                Arc::new(XmlSerializer::with_root(root.clone()))
            })
            .clone();
        Ok(serializer)
    }

    /// Returns the shared serializer for `T` built from `overrides`, cached
    /// under `cache_key`, creating it on first use.
    ///
    /// The override set is only consulted when the entry is created. Callers
    /// must pass the same key for the same override set; a key reused with
    /// a different set silently returns the first entry.
    ///
    /// # Errors
    ///
    /// [`XmlError::InvalidArgument`] if `cache_key` is empty.
    pub fn create_with_overrides<T: 'static>(
        &self,
        cache_key: &str,
        overrides: &XmlOverrides,
    ) -> Result<Arc<XmlSerializer>, XmlError> {
        if cache_key.is_empty() {
            return Err(XmlError::InvalidArgument {
                name: "cache_key",
                reason: "cache key must not be empty".to_string(),
            });
        }

        let key = OverridesKey {
            type_id: TypeId::of::<T>(),
            cache_key: cache_key.to_string(),
        };
        let serializer = self
            .with_overrides
            .entry(key)
            .or_insert_with(|| {
                debug!(
                    "caching serializer for {} under key '{}'",
                    type_name::<T>(),
                    cache_key
                );
                Arc::new(XmlSerializer::from_overrides(overrides))
            })
            .clone();
        Ok(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Alpha;
    struct Beta;

    #[test]
    fn create_returns_fresh_instances() {
        let factory = XmlSerializerFactory::new();
        let first = factory.create();
        let second = factory.create();
        assert!(!Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn equal_root_overrides_share_one_instance() {
        let factory = XmlSerializerFactory::new();
        let first = factory
            .create_with_root::<Alpha>(&XmlRoot::new("item").with_namespace("urn:a"))
            .unwrap();
        let second = factory
            .create_with_root::<Alpha>(&XmlRoot::new("item").with_namespace("urn:a"))
            .unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn unequal_root_overrides_get_distinct_instances() {
        let factory = XmlSerializerFactory::new();
        let base = factory
            .create_with_root::<Alpha>(&XmlRoot::new("item"))
            .unwrap();

        let renamed = factory
            .create_with_root::<Alpha>(&XmlRoot::new("entry"))
            .unwrap();
        let namespaced = factory
            .create_with_root::<Alpha>(&XmlRoot::new("item").with_namespace("urn:a"))
            .unwrap();
        let nullable = factory
            .create_with_root::<Alpha>(&XmlRoot::new("item").with_nullable(true))
            .unwrap();
        let typed = factory
            .create_with_root::<Alpha>(&XmlRoot::new("item").with_data_type("ItemType"))
            .unwrap();

        assert!(!Arc::ptr_eq(&base, &renamed));
        assert!(!Arc::ptr_eq(&base, &namespaced));
        assert!(!Arc::ptr_eq(&base, &nullable));
        assert!(!Arc::ptr_eq(&base, &typed));
    }

    #[test]
    fn same_override_for_different_types_is_not_shared() {
        let factory = XmlSerializerFactory::new();
        let root = XmlRoot::new("item");
        let alpha = factory.create_with_root::<Alpha>(&root).unwrap();
        let beta = factory.create_with_root::<Beta>(&root).unwrap();
        assert!(!Arc::ptr_eq(&alpha, &beta));
    }

    #[test]
    fn empty_root_element_name_is_rejected() {
        let factory = XmlSerializerFactory::new();
        let result = factory.create_with_root::<Alpha>(&XmlRoot::new(""));
        assert!(matches!(
            result,
            Err(XmlError::InvalidArgument { name: "root", .. })
        ));
    }

    #[test]
    fn overrides_cache_is_keyed_by_the_explicit_key() {
        let factory = XmlSerializerFactory::new();
        let first = factory
            .create_with_overrides::<Alpha>("report-v1", &XmlOverrides::new().indent(' ', 2))
            .unwrap();
        let second = factory
            .create_with_overrides::<Alpha>("report-v1", &XmlOverrides::new())
            .unwrap();
        let other = factory
            .create_with_overrides::<Alpha>("report-v2", &XmlOverrides::new())
            .unwrap();

        // The key decides; a reused key returns the first entry even when the
        // override set differs.
        assert!(Arc::ptr_eq(&first, &second));
        assert!(!Arc::ptr_eq(&first, &other));
    }

    #[test]
    fn empty_cache_key_is_rejected() {
        let factory = XmlSerializerFactory::new();
        let result = factory.create_with_overrides::<Alpha>("", &XmlOverrides::new());
        assert!(matches!(
            result,
            Err(XmlError::InvalidArgument {
                name: "cache_key",
                ..
            })
        ));
    }

    #[test]
    fn global_factory_is_one_instance() {
        let first = XmlSerializerFactory::global();
        let second = XmlSerializerFactory::global();
        assert!(std::ptr::eq(first, second));
    }

    #[test]
    fn racing_threads_observe_one_instance_per_key() {
        let factory = XmlSerializerFactory::new();
        let root = XmlRoot::new("item").with_namespace("urn:race");

        let serializers: Vec<_> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| scope.spawn(|| factory.create_with_root::<Alpha>(&root).unwrap()))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        let first = &serializers[0];
        assert!(serializers.iter().all(|s| Arc::ptr_eq(first, s)));
    }
}
