//! Object cache layer.
//!
//! Backends implement [`ObjectCache`] over raw string entries and register
//! themselves through [`register`]; typed layers (such as the grade store)
//! serialize through `serde_json` on top of this trait.

use async_trait::async_trait;

pub mod object_cache;
pub mod register;

/// Result of a cache lookup.
#[derive(Debug, Clone, PartialEq)]
pub enum CacheResult<T> {
    Found(T),
    NotFound,
}

impl<T> CacheResult<T> {
    pub fn into_option(self) -> Option<T> {
        match self {
            CacheResult::Found(value) => Some(value),
            CacheResult::NotFound => None,
        }
    }
}

#[async_trait]
pub trait ObjectCache: Send + Sync {
    /// Look up a raw entry.
    async fn get_raw(&self, key: &str) -> CacheResult<String>;

    /// Insert a raw entry. `ttl` is in seconds; backends with a fixed
    /// builder-level TTL may ignore it.
    async fn insert_raw(&self, key: String, value: String, ttl: u64);

    /// Remove an entry, if present.
    async fn remove_raw(&self, key: &str);

    /// Drop every entry.
    async fn clear(&self);
}

/// Registers an [`ObjectCache`] backend under a plugin name at program
/// startup.
#[macro_export]
macro_rules! declare_object_cache_plugin {
    ($name:literal, $cache_type:ty) => {
        paste::paste! {
            #[ctor::ctor]
            fn [<__register_object_cache_ $cache_type:snake>]() {
                $crate::cache::register::register_object_cache_plugin(
                    $name,
                    ::std::sync::Arc::new(|| {
                        ::std::boxed::Box::pin(async {
                            let cache = <$cache_type>::new()
                                .map_err($crate::errors::GradebookError::cache_connection)?;
                            Ok(::std::boxed::Box::new(cache)
                                as ::std::boxed::Box<dyn $crate::cache::ObjectCache>)
                        })
                    }),
                );
            }
        }
    };
}
