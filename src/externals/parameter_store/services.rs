use std::{
    collections::HashMap,
    num::ParseFloatError,
    sync::{Arc, PoisonError, RwLock},
};

use thiserror::Error;

/// Key/value view of the host's parameter node. Values are stored as text.
/// Implementations must be safe to read from the poller thread while the
/// host writes from its own.
pub trait ParameterStore: Send + Sync {
    fn get_parameter(&self, key: &str) -> Option<String>;
}

impl<T: ParameterStore + ?Sized> ParameterStore for Arc<T> {
    fn get_parameter(&self, key: &str) -> Option<String> {
        (**self).get_parameter(key)
    }
}

#[derive(Error, Debug)]
pub enum ParameterError {
    /// The key has never been set.
    #[error("Parameter '{0}' is not set.")]
    Missing(String),

    /// The stored text is not a number.
    #[error("Parameter '{key}' has unparsable value '{value}'.")]
    Unparsable {
        key: String,
        value: String,
        #[source]
        source: ParseFloatError,
    },
}

/// Read `key` from `store` and parse it as a float.
pub fn get_float_parameter(store: &dyn ParameterStore, key: &str) -> Result<f32, ParameterError> {
    let raw = match store.get_parameter(key) {
        None => return Err(ParameterError::Missing(key.into())),
        Some(raw) => raw,
    };

    raw.trim()
        .parse::<f32>()
        .map_err(|source| ParameterError::Unparsable {
            key: key.into(),
            value: raw.clone(),
            source,
        })
}

/// In-process parameter store shared between the host side and the poller.
#[derive(Debug, Default)]
pub struct InMemoryParameterStore {
    parameters: RwLock<HashMap<String, String>>,
}

impl InMemoryParameterStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_parameter(&self, key: impl Into<String>, value: impl Into<String>) {
        self.parameters
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.into(), value.into());
    }

    pub fn remove_parameter(&self, key: &str) -> Option<String> {
        self.parameters
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key)
    }
}

impl ParameterStore for InMemoryParameterStore {
    fn get_parameter(&self, key: &str) -> Option<String> {
        self.parameters
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }
}
