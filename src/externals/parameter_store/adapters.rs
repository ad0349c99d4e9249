use tracing::warn;

use crate::{
    internals::core::ports::StatusSource,
    models::distance::DistanceToTarget,
};

use super::services::{get_float_parameter, ParameterStore};

/// Reads the distance to target from a named parameter in the host's
/// parameter store.
pub struct ParameterStatusSource<P: ParameterStore> {
    store: P,
    key: String,
}

impl<P: ParameterStore> ParameterStatusSource<P> {
    pub fn new(store: P, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

impl<P: ParameterStore> StatusSource for ParameterStatusSource<P> {
    fn read_distance_to_target(&mut self) -> DistanceToTarget {
        match get_float_parameter(&self.store, &self.key) {
            Ok(value) => DistanceToTarget::from_millimeters(value),
            Err(e) => {
                warn!("Failed to read distance to target parameter. Error: {}", e);
                DistanceToTarget::UNKNOWN
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::externals::parameter_store::services::InMemoryParameterStore;

    #[test]
    fn test_reads_parameter() {
        let store = Arc::new(InMemoryParameterStore::new());
        let mut source = ParameterStatusSource::new(store.clone(), "dtt");
        assert_eq!(source.key(), "dtt");

        store.set_parameter("dtt", "9.499");
        assert_eq!(source.read_distance_to_target().millimeters(), Some(9.499f32));

        store.set_parameter("dtt", "-0.027");
        assert_eq!(source.read_distance_to_target().millimeters(), Some(-0.027f32));
        assert_eq!(source.read_connection_status(), None);
    }

    #[test]
    fn test_missing_or_garbage_is_unknown() {
        let store = Arc::new(InMemoryParameterStore::new());
        let mut source = ParameterStatusSource::new(store.clone(), "dtt");
        assert!(source.read_distance_to_target().is_unknown());

        store.set_parameter("dtt", "");
        assert!(source.read_distance_to_target().is_unknown());

        store.set_parameter("dtt", "12mm");
        assert!(source.read_distance_to_target().is_unknown());

        store.set_parameter("dtt", "12");
        assert_eq!(source.read_distance_to_target().millimeters(), Some(12f32));
    }
}
