//! Process-wide validation defaults.
//!
//! [`GlobalOptions`] holds the defaults every middleware falls back to: the
//! failure handler, the strictness of field mappings, and what a segment with
//! no schema accepts. An [`OptionsStore`] keeps the current options as an
//! immutable snapshot; [`OptionsStore::update`] overlays a partial
//! [`OptionsUpdate`] and swaps the snapshot, so readers always observe either
//! the old or the new options in full.
//!
//! Strictness and missing-schema behavior are read when a middleware is
//! built. The handler is read on every failed request. A change to the
//! options therefore affects the handler of existing middleware immediately,
//! but not their normalization.
//!
//! # Example
//!
//! ```
//! use kanon_core::{MissingSchemaBehavior, ObjectMode};
//! use kanon_middleware::{OptionsStore, OptionsUpdate};
//!
//! let store = OptionsStore::new();
//! store.update(OptionsUpdate::new().default_schema_object(ObjectMode::Strict));
//!
//! let options = store.snapshot();
//! assert_eq!(options.default_schema_object, ObjectMode::Strict);
//! assert_eq!(options.missing_schema_behavior, MissingSchemaBehavior::Strict);
//! ```

use crate::handler::SharedFailureHandler;
use kanon_core::{MissingSchemaBehavior, ObjectMode};
use parking_lot::RwLock;
use std::sync::{Arc, OnceLock};

/// The process-wide validation defaults.
#[derive(Clone, Default)]
pub struct GlobalOptions {
    /// Handler used when a middleware has none of its own. `None` means the
    /// built-in [`DefaultFailureHandler`](crate::DefaultFailureHandler).
    pub handler: Option<SharedFailureHandler>,
    /// Strictness applied to field mappings.
    pub default_schema_object: ObjectMode,
    /// What segments without a schema accept.
    pub missing_schema_behavior: MissingSchemaBehavior,
}

impl std::fmt::Debug for GlobalOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GlobalOptions")
            .field("handler", &self.handler.as_ref().map(|_| "custom"))
            .field("default_schema_object", &self.default_schema_object)
            .field("missing_schema_behavior", &self.missing_schema_behavior)
            .finish()
    }
}

/// A partial set of options. Provided keys replace the current ones.
#[derive(Clone, Default)]
pub struct OptionsUpdate {
    handler: Option<SharedFailureHandler>,
    default_schema_object: Option<ObjectMode>,
    missing_schema_behavior: Option<MissingSchemaBehavior>,
}

impl OptionsUpdate {
    /// Creates an empty update.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the global failure handler.
    #[must_use]
    pub fn handler(mut self, handler: SharedFailureHandler) -> Self {
        self.handler = Some(handler);
        self
    }

    /// Sets the strictness applied to field mappings.
    #[must_use]
    pub fn default_schema_object(mut self, mode: ObjectMode) -> Self {
        self.default_schema_object = Some(mode);
        self
    }

    /// Sets what segments without a schema accept.
    #[must_use]
    pub fn missing_schema_behavior(mut self, behavior: MissingSchemaBehavior) -> Self {
        self.missing_schema_behavior = Some(behavior);
        self
    }

    /// Overlays this update onto `options`.
    pub fn apply_to(self, options: &mut GlobalOptions) {
        if let Some(handler) = self.handler {
            options.handler = Some(handler);
        }
        if let Some(mode) = self.default_schema_object {
            options.default_schema_object = mode;
        }
        if let Some(behavior) = self.missing_schema_behavior {
            options.missing_schema_behavior = behavior;
        }
    }
}

/// Holds the current [`GlobalOptions`] snapshot.
#[derive(Debug, Default)]
pub struct OptionsStore {
    current: RwLock<Arc<GlobalOptions>>,
}

static GLOBAL: OnceLock<Arc<OptionsStore>> = OnceLock::new();

impl OptionsStore {
    /// Creates a store holding the documented defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store holding `options`.
    #[must_use]
    pub fn with_options(options: GlobalOptions) -> Self {
        Self {
            current: RwLock::new(Arc::new(options)),
        }
    }

    /// Returns the process-wide store.
    pub fn global() -> Arc<OptionsStore> {
        Arc::clone(GLOBAL.get_or_init(|| Arc::new(OptionsStore::new())))
    }

    /// Returns the current snapshot.
    pub fn snapshot(&self) -> Arc<GlobalOptions> {
        Arc::clone(&self.current.read())
    }

    /// Merges `update` into the current options.
    pub fn update(&self, update: OptionsUpdate) {
        let mut current = self.current.write();
        let mut next = GlobalOptions::clone(&current);
        update.apply_to(&mut next);
        tracing::debug!(options = ?next, "validation options updated");
        *current = Arc::new(next);
    }

    /// Restores the documented defaults.
    pub fn reset(&self) {
        *self.current.write() = Arc::new(GlobalOptions::default());
    }
}

/// Merges `update` into the process-wide options.
pub fn set_global_options(update: OptionsUpdate) {
    OptionsStore::global().update(update);
}

/// Returns the current process-wide options.
pub fn global_options() -> Arc<GlobalOptions> {
    OptionsStore::global().snapshot()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::DefaultFailureHandler;

    #[test]
    fn test_documented_defaults() {
        let options = OptionsStore::new().snapshot();
        assert!(options.handler.is_none());
        assert_eq!(options.default_schema_object, ObjectMode::Lax);
        assert_eq!(options.missing_schema_behavior, MissingSchemaBehavior::Strict);
    }

    #[test]
    fn test_update_overlays_only_provided_keys() {
        let store = OptionsStore::new();
        store.update(OptionsUpdate::new().missing_schema_behavior(MissingSchemaBehavior::Any));
        store.update(OptionsUpdate::new().default_schema_object(ObjectMode::Strict));

        let options = store.snapshot();
        assert_eq!(options.default_schema_object, ObjectMode::Strict);
        assert_eq!(options.missing_schema_behavior, MissingSchemaBehavior::Any);
    }

    #[test]
    fn test_snapshot_is_not_affected_by_later_updates() {
        let store = OptionsStore::new();
        let before = store.snapshot();
        store.update(
            OptionsUpdate::new()
                .handler(Arc::new(DefaultFailureHandler))
                .default_schema_object(ObjectMode::Strict),
        );

        assert!(before.handler.is_none());
        assert_eq!(before.default_schema_object, ObjectMode::Lax);
        assert!(store.snapshot().handler.is_some());
    }

    #[test]
    fn test_reset() {
        let store = OptionsStore::new();
        store.update(OptionsUpdate::new().default_schema_object(ObjectMode::Strict));
        store.reset();
        assert_eq!(store.snapshot().default_schema_object, ObjectMode::Lax);
    }

    #[test]
    fn test_concurrent_readers_see_whole_snapshots() {
        let store = Arc::new(OptionsStore::new());

        let writer = {
            let store = Arc::clone(&store);
            std::thread::spawn(move || {
                for i in 0..500 {
                    let (mode, behavior) = if i % 2 == 0 {
                        (ObjectMode::Strict, MissingSchemaBehavior::Any)
                    } else {
                        (ObjectMode::Lax, MissingSchemaBehavior::Strict)
                    };
                    store.update(
                        OptionsUpdate::new()
                            .default_schema_object(mode)
                            .missing_schema_behavior(behavior),
                    );
                }
            })
        };

        for _ in 0..500 {
            let options = store.snapshot();
            let paired = matches!(
                (options.default_schema_object, options.missing_schema_behavior),
                (ObjectMode::Strict, MissingSchemaBehavior::Any)
                    | (ObjectMode::Lax, MissingSchemaBehavior::Strict)
            );
            assert!(paired, "torn options: {options:?}");
        }

        writer.join().unwrap();
    }

    #[test]
    fn test_global_store_is_shared() {
        assert!(Arc::ptr_eq(&OptionsStore::global(), &OptionsStore::global()));
    }
}
