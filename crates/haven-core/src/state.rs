// ── Snapshot state ──
//
// The cached local mirror of a remote entity's last-known server state.
// Purely mechanical: dotted-path lookup and deep merge, no validation.

use serde_json::{Map, Value};

/// A key/value snapshot of a remote entity.
///
/// Mutated only through [`update`](State::update) (deep merge of a partial)
/// or [`replace`](State::replace) (refresh baseline). Both complete without
/// yield points, so a caller never observes a half-merged snapshot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct State(Map<String, Value>);

impl State {
    pub fn new(initial: Map<String, Value>) -> Self {
        Self(initial)
    }

    /// Resolve a dotted path (`"statuses.level"`) through nested objects.
    ///
    /// Returns `None` if any segment is missing or a non-object is reached
    /// before the last segment. Never errors.
    pub fn get(&self, path: &str) -> Option<&Value> {
        let mut segments = path.split('.');
        let first = segments.next()?;
        let mut current = self.0.get(first)?;
        for segment in segments {
            current = current.as_object()?.get(segment)?;
        }
        Some(current)
    }

    /// Deep-merge `partial` into the snapshot.
    ///
    /// Object values recurse into matching nested objects; everything else
    /// overwrites. Keys absent from `partial` are preserved. Non-object
    /// partials are ignored (there is nothing to merge).
    pub fn update(&mut self, partial: &Value) {
        if let Some(partial) = partial.as_object() {
            merge(&mut self.0, partial);
        }
    }

    /// Replace the snapshot wholesale (a refresh is a superset replace,
    /// not a merge of a partial). Non-object values are ignored.
    pub fn replace(&mut self, full: Value) {
        if let Value::Object(map) = full {
            self.0 = map;
        }
    }
}

fn merge(base: &mut Map<String, Value>, partial: &Map<String, Value>) {
    for (key, incoming) in partial {
        match (base.get_mut(key), incoming.as_object()) {
            (Some(Value::Object(existing)), Some(nested)) => merge(existing, nested),
            _ => {
                base.insert(key.clone(), incoming.clone());
            }
        }
    }
}
