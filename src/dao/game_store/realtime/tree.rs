//! JSON document tree addressed by slash-separated paths, with change events.

use serde_json::{Map, Value};
use tokio::sync::{RwLock, broadcast};

use crate::dao::game_store::ChangeEvent;

/// Tree of JSON objects supporting child-path reads and writes.
///
/// Every write emits one [`ChangeEvent`] per node it replaced; writes issued by a
/// single call are applied under one lock so subscribers never observe half of them.
pub struct DocumentTree {
    root: RwLock<Map<String, Value>>,
    events: broadcast::Sender<ChangeEvent>,
}

impl DocumentTree {
    #[cfg(test)]
    fn new(capacity: usize) -> Self {
        let (events, _receiver) = broadcast::channel(capacity);
        Self {
            root: RwLock::new(Map::new()),
            events,
        }
    }

    /// Create a tree holding `value` under the top-level key `key`.
    pub fn with_node(capacity: usize, key: &str, value: Value) -> Self {
        let (events, _receiver) = broadcast::channel(capacity);
        let mut root = Map::new();
        root.insert(key.to_string(), value);
        Self {
            root: RwLock::new(root),
            events,
        }
    }

    /// Register a subscriber for subsequent changes.
    pub fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.events.subscribe()
    }

    /// Clone of the node at `path`.
    pub async fn get(&self, path: &str) -> Option<Value> {
        let root = self.root.read().await;
        lookup(&root, &segments(path)).cloned()
    }

    /// Replace the node at `path`, creating intermediate objects as needed.
    pub async fn set(&self, path: &str, value: Value) {
        let mut root = self.root.write().await;
        self.set_locked(&mut root, &segments(path), value);
    }

    /// Write `value` at `path` only when no node exists there. Returns whether it wrote.
    pub async fn set_if_absent(&self, path: &str, value: Value) -> bool {
        let segments = segments(path);
        let mut root = self.root.write().await;
        if lookup(&root, &segments).is_some() {
            return false;
        }
        self.set_locked(&mut root, &segments, value);
        true
    }

    /// Replace each named child of `path` in one atomic write.
    pub async fn update(&self, path: &str, fields: Map<String, Value>) {
        let base = segments(path);
        let mut root = self.root.write().await;
        for (key, value) in fields {
            let mut child = base.clone();
            child.push(key.as_str());
            self.set_locked(&mut root, &child, value);
        }
    }

    /// Delete the node at `path`. Returns whether a node was removed.
    pub async fn remove(&self, path: &str) -> bool {
        let segments = segments(path);
        let Some((last, parents)) = segments.split_last() else {
            return false;
        };

        let mut root = self.root.write().await;
        let removed = lookup_mut(&mut root, parents)
            .and_then(|parent| parent.shift_remove(*last))
            .is_some();
        if removed {
            self.emit(&segments, None);
        }
        removed
    }

    fn set_locked(&self, root: &mut Map<String, Value>, segments: &[&str], value: Value) {
        let Some((last, parents)) = segments.split_last() else {
            return;
        };

        let Some(parent) = object_at(root, parents) else {
            return;
        };
        parent.insert(last.to_string(), value.clone());
        self.emit(segments, Some(value));
    }

    fn emit(&self, segments: &[&str], value: Option<Value>) {
        let _ = self.events.send(ChangeEvent {
            path: segments.join("/"),
            value,
        });
    }
}

fn segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|segment| !segment.is_empty()).collect()
}

fn lookup<'a>(root: &'a Map<String, Value>, segments: &[&str]) -> Option<&'a Value> {
    let (first, rest) = segments.split_first()?;
    let mut node = root.get(*first)?;
    for segment in rest {
        node = node.as_object()?.get(*segment)?;
    }
    Some(node)
}

fn lookup_mut<'a>(
    root: &'a mut Map<String, Value>,
    segments: &[&str],
) -> Option<&'a mut Map<String, Value>> {
    let mut node = root;
    for segment in segments {
        node = node.get_mut(*segment)?.as_object_mut()?;
    }
    Some(node)
}

/// Walk to the object at `segments`, replacing missing or scalar nodes with empty objects.
fn object_at<'a>(
    root: &'a mut Map<String, Value>,
    segments: &[&str],
) -> Option<&'a mut Map<String, Value>> {
    let mut node = root;
    for segment in segments {
        let child = node
            .entry(segment.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if !child.is_object() {
            *child = Value::Object(Map::new());
        }
        node = child.as_object_mut()?;
    }
    Some(node)
}
