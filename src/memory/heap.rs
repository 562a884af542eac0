//! Object arena for one pause
//!
//! The [`Heap`] maps every [`ObjectId`] reported by the runtime to its
//! [`HostObject`]. It is captured together with the stack at each pause and
//! is never mutated after capture; ids are only assumed stable within one
//! heap.

use super::value::{HostValue, ObjectId};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// A single runtime object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HostObject {
    pub id: ObjectId,
    /// Display type name (e.g. `list`, `Node`); falls back to the kind's name
    #[serde(rename = "type", default)]
    pub type_name: Option<String>,
    pub value: HostValue,
}

impl HostObject {
    pub fn new(id: ObjectId, value: HostValue) -> Self {
        HostObject {
            id,
            type_name: None,
            value,
        }
    }

    /// The type name shown above the rendered object
    pub fn type_name(&self) -> &str {
        self.type_name
            .as_deref()
            .unwrap_or_else(|| self.value.default_type_name())
    }
}

/// All objects reachable at one pause, keyed by identity
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<HostObject>", into = "Vec<HostObject>")]
pub struct Heap {
    objects: FxHashMap<ObjectId, HostObject>,
    next_id: u64,
}

impl Heap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an object under its own id, replacing any previous entry
    pub fn insert(&mut self, object: HostObject) {
        self.next_id = self.next_id.max(object.id.0.saturating_add(1));
        self.objects.insert(object.id, object);
    }

    /// Allocate a new object with a fresh id
    pub fn alloc(&mut self, value: HostValue) -> ObjectId {
        let mut id = ObjectId(self.next_id.max(1));
        // The counter saturates at u64::MAX, so probe past taken ids
        while self.contains(id) {
            id = ObjectId(id.0.wrapping_add(1).max(1));
        }
        self.insert(HostObject::new(id, value));
        id
    }

    /// Allocate a new object with an explicit type name
    pub fn alloc_named(&mut self, type_name: &str, value: HostValue) -> ObjectId {
        let id = self.alloc(value);
        if let Some(object) = self.objects.get_mut(&id) {
            object.type_name = Some(type_name.to_string());
        }
        id
    }

    /// Get an object by id
    pub fn get(&self, id: ObjectId) -> Option<&HostObject> {
        self.objects.get(&id)
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.objects.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

impl From<Vec<HostObject>> for Heap {
    fn from(objects: Vec<HostObject>) -> Self {
        let mut heap = Heap::new();
        for object in objects {
            heap.insert(object);
        }
        heap
    }
}

impl From<Heap> for Vec<HostObject> {
    fn from(heap: Heap) -> Self {
        let mut objects: Vec<HostObject> = heap.objects.into_values().collect();
        objects.sort_by_key(|object| object.id);
        objects
    }
}
