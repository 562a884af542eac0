//! Live call frames as reported by the runtime
//!
//! A [`RawFrame`] is what the stepping collaborator sees before any filtering:
//! every local the runtime knows about, including dunder names and callables.
//! [`crate::snapshot::StackSnapshot::capture`] turns a stack of these into the
//! filtered, display-ready form.

use super::value::ObjectId;
use serde::{Deserialize, Serialize};

/// Activation record of one function call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawFrame {
    pub name: String,
    pub filename: String,
    /// Local name -> object, in the order the runtime reported them
    #[serde(default)]
    pub locals: Vec<(String, ObjectId)>,
}

impl RawFrame {
    pub fn new(name: &str, filename: &str) -> Self {
        RawFrame {
            name: name.to_string(),
            filename: filename.to_string(),
            locals: Vec::new(),
        }
    }

    /// Bind a local, replacing an existing binding of the same name
    pub fn bind(&mut self, name: &str, id: ObjectId) {
        if let Some(slot) = self.locals.iter_mut().find(|(n, _)| n == name) {
            slot.1 = id;
        } else {
            self.locals.push((name.to_string(), id));
        }
    }

    /// Builder-style variant of [`RawFrame::bind`]
    pub fn with(mut self, name: &str, id: ObjectId) -> Self {
        self.bind(name, id);
        self
    }
}
