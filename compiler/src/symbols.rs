use std::collections::HashMap;

use serde::{Serialize, Serializer};

use crate::types::Message;

/// Messages keyed by identifier, iterated in declaration order.
///
/// Lookups go through `index`; `messages` is append-only so emission order
/// never depends on hashing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SymbolTable {
    index:    HashMap<String, usize>,
    messages: Vec<Message>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&Message> {
        self.index.get(name).map(|&i| &self.messages[i])
    }

    /// Appends `message`, or replaces the entry with the same identifier in
    /// place and returns the previous one.
    pub fn insert(&mut self, message: Message) -> Option<Message> {
        match self.index.get(&message.identifier) {
            Some(&i) => Some(std::mem::replace(&mut self.messages[i], message)),
            None => {
                self.index.insert(message.identifier.clone(), self.messages.len());
                self.messages.push(message);
                None
            }
        }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Message> {
        self.messages.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.messages.iter().map(|m| m.identifier.as_str())
    }
}

impl<'a> IntoIterator for &'a SymbolTable {
    type Item     = &'a Message;
    type IntoIter = std::slice::Iter<'a, Message>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl Serialize for SymbolTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(&self.messages)
    }
}
