//! Dotted addresses into a state document (`resources.3.instances.0`) and the patches applied
//! through them.

use serde_json::Value;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PathError {
    #[error("path '{0}' does not resolve to a value")]
    Missing(String),
    #[error("path '{path}' cannot be written: parent is not an object or array")]
    NotContainer { path: String },
    #[error("path '{0}' is empty")]
    Empty(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StatePath {
    segments: Vec<String>,
}

impl StatePath {
    pub fn parse(path: &str) -> Self {
        StatePath {
            segments: path
                .split('.')
                .filter(|segment| !segment.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }

    pub fn resource(index: usize) -> Self {
        StatePath {
            segments: vec!["resources".to_string(), index.to_string()],
        }
    }

    pub fn child<T: ToString>(&self, segment: T) -> Self {
        let mut segments = self.segments.clone();
        segments.push(segment.to_string());
        StatePath { segments }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// RFC 6901 pointer for the same location.
    pub fn to_pointer(&self) -> String {
        self.segments
            .iter()
            .map(|segment| format!("/{}", segment.replace('~', "~0").replace('/', "~1")))
            .collect()
    }

    fn split_last(&self) -> Option<(StatePath, &str)> {
        let (last, parent) = self.segments.split_last()?;
        Some((
            StatePath {
                segments: parent.to_vec(),
            },
            last.as_str(),
        ))
    }

    pub fn get<'a>(&self, doc: &'a Value) -> Option<&'a Value> {
        doc.pointer(&self.to_pointer())
    }

    /// Write `value` at this path. Object keys are replaced in place or appended; array slots
    /// must already exist.
    pub fn set(&self, doc: &mut Value, value: Value) -> Result<(), PathError> {
        let (parent_path, key) = self
            .split_last()
            .ok_or_else(|| PathError::Empty(self.to_string()))?;
        let parent = doc
            .pointer_mut(&parent_path.to_pointer())
            .ok_or_else(|| PathError::Missing(parent_path.to_string()))?;
        match parent {
            Value::Object(map) => {
                map.insert(key.to_string(), value);
                Ok(())
            }
            Value::Array(items) => {
                let slot = key
                    .parse::<usize>()
                    .ok()
                    .and_then(|index| items.get_mut(index))
                    .ok_or_else(|| PathError::Missing(self.to_string()))?;
                *slot = value;
                Ok(())
            }
            _ => Err(PathError::NotContainer {
                path: self.to_string(),
            }),
        }
    }

    /// Remove the value at this path, shifting later array elements down.
    pub fn delete(&self, doc: &mut Value) -> Result<Value, PathError> {
        let (parent_path, key) = self
            .split_last()
            .ok_or_else(|| PathError::Empty(self.to_string()))?;
        let parent = doc
            .pointer_mut(&parent_path.to_pointer())
            .ok_or_else(|| PathError::Missing(parent_path.to_string()))?;
        match parent {
            // shift_remove keeps the remaining keys in document order
            Value::Object(map) => map
                .shift_remove(key)
                .ok_or_else(|| PathError::Missing(self.to_string())),
            Value::Array(items) => match key.parse::<usize>() {
                Ok(index) if index < items.len() => Ok(items.remove(index)),
                _ => Err(PathError::Missing(self.to_string())),
            },
            _ => Err(PathError::NotContainer {
                path: self.to_string(),
            }),
        }
    }
}

impl fmt::Display for StatePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("."))
    }
}
