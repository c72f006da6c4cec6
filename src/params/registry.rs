//! Name-to-index resolution for fields and postprocessors.

use std::collections::HashMap;

use crate::error::{ConfigurationError, Result};
use crate::types::{FieldId, PostprocessorId};

use super::coupled::{Coupled, CoupledInput};

/// Host-provided table of field and postprocessor names.
///
/// Terms resolve every coupled name against this table once, at
/// construction; the resulting indices are stable for the term's lifetime.
#[derive(Clone, Debug, Default)]
pub struct FieldRegistry {
    fields: HashMap<String, FieldId>,
    postprocessors: HashMap<String, PostprocessorId>,
}

impl FieldRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry whose field ids follow the order of `names`.
    pub fn with_fields<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut registry = Self::new();
        for name in names {
            registry.add_field(name);
        }
        registry
    }

    /// Register postprocessors in order.
    pub fn with_postprocessors<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for name in names {
            self.add_postprocessor(name);
        }
        self
    }

    /// Register a field; returns its id. Re-registering returns the existing id.
    pub fn add_field(&mut self, name: impl Into<String>) -> FieldId {
        let next = FieldId::new(self.fields.len());
        *self.fields.entry(name.into()).or_insert(next)
    }

    /// Register a postprocessor; returns its id.
    pub fn add_postprocessor(&mut self, name: impl Into<String>) -> PostprocessorId {
        let next = PostprocessorId::new(self.postprocessors.len());
        *self.postprocessors.entry(name.into()).or_insert(next)
    }

    /// Number of registered fields.
    pub fn num_fields(&self) -> usize {
        self.fields.len()
    }

    /// Number of registered postprocessors.
    pub fn num_postprocessors(&self) -> usize {
        self.postprocessors.len()
    }

    /// Look up a field id.
    pub fn field_id(&self, name: &str) -> Option<FieldId> {
        self.fields.get(name).copied()
    }

    /// Resolve a required field name.
    pub fn resolve_field(&self, object: &'static str, name: &str) -> Result<FieldId> {
        self.field_id(name)
            .ok_or_else(|| ConfigurationError::UnknownField {
                object,
                name: name.to_string(),
            })
    }

    /// Resolve a coupled input (field name or constant).
    pub fn resolve(&self, object: &'static str, input: &CoupledInput) -> Result<Coupled> {
        match input {
            CoupledInput::Constant(c) => Ok(Coupled::Constant(*c)),
            CoupledInput::Field(name) => self.resolve_field(object, name).map(Coupled::Field),
        }
    }

    /// Resolve a list of coupled inputs.
    pub fn resolve_all(&self, object: &'static str, inputs: &[CoupledInput]) -> Result<Vec<Coupled>> {
        inputs.iter().map(|i| self.resolve(object, i)).collect()
    }

    /// Resolve a postprocessor name.
    pub fn resolve_postprocessor(&self, object: &'static str, name: &str) -> Result<PostprocessorId> {
        self.postprocessors
            .get(name)
            .copied()
            .ok_or_else(|| ConfigurationError::UnknownPostprocessor {
                object,
                name: name.to_string(),
            })
    }
}
