//! Cascading dropdowns driven by a dependency table.
//!
//! Each field is declared with either a fixed option list or a parent field
//! plus a lookup from the parent's value to the child's options. Changing a
//! field clears every field downstream of it and recomputes their options.
//!
//! Fields must be declared after the field they depend on, so the table is
//! always acyclic and declaration order is a valid evaluation order.

use std::collections::{HashMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Maps a parent value to the child's option list.
pub type Lookup = Box<dyn Fn(&str) -> Vec<String>>;

/// Errors from building or driving a form.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormError {
    #[error("Unknown field '{0}'")]
    UnknownField(String),

    #[error("Field '{0}' is declared twice")]
    DuplicateField(String),

    /// The parent must be declared before the child.
    #[error("Field '{field}' depends on undeclared field '{parent}'")]
    UnknownParent { field: String, parent: String },

    #[error("'{value}' is not an option for field '{field}'")]
    InvalidOption { field: String, value: String },
}

enum Source {
    Fixed(Vec<String>),
    Derived { parent: String, lookup: Lookup },
}

struct Field {
    name: String,
    source: Source,
    value: Option<String>,
    options: Vec<String>,
}

/// A small reactive form over dependent select fields.
#[derive(Default)]
pub struct FormEngine {
    fields: Vec<Field>,
    index: HashMap<String, usize>,
}

impl fmt::Debug for FormEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.fields.iter().map(|field| (&field.name, &field.value)))
            .finish()
    }
}

impl FormEngine {
    pub fn new() -> Self {
        Self::default()
    }

    fn declare(
        &mut self,
        name: &str,
        source: Source,
        options: Vec<String>,
    ) -> Result<(), FormError> {
        if self.index.contains_key(name) {
            return Err(FormError::DuplicateField(name.to_string()));
        }
        self.index.insert(name.to_string(), self.fields.len());
        self.fields.push(Field {
            name: name.to_string(),
            source,
            value: None,
            options,
        });
        Ok(())
    }

    /// Declare a root field with a fixed option list.
    pub fn add_field<I, S>(&mut self, name: &str, options: I) -> Result<(), FormError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let options: Vec<String> = options.into_iter().map(Into::into).collect();
        self.declare(name, Source::Fixed(options.clone()), options)
    }

    /// Declare a field whose options come from `lookup` applied to the
    /// value of `parent`. Empty until the parent has a value.
    pub fn add_dependent<F>(
        &mut self,
        name: &str,
        parent: &str,
        lookup: F,
    ) -> Result<(), FormError>
    where
        F: Fn(&str) -> Vec<String> + 'static,
    {
        let parent_idx = *self.index.get(parent).ok_or_else(|| FormError::UnknownParent {
            field: name.to_string(),
            parent: parent.to_string(),
        })?;
        let options = match &self.fields[parent_idx].value {
            Some(v) => lookup(v),
            None => Vec::new(),
        };
        let source = Source::Derived {
            parent: parent.to_string(),
            lookup: Box::new(lookup),
        };
        self.declare(name, source, options)
    }

    fn field(&self, name: &str) -> Result<&Field, FormError> {
        self.index
            .get(name)
            .map(|&i| &self.fields[i])
            .ok_or_else(|| FormError::UnknownField(name.to_string()))
    }

    pub fn value(&self, name: &str) -> Option<&str> {
        self.field(name).ok().and_then(|f| f.value.as_deref())
    }

    /// Current options for `name`; empty for unknown fields.
    pub fn options(&self, name: &str) -> &[String] {
        self.field(name).map(|f| f.options.as_slice()).unwrap_or(&[])
    }

    /// Parent of `name`, if it is a dependent field.
    pub fn depends_on(&self, name: &str) -> Option<&str> {
        match &self.field(name).ok()?.source {
            Source::Derived { parent, .. } => Some(parent),
            Source::Fixed(_) => None,
        }
    }

    /// Select `value` for `name` and refresh everything downstream.
    pub fn set(&mut self, name: &str, value: &str) -> Result<(), FormError> {
        let idx = *self
            .index
            .get(name)
            .ok_or_else(|| FormError::UnknownField(name.to_string()))?;
        if !self.fields[idx].options.iter().any(|o| o == value) {
            return Err(FormError::InvalidOption {
                field: name.to_string(),
                value: value.to_string(),
            });
        }
        if self.fields[idx].value.as_deref() == Some(value) {
            return Ok(());
        }
        self.fields[idx].value = Some(value.to_string());
        self.propagate(idx);
        Ok(())
    }

    /// Clear `name` and everything downstream.
    pub fn clear(&mut self, name: &str) -> Result<(), FormError> {
        let idx = *self
            .index
            .get(name)
            .ok_or_else(|| FormError::UnknownField(name.to_string()))?;
        self.fields[idx].value = None;
        self.propagate(idx);
        Ok(())
    }

    /// Clear all values and restore initial option lists.
    pub fn reset(&mut self) {
        for field in &mut self.fields {
            field.value = None;
            field.options = match &field.source {
                Source::Fixed(options) => options.clone(),
                Source::Derived { .. } => Vec::new(),
            };
        }
    }

    /// Every field reachable from `name` through dependency edges, in
    /// evaluation order.
    pub fn dependents(&self, name: &str) -> Vec<&str> {
        match self.index.get(name) {
            Some(&idx) => self
                .downstream(idx)
                .into_iter()
                .map(|i| self.fields[i].name.as_str())
                .collect(),
            None => Vec::new(),
        }
    }

    fn downstream(&self, idx: usize) -> Vec<usize> {
        let mut changed: HashSet<&str> = HashSet::from([self.fields[idx].name.as_str()]);
        let mut out = Vec::new();
        for (i, field) in self.fields.iter().enumerate().skip(idx + 1) {
            if let Source::Derived { parent, .. } = &field.source {
                if changed.contains(parent.as_str()) {
                    changed.insert(field.name.as_str());
                    out.push(i);
                }
            }
        }
        out
    }

    fn propagate(&mut self, idx: usize) {
        for i in self.downstream(idx) {
            let options = match &self.fields[i].source {
                Source::Derived { parent, lookup } => {
                    let parent_idx = self.index[parent.as_str()];
                    match &self.fields[parent_idx].value {
                        Some(v) => lookup(v),
                        None => Vec::new(),
                    }
                }
                Source::Fixed(options) => options.clone(),
            };
            let field = &mut self.fields[i];
            debug!(field = %field.name, options = options.len(), "dependent field reset");
            field.value = None;
            field.options = options;
        }
    }

    /// All selected values, in declaration order.
    pub fn values(&self) -> Vec<(&str, &str)> {
        self.fields
            .iter()
            .filter_map(|f| f.value.as_deref().map(|v| (f.name.as_str(), v)))
            .collect()
    }
}

/// A production process and the units that run it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Process {
    pub name: String,
    #[serde(default)]
    pub units: Vec<String>,
}

/// A reject category and its defect details.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RejectCategory {
    pub name: String,
    #[serde(default)]
    pub defects: Vec<String>,
}

/// Lookup lists maintained by admins.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MasterData {
    pub zones: Vec<String>,
    pub processes: Vec<Process>,
    pub reject_categories: Vec<RejectCategory>,
}

pub const FIELD_ZONE: &str = "zone";
pub const FIELD_PROCESS: &str = "process";
pub const FIELD_UNIT: &str = "unit";
pub const FIELD_REJECT_CATEGORY: &str = "reject_category";
pub const FIELD_DEFECT: &str = "defect";

impl MasterData {
    pub fn units_for(&self, process: &str) -> Vec<String> {
        self.processes
            .iter()
            .find(|p| p.name == process)
            .map(|p| p.units.clone())
            .unwrap_or_default()
    }

    pub fn defects_for(&self, category: &str) -> Vec<String> {
        self.reject_categories
            .iter()
            .find(|c| c.name == category)
            .map(|c| c.defects.clone())
            .unwrap_or_default()
    }

    /// The reject logging form: zone, process -> unit, reject category ->
    /// defect detail.
    pub fn reject_form(&self) -> Result<FormEngine, FormError> {
        let mut form = FormEngine::new();
        form.add_field(FIELD_ZONE, self.zones.clone())?;
        form.add_field(FIELD_PROCESS, self.processes.iter().map(|p| p.name.clone()))?;
        let data = self.clone();
        form.add_dependent(FIELD_UNIT, FIELD_PROCESS, move |p| data.units_for(p))?;
        form.add_field(
            FIELD_REJECT_CATEGORY,
            self.reject_categories.iter().map(|c| c.name.clone()),
        )?;
        let data = self.clone();
        form.add_dependent(FIELD_DEFECT, FIELD_REJECT_CATEGORY, move |c| {
            data.defects_for(c)
        })?;
        Ok(form)
    }
}
