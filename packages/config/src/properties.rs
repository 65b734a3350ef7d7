//! Named configuration properties grouped in sections.
//!
//! Typing a property name as a command prints its value; typing it with an
//! argument sets it. Values are kept as strings.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use std::collections::BTreeMap;

/// Section/property/value store. Property lookups ignore case.
#[derive(Debug, Clone, Default)]
pub struct PropertyStore {
    sections: BTreeMap<String, BTreeMap<String, String>>,
}

impl PropertyStore {
    #[must_use]
    pub const fn new(sections: BTreeMap<String, BTreeMap<String, String>>) -> Self {
        Self { sections }
    }

    /// The section that defines `property`, if any.
    #[must_use]
    pub fn section_for(&self, property: &str) -> Option<&str> {
        self.sections
            .iter()
            .find(|(_, props)| props.keys().any(|k| k.eq_ignore_ascii_case(property)))
            .map(|(name, _)| name.as_str())
    }

    /// The value of a property in a section.
    #[must_use]
    pub fn get(&self, section: &str, property: &str) -> Option<&str> {
        self.sections
            .get(section)?
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(property))
            .map(|(_, v)| v.as_str())
    }

    /// Set a property, replacing an existing key that differs only in case.
    pub fn set(&mut self, section: &str, property: &str, value: &str) {
        let props = self.sections.entry(section.to_string()).or_default();
        let key = props
            .keys()
            .find(|k| k.eq_ignore_ascii_case(property))
            .cloned()
            .unwrap_or_else(|| property.to_string());
        log::debug!("Property [{section}] {key} = {value}");
        props.insert(key, value.to_string());
    }
}
