//! Recursive parameter schema types.
//!
//! A library describes the inputs of an operation as a tree of
//! [`Parameter`] values rooted at a [`ParameterData`]. Every parameter carries
//! a [`ParameterBase`] with its name, whether it is mandatory, an optional
//! description, and its selection state. Mandatory parameters are selected on
//! construction and can never be deselected.
//!
//! The serialised form is tag-discriminated on `"type"`:
//!
//! ```json
//! {
//!   "type": "parameter_list",
//!   "name": "ping",
//!   "mandatory": true,
//!   "description": null,
//!   "isSelected": true,
//!   "parameters": [
//!     { "type": "string_value", "name": "target", "mandatory": true,
//!       "description": null, "isSelected": true, "value": "" }
//!   ]
//! }
//! ```

mod arguments;
mod selection;
mod wire;


use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use self::selection::{ParameterPath, ParameterPathParseError, ParameterValue};

/// Discriminant of a [`Parameter`] variant.
///
/// The tag is always derived from the variant and is never stored.
///
/// # Example
///
/// ```
/// use webcli_plugins::parameter::{Parameter, ParameterType, StringValue};
///
/// let parameter = Parameter::from(StringValue::new("target"));
/// assert_eq!(parameter.kind(), ParameterType::StringValue);
/// assert_eq!(parameter.kind().as_str(), "string_value");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterType {
    /// A simple on/off flag.
    Preference,
    /// A free-text field.
    StringValue,
    /// A composite group of independently selected parameters.
    ParameterList,
    /// A mutually exclusive choice among parameter lists.
    ParameterOptionsToList,
}

impl ParameterType {
    /// Returns the canonical string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Preference => "preference",
            Self::StringValue => "string_value",
            Self::ParameterList => "parameter_list",
            Self::ParameterOptionsToList => "parameter_options_to_list",
        }
    }
}

impl fmt::Display for ParameterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors raised while building, mutating, or validating parameter schemas.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParameterError {
    /// A mandatory parameter cannot be deselected.
    #[error("parameter '{name}' is mandatory and cannot be deselected")]
    MandatoryDeselect {
        /// Parameter name.
        name: String,
    },

    /// An option index does not address an element of `options`.
    #[error("option {index} is out of range for '{name}' ({len} options)")]
    OptionOutOfRange {
        /// Options group name.
        name: String,
        /// Requested index.
        index: usize,
        /// Number of available options.
        len: usize,
    },

    /// A serialised option index was negative but not `-1`.
    #[error("selectedListIdx must be -1 or a valid index, got {value}")]
    NegativeIndex {
        /// Serialised value.
        value: i64,
    },

    /// A parameter path index does not address a child.
    #[error("'{name}' has no parameter at index {index}")]
    InvalidPath {
        /// Parent list name.
        name: String,
        /// Requested child index.
        index: usize,
    },

    /// A parameter path continues below a leaf parameter.
    #[error("cannot descend into '{name}': it has no children")]
    CannotDescend {
        /// Leaf parameter name.
        name: String,
    },

    /// A parameter path passes through an options group with no choice.
    #[error("options group '{name}' has no selected option")]
    NoOptionSelected {
        /// Options group name.
        name: String,
    },

    /// A value of the wrong shape was applied to a parameter.
    #[error("value '{value}' cannot be applied to {kind} parameter '{name}'")]
    ValueMismatch {
        /// Parameter name.
        name: String,
        /// Parameter variant.
        kind: ParameterType,
        /// Rendering of the rejected value.
        value: String,
    },

    /// A selected parameter is not ready for submission.
    #[error("parameter '{name}' at '{path}' is incomplete")]
    Incomplete {
        /// Parameter name.
        name: String,
        /// Location of the parameter in the schema.
        path: ParameterPath,
    },

    /// A parameter has an empty name.
    #[error("parameter at '{path}' has an empty name")]
    EmptyName {
        /// Location of the parameter in the schema.
        path: ParameterPath,
    },

    /// Two siblings share a name.
    #[error("'{parent}' contains more than one parameter named '{name}'")]
    DuplicateName {
        /// Parent list or options group name.
        parent: String,
        /// Duplicated name.
        name: String,
    },
}

/// Fields shared by every parameter variant.
///
/// # Example
///
/// ```
/// use webcli_plugins::parameter::ParameterBase;
///
/// let base = ParameterBase::new("target").mandatory();
/// assert!(base.is_mandatory());
/// assert!(base.is_selected());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "wire::BaseWire")]
pub struct ParameterBase {
    name: String,
    mandatory: bool,
    description: Option<String>,
    #[serde(rename = "isSelected")]
    is_selected: bool,
}

impl ParameterBase {
    /// Creates an optional, unselected base with no description.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            mandatory: false,
            description: None,
            is_selected: false,
        }
    }

    /// Marks the parameter mandatory, which also selects it.
    #[must_use]
    pub const fn mandatory(mut self) -> Self {
        self.mandatory = true;
        self.is_selected = true;
        self
    }

    /// Attaches a human-readable description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Pre-selects an optional parameter.
    #[must_use]
    pub const fn selected(mut self) -> Self {
        self.is_selected = true;
        self
    }

    /// Returns the parameter name.
    #[must_use]
    pub const fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns `true` when the parameter is mandatory.
    #[must_use]
    pub const fn is_mandatory(&self) -> bool {
        self.mandatory
    }

    /// Returns the description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the current selection state.
    #[must_use]
    pub const fn is_selected(&self) -> bool {
        self.is_selected
    }

    /// Updates the selection state.
    ///
    /// # Errors
    ///
    /// Returns [`ParameterError::MandatoryDeselect`] when deselecting a
    /// mandatory parameter.
    pub fn set_selected(&mut self, selected: bool) -> Result<(), ParameterError> {
        if !selected && self.mandatory {
            return Err(ParameterError::MandatoryDeselect {
                name: self.name.clone(),
            });
        }
        self.is_selected = selected;
        Ok(())
    }
}

/// An on/off flag with no payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preference {
    #[serde(flatten)]
    base: ParameterBase,
}

impl Preference {
    /// Creates an optional, unselected flag.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self::from_base(ParameterBase::new(name))
    }

    /// Creates a flag from a prepared base.
    #[must_use]
    pub const fn from_base(base: ParameterBase) -> Self {
        Self { base }
    }

    /// Returns the shared fields.
    #[must_use]
    pub const fn base(&self) -> &ParameterBase {
        &self.base
    }
}

/// A free-text field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StringValue {
    #[serde(flatten)]
    base: ParameterBase,
    #[serde(default)]
    value: String,
}

impl StringValue {
    /// Creates an optional, unselected field with an empty value.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self::from_base(ParameterBase::new(name))
    }

    /// Creates a field from a prepared base.
    #[must_use]
    pub const fn from_base(base: ParameterBase) -> Self {
        Self {
            base,
            value: String::new(),
        }
    }

    /// Sets an initial value.
    #[must_use]
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    /// Returns the shared fields.
    #[must_use]
    pub const fn base(&self) -> &ParameterBase {
        &self.base
    }

    /// Returns the current text.
    #[must_use]
    pub const fn value(&self) -> &str {
        self.value.as_str()
    }

    /// Replaces the current text.
    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
    }
}

/// An ordered group of sibling parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterList {
    #[serde(flatten)]
    base: ParameterBase,
    #[serde(default)]
    parameters: Vec<Parameter>,
}

impl ParameterList {
    /// Creates an optional, unselected, empty list.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self::from_base(ParameterBase::new(name))
    }

    /// Creates a list from a prepared base.
    #[must_use]
    pub const fn from_base(base: ParameterBase) -> Self {
        Self {
            base,
            parameters: Vec::new(),
        }
    }

    /// Appends a child parameter.
    #[must_use]
    pub fn with(mut self, parameter: impl Into<Parameter>) -> Self {
        self.parameters.push(parameter.into());
        self
    }

    /// Returns the shared fields.
    #[must_use]
    pub const fn base(&self) -> &ParameterBase {
        &self.base
    }

    /// Returns the child parameters in order.
    #[must_use]
    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    /// Looks up a direct child by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Parameter> {
        self.parameters.iter().find(|p| p.name() == name)
    }
}

/// A mutually exclusive choice among named parameter lists.
///
/// # Example
///
/// ```
/// use webcli_plugins::parameter::{ParameterList, ParameterOptionsToList};
///
/// let mut protocol = ParameterOptionsToList::new("protocol")
///     .with_option(ParameterList::new("tcp"))
///     .with_option(ParameterList::new("udp"));
/// assert!(protocol.selected_index().is_none());
///
/// protocol.select(1).expect("udp exists");
/// assert_eq!(protocol.selected_option().map(|o| o.base().name()), Some("udp"));
/// assert!(protocol.select(2).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "wire::OptionsToListWire")]
pub struct ParameterOptionsToList {
    #[serde(flatten)]
    base: ParameterBase,
    #[serde(with = "wire::tagged_lists")]
    options: Vec<ParameterList>,
    #[serde(rename = "selectedListIdx", with = "wire::list_index")]
    selected_list_idx: Option<usize>,
}

impl ParameterOptionsToList {
    /// Creates an optional, unselected group with no options.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self::from_base(ParameterBase::new(name))
    }

    /// Creates a group from a prepared base.
    #[must_use]
    pub const fn from_base(base: ParameterBase) -> Self {
        Self {
            base,
            options: Vec::new(),
            selected_list_idx: None,
        }
    }

    /// Appends an alternative.
    #[must_use]
    pub fn with_option(mut self, option: ParameterList) -> Self {
        self.options.push(option);
        self
    }

    /// Returns the shared fields.
    #[must_use]
    pub const fn base(&self) -> &ParameterBase {
        &self.base
    }

    /// Returns the alternatives in order.
    #[must_use]
    pub fn options(&self) -> &[ParameterList] {
        &self.options
    }

    /// Returns the chosen index, or `None` when nothing is chosen.
    #[must_use]
    pub const fn selected_index(&self) -> Option<usize> {
        self.selected_list_idx
    }

    /// Returns the chosen alternative.
    #[must_use]
    pub fn selected_option(&self) -> Option<&ParameterList> {
        self.selected_list_idx.and_then(|idx| self.options.get(idx))
    }

    /// Chooses the alternative at `index`.
    ///
    /// The group and the chosen option become selected; a previously chosen
    /// optional alternative is deselected.
    ///
    /// # Errors
    ///
    /// Returns [`ParameterError::OptionOutOfRange`] when `index` does not
    /// address an option.
    pub fn select(&mut self, index: usize) -> Result<(), ParameterError> {
        if index >= self.options.len() {
            return Err(ParameterError::OptionOutOfRange {
                name: self.base.name.clone(),
                index,
                len: self.options.len(),
            });
        }
        self.release_choice();
        if let Some(option) = self.options.get_mut(index) {
            option.base.is_selected = true;
        }
        self.selected_list_idx = Some(index);
        self.base.is_selected = true;
        Ok(())
    }

    /// Forgets the current choice, resetting the index to "none".
    pub fn clear_selection(&mut self) {
        self.release_choice();
        self.selected_list_idx = None;
    }

    fn release_choice(&mut self) {
        let previous = self
            .selected_list_idx
            .and_then(|idx| self.options.get_mut(idx));
        if let Some(option) = previous {
            if !option.base.mandatory {
                option.base.is_selected = false;
            }
        }
    }
}

/// Any parameter in a schema tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Parameter {
    /// An on/off flag.
    Preference(Preference),
    /// A free-text field.
    StringValue(StringValue),
    /// A nested group.
    ParameterList(ParameterList),
    /// A nested choice.
    ParameterOptionsToList(ParameterOptionsToList),
}

impl Parameter {
    /// Returns the variant tag.
    #[must_use]
    pub const fn kind(&self) -> ParameterType {
        match self {
            Self::Preference(_) => ParameterType::Preference,
            Self::StringValue(_) => ParameterType::StringValue,
            Self::ParameterList(_) => ParameterType::ParameterList,
            Self::ParameterOptionsToList(_) => ParameterType::ParameterOptionsToList,
        }
    }

    /// Returns the shared fields.
    #[must_use]
    pub const fn base(&self) -> &ParameterBase {
        match self {
            Self::Preference(p) => &p.base,
            Self::StringValue(p) => &p.base,
            Self::ParameterList(p) => &p.base,
            Self::ParameterOptionsToList(p) => &p.base,
        }
    }

    /// Returns the parameter name.
    #[must_use]
    pub const fn name(&self) -> &str {
        self.base().name()
    }

    /// Returns the current selection state.
    #[must_use]
    pub const fn is_selected(&self) -> bool {
        self.base().is_selected()
    }
}

impl From<Preference> for Parameter {
    fn from(value: Preference) -> Self {
        Self::Preference(value)
    }
}

impl From<StringValue> for Parameter {
    fn from(value: StringValue) -> Self {
        Self::StringValue(value)
    }
}

impl From<ParameterList> for Parameter {
    fn from(value: ParameterList) -> Self {
        Self::ParameterList(value)
    }
}

impl From<ParameterOptionsToList> for Parameter {
    fn from(value: ParameterOptionsToList) -> Self {
        Self::ParameterOptionsToList(value)
    }
}

/// Top-level parameter schema returned for an operation.
///
/// Only the composite variants may appear at the root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ParameterData {
    /// A group of parameters.
    ParameterList(ParameterList),
    /// A choice among parameter groups.
    ParameterOptionsToList(ParameterOptionsToList),
}

impl ParameterData {
    /// Returns the variant tag.
    #[must_use]
    pub const fn kind(&self) -> ParameterType {
        match self {
            Self::ParameterList(_) => ParameterType::ParameterList,
            Self::ParameterOptionsToList(_) => ParameterType::ParameterOptionsToList,
        }
    }

    /// Returns the root's shared fields.
    #[must_use]
    pub const fn base(&self) -> &ParameterBase {
        match self {
            Self::ParameterList(p) => &p.base,
            Self::ParameterOptionsToList(p) => &p.base,
        }
    }

    /// Checks that every parameter is named and siblings are distinct.
    ///
    /// # Errors
    ///
    /// Returns [`ParameterError::EmptyName`] or
    /// [`ParameterError::DuplicateName`] for the first violation found.
    pub fn check_structure(&self) -> Result<(), ParameterError> {
        let mut path = Vec::new();
        match self {
            Self::ParameterList(list) => check_list(list, &mut path),
            Self::ParameterOptionsToList(group) => check_group(group, &mut path),
        }
    }

    /// Checks that every selected parameter is ready for submission.
    ///
    /// An unselected parameter is always complete. A selected options group
    /// needs a complete chosen option, a selected list needs complete
    /// children, and a selected text field needs non-blank text. The root is
    /// checked whether or not it is selected.
    ///
    /// # Errors
    ///
    /// Returns [`ParameterError::Incomplete`] naming the first incomplete
    /// parameter.
    pub fn validate(&self) -> Result<(), ParameterError> {
        let mut path = Vec::new();
        let outcome = match self {
            Self::ParameterList(list) => first_incomplete_list(list, &mut path),
            Self::ParameterOptionsToList(group) => first_incomplete_group(group, &mut path),
        };
        outcome.map_or(Ok(()), |name| {
            Err(ParameterError::Incomplete {
                name,
                path: ParameterPath::from(path),
            })
        })
    }
}

impl From<ParameterList> for ParameterData {
    fn from(value: ParameterList) -> Self {
        Self::ParameterList(value)
    }
}

impl From<ParameterOptionsToList> for ParameterData {
    fn from(value: ParameterOptionsToList) -> Self {
        Self::ParameterOptionsToList(value)
    }
}

fn check_name(base: &ParameterBase, path: &[usize]) -> Result<(), ParameterError> {
    if base.name.trim().is_empty() {
        return Err(ParameterError::EmptyName {
            path: ParameterPath::from(path.to_vec()),
        });
    }
    Ok(())
}

fn check_unique<'a>(
    parent: &ParameterBase,
    names: impl Iterator<Item = &'a str>,
) -> Result<(), ParameterError> {
    let mut seen = HashSet::new();
    for name in names {
        if !seen.insert(name) {
            return Err(ParameterError::DuplicateName {
                parent: parent.name.clone(),
                name: name.to_owned(),
            });
        }
    }
    Ok(())
}

fn check_list(list: &ParameterList, path: &mut Vec<usize>) -> Result<(), ParameterError> {
    check_name(&list.base, path)?;
    check_unique(&list.base, list.parameters.iter().map(Parameter::name))?;
    for (index, child) in list.parameters.iter().enumerate() {
        path.push(index);
        match child {
            Parameter::Preference(p) => check_name(&p.base, path)?,
            Parameter::StringValue(p) => check_name(&p.base, path)?,
            Parameter::ParameterList(p) => check_list(p, path)?,
            Parameter::ParameterOptionsToList(p) => check_group(p, path)?,
        }
        path.pop();
    }
    Ok(())
}

fn check_group(group: &ParameterOptionsToList, path: &mut Vec<usize>) -> Result<(), ParameterError> {
    check_name(&group.base, path)?;
    check_unique(&group.base, group.options.iter().map(|o| o.base.name()))?;
    // Options are addressed through the current choice, not by index.
    group.options.iter().try_for_each(|option| check_list(option, path))
}

fn first_incomplete(parameter: &Parameter, path: &mut Vec<usize>) -> Option<String> {
    if !parameter.is_selected() {
        return None;
    }
    match parameter {
        Parameter::Preference(_) => None,
        Parameter::StringValue(p) => p
            .value
            .trim()
            .is_empty()
            .then(|| p.base.name.clone()),
        Parameter::ParameterList(p) => first_incomplete_list(p, path),
        Parameter::ParameterOptionsToList(p) => first_incomplete_group(p, path),
    }
}

fn first_incomplete_list(list: &ParameterList, path: &mut Vec<usize>) -> Option<String> {
    for (index, child) in list.parameters.iter().enumerate() {
        path.push(index);
        if let Some(name) = first_incomplete(child, path) {
            return Some(name);
        }
        path.pop();
    }
    None
}

fn first_incomplete_group(
    group: &ParameterOptionsToList,
    path: &mut Vec<usize>,
) -> Option<String> {
    group.selected_option().map_or_else(
        || Some(group.base.name.clone()),
        |option| first_incomplete_list(option, path),
    )
}
