//! Caller-side mutation of selection state.
//!
//! A [`ParameterPath`] addresses a parameter by child indices. Lists consume
//! one index per level; an options group is entered through its current
//! choice without consuming an index.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{
    Parameter, ParameterData, ParameterError, ParameterList, ParameterOptionsToList,
    ParameterType, Preference, StringValue,
};

/// Index path from the schema root to a parameter.
///
/// Renders and parses as dot-separated indices; the empty path is the root.
///
/// # Example
///
/// ```
/// use webcli_plugins::parameter::ParameterPath;
///
/// let path: ParameterPath = "0.2".parse().expect("valid path");
/// assert_eq!(path.indices(), &[0, 2]);
/// assert_eq!(path.to_string(), "0.2");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParameterPath(Vec<usize>);

impl ParameterPath {
    /// Returns the root path.
    #[must_use]
    pub const fn root() -> Self {
        Self(Vec::new())
    }

    /// Returns the child indices.
    #[must_use]
    pub fn indices(&self) -> &[usize] {
        &self.0
    }
}

impl From<Vec<usize>> for ParameterPath {
    fn from(indices: Vec<usize>) -> Self {
        Self(indices)
    }
}

impl fmt::Display for ParameterPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for index in &self.0 {
            if !first {
                f.write_str(".")?;
            }
            write!(f, "{index}")?;
            first = false;
        }
        Ok(())
    }
}

/// Error raised when a [`ParameterPath`] cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid parameter path segment '{segment}'")]
pub struct ParameterPathParseError {
    segment: String,
}

impl FromStr for ParameterPath {
    type Err = ParameterPathParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Ok(Self::root());
        }
        s.split('.')
            .map(|segment| {
                segment
                    .trim()
                    .parse::<usize>()
                    .map_err(|_| ParameterPathParseError {
                        segment: segment.to_owned(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }
}

/// A value a caller applies to a parameter.
///
/// Serialises untagged so a boolean, string, or number can be sent as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParameterValue {
    /// Selects or deselects the addressed parameter.
    Toggle(bool),
    /// Chooses an option of the addressed options group.
    Choice(usize),
    /// Replaces the text of the addressed text field.
    Text(String),
}

impl fmt::Display for ParameterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Toggle(value) => write!(f, "{value}"),
            Self::Choice(index) => write!(f, "#{index}"),
            Self::Text(text) => f.write_str(text),
        }
    }
}

enum NodeMut<'a> {
    Flag(&'a mut Preference),
    Text(&'a mut StringValue),
    List(&'a mut ParameterList),
    Group(&'a mut ParameterOptionsToList),
}

impl<'a> NodeMut<'a> {
    fn of(parameter: &'a mut Parameter) -> Self {
        match parameter {
            Parameter::Preference(p) => Self::Flag(p),
            Parameter::StringValue(p) => Self::Text(p),
            Parameter::ParameterList(p) => Self::List(p),
            Parameter::ParameterOptionsToList(p) => Self::Group(p),
        }
    }
}

impl ParameterData {
    /// Applies `value` to the parameter at `path`.
    ///
    /// `Toggle` changes selection on any parameter; deselecting an options
    /// group also forgets its choice. `Text` replaces a text field's value.
    /// `Choice` picks an option of an options group.
    ///
    /// # Errors
    ///
    /// Returns a [`ParameterError`] when the path does not resolve, when the
    /// value does not fit the addressed parameter, or when a mandatory
    /// parameter would be deselected.
    ///
    /// # Example
    ///
    /// ```
    /// use webcli_plugins::parameter::{
    ///     ParameterBase, ParameterData, ParameterList, ParameterPath, ParameterValue, StringValue,
    /// };
    ///
    /// let mut data = ParameterData::from(
    ///     ParameterList::from_base(ParameterBase::new("ping").mandatory())
    ///         .with(StringValue::from_base(ParameterBase::new("target").mandatory())),
    /// );
    /// let path: ParameterPath = "0".parse().expect("path");
    /// data.apply(&path, ParameterValue::Text("localhost".into()))
    ///     .expect("text applies");
    /// assert!(data.validate().is_ok());
    /// ```
    pub fn apply(
        &mut self,
        path: &ParameterPath,
        value: ParameterValue,
    ) -> Result<(), ParameterError> {
        let root = match self {
            Self::ParameterList(list) => NodeMut::List(list),
            Self::ParameterOptionsToList(group) => NodeMut::Group(group),
        };
        apply_at(root, path.indices(), value)
    }
}

fn apply_at(
    start: NodeMut<'_>,
    path: &[usize],
    value: ParameterValue,
) -> Result<(), ParameterError> {
    let mut node = start;
    let mut remaining = path;
    loop {
        node = match node {
            NodeMut::Group(group) => {
                if remaining.is_empty() {
                    return apply_to_group(group, value);
                }
                let name = group.base.name.clone();
                let chosen = group
                    .selected_list_idx
                    .and_then(|idx| group.options.get_mut(idx));
                match chosen {
                    Some(option) => NodeMut::List(option),
                    None => return Err(ParameterError::NoOptionSelected { name }),
                }
            }
            NodeMut::List(list) => {
                let Some((index, rest)) = remaining.split_first() else {
                    return apply_to_list(list, value);
                };
                remaining = rest;
                let name = list.base.name.clone();
                match list.parameters.get_mut(*index) {
                    Some(child) => NodeMut::of(child),
                    None => {
                        return Err(ParameterError::InvalidPath {
                            name,
                            index: *index,
                        });
                    }
                }
            }
            NodeMut::Text(text) => {
                ensure_leaf(&text.base.name, remaining)?;
                return apply_to_text(text, value);
            }
            NodeMut::Flag(flag) => {
                ensure_leaf(&flag.base.name, remaining)?;
                return match value {
                    ParameterValue::Toggle(selected) => flag.base.set_selected(selected),
                    other => Err(mismatch(&flag.base.name, ParameterType::Preference, &other)),
                };
            }
        };
    }
}

fn ensure_leaf(name: &str, remaining: &[usize]) -> Result<(), ParameterError> {
    if remaining.is_empty() {
        Ok(())
    } else {
        Err(ParameterError::CannotDescend {
            name: name.to_owned(),
        })
    }
}

fn mismatch(name: &str, kind: ParameterType, value: &ParameterValue) -> ParameterError {
    ParameterError::ValueMismatch {
        name: name.to_owned(),
        kind,
        value: value.to_string(),
    }
}

fn apply_to_group(
    group: &mut ParameterOptionsToList,
    value: ParameterValue,
) -> Result<(), ParameterError> {
    match value {
        ParameterValue::Toggle(true) => group.base.set_selected(true),
        ParameterValue::Toggle(false) => {
            group.base.set_selected(false)?;
            group.clear_selection();
            Ok(())
        }
        ParameterValue::Choice(index) => group.select(index),
        other @ ParameterValue::Text(_) => Err(mismatch(
            &group.base.name,
            ParameterType::ParameterOptionsToList,
            &other,
        )),
    }
}

fn apply_to_list(list: &mut ParameterList, value: ParameterValue) -> Result<(), ParameterError> {
    match value {
        ParameterValue::Toggle(selected) => list.base.set_selected(selected),
        other => Err(mismatch(&list.base.name, ParameterType::ParameterList, &other)),
    }
}

fn apply_to_text(text: &mut StringValue, value: ParameterValue) -> Result<(), ParameterError> {
    match value {
        ParameterValue::Toggle(selected) => text.base.set_selected(selected),
        ParameterValue::Text(content) => {
            text.value = content;
            Ok(())
        }
        other @ ParameterValue::Choice(_) => {
            Err(mismatch(&text.base.name, ParameterType::StringValue, &other))
        }
    }
}
