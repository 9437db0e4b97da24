//! Rendering of selected parameters into command-line tokens.

use super::{Parameter, ParameterData, ParameterList, ParameterOptionsToList, StringValue};

impl ParameterData {
    /// Renders the selected parameters as ordered argument tokens.
    ///
    /// A selected flag contributes its name. A selected text field
    /// contributes `[name, value]` when its name starts with `-` and `[value]`
    /// otherwise. Lists contribute their selected children in order and
    /// options groups contribute the children of their chosen option; the
    /// names of lists and options groups are labels and are never emitted.
    /// The root is rendered whether or not it is selected.
    ///
    /// # Example
    ///
    /// ```
    /// use webcli_plugins::parameter::{ParameterBase, ParameterData, ParameterList, Preference, StringValue};
    ///
    /// let data = ParameterData::from(
    ///     ParameterList::new("ping")
    ///         .with(Preference::from_base(ParameterBase::new("-n").selected()))
    ///         .with(StringValue::from_base(ParameterBase::new("-c").selected()).with_value("3"))
    ///         .with(StringValue::from_base(ParameterBase::new("target").mandatory()).with_value("db01")),
    /// );
    /// assert_eq!(data.to_arguments(), vec!["-n", "-c", "3", "db01"]);
    /// ```
    #[must_use]
    pub fn to_arguments(&self) -> Vec<String> {
        let mut arguments = Vec::new();
        match self {
            Self::ParameterList(list) => push_list(list, &mut arguments),
            Self::ParameterOptionsToList(group) => push_group(group, &mut arguments),
        }
        arguments
    }
}

fn push_parameter(parameter: &Parameter, arguments: &mut Vec<String>) {
    if !parameter.is_selected() {
        return;
    }
    match parameter {
        Parameter::Preference(flag) => arguments.push(flag.base.name.clone()),
        Parameter::StringValue(text) => push_text(text, arguments),
        Parameter::ParameterList(list) => push_list(list, arguments),
        Parameter::ParameterOptionsToList(group) => push_group(group, arguments),
    }
}

fn push_text(text: &StringValue, arguments: &mut Vec<String>) {
    if text.base.name.starts_with('-') {
        arguments.push(text.base.name.clone());
    }
    arguments.push(text.value.clone());
}

fn push_list(list: &ParameterList, arguments: &mut Vec<String>) {
    for child in &list.parameters {
        push_parameter(child, arguments);
    }
}

fn push_group(group: &ParameterOptionsToList, arguments: &mut Vec<String>) {
    if let Some(option) = group.selected_option() {
        push_list(option, arguments);
    }
}
