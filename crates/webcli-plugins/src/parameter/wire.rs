//! Serde helpers enforcing schema invariants on deserialisation.

use serde::Deserialize;

use super::{ParameterBase, ParameterError, ParameterList, ParameterOptionsToList};

#[derive(Deserialize)]
pub(super) struct BaseWire {
    name: String,
    #[serde(default)]
    mandatory: bool,
    #[serde(default)]
    description: Option<String>,
    #[serde(default, rename = "isSelected")]
    is_selected: bool,
}

impl From<BaseWire> for ParameterBase {
    fn from(wire: BaseWire) -> Self {
        Self {
            name: wire.name,
            mandatory: wire.mandatory,
            description: wire.description,
            // Mandatory parameters are always selected, whatever the sender said.
            is_selected: wire.is_selected || wire.mandatory,
        }
    }
}

#[derive(Deserialize)]
pub(super) struct OptionsToListWire {
    #[serde(flatten)]
    base: ParameterBase,
    #[serde(default, with = "tagged_lists")]
    options: Vec<ParameterList>,
    #[serde(default, rename = "selectedListIdx", with = "list_index")]
    selected_list_idx: Option<usize>,
}

impl TryFrom<OptionsToListWire> for ParameterOptionsToList {
    type Error = ParameterError;

    fn try_from(wire: OptionsToListWire) -> Result<Self, Self::Error> {
        if let Some(index) = wire.selected_list_idx {
            if index >= wire.options.len() {
                return Err(ParameterError::OptionOutOfRange {
                    name: wire.base.name,
                    index,
                    len: wire.options.len(),
                });
            }
        }
        Ok(Self {
            base: wire.base,
            options: wire.options,
            selected_list_idx: wire.selected_list_idx,
        })
    }
}

/// Serialises options as `parameter_list`-tagged objects.
pub(super) mod tagged_lists {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use super::ParameterList;

    #[derive(Serialize)]
    #[serde(tag = "type", rename_all = "snake_case")]
    enum TaggedRef<'a> {
        ParameterList(&'a ParameterList),
    }

    #[derive(Deserialize)]
    #[serde(tag = "type", rename_all = "snake_case")]
    enum Tagged {
        ParameterList(ParameterList),
    }

    pub(in crate::parameter) fn serialize<S: Serializer>(
        options: &[ParameterList],
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(options.iter().map(TaggedRef::ParameterList))
    }

    pub(in crate::parameter) fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<ParameterList>, D::Error> {
        let tagged = Vec::<Tagged>::deserialize(deserializer)?;
        Ok(tagged
            .into_iter()
            .map(|Tagged::ParameterList(list)| list)
            .collect())
    }
}

/// Maps `None` to the `-1` sentinel used on the wire.
pub(super) mod list_index {
    use serde::de::Error as _;
    use serde::ser::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::ParameterError;

    const NONE_SELECTED: i64 = -1;

    #[expect(
        clippy::ref_option,
        reason = "serde `with` helpers receive a reference to the field"
    )]
    pub(in crate::parameter) fn serialize<S: Serializer>(
        index: &Option<usize>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match index {
            Some(value) => {
                let raw = u64::try_from(*value).map_err(S::Error::custom)?;
                serializer.serialize_u64(raw)
            }
            None => serializer.serialize_i64(NONE_SELECTED),
        }
    }

    pub(in crate::parameter) fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<usize>, D::Error> {
        let raw = i64::deserialize(deserializer)?;
        if raw == NONE_SELECTED {
            return Ok(None);
        }
        usize::try_from(raw)
            .map(Some)
            .map_err(|_| D::Error::custom(ParameterError::NegativeIndex { value: raw }))
    }
}
