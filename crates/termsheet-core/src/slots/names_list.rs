//! Names list: an ordered list of names, or "N/A".

use serde_json::{Map, Value};

use crate::error::SlotError;
use crate::payload::PayloadReader;
use crate::slot::{impl_slot_serde, Slot};

#[derive(Debug, Clone, PartialEq)]
pub enum NamesList {
    /// Names in the order given. Duplicates are kept.
    Names { names: Vec<String> },
    /// Not applicable.
    NotApplicable,
}

impl Slot for NamesList {
    const NAME: &'static str = "names_list";
    const TAGS: &'static [&'static str] = &["names_list", "na"];
    const TAG_COLUMN_LEN: usize = 15;

    fn tag(&self) -> &'static str {
        match self {
            Self::Names { .. } => "names_list",
            Self::NotApplicable => "na",
        }
    }

    fn parse(tag: &str, fields: &Map<String, Value>) -> Result<Self, SlotError> {
        let reader = PayloadReader::new(Self::NAME, tag, fields);
        match tag {
            "names_list" => Ok(Self::Names {
                names: reader.strings("names")?,
            }),
            "na" => Ok(Self::NotApplicable),
            other => Err(Self::unknown_variant(other)),
        }
    }

    fn payload(&self) -> Map<String, Value> {
        let mut fields = Map::new();
        if let Self::Names { names } = self {
            fields.insert("names".into(), Value::from(names.clone()));
        }
        fields
    }
}

impl_slot_serde!(NamesList);
