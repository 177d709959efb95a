//! Financial ratio covenant: one of six leverage/coverage ratio kinds with a
//! ratio multiplier, or a marker for no covenant / not stated.

use serde_json::{Map, Value};

use crate::error::SlotError;
use crate::payload::PayloadReader;
use crate::slot::{impl_slot_serde, Slot};

#[derive(Debug, Clone, PartialEq)]
pub enum FinancialRatio {
    /// First lien net leverage ratio.
    FirstLien { ratio: f64 },
    /// Senior secured net leverage ratio.
    SeniorSecured { ratio: f64 },
    /// Secured net leverage ratio.
    Secured { ratio: f64 },
    /// Total net leverage ratio.
    TotalNet { ratio: f64 },
    /// Fixed charge coverage ratio.
    FixedCharge { ratio: f64 },
    /// Interest coverage ratio.
    InterestCoverage { ratio: f64 },
    /// No financial covenant for the instrument.
    NoCovenant,
    /// Not stated in the term sheet.
    NotStated,
}

impl FinancialRatio {
    /// The ratio multiplier, if the variant carries one.
    pub fn ratio(&self) -> Option<f64> {
        match self {
            Self::FirstLien { ratio }
            | Self::SeniorSecured { ratio }
            | Self::Secured { ratio }
            | Self::TotalNet { ratio }
            | Self::FixedCharge { ratio }
            | Self::InterestCoverage { ratio } => Some(*ratio),
            Self::NoCovenant | Self::NotStated => None,
        }
    }
}

impl Slot for FinancialRatio {
    const NAME: &'static str = "financial_ratio";
    const TAGS: &'static [&'static str] = &[
        "first_lien",
        "senior_secured",
        "secured",
        "total_net",
        "fixed_charge",
        "interest_coverage",
        "no_covenant",
        "not_stated",
    ];
    const TAG_COLUMN_LEN: usize = 30;

    fn tag(&self) -> &'static str {
        match self {
            Self::FirstLien { .. } => "first_lien",
            Self::SeniorSecured { .. } => "senior_secured",
            Self::Secured { .. } => "secured",
            Self::TotalNet { .. } => "total_net",
            Self::FixedCharge { .. } => "fixed_charge",
            Self::InterestCoverage { .. } => "interest_coverage",
            Self::NoCovenant => "no_covenant",
            Self::NotStated => "not_stated",
        }
    }

    fn parse(tag: &str, fields: &Map<String, Value>) -> Result<Self, SlotError> {
        let reader = PayloadReader::new(Self::NAME, tag, fields);
        let ratio = || reader.float("ratio");
        match tag {
            "first_lien" => Ok(Self::FirstLien { ratio: ratio()? }),
            "senior_secured" => Ok(Self::SeniorSecured { ratio: ratio()? }),
            "secured" => Ok(Self::Secured { ratio: ratio()? }),
            "total_net" => Ok(Self::TotalNet { ratio: ratio()? }),
            "fixed_charge" => Ok(Self::FixedCharge { ratio: ratio()? }),
            "interest_coverage" => Ok(Self::InterestCoverage { ratio: ratio()? }),
            "no_covenant" => Ok(Self::NoCovenant),
            "not_stated" => Ok(Self::NotStated),
            other => Err(Self::unknown_variant(other)),
        }
    }

    fn payload(&self) -> Map<String, Value> {
        let mut fields = Map::new();
        if let Some(ratio) = self.ratio() {
            fields.insert("ratio".into(), Value::from(ratio));
        }
        fields
    }
}

impl_slot_serde!(FinancialRatio);
