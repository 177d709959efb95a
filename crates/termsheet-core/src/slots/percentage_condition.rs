//! Percentage with conditions: a basket percentage with or without a leverage
//! test, or one of three markers.

use serde_json::{Map, Value};

use crate::error::SlotError;
use crate::payload::PayloadReader;
use crate::slot::{impl_slot_serde, Slot};

/// Leverage test attached to a basket percentage.
#[derive(Debug, Clone, PartialEq)]
pub struct LeverageTest {
    /// The multiplier, e.g. `2.5` for 2.5x.
    pub multiplier: f64,
    /// The metric the multiplier applies to.
    pub metric: String,
}

impl LeverageTest {
    fn read(reader: &PayloadReader<'_>) -> Result<Self, SlotError> {
        Ok(Self {
            multiplier: reader.float("multiplier")?,
            metric: reader.string("metric")?,
        })
    }

    fn to_value(&self) -> Value {
        let mut test = Map::new();
        test.insert("multiplier".into(), Value::from(self.multiplier));
        test.insert("metric".into(), Value::from(self.metric.clone()));
        Value::Object(test)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PercentageCondition {
    /// Percentage subject to a leverage test.
    WithLeverageTest { percentage: f64, test: LeverageTest },
    /// Percentage with no leverage test.
    NoLeverageTest { percentage: f64 },
    /// Basket present but component not present.
    BasketNoComponent,
    /// Basket not present.
    NoBasket,
    /// Not stated in the term sheet.
    NotStated,
}

impl Slot for PercentageCondition {
    const NAME: &'static str = "percentage_condition";
    const TAGS: &'static [&'static str] = &[
        "with_leverage_test",
        "no_leverage_test",
        "basket_no_component",
        "no_basket",
        "not_stated",
    ];
    const TAG_COLUMN_LEN: usize = 30;

    fn tag(&self) -> &'static str {
        match self {
            Self::WithLeverageTest { .. } => "with_leverage_test",
            Self::NoLeverageTest { .. } => "no_leverage_test",
            Self::BasketNoComponent => "basket_no_component",
            Self::NoBasket => "no_basket",
            Self::NotStated => "not_stated",
        }
    }

    fn parse(tag: &str, fields: &Map<String, Value>) -> Result<Self, SlotError> {
        let reader = PayloadReader::new(Self::NAME, tag, fields);
        match tag {
            "with_leverage_test" => Ok(Self::WithLeverageTest {
                percentage: reader.float("percentage")?,
                test: LeverageTest::read(&reader.object("test")?)?,
            }),
            "no_leverage_test" => Ok(Self::NoLeverageTest {
                percentage: reader.float("percentage")?,
            }),
            "basket_no_component" => Ok(Self::BasketNoComponent),
            "no_basket" => Ok(Self::NoBasket),
            "not_stated" => Ok(Self::NotStated),
            other => Err(Self::unknown_variant(other)),
        }
    }

    fn payload(&self) -> Map<String, Value> {
        let mut fields = Map::new();
        match self {
            Self::WithLeverageTest { percentage, test } => {
                fields.insert("percentage".into(), Value::from(*percentage));
                fields.insert("test".into(), test.to_value());
            }
            Self::NoLeverageTest { percentage } => {
                fields.insert("percentage".into(), Value::from(*percentage));
            }
            Self::BasketNoComponent | Self::NoBasket | Self::NotStated => {}
        }
        fields
    }
}

impl_slot_serde!(PercentageCondition);
