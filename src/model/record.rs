//! # Record Trait
//!
//! Every ledger record is a flat JSON object of string fields. The [`Record`] trait
//! exposes a statically declared field table (wire name plus accessors) so that
//! generic code such as the patch merger can walk a record's fields without any
//! runtime type inspection.
//!
//! Records are declared with the [`ledger_record!`] macro, which generates the
//! struct, its serde mapping, the field table and `with_*` builder setters.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::Debug;

/// One entry of a record's field table.
pub struct Field<R: 'static> {
    /// Wire name of the field in the JSON document.
    pub name: &'static str,
    pub get: fn(&R) -> &str,
    pub slot: fn(&mut R) -> &mut String,
}

/// A typed ledger record keyed by one of its own fields.
pub trait Record:
    Serialize + DeserializeOwned + Clone + Debug + Default + PartialEq + Send + Sync + 'static
{
    /// Human readable record kind, used in logs and error messages.
    const KIND: &'static str;

    /// Wire name of the primary identifier field.
    const KEY_FIELD: &'static str;

    /// Every declared field, in wire order.
    const FIELDS: &'static [Field<Self>];

    /// Value of the primary identifier, which doubles as the storage key.
    fn key(&self) -> &str;

    /// Looks up a field value by wire name.
    fn field(&self, name: &str) -> Option<&str> {
        Self::FIELDS
            .iter()
            .find(|field| field.name == name)
            .map(|field| (field.get)(self))
    }

    fn set_key(&mut self, key: &str) {
        if let Some(field) = Self::FIELDS.iter().find(|field| field.name == Self::KEY_FIELD) {
            *(field.slot)(self) = key.to_string();
        }
    }

    fn decode(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }

    fn encode(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }
}

/// Declares a flat string-typed ledger record.
///
/// ```rust,ignore
/// ledger_record! {
///     /// A shop.
///     pub struct Shop keyed by shop_id as "shopId" {
///         shop_id => "shopId",
///         name => "name",
///     }
/// }
/// ```
///
/// Missing fields decode as empty strings and unknown fields are ignored; every
/// declared field is emitted on encode.
macro_rules! ledger_record {
    (
        $(#[$meta:meta])*
        pub struct $name:ident keyed by $key:ident as $key_wire:literal {
            $( $(#[$field_meta:meta])* $field:ident => $wire:literal, )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Eq, ::serde::Serialize, ::serde::Deserialize)]
        #[serde(default)]
        pub struct $name {
            $(
                $(#[$field_meta])*
                #[serde(rename = $wire)]
                pub $field: String,
            )+
        }

        impl $name {
            ::paste::paste! {
                $(
                    pub fn [<with_ $field>](mut self, value: impl Into<String>) -> Self {
                        self.$field = value.into();
                        self
                    }
                )+
            }
        }

        impl $crate::model::Record for $name {
            const KIND: &'static str = stringify!($name);
            const KEY_FIELD: &'static str = $key_wire;
            const FIELDS: &'static [$crate::model::Field<Self>] = &[
                $(
                    $crate::model::Field {
                        name: $wire,
                        get: |record| record.$field.as_str(),
                        slot: |record| &mut record.$field,
                    },
                )+
            ];

            fn key(&self) -> &str {
                &self.$key
            }
        }
    };
}

pub(crate) use ledger_record;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Asset, FundBill, Goods, Order};
    use proptest::prelude::*;

    fn filled<R: Record>(values: &[String]) -> R {
        let mut record = R::default();
        for (field, value) in R::FIELDS.iter().zip(values) {
            *(field.slot)(&mut record) = value.clone();
        }
        record
    }

    fn round_trips<R: Record>(values: &[String]) -> Result<(), TestCaseError> {
        let record: R = filled(values);
        for (field, value) in R::FIELDS.iter().zip(values) {
            prop_assert_eq!(record.field(field.name), Some(value.as_str()));
        }
        let decoded = R::decode(&record.encode().unwrap()).unwrap();
        prop_assert_eq!(decoded, record);
        Ok(())
    }

    #[test]
    fn test_key_and_field_lookup() {
        let mut goods = Goods::default().with_kind_name("pear");
        goods.set_key("S1");
        assert_eq!(goods.key(), "S1");
        assert_eq!(goods.field("stockId"), Some("S1"));
        assert_eq!(goods.field("kindName"), Some("pear"));
        assert_eq!(goods.field("nope"), None);
    }

    proptest! {
        #[test]
        fn records_round_trip(values in prop::collection::vec(".{0,12}", 24)) {
            round_trips::<Asset>(&values)?;
            round_trips::<FundBill>(&values)?;
            round_trips::<Goods>(&values)?;
            round_trips::<Order>(&values)?;
        }
    }
}
