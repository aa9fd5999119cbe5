//! Batch trace envelope: `{"good": <goods or null>, "orders": [<order>, ...]}`.

use crate::model::{Goods, Order};
use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;

/// Wire form, splicing stored documents without re-encoding them.
#[derive(Debug, Serialize)]
pub(crate) struct TraceEnvelope {
    pub good: Option<Box<RawValue>>,
    pub orders: Box<RawValue>,
}

/// Decoded form of a batch trace.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchTrace {
    pub good: Option<Goods>,
    #[serde(default)]
    pub orders: Vec<Order>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_splices_raw_documents() {
        let envelope = TraceEnvelope {
            good: None,
            orders: RawValue::from_string(r#"[{"orderNo":"O1"}]"#.into()).unwrap(),
        };
        let json = serde_json::to_string(&envelope).unwrap();
        assert_eq!(json, r#"{"good":null,"orders":[{"orderNo":"O1"}]}"#);

        let trace: BatchTrace = serde_json::from_str(&json).unwrap();
        assert!(trace.good.is_none());
        assert_eq!(trace.orders[0].order_no, "O1");
    }
}
