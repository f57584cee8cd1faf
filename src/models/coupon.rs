use serde::{Deserialize, Serialize};

/// A server-validated price reduction.
///
/// A discount is only meaningful for the course/price pair it was computed
/// against; payment must charge `discount` when one is active.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Discount {
    /// The discounted price in whole currency units.
    pub discount: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deserializes_the_coupon_response() {
        let discount: Discount = serde_json::from_value(json!({ "discount": 800 })).unwrap();
        assert_eq!(discount.discount, 800);
    }

    #[test]
    fn ignores_extra_response_fields() {
        let discount: Discount =
            serde_json::from_value(json!({ "discount": 750, "code": "WELCOME25" })).unwrap();
        assert_eq!(discount.discount, 750);
    }
}
