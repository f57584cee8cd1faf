use serde::{Deserialize, Serialize};

/// Server-issued handle representing an intent to pay a specific amount.
/// Created per payment attempt and consumed exactly once by the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentOrder {
    pub id: String,
    /// Amount in whole currency units.
    pub amount: i64,
    pub currency: String,
}

/// Signed confirmation from the payment gateway that a transaction
/// completed. Consumed exactly once by the verification service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentProof {
    #[serde(rename = "razorpay_order_id")]
    pub order_id: String,
    #[serde(rename = "razorpay_payment_id")]
    pub payment_id: String,
    #[serde(rename = "razorpay_signature")]
    pub signature: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn proof_serializes_with_gateway_field_names() {
        let proof = PaymentProof {
            order_id: "order_9".into(),
            payment_id: "pay_4".into(),
            signature: "sig".into(),
        };
        assert_eq!(
            serde_json::to_value(&proof).unwrap(),
            json!({
                "razorpay_order_id": "order_9",
                "razorpay_payment_id": "pay_4",
                "razorpay_signature": "sig"
            })
        );
    }

    #[test]
    fn order_deserializes_the_wire_shape() {
        let order: PaymentOrder = serde_json::from_value(json!({
            "id": "order_MNO123",
            "amount": 800,
            "currency": "INR"
        }))
        .unwrap();
        assert_eq!(order.amount, 800);
        assert_eq!(order.currency, "INR");
    }
}
