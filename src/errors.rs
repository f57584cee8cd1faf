use thiserror::Error;

/// Crate-wide error type for remote calls and view-state operations.
///
/// Every remote failure is caught at its call site; the views translate the
/// user-facing variants into transient notifications and keep the rest as
/// logged diagnostics.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Coupon rejected: {0}")]
    CouponRejected(String),

    #[error("Course already purchased")]
    AlreadyPurchased,

    #[error("Checkout dismissed before completion")]
    CheckoutAbandoned,

    #[error("Payment verification failed: {0}")]
    VerificationFailed(String),

    #[error("Missing credential: {0}")]
    MissingCredential(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ClientError {
    /// Returns the message suitable for a user-facing notification.
    /// Transport and internal errors are collapsed into generic copy so the
    /// notification never leaks implementation details.
    pub fn user_message(&self) -> String {
        match self {
            Self::Http(_) | Self::Serialization(_) | Self::Config(_) => {
                "Something went wrong. Please try again.".to_string()
            }
            Self::Api { .. } => "The service is unavailable right now. Please try again.".to_string(),
            Self::AlreadyPurchased => "You already own this course.".to_string(),
            Self::VerificationFailed(_) => {
                "We could not confirm your payment. If you were charged, contact support.".to_string()
            }
            // Coupon rejections carry the service's own message verbatim.
            Self::CouponRejected(message) => message.clone(),
            _ => self.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_message_hides_transport_details() {
        let err = ClientError::Api {
            status: 500,
            message: "stack trace: pool exhausted".into(),
        };
        assert!(!err.user_message().contains("pool exhausted"));

        let err = ClientError::Config("gateway_key_id missing".into());
        assert_eq!(err.user_message(), "Something went wrong. Please try again.");
    }

    #[test]
    fn user_message_passes_coupon_rejections_through() {
        let err = ClientError::CouponRejected("Coupon expired".into());
        assert_eq!(err.user_message(), "Coupon expired");
    }

    #[test]
    fn user_message_for_owned_course_names_the_condition() {
        assert_eq!(
            ClientError::AlreadyPurchased.user_message(),
            "You already own this course."
        );
    }
}
