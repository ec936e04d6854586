use serde::{Deserialize, Serialize};

#[derive(Debug)]
pub enum PaymentError {
    NotFound,
    Rejected(String),
    InternalServerError,
}

impl std::fmt::Display for PaymentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound => write!(f, "payment intent not found"),
            Self::Rejected(reason) => write!(f, "payment rejected: {}", reason),
            Self::InternalServerError => write!(f, "payment processor unavailable"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentIntentRequest {
    /// Amount in minor currency units (cents).
    pub amount: i64,
    pub currency: String,
    #[serde(default)]
    pub metadata: serde_json::Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentIntentResponse {
    pub payment_intent_id: String,
    pub client_secret: String,
    pub status: String,
}

/// The processor boundary the booking flow hands the computed payable amount
/// to. Stripe sits behind this in production; the engine never sees card
/// data, only the intent-create/confirm protocol.
pub trait PaymentOperations {
    async fn create_payment_intent(
        &self,
        request: PaymentIntentRequest,
    ) -> Result<PaymentIntentResponse, PaymentError>;

    async fn confirm_payment_intent(
        &self,
        payment_intent_id: &str,
    ) -> Result<PaymentIntentResponse, PaymentError>;
}
