use std::collections::HashMap;
use std::sync::Mutex;

use uuid::Uuid;

use crate::services::payment::interface::{
    PaymentError, PaymentIntentRequest, PaymentIntentResponse, PaymentOperations,
};

/// In-memory stand-in for the real processor. Intents live in a map and
/// confirm flips their status; nothing is ever charged.
#[derive(Default)]
pub struct SandboxPaymentProcessor {
    intents: Mutex<HashMap<String, PaymentIntentResponse>>,
}

impl SandboxPaymentProcessor {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PaymentOperations for SandboxPaymentProcessor {
    async fn create_payment_intent(
        &self,
        request: PaymentIntentRequest,
    ) -> Result<PaymentIntentResponse, PaymentError> {
        if request.amount <= 0 {
            return Err(PaymentError::Rejected(
                "amount must be positive".to_string(),
            ));
        }

        let id = format!("pi_{}", Uuid::new_v4().simple());
        let intent = PaymentIntentResponse {
            payment_intent_id: id.clone(),
            client_secret: format!("{}_secret_{}", id, Uuid::new_v4().simple()),
            status: "requires_confirmation".to_string(),
        };

        let mut intents = self
            .intents
            .lock()
            .map_err(|_| PaymentError::InternalServerError)?;
        intents.insert(id, intent.clone());
        Ok(intent)
    }

    async fn confirm_payment_intent(
        &self,
        payment_intent_id: &str,
    ) -> Result<PaymentIntentResponse, PaymentError> {
        let mut intents = self
            .intents
            .lock()
            .map_err(|_| PaymentError::InternalServerError)?;
        let intent = intents
            .get_mut(payment_intent_id)
            .ok_or(PaymentError::NotFound)?;
        intent.status = "succeeded".to_string();
        Ok(intent.clone())
    }
}
