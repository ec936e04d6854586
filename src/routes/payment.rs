use actix_web::{web, HttpResponse, Responder};
use serde::Deserialize;

use crate::models::bookings::PaymentType;
use crate::services::payment::interface::{PaymentError, PaymentIntentRequest, PaymentOperations};
use crate::services::payment::sandbox::SandboxPaymentProcessor;
use crate::services::payment_service::{PaymentConfig, PaymentService};

fn payment_error(err: PaymentError) -> HttpResponse {
    match err {
        PaymentError::NotFound => HttpResponse::NotFound().body("Payment intent not found"),
        PaymentError::Rejected(reason) => HttpResponse::BadRequest().body(reason),
        PaymentError::InternalServerError => {
            HttpResponse::BadGateway().body("Payment processor unavailable")
        }
    }
}

#[derive(Deserialize)]
pub struct PaymentAmountsInput {
    pub total_amount: f64,
    pub payment_type: PaymentType,
}

pub async fn calculate_payment_amounts(
    config: web::Data<PaymentConfig>,
    input: web::Json<PaymentAmountsInput>,
) -> impl Responder {
    let input = input.into_inner();
    if input.total_amount < 0.0 {
        return HttpResponse::BadRequest().body("total_amount cannot be negative");
    }
    let calc =
        PaymentService::calculate_payment_amounts(input.total_amount, input.payment_type, &config);
    HttpResponse::Ok().json(calc)
}

pub async fn create_payment_intent(
    processor: web::Data<SandboxPaymentProcessor>,
    input: web::Json<PaymentIntentRequest>,
) -> impl Responder {
    match processor.create_payment_intent(input.into_inner()).await {
        Ok(intent) => HttpResponse::Ok().json(intent),
        Err(e) => {
            eprintln!("Error creating payment intent: {}", e);
            payment_error(e)
        }
    }
}

#[derive(Deserialize)]
pub struct ConfirmPaymentInput {
    pub payment_intent_id: String,
}

pub async fn confirm_payment(
    processor: web::Data<SandboxPaymentProcessor>,
    input: web::Json<ConfirmPaymentInput>,
) -> impl Responder {
    match processor
        .confirm_payment_intent(&input.payment_intent_id)
        .await
    {
        Ok(intent) => HttpResponse::Ok().json(intent),
        Err(e) => {
            eprintln!("Error confirming payment intent: {}", e);
            payment_error(e)
        }
    }
}
