use serde::{Deserialize, Serialize};

use crate::models::bookings::{BookingStatus, PaymentCalculation, PaymentStatus, PaymentType};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentConfig {
    /// Share of the booking total due up front for ADVANCE payments.
    pub advance_percentage: f64,
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            advance_percentage: 20.0,
        }
    }
}

impl PaymentConfig {
    /// Create config from environment variables or use defaults
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            advance_percentage: std::env::var("ADVANCE_PAYMENT_PERCENTAGE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.advance_percentage),
        }
    }
}

pub struct PaymentService;

impl PaymentService {
    /// Split a booking total into pay-now vs remaining balance.
    ///
    /// The advance amount is the only rounded figure (half-up); the
    /// remaining balance is whatever is left of the exact total.
    pub fn calculate_payment_amounts(
        total_amount: f64,
        payment_type: PaymentType,
        config: &PaymentConfig,
    ) -> PaymentCalculation {
        let advance_amount = (total_amount * config.advance_percentage / 100.0).round();

        match payment_type {
            PaymentType::Full => PaymentCalculation {
                payable_amount: total_amount,
                remaining_balance: 0.0,
                advance_amount,
                booking_status: BookingStatus::Confirmed,
                payment_status: PaymentStatus::Paid,
            },
            PaymentType::Advance => PaymentCalculation {
                payable_amount: advance_amount,
                remaining_balance: total_amount - advance_amount,
                advance_amount,
                booking_status: BookingStatus::Confirmed,
                payment_status: PaymentStatus::Partial,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_split() {
        let calc = PaymentService::calculate_payment_amounts(
            10000.0,
            PaymentType::Advance,
            &PaymentConfig::default(),
        );
        assert_eq!(calc.advance_amount, 2000.0);
        assert_eq!(calc.payable_amount, 2000.0);
        assert_eq!(calc.remaining_balance, 8000.0);
        assert_eq!(calc.booking_status, BookingStatus::Confirmed);
        assert_eq!(calc.payment_status, PaymentStatus::Partial);
    }

    #[test]
    fn test_full_payment() {
        let calc = PaymentService::calculate_payment_amounts(
            10000.0,
            PaymentType::Full,
            &PaymentConfig::default(),
        );
        assert_eq!(calc.payable_amount, 10000.0);
        assert_eq!(calc.remaining_balance, 0.0);
        assert_eq!(calc.booking_status, BookingStatus::Confirmed);
        assert_eq!(calc.payment_status, PaymentStatus::Paid);
    }

    #[test]
    fn test_advance_rounds_half_up() {
        // 20% of 12.5 is 2.5, which rounds up to 3.
        let calc = PaymentService::calculate_payment_amounts(
            12.5,
            PaymentType::Advance,
            &PaymentConfig::default(),
        );
        assert_eq!(calc.advance_amount, 3.0);
        assert_eq!(calc.remaining_balance, 9.5);
    }

    #[test]
    fn test_custom_advance_percentage() {
        let config = PaymentConfig {
            advance_percentage: 30.0,
        };
        let calc = PaymentService::calculate_payment_amounts(1000.0, PaymentType::Advance, &config);
        assert_eq!(calc.payable_amount, 300.0);
        assert_eq!(calc.remaining_balance, 700.0);
    }
}
