use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum DomainError {
    #[error("store name must not be empty")]
    EmptyStoreName,
    #[error("commission amount must not be negative, got {amount}")]
    NegativeCommission { amount: Decimal },
}
