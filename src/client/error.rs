/// Errors surfaced to the user by the rate client.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ClientError {
    #[error("Please enter a valid amount")]
    InvalidAmount,
    #[error("Please select both currencies")]
    MissingCurrency,
    #[error("Unsupported currency: {0}")]
    UnknownCurrency(String),
    #[error("Another request is still in progress")]
    Busy,
    #[error("No rate available for {from} to {to}")]
    RateUnavailable { from: String, to: String },
}
