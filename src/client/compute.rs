//! Side effect free helpers behind the client: validation, conversion and the
//! shaping of server data for display.

use chrono::Local;
use std::fmt::Display;

use super::error::ClientError;
use super::state::RatesSnapshot;

#[derive(Debug, Clone, PartialEq)]
pub struct RateRow {
    pub currency: String,
    pub rate: f64,
}

impl RateRow {
    pub fn formatted_rate(&self) -> String {
        format!("{:.6}", self.rate)
    }
}

/// Rows for every listed currency that has a rate, in list order.
pub fn rate_rows(currencies: &[String], snapshot: &RatesSnapshot) -> Vec<RateRow> {
    currencies
        .iter()
        .filter_map(|currency| {
            snapshot.rates.get(currency).map(|rate| RateRow {
                currency: currency.clone(),
                rate: *rate,
            })
        })
        .collect()
}

/// "Last updated" line, with the fallback notice when the server sent one.
pub fn status_line(snapshot: &RatesSnapshot) -> String {
    let mut text = match snapshot.last_updated {
        Some(ts) => format!(
            "Last updated: {}",
            ts.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S")
        ),
        None => "Last updated: never".to_string(),
    };
    if let Some(message) = &snapshot.message {
        text.push_str(&format!(" ({message})"));
    }
    text
}

/// Re-expresses a table relative to `base`, if the table knows that currency.
pub fn rebase(snapshot: &RatesSnapshot, base: &str) -> Option<RatesSnapshot> {
    if snapshot.base == base {
        return Some(snapshot.clone());
    }
    let divisor = snapshot.rates.get(base).copied().filter(|r| *r > 0.0)?;
    let rates = snapshot
        .rates
        .iter()
        .map(|(code, rate)| {
            let rebased = if code == base { 1.0 } else { rate / divisor };
            (code.clone(), rebased)
        })
        .collect();
    Some(RatesSnapshot {
        base: base.to_string(),
        rates,
        last_updated: snapshot.last_updated,
        message: snapshot.message.clone(),
    })
}

/// Parses a user supplied amount, accepting only finite numbers.
pub fn parse_amount(input: &str) -> Result<f64, ClientError> {
    input
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|amount| amount.is_finite())
        .ok_or(ClientError::InvalidAmount)
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConversionRequest {
    pub amount: f64,
    pub from: String,
    pub to: String,
}

impl ConversionRequest {
    pub fn validate(amount: &str, from: &str, to: &str) -> Result<Self, ClientError> {
        let amount = parse_amount(amount)?;
        if from.is_empty() || to.is_empty() {
            return Err(ClientError::MissingCurrency);
        }
        Ok(ConversionRequest {
            amount,
            from: from.to_string(),
            to: to.to_string(),
        })
    }

    pub fn is_identity(&self) -> bool {
        self.from == self.to
    }

    /// Whether `snapshot` can price this conversion without a new fetch.
    pub fn is_priced_by(&self, snapshot: &RatesSnapshot) -> bool {
        snapshot.base == self.from && snapshot.rates.contains_key(&self.to)
    }

    pub fn convert(&self, snapshot: &RatesSnapshot) -> Result<ConversionOutcome, ClientError> {
        if self.is_identity() {
            return Ok(ConversionOutcome::Identity {
                amount: self.amount,
                currency: self.from.clone(),
            });
        }
        let rate = snapshot
            .rates
            .get(&self.to)
            .copied()
            .filter(|rate| self.is_priced_by(snapshot) && *rate > 0.0)
            .ok_or_else(|| ClientError::RateUnavailable {
                from: self.from.clone(),
                to: self.to.clone(),
            })?;
        Ok(ConversionOutcome::Converted {
            amount: self.amount,
            from: self.from.clone(),
            to: self.to.clone(),
            rate,
            converted: self.amount * rate,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConversionOutcome {
    Identity {
        amount: f64,
        currency: String,
    },
    Converted {
        amount: f64,
        from: String,
        to: String,
        rate: f64,
        converted: f64,
    },
}

impl ConversionOutcome {
    /// `1 from = r to` and `1 to = 1/r from`, when a rate was involved.
    pub fn unit_rates(&self) -> Option<(String, String)> {
        match self {
            ConversionOutcome::Identity { .. } => None,
            ConversionOutcome::Converted { from, to, rate, .. } => Some((
                format!("1 {from} = {rate:.6} {to}"),
                format!("1 {to} = {:.6} {from}", 1.0 / rate),
            )),
        }
    }
}

impl Display for ConversionOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConversionOutcome::Identity { amount, currency } => {
                write!(f, "{amount} {currency} = {amount} {currency}")
            }
            ConversionOutcome::Converted {
                amount,
                from,
                to,
                converted,
                ..
            } => write!(f, "{amount} {from} = {converted:.2} {to}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::currency::RateTable;

    fn snapshot(base: &str, pairs: &[(&str, f64)]) -> RatesSnapshot {
        let rates: RateTable = pairs.iter().map(|(c, r)| (c.to_string(), *r)).collect();
        RatesSnapshot {
            base: base.to_string(),
            rates,
            last_updated: None,
            message: None,
        }
    }

    #[test]
    fn test_rate_rows_follow_list_order() {
        let currencies: Vec<String> = ["USD", "EUR", "JPY", "GBP"]
            .iter()
            .map(|c| c.to_string())
            .collect();
        let snap = snapshot("USD", &[("GBP", 0.79), ("USD", 1.0), ("JPY", 151.34)]);

        let rows = rate_rows(&currencies, &snap);
        let order: Vec<&str> = rows.iter().map(|r| r.currency.as_str()).collect();
        assert_eq!(order, vec!["USD", "JPY", "GBP"]);
        assert_eq!(rows[1].formatted_rate(), "151.340000");
    }

    #[test]
    fn test_status_line_mentions_fallback() {
        let mut snap = snapshot("USD", &[]);
        assert_eq!(status_line(&snap), "Last updated: never");
        snap.last_updated = Some(chrono::Utc::now());
        snap.message = Some("Using fallback data".to_string());
        let line = status_line(&snap);
        assert!(line.starts_with("Last updated: "));
        assert!(line.ends_with("(Using fallback data)"));
    }

    #[test]
    fn test_rebase() {
        let snap = snapshot("USD", &[("USD", 1.0), ("EUR", 0.5), ("JPY", 100.0)]);
        let rebased = rebase(&snap, "EUR").unwrap();
        assert_eq!(rebased.base, "EUR");
        assert_eq!(rebased.rates["EUR"], 1.0);
        assert_eq!(rebased.rates["USD"], 2.0);
        assert_eq!(rebased.rates["JPY"], 200.0);
        assert!(rebase(&snap, "GBP").is_none());
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("100"), Ok(100.0));
        assert_eq!(parse_amount(" 12.5 "), Ok(12.5));
        assert_eq!(parse_amount("abc"), Err(ClientError::InvalidAmount));
        assert_eq!(parse_amount(""), Err(ClientError::InvalidAmount));
        assert_eq!(parse_amount("inf"), Err(ClientError::InvalidAmount));
        assert_eq!(parse_amount("NaN"), Err(ClientError::InvalidAmount));
    }

    #[test]
    fn test_validate_requires_both_currencies() {
        assert_eq!(
            ConversionRequest::validate("10", "", "EUR"),
            Err(ClientError::MissingCurrency)
        );
        assert_eq!(
            ConversionRequest::validate("abc", "USD", "EUR"),
            Err(ClientError::InvalidAmount)
        );
        assert!(ConversionRequest::validate("10", "USD", "EUR").is_ok());
    }

    #[test]
    fn test_identity_conversion() {
        let request = ConversionRequest::validate("100", "GBP", "GBP").unwrap();
        let outcome = request.convert(&snapshot("USD", &[])).unwrap();
        assert_eq!(outcome.to_string(), "100 GBP = 100 GBP");
        assert!(outcome.unit_rates().is_none());
    }

    #[test]
    fn test_converted_output() {
        let request = ConversionRequest::validate("100", "USD", "EUR").unwrap();
        let snap = snapshot("USD", &[("USD", 1.0), ("EUR", 0.93)]);
        assert!(request.is_priced_by(&snap));

        let outcome = request.convert(&snap).unwrap();
        assert_eq!(outcome.to_string(), "100 USD = 93.00 EUR");
        let (forward, inverse) = outcome.unit_rates().unwrap();
        assert_eq!(forward, "1 USD = 0.930000 EUR");
        assert_eq!(inverse, "1 EUR = 1.075269 USD");
    }

    #[test]
    fn test_convert_rejects_table_for_other_base() {
        let request = ConversionRequest::validate("1", "EUR", "JPY").unwrap();
        let snap = snapshot("USD", &[("EUR", 0.93), ("JPY", 151.34)]);
        assert!(!request.is_priced_by(&snap));
        assert_eq!(
            request.convert(&snap),
            Err(ClientError::RateUnavailable {
                from: "EUR".to_string(),
                to: "JPY".to_string()
            })
        );
    }
}
