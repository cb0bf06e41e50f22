//! Domain records and their translation to and from the wire messages.

use std::fmt;
use std::str::FromStr;
use std::time::{Duration, SystemTime};

use thiserror::Error;

use crate::wire::{bank as pb, resiliency as rpb};

#[derive(Debug, Error, PartialEq)]
pub enum DomainError {
    #[error("unknown transaction type {0:?} (expected IN or OUT)")]
    UnknownTransactionType(String),
    #[error("{field}: wire value {value} is not a known variant")]
    UnknownWireValue { field: &'static str, value: i32 },
    #[error("amount must be finite and non-negative, got {0}")]
    InvalidAmount(f64),
    #[error("delay bounds out of order: min {min}s > max {max}s")]
    DelayBounds { min: u32, max: u32 },
}

fn check_amount(amount: f64) -> Result<f64, DomainError> {
    if amount.is_finite() && amount >= 0.0 {
        Ok(amount)
    } else {
        Err(DomainError::InvalidAmount(amount))
    }
}

fn timestamp(ts: Option<prost_types::Timestamp>) -> Option<SystemTime> {
    ts.and_then(|ts| SystemTime::try_from(ts).ok())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransactionType {
    In,
    Out,
}

impl TransactionType {
    pub fn as_str(self) -> &'static str {
        match self {
            TransactionType::In => "IN",
            TransactionType::Out => "OUT",
        }
    }

    pub fn to_wire(self) -> pb::TransactionType {
        match self {
            TransactionType::In => pb::TransactionType::In,
            TransactionType::Out => pb::TransactionType::Out,
        }
    }

    /// `Unspecified` and out-of-range values are rejected.
    pub fn from_wire(value: i32) -> Result<Self, DomainError> {
        match pb::TransactionType::try_from(value) {
            Ok(pb::TransactionType::In) => Ok(TransactionType::In),
            Ok(pb::TransactionType::Out) => Ok(TransactionType::Out),
            _ => Err(DomainError::UnknownWireValue {
                field: "transaction type",
                value,
            }),
        }
    }
}

impl FromStr for TransactionType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "IN" => Ok(TransactionType::In),
            "OUT" => Ok(TransactionType::Out),
            _ => Err(DomainError::UnknownTransactionType(s.to_string())),
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// One record of a client-streamed transaction batch. Built by the caller
/// and never mutated once handed to the adapter.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub amount: f64,
    pub transaction_type: TransactionType,
    pub notes: String,
}

impl Transaction {
    pub fn new(
        transaction_type: TransactionType,
        amount: f64,
        notes: impl Into<String>,
    ) -> Result<Self, DomainError> {
        Ok(Self {
            amount: check_amount(amount)?,
            transaction_type,
            notes: notes.into(),
        })
    }

    pub fn to_wire(&self, account_number: &str) -> pb::Transaction {
        pb::Transaction {
            account_number: account_number.to_string(),
            r#type: self.transaction_type.to_wire() as i32,
            amount: self.amount,
            timestamp: Some(prost_types::Timestamp::from(SystemTime::now())),
            notes: self.notes.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TransferTransaction {
    pub from_account: String,
    pub to_account: String,
    pub currency: String,
    pub amount: f64,
}

impl TransferTransaction {
    pub fn new(
        from_account: impl Into<String>,
        to_account: impl Into<String>,
        currency: impl Into<String>,
        amount: f64,
    ) -> Result<Self, DomainError> {
        Ok(Self {
            from_account: from_account.into(),
            to_account: to_account.into(),
            currency: currency.into(),
            amount: check_amount(amount)?,
        })
    }

    pub fn to_wire(&self) -> pb::TransferRequest {
        pb::TransferRequest {
            from_account_number: self.from_account.clone(),
            to_account_number: self.to_account.clone(),
            currency: self.currency.clone(),
            amount: self.amount,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Balance {
    pub account_number: String,
    pub amount: f64,
    pub current_date: String,
}

impl Balance {
    pub fn from_wire(account_number: &str, res: pb::CurrentBalanceResponse) -> Self {
        Self {
            account_number: account_number.to_string(),
            amount: res.amount,
            current_date: res.current_date,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExchangeRate {
    pub from_currency: String,
    pub to_currency: String,
    pub rate: f64,
    pub valid_from: Option<SystemTime>,
    pub valid_to: Option<SystemTime>,
}

impl From<pb::ExchangeRateResponse> for ExchangeRate {
    fn from(res: pb::ExchangeRateResponse) -> Self {
        Self {
            from_currency: res.from_currency,
            to_currency: res.to_currency,
            rate: res.rate,
            valid_from: timestamp(res.valid_from_timestamp),
            valid_to: timestamp(res.valid_to_timestamp),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TransactionSummary {
    pub account_number: String,
    pub sum_in: f64,
    pub sum_out: f64,
    pub sum_total: f64,
}

impl From<pb::TransactionSummary> for TransactionSummary {
    fn from(res: pb::TransactionSummary) -> Self {
        Self {
            account_number: res.account_number,
            sum_in: res.sum_amount_in,
            sum_out: res.sum_amount_out,
            sum_total: res.sum_total,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferStatus {
    Success,
    Failed,
}

/// Result of one transfer record, as reported by the remote.
#[derive(Debug, Clone, PartialEq)]
pub struct TransferOutcome {
    pub from_account: String,
    pub to_account: String,
    pub currency: String,
    pub amount: f64,
    pub status: TransferStatus,
    pub timestamp: Option<SystemTime>,
}

impl TryFrom<pb::TransferResponse> for TransferOutcome {
    type Error = DomainError;

    fn try_from(res: pb::TransferResponse) -> Result<Self, Self::Error> {
        let status = match pb::TransferStatus::try_from(res.status) {
            Ok(pb::TransferStatus::Success) => TransferStatus::Success,
            Ok(pb::TransferStatus::Failed) => TransferStatus::Failed,
            _ => {
                return Err(DomainError::UnknownWireValue {
                    field: "transfer status",
                    value: res.status,
                })
            }
        };
        Ok(Self {
            from_account: res.from_account_number,
            to_account: res.to_account_number,
            currency: res.currency,
            amount: res.amount,
            status,
            timestamp: timestamp(res.timestamp),
        })
    }
}

/// Fault-injection parameters, passed to the remote verbatim.
///
/// The client never interprets the delay bounds except through
/// [`FaultParams::worst_case_latency`] for timeout accounting.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FaultParams {
    pub min_delay_secs: u32,
    pub max_delay_secs: u32,
    pub status_codes: Vec<u32>,
}

impl FaultParams {
    pub fn new(
        min_delay_secs: u32,
        max_delay_secs: u32,
        status_codes: Vec<u32>,
    ) -> Result<Self, DomainError> {
        if min_delay_secs > max_delay_secs {
            return Err(DomainError::DelayBounds {
                min: min_delay_secs,
                max: max_delay_secs,
            });
        }
        Ok(Self {
            min_delay_secs,
            max_delay_secs,
            status_codes,
        })
    }

    pub fn worst_case_latency(&self) -> Duration {
        Duration::from_secs(u64::from(self.min_delay_secs.max(self.max_delay_secs)))
    }

    pub fn to_wire(&self) -> rpb::ResilliencyRequest {
        rpb::ResilliencyRequest {
            min_delay_second: i32::try_from(self.min_delay_secs).unwrap_or(i32::MAX),
            max_delay_second: i32::try_from(self.max_delay_secs).unwrap_or(i32::MAX),
            status_codes: self.status_codes.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transaction_type_parses_and_maps() {
        assert_eq!("in".parse::<TransactionType>(), Ok(TransactionType::In));
        assert_eq!(" OUT ".parse::<TransactionType>(), Ok(TransactionType::Out));
        assert!(matches!(
            "SIDEWAYS".parse::<TransactionType>(),
            Err(DomainError::UnknownTransactionType(_))
        ));
        for ty in [TransactionType::In, TransactionType::Out] {
            assert_eq!(TransactionType::from_wire(ty.to_wire() as i32), Ok(ty));
        }
    }

    #[test]
    fn unspecified_wire_values_are_rejected() {
        assert!(TransactionType::from_wire(pb::TransactionType::Unspecified as i32).is_err());
        assert!(TransactionType::from_wire(42).is_err());

        let res = pb::TransferResponse {
            status: pb::TransferStatus::Unspecified as i32,
            ..Default::default()
        };
        assert_eq!(
            TransferOutcome::try_from(res),
            Err(DomainError::UnknownWireValue {
                field: "transfer status",
                value: 0
            })
        );
    }

    #[test]
    fn transaction_to_wire_keeps_type_and_note() {
        let tx = Transaction::new(TransactionType::Out, 50_000.0, "coffee").unwrap();
        let wire = tx.to_wire("7835697001");
        assert_eq!(wire.account_number, "7835697001");
        assert_eq!(wire.r#type, pb::TransactionType::Out as i32);
        assert_eq!(wire.notes, "coffee");
        assert!(wire.timestamp.is_some());
    }

    #[test]
    fn negative_or_nan_amounts_rejected() {
        assert_eq!(
            Transaction::new(TransactionType::In, -1.0, "").unwrap_err(),
            DomainError::InvalidAmount(-1.0)
        );
        assert!(TransferTransaction::new("a", "b", "IDR", f64::NAN).is_err());
    }

    #[test]
    fn exchange_rate_timestamps_convert() {
        let res = pb::ExchangeRateResponse {
            from_currency: "USD".into(),
            to_currency: "IDR".into(),
            rate: 15_500.0,
            valid_from_timestamp: Some(prost_types::Timestamp {
                seconds: 1_700_000_000,
                nanos: 0,
            }),
            valid_to_timestamp: None,
        };
        let rate = ExchangeRate::from(res);
        assert_eq!(
            rate.valid_from,
            Some(SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000))
        );
        assert_eq!(rate.valid_to, None);
    }

    #[test]
    fn fault_params_bounds_and_latency() {
        assert_eq!(
            FaultParams::new(5, 2, vec![]),
            Err(DomainError::DelayBounds { min: 5, max: 2 })
        );
        let params = FaultParams::new(1, 3, vec![2, 13]).unwrap();
        assert_eq!(params.worst_case_latency(), Duration::from_secs(3));
        let wire = params.to_wire();
        assert_eq!((wire.min_delay_second, wire.max_delay_second), (1, 3));
        assert_eq!(wire.status_codes, vec![2, 13]);
    }
}
