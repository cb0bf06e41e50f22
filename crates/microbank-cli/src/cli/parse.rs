//! Value parsers for repeatable record flags.

use microbank_core::domain::{Transaction, TransactionType, TransferTransaction};

fn amount(raw: &str) -> Result<f64, String> {
    raw.trim()
        .parse::<f64>()
        .map_err(|_| format!("invalid amount {raw:?}"))
}

/// `TYPE:AMOUNT[:NOTE]`, e.g. `IN:150000:salary`. The note may contain `:`.
pub fn transaction(value: &str) -> Result<Transaction, String> {
    let mut parts = value.splitn(3, ':');
    let (Some(kind), Some(raw_amount)) = (parts.next(), parts.next()) else {
        return Err(format!("expected TYPE:AMOUNT[:NOTE], got {value:?}"));
    };
    let kind = kind.parse::<TransactionType>().map_err(|e| e.to_string())?;
    let note = parts.next().unwrap_or_default();
    Transaction::new(kind, amount(raw_amount)?, note).map_err(|e| e.to_string())
}

/// `FROM:TO:CURRENCY:AMOUNT`, e.g. `7835697001:7835697002:IDR:25000`.
pub fn transfer(value: &str) -> Result<TransferTransaction, String> {
    let parts: Vec<&str> = value.split(':').collect();
    let [from, to, currency, raw_amount] = parts.as_slice() else {
        return Err(format!("expected FROM:TO:CURRENCY:AMOUNT, got {value:?}"));
    };
    if from.is_empty() || to.is_empty() || currency.is_empty() {
        return Err(format!("empty field in transfer {value:?}"));
    }
    TransferTransaction::new(*from, *to, currency.to_ascii_uppercase(), amount(raw_amount)?)
        .map_err(|e| e.to_string())
}
