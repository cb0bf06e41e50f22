//! Indonesian Rupiah display formatting: `.` groups thousands, `,` separates
//! the two decimals.

/// `1234567.891` -> `Rp 1.234.567,89`. Negative amounts keep their sign after
/// the currency symbol.
pub fn format_rupiah(amount: f64) -> String {
    if !amount.is_finite() {
        return format!("Rp {amount}");
    }
    let fixed = format!("{:.2}", amount.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    // "-0,00" reads as noise; only show a sign when something non-zero survives rounding.
    let negative = amount < 0.0 && fixed.bytes().any(|b| b.is_ascii_digit() && b != b'0');
    format!(
        "Rp {}{},{}",
        if negative { "-" } else { "" },
        group_thousands(int_part),
        frac_part
    )
}

/// `1234567` -> `Rp 1.234.567`.
pub fn format_rupiah_int(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let sign = if amount < 0 { "-" } else { "" };
    format!("Rp {sign}{}", group_thousands(&digits))
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }
    out
}
