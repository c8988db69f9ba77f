//! Salary arithmetic and Indian-locale currency formatting

/// Where a formatted amount is going to be shown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurrencyVariant {
    /// Terminal / on-screen rendering, uses the rupee glyph
    Screen,
    /// Embedded in a generated PDF, where the standard fonts lack the glyph
    Printable,
}

impl CurrencyVariant {
    pub fn prefix(self) -> &'static str {
        match self {
            CurrencyVariant::Screen => "₹",
            CurrencyVariant::Printable => "Rs. ",
        }
    }
}

/// Maximum fraction digits kept when formatting amounts
const MAX_FRACTION_DIGITS: u32 = 3;

/// 2^53: from here on an f64 has no fractional part
const EXACT_INTEGER_LIMIT: f64 = 9_007_199_254_740_992.0;

/// wage = hours worked × hourly rate. No rounding, no bounds checks.
pub fn compute_salary(hours_worked: f64, hourly_rate: f64) -> f64 {
    hours_worked * hourly_rate
}

/// Format an amount with the currency prefix of `variant`.
///
/// Digits are grouped the en-IN way: the last three integer digits, then
/// pairs (`12,34,567`). Up to three fraction digits are kept, rounded half
/// away from zero, with trailing zeros dropped.
pub fn format_currency(value: f64, variant: CurrencyVariant) -> String {
    format!("{}{}", variant.prefix(), format_grouped(value))
}

/// Group `value` with en-IN digit grouping, without any currency prefix
pub fn format_grouped(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value < 0.0 { "-∞" } else { "∞" }.to_string();
    }

    let magnitude = value.abs();
    let sign = if value < 0.0 { "-" } else { "" };

    // At and above 2^53 every f64 is a whole number, and scaling could
    // overflow the integer path
    if magnitude >= EXACT_INTEGER_LIMIT {
        let integer = format!("{:.0}", magnitude);
        return format!("{}{}", sign, group_indian(&integer));
    }

    let scale = 10f64.powi(MAX_FRACTION_DIGITS as i32);
    let scaled = (magnitude * scale).round();
    // Rounded to zero: no sign, like "-0.0001" → "0"
    if scaled == 0.0 {
        return "0".to_string();
    }

    let scaled = scaled as u64;
    let divisor = 10u64.pow(MAX_FRACTION_DIGITS);
    let integer = scaled / divisor;
    let fraction = scaled % divisor;

    let mut result = String::from(sign);
    result.push_str(&group_indian(&integer.to_string()));

    if fraction > 0 {
        let digits = format!("{:0width$}", fraction, width = MAX_FRACTION_DIGITS as usize);
        result.push('.');
        result.push_str(digits.trim_end_matches('0'));
    }

    result
}

/// Insert en-IN separators into a run of ASCII digits
fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }

    let (head, last_three) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(2);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();

    format!("{},{}", groups.join(","), last_three)
}

/// Plain number text: `40`, `7.5`, never `40.0` or `-0`
pub fn format_plain_number(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    value.to_string()
}
