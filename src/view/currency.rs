//! Euro amounts formatted the way Spanish locales print them.

/// Format `amount` as euros in `es-ES` style: `.` groups thousands, `,`
/// separates two decimals, ` €` trails. Four-digit integers are not grouped.
///
/// ```
/// use politicos::view::currency::format_eur;
/// assert_eq!(format_eur(1000.0), "1000,00 €");
/// assert_eq!(format_eur(123456.789), "123.456,79 €");
/// ```
pub fn format_eur(amount: f64) -> String {
    if amount.is_nan() {
        return "NaN €".to_string();
    }
    if amount.is_infinite() {
        let sign = if amount < 0.0 { "-" } else { "" };
        return format!("{}∞ €", sign);
    }

    let cents = (amount.abs() * 100.0).round() as u128;
    let integer = (cents / 100).to_string();
    let fraction = cents % 100;
    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };

    format!("{}{},{:02} €", sign, group_thousands(&integer), fraction)
}

/// Insert `.` every three digits, but only from five digits up.
fn group_thousands(digits: &str) -> String {
    if digits.len() < 5 {
        return digits.to_string();
    }
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(c);
    }
    out
}
