/// Format a monetary amount for display: "1,234.50"
pub fn format_currency(amount: f64) -> String {
    let whole = amount.trunc() as i64;
    let cents = (amount.fract().abs() * 100.0).round() as i64;
    format!("{}.{:02}", group_thousands(whole), cents)
}

/// Format a mileage value with thousands separators: "45,000 km"
pub fn format_mileage(mileage: u32) -> String {
    format!("{} km", group_thousands(mileage as i64))
}

fn group_thousands(value: i64) -> String {
    let digits = value.abs().to_string();
    let mut grouped = String::new();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    if value < 0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

/// Truncate a string to a maximum length, adding ellipsis if needed
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}

/// Format a date string to a more readable format
pub fn format_date(date: &str) -> String {
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(date) {
        dt.format("%b %d, %Y").to_string()
    } else if date.len() >= 10 {
        // YYYY-MM-DD as stored by the forms
        date.chars().take(10).collect()
    } else {
        date.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(300.0), "300.00");
        assert_eq!(format_currency(1234.5), "1,234.50");
        assert_eq!(format_currency(0.05), "0.05");
    }

    #[test]
    fn test_format_mileage() {
        assert_eq!(format_mileage(45000), "45,000 km");
        assert_eq!(format_mileage(950), "950 km");
    }

    #[test]
    fn test_truncate_string() {
        assert_eq!(truncate_string("Hello", 10), "Hello");
        assert_eq!(truncate_string("Hello World", 8), "Hello...");
        assert_eq!(truncate_string("Hi", 2), "Hi");
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date("2024-02-01"), "2024-02-01");
        assert_eq!(format_date("2024-02-01T10:30:00+00:00"), "Feb 01, 2024");
    }
}
