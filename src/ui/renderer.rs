// Formatting helpers shared by the dashboard tables

/// Format a USD amount for display, compacting large values
pub fn format_usd(amount: f64) -> String {
    let abs = amount.abs();
    if abs >= 1_000_000_000.0 {
        format!("${:.2}B", amount / 1_000_000_000.0)
    } else if abs >= 1_000_000.0 {
        format!("${:.2}M", amount / 1_000_000.0)
    } else if abs >= 1_000.0 {
        format!("${:.2}K", amount / 1_000.0)
    } else if abs > 0.0 && abs < 0.01 {
        format!("${:.8}", amount)
    } else {
        format!("${:.2}", amount)
    }
}

/// Format an optional statistic; missing values render like pandas' NaN
pub fn format_stat(value: Option<f64>) -> String {
    match value {
        Some(v) if v.abs() >= 1_000.0 => format!("{:.2}", v),
        Some(v) => format!("{:.6}", v),
        None => "NaN".to_string(),
    }
}

pub fn format_flag(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "-"
    }
}

/// Shorten long base58 addresses to `abcd…wxyz`
pub fn short_address(address: &str) -> String {
    let chars: Vec<char> = address.chars().collect();
    if chars.len() <= 12 {
        return address.to_string();
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}…{}", head, tail)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_usd() {
        assert_eq!(format_usd(0.0), "$0.00");
        assert_eq!(format_usd(50_000.0), "$50.00K");
        assert_eq!(format_usd(2_000_000.0), "$2.00M");
        assert_eq!(format_usd(0.00042), "$0.00042000");
    }

    #[test]
    fn test_format_stat() {
        assert_eq!(format_stat(None), "NaN");
        assert_eq!(format_stat(Some(2.5)), "2.500000");
        assert_eq!(format_stat(Some(50_000.0)), "50000.00");
    }

    #[test]
    fn test_short_address() {
        assert_eq!(short_address("short"), "short");
        assert_eq!(
            short_address("EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v"),
            "EPjF…Dt1v"
        );
    }
}
