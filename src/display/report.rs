//! Report formatting utilities for terminal output
//!
//! Shared helpers for the report views: money with the configured currency
//! symbol, percentages, progress bars and separators.

use chrono::NaiveDate;

use crate::models::Money;

/// Width of report headers and separators
pub const REPORT_WIDTH: usize = 80;

/// Format an amount with the configured currency symbol
pub fn format_money(amount: Money, symbol: &str) -> String {
    amount.format_with_symbol(symbol)
}

/// Format an amount with an explicit sign, for net figures
pub fn format_signed(amount: Money, symbol: &str) -> String {
    if amount.is_positive() {
        format!("+{}", amount.format_with_symbol(symbol))
    } else {
        amount.format_with_symbol(symbol)
    }
}

/// Format a percentage with appropriate precision
pub fn format_percentage(pct: f64) -> String {
    if pct < 0.1 && pct > 0.0 {
        format!("{:.2}%", pct)
    } else if pct < 10.0 {
        format!("{:.1}%", pct)
    } else {
        format!("{:.0}%", pct)
    }
}

/// Optional date, `-` when absent
pub fn format_date(date: Option<NaiveDate>, format: &str) -> String {
    date.map(|d| d.format(format).to_string())
        .unwrap_or_else(|| "-".to_string())
}

/// Create a simple bar chart representation
pub fn format_bar(value: f64, max_value: f64, width: usize) -> String {
    if max_value <= 0.0 || value <= 0.0 {
        return "░".repeat(width);
    }

    let filled = ((value / max_value) * width as f64).round() as usize;
    let filled = filled.min(width);

    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

/// Format a header line with padding
pub fn format_header(title: &str, width: usize) -> String {
    let len = title.chars().count();
    let padding = if len >= width { 0 } else { (width - len) / 2 };
    format!("{}{}", " ".repeat(padding), title)
}

/// Format a double separator line
pub fn double_separator(width: usize) -> String {
    "═".repeat(width)
}

/// Truncate a string to a maximum length with ellipsis
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        ".".repeat(max_len)
    } else {
        let kept: String = s.chars().take(max_len - 3).collect();
        format!("{}...", kept)
    }
}

/// Title block shared by every report
pub fn report_title(title: &str, subtitle: &str) -> String {
    let mut output = String::new();
    output.push_str(&double_separator(REPORT_WIDTH));
    output.push('\n');
    output.push_str(&format_header(title, REPORT_WIDTH));
    output.push('\n');
    if !subtitle.is_empty() {
        output.push_str(&format_header(subtitle, REPORT_WIDTH));
        output.push('\n');
    }
    output.push_str(&double_separator(REPORT_WIDTH));
    output.push_str("\n\n");
    output
}
