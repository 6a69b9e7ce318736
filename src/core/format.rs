use chrono::NaiveDate;

const LAKH: f64 = 100_000.0;
const CRORE: f64 = 10_000_000.0;

/// INR currency with Indian digit grouping and no paise: ₹12,34,567.
pub fn format_currency(amount: f64) -> String {
    let negative = amount < 0.0;
    let rupees = amount.abs().round() as u64;
    let grouped = group_indian(&rupees.to_string());
    if negative {
        format!("-₹{grouped}")
    } else {
        format!("₹{grouped}")
    }
}

/// Lakh/crore magnitude labels with two decimals; small amounts fall back to
/// plain currency formatting.
pub fn format_crores(amount: f64) -> String {
    if amount >= CRORE {
        format!("{:.2} crore", amount / CRORE)
    } else if amount >= LAKH {
        format!("{:.2} lakh", amount / LAKH)
    } else {
        format_currency(amount)
    }
}

/// "{Y} year(s)[, {M} month(s)]" phrasing for a fractional year count.
///
/// Both the horizon sentinel (100) and a literal infinity collapse to
/// "Never"; the caller cannot tell them apart and is not meant to.
pub fn format_years_and_months(years: f64) -> String {
    if years.is_infinite() || years >= 100.0 {
        return "Never".to_string();
    }

    let whole_years = years.floor() as i64;
    let months = ((years - years.floor()) * 12.0).round() as i64;

    if whole_years == 0 {
        return plural(months, "month");
    }
    if months == 0 {
        return plural(whole_years, "year");
    }
    format!("{}, {}", plural(whole_years, "year"), plural(months, "month"))
}

/// Long-form date: "March 5, 2026".
pub fn format_date(date: NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}

fn plural(count: i64, unit: &str) -> String {
    if count == 1 {
        format!("1 {unit}")
    } else {
        format!("{count} {unit}s")
    }
}

// Indian grouping: the last three digits, then groups of two.
fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }

    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups = Vec::new();
    let mut end = head.len();
    while end > 2 {
        groups.push(&head[end - 2..end]);
        end -= 2;
    }
    groups.push(&head[..end]);
    groups.reverse();
    format!("{},{}", groups.join(","), tail)
}
