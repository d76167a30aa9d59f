use chrono::Datelike;

use crate::app::tmdb::Movie;
use ratatui::text::Span;

pub fn release_year(movie: &Movie) -> String {
    movie
        .released_on()
        .map(|date| date.year().to_string())
        .unwrap_or_else(|| "TBA".to_string())
}

pub fn long_release_date(movie: &Movie) -> String {
    movie
        .released_on()
        .map(|date| date.format("%B %-d, %Y").to_string())
        .unwrap_or_else(|| "Release date unavailable".to_string())
}

pub fn format_rating(rating: f64) -> String {
    format!("{:.1}", rating)
}

/// 1234567 -> "1,234,567"
pub fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}

/// Terminal columns `text` occupies; wide (CJK) characters count double.
pub fn display_width(text: &str) -> usize {
    Span::raw(text).width()
}

/// Cuts `text` to at most `width` terminal columns, ending with an ellipsis
/// when cut.
pub fn truncate(text: &str, width: usize) -> String {
    if display_width(text) <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }

    let budget = width - 1;
    let mut cut = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = display_width(c.encode_utf8(&mut [0; 4]));
        if used + w > budget {
            break;
        }
        cut.push(c);
        used += w;
    }
    cut.push('…');
    cut
}
