//! Terminal rendering of normalized emotion vectors.
use super::{EmotionVector, Normalized, normalize};

const BAR_WIDTH: usize = 20;

pub const TOTAL_ADVISORY: &str = "Percentages are model confidences and may not total 100%.";

pub fn to_percent(value: f64) -> String {
    format!("{:.1}%", value * 100.0)
}

fn known_emoji(label: &str) -> Option<&'static str> {
    match label {
        "joy" => Some("😊"),
        "neutral" => Some("😐"),
        "sadness" => Some("😞"),
        "anger" => Some("😡"),
        "fear" => Some("😨"),
        "surprise" => Some("😲"),
        "disgust" => Some("🤢"),
        _ => None,
    }
}

/// Emoji shown next to each bar.
pub fn emoji(label: &str) -> &'static str {
    known_emoji(label).unwrap_or("🔹")
}

/// Emoji shown on the dominant emotion badge.
pub fn badge_emoji(label: &str) -> &'static str {
    known_emoji(label).unwrap_or("🧠")
}

pub fn label(label: &str) -> &str {
    match label {
        "joy" => "Joy",
        "neutral" => "Neutral",
        "sadness" => "Sadness",
        "anger" => "Anger",
        "fear" => "Fear",
        "surprise" => "Surprise",
        "disgust" => "Disgust",
        other => other,
    }
}

fn bar(value: f64) -> String {
    let filled = (value * BAR_WIDTH as f64).round() as usize;
    let filled = filled.min(BAR_WIDTH);
    format!("{}{}", "█".repeat(filled), "░".repeat(BAR_WIDTH - filled))
}

/// Renders the dominant emotion badge followed by one bar per
/// emotion. Returns `None` when there is nothing to show.
pub fn render(normalized: &Normalized) -> Option<String> {
    let top = normalized.top()?;

    let mut lines = vec![format!(
        "{} {} {}",
        badge_emoji(&top.label),
        label(&top.label),
        to_percent(top.value)
    )];
    for entry in normalized.entries.iter() {
        lines.push(format!(
            "  {} {:<10} {} {:>6}",
            emoji(&entry.label),
            label(&entry.label),
            bar(entry.value),
            to_percent(entry.value)
        ));
    }
    if normalized.needs_total_advisory() {
        lines.push(format!("  {}", TOTAL_ADVISORY));
    }

    Some(lines.join("\n"))
}

pub fn render_vector(raw: Option<&EmotionVector>) -> Option<String> {
    render(&normalize(raw))
}
