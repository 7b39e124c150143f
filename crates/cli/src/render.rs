//! Terminal rendering of deck snapshots.

use promptdeck_core::{DeckSnapshot, UsageAggregate, UsageLevel};

const BAR_WIDTH: usize = 32;
const PREVIEW_CHARS: usize = 48;

/// A fixed-width usage bar. Full once the ratio reaches 1.0; overflow is
/// shown by the caption, not by a longer bar.
pub fn usage_bar(usage: &UsageAggregate, width: usize) -> String {
    let filled = ((usage.usage_ratio.clamp(0.0, 1.0)) * width as f64).round() as usize;
    let filled = filled.min(width);
    format!("[{}{}]", "█".repeat(filled), "░".repeat(width - filled))
}

pub fn usage_line(usage: &UsageAggregate) -> String {
    let marker = match usage.level() {
        UsageLevel::Comfortable => "",
        UsageLevel::Filling => "  ⚠️  filling up",
        UsageLevel::Overflowing => "  ⛔ over budget",
    };
    format!(
        "{} {}/{} tokens ({:.1}%){}",
        usage_bar(usage, BAR_WIDTH),
        usage.total_tokens,
        usage.capacity,
        usage.percent(),
        marker
    )
}

fn preview(content: &str) -> String {
    if content.chars().count() <= PREVIEW_CHARS {
        return content.to_string();
    }
    let cut: String = content.chars().take(PREVIEW_CHARS - 1).collect();
    format!("{cut}…")
}

/// Print the sequence, one numbered line per block, then the usage bar.
pub fn print_snapshot(snapshot: &DeckSnapshot) {
    if snapshot.blocks.is_empty() {
        println!("  (empty — drag something from the palette)");
    }
    for (i, block) in snapshot.blocks.iter().enumerate() {
        println!(
            "  {:>2}. {:<9} {:>3} tok  {}",
            i + 1,
            block.kind().as_str(),
            block.token_cost(),
            preview(block.content())
        );
    }
    println!("  {}", usage_line(&snapshot.usage));
    if let Some(active) = &snapshot.gesture.active_id {
        println!("  ✋ dragging {active}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn usage(total: u64, capacity: u64) -> UsageAggregate {
        UsageAggregate {
            total_tokens: total,
            capacity,
            usage_ratio: total as f64 / capacity as f64,
        }
    }

    #[test]
    fn empty_bar() {
        assert_eq!(usage_bar(&usage(0, 100), 4), "[░░░░]");
    }

    #[test]
    fn half_bar() {
        assert_eq!(usage_bar(&usage(50, 100), 4), "[██░░]");
    }

    #[test]
    fn overflow_bar_stays_full_width() {
        assert_eq!(usage_bar(&usage(300, 100), 4), "[████]");
        assert!(usage_line(&usage(300, 100)).contains("over budget"));
    }

    #[test]
    fn long_content_is_shortened() {
        let text = "x".repeat(100);
        let shown = preview(&text);
        assert_eq!(shown.chars().count(), PREVIEW_CHARS);
        assert!(shown.ends_with('…'));
        assert_eq!(preview("short"), "short");
    }
}
