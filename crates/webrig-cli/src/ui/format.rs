//! Formatting utilities for sizes, durations and build summaries.

use std::time::Duration;

use owo_colors::OwoColorize;
use webrig_bundler::AssetInfo;

use super::colors_enabled;

/// Format a byte count using decimal units, matching the size budgets.
///
/// ```
/// use webrig_cli::ui::format_size;
///
/// assert_eq!(format_size(0), "0 B");
/// assert_eq!(format_size(999), "999 B");
/// assert_eq!(format_size(1_500), "1.50 KB");
/// assert_eq!(format_size(4_000_000), "4.00 MB");
/// ```
pub fn format_size(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB"];

    let mut size = bytes as f64;
    let mut unit_idx = 0;
    while size >= 1000.0 && unit_idx < UNITS.len() - 1 {
        size /= 1000.0;
        unit_idx += 1;
    }

    if unit_idx == 0 {
        format!("{bytes} B")
    } else {
        format!("{size:.2} {}", UNITS[unit_idx])
    }
}

/// ```
/// use std::time::Duration;
/// use webrig_cli::ui::format_duration;
///
/// assert_eq!(format_duration(Duration::from_millis(50)), "50ms");
/// assert_eq!(format_duration(Duration::from_millis(1500)), "1.50s");
/// assert_eq!(format_duration(Duration::from_secs(90)), "1m 30s");
/// ```
pub fn format_duration(duration: Duration) -> String {
    let total_ms = duration.as_millis();
    if total_ms < 1000 {
        format!("{total_ms}ms")
    } else if total_ms < 60_000 {
        format!("{:.2}s", duration.as_secs_f64())
    } else {
        let secs = duration.as_secs();
        format!("{}m {}s", secs / 60, secs % 60)
    }
}

/// Print emitted files with their sizes, largest first.
pub fn print_build_summary(assets: &[AssetInfo], duration: Duration) {
    let mut assets: Vec<&AssetInfo> = assets.iter().collect();
    assets.sort_by(|a, b| b.size.cmp(&a.size).then_with(|| a.name.cmp(&b.name)));

    let width = assets.iter().map(|a| a.name.len()).max().unwrap_or(0);
    eprintln!();
    for asset in assets {
        let size = format_size(asset.size);
        if colors_enabled() {
            eprintln!("  {:<width$}  {}", asset.name.cyan(), size.dimmed());
        } else {
            eprintln!("  {:<width$}  {size}", asset.name);
        }
    }
    eprintln!();
    super::info(&format!("Compiled in {}", format_duration(duration)));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_boundaries() {
        assert_eq!(format_size(1_000), "1.00 KB");
        assert_eq!(format_size(1_000_000), "1.00 MB");
        assert_eq!(format_size(2_500_000_000), "2.50 GB");
    }

    #[test]
    fn duration_boundaries() {
        assert_eq!(format_duration(Duration::from_millis(999)), "999ms");
        assert_eq!(format_duration(Duration::from_secs(60)), "1m 0s");
    }
}
