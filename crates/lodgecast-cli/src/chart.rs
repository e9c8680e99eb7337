//! Text charts for the rating distribution.
//!
//! Bar, horizontal bar, and pie are three projections of the same count
//! data; no kind carries more information than another. Axes always show
//! all three ratings so a zero count is visible rather than absent.

use clap::ValueEnum;
use lodgecast_core::Rating;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ChartKind {
    /// Vertical bar chart
    Bar,
    /// Horizontal bar chart
    Hbar,
    /// Pie-style share breakdown
    Pie,
}

const BAR_ROWS: usize = 8;
const HBAR_WIDTH: usize = 30;
const PIE_WIDTH: usize = 20;

/// Render the counts as the chosen chart kind.
pub fn render(counts: &[(Rating, usize)], kind: ChartKind) -> String {
    let full = full_counts(counts);
    match kind {
        ChartKind::Bar => bar(&full),
        ChartKind::Hbar => hbar(&full),
        ChartKind::Pie => pie(&full),
    }
}

/// Expand sparse counts onto the fixed rating axis, zeros included.
fn full_counts(counts: &[(Rating, usize)]) -> [(Rating, usize); 3] {
    let mut full = [
        (Rating::Great, 0),
        (Rating::Average, 0),
        (Rating::Poor, 0),
    ];
    for &(rating, n) in counts {
        let slot = full
            .iter_mut()
            .find(|(r, _)| *r == rating)
            .expect("fixed rating axis covers every label");
        slot.1 = n;
    }
    full
}

fn bar(counts: &[(Rating, usize); 3]) -> String {
    let max = counts.iter().map(|(_, n)| *n).max().unwrap_or(0);
    let mut out = String::new();

    for level in (1..=BAR_ROWS).rev() {
        for &(_, n) in counts {
            let filled = max > 0 && scale(n, max, BAR_ROWS) >= level;
            out.push_str(if filled { "   █    " } else { "        " });
        }
        out.push('\n');
    }
    for &(rating, _) in counts {
        out.push_str(&format!("{:<8}", rating.as_str()));
    }
    out.push('\n');
    for &(_, n) in counts {
        out.push_str(&format!("{n:<8}"));
    }
    out.push('\n');
    out
}

fn hbar(counts: &[(Rating, usize); 3]) -> String {
    let max = counts.iter().map(|(_, n)| *n).max().unwrap_or(0);
    let mut out = String::new();

    for &(rating, n) in counts {
        let cells = if max == 0 { 0 } else { scale(n, max, HBAR_WIDTH) };
        out.push_str(&format!(
            "{:<8} {:<pad$} {}\n",
            rating.as_str(),
            "█".repeat(cells),
            n,
            pad = HBAR_WIDTH
        ));
    }
    out
}

fn pie(counts: &[(Rating, usize); 3]) -> String {
    let total: usize = counts.iter().map(|(_, n)| n).sum();
    let mut out = String::new();

    for &(rating, n) in counts {
        let pct = if total == 0 {
            0.0
        } else {
            n as f64 / total as f64 * 100.0
        };
        let cells = if total == 0 {
            0
        } else {
            scale(n, total, PIE_WIDTH)
        };
        out.push_str(&format!(
            "{:<8} {:<pad$} {:>5.1}%\n",
            rating.as_str(),
            "●".repeat(cells),
            pct,
            pad = PIE_WIDTH
        ));
    }
    out
}

/// Scale a count onto `cells` cells of a `max`-valued axis. Any non-zero
/// count occupies at least one cell.
fn scale(n: usize, max: usize, cells: usize) -> usize {
    if n == 0 { 0 } else { (n * cells).div_ceil(max) }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts() -> Vec<(Rating, usize)> {
        vec![(Rating::Poor, 3), (Rating::Great, 1)]
    }

    #[test]
    fn all_ratings_appear_on_every_chart() {
        for kind in [ChartKind::Bar, ChartKind::Hbar, ChartKind::Pie] {
            let chart = render(&counts(), kind);
            for rating in Rating::ALL {
                assert!(
                    chart.contains(rating.as_str()),
                    "{kind:?} chart missing {rating}: {chart}"
                );
            }
        }
    }

    #[test]
    fn hbar_widths_track_counts() {
        let chart = render(&counts(), ChartKind::Hbar);
        let lines: Vec<&str> = chart.lines().collect();
        let bar_len = |line: &str| line.chars().filter(|&c| c == '█').count();

        // Line order follows the fixed axis: Great, Average, Poor.
        assert_eq!(bar_len(lines[0]), HBAR_WIDTH / 3); // 1 of max 3
        assert_eq!(bar_len(lines[1]), 0); // absent → zero
        assert_eq!(bar_len(lines[2]), HBAR_WIDTH); // max count
    }

    #[test]
    fn pie_percentages_cover_the_whole() {
        let chart = render(&counts(), ChartKind::Pie);
        assert!(chart.contains("75.0%"));
        assert!(chart.contains("25.0%"));
        assert!(chart.contains(" 0.0%"));
    }

    #[test]
    fn zero_counts_render_without_bars() {
        for kind in [ChartKind::Bar, ChartKind::Hbar, ChartKind::Pie] {
            let chart = render(&[], kind);
            assert!(!chart.contains('█') && !chart.contains('●'), "{kind:?}");
            assert!(chart.contains("Great"));
        }
    }

    #[test]
    fn bar_has_fixed_height() {
        let chart = render(&counts(), ChartKind::Bar);
        // BAR_ROWS chart rows plus label and count baselines.
        assert_eq!(chart.lines().count(), BAR_ROWS + 2);
    }

    #[test]
    fn nonzero_count_always_visible() {
        // 1 against a max of 1000 still gets one cell.
        let chart = render(&[(Rating::Great, 1000), (Rating::Poor, 1)], ChartKind::Hbar);
        let poor_line = chart.lines().last().unwrap();
        assert!(poor_line.contains('█'));
    }
}
