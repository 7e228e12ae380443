//! # Page Break Decisions
//!
//! Logic for deciding when content moves to the next page. The flow
//! controller asks this module once per block, and the table splitter once
//! per row segment. Nothing here touches a page: it only compares heights.

/// Slack allowed when comparing heights. Line heights like `8.0 * 1.1` are
/// not exact in binary, so content that fills a page to the point must not
/// be pushed off it by rounding.
pub const FIT_EPSILON: f64 = 1e-9;

/// What to do with content at the current cursor position.
#[derive(Debug, Clone, PartialEq)]
pub enum BreakDecision {
    /// Everything fits on the current page.
    Place,
    /// Close this page and retry on a fresh one.
    MoveToNextPage,
    /// Breakable content: place the first items here, continue on the next
    /// page.
    Split {
        /// How many items fit on the current page.
        items_on_current_page: usize,
    },
    /// The page is already fresh and the first item still does not fit.
    /// Place it anyway and let it run past the bottom margin.
    Overflow,
}

/// Given the remaining space on a page and the heights of the items to place,
/// decide how to break.
///
/// Unbreakable content is a single unit: it fits, moves, or overflows. For
/// breakable content, `min_orphan_items` is the fewest items worth leaving
/// at the bottom of a page that already holds other content; fewer than that
/// and the whole run moves instead.
///
/// A fresh page never yields `MoveToNextPage`, so retrying on a fresh page
/// always terminates.
pub fn decide_break(
    remaining_height: f64,
    item_heights: &[f64],
    is_breakable: bool,
    page_is_fresh: bool,
    min_orphan_items: usize,
) -> BreakDecision {
    let total: f64 = item_heights.iter().sum();
    let limit = remaining_height + FIT_EPSILON;

    if total <= limit {
        return BreakDecision::Place;
    }

    if !is_breakable {
        return if page_is_fresh {
            BreakDecision::Overflow
        } else {
            BreakDecision::MoveToNextPage
        };
    }

    let mut running = 0.0;
    let mut fit_count = 0;
    for &h in item_heights {
        if running + h > limit {
            break;
        }
        running += h;
        fit_count += 1;
    }

    if fit_count == 0 {
        return if page_is_fresh {
            BreakDecision::Overflow
        } else {
            BreakDecision::MoveToNextPage
        };
    }

    if fit_count < min_orphan_items && !page_is_fresh {
        return BreakDecision::MoveToNextPage;
    }

    BreakDecision::Split {
        items_on_current_page: fit_count,
    }
}
