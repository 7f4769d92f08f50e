#![forbid(unsafe_code)]

//! Sheet geometry: viewport width to panel width and inset.
//!
//! A sheet slides in from the right edge and comes to rest at `inset`
//! pixels from the left edge of the viewport. The panel is constrained to
//! `panel_width = viewport - inset` so it always reaches the right edge.
//!
//! # Breakpoints
//!
//! | viewport            | inset                       |
//! |---------------------|-----------------------------|
//! | `w < 768`           | `0`                         |
//! | `768 <= w < 1160`   | `floor((w - 768) / 2)`      |
//! | `w >= 1160`         | `floor((w - 960) / 2)`      |
//!
//! # Max-width override
//!
//! When a maximum sheet width is configured, breakpoints are bypassed:
//! the effective width is `max(max_width, floor((w - 960) / 2))` and the
//! inset is whatever is left of the viewport (never negative).
//!
//! # Invariants
//!
//! 1. `inset + panel_width == viewport_width` for every input.
//! 2. `inset <= viewport_width`.
//! 3. Pure: same input, same output. No state is kept between calls.

/// Viewport width at which the medium tier starts.
pub const MEDIUM_BREAKPOINT: u32 = 768;

/// Viewport width at which the wide tier starts.
pub const WIDE_BREAKPOINT: u32 = 1160;

/// Content column the wide tier centers the sheet's left edge around.
pub const WIDE_CONTENT_WIDTH: u32 = 960;

/// Responsive tier of a viewport width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Breakpoint {
    /// Narrow viewports: the sheet covers the full width.
    Compact,
    /// Tablet-ish viewports: inset centered around a 768px column.
    Medium,
    /// Desktop viewports: inset centered around a 960px column.
    Wide,
}

impl Breakpoint {
    /// All tiers, smallest first.
    pub const ALL: [Breakpoint; 3] = [Self::Compact, Self::Medium, Self::Wide];

    /// Classify a viewport width.
    #[must_use]
    pub const fn classify(viewport_width: u32) -> Self {
        if viewport_width >= WIDE_BREAKPOINT {
            Self::Wide
        } else if viewport_width >= MEDIUM_BREAKPOINT {
            Self::Medium
        } else {
            Self::Compact
        }
    }

    /// Width of the column the inset is centered against, if any.
    #[must_use]
    pub const fn column_width(self) -> Option<u32> {
        match self {
            Self::Compact => None,
            Self::Medium => Some(MEDIUM_BREAKPOINT),
            Self::Wide => Some(WIDE_CONTENT_WIDTH),
        }
    }
}

impl std::fmt::Display for Breakpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Compact => "compact",
            Self::Medium => "medium",
            Self::Wide => "wide",
        };
        f.write_str(name)
    }
}

/// Computed geometry for one sheet at one viewport width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SheetGeometry {
    /// Maximum on-screen width of the panel, in pixels.
    pub panel_width: u32,
    /// Padding left of the panel when it is at rest, in pixels.
    pub inset: u32,
}

impl SheetGeometry {
    /// Horizontal translation of the panel when fully open.
    #[inline]
    #[must_use]
    pub const fn rest_offset(&self) -> u32 {
        self.inset
    }

    /// Viewport width this geometry was computed for.
    #[inline]
    #[must_use]
    pub const fn viewport_width(&self) -> u32 {
        self.panel_width + self.inset
    }
}

/// Compute sheet geometry using the breakpoint table.
#[must_use]
pub fn compute_geometry(viewport_width: u32) -> SheetGeometry {
    let inset = match Breakpoint::classify(viewport_width).column_width() {
        Some(column) => (viewport_width - column) / 2,
        None => 0,
    };
    SheetGeometry {
        panel_width: viewport_width - inset,
        inset,
    }
}

/// Compute sheet geometry, honoring an optional maximum sheet width.
///
/// `None` (or `Some(0)`) falls back to [`compute_geometry`].
#[must_use]
pub fn compute_geometry_with_max(viewport_width: u32, max_width: Option<u32>) -> SheetGeometry {
    let Some(max_width) = max_width.filter(|&w| w > 0) else {
        return compute_geometry(viewport_width);
    };

    let width = i64::from(viewport_width);
    let floor_width = (width - i64::from(WIDE_CONTENT_WIDTH)).div_euclid(2);
    let effective = i64::from(max_width).max(floor_width);
    let inset = (width - effective).clamp(0, width);
    // `inset` is within [0, viewport_width], so the narrowing is lossless.
    let inset = inset as u32;

    SheetGeometry {
        panel_width: viewport_width - inset,
        inset,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compact_viewport_has_no_inset() {
        for w in [0, 1, 320, 767] {
            let g = compute_geometry(w);
            assert_eq!(g.inset, 0, "w={w}");
            assert_eq!(g.panel_width, w, "w={w}");
        }
    }

    #[test]
    fn medium_viewport_centers_on_768_column() {
        assert_eq!(
            compute_geometry(768),
            SheetGeometry {
                panel_width: 768,
                inset: 0
            }
        );
        assert_eq!(compute_geometry(1000).inset, 116);
        assert_eq!(compute_geometry(1001).inset, 116);
        assert_eq!(compute_geometry(1159).inset, 195);
        assert_eq!(compute_geometry(1159).panel_width, 964);
    }

    #[test]
    fn wide_viewport_centers_on_960_column() {
        let g = compute_geometry(1200);
        assert_eq!(g.inset, 120);
        assert_eq!(g.panel_width, 1080);
        assert_eq!(g.rest_offset(), 120);
        assert_eq!(compute_geometry(1160).inset, 100);
        assert_eq!(compute_geometry(1921).inset, 480);
    }

    #[test]
    fn breakpoint_classification_edges() {
        assert_eq!(Breakpoint::classify(767), Breakpoint::Compact);
        assert_eq!(Breakpoint::classify(768), Breakpoint::Medium);
        assert_eq!(Breakpoint::classify(1159), Breakpoint::Medium);
        assert_eq!(Breakpoint::classify(1160), Breakpoint::Wide);
        assert_eq!(Breakpoint::Wide.to_string(), "wide");
    }

    #[test]
    fn breakpoints_are_ordered() {
        let mut sorted = Breakpoint::ALL;
        sorted.sort();
        assert_eq!(sorted, Breakpoint::ALL);
    }

    #[test]
    fn geometry_reports_its_viewport() {
        assert_eq!(compute_geometry(1440).viewport_width(), 1440);
    }

    #[test]
    fn max_width_bypasses_breakpoints() {
        let g = compute_geometry_with_max(1200, Some(600));
        assert_eq!(g.inset, 600);
        assert_eq!(g.panel_width, 600);
    }

    #[test]
    fn max_width_is_raised_to_wide_floor() {
        // floor((2000 - 960) / 2) = 520 > 400, so 520 wins.
        let g = compute_geometry_with_max(2000, Some(400));
        assert_eq!(g.panel_width, 520);
        assert_eq!(g.inset, 1480);
    }

    #[test]
    fn max_width_wider_than_viewport_clamps_inset_to_zero() {
        let g = compute_geometry_with_max(500, Some(900));
        assert_eq!(g.inset, 0);
        assert_eq!(g.panel_width, 500);
    }

    #[test]
    fn zero_max_width_means_unset() {
        assert_eq!(compute_geometry_with_max(1200, Some(0)), compute_geometry(1200));
        assert_eq!(compute_geometry_with_max(1200, None), compute_geometry(1200));
    }
}
