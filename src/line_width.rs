//! # Line Widths and Tab Stops
//!
//! The solver asks a [`LineWidth`] for the content width of each line index
//! and a [`TabStops`] for the x position following a tab. Both variant sets
//! are closed, so dispatch stays static.

use serde::{Deserialize, Serialize};

/// Allowed content width per line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LineWidth {
    /// Every line gets the same width.
    Rectangle { width: f32 },
    /// Per-line widths; lines past the end of `widths` get `default`.
    Varying { widths: Vec<f32>, default: f32 },
}

impl LineWidth {
    /// A rectangular frame of the given width.
    #[inline]
    pub fn rectangle(width: f32) -> Self {
        LineWidth::Rectangle { width }
    }

    /// A variable-width shape with explicit leading line widths.
    #[inline]
    pub fn varying(widths: Vec<f32>, default: f32) -> Self {
        LineWidth::Varying { widths, default }
    }

    /// Width allowed for the line at `line_index`.
    pub fn width_at(&self, line_index: usize) -> f32 {
        match self {
            LineWidth::Rectangle { width } => *width,
            LineWidth::Varying { widths, default } => {
                widths.get(line_index).copied().unwrap_or(*default)
            }
        }
    }
}

/// Tab stop positions used to resolve tab advances against the running line
/// x coordinate.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TabStops {
    stops: Vec<f32>,
    tab_width: f32,
}

impl TabStops {
    pub fn new(stops: &[f32], tab_width: f32) -> Self {
        TabStops { stops: stops.to_vec(), tab_width }
    }

    /// The x position of the first tab stop after `x`. With no explicit stop
    /// left, snaps to the next multiple of the default tab width; a
    /// non-positive default leaves `x` unchanged.
    pub fn next_tab(&self, x: f32) -> f32 {
        for &stop in &self.stops {
            if stop > x {
                return stop;
            }
        }
        if self.tab_width <= 0.0 {
            x
        } else {
            (x / self.tab_width).floor() * self.tab_width + self.tab_width
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rectangle_width() {
        let width = LineWidth::rectangle(230.0);
        assert_eq!(width.width_at(0), 230.0);
        assert_eq!(width.width_at(17), 230.0);
    }

    #[test]
    fn test_varying_width_falls_back_to_default() {
        let width = LineWidth::varying(vec![100.0, 80.0], 60.0);
        assert_eq!(width.width_at(0), 100.0);
        assert_eq!(width.width_at(1), 80.0);
        assert_eq!(width.width_at(2), 60.0);
    }

    #[test]
    fn test_next_tab_with_default_interval() {
        let tabs = TabStops::new(&[], 10.0);
        assert_eq!(tabs.next_tab(0.0), 10.0);
        assert_eq!(tabs.next_tab(20.0), 30.0);
        assert_eq!(tabs.next_tab(25.0), 30.0);
    }

    #[test]
    fn test_next_tab_with_explicit_stops() {
        let tabs = TabStops::new(&[15.0, 45.0], 10.0);
        assert_eq!(tabs.next_tab(0.0), 15.0);
        assert_eq!(tabs.next_tab(15.0), 45.0);
        // Past the last stop the default interval takes over.
        assert_eq!(tabs.next_tab(50.0), 60.0);
    }

    #[test]
    fn test_zero_interval_is_inert() {
        let tabs = TabStops::new(&[], 0.0);
        assert_eq!(tabs.next_tab(37.0), 37.0);
    }
}
