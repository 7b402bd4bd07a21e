#![forbid(unsafe_code)]

//! Pointer-position to raw enter/leave edges for a rectangular region.

use hoverintent_core::HoverKind;

/// A rectangular hover target that reports boundary crossings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HoverRegion {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
    inside: bool,
}

impl HoverRegion {
    #[must_use]
    pub const fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self {
            x,
            y,
            width,
            height,
            inside: false,
        }
    }

    #[must_use]
    pub fn contains(&self, col: u16, row: u16) -> bool {
        let right = u32::from(self.x) + u32::from(self.width);
        let bottom = u32::from(self.y) + u32::from(self.height);
        col >= self.x && u32::from(col) < right && row >= self.y && u32::from(row) < bottom
    }

    /// Whether the pointer was last seen inside.
    #[inline]
    #[must_use]
    pub fn is_inside(&self) -> bool {
        self.inside
    }

    /// Track a pointer position. Returns a raw transition only on a crossing.
    pub fn update(&mut self, col: u16, row: u16) -> Option<HoverKind> {
        let now_inside = self.contains(col, row);
        if now_inside == self.inside {
            return None;
        }
        self.inside = now_inside;
        Some(if now_inside {
            HoverKind::Enter
        } else {
            HoverKind::Leave
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_is_half_open() {
        let region = HoverRegion::new(10, 5, 4, 2);
        assert!(region.contains(10, 5));
        assert!(region.contains(13, 6));
        assert!(!region.contains(14, 6));
        assert!(!region.contains(13, 7));
        assert!(!region.contains(9, 5));
    }

    #[test]
    fn crossings_are_edge_triggered() {
        let mut region = HoverRegion::new(0, 0, 5, 5);
        assert_eq!(region.update(10, 10), None);
        assert_eq!(region.update(2, 2), Some(HoverKind::Enter));
        assert_eq!(region.update(3, 3), None);
        assert_eq!(region.update(7, 3), Some(HoverKind::Leave));
        assert_eq!(region.update(8, 3), None);
        assert!(!region.is_inside());
    }

    #[test]
    fn no_overflow_at_edge_of_screen() {
        let region = HoverRegion::new(u16::MAX - 1, u16::MAX - 1, 10, 10);
        assert!(region.contains(u16::MAX, u16::MAX));
    }
}
