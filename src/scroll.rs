pub const BROWSE_TRIGGER_MARGIN: usize = 4;
pub const PICKER_TRIGGER_MARGIN: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Viewport {
    pub offset: usize,
    pub height: usize,
}

impl Viewport {
    pub fn new(offset: usize, height: usize) -> Self {
        Self { offset, height }
    }
}

/// Watches a list's sentinel row and reports when it comes within `margin`
/// rows of the viewport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrollTrigger {
    margin: usize,
    fired: u64,
}

impl ScrollTrigger {
    pub fn new(margin: usize) -> Self {
        Self { margin, fired: 0 }
    }

    pub fn fired(&self) -> u64 {
        self.fired
    }

    pub fn sentinel_visible(&self, sentinel_row: usize, viewport: Viewport) -> bool {
        if viewport.height == 0 {
            return false;
        }
        let top = viewport.offset.saturating_sub(self.margin);
        let bottom = viewport
            .offset
            .saturating_add(viewport.height)
            .saturating_add(self.margin);
        sentinel_row >= top && sentinel_row < bottom
    }

    pub fn observe(&mut self, sentinel_row: Option<usize>, viewport: Viewport) -> bool {
        let Some(row) = sentinel_row else {
            return false;
        };
        let visible = self.sentinel_visible(row, viewport);
        if visible {
            self.fired += 1;
        }
        visible
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn margin_extends_below_the_viewport() {
        let trigger = ScrollTrigger::new(BROWSE_TRIGGER_MARGIN);
        let viewport = Viewport::new(0, 20);
        assert!(trigger.sentinel_visible(19, viewport));
        assert!(trigger.sentinel_visible(23, viewport));
        assert!(!trigger.sentinel_visible(24, viewport));
    }

    #[test]
    fn picker_margin_is_tighter() {
        let trigger = ScrollTrigger::new(PICKER_TRIGGER_MARGIN);
        let viewport = Viewport::new(10, 10);
        assert!(trigger.sentinel_visible(21, viewport));
        assert!(!trigger.sentinel_visible(22, viewport));
        assert!(trigger.sentinel_visible(8, viewport));
        assert!(!trigger.sentinel_visible(7, viewport));
    }

    #[test]
    fn zero_height_viewport_never_fires() {
        let mut trigger = ScrollTrigger::new(4);
        assert!(!trigger.observe(Some(0), Viewport::new(0, 0)));
        assert!(!trigger.observe(None, Viewport::new(0, 10)));
        assert_eq!(trigger.fired(), 0);
    }
}
