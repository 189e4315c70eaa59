use std::ops::{Deref, DerefMut, Range};

pub const BROWSE_PAGE_SIZE: usize = 30;
pub const PICKER_PAGE_SIZE: usize = 15;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationState {
    current_page: usize,
    items_per_page: usize,
    pub has_more: bool,
    pub is_loading: bool,
}

impl PaginationState {
    pub fn new(items_per_page: usize) -> Self {
        Self {
            current_page: 1,
            items_per_page: items_per_page.max(1),
            has_more: true,
            is_loading: false,
        }
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn reset(&mut self) {
        self.current_page = 1;
        self.has_more = true;
    }

    pub fn advance(&mut self) {
        self.current_page = self.current_page.saturating_add(1);
    }

    /// Slice bounds of the current page over `total` items. Pages past the end
    /// yield an empty range at `total`.
    pub fn window(&self, total: usize) -> Range<usize> {
        let end = self
            .current_page
            .saturating_mul(self.items_per_page)
            .min(total);
        let start = (self.current_page - 1)
            .saturating_mul(self.items_per_page)
            .min(end);
        start..end
    }

    pub fn sync_has_more(&mut self, total: usize) {
        self.has_more = self.current_page.saturating_mul(self.items_per_page) < total;
    }

    /// Marks the list as loading until the returned guard is dropped.
    /// Returns `None` when a load is already running or nothing is left.
    pub fn begin_load(&mut self) -> Option<LoadingGuard<'_>> {
        if self.is_loading || !self.has_more {
            return None;
        }
        self.is_loading = true;
        Some(LoadingGuard { state: self })
    }
}

pub struct LoadingGuard<'a> {
    state: &'a mut PaginationState,
}

impl Deref for LoadingGuard<'_> {
    type Target = PaginationState;

    fn deref(&self) -> &Self::Target {
        self.state
    }
}

impl DerefMut for LoadingGuard<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.state
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.state.is_loading = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_clamps_to_total() {
        let mut state = PaginationState::new(30);
        assert_eq!(state.window(45), 0..30);
        state.advance();
        assert_eq!(state.window(45), 30..45);
        state.advance();
        assert_eq!(state.window(45), 45..45);
        assert_eq!(PaginationState::new(30).window(0), 0..0);
    }

    #[test]
    fn guard_releases_loading_flag() {
        let mut state = PaginationState::new(15);
        {
            let mut guard = state.begin_load().expect("first load should start");
            guard.advance();
            assert!(guard.is_loading);
        }
        assert!(!state.is_loading);
        assert_eq!(state.current_page(), 2);
    }

    #[test]
    fn no_load_while_loading_or_exhausted() {
        let mut state = PaginationState::new(15);
        state.is_loading = true;
        assert!(state.begin_load().is_none());
        state.is_loading = false;
        state.has_more = false;
        assert!(state.begin_load().is_none());
    }
}
