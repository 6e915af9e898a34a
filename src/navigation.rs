//! Screen navigation driven by debounced touches.
//!
//! # Screens
//!
//! - [`Screen::Overview`]: header, four metric cards, drive summary
//! - [`Screen::Drives`]: per-drive cards with share buttons
//! - [`Screen::Stats`]: large-number readout (only with 3 screens configured)
//!
//! # Touch Policy
//!
//! Every accepted touch is first offered to the buttons of the current
//! screen. Only the Drives screen has buttons (one share pill per drive card).
//! A touch no button claims advances to `(current + 1) % screen_count`.

use std::time::{Duration, Instant};

use embedded_graphics::prelude::Point;
use embedded_graphics::primitives::Rectangle;

use crate::touch::{Debounce, ScreenPoint};

/// Available screens, in cycle order.
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug)]
pub enum Screen {
    #[default]
    Overview,
    Drives,
    Stats,
}

impl Screen {
    const ALL: [Self; 3] = [Self::Overview, Self::Drives, Self::Stats];

    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Self::Overview => 0,
            Self::Drives => 1,
            Self::Stats => 2,
        }
    }

    /// Next screen in a cycle of `count` screens (2 or 3).
    #[inline]
    pub fn next(
        self,
        count: usize,
    ) -> Self {
        let count = count.clamp(1, Self::ALL.len());
        Self::ALL[(self.index() + 1) % count]
    }
}

/// Result of an accepted touch.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TouchAction {
    /// Screen changed to the contained screen.
    Navigate(Screen),
    /// Share button of drive `n` on the Drives screen was tapped.
    ToggleShare(usize),
}

/// Current screen plus the debounce window for transitions.
#[derive(Clone, Debug)]
pub struct NavigationState {
    current: Screen,
    screen_count: usize,
    debounce: Debounce,
}

impl NavigationState {
    pub fn new(
        screen_count: usize,
        debounce: Duration,
    ) -> Self {
        Self {
            current: Screen::Overview,
            screen_count: screen_count.clamp(2, Screen::ALL.len()),
            debounce: Debounce::new(debounce),
        }
    }

    #[inline]
    pub const fn current(&self) -> Screen { self.current }

    #[inline]
    pub const fn screen_count(&self) -> usize { self.screen_count }

    /// Time of the last accepted touch.
    pub const fn last_transition(&self) -> Option<Instant> { self.debounce.last_accepted() }

    /// Handle a calibrated touch at `now`.
    ///
    /// `share_buttons[i]` is the tap region for drive `i`; it is only
    /// consulted on the Drives screen. Returns `None` when the touch falls
    /// inside the debounce window.
    pub fn handle_touch(
        &mut self,
        point: ScreenPoint,
        now: Instant,
        share_buttons: &[Rectangle],
    ) -> Option<TouchAction> {
        if !self.debounce.accept(now) {
            return None;
        }

        if self.current == Screen::Drives {
            let p = Point::new(point.x as i32, point.y as i32);
            if let Some(index) = share_buttons.iter().position(|r| r.contains(p)) {
                return Some(TouchAction::ToggleShare(index));
            }
        }

        self.current = self.current.next(self.screen_count);
        Some(TouchAction::Navigate(self.current))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_graphics::prelude::Size;

    const DEBOUNCE: Duration = Duration::from_millis(200);

    #[test]
    fn test_screen_default() {
        assert_eq!(Screen::default(), Screen::Overview);
    }

    #[test]
    fn test_three_screen_cycle() {
        let start = Instant::now();
        let mut nav = NavigationState::new(3, DEBOUNCE);
        let tap = ScreenPoint::new(160, 120);
        let mut seen = vec![nav.current()];
        for i in 1..=3 {
            nav.handle_touch(tap, start + DEBOUNCE * i, &[]);
            seen.push(nav.current());
        }
        assert_eq!(seen, vec![Screen::Overview, Screen::Drives, Screen::Stats, Screen::Overview]);
    }

    #[test]
    fn test_two_screen_cycle_skips_stats() {
        let start = Instant::now();
        let mut nav = NavigationState::new(2, DEBOUNCE);
        let tap = ScreenPoint::new(10, 10);
        assert_eq!(nav.handle_touch(tap, start, &[]), Some(TouchAction::Navigate(Screen::Drives)));
        assert_eq!(
            nav.handle_touch(tap, start + DEBOUNCE, &[]),
            Some(TouchAction::Navigate(Screen::Overview)),
            "2-screen configuration must wrap back to Overview"
        );
    }

    #[test]
    fn test_debounced_touch_leaves_state_unchanged() {
        let start = Instant::now();
        let mut nav = NavigationState::new(3, DEBOUNCE);
        let tap = ScreenPoint::new(50, 50);
        nav.handle_touch(tap, start, &[]);
        assert_eq!(nav.handle_touch(tap, start + Duration::from_millis(100), &[]), None);
        assert_eq!(nav.current(), Screen::Drives, "second touch inside window must be dropped");
        assert_eq!(nav.last_transition(), Some(start));
    }

    #[test]
    fn test_share_button_claims_touch_on_drives() {
        let start = Instant::now();
        let mut nav = NavigationState::new(3, DEBOUNCE);
        let buttons = [
            Rectangle::new(Point::new(26, 66), Size::new(64, 16)),
            Rectangle::new(Point::new(26, 122), Size::new(64, 16)),
        ];
        nav.handle_touch(ScreenPoint::new(300, 10), start, &buttons);
        assert_eq!(nav.current(), Screen::Drives, "overview ignores share buttons");

        let action = nav.handle_touch(ScreenPoint::new(30, 125), start + DEBOUNCE, &buttons);
        assert_eq!(action, Some(TouchAction::ToggleShare(1)));
        assert_eq!(nav.current(), Screen::Drives, "button press must not navigate");

        let action = nav.handle_touch(ScreenPoint::new(200, 200), start + DEBOUNCE * 2, &buttons);
        assert_eq!(action, Some(TouchAction::Navigate(Screen::Stats)), "unclaimed touch navigates");
    }
}
