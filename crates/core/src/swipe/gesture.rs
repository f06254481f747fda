//! Gesture interpreter.
//!
//! Turns pointer drags and key presses into [`SwipeCommand`]s. A drag only
//! previews its direction on the session while it is in progress; the
//! command is decided from the last classification when the finger lifts,
//! so a drag that wanders left and right yields exactly one command.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::session::SwipeSession;
use super::{SwipeCommand, SwipeDirection};

/// Errors constructing a [`GestureConfig`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GestureConfigError {
    #[error("swipe threshold must be a positive number of pixels, got {0}")]
    InvalidThreshold(f64),
}

/// Tuning for drag classification.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GestureConfig {
    /// Horizontal travel, in pixels, a drag must exceed to count as a swipe.
    pub threshold_px: f64,
}

impl GestureConfig {
    /// Reference threshold used on phones.
    pub const DEFAULT_THRESHOLD_PX: f64 = 50.0;

    /// # Errors
    ///
    /// Returns an error unless `threshold_px` is finite and positive.
    pub fn new(threshold_px: f64) -> Result<Self, GestureConfigError> {
        if threshold_px.is_finite() && threshold_px > 0.0 {
            Ok(Self { threshold_px })
        } else {
            Err(GestureConfigError::InvalidThreshold(threshold_px))
        }
    }

    /// Classify a horizontal drag delta. Crossing requires strictly more
    /// than the threshold.
    #[must_use]
    pub fn classify(&self, delta_x: f64) -> Option<SwipeDirection> {
        if delta_x > self.threshold_px {
            Some(SwipeDirection::Right)
        } else if delta_x < -self.threshold_px {
            Some(SwipeDirection::Left)
        } else {
            None
        }
    }
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            threshold_px: Self::DEFAULT_THRESHOLD_PX,
        }
    }
}

/// Tracks one drag at a time.
#[derive(Debug, Clone, Default)]
pub struct GestureInterpreter {
    config: GestureConfig,
    anchor: Option<f64>,
    last: Option<SwipeDirection>,
}

impl GestureInterpreter {
    #[must_use]
    pub const fn new(config: GestureConfig) -> Self {
        Self {
            config,
            anchor: None,
            last: None,
        }
    }

    #[must_use]
    pub const fn config(&self) -> GestureConfig {
        self.config
    }

    /// Whether a drag is in progress.
    #[must_use]
    pub const fn is_tracking(&self) -> bool {
        self.anchor.is_some()
    }

    /// Finger down at `x`. Restarts any drag in progress.
    pub fn touch_start(&mut self, x: f64) {
        self.anchor = Some(x);
        self.last = None;
    }

    /// Finger moved to `x`. Updates the session's preview and returns the
    /// current classification. Moves without a start are ignored.
    pub fn touch_move(&mut self, x: f64, session: &mut SwipeSession) -> Option<SwipeDirection> {
        let anchor = self.anchor?;
        self.last = self.config.classify(x - anchor);
        session.preview(self.last);
        self.last
    }

    /// Finger up. Returns the command for the final classification, if the
    /// threshold was crossed, and clears the preview.
    pub fn touch_end(&mut self, session: &mut SwipeSession) -> Option<SwipeCommand> {
        self.anchor.take()?;
        session.preview(None);
        match self.last.take()? {
            SwipeDirection::Right => Some(SwipeCommand::Like),
            SwipeDirection::Left => Some(SwipeCommand::Dislike),
        }
    }

    /// Drag aborted by the platform; no command.
    pub fn touch_cancel(&mut self, session: &mut SwipeSession) {
        if self.anchor.take().is_some() {
            session.preview(None);
        }
        self.last = None;
    }
}

/// Keys with swipe bindings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    Char(char),
}

impl std::str::FromStr for Key {
    type Err = String;

    /// Accepts DOM key names (`ArrowLeft`) or a single character.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ArrowLeft" | "Left" => Ok(Self::ArrowLeft),
            "ArrowRight" | "Right" => Ok(Self::ArrowRight),
            "ArrowUp" | "Up" => Ok(Self::ArrowUp),
            "ArrowDown" | "Down" => Ok(Self::ArrowDown),
            other => {
                let mut chars = other.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Ok(Self::Char(c)),
                    _ => Err(format!("unrecognised key {other:?}")),
                }
            }
        }
    }
}

/// Keyboard binding. Keys act immediately, without a drag preview.
///
/// | key | command |
/// |---|---|
/// | `→` / `l` | like |
/// | `←` / `d` | dislike |
/// | `↓` / `n` | next |
/// | `↑` / `p` | previous |
/// | `r` | restart |
#[must_use]
pub fn key_command(key: Key) -> Option<SwipeCommand> {
    match key {
        Key::ArrowRight => Some(SwipeCommand::Like),
        Key::ArrowLeft => Some(SwipeCommand::Dislike),
        Key::ArrowDown => Some(SwipeCommand::Next),
        Key::ArrowUp => Some(SwipeCommand::Previous),
        Key::Char(c) => match c.to_ascii_lowercase() {
            'l' => Some(SwipeCommand::Like),
            'd' => Some(SwipeCommand::Dislike),
            'n' => Some(SwipeCommand::Next),
            'p' => Some(SwipeCommand::Previous),
            'r' => Some(SwipeCommand::Restart),
            _ => None,
        },
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::swipe::Decision;
    use crate::types::ProductId;

    fn one_card_session() -> SwipeSession {
        let catalog = Catalog::seed().unwrap();
        let first = catalog.list_products().first().cloned().unwrap();
        SwipeSession::new(vec![first])
    }

    #[test]
    fn test_drag_past_threshold_likes() {
        let mut session = one_card_session();
        let mut gestures = GestureInterpreter::new(GestureConfig::new(50.0).unwrap());

        gestures.touch_start(100.0);
        assert_eq!(gestures.touch_move(160.0, &mut session), Some(SwipeDirection::Right));
        assert_eq!(session.pending_direction(), Some(SwipeDirection::Right));
        assert_eq!(session.decision_count(), 0);

        let command = gestures.touch_end(&mut session).unwrap();
        assert_eq!(command, SwipeCommand::Like);
        assert!(session.apply(command).is_applied());
        assert_eq!(
            session.decision_for(&ProductId::new("prod-001")),
            Some(Decision::Liked)
        );
        assert_eq!(session.decision_count(), 1);
    }

    #[test]
    fn test_drag_within_threshold_is_noop() {
        let mut session = one_card_session();
        let mut gestures = GestureInterpreter::default();

        gestures.touch_start(0.0);
        assert_eq!(gestures.touch_move(50.0, &mut session), None);
        assert_eq!(gestures.touch_move(-49.0, &mut session), None);
        assert_eq!(gestures.touch_end(&mut session), None);
        assert_eq!(session.cursor(), 0);
    }

    #[test]
    fn test_final_position_decides() {
        let mut session = one_card_session();
        let mut gestures = GestureInterpreter::default();

        gestures.touch_start(0.0);
        gestures.touch_move(80.0, &mut session);
        gestures.touch_move(-80.0, &mut session);
        gestures.touch_move(90.0, &mut session);
        gestures.touch_move(-70.0, &mut session);
        assert_eq!(gestures.touch_end(&mut session), Some(SwipeCommand::Dislike));
        // The gesture is over; a second end yields nothing.
        assert_eq!(gestures.touch_end(&mut session), None);
    }

    #[test]
    fn test_returning_to_center_cancels() {
        let mut session = one_card_session();
        let mut gestures = GestureInterpreter::default();

        gestures.touch_start(0.0);
        gestures.touch_move(120.0, &mut session);
        gestures.touch_move(10.0, &mut session);
        assert_eq!(session.pending_direction(), None);
        assert_eq!(gestures.touch_end(&mut session), None);
    }

    #[test]
    fn test_move_without_start_is_ignored() {
        let mut session = one_card_session();
        let mut gestures = GestureInterpreter::default();
        assert_eq!(gestures.touch_move(500.0, &mut session), None);
        assert_eq!(session.pending_direction(), None);
        assert_eq!(gestures.touch_end(&mut session), None);
    }

    #[test]
    fn test_touch_cancel_clears_preview() {
        let mut session = one_card_session();
        let mut gestures = GestureInterpreter::default();
        gestures.touch_start(0.0);
        gestures.touch_move(-90.0, &mut session);
        gestures.touch_cancel(&mut session);
        assert!(!gestures.is_tracking());
        assert_eq!(session.pending_direction(), None);
        assert_eq!(gestures.touch_end(&mut session), None);
    }

    #[test]
    fn test_threshold_is_configurable() {
        let dense = GestureConfig::new(120.0).unwrap();
        assert_eq!(dense.classify(100.0), None);
        assert_eq!(dense.classify(121.0), Some(SwipeDirection::Right));
        assert!(GestureConfig::new(0.0).is_err());
        assert!(GestureConfig::new(f64::NAN).is_err());
    }

    #[test]
    fn test_key_bindings() {
        assert_eq!(key_command(Key::ArrowRight), Some(SwipeCommand::Like));
        assert_eq!(key_command(Key::ArrowLeft), Some(SwipeCommand::Dislike));
        assert_eq!(key_command(Key::ArrowDown), Some(SwipeCommand::Next));
        assert_eq!(key_command(Key::ArrowUp), Some(SwipeCommand::Previous));
        assert_eq!(key_command(Key::Char('R')), Some(SwipeCommand::Restart));
        assert_eq!(key_command(Key::Char('x')), None);
    }

    #[test]
    fn test_key_from_str() {
        assert_eq!("ArrowLeft".parse::<Key>(), Ok(Key::ArrowLeft));
        assert_eq!("l".parse::<Key>(), Ok(Key::Char('l')));
        assert!("Escape".parse::<Key>().is_err());
    }
}
