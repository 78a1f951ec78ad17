//! Input handling for the explorer views
//!
//! The core does not debounce pointer movement, so pointer events pass
//! through a latest-wins rate limiter (60 Hz by default) before they become
//! nearest-neighbor queries. Recoverable query failures (pointer over a zero
//! coordinate, unreadable field file) are logged and dropped; the views keep
//! showing the previous selection.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::time::{Duration, Instant};

use glam::DVec2;
use log::{debug, warn};

use spirals_core::ExplorationSession;

use crate::perspective::synchronization::OverlayKind;
use crate::perspective::Perspectives;
use crate::view::{ViewBounds, ViewError};

/// Default pointer sampling interval (60 Hz)
pub const DEFAULT_POINTER_INTERVAL: Duration = Duration::from_micros(16_667);

/// User input delivered by the host toolkit
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Pointer moved over the scatter, in scene coordinates
    PointerMoved { scene: DVec2 },

    /// A cutline overlay was dragged to `value`
    LineDragged { overlay: OverlayKind, value: f64 },

    /// A cutline overlay was clicked
    LineClicked { overlay: OverlayKind },

    /// Periodic tick; delivers a pointer move held back by the rate limiter
    Tick,
}

/// Latest-wins pointer rate limiter
#[derive(Debug, Clone)]
pub struct PointerRateLimiter {
    interval: Duration,
    last_emit: Option<Instant>,
    pending: Option<DVec2>,
}

impl Default for PointerRateLimiter {
    fn default() -> Self {
        Self::new(DEFAULT_POINTER_INTERVAL)
    }
}

impl PointerRateLimiter {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_emit: None,
            pending: None,
        }
    }

    /// Limiter emitting at most `hz` positions per second
    pub fn with_rate(hz: f64) -> Result<Self, ViewError> {
        if !(hz.is_finite() && hz > 0.0) {
            return Err(ViewError::InvalidRate(hz));
        }
        Duration::try_from_secs_f64(hz.recip())
            .map(Self::new)
            .map_err(|_| ViewError::InvalidRate(hz))
    }

    fn ready(&self, now: Instant) -> bool {
        self.last_emit
            .map_or(true, |last| now.saturating_duration_since(last) >= self.interval)
    }

    /// Offer a new position; returns it if it may be processed now,
    /// otherwise keeps it as the pending position.
    pub fn offer(&mut self, position: DVec2, now: Instant) -> Option<DVec2> {
        if self.ready(now) {
            self.last_emit = Some(now);
            self.pending = None;
            Some(position)
        } else {
            self.pending = Some(position);
            None
        }
    }

    /// Release the pending position once the interval has elapsed.
    pub fn flush(&mut self, now: Instant) -> Option<DVec2> {
        if self.pending.is_some() && self.ready(now) {
            self.last_emit = Some(now);
            self.pending.take()
        } else {
            None
        }
    }

    pub fn pending(&self) -> Option<DVec2> {
        self.pending
    }
}

/// Routes input to the session and keeps the views in sync
pub struct InteractionController {
    session: ExplorationSession,
    perspectives: Perspectives,
    limiter: PointerRateLimiter,
}

impl InteractionController {
    pub fn new(mut session: ExplorationSession, scatter_bounds: ViewBounds, limiter: PointerRateLimiter) -> Self {
        let perspectives = Perspectives::attach(&mut session, scatter_bounds);
        Self {
            session,
            perspectives,
            limiter,
        }
    }

    pub fn session(&self) -> &ExplorationSession {
        &self.session
    }

    pub fn perspectives(&self) -> &Perspectives {
        &self.perspectives
    }

    /// Handle one input event at time `now`.
    ///
    /// Returns whether any view changed. Only non-recoverable core errors
    /// are returned.
    pub fn handle(&mut self, event: InputEvent, now: Instant) -> Result<bool, ViewError> {
        match event {
            InputEvent::PointerMoved { scene } => {
                if let Some(scene) = self.limiter.offer(scene, now) {
                    self.query(scene)?;
                }
            }
            InputEvent::Tick => {
                if let Some(scene) = self.limiter.flush(now) {
                    self.query(scene)?;
                }
            }
            InputEvent::LineDragged { overlay, value } => {
                self.perspectives.cutline.drag(&mut self.session, overlay, value);
            }
            InputEvent::LineClicked { overlay } => {
                debug!("{:?} overlay clicked", overlay);
                self.perspectives.cutline.click(&mut self.session);
            }
        }

        Ok(self.perspectives.pump(&self.session) > 0)
    }

    fn query(&mut self, scene: DVec2) -> Result<(), ViewError> {
        let Some(point) = self.perspectives.scatter.pointer_query(scene) else {
            return Ok(());
        };

        match self.session.select_nearest(point.x, point.y) {
            Ok(_) => Ok(()),
            Err(err) if err.is_recoverable() => {
                warn!("Pointer query at ({}, {}) ignored: {}", point.x, point.y, err);
                Ok(())
            }
            Err(err) => Err(err.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limiter_latest_wins() {
        let start = Instant::now();
        let mut limiter = PointerRateLimiter::new(Duration::from_millis(10));

        assert_eq!(limiter.offer(DVec2::new(1.0, 1.0), start), Some(DVec2::new(1.0, 1.0)));
        assert_eq!(limiter.offer(DVec2::new(2.0, 2.0), start + Duration::from_millis(3)), None);
        assert_eq!(limiter.offer(DVec2::new(3.0, 3.0), start + Duration::from_millis(6)), None);
        assert_eq!(limiter.pending(), Some(DVec2::new(3.0, 3.0)));

        assert_eq!(limiter.flush(start + Duration::from_millis(8)), None);
        assert_eq!(limiter.flush(start + Duration::from_millis(10)), Some(DVec2::new(3.0, 3.0)));
        assert_eq!(limiter.flush(start + Duration::from_millis(30)), None);
    }

    #[test]
    fn test_rate_from_hz() {
        let limiter = PointerRateLimiter::with_rate(50.0).unwrap();
        assert!((limiter.interval.as_secs_f64() - 0.02).abs() < 1e-9);
    }

    #[test]
    fn test_rate_must_be_positive_and_finite() {
        for hz in [0.0, -5.0, f64::NAN, f64::INFINITY, f64::MIN_POSITIVE] {
            assert!(
                matches!(PointerRateLimiter::with_rate(hz), Err(ViewError::InvalidRate(_))),
                "rate {} accepted",
                hz
            );
        }
    }
}
