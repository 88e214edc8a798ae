//! Session clock and render throttling.
//!
//! The live preview is redrawn in response to input, and pointer moves can
//! arrive far faster than the display refreshes. Render requests are
//! therefore coalesced: any number of requests between two refreshes
//! produce a single render.

use std::time::Instant;

/// Monotonic clock anchored to the moment an editor session started.
#[derive(Debug, Clone)]
pub struct SessionClock {
    epoch: Instant,
}

impl SessionClock {
    /// Create a new clock anchored to now.
    pub fn start() -> Self {
        Self {
            epoch: Instant::now(),
        }
    }

    /// Nanoseconds elapsed since the session started.
    pub fn elapsed_ns(&self) -> u64 {
        self.epoch.elapsed().as_nanos() as u64
    }
}

impl Default for SessionClock {
    fn default() -> Self {
        Self::start()
    }
}

/// Coalesces render requests to at most one render per refresh interval.
#[derive(Debug)]
pub struct RenderThrottle {
    interval_ns: u64,
    last_render_ns: Option<u64>,
    pending: bool,
    coalesced: u64,
}

impl RenderThrottle {
    /// Create a throttle for a display refreshing at `refresh_hz`.
    pub fn new(refresh_hz: u32) -> Self {
        Self {
            interval_ns: 1_000_000_000 / refresh_hz.max(1) as u64,
            last_render_ns: None,
            pending: false,
            coalesced: 0,
        }
    }

    /// Ask for a render. Requests made while one is pending are merged.
    pub fn request(&mut self) {
        if self.pending {
            self.coalesced += 1;
        }
        self.pending = true;
    }

    /// Whether a render has been requested and not yet granted.
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Grant the pending render if the refresh interval has elapsed.
    ///
    /// Returns true at most once per interval, and only when a request is
    /// pending. The first request is always granted immediately.
    pub fn poll(&mut self, now_ns: u64) -> bool {
        if !self.pending {
            return false;
        }
        let ready = match self.last_render_ns {
            None => true,
            Some(last) => now_ns >= last.saturating_add(self.interval_ns),
        };
        if ready {
            self.pending = false;
            self.last_render_ns = Some(now_ns);
        }
        ready
    }

    /// Drop any pending request without rendering.
    pub fn cancel(&mut self) {
        self.pending = false;
    }

    /// Number of requests merged into an already pending render.
    pub fn coalesced(&self) -> u64 {
        self.coalesced
    }

    /// Refresh interval in nanoseconds.
    pub fn interval_ns(&self) -> u64 {
        self.interval_ns
    }
}
