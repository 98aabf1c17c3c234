use instant::{Duration, Instant};

use crate::config::{Config, FRAME_RATE_RANGE, FrameConfig};

/// Frame bookkeeping shared with every flow hook.
#[derive(Debug)]
pub struct Context {
    pub config: Config,
    frame: u64,
    started: Instant,
    last_frame: Option<Instant>,
}

impl Context {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            frame: 0,
            started: Instant::now(),
            last_frame: None,
        }
    }

    /// Number of frames completed so far.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Time between two frames. Rates outside [`FRAME_RATE_RANGE`] are clamped
    /// so a config that skipped validation still yields a schedulable interval.
    pub fn frame_interval(&self) -> Duration {
        let rate = self.config.frame.frame_rate;
        let rate = if rate.is_nan() {
            FrameConfig::default().frame_rate
        } else {
            rate.clamp(*FRAME_RATE_RANGE.start(), *FRAME_RATE_RANGE.end())
        };
        Duration::from_secs_f64(1.0 / rate)
    }

    /// Start a new frame and return the time since the previous one.
    ///
    /// The first frame reports one nominal frame interval.
    pub(crate) fn begin_frame(&mut self) -> Duration {
        let now = Instant::now();
        let dt = match self.last_frame {
            Some(last) => now.saturating_duration_since(last),
            None => self.frame_interval(),
        };
        self.last_frame = Some(now);
        dt
    }

    pub(crate) fn end_frame(&mut self) {
        self.frame += 1;
    }

    pub fn frame_limit_reached(&self) -> bool {
        self.config
            .frame
            .max_frames
            .is_some_and(|max| self.frame >= max)
    }
}
