use std::time::Duration;

use anyhow::{bail, Context, Result};

/// Rotation added per frame for each unit of speed.
pub const SPEED_SCALE: f32 = 0.000_01;

/// How the per-frame rotation delta is derived.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DeltaMode {
    /// Every frame advances by `speed * SPEED_SCALE`, whatever the wall time.
    Fixed,
    /// The fixed step is scaled by how long the frame actually took relative
    /// to the target frame interval.
    Elapsed,
}

/// Preview settings for the terminal driver.
#[derive(Debug, Clone, PartialEq)]
pub struct PreviewConfig {
    pub width: u32,
    pub height: u32,
    pub speed: f32,
    pub delta_mode: DeltaMode,
    pub target_fps: u32,
    /// Seed for the cell label generator.
    pub seed: u32,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            width: 50,
            height: 50,
            speed: 5000.0,
            delta_mode: DeltaMode::Fixed,
            target_fps: 30,
            seed: 0x5eed,
        }
    }
}

impl PreviewConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }

    pub fn delta_mode(mut self, mode: DeltaMode) -> Self {
        self.delta_mode = mode;
        self
    }

    pub fn target_fps(mut self, fps: u32) -> Self {
        self.target_fps = fps;
        self
    }

    /// Defaults overridden by `CUBEVIEW_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Applies overrides from `lookup`, keyed by environment variable name.
    ///
    /// Recognized keys: `CUBEVIEW_WIDTH`, `CUBEVIEW_HEIGHT`, `CUBEVIEW_SPEED`,
    /// `CUBEVIEW_FPS`, `CUBEVIEW_SEED`, `CUBEVIEW_DELTA` (`fixed` | `elapsed`).
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(v) = lookup("CUBEVIEW_WIDTH") {
            self.width = parse("CUBEVIEW_WIDTH", &v)?;
        }
        if let Some(v) = lookup("CUBEVIEW_HEIGHT") {
            self.height = parse("CUBEVIEW_HEIGHT", &v)?;
        }
        if let Some(v) = lookup("CUBEVIEW_SPEED") {
            self.speed = parse("CUBEVIEW_SPEED", &v)?;
        }
        if let Some(v) = lookup("CUBEVIEW_FPS") {
            self.target_fps = parse("CUBEVIEW_FPS", &v)?;
        }
        if let Some(v) = lookup("CUBEVIEW_SEED") {
            self.seed = parse("CUBEVIEW_SEED", &v)?;
        }
        if let Some(v) = lookup("CUBEVIEW_DELTA") {
            self.delta_mode = match v.trim().to_ascii_lowercase().as_str() {
                "fixed" => DeltaMode::Fixed,
                "elapsed" => DeltaMode::Elapsed,
                other => bail!("CUBEVIEW_DELTA: expected `fixed` or `elapsed`, got `{other}`"),
            };
        }
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            bail!("preview size must be non-zero, got {}x{}", self.width, self.height);
        }
        if self.target_fps == 0 {
            bail!("target fps must be non-zero");
        }
        if !self.speed.is_finite() || self.speed < 0.0 {
            bail!("speed must be a non-negative number, got {}", self.speed);
        }
        Ok(())
    }

    /// Wall time between frames.
    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / f64::from(self.target_fps.max(1)))
    }

    /// Rotation delta for a frame that took `dt` seconds.
    pub fn delta_for(&self, dt: f32) -> f32 {
        let step = self.speed * SPEED_SCALE;
        match self.delta_mode {
            DeltaMode::Fixed => step,
            DeltaMode::Elapsed => step * dt * self.target_fps as f32,
        }
    }
}

fn parse<T>(key: &str, value: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    value
        .trim()
        .parse::<T>()
        .with_context(|| format!("{key}: invalid value `{value}`"))
}
