//! Signal sources
//!
//! A [`SignalBundle`] holds the twelve signal classes in their fixed
//! serialization order. Per-signal read failures are resolved to
//! [`SIGNAL_UNAVAILABLE`](super::SIGNAL_UNAVAILABLE) inside the source so
//! the bundle itself is always complete.

use super::SIGNAL_UNAVAILABLE;

/// One capture of every signal class, in digest order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignalBundle {
    pub screen_resolution: String,
    pub color_depth: String,
    pub device_pixel_ratio: String,
    pub language: String,
    pub cpu_count: String,
    pub device_memory: String,
    pub platform: String,
    pub timezone: String,
    pub timezone_offset_minutes: String,
    pub max_touch_points: String,
    pub canvas_digest: String,
    pub webgl_renderer: String,
}

impl Default for SignalBundle {
    fn default() -> Self {
        let sentinel = || SIGNAL_UNAVAILABLE.to_string();
        Self {
            screen_resolution: sentinel(),
            color_depth: sentinel(),
            device_pixel_ratio: sentinel(),
            language: sentinel(),
            cpu_count: sentinel(),
            device_memory: sentinel(),
            platform: sentinel(),
            timezone: sentinel(),
            timezone_offset_minutes: sentinel(),
            max_touch_points: sentinel(),
            canvas_digest: sentinel(),
            webgl_renderer: sentinel(),
        }
    }
}

impl SignalBundle {
    /// Join all signals with the `|` delimiter, in the fixed order the
    /// digest is defined over. Changing this order changes every
    /// fingerprint in the wild.
    pub fn join(&self) -> String {
        [
            self.screen_resolution.as_str(),
            self.color_depth.as_str(),
            self.device_pixel_ratio.as_str(),
            self.language.as_str(),
            self.cpu_count.as_str(),
            self.device_memory.as_str(),
            self.platform.as_str(),
            self.timezone.as_str(),
            self.timezone_offset_minutes.as_str(),
            self.max_touch_points.as_str(),
            self.canvas_digest.as_str(),
            self.webgl_renderer.as_str(),
        ]
        .join("|")
    }
}

pub trait SignalSource: Send + Sync {
    fn collect(&self) -> anyhow::Result<SignalBundle>;
}

/// Reads what the host process can observe about its environment.
///
/// Display-bound signals (screen, canvas, WebGL) have no host-side
/// equivalent and resolve to the sentinel; the remaining signals come from
/// the platform and process environment.
pub struct HostSignalSource;

impl HostSignalSource {
    fn env_or_sentinel(key: &str) -> String {
        std::env::var(key)
            .ok()
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| SIGNAL_UNAVAILABLE.to_string())
    }
}

impl SignalSource for HostSignalSource {
    fn collect(&self) -> anyhow::Result<SignalBundle> {
        Ok(SignalBundle {
            language: Self::env_or_sentinel("LANG"),
            cpu_count: num_cpus::get().to_string(),
            platform: format!("{}-{}", std::env::consts::OS, std::env::consts::ARCH),
            timezone: Self::env_or_sentinel("TZ"),
            timezone_offset_minutes: (chrono::Local::now().offset().utc_minus_local() / 60)
                .to_string(),
            ..SignalBundle::default()
        })
    }
}
