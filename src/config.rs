use std::time::Duration;

/// The representation form this crate fills.
pub const DEFAULT_TARGET_URL: &str = "https://mendrika-alma.github.io/form-submission/";

pub struct FillerConfig {
    pub target_url: String,
    /// Headed by default so the filled form can be inspected.
    pub headless: bool,
    pub viewport_width: u32,
    pub viewport_height: u32,
    pub chrome_path: Option<String>,
    /// Pause after the initial load before looking for the form.
    pub settle_delay: Duration,
    /// Upper bound on waiting for `container_selector` (default: 60s).
    pub form_timeout: Duration,
    pub container_selector: String,
    /// Keep the browser open after filling until Ctrl-C.
    pub hold_open: bool,
}

impl Default for FillerConfig {
    fn default() -> Self {
        Self {
            target_url: DEFAULT_TARGET_URL.to_string(),
            headless: false,
            viewport_width: 1920,
            viewport_height: 1080,
            chrome_path: None,
            settle_delay: Duration::from_secs(2),
            form_timeout: Duration::from_secs(60),
            container_selector: ".form-container".to_string(),
            hold_open: true,
        }
    }
}

pub struct FillerBuilder {
    config: FillerConfig,
}

impl FillerBuilder {
    pub fn new() -> Self {
        Self {
            config: FillerConfig::default(),
        }
    }

    pub fn target_url(mut self, url: impl Into<String>) -> Self {
        self.config.target_url = url.into();
        self
    }

    pub fn headless(mut self, headless: bool) -> Self {
        self.config.headless = headless;
        self
    }

    pub fn viewport(mut self, width: u32, height: u32) -> Self {
        self.config.viewport_width = width;
        self.config.viewport_height = height;
        self
    }

    pub fn chrome_path(mut self, path: impl Into<String>) -> Self {
        self.config.chrome_path = Some(path.into());
        self
    }

    pub fn settle_delay(mut self, delay: Duration) -> Self {
        self.config.settle_delay = delay;
        self
    }

    /// Set how long to wait for the form container to appear.
    pub fn form_timeout(mut self, timeout: Duration) -> Self {
        self.config.form_timeout = timeout;
        self
    }

    pub fn container_selector(mut self, selector: impl Into<String>) -> Self {
        self.config.container_selector = selector.into();
        self
    }

    pub fn hold_open(mut self, hold: bool) -> Self {
        self.config.hold_open = hold;
        self
    }

    pub fn build(self) -> FillerConfig {
        self.config
    }
}

impl Default for FillerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_target_the_fixed_form() {
        let config = FillerConfig::default();
        assert_eq!(config.target_url, DEFAULT_TARGET_URL);
        assert!(!config.headless);
        assert!(config.hold_open);
        assert_eq!(config.form_timeout, Duration::from_secs(60));
        assert_eq!(config.container_selector, ".form-container");
    }

    #[test]
    fn builder_overrides() {
        let config = FillerBuilder::new()
            .target_url("http://localhost:8000/")
            .headless(true)
            .chrome_path("/usr/bin/chromium")
            .settle_delay(Duration::ZERO)
            .hold_open(false)
            .build();
        assert_eq!(config.target_url, "http://localhost:8000/");
        assert!(config.headless);
        assert_eq!(config.chrome_path.as_deref(), Some("/usr/bin/chromium"));
        assert_eq!(config.settle_delay, Duration::ZERO);
        assert!(!config.hold_open);
    }
}
