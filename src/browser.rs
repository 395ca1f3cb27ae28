use chromiumoxide::browser::{Browser as CrBrowser, BrowserConfig as CrBrowserConfig};
use chromiumoxide::handler::viewport::Viewport;
use futures::StreamExt;
use tracing::{debug, info};

use crate::config::FillerConfig;
use crate::error::{Error, Result};
use crate::page::FormPage;

/// Chrome flags that improve performance without affecting functionality.
const PERF_ARGS: &[&str] = &[
    "disable-gpu",
    "disable-extensions",
    "metrics-recording-only",
    "mute-audio",
    "no-default-browser-check",
    "disable-client-side-phishing-detection",
    "disable-popup-blocking",
    "disable-prompt-on-repost",
];

/// A launched Chromium instance driven over CDP.
pub struct FormBrowser {
    browser: CrBrowser,
    _handler_task: tokio::task::JoinHandle<()>,
}

impl FormBrowser {
    /// Launch Chromium with the viewport, executable and headless mode
    /// from `config`, and drive its CDP event stream in the background.
    pub async fn launch(config: &FillerConfig) -> Result<Self> {
        let mut builder = CrBrowserConfig::builder();

        if config.headless {
            builder = builder.new_headless_mode().no_sandbox();
        } else {
            builder = builder.with_head().no_sandbox();
        }

        // chromiumoxide adds the `--` prefix itself
        for arg in PERF_ARGS {
            builder = builder.arg(*arg);
        }

        if let Some(ref path) = config.chrome_path {
            builder = builder.chrome_executable(path);
        }

        builder = builder.viewport(Viewport {
            width: config.viewport_width,
            height: config.viewport_height,
            device_scale_factor: None,
            emulating_mobile: false,
            is_landscape: false,
            has_touch: false,
        });

        let cr_config = builder.build().map_err(Error::LaunchError)?;

        let (browser, mut handler) = CrBrowser::launch(cr_config)
            .await
            .map_err(|e| Error::LaunchError(e.to_string()))?;

        let handler_task = tokio::spawn(async move {
            while let Some(_event) = handler.next().await {}
            debug!("CDP handler stream ended");
        });

        info!(headless = config.headless, "browser launched");
        Ok(Self {
            browser,
            _handler_task: handler_task,
        })
    }

    /// Open a new tab navigated to `url` and wait for the page to load.
    pub async fn open(&self, url: &str) -> Result<FormPage> {
        let cr_page = self
            .browser
            .new_page(url)
            .await
            .map_err(|e| Error::NavigationError(e.to_string()))?;
        Ok(FormPage::new(cr_page))
    }
}
