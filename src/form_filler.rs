use chrono::Local;
use tracing::{info, warn};

use crate::browser::FormBrowser;
use crate::config::FillerConfig;
use crate::error::Result;
use crate::fallback::{self, UnitSection};
use crate::filler;
use crate::llm::ChatModel;
use crate::mapper::LlmMapper;
use crate::page::FormPage;
use crate::record::ApplicantRecord;
use crate::report::{FillReport, Outcome};
use crate::surface::FormSurface;

/// Format of the signature dates written by default.
pub const DATE_FORMAT: &str = "%m/%d/%Y";

pub fn today() -> String {
    Local::now().date_naive().format(DATE_FORMAT).to_string()
}

/// Fill an already loaded form: map, apply each mapping, then run the
/// static fallbacks. Never fails; every problem ends up in the report.
pub async fn fill_page<S, M>(
    surface: &S,
    mapper: &LlmMapper<M>,
    record: &ApplicantRecord,
    today: &str,
) -> FillReport
where
    S: FormSurface,
    M: ChatModel,
{
    let mut report = FillReport::new();

    let mappings = match surface.markup().await {
        Ok(markup) => match mapper.try_get_mapping(&markup, record).await {
            Ok(mappings) => {
                report.record("mapping", Outcome::applied(format!("{} mappings", mappings.len())));
                mappings
            }
            Err(e) => {
                report.record("mapping", Outcome::failed(e));
                Vec::new()
            }
        },
        Err(e) => {
            report.record("capture markup", Outcome::failed(e));
            Vec::new()
        }
    };

    if mappings.is_empty() {
        warn!("no LLM mappings returned, using static fallbacks only");
    }
    for mapping in &mappings {
        info!("{mapping}");
        let outcome = filler::fill_field(surface, mapping).await;
        report.record(filler::step_name(mapping), outcome);
    }

    fallback::fill_signature_dates(surface, record, today, &mut report).await;
    fallback::fill_part6(surface, record, &mut report).await;
    fallback::fill_unit_info(surface, record, UnitSection::Attorney, &mut report).await;
    fallback::fill_unit_info(surface, record, UnitSection::Client, &mut report).await;

    report
}

/// Launches the browser, loads the form and fills it.
pub struct FormFiller<M> {
    config: FillerConfig,
    mapper: LlmMapper<M>,
    record: ApplicantRecord,
}

impl<M: ChatModel> FormFiller<M> {
    pub fn new(config: FillerConfig, model: M, record: ApplicantRecord) -> Self {
        Self {
            config,
            mapper: LlmMapper::new(model),
            record,
        }
    }

    /// Load the form page and wait until the form container is present.
    async fn load(&self, browser: &FormBrowser) -> Result<FormPage> {
        info!(url = %self.config.target_url, "navigating");
        let page = browser.open(&self.config.target_url).await?;
        tokio::time::sleep(self.config.settle_delay).await;
        page.wait_for_selector(&self.config.container_selector, self.config.form_timeout)
            .await?;
        Ok(page)
    }

    /// Fill the form without submitting it. With `hold_open` the browser
    /// stays up until Ctrl-C.
    pub async fn run(&self) -> Result<FillReport> {
        let browser = FormBrowser::launch(&self.config).await?;
        let page = self.load(&browser).await?;

        let report = fill_page(&page, &self.mapper, &self.record, &today()).await;
        info!("form filled (not signed, not submitted): {}", report.summary());

        if self.config.hold_open {
            info!("leaving the form open for inspection, press Ctrl-C to exit");
            tokio::signal::ctrl_c().await?;
        }
        Ok(report)
    }
}
