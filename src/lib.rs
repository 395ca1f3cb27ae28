pub mod browser;
pub mod config;
pub mod error;
pub mod fallback;
pub mod filler;
pub mod form_filler;
pub mod llm;
pub mod mapper;
pub mod page;
pub mod record;
pub mod report;
pub mod surface;
pub mod telemetry;

pub use browser::FormBrowser;
pub use config::{FillerBuilder, FillerConfig};
pub use error::{Error, Result};
pub use form_filler::{fill_page, FormFiller};
pub use llm::{ChatModel, LlmConfig, OpenAiChat};
pub use mapper::{FieldMapping, LlmMapper, Section};
pub use page::FormPage;
pub use record::ApplicantRecord;
pub use report::{Diagnostic, FillReport, Outcome};
pub use surface::{Control, ControlKind, FormSurface, GroupMember};
