use serde::Deserialize;

use crate::error::Result;

/// How a resolved control is driven.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ControlKind {
    /// Checkbox or radio input.
    Toggle,
    Select,
    /// Text input, textarea and anything else that takes a value.
    Text,
}

/// A form control located on the surface, addressable by `selector`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Control {
    pub selector: String,
    pub kind: ControlKind,
}

/// One control of a named group together with its label text.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GroupMember {
    pub selector: String,
    pub label: String,
}

/// The interactions the fillers need from a rendered form.
#[allow(async_fn_in_trait)]
pub trait FormSurface {
    /// Full rendered markup of the page.
    async fn markup(&self) -> Result<String>;

    /// Resolve the control for the first `<label>` whose text contains
    /// `label` (case-insensitive): its `for` target, else the first
    /// following sibling input, textarea or select.
    async fn locate_by_label(&self, label: &str) -> Result<Control>;

    /// All inputs named `name`, in document order.
    async fn group_members(&self, name: &str) -> Result<Vec<GroupMember>>;

    async fn is_checked(&self, selector: &str) -> Result<bool>;

    /// A real user click, so attached handlers fire.
    async fn click(&self, selector: &str) -> Result<()>;

    /// Replace the control's content with `value`.
    async fn fill(&self, selector: &str, value: &str) -> Result<()>;

    /// Select the option whose value equals `value`.
    async fn select_option(&self, selector: &str, value: &str) -> Result<()>;
}

/// Click `selector` only if its checked state differs from `desired`.
/// Returns whether a click happened.
pub async fn set_checked<S: FormSurface>(surface: &S, selector: &str, desired: bool) -> Result<bool> {
    if surface.is_checked(selector).await? == desired {
        return Ok(false);
    }
    surface.click(selector).await?;
    Ok(true)
}
