use std::time::{Duration, Instant};

use chromiumoxide::page::Page as CrPage;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::surface::{Control, FormSurface, GroupMember};

/// Marks resolved controls so later calls can address them by selector.
/// Expects `el` in scope and leaves `selector` defined.
const TAG_CONTROL_JS: &str = r#"
    window.__fillerRef = window.__fillerRef || 0;
    if (!el.dataset.fillerRef) el.dataset.fillerRef = String(++window.__fillerRef);
    const selector = '[data-filler-ref="' + el.dataset.fillerRef + '"]';
"#;

#[derive(Deserialize)]
#[serde(tag = "status", rename_all = "kebab-case")]
enum LabelLookup {
    Ok { control: Control },
    NoLabel,
    NoControl,
}

/// A chromiumoxide tab holding the form.
pub struct FormPage {
    inner: CrPage,
}

impl FormPage {
    pub(crate) fn new(inner: CrPage) -> Self {
        Self { inner }
    }

    /// Returns a reference to the underlying chromiumoxide Page.
    pub fn inner(&self) -> &CrPage {
        &self.inner
    }

    // ── Waiting ─────────────────────────────────────────────────────

    /// Wait for an element matching `selector` to appear in the DOM.
    /// Polls every 100ms up to `timeout`.
    pub async fn wait_for_selector(&self, selector: &str, timeout: Duration) -> Result<()> {
        let interval = Duration::from_millis(100);
        let start = Instant::now();

        loop {
            match self.inner.find_element(selector).await {
                Ok(_) => return Ok(()),
                Err(_) if start.elapsed() < timeout => {
                    tokio::time::sleep(interval).await;
                }
                Err(_) => {
                    return Err(Error::Timeout(format!(
                        "Timed out waiting for selector: {}",
                        selector
                    )));
                }
            }
        }
    }

    // ── Evaluation helpers ──────────────────────────────────────────

    /// Evaluate `js`, which must return a `JSON.stringify`-ed value.
    async fn eval_json<T: DeserializeOwned>(&self, js: String) -> Result<T> {
        let result = self
            .inner
            .evaluate(js)
            .await
            .map_err(|e| Error::JsError(e.to_string()))?;
        let json_str: String = result
            .into_value()
            .map_err(|e| Error::JsError(e.to_string()))?;
        Ok(serde_json::from_str(&json_str)?)
    }

    /// Run `body` with `el` bound to the element matching `selector`.
    async fn eval_on<T: DeserializeOwned>(&self, selector: &str, body: &str) -> Result<T> {
        let selector_js = serde_json::to_string(selector)?;
        let js = format!(
            r#"
            (() => {{
                const el = document.querySelector({selector_js});
                if (!el) throw new Error('Element not found: ' + {selector_js});
                {body}
            }})()
            "#,
        );
        self.eval_json(js).await
    }
}

impl FormSurface for FormPage {
    // ── Observations ────────────────────────────────────────────────

    /// Get the full rendered HTML of the page.
    async fn markup(&self) -> Result<String> {
        self.inner
            .content()
            .await
            .map_err(|e| Error::JsError(e.to_string()))
    }

    // ── Label resolution ────────────────────────────────────────────

    /// Find the first `<label>` whose whitespace-normalized text contains
    /// `label` and resolve its control: the `for` target if the attribute
    /// is set, otherwise the first following sibling input, textarea or
    /// select. The control is tagged with `data-filler-ref`.
    async fn locate_by_label(&self, label: &str) -> Result<Control> {
        let label_js = serde_json::to_string(label)?;
        let js = format!(
            r#"
            (() => {{
                const norm = s => (s || '').replace(/\s+/g, ' ').trim().toLowerCase();
                const wanted = norm({label_js});
                const label = Array.from(document.querySelectorAll('label'))
                    .find(l => norm(l.textContent).includes(wanted));
                if (!label) return JSON.stringify({{ status: 'no-label' }});
                let el = null;
                const forId = label.getAttribute('for');
                if (forId) {{
                    el = document.getElementById(forId);
                }} else {{
                    for (let s = label.nextElementSibling; s; s = s.nextElementSibling) {{
                        if (['INPUT', 'TEXTAREA', 'SELECT'].includes(s.tagName)) {{ el = s; break; }}
                    }}
                }}
                if (!el) return JSON.stringify({{ status: 'no-control' }});
                {TAG_CONTROL_JS}
                const tag = el.tagName.toLowerCase();
                const type = (el.type || '').toLowerCase();
                const kind = tag === 'select' ? 'select'
                    : (tag === 'input' && (type === 'checkbox' || type === 'radio')) ? 'toggle'
                    : 'text';
                return JSON.stringify({{ status: 'ok', control: {{ selector, kind }} }});
            }})()
            "#,
        );
        match self.eval_json(js).await? {
            LabelLookup::Ok { control } => Ok(control),
            LabelLookup::NoLabel => Err(Error::LabelNotFound(label.to_string())),
            LabelLookup::NoControl => Err(Error::ElementNotFound(format!(
                "no control associated with label {label:?}"
            ))),
        }
    }

    /// Get every input named `name` with the text of its `label[for]`.
    async fn group_members(&self, name: &str) -> Result<Vec<GroupMember>> {
        let name_js = serde_json::to_string(name)?;
        let js = format!(
            r#"
            JSON.stringify(
                Array.from(document.getElementsByName({name_js}))
                    .filter(el => el.tagName === 'INPUT')
                    .map(el => {{
                        {TAG_CONTROL_JS}
                        const labelEl = el.id
                            ? document.querySelector('label[for="' + CSS.escape(el.id) + '"]')
                            : null;
                        return {{ selector, label: labelEl ? (labelEl.innerText || '').trim() : '' }};
                    }})
            )
            "#,
        );
        self.eval_json(js).await
    }

    // ── Actions ─────────────────────────────────────────────────────

    /// Read the `checked` property of the element matching `selector`.
    async fn is_checked(&self, selector: &str) -> Result<bool> {
        self.eval_on(selector, "return JSON.stringify(!!el.checked);")
            .await
    }

    /// Click the element matching `selector` (scrolls into view first).
    async fn click(&self, selector: &str) -> Result<()> {
        let el = self
            .inner
            .find_element(selector)
            .await
            .map_err(|e| Error::ElementNotFound(format!("{selector}: {e}")))?;
        el.click().await?;
        Ok(())
    }

    /// Overwrite the value of the element matching `selector` and fire
    /// `input` and `change`.
    async fn fill(&self, selector: &str, value: &str) -> Result<()> {
        let value_js = serde_json::to_string(value)?;
        let body = format!(
            r#"
            el.focus();
            el.value = {value_js};
            el.dispatchEvent(new Event('input', {{ bubbles: true }}));
            el.dispatchEvent(new Event('change', {{ bubbles: true }}));
            return JSON.stringify(null);
            "#,
        );
        self.eval_on::<()>(selector, &body).await
    }

    /// Select an option in a `<select>` element by its value attribute.
    /// Errors if no option carries that value.
    async fn select_option(&self, selector: &str, value: &str) -> Result<()> {
        let value_js = serde_json::to_string(value)?;
        let body = format!(
            r#"
            if (!Array.from(el.options || []).some(o => o.value === {value_js}))
                throw new Error('No option with value ' + {value_js});
            el.value = {value_js};
            el.dispatchEvent(new Event('change', {{ bubbles: true }}));
            return JSON.stringify(null);
            "#,
        );
        self.eval_on::<()>(selector, &body).await
    }
}
