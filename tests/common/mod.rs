// Shared fakes for the integration tests
#![allow(dead_code)]

use std::sync::Mutex;

use g28_filler::error::{Error, Result};
use g28_filler::{ChatModel, Control, ControlKind, FormSurface, GroupMember};

#[derive(Debug, Clone)]
pub struct FakeControl {
    pub selector: String,
    pub kind: ControlKind,
    pub label: String,
    pub group: Option<String>,
    pub checked: bool,
    pub value: String,
    pub options: Vec<String>,
    pub broken: bool,
}

impl FakeControl {
    fn new(selector: &str, kind: ControlKind, label: &str) -> Self {
        Self {
            selector: selector.to_string(),
            kind,
            label: label.to_string(),
            group: None,
            checked: false,
            value: String::new(),
            options: Vec::new(),
            broken: false,
        }
    }
}

#[derive(Default)]
struct FormState {
    controls: Vec<FakeControl>,
    clicks: Vec<String>,
    fills: Vec<(String, String)>,
}

/// In-memory form: labelled controls addressed by selector.
#[derive(Default)]
pub struct FakeForm {
    markup: String,
    markup_fails: bool,
    state: Mutex<FormState>,
}

impl FakeForm {
    pub fn new() -> Self {
        Self {
            markup: "<div class=\"form-container\"><form></form></div>".to_string(),
            ..Default::default()
        }
    }

    /// Every control the fixed-id fallbacks and the special-cased
    /// labels touch, all empty and unchecked.
    pub fn g28() -> Self {
        let mut form = Self::new()
            .checkbox("#am-subject", "am")
            .checkbox("#not-subject", "am not")
            .grouped("client-type", "#client-applicant", "Applicant, Petitioner, Requestor")
            .grouped("client-type", "#client-beneficiary", "Beneficiary/Derivative")
            .grouped("client-type", "#client-respondent", "Respondent (ICE, CBP)");
        for id in [
            "#client-signature-date",
            "#attorney-signature-date",
            "#student-signature-date",
            "#add-info-family-name",
            "#add-info-given-name",
            "#add-info-middle-name",
            "#add-info-text-2d",
            "#add-info-text-3d",
            "#apt-number",
            "#client-apt-number",
        ] {
            form = form.text(id, "");
        }
        for id in ["#apt", "#ste", "#flr", "#client-apt", "#client-ste", "#client-flr"] {
            form = form.checkbox(id, "");
        }
        form
    }

    fn push(self, control: FakeControl) -> Self {
        self.state.lock().unwrap().controls.push(control);
        self
    }

    pub fn text(self, selector: &str, label: &str) -> Self {
        self.push(FakeControl::new(selector, ControlKind::Text, label))
    }

    pub fn checkbox(self, selector: &str, label: &str) -> Self {
        self.push(FakeControl::new(selector, ControlKind::Toggle, label))
    }

    pub fn select(self, selector: &str, label: &str, options: &[&str]) -> Self {
        let mut control = FakeControl::new(selector, ControlKind::Select, label);
        control.options = options.iter().map(|o| o.to_string()).collect();
        self.push(control)
    }

    pub fn grouped(self, group: &str, selector: &str, label: &str) -> Self {
        let mut control = FakeControl::new(selector, ControlKind::Toggle, label);
        control.group = Some(group.to_string());
        self.push(control)
    }

    pub fn with_markup(mut self, markup: &str) -> Self {
        self.markup = markup.to_string();
        self
    }

    pub fn failing_markup(mut self) -> Self {
        self.markup_fails = true;
        self
    }

    pub fn set_checked(self, selector: &str, checked: bool) -> Self {
        self.update(selector, |c| c.checked = checked);
        self
    }

    pub fn set_value(self, selector: &str, value: &str) -> Self {
        self.update(selector, |c| c.value = value.to_string());
        self
    }

    /// Every interaction with `selector` errors.
    pub fn broken(self, selector: &str) -> Self {
        self.update(selector, |c| c.broken = true);
        self
    }

    fn update(&self, selector: &str, f: impl FnOnce(&mut FakeControl)) {
        let mut state = self.state.lock().unwrap();
        let control = state
            .controls
            .iter_mut()
            .find(|c| c.selector == selector)
            .unwrap_or_else(|| panic!("no fake control {selector}"));
        f(control);
    }

    fn control(&self, selector: &str) -> FakeControl {
        self.state
            .lock()
            .unwrap()
            .controls
            .iter()
            .find(|c| c.selector == selector)
            .cloned()
            .unwrap_or_else(|| panic!("no fake control {selector}"))
    }

    pub fn is_on(&self, selector: &str) -> bool {
        self.control(selector).checked
    }

    pub fn value(&self, selector: &str) -> String {
        self.control(selector).value
    }

    pub fn clicks(&self) -> Vec<String> {
        self.state.lock().unwrap().clicks.clone()
    }

    pub fn fills(&self) -> Vec<(String, String)> {
        self.state.lock().unwrap().fills.clone()
    }

    pub fn filled(&self, selector: &str) -> bool {
        self.fills().iter().any(|(s, _)| s == selector)
    }

    fn with_usable<T>(
        &self,
        selector: &str,
        f: impl FnOnce(&mut FakeControl) -> Result<T>,
    ) -> Result<T> {
        let mut state = self.state.lock().unwrap();
        let control = state
            .controls
            .iter_mut()
            .find(|c| c.selector == selector)
            .ok_or_else(|| Error::ElementNotFound(selector.to_string()))?;
        if control.broken {
            return Err(Error::JsError(format!("{selector} is detached")));
        }
        f(control)
    }
}

impl FormSurface for FakeForm {
    async fn markup(&self) -> Result<String> {
        if self.markup_fails {
            return Err(Error::JsError("page crashed".into()));
        }
        Ok(self.markup.clone())
    }

    async fn locate_by_label(&self, label: &str) -> Result<Control> {
        let wanted = label.trim().to_lowercase();
        let state = self.state.lock().unwrap();
        state
            .controls
            .iter()
            .find(|c| !c.label.is_empty() && c.label.to_lowercase().contains(&wanted))
            .map(|c| Control {
                selector: c.selector.clone(),
                kind: c.kind,
            })
            .ok_or_else(|| Error::LabelNotFound(label.to_string()))
    }

    async fn group_members(&self, name: &str) -> Result<Vec<GroupMember>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .controls
            .iter()
            .filter(|c| c.group.as_deref() == Some(name))
            .map(|c| GroupMember {
                selector: c.selector.clone(),
                label: c.label.clone(),
            })
            .collect())
    }

    async fn is_checked(&self, selector: &str) -> Result<bool> {
        self.with_usable(selector, |c| Ok(c.checked))
    }

    async fn click(&self, selector: &str) -> Result<()> {
        self.with_usable(selector, |c| {
            if c.kind == ControlKind::Toggle {
                c.checked = !c.checked;
            }
            Ok(())
        })?;
        self.state.lock().unwrap().clicks.push(selector.to_string());
        Ok(())
    }

    async fn fill(&self, selector: &str, value: &str) -> Result<()> {
        self.with_usable(selector, |c| {
            c.value = value.to_string();
            Ok(())
        })?;
        self.state
            .lock()
            .unwrap()
            .fills
            .push((selector.to_string(), value.to_string()));
        Ok(())
    }

    async fn select_option(&self, selector: &str, value: &str) -> Result<()> {
        self.with_usable(selector, |c| {
            if !c.options.iter().any(|o| o == value) {
                return Err(Error::JsError(format!("No option with value {value}")));
            }
            c.value = value.to_string();
            Ok(())
        })
    }
}

/// Chat model with a fixed reply, or a simulated outage when `reply` is `None`.
pub struct CannedModel {
    reply: Option<String>,
    prompts: Mutex<Vec<(String, String)>>,
}

impl CannedModel {
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: Some(reply.to_string()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn unavailable() -> Self {
        Self {
            reply: None,
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// (system, user) pairs received so far.
    pub fn prompts(&self) -> Vec<(String, String)> {
        self.prompts.lock().unwrap().clone()
    }
}

impl ChatModel for CannedModel {
    async fn complete(&self, system: &str, user: &str) -> Result<String> {
        self.prompts
            .lock()
            .unwrap()
            .push((system.to_string(), user.to_string()));
        self.reply
            .clone()
            .ok_or_else(|| Error::ModelError("503 Service Unavailable".into()))
    }
}
