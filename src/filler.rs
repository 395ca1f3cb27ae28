use crate::error::Result;
use crate::mapper::FieldMapping;
use crate::report::Outcome;
use crate::surface::{set_checked, ControlKind, FormSurface};

pub const RESTRICTION_LABEL: &str = "1.c. I (select only one box)";
pub const RESTRICTION_AM: &str = "#am-subject";
pub const RESTRICTION_AM_NOT: &str = "#not-subject";

pub const APPEARANCE_LABEL: &str = "I enter my appearance as an attorney";
pub const APPEARANCE_GROUP: &str = "client-type";

/// Filled only by [`crate::fallback::fill_part6`].
pub const STATIC_ONLY_LABEL: &str = "2.d. Additional Information";

const TRUTHY: &[&str] = &["yes", "true", "1", "on"];

#[derive(Debug, Clone, Copy)]
enum LabelPattern {
    Contains(&'static str),
    Equals(&'static str),
}

impl LabelPattern {
    fn matches(self, label: &str) -> bool {
        match self {
            LabelPattern::Contains(marker) => label.contains(marker),
            LabelPattern::Equals(marker) => label.trim() == marker,
        }
    }
}

/// How a mapped field is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldRule {
    /// The "am" / "am not" checkbox pair.
    RestrictionPair,
    /// The single-select appearance checkbox group.
    AppearanceGroup,
    StaticOnly,
    Generic,
}

/// Evaluated in order; the first match wins.
const LABEL_RULES: &[(LabelPattern, FieldRule)] = &[
    (LabelPattern::Contains(RESTRICTION_LABEL), FieldRule::RestrictionPair),
    (LabelPattern::Contains(APPEARANCE_LABEL), FieldRule::AppearanceGroup),
    (LabelPattern::Equals(STATIC_ONLY_LABEL), FieldRule::StaticOnly),
];

pub fn classify(label: &str) -> FieldRule {
    LABEL_RULES
        .iter()
        .find(|(pattern, _)| pattern.matches(label))
        .map(|(_, rule)| *rule)
        .unwrap_or(FieldRule::Generic)
}

pub fn is_truthy(value: &str) -> bool {
    let value = value.trim().to_lowercase();
    TRUTHY.contains(&value.as_str())
}

/// Apply one mapping to the surface. Errors are folded into the outcome.
pub async fn fill_field<S: FormSurface>(surface: &S, mapping: &FieldMapping) -> Outcome {
    let result = match classify(&mapping.label) {
        FieldRule::RestrictionPair => fill_restriction_pair(surface, &mapping.value).await,
        FieldRule::AppearanceGroup => fill_appearance_group(surface, &mapping.value).await,
        FieldRule::StaticOnly => Ok(Outcome::skipped("handled by the static fallback")),
        FieldRule::Generic => fill_generic(surface, &mapping.label, &mapping.value).await,
    };
    result.unwrap_or_else(Outcome::failed)
}

async fn fill_restriction_pair<S: FormSurface>(surface: &S, value: &str) -> Result<Outcome> {
    let (checked, unchecked) = match value.trim().to_lowercase().as_str() {
        "am" => (RESTRICTION_AM, RESTRICTION_AM_NOT),
        "am not" => (RESTRICTION_AM_NOT, RESTRICTION_AM),
        _ => {
            return Ok(Outcome::skipped(format!(
                "unexpected value {value:?}, expected \"am\" or \"am not\""
            )))
        }
    };
    set_checked(surface, checked, true).await?;
    set_checked(surface, unchecked, false).await?;
    Ok(Outcome::applied(format!("set to {:?}", value.trim())))
}

async fn fill_appearance_group<S: FormSurface>(surface: &S, value: &str) -> Result<Outcome> {
    let wanted = value.trim().to_lowercase();
    let members = surface.group_members(APPEARANCE_GROUP).await?;

    let mut matched: Option<String> = None;
    for member in &members {
        let is_target = matched.is_none()
            && !wanted.is_empty()
            && member.label.trim().to_lowercase().contains(&wanted);
        set_checked(surface, &member.selector, is_target).await?;
        if is_target {
            matched = Some(member.label.trim().to_string());
        }
    }

    Ok(match matched {
        Some(label) => Outcome::applied(format!("checked {label:?}")),
        None => Outcome::skipped(format!("no appearance option matches {value:?}")),
    })
}

async fn fill_generic<S: FormSurface>(surface: &S, label: &str, value: &str) -> Result<Outcome> {
    let control = surface.locate_by_label(label).await?;
    match control.kind {
        ControlKind::Toggle => {
            // empty value means unchecked
            let desired = is_truthy(value);
            set_checked(surface, &control.selector, desired).await?;
            Ok(Outcome::applied(format!(
                "{} checkbox",
                if desired { "checked" } else { "unchecked" }
            )))
        }
        ControlKind::Select => {
            surface.select_option(&control.selector, value).await?;
            Ok(Outcome::applied(format!("selected {value:?}")))
        }
        ControlKind::Text => {
            surface.fill(&control.selector, value).await?;
            Ok(Outcome::applied(format!("filled with {value:?}")))
        }
    }
}

/// Step name used in the report for a dynamic fill.
pub fn step_name(mapping: &FieldMapping) -> String {
    format!("dynamic: {}", mapping.label)
}
