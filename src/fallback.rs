//! Fills fields by fixed element id, independent of the LLM mapping.

use crate::error::Result;
use crate::record::{joined_additional_info, ApplicantRecord};
use crate::report::{FillReport, Outcome};
use crate::surface::{set_checked, FormSurface};

pub const CLIENT_SIGNATURE_DATE: &str = "#client-signature-date";
pub const ATTORNEY_SIGNATURE_DATE: &str = "#attorney-signature-date";
pub const STUDENT_SIGNATURE_DATE: &str = "#student-signature-date";

pub const ADD_INFO_FAMILY_NAME: &str = "#add-info-family-name";
pub const ADD_INFO_GIVEN_NAME: &str = "#add-info-given-name";
pub const ADD_INFO_MIDDLE_NAME: &str = "#add-info-middle-name";
pub const ADD_INFO_TEXT_2D: &str = "#add-info-text-2d";
pub const ADD_INFO_TEXT_3D: &str = "#add-info-text-3d";

/// Section whose unit-type triad is filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitSection {
    Attorney,
    Client,
}

impl UnitSection {
    pub fn name(self) -> &'static str {
        match self {
            UnitSection::Attorney => "attorney",
            UnitSection::Client => "client",
        }
    }

    /// (`apt`/`ste`/`flr` key, selector) pairs.
    pub fn unit_selectors(self) -> [(&'static str, &'static str); 3] {
        match self {
            UnitSection::Attorney => [("apt", "#apt"), ("ste", "#ste"), ("flr", "#flr")],
            UnitSection::Client => [
                ("apt", "#client-apt"),
                ("ste", "#client-ste"),
                ("flr", "#client-flr"),
            ],
        }
    }

    pub fn number_selector(self) -> &'static str {
        match self {
            UnitSection::Attorney => "#apt-number",
            UnitSection::Client => "#client-apt-number",
        }
    }
}

fn or_today(value: &str, today: &str) -> String {
    if value.is_empty() {
        today.to_string()
    } else {
        value.to_string()
    }
}

/// Optionally signed run of ASCII digits, of any length.
pub fn is_integer(number: &str) -> bool {
    let digits = number.strip_prefix(['+', '-']).unwrap_or(number);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

async fn fill_step<S: FormSurface>(
    surface: &S,
    report: &mut FillReport,
    step: &str,
    selector: &str,
    value: &str,
) {
    let outcome = match surface.fill(selector, value).await {
        Ok(()) => Outcome::applied(format!("filled with {value:?}")),
        Err(e) => Outcome::failed(e),
    };
    report.record(step, outcome);
}

/// Client, attorney and student signature dates; an empty date becomes `today`.
/// Whitespace is not empty and is written as given.
pub async fn fill_signature_dates<S: FormSurface>(
    surface: &S,
    record: &ApplicantRecord,
    today: &str,
    report: &mut FillReport,
) {
    let dates = [
        ("static: client signature date", CLIENT_SIGNATURE_DATE, &record.client.signature_date),
        ("static: attorney signature date", ATTORNEY_SIGNATURE_DATE, &record.attorney_signature_date),
        ("static: student signature date", STUDENT_SIGNATURE_DATE, &record.additional_signature_date),
    ];
    for (step, selector, value) in dates {
        fill_step(surface, report, step, selector, &or_today(value, today)).await;
    }
}

/// Part 6 name fields, then the two additional-information blocks.
/// A block whose joined text is blank is not written.
pub async fn fill_part6<S: FormSurface>(
    surface: &S,
    record: &ApplicantRecord,
    report: &mut FillReport,
) {
    let info = &record.part6.additional_info;
    let names = [
        ("static: part 6 family name", ADD_INFO_FAMILY_NAME, &info.family_name),
        ("static: part 6 given name", ADD_INFO_GIVEN_NAME, &info.given_name),
        ("static: part 6 middle name", ADD_INFO_MIDDLE_NAME, &info.middle_name),
    ];
    for (step, selector, value) in names {
        fill_step(surface, report, step, selector, value).await;
    }

    let blocks = [
        ("static: part 6 section 2", ADD_INFO_TEXT_2D, &info.entries_section_2),
        ("static: part 6 section 3", ADD_INFO_TEXT_3D, &info.entries_section_3),
    ];
    for (step, selector, entries) in blocks {
        let text = joined_additional_info(entries);
        if text.trim().is_empty() {
            continue;
        }
        fill_step(surface, report, step, selector, &text).await;
    }
}

async fn apply_unit_type<S: FormSurface>(
    surface: &S,
    section: UnitSection,
    unit: &str,
) -> Result<Outcome> {
    let mut checked = None;
    for (key, selector) in section.unit_selectors() {
        let desired = key == unit;
        set_checked(surface, selector, desired).await?;
        if desired {
            checked = Some(key);
        }
    }
    Ok(match checked {
        Some(key) => Outcome::applied(format!("checked {}", key.to_uppercase())),
        None if unit.is_empty() => Outcome::applied("no unit type, all options unchecked"),
        None => Outcome::skipped(format!("unknown unit type {unit:?}, all options unchecked")),
    })
}

/// Unit-type triad and unit number for `section`.
///
/// For the client section an empty unit type is first taken from the
/// attorney section (see [`ApplicantRecord::with_client_unit_backfill`]).
/// The unit number is only written when it parses as an integer.
pub async fn fill_unit_info<S: FormSurface>(
    surface: &S,
    record: &ApplicantRecord,
    section: UnitSection,
    report: &mut FillReport,
) {
    let backfilled;
    let (unit_type, number) = match section {
        UnitSection::Attorney => (&record.attorney.unit_type, &record.attorney.address_line_2),
        UnitSection::Client => {
            backfilled = record.with_client_unit_backfill();
            (&backfilled.client.unit_type, &backfilled.client.address_line_2)
        }
    };

    let unit = unit_type.trim().to_lowercase();
    let outcome = apply_unit_type(surface, section, &unit)
        .await
        .unwrap_or_else(Outcome::failed);
    report.record(format!("static: {} unit type", section.name()), outcome);

    let number = number.trim();
    if number.is_empty() {
        return;
    }
    let step = format!("static: {} unit number", section.name());
    if !is_integer(number) {
        report.record(
            step,
            Outcome::skipped(format!("unit number {number:?} is not a valid integer")),
        );
        return;
    }
    fill_step(surface, report, &step, section.number_selector(), number).await;
}
