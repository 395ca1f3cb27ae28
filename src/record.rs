use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// All values for one fill run of the representation form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplicantRecord {
    pub attorney: AttorneyInfo,
    pub client: ClientInfo,
    pub attorney_signature_date: String,
    pub additional_signature_date: String,
    pub part6: Part6,
}

/// Part 1-3 of the form: the attorney or accredited representative.
///
/// `attorney_eligible`, `subject_to_restrictions` and
/// `associated_with_student` carry checkbox intent as `"yes"`/`"no"`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttorneyInfo {
    pub online_account_number: String,
    pub family_name: String,
    pub first_name: String,
    pub middle_name: String,
    pub address_line_1: String,
    /// `apt`, `ste` or `flr`.
    pub unit_type: String,
    /// Unit number.
    pub address_line_2: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub province: String,
    pub country: String,
    pub daytime_phone: String,
    pub email: String,
    pub fax: String,
    pub attorney_eligible: String,
    pub licensing_state: String,
    pub bar_number: String,
    pub subject_to_restrictions: String,
    pub law_firm: String,
    pub is_nonprofit_rep: bool,
    pub org_name: String,
    pub recognized_org: String,
    pub associated_with_name: String,
    pub accreditation_date: String,
    pub associated_with_student: String,
    pub law_student: String,
    pub administrative_case: bool,
    pub administrative_matter: String,
    pub civil_case: bool,
    pub civil_matter: String,
    pub other_legal: bool,
    pub other_legal_matter: String,
    pub receipt_number: String,
    pub client_type: String,
}

/// Part 4-5: the client. Delivery preferences are `"Y"`/`"N"`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientInfo {
    pub family_name: String,
    pub first_name: String,
    pub entity_name: String,
    pub entity_title: String,
    pub reference_number: String,
    pub id_number: String,
    pub daytime_phone: String,
    pub mobile_phone: String,
    pub email: String,
    pub address_line_1: String,
    pub unit_type: String,
    pub address_line_2: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub province: String,
    pub country: String,
    pub send_notices_to_attorney: String,
    pub send_documents_to_attorney: String,
    pub send_documents_to_client: String,
    pub signature_date: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Part6 {
    pub additional_info: AdditionalInfo,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdditionalInfo {
    pub family_name: String,
    pub given_name: String,
    pub middle_name: String,
    pub entries_section_2: Vec<AdditionalInfoEntry>,
    pub entries_section_3: Vec<AdditionalInfoEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdditionalInfoEntry {
    pub page_number: String,
    pub part_number: String,
    pub item_number: String,
    pub additional_info: String,
}

/// Newline-joined free text of `entries`, in order.
pub fn joined_additional_info(entries: &[AdditionalInfoEntry]) -> String {
    entries
        .iter()
        .map(|e| e.additional_info.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}

impl ApplicantRecord {
    /// Load a record from a JSON file. Missing keys take their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Copy of this record where an empty client unit type is taken
    /// from the attorney section together with its unit number.
    pub fn with_client_unit_backfill(&self) -> ApplicantRecord {
        let mut record = self.clone();
        if record.client.unit_type.trim().is_empty() {
            record.client.unit_type = self.attorney.unit_type.trim().to_string();
            record.client.address_line_2 = self.attorney.address_line_2.trim().to_string();
        }
        record
    }

    /// The built-in applicant record used when no data file is given.
    pub fn sample() -> Self {
        Self {
            attorney: AttorneyInfo {
                online_account_number: "A987654321".into(),
                family_name: "Smith".into(),
                first_name: "Alice".into(),
                middle_name: "B.".into(),
                address_line_1: "789 Corporate Blvd".into(),
                unit_type: "ste".into(),
                address_line_2: "202".into(),
                city: "New York".into(),
                state: "New York".into(),
                zip_code: "10001".into(),
                province: "NY Province".into(),
                country: "United States".into(),
                daytime_phone: "(212) 555-6789".into(),
                email: "alice.smith@corporate.com".into(),
                fax: "2125559876".into(),
                attorney_eligible: "no".into(),
                licensing_state: "NY".into(),
                bar_number: "NY123456".into(),
                subject_to_restrictions: "yes".into(),
                law_firm: "Doe & Associates Legal Group".into(),
                is_nonprofit_rep: true,
                org_name: "Smith Legal Group".into(),
                recognized_org: "Doe & Associates Legal Group".into(),
                associated_with_name: "Former Attorney".into(),
                accreditation_date: "04/15/2020".into(),
                associated_with_student: "yes".into(),
                law_student: String::new(),
                administrative_case: false,
                administrative_matter: "Admin Matter 123".into(),
                civil_case: true,
                civil_matter: "Civil Matter 456".into(),
                other_legal: true,
                other_legal_matter: "Other Legal Matter Example".into(),
                receipt_number: "NY000111222".into(),
                client_type: "Beneficiary".into(),
            },
            client: ClientInfo {
                family_name: "Brown".into(),
                first_name: "Charlie".into(),
                entity_name: "Brown Corp".into(),
                entity_title: "CEO".into(),
                reference_number: "REF-2023-9999".into(),
                id_number: "C123456789".into(),
                daytime_phone: "6465553333".into(),
                mobile_phone: "6465554444".into(),
                email: "charlie.brown@browncorp.com".into(),
                address_line_1: "456 Industrial Ave".into(),
                unit_type: "Apt".into(),
                address_line_2: "101".into(),
                city: "New York".into(),
                state: "NY".into(),
                zip_code: "10018".into(),
                province: "NY Province".into(),
                country: "US".into(),
                send_notices_to_attorney: "N".into(),
                send_documents_to_attorney: "Y".into(),
                send_documents_to_client: "Y".into(),
                signature_date: "05/01/2023".into(),
            },
            attorney_signature_date: "05/01/2023".into(),
            additional_signature_date: "05/01/2023".into(),
            part6: Part6 {
                additional_info: AdditionalInfo {
                    family_name: "Green".into(),
                    given_name: "Diana".into(),
                    middle_name: "E.".into(),
                    entries_section_2: vec![AdditionalInfoEntry {
                        page_number: "1".into(),
                        part_number: "2".into(),
                        item_number: "1.a".into(),
                        additional_info: "Also licensed in New York State Bar, Bar #NY7654321"
                            .into(),
                    }],
                    entries_section_3: vec![AdditionalInfoEntry {
                        page_number: "3".into(),
                        part_number: "3".into(),
                        item_number: "3.c".into(),
                        additional_info: "Extra information for section 3.".into(),
                    }],
                },
            },
        }
    }
}
