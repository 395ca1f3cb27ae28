use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::llm::ChatModel;
use crate::record::ApplicantRecord;

/// Form section a mapped field belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    Attorney,
    Client,
    Part6,
}

/// One (section, label, value) triple returned by the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldMapping {
    pub section: Section,
    pub label: String,
    #[serde(deserialize_with = "value_as_string")]
    pub value: String,
}

impl fmt::Display for FieldMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:?}] {:?} = {:?}", self.section, self.label, self.value)
    }
}

/// Booleans become `"yes"`/`"no"`, `null` becomes empty, everything
/// else keeps its JSON text.
fn value_as_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Bool(true) => "yes".to_string(),
        Value::Bool(false) => "no".to_string(),
        Value::Null => String::new(),
        Value::String(s) => s,
        other => other.to_string(),
    })
}

pub const SYSTEM_PROMPT: &str = "\
You are an expert form-filling assistant. Analyze the provided HTML and JSON data. \
For each fillable field in the form, produce an object with keys section, label, and value. \
The section must be one of attorney, client, or part6.

For checkboxes, please follow these rules exactly:

1. For the checkbox next to '1.a. I am an attorney eligible to practice law in, and a member in good standing of, \
the bar of the highest courts of the following jurisdictions. If you need extra space to complete this section, \
use the space provided in Part 6. Additional Information.', output the value from attorney_eligible \
(output 'yes' if true, or an empty string if false).

2. For the field labeled '1.c. I (select only one box)', if the JSON value for subject_to_restrictions is 'yes', \
output 'am'; if it is 'no', output 'am not'.

3. For the checkbox next to '2.a. I am an authorized representative of the following qualified nonprofit religious, \
charitable, social service, or similar organization.', output 'yes' if is_nonprofit_rep is true, or an empty string otherwise.

4. For the checkbox next to '3. I am associated with', output 'yes' if associated_with_student is 'yes', \
or an empty string otherwise.

5. For the checkbox next to '1.a. Administrative Case', output 'yes' if administrative_case is true, \
or an empty string otherwise.

6. For the checkbox next to '2.a. Civil Case', output 'yes' if civil_case is true, or an empty string otherwise.

7. For the checkbox next to '3.a. Other Legal Matter', output 'yes' if other_legal is true, or an empty string otherwise.

8. For the checkbox under '5. I enter my appearance as an attorney or accredited representative at the request of \
the (select only one box):', output the value from client_type. For example, if client_type is 'Beneficiary', \
output Beneficiary; otherwise output an empty string.

9. For the checkbox next to '1.a. I request that all original notices on an application or petition be sent to \
the business address of my attorney or representative as listed in this form.', output 'yes' if \
send_notices_to_attorney is 'Y', or an empty string otherwise.

10. For the checkbox next to '1.b. I request that any important documents that I receive be sent to the business \
address of my attorney or representative.', output 'yes' if send_documents_to_attorney is 'Y', or an empty string otherwise.

11. For the checkbox next to '1.c. I request that important documentation be sent to me at my mailing address.', \
output an empty string if send_documents_to_client is 'N', and 'yes' otherwise.

For text fields, simply output the corresponding value from the JSON data. \
Return only a valid JSON array of these objects with no additional commentary.

Example for rule 2: If subject_to_restrictions is 'yes', then for the field labeled '1.c. I (select only one box)', \
the output should be: 'section': 'attorney', 'label': '1.c. I (select only one box)', 'value': 'am'.

Example for rule 8: If client_type is 'Beneficiary', then for the corresponding field, output: 'section': 'client', \
'label': '5. I enter my appearance as an attorney or accredited representative at the request of the \
(select only one box):', 'value': 'Beneficiary'.";

/// User message carrying the rendered page and the record as indented JSON.
pub fn user_prompt(markup: &str, record: &ApplicantRecord) -> Result<String> {
    let data = serde_json::to_string_pretty(record)?;
    Ok(format!(
        "HTML:\n{markup}\n\nDATA:\n{data}\n\nReturn only the JSON array."
    ))
}

/// Slice from the first `[` to the last `]`, if both exist in that order.
///
/// Greedy: a reply containing several bracketed arrays yields everything
/// between the outermost brackets.
pub fn extract_json_array(text: &str) -> Option<&str> {
    let start = text.find('[')?;
    let end = text.rfind(']')?;
    (end > start).then(|| &text[start..=end])
}

/// Parse a free-text model reply into field mappings.
pub fn parse_mappings(reply: &str) -> Result<Vec<FieldMapping>> {
    let array = extract_json_array(reply)
        .ok_or_else(|| Error::MappingError("could not find JSON array in model output".into()))?;
    serde_json::from_str(array).map_err(|e| Error::MappingError(e.to_string()))
}

/// Maps form labels to record values through one chat-model call.
pub struct LlmMapper<M> {
    model: M,
}

impl<M: ChatModel> LlmMapper<M> {
    pub fn new(model: M) -> Self {
        Self { model }
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub async fn try_get_mapping(
        &self,
        markup: &str,
        record: &ApplicantRecord,
    ) -> Result<Vec<FieldMapping>> {
        let user = user_prompt(markup, record)?;
        let reply = self.model.complete(SYSTEM_PROMPT, &user).await?;
        match parse_mappings(&reply) {
            Ok(mappings) => {
                info!(count = mappings.len(), "received field mappings");
                Ok(mappings)
            }
            Err(e) => {
                debug!(raw = %reply, "unparseable model output");
                Err(e)
            }
        }
    }

    /// Like [`try_get_mapping`](Self::try_get_mapping) but any failure
    /// yields an empty list.
    pub async fn get_mapping(&self, markup: &str, record: &ApplicantRecord) -> Vec<FieldMapping> {
        self.try_get_mapping(markup, record)
            .await
            .unwrap_or_else(|e| {
                warn!("LLM mapping failed: {e}");
                Vec::new()
            })
    }
}
