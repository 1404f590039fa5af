//! Submission records.

use serde::{Deserialize, Serialize};

use formkit_core::{FormId, FormSchema, FormValues, Timestamp};

/// An immutable snapshot of validated values, produced by a successful
/// submit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormSubmissionData {
    /// The submitted schema's id. Unassigned when previewing an unsaved
    /// draft.
    pub form_id: FormId,
    /// The schema name at submission time.
    pub form_name: String,
    /// When the submission was accepted.
    pub submitted_at: Timestamp,
    /// Every field value at submission time, derived values included.
    pub values: FormValues,
}

impl FormSubmissionData {
    pub(crate) fn snapshot(schema: &FormSchema, values: &FormValues) -> Self {
        Self {
            form_id: schema.id.clone(),
            form_name: schema.name.clone(),
            submitted_at: Timestamp::now(),
            values: values.clone(),
        }
    }
}
