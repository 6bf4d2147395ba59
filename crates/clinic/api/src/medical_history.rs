use serde::{Deserialize, Serialize};

use crate::id::{HistoryId, PatientId};

/// One record per patient on the backend.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicalHistory {
    pub id: HistoryId,
    pub patient_id: PatientId,
    #[serde(flatten)]
    pub form: MedicalHistoryForm,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicalHistoryForm {
    #[serde(default)]
    pub chronic_diseases: String,
    #[serde(default)]
    pub allergies: String,
    #[serde(default)]
    pub blood_type: String,
    #[serde(default)]
    pub vaccination: String,
}
