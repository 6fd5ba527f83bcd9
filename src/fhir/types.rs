//! FHIR resource wire types
//!
//! A small R4 subset covering the three resources this client exchanges:
//! - `Patient`: the subject exercise data is recorded against
//! - `ServiceRequest`: the prescribed exercise order
//! - `Observation`: one recorded exercise performance
//!
//! `Measurement` is the domain-side record; the conversions to and from the
//! `Observation` wire shape keep schema knowledge out of the view layer.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// UCUM system URL used for quantity units
pub const UCUM_SYSTEM: &str = "http://unitsofmeasure.org";

/// Coding details for the tracked exercise
///
/// Defaults to the LOINC squats code used by the server-side orders.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExerciseCoding {
    #[serde(default = "default_exercise_system")]
    pub system: String,

    #[serde(default = "default_exercise_code")]
    pub code: String,

    #[serde(default = "default_exercise_display")]
    pub display: String,

    #[serde(default = "default_exercise_unit")]
    pub unit: String,
}

fn default_exercise_system() -> String {
    "http://loinc.org".to_string()
}

fn default_exercise_code() -> String {
    "22656-1".to_string()
}

fn default_exercise_display() -> String {
    "Squats".to_string()
}

fn default_exercise_unit() -> String {
    "reps".to_string()
}

impl Default for ExerciseCoding {
    fn default() -> Self {
        Self {
            system: default_exercise_system(),
            code: default_exercise_code(),
            display: default_exercise_display(),
            unit: default_exercise_unit(),
        }
    }
}

/// FHIR HumanName (subset)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HumanName {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub family: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub given: Vec<String>,
}

/// FHIR Coding (subset)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Coding {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
}

/// FHIR CodeableConcept (subset)
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CodeableConcept {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub coding: Vec<Coding>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl CodeableConcept {
    /// Concept with a single coding
    pub fn coded(system: &str, code: &str, display: &str) -> Self {
        Self {
            coding: vec![Coding {
                system: Some(system.to_string()),
                code: Some(code.to_string()),
                display: Some(display.to_string()),
            }],
            text: None,
        }
    }

    /// Concept with only free text
    pub fn text_only(text: &str) -> Self {
        Self {
            coding: Vec::new(),
            text: Some(text.to_string()),
        }
    }

    /// Display text of the first coding
    pub fn coded_display(&self) -> Option<&str> {
        self.coding.first().and_then(|c| c.display.as_deref())
    }
}

/// FHIR Reference (subset)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Reference {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

impl Reference {
    /// Literal reference to a patient resource (`Patient/{id}`)
    pub fn patient(id: &str) -> Self {
        Self {
            reference: Some(format!("Patient/{}", id)),
        }
    }
}

/// FHIR Quantity (subset)
///
/// All fields optional so a sparse server value degrades to a skipped
/// measurement instead of a failed bundle parse.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Quantity {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

/// FHIR Patient (subset)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    pub resource_type: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub name: Vec<HumanName>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
}

impl Patient {
    /// Create a minimal patient record for submission
    pub fn new(family: &str, given: &str) -> Self {
        Self {
            resource_type: "Patient".to_string(),
            id: None,
            name: vec![HumanName {
                family: Some(family.to_string()),
                given: vec![given.to_string()],
            }],
            gender: None,
        }
    }

    /// Builder method: set the administrative gender
    pub fn gender(mut self, gender: &str) -> Self {
        self.gender = Some(gender.to_string());
        self
    }
}

/// FHIR ServiceRequest (subset) - the prescribed exercise order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceRequest {
    pub resource_type: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default)]
    pub status: String,

    #[serde(default)]
    pub intent: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<CodeableConcept>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<Reference>,
}

impl ServiceRequest {
    /// Create an active order for the given exercise, owned by the patient
    pub fn active_order(patient_id: &str, exercise: &ExerciseCoding) -> Self {
        Self {
            resource_type: "ServiceRequest".to_string(),
            id: None,
            status: "active".to_string(),
            intent: "order".to_string(),
            code: Some(CodeableConcept::coded(
                &exercise.system,
                &exercise.code,
                &exercise.display,
            )),
            subject: Some(Reference::patient(patient_id)),
        }
    }

    /// Display text of the order's first coding
    pub fn coded_display(&self) -> Option<&str> {
        self.code.as_ref().and_then(|c| c.coded_display())
    }
}

/// FHIR Observation component (subset) - carries the optional load
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObservationComponent {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<CodeableConcept>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_quantity: Option<Quantity>,
}

/// FHIR Observation (subset) - one recorded exercise performance
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Observation {
    pub resource_type: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default)]
    pub status: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<CodeableConcept>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<Reference>,

    /// FHIR dateTime, kept as the raw wire string so a partial or odd
    /// server value skips one entry instead of failing the whole bundle
    #[serde(skip_serializing_if = "Option::is_none")]
    pub effective_date_time: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_quantity: Option<Quantity>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub component: Vec<ObservationComponent>,
}

/// FHIR search result Bundle (subset)
#[derive(Debug, Clone, Deserialize)]
pub struct Bundle<T> {
    #[serde(default)]
    pub total: Option<u32>,

    #[serde(default)]
    pub entry: Vec<BundleEntry<T>>,
}

/// One entry of a search result bundle
#[derive(Debug, Clone, Deserialize)]
pub struct BundleEntry<T> {
    #[serde(default)]
    pub resource: Option<T>,
}

impl<T> Bundle<T> {
    /// Iterate the entries that actually carry a resource
    pub fn resources(&self) -> impl Iterator<Item = &T> {
        self.entry.iter().filter_map(|e| e.resource.as_ref())
    }
}

/// One recorded exercise performance
///
/// The domain-side record the rest of the crate works with. Immutable after
/// submission; the server never returns an update or delete path for it.
#[derive(Debug, Clone, PartialEq)]
pub struct Measurement {
    /// Repetitions performed
    pub reps: f64,
    /// Load lifted in kilograms, when one was entered
    pub load_kg: Option<f64>,
    /// When the exercise was performed (client-set at submission)
    pub taken_at: DateTime<Utc>,
}

impl Measurement {
    /// Create a measurement taken now
    pub fn new(reps: f64) -> Self {
        Self {
            reps,
            load_kg: None,
            taken_at: Utc::now(),
        }
    }

    /// Builder method: attach a load in kilograms
    pub fn load_kg(mut self, kg: f64) -> Self {
        self.load_kg = Some(kg);
        self
    }

    /// Builder method: set the performance instant
    pub fn taken_at(mut self, at: DateTime<Utc>) -> Self {
        self.taken_at = at;
        self
    }

    /// Map to the Observation wire shape for submission
    ///
    /// The load component is present iff a load was entered.
    pub fn to_observation(&self, patient_id: &str, exercise: &ExerciseCoding) -> Observation {
        Observation {
            resource_type: "Observation".to_string(),
            id: None,
            status: "final".to_string(),
            code: Some(CodeableConcept::coded(
                &exercise.system,
                &exercise.code,
                &exercise.display,
            )),
            subject: Some(Reference::patient(patient_id)),
            effective_date_time: Some(
                self.taken_at.to_rfc3339_opts(SecondsFormat::Millis, true),
            ),
            value_quantity: Some(Quantity {
                value: Some(self.reps),
                unit: Some(exercise.unit.clone()),
                system: Some(UCUM_SYSTEM.to_string()),
                code: Some(format!("{{{}}}", exercise.unit)),
            }),
            component: self
                .load_kg
                .map(|kg| ObservationComponent {
                    code: Some(CodeableConcept::text_only("Load")),
                    value_quantity: Some(Quantity {
                        value: Some(kg),
                        unit: Some("kg".to_string()),
                        system: Some(UCUM_SYSTEM.to_string()),
                        code: Some("kg".to_string()),
                    }),
                })
                .into_iter()
                .collect(),
        }
    }

    /// Map back from the wire shape
    ///
    /// Returns `None` when the observation lacks a value or a parseable
    /// timestamp; such entries are skipped, not surfaced as errors.
    pub fn from_observation(obs: &Observation) -> Option<Self> {
        let reps = obs.value_quantity.as_ref()?.value?;
        let raw = obs.effective_date_time.as_deref()?;
        let taken_at = DateTime::parse_from_rfc3339(raw).ok()?.with_timezone(&Utc);
        let load_kg = obs
            .component
            .iter()
            .find_map(|c| c.value_quantity.as_ref().and_then(|q| q.value));

        Some(Self {
            reps,
            load_kg,
            taken_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn exercise() -> ExerciseCoding {
        ExerciseCoding::default()
    }

    #[test]
    fn test_measurement_to_observation() {
        let at = Utc.with_ymd_and_hms(2026, 3, 14, 9, 26, 53).unwrap();
        let obs = Measurement::new(12.0)
            .taken_at(at)
            .to_observation("pat-1", &exercise());

        assert_eq!(obs.resource_type, "Observation");
        assert_eq!(obs.status, "final");
        assert_eq!(
            obs.subject.as_ref().unwrap().reference.as_deref(),
            Some("Patient/pat-1")
        );
        assert_eq!(obs.code.as_ref().unwrap().coded_display(), Some("Squats"));

        let quantity = obs.value_quantity.as_ref().unwrap();
        assert_eq!(quantity.value, Some(12.0));
        assert_eq!(quantity.unit.as_deref(), Some("reps"));
        assert_eq!(quantity.code.as_deref(), Some("{reps}"));

        assert_eq!(
            obs.effective_date_time.as_deref(),
            Some("2026-03-14T09:26:53.000Z")
        );
    }

    #[test]
    fn test_load_component_present_iff_entered() {
        let bare = Measurement::new(8.0).to_observation("p", &exercise());
        assert!(bare.component.is_empty());

        let loaded = Measurement::new(8.0)
            .load_kg(20.0)
            .to_observation("p", &exercise());
        assert_eq!(loaded.component.len(), 1);

        let quantity = loaded.component[0].value_quantity.as_ref().unwrap();
        assert_eq!(quantity.value, Some(20.0));
        assert_eq!(quantity.unit.as_deref(), Some("kg"));
    }

    #[test]
    fn test_load_component_not_serialized_when_absent() {
        let obs = Measurement::new(8.0).to_observation("p", &exercise());
        let json = serde_json::to_value(&obs).unwrap();

        assert!(json.get("component").is_none());
        assert_eq!(json["resourceType"], "Observation");
        assert_eq!(json["valueQuantity"]["value"], 8.0);
    }

    #[test]
    fn test_from_observation_skips_incomplete_entries() {
        let complete = Measurement::new(10.0).to_observation("p", &exercise());
        assert!(Measurement::from_observation(&complete).is_some());

        let mut missing_value = complete.clone();
        missing_value.value_quantity = None;
        assert!(Measurement::from_observation(&missing_value).is_none());

        let mut missing_time = complete.clone();
        missing_time.effective_date_time = None;
        assert!(Measurement::from_observation(&missing_time).is_none());

        let mut partial_date = complete;
        partial_date.effective_date_time = Some("2026-03".to_string());
        assert!(Measurement::from_observation(&partial_date).is_none());
    }

    #[test]
    fn test_bundle_parse_keeps_well_formed_entries_in_order() {
        let json = r#"{
            "resourceType": "Bundle",
            "type": "searchset",
            "total": 4,
            "entry": [
                {"resource": {"resourceType": "Observation", "status": "final",
                    "effectiveDateTime": "2026-03-14T08:00:00Z",
                    "valueQuantity": {"value": 10.0, "unit": "reps"}}},
                {"resource": {"resourceType": "Observation", "status": "final",
                    "valueQuantity": {"value": 99.0, "unit": "reps"}}},
                {"resource": {"resourceType": "Observation", "status": "final",
                    "effectiveDateTime": "2026-03-15T08:00:00Z"}},
                {"resource": {"resourceType": "Observation", "status": "final",
                    "effectiveDateTime": "2026-03-16T08:00:00Z",
                    "valueQuantity": {"value": 12.0, "unit": "reps"}}}
            ]
        }"#;

        let bundle: Bundle<Observation> = serde_json::from_str(json).unwrap();
        assert_eq!(bundle.total, Some(4));

        let measurements: Vec<Measurement> = bundle
            .resources()
            .filter_map(Measurement::from_observation)
            .collect();

        assert_eq!(measurements.len(), 2);
        assert_eq!(measurements[0].reps, 10.0);
        assert_eq!(measurements[1].reps, 12.0);
    }

    #[test]
    fn test_bundle_parse_without_entries() {
        let bundle: Bundle<Observation> =
            serde_json::from_str(r#"{"resourceType": "Bundle", "type": "searchset"}"#).unwrap();
        assert_eq!(bundle.resources().count(), 0);
    }

    #[test]
    fn test_patient_create_response_id() {
        let json = r#"{"resourceType": "Patient", "id": "abc-123",
            "name": [{"family": "Test", "given": ["User"]}]}"#;
        let patient: Patient = serde_json::from_str(json).unwrap();
        assert_eq!(patient.id.as_deref(), Some("abc-123"));
    }

    #[test]
    fn test_service_request_wire_shape() {
        let order = ServiceRequest::active_order("pat-9", &exercise());
        let json = serde_json::to_value(&order).unwrap();

        assert_eq!(json["resourceType"], "ServiceRequest");
        assert_eq!(json["status"], "active");
        assert_eq!(json["intent"], "order");
        assert_eq!(json["subject"]["reference"], "Patient/pat-9");
        assert_eq!(json["code"]["coding"][0]["code"], "22656-1");
        assert_eq!(order.coded_display(), Some("Squats"));
    }
}
