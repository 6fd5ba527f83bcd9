//! FHIR HTTP Client
//!
//! Functions for communicating with the FHIR server. Every operation is a
//! single request; a failure is terminal for the user action that issued it
//! and surfaces as one generic message.

use gloo_net::http::Request;

use crate::state::global::MeasurePoint;

/// Default FHIR server base URL
pub const DEFAULT_FHIR_BASE: &str = "https://server.fire.ly";

/// Content type for FHIR JSON exchanges
pub const FHIR_CONTENT_TYPE: &str = "application/fhir+json";

/// LOINC coding of the tracked exercise
pub const EXERCISE_SYSTEM: &str = "http://loinc.org";
pub const EXERCISE_CODE: &str = "22656-1";
pub const EXERCISE_DISPLAY: &str = "Squats";
pub const EXERCISE_UNIT: &str = "reps";

const UCUM_SYSTEM: &str = "http://unitsofmeasure.org";

/// Get the FHIR base URL from local storage or use default
pub fn get_fhir_base() -> String {
    let url = if let Some(window) = web_sys::window() {
        if let Ok(Some(storage)) = window.local_storage() {
            if let Ok(Some(url)) = storage.get_item("reptrack_fhir_url") {
                url
            } else {
                DEFAULT_FHIR_BASE.to_string()
            }
        } else {
            DEFAULT_FHIR_BASE.to_string()
        }
    } else {
        DEFAULT_FHIR_BASE.to_string()
    };
    // Normalize: remove trailing slash
    url.trim_end_matches('/').to_string()
}

// ============ Wire Types ============

#[derive(Debug, serde::Deserialize)]
pub struct Bundle<T> {
    #[serde(default)]
    pub entry: Vec<BundleEntry<T>>,
}

#[derive(Debug, serde::Deserialize)]
pub struct BundleEntry<T> {
    #[serde(default)]
    pub resource: Option<T>,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Concept {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub coding: Vec<ConceptCoding>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ConceptCoding {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
}

#[derive(Debug, serde::Deserialize)]
pub struct ServiceRequestResource {
    #[serde(default)]
    pub code: Option<Concept>,
}

#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObservationResource {
    #[serde(default)]
    pub effective_date_time: Option<String>,
    #[serde(default)]
    pub value_quantity: Option<QuantityValue>,
}

#[derive(Debug, serde::Deserialize)]
pub struct QuantityValue {
    #[serde(default)]
    pub value: Option<f64>,
}

#[derive(Debug, serde::Deserialize)]
pub struct CreatedResource {
    #[serde(default)]
    pub id: Option<String>,
}

#[derive(Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ObservationRequest {
    resource_type: &'static str,
    status: &'static str,
    code: Concept,
    subject: SubjectReference,
    effective_date_time: String,
    value_quantity: QuantityOut,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    component: Vec<ComponentOut>,
}

#[derive(Debug, serde::Serialize)]
pub struct SubjectReference {
    reference: String,
}

#[derive(Debug, serde::Serialize)]
pub struct QuantityOut {
    value: f64,
    unit: &'static str,
    system: &'static str,
    code: &'static str,
}

#[derive(Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentOut {
    code: Concept,
    value_quantity: QuantityOut,
}

// ============ API Functions ============

/// Create a test patient; returns the server-assigned id
pub async fn create_test_patient() -> Result<String, String> {
    #[derive(serde::Serialize)]
    #[serde(rename_all = "camelCase")]
    struct PatientRequest {
        resource_type: &'static str,
        name: Vec<Name>,
        gender: &'static str,
    }

    #[derive(serde::Serialize)]
    struct Name {
        family: &'static str,
        given: Vec<&'static str>,
    }

    let base = get_fhir_base();

    let response = Request::post(&format!("{}/Patient", base))
        .header("Content-Type", FHIR_CONTENT_TYPE)
        .json(&PatientRequest {
            resource_type: "Patient",
            name: vec![Name {
                family: "Test",
                given: vec!["User"],
            }],
            gender: "unknown",
        })
        .map_err(|e| format!("Request build error: {}", e))?
        .send()
        .await
        .map_err(|e| format!("Network error: {}", e))?;

    if !response.ok() {
        return Err(format!("Server error: {}", response.status()));
    }

    let created: CreatedResource = response
        .json()
        .await
        .map_err(|e| format!("Parse error: {}", e))?;

    created
        .id
        .ok_or_else(|| "Server response did not include an id".to_string())
}

/// Create an active exercise order for the patient (fire-and-forget)
pub async fn create_service_request(patient_id: &str) -> Result<(), String> {
    #[derive(serde::Serialize)]
    #[serde(rename_all = "camelCase")]
    struct OrderRequest {
        resource_type: &'static str,
        status: &'static str,
        intent: &'static str,
        code: Concept,
        subject: SubjectReference,
    }

    let base = get_fhir_base();

    let response = Request::post(&format!("{}/ServiceRequest", base))
        .header("Content-Type", FHIR_CONTENT_TYPE)
        .json(&OrderRequest {
            resource_type: "ServiceRequest",
            status: "active",
            intent: "order",
            code: exercise_concept(),
            subject: SubjectReference {
                reference: format!("Patient/{}", patient_id),
            },
        })
        .map_err(|e| format!("Request build error: {}", e))?
        .send()
        .await
        .map_err(|e| format!("Network error: {}", e))?;

    if !response.ok() {
        return Err(format!("Server error: {}", response.status()));
    }

    Ok(())
}

/// Coded display of the patient's first active order, if any
pub async fn fetch_task_display(patient_id: &str) -> Result<Option<String>, String> {
    let base = get_fhir_base();

    let response = Request::get(&format!(
        "{}/ServiceRequest?patient={}&status=active",
        base, patient_id
    ))
    .header("Accept", FHIR_CONTENT_TYPE)
    .send()
    .await
    .map_err(|e| format!("Network error: {}", e))?;

    if !response.ok() {
        return Err(format!("Server error: {}", response.status()));
    }

    let bundle: Bundle<ServiceRequestResource> = response
        .json()
        .await
        .map_err(|e| format!("Parse error: {}", e))?;

    Ok(first_coded_display(&bundle))
}

/// Fetch the patient's measurement history as chart points, oldest first
pub async fn fetch_points(patient_id: &str) -> Result<Vec<MeasurePoint>, String> {
    let base = get_fhir_base();

    let response = Request::get(&format!(
        "{}/Observation?patient={}&code={}&_sort=date",
        base, patient_id, EXERCISE_CODE
    ))
    .header("Accept", FHIR_CONTENT_TYPE)
    .send()
    .await
    .map_err(|e| format!("Network error: {}", e))?;

    if !response.ok() {
        return Err(format!("Server error: {}", response.status()));
    }

    let bundle: Bundle<ObservationResource> = response
        .json()
        .await
        .map_err(|e| format!("Parse error: {}", e))?;

    Ok(points_from_entries(bundle))
}

/// Submit one measurement as a new observation
pub async fn submit_observation(
    patient_id: &str,
    reps: f64,
    weight: Option<f64>,
) -> Result<(), String> {
    let base = get_fhir_base();
    let effective = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true);
    let body = observation_body(patient_id, reps, weight, effective);

    let response = Request::post(&format!("{}/Observation", base))
        .header("Content-Type", FHIR_CONTENT_TYPE)
        .json(&body)
        .map_err(|e| format!("Request build error: {}", e))?
        .send()
        .await
        .map_err(|e| format!("Network error: {}", e))?;

    if !response.ok() {
        return Err(format!("Server error: {}", response.status()));
    }

    Ok(())
}

// ============ Mapping Helpers ============

fn exercise_concept() -> Concept {
    Concept {
        coding: vec![ConceptCoding {
            system: Some(EXERCISE_SYSTEM.to_string()),
            code: Some(EXERCISE_CODE.to_string()),
            display: Some(EXERCISE_DISPLAY.to_string()),
        }],
        text: None,
    }
}

/// Build the observation body; the load component is present iff a weight
/// was entered
fn observation_body(
    patient_id: &str,
    reps: f64,
    weight: Option<f64>,
    effective: String,
) -> ObservationRequest {
    ObservationRequest {
        resource_type: "Observation",
        status: "final",
        code: exercise_concept(),
        subject: SubjectReference {
            reference: format!("Patient/{}", patient_id),
        },
        effective_date_time: effective,
        value_quantity: QuantityOut {
            value: reps,
            unit: EXERCISE_UNIT,
            system: UCUM_SYSTEM,
            code: "{reps}",
        },
        component: weight
            .map(|kg| ComponentOut {
                code: Concept {
                    coding: Vec::new(),
                    text: Some("Load".to_string()),
                },
                value_quantity: QuantityOut {
                    value: kg,
                    unit: "kg",
                    system: UCUM_SYSTEM,
                    code: "kg",
                },
            })
            .into_iter()
            .collect(),
    }
}

fn first_coded_display(bundle: &Bundle<ServiceRequestResource>) -> Option<String> {
    bundle
        .entry
        .iter()
        .filter_map(|e| e.resource.as_ref())
        .next()
        .and_then(|order| order.code.as_ref())
        .and_then(|code| code.coding.first())
        .and_then(|coding| coding.display.clone())
}

/// Map bundle entries to chart points, skipping entries without a value or
/// a parseable timestamp
fn points_from_entries(bundle: Bundle<ObservationResource>) -> Vec<MeasurePoint> {
    bundle
        .entry
        .into_iter()
        .filter_map(|e| e.resource)
        .filter_map(|obs| {
            let value = obs.value_quantity.as_ref()?.value?;
            let label = format_label(obs.effective_date_time.as_deref()?)?;
            Some(MeasurePoint { label, value })
        })
        .collect()
}

/// Compact local-time label for an instant: "%m/%d %H:%M"
fn format_label(raw: &str) -> Option<String> {
    let at = chrono::DateTime::parse_from_rfc3339(raw).ok()?;
    Some(
        at.with_timezone(&chrono::Local)
            .format("%m/%d %H:%M")
            .to_string(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_points_skip_incomplete_entries() {
        let json = r#"{
            "resourceType": "Bundle",
            "entry": [
                {"resource": {"effectiveDateTime": "2026-03-14T08:00:00Z",
                    "valueQuantity": {"value": 10.0}}},
                {"resource": {"valueQuantity": {"value": 99.0}}},
                {"resource": {"effectiveDateTime": "2026-03-15T08:00:00Z"}},
                {"resource": {"effectiveDateTime": "2026-03-16T08:00:00Z",
                    "valueQuantity": {"value": 12.0}}}
            ]
        }"#;

        let bundle: Bundle<ObservationResource> = serde_json::from_str(json).unwrap();
        let points = points_from_entries(bundle);

        assert_eq!(points.len(), 2);
        assert_eq!(points[0].value, 10.0);
        assert_eq!(points[1].value, 12.0);
    }

    #[test]
    fn test_observation_body_component_iff_weight() {
        let bare = observation_body("p1", 12.0, None, "2026-03-14T08:00:00Z".to_string());
        let json = serde_json::to_value(&bare).unwrap();
        assert!(json.get("component").is_none());
        assert_eq!(json["valueQuantity"]["value"], 12.0);
        assert_eq!(json["valueQuantity"]["unit"], "reps");
        assert_eq!(json["subject"]["reference"], "Patient/p1");

        let loaded = observation_body("p1", 8.0, Some(20.0), "2026-03-14T08:00:00Z".to_string());
        let json = serde_json::to_value(&loaded).unwrap();
        assert_eq!(json["component"][0]["valueQuantity"]["value"], 20.0);
        assert_eq!(json["component"][0]["valueQuantity"]["unit"], "kg");
    }

    #[test]
    fn test_first_coded_display() {
        let json = r#"{
            "resourceType": "Bundle",
            "entry": [
                {"resource": {"code": {"coding": [
                    {"system": "http://loinc.org", "code": "22656-1", "display": "Squats"}
                ]}}}
            ]
        }"#;

        let bundle: Bundle<ServiceRequestResource> = serde_json::from_str(json).unwrap();
        assert_eq!(first_coded_display(&bundle).as_deref(), Some("Squats"));

        let empty: Bundle<ServiceRequestResource> =
            serde_json::from_str(r#"{"resourceType": "Bundle"}"#).unwrap();
        assert_eq!(first_coded_display(&empty), None);
    }
}
