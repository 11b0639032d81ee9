//! JSON message contract with the external solver.
//!
//! Outbound: `{"type": "solve", "data": [[..]], "params": {"alpha", "beta", "rho"}}`
//! with `params` omitted when unset.
//!
//! Inbound: `{"type": <anything>, "payload": <indices>}` where the payload is
//! either a JSON array of indices or a string holding one (`"[0, 1, 2]"`).

use serde::{Deserialize, Serialize};

use crate::error::{SolverError, SolverResult};
use crate::matrix::DistanceMatrix;
use crate::model::Tour;

pub const SOLVE_KIND: &str = "solve";

/// Search parameters forwarded untouched to the solver.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolverParams {
    pub alpha: f64,
    pub beta: f64,
    pub rho: f64,
}

impl Default for SolverParams {
    fn default() -> Self {
        Self {
            alpha: 1.0,
            beta: 2.0,
            rho: 0.5,
        }
    }
}

impl SolverParams {
    pub fn new(alpha: f64, beta: f64, rho: f64) -> Self {
        Self { alpha, beta, rho }
    }

    /// All three values must be positive and finite.
    pub fn validate(&self) -> SolverResult<()> {
        for (name, value) in [("alpha", self.alpha), ("beta", self.beta), ("rho", self.rho)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(SolverError::InvalidParams(format!(
                    "{name} must be a positive number, got {value}"
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolveRequest {
    #[serde(rename = "type")]
    kind: String,
    pub data: DistanceMatrix,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<SolverParams>,
}

impl SolveRequest {
    pub fn new(data: DistanceMatrix, params: Option<SolverParams>) -> Self {
        Self {
            kind: SOLVE_KIND.to_string(),
            data,
            params,
        }
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn to_json(&self) -> SolverResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// A decoded inbound tour message.
#[derive(Debug, Clone, PartialEq)]
pub struct TourUpdate {
    /// The message's `type` field, whatever the solver chose to send.
    pub kind: String,
    pub tour: Tour,
}

#[derive(Deserialize)]
struct RawMessage {
    #[serde(rename = "type")]
    kind: String,
    payload: RawPayload,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawPayload {
    Indices(Vec<usize>),
    Encoded(String),
}

/// Decode an inbound text frame into a [`TourUpdate`].
pub fn decode_message(text: &str) -> SolverResult<TourUpdate> {
    let raw: RawMessage = serde_json::from_str(text)
        .map_err(|e| SolverError::Malformed(format!("{e} in {}", excerpt(text))))?;
    let indices = match raw.payload {
        RawPayload::Indices(indices) => indices,
        RawPayload::Encoded(encoded) => serde_json::from_str::<Vec<usize>>(encoded.trim())
            .map_err(|e| {
                SolverError::Malformed(format!("payload string is not an index list: {e}"))
            })?,
    };
    Ok(TourUpdate {
        kind: raw.kind,
        tour: Tour::new(indices),
    })
}

fn excerpt(text: &str) -> String {
    const MAX: usize = 80;
    match text.char_indices().nth(MAX) {
        Some((cut, _)) => format!("{}…", &text[..cut]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{City, CitySet};

    #[test]
    fn test_request_json_shape() {
        let set: CitySet = vec![City::new(0.0, 0.0), City::new(3.0, 4.0)].into();
        let req = SolveRequest::new(DistanceMatrix::build(&set), Some(SolverParams::new(1.0, 2.0, 0.5)));
        let value: serde_json::Value = serde_json::from_str(&req.to_json().unwrap()).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "type": "solve",
                "data": [[0.0, 5.0], [5.0, 0.0]],
                "params": {"alpha": 1.0, "beta": 2.0, "rho": 0.5}
            })
        );
    }

    #[test]
    fn test_request_without_params() {
        let req = SolveRequest::new(DistanceMatrix::default(), None);
        assert_eq!(req.to_json().unwrap(), r#"{"type":"solve","data":[]}"#);
    }

    #[test]
    fn test_decode_native_payload() {
        let update = decode_message(r#"{"type":"update","payload":[2,0,1]}"#).unwrap();
        assert_eq!(update.kind, "update");
        assert_eq!(update.tour.indices(), &[2, 0, 1]);
    }

    #[test]
    fn test_decode_string_payload() {
        let update = decode_message(r#"{"type":"path","payload":"[0, 1, 2]"}"#).unwrap();
        assert_eq!(update.kind, "path");
        assert_eq!(update.tour.indices(), &[0, 1, 2]);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(matches!(decode_message("not json"), Err(SolverError::Malformed(_))));
        assert!(matches!(decode_message(r#"{"type":"path"}"#), Err(SolverError::Malformed(_))));
        assert!(matches!(
            decode_message(r#"{"type":"path","payload":[1,-2]}"#),
            Err(SolverError::Malformed(_))
        ));
        assert!(matches!(
            decode_message(r#"{"type":"path","payload":"oops"}"#),
            Err(SolverError::Malformed(_))
        ));
    }

    #[test]
    fn test_params_validate() {
        assert!(SolverParams::default().validate().is_ok());
        assert!(SolverParams::new(0.0, 1.0, 1.0).validate().is_err());
        assert!(SolverParams::new(1.0, f64::NAN, 1.0).validate().is_err());
    }
}
