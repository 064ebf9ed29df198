//! Response envelopes: every payload is wrapped under a single resource key, e.g. `{"company": {...}}`.

use axum::{http::StatusCode, Json};
use serde::ser::{Serialize, SerializeMap, Serializer};

/// `{ <key>: data }`
pub struct Envelope<T> {
    pub key: &'static str,
    pub data: T,
}

impl<T: Serialize> Serialize for Envelope<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(self.key, &self.data)?;
        map.end()
    }
}

#[derive(serde::Serialize)]
pub struct StatusBody {
    pub status: &'static str,
}

pub fn ok<T: Serialize>(key: &'static str, data: T) -> (StatusCode, Json<Envelope<T>>) {
    (StatusCode::OK, Json(Envelope { key, data }))
}

pub fn created<T: Serialize>(key: &'static str, data: T) -> (StatusCode, Json<Envelope<T>>) {
    (StatusCode::CREATED, Json(Envelope { key, data }))
}

/// `200 {"status": "deleted"}`
pub fn deleted() -> (StatusCode, Json<StatusBody>) {
    (StatusCode::OK, Json(StatusBody { status: "deleted" }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_wraps_under_key() {
        let v = serde_json::to_value(Envelope {
            key: "invoices",
            data: vec![1, 2],
        })
        .unwrap();
        assert_eq!(v, serde_json::json!({ "invoices": [1, 2] }));
    }

    #[test]
    fn deleted_body() {
        let (status, Json(body)) = deleted();
        assert_eq!(status, StatusCode::OK);
        assert_eq!(serde_json::to_value(body).unwrap(), serde_json::json!({ "status": "deleted" }));
    }
}
