//! Standard response envelope: `{ success, message?, count?, pagination?, data }`.

use crate::query::{PageResult, Pagination};
use axum::{http::StatusCode, Json};
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Serialize)]
pub struct Envelope {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl Envelope {
    fn ok(data: Option<Value>) -> Self {
        Envelope {
            success: true,
            message: None,
            count: None,
            pagination: None,
            data,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

pub fn success_one(data: Value) -> Json<Envelope> {
    Json(Envelope::ok(Some(data)))
}

pub fn success_many(data: Vec<Value>) -> Json<Envelope> {
    let mut body = Envelope::ok(None);
    body.count = Some(data.len());
    body.data = Some(Value::Array(data));
    Json(body)
}

/// A listing page: `count` is the rows on this page, `pagination.total` the rows overall.
pub fn success_page(page: PageResult<Value>) -> Json<Envelope> {
    let pagination = page.pagination();
    let mut body = Envelope::ok(None);
    body.count = Some(page.data.len());
    body.pagination = Some(pagination);
    body.data = Some(Value::Array(page.data));
    Json(body)
}

pub fn created(data: Value, message: String) -> (StatusCode, Json<Envelope>) {
    (StatusCode::CREATED, Json(Envelope::ok(Some(data)).with_message(message)))
}

pub fn updated(data: Value, message: String) -> Json<Envelope> {
    Json(Envelope::ok(Some(data)).with_message(message))
}

pub fn message_only(message: String) -> Json<Envelope> {
    Json(Envelope::ok(None).with_message(message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn page_envelope_shape() {
        let page = PageResult {
            total: 3,
            page: 1,
            page_size: 2,
            total_pages: 2,
            data: vec![json!({ "peak_id": 1 }), json!({ "peak_id": 2 })],
        };
        let body = serde_json::to_value(&success_page(page).0).unwrap();
        assert_eq!(
            body,
            json!({
                "success": true,
                "count": 2,
                "pagination": { "total": 3, "page": 1, "limit": 2, "totalPages": 2 },
                "data": [{ "peak_id": 1 }, { "peak_id": 2 }]
            })
        );
    }

    #[test]
    fn optional_parts_are_omitted() {
        let body = serde_json::to_value(&message_only("peak deleted".into()).0).unwrap();
        assert_eq!(body, json!({ "success": true, "message": "peak deleted" }));
        let body = serde_json::to_value(&success_one(json!({ "page_id": 4 })).0).unwrap();
        assert_eq!(body, json!({ "success": true, "data": { "page_id": 4 } }));
    }
}
