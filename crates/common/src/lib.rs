pub mod types;
pub mod utils;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_type_ok() {
        let h = types::Health::ok();
        assert_eq!(h.status, "OK");
        assert!(chrono::DateTime::parse_from_rfc3339(&h.timestamp).is_ok());
    }

    #[test]
    fn error_body_serializes_error_key() {
        let body = serde_json::to_value(types::ErrorBody::new("Route not found")).unwrap();
        assert_eq!(body, serde_json::json!({"error": "Route not found"}));
    }
}
