use std::collections::HashMap;

use serde::Deserialize;

/// `/latest` reply.
#[derive(Debug, Deserialize)]
pub struct LatestResponse {
    pub amount: Option<f64>,
    pub base: Option<String>,
    pub date: Option<String>,
    #[serde(default)]
    pub rates: HashMap<String, f64>,
}

impl LatestResponse {
    pub fn rate_for(&self, code: &str) -> Option<f64> {
        self.rates.get(code).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_latest() {
        let json = r#"{
            "amount": 100.0,
            "base": "EUR",
            "date": "2024-05-31",
            "rates": { "USD": 108.48 }
        }"#;

        let resp: LatestResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.base.as_deref(), Some("EUR"));
        assert_eq!(resp.rate_for("USD"), Some(108.48));
        assert_eq!(resp.rate_for("INR"), None);
    }
}
