//! Raw JSON shapes returned by the banking backend.
//!
//! Fields are required unless they are `Option`; a missing required field makes
//! deserialization fail, which the adapter reports as a malformed response.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifiers arrive as either JSON strings or numbers
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Text(String),
    Number(serde_json::Number),
}

impl From<Scalar> for String {
    fn from(value: Scalar) -> Self {
        match value {
            Scalar::Text(s) => s,
            Scalar::Number(n) => n.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserEnvelope {
    pub user: UserRecord,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub name: String,
    pub account_number: Scalar,
    pub account_type: String,
    pub total_amount: Decimal,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TransactionDetail {
    pub date_range: DateRangeRecord,
    pub totals: TotalsRecord,
    pub transactions: CategoryLists,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRangeRecord {
    pub start_date: String,
    pub end_date: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TotalsRecord {
    pub total_income: Decimal,
    pub total_expense: Decimal,
    pub difference: Decimal,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryLists {
    pub top_income_categories: Vec<CategoryRecord>,
    pub top_expense_categories: Vec<CategoryRecord>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryRecord {
    pub category: String,
    pub total_amount: Decimal,
    pub percentage: f64,
}

/// Both lists may be absent or `null`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecommendationDetail {
    #[serde(default)]
    pub promo_recommendations: Option<Vec<PromoRecord>>,
    #[serde(default)]
    pub product_recommendations: Option<Vec<ProductRecord>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromoRecord {
    pub id: Scalar,
    pub promo_name: String,
    pub banner_url: String,
    pub promo_url: String,
    pub merchant_name: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecord {
    pub id: Scalar,
    pub product_name: String,
    pub product_url: String,
    pub icon_url: String,
}

#[derive(Clone, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub cif: Option<Scalar>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LogoutResponse {
    #[serde(default)]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_accepts_numbers_and_strings() {
        let user: UserEnvelope = serde_json::from_str(
            r#"{"user":{"name":"Indra","accountNumber":1234567890,"accountType":"Taplus","totalAmount":1500000}}"#,
        )
        .unwrap();
        assert_eq!(String::from(user.user.account_number), "1234567890");
        assert_eq!(user.user.total_amount, Decimal::from(1_500_000));

        let login: LoginResponse = serde_json::from_str(r#"{"cif":"CIF001"}"#).unwrap();
        assert_eq!(login.cif.map(String::from).as_deref(), Some("CIF001"));
    }

    #[test]
    fn test_missing_user_field_fails() {
        let err = serde_json::from_str::<UserEnvelope>(
            r#"{"user":{"name":"Indra","accountNumber":"1"}}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("accountType"));
    }

    #[test]
    fn test_recommendations_default_when_absent_or_null() {
        let empty: RecommendationDetail = serde_json::from_str("{}").unwrap();
        assert!(empty.promo_recommendations.is_none());

        let null: RecommendationDetail =
            serde_json::from_str(r#"{"promo_recommendations":null,"product_recommendations":[]}"#)
                .unwrap();
        assert!(null.promo_recommendations.is_none());
        assert_eq!(null.product_recommendations.map(|v| v.len()), Some(0));
    }

    #[test]
    fn test_credentials_debug_redacts_password() {
        let creds = Credentials::new("indra", "hunter2");
        let shown = format!("{creds:?}");
        assert!(shown.contains("indra"));
        assert!(!shown.contains("hunter2"));
    }
}
