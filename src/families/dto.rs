use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use super::repo::Family;
use crate::documents::repo::Document;
use crate::tax::repo::TaxEntry;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Request body for family registration and admin-side family creation.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RegisterFamilyRequest {
    pub family_id: String,
    pub leader_name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub members: Vec<String>,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub phone: String,
}

/// Request body for family login.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct FamilyLoginRequest {
    pub family_id: String,
    pub password: String,
}

/// Approve/reject body; `id` is the internal record id.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApprovalRequest {
    pub id: Uuid,
}

/// Sanitized family profile. The password hash never leaves the server.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicFamily {
    pub id: Uuid,
    pub family_id: String,
    pub leader_name: String,
    pub members: Vec<String>,
    pub address: String,
    pub email: String,
    pub phone: String,
    pub approved: bool,
    pub tax_history: Vec<TaxEntry>,
    pub documents: Vec<Document>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl PublicFamily {
    pub fn from_parts(family: Family, tax_history: Vec<TaxEntry>, documents: Vec<Document>) -> Self {
        Self {
            id: family.id,
            family_id: family.family_id,
            leader_name: family.leader_name,
            members: family.members,
            address: family.address,
            email: family.email,
            phone: family.phone,
            approved: family.approved,
            tax_history,
            documents,
            created_at: family.created_at,
        }
    }
}

/// Response returned after family login.
#[derive(Debug, Serialize)]
pub struct FamilyAuthResponse {
    pub token: String,
    pub family: PublicFamily,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_validation() {
        assert!(is_valid_email("ravi.family@example.com"));
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("a b@example.com"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn register_request_applies_defaults() {
        let body = r#"{"familyId":"FAM010","leaderName":"Ravi Kumar",
                       "email":"ravi@example.com","password":"pw1"}"#;
        let req: RegisterFamilyRequest = serde_json::from_str(body).unwrap();
        assert!(req.members.is_empty());
        assert_eq!(req.address, "");
        assert_eq!(req.phone, "");
    }

    #[test]
    fn register_request_rejects_unknown_fields() {
        let body = r#"{"familyId":"FAM010","leaderName":"Ravi","email":"r@e.com",
                       "password":"pw1","taxAmount":500}"#;
        assert!(serde_json::from_str::<RegisterFamilyRequest>(body).is_err());
    }

    #[test]
    fn public_family_excludes_password_hash() {
        let family = Family {
            id: Uuid::new_v4(),
            family_id: "FAM001".into(),
            password_hash: "secret-hash".into(),
            leader_name: "Ravi Kumar".into(),
            members: vec!["Ravi Kumar".into()],
            address: "12 Main Street".into(),
            email: "ravi@example.com".into(),
            phone: "9876543210".into(),
            approved: false,
            created_at: OffsetDateTime::now_utc(),
            updated_at: OffsetDateTime::now_utc(),
        };
        let public = PublicFamily::from_parts(family, vec![], vec![]);
        let json = serde_json::to_string(&public).unwrap();
        assert!(!json.contains("secret-hash"));
        assert!(json.contains("\"familyId\":\"FAM001\""));
        assert!(json.contains("\"approved\":false"));
    }
}
