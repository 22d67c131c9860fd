use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: i32,
    pub email: String,
    /// Bcrypt hash, never the plaintext.
    #[serde(skip_serializing)]
    pub password: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountInfo {
    pub id: i32,
    pub account_id: i32,
    pub first_name: String,
    pub last_name: String,
    pub created_at: DateTime<Utc>,
}

/// Signup / PUT payload. Every mutable field is required: a PUT with a
/// missing field fails deserialization instead of silently keeping the
/// old value.
#[derive(Debug, Clone, Deserialize)]
pub struct AccountPut {
    pub email: String,
    pub password: String,
}

/// PATCH payload. `None` means "not provided" and leaves the persisted
/// value untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AccountPatch {
    pub email: Option<String>,
    pub password: Option<String>,
}

impl AccountPatch {
    /// Merge the provided fields into `account`. The password here is
    /// expected to already be hashed by the caller.
    pub fn apply(&self, account: &mut Account) {
        if let Some(email) = &self.email {
            account.email = email.clone();
        }
        if let Some(password) = &self.password {
            account.password = password.clone();
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AccountInfoPut {
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AccountInfoPatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl AccountInfoPatch {
    pub fn apply(&self, info: &mut AccountInfo) {
        if let Some(first_name) = &self.first_name {
            info.first_name = first_name.clone();
        }
        if let Some(last_name) = &self.last_name {
            info.last_name = last_name.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_info() -> AccountInfo {
        AccountInfo {
            id: 1,
            account_id: 7,
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn patch_merges_only_present_fields() {
        let mut info = sample_info();
        let patch: AccountInfoPatch =
            serde_json::from_str(r#"{"first_name": "Grace"}"#).unwrap();
        patch.apply(&mut info);
        assert_eq!(info.first_name, "Grace");
        assert_eq!(info.last_name, "Lovelace");
    }

    #[test]
    fn empty_patch_is_a_no_op() {
        let mut info = sample_info();
        let before = info.clone();
        AccountInfoPatch::default().apply(&mut info);
        assert_eq!(info.first_name, before.first_name);
        assert_eq!(info.last_name, before.last_name);
    }

    #[test]
    fn put_requires_every_field() {
        let err = serde_json::from_str::<AccountPut>(r#"{"email": "a@x.com"}"#);
        assert!(err.is_err());
    }

    #[test]
    fn account_never_serializes_password() {
        let account = Account {
            id: 1,
            email: "a@x.com".to_string(),
            password: "$2b$12$secret".to_string(),
            created_at: Utc::now(),
        };
        let json = serde_json::to_value(&account).unwrap();
        assert!(json.get("password").is_none());
    }
}
