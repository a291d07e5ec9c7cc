/// Account representation and payload validation
///
/// Three entry points decode account payloads, one per operation:
///
/// - [`validate_registration`]: `POST /api/accounts/`
/// - [`validate_profile_update`]: owner update, `PATCH`/`PUT /api/accounts/<id>/`
/// - [`validate_activation`]: admin toggle, `PATCH /api/accounts/<id>/management/`

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};
use uuid::Uuid;
use validator::Validate;

use super::errors::FieldErrors;
use super::fields::FieldReader;
use crate::models::Account;

pub const USERNAME_TAKEN: &str = "A user with that username already exists.";
pub const ACTIVATION_ADMIN_ONLY: &str = "Only an administrator may change account activation.";
const INVALID_USERNAME: &str = "Enter a valid username. This value may contain only letters, \
     numbers, and @/./+/-/_ characters.";

/// Public account representation (never includes the password)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccountResponse {
    pub id: Uuid,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub is_seller: bool,
    pub date_joined: DateTime<Utc>,
    pub is_active: bool,
    pub is_superuser: bool,
}

impl From<&Account> for AccountResponse {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id,
            username: account.username.clone(),
            first_name: account.first_name.clone(),
            last_name: account.last_name.clone(),
            is_seller: account.is_seller,
            date_joined: account.date_joined,
            is_active: account.is_active,
            is_superuser: account.is_superuser,
        }
    }
}

/// Decoded account fields; `None` means absent from the request
#[derive(Debug, Clone, Default, PartialEq, Validate)]
pub struct AccountPayload {
    #[validate(length(max = 150, message = "Ensure this field has no more than 150 characters."))]
    pub username: Option<String>,

    /// Plaintext, hashed by the caller before storage
    pub password: Option<String>,

    #[validate(length(max = 150, message = "Ensure this field has no more than 150 characters."))]
    pub first_name: Option<String>,

    #[validate(length(max = 150, message = "Ensure this field has no more than 150 characters."))]
    pub last_name: Option<String>,

    pub is_seller: Option<bool>,

    pub is_active: Option<bool>,
}

fn is_valid_username(username: &str) -> bool {
    username
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_'))
}

fn read_profile(reader: &mut FieldReader<'_>) -> AccountPayload {
    let username = reader.string("username", true);
    if let Some(name) = &username {
        if !is_valid_username(name) {
            reader.reject("username", INVALID_USERNAME);
        }
    }

    AccountPayload {
        username,
        password: reader.password("password", true),
        first_name: reader.string("first_name", true),
        last_name: reader.string("last_name", true),
        is_seller: reader.boolean("is_seller", false),
        is_active: reader.boolean("is_active", false),
    }
}

/// Decodes a registration payload
///
/// `username`, `password`, `first_name` and `last_name` are required;
/// `is_seller` and `is_active` are optional. `id`, `date_joined` and
/// `is_superuser` are read-only and ignored.
pub fn validate_registration(data: &Map<String, Value>) -> Result<AccountPayload, FieldErrors> {
    let mut reader = FieldReader::new(data, false);
    let payload = read_profile(&mut reader);
    reader.finish(payload)
}

/// Decodes an owner's profile update
///
/// With `partial` unset (PUT) the registration fields are required. Sending
/// `is_active` is allowed only when it matches the current value.
pub fn validate_profile_update(
    data: &Map<String, Value>,
    partial: bool,
    current: &Account,
) -> Result<AccountPayload, FieldErrors> {
    let mut reader = FieldReader::new(data, partial);
    let payload = read_profile(&mut reader);

    if payload.is_active.map_or(false, |active| active != current.is_active) {
        reader.reject("is_active", ACTIVATION_ADMIN_ONLY);
    }

    reader.finish(payload)
}

/// Decodes an administrator's activation toggle
///
/// Only `is_active` is read; every other field is ignored. `Ok(None)` means
/// the account stays as it is.
pub fn validate_activation(data: &Map<String, Value>) -> Result<Option<bool>, FieldErrors> {
    let mut reader = FieldReader::new(data, true);
    let is_active = reader.boolean("is_active", false);

    let errors = reader.into_errors();
    errors.into_result().map(|()| is_active)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewAccount;
    use crate::serializers::errors::REQUIRED;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    fn current(is_active: bool) -> Account {
        Account::new(NewAccount {
            username: "ale".to_string(),
            password_hash: "hash".to_string(),
            first_name: "Alexandre".to_string(),
            last_name: "Alves".to_string(),
            is_seller: false,
            is_active,
            is_superuser: false,
        })
    }

    #[test]
    fn test_registration_requires_fields() {
        let errors = validate_registration(&object(json!({}))).unwrap_err();

        let fields: Vec<&str> = errors.fields().collect();
        assert_eq!(fields, vec!["first_name", "last_name", "password", "username"]);
        assert_eq!(errors.get("username"), Some(&[REQUIRED.to_string()][..]));
    }

    #[test]
    fn test_registration_ok() {
        let payload = validate_registration(&object(json!({
            "username": "ale",
            "password": "abcd",
            "first_name": "Alexandre",
            "last_name": "Alves",
            "is_seller": true,
            "is_superuser": true
        })))
        .unwrap();

        assert_eq!(payload.username.as_deref(), Some("ale"));
        assert_eq!(payload.password.as_deref(), Some("abcd"));
        assert_eq!(payload.is_seller, Some(true));
        assert_eq!(payload.is_active, None);
    }

    #[test]
    fn test_registration_rejects_bad_username() {
        let long = "a".repeat(151);
        let errors = validate_registration(&object(json!({
            "username": "no spaces!",
            "password": "abcd",
            "first_name": long,
            "last_name": "x"
        })))
        .unwrap_err();

        assert_eq!(errors.get("username"), Some(&[INVALID_USERNAME.to_string()][..]));
        assert!(errors.contains("first_name"));
        assert!(!errors.contains("last_name"));
    }

    #[test]
    fn test_profile_update_partial() {
        let account = current(true);
        let payload =
            validate_profile_update(&object(json!({"first_name": "Roberto"})), true, &account)
                .unwrap();

        assert_eq!(payload.first_name.as_deref(), Some("Roberto"));
        assert_eq!(payload.username, None);
    }

    #[test]
    fn test_profile_update_full_requires_fields() {
        let account = current(true);
        let errors =
            validate_profile_update(&object(json!({"first_name": "Roberto"})), false, &account)
                .unwrap_err();

        assert!(errors.contains("username"));
        assert!(errors.contains("password"));
        assert!(!errors.contains("first_name"));
    }

    #[test]
    fn test_profile_update_cannot_change_activation() {
        let account = current(true);

        let errors =
            validate_profile_update(&object(json!({"is_active": false})), true, &account)
                .unwrap_err();
        assert_eq!(
            errors.get("is_active"),
            Some(&[ACTIVATION_ADMIN_ONLY.to_string()][..])
        );

        assert!(validate_profile_update(&object(json!({"is_active": true})), true, &account).is_ok());
    }

    #[test]
    fn test_activation_reads_only_is_active() {
        let data = object(json!({"is_active": false, "username": "", "is_superuser": true}));
        assert_eq!(validate_activation(&data), Ok(Some(false)));

        assert_eq!(validate_activation(&object(json!({"first_name": "x"}))), Ok(None));

        let errors = validate_activation(&object(json!({"is_active": "sometimes"}))).unwrap_err();
        assert!(errors.contains("is_active"));
    }

    #[test]
    fn test_response_has_no_password() {
        let json = serde_json::to_value(AccountResponse::from(&current(true))).unwrap();
        let mut keys: Vec<&str> = json.as_object().unwrap().keys().map(String::as_str).collect();
        keys.sort();

        assert_eq!(
            keys,
            vec![
                "date_joined",
                "first_name",
                "id",
                "is_active",
                "is_seller",
                "is_superuser",
                "last_name",
                "username"
            ]
        );
    }
}
