//! The users resource contract: one case per HTTP verb.

use probe_domain::{Expectation, HttpMethod};
use serde::{Deserialize, Serialize};

use crate::generator::IdentifierGenerator;

/// Phone number submitted with every created user.
pub const CREATE_PHONE: &str = "1-770-736-8031 x56442";

/// Where the suite points and which seed resource it reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuiteConfig {
    /// Absolute URL prefix; requests go to `{base_url}/users[/{id}]`.
    pub base_url: String,
    /// Identifier of an existing user resource.
    pub resource_id: u64,
    /// Expected `name` of that resource.
    pub resource_name: String,
}

impl SuiteConfig {
    /// Creates a suite configuration.
    #[must_use]
    pub fn new(base_url: impl Into<String>, resource_id: u64, resource_name: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            resource_id,
            resource_name: resource_name.into(),
        }
    }

    /// Joins `path` onto the base URL.
    #[must_use]
    pub fn url_for(&self, path: &str) -> String {
        format!("{}{path}", self.base_url.trim_end_matches('/'))
    }

    fn resource_path(&self) -> String {
        format!("/users/{}", self.resource_id)
    }
}

/// User fields submitted on create and update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPayload {
    /// Display name.
    pub name: String,
    /// Login name.
    pub username: String,
    /// Email address.
    pub email: String,
    /// Phone number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Website host.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
}

impl UserPayload {
    /// Payload for a new user built around the random `suffix`.
    #[must_use]
    pub fn for_create(suffix: &str) -> Self {
        Self {
            name: format!("Test User {suffix}"),
            username: format!("testuser_{suffix}"),
            email: format!("test{suffix}@example.com"),
            phone: Some(CREATE_PHONE.to_string()),
            website: Some(format!("{suffix}.org")),
        }
    }

    /// Payload replacing an existing user, built around the random `suffix`.
    #[must_use]
    pub fn for_update(suffix: &str) -> Self {
        Self {
            name: format!("Updated User {suffix}"),
            username: format!("updated_{suffix}"),
            email: format!("updated{suffix}@example.com"),
            phone: None,
            website: None,
        }
    }

    /// Serializes the payload as a JSON object.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!(self)
    }
}

/// One SETUP -> REQUEST -> VALIDATE -> REPORT cycle against one verb.
#[derive(Debug, Clone, PartialEq)]
pub struct ContractCase {
    /// Case name, used for filtering and in the summary.
    pub name: String,
    /// What the request does, for the INFO trace.
    pub summary: String,
    /// HTTP method.
    pub method: HttpMethod,
    /// Path below the base URL.
    pub path: String,
    /// JSON body for POST and PUT.
    pub payload: Option<UserPayload>,
    /// Checks applied to the response.
    pub expectation: Expectation,
}

/// `GET /users/{id}`: the seed resource exists with its documented shape.
#[must_use]
pub fn get_user(config: &SuiteConfig) -> ContractCase {
    ContractCase {
        name: "get_user".to_string(),
        summary: "Performing GET request for a user".to_string(),
        method: HttpMethod::Get,
        path: config.resource_path(),
        payload: None,
        expectation: Expectation::status(200)
            .require_keys([
                "id", "name", "username", "email", "address", "phone", "website", "company",
            ])
            .field_equals("id", config.resource_id)
            .field_equals("name", config.resource_name.as_str()),
    }
}

/// `POST /users`: a new user is created.
///
/// Contract assumption: the service echoes the submitted `name` and
/// `username` and assigns an `id`. This is asserted, not guaranteed here.
#[must_use]
pub fn create_user(generator: &mut IdentifierGenerator) -> ContractCase {
    let payload = UserPayload::for_create(&generator.generate());
    ContractCase {
        name: "create_user".to_string(),
        summary: "Performing POST request to create a user".to_string(),
        method: HttpMethod::Post,
        path: "/users".to_string(),
        expectation: Expectation::status(201)
            .require_keys(["id"])
            .field_equals("name", payload.name.as_str())
            .field_equals("username", payload.username.as_str()),
        payload: Some(payload),
    }
}

/// `PUT /users/{id}`: the seed user is replaced.
///
/// Contract assumption: the service echoes the submitted fields back.
#[must_use]
pub fn update_user(config: &SuiteConfig, generator: &mut IdentifierGenerator) -> ContractCase {
    let payload = UserPayload::for_update(&generator.generate());
    ContractCase {
        name: "update_user".to_string(),
        summary: "Performing PUT request to update a user".to_string(),
        method: HttpMethod::Put,
        path: config.resource_path(),
        expectation: Expectation::status(200)
            .require_keys(["name", "username", "email", "id"])
            .field_equals("name", payload.name.as_str())
            .field_equals("username", payload.username.as_str()),
        payload: Some(payload),
    }
}

/// `DELETE /users/{id}`: only the status is checked.
#[must_use]
pub fn delete_user(config: &SuiteConfig) -> ContractCase {
    ContractCase {
        name: "delete_user".to_string(),
        summary: "Performing DELETE request to remove a user".to_string(),
        method: HttpMethod::Delete,
        path: config.resource_path(),
        payload: None,
        expectation: Expectation::status(200),
    }
}

/// The full users contract, in execution order.
#[must_use]
pub fn user_cases(config: &SuiteConfig, generator: &mut IdentifierGenerator) -> Vec<ContractCase> {
    vec![
        get_user(config),
        create_user(generator),
        update_user(config, generator),
        delete_user(config),
    ]
}

/// Keeps the cases whose name contains `filter`; all cases when `None`.
#[must_use]
pub fn select_cases(cases: Vec<ContractCase>, filter: Option<&str>) -> Vec<ContractCase> {
    match filter {
        Some(pattern) => cases
            .into_iter()
            .filter(|case| case.name.contains(pattern))
            .collect(),
        None => cases,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn config() -> SuiteConfig {
        SuiteConfig::new("https://jsonplaceholder.typicode.com/", 1, "Leanne Graham")
    }

    #[test]
    fn test_url_for_trims_trailing_slash() {
        assert_eq!(
            config().url_for("/users/1"),
            "https://jsonplaceholder.typicode.com/users/1"
        );
    }

    #[test]
    fn test_create_payload_shape() {
        let payload = UserPayload::for_create("abcdefgh");
        assert_eq!(
            payload.to_json(),
            json!({
                "name": "Test User abcdefgh",
                "username": "testuser_abcdefgh",
                "email": "testabcdefgh@example.com",
                "phone": "1-770-736-8031 x56442",
                "website": "abcdefgh.org",
            })
        );
    }

    #[test]
    fn test_update_payload_omits_optional_fields() {
        let payload = UserPayload::for_update("abcdefgh");
        assert_eq!(
            payload.to_json(),
            json!({
                "name": "Updated User abcdefgh",
                "username": "updated_abcdefgh",
                "email": "updatedabcdefgh@example.com",
            })
        );
    }

    #[test]
    fn test_user_cases_order_and_verbs() {
        let cases = user_cases(&config(), &mut IdentifierGenerator::seeded(7));
        let shape: Vec<(&str, HttpMethod, &str)> = cases
            .iter()
            .map(|c| (c.name.as_str(), c.method, c.path.as_str()))
            .collect();
        assert_eq!(
            shape,
            vec![
                ("get_user", HttpMethod::Get, "/users/1"),
                ("create_user", HttpMethod::Post, "/users"),
                ("update_user", HttpMethod::Put, "/users/1"),
                ("delete_user", HttpMethod::Delete, "/users/1"),
            ]
        );
    }

    #[test]
    fn test_get_user_expectation() {
        let case = get_user(&config());
        assert_eq!(case.expectation.status, 200);
        assert_eq!(case.expectation.required_keys.len(), 8);
        assert_eq!(case.expectation.field_equalities.get("id"), Some(&json!(1)));
        assert_eq!(
            case.expectation.field_equalities.get("name"),
            Some(&json!("Leanne Graham"))
        );
    }

    #[test]
    fn test_create_expectation_echoes_payload() {
        let case = create_user(&mut IdentifierGenerator::seeded(1));
        let payload = case.payload.clone().unwrap();
        assert_eq!(case.expectation.status, 201);
        assert_eq!(
            case.expectation.field_equalities.get("username"),
            Some(&json!(payload.username))
        );
        assert!(case.expectation.required_keys.contains("id"));
    }

    #[test]
    fn test_delete_checks_status_only() {
        let case = delete_user(&config());
        assert!(!case.expectation.inspects_body());
        assert!(case.payload.is_none());
    }

    #[test]
    fn test_consecutive_payloads_differ() {
        let mut generator = IdentifierGenerator::seeded(3);
        let first = create_user(&mut generator).payload.unwrap();
        let second = create_user(&mut generator).payload.unwrap();
        assert_ne!(first.name, second.name);
    }

    #[test]
    fn test_select_cases() {
        let cases = user_cases(&config(), &mut IdentifierGenerator::seeded(0));
        let selected = select_cases(cases.clone(), Some("patch"));
        assert!(selected.is_empty());

        let selected = select_cases(cases.clone(), Some("create"));
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].name, "create_user");

        assert_eq!(select_cases(cases, None).len(), 4);
    }
}
