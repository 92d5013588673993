use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::ModelError;

/// Field names of a user record, in serialization order.
pub const USER_FIELDS: [&str; 4] = ["first_name", "last_name", "userid", "groups"];

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct User {
    pub first_name: String,
    pub last_name: String,
    pub userid: String,
    pub groups: Vec<String>,
}

impl User {
    /// Validate an arbitrary JSON value against the user schema.
    ///
    /// The value must be an object with exactly the keys in [`USER_FIELDS`]; the
    /// name fields must be strings and `groups` an array of strings.
    pub fn from_value(value: &Value) -> Result<Self, ModelError> {
        let obj = value
            .as_object()
            .ok_or_else(|| ModelError::Validation("user record must be a JSON object".into()))?;
        check_keys(obj)?;

        Ok(Self {
            first_name: string_field(obj, "first_name")?,
            last_name: string_field(obj, "last_name")?,
            userid: string_field(obj, "userid")?,
            groups: string_list(&obj["groups"], "groups")?,
        })
    }

    pub fn is_member_of(&self, group: &str) -> bool {
        self.groups.iter().any(|g| g == group)
    }
}

fn check_keys(obj: &Map<String, Value>) -> Result<(), ModelError> {
    let missing: Vec<&str> = USER_FIELDS.iter().copied().filter(|f| !obj.contains_key(*f)).collect();
    let extra: Vec<&str> = obj
        .keys()
        .map(String::as_str)
        .filter(|k| !USER_FIELDS.contains(k))
        .collect();

    match (missing.is_empty(), extra.is_empty()) {
        (true, true) => Ok(()),
        (false, true) => Err(ModelError::Validation(format!("missing fields: {}", missing.join(", ")))),
        (true, false) => Err(ModelError::Validation(format!("unexpected fields: {}", extra.join(", ")))),
        (false, false) => Err(ModelError::Validation(format!(
            "missing fields: {}; unexpected fields: {}",
            missing.join(", "),
            extra.join(", ")
        ))),
    }
}

fn string_field(obj: &Map<String, Value>, name: &str) -> Result<String, ModelError> {
    obj[name]
        .as_str()
        .map(str::to_owned)
        .ok_or_else(|| ModelError::Validation(format!("{name} must be a string")))
}

/// Require `value` to be an array of strings.
pub(crate) fn string_list(value: &Value, what: &str) -> Result<Vec<String>, ModelError> {
    let items = value
        .as_array()
        .ok_or_else(|| ModelError::Validation(format!("{what} must be a list")))?;
    items
        .iter()
        .map(|v| {
            v.as_str()
                .map(str::to_owned)
                .ok_or_else(|| ModelError::Validation(format!("{what} must contain only strings")))
        })
        .collect()
}
