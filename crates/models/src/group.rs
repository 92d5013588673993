use serde_json::Value;

use crate::errors::ModelError;
use crate::user::string_list;

/// Validate the body of a membership update: a JSON list of userids.
pub fn parse_member_list(value: &Value) -> Result<Vec<String>, ModelError> {
    string_list(value, "member list")
}
