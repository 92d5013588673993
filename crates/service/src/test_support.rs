use models::{Document, User};
use serde_json::{json, Value};

/// Document with a single user `jsmith` in `admins` and `users`.
pub fn seed_document() -> Document {
    Document {
        users: vec![User {
            first_name: "Joe".into(),
            last_name: "Smith".into(),
            userid: "jsmith".into(),
            groups: vec!["admins".into(), "users".into()],
        }],
        groups: vec!["admins".into(), "users".into()],
    }
}

pub fn user_body(userid: &str, groups: &[&str]) -> Value {
    json!({
        "first_name": "Test",
        "last_name": "User",
        "userid": userid,
        "groups": groups,
    })
}
