//! User resource rules.
//!
//! Checks run in a fixed order: schema, target existence, referenced groups,
//! identity conflict. Nothing is mutated until every check has passed.

use models::{Document, User};
use serde_json::Value;

use crate::errors::ServiceError;

/// Look up a user record by userid.
pub fn get(doc: &Document, userid: &str) -> Result<User, ServiceError> {
    doc.user(userid)
        .cloned()
        .ok_or_else(|| ServiceError::not_found("user", userid))
}

/// Append a new user record built from `body`.
pub fn create(doc: &mut Document, body: &Value) -> Result<User, ServiceError> {
    let user = User::from_value(body)?;
    ensure_groups_exist(doc, &user)?;
    if doc.user(&user.userid).is_some() {
        return Err(ServiceError::Conflict(format!("user {} already exists", user.userid)));
    }
    doc.users.push(user.clone());
    Ok(user)
}

/// Remove a user record. Group names are untouched.
pub fn delete(doc: &mut Document, userid: &str) -> Result<User, ServiceError> {
    let idx = doc
        .user_position(userid)
        .ok_or_else(|| ServiceError::not_found("user", userid))?;
    Ok(doc.users.remove(idx))
}

/// Replace the record stored under `userid` with `body`.
///
/// The body's userid may differ from `userid`, which renames the user; the new
/// userid must not belong to another record.
pub fn replace(doc: &mut Document, userid: &str, body: &Value) -> Result<User, ServiceError> {
    let user = User::from_value(body)?;
    let idx = doc
        .user_position(userid)
        .ok_or_else(|| ServiceError::not_found("user", userid))?;
    ensure_groups_exist(doc, &user)?;
    if user.userid != userid && doc.user(&user.userid).is_some() {
        return Err(ServiceError::Conflict(format!("user {} already exists", user.userid)));
    }
    doc.users[idx] = user.clone();
    Ok(user)
}

fn ensure_groups_exist(doc: &Document, user: &User) -> Result<(), ServiceError> {
    let unknown = doc.unknown_groups(&user.groups);
    if unknown.is_empty() {
        Ok(())
    } else {
        Err(ServiceError::NotFound(format!("unknown groups: {}", unknown.join(", "))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{seed_document, user_body};
    use serde_json::json;

    #[test]
    fn get_existing_and_missing() {
        let doc = seed_document();
        assert_eq!(get(&doc, "jsmith").unwrap().first_name, "Joe");
        assert!(matches!(get(&doc, "shenely"), Err(ServiceError::NotFound(_))));
    }

    #[test]
    fn create_then_get_returns_same_record() {
        let mut doc = seed_document();
        let body = user_body("jdoe", &["admins"]);
        create(&mut doc, &body).expect("create");
        let fetched = get(&doc, "jdoe").expect("get");
        assert_eq!(serde_json::to_value(fetched).unwrap(), body);
        assert!(doc.check_integrity().is_ok());
    }

    #[test]
    fn create_rejects_bad_schema() {
        let mut doc = seed_document();
        let mut body = user_body("armstrong", &["admins", "users"]);
        body["middle_name"] = json!("Alden");
        assert!(matches!(create(&mut doc, &body), Err(ServiceError::BadRequest(_))));

        let body = json!({"first_name": "Michael", "last_name": "", "userid": "buzz", "groups": "users"});
        assert!(matches!(create(&mut doc, &body), Err(ServiceError::BadRequest(_))));
        assert_eq!(doc, seed_document());
    }

    #[test]
    fn create_unknown_group_is_not_found_before_conflict() {
        let mut doc = seed_document();
        // jsmith exists, but the unknown group is reported first
        let body = user_body("jsmith", &["users", "moon"]);
        assert_eq!(
            create(&mut doc, &body),
            Err(ServiceError::NotFound("unknown groups: moon".into()))
        );
        assert_eq!(doc, seed_document());
    }

    #[test]
    fn create_twice_conflicts_without_mutation() {
        let mut doc = seed_document();
        let body = user_body("jdoe", &["users"]);
        create(&mut doc, &body).expect("first create");
        let snapshot = doc.clone();
        assert!(matches!(create(&mut doc, &body), Err(ServiceError::Conflict(_))));
        assert_eq!(doc, snapshot);
    }

    #[test]
    fn delete_then_get_is_not_found() {
        let mut doc = seed_document();
        delete(&mut doc, "jsmith").expect("delete");
        assert!(matches!(get(&doc, "jsmith"), Err(ServiceError::NotFound(_))));
        assert_eq!(doc.groups, vec!["admins", "users"]);
        assert!(matches!(delete(&mut doc, "jsmith"), Err(ServiceError::NotFound(_))));
    }

    #[test]
    fn replace_updates_record() {
        let mut doc = seed_document();
        let body = json!({"first_name": "Joseph", "last_name": "Smith", "userid": "jsmith", "groups": ["users"]});
        replace(&mut doc, "jsmith", &body).expect("replace");
        let user = get(&doc, "jsmith").unwrap();
        assert_eq!(user.first_name, "Joseph");
        assert_eq!(user.groups, vec!["users"]);
    }

    #[test]
    fn replace_can_rename() {
        let mut doc = seed_document();
        replace(&mut doc, "jsmith", &user_body("jdoe", &["admins"])).expect("rename");
        assert!(get(&doc, "jsmith").is_err());
        assert_eq!(get(&doc, "jdoe").unwrap().groups, vec!["admins"]);
    }

    #[test]
    fn replace_rename_onto_existing_user_conflicts() {
        let mut doc = seed_document();
        create(&mut doc, &user_body("jdoe", &["users"])).unwrap();
        let snapshot = doc.clone();
        assert!(matches!(
            replace(&mut doc, "jsmith", &user_body("jdoe", &["users"])),
            Err(ServiceError::Conflict(_))
        ));
        assert_eq!(doc, snapshot);
    }

    #[test]
    fn replace_check_order() {
        let mut doc = seed_document();
        // schema first, even for a missing target
        let bad = json!({"userid": "ghost"});
        assert!(matches!(replace(&mut doc, "ghost", &bad), Err(ServiceError::BadRequest(_))));
        // then target existence
        assert_eq!(
            replace(&mut doc, "ghost", &user_body("ghost", &["moon"])),
            Err(ServiceError::not_found("user", "ghost"))
        );
        // then referenced groups, leaving the record unchanged
        assert_eq!(
            replace(&mut doc, "jsmith", &user_body("jsmith", &["moon"])),
            Err(ServiceError::NotFound("unknown groups: moon".into()))
        );
        assert_eq!(doc, seed_document());
    }
}
