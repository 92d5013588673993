//! Group resource rules. Membership is stored on the user records, so group
//! deletion and membership updates rewrite `User::groups`.

use models::{group, Document};
use serde_json::Value;

use crate::errors::ServiceError;

/// Userids of the members of `name`.
pub fn get(doc: &Document, name: &str) -> Result<Vec<String>, ServiceError> {
    if !doc.has_group(name) {
        return Err(ServiceError::not_found("group", name));
    }
    Ok(doc.members_of(name))
}

/// Add an empty group. `None` means the submission had no `name` field.
pub fn create(doc: &mut Document, name: Option<&str>) -> Result<(), ServiceError> {
    let name = name.ok_or_else(|| ServiceError::BadRequest("missing field: name".into()))?;
    if doc.has_group(name) {
        return Err(ServiceError::Conflict(format!("group {name} already exists")));
    }
    doc.groups.push(name.to_owned());
    Ok(())
}

/// Remove a group and strip it from every user. Returns the number of users touched.
pub fn delete(doc: &mut Document, name: &str) -> Result<usize, ServiceError> {
    let idx = doc
        .groups
        .iter()
        .position(|g| g == name)
        .ok_or_else(|| ServiceError::not_found("group", name))?;
    doc.groups.remove(idx);

    let mut touched = 0;
    for user in doc.users.iter_mut().filter(|u| u.is_member_of(name)) {
        user.groups.retain(|g| g != name);
        touched += 1;
    }
    Ok(touched)
}

/// Add `name` to every listed user that exists.
///
/// `body` is `None` when the request body was not valid JSON. An empty list is
/// NotFound; a list in which no userid resolves is BadRequest. Unknown userids
/// are skipped once at least one resolves. Returns the userids that joined.
pub fn replace_membership(
    doc: &mut Document,
    name: &str,
    body: Option<&Value>,
) -> Result<Vec<String>, ServiceError> {
    if !doc.has_group(name) {
        return Err(ServiceError::not_found("group", name));
    }
    let body = body.ok_or_else(|| ServiceError::BadRequest("member list must be JSON".into()))?;
    let userids = group::parse_member_list(body)?;
    if userids.is_empty() {
        return Err(ServiceError::NotFound("member list is empty".into()));
    }

    let resolved: Vec<usize> = doc
        .users
        .iter()
        .enumerate()
        .filter(|(_, u)| userids.contains(&u.userid))
        .map(|(i, _)| i)
        .collect();
    if resolved.is_empty() {
        return Err(ServiceError::BadRequest(format!("no such users: {}", userids.join(", "))));
    }

    let mut joined = Vec::new();
    for i in resolved {
        let user = &mut doc.users[i];
        if !user.is_member_of(name) {
            user.groups.push(name.to_owned());
            joined.push(user.userid.clone());
        }
    }
    Ok(joined)
}
