//! Boundary validation for contact payloads and list filters.
//!
//! Request bodies arrive as untyped JSON and are checked field by field so
//! that a single response can report every problem at once. The same rules
//! serve both entry points:
//!
//! | Function | Input | Rules |
//! |----------|-------|-------|
//! | [`parse_new_contact`] | create body | required fields present and non-empty, enums valid, optional fields strings |
//! | [`parse_contact_edit`] | update body incl. `id` | `id` positive integer, supplied fields checked as above |
//! | [`parse_filters`] | list query parameters | enum-valued parameters must be members |
//!
//! Unknown keys are ignored. An `id` in a create body is ignored as well:
//! identifiers are always assigned by the store.

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::{FieldViolation, ValidationError};
use crate::models::{
    ContactField, ContactFilters, ContactGroup, ContactPatch, Gender, NewContact, SortDirection,
    SortField,
};

/// Whether absent required fields are an error (create) or mean "unchanged" (edit).
#[derive(Clone, Copy, PartialEq, Eq)]
enum Mode {
    Insert,
    Edit,
}

/// Outcome of checking one field of the body.
enum Checked<T> {
    Absent,
    Cleared,
    Set(T),
}

/// Raw list query parameters as they appear on the wire.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    pub group: Option<String>,
    pub search_term: Option<String>,
    pub sort_by: Option<String>,
    pub sort_direction: Option<String>,
}

/// Validate a create body.
pub fn parse_new_contact(body: &Value) -> Result<NewContact, ValidationError> {
    let obj = as_object(body)?;
    let mut v = Vec::new();

    let first_name = required_text(obj, ContactField::FirstName, Mode::Insert, &mut v);
    let last_name = required_text(obj, ContactField::LastName, Mode::Insert, &mut v);
    let phone_number = required_text(obj, ContactField::PhoneNumber, Mode::Insert, &mut v);
    let group = enum_field(obj, ContactField::Group, Mode::Insert, parse_group, &mut v);
    let gender = enum_field(obj, ContactField::Gender, Mode::Insert, parse_gender, &mut v);
    let mut optional = OptionalFields::read(obj, &mut v);

    if !v.is_empty() {
        return Err(ValidationError::new(v));
    }

    match (first_name, last_name, phone_number, group, gender) {
        (
            Checked::Set(first_name),
            Checked::Set(last_name),
            Checked::Set(phone_number),
            Checked::Set(group),
            Checked::Set(gender),
        ) => Ok(NewContact {
            first_name,
            last_name,
            phone_number,
            group,
            gender,
            position: optional.take_value(ContactField::Position),
            office_home_number: optional.take_value(ContactField::OfficeHomeNumber),
            additional_phone1: optional.take_value(ContactField::AdditionalPhone1),
            additional_phone2: optional.take_value(ContactField::AdditionalPhone2),
            additional_phone3: optional.take_value(ContactField::AdditionalPhone3),
            email: optional.take_value(ContactField::Email),
            notes: optional.take_value(ContactField::Notes),
            address: optional.take_value(ContactField::Address),
        }),
        // every non-Set outcome in insert mode records a violation above
        _ => Err(ValidationError::single("body", "incomplete contact")),
    }
}

/// Validate an update body. The body must carry the target `id`; callers
/// that take the id from elsewhere (a URL path) merge it in first.
pub fn parse_contact_edit(body: &Value) -> Result<(i64, ContactPatch), ValidationError> {
    let obj = as_object(body)?;
    let mut v = Vec::new();

    let id = match obj.get("id") {
        Some(Value::Number(n)) => match n.as_i64() {
            Some(id) if id > 0 => Some(id),
            _ => {
                v.push(FieldViolation::new("id", "id must be a positive integer"));
                None
            }
        },
        Some(_) => {
            v.push(FieldViolation::new("id", "id must be a positive integer"));
            None
        }
        None => {
            v.push(FieldViolation::new("id", "id is required"));
            None
        }
    };

    let first_name = required_text(obj, ContactField::FirstName, Mode::Edit, &mut v);
    let last_name = required_text(obj, ContactField::LastName, Mode::Edit, &mut v);
    let phone_number = required_text(obj, ContactField::PhoneNumber, Mode::Edit, &mut v);
    let group = enum_field(obj, ContactField::Group, Mode::Edit, parse_group, &mut v);
    let gender = enum_field(obj, ContactField::Gender, Mode::Edit, parse_gender, &mut v);
    let mut optional = OptionalFields::read(obj, &mut v);

    match id {
        Some(id) if v.is_empty() => Ok((
            id,
            ContactPatch {
                first_name: first_name.into_update(),
                last_name: last_name.into_update(),
                phone_number: phone_number.into_update(),
                group: group.into_update(),
                gender: gender.into_update(),
                position: optional.take_update(ContactField::Position),
                office_home_number: optional.take_update(ContactField::OfficeHomeNumber),
                additional_phone1: optional.take_update(ContactField::AdditionalPhone1),
                additional_phone2: optional.take_update(ContactField::AdditionalPhone2),
                additional_phone3: optional.take_update(ContactField::AdditionalPhone3),
                email: optional.take_update(ContactField::Email),
                notes: optional.take_update(ContactField::Notes),
                address: optional.take_update(ContactField::Address),
            },
        )),
        _ => Err(ValidationError::new(v)),
    }
}

/// Validate list query parameters. Empty strings count as absent.
pub fn parse_filters(params: &ListParams) -> Result<ContactFilters, ValidationError> {
    let mut v = Vec::new();
    let mut filters = ContactFilters::default();

    if let Some(raw) = non_empty(&params.group) {
        match parse_group(raw) {
            Ok(g) => filters.group = Some(g),
            Err(msg) => v.push(FieldViolation::new("group", msg)),
        }
    }
    if let Some(raw) = non_empty(&params.search_term) {
        match check_search_term(raw) {
            Ok(()) => filters.search_term = Some(raw.to_string()),
            Err(msg) => v.push(FieldViolation::new("searchTerm", msg)),
        }
    }
    if let Some(raw) = non_empty(&params.sort_by) {
        match raw.parse::<SortField>() {
            Ok(f) => filters.sort_by = Some(f),
            Err(_) => v.push(FieldViolation::new(
                "sortBy",
                format!(
                    "invalid sort field: expected one of {}",
                    SortField::ALL.map(|f| f.as_str()).join(", ")
                ),
            )),
        }
    }
    if let Some(raw) = non_empty(&params.sort_direction) {
        match raw.parse::<SortDirection>() {
            Ok(d) => filters.sort_direction = Some(d),
            Err(_) => v.push(FieldViolation::new(
                "sortDirection",
                "invalid sort direction: expected one of asc, desc",
            )),
        }
    }

    if v.is_empty() {
        Ok(filters)
    } else {
        Err(ValidationError::new(v))
    }
}

/// Search terms are capped so the SQLite `LIKE` pattern stays well under
/// its complexity limit.
pub const MAX_SEARCH_TERM_CHARS: usize = 256;

/// A search term must fit the cap and carry no NUL, which SQLite treats as
/// the end of the pattern.
pub fn check_search_term(raw: &str) -> Result<(), String> {
    if raw.contains('\0') {
        return Err("search term must not contain NUL characters".to_string());
    }
    if raw.chars().count() > MAX_SEARCH_TERM_CHARS {
        return Err(format!(
            "search term must be at most {} characters",
            MAX_SEARCH_TERM_CHARS
        ));
    }
    Ok(())
}

fn non_empty(raw: &Option<String>) -> Option<&str> {
    raw.as_deref().filter(|s| !s.is_empty())
}

fn as_object(body: &Value) -> Result<&Map<String, Value>, ValidationError> {
    body.as_object()
        .ok_or_else(|| ValidationError::single("body", "request body must be a JSON object"))
}

fn required_message(field: ContactField) -> &'static str {
    match field {
        ContactField::FirstName => "first name is required",
        ContactField::LastName => "last name is required",
        ContactField::PhoneNumber => "phone number is required",
        ContactField::Group => "group is required",
        ContactField::Gender => "gender is required",
        _ => "value is required",
    }
}

fn required_text(
    obj: &Map<String, Value>,
    field: ContactField,
    mode: Mode,
    violations: &mut Vec<FieldViolation>,
) -> Checked<String> {
    let name = field.json_name();
    match obj.get(name) {
        None if mode == Mode::Edit => Checked::Absent,
        None | Some(Value::Null) => {
            violations.push(FieldViolation::new(name, required_message(field)));
            Checked::Absent
        }
        Some(Value::String(s)) if s.trim().is_empty() => {
            violations.push(FieldViolation::new(name, required_message(field)));
            Checked::Absent
        }
        Some(Value::String(s)) => Checked::Set(s.clone()),
        Some(_) => {
            violations.push(FieldViolation::new(name, "must be a string"));
            Checked::Absent
        }
    }
}

fn enum_field<T>(
    obj: &Map<String, Value>,
    field: ContactField,
    mode: Mode,
    parse: fn(&str) -> Result<T, String>,
    violations: &mut Vec<FieldViolation>,
) -> Checked<T> {
    let name = field.json_name();
    match obj.get(name) {
        None if mode == Mode::Edit => Checked::Absent,
        None | Some(Value::Null) => {
            violations.push(FieldViolation::new(name, required_message(field)));
            Checked::Absent
        }
        Some(Value::String(s)) => match parse(s) {
            Ok(value) => Checked::Set(value),
            Err(msg) => {
                violations.push(FieldViolation::new(name, msg));
                Checked::Absent
            }
        },
        // a non-string JSON value never spells an enum key
        Some(other) => {
            if let Err(msg) = parse(&other.to_string()) {
                violations.push(FieldViolation::new(name, msg));
            }
            Checked::Absent
        }
    }
}

fn parse_group(raw: &str) -> Result<ContactGroup, String> {
    raw.parse::<ContactGroup>().map_err(|_| {
        format!(
            "invalid group: expected one of {}",
            ContactGroup::ALL.map(|g| g.as_str()).join(", ")
        )
    })
}

fn parse_gender(raw: &str) -> Result<Gender, String> {
    raw.parse::<Gender>().map_err(|_| {
        format!(
            "invalid gender: expected one of {}",
            Gender::ALL.map(|g| g.as_str()).join(", ")
        )
    })
}

impl<T> Checked<T> {
    /// Required fields never clear; `Cleared` only arises for optional ones.
    fn into_update(self) -> Option<T> {
        match self {
            Checked::Set(v) => Some(v),
            Checked::Absent | Checked::Cleared => None,
        }
    }
}

/// The optional string attributes of a body, checked in one pass.
struct OptionalFields {
    values: Vec<(ContactField, Checked<String>)>,
}

impl OptionalFields {
    fn read(obj: &Map<String, Value>, violations: &mut Vec<FieldViolation>) -> Self {
        let values = ContactField::ALL
            .into_iter()
            .filter(|f| !f.is_required())
            .map(|field| {
                let checked = match obj.get(field.json_name()) {
                    None => Checked::Absent,
                    Some(Value::Null) => Checked::Cleared,
                    Some(Value::String(s)) => Checked::Set(s.clone()),
                    Some(_) => {
                        violations.push(FieldViolation::new(field.json_name(), "must be a string"));
                        Checked::Absent
                    }
                };
                (field, checked)
            })
            .collect();
        Self { values }
    }

    fn take(&mut self, field: ContactField) -> Checked<String> {
        self.values
            .iter_mut()
            .find(|(f, _)| *f == field)
            .map(|(_, c)| std::mem::replace(c, Checked::Absent))
            .unwrap_or(Checked::Absent)
    }

    /// Value for a create: absent and null both mean "not set".
    fn take_value(&mut self, field: ContactField) -> Option<String> {
        match self.take(field) {
            Checked::Set(s) => Some(s),
            Checked::Absent | Checked::Cleared => None,
        }
    }

    /// Value for an update: null clears, absent leaves untouched.
    fn take_update(&mut self, field: ContactField) -> Option<Option<String>> {
        match self.take(field) {
            Checked::Set(s) => Some(Some(s)),
            Checked::Cleared => Some(None),
            Checked::Absent => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid_body() -> Value {
        json!({
            "firstName": "Ali",
            "lastName": "Rezaei",
            "phoneNumber": "09121234567",
            "group": "family",
            "gender": "male"
        })
    }

    #[test]
    fn test_insert_accepts_minimal_contact() {
        let c = parse_new_contact(&valid_body()).unwrap();
        assert_eq!(c.first_name, "Ali");
        assert_eq!(c.group, ContactGroup::Family);
        assert_eq!(c.gender, Gender::Male);
        assert_eq!(c.email, None);
    }

    #[test]
    fn test_insert_reads_optional_fields_and_ignores_id() {
        let mut body = valid_body();
        body["id"] = json!(42);
        body["email"] = json!("ali@example.com");
        body["notes"] = Value::Null;
        body["unexpected"] = json!(true);
        let c = parse_new_contact(&body).unwrap();
        assert_eq!(c.email.as_deref(), Some("ali@example.com"));
        assert_eq!(c.notes, None);
    }

    #[test]
    fn test_insert_reports_every_violation() {
        let body = json!({
            "firstName": "",
            "phoneNumber": 912,
            "group": "unknown",
            "gender": "robot",
            "email": 5
        });
        let err = parse_new_contact(&body).unwrap_err();
        for field in ["firstName", "lastName", "phoneNumber", "group", "gender", "email"] {
            assert!(err.has_field(field), "missing violation for {field}: {err}");
        }
        let group = err.violations.iter().find(|v| v.field == "group").unwrap();
        assert!(group.message.contains("invalid group"));
    }

    #[test]
    fn test_insert_rejects_whitespace_required_field() {
        let mut body = valid_body();
        body["lastName"] = json!("   ");
        let err = parse_new_contact(&body).unwrap_err();
        assert_eq!(err.violations.len(), 1);
        assert_eq!(err.violations[0].field, "lastName");
    }

    #[test]
    fn test_insert_rejects_non_object() {
        let err = parse_new_contact(&json!([1, 2])).unwrap_err();
        assert!(err.has_field("body"));
    }

    #[test]
    fn test_edit_requires_positive_id() {
        let err = parse_contact_edit(&json!({ "firstName": "Sara" })).unwrap_err();
        assert!(err.has_field("id"));
        let err = parse_contact_edit(&json!({ "id": 0 })).unwrap_err();
        assert!(err.has_field("id"));
        let err = parse_contact_edit(&json!({ "id": "3" })).unwrap_err();
        assert!(err.has_field("id"));
    }

    #[test]
    fn test_edit_checks_only_supplied_fields() {
        let (id, patch) =
            parse_contact_edit(&json!({ "id": 3, "group": "doctors", "email": null })).unwrap();
        assert_eq!(id, 3);
        assert_eq!(patch.group, Some(ContactGroup::Doctors));
        assert_eq!(patch.email, Some(None));
        assert_eq!(patch.first_name, None);
        assert_eq!(patch.position, None);
    }

    #[test]
    fn test_edit_with_only_id_is_empty_patch() {
        let (_, patch) = parse_contact_edit(&json!({ "id": 9 })).unwrap();
        assert!(patch.is_empty());
    }

    #[test]
    fn test_edit_rejects_clearing_required_field() {
        let err = parse_contact_edit(&json!({ "id": 1, "lastName": null, "gender": "x" }))
            .unwrap_err();
        assert!(err.has_field("lastName"));
        assert!(err.has_field("gender"));
    }

    #[test]
    fn test_filters_parse() {
        let params = ListParams {
            group: Some("doctors".into()),
            search_term: Some("ahm".into()),
            sort_by: Some("firstName".into()),
            sort_direction: Some("desc".into()),
        };
        let f = parse_filters(&params).unwrap();
        assert_eq!(f.group, Some(ContactGroup::Doctors));
        assert_eq!(f.search_term.as_deref(), Some("ahm"));
        assert_eq!(f.sort_by, Some(SortField::FirstName));
        assert_eq!(f.sort_direction, Some(SortDirection::Desc));
    }

    #[test]
    fn test_filters_empty_params_are_absent() {
        let params = ListParams {
            group: Some(String::new()),
            search_term: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(parse_filters(&params).unwrap(), ContactFilters::default());
    }

    #[test]
    fn test_filters_reject_unknown_values() {
        let params = ListParams {
            group: Some("پزشکان".into()),
            sort_by: Some("dateAdded".into()),
            sort_direction: Some("up".into()),
            ..Default::default()
        };
        let err = parse_filters(&params).unwrap_err();
        assert!(err.has_field("group"));
        assert!(err.has_field("sortBy"));
        assert!(err.has_field("sortDirection"));
        let sort_by = err.violations.iter().find(|v| v.field == "sortBy").unwrap();
        assert!(sort_by.message.ends_with("lastName, firstName"));
    }

    #[test]
    fn test_filters_reject_nul_in_search() {
        let params = ListParams {
            search_term: Some("a\0b".into()),
            ..Default::default()
        };
        let err = parse_filters(&params).unwrap_err();
        assert!(err.has_field("searchTerm"));
    }

    #[test]
    fn test_filters_cap_search_length_in_chars() {
        let at_cap = ListParams {
            search_term: Some("ی".repeat(MAX_SEARCH_TERM_CHARS)),
            ..Default::default()
        };
        assert!(parse_filters(&at_cap).is_ok());

        let over = ListParams {
            search_term: Some("a".repeat(MAX_SEARCH_TERM_CHARS + 1)),
            ..Default::default()
        };
        let err = parse_filters(&over).unwrap_err();
        assert_eq!(err.violations[0].field, "searchTerm");
        assert!(err.violations[0].message.contains("at most 256"));
    }
}
