//! Core data models used throughout the contact book.
//!
//! [`Contact`] is the only persisted entity. [`NewContact`] and
//! [`ContactPatch`] are the validated shapes accepted by the create and
//! update operations, and [`ContactFilters`] narrows and orders a list query.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// The fixed set of labels a contact can be filed under.
///
/// A group is a plain label stored on the contact, not a separate entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactGroup {
    Family,
    Colleagues,
    Friends,
    Doctors,
    Others,
}

impl ContactGroup {
    pub const ALL: [ContactGroup; 5] = [
        ContactGroup::Family,
        ContactGroup::Colleagues,
        ContactGroup::Friends,
        ContactGroup::Doctors,
        ContactGroup::Others,
    ];

    /// Stored/wire key, e.g. `"doctors"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            ContactGroup::Family => "family",
            ContactGroup::Colleagues => "colleagues",
            ContactGroup::Friends => "friends",
            ContactGroup::Doctors => "doctors",
            ContactGroup::Others => "others",
        }
    }

    /// Display label shown to the user. Never accepted as input.
    pub fn label(&self) -> &'static str {
        match self {
            ContactGroup::Family => "خانواده",
            ContactGroup::Colleagues => "همکاران",
            ContactGroup::Friends => "دوستان",
            ContactGroup::Doctors => "پزشکان",
            ContactGroup::Others => "سایر",
        }
    }
}

impl fmt::Display for ContactGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContactGroup {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ContactGroup::ALL
            .into_iter()
            .find(|g| g.as_str() == s)
            .ok_or_else(|| UnknownVariant(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub const ALL: [Gender; 3] = [Gender::Male, Gender::Female, Gender::Other];

    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Other => "other",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Gender::Male => "مرد",
            Gender::Female => "زن",
            Gender::Other => "سایر",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Gender::ALL
            .into_iter()
            .find(|g| g.as_str() == s)
            .ok_or_else(|| UnknownVariant(s.to_string()))
    }
}

/// Returned when a string is not a member of one of the fixed enumerations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown value: {0}")]
pub struct UnknownVariant(pub String);

/// A persisted contact record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
    pub group: ContactGroup,
    pub position: Option<String>,
    pub office_home_number: Option<String>,
    pub gender: Gender,
    pub additional_phone1: Option<String>,
    pub additional_phone2: Option<String>,
    pub additional_phone3: Option<String>,
    pub email: Option<String>,
    pub notes: Option<String>,
    pub address: Option<String>,
}

impl Contact {
    /// Build the stored record for a freshly assigned id.
    pub fn from_new(id: i64, new: NewContact) -> Self {
        Self {
            id,
            first_name: new.first_name,
            last_name: new.last_name,
            phone_number: new.phone_number,
            group: new.group,
            position: new.position,
            office_home_number: new.office_home_number,
            gender: new.gender,
            additional_phone1: new.additional_phone1,
            additional_phone2: new.additional_phone2,
            additional_phone3: new.additional_phone3,
            email: new.email,
            notes: new.notes,
            address: new.address,
        }
    }

    /// Merge the supplied fields of `patch` onto this record.
    pub fn apply(&mut self, patch: &ContactPatch) {
        if let Some(v) = &patch.first_name {
            self.first_name = v.clone();
        }
        if let Some(v) = &patch.last_name {
            self.last_name = v.clone();
        }
        if let Some(v) = &patch.phone_number {
            self.phone_number = v.clone();
        }
        if let Some(v) = patch.group {
            self.group = v;
        }
        if let Some(v) = patch.gender {
            self.gender = v;
        }
        let optional = [
            (&mut self.position, &patch.position),
            (&mut self.office_home_number, &patch.office_home_number),
            (&mut self.additional_phone1, &patch.additional_phone1),
            (&mut self.additional_phone2, &patch.additional_phone2),
            (&mut self.additional_phone3, &patch.additional_phone3),
            (&mut self.email, &patch.email),
            (&mut self.notes, &patch.notes),
            (&mut self.address, &patch.address),
        ];
        for (slot, update) in optional {
            if let Some(v) = update {
                *slot = v.clone();
            }
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// A validated contact ready to be created. The store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewContact {
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
    pub group: ContactGroup,
    pub position: Option<String>,
    pub office_home_number: Option<String>,
    pub gender: Gender,
    pub additional_phone1: Option<String>,
    pub additional_phone2: Option<String>,
    pub additional_phone3: Option<String>,
    pub email: Option<String>,
    pub notes: Option<String>,
    pub address: Option<String>,
}

impl NewContact {
    /// A contact with only the required fields set.
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        phone_number: impl Into<String>,
        group: ContactGroup,
        gender: Gender,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            phone_number: phone_number.into(),
            group,
            position: None,
            office_home_number: None,
            gender,
            additional_phone1: None,
            additional_phone2: None,
            additional_phone3: None,
            email: None,
            notes: None,
            address: None,
        }
    }

    /// Column/value pairs in table order, for inserts.
    pub fn columns(&self) -> Vec<(ContactField, Option<&str>)> {
        vec![
            (ContactField::FirstName, Some(self.first_name.as_str())),
            (ContactField::LastName, Some(self.last_name.as_str())),
            (ContactField::PhoneNumber, Some(self.phone_number.as_str())),
            (ContactField::Group, Some(self.group.as_str())),
            (ContactField::Position, self.position.as_deref()),
            (ContactField::OfficeHomeNumber, self.office_home_number.as_deref()),
            (ContactField::Gender, Some(self.gender.as_str())),
            (ContactField::AdditionalPhone1, self.additional_phone1.as_deref()),
            (ContactField::AdditionalPhone2, self.additional_phone2.as_deref()),
            (ContactField::AdditionalPhone3, self.additional_phone3.as_deref()),
            (ContactField::Email, self.email.as_deref()),
            (ContactField::Notes, self.notes.as_deref()),
            (ContactField::Address, self.address.as_deref()),
        ]
    }
}

/// A partial update. `None` leaves a field untouched.
///
/// Optional attributes use a nested option: `Some(None)` clears the value,
/// `Some(Some(v))` sets it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactPatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_number: Option<String>,
    pub group: Option<ContactGroup>,
    pub position: Option<Option<String>>,
    pub office_home_number: Option<Option<String>>,
    pub gender: Option<Gender>,
    pub additional_phone1: Option<Option<String>>,
    pub additional_phone2: Option<Option<String>>,
    pub additional_phone3: Option<Option<String>>,
    pub email: Option<Option<String>>,
    pub notes: Option<Option<String>>,
    pub address: Option<Option<String>>,
}

impl ContactPatch {
    pub fn is_empty(&self) -> bool {
        self.assignments().is_empty()
    }

    /// The supplied fields only, in table order.
    pub fn assignments(&self) -> Vec<(ContactField, Option<&str>)> {
        let mut out = Vec::new();
        let required = [
            (ContactField::FirstName, self.first_name.as_deref()),
            (ContactField::LastName, self.last_name.as_deref()),
            (ContactField::PhoneNumber, self.phone_number.as_deref()),
            (ContactField::Group, self.group.as_ref().map(|g| g.as_str())),
            (ContactField::Gender, self.gender.as_ref().map(|g| g.as_str())),
        ];
        for (field, value) in required {
            if value.is_some() {
                out.push((field, value));
            }
        }
        let optional = [
            (ContactField::Position, &self.position),
            (ContactField::OfficeHomeNumber, &self.office_home_number),
            (ContactField::AdditionalPhone1, &self.additional_phone1),
            (ContactField::AdditionalPhone2, &self.additional_phone2),
            (ContactField::AdditionalPhone3, &self.additional_phone3),
            (ContactField::Email, &self.email),
            (ContactField::Notes, &self.notes),
            (ContactField::Address, &self.address),
        ];
        for (field, value) in optional {
            if let Some(v) = value {
                out.push((field, v.as_deref()));
            }
        }
        out
    }
}

/// Every writable attribute of a contact, with its wire and column names.
///
/// The column names are the only identifiers ever spliced into SQL text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContactField {
    FirstName,
    LastName,
    PhoneNumber,
    Group,
    Position,
    OfficeHomeNumber,
    Gender,
    AdditionalPhone1,
    AdditionalPhone2,
    AdditionalPhone3,
    Email,
    Notes,
    Address,
}

impl ContactField {
    pub const ALL: [ContactField; 13] = [
        ContactField::FirstName,
        ContactField::LastName,
        ContactField::PhoneNumber,
        ContactField::Group,
        ContactField::Position,
        ContactField::OfficeHomeNumber,
        ContactField::Gender,
        ContactField::AdditionalPhone1,
        ContactField::AdditionalPhone2,
        ContactField::AdditionalPhone3,
        ContactField::Email,
        ContactField::Notes,
        ContactField::Address,
    ];

    /// camelCase key used in JSON bodies and responses.
    pub fn json_name(&self) -> &'static str {
        match self {
            ContactField::FirstName => "firstName",
            ContactField::LastName => "lastName",
            ContactField::PhoneNumber => "phoneNumber",
            ContactField::Group => "group",
            ContactField::Position => "position",
            ContactField::OfficeHomeNumber => "officeHomeNumber",
            ContactField::Gender => "gender",
            ContactField::AdditionalPhone1 => "additionalPhone1",
            ContactField::AdditionalPhone2 => "additionalPhone2",
            ContactField::AdditionalPhone3 => "additionalPhone3",
            ContactField::Email => "email",
            ContactField::Notes => "notes",
            ContactField::Address => "address",
        }
    }

    /// snake_case column in the `contacts` table.
    pub fn column(&self) -> &'static str {
        match self {
            ContactField::FirstName => "first_name",
            ContactField::LastName => "last_name",
            ContactField::PhoneNumber => "phone_number",
            // `group` is a reserved word in SQL
            ContactField::Group => "contact_group",
            ContactField::Position => "position",
            ContactField::OfficeHomeNumber => "office_home_number",
            ContactField::Gender => "gender",
            ContactField::AdditionalPhone1 => "additional_phone1",
            ContactField::AdditionalPhone2 => "additional_phone2",
            ContactField::AdditionalPhone3 => "additional_phone3",
            ContactField::Email => "email",
            ContactField::Notes => "notes",
            ContactField::Address => "address",
        }
    }

    pub fn is_required(&self) -> bool {
        matches!(
            self,
            ContactField::FirstName
                | ContactField::LastName
                | ContactField::PhoneNumber
                | ContactField::Group
                | ContactField::Gender
        )
    }
}

/// Field a contact list can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    #[default]
    LastName,
    FirstName,
}

impl SortField {
    pub const ALL: [SortField; 2] = [SortField::LastName, SortField::FirstName];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::LastName => "lastName",
            SortField::FirstName => "firstName",
        }
    }

    pub fn field(&self) -> ContactField {
        match self {
            SortField::LastName => ContactField::LastName,
            SortField::FirstName => ContactField::FirstName,
        }
    }
}

impl FromStr for SortField {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortField::ALL
            .into_iter()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| UnknownVariant(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

impl FromStr for SortDirection {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            other => Err(UnknownVariant(other.to_string())),
        }
    }
}

/// Narrowing and ordering for a list query. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactFilters {
    pub group: Option<ContactGroup>,
    pub search_term: Option<String>,
    pub sort_by: Option<SortField>,
    pub sort_direction: Option<SortDirection>,
}

impl ContactFilters {
    pub fn group(mut self, group: ContactGroup) -> Self {
        self.group = Some(group);
        self
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search_term = Some(term.into());
        self
    }

    pub fn sort(mut self, field: SortField, direction: SortDirection) -> Self {
        self.sort_by = Some(field);
        self.sort_direction = Some(direction);
        self
    }

    /// The search term with surrounding whitespace removed, or `None` when
    /// it imposes no restriction.
    pub fn effective_search(&self) -> Option<&str> {
        self.search_term
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }

    /// Ordering to apply: last name ascending unless a sort field is given.
    /// A direction without a field is ignored.
    pub fn effective_sort(&self) -> (SortField, SortDirection) {
        match self.sort_by {
            Some(field) => (field, self.sort_direction.unwrap_or_default()),
            None => (SortField::LastName, SortDirection::Asc),
        }
    }
}
