//! SQL construction for the relational backend.
//!
//! Every statement with a dynamic shape is built in two steps: first the
//! list of clauses (predicates, assignments) is derived from typed input,
//! then the clauses are composed into SQL text with `?` placeholders and a
//! matching bind list. User input only ever travels in the bind list; the
//! only identifiers spliced into the text are the fixed column names from
//! [`ContactField::column`].
//!
//! Nothing here touches a database, so the generated SQL is unit-tested
//! directly.

use crate::models::{ContactField, ContactFilters, ContactGroup, ContactPatch, NewContact};

pub const TABLE: &str = "contacts";

/// A bound parameter value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Bind {
    Text(Option<String>),
    Int(i64),
}

/// SQL text plus its parameters, in placeholder order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltQuery {
    pub sql: String,
    pub binds: Vec<Bind>,
}

/// One condition of a list query's `WHERE` clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    GroupEquals(ContactGroup),
    /// Escaped `LIKE` pattern matched against every searchable column.
    Search(String),
}

/// Columns the search term is matched against.
pub const SEARCH_FIELDS: [ContactField; 5] = [
    ContactField::FirstName,
    ContactField::LastName,
    ContactField::PhoneNumber,
    ContactField::Email,
    ContactField::Position,
];

/// `id` followed by every attribute column, in table order.
pub fn select_columns() -> String {
    std::iter::once("id")
        .chain(ContactField::ALL.iter().map(|f| f.column()))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Derive the `WHERE` predicates for `filters`. Empty when unfiltered.
pub fn predicates(filters: &ContactFilters) -> Vec<Predicate> {
    let mut out = Vec::new();
    if let Some(group) = filters.group {
        out.push(Predicate::GroupEquals(group));
    }
    if let Some(term) = filters.effective_search() {
        out.push(Predicate::Search(format!("%{}%", escape_like(term))));
    }
    out
}

/// Escape `LIKE` metacharacters so the term matches literally under
/// `ESCAPE '\'`.
pub fn escape_like(term: &str) -> String {
    let mut out = String::with_capacity(term.len());
    for ch in term.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

fn compose_predicate(predicate: &Predicate, binds: &mut Vec<Bind>) -> String {
    match predicate {
        Predicate::GroupEquals(group) => {
            binds.push(Bind::Text(Some(group.as_str().to_string())));
            format!("{} = ?", ContactField::Group.column())
        }
        Predicate::Search(pattern) => {
            let alternatives: Vec<String> = SEARCH_FIELDS
                .iter()
                .map(|f| {
                    binds.push(Bind::Text(Some(pattern.clone())));
                    format!(r"{} LIKE ? ESCAPE '\'", f.column())
                })
                .collect();
            format!("({})", alternatives.join(" OR "))
        }
    }
}

/// `SELECT` for a list query: predicates joined with `AND`, then ordering
/// with ASCII case folded and id as the tiebreaker.
pub fn build_list(filters: &ContactFilters) -> BuiltQuery {
    let mut binds = Vec::new();
    let mut sql = format!("SELECT {} FROM {}", select_columns(), TABLE);

    let clauses: Vec<String> = predicates(filters)
        .iter()
        .map(|p| compose_predicate(p, &mut binds))
        .collect();
    if !clauses.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&clauses.join(" AND "));
    }

    let (field, direction) = filters.effective_sort();
    sql.push_str(&format!(
        " ORDER BY {} COLLATE NOCASE {}, id ASC",
        field.field().column(),
        direction.as_sql()
    ));

    BuiltQuery { sql, binds }
}

pub fn build_get(id: i64) -> BuiltQuery {
    BuiltQuery {
        sql: format!("SELECT {} FROM {} WHERE id = ?", select_columns(), TABLE),
        binds: vec![Bind::Int(id)],
    }
}

/// `INSERT ... RETURNING` for a new contact; the id comes from the table.
pub fn build_insert(contact: &NewContact) -> BuiltQuery {
    let columns = contact.columns();
    let names: Vec<&str> = columns.iter().map(|(f, _)| f.column()).collect();
    let placeholders = vec!["?"; columns.len()].join(", ");
    let binds = columns
        .into_iter()
        .map(|(_, v)| Bind::Text(v.map(str::to_string)))
        .collect();
    BuiltQuery {
        sql: format!(
            "INSERT INTO {} ({}) VALUES ({}) RETURNING {}",
            TABLE,
            names.join(", "),
            placeholders,
            select_columns()
        ),
        binds,
    }
}

/// `UPDATE ... RETURNING` assigning only the supplied fields, or `None` for
/// an empty patch.
pub fn build_update(id: i64, patch: &ContactPatch) -> Option<BuiltQuery> {
    let assignments = patch.assignments();
    if assignments.is_empty() {
        return None;
    }
    let set_clause: Vec<String> = assignments
        .iter()
        .map(|(f, _)| format!("{} = ?", f.column()))
        .collect();
    let mut binds: Vec<Bind> = assignments
        .into_iter()
        .map(|(_, v)| Bind::Text(v.map(str::to_string)))
        .collect();
    binds.push(Bind::Int(id));
    Some(BuiltQuery {
        sql: format!(
            "UPDATE {} SET {} WHERE id = ? RETURNING {}",
            TABLE,
            set_clause.join(", "),
            select_columns()
        ),
        binds,
    })
}

pub fn build_delete(id: i64) -> BuiltQuery {
    BuiltQuery {
        sql: format!("DELETE FROM {} WHERE id = ?", TABLE),
        binds: vec![Bind::Int(id)],
    }
}
