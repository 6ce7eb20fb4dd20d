//! Generic insert-or-update persistence
//!
//! Each entity describes itself through [`Record`]: its table, how to build
//! itself from a row, and an ordered list of `(column, value)` pairs for every
//! field except the identifier. Statements are generated from that list, so
//! column order in SQL always matches the declared field order.

use rusqlite::{Row, ToSql};
use crate::storage::Database;
use crate::{Error, Result};

/// One non-identifier column and the value bound for it
pub type Field<'a> = (&'static str, &'a dyn ToSql);

/// A row-mapped entity with an integer `id` primary key.
pub trait Record: Sized {
    /// Table backing this entity
    const TABLE: &'static str;

    /// Human name used in error messages
    const ENTITY: &'static str;

    /// Identifier, `None` until the record is first saved
    fn id(&self) -> Option<i64>;

    /// Store the identifier generated on insert
    fn set_id(&mut self, id: i64);

    /// Non-identifier fields in declared column order
    fn fields(&self) -> Vec<Field<'_>>;

    /// Build a record from a row, addressing columns by name
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self>;
}

/// `INSERT INTO table (a, b) VALUES (?1, ?2)`
pub fn insert_sql(table: &str, columns: &[&str]) -> String {
    let marks: Vec<String> = (1..=columns.len()).map(|i| format!("?{}", i)).collect();
    format!(
        "INSERT INTO {} ({}) VALUES ({})",
        table,
        columns.join(", "),
        marks.join(", ")
    )
}

/// `UPDATE table SET a = ?1, b = ?2 WHERE id = ?3`
pub fn update_sql(table: &str, columns: &[&str]) -> String {
    let assignments: Vec<String> = columns
        .iter()
        .enumerate()
        .map(|(i, column)| format!("{} = ?{}", column, i + 1))
        .collect();
    format!(
        "UPDATE {} SET {} WHERE id = ?{}",
        table,
        assignments.join(", "),
        columns.len() + 1
    )
}

/// Insert the record when it has no id yet, otherwise update it in place.
pub fn save<R: Record>(db: &Database, record: &mut R) -> Result<()> {
    match record.id() {
        None => create(db, record),
        Some(_) => update(db, record),
    }
}

/// Insert every non-id field and adopt the generated row id.
pub fn create<R: Record>(db: &Database, record: &mut R) -> Result<()> {
    if let Some(id) = record.id() {
        return Err(Error::Identity(format!("{} {} is already saved", R::ENTITY, id)));
    }
    let id = {
        let fields = record.fields();
        let columns: Vec<&str> = fields.iter().map(|(column, _)| *column).collect();
        let values: Vec<&dyn ToSql> = fields.iter().map(|(_, value)| *value).collect();

        db.execute(&insert_sql(R::TABLE, &columns), values.as_slice())?;
        db.last_insert_rowid()
    };
    record.set_id(id);
    tracing::debug!(table = R::TABLE, id, "created {}", R::ENTITY);
    Ok(())
}

/// Overwrite every non-id field of the stored row with the record's values.
///
/// Fails with [`Error::NotFound`] when no row carries the record's id.
pub fn update<R: Record>(db: &Database, record: &R) -> Result<()> {
    let id = record
        .id()
        .ok_or_else(|| Error::Identity(format!("{} has not been saved yet", R::ENTITY)))?;

    let fields = record.fields();
    let columns: Vec<&str> = fields.iter().map(|(column, _)| *column).collect();
    let mut values: Vec<&dyn ToSql> = fields.iter().map(|(_, value)| *value).collect();
    values.push(&id);

    let changed = db.execute(&update_sql(R::TABLE, &columns), values.as_slice())?;
    if changed == 0 {
        return Err(Error::NotFound {
            entity: R::ENTITY,
            id,
        });
    }
    tracing::debug!(table = R::TABLE, id, "updated {}", R::ENTITY);
    Ok(())
}

/// Every row of the record's table, in storage order
pub fn all<R: Record>(db: &Database) -> Result<Vec<R>> {
    db.fetch_all(&format!("SELECT * FROM {}", R::TABLE), [], R::from_row)
}

/// The row with the given id, if any
pub fn find_by_id<R: Record>(db: &Database, id: i64) -> Result<Option<R>> {
    db.fetch_optional(
        &format!("SELECT * FROM {} WHERE {}.id = ?1", R::TABLE, R::TABLE),
        [id],
        R::from_row,
    )
}

/// Every row whose `column` equals `value`
pub fn find_where<R: Record>(db: &Database, column: &str, value: &dyn ToSql) -> Result<Vec<R>> {
    db.fetch_all(
        &format!("SELECT * FROM {} WHERE {}.{} = ?1", R::TABLE, R::TABLE, column),
        [value],
        R::from_row,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_sql_keeps_declared_order() {
        let sql = insert_sql("replies", &["question_id", "parent_reply", "author_id", "body"]);
        assert_eq!(
            sql,
            "INSERT INTO replies (question_id, parent_reply, author_id, body) VALUES (?1, ?2, ?3, ?4)"
        );
    }

    #[test]
    fn test_update_sql_separates_assignments() {
        let sql = update_sql("users", &["fname", "lname"]);
        assert_eq!(sql, "UPDATE users SET fname = ?1, lname = ?2 WHERE id = ?3");
    }

    #[test]
    fn test_update_sql_single_column() {
        let sql = update_sql("notes", &["body"]);
        assert_eq!(sql, "UPDATE notes SET body = ?1 WHERE id = ?2");
    }
}
