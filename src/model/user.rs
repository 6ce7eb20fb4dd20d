//! Forum members

use rusqlite::{Row, ToSql};
use serde::{Deserialize, Serialize};
use crate::Result;
use crate::persist::{self, Field, Record};
use crate::query::QueryEngine;
use crate::storage::Database;
use super::{Question, QuestionFollower, QuestionLike, Reply};

/// A row of the `users` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    id: Option<i64>,
    pub fname: String,
    pub lname: String,
}

impl User {
    /// Create an unsaved user
    pub fn new(fname: impl Into<String>, lname: impl Into<String>) -> Self {
        Self {
            id: None,
            fname: fname.into(),
            lname: lname.into(),
        }
    }

    pub fn id(&self) -> Option<i64> {
        self.id
    }

    /// "fname lname"
    pub fn full_name(&self) -> String {
        format!("{} {}", self.fname, self.lname)
    }

    pub fn all(db: &Database) -> Result<Vec<User>> {
        persist::all(db)
    }

    pub fn find_by_id(db: &Database, id: i64) -> Result<Option<User>> {
        persist::find_by_id(db, id)
    }

    /// First user with exactly this first and last name
    pub fn find_by_name(db: &Database, fname: &str, lname: &str) -> Result<Option<User>> {
        db.fetch_optional(
            "SELECT * FROM users WHERE users.fname = ?1 AND users.lname = ?2",
            [fname, lname],
            User::from_row,
        )
    }

    /// Insert on first call, update afterwards
    pub fn save(&mut self, db: &Database) -> Result<()> {
        persist::save(db, self)
    }

    pub fn authored_questions(&self, db: &Database) -> Result<Vec<Question>> {
        match self.id {
            Some(id) => Question::find_by_author_id(db, id),
            None => Ok(Vec::new()),
        }
    }

    pub fn authored_replies(&self, db: &Database) -> Result<Vec<Reply>> {
        match self.id {
            Some(id) => Reply::find_by_user_id(db, id),
            None => Ok(Vec::new()),
        }
    }

    pub fn followed_questions(&self, db: &Database) -> Result<Vec<Question>> {
        match self.id {
            Some(id) => QuestionFollower::followed_questions_for_user_id(db, id),
            None => Ok(Vec::new()),
        }
    }

    pub fn liked_questions(&self, db: &Database) -> Result<Vec<Question>> {
        match self.id {
            Some(id) => QuestionLike::liked_questions_for_user_id(db, id),
            None => Ok(Vec::new()),
        }
    }

    /// Likes received per liked question, `0.0` when nothing the user wrote was liked
    pub fn average_karma(&self, db: &Database) -> Result<f64> {
        match self.id {
            Some(id) => QueryEngine::new(db).average_karma(id),
            None => Ok(0.0),
        }
    }
}

impl Record for User {
    const TABLE: &'static str = "users";
    const ENTITY: &'static str = "User";

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = Some(id);
    }

    fn fields(&self) -> Vec<Field<'_>> {
        vec![
            ("fname", &self.fname as &dyn ToSql),
            ("lname", &self.lname as &dyn ToSql),
        ]
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            fname: row.get("fname")?,
            lname: row.get("lname")?,
        })
    }
}
