//! Threaded replies
//!
//! A reply belongs to one question and may point at another reply through
//! `parent_reply`, which makes the replies of a question a forest. The parent
//! is expected to sit on the same question; [`Reply::reply_to`] builds a child
//! that satisfies this, the store itself does not check it.

use rusqlite::{Row, ToSql};
use serde::{Deserialize, Serialize};
use crate::Result;
use crate::persist::{self, Field, Record};
use crate::query::{QueryEngine, ThreadEntry};
use crate::storage::Database;
use super::{Question, User};

/// A row of the `replies` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reply {
    id: Option<i64>,
    pub question_id: i64,
    pub parent_reply: Option<i64>,
    pub author_id: i64,
    pub body: String,
}

impl Reply {
    /// Create an unsaved reply
    pub fn new(question_id: i64, parent_reply: Option<i64>, author_id: i64, body: impl Into<String>) -> Self {
        Self {
            id: None,
            question_id,
            parent_reply,
            author_id,
            body: body.into(),
        }
    }

    /// Create an unsaved reply nested under `parent`, on the parent's question
    pub fn reply_to(parent: &Reply, author_id: i64, body: impl Into<String>) -> Self {
        Self::new(parent.question_id, parent.id, author_id, body)
    }

    pub fn id(&self) -> Option<i64> {
        self.id
    }

    pub fn is_top_level(&self) -> bool {
        self.parent_reply.is_none()
    }

    pub fn all(db: &Database) -> Result<Vec<Reply>> {
        persist::all(db)
    }

    pub fn find_by_id(db: &Database, id: i64) -> Result<Option<Reply>> {
        persist::find_by_id(db, id)
    }

    pub fn find_by_question_id(db: &Database, question_id: i64) -> Result<Vec<Reply>> {
        persist::find_where(db, "question_id", &question_id)
    }

    /// Replies written by `user_id`
    pub fn find_by_user_id(db: &Database, user_id: i64) -> Result<Vec<Reply>> {
        persist::find_where(db, "author_id", &user_id)
    }

    /// Insert on first call, update afterwards
    pub fn save(&mut self, db: &Database) -> Result<()> {
        persist::save(db, self)
    }

    pub fn author(&self, db: &Database) -> Result<Option<User>> {
        User::find_by_id(db, self.author_id)
    }

    pub fn question(&self, db: &Database) -> Result<Option<Question>> {
        Question::find_by_id(db, self.question_id)
    }

    /// The reply this one answers, `None` for top-level replies
    pub fn parent_reply(&self, db: &Database) -> Result<Option<Reply>> {
        match self.parent_reply {
            Some(parent_id) => Reply::find_by_id(db, parent_id),
            None => Ok(None),
        }
    }

    /// Replies whose `parent_reply` is this reply
    pub fn child_replies(&self, db: &Database) -> Result<Vec<Reply>> {
        match self.id {
            Some(id) => persist::find_where(db, "parent_reply", &id),
            None => Ok(Vec::new()),
        }
    }

    /// This reply followed by its whole subtree, depth-first
    pub fn thread(&self, db: &Database) -> Result<Vec<ThreadEntry>> {
        QueryEngine::new(db).reply_thread(self)
    }
}

impl Record for Reply {
    const TABLE: &'static str = "replies";
    const ENTITY: &'static str = "Reply";

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = Some(id);
    }

    fn fields(&self) -> Vec<Field<'_>> {
        vec![
            ("question_id", &self.question_id as &dyn ToSql),
            ("parent_reply", &self.parent_reply as &dyn ToSql),
            ("author_id", &self.author_id as &dyn ToSql),
            ("body", &self.body as &dyn ToSql),
        ]
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            question_id: row.get("question_id")?,
            parent_reply: row.get("parent_reply")?,
            author_id: row.get("author_id")?,
            body: row.get("body")?,
        })
    }
}
