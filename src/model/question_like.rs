//! Question likes (user ↔ question link table)

use rusqlite::Row;
use serde::{Deserialize, Serialize};
use crate::Result;
use crate::persist::Record;
use crate::query::QueryEngine;
use crate::storage::Database;
use super::{Question, User};

/// A row of the `question_likes` table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionLike {
    pub user_id: i64,
    pub question_id: i64,
}

impl QuestionLike {
    pub fn new(user_id: i64, question_id: i64) -> Self {
        Self { user_id, question_id }
    }

    pub fn all(db: &Database) -> Result<Vec<QuestionLike>> {
        db.fetch_all("SELECT * FROM question_likes", [], Self::from_row)
    }

    /// Record the like. Liking twice stores two rows.
    pub fn insert(&self, db: &Database) -> Result<()> {
        db.execute(
            "INSERT INTO question_likes (user_id, question_id) VALUES (?1, ?2)",
            [self.user_id, self.question_id],
        )?;
        Ok(())
    }

    pub fn likers_for_question_id(db: &Database, question_id: i64) -> Result<Vec<User>> {
        db.fetch_all(
            r#"
            SELECT users.*
            FROM users
            JOIN question_likes ON users.id = question_likes.user_id
            WHERE question_likes.question_id = ?1
            ORDER BY question_likes.rowid
            "#,
            [question_id],
            User::from_row,
        )
    }

    pub fn liked_questions_for_user_id(db: &Database, user_id: i64) -> Result<Vec<Question>> {
        db.fetch_all(
            r#"
            SELECT questions.*
            FROM questions
            JOIN question_likes ON questions.id = question_likes.question_id
            WHERE question_likes.user_id = ?1
            ORDER BY question_likes.rowid
            "#,
            [user_id],
            Question::from_row,
        )
    }

    /// Number of likes on `question_id`, zero when it has none
    pub fn num_likes_for_question_id(db: &Database, question_id: i64) -> Result<i64> {
        QueryEngine::new(db).num_likes(question_id)
    }

    /// The `n` questions with the most distinct likers, most liked first
    pub fn most_liked_questions(db: &Database, n: usize) -> Result<Vec<Question>> {
        let ranked = QueryEngine::new(db).most_liked(n)?;
        Ok(ranked.into_iter().map(|entry| entry.question).collect())
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            user_id: row.get("user_id")?,
            question_id: row.get("question_id")?,
        })
    }
}
