//! Question follows (user ↔ question link table)

use rusqlite::Row;
use serde::{Deserialize, Serialize};
use crate::Result;
use crate::persist::Record;
use crate::query::QueryEngine;
use crate::storage::Database;
use super::{Question, User};

/// A row of the `question_followers` table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionFollower {
    pub question_id: i64,
    pub user_id: i64,
}

impl QuestionFollower {
    pub fn new(question_id: i64, user_id: i64) -> Self {
        Self { question_id, user_id }
    }

    pub fn all(db: &Database) -> Result<Vec<QuestionFollower>> {
        db.fetch_all("SELECT * FROM question_followers", [], Self::from_row)
    }

    /// Record the follow. Following twice stores two rows.
    pub fn insert(&self, db: &Database) -> Result<()> {
        db.execute(
            "INSERT INTO question_followers (question_id, user_id) VALUES (?1, ?2)",
            [self.question_id, self.user_id],
        )?;
        Ok(())
    }

    /// Users following `question_id`, in the order they followed
    pub fn followers_for_question_id(db: &Database, question_id: i64) -> Result<Vec<User>> {
        db.fetch_all(
            r#"
            SELECT users.*
            FROM users
            JOIN question_followers ON users.id = question_followers.user_id
            WHERE question_followers.question_id = ?1
            ORDER BY question_followers.rowid
            "#,
            [question_id],
            User::from_row,
        )
    }

    /// Questions `user_id` follows, in the order they were followed
    pub fn followed_questions_for_user_id(db: &Database, user_id: i64) -> Result<Vec<Question>> {
        db.fetch_all(
            r#"
            SELECT questions.*
            FROM questions
            JOIN question_followers ON questions.id = question_followers.question_id
            WHERE question_followers.user_id = ?1
            ORDER BY question_followers.rowid
            "#,
            [user_id],
            Question::from_row,
        )
    }

    /// The `n` questions with the most distinct followers, most followed first
    pub fn most_followed_questions(db: &Database, n: usize) -> Result<Vec<Question>> {
        let ranked = QueryEngine::new(db).most_followed(n)?;
        Ok(ranked.into_iter().map(|entry| entry.question).collect())
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            question_id: row.get("question_id")?,
            user_id: row.get("user_id")?,
        })
    }
}
