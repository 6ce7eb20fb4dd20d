//! Questions

use rusqlite::{Row, ToSql};
use serde::{Deserialize, Serialize};
use crate::Result;
use crate::persist::{self, Field, Record};
use crate::query::{QueryEngine, ThreadEntry};
use crate::storage::Database;
use super::{QuestionFollower, QuestionLike, Reply, User};

/// A row of the `questions` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    id: Option<i64>,
    pub title: String,
    pub body: String,
    pub author_id: i64,
}

impl Question {
    /// Create an unsaved question
    pub fn new(title: impl Into<String>, body: impl Into<String>, author_id: i64) -> Self {
        Self {
            id: None,
            title: title.into(),
            body: body.into(),
            author_id,
        }
    }

    pub fn id(&self) -> Option<i64> {
        self.id
    }

    pub fn all(db: &Database) -> Result<Vec<Question>> {
        persist::all(db)
    }

    pub fn find_by_id(db: &Database, id: i64) -> Result<Option<Question>> {
        persist::find_by_id(db, id)
    }

    pub fn find_by_author_id(db: &Database, author_id: i64) -> Result<Vec<Question>> {
        persist::find_where(db, "author_id", &author_id)
    }

    /// The `n` questions with the most distinct followers
    pub fn most_followed(db: &Database, n: usize) -> Result<Vec<Question>> {
        QuestionFollower::most_followed_questions(db, n)
    }

    /// The `n` questions with the most distinct likers
    pub fn most_liked(db: &Database, n: usize) -> Result<Vec<Question>> {
        QuestionLike::most_liked_questions(db, n)
    }

    /// Insert on first call, update afterwards
    pub fn save(&mut self, db: &Database) -> Result<()> {
        persist::save(db, self)
    }

    pub fn author(&self, db: &Database) -> Result<Option<User>> {
        User::find_by_id(db, self.author_id)
    }

    /// Every reply to this question, nested or not
    pub fn replies(&self, db: &Database) -> Result<Vec<Reply>> {
        match self.id {
            Some(id) => Reply::find_by_question_id(db, id),
            None => Ok(Vec::new()),
        }
    }

    /// Replies with no parent, in storage order
    pub fn top_level_replies(&self, db: &Database) -> Result<Vec<Reply>> {
        match self.id {
            Some(id) => db.fetch_all(
                "SELECT * FROM replies WHERE replies.question_id = ?1 AND replies.parent_reply IS NULL",
                [id],
                Reply::from_row,
            ),
            None => Ok(Vec::new()),
        }
    }

    /// All replies flattened depth-first, each tagged with its nesting depth
    pub fn reply_thread(&self, db: &Database) -> Result<Vec<ThreadEntry>> {
        QueryEngine::new(db).question_thread(self)
    }

    pub fn followers(&self, db: &Database) -> Result<Vec<User>> {
        match self.id {
            Some(id) => QuestionFollower::followers_for_question_id(db, id),
            None => Ok(Vec::new()),
        }
    }

    pub fn likers(&self, db: &Database) -> Result<Vec<User>> {
        match self.id {
            Some(id) => QuestionLike::likers_for_question_id(db, id),
            None => Ok(Vec::new()),
        }
    }

    pub fn num_likes(&self, db: &Database) -> Result<i64> {
        match self.id {
            Some(id) => QuestionLike::num_likes_for_question_id(db, id),
            None => Ok(0),
        }
    }
}

impl Record for Question {
    const TABLE: &'static str = "questions";
    const ENTITY: &'static str = "Question";

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = Some(id);
    }

    fn fields(&self) -> Vec<Field<'_>> {
        vec![
            ("title", &self.title as &dyn ToSql),
            ("body", &self.body as &dyn ToSql),
            ("author_id", &self.author_id as &dyn ToSql),
        ]
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            title: row.get("title")?,
            body: row.get("body")?,
            author_id: row.get("author_id")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures;

    #[test]
    fn test_create_and_find_by_author() {
        let db = Database::open_in_memory().unwrap();
        let ada = fixtures::user(&db, "Ada", "Lovelace");
        assert_eq!(ada.id(), Some(1));

        let mut q1 = Question::new("Q1", "How do engines compute?", 1);
        q1.save(&db).unwrap();
        assert_eq!(q1.id(), Some(1));

        let found = Question::find_by_author_id(&db, 1).unwrap();
        assert_eq!(found, vec![q1.clone()]);
        assert_eq!(Question::find_by_id(&db, 1).unwrap(), Some(q1));
        assert!(Question::find_by_author_id(&db, 2).unwrap().is_empty());
    }

    #[test]
    fn test_update_all_fields() {
        let db = Database::open_in_memory().unwrap();
        let ada = fixtures::user(&db, "Ada", "Lovelace");
        let charles = fixtures::user(&db, "Charles", "Babbage");
        let mut question = fixtures::question(&db, &ada, "Draft");

        question.title = "Final".to_string();
        question.body = "Edited body".to_string();
        question.author_id = charles.id().unwrap();
        question.save(&db).unwrap();

        let reloaded = Question::find_by_id(&db, question.id().unwrap()).unwrap().unwrap();
        assert_eq!(reloaded, question);
        assert_eq!(reloaded.author(&db).unwrap(), Some(charles));
    }

    #[test]
    fn test_find_by_id_missing() {
        let db = Database::open_in_memory().unwrap();
        assert!(Question::find_by_id(&db, 42).unwrap().is_none());
    }

    #[test]
    fn test_followers_likers_and_num_likes() {
        let db = Database::open_in_memory().unwrap();
        let ada = fixtures::user(&db, "Ada", "Lovelace");
        let charles = fixtures::user(&db, "Charles", "Babbage");
        let question = fixtures::question(&db, &ada, "Q1");
        let qid = question.id().unwrap();

        assert_eq!(question.num_likes(&db).unwrap(), 0);

        QuestionFollower::new(qid, charles.id().unwrap()).insert(&db).unwrap();
        QuestionLike::new(ada.id().unwrap(), qid).insert(&db).unwrap();
        QuestionLike::new(charles.id().unwrap(), qid).insert(&db).unwrap();

        assert_eq!(question.followers(&db).unwrap(), vec![charles.clone()]);
        assert_eq!(question.likers(&db).unwrap(), vec![ada, charles]);
        assert_eq!(question.num_likes(&db).unwrap(), 2);
    }

    #[test]
    fn test_replies_and_top_level() {
        let db = Database::open_in_memory().unwrap();
        let ada = fixtures::user(&db, "Ada", "Lovelace");
        let question = fixtures::question(&db, &ada, "Q1");
        let top = fixtures::reply(&db, &question, None, &ada, "top");
        fixtures::reply(&db, &question, Some(&top), &ada, "nested");

        assert_eq!(question.replies(&db).unwrap().len(), 2);
        assert_eq!(question.top_level_replies(&db).unwrap(), vec![top]);
    }
}
