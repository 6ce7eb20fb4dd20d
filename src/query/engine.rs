//! Query engine implementation
//!
//! Provides the forum-wide aggregations:
//! - Average karma of an author
//! - Most followed / most liked questions (grouped counts)
//! - Reply threads (walk over the `parent_reply` self reference)

use std::collections::HashSet;
use crate::Result;
use crate::model::{Question, Reply};
use crate::storage::Database;

/// Link tables a question can be ranked by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ranking {
    Followers,
    Likes,
}

impl Ranking {
    fn table(&self) -> &'static str {
        match self {
            Ranking::Followers => "question_followers",
            Ranking::Likes => "question_likes",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Ranking::Followers => "followers",
            Ranking::Likes => "likes",
        }
    }
}

/// A question with the number of distinct users behind its ranking
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct RankedQuestion {
    pub question: Question,
    pub count: i64,
}

/// One reply in a flattened thread
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ThreadEntry {
    pub reply: Reply,
    /// 0 for the root of the walk
    pub depth: usize,
}

/// Query engine for forum aggregations
pub struct QueryEngine<'a> {
    db: &'a Database,
}

impl<'a> QueryEngine<'a> {
    /// Create a new query engine
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Likes on the author's questions divided by how many of them are liked.
    ///
    /// Unliked questions survive the outer join but add nothing to either
    /// count. SQLite yields NULL when the divisor is zero, reported as `0.0`.
    pub fn average_karma(&self, user_id: i64) -> Result<f64> {
        let karma: Option<f64> = self
            .db
            .fetch_optional(
                r#"
                SELECT
                    CAST(COUNT(question_likes.user_id) AS REAL)
                        / COUNT(DISTINCT question_likes.question_id) AS karma
                FROM questions
                LEFT OUTER JOIN question_likes ON questions.id = question_likes.question_id
                WHERE questions.author_id = ?1
                "#,
                [user_id],
                |row| row.get("karma"),
            )?
            .flatten();

        Ok(karma.unwrap_or(0.0))
    }

    /// Number of like rows for one question
    pub fn num_likes(&self, question_id: i64) -> Result<i64> {
        let count: Option<i64> = self.db.fetch_optional(
            "SELECT COUNT(user_id) AS num FROM question_likes WHERE question_id = ?1",
            [question_id],
            |row| row.get("num"),
        )?;
        Ok(count.unwrap_or(0))
    }

    pub fn most_followed(&self, n: usize) -> Result<Vec<RankedQuestion>> {
        self.ranked(Ranking::Followers, n)
    }

    pub fn most_liked(&self, n: usize) -> Result<Vec<RankedQuestion>> {
        self.ranked(Ranking::Likes, n)
    }

    /// Top `n` questions by distinct users in the ranking's link table.
    ///
    /// Highest count first, ties by ascending question id. Links pointing at a
    /// question that no longer exists are skipped after the limit is applied.
    pub fn ranked(&self, ranking: Ranking, n: usize) -> Result<Vec<RankedQuestion>> {
        let sql = format!(
            r#"
            SELECT question_id, COUNT(DISTINCT user_id) AS num
            FROM {}
            GROUP BY question_id
            ORDER BY num DESC, question_id ASC
            LIMIT ?1
            "#,
            ranking.table()
        );
        let counts: Vec<(i64, i64)> = self.db.fetch_all(&sql, [n as i64], |row| {
            Ok((row.get("question_id")?, row.get("num")?))
        })?;

        let mut results = Vec::with_capacity(counts.len());
        for (question_id, count) in counts {
            match Question::find_by_id(self.db, question_id)? {
                Some(question) => results.push(RankedQuestion { question, count }),
                None => tracing::warn!(question_id, "{} reference a missing question", ranking.as_str()),
            }
        }

        Ok(results)
    }

    /// `root` and every reply beneath it, depth-first in storage order.
    ///
    /// Each reply is visited once, so a malformed `parent_reply` cycle cannot
    /// loop forever.
    pub fn reply_thread(&self, root: &Reply) -> Result<Vec<ThreadEntry>> {
        let mut visited = HashSet::new();
        let mut results = Vec::new();
        self.walk(vec![(root.clone(), 0usize)], &mut visited, &mut results)?;
        Ok(results)
    }

    /// Every reply on the question, each top-level reply followed by its subtree
    pub fn question_thread(&self, question: &Question) -> Result<Vec<ThreadEntry>> {
        let roots = question.top_level_replies(self.db)?;

        let mut visited = HashSet::new();
        let mut results = Vec::new();
        let stack = roots.into_iter().rev().map(|reply| (reply, 0usize)).collect();
        self.walk(stack, &mut visited, &mut results)?;
        Ok(results)
    }

    fn walk(
        &self,
        mut stack: Vec<(Reply, usize)>,
        visited: &mut HashSet<i64>,
        results: &mut Vec<ThreadEntry>,
    ) -> Result<()> {
        while let Some((reply, depth)) = stack.pop() {
            if let Some(id) = reply.id() {
                if !visited.insert(id) {
                    continue;
                }
            }

            let children = reply.child_replies(self.db)?;
            for child in children.into_iter().rev() {
                stack.push((child, depth + 1));
            }

            results.push(ThreadEntry { reply, depth });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{fixtures, QuestionLike};

    #[test]
    fn test_average_karma() {
        let db = Database::open_in_memory().unwrap();
        let ada = fixtures::user(&db, "Ada", "Lovelace");
        let charles = fixtures::user(&db, "Charles", "Babbage");
        let mary = fixtures::user(&db, "Mary", "Somerville");

        let liked_twice = fixtures::question(&db, &ada, "Q1");
        let liked_once = fixtures::question(&db, &ada, "Q2");
        fixtures::question(&db, &ada, "never liked");

        for user in [&charles, &mary] {
            QuestionLike::new(user.id().unwrap(), liked_twice.id().unwrap()).insert(&db).unwrap();
        }
        QuestionLike::new(charles.id().unwrap(), liked_once.id().unwrap()).insert(&db).unwrap();

        // 3 likes over 2 liked questions
        let engine = QueryEngine::new(&db);
        assert!((engine.average_karma(ada.id().unwrap()).unwrap() - 1.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_average_karma_without_questions_is_zero() {
        let db = Database::open_in_memory().unwrap();
        let ada = fixtures::user(&db, "Ada", "Lovelace");
        let engine = QueryEngine::new(&db);

        assert_eq!(engine.average_karma(ada.id().unwrap()).unwrap(), 0.0);

        fixtures::question(&db, &ada, "unliked");
        assert_eq!(engine.average_karma(ada.id().unwrap()).unwrap(), 0.0);
    }

    #[test]
    fn test_ranked_ties_break_by_id() {
        let db = Database::open_in_memory().unwrap();
        let ada = fixtures::user(&db, "Ada", "Lovelace");
        let charles = fixtures::user(&db, "Charles", "Babbage");
        let q1 = fixtures::question(&db, &ada, "Q1");
        let q2 = fixtures::question(&db, &ada, "Q2");

        // Likes for q2 arrive first; equal counts still order by id.
        QuestionLike::new(ada.id().unwrap(), q2.id().unwrap()).insert(&db).unwrap();
        QuestionLike::new(charles.id().unwrap(), q1.id().unwrap()).insert(&db).unwrap();
        // Duplicate like counts once.
        QuestionLike::new(charles.id().unwrap(), q1.id().unwrap()).insert(&db).unwrap();

        let ranked = QueryEngine::new(&db).most_liked(5).unwrap();
        assert_eq!(
            ranked,
            vec![
                RankedQuestion { question: q1, count: 1 },
                RankedQuestion { question: q2, count: 1 },
            ]
        );
    }

    #[test]
    fn test_ranked_skips_missing_questions() {
        let db = Database::open_in_memory().unwrap();
        let ada = fixtures::user(&db, "Ada", "Lovelace");
        QuestionLike::new(ada.id().unwrap(), 99).insert(&db).unwrap();

        assert!(QueryEngine::new(&db).most_liked(3).unwrap().is_empty());
    }

    #[test]
    fn test_reply_thread_depth_first() {
        let db = Database::open_in_memory().unwrap();
        let ada = fixtures::user(&db, "Ada", "Lovelace");
        let question = fixtures::question(&db, &ada, "Q1");

        let first = fixtures::reply(&db, &question, None, &ada, "first");
        let first_a = fixtures::reply(&db, &question, Some(&first), &ada, "first.a");
        let second = fixtures::reply(&db, &question, None, &ada, "second");
        let first_a_i = fixtures::reply(&db, &question, Some(&first_a), &ada, "first.a.i");
        let first_b = fixtures::reply(&db, &question, Some(&first), &ada, "first.b");

        let engine = QueryEngine::new(&db);

        let subtree: Vec<(String, usize)> = engine
            .reply_thread(&first)
            .unwrap()
            .into_iter()
            .map(|entry| (entry.reply.body, entry.depth))
            .collect();
        assert_eq!(
            subtree,
            vec![
                ("first".to_string(), 0),
                ("first.a".to_string(), 1),
                ("first.a.i".to_string(), 2),
                ("first.b".to_string(), 1),
            ]
        );

        let whole: Vec<Reply> = engine
            .question_thread(&question)
            .unwrap()
            .into_iter()
            .map(|entry| entry.reply)
            .collect();
        assert_eq!(whole, vec![first, first_a, first_a_i, first_b, second]);
    }

    #[test]
    fn test_reply_thread_survives_cycle() {
        let db = Database::open_in_memory().unwrap();
        let ada = fixtures::user(&db, "Ada", "Lovelace");
        let question = fixtures::question(&db, &ada, "Q1");
        let mut a = fixtures::reply(&db, &question, None, &ada, "a");
        let b = fixtures::reply(&db, &question, Some(&a), &ada, "b");

        a.parent_reply = b.id();
        a.save(&db).unwrap();

        let thread = QueryEngine::new(&db).reply_thread(&a).unwrap();
        assert_eq!(thread.len(), 2);
    }
}
