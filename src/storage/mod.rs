//! Storage Layer - SQLite-backed persistence
//!
//! One database file with tables:
//! - users(id, fname, lname)
//! - questions(id, title, body, author_id)
//! - replies(id, question_id, parent_reply, author_id, body)
//! - question_followers(question_id, user_id)
//! - question_likes(user_id, question_id)

pub mod schema;
pub mod sqlite;

pub use sqlite::{Database, DbStats, DEFAULT_DATABASE_FILE};
