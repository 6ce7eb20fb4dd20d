//! Database schema definitions

/// SQL to create the users table
pub const CREATE_USERS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY,
    fname TEXT NOT NULL,
    lname TEXT NOT NULL
)
"#;

/// SQL to create the questions table
pub const CREATE_QUESTIONS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS questions (
    id INTEGER PRIMARY KEY,
    title TEXT NOT NULL,
    body TEXT NOT NULL,
    author_id INTEGER NOT NULL,
    FOREIGN KEY (author_id) REFERENCES users(id)
)
"#;

/// SQL to create the replies table
///
/// `parent_reply` is NULL for top-level replies.
pub const CREATE_REPLIES_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS replies (
    id INTEGER PRIMARY KEY,
    question_id INTEGER NOT NULL,
    parent_reply INTEGER,
    author_id INTEGER NOT NULL,
    body TEXT NOT NULL,
    FOREIGN KEY (question_id) REFERENCES questions(id),
    FOREIGN KEY (parent_reply) REFERENCES replies(id),
    FOREIGN KEY (author_id) REFERENCES users(id)
)
"#;

/// SQL to create the question_followers link table
pub const CREATE_QUESTION_FOLLOWERS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS question_followers (
    question_id INTEGER NOT NULL,
    user_id INTEGER NOT NULL,
    FOREIGN KEY (question_id) REFERENCES questions(id),
    FOREIGN KEY (user_id) REFERENCES users(id)
)
"#;

/// SQL to create the question_likes link table
pub const CREATE_QUESTION_LIKES_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS question_likes (
    user_id INTEGER NOT NULL,
    question_id INTEGER NOT NULL,
    FOREIGN KEY (user_id) REFERENCES users(id),
    FOREIGN KEY (question_id) REFERENCES questions(id)
)
"#;

/// Table names, in creation order
pub const TABLES: &[&str] = &[
    "users",
    "questions",
    "replies",
    "question_followers",
    "question_likes",
];

/// All schema creation statements
pub fn all_schema_statements() -> Vec<&'static str> {
    vec![
        CREATE_USERS_TABLE,
        CREATE_QUESTIONS_TABLE,
        CREATE_REPLIES_TABLE,
        CREATE_QUESTION_FOLLOWERS_TABLE,
        CREATE_QUESTION_LIKES_TABLE,
    ]
}
