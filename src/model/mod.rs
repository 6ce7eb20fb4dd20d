//! Forum records
//!
//! Five row-mapped types, one per table:
//! - `User`: forum member
//! - `Question`: a question asked by a user
//! - `Reply`: an answer to a question, optionally nested under another reply
//! - `QuestionFollower`: user follows question
//! - `QuestionLike`: user likes question
//!
//! Finders are associated functions taking the [`Database`](crate::Database);
//! relationship accessors are methods that run a fresh query on every call.

pub mod question;
pub mod question_follower;
pub mod question_like;
pub mod reply;
pub mod user;

pub use question::Question;
pub use question_follower::QuestionFollower;
pub use question_like::QuestionLike;
pub use reply::Reply;
pub use user::User;
