//! Terminal output for the `questions` binary

pub mod icons;
pub mod output;
pub mod table;
pub mod theme;

pub use icons::Icons;
pub use output::{error, header, info, section, success, thread_line, warn};
pub use table::{question_table, ranked_table, stats_table, user_table, TableBuilder};
pub use theme::{theme, Theme};
