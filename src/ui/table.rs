use tabled::{settings::Style, Table, Tabled};
use crate::model::{Question, User};
use crate::query::RankedQuestion;
use crate::storage::DbStats;

#[derive(Tabled)]
pub struct TableRow {
    #[tabled(rename = "Metric")]
    pub metric: String,
    #[tabled(rename = "Value")]
    pub value: String,
}

pub struct TableBuilder {
    rows: Vec<TableRow>,
}

impl TableBuilder {
    pub fn new() -> Self {
        Self { rows: Vec::new() }
    }

    pub fn add_row(&mut self, label: &str, value: &str) {
        self.rows.push(TableRow {
            metric: label.to_string(),
            value: value.to_string(),
        });
    }

    pub fn build(&self) -> String {
        render(&self.rows)
    }
}

impl Default for TableBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Tabled)]
struct UserRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "First")]
    fname: String,
    #[tabled(rename = "Last")]
    lname: String,
}

#[derive(Tabled)]
struct QuestionRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Author")]
    author_id: i64,
}

#[derive(Tabled)]
struct RankedRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Count")]
    count: i64,
}

fn id_cell(id: Option<i64>) -> String {
    id.map(|id| id.to_string()).unwrap_or_else(|| "-".to_string())
}

fn render<T: Tabled>(rows: &[T]) -> String {
    if rows.is_empty() {
        return String::new();
    }
    Table::new(rows).with(Style::rounded()).to_string()
}

pub fn user_table(users: &[User]) -> String {
    let rows: Vec<UserRow> = users
        .iter()
        .map(|u| UserRow {
            id: id_cell(u.id()),
            fname: u.fname.clone(),
            lname: u.lname.clone(),
        })
        .collect();
    render(&rows)
}

pub fn question_table(questions: &[Question]) -> String {
    let rows: Vec<QuestionRow> = questions
        .iter()
        .map(|q| QuestionRow {
            id: id_cell(q.id()),
            title: q.title.clone(),
            author_id: q.author_id,
        })
        .collect();
    render(&rows)
}

pub fn ranked_table(ranked: &[RankedQuestion]) -> String {
    let rows: Vec<RankedRow> = ranked
        .iter()
        .map(|r| RankedRow {
            id: id_cell(r.question.id()),
            title: r.question.title.clone(),
            count: r.count,
        })
        .collect();
    render(&rows)
}

pub fn stats_table(stats: &DbStats) -> String {
    let mut builder = TableBuilder::new();
    for (label, count) in stats.rows() {
        builder.add_row(label, &count.to_string());
    }
    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_tables_render_nothing() {
        assert!(user_table(&[]).is_empty());
        assert!(TableBuilder::new().build().is_empty());
    }

    #[test]
    fn test_question_table_lists_titles() {
        let table = question_table(&[Question::new("Why Rust?", "...", 1)]);
        assert!(table.contains("Why Rust?"));
        assert!(table.contains("Title"));
    }
}
