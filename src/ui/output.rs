use crate::query::ThreadEntry;
use crate::ui::{theme, Icons};
use owo_colors::OwoColorize;

pub fn header(icon: &str, text: &str) {
    println!("{} {}", icon, text.style(theme().header.clone()));
}

pub fn success(label: &str) {
    println!("{} {}", Icons::CHECK, label.style(theme().success.clone()));
}

pub fn error(label: &str) {
    eprintln!("{} {}", Icons::CROSS, label.style(theme().error.clone()));
}

pub fn warn(label: &str) {
    eprintln!("{} {}", Icons::WARN, label.style(theme().warn.clone()));
}

pub fn info(label: &str, value: &str) {
    println!(
        "{} {}: {}",
        Icons::INFO.style(theme().info.clone()),
        label.style(theme().dim.clone()),
        value
    );
}

pub fn section(title: &str) {
    println!();
    println!("━{}━", title.style(theme().header.clone()));
}

/// One reply of a thread, indented by depth
pub fn thread_line(entry: &ThreadEntry, author: &str) {
    let indent = "  ".repeat(entry.depth);
    let id = entry.reply.id().map(|id| format!("#{}", id)).unwrap_or_default();
    println!(
        "{}{} {} {}: {}",
        indent,
        Icons::REPLY,
        id.style(theme().dim.clone()),
        author.style(theme().title.clone()),
        entry.reply.body
    );
}
