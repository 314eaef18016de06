use crate::ui::{theme, Icons};
use owo_colors::OwoColorize;

/// Start of an import phase
pub fn phase(name: &str) {
    println!();
    println!(
        "{} {}",
        Icons::GEAR.style(theme().info.clone()),
        name.style(theme().header.clone())
    );
}

pub fn section(title: &str) {
    println!();
    println!("━{}━", title.style(theme().header.clone()));
}

pub fn status(icon: &str, label: &str, value: &str) {
    println!("{} {}: {}", icon, label.style(theme().dim.clone()), value);
}

pub fn success(label: &str) {
    println!("{} {}", Icons::CHECK, label.style(theme().inserted.clone()));
}

pub fn error(label: &str) {
    eprintln!("{} {}", Icons::CROSS, label.style(theme().error.clone()));
}

pub fn entry_inserted(idx: usize, name: &str) {
    println!(
        "{} Entry {}: Inserted '{}' successfully.",
        Icons::PLUS.style(theme().inserted.clone()),
        idx,
        name
    );
}

pub fn entry_skipped(idx: usize, reason: &str) {
    println!(
        "{} Entry {}: {}",
        Icons::SKIP.style(theme().skipped.clone()),
        idx,
        reason.style(theme().skipped.clone())
    );
}

pub fn entry_failed(idx: usize, reason: &str) {
    println!(
        "{} Entry {}: {}",
        Icons::CROSS.style(theme().error.clone()),
        idx,
        reason.style(theme().error.clone())
    );
}
