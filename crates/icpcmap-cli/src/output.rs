use anyhow::Result;
use colored::Colorize;
use serde::Serialize;
use tabled::builder::Builder;
use tabled::settings::Style;

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Print rows as a rounded table, or `empty` when there are none.
pub fn print_table<R, C>(header: &[&str], rows: R, empty: &str)
where
    R: IntoIterator<Item = Vec<C>>,
    C: Into<String>,
{
    let mut builder = Builder::default();
    builder.push_record(header.iter().copied());

    let mut count = 0usize;
    for row in rows {
        builder.push_record(row.into_iter().map(Into::into));
        count += 1;
    }

    if count == 0 {
        println!("{empty}");
        return;
    }

    let table = builder.build().with(Style::rounded()).to_string();
    println!("{table}");
}

pub fn print_success(msg: &str) {
    println!("{} {}", "✓".green(), msg);
}

pub fn print_error(msg: &str) {
    eprintln!("{} {}", "✗".red(), msg);
}
