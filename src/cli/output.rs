//! Colored output helpers for CLI
//!
//! Tables and messages go to stdout, errors to stderr. Logs are written
//! by `tracing` to stderr and never mix with tables.

use crate::views::Confirm;
use owo_colors::OwoColorize;
use std::io::{self, Write};

/// Output style configuration
#[derive(Debug, Clone, Copy)]
pub struct Output {
    /// Whether to use colored output
    pub colored: bool,
}

impl Default for Output {
    fn default() -> Self {
        Self::new()
    }
}

impl Output {
    pub fn new() -> Self {
        Self { colored: true }
    }

    pub fn no_color() -> Self {
        Self { colored: false }
    }

    pub fn success(&self, message: &str) {
        if self.colored {
            println!("  {} {}", "✓".green().bold(), message.green());
        } else {
            println!("  [OK] {}", message);
        }
    }

    pub fn info(&self, message: &str) {
        if self.colored {
            println!("  {} {}", "•".blue(), message);
        } else {
            println!("  [INFO] {}", message);
        }
    }

    pub fn warning(&self, message: &str) {
        if self.colored {
            println!("  {} {}", "⚠".yellow().bold(), message.yellow());
        } else {
            println!("  [WARN] {}", message);
        }
    }

    pub fn error(&self, message: &str) {
        if self.colored {
            eprintln!("  {} {}", "✗".red().bold(), message.red());
        } else {
            eprintln!("  [ERROR] {}", message);
        }
    }

    /// A view's error banner.
    pub fn banner(&self, message: &str) {
        if self.colored {
            println!("  {}", format!(" {} ", message).white().on_red().bold());
        } else {
            println!("  !! {} !!", message);
        }
    }

    /// Print a file creation message
    pub fn created(&self, file_type: &str, path: &str) {
        if self.colored {
            println!(
                "  {} {} {}",
                "✓".green().bold(),
                file_type.dimmed(),
                path.bright_white()
            );
        } else {
            println!("  [CREATED] {} {}", file_type, path);
        }
    }

    pub fn header(&self, title: &str) {
        if self.colored {
            println!("\n  {}", title.bright_white().bold().underline());
        } else {
            println!("\n  === {} ===", title);
        }
    }

    pub fn subheader(&self, title: &str) {
        if self.colored {
            println!("\n  {}", title.cyan().bold());
        } else {
            println!("\n  --- {} ---", title);
        }
    }

    /// Print a key-value pair
    pub fn kv(&self, key: &str, value: &str) {
        if self.colored {
            println!("    {}: {}", key.dimmed(), value.bright_white());
        } else {
            println!("    {}: {}", key, value);
        }
    }

    pub fn list_item(&self, item: &str) {
        if self.colored {
            println!("    {} {}", "•".blue(), item);
        } else {
            println!("    - {}", item);
        }
    }

    pub fn hint(&self, message: &str) {
        if self.colored {
            println!("\n  {} {}", "💡".dimmed(), message.dimmed().italic());
        } else {
            println!("\n  [TIP] {}", message);
        }
    }

    pub fn command(&self, cmd: &str) {
        if self.colored {
            println!("     {}", format!("$ {}", cmd).bright_cyan());
        } else {
            println!("     $ {}", cmd);
        }
    }

    /// Identity-provider redirect target. A terminal cannot follow it, so
    /// the URL is shown for the user to open.
    pub fn redirect(&self, url: &str) {
        if self.colored {
            eprintln!(
                "  {} {}",
                "→ Open in your browser:".bright_yellow().bold(),
                url.underline()
            );
        } else {
            eprintln!("  [REDIRECT] {}", url);
        }
    }

    /// Multi-line block, indented.
    pub fn block(&self, text: &str) {
        for line in text.lines() {
            println!("  {}", line);
        }
    }

    /// Prompt for confirmation (returns true if user confirms)
    pub fn confirm(&self, message: &str) -> bool {
        if self.colored {
            print!(
                "  {} {} [y/N]: ",
                "?".bright_yellow().bold(),
                message.bright_white()
            );
        } else {
            print!("  [?] {} [y/N]: ", message);
        }

        io::stdout().flush().ok();

        let mut input = String::new();
        if io::stdin().read_line(&mut input).is_ok() {
            is_yes(&input)
        } else {
            false
        }
    }

    /// Print rows as a table sized to its widest cells.
    pub fn table(&self, columns: &[&str], rows: &[Vec<String>]) {
        let widths = column_widths(columns, rows);

        let header = pad_row(columns.iter().copied(), &widths);
        let rule_len = widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1);
        if self.colored {
            println!("    {}", header.bright_white().bold());
            println!("    {}", "─".repeat(rule_len).dimmed());
        } else {
            println!("    {}", header);
            println!("    {}", "-".repeat(rule_len));
        }

        for row in rows {
            println!("    {}", pad_row(row.iter().map(String::as_str), &widths));
        }
    }

    pub fn newline(&self) {
        println!();
    }
}

impl Confirm for Output {
    fn confirm(&self, prompt: &str) -> bool {
        Output::confirm(self, prompt)
    }
}

fn is_yes(input: &str) -> bool {
    matches!(input.trim().to_lowercase().as_str(), "y" | "yes" | "o" | "oui")
}

fn column_widths(columns: &[&str], rows: &[Vec<String>]) -> Vec<usize> {
    let mut widths: Vec<usize> = columns.iter().map(|c| c.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            let len = cell.chars().count();
            match widths.get_mut(i) {
                Some(w) => *w = (*w).max(len),
                None => widths.push(len),
            }
        }
    }
    widths
}

fn pad_row<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    cells
        .zip(widths)
        .map(|(cell, width)| format!("{:<width$}", cell, width = width))
        .collect::<Vec<_>>()
        .join("  ")
        .trim_end()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_no_color() {
        let output = Output::no_color();
        assert!(!output.colored);
        assert!(Output::default().colored);
    }

    #[test]
    fn test_is_yes() {
        assert!(is_yes("y\n"));
        assert!(is_yes(" YES "));
        assert!(is_yes("oui"));
        assert!(!is_yes(""));
        assert!(!is_yes("nope"));
    }

    #[test]
    fn test_column_widths_follow_longest_cell() {
        let rows = vec![
            vec!["1".to_string(), "Dupont Jean".to_string()],
            vec!["12".to_string(), "Li".to_string()],
        ];
        assert_eq!(column_widths(&["ID", "Beneficiary"], &rows), vec![2, 11]);
    }

    #[test]
    fn test_pad_row() {
        let row = pad_row(["a", "bb", "c"].into_iter(), &[3, 3, 1]);
        assert_eq!(row, "a    bb   c");
    }

    #[test]
    fn test_output_methods_no_panic() {
        let output = Output::no_color();

        output.success("saved");
        output.info("info");
        output.warning("warning");
        output.error("error");
        output.banner("Error while trying to load payments");
        output.created("config", "pension-desk.toml");
        output.header("Cases");
        output.subheader("Careers");
        output.kv("status", "validated");
        output.list_item("item");
        output.hint("hint");
        output.command("pension-desk login --token <token>");
        output.redirect("http://localhost:8088/logout");
        output.block("line one\nline two");
        output.table(&["ID", "Amount"], &[vec!["1".to_string(), "12.00".to_string()]]);
        output.table(&[], &[]);
        output.newline();
    }
}
