//! Utilidades de salida en terminal.

use colored::*;

use crate::checks::Outcome;

pub fn header(title: &str) {
    println!("\n{}", title.bold().cyan());
}

/// `1 file`, `2 files`
pub fn count(n: usize, singular: &str, plural: &str) -> String {
    format!("{} {}", n, if n == 1 { singular } else { plural })
}

pub fn ok(file: &str, message: &str) {
    println!("{} {}: {}", "✅".green(), file, message);
}

pub fn warning(file: &str, message: &str) {
    println!("{} Warning in {}: {}", "⚠️".yellow(), file.yellow(), message);
}

pub fn error(file: &str, message: &str) {
    println!("{} Error in {}: {}", "❌".red(), file.red().bold(), message);
}

pub fn hint(text: &str) {
    println!("   {} {}", "Fix:".dimmed(), text);
}

pub fn status(outcome: Outcome, file: &str, message: &str) {
    match outcome {
        Outcome::Ok => ok(file, message),
        Outcome::Warn => warning(file, message),
        Outcome::Error => error(file, message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn count_pluralizes() {
        assert_eq!(count(0, "file", "files"), "0 files");
        assert_eq!(count(1, "import", "imports"), "1 import");
        assert_eq!(count(3, "import", "imports"), "3 imports");
    }
}
