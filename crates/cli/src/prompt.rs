//! Yes/no confirmation for destructive commands.

use std::io::{self, BufRead, Write};

/// Asks `question` and reads one answer line.
///
/// Only `y` or `yes` (any case) confirm. End of input counts as "no".
pub fn confirm<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    question: &str,
) -> io::Result<bool> {
    write!(output, "{} (yes/no): ", question)?;
    output.flush()?;

    let mut answer = String::new();
    if input.read_line(&mut answer)? == 0 {
        writeln!(output)?;
        return Ok(false);
    }
    Ok(matches!(
        answer.trim().to_lowercase().as_str(),
        "y" | "yes"
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn ask(answer: &str) -> (bool, String) {
        let mut input = Cursor::new(answer.as_bytes().to_vec());
        let mut output = Vec::new();
        let confirmed = confirm(&mut input, &mut output, "Delete phone +1?").unwrap();
        (confirmed, String::from_utf8(output).unwrap())
    }

    #[test]
    fn test_confirm_accepts_yes() {
        assert!(ask("yes\n").0);
        assert!(ask("Y\n").0);
        assert!(ask("  YES  \n").0);
    }

    #[test]
    fn test_confirm_rejects_anything_else() {
        assert!(!ask("no\n").0);
        assert!(!ask("\n").0);
        assert!(!ask("yep\n").0);
    }

    #[test]
    fn test_confirm_end_of_input_declines() {
        assert!(!ask("").0);
    }

    #[test]
    fn test_confirm_writes_question() {
        let (_, output) = ask("no\n");
        assert_eq!(output, "Delete phone +1? (yes/no): ");
    }
}
