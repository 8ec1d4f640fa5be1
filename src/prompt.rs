//! Interactive pick of a remembered source name

use std::io::{self, BufRead, Write};

/// Ask the user to pick one of `entries`.
///
/// An empty answer picks the first entry. Invalid answers ask again.
/// Returns `None` when input ends before a valid answer.
pub fn select<R: BufRead, W: Write>(
    entries: &[String],
    input: &mut R,
    output: &mut W,
) -> io::Result<Option<String>> {
    if entries.is_empty() {
        return Ok(None);
    }

    writeln!(output, "Select a source node name:")?;
    for (i, entry) in entries.iter().enumerate() {
        writeln!(output, "  {}) {}", i + 1, entry)?;
    }

    let mut line = String::new();
    loop {
        write!(output, "> [1-{}, default 1] ", entries.len())?;
        output.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            return Ok(None);
        }

        let answer = line.trim();
        if answer.is_empty() {
            return Ok(Some(entries[0].clone()));
        }

        match answer.parse::<usize>() {
            Ok(n) if (1..=entries.len()).contains(&n) => return Ok(Some(entries[n - 1].clone())),
            _ => writeln!(output, "Please enter a number between 1 and {}", entries.len())?,
        }
    }
}
