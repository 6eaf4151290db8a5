//! Reader for `author=color` override files.

use lg_core::{AuthorColor, LogGraphError, Result};

/// Parse one binding per line. Blank lines and lines starting with `#` or
/// `!` are skipped; whitespace around the author and the color is ignored.
/// A repeated author keeps its first position and its last color.
pub fn parse_author_colors(input: &str) -> Result<Vec<AuthorColor>> {
    let mut bindings: Vec<AuthorColor> = Vec::new();
    for (index, raw) in input.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
            continue;
        }
        let Some((author, color)) = line.split_once('=') else {
            return Err(LogGraphError::MalformedOverride {
                line: index + 1,
                content: raw.to_string(),
            });
        };
        let (author, color) = (author.trim(), color.trim());
        if author.is_empty() || color.is_empty() {
            return Err(LogGraphError::MalformedOverride {
                line: index + 1,
                content: raw.to_string(),
            });
        }
        match bindings.iter_mut().find(|binding| binding.author == author) {
            Some(binding) => binding.color = color.to_string(),
            None => bindings.push(AuthorColor::new(author, color)),
        }
    }
    Ok(bindings)
}
