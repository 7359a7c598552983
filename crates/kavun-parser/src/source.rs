/// Reads a `.kvn` source file into executable lines: blank lines and `//`
/// comments are dropped up front, matching the reference reader, so the
/// block structurer and statement executor never have to special-case them.
pub fn read_lines(contents: &str) -> Vec<String> {
    contents
        .lines()
        .map(|line| line.to_string())
        .collect()
}

/// True when a source file has no executable content once comments and
/// blank lines are stripped (spec.md §6's empty-file banner case).
pub fn is_effectively_empty(lines: &[String]) -> bool {
    lines.iter().all(|line| {
        let trimmed = line.trim();
        trimmed.is_empty() || trimmed.starts_with("//")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_comment_only_file_as_empty() {
        let lines = read_lines("// sadece yorum\n\n   \n");
        assert!(is_effectively_empty(&lines));
    }

    #[test]
    fn detects_real_content() {
        let lines = read_lines("\"Merhaba\" yaz\n");
        assert!(!is_effectively_empty(&lines));
    }
}
