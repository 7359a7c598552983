/// Collects the lines belonging to one block, starting right after its
/// opening header line, up to (but not including) the matching `bitir`.
/// Nested blocks (any line ending in `:`) are tracked with a depth counter
/// so an inner `bitir` doesn't end the outer block early.
///
/// Returns the collected body and the index of the block's own closing
/// `bitir` line.
pub fn collect_block(lines: &[String], start: usize) -> (Vec<String>, usize) {
    let mut body = Vec::new();
    let mut depth: usize = 0;
    let mut ptr = start;

    while ptr < lines.len() {
        let trimmed = lines[ptr].trim();

        if trimmed == "bitir" && depth == 0 {
            break;
        }

        if trimmed.ends_with(':') {
            depth += 1;
            body.push(lines[ptr].clone());
            ptr += 1;
            continue;
        }

        if trimmed == "bitir" {
            depth -= 1;
            body.push(lines[ptr].clone());
            ptr += 1;
            continue;
        }

        body.push(lines[ptr].clone());
        ptr += 1;
    }

    (body, ptr)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(src: &str) -> Vec<String> {
        src.lines().map(String::from).collect()
    }

    #[test]
    fn stops_at_matching_bitir() {
        let src = lines("a yaz\nb yaz\nbitir\nc yaz");
        let (body, ptr) = collect_block(&src, 0);
        assert_eq!(body, vec!["a yaz".to_string(), "b yaz".to_string()]);
        assert_eq!(ptr, 2);
    }

    #[test]
    fn skips_nested_block_terminators() {
        let src = lines("doğru ise:\nx yaz\nbitir\nbitir\ndevam");
        let (body, ptr) = collect_block(&src, 0);
        assert_eq!(body.len(), 3);
        assert_eq!(src[ptr].trim(), "bitir");
    }
}
