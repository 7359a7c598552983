/// Rewrites postfix relational phrases (`A B eşit`, `A B farklı`, `A B
/// küçüktür`, `A B büyüktür`) into ordinary infix order (`A == B`) before
/// tokenizing. This is the one piece of Turkish-operator handling that can't
/// be folded into the lexer's keyword table, because postfix
/// operand-operand-operator order isn't something an ordinary
/// precedence-climbing parser accepts; the lexer still handles the infix
/// form (`A eşit B`) directly via its keyword table, so both orders work.
///
/// All four relational keywords get the same postfix treatment: condition
/// headers like `n 1 küçüktür ise:` and `x 5 büyüktür ise:` read naturally
/// in Turkish word order and must parse, not just `A B eşit`/`A B farklı`.
///
/// Operates on whitespace-separated tokens, matching the reference
/// implementation's requirement that both operands be single tokens with no
/// embedded whitespace.
pub fn translate_postfix_relational(text: &str) -> String {
    let words: Vec<&str> = text.split_whitespace().collect();
    let mut out: Vec<String> = Vec::with_capacity(words.len());

    for word in words {
        let op = match word {
            "eşit" => Some("=="),
            "farklı" => Some("!="),
            "küçüktür" => Some("<"),
            "büyüktür" => Some(">"),
            _ => None,
        };
        match op {
            Some(op) if out.len() >= 2 => {
                let b = out.pop().unwrap();
                let a = out.pop().unwrap();
                out.push(format!("{a} {op} {b}"));
            }
            _ => out.push(word.to_string()),
        }
    }

    out.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rewrites_postfix_relational_phrase() {
        assert_eq!(translate_postfix_relational("x y eşit"), "x == y");
        assert_eq!(translate_postfix_relational("a b farklı"), "a != b");
    }

    #[test]
    fn leaves_infix_usage_untouched() {
        assert_eq!(translate_postfix_relational("x eşit y"), "x eşit y");
    }

    #[test]
    fn handles_chained_postfix_phrases() {
        assert_eq!(translate_postfix_relational("1 2 eşit ve 3 4 farklı"), "1 == 2 ve 3 != 4");
    }

    #[test]
    fn rewrites_postfix_ordering_phrase() {
        assert_eq!(translate_postfix_relational("n 1 küçüktür"), "n < 1");
        assert_eq!(translate_postfix_relational("x 5 büyüktür"), "x > 5");
    }
}
