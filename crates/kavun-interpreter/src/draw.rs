/// ASCII-art drawing builtins (spec.md §B). Each returns the lines to print
/// rather than printing directly, so callers can apply color or redirect
/// output without duplicating the shape logic.
pub fn triangle(size: usize) -> Vec<String> {
    (0..size)
        .map(|i| format!("{}{}", " ".repeat(size - i - 1), "*".repeat(2 * i + 1)))
        .collect()
}

pub fn square(size: usize) -> Vec<String> {
    (0..size)
        .map(|i| {
            if i == 0 || i == size - 1 {
                "*".repeat(size)
            } else {
                format!("*{}*", " ".repeat(size.saturating_sub(2)))
            }
        })
        .collect()
}

pub fn heart() -> Vec<String> {
    [
        "  ***   ***  ",
        " ***** ***** ",
        "************* ",
        " *********** ",
        "  *********  ",
        "   *******   ",
        "    *****    ",
        "     ***     ",
        "      *      ",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

/// Simple horizontal bar chart, scaled so the largest value fills 20
/// columns of `█`.
pub fn bar_chart(values: &[f64]) -> Vec<String> {
    let Some(&max) = values.iter().max_by(|a, b| a.partial_cmp(b).unwrap()) else {
        return Vec::new();
    };
    if max == 0.0 {
        return values.iter().enumerate().map(|(i, v)| format!("{:2}: {v}", i + 1)).collect();
    }
    values
        .iter()
        .enumerate()
        .map(|(i, v)| {
            let bar_length = ((v / max) * 20.0) as usize;
            format!("{:2}: {} {v}", i + 1, "█".repeat(bar_length))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn triangle_grows_each_row() {
        let rows = triangle(3);
        assert_eq!(rows, vec!["  *", " ***", "*****"]);
    }

    #[test]
    fn square_is_hollow_inside() {
        let rows = square(4);
        assert_eq!(rows, vec!["****", "*  *", "*  *", "****"]);
    }

    #[test]
    fn bar_chart_scales_to_twenty_columns() {
        let rows = bar_chart(&[5.0, 10.0]);
        assert_eq!(rows[1], " 2: ████████████████████ 10");
    }
}
