/// How `?` placeholders are located in statement text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaceholderScan {
    /// Every `?` is a placeholder, including ones inside quoted literals.
    #[default]
    Naive,
    /// `?` inside single-quoted literals or double-quoted identifiers is left alone.
    LiteralAware,
}

/// Replace each `?` placeholder with `$1`, `$2`, ... from left to right.
/// Returns the rewritten text and the number of placeholders found.
pub fn renumber_placeholders(sql: &str, scan: PlaceholderScan) -> (String, usize) {
    let mut out = String::with_capacity(sql.len() + 8);
    let mut count = 0;
    scan_placeholders(sql, scan, |piece| match piece {
        Piece::Text(c) => out.push(c),
        Piece::Placeholder => {
            count += 1;
            out.push('$');
            out.push_str(&count.to_string());
        }
    });
    (out, count)
}

/// Count the placeholders `renumber_placeholders` would rewrite.
pub fn count_placeholders(sql: &str, scan: PlaceholderScan) -> usize {
    let mut count = 0;
    scan_placeholders(sql, scan, |piece| {
        if piece == Piece::Placeholder {
            count += 1;
        }
    });
    count
}

#[derive(Debug, PartialEq, Eq)]
enum Piece {
    Text(char),
    Placeholder,
}

fn scan_placeholders<F: FnMut(Piece)>(sql: &str, scan: PlaceholderScan, mut emit: F) {
    let mut in_single = false;
    let mut in_double = false;

    for c in sql.chars() {
        match c {
            '?' if !in_single && !in_double => emit(Piece::Placeholder),
            // Doubled quotes toggle twice, so escapes need no special case.
            '\'' if scan == PlaceholderScan::LiteralAware && !in_double => {
                in_single = !in_single;
                emit(Piece::Text(c));
            }
            '"' if scan == PlaceholderScan::LiteralAware && !in_single => {
                in_double = !in_double;
                emit(Piece::Text(c));
            }
            _ => emit(Piece::Text(c)),
        }
    }
}
