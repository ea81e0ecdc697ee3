use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

/// SQLite date/time idioms and their PostgreSQL equivalents, applied in order.
/// Each entry is `(name, pattern, replacement)`; replacements use regex capture
/// syntax (`${1}`). Supporting a new idiom means adding a row here.
///
/// Matching is textual and case-insensitive throughout, format strings included:
/// `strftime('%M', ..)` is read as a month like `'%m'`, and `'%y'` as a year. An
/// idiom spelled inside a string literal is rewritten too.
const POSTGRES_IDIOM_TABLE: &[(&str, &str, &str)] = &[
    ("now", r"(?i)datetime\(\s*'now'\s*\)", "NOW()"),
    (
        "now_minus_days",
        r"(?i)datetime\(\s*'now'\s*,\s*'-([0-9]+)\s+days'\s*\)",
        "NOW() - INTERVAL '${1} days'",
    ),
    ("current_date", r"(?i)date\(\s*'now'\s*\)", "CURRENT_DATE"),
    (
        "year_of",
        r"(?i)strftime\(\s*'%Y'\s*,\s*([^)]+)\)",
        "TO_CHAR(${1}, 'YYYY')",
    ),
    (
        "month_of",
        r"(?i)strftime\(\s*'%m'\s*,\s*([^)]+)\)",
        "TO_CHAR(${1}, 'MM')",
    ),
    (
        "timestamp_minus_week",
        r"(?i)CURRENT_TIMESTAMP\s*-\s*INTERVAL\s*'7\s*days'",
        "NOW() - INTERVAL '7 days'",
    ),
];

/// A compiled idiom rewrite rule.
#[derive(Debug)]
pub struct Idiom {
    pub name: &'static str,
    pattern: Regex,
    replacement: &'static str,
}

impl Idiom {
    fn apply<'a>(&self, sql: &'a str) -> Cow<'a, str> {
        self.pattern.replace_all(sql, self.replacement)
    }
}

static POSTGRES_IDIOMS: LazyLock<Vec<Idiom>> = LazyLock::new(|| {
    POSTGRES_IDIOM_TABLE
        .iter()
        .map(|&(name, pattern, replacement)| Idiom {
            name,
            pattern: Regex::new(pattern).unwrap(),
            replacement,
        })
        .collect()
});

/// The compiled PostgreSQL idiom table, in application order.
pub fn postgres_idioms() -> &'static [Idiom] {
    &POSTGRES_IDIOMS
}

/// Replace every recognized SQLite date/time idiom with its PostgreSQL form.
/// Text that matches no idiom is returned unchanged.
pub fn rewrite_idioms(sql: &str) -> String {
    let mut converted = sql.to_string();
    for idiom in postgres_idioms() {
        let rewritten = match idiom.apply(&converted) {
            Cow::Borrowed(_) => continue,
            Cow::Owned(rewritten) => rewritten,
        };
        converted = rewritten;
    }
    converted
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_now() {
        assert_eq!(
            rewrite_idioms("INSERT INTO papers (created_at) VALUES (datetime('now'))"),
            "INSERT INTO papers (created_at) VALUES (NOW())"
        );
        assert_eq!(rewrite_idioms("SELECT DATETIME( 'now' )"), "SELECT NOW()");
    }

    #[test]
    fn test_now_minus_days() {
        assert_eq!(
            rewrite_idioms("WHERE created_at >= datetime('now', '-30 days')"),
            "WHERE created_at >= NOW() - INTERVAL '30 days'"
        );
    }

    #[test]
    fn test_current_date() {
        assert_eq!(
            rewrite_idioms("WHERE date(s.start_date) >= date('now')"),
            "WHERE date(s.start_date) >= CURRENT_DATE"
        );
    }

    #[test]
    fn test_year_and_month() {
        assert_eq!(
            rewrite_idioms(
                "AND strftime('%Y', s.start_date) = ? AND strftime('%m', s.start_date) = ?"
            ),
            "AND TO_CHAR(s.start_date, 'YYYY') = ? AND TO_CHAR(s.start_date, 'MM') = ?"
        );
    }

    #[test]
    fn test_format_strings_match_any_case() {
        assert_eq!(
            rewrite_idioms("SELECT STRFTIME('%y', created_at), strftime('%M', created_at) FROM videos"),
            "SELECT TO_CHAR(created_at, 'YYYY'), TO_CHAR(created_at, 'MM') FROM videos"
        );
    }

    #[test]
    fn test_timestamp_minus_week() {
        assert_eq!(
            rewrite_idioms("WHERE created_at >= current_timestamp - interval '7 days'"),
            "WHERE created_at >= NOW() - INTERVAL '7 days'"
        );
    }

    #[test]
    fn test_unknown_idioms_pass_through() {
        let sql = "SELECT julianday('now') - julianday(start_date), datetime('now', '+1 day') FROM schedules";
        assert_eq!(rewrite_idioms(sql), sql);
    }

    #[test]
    fn test_idioms_inside_literals_are_rewritten() {
        assert_eq!(
            rewrite_idioms("SELECT 'use date(''now'')' AS hint, 'date('now')' AS raw"),
            "SELECT 'use date(''now'')' AS hint, 'CURRENT_DATE' AS raw"
        );
    }

    #[test]
    fn test_table_compiles() {
        let names: Vec<&str> = postgres_idioms().iter().map(|i| i.name).collect();
        assert_eq!(names.len(), POSTGRES_IDIOM_TABLE.len());
        assert_eq!(names[0], "now");
    }
}
