//! Dialect profiles: the closed keyword and handler data that parameterize
//! the lexer and parser for one SQL dialect.
//!
//! Profiles are frozen at construction. The `ansi` profile is the baseline;
//! the other built-ins are additive/subtractive overrides over it.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// How the parser treats a statement beginning with a given starter keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatementHandler {
    /// Dispatch to a typed statement parser.
    Structured,
    /// Consume verbatim up to the next statement boundary.
    VerbatimUnsupported,
    /// The starter keyword alone is the whole statement (T-SQL `GO`).
    SingleLineUnsupported,
    /// Consume the rest of the input verbatim (MySQL `DELIMITER` scripts).
    DelimiterScript,
}

/// A frozen set of keyword and handler data for one SQL dialect.
///
/// The four built-in profiles are exposed through [`Dialect::profile`].
/// User-supplied dialects may add clause keywords via
/// [`DialectProfile::with_clause_keywords`] but never remove baseline ones.
#[derive(Debug, Clone)]
pub struct DialectProfile {
    name: &'static str,
    keywords: HashSet<&'static str>,
    function_keywords: HashSet<&'static str>,
    clause_keywords: HashSet<String>,
    statement_starters: HashSet<&'static str>,
    statement_handlers: HashMap<&'static str, StatementHandler>,
    /// Prefixes that open a line comment, e.g. `--` everywhere, `#` in MySQL.
    line_comment_prefixes: Vec<&'static str>,
    /// MySQL backtick-quoted identifiers.
    backtick_identifiers: bool,
    /// T-SQL `[bracketed]` identifiers; otherwise `[` is punctuation.
    bracket_identifiers: bool,
    /// Backslash escapes inside plain `'...'` literals (MySQL).
    backslash_string_escapes: bool,
    /// T-SQL `<name, type, default>` template placeholders.
    template_placeholders: bool,
}

impl DialectProfile {
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Whether `upper` lexes as a keyword rather than an identifier.
    pub fn is_keyword(&self, upper: &str) -> bool {
        self.keywords.contains(upper)
    }

    /// Keywords that still parse as a function call when followed by `(`.
    pub fn is_function_keyword(&self, upper: &str) -> bool {
        self.function_keywords.contains(upper)
    }

    /// Keywords that terminate implicit alias scanning and demarcate
    /// top-level clause boundaries.
    pub fn is_clause_keyword(&self, upper: &str) -> bool {
        self.clause_keywords.contains(upper)
    }

    /// Keywords legal as the first token of a top-level statement.
    pub fn is_statement_starter(&self, upper: &str) -> bool {
        self.statement_starters.contains(upper)
    }

    /// The handler for a statement starter, if the starter is known.
    pub fn handler(&self, upper: &str) -> Option<StatementHandler> {
        self.statement_handlers.get(upper).copied()
    }

    pub(crate) fn line_comment_prefixes(&self) -> &[&'static str] {
        &self.line_comment_prefixes
    }

    pub(crate) fn backtick_identifiers(&self) -> bool {
        self.backtick_identifiers
    }

    pub(crate) fn bracket_identifiers(&self) -> bool {
        self.bracket_identifiers
    }

    pub(crate) fn backslash_string_escapes(&self) -> bool {
        self.backslash_string_escapes
    }

    pub(crate) fn template_placeholders(&self) -> bool {
        self.template_placeholders
    }

    /// Derive a profile with extra clause keywords merged in (uppercased).
    ///
    /// This is the only supported form of user extension; all other fields
    /// stay fixed per the built-in profiles.
    #[must_use]
    pub fn with_clause_keywords<I, S>(&self, extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut profile = self.clone();
        profile
            .clause_keywords
            .extend(extra.into_iter().map(|s| s.as_ref().to_ascii_uppercase()));
        profile
    }
}

/// Selector for one of the built-in dialect profiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    #[default]
    Ansi,
    Postgres,
    Mysql,
    Tsql,
}

impl Dialect {
    pub fn profile(self) -> &'static DialectProfile {
        match self {
            Dialect::Ansi => &ANSI,
            Dialect::Postgres => &POSTGRES,
            Dialect::Mysql => &MYSQL,
            Dialect::Tsql => &TSQL,
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Dialect::Ansi => "ansi",
            Dialect::Postgres => "postgres",
            Dialect::Mysql => "mysql",
            Dialect::Tsql => "tsql",
        })
    }
}

impl FromStr for Dialect {
    type Err = UnknownDialect;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ansi" | "sql" => Ok(Dialect::Ansi),
            "postgres" | "postgresql" | "pg" => Ok(Dialect::Postgres),
            "mysql" | "mariadb" => Ok(Dialect::Mysql),
            "tsql" | "mssql" | "sqlserver" => Ok(Dialect::Tsql),
            _ => Err(UnknownDialect(s.to_string())),
        }
    }
}

/// Error returned when a dialect name is not one of the built-ins.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown dialect {0:?}, expected one of ansi, postgres, mysql, tsql")]
pub struct UnknownDialect(pub String);

const ANSI_KEYWORDS: &[&str] = &[
    "ALL",
    "ALTER",
    "AND",
    "ANY",
    "AS",
    "ASC",
    "BETWEEN",
    "BOTH",
    "BY",
    "CASCADE",
    "CASE",
    "CAST",
    "CHECK",
    "COLLATE",
    "COLUMN",
    "CONSTRAINT",
    "CREATE",
    "CROSS",
    "CURRENT_DATE",
    "CURRENT_TIME",
    "CURRENT_TIMESTAMP",
    "CURRENT_USER",
    "DEFAULT",
    "DELETE",
    "DESC",
    "DISTINCT",
    "DROP",
    "ELSE",
    "END",
    "EXCEPT",
    "EXISTS",
    "EXTRACT",
    "FALSE",
    "FETCH",
    "FILTER",
    "FOR",
    "FOREIGN",
    "FROM",
    "FULL",
    "GRANT",
    "GROUP",
    "GROUPING",
    "HAVING",
    "IN",
    "INNER",
    "INSERT",
    "INTERSECT",
    "INTO",
    "IS",
    "JOIN",
    "LATERAL",
    "LEADING",
    "LEFT",
    "LIKE",
    "LIMIT",
    "LOCALTIME",
    "LOCALTIMESTAMP",
    "MERGE",
    "NATURAL",
    "NOT",
    "NULL",
    "OFFSET",
    "ON",
    "OR",
    "ORDER",
    "OUTER",
    "OVER",
    "OVERLAY",
    "PARTITION",
    "POSITION",
    "PRIMARY",
    "REFERENCES",
    "RESTRICT",
    "REVOKE",
    "RIGHT",
    "ROLLUP",
    "ROW",
    "ROWS",
    "SELECT",
    "SESSION_USER",
    "SET",
    "SIMILAR",
    "SOME",
    "SUBSTRING",
    "TABLE",
    "THEN",
    "TO",
    "TRAILING",
    "TRIM",
    "TRUE",
    "TRUNCATE",
    "UNION",
    "UNIQUE",
    "UPDATE",
    "USING",
    "VALUES",
    "WHEN",
    "WHERE",
    "WINDOW",
    "WITH",
    "WITHIN",
];

const ANSI_CLAUSE_KEYWORDS: &[&str] = &[
    "AND",
    "CROSS",
    "ELSE",
    "END",
    "EXCEPT",
    "FETCH",
    "FILTER",
    "FOR",
    "FROM",
    "FULL",
    "GROUP",
    "HAVING",
    "INNER",
    "INTERSECT",
    "INTO",
    "IS",
    "JOIN",
    "LATERAL",
    "LEFT",
    "LIMIT",
    "NATURAL",
    "OFFSET",
    "ON",
    "OR",
    "ORDER",
    "OUTER",
    "OVER",
    "RETURNING",
    "RIGHT",
    "SET",
    "TABLESAMPLE",
    "THEN",
    "UNION",
    "USING",
    "VALUES",
    "WHEN",
    "WHERE",
    "WINDOW",
    "WITH",
    "WITHIN",
];

const ANSI_STRUCTURED_STARTERS: &[&str] = &[
    "SELECT", "WITH", "INSERT", "UPDATE", "DELETE", "CREATE", "ALTER", "DROP", "MERGE", "EXPLAIN",
    "GRANT", "REVOKE", "TRUNCATE", "VALUES",
];

/// Transaction-control and session-state starters consumed verbatim.
const ANSI_VERBATIM_STARTERS: &[&str] = &[
    "BEGIN",
    "COMMIT",
    "ROLLBACK",
    "SAVEPOINT",
    "RELEASE",
    "START",
    "SET",
    "RESET",
    "ANALYZE",
    "VACUUM",
    "DECLARE",
    "PREPARE",
    "EXECUTE",
    "DEALLOCATE",
    "USE",
    "DO",
    "END",
    "IF",
    "SHOW",
    "COPY",
];

fn build_ansi() -> DialectProfile {
    let mut statement_starters: HashSet<&'static str> = HashSet::new();
    let mut statement_handlers: HashMap<&'static str, StatementHandler> = HashMap::new();

    for starter in ANSI_STRUCTURED_STARTERS {
        statement_starters.insert(starter);
        statement_handlers.insert(starter, StatementHandler::Structured);
    }
    for starter in ANSI_VERBATIM_STARTERS {
        statement_starters.insert(starter);
        statement_handlers.insert(starter, StatementHandler::VerbatimUnsupported);
    }

    DialectProfile {
        name: "ansi",
        keywords: ANSI_KEYWORDS.iter().copied().collect(),
        function_keywords: ["LEFT", "RIGHT"].into_iter().collect(),
        clause_keywords: ANSI_CLAUSE_KEYWORDS
            .iter()
            .map(|s| (*s).to_string())
            .collect(),
        statement_starters,
        statement_handlers,
        line_comment_prefixes: vec!["--"],
        backtick_identifiers: false,
        bracket_identifiers: false,
        backslash_string_escapes: false,
        template_placeholders: false,
    }
}

static ANSI: Lazy<DialectProfile> = Lazy::new(build_ansi);

static POSTGRES: Lazy<DialectProfile> = Lazy::new(|| {
    let mut profile = build_ansi();
    profile.name = "postgres";
    profile.keywords.extend([
        "ANALYZE",
        "ARRAY",
        "CONCURRENTLY",
        "CONFLICT",
        "DO",
        "ILIKE",
        "ISNULL",
        "NOTNULL",
        "ONLY",
        "RETURNING",
    ]);
    profile
        .clause_keywords
        .extend(["ILIKE".to_string(), "ISNULL".to_string(), "NOTNULL".to_string()]);
    profile
});

static MYSQL: Lazy<DialectProfile> = Lazy::new(|| {
    let mut profile = build_ansi();
    profile.name = "mysql";
    profile.keywords.extend([
        "DIV",
        "IGNORE",
        "INDEX",
        "KEY",
        "LOW_PRIORITY",
        "REGEXP",
        "REPLACE",
        "RLIKE",
        "SEPARATOR",
        "STRAIGHT_JOIN",
        "XOR",
    ]);
    profile
        .clause_keywords
        .extend(["SEPARATOR".to_string(), "STRAIGHT_JOIN".to_string()]);
    profile.statement_starters.insert("DELIMITER");
    profile
        .statement_handlers
        .insert("DELIMITER", StatementHandler::DelimiterScript);
    for starter in ["LOCK", "UNLOCK", "REPLACE"] {
        profile.statement_starters.insert(starter);
        profile
            .statement_handlers
            .insert(starter, StatementHandler::VerbatimUnsupported);
    }
    profile.line_comment_prefixes.push("#");
    profile.backtick_identifiers = true;
    profile.backslash_string_escapes = true;
    profile
});

static TSQL: Lazy<DialectProfile> = Lazy::new(|| {
    let mut profile = build_ansi();
    profile.name = "tsql";
    profile.keywords.extend([
        "EXEC",
        "GO",
        "IDENTITY",
        "NOLOCK",
        "OUTPUT",
        "PIVOT",
        "PROC",
        "TOP",
        "UNPIVOT",
    ]);
    profile
        .clause_keywords
        .extend(["OUTPUT".to_string(), "OPTION".to_string(), "PIVOT".to_string(), "UNPIVOT".to_string()]);
    profile.statement_starters.insert("GO");
    profile
        .statement_handlers
        .insert("GO", StatementHandler::SingleLineUnsupported);
    for starter in ["EXEC", "PRINT", "WHILE"] {
        profile.statement_starters.insert(starter);
        profile
            .statement_handlers
            .insert(starter, StatementHandler::VerbatimUnsupported);
    }
    profile.bracket_identifiers = true;
    profile.template_placeholders = true;
    profile
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtins_are_frozen_variants_of_ansi() {
        for dialect in [Dialect::Ansi, Dialect::Postgres, Dialect::Mysql, Dialect::Tsql] {
            let profile = dialect.profile();
            assert!(profile.is_keyword("SELECT"), "{dialect} lost SELECT");
            assert!(profile.is_clause_keyword("FROM"), "{dialect} lost FROM");
            assert!(profile.is_statement_starter("INSERT"));
            assert_eq!(profile.handler("SELECT"), Some(StatementHandler::Structured));
        }
    }

    #[test]
    fn dialect_specific_lexing_flags() {
        assert!(Dialect::Mysql.profile().backtick_identifiers());
        assert!(!Dialect::Postgres.profile().backtick_identifiers());
        assert!(Dialect::Tsql.profile().bracket_identifiers());
        assert!(Dialect::Mysql
            .profile()
            .line_comment_prefixes()
            .contains(&"#"));
    }

    #[test]
    fn handlers_for_special_scripts() {
        assert_eq!(
            Dialect::Mysql.profile().handler("DELIMITER"),
            Some(StatementHandler::DelimiterScript)
        );
        assert_eq!(
            Dialect::Tsql.profile().handler("GO"),
            Some(StatementHandler::SingleLineUnsupported)
        );
        assert_eq!(Dialect::Ansi.profile().handler("DELIMITER"), None);
    }

    #[test]
    fn clause_keyword_extension_is_additive() {
        let base = Dialect::Ansi.profile();
        let extended = base.with_clause_keywords(["qualify"]);
        assert!(extended.is_clause_keyword("QUALIFY"));
        assert!(extended.is_clause_keyword("FROM"));
        assert!(!base.is_clause_keyword("QUALIFY"));
    }

    #[test]
    fn dialect_names_round_trip() {
        for name in ["ansi", "postgres", "mysql", "tsql"] {
            let dialect: Dialect = name.parse().unwrap();
            assert_eq!(dialect.to_string(), name);
        }
        assert!("oracle".parse::<Dialect>().is_err());
    }
}
