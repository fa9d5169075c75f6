//! Statement, query and clause nodes.

use serde::{Deserialize, Serialize};

use super::{Comment, Expr, FunctionCall, Name, OrderItem, RawStmt, TypeName, WindowSpec};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StatementKind {
    Select(Box<Select>),
    Union(Box<Union>),
    Insert(Box<Insert>),
    Update(Box<Update>),
    Delete(Box<Delete>),
    Merge(Box<Merge>),
    CreateTable(Box<CreateTable>),
    CreateIndex(Box<CreateIndex>),
    CreateView(Box<CreateView>),
    CreatePolicy(Box<CreatePolicy>),
    AlterTable(Box<AlterTable>),
    DropTable(Box<DropTable>),
    Explain(Box<Explain>),
    Grant(Box<Grant>),
    Truncate(Box<Truncate>),
    StandaloneValues(Box<Values>),
    Cte(Box<With>),
    Raw(Box<RawStmt>),
}

/// A query expression: the body of SELECTs, subqueries, CTEs and views.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Query {
    Select(Box<Select>),
    Union(Box<Union>),
    Values(Box<Values>),
    Paren(Box<Query>),
    With(Box<With>),
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Select {
    pub distinct: Option<Distinct>,
    /// T-SQL `TOP n [PERCENT] [WITH TIES]`, verbatim.
    pub top: Option<String>,
    pub columns: Vec<SelectColumn>,
    /// `SELECT ... INTO target` (T-SQL / PostgreSQL).
    pub into: Option<Name>,
    pub from: Vec<FromItem>,
    pub joins: Vec<Join>,
    pub where_clause: Option<Condition>,
    pub group_by: Option<GroupBy>,
    pub having: Option<Condition>,
    pub windows: Vec<NamedWindow>,
    pub order_by: Vec<OrderItem>,
    pub limit: Option<Limit>,
    pub offset: Option<Offset>,
    /// `FETCH FIRST n ROWS ONLY`, verbatim.
    pub fetch: Option<String>,
    /// `FOR UPDATE [OF ...]`, verbatim.
    pub locking: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Distinct {
    All,
    Distinct,
    DistinctOn(Vec<Expr>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectColumn {
    pub expr: Expr,
    pub alias: Option<Alias>,
    pub leading_comments: Vec<Comment>,
    pub trailing_comment: Option<Comment>,
}

impl SelectColumn {
    pub fn plain(expr: Expr) -> Self {
        Self {
            expr,
            alias: None,
            leading_comments: Vec::new(),
            trailing_comment: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alias {
    /// Whether `AS` was written; the printer always re-emits it.
    pub explicit: bool,
    pub name: String,
    pub columns: Vec<String>,
}

/// A WHERE/HAVING/ON payload with its trailing comment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub expr: Expr,
    pub trailing_comment: Option<Comment>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedWindow {
    pub name: String,
    pub spec: WindowSpec,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FromItem {
    pub lateral: bool,
    pub expr: TableExpr,
    pub ordinality: bool,
    /// `TABLESAMPLE method (args) [REPEATABLE (n)]`, verbatim.
    pub tablesample: Option<String>,
    /// T-SQL table hints: `WITH (NOLOCK)`, verbatim.
    pub hints: Option<String>,
    pub alias: Option<Alias>,
    pub leading_comments: Vec<Comment>,
    pub trailing_comment: Option<Comment>,
}

impl FromItem {
    pub fn table(name: Name) -> Self {
        Self {
            lateral: false,
            expr: TableExpr::Name(name),
            ordinality: false,
            tablesample: None,
            hints: None,
            alias: None,
            leading_comments: Vec::new(),
            trailing_comment: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TableExpr {
    Name(Name),
    Subquery(Box<Query>),
    Function(Box<FunctionCall>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Join {
    /// The normalized join phrase: `JOIN`, `LEFT OUTER JOIN`, `CROSS JOIN`.
    pub kind: String,
    pub item: FromItem,
    pub constraint: Option<JoinConstraint>,
    pub trailing_comment: Option<Comment>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum JoinConstraint {
    On(Condition),
    Using(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupBy {
    pub items: Vec<GroupItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GroupItem {
    Expr(Expr),
    GroupingSets(Vec<GroupItem>),
    Rollup(Vec<GroupItem>),
    Cube(Vec<GroupItem>),
    /// A parenthesized element inside a grouping set, possibly empty.
    Paren(Vec<GroupItem>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Limit {
    /// One value normally; two for MySQL `LIMIT offset, count`.
    pub values: Vec<Expr>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Offset {
    pub value: Expr,
    /// `ROW` / `ROWS` noise word, when written.
    pub rows: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Union {
    pub first: Query,
    pub arms: Vec<UnionArm>,
    pub order_by: Vec<OrderItem>,
    pub limit: Option<Limit>,
    pub offset: Option<Offset>,
    pub fetch: Option<String>,
    pub locking: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnionArm {
    pub op: SetOp,
    pub quantifier: Option<SetQuantifier>,
    pub query: Query,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SetOp {
    Union,
    Intersect,
    Except,
}

impl SetOp {
    pub fn as_str(self) -> &'static str {
        match self {
            SetOp::Union => "UNION",
            SetOp::Intersect => "INTERSECT",
            SetOp::Except => "EXCEPT",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SetQuantifier {
    All,
    Distinct,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Values {
    pub rows: Vec<ValuesRow>,
    pub order_by: Vec<OrderItem>,
    pub limit: Option<Limit>,
    pub offset: Option<Offset>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValuesRow {
    pub exprs: Vec<Expr>,
    pub leading_comments: Vec<Comment>,
    pub trailing_comment: Option<Comment>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct With {
    pub recursive: bool,
    pub ctes: Vec<CteDef>,
    pub main: WithMain,
}

/// The statement a WITH prefix applies to. DML mains are only legal at the
/// top level; nested query contexts allow queries only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum WithMain {
    Query(Query),
    Insert(Box<Insert>),
    Update(Box<Update>),
    Delete(Box<Delete>),
    Merge(Box<Merge>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CteDef {
    pub name: String,
    pub columns: Vec<String>,
    pub materialized: Option<Materialized>,
    pub body: Query,
    /// `SEARCH DEPTH|BREADTH FIRST BY ... SET ...`, verbatim.
    pub search: Option<String>,
    /// `CYCLE ... SET ... [USING ...]`, verbatim.
    pub cycle: Option<String>,
    pub leading_comments: Vec<Comment>,
    pub trailing_comment: Option<Comment>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Materialized {
    Materialized,
    NotMaterialized,
}

// region: DML

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insert {
    /// MySQL modifiers between INSERT and INTO (`IGNORE`, `LOW_PRIORITY`).
    pub modifiers: Vec<String>,
    pub table: Name,
    pub table_alias: Option<Alias>,
    pub columns: Vec<String>,
    /// `OVERRIDING SYSTEM|USER VALUE`, verbatim.
    pub overriding: Option<String>,
    pub source: InsertSource,
    pub on_conflict: Option<OnConflict>,
    /// MySQL `ON DUPLICATE KEY UPDATE` assignments.
    pub on_duplicate: Vec<Assignment>,
    pub returning: Vec<SelectColumn>,
    /// T-SQL OUTPUT clause, verbatim.
    pub output: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InsertSource {
    Values(Values),
    Query(Query),
    /// MySQL `INSERT ... SET col = expr, ...`.
    Set(Vec<Assignment>),
    DefaultValues,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OnConflict {
    /// `(col, ...)` or `ON CONSTRAINT name`, verbatim.
    pub target: Option<String>,
    pub action: OnConflictAction,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum OnConflictAction {
    DoNothing,
    DoUpdate {
        set: Vec<Assignment>,
        where_clause: Option<Condition>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    pub target: AssignTarget,
    pub value: Expr,
    pub trailing_comment: Option<Comment>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AssignTarget {
    Column(Name),
    /// `(a, b) = (...)` row targets.
    Columns(Vec<Name>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Update {
    pub table: FromItem,
    /// MySQL multi-table update joins, written before SET.
    pub joins: Vec<Join>,
    pub set: Vec<Assignment>,
    pub from: Vec<FromItem>,
    pub from_joins: Vec<Join>,
    pub where_clause: Option<Condition>,
    pub order_by: Vec<OrderItem>,
    pub limit: Option<Limit>,
    pub returning: Vec<SelectColumn>,
    pub output: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Delete {
    /// MySQL multi-table delete targets (`DELETE t1, t2 FROM ...`).
    pub targets: Vec<Name>,
    pub from: Vec<FromItem>,
    pub joins: Vec<Join>,
    pub using: Vec<FromItem>,
    pub where_clause: Option<Condition>,
    pub order_by: Vec<OrderItem>,
    pub limit: Option<Limit>,
    pub returning: Vec<SelectColumn>,
    pub output: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Merge {
    pub target: FromItem,
    pub source: FromItem,
    pub on: Condition,
    pub clauses: Vec<MergeClause>,
    pub output: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergeClause {
    /// `WHEN MATCHED`, `WHEN NOT MATCHED`, `WHEN NOT MATCHED BY SOURCE`.
    pub when: String,
    /// The `AND ...` guard, when present.
    pub condition: Option<Expr>,
    pub action: MergeAction,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MergeAction {
    Update { set: Vec<Assignment> },
    Insert { columns: Vec<String>, values: Vec<Expr> },
    InsertDefaultValues,
    Delete,
    DoNothing,
    Raw(String),
}

// endregion

// region: DDL

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateTable {
    pub or_replace: bool,
    /// `TEMP`, `UNLOGGED`, `GLOBAL TEMPORARY` words between CREATE and TABLE.
    pub modifiers: Vec<String>,
    pub if_not_exists: bool,
    pub name: Name,
    pub body: CreateTableBody,
    /// Options tail (`ENGINE=...`, `WITH (...)`, `PARTITION BY ...`),
    /// verbatim up to the statement boundary.
    pub options: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CreateTableBody {
    Elements {
        elements: Vec<TableElement>,
        trailing_comma: bool,
    },
    AsQuery(Query),
    Like(Name),
    ParenQuery(Query),
    /// `CREATE TABLE name PARTITION OF ...` style bodies with no paren list.
    None,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TableElement {
    Column(ColumnDef),
    Constraint(TableConstraint),
    Raw(RawElement),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDef {
    pub name: String,
    pub ty: Option<TypeName>,
    /// Column constraints and defaults, verbatim.
    pub constraints: Option<String>,
    pub leading_comments: Vec<Comment>,
    pub trailing_comment: Option<Comment>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableConstraint {
    /// `CONSTRAINT name` when named.
    pub name: Option<String>,
    /// The constraint body, verbatim.
    pub body: String,
    pub leading_comments: Vec<Comment>,
    pub trailing_comment: Option<Comment>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawElement {
    pub text: String,
    pub leading_comments: Vec<Comment>,
    pub trailing_comment: Option<Comment>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateIndex {
    pub unique: bool,
    pub concurrently: bool,
    pub if_not_exists: bool,
    pub name: Option<Name>,
    pub table: Name,
    pub using: Option<String>,
    pub columns: Vec<OrderItem>,
    pub include: Vec<String>,
    pub where_clause: Option<Condition>,
    pub options: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateView {
    pub or_replace: bool,
    pub materialized: bool,
    pub temporary: bool,
    pub name: Name,
    pub columns: Vec<String>,
    /// `WITH (...)` storage parameters before AS, verbatim.
    pub options: Option<String>,
    pub query: Query,
    /// `WITH CHECK OPTION` tail, verbatim.
    pub check_option: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatePolicy {
    pub name: String,
    pub table: Name,
    /// `AS PERMISSIVE | RESTRICTIVE`.
    pub as_: Option<String>,
    /// `FOR ALL | SELECT | INSERT | ...`.
    pub for_: Option<String>,
    pub to: Vec<String>,
    pub using: Option<Expr>,
    pub with_check: Option<Expr>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlterTable {
    pub if_exists: bool,
    pub only: bool,
    pub name: Name,
    pub actions: Vec<AlterAction>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AlterAction {
    AddColumn {
        if_not_exists: bool,
        def: ColumnDef,
    },
    DropColumn {
        if_exists: bool,
        name: String,
        behavior: Option<String>,
    },
    AlterColumn {
        name: String,
        /// The action after the column name, verbatim (`SET NOT NULL`,
        /// `TYPE bigint USING ...`).
        action: String,
    },
    RenameColumn {
        from: String,
        to: String,
    },
    RenameTo {
        to: String,
    },
    DropConstraint {
        if_exists: bool,
        name: String,
        behavior: Option<String>,
    },
    AddConstraint(TableConstraint),
    OwnerTo(String),
    SetSchema(String),
    SetTablespace(String),
    Raw(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DropTable {
    /// `TABLE`, `VIEW`, `MATERIALIZED VIEW`, `INDEX`, ...
    pub object: String,
    pub concurrently: bool,
    pub if_exists: bool,
    pub names: Vec<Name>,
    /// `CASCADE` / `RESTRICT`.
    pub behavior: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Explain {
    /// Everything between EXPLAIN and the target statement, verbatim.
    pub options: Option<String>,
    pub target: Box<StatementKind>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grant {
    pub revoke: bool,
    /// The privilege list, verbatim.
    pub privileges: String,
    /// The `ON ...` object, verbatim.
    pub object: Option<String>,
    /// `TO` for GRANT, `FROM` for REVOKE.
    pub grantees_kw: String,
    pub grantees: Option<String>,
    /// `WITH GRANT OPTION` and similar tails, verbatim.
    pub tail: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Truncate {
    /// Whether the noise word TABLE was written.
    pub table_kw: bool,
    pub only: bool,
    pub tables: Vec<Name>,
    /// `RESTART IDENTITY`, `CASCADE`, verbatim.
    pub tail: Option<String>,
}

// endregion
