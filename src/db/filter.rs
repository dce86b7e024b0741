//! Filter predicate model for register searches.
//!
//! Tools collect caller arguments into a [`FilterSet`]; the query
//! builder renders it into SQL. The model owns the omission rules: an
//! absent argument, a value that is empty after normalization, or an
//! empty set contributes no predicate at all. Nothing in a `FilterSet`
//! ever binds an empty string.

/// Comparison kind, derivable from any [`Predicate`]. Useful for
/// asserting on plan shapes without destructuring values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Equals,
    LikeContains,
    LikePrefix,
    InSet,
    IsNull,
    IsNotNull,
}

/// A comparison and the value(s) it binds, fused so that a predicate
/// with the wrong payload is unrepresentable.
///
/// LIKE payloads are stored pattern-ready: metacharacters escaped and
/// `%` anchors already applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    Equals(String),
    LikeContains(String),
    LikePrefix(String),
    InSet(Vec<String>),
    IsNull,
    IsNotNull,
}

impl Predicate {
    pub fn comparison(&self) -> Comparison {
        match self {
            Predicate::Equals(_) => Comparison::Equals,
            Predicate::LikeContains(_) => Comparison::LikeContains,
            Predicate::LikePrefix(_) => Comparison::LikePrefix,
            Predicate::InSet(_) => Comparison::InSet,
            Predicate::IsNull => Comparison::IsNull,
            Predicate::IsNotNull => Comparison::IsNotNull,
        }
    }

    /// Number of parameters this predicate binds.
    pub fn bind_arity(&self) -> usize {
        match self {
            Predicate::Equals(_) | Predicate::LikeContains(_) | Predicate::LikePrefix(_) => 1,
            Predicate::InSet(values) => values.len(),
            Predicate::IsNull | Predicate::IsNotNull => 0,
        }
    }
}

/// A single column predicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterSpec {
    pub column: &'static str,
    pub predicate: Predicate,
}

/// Ordered collection of predicates, all combined with AND.
#[derive(Debug, Clone, Default)]
pub struct FilterSet {
    entries: Vec<FilterSpec>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Exact match on a trimmed value. Empty values are omitted.
    pub fn equals(&mut self, column: &'static str, raw: Option<&str>) {
        if let Some(value) = normalize(raw) {
            self.push(column, Predicate::Equals(value));
        }
    }

    /// Substring match on a trimmed value.
    pub fn like_contains(&mut self, column: &'static str, raw: Option<&str>) {
        if let Some(value) = normalize(raw) {
            self.push(
                column,
                Predicate::LikeContains(format!("%{}%", escape_like(&value))),
            );
        }
    }

    /// Substring match on a tag number, with tag normalization applied
    /// first so "P 101-A" and "P101-A" search the same.
    pub fn like_contains_tag(&mut self, column: &'static str, raw: Option<&str>) {
        let value = raw.map(normalize_tag).unwrap_or_default();
        if !value.is_empty() {
            self.push(
                column,
                Predicate::LikeContains(format!("%{}%", escape_like(&value))),
            );
        }
    }

    /// Prefix match on a trimmed value.
    pub fn like_prefix(&mut self, column: &'static str, raw: Option<&str>) {
        if let Some(value) = normalize(raw) {
            self.push(
                column,
                Predicate::LikePrefix(format!("{}%", escape_like(&value))),
            );
        }
    }

    /// Set membership. Elements are trimmed and empty elements dropped;
    /// a set with nothing left is omitted entirely.
    pub fn in_set(&mut self, column: &'static str, values: Option<&[String]>) {
        let Some(values) = values else { return };
        let kept: Vec<String> = values
            .iter()
            .filter_map(|v| normalize(Some(v)))
            .collect();
        if !kept.is_empty() {
            self.push(column, Predicate::InSet(kept));
        }
    }

    /// Tri-state null probe: `Some(true)` keeps rows where the column
    /// has a value, `Some(false)` keeps rows where it is NULL, `None`
    /// is omitted.
    pub fn presence(&mut self, column: &'static str, has_value: Option<bool>) {
        match has_value {
            Some(true) => self.push(column, Predicate::IsNotNull),
            Some(false) => self.push(column, Predicate::IsNull),
            None => {}
        }
    }

    fn push(&mut self, column: &'static str, predicate: Predicate) {
        self.entries.push(FilterSpec { column, predicate });
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn entries(&self) -> &[FilterSpec] {
        &self.entries
    }

    /// Total number of parameters the whole set binds.
    pub fn bind_arity(&self) -> usize {
        self.entries.iter().map(|e| e.predicate.bind_arity()).sum()
    }
}

/// Trim a raw argument, treating whitespace-only input as absent.
fn normalize(raw: Option<&str>) -> Option<String> {
    let trimmed = raw?.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Canonical tag-number form: all whitespace stripped. Register tags
/// are written inconsistently ("P-101 A" vs "P-101A"); searches and
/// exact lookups both go through this.
pub fn normalize_tag(raw: &str) -> String {
    raw.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Escape LIKE metacharacters so caller text matches literally. The
/// builder emits `ESCAPE '\'` alongside every LIKE it renders.
fn escape_like(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
