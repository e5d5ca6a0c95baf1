//! Typed vocabulary shared by the filter engine and the book repositories.
//!
//! Columns and sort directions are closed enumerations; free-text input from callers is
//! resolved into them with a fallback, so no caller-supplied string ever names a column.

use std::cmp::Ordering;
use std::fmt;
use std::fmt::{Display, Formatter};
use chrono::NaiveDateTime;
use crate::books::domain::model::BookEntity;

/// Columns of the book table that can be filtered or sorted on.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, Default)]
pub(crate) enum BookColumn {
    #[default]
    BookName,
    Author,
    BookType,
    Price,
    PublicationDate,
}

impl BookColumn {
    /// Attribute name as stored by the repositories.
    pub fn attribute(&self) -> &'static str {
        match self {
            BookColumn::BookName => "book_name",
            BookColumn::Author => "author",
            BookColumn::BookType => "book_type",
            BookColumn::Price => "price",
            BookColumn::PublicationDate => "publication_date",
        }
    }

    /// Resolves a sort token through the allow-list, falling back to [`BookColumn::BookName`].
    pub fn resolve(token: Option<&str>) -> BookColumn {
        token.map(BookColumn::from).unwrap_or_default()
    }
}

impl From<&str> for BookColumn {
    fn from(s: &str) -> Self {
        match s {
            "book_name" | "name" => BookColumn::BookName,
            "author" => BookColumn::Author,
            "book_type" | "type" => BookColumn::BookType,
            "price" => BookColumn::Price,
            "publication_date" => BookColumn::PublicationDate,
            _ => BookColumn::BookName,
        }
    }
}

impl Display for BookColumn {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}", self.attribute())
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
pub(crate) enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    /// Only the exact token `desc` selects descending order.
    pub fn resolve(token: Option<&str>) -> SortDirection {
        token.map(SortDirection::from).unwrap_or_default()
    }
}

impl From<&str> for SortDirection {
    fn from(s: &str) -> Self {
        match s {
            "desc" => SortDirection::Descending,
            _ => SortDirection::Ascending,
        }
    }
}

impl Display for SortDirection {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            SortDirection::Ascending => write!(f, "asc"),
            SortDirection::Descending => write!(f, "desc"),
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
pub(crate) struct SortOrder {
    pub column: BookColumn,
    pub direction: SortDirection,
}

impl SortOrder {
    pub fn new(column: BookColumn, direction: SortDirection) -> Self {
        Self { column, direction }
    }

    /// Orders two books by the sort column in the requested direction. Ties fall back to
    /// ascending name, which is unique, so the order is total.
    pub fn compare(&self, a: &BookEntity, b: &BookEntity) -> Ordering {
        let primary = match self.column {
            BookColumn::BookName => a.book_name.cmp(&b.book_name),
            BookColumn::Author => a.author.cmp(&b.author),
            BookColumn::BookType => a.book_type.cmp(&b.book_type),
            BookColumn::Price => a.price.total_cmp(&b.price),
            BookColumn::PublicationDate => a.publication_date.cmp(&b.publication_date),
        };
        let primary = match self.direction {
            SortDirection::Ascending => primary,
            SortDirection::Descending => primary.reverse(),
        };
        primary
            .then_with(|| a.book_name.cmp(&b.book_name))
            .then_with(|| a.book_id.cmp(&b.book_id))
    }

    pub fn sort(&self, books: &mut [BookEntity]) {
        books.sort_by(|a, b| self.compare(a, b));
    }
}

impl Display for SortOrder {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{} {}", self.column, self.direction)
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub(crate) enum Comparison {
    Eq,
    Gte,
    Lte,
}

impl Comparison {
    pub fn symbol(&self) -> &'static str {
        match self {
            Comparison::Eq => "=",
            Comparison::Gte => ">=",
            Comparison::Lte => "<=",
        }
    }

    fn accepts(&self, ordering: Option<Ordering>) -> bool {
        match (self, ordering) {
            (Comparison::Eq, Some(Ordering::Equal)) => true,
            (Comparison::Gte, Some(Ordering::Equal | Ordering::Greater)) => true,
            (Comparison::Lte, Some(Ordering::Equal | Ordering::Less)) => true,
            _ => false,
        }
    }
}

#[derive(Debug, PartialEq, Clone)]
pub(crate) enum PredicateValue {
    Text(String),
    Number(f64),
    Date(NaiveDateTime),
}

/// A single `column <op> value` condition.
#[derive(Debug, PartialEq, Clone)]
pub(crate) struct Predicate {
    pub column: BookColumn,
    pub comparison: Comparison,
    pub value: PredicateValue,
}

impl Predicate {
    pub fn new(column: BookColumn, comparison: Comparison, value: PredicateValue) -> Self {
        Self { column, comparison, value }
    }

    pub fn equal(column: BookColumn, value: PredicateValue) -> Self {
        Self::new(column, Comparison::Eq, value)
    }

    pub fn at_least(column: BookColumn, value: PredicateValue) -> Self {
        Self::new(column, Comparison::Gte, value)
    }

    pub fn at_most(column: BookColumn, value: PredicateValue) -> Self {
        Self::new(column, Comparison::Lte, value)
    }

    // A value of the wrong kind for the column never matches.
    pub fn matches(&self, book: &BookEntity) -> bool {
        let ordering = match (&self.column, &self.value) {
            (BookColumn::BookName, PredicateValue::Text(v)) => Some(book.book_name.as_str().cmp(v.as_str())),
            (BookColumn::Author, PredicateValue::Text(v)) => Some(book.author.as_str().cmp(v.as_str())),
            (BookColumn::BookType, PredicateValue::Text(v)) => Some(book.book_type.as_str().cmp(v.as_str())),
            (BookColumn::Price, PredicateValue::Number(v)) => book.price.partial_cmp(v),
            (BookColumn::PublicationDate, PredicateValue::Date(v)) => Some(book.publication_date.cmp(v)),
            _ => None,
        };
        self.comparison.accepts(ordering)
    }
}

/// Conjunction of predicates. An empty set matches every book.
#[derive(Debug, PartialEq, Clone, Default)]
pub(crate) struct PredicateSet {
    predicates: Vec<Predicate>,
}

impl PredicateSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, predicate: Predicate) {
        self.predicates.push(predicate);
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    pub fn len(&self) -> usize {
        self.predicates.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Predicate> {
        self.predicates.iter()
    }

    pub fn matches(&self, book: &BookEntity) -> bool {
        self.predicates.iter().all(|p| p.matches(book))
    }
}

impl<'a> IntoIterator for &'a PredicateSet {
    type Item = &'a Predicate;
    type IntoIter = std::slice::Iter<'a, Predicate>;

    fn into_iter(self) -> Self::IntoIter {
        self.predicates.iter()
    }
}

/// Row window of a page query.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub(crate) struct PageRequest {
    pub offset: usize,
    pub limit: usize,
}

impl PageRequest {
    /// `page` is 1-indexed; callers validate `page >= 1` and `limit >= 1`.
    pub fn from_page(page: u32, limit: u32) -> Self {
        let page = page.max(1) as usize;
        let limit = limit as usize;
        Self {
            offset: (page - 1).saturating_mul(limit),
            limit,
        }
    }

    pub fn slice<T>(&self, records: Vec<T>) -> Vec<T> {
        records.into_iter().skip(self.offset).take(self.limit).collect()
    }
}
