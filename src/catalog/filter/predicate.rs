use crate::books::query::{BookColumn, Predicate, PredicateSet, PredicateValue};
use crate::catalog::filter::NormalizedFilter;

// Equality on name, author, type and price, inclusive range on the publication date.
// Absent fields add nothing, so an empty filter yields an empty set that matches everything.
pub(crate) fn build_predicates(filter: &NormalizedFilter) -> PredicateSet {
    let mut predicates = PredicateSet::new();
    let text_fields = [
        (BookColumn::BookName, &filter.book_name),
        (BookColumn::Author, &filter.author),
        (BookColumn::BookType, &filter.book_type),
    ];
    for (column, value) in text_fields {
        if let Some(value) = value {
            predicates.push(Predicate::equal(column, PredicateValue::Text(value.to_string())));
        }
    }
    if let Some(price) = filter.price {
        predicates.push(Predicate::equal(BookColumn::Price, PredicateValue::Number(price)));
    }
    if let Some(from) = filter.published_from {
        predicates.push(Predicate::at_least(BookColumn::PublicationDate, PredicateValue::Date(from)));
    }
    if let Some(to) = filter.published_to {
        predicates.push(Predicate::at_most(BookColumn::PublicationDate, PredicateValue::Date(to)));
    }
    predicates
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveDateTime};
    use crate::books::query::{BookColumn, Comparison, Predicate, PredicateValue};
    use crate::catalog::filter::NormalizedFilter;
    use crate::catalog::filter::predicate::build_predicates;

    fn date(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d).and_then(|d| d.and_hms_opt(0, 0, 0)).expect("date")
    }

    #[tokio::test]
    async fn test_should_build_empty_set_without_fields() {
        let predicates = build_predicates(&NormalizedFilter::default());
        assert!(predicates.is_empty());
    }

    #[tokio::test]
    async fn test_should_build_equality_predicates() {
        let filter = NormalizedFilter {
            book_name: Some("dune".to_string()),
            author: Some("herbert".to_string()),
            book_type: Some("sci-fi".to_string()),
            price: Some(9.5),
            ..NormalizedFilter::default()
        };
        let set = build_predicates(&filter);
        let predicates: Vec<&Predicate> = set.iter().collect();
        assert_eq!(4, predicates.len());
        assert!(predicates.iter().all(|p| p.comparison == Comparison::Eq));
        assert_eq!(&Predicate::equal(BookColumn::BookName, PredicateValue::Text("dune".to_string())), predicates[0]);
        assert_eq!(&Predicate::equal(BookColumn::Author, PredicateValue::Text("herbert".to_string())), predicates[1]);
        assert_eq!(&Predicate::equal(BookColumn::BookType, PredicateValue::Text("sci-fi".to_string())), predicates[2]);
        assert_eq!(&Predicate::equal(BookColumn::Price, PredicateValue::Number(9.5)), predicates[3]);
    }

    #[tokio::test]
    async fn test_should_build_independent_date_bounds() {
        let only_start = NormalizedFilter {
            published_from: Some(date(2020, 1, 1)),
            ..NormalizedFilter::default()
        };
        let set = build_predicates(&only_start);
        assert_eq!(1, set.len());
        assert_eq!(Some(&Predicate::at_least(BookColumn::PublicationDate, PredicateValue::Date(date(2020, 1, 1)))), set.iter().next());

        let both = NormalizedFilter {
            published_from: Some(date(2020, 1, 1)),
            published_to: Some(date(2020, 12, 31)),
            ..NormalizedFilter::default()
        };
        let set = build_predicates(&both);
        let comparisons: Vec<Comparison> = set.iter().map(|p| p.comparison).collect();
        assert_eq!(vec![Comparison::Gte, Comparison::Lte], comparisons);
    }

    #[tokio::test]
    async fn test_should_include_zero_price() {
        let filter = NormalizedFilter {
            price: Some(0.0),
            ..NormalizedFilter::default()
        };
        assert_eq!(1, build_predicates(&filter).len());
    }
}
