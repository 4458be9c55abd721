//! Parsing raw query parameters into a [`ParameterSet`] and rendering it as
//! a parameterized SQL fragment.

use std::num::ParseIntError;

use tracing::trace;

use super::error::{ParamError, ParseParametersError};
use super::registry::{ParamKind, ParamRegistry};
use super::value::{BindValue, DateFilter, DateMode};

/// Escape character declared on every `ILIKE` clause.
const LIKE_ESCAPE: char = '\\';

/// Escapes `LIKE` wildcards so the pattern matches literally.
pub fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '%' | '_' | LIKE_ESCAPE) {
            escaped.push(LIKE_ESCAPE);
        }
        escaped.push(c);
    }
    escaped
}

/// Parses a page size or offset. Signs are rejected and the value must fit
/// PostgreSQL's `BIGINT`.
fn parse_count(value: &str) -> Result<u64, ParseIntError> {
    value.parse::<u64>()?;
    value.parse::<i64>().map(i64::unsigned_abs)
}

/// One parsed query parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Parameter {
    /// Case-insensitive substring match.
    TextMatch {
        /// Store column.
        field: String,
        /// Raw pattern, always bound and never interpolated.
        value: String,
    },
    /// Date comparison.
    Date {
        /// Store column.
        field: String,
        /// Parsed condition.
        filter: DateFilter,
    },
    /// Page size; zero renders nothing.
    Limit(u64),
    /// Rows to skip; zero renders nothing.
    Offset(u64),
}

impl Parameter {
    /// Renders this parameter's clause, numbering placeholders from
    /// `placeholder`.
    ///
    /// Filter clauses start with ` AND ` so they can follow a `WHERE 1=1` root.
    pub fn to_sql(&self, placeholder: usize) -> String {
        match self {
            Parameter::TextMatch { field, .. } => {
                format!(
                    " AND {} ILIKE '%' || ${} || '%' ESCAPE '{}'",
                    field, placeholder, LIKE_ESCAPE
                )
            }
            Parameter::Date { field, filter } => match filter.mode() {
                DateMode::Exact => format!(" AND {} = ${}", field, placeholder),
                DateMode::After => format!(" AND {} > ${}", field, placeholder),
                DateMode::Before => format!(" AND {} < ${}", field, placeholder),
                DateMode::Between => format!(
                    " AND {} BETWEEN ${} AND ${}",
                    field,
                    placeholder,
                    placeholder + 1
                ),
            },
            Parameter::Limit(0) | Parameter::Offset(0) => String::new(),
            Parameter::Limit(n) => format!(" LIMIT {}", n),
            Parameter::Offset(n) => format!(" OFFSET {}", n),
        }
    }

    /// Returns the values bound by [`Parameter::to_sql`], in placeholder order.
    pub fn values(&self) -> Vec<BindValue> {
        match self {
            Parameter::TextMatch { value, .. } => vec![BindValue::Text(escape_like(value))],
            Parameter::Date { filter, .. } => filter.bind_values(),
            Parameter::Limit(_) | Parameter::Offset(_) => Vec::new(),
        }
    }
}

/// The validated parameters of one request.
///
/// Built once with [`ParameterSet::build`] and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterSet {
    parameters: Vec<Parameter>,
    limit: u64,
    offset: u64,
    order_by: String,
}

impl ParameterSet {
    /// Parses raw name/values pairs against `registry`.
    ///
    /// Parameters keep the iteration order of `raw`. Only the first value of
    /// each name is used; an empty value list counts as the empty string.
    pub fn build<I, K>(registry: &ParamRegistry, raw: I) -> Result<Self, ParseParametersError>
    where
        I: IntoIterator<Item = (K, Vec<String>)>,
        K: AsRef<str>,
    {
        let mut set = Self {
            parameters: Vec::new(),
            limit: 0,
            offset: 0,
            order_by: registry.order_by().to_string(),
        };

        for (name, values) in raw {
            let name = name.as_ref();
            let value = values.first().map(String::as_str).unwrap_or_default();

            let kind = registry
                .kind_of(name)
                .ok_or_else(|| ParamError::UnknownParameter {
                    name: name.to_string(),
                })?;

            match kind {
                ParamKind::Limit => {
                    set.limit = parse_count(value).map_err(|source| ParamError::InvalidLimitValue {
                        value: value.to_string(),
                        source,
                    })?;
                }
                ParamKind::Offset => {
                    set.offset = parse_count(value).map_err(|source| ParamError::InvalidOffsetValue {
                        value: value.to_string(),
                        source,
                    })?;
                }
                ParamKind::TextMatch => {
                    let field = column_of(registry, name);
                    set.parameters.push(Parameter::TextMatch {
                        field,
                        value: value.to_string(),
                    });
                }
                ParamKind::Date => {
                    let filter: DateFilter = value.parse()?;
                    let field = column_of(registry, name);
                    set.parameters.push(Parameter::Date { field, filter });
                }
            }
        }

        trace!(
            parameters = set.parameters.len(),
            limit = set.limit,
            offset = set.offset,
            "Built parameter set"
        );

        Ok(set)
    }

    /// Filter parameters in request order (limit and offset excluded).
    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    /// Resolved page size, zero meaning unbounded.
    pub fn limit(&self) -> u64 {
        self.limit
    }

    /// Resolved offset.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Column used for ordering.
    pub fn order_by(&self) -> &str {
        &self.order_by
    }

    /// Returns true if no filter parameters were given.
    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }

    /// Appends the filter, ordering and paging clauses to `base` and returns
    /// the query text with its bound values.
    ///
    /// A trailing `;` on `base` is dropped; the result ends with exactly one.
    pub fn to_query(&self, base: &str) -> (String, Vec<BindValue>) {
        let (mut query, values, next_placeholder) = self.render_filters(base);

        query.push_str(&format!(" ORDER BY {} ASC", self.order_by));
        query.push_str(&Parameter::Limit(self.limit).to_sql(next_placeholder));
        query.push_str(&Parameter::Offset(self.offset).to_sql(next_placeholder));
        query.push(';');

        (query, values)
    }

    /// Appends only the filter clauses to `base`, for counting every match.
    ///
    /// Placeholders and bound values are the same as in
    /// [`ParameterSet::to_query`].
    pub fn to_count_query(&self, base: &str) -> (String, Vec<BindValue>) {
        let (mut query, values, _) = self.render_filters(base);
        query.push(';');
        (query, values)
    }

    fn render_filters(&self, base: &str) -> (String, Vec<BindValue>, usize) {
        let mut query = base.trim_end().trim_end_matches(';').trim_end().to_string();
        let mut values = Vec::new();
        let mut next_placeholder = 1;

        query.push_str(" WHERE 1=1");

        for parameter in &self.parameters {
            let bound = parameter.values();
            query.push_str(&parameter.to_sql(next_placeholder));
            next_placeholder += bound.len();
            values.extend(bound);
        }

        (query, values, next_placeholder)
    }
}

fn column_of(registry: &ParamRegistry, name: &str) -> String {
    registry
        .get(name)
        .map(|entry| entry.column().to_string())
        .unwrap_or_else(|| name.to_string())
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn raw(pairs: &[(&str, &str)]) -> Vec<(String, Vec<String>)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), vec![v.to_string()]))
            .collect()
    }

    fn scenario_registry() -> ParamRegistry {
        ParamRegistry::builder("title")
            .text("title", "title")
            .date("date", "date")
            .build()
            .unwrap()
    }

    fn date(d: u32, m: u32, y: i32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_build_and_render_scenario() {
        let set = ParameterSet::build(
            &scenario_registry(),
            raw(&[
                ("title", "song"),
                ("date", "20.12.2022"),
                ("limit", "10"),
                ("offset", "20"),
            ]),
        )
        .unwrap();

        assert_eq!(set.parameters().len(), 2);
        assert_eq!(set.limit(), 10);
        assert_eq!(set.offset(), 20);

        let (query, values) = set.to_query("");
        assert_eq!(
            query,
            " WHERE 1=1 AND title ILIKE '%' || $1 || '%' ESCAPE '\\' AND date = $2 ORDER BY title ASC LIMIT 10 OFFSET 20;"
        );
        assert_eq!(
            values,
            vec![
                BindValue::Text("song".to_string()),
                BindValue::Date(date(20, 12, 2022))
            ]
        );
    }

    #[test]
    fn test_between_consumes_two_placeholders() {
        let registry = ParamRegistry::song_library();
        let set = ParameterSet::build(
            &registry,
            raw(&[
                ("releaseDate", "25.12.2022-20.12.2022"),
                ("group", "muse"),
                ("text", "night"),
            ]),
        )
        .unwrap();

        let (query, values) = set.to_query("SELECT * FROM songs;");
        assert_eq!(
            query,
            "SELECT * FROM songs WHERE 1=1 \
             AND release_date BETWEEN $1 AND $2 \
             AND band ILIKE '%' || $3 || '%' ESCAPE '\\' \
             AND lyrics ILIKE '%' || $4 || '%' ESCAPE '\\' \
             ORDER BY title ASC;"
        );
        assert_eq!(values.len(), 4);
        assert_eq!(values[0], BindValue::Date(date(20, 12, 2022)));
        assert_eq!(values[1], BindValue::Date(date(25, 12, 2022)));
    }

    #[test]
    fn test_date_modes_render_comparisons() {
        let registry = ParamRegistry::song_library();
        for (input, clause) in [
            ("20.12.2022", " AND release_date = $1"),
            (">20.12.2022", " AND release_date > $1"),
            ("<20.12.2022", " AND release_date < $1"),
            ("20.12.2022-25.12.2022", " AND release_date BETWEEN $1 AND $2"),
        ] {
            let set = ParameterSet::build(&registry, raw(&[("releaseDate", input)])).unwrap();
            assert_eq!(set.parameters()[0].to_sql(1), clause);
        }
    }

    #[test]
    fn test_limit_zero_omits_clause() {
        let registry = ParamRegistry::song_library();
        let set = ParameterSet::build(&registry, raw(&[("limit", "0"), ("offset", "0")])).unwrap();
        let (query, values) = set.to_query("SELECT * FROM songs");
        assert!(!query.contains("LIMIT"));
        assert!(!query.contains("OFFSET"));
        assert!(values.is_empty());
        assert_eq!(query, "SELECT * FROM songs WHERE 1=1 ORDER BY title ASC;");
    }

    #[test]
    fn test_positive_limit_renders_once() {
        let registry = ParamRegistry::song_library();
        let set = ParameterSet::build(&registry, raw(&[("limit", "7")])).unwrap();
        let (query, _) = set.to_query("SELECT * FROM songs");
        assert_eq!(query.matches("LIMIT").count(), 1);
        assert!(query.ends_with(" LIMIT 7;"));
    }

    #[test]
    fn test_rendering_is_deterministic() {
        let registry = ParamRegistry::song_library();
        let set = ParameterSet::build(
            &registry,
            raw(&[
                ("title", "a"),
                ("group", "b"),
                ("releaseDate", ">01.01.2000"),
                ("link", "c"),
                ("limit", "3"),
            ]),
        )
        .unwrap();
        assert_eq!(set.to_query("SELECT 1"), set.to_query("SELECT 1"));
    }

    #[test]
    fn test_values_are_never_interpolated() {
        let registry = ParamRegistry::song_library();
        let set =
            ParameterSet::build(&registry, raw(&[("title", "x' OR '1'='1")])).unwrap();
        let (query, values) = set.to_query("SELECT * FROM songs");
        assert!(!query.contains("OR '1'"));
        assert_eq!(values, vec![BindValue::Text("x' OR '1'='1".to_string())]);
    }

    #[test]
    fn test_first_value_wins() {
        let registry = ParamRegistry::song_library();
        let set = ParameterSet::build(
            &registry,
            vec![(
                "title".to_string(),
                vec!["first".to_string(), "second".to_string()],
            )],
        )
        .unwrap();
        assert_eq!(
            set.parameters()[0],
            Parameter::TextMatch {
                field: "title".to_string(),
                value: "first".to_string()
            }
        );
    }

    #[test]
    fn test_empty_value_list_is_empty_string() {
        let registry = ParamRegistry::song_library();
        let set = ParameterSet::build(&registry, vec![("title".to_string(), Vec::new())]).unwrap();
        assert_eq!(set.parameters()[0].values(), vec![BindValue::text("")]);

        let err = ParameterSet::build(&registry, vec![("limit".to_string(), Vec::new())])
            .unwrap_err();
        assert!(matches!(err.cause(), ParamError::InvalidLimitValue { .. }));
    }

    #[test]
    fn test_unknown_parameter() {
        let registry = ParamRegistry::song_library();
        let err = ParameterSet::build(&registry, raw(&[("title", "a"), ("genre", "rock")]))
            .unwrap_err();
        assert_eq!(
            err.cause(),
            &ParamError::UnknownParameter {
                name: "genre".to_string()
            }
        );
    }

    #[test]
    fn test_invalid_numbers() {
        let registry = ParamRegistry::pagination_only();
        for (name, value) in [("limit", "ten"), ("limit", "-1"), ("limit", "1.5")] {
            let err = ParameterSet::build(&registry, raw(&[(name, value)])).unwrap_err();
            assert!(matches!(err.cause(), ParamError::InvalidLimitValue { .. }));
        }
        let err = ParameterSet::build(&registry, raw(&[("offset", "-3")])).unwrap_err();
        assert!(matches!(err.cause(), ParamError::InvalidOffsetValue { .. }));
    }

    #[test]
    fn test_count_query_keeps_filters_only() {
        let registry = ParamRegistry::song_library();
        let set = ParameterSet::build(
            &registry,
            raw(&[
                ("group", "muse"),
                ("releaseDate", ">01.01.2000"),
                ("limit", "5"),
                ("offset", "40"),
            ]),
        )
        .unwrap();

        let (count, count_values) = set.to_count_query("SELECT COUNT(*) FROM songs;");
        assert_eq!(
            count,
            "SELECT COUNT(*) FROM songs WHERE 1=1 \
             AND band ILIKE '%' || $1 || '%' ESCAPE '\\' \
             AND release_date > $2;"
        );
        let (_, values) = set.to_query("SELECT * FROM songs");
        assert_eq!(count_values, values);
    }

    #[test]
    fn test_counts_must_fit_bigint() {
        let registry = ParamRegistry::pagination_only();
        let max = i64::MAX.to_string();
        let set = ParameterSet::build(
            &registry,
            raw(&[("limit", max.as_str()), ("offset", max.as_str())]),
        )
        .unwrap();
        assert_eq!(set.limit(), i64::MAX as u64);
        assert_eq!(set.offset(), i64::MAX as u64);

        for value in ["9223372036854775808", "18446744073709551615", "99999999999999999999"] {
            let err = ParameterSet::build(&registry, raw(&[("limit", value)])).unwrap_err();
            assert!(
                matches!(err.cause(), ParamError::InvalidLimitValue { .. }),
                "limit {}",
                value
            );
            let err = ParameterSet::build(&registry, raw(&[("offset", value)])).unwrap_err();
            assert!(
                matches!(err.cause(), ParamError::InvalidOffsetValue { .. }),
                "offset {}",
                value
            );
        }
    }

    #[test]
    fn test_like_wildcards_are_bound_literally() {
        let registry = ParamRegistry::song_library();
        let set = ParameterSet::build(&registry, raw(&[("title", r"50%_off\")])).unwrap();
        let (query, values) = set.to_query("SELECT * FROM songs");
        assert!(query.contains(r"ILIKE '%' || $1 || '%' ESCAPE '\'"));
        assert_eq!(values, vec![BindValue::Text(r"50\%\_off\\".to_string())]);

        // The parsed parameter keeps the raw text
        assert_eq!(
            set.parameters()[0],
            Parameter::TextMatch {
                field: "title".to_string(),
                value: r"50%_off\".to_string()
            }
        );
    }

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("plain"), "plain");
        assert_eq!(escape_like("%"), r"\%");
        assert_eq!(escape_like("_"), r"\_");
        assert_eq!(escape_like(r"a\b"), r"a\\b");
    }

    #[test]
    fn test_malformed_date_is_wrapped() {
        use std::error::Error as _;

        let registry = ParamRegistry::song_library();
        let err = ParameterSet::build(&registry, raw(&[("releaseDate", "2022.12.20")]))
            .unwrap_err();
        assert!(matches!(err.cause(), ParamError::InvalidDateValue { .. }));
        assert!(err.source().is_some());
        assert!(err.to_string().starts_with("failed to parse parameters"));

        let err = ParameterSet::build(&registry, raw(&[("releaseDate", "2022-12-20-2022-12-20")]))
            .unwrap_err();
        assert!(matches!(err.cause(), ParamError::InvalidDateRange { .. }));
    }

    #[test]
    fn test_reserved_names_checked_before_registry() {
        let registry = ParamRegistry::pagination_only();
        let set = ParameterSet::build(&registry, raw(&[("offset", "4"), ("limit", "2")])).unwrap();
        assert!(set.is_empty());
        assert_eq!(set.limit(), 2);
        assert_eq!(set.offset(), 4);

        let err = ParameterSet::build(&registry, raw(&[("title", "x")])).unwrap_err();
        assert!(matches!(err.cause(), ParamError::UnknownParameter { .. }));
    }

    #[test]
    fn test_alias_sets_limit() {
        let registry = ParamRegistry::builder("title")
            .limit_alias("pageSize")
            .build()
            .unwrap();
        let set = ParameterSet::build(&registry, raw(&[("pageSize", "25")])).unwrap();
        assert_eq!(set.limit(), 25);
        assert!(set.is_empty());
    }
}
