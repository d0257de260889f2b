use std::fmt::Display;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{de, Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    Eq,
    Gte,
    Lte,
}

impl FilterOp {
    pub fn to_sql(&self) -> &'static str {
        match self {
            FilterOp::Eq => "=",
            FilterOp::Gte => ">=",
            FilterOp::Lte => "<=",
        }
    }
}

/// A value bound to a positional `$n` placeholder.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlParam {
    Int(i32),
    Decimal(Decimal),
    Text(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FilterWhereInfo {
    pub column: &'static str,
    pub operator: FilterOp,
    pub data: SqlParam,
}

impl FilterWhereInfo {
    pub fn new(column: &'static str, operator: FilterOp, data: SqlParam) -> Self {
        Self { column, operator, data }
    }

    pub fn eq(column: &'static str, data: SqlParam) -> Self {
        Self::new(column, FilterOp::Eq, data)
    }
}

/// Optional product search criteria, as accepted on `GET /products`.
/// A criterion sent with an empty value (`cat=`) is absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductFilter {
    #[serde(rename = "cat", default, deserialize_with = "empty_as_none")]
    pub category_id: Option<i32>,
    #[serde(rename = "minPrice", default, deserialize_with = "empty_as_none")]
    pub min_price: Option<Decimal>,
    #[serde(rename = "maxPrice", default, deserialize_with = "empty_as_none")]
    pub max_price: Option<Decimal>,
    pub color: Option<String>,
}

/// Query-string values arrive as text; blank means not sent.
fn empty_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value.parse().map(Some).map_err(de::Error::custom),
    }
}

impl ProductFilter {
    /// Color criterion; an empty string means no color filter.
    pub fn color(&self) -> Option<&str> {
        self.color.as_deref().filter(|c| !c.is_empty())
    }

    /// Present criteria as WHERE conditions. The order here is the order of
    /// the generated clauses and of the bound parameters.
    pub fn conditions(&self) -> Vec<FilterWhereInfo> {
        let candidates = [
            ("category_id", FilterOp::Eq, self.category_id.map(SqlParam::Int)),
            ("price", FilterOp::Gte, self.min_price.map(SqlParam::Decimal)),
            ("price", FilterOp::Lte, self.max_price.map(SqlParam::Decimal)),
            ("color", FilterOp::Eq, self.color().map(|c| SqlParam::Text(c.to_string()))),
        ];

        candidates
            .into_iter()
            .filter_map(|(column, operator, data)| {
                data.map(|data| FilterWhereInfo::new(column, operator, data))
            })
            .collect()
    }
}

#[derive(Debug, Clone)]
pub struct SqlResult {
    pub query: String,
    pub params: Vec<SqlParam>,
}
