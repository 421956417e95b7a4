use std::str::FromStr;

use super::error::FilterError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn to_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

impl FromStr for SortDirection {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("asc") {
            Ok(SortDirection::Asc)
        } else if s.eq_ignore_ascii_case("desc") {
            Ok(SortDirection::Desc)
        } else {
            Err(FilterError::InvalidDirection(s.to_string()))
        }
    }
}

/// Cash card columns a listing may be ordered by. Only these names ever reach SQL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortColumn {
    Id,
    Amount,
    Owner,
}

impl SortColumn {
    pub fn column_name(&self) -> &'static str {
        match self {
            SortColumn::Id => "id",
            SortColumn::Amount => "amount",
            SortColumn::Owner => "owner",
        }
    }
}

impl FromStr for SortColumn {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "id" => Ok(SortColumn::Id),
            "amount" => Ok(SortColumn::Amount),
            "owner" => Ok(SortColumn::Owner),
            other => Err(FilterError::InvalidColumn(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterOrderInfo {
    pub column: SortColumn,
    pub sort: SortDirection,
}

impl Default for FilterOrderInfo {
    fn default() -> Self {
        Self {
            column: SortColumn::Amount,
            sort: SortDirection::Asc,
        }
    }
}
