use super::error::FilterError;
use super::types::{FilterOrderInfo, SortColumn, SortDirection};

pub struct FilterOrder;

impl FilterOrder {
    /// Parse a `field[,direction]` sort parameter, e.g. `amount,desc`.
    pub fn parse(s: &str) -> Result<FilterOrderInfo, FilterError> {
        let mut parts = s.split(',').map(str::trim);

        let column = match parts.next() {
            Some(col) if !col.is_empty() => col.parse::<SortColumn>()?,
            _ => return Err(FilterError::InvalidSort(s.to_string())),
        };

        let sort = match parts.next() {
            Some(dir) if !dir.is_empty() => dir.parse::<SortDirection>()?,
            _ => SortDirection::Asc,
        };

        if parts.next().is_some() {
            return Err(FilterError::InvalidSort(s.to_string()));
        }

        Ok(FilterOrderInfo { column, sort })
    }

    /// ORDER BY clause for the requested column, with `id` as tie-breaker so pages stay stable.
    pub fn generate(info: &FilterOrderInfo) -> String {
        match info.column {
            SortColumn::Id => format!("ORDER BY \"id\" {}", info.sort.to_sql()),
            column => format!(
                "ORDER BY \"{}\" {}, \"id\" ASC",
                column.column_name(),
                info.sort.to_sql()
            ),
        }
    }
}
