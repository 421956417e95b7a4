pub mod error;
pub mod filter_order;
pub mod types;

pub use error::FilterError;
pub use filter_order::FilterOrder;
pub use types::{FilterOrderInfo, SortColumn, SortDirection};

use crate::config::PaginationConfig;

/// Offset pagination plus a single sort column, resolved against configured defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub size: u32,
    pub order: FilterOrderInfo,
}

impl PageRequest {
    /// Build a page request from raw query values.
    ///
    /// A missing or zero `size` falls back to the configured default, and sizes above
    /// the configured maximum are clamped. A missing `sort` orders by ascending amount.
    pub fn resolve(
        page: Option<u32>,
        size: Option<u32>,
        sort: Option<&str>,
        config: &PaginationConfig,
    ) -> Result<Self, FilterError> {
        let size = match size {
            None | Some(0) => config.default_page_size,
            Some(n) => n.min(config.max_page_size),
        };

        let order = match sort.map(str::trim).filter(|s| !s.is_empty()) {
            Some(s) => FilterOrder::parse(s)?,
            None => FilterOrderInfo::default(),
        };

        Ok(Self {
            page: page.unwrap_or(0),
            size,
            order,
        })
    }

    pub fn limit(&self) -> i64 {
        i64::from(self.size)
    }

    pub fn offset(&self) -> i64 {
        i64::from(self.page).saturating_mul(i64::from(self.size))
    }
}
