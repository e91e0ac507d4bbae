pub mod auth;
pub mod classes;
pub mod entries;
pub mod gyms;
pub mod members;
pub mod payments;
pub mod trainers;

use serde::Deserialize;

/// Pagination for collection endpoints
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl ListQuery {
    pub fn page(&self) -> (i64, i64) {
        let limit = self.limit.unwrap_or(200).clamp(1, 1000);
        let offset = self.offset.unwrap_or(0).max(0);
        (limit, offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_defaults_and_clamps() {
        let q = ListQuery { limit: None, offset: None };
        assert_eq!(q.page(), (200, 0));

        let q = ListQuery { limit: Some(5000), offset: Some(-3) };
        assert_eq!(q.page(), (1000, 0));

        let q = ListQuery { limit: Some(0), offset: Some(10) };
        assert_eq!(q.page(), (1, 10));
    }
}
