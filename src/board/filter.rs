use crate::models::{RequestField, TeamRequest};

/// The board's two filter flags. The visible list is always derived from these
/// and the full collection, never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestFilter {
    pub query: String,
    pub mine_only: bool,
}

impl RequestFilter {
    pub fn new(query: impl Into<String>, mine_only: bool) -> Self {
        Self { query: query.into(), mine_only }
    }

    pub fn matches(&self, request: &TeamRequest, user_id: &str) -> bool {
        let owner_match = !self.mine_only || request.is_owned_by(user_id);
        owner_match && self.matches_query(request)
    }

    fn matches_query(&self, request: &TeamRequest) -> bool {
        let query = self.query.to_lowercase();
        if query.is_empty() {
            return true;
        }
        RequestField::ALL
            .iter()
            .filter(|field| field.is_searchable())
            .any(|field| request.field(*field).to_lowercase().contains(&query))
    }

    pub fn is_active(&self) -> bool {
        self.mine_only || !self.query.is_empty()
    }
}

pub fn filter_requests<'a>(
    requests: &'a [TeamRequest],
    filter: &RequestFilter,
    user_id: &str,
) -> Vec<&'a TeamRequest> {
    requests
        .iter()
        .filter(|request| filter.matches(request, user_id))
        .collect()
}
