use crate::order::{OrderBy, OrderedValue};
use crate::query::QueryParams;

/// Identifies one page request issued by a [`Paginator`](crate::Paginator).
///
/// Handed back when the response arrives so the paginator can tell a response
/// to the request in flight apart from a late response to a request issued
/// before the last [`reset()`](crate::Paginator::reset).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    pub(crate) generation: u64,
    pub(crate) sequence: u64,
}

/// Parameters of one page request against the search endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct PageRequest {
    pub query: Option<String>,
    pub epoch: i64,
    pub last_id: Option<u64>,
    pub last_ordered_value: Option<OrderedValue>,
    pub order_by: OrderBy,
    pub ascending: bool,
    pub limit: Option<u32>,
    pub(crate) ticket: Ticket,
}
impl PageRequest {
    pub fn ticket(&self) -> Ticket {
        self.ticket
    }

    /// Whether this is the first page of its ordering (no cursor yet).
    pub fn is_first_page(&self) -> bool {
        self.last_id.is_none() && self.last_ordered_value.is_none()
    }

    /// Query parameters in the order the backend documents them. Unset
    /// fields are left out of the encoded string entirely.
    pub fn to_params(&self) -> QueryParams {
        QueryParams::new()
            .with("query", self.query.as_deref())
            .with("epoch", Some(self.epoch))
            .with("lastID", self.last_id)
            .with("lastOrderedValue", self.last_ordered_value)
            .with("orderBy", Some(self.order_by))
            .with("ascending", Some(self.ascending))
            .with("limit", self.limit)
    }
}
