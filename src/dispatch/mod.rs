//! Typed CRUD endpoint dispatcher: a route table, the per-request handler
//! context and the JSON response encoder.

mod context;
mod encoder;
mod route_table;

pub use context::{CommittedResponse, HandlerContext};
pub(crate) use encoder::json_response;
pub use encoder::{ErrorBody, ResponseEncoder};
pub use route_table::{DispatchRequest, MatchedRoute, PathPattern, RouteError, RouteTable};
