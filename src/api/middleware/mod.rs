pub mod request_id;
pub mod session;
pub mod timing;

pub use request_id::{RequestId, RequestIdMiddleware};
pub use session::SessionAuth;
pub use timing::TimingMiddleware;
