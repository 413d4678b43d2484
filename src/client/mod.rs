//! Rate client: state, pure computations, service access and the controller
//! tying them to a view.

pub mod api;
pub mod app;
pub mod compute;
pub mod error;
pub mod state;
pub mod view;

pub use api::{HttpRateApi, RateApi};
pub use app::RateClient;
pub use error::ClientError;
pub use state::ClientState;
pub use view::View;
