mod api;
pub mod fairness;
mod lifecycle;
mod notice;
mod session;
mod store;
mod strategy;

pub use api::*;
pub use fairness::{FairnessSummary, ScoreTier};
pub use lifecycle::*;
pub use notice::*;
pub use session::*;
pub use store::*;
pub use strategy::*;

cfg_if::cfg_if! {
    if #[cfg(feature = "full")] {
        mod http;

        pub use http::*;
    }
}
