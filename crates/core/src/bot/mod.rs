//! Chat interface binding.
//!
//! Incoming updates are turned into [`ChatEvent`]s, matched against an
//! ordered [`RoutingTable`] and handed to the [`QueryDispatcher`]. Every
//! failure ends up as a chat reply or a log line; nothing here returns an
//! error to the polling loop.
//!
//! [`QueryDispatcher`]: crate::dispatch::QueryDispatcher

mod event;
mod handler;
mod poller;
mod routes;

pub use event::ChatEvent;
pub use handler::{failure_message, Bot};
pub use poller::run_polling;
pub use routes::{Route, RouteAction, RoutingTable};
