pub mod calendar;
pub mod cancel;
pub mod challenge;
pub mod config;
pub mod history;
pub mod stats;
pub mod today;
pub mod upcoming;
pub mod watch;
pub mod window;
