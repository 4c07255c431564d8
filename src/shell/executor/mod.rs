mod builtin;
mod combinator;
mod environment;
mod executor;
mod parallel;
mod pipe;
mod process;
mod redirect;
mod simple;
mod status;

pub use environment::Environment;
pub use executor::Executor;
pub use status::Status;
