pub mod commands;
pub mod completion;
pub mod dispatcher;

#[cfg(test)]
pub(crate) mod test_support;

pub use commands::ImagingCommand;
pub use completion::{completion, Completion, Dispatched, Pending};
pub use dispatcher::ImagingService;
