//! ユースケース層: ディスパッチと組み込みインテント

pub mod dispatcher;
pub mod intents;
pub mod processors;

pub use dispatcher::{Dispatcher, DispatcherBuilder};
pub use processors::{Postprocessor, Preprocessor, ProcessorError, Trim};
