pub mod error;
pub mod format;
pub mod value;

pub use error::{FormulaError, FormulaErrorKind};
pub use format::Format;
pub use value::Value;
