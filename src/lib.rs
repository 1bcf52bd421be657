pub mod config;
pub mod fit;
pub mod layout;
pub mod oracle;
pub mod search;
pub mod tokenizer;
pub mod truncate;

pub use fit::{FitOptions, Fitted, fit, fit_and_truncate};
pub use oracle::{Container, ContainerOracle, ContentGuard, OverflowOracle};
pub use search::{FitOutcome, find_boundary, find_fit};
pub use tokenizer::{SplitMode, tokenize};
