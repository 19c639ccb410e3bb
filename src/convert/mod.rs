pub mod invoker;
pub mod script;

pub use invoker::{Invocation, invoke};
pub use script::{export_script, import_script};
