pub mod context;
pub mod convert;
pub mod diff;
pub mod discovery;
pub mod error;
pub mod filter;
pub mod scene;
pub mod settings;
pub mod transfer;

pub use context::BridgeContext;
pub use diff::{ImportBatch, SceneSnapshot};
pub use error::{BridgeError, HostApiError, Result};
pub use filter::{FilterOutcome, RetentionConfig};
pub use scene::{ObjectKind, SceneGraph, Transform};

pub const CONFY_APP_NAME: &str = "maxbridge-rs";

/// Extension of the external application's native scene files.
pub const NATIVE_EXT: &str = "max";

/// Extension of the interchange files shuttled between the two applications.
pub const INTERCHANGE_EXT: &str = "fbx";
