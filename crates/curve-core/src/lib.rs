pub mod error;
pub mod id;
pub mod tolerance;
pub mod traits;

pub use error::{CurveError, Result};
pub use id::{CurveIdentity, CurveRef, EntityId};
pub use tolerance::Tolerance;
