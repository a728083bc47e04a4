//! Types shared by the Mixcloud client library and its command-line host

mod error;
mod secret;

pub use error::{Error, Result};
pub use secret::Secret;
