//! How the bridge talks to the hosted page.
//!
//! There are exactly two outbound artefacts:
//!
//! - the **load URL** that starts the page with identity and auth parameters
//!   ([`load_url`]), and
//! - **scripts** evaluated inside the page that call the remote bridge object
//!   ([`script`]).

pub mod load_url;
pub mod script;

pub use load_url::build_load_url;
pub use script::{ScriptBuilder, ScriptError};
