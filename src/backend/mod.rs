//! Hosted Backend Client Boundary
//!
//! Everything the console knows about the hosted Postgres/REST/realtime/
//! auth environment lives behind this module's traits.
//!
//! ## Architecture
//!
//! - **client**: The `Tables`, `Realtime` and `AuthApi` traits plus the
//!   types crossing them (`Session`, `TableWatch`, `RowChange`)
//! - **query**: `SelectQuery` builder, rendered to the REST dialect or
//!   evaluated in memory
//! - **outcome**: Three-way read result (`Rows` / `NotProvisioned` /
//!   `Failed`)
//! - **provision**: Contract of the privileged org-admin endpoint
//! - **memory**: Full in-process fake used by tests and offline mode
//! - **rest**: Native reqwest client (feature `native`)
//!
//! ## Data Flow
//!
//! 1. A service builds a `SelectQuery` (or a row payload)
//! 2. The injected transport executes it
//! 3. Reads come back as `FetchOutcome`; missing tenant tables are a
//!    state, not an error
//! 4. Realtime subscribers get `RowChange` streams and re-read on change

mod client;
mod error;
mod memory;
mod outcome;
mod provision;
mod query;
#[cfg(feature = "native")]
mod rest;
mod row;

pub use client::{AuthApi, Realtime, RowChange, RowChanges, Session, TableWatch, Tables};
pub use error::{BackendError, BackendResult, MISSING_RELATION_CODE};
pub use memory::{MemoryBackend, MemoryProvisioner};
pub use outcome::FetchOutcome;
pub use provision::{
    CreateOrgAdminRequest, OrgProvisioner, ProvisionedCredentials, CREATE_ORG_ADMIN_PATH,
};
pub use query::{Filter, Order, SelectQuery};
#[cfg(feature = "native")]
pub use rest::{RestBackend, RestConfig, RestProvisioner};
pub use row::{decode_row, decode_rows, field_str, to_row, Row};
