//! Decoder for the Diablo III CASC root namespace.
//!
//! The root file of this title is a list of named sub-root manifests, one
//! per locale plus a special `Base` entry. `Base` carries `CoreTOC.dat`,
//! the catalog mapping SNO ids to group and asset names; with it, the
//! id-keyed records in every sub-root can be given human-readable paths.
//! [`root::D3Root`] drives the full load against a [`storage::ContentStorage`]
//! collaborator and materializes a browsable folder tree for a selected
//! locale.
//!
//! Other CASC titles use structurally different root formats; only this
//! title's layout is handled here. Asset *contents* are never decoded,
//! only their identities and locations in the namespace.

mod error;
mod ioutils;

pub mod coretoc;
pub mod index;
pub mod jenkins3;
pub mod locale;
pub mod root;
pub mod storage;
pub mod subroot;
pub mod tree;

pub use error::Error;
pub type Result<T> = std::result::Result<T, Error>;
