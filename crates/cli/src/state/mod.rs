// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Local state: the state directory and the fragment store.

pub mod directory;
mod io;
pub mod paths;
pub mod store;

pub use directory::{StateDirectory, StateError};
pub use paths::StatePaths;
pub use store::FragmentStore;
