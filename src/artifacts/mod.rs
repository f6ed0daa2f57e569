// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod layout;
mod registry;
mod run;

pub use layout::{ArtifactLayout, MapKind};
pub use registry::ArtifactRegistry;
pub use run::RunArtifacts;
