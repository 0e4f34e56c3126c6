// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

pub mod clipboard;
pub mod derive;
pub mod editor;
pub mod history;
pub mod ids;
pub mod model;
pub mod state;

pub use clipboard::*;
pub use derive::*;
pub use editor::*;
pub use history::*;
pub use ids::*;
pub use model::*;
pub use state::*;
