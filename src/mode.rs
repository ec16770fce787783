use serde::{Deserialize, Serialize};

/// The two mutually-exclusive views. Transient only; never persisted.
#[derive(Default, Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mode {
  #[default]
  Home,
  News,
}
