use serde::{Deserialize, Serialize};
use strum::Display;

use crate::{headlines::FetchOutcome, mode::Mode};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Display, Deserialize)]
pub enum Action {
  Tick,
  Render,
  Resize(u16, u16),
  Suspend,
  Resume,
  Quit,
  /// Switch to the news view and start one fetch cycle.
  ActivateNewsView,
  /// Switch back to the home view. No network effect.
  ActivateHomeView,
  ModeChange(Mode),
  /// A fetch task was spawned; the loading indicator goes up.
  FetchStarted,
  /// A fetch task resolved; carries what to render and clears loading.
  FetchFinished(FetchOutcome),
  OpenArticle(String),
  /// Write the given markup page to the data directory.
  ExportPage(String),
  Error(String),
  Help,
}
