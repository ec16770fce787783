use std::path::PathBuf;

use color_eyre::eyre::Result;
use crossterm::event::KeyEvent;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use tokio::sync::mpsc::{self, UnboundedSender};

use crate::{
  action::Action,
  components::{home::Home, info_bar::InfoBar, news::News, Component},
  config::Config,
  gemini::Gemini,
  headlines::{self, FetchOutcome},
  mode::Mode,
  tui, utils,
};

/// Application context: owns the config, the optional AI client handle
/// and the components, and runs the event/action loop. The client is
/// constructed exactly once here; if that fails the news feature is
/// degraded rather than the app crashing.
pub struct App {
  pub config: Config,
  pub tick_rate: f64,
  pub frame_rate: f64,
  pub components: Vec<Box<dyn Component>>,
  pub should_quit: bool,
  pub should_suspend: bool,
  pub mode: Mode,
  pub last_tick_key_events: Vec<KeyEvent>,
  gemini: Option<Gemini>,
}

impl App {
  pub fn new(tick_rate: f64, frame_rate: f64) -> Result<Self> {
    let config = Config::new()?;
    let gemini = match Gemini::from_env(&config.model) {
      Ok(client) => Some(client),
      Err(e) => {
        log::error!("AI client unavailable, news feature disabled: {e}");
        None
      },
    };
    let home = Home::new(gemini.is_some());
    let news = News::new();
    let info_bar = InfoBar::new();
    Ok(Self {
      tick_rate,
      frame_rate,
      components: vec![Box::new(home), Box::new(news), Box::new(info_bar)],
      should_quit: false,
      should_suspend: false,
      config,
      mode: Mode::Home,
      last_tick_key_events: Vec::new(),
      gemini,
    })
  }

  pub async fn run(&mut self) -> Result<()> {
    let (action_tx, mut action_rx) = mpsc::unbounded_channel();

    let mut tui = tui::Tui::new()?.tick_rate(self.tick_rate).frame_rate(self.frame_rate).mouse(true);
    tui.enter()?;

    for component in self.components.iter_mut() {
      component.register_action_handler(action_tx.clone())?;
    }

    for component in self.components.iter_mut() {
      component.register_config_handler(self.config.clone())?;
    }

    for component in self.components.iter_mut() {
      component.init(tui.size()?)?;
    }

    loop {
      if let Some(e) = tui.next().await {
        match e {
          tui::Event::Quit => action_tx.send(Action::Quit)?,
          tui::Event::Tick => action_tx.send(Action::Tick)?,
          tui::Event::Render => action_tx.send(Action::Render)?,
          tui::Event::Resize(x, y) => action_tx.send(Action::Resize(x, y))?,
          tui::Event::Key(key) => match key.code {
            crossterm::event::KeyCode::Char('q') => action_tx.send(Action::Quit)?,
            crossterm::event::KeyCode::Char('c')
              if key.modifiers.contains(crossterm::event::KeyModifiers::CONTROL) =>
            {
              action_tx.send(Action::Quit)?
            },
            crossterm::event::KeyCode::Char('z')
              if key.modifiers.contains(crossterm::event::KeyModifiers::CONTROL) =>
            {
              action_tx.send(Action::Suspend)?
            },
            crossterm::event::KeyCode::Char('n') if self.mode == Mode::Home => {
              // Shortcut activation bypasses the home card; a missing
              // client is then surfaced as an inline notice instead.
              action_tx.send(Action::ActivateNewsView)?
            },
            _ => {},
          },

          _ => {},
        }
        for component in self.components.iter_mut() {
          if let Some(action) = component.handle_events(Some(e.clone()))? {
            action_tx.send(action)?;
          }
        }
      }

      while let Ok(action) = action_rx.try_recv() {
        if action != Action::Tick && action != Action::Render {
          log::debug!("{action:?}");
        }
        match action {
          Action::Tick => {
            self.last_tick_key_events.drain(..);
          },
          Action::Quit => self.should_quit = true,
          Action::Suspend => self.should_suspend = true,
          Action::Resume => self.should_suspend = false,
          Action::Resize(w, h) => {
            tui.resize(Rect::new(0, 0, w, h))?;
            self.draw(&mut tui, &action_tx)?;
          },
          Action::Render => {
            self.draw(&mut tui, &action_tx)?;
          },
          Action::ActivateNewsView => {
            self.mode = Mode::News;
            action_tx.send(Action::ModeChange(self.mode))?;
            action_tx.send(Action::FetchStarted)?;
            self.spawn_fetch(&action_tx);
          },
          Action::ActivateHomeView => {
            self.mode = Mode::Home;
            action_tx.send(Action::ModeChange(self.mode))?;
          },
          Action::OpenArticle(ref url) => {
            log::info!("Opening article {url}");
            utils::open_url(url);
          },
          Action::ExportPage(ref page) => match write_export(page) {
            Ok(path) => log::info!("Saved news page to {}", path.display()),
            Err(e) => log::error!("Failed to save news page: {e:?}"),
          },
          Action::Error(ref message) => {
            log::error!("{message}");
          },
          _ => {},
        }
        for component in self.components.iter_mut() {
          if let Some(action) = component.update(action.clone())? {
            action_tx.send(action)?
          };
        }
      }
      if self.should_suspend {
        tui.suspend()?;
        action_tx.send(Action::Resume)?;
        tui = tui::Tui::new()?.tick_rate(self.tick_rate).frame_rate(self.frame_rate).mouse(true);
        tui.enter()?;
      } else if self.should_quit {
        tui.stop()?;
        break;
      }
    }
    tui.exit()?;
    Ok(())
  }

  fn draw(&mut self, tui: &mut tui::Tui, action_tx: &UnboundedSender<Action>) -> Result<()> {
    let view_idx = match self.mode {
      Mode::Home => 0,
      Mode::News => 1,
    };
    tui.draw(|f| {
      let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Fill(1), Constraint::Length(1)])
        .split(f.size());
      let view = self.components.get_mut(view_idx).unwrap();
      if let Err(e) = view.draw(f, layout[0]) {
        action_tx.send(Action::Error(format!("Failed to draw: {:?}", e))).unwrap();
      }
      let info_bar = self.components.get_mut(2).unwrap();
      if let Err(e) = info_bar.draw(f, layout[1]) {
        action_tx.send(Action::Error(format!("Failed to draw: {:?}", e))).unwrap();
      }
    })?;
    Ok(())
  }

  /// One detached task per activation. Deliberately no cancellation and
  /// no de-duplication: overlapping activations race and the last
  /// completion wins the render (see DESIGN.md).
  fn spawn_fetch(&self, action_tx: &UnboundedSender<Action>) {
    let tx = action_tx.clone();
    let client = self.gemini.clone();
    let prompt = headlines::instruction(self.config.headline_count);
    tokio::spawn(async move {
      let outcome = match client {
        None => {
          log::warn!("News activated without a configured AI client");
          FetchOutcome::ClientMissing
        },
        Some(client) => match client.generate(&prompt).await {
          Ok(text) => headlines::outcome_from_response(&text),
          Err(e) => {
            log::error!("Headline fetch failed: {e:?}");
            FetchOutcome::ServiceFailed
          },
        },
      };
      // The completion action both renders the outcome and clears the
      // loading flag, whatever branch was taken above.
      if tx.send(Action::FetchFinished(outcome)).is_err() {
        log::error!("Fetch completed after the action channel closed");
      }
    });
  }
}

fn write_export(page: &str) -> Result<PathBuf> {
  let directory = utils::get_data_dir();
  std::fs::create_dir_all(&directory)?;
  let filename = format!("koplyne-news-{}.html", chrono::Utc::now().format("%Y%m%d-%H%M%S"));
  let path = directory.join(filename);
  std::fs::write(&path, page)?;
  Ok(path)
}
