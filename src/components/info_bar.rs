use clap::crate_version;
use ratatui::{
  layout::{Alignment, Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  widgets::Paragraph,
};

use crate::{action::Action, components::Component, config::Config, mode::Mode, tui::Frame};

pub struct InfoBar {
  config: Config,
  mode: Mode,
  loading: bool,
}

impl InfoBar {
  pub fn new() -> Self {
    Self { config: Config::default(), mode: Mode::default(), loading: false }
  }

  fn hints(&self) -> &'static str {
    match self.mode {
      Mode::Home => "Enter: news  q: quit",
      Mode::News => "j/k: move  Enter: open  s: save page  h: home  q: quit",
    }
  }
}

impl Component for InfoBar {
  fn register_config_handler(&mut self, config: Config) -> color_eyre::Result<()> {
    self.config = config;
    Ok(())
  }

  fn update(&mut self, action: Action) -> color_eyre::Result<Option<Action>> {
    match action {
      Action::ModeChange(mode) => self.mode = mode,
      Action::FetchStarted => self.loading = true,
      Action::FetchFinished(_) => self.loading = false,
      _ => {},
    }
    Ok(None)
  }

  fn draw(&mut self, f: &mut Frame<'_>, area: Rect) -> color_eyre::Result<()> {
    let layout = Layout::default()
      .direction(Direction::Horizontal)
      .constraints([Constraint::Fill(1), Constraint::Fill(1)])
      .split(area);

    let paragraph = Paragraph::new("Koplyne ".to_string() + crate_version!());
    f.render_widget(paragraph, layout[0]);

    let status = if self.loading { "fetching..." } else { self.hints() };
    let status_style = if self.loading {
      Style::default().fg(Color::Yellow).add_modifier(Modifier::ITALIC)
    } else {
      Style::default().fg(Color::Gray)
    };
    let paragraph = Paragraph::new(status).style(status_style).alignment(Alignment::Right);
    f.render_widget(paragraph, layout[1]);

    Ok(())
  }
}
