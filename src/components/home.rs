use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{
  layout::{Alignment, Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Text},
  widgets::{Block, BorderType, Borders, Paragraph},
};
use tokio::sync::mpsc::UnboundedSender;

use super::Component;
use crate::{action::Action, config::Config, mode::Mode, tui::Frame};

/// The home view: a welcome screen with one activation target that
/// switches to the news view. When the AI client failed to construct at
/// startup the target is drawn dimmed and pointer/Enter activation is
/// refused.
pub struct Home {
  command_tx: Option<UnboundedSender<Action>>,
  config: Config,
  mode: Mode,
  news_available: bool,
  card_area: Option<Rect>,
}

impl Home {
  pub fn new(news_available: bool) -> Self {
    Self { command_tx: None, config: Config::default(), mode: Mode::default(), news_available, card_area: None }
  }

  fn activate(&self) -> Option<Action> {
    if self.news_available {
      Some(Action::ActivateNewsView)
    } else {
      None
    }
  }
}

impl Component for Home {
  fn register_action_handler(&mut self, tx: UnboundedSender<Action>) -> Result<()> {
    self.command_tx = Some(tx);
    Ok(())
  }

  fn register_config_handler(&mut self, config: Config) -> Result<()> {
    self.config = config;
    Ok(())
  }

  fn handle_key_events(&mut self, key: KeyEvent) -> Result<Option<Action>> {
    if self.mode != Mode::Home {
      return Ok(None);
    }
    match key.code {
      KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Char('l') => Ok(self.activate()),
      _ => Ok(None),
    }
  }

  fn handle_mouse_events(&mut self, mouse: MouseEvent) -> Result<Option<Action>> {
    if self.mode != Mode::Home {
      return Ok(None);
    }
    if let MouseEventKind::Down(MouseButton::Left) = mouse.kind {
      if let Some(area) = self.card_area {
        let inside = mouse.column >= area.x
          && mouse.column < area.x + area.width
          && mouse.row >= area.y
          && mouse.row < area.y + area.height;
        if inside {
          return Ok(self.activate());
        }
      }
    }
    Ok(None)
  }

  fn update(&mut self, action: Action) -> Result<Option<Action>> {
    if let Action::ModeChange(mode) = action {
      self.mode = mode;
    }
    Ok(None)
  }

  fn draw(&mut self, f: &mut Frame<'_>, area: Rect) -> Result<()> {
    let layout = Layout::default()
      .direction(Direction::Vertical)
      .constraints([
        Constraint::Fill(1),
        Constraint::Length(4),
        Constraint::Length(5),
        Constraint::Fill(2),
      ])
      .split(area);

    let title_style = Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD);
    let banner = Paragraph::new(Text::from(vec![
      Line::styled("Koplyne", title_style),
      Line::styled("Trending headlines, curated by AI", Style::default().fg(Color::Gray)),
    ]))
    .alignment(Alignment::Center);
    f.render_widget(banner, layout[1]);

    let card_width = 44.min(layout[2].width);
    let card = Rect {
      x: layout[2].x + (layout[2].width.saturating_sub(card_width)) / 2,
      y: layout[2].y,
      width: card_width,
      height: layout[2].height,
    };
    self.card_area = Some(card);

    let (card_style, lines) = if self.news_available {
      (
        Style::default().fg(Color::Cyan),
        vec![
          Line::from("View Trending News"),
          Line::styled("press Enter or click", Style::default().fg(Color::Gray)),
        ],
      )
    } else {
      (
        Style::default().fg(Color::DarkGray).add_modifier(Modifier::DIM),
        vec![
          Line::from("Trending News unavailable"),
          Line::styled("set GEMINI_API_KEY and restart", Style::default().fg(Color::DarkGray)),
        ],
      )
    };
    let paragraph = Paragraph::new(Text::from(lines))
      .alignment(Alignment::Center)
      .style(card_style)
      .block(Block::default().borders(Borders::ALL).border_type(BorderType::Rounded));
    f.render_widget(paragraph, card);

    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use crossterm::event::{KeyCode, KeyEvent};

  use super::*;

  #[test]
  fn enter_activates_news_when_available() {
    let mut home = Home::new(true);
    let action = home.handle_key_events(KeyEvent::from(KeyCode::Enter)).unwrap();
    assert_eq!(action, Some(Action::ActivateNewsView));
  }

  #[test]
  fn activation_is_refused_when_client_is_missing() {
    let mut home = Home::new(false);
    let action = home.handle_key_events(KeyEvent::from(KeyCode::Enter)).unwrap();
    assert_eq!(action, None);
  }

  #[test]
  fn keys_are_ignored_while_news_view_is_active() {
    let mut home = Home::new(true);
    home.update(Action::ModeChange(Mode::News)).unwrap();
    let action = home.handle_key_events(KeyEvent::from(KeyCode::Enter)).unwrap();
    assert_eq!(action, None);
  }
}
