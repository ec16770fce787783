use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, MouseEvent, MouseEventKind};
use ratatui::{
  layout::{Alignment, Margin, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Text},
  widgets::{
    Block, BorderType, Borders, List, ListItem, ListState, Paragraph, Scrollbar, ScrollbarOrientation,
    ScrollbarState, Wrap,
  },
};
use tokio::sync::mpsc::UnboundedSender;

use super::Component;
use crate::{
  action::Action,
  config::Config,
  headlines::{FetchOutcome, Headline},
  markup,
  mode::Mode,
  tui::Frame,
};

/// What the news view currently shows.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
enum Content {
  /// Nothing fetched yet (or cleared at the start of a fetch).
  #[default]
  Empty,
  /// One card per usable headline.
  Cards(Vec<Headline>),
  /// A user-facing message: no results, or one of the error branches.
  Notice(String),
  /// Raw response text shown verbatim when extraction failed.
  Raw(String),
}

/// The news view. Fetch outcomes arrive as actions from the spawned
/// fetch tasks; a completion that arrives after the user has left the
/// view still lands here and still clears the loading flag.
pub struct News {
  command_tx: Option<UnboundedSender<Action>>,
  config: Config,
  mode: Mode,
  loading: bool,
  content: Content,
  state: ListState,
  scrollbar_state: ScrollbarState,
}

impl News {
  pub fn new() -> Self {
    Self {
      command_tx: None,
      config: Config::default(),
      mode: Mode::default(),
      loading: false,
      content: Content::default(),
      state: ListState::default().with_selected(Some(0)),
      scrollbar_state: ScrollbarState::default(),
    }
  }

  pub fn is_loading(&self) -> bool {
    self.loading
  }

  fn apply_outcome(&mut self, outcome: FetchOutcome) {
    self.content = match outcome {
      FetchOutcome::Headlines(headlines) => {
        self.state.select(Some(0));
        Content::Cards(headlines)
      },
      FetchOutcome::NoneAvailable => Content::Notice("No trending news available right now.".to_string()),
      FetchOutcome::RawText(text) => Content::Raw(text),
      FetchOutcome::ClientMissing => {
        Content::Notice("News is unavailable: no AI client is configured. Set GEMINI_API_KEY and restart.".to_string())
      },
      FetchOutcome::EmptyResponse => {
        Content::Notice("Something went wrong while fetching the news. Check the logs.".to_string())
      },
      FetchOutcome::ServiceFailed => {
        Content::Notice("An error occurred while fetching the news. Check the logs.".to_string())
      },
    };
  }

  fn selected_headline(&self) -> Option<&Headline> {
    match &self.content {
      Content::Cards(headlines) => headlines.get(self.state.selected().unwrap_or(0)),
      _ => None,
    }
  }

  /// The exportable markup for the current content, if any.
  fn export_page(&self) -> Option<String> {
    match &self.content {
      Content::Cards(headlines) => Some(markup::render_page("Trending News", &markup::render_cards(headlines))),
      Content::Raw(text) => Some(markup::render_page("Trending News", &markup::render_fallback(text))),
      _ => None,
    }
  }

  fn select_next(&mut self, len: usize) {
    if len == 0 {
      return;
    }
    let selected_idx = self.state.selected().unwrap_or(0);
    self.state.select(Some((selected_idx + 1) % len));
  }

  fn select_previous(&mut self, len: usize) {
    if len == 0 {
      return;
    }
    let selected_idx = self.state.selected().unwrap_or(0);
    if selected_idx == 0 {
      self.state.select(Some(len - 1));
    } else {
      self.state.select(Some(selected_idx - 1));
    }
  }

  fn card_count(&self) -> usize {
    match &self.content {
      Content::Cards(headlines) => headlines.len(),
      _ => 0,
    }
  }
}

impl Component for News {
  fn register_action_handler(&mut self, tx: UnboundedSender<Action>) -> Result<()> {
    self.command_tx = Some(tx);
    Ok(())
  }

  fn register_config_handler(&mut self, config: Config) -> Result<()> {
    self.config = config;
    Ok(())
  }

  fn handle_key_events(&mut self, key: KeyEvent) -> Result<Option<Action>> {
    if self.mode != Mode::News {
      return Ok(None);
    }
    match key.code {
      KeyCode::Char('j') | KeyCode::Down => {
        self.select_next(self.card_count());
        Ok(None)
      },
      KeyCode::Char('k') | KeyCode::Up => {
        self.select_previous(self.card_count());
        Ok(None)
      },
      KeyCode::Char('l') | KeyCode::Enter => {
        Ok(self.selected_headline().map(|headline| Action::OpenArticle(headline.url.clone())))
      },
      KeyCode::Char('s') => Ok(self.export_page().map(Action::ExportPage)),
      KeyCode::Char('h') | KeyCode::Esc => Ok(Some(Action::ActivateHomeView)),
      _ => Ok(None),
    }
  }

  fn handle_mouse_events(&mut self, mouse: MouseEvent) -> Result<Option<Action>> {
    if self.mode != Mode::News {
      return Ok(None);
    }
    match mouse.kind {
      MouseEventKind::ScrollDown => self.select_next(self.card_count()),
      MouseEventKind::ScrollUp => self.select_previous(self.card_count()),
      _ => {},
    }
    Ok(None)
  }

  fn update(&mut self, action: Action) -> Result<Option<Action>> {
    match action {
      Action::ModeChange(mode) => {
        self.mode = mode;
      },
      Action::FetchStarted => {
        // Clear whatever the previous cycle rendered.
        self.loading = true;
        self.content = Content::Empty;
        self.state.select(Some(0));
      },
      Action::FetchFinished(outcome) => {
        self.loading = false;
        self.apply_outcome(outcome);
      },
      _ => {},
    }
    Ok(None)
  }

  fn draw(&mut self, f: &mut Frame<'_>, area: Rect) -> Result<()> {
    let block = Block::default().borders(Borders::ALL).border_type(BorderType::Rounded).title("Trending News");

    if self.loading {
      let paragraph = Paragraph::new("Fetching trending headlines...")
        .style(Style::default().fg(Color::Gray).add_modifier(Modifier::ITALIC))
        .alignment(Alignment::Center)
        .block(block);
      f.render_widget(paragraph, area);
      return Ok(());
    }

    match &self.content {
      Content::Empty => {
        f.render_widget(block, area);
      },
      Content::Notice(message) => {
        let paragraph = Paragraph::new(message.clone())
          .style(Style::default().fg(Color::Gray))
          .alignment(Alignment::Center)
          .wrap(Wrap { trim: true })
          .block(block);
        f.render_widget(paragraph, area);
      },
      Content::Raw(text) => {
        let paragraph = Paragraph::new(text.clone()).wrap(Wrap { trim: false }).block(block);
        f.render_widget(paragraph, area);
      },
      Content::Cards(headlines) => {
        let title_style = Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD);
        let host_style = Style::default().fg(Color::Gray);
        let selected_title_style = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);

        let items: Vec<ListItem> = headlines
          .iter()
          .enumerate()
          .map(|(i, headline)| {
            let style = if self.state.selected() == Some(i) { selected_title_style } else { title_style };
            let text = Text::from(vec![
              Line::styled(headline.title.clone(), style),
              Line::styled(headline.host_label(), host_style),
            ]);
            ListItem::new(text)
          })
          .collect();

        let list = List::new(items)
          .block(block)
          .highlight_symbol("┃")
          .repeat_highlight_symbol(true)
          .scroll_padding(1);

        let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
          .begin_symbol(None)
          .end_symbol(None)
          .track_symbol(None)
          .thumb_symbol("▌");

        self.scrollbar_state = ScrollbarState::new(headlines.len()).position(self.state.selected().unwrap_or(0));

        f.render_stateful_widget(list, area, &mut self.state);
        f.render_stateful_widget(
          scrollbar,
          area.inner(&Margin { vertical: 1, horizontal: 0 }),
          &mut self.scrollbar_state,
        );
      },
    }

    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use crossterm::event::{KeyCode, KeyEvent};
  use pretty_assertions::assert_eq;

  use super::*;

  fn news_in_view() -> News {
    let mut news = News::new();
    news.update(Action::ModeChange(Mode::News)).unwrap();
    news
  }

  fn sample_headlines() -> Vec<Headline> {
    vec![
      Headline { title: "A".to_string(), url: "https://www.example.com/a".to_string() },
      Headline { title: "B".to_string(), url: "https://b.example".to_string() },
    ]
  }

  #[test]
  fn fetch_start_raises_loading_and_clears_previous_records() {
    let mut news = news_in_view();
    news.update(Action::FetchFinished(FetchOutcome::Headlines(sample_headlines()))).unwrap();
    assert_eq!(news.content, Content::Cards(sample_headlines()));

    news.update(Action::FetchStarted).unwrap();
    assert!(news.is_loading());
    assert_eq!(news.content, Content::Empty);
  }

  #[test]
  fn every_outcome_clears_the_loading_flag() {
    let outcomes = [
      FetchOutcome::Headlines(sample_headlines()),
      FetchOutcome::NoneAvailable,
      FetchOutcome::RawText("free-form".to_string()),
      FetchOutcome::ClientMissing,
      FetchOutcome::EmptyResponse,
      FetchOutcome::ServiceFailed,
    ];
    for outcome in outcomes {
      let mut news = news_in_view();
      news.update(Action::FetchStarted).unwrap();
      assert!(news.is_loading());
      news.update(Action::FetchFinished(outcome)).unwrap();
      assert!(!news.is_loading());
    }
  }

  #[test]
  fn service_failure_shows_a_generic_error_message() {
    let mut news = news_in_view();
    news.update(Action::FetchStarted).unwrap();
    news.update(Action::FetchFinished(FetchOutcome::ServiceFailed)).unwrap();
    match &news.content {
      Content::Notice(message) => assert!(message.contains("Check the logs")),
      other => panic!("expected a notice, got {other:?}"),
    }
  }

  #[test]
  fn overlapping_fetches_resolve_in_completion_order_and_both_clear_loading() {
    let mut news = news_in_view();
    // Two activations before either completes.
    news.update(Action::FetchStarted).unwrap();
    news.update(Action::FetchStarted).unwrap();
    assert!(news.is_loading());

    news.update(Action::FetchFinished(FetchOutcome::NoneAvailable)).unwrap();
    assert!(!news.is_loading());

    // The stale completion still lands; last to complete wins the render.
    news.update(Action::FetchFinished(FetchOutcome::Headlines(sample_headlines()))).unwrap();
    assert!(!news.is_loading());
    assert_eq!(news.content, Content::Cards(sample_headlines()));
  }

  #[test]
  fn completion_after_leaving_the_view_still_lands() {
    let mut news = news_in_view();
    news.update(Action::FetchStarted).unwrap();
    news.update(Action::ModeChange(Mode::Home)).unwrap();
    news.update(Action::FetchFinished(FetchOutcome::NoneAvailable)).unwrap();
    assert!(!news.is_loading());
    assert_ne!(news.content, Content::Empty);
  }

  #[test]
  fn enter_opens_the_selected_article() {
    let mut news = news_in_view();
    news.update(Action::FetchFinished(FetchOutcome::Headlines(sample_headlines()))).unwrap();
    let action = news.handle_key_events(KeyEvent::from(KeyCode::Enter)).unwrap();
    assert_eq!(action, Some(Action::OpenArticle("https://www.example.com/a".to_string())));

    news.handle_key_events(KeyEvent::from(KeyCode::Char('j'))).unwrap();
    let action = news.handle_key_events(KeyEvent::from(KeyCode::Enter)).unwrap();
    assert_eq!(action, Some(Action::OpenArticle("https://b.example".to_string())));
  }

  #[test]
  fn export_only_exists_for_cards_and_raw_content() {
    let mut news = news_in_view();
    assert_eq!(news.handle_key_events(KeyEvent::from(KeyCode::Char('s'))).unwrap(), None);

    news.update(Action::FetchFinished(FetchOutcome::Headlines(sample_headlines()))).unwrap();
    let action = news.handle_key_events(KeyEvent::from(KeyCode::Char('s'))).unwrap();
    match action {
      Some(Action::ExportPage(page)) => {
        assert!(page.contains("rel=\"noopener noreferrer\""));
        assert!(page.contains("example.com"));
      },
      other => panic!("expected an export action, got {other:?}"),
    }
  }

  #[test]
  fn escape_returns_home_without_side_effects() {
    let mut news = news_in_view();
    let action = news.handle_key_events(KeyEvent::from(KeyCode::Esc)).unwrap();
    assert_eq!(action, Some(Action::ActivateHomeView));
  }
}
