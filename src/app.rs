use crate::catalog::CatalogClient;
use crate::commands;
use crate::config::Config;
use crate::event::{Event, EventHandler};
use crate::search::SessionOptions;
use crate::ui;
use crate::ui::components::{CommandEvent, CommandInput, KeyResult};
use crate::ui::renderfns::extract_domain;
use crate::ui::view::{ShortcutInfo, View, ViewAction};
use crate::ui::views::{EmptyView, HomeView, SearchView};
use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{
  disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::prelude::*;
use std::io::stdout;
use std::time::Duration;
use tracing::{info, warn};

const TICK_RATE: Duration = Duration::from_millis(50);

/// What views need to construct other views
#[derive(Clone)]
pub struct AppContext {
  pub client: CatalogClient,
  pub session: SessionOptions,
}

/// Main application state
pub struct App {
  /// Navigation stack - root is always at index 0
  view_stack: Vec<Box<dyn View>>,

  /// `:` prompt with autocomplete
  command_input: CommandInput,

  ctx: AppContext,
  title: String,

  should_quit: bool,
}

impl App {
  /// Build the app; with `initial_query` it opens straight into search
  pub fn new(config: &Config, initial_query: Option<String>) -> Result<Self> {
    let client = CatalogClient::new(config)?;
    let title = config
      .title
      .clone()
      .unwrap_or_else(|| extract_domain(&config.catalog.url).to_string());
    let ctx = AppContext {
      client,
      session: SessionOptions {
        page_size: config.search.page_size,
        debounce: config.search.debounce(),
        prefetch: config.search.prefetch,
      },
    };

    let root: Box<dyn View> = match initial_query {
      Some(term) => Box::new(SearchView::with_search_term(
        ctx.client.clone(),
        ctx.session.clone(),
        Some(term),
      )),
      None => Box::new(HomeView::new(ctx.clone())),
    };

    Ok(Self {
      view_stack: vec![root],
      command_input: CommandInput::new(),
      ctx,
      title,
      should_quit: false,
    })
  }

  pub async fn run(&mut self) -> Result<()> {
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;

    let result = self.event_loop().await;

    // Restore the terminal even if the loop failed
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    result
  }

  async fn event_loop(&mut self) -> Result<()> {
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;
    let mut events = EventHandler::new(TICK_RATE);

    while !self.should_quit {
      terminal.draw(|frame| ui::draw(frame, self))?;

      match events.next().await {
        Some(Event::Key(key)) => self.handle_key(key),
        Some(Event::Tick) => self.tick(),
        Some(Event::Resize) => {}
        None => break,
      }
    }

    info!("exiting");
    Ok(())
  }

  /// Let every view poll its async work, not just the visible one
  fn tick(&mut self) {
    for view in self.view_stack.iter_mut() {
      view.tick();
    }
  }

  fn handle_key(&mut self, key: KeyEvent) {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
      self.should_quit = true;
      return;
    }

    // ':' is typed text while a view is taking input
    let view_captures = self
      .view_stack
      .last()
      .is_some_and(|view| view.captures_input());
    if self.command_input.is_active() || !view_captures {
      match self.command_input.handle_key(key) {
        KeyResult::Handled => return,
        KeyResult::Event(CommandEvent::Submitted(cmd)) => {
          self.execute_command(&cmd);
          return;
        }
        KeyResult::Event(CommandEvent::Cancelled) => return,
        KeyResult::NotHandled => {}
      }
    }

    let action = match self.view_stack.last_mut() {
      Some(view) => view.handle_key(key),
      None => ViewAction::None,
    };
    self.apply(action);
  }

  fn apply(&mut self, action: ViewAction) {
    match action {
      ViewAction::None => {}
      ViewAction::Push(view) => self.view_stack.push(view),
      ViewAction::Pop => {
        if self.view_stack.len() > 1 {
          self.view_stack.pop();
        } else {
          self.should_quit = true;
        }
      }
    }
  }

  /// Commands replace the whole stack with a fresh root view
  fn execute_command(&mut self, input: &str) {
    let Some(cmd) = commands::resolve(input) else {
      warn!(command = input, "unknown command");
      return;
    };

    let root: Box<dyn View> = match cmd.name {
      "home" => Box::new(HomeView::new(self.ctx.clone())),
      "search" => Box::new(SearchView::new(
        self.ctx.client.clone(),
        self.ctx.session.clone(),
      )),
      "empty" => Box::new(EmptyView::new()),
      "quit" => {
        self.should_quit = true;
        return;
      }
      _ => return,
    };

    info!(view = cmd.name, "switching root view");
    self.view_stack.clear();
    self.view_stack.push(root);
  }

  // Accessors for UI rendering

  pub fn title(&self) -> &str {
    &self.title
  }

  pub fn current_view_mut(&mut self) -> Option<&mut Box<dyn View>> {
    self.view_stack.last_mut()
  }

  pub fn shortcuts(&self) -> Vec<ShortcutInfo> {
    self
      .view_stack
      .last()
      .map(|view| view.shortcuts())
      .unwrap_or_default()
  }

  pub fn command_input(&self) -> &CommandInput {
    &self.command_input
  }

  pub fn view_breadcrumb(&self) -> Vec<String> {
    self
      .view_stack
      .iter()
      .map(|v| v.breadcrumb_label())
      .collect()
  }
}
