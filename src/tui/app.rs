use std::collections::VecDeque;
use std::io;
use std::path::Path;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tracing::debug;

use crate::host::{Document, NodeId};
use crate::io::config_io;
use crate::model::{
    Currency, HostEvent, OptimisticEdit, RequestId, ResponseHeaders, SlotId, UnknownCurrency,
    VeneerConfig,
};
use crate::ops::currency_mask;
use crate::ops::runtime::Runtime;
use crate::ops::triggers::TRIGGER_HEADER;

use super::input;
use super::render;
use super::theme::Theme;

/// Current interaction mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Navigate,
    /// Typing a new value for the selected slot
    Edit,
}

/// How a simulated request ends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Failure,
    Timeout,
}

/// A slot shown in the demo page
#[derive(Debug, Clone)]
pub struct DemoSlot {
    pub id: SlotId,
    pub node: NodeId,
    /// Edited through the currency mask
    pub amount: bool,
}

const DEMO_SLOTS: &[(&str, &str)] = &[
    ("account-name", "Conta corrente"),
    ("account-balance", "R$ 1.234,56"),
    ("transaction-description", "Mercado"),
    ("transaction-amount", "R$ 89,90"),
];

/// Main application state
pub struct App {
    pub runtime: Runtime<Document>,
    pub theme: Theme,
    pub currency: &'static Currency,
    pub slots: Vec<DemoSlot>,
    pub cursor: usize,
    pub mode: Mode,
    pub edit_buffer: String,
    /// Boosted request the `s`/`f`/`t` keys resolve
    pub nav_request: Option<RequestId>,
    /// Edit requests in flight, oldest first
    pub pending_edits: VecDeque<RequestId>,
    pub should_quit: bool,
    next_request: u64,
}

impl App {
    pub fn new(config: VeneerConfig) -> Result<Self, UnknownCurrency> {
        let currency = Currency::lookup(&config.currency.iso_code)?;
        let theme = Theme::from_config(&config.ui);

        let mut document = Document::new();
        let mut slots = Vec::new();
        for (name, value) in DEMO_SLOTS {
            let node = document.mount(*name, *value);
            if let Ok(id) = SlotId::new(*name) {
                slots.push(DemoSlot {
                    id,
                    node,
                    amount: currency_mask::parse(value, currency).is_ok(),
                });
            }
        }

        let mut runtime = Runtime::new(config, document);
        for slot in &slots {
            runtime.mount_slot(slot.id.clone(), slot.node);
        }

        Ok(App {
            runtime,
            theme,
            currency,
            slots,
            cursor: 0,
            mode: Mode::Navigate,
            edit_buffer: String::new(),
            nav_request: None,
            pending_edits: VecDeque::new(),
            should_quit: false,
            next_request: 1,
        })
    }

    pub fn document(&self) -> &Document {
        self.runtime.surface()
    }

    pub fn selected(&self) -> Option<&DemoSlot> {
        self.slots.get(self.cursor)
    }

    pub fn move_cursor(&mut self, delta: isize) {
        if self.slots.is_empty() {
            return;
        }
        let last = self.slots.len() as isize - 1;
        self.cursor = (self.cursor as isize + delta).clamp(0, last) as usize;
    }

    /// Move the runtime clock to `now`, firing due timers
    pub fn advance_to(&mut self, now: Duration) {
        self.runtime.advance_to(now);
    }

    /// The screen renders document state, so the effect log is only kept
    /// until the next frame is drawn
    pub fn drain_effects(&mut self) -> usize {
        self.runtime.surface_mut().take_effects().len()
    }

    fn request_id(&mut self) -> RequestId {
        let id = RequestId(self.next_request);
        self.next_request += 1;
        id
    }

    /// Follow a boosted link
    pub fn navigate(&mut self) {
        let request = self.request_id();
        self.runtime.handle(&HostEvent::BeforeRequest {
            request,
            boosted: true,
            edit: None,
            closes_transaction: false,
        });
        self.nav_request = Some(request);
    }

    /// Deliver the response of the boosted request in flight
    pub fn finish_navigation(&mut self, outcome: Outcome) {
        let Some(request) = self.nav_request.take() else {
            return;
        };
        self.finish(request, outcome, ResponseHeaders::new());
    }

    /// Back/forward button
    pub fn history_back(&mut self) {
        self.nav_request = None;
        self.runtime.handle(&HostEvent::PushedIntoHistory {
            path: "/".to_string(),
        });
    }

    pub fn start_edit(&mut self) {
        let Some(slot) = self.selected() else {
            return;
        };
        let node = slot.node;
        self.edit_buffer = self.document().value(node).unwrap_or_default().to_string();
        self.mode = Mode::Edit;
    }

    pub fn edit_push(&mut self, c: char) {
        self.edit_buffer.push(c);
        self.remask();
    }

    pub fn edit_backspace(&mut self) {
        self.edit_buffer.pop();
        self.remask();
    }

    fn remask(&mut self) {
        if self.selected().is_some_and(|s| s.amount) {
            self.edit_buffer = currency_mask::mask(&self.edit_buffer, self.currency);
        }
    }

    pub fn cancel_edit(&mut self) {
        self.mode = Mode::Navigate;
        self.edit_buffer.clear();
    }

    /// Send the edited value: the slot shows it at once, the request stays
    /// pending until resolved with `o` or `x`
    pub fn submit_edit(&mut self) {
        self.mode = Mode::Navigate;
        let value = std::mem::take(&mut self.edit_buffer);
        let Some(slot) = self.selected().map(|s| s.id.clone()) else {
            return;
        };
        let request = self.request_id();
        debug!(%request, %slot, "edit submitted");
        self.runtime.handle(&HostEvent::BeforeRequest {
            request,
            boosted: false,
            edit: Some(OptimisticEdit { slot, value }),
            closes_transaction: false,
        });
        self.pending_edits.push_back(request);
    }

    /// Resolve the oldest pending edit
    pub fn resolve_edit(&mut self, outcome: Outcome) {
        let Some(request) = self.pending_edits.pop_front() else {
            return;
        };
        let toast = match outcome {
            Outcome::Success => {
                r#"{"show-toast": {"message": "Alteração salva.", "type": "success"}}"#
            }
            Outcome::Failure | Outcome::Timeout => {
                r#"{"show-toast": {"message": "Erro ao salvar.", "type": "error"}}"#
            }
        };
        let headers = ResponseHeaders::new().with(TRIGGER_HEADER, toast);
        self.finish(request, outcome, headers);
    }

    /// The enclosing transaction resolved: keep every tentative value
    pub fn clear_all(&mut self) {
        self.pending_edits.clear();
        self.runtime.clear_all();
    }

    fn finish(&mut self, request: RequestId, outcome: Outcome, headers: ResponseHeaders) {
        match outcome {
            Outcome::Success => {}
            Outcome::Failure => self.runtime.handle(&HostEvent::ResponseError { request }),
            Outcome::Timeout => {
                self.runtime.handle(&HostEvent::Timeout { request });
                return;
            }
        }
        self.runtime.handle(&HostEvent::AfterRequest {
            request,
            successful: outcome == Outcome::Success,
            headers,
        });
    }
}

pub fn run(config_path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let config = config_io::load_config(config_path)?;
    let mut app = App::new(config)?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Install panic hook to restore terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let result = run_event_loop(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<(), Box<dyn std::error::Error>> {
    let started = Instant::now();
    loop {
        app.advance_to(started.elapsed());
        terminal.draw(|frame| render::render(frame, app))?;
        app.drain_effects();

        // Short poll so the bar animates between key presses
        if event::poll(Duration::from_millis(50))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            app.advance_to(started.elapsed());
            input::handle_key(app, key);
        }

        if app.should_quit {
            break;
        }
    }
    Ok(())
}
