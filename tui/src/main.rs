//! CardioTwin bedside monitor: interactive Ratatui TUI
//!
//! Runs the simulation loop in-process against the embedded model (or the
//! artifact path given as the first argument) and renders the shared store.
//!
//! Layout:
//!   ┌─── header ──────────────────────────────────────────────────────────┐
//!   │  CardioTwin Monitor   state   risk label                            │
//!   ├─── left panel ──────────────────┬─── right panel ───────────────────┤
//!   │  Current Vitals + Thresholds    │  Forecast                         │
//!   ├─────────────────────────────────┴───────────────────────────────────┤
//!   │  Unacknowledged Alerts                                              │
//!   ├─────────────────────────────────────────────────────────────────────┤
//!   │  footer (key bindings, last action)                                 │
//!   └─────────────────────────────────────────────────────────────────────┘

use std::{io, path::Path, sync::Arc, time::Duration};

use crossterm::{
    event::{self, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame, Terminal,
};

use cardiotwin_contracts::{
    alert::{IndexedAlert, Severity},
    thresholds::AlertThresholds,
    vitals::{RiskLabel, Snapshot, StaticAttributes},
};
use cardiotwin_core::{config::SimulationConfig, Simulator, StateStore};
use cardiotwin_model::{LinearClassifier, DEFAULT_MODEL_TOML};

// ── App state ─────────────────────────────────────────────────────────────────

struct App {
    store: Arc<StateStore>,
    model_name: String,

    // Copied out of the store once per frame.
    running: bool,
    snapshot: Snapshot,
    alerts: Vec<IndexedAlert>,
    thresholds: AlertThresholds,

    /// Outcome of the last key action, shown in the footer.
    status: String,
}

impl App {
    fn new(store: Arc<StateStore>, model_name: String) -> Self {
        let mut app = Self {
            store,
            model_name,
            running: false,
            snapshot: Snapshot::default(),
            alerts: Vec::new(),
            thresholds: AlertThresholds::default(),
            status: "press [s] to start the simulation".to_string(),
        };
        app.refresh();
        app
    }

    fn refresh(&mut self) {
        self.running = self.store.is_running();
        self.snapshot = self.store.snapshot();
        self.alerts = self.store.alerts();
        self.thresholds = self.store.thresholds();
    }

    fn start(&mut self) {
        if self.running {
            self.status = "simulation already running".to_string();
            return;
        }
        self.store.start(StaticAttributes::default());
        self.status = "simulation started with default patient".to_string();
    }

    /// Acknowledge the oldest alert still listed.
    fn acknowledge_oldest(&mut self) {
        let Some(oldest) = self.alerts.first().map(|a| a.index) else {
            self.status = "no alerts to acknowledge".to_string();
            return;
        };
        self.status = match self.store.acknowledge_alert(oldest) {
            Ok(()) => format!("acknowledged alert #{}", oldest),
            Err(e) => format!("acknowledge failed: {}", e),
        };
    }
}

// ── Rendering ─────────────────────────────────────────────────────────────────

fn ui(f: &mut Frame, app: &App) {
    let outer_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),  // header
            Constraint::Min(12),    // vitals + forecast
            Constraint::Length(10), // alerts
            Constraint::Length(3),  // footer
        ])
        .split(f.area());

    render_header(f, outer_chunks[0], app);

    let mid_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(outer_chunks[1]);

    render_vitals(f, mid_chunks[0], app);
    render_forecast(f, mid_chunks[1], app);
    render_alerts(f, outer_chunks[2], app);
    render_footer(f, outer_chunks[3], app);
}

fn label_style(label: RiskLabel) -> Style {
    let color = match label {
        RiskLabel::Waiting => Color::DarkGray,
        RiskLabel::LowRisk => Color::Green,
        RiskLabel::HighRisk => Color::Red,
        RiskLabel::Error => Color::Magenta,
    };
    Style::default().fg(color).add_modifier(Modifier::BOLD)
}

fn severity_color(severity: Severity) -> Color {
    match severity {
        Severity::Medium => Color::Yellow,
        Severity::High => Color::LightRed,
        Severity::Critical => Color::Red,
    }
}

fn panel(title: &str) -> Block<'_> {
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let title_style = Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD);
    let (state, state_color) = if app.running {
        ("RUNNING", Color::Green)
    } else {
        ("PAUSED", Color::Yellow)
    };

    let line = Line::from(vec![
        Span::styled("CardioTwin Monitor    ", title_style),
        Span::styled(state, Style::default().fg(state_color)),
        Span::raw("    risk: "),
        Span::styled(app.snapshot.prediction.as_str(), label_style(app.snapshot.prediction)),
        Span::styled(
            format!("    model: {}", app.model_name),
            Style::default().fg(Color::DarkGray),
        ),
    ]);
    f.render_widget(
        Paragraph::new(line).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        ),
        area,
    );
}

fn render_vitals(f: &mut Frame, area: Rect, app: &App) {
    let s = &app.snapshot;
    let t = &app.thresholds;
    let row = |name: &str, value: String, bounds: String| {
        ListItem::new(Line::from(vec![
            Span::raw(format!("  {:<16}", name)),
            Span::styled(
                format!("{:>8}", value),
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            ),
            Span::styled(format!("  {}", bounds), Style::default().fg(Color::DarkGray)),
        ]))
    };

    let items = vec![
        row(
            "Blood pressure",
            format!("{} mmHg", s.trestbps),
            format!("{}..{}", t.blood_pressure_low, t.blood_pressure_high),
        ),
        row(
            "Heart rate",
            format!("{} BPM", s.thalach),
            format!("{}..{}", t.heart_rate_low, t.heart_rate_high),
        ),
        row("ST depression", format!("{:.2}", s.oldpeak), format!("> {}", t.st_depression_high)),
        row("Cholesterol", s.chol.to_string(), String::new()),
        row(
            "Exercise angina",
            if s.exang == 1 { "yes" } else { "no" }.to_string(),
            String::new(),
        ),
    ];

    f.render_widget(List::new(items).block(panel(" Current Vitals ")), area);
}

fn render_forecast(f: &mut Frame, area: Rect, app: &App) {
    let mut items: Vec<ListItem> = Vec::new();

    if app.snapshot.future_predictions.is_empty() {
        items.push(ListItem::new(Span::styled(
            "  No forecast yet",
            Style::default().fg(Color::DarkGray),
        )));
    } else {
        items.push(ListItem::new(Span::styled(
            format!("  {:<8}{:>6}{:>6}{:>8}  {}", "when", "BP", "HR", "ST", "risk"),
            Style::default().fg(Color::DarkGray),
        )));
        for entry in &app.snapshot.future_predictions {
            items.push(ListItem::new(Line::from(vec![
                Span::raw(format!(
                    "  {:<8}{:>6}{:>6}{:>8.2}  ",
                    entry.time, entry.trestbps, entry.thalach, entry.oldpeak
                )),
                Span::styled(entry.prediction.as_str(), label_style(entry.prediction)),
            ])));
        }
    }

    f.render_widget(List::new(items).block(panel(" Forecast ")), area);
}

fn render_alerts(f: &mut Frame, area: Rect, app: &App) {
    let mut items: Vec<ListItem> = Vec::new();

    if app.alerts.is_empty() {
        items.push(ListItem::new(Span::styled(
            "  No unacknowledged alerts",
            Style::default().fg(Color::DarkGray),
        )));
    }
    // Newest first so the latest alerts stay visible in a short panel.
    for indexed in app.alerts.iter().rev() {
        let alert = &indexed.alert;
        items.push(ListItem::new(Line::from(vec![
            Span::styled(
                format!("  #{:<4}", indexed.index),
                Style::default().fg(Color::DarkGray),
            ),
            Span::styled(
                format!("{:<9}", alert.severity.as_str().to_uppercase()),
                Style::default()
                    .fg(severity_color(alert.severity))
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("{}  ", alert.timestamp),
                Style::default().fg(Color::Gray),
            ),
            Span::raw(alert.message.as_str()),
        ])));
    }

    let title = format!(" Alerts ({}) ", app.alerts.len());
    f.render_widget(List::new(items).block(panel(&title)), area);
}

fn render_footer(f: &mut Frame, area: Rect, app: &App) {
    let spans = vec![
        Span::styled(" [s] ", Style::default().fg(Color::Cyan)),
        Span::raw("Start  "),
        Span::styled("[a] ", Style::default().fg(Color::Cyan)),
        Span::raw("Acknowledge oldest  "),
        Span::styled("[q] ", Style::default().fg(Color::Cyan)),
        Span::raw("Quit    "),
        Span::styled(app.status.as_str(), Style::default().fg(Color::Gray)),
    ];

    let footer = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    f.render_widget(footer, area);
}

// ── Terminal setup / teardown ─────────────────────────────────────────────────

fn setup_terminal() -> io::Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    Terminal::new(CrosstermBackend::new(stdout))
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> io::Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()
}

// ── Main event loop ───────────────────────────────────────────────────────────

fn load_model() -> io::Result<LinearClassifier> {
    let loaded = match std::env::args().nth(1) {
        Some(path) => LinearClassifier::from_file(Path::new(&path)),
        None => LinearClassifier::from_toml_str(DEFAULT_MODEL_TOML),
    };
    loaded.map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e.to_string()))
}

fn main() -> io::Result<()> {
    // Load before touching the terminal so a bad model prints normally.
    let model = load_model()?;
    let model_name = model.name().to_string();

    let store = Arc::new(StateStore::default());
    Simulator::new(store.clone(), Arc::new(model), SimulationConfig::default()).spawn()?;

    // Restore the terminal before the default hook prints a panic.
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        default_hook(info);
    }));

    let mut terminal = setup_terminal()?;
    let mut app = App::new(store, model_name);

    const REFRESH_MS: u64 = 250;

    loop {
        app.refresh();
        terminal.draw(|f| ui(f, &app))?;

        if event::poll(Duration::from_millis(REFRESH_MS))? {
            if let Event::Key(key) = event::read()? {
                match key.code {
                    KeyCode::Char('q') | KeyCode::Char('Q') => break,
                    KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => break,
                    KeyCode::Char('s') | KeyCode::Char('S') => app.start(),
                    KeyCode::Char('a') | KeyCode::Char('A') => app.acknowledge_oldest(),
                    _ => {}
                }
            }
        }
    }

    restore_terminal(&mut terminal)?;
    Ok(())
}
