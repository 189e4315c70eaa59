use std::io;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
    KeyModifiers, MouseEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use prosens_terminal::config::{AppConfig, CatalogSource};
use prosens_terminal::convert::{format_sens, profile_sensitivities};
use prosens_terminal::layout::{self, Regions};
use prosens_terminal::provider::spawn_catalog_provider;
use prosens_terminal::render::{EMPTY_LIST_TEXT, LOADING_TEXT, ListNode, ListView};
use prosens_terminal::state::{
    AppState, ConversionDisplay, Delta, Focus, ProviderCommand, Tab, apply_delta,
};

struct App {
    state: AppState,
    should_quit: bool,
    cmd_tx: Option<mpsc::Sender<ProviderCommand>>,
    rng: rand::rngs::ThreadRng,
}

impl App {
    fn new(config: &AppConfig, cmd_tx: Option<mpsc::Sender<ProviderCommand>>) -> Self {
        Self {
            state: AppState::new(config),
            should_quit: false,
            cmd_tx,
            rng: rand::thread_rng(),
        }
    }

    fn request_catalog(&mut self) {
        if !self.state.begin_catalog_fetch() {
            self.state
                .push_log("[WARN] Catalog request already running");
            return;
        }
        let sent = self
            .cmd_tx
            .as_ref()
            .is_some_and(|tx| tx.send(ProviderCommand::FetchCatalog).is_ok());
        if !sent {
            apply_delta(
                &mut self.state,
                Delta::CatalogFailed("catalog provider is not running".to_string()),
            );
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }
        if self.state.inert {
            if key.code == KeyCode::Esc {
                self.should_quit = true;
            }
            return;
        }

        let now = Instant::now();
        match key.code {
            KeyCode::Esc => {
                if self.state.help_overlay || self.state.stats_overlay {
                    self.state.help_overlay = false;
                    self.state.stats_overlay = false;
                } else {
                    self.should_quit = true;
                }
            }
            KeyCode::F(1) => self.state.switch_tab(Tab::Search),
            KeyCode::F(2) => self.state.switch_tab(Tab::Similar),
            KeyCode::F(3) => self.state.switch_tab(Tab::Convert),
            KeyCode::F(4) => {
                if self.state.tab == Tab::Convert {
                    self.state.toggle_advanced();
                }
            }
            KeyCode::F(5) => self.request_catalog(),
            KeyCode::F(6) => self.state.stats_overlay = !self.state.stats_overlay,
            KeyCode::F(8) => self.state.pick_random(&mut self.rng),
            KeyCode::F(9) => self.state.help_overlay = !self.state.help_overlay,
            KeyCode::Tab => self.state.cycle_focus(true),
            KeyCode::BackTab => self.state.cycle_focus(false),
            KeyCode::Enter => self.state.submit(now),
            KeyCode::Down => self.state.move_selection(true, false),
            KeyCode::Up => self.state.move_selection(false, false),
            KeyCode::PageDown => self.state.move_selection(true, true),
            KeyCode::PageUp => self.state.move_selection(false, true),
            KeyCode::Backspace => self.state.backspace(now),
            KeyCode::Char(c) => self.state.input_char(c, now),
            _ => {}
        }
    }

    /// Feeds the visible list heights to the scroll triggers. Lists on
    /// hidden tabs report zero rows, so their sentinels never fire.
    fn observe_lists(&mut self, regions: &Regions) {
        let browse = if self.state.tab == Tab::Search {
            layout::inner_height(regions.search.list)
        } else {
            0
        };
        let picker = if self.state.tab == Tab::Convert {
            layout::inner_height(regions.convert.list)
        } else {
            0
        };
        self.state.observe_sentinels(browse, picker);
    }
}

fn main() -> io::Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
    let config = AppConfig::from_env();

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let (tx, rx) = mpsc::channel();
    let (cmd_tx, cmd_rx) = mpsc::channel();
    spawn_catalog_provider(config.clone(), tx, cmd_rx);

    let mut app = App::new(&config, Some(cmd_tx));
    match layout::validate(terminal.size()?) {
        Ok(_) => {
            let source = match config.source {
                CatalogSource::Api => config.api_url.clone(),
                CatalogSource::Demo => "demo".to_string(),
            };
            app.state
                .push_log(format!("[INFO] Loading catalog from {source}"));
            app.request_catalog();
        }
        Err(missing) => {
            app.state.inert = true;
            app.state.push_log(format!(
                "[ERROR] Missing required layout regions: {missing}. Resize and restart."
            ));
        }
    }

    let res = run_app(&mut terminal, &mut app, rx);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("error: {err}");
    }
    Ok(())
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    rx: mpsc::Receiver<Delta>,
) -> io::Result<()> {
    let tick_rate = Duration::from_millis(100);
    let mut last_tick = Instant::now();

    loop {
        while let Ok(delta) = rx.try_recv() {
            apply_delta(&mut app.state, delta);
        }

        app.state.tick(Instant::now());

        terminal.draw(|f| ui(f, app))?;

        if !app.state.inert {
            let regions = layout::compute(terminal.size()?, app.state.advanced_open);
            app.observe_lists(&regions);
        }

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => app.on_key(key),
                Event::Mouse(mouse) if !app.state.inert => match mouse.kind {
                    MouseEventKind::ScrollDown => app.state.move_selection(true, false),
                    MouseEventKind::ScrollUp => app.state.move_selection(false, false),
                    _ => {}
                },
                _ => {}
            }
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn ui(frame: &mut Frame, app: &App) {
    let state = &app.state;
    let regions = layout::compute(frame.size(), state.advanced_open);

    let header = Paragraph::new(header_lines(state))
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, regions.header);

    if !state.inert {
        match state.tab {
            Tab::Search => render_search(frame, &regions, state),
            Tab::Similar => render_similar(frame, &regions, state),
            Tab::Convert => render_convert(frame, &regions, state),
        }
    }

    let console = Paragraph::new(console_text(state))
        .block(Block::default().title("Console").borders(Borders::TOP));
    frame.render_widget(console, regions.console);

    let footer = Paragraph::new(footer_text(state)).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(footer, regions.footer);

    if state.stats_overlay {
        render_stats_overlay(frame, frame.size(), state);
    }
    if state.help_overlay {
        render_help_overlay(frame, frame.size());
    }
}

fn header_lines(state: &AppState) -> Vec<Line<'static>> {
    let status = if state.inert {
        "unavailable".to_string()
    } else if state.catalog_loading {
        "loading...".to_string()
    } else {
        match state.catalog_loaded_at {
            Some(at) => format!(
                "{} players | loaded {}",
                state.catalog.len(),
                at.format("%H:%M:%S")
            ),
            None => "no data".to_string(),
        }
    };
    let title = Line::styled(
        format!(" PROSENS | {status}"),
        Style::default().add_modifier(Modifier::BOLD),
    );

    let mut tabs = vec![Span::raw(" ")];
    for (idx, tab) in Tab::ALL.into_iter().enumerate() {
        let label = format!(" F{} {} ", idx + 1, tab_label(tab));
        let style = if tab == state.tab {
            Style::default().fg(Color::Black).bg(Color::Cyan)
        } else {
            Style::default().fg(Color::Gray)
        };
        tabs.push(Span::styled(label, style));
        tabs.push(Span::raw(" "));
    }
    vec![title, Line::from(tabs)]
}

fn tab_label(tab: Tab) -> &'static str {
    match tab {
        Tab::Search => "Search",
        Tab::Similar => "Similar",
        Tab::Convert => "Convert",
    }
}

fn footer_text(state: &AppState) -> String {
    if state.inert {
        return "Esc Quit".to_string();
    }
    match state.tab {
        Tab::Search => {
            "Type to filter | ↑/↓ PgUp/PgDn Move | F8 Random | F5 Reload | F6 Stats | F9 Help | Esc Quit".to_string()
        }
        Tab::Similar => {
            "Tab Next field | Enter Find | ↑/↓ Scroll | F5 Reload | F6 Stats | F9 Help | Esc Quit".to_string()
        }
        Tab::Convert => {
            "Tab Next field | ↑/↓ Pick pro | Enter Convert | F4 Manual | F5 Reload | F9 Help | Esc Quit".to_string()
        }
    }
}

fn render_search(frame: &mut Frame, regions: &Regions, state: &AppState) {
    let search = regions.search;
    render_input(
        frame,
        search.input,
        "Search players or teams",
        state.browse.query.as_str(),
        state.focus == Focus::SearchInput,
    );
    let title = format!(
        "Players ({} of {})",
        state.browse.view.card_count(),
        state.browse.filtered.len()
    );
    render_list(
        frame,
        search.list,
        &title,
        &state.browse.view,
        Some(state.browse.selected),
        state.browse.scroll,
    );

    let profile = Paragraph::new(profile_text(state))
        .wrap(Wrap { trim: false })
        .block(Block::default().title("Profile").borders(Borders::ALL));
    frame.render_widget(profile, search.profile);
}

fn profile_text(state: &AppState) -> String {
    let Some(player) = state.browse.selected_player() else {
        return "Select a player".to_string();
    };
    let mut lines = vec![
        player.name.clone(),
        player.team.clone(),
        String::new(),
        format!("Sens:  {}", format_sens(player.sens)),
        format!("DPI:   {}", player.dpi),
        format!("eDPI:  {:.1}", player.edpi),
        String::new(),
        "Same feel at:".to_string(),
    ];
    for (dpi, sens) in profile_sensitivities(player.edpi) {
        lines.push(format!("  {dpi:>5} DPI  {}", format_sens(sens)));
    }
    lines.join("\n")
}

fn render_similar(frame: &mut Frame, regions: &Regions, state: &AppState) {
    let similar = regions.similar;
    render_input(
        frame,
        similar.sens_input,
        "Your sensitivity",
        state.similar.sens.as_str(),
        state.focus == Focus::SimilarSens,
    );
    render_input(
        frame,
        similar.dpi_input,
        "Your DPI",
        state.similar.dpi.as_str(),
        state.focus == Focus::SimilarDpi,
    );
    let title = match state.similar.target_edpi {
        Some(target) => format!("Closest pros to eDPI {target:.1}"),
        None => "Closest pros".to_string(),
    };
    render_list(
        frame,
        similar.list,
        &title,
        &state.similar.view,
        None,
        state.similar.scroll,
    );
}

fn render_convert(frame: &mut Frame, regions: &Regions, state: &AppState) {
    let convert = regions.convert;
    render_input(
        frame,
        convert.dpi_input,
        "Your DPI",
        state.your_dpi.as_str(),
        state.focus == Focus::YourDpi,
    );
    render_input(
        frame,
        convert.pro_search,
        "Find a pro",
        state.picker.query.as_str(),
        state.focus == Focus::ProSearch,
    );

    let pro_line = match &state.selected_pro {
        Some(pro) => format!(
            "{} ({}) {} @ {} DPI",
            pro.name,
            pro.team,
            format_sens(pro.sens),
            pro.dpi
        ),
        None => "Pick a pro below and press Enter".to_string(),
    };
    let mut result_spans = vec![Span::raw(pro_line)];
    if let Some(display) = &state.conversion {
        let style = match display {
            ConversionDisplay::Error(_) => Style::default().fg(Color::Red),
            value if value.is_revealed(Instant::now()) => Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
            _ => Style::default().fg(Color::DarkGray),
        };
        result_spans.push(Span::raw("  →  "));
        result_spans.push(Span::styled(display.text(), style));
    }
    let result = Paragraph::new(Line::from(result_spans))
        .block(Block::default().title("Result").borders(Borders::ALL));
    frame.render_widget(result, convert.result);

    let toggle = Paragraph::new(format!(" [F4] {}", state.advanced_toggle_label()))
        .style(Style::default().fg(Color::Cyan));
    frame.render_widget(toggle, convert.toggle);

    if let Some(advanced) = convert.advanced {
        render_input(
            frame,
            advanced.sens_input,
            "Your sensitivity",
            state.your_sens.as_str(),
            state.focus == Focus::YourSens,
        );
        render_input(
            frame,
            advanced.target_input,
            "Target DPI",
            state.target_dpi.as_str(),
            state.focus == Focus::TargetDpi,
        );
        let style = if state.focus == Focus::ManualConvert {
            Style::default().fg(Color::Black).bg(Color::Cyan)
        } else {
            Style::default()
        };
        let button = Paragraph::new(" Convert ")
            .style(style)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(button, advanced.button);
    }

    let title = format!(
        "Pros ({} of {})",
        state.picker.view.card_count(),
        state.picker.filtered.len()
    );
    render_list(
        frame,
        convert.list,
        &title,
        &state.picker.view,
        Some(state.picker.selected),
        state.picker.scroll,
    );
}

fn render_input(frame: &mut Frame, area: Rect, title: &str, value: &str, focused: bool) {
    let (text, border) = if focused {
        (format!("{value}▏"), Style::default().fg(Color::Cyan))
    } else {
        (value.to_string(), Style::default())
    };
    let input = Paragraph::new(text).block(
        Block::default()
            .title(title.to_string())
            .borders(Borders::ALL)
            .border_style(border),
    );
    frame.render_widget(input, area);
}

fn render_list(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    view: &ListView,
    selected: Option<usize>,
    scroll: usize,
) {
    let visible: Vec<Line> = list_lines(view, selected)
        .into_iter()
        .skip(scroll)
        .take(layout::inner_height(area))
        .collect();
    let list = Paragraph::new(visible)
        .block(Block::default().title(title.to_string()).borders(Borders::ALL));
    frame.render_widget(list, area);
}

fn list_lines(view: &ListView, selected: Option<usize>) -> Vec<Line<'static>> {
    let dim = Style::default().fg(Color::DarkGray);
    let mut lines = Vec::with_capacity(view.total_rows());
    let mut card_idx = 0;
    for node in view.nodes() {
        match node {
            ListNode::Loading => {
                lines.push(Line::styled(LOADING_TEXT, Style::default().fg(Color::Yellow)))
            }
            ListNode::Empty => lines.push(Line::styled(EMPTY_LIST_TEXT, dim)),
            ListNode::Error(msg) => {
                lines.push(Line::styled(msg.clone(), Style::default().fg(Color::Red)))
            }
            ListNode::Sentinel => lines.push(Line::styled("  ···", dim)),
            ListNode::Card(card) => {
                let base = if selected == Some(card_idx) {
                    Style::default().bg(Color::DarkGray)
                } else {
                    Style::default()
                };
                let [title, sens, dpi] = card.lines();
                lines.push(Line::styled(title, base.add_modifier(Modifier::BOLD)));
                lines.push(Line::styled(format!("  {sens}"), base));
                lines.push(Line::styled(format!("  {dpi}"), base.fg(Color::Gray)));
                card_idx += 1;
            }
        }
    }
    lines
}

fn console_text(state: &AppState) -> String {
    if state.logs.is_empty() {
        return "No messages yet".to_string();
    }
    state
        .logs
        .iter()
        .rev()
        .take(3)
        .cloned()
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect::<Vec<_>>()
        .join("\n")
}

fn stats_text(state: &AppState) -> String {
    let Some(summary) = &state.catalog_summary else {
        return "No catalog loaded".to_string();
    };
    let mut lines = vec![
        format!(
            "Players: {}   Mean eDPI: {:.1}   Median eDPI: {:.1}",
            summary.players, summary.mean_edpi, summary.median_edpi
        ),
        format!(
            "Lowest:  {} ({}) {:.1}",
            summary.lowest.name, summary.lowest.team, summary.lowest.edpi
        ),
        format!(
            "Highest: {} ({}) {:.1}",
            summary.highest.name, summary.highest.team, summary.highest.edpi
        ),
        String::new(),
        format!(
            "{:<20} {:>4} {:>8} {:>8} {:>15}",
            "Team", "n", "mean", "median", "range"
        ),
    ];
    for team in &summary.teams {
        lines.push(format!(
            "{:<20} {:>4} {:>8.1} {:>8.1} {:>7.1}-{:<7.1}",
            truncate(&team.team, 20),
            team.players,
            team.mean_edpi,
            team.median_edpi,
            team.min.edpi,
            team.max.edpi
        ));
    }
    lines.push(String::new());
    let ratio = state
        .engine
        .hit_ratio()
        .map(|r| format!("{:.0}%", r * 100.0))
        .unwrap_or_else(|| "-".to_string());
    lines.push(format!(
        "Card cache: {} entries, hit ratio {ratio}",
        state.engine.cached_cards()
    ));
    lines.join("\n")
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max.saturating_sub(1)).collect();
    out.push('…');
    out
}

fn render_stats_overlay(frame: &mut Frame, area: Rect, state: &AppState) {
    let popup_area = centered_rect(70, 70, area);
    frame.render_widget(Clear, popup_area);
    let stats = Paragraph::new(stats_text(state))
        .block(Block::default().title("Catalog stats").borders(Borders::ALL));
    frame.render_widget(stats, popup_area);
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 60, area);
    frame.render_widget(Clear, popup_area);

    let text = [
        "Pro Sensitivity Terminal - Help",
        "",
        "Tabs:",
        "  F1           Search pros",
        "  F2           Similar sensitivities",
        "  F3           Convert sensitivity",
        "",
        "Global:",
        "  Tab / S-Tab  Next / previous field",
        "  ↑/↓ PgUp/Dn  Move in list",
        "  F5           Reload catalog",
        "  F6           Catalog stats",
        "  F8           Random pro",
        "  F9           Toggle help",
        "  Esc          Close overlay / quit",
        "",
        "Convert:",
        "  Enter        Convert (on a pro: pick it)",
        "  F4           Manual DPI conversion",
    ]
    .join("\n");

    let help = Paragraph::new(text)
        .block(Block::default().title("Help").borders(Borders::ALL))
        .style(Style::default());
    frame.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}
