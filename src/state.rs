use std::collections::VecDeque;
use std::rc::Rc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Local};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::AppConfig;
use crate::convert::{self, ConvertError};
use crate::pagination::{BROWSE_PAGE_SIZE, PICKER_PAGE_SIZE, PaginationState};
use crate::render::{CARD_HEIGHT, CardView, ListView, RenderEngine, RenderMode};
use crate::scroll::{BROWSE_TRIGGER_MARGIN, PICKER_TRIGGER_MARGIN, ScrollTrigger, Viewport};
use crate::search::{Debouncer, filter_players};
use crate::similar::{SIMILAR_LIMIT, find_similar};
use crate::stats::{CatalogSummary, summarize};

pub const LOAD_ERROR_TEXT: &str = "Error loading initial player data. Please try again.";
pub const MISSING_PRO_DPI_TEXT: &str = "Please enter your DPI";
pub const MISSING_MANUAL_TEXT: &str = "Please fill in all DPI and sensitivity values";
pub const CONVERT_ERROR_TEXT: &str = "Error converting sensitivity. Please check your input values.";
pub const MISSING_SIMILAR_TEXT: &str = "Please enter both DPI and sensitivity values.";
pub const SIMILAR_ERROR_TEXT: &str = "Error finding similar sensitivities. Please try again.";

/// How long a fresh conversion result stays dimmed before it is highlighted.
pub const REVEAL_DELAY: Duration = Duration::from_millis(250);

const MAX_LOGS: usize = 200;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    pub team: String,
    pub sens: f64,
    pub dpi: u32,
    pub edpi: f64,
}

impl Player {
    pub fn new(name: impl Into<String>, team: impl Into<String>, sens: f64, dpi: u32) -> Self {
        Self {
            name: name.into(),
            team: team.into(),
            sens,
            dpi,
            edpi: convert::edpi(sens, f64::from(dpi)),
        }
    }

    pub fn key(&self) -> PlayerKey {
        PlayerKey {
            name: self.name.clone(),
            team: self.team.clone(),
            sens_bits: self.sens.to_bits(),
            dpi: self.dpi,
        }
    }
}

/// Identity of a player for memoization: (name, team, sens, dpi).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PlayerKey {
    pub name: String,
    pub team: String,
    pub sens_bits: u64,
    pub dpi: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Search,
    Similar,
    Convert,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Search, Tab::Similar, Tab::Convert];

    pub fn from_name(raw: &str) -> Option<Tab> {
        match raw.trim().to_lowercase().as_str() {
            "search" | "browse" => Some(Tab::Search),
            "similar" => Some(Tab::Similar),
            "convert" | "converter" => Some(Tab::Convert),
            _ => None,
        }
    }

    fn default_focus(self) -> Focus {
        match self {
            Tab::Search => Focus::SearchInput,
            Tab::Similar => Focus::SimilarSens,
            Tab::Convert => Focus::YourDpi,
        }
    }

    fn focus_order(self, advanced_open: bool) -> &'static [Focus] {
        match self {
            Tab::Search => &[Focus::SearchInput],
            Tab::Similar => &[Focus::SimilarSens, Focus::SimilarDpi],
            Tab::Convert if advanced_open => &[
                Focus::YourDpi,
                Focus::ProSearch,
                Focus::YourSens,
                Focus::TargetDpi,
                Focus::ManualConvert,
            ],
            Tab::Convert => &[Focus::YourDpi, Focus::ProSearch],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    SearchInput,
    SimilarSens,
    SimilarDpi,
    YourDpi,
    ProSearch,
    YourSens,
    TargetDpi,
    ManualConvert,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    Browse,
    Picker,
}

impl ListKind {
    pub fn page_size(self) -> usize {
        match self {
            ListKind::Browse => BROWSE_PAGE_SIZE,
            ListKind::Picker => PICKER_PAGE_SIZE,
        }
    }

    pub fn trigger_margin(self) -> usize {
        match self {
            ListKind::Browse => BROWSE_TRIGGER_MARGIN,
            ListKind::Picker => PICKER_TRIGGER_MARGIN,
        }
    }

    pub fn clickable(self) -> bool {
        matches!(self, ListKind::Picker)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextInput {
    value: String,
}

impl TextInput {
    pub fn as_str(&self) -> &str {
        &self.value
    }

    pub fn push(&mut self, c: char) {
        self.value.push(c);
    }

    pub fn pop(&mut self) {
        self.value.pop();
    }

    pub fn set(&mut self, value: impl Into<String>) {
        self.value = value.into();
    }
}

#[derive(Debug)]
pub struct PlayerList {
    pub kind: ListKind,
    pub query: TextInput,
    pub debounce: Debouncer,
    pub filtered: Vec<Player>,
    pub pagination: PaginationState,
    pub view: ListView,
    pub trigger: Option<ScrollTrigger>,
    pub selected: usize,
    pub scroll: usize,
    pub viewport_height: usize,
}

impl PlayerList {
    pub fn new(kind: ListKind, debounce_delay: Duration) -> Self {
        Self {
            kind,
            query: TextInput::default(),
            debounce: Debouncer::new(debounce_delay),
            filtered: Vec::new(),
            pagination: PaginationState::new(kind.page_size()),
            view: ListView::new(),
            trigger: None,
            selected: 0,
            scroll: 0,
            viewport_height: 0,
        }
    }

    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.scroll, self.viewport_height)
    }

    pub fn refilter(&mut self, catalog: &[Player], engine: &mut RenderEngine) {
        self.filtered = filter_players(catalog, self.query.as_str());
        self.pagination.reset();
        let outcome = engine.render_page(
            &self.filtered,
            &mut self.view,
            &self.pagination,
            self.kind.clickable(),
            RenderMode::Replace,
        );
        self.pagination.sync_has_more(self.filtered.len());
        self.selected = 0;
        self.scroll = 0;
        if outcome.has_sentinel {
            self.ensure_trigger();
        }
    }

    /// Appends the next page. No-op while a load is running or when nothing
    /// is left to show.
    pub fn load_more(&mut self, engine: &mut RenderEngine) -> bool {
        let clickable = self.kind.clickable();
        let total = self.filtered.len();
        let Some(mut page) = self.pagination.begin_load() else {
            return false;
        };
        page.advance();
        let outcome = engine.render_page(
            &self.filtered,
            &mut self.view,
            &page,
            clickable,
            RenderMode::Append,
        );
        page.sync_has_more(total);
        drop(page);
        if outcome.has_sentinel {
            self.ensure_trigger();
        }
        true
    }

    /// Called once per frame with the current list height. Loads the next
    /// page when the sentinel is within the trigger margin.
    pub fn observe(&mut self, engine: &mut RenderEngine, viewport_height: usize) -> bool {
        self.viewport_height = viewport_height;
        let viewport = self.viewport();
        let sentinel = self.view.sentinel_row();
        let Some(trigger) = self.trigger.as_mut() else {
            return false;
        };
        if !trigger.observe(sentinel, viewport) {
            return false;
        }
        self.load_more(engine)
    }

    pub fn show_loading(&mut self) {
        self.view.show_loading();
        self.selected = 0;
        self.scroll = 0;
    }

    pub fn clear(&mut self) {
        self.filtered.clear();
        self.view.clear();
        self.pagination.reset();
        self.pagination.has_more = false;
        self.selected = 0;
        self.scroll = 0;
    }

    pub fn selected_card(&self) -> Option<&Rc<CardView>> {
        self.view.card(self.selected)
    }

    pub fn selected_player(&self) -> Option<&Player> {
        if self.selected >= self.view.card_count() {
            return None;
        }
        self.filtered.get(self.selected)
    }

    pub fn select_next(&mut self) {
        let total = self.view.card_count();
        if total == 0 {
            self.selected = 0;
            return;
        }
        self.selected = (self.selected + 1).min(total - 1);
        self.ensure_selected_visible();
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
        self.ensure_selected_visible();
    }

    pub fn page_down(&mut self) {
        let step = (self.viewport_height / CARD_HEIGHT).max(1);
        for _ in 0..step {
            self.select_next();
        }
    }

    pub fn page_up(&mut self) {
        let step = (self.viewport_height / CARD_HEIGHT).max(1);
        self.selected = self.selected.saturating_sub(step);
        self.ensure_selected_visible();
    }

    pub fn select(&mut self, index: usize) {
        self.selected = index.min(self.view.card_count().saturating_sub(1));
        self.ensure_selected_visible();
    }

    fn ensure_selected_visible(&mut self) {
        if self.viewport_height == 0 {
            return;
        }
        let Some(row) = self.view.card_row(self.selected) else {
            return;
        };
        if row < self.scroll {
            self.scroll = row;
        } else if row + CARD_HEIGHT > self.scroll + self.viewport_height {
            self.scroll = (row + CARD_HEIGHT).saturating_sub(self.viewport_height);
        }
    }

    fn ensure_trigger(&mut self) {
        let margin = self.kind.trigger_margin();
        self.trigger.get_or_insert_with(|| ScrollTrigger::new(margin));
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConversionDisplay {
    Value { value: f64, shown_at: Instant },
    Error(String),
}

impl ConversionDisplay {
    pub fn text(&self) -> String {
        match self {
            ConversionDisplay::Value { value, .. } => convert::format_sens(*value),
            ConversionDisplay::Error(message) => message.clone(),
        }
    }

    pub fn is_revealed(&self, now: Instant) -> bool {
        match self {
            ConversionDisplay::Value { shown_at, .. } => {
                now.saturating_duration_since(*shown_at) >= REVEAL_DELAY
            }
            ConversionDisplay::Error(_) => true,
        }
    }
}

#[derive(Debug, Default)]
pub struct SimilarPanel {
    pub sens: TextInput,
    pub dpi: TextInput,
    pub view: ListView,
    pub scroll: usize,
    pub target_edpi: Option<f64>,
}

#[derive(Debug)]
pub struct AppState {
    pub tab: Tab,
    pub focus: Focus,
    pub inert: bool,
    pub catalog: Vec<Player>,
    pub catalog_loading: bool,
    pub catalog_loaded_at: Option<DateTime<Local>>,
    pub catalog_summary: Option<CatalogSummary>,
    pub engine: RenderEngine,
    pub browse: PlayerList,
    pub picker: PlayerList,
    pub similar: SimilarPanel,
    pub your_dpi: TextInput,
    pub your_sens: TextInput,
    pub target_dpi: TextInput,
    pub advanced_open: bool,
    pub selected_pro: Option<Player>,
    pub conversion: Option<ConversionDisplay>,
    pub logs: VecDeque<String>,
    pub help_overlay: bool,
    pub stats_overlay: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(&AppConfig::default())
    }
}

impl AppState {
    pub fn new(config: &AppConfig) -> Self {
        let tab = config.start_tab;
        Self {
            tab,
            focus: tab.default_focus(),
            inert: false,
            catalog: Vec::new(),
            catalog_loading: false,
            catalog_loaded_at: None,
            catalog_summary: None,
            engine: RenderEngine::default(),
            browse: PlayerList::new(ListKind::Browse, config.search_debounce),
            picker: PlayerList::new(ListKind::Picker, config.search_debounce),
            similar: SimilarPanel::default(),
            your_dpi: TextInput::default(),
            your_sens: TextInput::default(),
            target_dpi: TextInput::default(),
            advanced_open: false,
            selected_pro: None,
            conversion: None,
            logs: VecDeque::with_capacity(MAX_LOGS),
            help_overlay: false,
            stats_overlay: false,
        }
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        self.logs.push_back(msg.into());
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }

    pub fn begin_catalog_fetch(&mut self) -> bool {
        if self.catalog_loading {
            return false;
        }
        self.catalog_loading = true;
        self.browse.show_loading();
        true
    }

    pub fn switch_tab(&mut self, tab: Tab) {
        self.tab = tab;
        self.focus = tab.default_focus();
    }

    pub fn visible_panels(&self) -> Vec<Tab> {
        Tab::ALL.into_iter().filter(|t| *t == self.tab).collect()
    }

    pub fn cycle_focus(&mut self, forward: bool) {
        let order = self.tab.focus_order(self.advanced_open);
        let pos = order.iter().position(|f| *f == self.focus).unwrap_or(0);
        let next = if forward {
            (pos + 1) % order.len()
        } else {
            (pos + order.len() - 1) % order.len()
        };
        self.focus = order[next];
    }

    pub fn toggle_advanced(&mut self) {
        self.advanced_open = !self.advanced_open;
        if !self.advanced_open
            && matches!(
                self.focus,
                Focus::YourSens | Focus::TargetDpi | Focus::ManualConvert
            )
        {
            self.focus = Focus::YourDpi;
        }
    }

    pub fn advanced_toggle_label(&self) -> &'static str {
        if self.advanced_open {
            "Hide Manual DPI Conversion"
        } else {
            "Show Manual DPI Conversion"
        }
    }

    pub fn input_char(&mut self, c: char, now: Instant) {
        match self.focus {
            Focus::SearchInput => {
                self.browse.query.push(c);
                self.browse.debounce.restart(now);
            }
            Focus::ProSearch => {
                self.picker.query.push(c);
                self.picker.debounce.restart(now);
            }
            Focus::SimilarSens => self.similar.sens.push(c),
            Focus::SimilarDpi => self.similar.dpi.push(c),
            Focus::YourDpi => self.your_dpi.push(c),
            Focus::YourSens => self.your_sens.push(c),
            Focus::TargetDpi => self.target_dpi.push(c),
            Focus::ManualConvert => {}
        }
    }

    pub fn backspace(&mut self, now: Instant) {
        match self.focus {
            Focus::SearchInput => {
                self.browse.query.pop();
                self.browse.debounce.restart(now);
            }
            Focus::ProSearch => {
                self.picker.query.pop();
                self.picker.debounce.restart(now);
            }
            Focus::SimilarSens => self.similar.sens.pop(),
            Focus::SimilarDpi => self.similar.dpi.pop(),
            Focus::YourDpi => self.your_dpi.pop(),
            Focus::YourSens => self.your_sens.pop(),
            Focus::TargetDpi => self.target_dpi.pop(),
            Focus::ManualConvert => {}
        }
    }

    pub fn submit(&mut self, now: Instant) {
        match self.focus {
            Focus::SearchInput => {}
            Focus::SimilarSens | Focus::SimilarDpi => self.submit_similar(),
            Focus::YourDpi => self.convert_to_pro(now),
            Focus::ProSearch => self.activate_selected_pick(now),
            Focus::YourSens | Focus::TargetDpi | Focus::ManualConvert => self.manual_convert(now),
        }
    }

    pub fn tick(&mut self, now: Instant) {
        if self.browse.debounce.poll(now) {
            self.browse.refilter(&self.catalog, &mut self.engine);
        }
        if self.picker.debounce.poll(now) {
            self.picker.refilter(&self.catalog, &mut self.engine);
        }
    }

    pub fn observe_sentinels(&mut self, browse_height: usize, picker_height: usize) {
        if self.browse.observe(&mut self.engine, browse_height) {
            let page = self.browse.pagination.current_page();
            self.push_log(format!("[INFO] Browse list page {page} loaded"));
        }
        if self.picker.observe(&mut self.engine, picker_height) {
            let page = self.picker.pagination.current_page();
            self.push_log(format!("[INFO] Picker list page {page} loaded"));
        }
    }

    pub fn move_selection(&mut self, down: bool, page: bool) {
        match self.tab {
            Tab::Search => move_list(&mut self.browse, down, page),
            Tab::Convert => move_list(&mut self.picker, down, page),
            Tab::Similar => {
                let step = if page { 10 } else { 1 };
                let max = self.similar.view.total_rows().saturating_sub(1);
                self.similar.scroll = if down {
                    (self.similar.scroll + step).min(max)
                } else {
                    self.similar.scroll.saturating_sub(step)
                };
            }
        }
    }

    /// Activates the highlighted picker card: it becomes the selected pro
    /// and is converted to the visitor's DPI straight away.
    pub fn activate_selected_pick(&mut self, now: Instant) {
        let Some(payload) = self
            .picker
            .selected_card()
            .and_then(|card| card.payload.clone())
        else {
            return;
        };
        self.selected_pro = Some(payload);
        self.convert_to_pro(now);
    }

    pub fn convert_to_pro(&mut self, now: Instant) {
        let Some(pro) = self.selected_pro.clone() else {
            return;
        };
        let Some(your_dpi) = convert::parse_positive(self.your_dpi.as_str()) else {
            self.conversion = Some(ConversionDisplay::Error(MISSING_PRO_DPI_TEXT.to_string()));
            return;
        };
        let result = convert::convert_sensitivity(f64::from(pro.dpi), pro.sens, your_dpi);
        self.show_conversion(result, now);
        if matches!(self.conversion, Some(ConversionDisplay::Value { .. })) {
            self.push_log(format!("[INFO] Converted {} to {your_dpi} DPI", pro.name));
        }
    }

    pub fn manual_convert(&mut self, now: Instant) {
        let inputs = (
            convert::parse_positive(self.your_dpi.as_str()),
            convert::parse_positive(self.your_sens.as_str()),
            convert::parse_positive(self.target_dpi.as_str()),
        );
        let (Some(current_dpi), Some(current_sens), Some(target_dpi)) = inputs else {
            self.conversion = Some(ConversionDisplay::Error(MISSING_MANUAL_TEXT.to_string()));
            return;
        };
        let result = convert::convert_sensitivity(current_dpi, current_sens, target_dpi);
        self.show_conversion(result, now);
    }

    fn show_conversion(&mut self, result: Result<f64, ConvertError>, now: Instant) {
        match result {
            Ok(value) => {
                self.conversion = Some(ConversionDisplay::Value {
                    value,
                    shown_at: now,
                });
            }
            Err(err) => {
                self.push_log(format!("[ERROR] Error converting sensitivity: {err}"));
                self.conversion = Some(ConversionDisplay::Error(CONVERT_ERROR_TEXT.to_string()));
            }
        }
    }

    pub fn submit_similar(&mut self) {
        let sens = convert::parse_positive(self.similar.sens.as_str());
        let dpi = convert::parse_positive(self.similar.dpi.as_str());
        let (Some(sens), Some(dpi)) = (sens, dpi) else {
            self.similar.view.show_error(MISSING_SIMILAR_TEXT);
            self.similar.scroll = 0;
            return;
        };
        let target = convert::edpi(sens, dpi);
        if !target.is_finite() {
            self.push_log(format!(
                "[ERROR] Error finding similar sensitivities: eDPI {target} out of range"
            ));
            self.similar.view.show_error(SIMILAR_ERROR_TEXT);
            self.similar.scroll = 0;
            return;
        }
        let similar = find_similar(&self.catalog, target, SIMILAR_LIMIT);
        self.engine
            .render_all(&similar, &mut self.similar.view, false);
        self.similar.scroll = 0;
        self.similar.target_edpi = Some(target);
    }

    pub fn pick_random(&mut self, rng: &mut impl Rng) {
        let count = self.browse.view.card_count();
        if count == 0 {
            self.push_log("[INFO] No players to pick from");
            return;
        }
        let idx = rng.gen_range(0..count);
        self.switch_tab(Tab::Search);
        self.browse.select(idx);
        if let Some(player) = self.browse.selected_player() {
            let msg = format!("[INFO] Random pro: {} ({})", player.name, player.team);
            self.push_log(msg);
        }
    }
}

fn move_list(list: &mut PlayerList, down: bool, page: bool) {
    match (down, page) {
        (true, false) => list.select_next(),
        (false, false) => list.select_prev(),
        (true, true) => list.page_down(),
        (false, true) => list.page_up(),
    }
}

#[derive(Debug, Clone)]
pub enum Delta {
    SetCatalog(Vec<Player>),
    CatalogFailed(String),
    Log(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderCommand {
    FetchCatalog,
}

pub fn apply_delta(state: &mut AppState, delta: Delta) {
    match delta {
        Delta::SetCatalog(players) => {
            state.catalog_loading = false;
            state.catalog = players;
            state.catalog_loaded_at = Some(Local::now());
            state.catalog_summary = summarize(&state.catalog);
            state.browse.refilter(&state.catalog, &mut state.engine);
            state.picker.refilter(&state.catalog, &mut state.engine);
            // Pro cards may have changed under an open conversion.
            state.selected_pro = None;
            let count = state.catalog.len();
            state.push_log(format!("[INFO] Catalog ready: {count} players"));
        }
        Delta::CatalogFailed(err) => {
            state.catalog_loading = false;
            state.push_log(format!("[ERROR] Error fetching players: {err}"));
            if state.catalog.is_empty() {
                state.browse.clear();
                state.browse.view.show_error(LOAD_ERROR_TEXT);
                state.picker.clear();
            } else {
                // A failed reload keeps the catalog that is already on screen.
                state.browse.refilter(&state.catalog, &mut state.engine);
                state.push_log("[WARN] Keeping previously loaded catalog");
            }
        }
        Delta::Log(msg) => state.push_log(msg),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tab_names_parse_loosely() {
        assert_eq!(Tab::from_name(" Convert "), Some(Tab::Convert));
        assert_eq!(Tab::from_name("browse"), Some(Tab::Search));
        assert_eq!(Tab::from_name("similar"), Some(Tab::Similar));
        assert_eq!(Tab::from_name("stats"), None);
    }

    #[test]
    fn player_key_tracks_every_identity_field() {
        let base = Player::new("TenZ", "Sentinels", 0.4, 800);
        assert_eq!(base.key(), Player::new("TenZ", "Sentinels", 0.4, 800).key());
        assert_ne!(base.key(), Player::new("TenZ", "Sentinels", 0.41, 800).key());
        assert_ne!(base.key(), Player::new("TenZ", "Cloud9", 0.4, 800).key());
        assert_ne!(base.key(), Player::new("TenZ", "Sentinels", 0.4, 1600).key());
    }

    #[test]
    fn selection_scrolls_card_into_view() {
        let catalog: Vec<Player> = (0..20)
            .map(|i| Player::new(format!("p{i}"), "T", 0.3, 800))
            .collect();
        let mut engine = RenderEngine::default();
        let mut list = PlayerList::new(ListKind::Browse, Duration::from_millis(300));
        list.refilter(&catalog, &mut engine);
        list.viewport_height = 9;

        for _ in 0..4 {
            list.select_next();
        }
        assert_eq!(list.selected, 4);
        assert_eq!(list.scroll, 6);

        list.page_up();
        assert_eq!(list.selected, 1);
        assert_eq!(list.scroll, 3);
    }
}
