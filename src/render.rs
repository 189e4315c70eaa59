use std::rc::Rc;

use crate::pagination::PaginationState;
use crate::render_cache::{FifoCache, RENDER_CACHE_CAPACITY};
use crate::state::{Player, PlayerKey};

pub const CARD_HEIGHT: usize = 3;
pub const EMPTY_LIST_TEXT: &str = "No players found";
pub const LOADING_TEXT: &str = "Loading players...";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CardKey {
    pub player: PlayerKey,
    pub clickable: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CardView {
    pub name: String,
    pub team: String,
    pub sens_line: String,
    pub dpi_line: String,
    /// Present only on clickable cards; activation hands this to conversion.
    pub payload: Option<Player>,
}

impl CardView {
    pub fn lines(&self) -> [String; CARD_HEIGHT] {
        [
            format!("{} · {}", self.name, self.team),
            self.sens_line.clone(),
            self.dpi_line.clone(),
        ]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ListNode {
    Loading,
    Empty,
    Error(String),
    Card(Rc<CardView>),
    Sentinel,
}

impl ListNode {
    pub fn height(&self) -> usize {
        match self {
            ListNode::Card(_) => CARD_HEIGHT,
            _ => 1,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListView {
    nodes: Vec<ListNode>,
}

impl ListView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn nodes(&self) -> &[ListNode] {
        &self.nodes
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
    }

    pub fn show_loading(&mut self) {
        self.nodes = vec![ListNode::Loading];
    }

    pub fn show_error(&mut self, message: impl Into<String>) {
        self.nodes = vec![ListNode::Error(message.into())];
    }

    pub fn cards(&self) -> impl Iterator<Item = &Rc<CardView>> {
        self.nodes.iter().filter_map(|node| match node {
            ListNode::Card(card) => Some(card),
            _ => None,
        })
    }

    pub fn card_count(&self) -> usize {
        self.cards().count()
    }

    pub fn card(&self, index: usize) -> Option<&Rc<CardView>> {
        self.cards().nth(index)
    }

    pub fn has_sentinel(&self) -> bool {
        matches!(self.nodes.last(), Some(ListNode::Sentinel))
    }

    pub fn total_rows(&self) -> usize {
        self.nodes.iter().map(ListNode::height).sum()
    }

    pub fn sentinel_row(&self) -> Option<usize> {
        if !self.has_sentinel() {
            return None;
        }
        Some(self.total_rows() - 1)
    }

    /// First row of the card at `index` (counting cards only).
    pub fn card_row(&self, index: usize) -> Option<usize> {
        let mut row = 0;
        let mut seen = 0;
        for node in &self.nodes {
            if let ListNode::Card(_) = node {
                if seen == index {
                    return Some(row);
                }
                seen += 1;
            }
            row += node.height();
        }
        None
    }

    fn remove_sentinel(&mut self) {
        if self.has_sentinel() {
            self.nodes.pop();
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    Replace,
    Append,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOutcome {
    pub rendered: usize,
    pub has_sentinel: bool,
}

#[derive(Debug)]
pub struct RenderEngine {
    cache: FifoCache<CardKey, Rc<CardView>>,
    hits: u64,
    misses: u64,
}

impl Default for RenderEngine {
    fn default() -> Self {
        Self::new(RENDER_CACHE_CAPACITY)
    }
}

impl RenderEngine {
    pub fn new(capacity: usize) -> Self {
        Self {
            cache: FifoCache::new(capacity),
            hits: 0,
            misses: 0,
        }
    }

    pub fn cached_cards(&self) -> usize {
        self.cache.len()
    }

    pub fn hit_ratio(&self) -> Option<f64> {
        let total = self.hits + self.misses;
        if total == 0 {
            return None;
        }
        Some(self.hits as f64 / total as f64)
    }

    pub fn card(&mut self, player: &Player, clickable: bool) -> Rc<CardView> {
        let key = CardKey {
            player: player.key(),
            clickable,
        };
        if self.cache.contains(&key) {
            self.hits += 1;
        } else {
            self.misses += 1;
        }
        let card = self
            .cache
            .get_or_insert_with(key, || Rc::new(build_card(player, clickable)));
        Rc::clone(card)
    }

    pub fn render_page(
        &mut self,
        players: &[Player],
        view: &mut ListView,
        pagination: &PaginationState,
        clickable: bool,
        mode: RenderMode,
    ) -> RenderOutcome {
        let window = pagination.window(players.len());

        match mode {
            RenderMode::Replace => {
                view.show_loading();
                if players.is_empty() {
                    view.nodes = vec![ListNode::Empty];
                    return RenderOutcome {
                        rendered: 0,
                        has_sentinel: false,
                    };
                }
            }
            RenderMode::Append => view.remove_sentinel(),
        }

        let fragment: Vec<ListNode> = players[window.clone()]
            .iter()
            .map(|player| ListNode::Card(self.card(player, clickable)))
            .collect();
        let rendered = fragment.len();

        match mode {
            RenderMode::Replace => view.nodes = fragment,
            RenderMode::Append => view.nodes.extend(fragment),
        }

        let has_sentinel = window.end < players.len();
        if has_sentinel {
            view.nodes.push(ListNode::Sentinel);
        }
        RenderOutcome {
            rendered,
            has_sentinel,
        }
    }

    pub fn render_all(&mut self, players: &[Player], view: &mut ListView, clickable: bool) {
        if players.is_empty() {
            view.nodes = vec![ListNode::Empty];
            return;
        }
        view.nodes = players
            .iter()
            .map(|player| ListNode::Card(self.card(player, clickable)))
            .collect();
    }
}

fn build_card(player: &Player, clickable: bool) -> CardView {
    CardView {
        name: player.name.clone(),
        team: player.team.clone(),
        sens_line: format!("Sens: {:.3}", player.sens),
        dpi_line: format!("DPI: {} | eDPI: {:.1}", player.dpi, player.edpi),
        payload: clickable.then(|| player.clone()),
    }
}
