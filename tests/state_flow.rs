use std::time::{Duration, Instant};

use rand::SeedableRng;
use rand::rngs::StdRng;

use prosens_terminal::catalog_fetch::parse_catalog_json;
use prosens_terminal::render::ListNode;
use prosens_terminal::state::{
    AppState, ConversionDisplay, Delta, Focus, LOAD_ERROR_TEXT, MISSING_MANUAL_TEXT,
    MISSING_PRO_DPI_TEXT, MISSING_SIMILAR_TEXT, Player, Tab, apply_delta,
};

fn fixture_catalog() -> Vec<Player> {
    parse_catalog_json(include_str!("fixtures/players.json")).expect("fixture should parse")
}

fn loaded_state() -> AppState {
    let mut state = AppState::default();
    assert!(state.begin_catalog_fetch());
    apply_delta(&mut state, Delta::SetCatalog(fixture_catalog()));
    state
}

fn type_into(state: &mut AppState, text: &str, now: Instant) {
    for c in text.chars() {
        state.input_char(c, now);
    }
}

#[test]
fn catalog_seeds_both_lists() {
    let state = loaded_state();
    assert!(!state.catalog_loading);
    assert!(state.catalog_loaded_at.is_some());
    assert_eq!(state.catalog.len(), 10);
    assert_eq!(state.browse.view.card_count(), 10);
    assert_eq!(state.picker.view.card_count(), 10);
    assert!(state.catalog_summary.is_some());
}

#[test]
fn failed_initial_fetch_shows_error_and_leaves_catalog_empty() {
    let mut state = AppState::default();
    assert!(state.begin_catalog_fetch());
    assert_eq!(state.browse.view.nodes(), &[ListNode::Loading]);

    let err = parse_catalog_json(r#"{"success":false,"error":"boom"}"#)
        .expect_err("success=false should fail");
    apply_delta(&mut state, Delta::CatalogFailed(format!("{err:#}")));
    assert!(!state.catalog_loading);
    assert!(state.catalog.is_empty());
    assert_eq!(
        state.browse.view.nodes(),
        &[ListNode::Error(LOAD_ERROR_TEXT.to_string())]
    );
    assert!(state.logs.iter().any(|line| line.contains("boom")));
}

#[test]
fn failed_reload_keeps_existing_catalog() {
    let mut state = loaded_state();
    assert!(state.begin_catalog_fetch());
    assert!(!state.begin_catalog_fetch());

    apply_delta(&mut state, Delta::CatalogFailed("timeout".to_string()));
    assert_eq!(state.catalog.len(), 10);
    assert_eq!(state.browse.view.card_count(), 10);
}

#[test]
fn exactly_one_panel_is_visible() {
    let mut state = AppState::default();
    for tab in Tab::ALL {
        state.switch_tab(tab);
        assert_eq!(state.visible_panels(), vec![tab]);
    }
}

#[test]
fn switching_tabs_moves_focus_to_the_panel() {
    let mut state = AppState::default();
    state.switch_tab(Tab::Similar);
    assert_eq!(state.focus, Focus::SimilarSens);
    state.cycle_focus(true);
    assert_eq!(state.focus, Focus::SimilarDpi);
    state.cycle_focus(true);
    assert_eq!(state.focus, Focus::SimilarSens);
    state.cycle_focus(false);
    assert_eq!(state.focus, Focus::SimilarDpi);
}

#[test]
fn search_runs_after_debounce() {
    let mut state = loaded_state();
    let t0 = Instant::now();
    type_into(&mut state, "fnatic", t0);

    state.tick(t0 + Duration::from_millis(100));
    assert_eq!(state.browse.view.card_count(), 10);

    state.tick(t0 + Duration::from_millis(300));
    assert_eq!(state.browse.view.card_count(), 3);
    assert_eq!(state.picker.view.card_count(), 10);
}

#[test]
fn each_keystroke_restarts_the_debounce() {
    let mut state = loaded_state();
    let t0 = Instant::now();
    state.input_char('f', t0);
    state.input_char('n', t0 + Duration::from_millis(200));

    state.tick(t0 + Duration::from_millis(350));
    assert_eq!(state.browse.view.card_count(), 10);
    state.tick(t0 + Duration::from_millis(500));
    assert_eq!(state.browse.view.card_count(), 3);
}

#[test]
fn picker_search_filters_independently() {
    let mut state = loaded_state();
    state.switch_tab(Tab::Convert);
    state.cycle_focus(true);
    assert_eq!(state.focus, Focus::ProSearch);

    let t0 = Instant::now();
    type_into(&mut state, "paper", t0);
    state.tick(t0 + Duration::from_millis(300));
    assert_eq!(state.picker.view.card_count(), 2);
    assert_eq!(state.browse.view.card_count(), 10);
}

#[test]
fn picking_a_pro_converts_to_visitor_dpi() {
    let mut state = loaded_state();
    state.switch_tab(Tab::Convert);
    let now = Instant::now();
    type_into(&mut state, "1600", now);

    state.activate_selected_pick(now);
    assert_eq!(state.selected_pro.as_ref().map(|p| p.name.as_str()), Some("TenZ"));
    let display = state.conversion.clone().expect("conversion shown");
    assert_eq!(display.text(), "0.200");
    assert!(!display.is_revealed(now));
    assert!(display.is_revealed(now + Duration::from_millis(300)));
}

#[test]
fn converting_without_dpi_asks_for_it() {
    let mut state = loaded_state();
    state.switch_tab(Tab::Convert);
    let now = Instant::now();
    state.activate_selected_pick(now);
    assert_eq!(
        state.conversion,
        Some(ConversionDisplay::Error(MISSING_PRO_DPI_TEXT.to_string()))
    );
}

#[test]
fn converting_without_a_pro_does_nothing() {
    let mut state = loaded_state();
    state.switch_tab(Tab::Convert);
    let now = Instant::now();
    type_into(&mut state, "800", now);
    state.submit(now);
    assert!(state.conversion.is_none());
}

#[test]
fn manual_conversion_uses_advanced_fields() {
    let mut state = loaded_state();
    state.switch_tab(Tab::Convert);
    assert_eq!(state.advanced_toggle_label(), "Show Manual DPI Conversion");
    state.toggle_advanced();
    assert_eq!(state.advanced_toggle_label(), "Hide Manual DPI Conversion");

    let now = Instant::now();
    type_into(&mut state, "800", now);
    state.cycle_focus(true);
    state.cycle_focus(true);
    assert_eq!(state.focus, Focus::YourSens);
    type_into(&mut state, "0.5", now);
    state.submit(now);
    assert_eq!(
        state.conversion,
        Some(ConversionDisplay::Error(MISSING_MANUAL_TEXT.to_string()))
    );

    state.cycle_focus(true);
    type_into(&mut state, "400", now);
    state.submit(now);
    assert_eq!(state.conversion.as_ref().map(|c| c.text()), Some("1.000".to_string()));
}

#[test]
fn closing_advanced_returns_focus_to_dpi() {
    let mut state = AppState::default();
    state.switch_tab(Tab::Convert);
    state.toggle_advanced();
    state.cycle_focus(false);
    assert_eq!(state.focus, Focus::ManualConvert);
    state.toggle_advanced();
    assert_eq!(state.focus, Focus::YourDpi);
}

#[test]
fn similar_lists_nearest_pros() {
    let mut state = loaded_state();
    state.switch_tab(Tab::Similar);
    let now = Instant::now();
    type_into(&mut state, "0.4", now);
    state.cycle_focus(true);
    type_into(&mut state, "800", now);
    state.submit(now);

    let names: Vec<String> = state
        .similar
        .view
        .cards()
        .take(3)
        .map(|card| card.name.clone())
        .collect();
    assert_eq!(names, vec!["TenZ", "aspas", "yay"]);
    assert_eq!(state.similar.view.card_count(), 10);
    assert!(
        state
            .similar
            .target_edpi
            .is_some_and(|target| (target - 320.0).abs() < 1e-9)
    );
}

#[test]
fn similar_requires_both_fields() {
    let mut state = loaded_state();
    state.switch_tab(Tab::Similar);
    let now = Instant::now();
    type_into(&mut state, "0.4", now);
    state.submit(now);
    assert_eq!(
        state.similar.view.nodes(),
        &[ListNode::Error(MISSING_SIMILAR_TEXT.to_string())]
    );
}

#[test]
fn similar_on_empty_catalog_shows_placeholder() {
    let mut state = AppState::default();
    state.switch_tab(Tab::Similar);
    let now = Instant::now();
    type_into(&mut state, "0.4", now);
    state.cycle_focus(true);
    type_into(&mut state, "800", now);
    state.submit(now);
    assert_eq!(state.similar.view.nodes(), &[ListNode::Empty]);
}

#[test]
fn random_pick_selects_a_browse_card() {
    let mut state = loaded_state();
    state.switch_tab(Tab::Convert);
    let mut rng = StdRng::seed_from_u64(11);
    state.pick_random(&mut rng);

    assert_eq!(state.tab, Tab::Search);
    assert!(state.browse.selected < 10);
    assert!(state.browse.selected_player().is_some());
}

#[test]
fn log_buffer_is_bounded() {
    let mut state = AppState::default();
    for i in 0..250 {
        state.push_log(format!("[INFO] line {i}"));
    }
    assert_eq!(state.logs.len(), 200);
    assert_eq!(state.logs.front().map(String::as_str), Some("[INFO] line 50"));
}
