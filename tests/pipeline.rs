// ============================================================================
// Tests d'intégration : App + Dispatcher avec une source de données factice
// ============================================================================
// Les fetchs passent par de vraies tâches tokio ; l'horloge est en pause,
// les délais simulés avancent donc instantanément et dans l'ordre.
// ============================================================================

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc::UnboundedReceiver;

use cryptotracker::api::{FetchError, FetchResult, MarketDataSource};
use cryptotracker::app::App;
use cryptotracker::chart_loader::CHART_ERROR_MESSAGE;
use cryptotracker::config::AppConfig;
use cryptotracker::models::{Coin, CoinSummary, PriceHistory, PricePoint, Trend};
use cryptotracker::refresh::{RefreshTimer, FETCH_ERROR_MESSAGE};
use cryptotracker::worker::{AppMessage, Dispatcher};

// ============================================================================
// Source factice
// ============================================================================

#[derive(Default)]
struct FakeSource {
    coins: Vec<Coin>,
    fail_coins: AtomicBool,
    fail_history: AtomicBool,
    /// Délai de réponse de la liste
    coins_delay: Option<Duration>,
    /// Délai de réponse par fenêtre (jours)
    history_delays: HashMap<u32, Duration>,
    top_calls: Mutex<Vec<u32>>,
    history_calls: Mutex<Vec<(String, u32)>>,
}

impl FakeSource {
    fn with_coins(coins: Vec<Coin>) -> Self {
        Self {
            coins,
            ..Default::default()
        }
    }

    fn top_calls(&self) -> Vec<u32> {
        self.top_calls.lock().unwrap().clone()
    }

    fn history_calls(&self) -> Vec<(String, u32)> {
        self.history_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl MarketDataSource for FakeSource {
    async fn fetch_top_coins(&self, limit: u32) -> FetchResult<Vec<Coin>> {
        self.top_calls.lock().unwrap().push(limit);
        if let Some(delay) = self.coins_delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_coins.load(Ordering::SeqCst) {
            return Err(FetchError::Upstream { status: 429 });
        }
        Ok(self.coins.iter().take(limit as usize).cloned().collect())
    }

    async fn fetch_price_history(&self, coin_id: &str, days: u32) -> FetchResult<PriceHistory> {
        self.history_calls.lock().unwrap().push((coin_id.to_string(), days));
        if let Some(delay) = self.history_delays.get(&days) {
            tokio::time::sleep(*delay).await;
        }
        if self.fail_history.load(Ordering::SeqCst) {
            return Err(FetchError::Upstream { status: 500 });
        }

        // Le prix encode la fenêtre pour pouvoir vérifier quelle réponse a gagné
        Ok(PriceHistory {
            prices: (0..3)
                .map(|i| PricePoint(1_704_110_400_000.0 + i as f64 * 86_400_000.0, days as f64 * 100.0 + i as f64))
                .collect(),
        })
    }

    async fn search_coins(&self, _query: &str) -> FetchResult<Vec<CoinSummary>> {
        Ok(Vec::new())
    }
}

fn coin_a() -> Coin {
    Coin::new("a", "Alpha", "aaa", 10.0, 5.0, 1.0e9)
}

fn coin_b() -> Coin {
    Coin::new("b", "Beta", "bbb", 2.0, -3.0, 5.0e8)
}

fn config(coin_limit: u32) -> AppConfig {
    AppConfig {
        coin_limit,
        ..AppConfig::default()
    }
}

fn setup(source: FakeSource, coin_limit: u32) -> (App, UnboundedReceiver<AppMessage>, Arc<FakeSource>) {
    let source = Arc::new(source);
    let (dispatcher, rx) = Dispatcher::channel(source.clone());
    let app = App::new(&config(coin_limit), dispatcher, None);
    (app, rx, source)
}

async fn next_message(rx: &mut UnboundedReceiver<AppMessage>) -> AppMessage {
    tokio::time::timeout(Duration::from_secs(600), rx.recv())
        .await
        .expect("no message before timeout")
        .expect("channel closed")
}

/// Un fetch de liste complet : demande, réponse, application
async fn refresh_once(app: &mut App, rx: &mut UnboundedReceiver<AppMessage>) {
    app.request_refresh();
    let message = next_message(rx).await;
    app.handle_message(message);
}

// ============================================================================
// Liste et filtre
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_top_coins_listed_with_formatted_changes() {
    let (mut app, mut rx, source) = setup(FakeSource::with_coins(vec![coin_a(), coin_b()]), 2);

    refresh_once(&mut app, &mut rx).await;

    assert_eq!(source.top_calls(), vec![2]);
    assert!(!app.refresh.is_loading());

    let coins = app.filtered_coins();
    let ids: Vec<_> = coins.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b"]);
    assert_eq!(coins[0].display_change(), "+5.00%");
    assert_eq!(coins[1].display_change(), "-3.00%");
    assert_eq!(Trend::of(&coins[0]), Trend::Positive);
    assert_eq!(Trend::of(&coins[1]), Trend::Negative);
}

#[tokio::test(start_paused = true)]
async fn test_failed_refresh_keeps_previous_list() {
    let (mut app, mut rx, source) = setup(FakeSource::with_coins(vec![coin_a(), coin_b()]), 20);

    refresh_once(&mut app, &mut rx).await;
    assert_eq!(app.refresh.coins().len(), 2);

    source.fail_coins.store(true, Ordering::SeqCst);
    refresh_once(&mut app, &mut rx).await;

    assert_eq!(app.refresh.coins().len(), 2);
    assert_eq!(app.refresh.last_error(), Some(FETCH_ERROR_MESSAGE));
    assert!(!app.refresh.is_loading());

    // Le prochain succès efface l'erreur
    source.fail_coins.store(false, Ordering::SeqCst);
    refresh_once(&mut app, &mut rx).await;
    assert_eq!(app.refresh.last_error(), None);
}

#[tokio::test(start_paused = true)]
async fn test_filter_then_select_under_cursor() {
    let (mut app, mut rx, source) = setup(FakeSource::with_coins(vec![coin_a(), coin_b()]), 20);
    refresh_once(&mut app, &mut rx).await;

    app.start_search();
    for c in "BB".chars() {
        app.append_char(c);
    }
    app.submit_search();
    assert_eq!(app.filtered_coins().len(), 1);

    app.select_under_cursor();
    let message = next_message(&mut rx).await;
    app.handle_message(message);

    assert_eq!(source.history_calls(), vec![("b".to_string(), 7)]);
    assert_eq!(app.chart.selected().map(|c| c.id.as_str()), Some("b"));
    assert_eq!(app.chart.visible_series().map(|s| s.trend), Some(Trend::Negative));
}

// ============================================================================
// Graphique
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_select_then_change_lookback_fetches_once_each() {
    let (mut app, mut rx, source) = setup(FakeSource::with_coins(vec![coin_a(), coin_b()]), 20);

    app.select_coin(coin_a());
    let message = next_message(&mut rx).await;
    app.handle_message(message);

    let series = app.chart.visible_series().expect("series after first fetch");
    assert_eq!(series.lookback_days, 7);
    assert_eq!(series.label, "Alpha Price (USD)");
    assert_eq!(series.title, "Alpha Price Chart (7 days)");

    app.set_lookback(30);
    assert!(app.chart.is_loading());
    let message = next_message(&mut rx).await;
    app.handle_message(message);

    assert_eq!(
        source.history_calls(),
        vec![("a".to_string(), 7), ("a".to_string(), 30)]
    );
    assert_eq!(app.chart.visible_series().map(|s| s.lookback_days), Some(30));
}

#[tokio::test(start_paused = true)]
async fn test_superseded_history_response_is_ignored() {
    // La réponse 7 jours arrive APRÈS la réponse 30 jours
    let mut source = FakeSource::with_coins(vec![coin_a()]);
    source.history_delays.insert(7, Duration::from_millis(500));
    source.history_delays.insert(30, Duration::from_millis(100));
    let (mut app, mut rx, _source) = setup(source, 20);

    app.select_coin(coin_a());
    app.set_lookback(30);

    let first = next_message(&mut rx).await;
    app.handle_message(first);
    assert_eq!(app.chart.visible_series().map(|s| s.values[0]), Some(3000.0));

    let second = next_message(&mut rx).await;
    app.handle_message(second);

    // Toujours la série 30 jours
    let series = app.chart.visible_series().expect("series kept");
    assert_eq!(series.lookback_days, 30);
    assert_eq!(series.values[0], 3000.0);
}

#[tokio::test(start_paused = true)]
async fn test_history_failure_clears_chart() {
    let (mut app, mut rx, source) = setup(FakeSource::with_coins(vec![coin_a()]), 20);

    app.select_coin(coin_a());
    let message = next_message(&mut rx).await;
    app.handle_message(message);
    assert!(app.chart.series().is_some());

    source.fail_history.store(true, Ordering::SeqCst);
    app.set_lookback(90);
    let message = next_message(&mut rx).await;
    app.handle_message(message);

    assert!(app.chart.series().is_none());
    assert_eq!(app.chart.error(), Some(CHART_ERROR_MESSAGE));
    assert!(!app.chart.is_loading());
    // La sélection reste
    assert_eq!(app.chart.selected().map(|c| c.id.as_str()), Some("a"));
}

// ============================================================================
// Timer
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_timer_drives_refreshes_until_dropped() {
    let (mut app, mut rx, source) = setup(FakeSource::with_coins(vec![coin_a(), coin_b()]), 20);
    let timer = RefreshTimer::start(Duration::from_secs(60), app.message_sender());

    // t = 0, 60, 120 : trois ticks, chacun suivi de sa réponse
    let mut ticks = 0;
    while ticks < 3 {
        let message = next_message(&mut rx).await;
        if matches!(message, AppMessage::RefreshTick) {
            ticks += 1;
        }
        app.handle_message(message);
    }
    let message = next_message(&mut rx).await;
    assert!(matches!(message, AppMessage::CoinsLoaded { .. }));
    app.handle_message(message);

    drop(timer);
    assert_eq!(source.top_calls().len(), 3);
    assert_eq!(app.refresh.coins().len(), 2);

    // Plus aucun tick après l'arrêt
    let late = tokio::time::timeout(Duration::from_secs(300), rx.recv()).await;
    assert!(late.is_err());
    assert_eq!(source.top_calls().len(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_source_slower_than_timer_still_loads() {
    // Chaque réponse arrive 30s après le tick suivant
    let mut source = FakeSource::with_coins(vec![coin_a(), coin_b()]);
    source.coins_delay = Some(Duration::from_secs(90));
    let (mut app, mut rx, _source) = setup(source, 20);
    let _timer = RefreshTimer::start(Duration::from_secs(60), app.message_sender());

    let mut loaded = 0;
    for _ in 0..10 {
        let message = next_message(&mut rx).await;
        let is_response = matches!(message, AppMessage::CoinsLoaded { .. });
        app.handle_message(message);
        if is_response {
            loaded += 1;
            assert_eq!(app.refresh.coins().len(), 2);
        }
    }

    assert!(loaded >= 3);
    assert!(app.refresh.last_error().is_none());
}
