use leptos::*;
use std::rc::Rc;
use strum::IntoEnumIterator;

use crate::{
    application::{DashboardCoordinator, FetchMarketsUseCase},
    config::DashboardConfig,
    domain::{
        formatting::{format_change_percent, format_market_cap, format_price, format_usd_hint},
        logging::{LogComponent, get_logger, get_time_provider},
        market_data::{Asset, FiatCurrency, Selector, top_by_market_cap},
        polling::RefreshTrigger,
        state::PollSnapshot,
    },
    infrastructure::CoinGeckoClient,
    time_utils::{format_age, format_last_updated},
    view_state::{AssetRowKey, ViewAction, ViewState},
};

/// Количество карточек капитализации над списком
const TOP_CARDS: usize = 4;

const PLACEHOLDER_ICON: &str = "https://via.placeholder.com/32?text=%3F";

/// Список URL иконок по порядку; при ошибке `<img>` берём следующий
pub fn icon_fallbacks(symbol: &str, primary: &str) -> Vec<String> {
    let symbol = symbol.to_lowercase();
    let mut urls = Vec::with_capacity(5);
    if !primary.is_empty() {
        urls.push(primary.to_string());
    }
    urls.push(format!("https://assets.coincap.io/assets/icons/{symbol}@2x.png"));
    urls.push(format!("https://cdn.jsdelivr.net/gh/atomiclabs/cryptocurrency-icons@1a63530be6e374711a8554f31b17e4cb92c25fa5/svg/color/{symbol}.svg"));
    urls.push(format!(
        "https://raw.githubusercontent.com/ErikThiart/cryptocurrency-icons/master/16/{symbol}.png"
    ));
    urls.push(PLACEHOLDER_ICON.to_string());
    urls
}

/// Какая страница на экране. Мемоизируется, чтобы обновление данных
/// не пересоздавало дерево дашборда.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Page {
    Loading,
    Error,
    Dashboard,
}

impl Page {
    fn for_snapshot(snapshot: &PollSnapshot) -> Self {
        if snapshot.shows_initial_loader() {
            Self::Loading
        } else if snapshot.shows_error_page() {
            Self::Error
        } else {
            Self::Dashboard
        }
    }
}

fn change_class(value: f64) -> &'static str {
    if value >= 0.0 { "change up" } else { "change down" }
}

/// 🦀 Главный компонент дашборда. Владеет состоянием вида и снапшотом опроса;
/// дочерние компоненты получают сигналы только для чтения и шлют [`ViewAction`].
#[component]
pub fn App(config: DashboardConfig) -> impl IntoView {
    let view_state = create_rw_signal(ViewState::default());
    let snapshot = create_rw_signal(PollSnapshot::default());

    let client = CoinGeckoClient::new(&config.api_base_url);
    let use_case = FetchMarketsUseCase::new(client, config.fetch_settings());
    let coordinator =
        DashboardCoordinator::new(use_case, config.poll_settings(), Box::new(move |next: PollSnapshot| snapshot.set(next)));
    coordinator.start();

    {
        let coordinator = Rc::clone(&coordinator);
        on_cleanup(move || coordinator.stop());
    }

    let on_action = Callback::new(move |action: ViewAction| {
        get_logger().trace(LogComponent::Presentation("App"), &format!("{action:?}"));
        view_state.update(|state| state.apply(action));
    });

    let on_refresh = Callback::new(move |_: ()| {
        coordinator.spawn_refresh(RefreshTrigger::Manual);
    });

    let state: Signal<ViewState> = view_state.into();
    let snap: Signal<PollSnapshot> = snapshot.into();
    let page = create_memo(move |_| snapshot.with(Page::for_snapshot));

    view! {
        <style>{DASHBOARD_CSS}</style>
        <div class="crypto-dashboard">
            <Header state=state snapshot=snap on_action=on_action on_refresh=on_refresh />
            {move || match page.get() {
                Page::Loading => view! { <div class="loader">"⏳ Loading market data..."</div> }.into_view(),
                Page::Error => view! { <ErrorPage snapshot=snap on_refresh=on_refresh /> }.into_view(),
                Page::Dashboard => {
                    view! {
                        <StaleBanner snapshot=snap on_refresh=on_refresh />
                        <TopMarketCaps state=state snapshot=snap />
                        <div class="panels">
                            <AssetList state=state snapshot=snap on_action=on_action />
                            <Converter state=state snapshot=snap on_action=on_action />
                        </div>
                    }
                    .into_view()
                }
            }}
        </div>
    }
}

#[component]
fn Header(
    state: Signal<ViewState>,
    snapshot: Signal<PollSnapshot>,
    on_action: Callback<ViewAction>,
    on_refresh: Callback<()>,
) -> impl IntoView {
    let last_updated = move || {
        snapshot.with(|s| s.last_updated_ms.map(format_last_updated)).unwrap_or_else(|| "never".to_string())
    };
    let age = move || {
        snapshot
            .with(|s| s.last_updated_ms)
            .map(|ts| format_age(ts, get_time_provider().current_timestamp()))
            .unwrap_or_default()
    };

    view! {
        <div class="header">
            <h1>"📈 Crypto Market Tracker"</h1>
            <div class="header-controls">
                <span class="last-updated" title=age>"Last updated: " {last_updated}</span>
                <Show when=move || snapshot.with(PollSnapshot::shows_refresh_indicator)>
                    <span class="refreshing">"🔄"</span>
                </Show>
                <button class="btn" on:click=move |_| on_refresh.call(())>"Refresh"</button>
                <button class="btn" on:click=move |_| on_action.call(ViewAction::ToggleCurrency)>
                    {move || {
                        let other = if state.with(|s| s.show_usd) { FiatCurrency::Local } else { FiatCurrency::Usd };
                        format!("Show {}", other.to_string().to_uppercase())
                    }}
                </button>
            </div>
        </div>
    }
}

#[component]
fn ErrorPage(snapshot: Signal<PollSnapshot>, on_refresh: Callback<()>) -> impl IntoView {
    let message = move || {
        snapshot
            .with(|s| s.last_error.as_ref().map(ToString::to_string))
            .unwrap_or_else(|| "unknown error".to_string())
    };

    view! {
        <div class="error-page">
            <h2>"❌ Could not load market data"</h2>
            <p>{message}</p>
            <button class="btn" on:click=move |_| on_refresh.call(())>"Try again"</button>
        </div>
    }
}

/// ⚠️ Плашка: обновление упало, но старые данные ещё на экране
#[component]
fn StaleBanner(snapshot: Signal<PollSnapshot>, on_refresh: Callback<()>) -> impl IntoView {
    view! {
        <Show when=move || snapshot.with(|s| s.last_error.is_some())>
            <div class="stale-banner">
                "⚠️ Refresh failed, showing the last loaded prices. "
                <button class="btn small" on:click=move |_| on_refresh.call(())>"Try again"</button>
            </div>
        </Show>
    }
}

#[component]
fn TopMarketCaps(state: Signal<ViewState>, snapshot: Signal<PollSnapshot>) -> impl IntoView {
    let cards = move || {
        let currency = state.with(ViewState::display_currency);
        snapshot.with(|s| {
            top_by_market_cap(&s.assets, TOP_CARDS)
                .into_iter()
                .map(|asset| {
                    let is_usd = currency == FiatCurrency::Usd;
                    view! {
                        <div class="cap-card">
                            <div class="cap-name">{asset.name.clone()}</div>
                            <div class="cap-value">{format_market_cap(asset.market_cap_in(currency), is_usd)}</div>
                            <div class={change_class(asset.market_cap_change_percentage_24h)}>
                                {format_change_percent(asset.market_cap_change_percentage_24h)}
                            </div>
                        </div>
                    }
                })
                .collect_view()
        })
    };

    view! { <div class="top-caps">{cards}</div> }
}

#[component]
fn AssetIcon(symbol: String, primary: String) -> impl IntoView {
    let urls = icon_fallbacks(&symbol, &primary);
    let last = urls.len() - 1;
    let index = create_rw_signal(0usize);
    let src = move || urls[index.get().min(last)].clone();

    view! {
        <img
            class="asset-icon"
            src=src
            alt=symbol
            on:error=move |_| index.update(|i| if *i < last { *i += 1 })
        />
    }
}

#[component]
fn AssetList(
    state: Signal<ViewState>,
    snapshot: Signal<PollSnapshot>,
    on_action: Callback<ViewAction>,
) -> impl IntoView {
    let rows = move || {
        let view_state = state.get();
        snapshot.with(|s| {
            view_state
                .filtered(&s.assets)
                .into_iter()
                .map(|(rank, asset)| (rank, asset.clone(), view_state.show_usd))
                .collect::<Vec<(usize, Asset, bool)>>()
        })
    };

    view! {
        <div class="asset-list">
            <input
                class="search"
                type="text"
                placeholder="Search by name or symbol"
                prop:value=move || state.with(|s| s.search_term.clone())
                on:input=move |ev| on_action.call(ViewAction::Search(event_target_value(&ev)))
            />
            <table>
                <thead>
                    <tr>
                        <th>"#"</th>
                        <th>"Name"</th>
                        <th>"Price"</th>
                        <th>"24h"</th>
                        <th>"Market cap"</th>
                    </tr>
                </thead>
                <tbody>
                    <For
                        each=rows
                        key=|(rank, asset, is_usd)| AssetRowKey::new(*rank, asset, *is_usd)
                        children=move |(rank, asset, is_usd)| {
                            let id = asset.id.value().to_string();
                            let is_new = asset.is_new;
                            let currency = FiatCurrency::from_usd_flag(is_usd);
                            let price = format_price(asset.price_in(currency), is_usd);
                            let hint = if is_usd { None } else { format_usd_hint(asset.current_price_usd) };
                            view! {
                                <tr class="asset-row" on:click=move |_| on_action.call(ViewAction::SetFrom(id.clone()))>
                                    <td>{rank}</td>
                                    <td class="name">
                                        <AssetIcon symbol=asset.symbol.clone() primary=asset.image.clone() />
                                        {asset.name.clone()}
                                        " "
                                        <span class="symbol">{asset.symbol.to_uppercase()}</span>
                                        <Show when=move || is_new>
                                            <span class="badge-new">"NEW"</span>
                                        </Show>
                                    </td>
                                    <td>
                                        {price}
                                        {hint.map(|h| view! { <div class="usd-hint">{h}</div> })}
                                    </td>
                                    <td class={change_class(asset.price_change_percentage_24h)}>
                                        {format_change_percent(asset.price_change_percentage_24h)}
                                    </td>
                                    <td>{format_market_cap(asset.market_cap_in(currency), is_usd)}</td>
                                </tr>
                            }
                        }
                    />
                </tbody>
            </table>
        </div>
    }
}

/// `<option>` для обеих фиатных валют, затем все активы списка
fn selector_options(assets: &[Asset]) -> Vec<(String, String)> {
    FiatCurrency::iter()
        .map(|fiat| (Selector::Fiat(fiat).key(), fiat.label().to_string()))
        .chain(assets.iter().map(|asset| {
            (asset.id.value().to_string(), format!("{} ({})", asset.name, asset.symbol.to_uppercase()))
        }))
        .collect()
}

#[component]
fn SelectorPicker(
    selected: Signal<String>,
    snapshot: Signal<PollSnapshot>,
    on_pick: Callback<String>,
) -> impl IntoView {
    let options = move || {
        let current = selected.get();
        snapshot.with(|s| {
            selector_options(&s.assets)
                .into_iter()
                .map(|(key, label)| {
                    let is_selected = key == current;
                    view! { <option value=key selected=is_selected>{label}</option> }
                })
                .collect_view()
        })
    };

    view! {
        <select on:change=move |ev| on_pick.call(event_target_value(&ev))>
            {options}
        </select>
    }
}

#[component]
fn Converter(
    state: Signal<ViewState>,
    snapshot: Signal<PollSnapshot>,
    on_action: Callback<ViewAction>,
) -> impl IntoView {
    let from = Signal::derive(move || state.with(|s| s.from.key()));
    let to = Signal::derive(move || state.with(|s| s.to.key()));
    let output = move || {
        let view_state = state.get();
        snapshot.with(|s| view_state.converted(&s.assets))
    };

    view! {
        <div class="converter">
            <h2>"Converter"</h2>
            <input
                type="text"
                inputmode="decimal"
                prop:value=move || state.with(|s| s.amount_text.clone())
                on:input=move |ev| on_action.call(ViewAction::SetAmount(event_target_value(&ev)))
            />
            <SelectorPicker
                selected=from
                snapshot=snapshot
                on_pick=Callback::new(move |raw: String| on_action.call(ViewAction::SetFrom(raw)))
            />
            <button class="btn swap" on:click=move |_| on_action.call(ViewAction::Swap)>"⇅"</button>
            <SelectorPicker
                selected=to
                snapshot=snapshot
                on_pick=Callback::new(move |raw: String| on_action.call(ViewAction::SetTo(raw)))
            />
            <div class="converter-output">{output}</div>
        </div>
    }
}

const DASHBOARD_CSS: &str = r#"
.crypto-dashboard {
    font-family: 'SF Pro Display', -apple-system, BlinkMacSystemFont, sans-serif;
    background: linear-gradient(135deg, #1e3c72 0%, #2a5298 100%);
    min-height: 100vh;
    padding: 20px;
    color: white;
}
.header {
    display: flex;
    justify-content: space-between;
    align-items: center;
    background: rgba(255, 255, 255, 0.1);
    backdrop-filter: blur(10px);
    padding: 15px 20px;
    border-radius: 15px;
    border: 1px solid rgba(255, 255, 255, 0.2);
    margin-bottom: 20px;
}
.header-controls { display: flex; gap: 10px; align-items: center; }
.last-updated { font-size: 12px; color: #a0a0a0; }
.btn {
    background: #4a5d73;
    color: white;
    border: none;
    padding: 6px 12px;
    border-radius: 5px;
    cursor: pointer;
}
.btn:hover { background: #5a6d83; }
.btn.small { padding: 2px 8px; font-size: 12px; }
.loader, .error-page { text-align: center; padding: 80px 0; }
.stale-banner {
    background: rgba(102, 0, 0, 0.6);
    padding: 8px 12px;
    border-radius: 8px;
    margin-bottom: 15px;
}
.top-caps { display: grid; grid-template-columns: repeat(4, 1fr); gap: 15px; margin-bottom: 20px; }
.cap-card { background: rgba(0, 0, 0, 0.3); border-radius: 10px; padding: 12px; }
.cap-value { font-size: 20px; font-weight: 700; font-family: 'Courier New', monospace; }
.panels { display: grid; grid-template-columns: 2fr 1fr; gap: 20px; }
.search { width: 100%; padding: 8px; margin-bottom: 10px; border-radius: 6px; border: none; }
table { width: 100%; border-collapse: collapse; }
th, td { padding: 6px 8px; text-align: left; }
.asset-row { cursor: pointer; }
.asset-row:hover { background: rgba(255, 255, 255, 0.1); }
.asset-icon { width: 20px; height: 20px; vertical-align: middle; margin-right: 6px; }
.symbol { color: #a0a0a0; font-size: 12px; }
.usd-hint { color: #a0a0a0; font-size: 11px; }
.badge-new { background: #f39c12; border-radius: 4px; padding: 0 4px; margin-left: 6px; font-size: 10px; }
.change.up { color: #72c685; }
.change.down { color: #e74c3c; }
.converter { background: rgba(0, 0, 0, 0.3); border-radius: 10px; padding: 15px; display: flex; flex-direction: column; gap: 10px; }
.converter-output { font-family: 'Courier New', monospace; font-size: 18px; }
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::market_data::MarketQuote;

    #[test]
    fn icon_chain_starts_with_primary_and_ends_with_placeholder() {
        let urls = icon_fallbacks("BTC", "https://img/btc.png");
        assert_eq!(urls.len(), 5);
        assert_eq!(urls[0], "https://img/btc.png");
        assert_eq!(urls[1], "https://assets.coincap.io/assets/icons/btc@2x.png");
        assert!(urls[2].ends_with("/svg/color/btc.svg"));
        assert!(urls[3].ends_with("/16/btc.png"));
        assert_eq!(urls[4], PLACEHOLDER_ICON);
    }

    #[test]
    fn icon_chain_skips_missing_primary() {
        let urls = icon_fallbacks("eth", "");
        assert_eq!(urls.len(), 4);
        assert!(urls[0].contains("coincap"));
    }

    #[test]
    fn options_list_fiat_first() {
        let assets = vec![Asset::from_quotes(&MarketQuote::new("bitcoin", 1.0, 1.0), None)];
        let options = selector_options(&assets);
        assert_eq!(options[0].0, "inr");
        assert_eq!(options[1].0, "usd");
        assert_eq!(options[2], ("bitcoin".to_string(), "bitcoin (BIT)".to_string()));
    }
}
