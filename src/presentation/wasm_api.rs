//! WASM API для взаимодействия с JavaScript: форматтеры и монтирование Leptos приложения.

use std::cell::Cell;

use leptos::*;
use wasm_bindgen::prelude::*;

use crate::app::App;
use crate::config::DashboardConfig;
use crate::domain::errors::AppError;
use crate::domain::formatting;
use crate::domain::logging::{LogComponent, get_logger};

thread_local! {
    static MOUNTED: Cell<bool> = const { Cell::new(false) };
}

#[wasm_bindgen(js_name = formatPrice)]
pub fn format_price(value: f64, is_usd: bool) -> String {
    formatting::format_price(value, is_usd)
}

#[wasm_bindgen(js_name = formatMarketCap)]
pub fn format_market_cap(value: f64, is_usd: bool) -> String {
    formatting::format_market_cap(value, is_usd)
}

/// 🚀 Смонтировать дашборд в `<body>`. Без `config_json` берутся значения по
/// умолчанию. Невалидный конфиг и повторный монтаж отклоняются.
#[wasm_bindgen(js_name = mountDashboard)]
pub fn mount_dashboard(config_json: Option<String>) -> Result<(), JsValue> {
    DashboardConfig::from_optional_json(config_json.as_deref())
        .map_err(AppError::from)
        .and_then(mount)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

pub(crate) fn mount(config: DashboardConfig) -> Result<(), AppError> {
    claim_mount()?;

    get_logger().info(
        LogComponent::Presentation("WasmApi"),
        &format!(
            "🚀 Mounting dashboard: {:?}, {} assets, refresh every {}s",
            config.fetch_mode, config.per_page, config.refresh_interval_secs
        ),
    );
    mount_to_body(move || view! { <App config=config /> });
    Ok(())
}

/// Один дашборд на страницу
fn claim_mount() -> Result<(), AppError> {
    if MOUNTED.with(|mounted| mounted.replace(true)) {
        return Err(AppError::AlreadyMounted);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_mount_is_rejected() {
        assert_eq!(claim_mount(), Ok(()));
        assert_eq!(claim_mount(), Err(AppError::AlreadyMounted));
    }
}
