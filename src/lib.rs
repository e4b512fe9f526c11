use wasm_bindgen::prelude::*;

use crate::config::{CONFIG_ELEMENT_ID, DashboardConfig};
use crate::domain::logging::{LogComponent, get_logger};

pub mod app;
pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod presentation;
pub mod time_utils;
pub mod view_state;

/// 🦀 Инициализация: логгер, часы и автомонтаж, если на странице есть элемент
/// конфига. Иначе страница сама вызывает `mountDashboard`.
#[wasm_bindgen(start)]
pub fn initialize() {
    console_error_panic_hook::set_once();

    let console_logger = if cfg!(debug_assertions) {
        infrastructure::services::ConsoleLogger::new_development()
    } else {
        infrastructure::services::ConsoleLogger::new_production()
    };
    domain::logging::init_logger(Box::new(console_logger));
    domain::logging::init_time_provider(Box::new(infrastructure::services::BrowserTimeProvider::new()));

    get_logger().info(LogComponent::Presentation("Initialize"), "🚀 Crypto tracker initialized");

    let Some(raw) = read_config_element() else {
        get_logger().debug(
            LogComponent::Presentation("Initialize"),
            &format!("No #{CONFIG_ELEMENT_ID} element, waiting for mountDashboard()"),
        );
        return;
    };

    if let Err(e) = presentation::wasm_api::mount(DashboardConfig::resolve(Some(&raw))) {
        get_logger().error(LogComponent::Presentation("Initialize"), &format!("❌ {e}"));
    }
}

/// Текст `<script id="dashboard-config" type="application/json">`, если он есть
fn read_config_element() -> Option<String> {
    let document = web_sys::window()?.document()?;
    let element = document.get_element_by_id(CONFIG_ELEMENT_ID)?;
    Some(element.text_content().unwrap_or_default())
}
