use crate::domain::conversion::ConversionRequest;
use crate::domain::formatting::format_conversion;
use crate::domain::market_data::{Asset, AssetId, FiatCurrency, Selector};

/// Asset preselected as the converter's "from" side.
pub const DEFAULT_FROM_ASSET: &str = "bitcoin";

/// A user intent, dispatched from components to the owner of the state.
#[derive(Clone, Debug, PartialEq)]
pub enum ViewAction {
    Search(String),
    SetFrom(String),
    SetTo(String),
    SetAmount(String),
    ToggleCurrency,
    Swap,
}

/// Everything the user can change on the page. Mutated only through the
/// transition methods below.
#[derive(Clone, Debug, PartialEq)]
pub struct ViewState {
    pub search_term: String,
    pub from: Selector,
    pub to: Selector,
    pub amount_text: String,
    pub show_usd: bool,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            search_term: String::new(),
            from: Selector::Asset(AssetId::from(DEFAULT_FROM_ASSET)),
            to: Selector::Fiat(FiatCurrency::Local),
            amount_text: "1".to_string(),
            show_usd: false,
        }
    }
}

impl ViewState {
    pub fn apply(&mut self, action: ViewAction) {
        match action {
            ViewAction::Search(term) => self.set_search_term(&term),
            ViewAction::SetFrom(raw) => self.set_from_selector(&raw),
            ViewAction::SetTo(raw) => self.set_to_selector(&raw),
            ViewAction::SetAmount(text) => self.set_amount(&text),
            ViewAction::ToggleCurrency => self.toggle_currency(),
            ViewAction::Swap => self.swap(),
        }
    }

    pub fn set_search_term(&mut self, term: &str) {
        self.search_term = term.to_string();
    }

    /// Accepts a `<select>` value or an asset id from a clicked row.
    pub fn set_from_selector(&mut self, raw: &str) {
        self.from = Selector::parse(raw);
    }

    pub fn set_to_selector(&mut self, raw: &str) {
        self.to = Selector::parse(raw);
    }

    pub fn set_amount(&mut self, text: &str) {
        self.amount_text = text.to_string();
    }

    pub fn toggle_currency(&mut self) {
        self.show_usd = !self.show_usd;
    }

    pub fn swap(&mut self) {
        std::mem::swap(&mut self.from, &mut self.to);
    }

    pub fn display_currency(&self) -> FiatCurrency {
        FiatCurrency::from_usd_flag(self.show_usd)
    }

    pub fn conversion_request(&self) -> ConversionRequest {
        ConversionRequest::new(self.from.clone(), self.to.clone(), self.amount_text.clone())
    }

    /// Converter output, ready to render.
    pub fn converted(&self, assets: &[Asset]) -> String {
        format_conversion(self.conversion_request().evaluate(assets))
    }

    /// Rows matching the search term, paired with their 1-based rank in the
    /// unfiltered list.
    pub fn filtered<'a>(&self, assets: &'a [Asset]) -> Vec<(usize, &'a Asset)> {
        assets
            .iter()
            .enumerate()
            .filter(|(_, asset)| asset.matches_search(&self.search_term))
            .map(|(index, asset)| (index + 1, asset))
            .collect()
    }
}

/// Identity of a rendered list row. Covers every field the row displays, so
/// any change between polls renders the row again.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AssetRowKey {
    rank: usize,
    id: AssetId,
    name: String,
    symbol: String,
    image: String,
    is_new: bool,
    show_usd: bool,
    price_bits: [u64; 2],
    market_cap_bits: [u64; 2],
    change_bits: u64,
}

impl AssetRowKey {
    pub fn new(rank: usize, asset: &Asset, show_usd: bool) -> Self {
        Self {
            rank,
            id: asset.id.clone(),
            name: asset.name.clone(),
            symbol: asset.symbol.clone(),
            image: asset.image.clone(),
            is_new: asset.is_new,
            show_usd,
            price_bits: [asset.current_price.to_bits(), asset.current_price_usd.to_bits()],
            market_cap_bits: [asset.market_cap.to_bits(), asset.market_cap_usd.to_bits()],
            change_bits: asset.price_change_percentage_24h.to_bits(),
        }
    }
}
