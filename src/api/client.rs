use crate::api::ApiConfig;
use crate::fetch::{FetchError, OrderFetcher};
use crate::model::{Location, MenuDetails, MenuId, Order, OrderId, OrderRecord};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::{debug, instrument, warn};
use url::Url;

/// Fetches order snapshots from the delivery service over HTTP.
///
/// Menu details are cached per menu id and lookup position for the lifetime
/// of the fetcher, so polling one order costs a single `GET /order/{oid}` per
/// tick after the first.
pub struct HttpOrderFetcher {
    client: Client,
    base_url: Url,
    session_id: String,
    menus: Mutex<HashMap<MenuKey, MenuDetails>>,
}

/// The service derives `deliveryTime` from the position a menu is looked up
/// from, so the same menu seen from two places is two cache entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct MenuKey {
    menu_id: MenuId,
    /// `(lat, lng)` bit patterns.
    near: Option<(u64, u64)>,
}

impl MenuKey {
    fn new(menu_id: MenuId, near: Option<Location>) -> Self {
        Self {
            menu_id,
            near: near.map(|location| (location.lat.to_bits(), location.lng.to_bits())),
        }
    }
}

impl HttpOrderFetcher {
    pub fn new(config: ApiConfig) -> Result<Self, FetchError> {
        let base_url = config.base_url.parse::<Url>().map_err(|parse_error| {
            FetchError::InvalidRequest(format!("base url {}: {parse_error}", config.base_url))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(FetchError::InvalidRequest(format!(
                "base url {} cannot carry a path",
                config.base_url
            )));
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|reqwest_error| FetchError::InvalidRequest(reqwest_error.to_string()))?;

        Ok(Self {
            client,
            base_url,
            session_id: config.session_id,
            menus: Mutex::new(HashMap::new()),
        })
    }

    /// `GET /order/{oid}` combined with the menu's delivery duration.
    #[instrument(skip_all, fields(order_id = %order_id))]
    pub async fn order(&self, order_id: OrderId) -> Result<Order, FetchError> {
        let url = self.endpoint(&["order", &order_id.to_string()], &[])?;
        let record: OrderRecord = self.get_json(url).await?;
        debug!(status = %record.status, menu_id = %record.mid, "Order received");

        let menu = self.menu(record.mid, record.delivery_location).await?;
        Ok(record.into_order(menu.delivery_time))
    }

    /// `GET /menu/{mid}`, served from the cache after the first success.
    ///
    /// `near` is forwarded as `lat`/`lng`, the way the service expects menus
    /// to be looked up from a position.
    #[instrument(skip_all, fields(menu_id = %menu_id))]
    pub async fn menu(
        &self,
        menu_id: MenuId,
        near: Option<Location>,
    ) -> Result<MenuDetails, FetchError> {
        let key = MenuKey::new(menu_id, near);
        if let Some(cached) = self.cached_menu(&key) {
            debug!("Menu cache hit");
            return Ok(cached);
        }

        let mut query = Vec::new();
        if let Some(location) = near {
            query.push(("lat", location.lat.to_string()));
            query.push(("lng", location.lng.to_string()));
        }
        let url = self.endpoint(&["menu", &menu_id.to_string()], &query)?;
        let menu: MenuDetails = self.get_json(url).await?;
        debug!(delivery_time = menu.delivery_time, "Menu received");

        if let Ok(mut menus) = self.menus.lock() {
            menus.insert(key, menu.clone());
        }
        Ok(menu)
    }

    fn cached_menu(&self, key: &MenuKey) -> Option<MenuDetails> {
        self.menus
            .lock()
            .ok()
            .and_then(|menus| menus.get(key).cloned())
    }

    fn endpoint(&self, segments: &[&str], query: &[(&str, String)]) -> Result<Url, FetchError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| FetchError::InvalidRequest(format!("base url {} cannot carry a path", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
            pairs.append_pair("sid", &self.session_id);
        }
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, FetchError> {
        // The query string carries the session token; only the path is logged.
        let path = url.path().to_string();
        debug!(%path, "GET");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|send_error| FetchError::Network(send_error.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            warn!(%path, status = status.as_u16(), "Request rejected");
            return Err(FetchError::Http {
                status: status.as_u16(),
                message: status.canonical_reason().unwrap_or("Unknown status").to_string(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|read_error| FetchError::Network(read_error.to_string()))?;
        serde_json::from_str(&body).map_err(|decode_error| {
            warn!(%path, error = %decode_error, "Undecodable body");
            FetchError::Decode(decode_error.to_string())
        })
    }
}

#[async_trait]
impl OrderFetcher for HttpOrderFetcher {
    async fn fetch_order(&self, order_id: OrderId) -> Result<Order, FetchError> {
        self.order(order_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fetcher(base_url: &str) -> HttpOrderFetcher {
        HttpOrderFetcher::new(ApiConfig::new(base_url, "s3ss10n")).unwrap()
    }

    #[test]
    fn test_endpoint_appends_segments_and_session() {
        let fetcher = fetcher("https://delivery.example.com/api/");
        let url = fetcher.endpoint(&["order", "42"], &[]).unwrap();
        assert_eq!(url.as_str(), "https://delivery.example.com/api/order/42?sid=s3ss10n");
    }

    #[test]
    fn test_endpoint_puts_position_before_session() {
        let fetcher = fetcher("https://delivery.example.com/api");
        let query = [("lat", "45.5".to_string()), ("lng", "9.2".to_string())];
        let url = fetcher.endpoint(&["menu", "7"], &query).unwrap();
        assert_eq!(
            url.as_str(),
            "https://delivery.example.com/api/menu/7?lat=45.5&lng=9.2&sid=s3ss10n"
        );
    }

    #[test]
    fn test_menu_key_tells_positions_apart() {
        let home = Some(Location::new(45.4642, 9.19));
        let office = Some(Location::new(45.47, 9.2));
        assert_eq!(MenuKey::new(MenuId(7), home), MenuKey::new(MenuId(7), home));
        assert_ne!(MenuKey::new(MenuId(7), home), MenuKey::new(MenuId(7), office));
        assert_ne!(MenuKey::new(MenuId(7), home), MenuKey::new(MenuId(7), None));
        assert_ne!(MenuKey::new(MenuId(7), None), MenuKey::new(MenuId(8), None));
    }

    #[test]
    fn test_rejects_unusable_base_url() {
        let err = HttpOrderFetcher::new(ApiConfig::new("not a url", "sid")).err().unwrap();
        assert!(matches!(err, FetchError::InvalidRequest(_)));

        let err = HttpOrderFetcher::new(ApiConfig::new("mailto:ops@example.com", "sid"))
            .err()
            .unwrap();
        assert!(matches!(err, FetchError::InvalidRequest(_)));
    }
}
