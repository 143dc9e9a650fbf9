//! The signed-in user's wishlist.

use crate::notify::Notification;
use crate::state::AppState;
use crate::StorefrontError;
use playrent_cache::QueryTag;
use playrent_commerce::catalog::Wishlist;
use playrent_commerce::ids::ProductId;
use playrent_data::ErrorClass;
use std::sync::Arc;
use tracing::{info, warn};

pub struct WishlistService {
    state: Arc<AppState>,
}

impl WishlistService {
    pub fn new(state: Arc<AppState>) -> Self {
        Self { state }
    }

    pub async fn list(&self) -> Result<Wishlist, StorefrontError> {
        let client = self.state.client();
        self.state
            .queries()
            .get_or_fetch("wishlist", vec![QueryTag::Wishlist], || async {
                client.get_wishlist().await.map_err(StorefrontError::from)
            })
            .await
    }

    /// Star or unstar a product. Returns whether it is now on the list.
    pub async fn toggle(&self, product_id: &ProductId) -> Result<bool, StorefrontError> {
        let toggled = match self.state.client().toggle_wishlist(product_id).await {
            Ok(toggled) => toggled,
            Err(e) => {
                let class = ErrorClass::of(&e);
                warn!(product = %product_id, class = class.as_str(), "wishlist toggle failed");
                self.state.notify(Notification::failure(class));
                return Err(e.into());
            }
        };

        self.state.queries().invalidate(&QueryTag::Wishlist)?;
        info!(product = %product_id, in_wishlist = toggled.in_wishlist, "wishlist toggled");
        self.state.notify(Notification::success(if toggled.in_wishlist {
            "Added to wishlist"
        } else {
            "Removed from wishlist"
        }));
        Ok(toggled.in_wishlist)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::testing::harness;
    use playrent_data::api::WishlistToggle;
    use playrent_data::Method;

    #[tokio::test]
    async fn test_toggle_invalidates_list() {
        let h = harness();
        h.mock
            .reply(Method::Get, "/api/wishlist", 200, &Wishlist::default())
            .reply(
                Method::Post,
                "/api/wishlist",
                200,
                &WishlistToggle {
                    product_id: ProductId::new("p1"),
                    in_wishlist: true,
                },
            )
            .reply(
                Method::Get,
                "/api/wishlist",
                200,
                &Wishlist {
                    product_ids: vec![ProductId::new("p1")],
                },
            );
        let wishlist = WishlistService::new(h.state.clone());

        assert!(wishlist.list().await.unwrap().is_empty());
        assert!(wishlist.toggle(&ProductId::new("p1")).await.unwrap());
        assert!(wishlist
            .list()
            .await
            .unwrap()
            .contains(&ProductId::new("p1")));
        assert_eq!(h.notifier.last().unwrap().message, "Added to wishlist");
    }

    #[tokio::test]
    async fn test_toggle_signed_out() {
        let h = harness();
        h.mock
            .reply(Method::Post, "/api/wishlist", 401, &serde_json::json!({}));
        let err = WishlistService::new(h.state.clone())
            .toggle(&ProductId::new("p1"))
            .await
            .unwrap_err();

        assert_eq!(err.class(), Some(ErrorClass::SignInRequired));
        assert_eq!(h.notifier.last().unwrap().class, Some(ErrorClass::SignInRequired));
    }
}
