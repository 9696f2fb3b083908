//! User profile, address, and wishlist endpoints.

use greenbasket_core::ProductId;
use greenbasket_core::api::{
    Address, ProfileDoc, UpdateAddressRequest, UpdateProfileRequest, WishlistRequest,
};

use super::ApiClient;
use crate::result::RemoteResult;

impl ApiClient {
    /// `GET /user/profile`
    pub async fn get_profile(&self) -> RemoteResult<ProfileDoc> {
        self.get("/user/profile").await
    }

    /// `PUT /user/profile`
    pub async fn update_profile(&self, update: &UpdateProfileRequest) -> RemoteResult<ProfileDoc> {
        self.put("/user/profile", update).await
    }

    /// `PUT /user/address` - wholesale replace.
    pub async fn update_addresses(&self, addresses: Vec<Address>) -> RemoteResult<Vec<Address>> {
        self.put("/user/address", &UpdateAddressRequest { addresses })
            .await
    }

    /// `DELETE /user/address/:id`
    pub async fn delete_address(&self, id: &str) -> RemoteResult<()> {
        self.delete(&format!("/user/address/{id}")).await
    }

    /// `POST /user/wishlist/add`
    pub async fn add_to_wishlist(&self, product_id: ProductId) -> RemoteResult<()> {
        self.post("/user/wishlist/add", &WishlistRequest { product_id })
            .await
    }

    /// `POST /user/wishlist/remove`
    pub async fn remove_from_wishlist(&self, product_id: ProductId) -> RemoteResult<()> {
        self.post("/user/wishlist/remove", &WishlistRequest { product_id })
            .await
    }
}
