//! Browser local storage backing for the session token.

use common::session::{TokenStore, TOKEN_STORAGE_KEY};
use web_sys::Storage;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LocalStorageTokenStore;

impl LocalStorageTokenStore {
    fn storage() -> Option<Storage> {
        web_sys::window()?.local_storage().ok()?
    }
}

impl TokenStore for LocalStorageTokenStore {
    fn load(&self) -> Option<String> {
        Self::storage()?.get_item(TOKEN_STORAGE_KEY).ok()?
    }

    fn save(&self, token: &str) {
        match Self::storage() {
            Some(storage) => {
                if let Err(err) = storage.set_item(TOKEN_STORAGE_KEY, token) {
                    log::warn!("could not persist session token: {:?}", err);
                }
            }
            None => log::warn!("local storage unavailable; session will not survive a reload"),
        }
    }

    fn clear(&self) {
        if let Some(storage) = Self::storage() {
            storage.remove_item(TOKEN_STORAGE_KEY).ok();
        }
    }
}
