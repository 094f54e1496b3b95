use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{info, warn};

use crate::accounts::models::{Account, ProfileUpdate, StoredAccount};
use crate::accounts::password::{hash_password, verify_password, Verification};
use crate::storage::ids::time_id;
use crate::storage::{read_json, write_json, SharedStore, StoreError, USERS_KEY, USER_KEY};

/// Registered accounts (`users`) plus the single current-account slot (`user`).
///
/// Every mutation rewrites the whole `users` document. Mutations from this
/// process are serialized; another process on the same storage can still
/// overwrite them.
#[derive(Clone)]
pub struct AccountStore {
    store: SharedStore,
    write_lock: Arc<Mutex<()>>,
}

impl AccountStore {
    pub fn new(store: SharedStore) -> Self {
        Self {
            store,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Creates an account and signs it in. Emails are unique.
    pub fn register(&self, email: &str, password: &str, mobile: &str) -> Result<Account, StoreError> {
        let _guard = self.write_lock.lock();
        let mut accounts = self.load_all()?;

        if accounts.iter().any(|stored| stored.account.email == email) {
            warn!("Signup rejected: email already registered");
            return Err(StoreError::DuplicateEmail(email.to_string()));
        }

        let account = Account::new(time_id(), email, mobile);
        accounts.push(StoredAccount {
            account: account.clone(),
            password: hash_password(password)?,
        });
        self.save_all(&accounts)?;
        self.set_current(&account)?;

        info!("Registered account {}", account.id);
        Ok(account)
    }

    /// Signs in on matching credentials. `None` means no such email/secret pair.
    pub fn authenticate(&self, email: &str, password: &str) -> Result<Option<Account>, StoreError> {
        let _guard = self.write_lock.lock();
        let mut accounts = self.load_all()?;

        let Some(stored) = accounts
            .iter_mut()
            .find(|stored| stored.account.email == email)
        else {
            return Ok(None);
        };

        let upgrade = match verify_password(password, &stored.password) {
            Verification::Mismatch => return Ok(None),
            Verification::Match => false,
            Verification::LegacyMatch => {
                stored.password = hash_password(password)?;
                true
            }
        };
        let account = stored.account.clone();

        if upgrade {
            self.save_all(&accounts)?;
            info!("Replaced cleartext secret with a hash for account {}", account.id);
        }
        self.set_current(&account)?;

        info!("Account {} signed in", account.id);
        Ok(Some(account))
    }

    /// Merges `update` into the stored account and, when it is the signed-in
    /// account, into the current slot as well.
    ///
    /// The registered record is authoritative: an id missing from `users` is
    /// `AccountNotFound` even when the current slot still holds that account,
    /// and the slot is left untouched.
    pub fn update(&self, account_id: &str, update: &ProfileUpdate) -> Result<Account, StoreError> {
        let _guard = self.write_lock.lock();
        let mut accounts = self.load_all()?;

        let stored = accounts
            .iter_mut()
            .find(|stored| stored.account.id == account_id)
            .ok_or_else(|| StoreError::AccountNotFound(account_id.to_string()))?;
        stored.account.apply(update);
        let updated = stored.account.clone();
        self.save_all(&accounts)?;

        if self
            .current_account()?
            .is_some_and(|current| current.id == account_id)
        {
            self.set_current(&updated)?;
        }

        info!("Updated profile of account {account_id}");
        Ok(updated)
    }

    /// The signed-in account, as restored from storage.
    pub fn current_account(&self) -> Result<Option<Account>, StoreError> {
        read_json(self.store.as_ref(), USER_KEY)
    }

    /// Clears the current slot. Registered accounts are untouched.
    pub fn logout(&self) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock();
        self.store.remove(USER_KEY)?;
        info!("Signed out");
        Ok(())
    }

    /// Number of registered accounts.
    pub fn count(&self) -> Result<usize, StoreError> {
        Ok(self.load_all()?.len())
    }

    fn load_all(&self) -> Result<Vec<StoredAccount>, StoreError> {
        Ok(read_json(self.store.as_ref(), USERS_KEY)?.unwrap_or_default())
    }

    fn save_all(&self, accounts: &[StoredAccount]) -> Result<(), StoreError> {
        write_json(self.store.as_ref(), USERS_KEY, accounts)
    }

    fn set_current(&self, account: &Account) -> Result<(), StoreError> {
        write_json(self.store.as_ref(), USER_KEY, account)
    }
}
