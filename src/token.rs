// src/token.rs
//
// Soulbound voter credential. One token per successful vote, minted only
// by the designated minter (the DAO ledger), never transferable.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::DaoError;

/// Ledger account identifier.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(String);

impl AccountId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for AccountId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub type TokenId = u64;

#[derive(Clone, Debug)]
pub struct SoulboundBadge {
    pub name: String,
    pub symbol: String,
    owner: AccountId,
    minter: Option<AccountId>,
    holders: BTreeMap<TokenId, AccountId>,
    balances: HashMap<AccountId, u64>,
    next_token_id: TokenId,
}

impl SoulboundBadge {
    /// New registry administered by `owner`. No minter until `set_minter`.
    pub fn new(name: impl Into<String>, symbol: impl Into<String>, owner: AccountId) -> Self {
        Self {
            name: name.into(),
            symbol: symbol.into(),
            owner,
            minter: None,
            holders: BTreeMap::new(),
            balances: HashMap::new(),
            next_token_id: 0,
        }
    }

    /// Rotate the single authorized minter. Owner only.
    pub fn set_minter(&mut self, caller: &AccountId, minter: AccountId) -> Result<(), DaoError> {
        if caller != &self.owner {
            return Err(DaoError::NotAuthorized);
        }
        info!(minter = %minter, "credential minter set");
        self.minter = Some(minter);
        Ok(())
    }

    pub fn can_mint(&self, caller: &AccountId) -> bool {
        self.minter.as_ref() == Some(caller)
    }

    /// Mint one credential to `to`. Only the minter may call this.
    pub fn mint(&mut self, caller: &AccountId, to: &AccountId) -> Result<TokenId, DaoError> {
        if !self.can_mint(caller) {
            return Err(DaoError::NotAuthorized);
        }
        let token_id = self.next_token_id;
        self.next_token_id += 1;
        self.holders.insert(token_id, to.clone());
        *self.balances.entry(to.clone()).or_insert(0) += 1;

        info!(token_id, holder = %to, "credential minted");
        Ok(token_id)
    }

    /// Credentials are bound to their holder.
    pub fn transfer(
        &mut self,
        _caller: &AccountId,
        _to: &AccountId,
        _token_id: TokenId,
    ) -> Result<(), DaoError> {
        Err(DaoError::NotTransferable)
    }

    pub fn approve(
        &mut self,
        _caller: &AccountId,
        _spender: &AccountId,
        _token_id: TokenId,
    ) -> Result<(), DaoError> {
        Err(DaoError::NotTransferable)
    }

    pub fn owner(&self) -> &AccountId {
        &self.owner
    }

    pub fn minter(&self) -> Option<&AccountId> {
        self.minter.as_ref()
    }

    pub fn owner_of(&self, token_id: TokenId) -> Option<&AccountId> {
        self.holders.get(&token_id)
    }

    pub fn balance_of(&self, holder: &AccountId) -> u64 {
        self.balances.get(holder).copied().unwrap_or(0)
    }

    pub fn total_supply(&self) -> u64 {
        self.next_token_id
    }
}
