// src/relayer.rs

use tracing::info;

use crate::dao::Dao;
use crate::error::RelayError;
use crate::instruction::{VoteCalldata, VoteInstruction};
use crate::shared::SharedDao;
use crate::token::AccountId;
use crate::verifier::ProofVerifier;

/// Submits votes on a voter's behalf so the voter's own account never
/// appears on the ledger. The relayer's identity plays no part in validity;
/// the credential goes to the beneficiary named in the calldata.
#[derive(Clone, Debug)]
pub struct Relayer {
    account: AccountId,
}

impl Relayer {
    pub fn new(account: AccountId) -> Self {
        Self { account }
    }

    pub fn account(&self) -> &AccountId {
        &self.account
    }

    pub fn relay<V: ProofVerifier>(
        &self,
        dao: &mut Dao<V>,
        calldata: &VoteCalldata,
    ) -> Result<(), RelayError> {
        let ix = VoteInstruction::unpack(calldata)?;
        info!(relayer = %self.account, beneficiary = %ix.beneficiary, "relaying vote");
        dao.submit_vote(&ix.proof, &ix.signals, &ix.beneficiary)?;
        Ok(())
    }

    pub fn relay_shared<V: ProofVerifier>(
        &self,
        dao: &SharedDao<V>,
        calldata: &VoteCalldata,
    ) -> Result<(), RelayError> {
        let ix = VoteInstruction::unpack(calldata)?;
        info!(relayer = %self.account, beneficiary = %ix.beneficiary, "relaying vote");
        dao.submit_vote(&ix.proof, &ix.signals, &ix.beneficiary)?;
        Ok(())
    }
}
