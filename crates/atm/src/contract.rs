//! Bindings and call plumbing for the deployed `Assessment` ATM contract.

use std::fmt;

use alloy_network::{Ethereum, ReceiptResponse};
use alloy_primitives::{Address, TxHash, U256, address};
use alloy_provider::{DynProvider, PendingTransactionBuilder};
use alloy_sol_types::sol;
use async_trait::async_trait;

use crate::error::ContractError;

/// Address the ATM contract lands at when it is the first deployment on a fresh dev node.
pub const DEFAULT_CONTRACT_ADDRESS: Address =
    address!("0x5FbDB2315678afecb367f032d93F642f64180aa3");

sol! {
    #[sol(rpc)]
    interface Assessment {
        #[derive(Debug)]
        error InsufficientBalance(uint256 balance, uint256 withdrawAmount);

        event Deposit(uint256 amount);
        event Withdraw(uint256 amount);

        function getBalance() external view returns (uint256);
        function deposit(uint256 amount) external payable;
        function withdraw(uint256 withdrawAmount) external;
        function revertExample(uint256 value) external;
        function assertExample(uint256 value) external;
    }
}

/// A state-changing call on the ATM contract.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AtmCall {
    Deposit(U256),
    Withdraw(U256),
    RevertExample(U256),
    AssertExample(U256),
}

impl AtmCall {
    /// The contract method this call invokes.
    pub fn method(&self) -> &'static str {
        match self {
            Self::Deposit(_) => "deposit",
            Self::Withdraw(_) => "withdraw",
            Self::RevertExample(_) => "revertExample",
            Self::AssertExample(_) => "assertExample",
        }
    }

    /// The single `uint256` argument.
    pub fn argument(&self) -> U256 {
        match *self {
            Self::Deposit(v)
            | Self::Withdraw(v)
            | Self::RevertExample(v)
            | Self::AssertExample(v) => v,
        }
    }

    /// Whether a confirmed call changes the balance and requires a refresh.
    pub fn moves_funds(&self) -> bool {
        matches!(self, Self::Deposit(_) | Self::Withdraw(_))
    }
}

impl fmt::Display for AtmCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.method(), self.argument())
    }
}

/// Summary of a mined transaction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Receipt {
    pub tx_hash: TxHash,
    pub block_number: Option<u64>,
    pub gas_used: u64,
}

/// A submitted transaction whose confirmation has not been awaited yet.
#[async_trait]
pub trait PendingTx: Send {
    fn tx_hash(&self) -> TxHash;

    /// Waits until the transaction is mined. A mined but failed transaction is an error.
    async fn wait(self: Box<Self>) -> Result<Receipt, ContractError>;
}

/// Handle to the ATM contract bound to a signer.
#[async_trait]
pub trait AtmContract: Send + Sync {
    fn address(&self) -> Address;

    async fn get_balance(&self) -> Result<U256, ContractError>;

    async fn submit(&self, call: AtmCall) -> Result<Box<dyn PendingTx>, ContractError>;
}

/// [`AtmContract`] backed by an alloy provider.
///
/// `from` is set on every call so node-managed accounts can be used through
/// `eth_sendTransaction`; a provider with a wallet filler signs locally instead.
pub struct AlloyAtm {
    instance: Assessment::AssessmentInstance<DynProvider>,
    from: Address,
    confirmations: u64,
}

impl AlloyAtm {
    pub fn new(address: Address, provider: DynProvider, from: Address) -> Self {
        Self { instance: Assessment::new(address, provider), from, confirmations: 1 }
    }

    /// Sets the number of blocks [`PendingTx::wait`] waits for.
    pub fn with_confirmations(mut self, confirmations: u64) -> Self {
        self.confirmations = confirmations.max(1);
        self
    }
}

impl fmt::Debug for AlloyAtm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AlloyAtm")
            .field("address", self.instance.address())
            .field("from", &self.from)
            .field("confirmations", &self.confirmations)
            .finish()
    }
}

#[async_trait]
impl AtmContract for AlloyAtm {
    fn address(&self) -> Address {
        *self.instance.address()
    }

    async fn get_balance(&self) -> Result<U256, ContractError> {
        Ok(self.instance.getBalance().from(self.from).call().await?)
    }

    async fn submit(&self, call: AtmCall) -> Result<Box<dyn PendingTx>, ContractError> {
        let atm = &self.instance;
        let pending = match call {
            AtmCall::Deposit(amount) => atm.deposit(amount).from(self.from).send().await?,
            AtmCall::Withdraw(amount) => atm.withdraw(amount).from(self.from).send().await?,
            AtmCall::RevertExample(value) => {
                atm.revertExample(value).from(self.from).send().await?
            }
            AtmCall::AssertExample(value) => {
                atm.assertExample(value).from(self.from).send().await?
            }
        };
        debug!(%call, tx_hash = %pending.tx_hash(), "submitted transaction");
        Ok(Box::new(AlloyPendingTx(pending.with_required_confirmations(self.confirmations))))
    }
}

struct AlloyPendingTx(PendingTransactionBuilder<Ethereum>);

#[async_trait]
impl PendingTx for AlloyPendingTx {
    fn tx_hash(&self) -> TxHash {
        *self.0.tx_hash()
    }

    async fn wait(self: Box<Self>) -> Result<Receipt, ContractError> {
        let receipt = self.0.get_receipt().await?;
        Receipt::from_mined(&receipt)
    }
}

impl Receipt {
    /// Summarizes a mined receipt. A receipt with a failed status is an error.
    pub fn from_mined(receipt: &impl ReceiptResponse) -> Result<Self, ContractError> {
        let tx_hash = receipt.transaction_hash();
        if !receipt.status() {
            return Err(ContractError::Reverted(tx_hash));
        }
        Ok(Self { tx_hash, block_number: receipt.block_number(), gas_used: receipt.gas_used() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_network::Network;
    use alloy_primitives::{Bytes, b256};
    use alloy_provider::{Provider, ProviderBuilder};
    use alloy_sol_types::{SolCall, SolError, SolValue};
    use alloy_transport::mock::Asserter;
    use serde_json::json;

    const ALICE: Address = address!("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266");
    const TX_HASH: TxHash =
        b256!("0x8a1f1bd5ab4cbd2e2b1b1b6a4a8e2d5a0b0c1e0d6f4a3b2c1d0e9f8a7b6c5d4e");

    fn mocked_atm(asserter: &Asserter) -> AlloyAtm {
        let provider = ProviderBuilder::new()
            .disable_recommended_fillers()
            .connect_mocked_client(asserter.clone())
            .erased();
        AlloyAtm::new(DEFAULT_CONTRACT_ADDRESS, provider, ALICE)
    }

    fn mined_receipt(status: bool) -> <Ethereum as Network>::ReceiptResponse {
        serde_json::from_value(json!({
            "type": "0x2",
            "status": if status { "0x1" } else { "0x0" },
            "cumulativeGasUsed": "0xa410",
            "logs": [],
            "logsBloom": format!("0x{}", "00".repeat(256)),
            "transactionHash": TX_HASH,
            "transactionIndex": "0x0",
            "blockHash": "0x1d59ff54b1eb26b013ce3cb5fc9dab3705b415a67127a003c3e61eb445bb8df2",
            "blockNumber": "0x5",
            "gasUsed": "0xa410",
            "effectiveGasPrice": "0x3b9aca00",
            "from": ALICE,
            "to": DEFAULT_CONTRACT_ADDRESS,
            "contractAddress": null
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn reads_balance() {
        let asserter = Asserter::new();
        asserter.push_success(&Bytes::from(U256::from(42).abi_encode()));
        assert_eq!(mocked_atm(&asserter).get_balance().await.unwrap(), U256::from(42));
    }

    #[tokio::test]
    async fn decodes_revert_from_node_error() {
        let data = Assessment::InsufficientBalance {
            balance: U256::ZERO,
            withdrawAmount: U256::from(1),
        }
        .abi_encode();
        let asserter = Asserter::new();
        asserter.push_failure(
            serde_json::from_value(json!({
                "code": 3,
                "message": "execution reverted",
                "data": Bytes::from(data),
            }))
            .unwrap(),
        );

        let err = mocked_atm(&asserter).get_balance().await.unwrap_err();
        let ContractError::Revert(reason) = &err else { panic!("expected a revert, got {err:?}") };
        assert_eq!(reason, "insufficient balance: have 0, requested 1");
    }

    #[tokio::test]
    async fn transport_errors_are_not_reverts() {
        let asserter = Asserter::new();
        asserter.push_failure_msg("connection reset");
        let err = mocked_atm(&asserter).get_balance().await.unwrap_err();
        assert!(matches!(err, ContractError::Call(_)), "{err:?}");
    }

    #[tokio::test]
    async fn submit_returns_pending_hash() {
        let asserter = Asserter::new();
        asserter.push_success(&TX_HASH);
        let pending = mocked_atm(&asserter).submit(AtmCall::Deposit(U256::from(1))).await.unwrap();
        assert_eq!(pending.tx_hash(), TX_HASH);
    }

    #[test]
    fn failed_receipt_is_reverted() {
        let err = Receipt::from_mined(&mined_receipt(false)).unwrap_err();
        assert!(matches!(err, ContractError::Reverted(hash) if hash == TX_HASH));

        let receipt = Receipt::from_mined(&mined_receipt(true)).unwrap();
        assert_eq!(
            receipt,
            Receipt { tx_hash: TX_HASH, block_number: Some(5), gas_used: 0xa410 }
        );
    }

    #[test]
    fn confirmations_are_at_least_one() {
        let asserter = Asserter::new();
        assert_eq!(mocked_atm(&asserter).confirmations, 1);
        assert_eq!(mocked_atm(&asserter).with_confirmations(0).confirmations, 1);
        assert_eq!(mocked_atm(&asserter).with_confirmations(3).confirmations, 3);
    }

    #[test]
    fn call_metadata() {
        let call = AtmCall::Withdraw(U256::from(1));
        assert_eq!(call.method(), "withdraw");
        assert_eq!(call.argument(), U256::from(1));
        assert!(call.moves_funds());
        assert_eq!(call.to_string(), "withdraw(1)");

        let demo = AtmCall::AssertExample(U256::from(42));
        assert!(!demo.moves_funds());
        assert_eq!(demo.to_string(), "assertExample(42)");
    }

    #[test]
    fn selectors_match_abi() {
        assert_eq!(Assessment::getBalanceCall::SIGNATURE, "getBalance()");
        assert_eq!(Assessment::depositCall::SIGNATURE, "deposit(uint256)");
        assert_eq!(Assessment::withdrawCall::SIGNATURE, "withdraw(uint256)");
        assert_eq!(Assessment::revertExampleCall::SIGNATURE, "revertExample(uint256)");
        assert_eq!(Assessment::assertExampleCall::SIGNATURE, "assertExample(uint256)");
    }
}
