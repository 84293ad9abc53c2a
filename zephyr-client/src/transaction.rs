//! Transaction drafts and instruction constructors.
//!
//! A draft is plain data: a fee payer, a recent block reference and an
//! ordered instruction list. The wallet provider turns it into signed wire
//! bytes; the client never encodes the chain's wire format itself.

use serde::{Deserialize, Serialize};

use crate::Address;

/// System program id.
pub const SYSTEM_PROGRAM_ID: &str = "11111111111111111111111111111111";

/// All-ones placeholder address shipped by unconfigured deployments.
pub const PLACEHOLDER_ADDRESS: &str = "11111111111111111111111111111112";

/// SPL token program id.
pub const TOKEN_PROGRAM_ID: &str = "TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA";

/// Associated token account program id.
pub const ASSOCIATED_TOKEN_PROGRAM_ID: &str = "ATokenGPvbdGVxr1b2hvZbsiqW5xWH25efTNsLJA8knL";

/// Memo program id.
pub const MEMO_PROGRAM_ID: &str = "MemoSq4gqABAXKb96qnH8TysNcWxMyWCqXgDLGmfcHr";

/// Opaque reference to a recent block, anchoring a draft in time.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockReference(pub String);

impl BlockReference {
    /// Create a block reference from a string.
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    /// Get the reference as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for BlockReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single program invocation inside a draft.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instruction {
    /// Program to invoke.
    pub program_id: Address,
    /// Accounts the instruction touches, in the program's expected order.
    pub accounts: Vec<Address>,
    /// Program-specific payload.
    pub data: Vec<u8>,
}

/// An unsigned transaction: what the wallet provider is asked to sign.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionDraft {
    /// Account paying network fees; also the expected signer.
    pub fee_payer: Address,
    /// Recent block reference.
    pub block_reference: BlockReference,
    /// Instructions, executed atomically in order.
    pub instructions: Vec<Instruction>,
}

impl TransactionDraft {
    /// Create an empty draft.
    pub fn new(fee_payer: Address, block_reference: BlockReference) -> Self {
        Self {
            fee_payer,
            block_reference,
            instructions: Vec::new(),
        }
    }

    /// Append an instruction, builder style.
    pub fn with(mut self, instruction: Instruction) -> Self {
        self.instructions.push(instruction);
        self
    }

    /// Append an instruction in place.
    pub fn push(&mut self, instruction: Instruction) {
        self.instructions.push(instruction);
    }
}

/// A memo instruction carrying arbitrary text. Zero-value: it moves no
/// funds, which makes it the signing vehicle for providers that lack
/// direct message signing.
pub fn memo_instruction(text: &str) -> Instruction {
    Instruction {
        program_id: Address::new(MEMO_PROGRAM_ID),
        accounts: Vec::new(),
        data: text.as_bytes().to_vec(),
    }
}

/// A native-currency transfer.
///
/// Payload layout: u32 LE discriminant (2 = transfer) followed by the
/// amount as u64 LE base units.
pub fn system_transfer(from: &Address, to: &Address, base_units: u64) -> Instruction {
    let mut data = Vec::with_capacity(12);
    data.extend_from_slice(&2u32.to_le_bytes());
    data.extend_from_slice(&base_units.to_le_bytes());
    Instruction {
        program_id: Address::new(SYSTEM_PROGRAM_ID),
        accounts: vec![from.clone(), to.clone()],
        data,
    }
}

/// A token transfer between two token-holding accounts, authorized by
/// `owner`.
///
/// Payload layout: u8 discriminant (3 = transfer) followed by the amount as
/// u64 LE base units.
pub fn token_transfer(
    source: &Address,
    destination: &Address,
    owner: &Address,
    base_units: u64,
) -> Instruction {
    let mut data = Vec::with_capacity(9);
    data.push(3u8);
    data.extend_from_slice(&base_units.to_le_bytes());
    Instruction {
        program_id: Address::new(TOKEN_PROGRAM_ID),
        accounts: vec![source.clone(), destination.clone(), owner.clone()],
        data,
    }
}

/// Creation of `owner`'s token-holding account for `mint`, funded by
/// `funder`. Idempotent variant (discriminant 1), so a race with another
/// creator does not fail the transaction.
pub fn create_token_account(
    funder: &Address,
    token_account: &Address,
    owner: &Address,
    mint: &Address,
) -> Instruction {
    Instruction {
        program_id: Address::new(ASSOCIATED_TOKEN_PROGRAM_ID),
        accounts: vec![
            funder.clone(),
            token_account.clone(),
            owner.clone(),
            mint.clone(),
            Address::new(SYSTEM_PROGRAM_ID),
            Address::new(TOKEN_PROGRAM_ID),
        ],
        data: vec![1u8],
    }
}
