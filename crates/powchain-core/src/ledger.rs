use tracing::info;

use crate::error::{LedgerError, Result, VerifyFailure};
use crate::pow::{PowConfig, ProofOfWork};
use crate::Block;

/// Append-only chain of sealed blocks, always rooted at a genesis block.
#[derive(Clone, Debug)]
pub struct Ledger {
    pow: ProofOfWork,
    blocks: Vec<Block>,
}

impl Ledger {
    /// A ledger at the reference difficulty. Mines the genesis block.
    pub fn new() -> Result<Self> {
        Self::with_config(PowConfig::default())
    }

    pub fn with_config(config: PowConfig) -> Result<Self> {
        let pow = ProofOfWork::new(config)?;
        let genesis = Block::genesis(&pow)?;
        info!(hash = %hex::encode(genesis.hash()), "created genesis block");
        Ok(Self {
            pow,
            blocks: vec![genesis],
        })
    }

    /// Mine `payload` on top of the current tip and append it.
    pub fn append(&mut self, payload: impl Into<Vec<u8>>) -> Result<()> {
        let tip = self.blocks.last().ok_or(LedgerError::EmptyLedger)?;
        let block = Block::new(payload, tip.hash(), &self.pow)?;
        info!(
            index = self.blocks.len(),
            nonce = block.nonce(),
            hash = %hex::encode(block.hash()),
            "appended block"
        );
        self.blocks.push(block);
        Ok(())
    }

    /// Check every block's seal and its link to the block before it.
    pub fn verify(&self) -> Result<()> {
        if self.blocks.is_empty() {
            return Err(LedgerError::EmptyLedger);
        }
        let mut previous: Option<&Block> = None;
        for (index, block) in self.blocks.iter().enumerate() {
            let linked = match previous {
                None => block.is_genesis(),
                Some(prev) => block.previous_hash() == prev.hash(),
            };
            if !linked {
                let reason = match previous {
                    None => VerifyFailure::GenesisHasParent,
                    Some(_) => VerifyFailure::BrokenLink,
                };
                return Err(LedgerError::Verification { index, reason });
            }
            self.pow
                .verify(block)
                .map_err(|reason| LedgerError::Verification { index, reason })?;
            previous = Some(block);
        }
        Ok(())
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Block> {
        self.blocks.iter()
    }

    pub fn get(&self, index: usize) -> Option<&Block> {
        self.blocks.get(index)
    }

    pub fn tip(&self) -> Option<&Block> {
        self.blocks.last()
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn proof_of_work(&self) -> &ProofOfWork {
        &self.pow
    }
}

impl<'a> IntoIterator for &'a Ledger {
    type Item = &'a Block;
    type IntoIter = std::slice::Iter<'a, Block>;

    fn into_iter(self) -> Self::IntoIter {
        self.blocks.iter()
    }
}
