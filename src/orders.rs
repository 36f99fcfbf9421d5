//! Order payload sent to the robot controller.
//!
//! Each identified block is looked up in the instruction table by its
//! [`BlockKey`]; the resulting list serializes as
//! `{"orders": [{"id": ..., "lifetime": 3.0, "param": {...}}, ...]}`.

use crate::config::InstructionRule;
use crate::identify::{BlockDescriptor, BlockKey};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Seconds an order stays valid on the receiving side.
pub const ORDER_LIFETIME: f64 = 3.0;

#[derive(Debug, Error, PartialEq)]
pub enum OrderError {
    #[error("no blocks identified, nothing to send")]
    NoBlocks,

    #[error("no instruction registered for block {0}")]
    Unmapped(BlockKey),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    pub lifetime: f64,
    pub param: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Orders {
    pub orders: Vec<Order>,
}

/// Instruction rule for `key`. First match wins.
pub fn lookup<'a>(key: &BlockKey, rules: &'a [InstructionRule]) -> Option<&'a InstructionRule> {
    rules.iter().find(|rule| rule.key() == *key)
}

/// One order per block, in stack order.
pub fn build_orders(
    blocks: &[BlockDescriptor],
    rules: &[InstructionRule],
) -> Result<Orders, OrderError> {
    if blocks.is_empty() {
        return Err(OrderError::NoBlocks);
    }

    let orders = blocks
        .iter()
        .map(|block| {
            let key = block.key();
            let rule = lookup(&key, rules).ok_or_else(|| OrderError::Unmapped(key.clone()))?;
            Ok(Order {
                id: rule.id.clone(),
                lifetime: ORDER_LIFETIME,
                param: rule.param.clone(),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Orders { orders })
}
