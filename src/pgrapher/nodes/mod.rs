// SPDX-License-Identifier: MIT

//! Built-in nodes over `i64` values
//!
//! These cover every invocation shape so a graph description can be run
//! from the command line without any external node library.

mod arith;
mod range;
mod sink;

pub use arith::{Pairwise, Repeat, Scale, Sum};
pub use range::Range;
pub use sink::{Collect, Print};

use crate::dfp::{shared, ConfigError, Data, NodeError, SharedNode, Signature};
use crate::pgrapher::registry::NodeRegistry;
use crate::pgrapher::types::{BuiltinKind, NodeConfig};

/// Signature shared by every built-in port
pub fn int() -> Signature {
    Signature::of::<i64>()
}

pub(crate) fn expect_int(data: &Data) -> Result<i64, NodeError> {
    data.cloned::<i64>()
        .ok_or_else(|| "expected an i64 payload".into())
}

/// Instantiate one built-in node
pub fn instantiate(config: &NodeConfig) -> SharedNode {
    let name = config.name.clone();
    match &config.kind {
        BuiltinKind::Range { start, count } => shared(Range::new(name, *start, *count)),
        BuiltinKind::Scale { factor } => shared(Scale::new(name, *factor)),
        BuiltinKind::Repeat { times } => shared(Repeat::new(name, *times)),
        BuiltinKind::Sum { inputs } => shared(Sum::new(name, *inputs)),
        BuiltinKind::Pairwise => shared(Pairwise::new(name)),
        BuiltinKind::Print { prefix } => shared(Print::new(name, prefix.clone())),
        BuiltinKind::Collect => shared(Collect::new(name)),
    }
}

/// Instantiate and register every built-in node of a description
pub fn register_builtins(
    registry: &mut NodeRegistry,
    configs: &[NodeConfig],
) -> Result<(), ConfigError> {
    for config in configs {
        log::debug!("Registering built-in node '{}'", config.name);
        registry.register(config.name.clone(), instantiate(config))?;
    }
    Ok(())
}
