//! Member methods callable from snippets, one table per receiver type.

pub mod array;
pub mod number;
pub mod string;

use crate::types::{methods_to_map, MethodMap};
use std::sync::{Arc, OnceLock};

/// Method tables keyed by receiver type.
#[derive(Debug)]
pub struct MethodTables {
    pub string: MethodMap,
    pub array: MethodMap,
    pub number: MethodMap,
}

/// Builds fresh method tables.
pub fn method_tables() -> MethodTables {
    MethodTables {
        string: methods_to_map(string::methods()),
        array: methods_to_map(array::methods()),
        number: methods_to_map(number::methods()),
    }
}

/// Process-wide tables shared by every compiled snippet.
pub fn shared_method_tables() -> Arc<MethodTables> {
    static TABLES: OnceLock<Arc<MethodTables>> = OnceLock::new();
    Arc::clone(TABLES.get_or_init(|| Arc::new(method_tables())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binder::STRING_MEMBERS;

    #[test]
    fn every_bound_string_member_is_callable() {
        let tables = method_tables();
        for name in STRING_MEMBERS.iter().filter(|n| **n != "length") {
            assert!(tables.string.contains_key(*name), "missing string method {}", name);
        }
    }
}
