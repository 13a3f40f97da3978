use crate::methods::MethodTables;
use crate::vars::Vars;
use std::sync::Arc;

/// The execution context passed through the tree walk.
pub struct EvalCtx<'a> {
    /// Scope for free identifiers.
    pub vars: &'a Vars<'a>,
    /// Member methods callable on string, array and number receivers.
    pub methods: Arc<MethodTables>,
}

impl<'a> EvalCtx<'a> {
    pub fn new(vars: &'a Vars<'a>, methods: Arc<MethodTables>) -> Self {
        EvalCtx { vars, methods }
    }
}
