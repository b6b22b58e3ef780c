use super::expr::{BinaryOp, Expr, ExprId, UnaryOp};
use super::module::Module;
use super::ty::Type;
use super::value::Literal;

/// Builder for constructing expression nodes in a module's arena.
///
/// Each `make`-style method allocates one node and returns its id. The
/// builder borrows the module mutably for as long as it lives; create it
/// where nodes are needed and let it go.
pub struct Builder<'a> {
    module: &'a mut Module,
}

impl<'a> Builder<'a> {
    pub fn new(module: &'a mut Module) -> Self {
        Self { module }
    }

    fn emit(&mut self, expr: Expr) -> ExprId {
        self.module.exprs.push(expr)
    }

    // ========================================================================
    // Leaves
    // ========================================================================

    pub fn nop(&mut self) -> ExprId {
        self.emit(Expr::Nop)
    }

    pub fn unreachable(&mut self) -> ExprId {
        self.emit(Expr::Unreachable)
    }

    pub fn const_(&mut self, lit: Literal) -> ExprId {
        self.emit(Expr::Const(lit))
    }

    pub fn const_i32(&mut self, value: i32) -> ExprId {
        self.const_(Literal::I32(value))
    }

    pub fn const_i64(&mut self, value: i64) -> ExprId {
        self.const_(Literal::I64(value))
    }

    pub fn const_f64(&mut self, value: f64) -> ExprId {
        self.const_(Literal::F64(value))
    }

    pub fn local_get(&mut self, index: u32, ty: Type) -> ExprId {
        self.emit(Expr::LocalGet { index, ty })
    }

    pub fn global_get(&mut self, name: impl Into<String>, ty: Type) -> ExprId {
        self.emit(Expr::GlobalGet {
            name: name.into(),
            ty,
        })
    }

    pub fn pop(&mut self, ty: Type) -> ExprId {
        self.emit(Expr::Pop { ty })
    }

    // ========================================================================
    // Statements
    // ========================================================================

    pub fn local_set(&mut self, index: u32, value: ExprId) -> ExprId {
        self.emit(Expr::LocalSet { index, value })
    }

    pub fn global_set(&mut self, name: impl Into<String>, value: ExprId) -> ExprId {
        self.emit(Expr::GlobalSet {
            name: name.into(),
            value,
        })
    }

    pub fn store(&mut self, ptr: ExprId, value: ExprId) -> ExprId {
        self.emit(Expr::Store { ptr, value })
    }

    /// Discard-wrapper: evaluate `value` for its effects, drop its value.
    pub fn drop_(&mut self, value: ExprId) -> ExprId {
        self.emit(Expr::Drop { value })
    }

    pub fn return_(&mut self, value: Option<ExprId>) -> ExprId {
        self.emit(Expr::Return { value })
    }

    // ========================================================================
    // Operators / memory reads / calls
    // ========================================================================

    pub fn load(&mut self, ptr: ExprId, ty: Type) -> ExprId {
        self.emit(Expr::Load { ptr, ty })
    }

    pub fn unary(&mut self, op: UnaryOp, operand: ExprId, ty: Type) -> ExprId {
        self.emit(Expr::Unary { op, operand, ty })
    }

    pub fn binary(&mut self, op: BinaryOp, lhs: ExprId, rhs: ExprId, ty: Type) -> ExprId {
        self.emit(Expr::Binary { op, lhs, rhs, ty })
    }

    pub fn call(&mut self, target: impl Into<String>, args: &[ExprId], ty: Type) -> ExprId {
        self.emit(Expr::Call {
            target: target.into(),
            args: args.to_vec(),
            ty,
        })
    }

    // ========================================================================
    // Control flow
    // ========================================================================

    /// Unlabeled sequence-wrapper; its type derives from the items.
    pub fn block(&mut self, items: Vec<ExprId>) -> ExprId {
        let ty = self.derive_block_ty(&items);
        self.emit(Expr::Block {
            label: None,
            items,
            ty,
        })
    }

    /// Two-element sequence.
    pub fn sequence(&mut self, first: ExprId, second: ExprId) -> ExprId {
        self.block(vec![first, second])
    }

    /// Labeled block. The type is explicit because branches carrying
    /// values can exit the block before its final item.
    pub fn block_labeled(
        &mut self,
        label: impl Into<String>,
        items: Vec<ExprId>,
        ty: Type,
    ) -> ExprId {
        self.emit(Expr::Block {
            label: Some(label.into()),
            items,
            ty,
        })
    }

    pub fn loop_(&mut self, label: Option<String>, body: ExprId, ty: Type) -> ExprId {
        self.emit(Expr::Loop { label, body, ty })
    }

    pub fn if_(
        &mut self,
        cond: ExprId,
        then_arm: ExprId,
        else_arm: Option<ExprId>,
        ty: Type,
    ) -> ExprId {
        self.emit(Expr::If {
            cond,
            then_arm,
            else_arm,
            ty,
        })
    }

    pub fn br(&mut self, label: impl Into<String>, value: Option<ExprId>) -> ExprId {
        self.emit(Expr::Br {
            label: label.into(),
            value,
            cond: None,
        })
    }

    pub fn br_if(
        &mut self,
        label: impl Into<String>,
        value: Option<ExprId>,
        cond: ExprId,
    ) -> ExprId {
        self.emit(Expr::Br {
            label: label.into(),
            value,
            cond: Some(cond),
        })
    }

    pub fn try_(&mut self, body: ExprId, catch_body: ExprId, ty: Type) -> ExprId {
        self.emit(Expr::Try {
            body,
            catch_body,
            ty,
        })
    }

    /// An unlabeled block takes the type of its final item; any
    /// unreachable item makes the whole sequence unreachable.
    fn derive_block_ty(&self, items: &[ExprId]) -> Type {
        if items
            .iter()
            .any(|&id| self.module.exprs[id].ty().is_unreachable())
        {
            return Type::Unreachable;
        }
        match items.last() {
            Some(&last) => self.module.exprs[last].ty(),
            None => Type::None,
        }
    }
}
