//! Constant folding over expression trees.
//!
//! Folds integer unary/binary operators whose operands are literals and
//! selects the taken arm of an `if` with a constant condition. Operations
//! that would trap at runtime (division by zero, `i32::MIN / -1`) are
//! never folded — the trap must still happen.

use crate::error::CoreError;
use crate::ir::{BinaryOp, Expr, ExprId, Literal, Module, UnaryOp};
use crate::pipeline::{Transform, TransformResult};

/// Constant folding transform.
pub struct ConstantFolding;

impl Transform for ConstantFolding {
    fn name(&self) -> &str {
        "constant-folding"
    }

    fn apply(&self, mut module: Module) -> Result<TransformResult, CoreError> {
        let mut changed = false;
        for func_id in module.functions.keys().collect::<Vec<_>>() {
            let body = module.functions[func_id].body;
            let new_body = rewrite(&mut module, body, &mut changed);
            if new_body != body {
                module.functions[func_id].body = new_body;
                changed = true;
            }
        }
        Ok(TransformResult { module, changed })
    }
}

fn rewrite(module: &mut Module, id: ExprId, changed: &mut bool) -> ExprId {
    let children = module.exprs[id].children();
    let mut new_children = Vec::with_capacity(children.len());
    for child in children {
        new_children.push(rewrite(module, child, changed));
    }
    for (slot, new_child) in module.exprs[id].children_mut().into_iter().zip(new_children) {
        if *slot != new_child {
            *slot = new_child;
            *changed = true;
        }
    }

    match module.exprs[id].clone() {
        Expr::Binary { op, lhs, rhs, .. } => {
            let (a, b) = match (&module.exprs[lhs], &module.exprs[rhs]) {
                (Expr::Const(a), Expr::Const(b)) => (*a, *b),
                _ => return id,
            };
            if let Some(lit) = fold_binary(op, a, b) {
                module.exprs[id] = Expr::Const(lit);
                *changed = true;
            }
            id
        }
        Expr::Unary { op, operand, .. } => {
            let v = match &module.exprs[operand] {
                Expr::Const(v) => *v,
                _ => return id,
            };
            if let Some(lit) = fold_unary(op, v) {
                module.exprs[id] = Expr::Const(lit);
                *changed = true;
            }
            id
        }
        Expr::If {
            cond,
            then_arm,
            else_arm,
            ..
        } => {
            let c = match &module.exprs[cond] {
                Expr::Const(c) => *c,
                _ => return id,
            };
            // The condition is a literal, so discarding it loses nothing.
            *changed = true;
            if c.is_truthy() {
                return then_arm;
            }
            if let Some(else_arm) = else_arm {
                return else_arm;
            }
            module.exprs[id] = Expr::Nop;
            id
        }
        _ => id,
    }
}

fn bool_i32(v: bool) -> Literal {
    Literal::I32(v as i32)
}

fn fold_binary(op: BinaryOp, a: Literal, b: Literal) -> Option<Literal> {
    use BinaryOp as B;
    use Literal as L;
    Some(match (a, b) {
        (L::I32(x), L::I32(y)) => match op {
            B::Add => L::I32(x.wrapping_add(y)),
            B::Sub => L::I32(x.wrapping_sub(y)),
            B::Mul => L::I32(x.wrapping_mul(y)),
            B::Div => {
                if y == 0 || (x == i32::MIN && y == -1) {
                    return None;
                }
                L::I32(x / y)
            }
            B::Rem => {
                if y == 0 {
                    return None;
                }
                L::I32(x.wrapping_rem(y))
            }
            B::And => L::I32(x & y),
            B::Or => L::I32(x | y),
            B::Xor => L::I32(x ^ y),
            B::Shl => L::I32(x.wrapping_shl(y as u32)),
            B::Shr => L::I32(x.wrapping_shr(y as u32)),
            B::Eq => bool_i32(x == y),
            B::Ne => bool_i32(x != y),
            B::Lt => bool_i32(x < y),
            B::Le => bool_i32(x <= y),
            B::Gt => bool_i32(x > y),
            B::Ge => bool_i32(x >= y),
        },
        (L::I64(x), L::I64(y)) => match op {
            B::Add => L::I64(x.wrapping_add(y)),
            B::Sub => L::I64(x.wrapping_sub(y)),
            B::Mul => L::I64(x.wrapping_mul(y)),
            B::Div => {
                if y == 0 || (x == i64::MIN && y == -1) {
                    return None;
                }
                L::I64(x / y)
            }
            B::Rem => {
                if y == 0 {
                    return None;
                }
                L::I64(x.wrapping_rem(y))
            }
            B::And => L::I64(x & y),
            B::Or => L::I64(x | y),
            B::Xor => L::I64(x ^ y),
            B::Shl => L::I64(x.wrapping_shl(y as u32)),
            B::Shr => L::I64(x.wrapping_shr(y as u32)),
            B::Eq => bool_i32(x == y),
            B::Ne => bool_i32(x != y),
            B::Lt => bool_i32(x < y),
            B::Le => bool_i32(x <= y),
            B::Gt => bool_i32(x > y),
            B::Ge => bool_i32(x >= y),
        },
        // Floats and mixed widths are left alone.
        _ => return None,
    })
}

fn fold_unary(op: UnaryOp, v: Literal) -> Option<Literal> {
    use Literal as L;
    Some(match (op, v) {
        (UnaryOp::Eqz, L::I32(x)) => bool_i32(x == 0),
        (UnaryOp::Eqz, L::I64(x)) => bool_i32(x == 0),
        (UnaryOp::Clz, L::I32(x)) => L::I32(x.leading_zeros() as i32),
        (UnaryOp::Clz, L::I64(x)) => L::I64(x.leading_zeros() as i64),
        (UnaryOp::Neg, L::F32(x)) => L::F32(-x),
        (UnaryOp::Neg, L::F64(x)) => L::F64(-x),
        (UnaryOp::Abs, L::F32(x)) => L::F32(x.abs()),
        (UnaryOp::Abs, L::F64(x)) => L::F64(x.abs()),
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{print_expr, Builder, Function, Type};

    fn run_once(module: Module) -> (Module, bool) {
        let result = ConstantFolding.apply(module).unwrap();
        (result.module, result.changed)
    }

    fn make_func(module: &mut Module, body: ExprId) {
        module.add_function(Function {
            name: "test".into(),
            params: vec![],
            result: Type::None,
            locals: vec![Type::I32],
            body,
        });
    }

    fn body_text(module: &Module) -> String {
        let func_id = module.functions.keys().next().unwrap();
        print_expr(module, module.functions[func_id].body)
    }

    /// `(2 + 3) * 4` folds in one bottom-up sweep.
    #[test]
    fn folds_nested_arithmetic() {
        let mut module = Module::new("test");
        let body = {
            let mut b = Builder::new(&mut module);
            let two = b.const_i32(2);
            let three = b.const_i32(3);
            let add = b.binary(BinaryOp::Add, two, three, Type::I32);
            let four = b.const_i32(4);
            let mul = b.binary(BinaryOp::Mul, add, four, Type::I32);
            b.drop_(mul)
        };
        make_func(&mut module, body);

        let (module, changed) = run_once(module);
        assert!(changed);
        assert_eq!(body_text(&module), "(drop (i32.const 20))");
    }

    /// i64 arithmetic folds with wrapping semantics like i32.
    #[test]
    fn folds_i64_arithmetic() {
        let mut module = Module::new("test");
        let body = {
            let mut b = Builder::new(&mut module);
            let x = b.const_i64(1 << 40);
            let y = b.const_i64(2);
            let mul = b.binary(BinaryOp::Mul, x, y, Type::I64);
            b.drop_(mul)
        };
        make_func(&mut module, body);

        let (module, changed) = run_once(module);
        assert!(changed);
        assert_eq!(body_text(&module), "(drop (i64.const 2199023255552))");
    }

    /// Float unary operators fold.
    #[test]
    fn float_negation_folds() {
        let mut module = Module::new("test");
        let body = {
            let mut b = Builder::new(&mut module);
            let x = b.const_f64(2.5);
            let neg = b.unary(UnaryOp::Neg, x, Type::F64);
            b.drop_(neg)
        };
        make_func(&mut module, body);

        let (module, changed) = run_once(module);
        assert!(changed);
        assert_eq!(body_text(&module), "(drop (f64.const -2.5))");
    }

    /// Division by a constant zero must not fold — the trap is behavior.
    #[test]
    fn trapping_division_not_folded() {
        let mut module = Module::new("test");
        let body = {
            let mut b = Builder::new(&mut module);
            let one = b.const_i32(1);
            let zero = b.const_i32(0);
            let div = b.binary(BinaryOp::Div, one, zero, Type::I32);
            b.drop_(div)
        };
        make_func(&mut module, body);

        let (module, changed) = run_once(module);
        assert!(!changed);
        assert_eq!(body_text(&module), "(drop (div (i32.const 1) (i32.const 0)))");
    }

    /// Signed overflow division is also a trap.
    #[test]
    fn min_div_minus_one_not_folded() {
        assert_eq!(fold_binary(BinaryOp::Div, Literal::I32(i32::MIN), Literal::I32(-1)), None);
        assert_eq!(fold_binary(BinaryOp::Rem, Literal::I32(i32::MIN), Literal::I32(-1)), Some(Literal::I32(0)));
    }

    #[test]
    fn comparisons_produce_i32() {
        assert_eq!(
            fold_binary(BinaryOp::Lt, Literal::I64(1), Literal::I64(2)),
            Some(Literal::I32(1))
        );
        assert_eq!(
            fold_binary(BinaryOp::Eq, Literal::I32(5), Literal::I32(6)),
            Some(Literal::I32(0))
        );
    }

    #[test]
    fn eqz_folds() {
        assert_eq!(fold_unary(UnaryOp::Eqz, Literal::I32(0)), Some(Literal::I32(1)));
        assert_eq!(fold_unary(UnaryOp::Eqz, Literal::I64(7)), Some(Literal::I32(0)));
    }

    /// A constant condition selects the taken arm.
    #[test]
    fn const_if_selects_arm() {
        let mut module = Module::new("test");
        let body = {
            let mut b = Builder::new(&mut module);
            let cond = b.const_i32(0);
            let a = b.call("a", &[], Type::None);
            let c = b.call("b", &[], Type::None);
            b.if_(cond, a, Some(c), Type::None)
        };
        make_func(&mut module, body);

        let (module, changed) = run_once(module);
        assert!(changed);
        assert_eq!(body_text(&module), "(call $b)");
    }

    /// A falsy condition with no else arm leaves a nop.
    #[test]
    fn const_if_without_else_becomes_nop() {
        let mut module = Module::new("test");
        let body = {
            let mut b = Builder::new(&mut module);
            let cond = b.const_i32(0);
            let a = b.call("a", &[], Type::None);
            b.if_(cond, a, None, Type::None)
        };
        make_func(&mut module, body);

        let (module, changed) = run_once(module);
        assert!(changed);
        assert_eq!(body_text(&module), "(nop)");
    }

    /// Mixed operand widths are left alone.
    #[test]
    fn mixed_widths_not_folded() {
        assert_eq!(fold_binary(BinaryOp::Add, Literal::I32(1), Literal::I64(2)), None);
    }
}
