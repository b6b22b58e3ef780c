//! Compact s-expression form of the IR, for debugging and test assertions.

use std::fmt::Write;

use super::expr::{BinaryOp, Expr, ExprId, UnaryOp};
use super::module::Module;

fn binary_op_name(op: BinaryOp) -> &'static str {
    match op {
        BinaryOp::Add => "add",
        BinaryOp::Sub => "sub",
        BinaryOp::Mul => "mul",
        BinaryOp::Div => "div",
        BinaryOp::Rem => "rem",
        BinaryOp::And => "and",
        BinaryOp::Or => "or",
        BinaryOp::Xor => "xor",
        BinaryOp::Shl => "shl",
        BinaryOp::Shr => "shr",
        BinaryOp::Eq => "eq",
        BinaryOp::Ne => "ne",
        BinaryOp::Lt => "lt",
        BinaryOp::Le => "le",
        BinaryOp::Gt => "gt",
        BinaryOp::Ge => "ge",
    }
}

fn unary_op_name(op: UnaryOp) -> &'static str {
    match op {
        UnaryOp::Eqz => "eqz",
        UnaryOp::Neg => "neg",
        UnaryOp::Abs => "abs",
        UnaryOp::Clz => "clz",
    }
}

fn print_into(module: &Module, id: ExprId, out: &mut String) {
    let list = |out: &mut String, head: &str, children: &[ExprId]| {
        out.push('(');
        out.push_str(head);
        for &child in children {
            out.push(' ');
            print_into(module, child, out);
        }
        out.push(')');
    };

    match &module.exprs[id] {
        Expr::Nop => out.push_str("(nop)"),
        Expr::Unreachable => out.push_str("(unreachable)"),
        Expr::Const(lit) => {
            let _ = write!(out, "({lit})");
        }
        Expr::LocalGet { index, .. } => {
            let _ = write!(out, "(local.get {index})");
        }
        Expr::LocalSet { index, value } => {
            list(out, &format!("local.set {index}"), &[*value]);
        }
        Expr::GlobalGet { name, .. } => {
            let _ = write!(out, "(global.get ${name})");
        }
        Expr::GlobalSet { name, value } => {
            list(out, &format!("global.set ${name}"), &[*value]);
        }
        Expr::Load { ptr, ty } => {
            list(out, &format!("{ty}.load"), &[*ptr]);
        }
        Expr::Store { ptr, value } => {
            list(out, "store", &[*ptr, *value]);
        }
        Expr::Unary { op, operand, .. } => {
            list(out, unary_op_name(*op), &[*operand]);
        }
        Expr::Binary { op, lhs, rhs, .. } => {
            list(out, binary_op_name(*op), &[*lhs, *rhs]);
        }
        Expr::Call { target, args, .. } => {
            list(out, &format!("call ${target}"), args);
        }
        Expr::Block { label, items, .. } => {
            let head = match label {
                Some(l) => format!("block ${l}"),
                None => "block".to_string(),
            };
            list(out, &head, items);
        }
        Expr::Loop { label, body, .. } => {
            let head = match label {
                Some(l) => format!("loop ${l}"),
                None => "loop".to_string(),
            };
            list(out, &head, &[*body]);
        }
        Expr::If {
            cond,
            then_arm,
            else_arm,
            ..
        } => {
            let mut children = vec![*cond, *then_arm];
            children.extend(else_arm);
            list(out, "if", &children);
        }
        Expr::Br { label, value, cond } => {
            let head = if cond.is_some() {
                format!("br_if ${label}")
            } else {
                format!("br ${label}")
            };
            let mut children = Vec::new();
            children.extend(value);
            children.extend(cond);
            list(out, &head, &children);
        }
        Expr::Return { value } => {
            let children: Vec<ExprId> = value.iter().copied().collect();
            list(out, "return", &children);
        }
        Expr::Drop { value } => {
            list(out, "drop", &[*value]);
        }
        Expr::Try {
            body, catch_body, ..
        } => {
            list(out, "try", &[*body, *catch_body]);
        }
        Expr::Pop { ty } => {
            let _ = write!(out, "(pop {ty})");
        }
    }
}

/// Render an expression tree as a single-line s-expression.
pub fn print_expr(module: &Module, id: ExprId) -> String {
    let mut out = String::new();
    print_into(module, id, &mut out);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{Builder, Type};

    #[test]
    fn prints_nested_structure() {
        let mut module = Module::new("test");
        let mut b = Builder::new(&mut module);
        let x = b.local_get(0, Type::I32);
        let call = b.call("f", &[x], Type::I32);
        let d = b.drop_(call);
        let n = b.nop();
        let block = b.block(vec![d, n]);
        assert_eq!(
            print_expr(&module, block),
            "(block (drop (call $f (local.get 0))) (nop))"
        );
    }

    #[test]
    fn prints_if_and_branches() {
        let mut module = Module::new("test");
        let mut b = Builder::new(&mut module);
        let c = b.const_i32(1);
        let t = b.br("out", None);
        let e = b.nop();
        let if_ = b.if_(c, t, Some(e), Type::None);
        assert_eq!(
            print_expr(&module, if_),
            "(if (i32.const 1) (br $out) (nop))"
        );
    }
}
