pub mod effects;
pub mod expression;
pub mod module;
pub mod ops;
pub mod pass;
pub mod passes;
pub mod visitor;

pub use effects::{Effect, EffectAnalyzer};
pub use expression::{ExprRef, Expression, ExpressionKind, IrBuilder};
pub use module::{Function, Module};
pub use ops::{BinaryOp, UnaryOp};
pub use pass::{OptimizationOptions, Pass, PassRunner};
pub use passes::code_pushing::CodePushing;
pub use visitor::{ReadOnlyVisitor, Visitor};

#[cfg(test)]
mod tests {
    use super::*;
    use arbor_core::{Literal, Type};
    use bumpalo::collections::Vec as BumpVec;
    use bumpalo::Bump;

    #[test]
    fn test_ir_construction() {
        let bump = Bump::new();
        let builder = IrBuilder::new(&bump);

        let const_expr = builder.const_(Literal::I32(42));

        match const_expr.kind {
            ExpressionKind::Const(Literal::I32(42)) => (),
            _ => panic!("Expected Const(42)"),
        }
        assert_eq!(const_expr.type_, Type::I32);

        let mut list = BumpVec::new_in(&bump);
        list.push(const_expr);

        let block = builder.block(Some("my_block"), list, Type::I32);

        if let ExpressionKind::Block { name, list } = &block.kind {
            assert_eq!(*name, Some("my_block"));
            assert_eq!(list.len(), 1);
        } else {
            panic!("Expected Block");
        }
    }

    #[test]
    fn test_module_construction() {
        let bump = Bump::new();
        let builder = IrBuilder::new(&bump);

        // fn add_one(x: i32) -> i32
        let local_get = builder.local_get(0, Type::I32);
        let const_1 = builder.const_(Literal::I32(1));
        let add = builder.binary(BinaryOp::AddInt32, local_get, const_1, Type::I32);

        let func = Function::new(
            "add_one".to_string(),
            vec![Type::I32],
            Type::I32,
            vec![],
            Some(add),
        );

        let mut module = Module::new();
        module.add_function(func);

        assert!(module.get_function("add_one").is_some());

        let f = module.get_function("add_one").unwrap();
        if let Some(body) = &f.body {
            if let ExpressionKind::Binary { op, .. } = body.kind {
                assert_eq!(op, BinaryOp::AddInt32);
            } else {
                panic!("Expected Binary");
            }
        }
    }

    #[test]
    fn test_optimize_module_end_to_end() {
        let bump = Bump::new();
        let builder = IrBuilder::new(&bump);

        // block $out
        //   x = 10
        //   br_if $out (cond: param 0)
        //   drop(x)
        let set = builder.local_set(1, builder.const_(Literal::I32(10)));
        let br = builder.break_("out", Some(builder.local_get(0, Type::I32)), None, Type::NONE);
        let use_ = builder.drop(builder.local_get(1, Type::I32));
        let body = builder.block(Some("out"), bumpalo::vec![in &bump; set, br, use_], Type::NONE);

        let func = Function::new(
            "early_exit".to_string(),
            vec![Type::I32],
            Type::NONE,
            vec![Type::I32],
            Some(body),
        );

        let mut module = Module::new();
        module.add_function(func);

        let mut runner = PassRunner::new(OptimizationOptions::o2());
        runner.add_default_optimization_passes();
        runner.run(&mut module);

        // The assignment now runs only when the branch is not taken.
        if let ExpressionKind::Block { list, .. } = &body.kind {
            assert_eq!(list[0], br);
            assert_eq!(list[1], set);
            assert_eq!(list[2], use_);
        } else {
            panic!("Expected Block");
        }
    }
}
