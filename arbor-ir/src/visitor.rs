use crate::expression::{ExprRef, ExpressionKind};

pub trait Visitor<'a> {
    fn visit(&mut self, expr: &mut ExprRef<'a>) {
        self.visit_expression(expr);
        self.visit_children(expr);
    }

    fn visit_expression(&mut self, _expr: &mut ExprRef<'a>) {}

    fn visit_children(&mut self, expr: &mut ExprRef<'a>) {
        match &mut expr.kind {
            ExpressionKind::Block { list, .. } => {
                for child in list.iter_mut() {
                    self.visit(child);
                }
            }
            ExpressionKind::Unary { value, .. } => {
                self.visit(value);
            }
            ExpressionKind::Binary { left, right, .. } => {
                self.visit(left);
                self.visit(right);
            }
            ExpressionKind::Call { operands, .. } => {
                for operand in operands.iter_mut() {
                    self.visit(operand);
                }
            }
            ExpressionKind::CallIndirect {
                target, operands, ..
            } => {
                self.visit(target);
                for operand in operands.iter_mut() {
                    self.visit(operand);
                }
            }
            ExpressionKind::LocalSet { value, .. } | ExpressionKind::LocalTee { value, .. } => {
                self.visit(value);
            }
            ExpressionKind::GlobalSet { value, .. } => {
                self.visit(value);
            }
            ExpressionKind::If {
                condition,
                if_true,
                if_false,
            } => {
                self.visit(condition);
                self.visit(if_true);
                if let Some(false_branch) = if_false {
                    self.visit(false_branch);
                }
            }
            ExpressionKind::Loop { body, .. } => {
                self.visit(body);
            }
            ExpressionKind::Break {
                condition, value, ..
            } => {
                if let Some(cond) = condition {
                    self.visit(cond);
                }
                if let Some(val) = value {
                    self.visit(val);
                }
            }
            ExpressionKind::Switch {
                condition, value, ..
            } => {
                self.visit(condition);
                if let Some(val) = value {
                    self.visit(val);
                }
            }
            ExpressionKind::Return { value } => {
                if let Some(val) = value {
                    self.visit(val);
                }
            }
            ExpressionKind::Drop { value } => {
                self.visit(value);
            }
            ExpressionKind::Select {
                condition,
                if_true,
                if_false,
            } => {
                self.visit(condition);
                self.visit(if_true);
                self.visit(if_false);
            }
            ExpressionKind::Load { ptr, .. } => {
                self.visit(ptr);
            }
            ExpressionKind::Store { ptr, value, .. } => {
                self.visit(ptr);
                self.visit(value);
            }
            ExpressionKind::MemoryGrow { delta } => {
                self.visit(delta);
            }
            ExpressionKind::Unreachable
            | ExpressionKind::Const(_)
            | ExpressionKind::Nop
            | ExpressionKind::LocalGet { .. }
            | ExpressionKind::GlobalGet { .. }
            | ExpressionKind::MemorySize => {}
        }
    }
}

pub trait ReadOnlyVisitor<'a> {
    fn visit(&mut self, expr: ExprRef<'a>) {
        self.visit_expression(expr);
        self.visit_children(expr);
    }

    fn visit_expression(&mut self, _expr: ExprRef<'a>) {}

    fn visit_children(&mut self, expr: ExprRef<'a>) {
        match &expr.kind {
            ExpressionKind::Block { list, .. } => {
                for child in list.iter() {
                    self.visit(*child);
                }
            }
            ExpressionKind::Unary { value, .. } => {
                self.visit(*value);
            }
            ExpressionKind::Binary { left, right, .. } => {
                self.visit(*left);
                self.visit(*right);
            }
            ExpressionKind::Call { operands, .. } => {
                for operand in operands.iter() {
                    self.visit(*operand);
                }
            }
            ExpressionKind::CallIndirect {
                target, operands, ..
            } => {
                self.visit(*target);
                for operand in operands.iter() {
                    self.visit(*operand);
                }
            }
            ExpressionKind::LocalSet { value, .. } | ExpressionKind::LocalTee { value, .. } => {
                self.visit(*value);
            }
            ExpressionKind::GlobalSet { value, .. } => {
                self.visit(*value);
            }
            ExpressionKind::If {
                condition,
                if_true,
                if_false,
            } => {
                self.visit(*condition);
                self.visit(*if_true);
                if let Some(false_branch) = if_false {
                    self.visit(*false_branch);
                }
            }
            ExpressionKind::Loop { body, .. } => {
                self.visit(*body);
            }
            ExpressionKind::Break {
                condition, value, ..
            } => {
                if let Some(cond) = condition {
                    self.visit(*cond);
                }
                if let Some(val) = value {
                    self.visit(*val);
                }
            }
            ExpressionKind::Switch {
                condition, value, ..
            } => {
                self.visit(*condition);
                if let Some(val) = value {
                    self.visit(*val);
                }
            }
            ExpressionKind::Return { value } => {
                if let Some(val) = value {
                    self.visit(*val);
                }
            }
            ExpressionKind::Drop { value } => {
                self.visit(*value);
            }
            ExpressionKind::Select {
                condition,
                if_true,
                if_false,
            } => {
                self.visit(*condition);
                self.visit(*if_true);
                self.visit(*if_false);
            }
            ExpressionKind::Load { ptr, .. } => {
                self.visit(*ptr);
            }
            ExpressionKind::Store { ptr, value, .. } => {
                self.visit(*ptr);
                self.visit(*value);
            }
            ExpressionKind::MemoryGrow { delta } => {
                self.visit(*delta);
            }
            ExpressionKind::Unreachable
            | ExpressionKind::Const(_)
            | ExpressionKind::Nop
            | ExpressionKind::LocalGet { .. }
            | ExpressionKind::GlobalGet { .. }
            | ExpressionKind::MemorySize => {}
        }
    }
}
