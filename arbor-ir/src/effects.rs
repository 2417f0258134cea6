//! Effect analysis for tree-IR expressions.
//!
//! Optimization passes use effects to decide whether expressions can be
//! reordered, relocated, or removed. Flag-level effects are bitflags for
//! cheap composition; on top of them [`EffectAnalyzer`] tracks which
//! local slots are read and written, since a flag alone cannot tell a
//! hazard on one slot from harmless traffic on another.

use crate::expression::{ExprRef, ExpressionKind};
use crate::pass::OptimizationOptions;
use bitflags::bitflags;
use std::collections::BTreeSet;

bitflags! {
    /// The side effects an expression may have.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Effect: u32 {
        /// No observable side effects.
        const NONE = 0;

        /// May read from linear memory.
        const MEMORY_READ = 1 << 0;

        /// May write to linear memory.
        const MEMORY_WRITE = 1 << 1;

        /// May read from a global variable.
        const GLOBAL_READ = 1 << 2;

        /// May write to a global variable.
        const GLOBAL_WRITE = 1 << 3;

        /// May write to a local slot.
        const LOCAL_WRITE = 1 << 4;

        /// May trap (division by zero, out-of-bounds access, bad
        /// conversion).
        const MAY_TRAP = 1 << 5;

        /// Definitely traps (unreachable).
        const TRAPS = 1 << 6;

        /// Performs a function call; arbitrary memory and global effects.
        const CALLS = 1 << 7;

        /// Transfers control flow (break, return, structured branching).
        const BRANCHES = 1 << 8;

        /// May throw an exception.
        const THROWS = 1 << 9;

        /// May grow memory.
        const GROWS = 1 << 10;

        /// Reads shared state (memory, globals).
        const READS = Self::MEMORY_READ.bits() | Self::GLOBAL_READ.bits();

        /// Writes any state (memory, globals, locals).
        const WRITES = Self::MEMORY_WRITE.bits() | Self::GLOBAL_WRITE.bits() | Self::LOCAL_WRITE.bits();

        /// Writes state visible outside the current function.
        const WRITES_SHARED = Self::MEMORY_WRITE.bits() | Self::GLOBAL_WRITE.bits() | Self::GROWS.bits();

        /// Anything that could change program behavior if the expression
        /// were skipped. Possible traps count: making a trap conditional
        /// is observable.
        const SIDE_EFFECTS = Self::WRITES.bits() | Self::CALLS.bits() | Self::MAY_TRAP.bits()
            | Self::TRAPS.bits() | Self::THROWS.bits() | Self::BRANCHES.bits() | Self::GROWS.bits();
    }
}

impl Effect {
    #[inline]
    pub fn is_pure(self) -> bool {
        self == Effect::NONE
    }

    #[inline]
    pub fn may_trap(self) -> bool {
        self.intersects(Effect::MAY_TRAP | Effect::TRAPS)
    }

    #[inline]
    pub fn traps(self) -> bool {
        self.contains(Effect::TRAPS)
    }

    #[inline]
    pub fn transfers_control(self) -> bool {
        self.intersects(Effect::BRANCHES | Effect::TRAPS | Effect::THROWS)
    }

    #[inline]
    pub fn calls(self) -> bool {
        self.contains(Effect::CALLS)
    }

    #[inline]
    pub fn reads_memory(self) -> bool {
        self.contains(Effect::MEMORY_READ)
    }

    #[inline]
    pub fn writes_memory(self) -> bool {
        self.contains(Effect::MEMORY_WRITE)
    }

    #[inline]
    pub fn reads_global(self) -> bool {
        self.contains(Effect::GLOBAL_READ)
    }

    #[inline]
    pub fn writes_global(self) -> bool {
        self.contains(Effect::GLOBAL_WRITE)
    }

    #[inline]
    pub fn writes_local(self) -> bool {
        self.contains(Effect::LOCAL_WRITE)
    }

    #[inline]
    pub fn has_side_effects(self) -> bool {
        self.intersects(Effect::SIDE_EFFECTS)
    }

    #[inline]
    pub fn reads_state(self) -> bool {
        self.intersects(Effect::READS)
    }

    #[inline]
    pub fn writes_state(self) -> bool {
        self.intersects(Effect::WRITES)
    }

    #[inline]
    pub fn writes_shared_state(self) -> bool {
        self.intersects(Effect::WRITES_SHARED)
    }

    /// Flag-level reordering hazard between two expressions: true when
    /// evaluating them in the other order could be observable. Local
    /// slot hazards are per-index and handled by [`EffectAnalyzer`],
    /// not here.
    pub fn interferes_with(self, other: Effect) -> bool {
        // Memory hazards
        if self.writes_memory() && (other.reads_memory() || other.writes_memory()) {
            return true;
        }
        if other.writes_memory() && self.reads_memory() {
            return true;
        }

        // Global hazards
        if self.writes_global() && (other.reads_global() || other.writes_global()) {
            return true;
        }
        if other.writes_global() && self.reads_global() {
            return true;
        }

        // Growing memory changes what any size query or bounds-checked
        // access observes.
        if self.contains(Effect::GROWS)
            && other.intersects(Effect::MEMORY_READ | Effect::MEMORY_WRITE | Effect::GROWS)
        {
            return true;
        }
        if other.contains(Effect::GROWS)
            && self.intersects(Effect::MEMORY_READ | Effect::MEMORY_WRITE)
        {
            return true;
        }

        // A call may read or write any memory or global state, but it
        // cannot touch the caller's local slots.
        if self.calls() && (other.reads_state() || other.writes_shared_state() || other.calls()) {
            return true;
        }
        if other.calls() && (self.reads_state() || self.writes_shared_state()) {
            return true;
        }

        // Reordering a possible trap relative to another trap, a control
        // transfer, or a shared-state write changes what the rest of the
        // program can observe when the trap fires.
        if self.may_trap()
            && (other.may_trap()
                || other.transfers_control()
                || other.writes_shared_state()
                || other.calls())
        {
            return true;
        }
        if other.may_trap()
            && (self.transfers_control() || self.writes_shared_state() || self.calls())
        {
            return true;
        }

        false
    }
}

impl Default for Effect {
    fn default() -> Self {
        Effect::NONE
    }
}

/// Accumulated effect descriptor for one or more expressions.
///
/// Beyond the flag summary it records exactly which local slots were
/// read and written, and can be told to ignore control-flow transfers
/// (break/return/throw) when the caller has proven the transfer itself
/// is harmless to the reordering at hand.
#[derive(Debug, Clone)]
pub struct EffectAnalyzer {
    pub effects: Effect,
    pub locals_read: BTreeSet<u32>,
    pub locals_written: BTreeSet<u32>,
    ignore_control_transfers: bool,
    traps_never_happen: bool,
}

const CONTROL_TRANSFERS: Effect = Effect::BRANCHES.union(Effect::THROWS);

impl EffectAnalyzer {
    pub fn new(options: &OptimizationOptions) -> Self {
        Self {
            effects: Effect::NONE,
            locals_read: BTreeSet::new(),
            locals_written: BTreeSet::new(),
            ignore_control_transfers: false,
            traps_never_happen: options.traps_never_happen,
        }
    }

    /// Computes the descriptor of a single expression tree.
    pub fn of<'a>(options: &OptimizationOptions, expr: ExprRef<'a>) -> Self {
        let mut analyzer = Self::new(options);
        analyzer.walk(expr);
        analyzer
    }

    /// Folds an expression's effects into this descriptor.
    pub fn walk<'a>(&mut self, expr: ExprRef<'a>) {
        self.walk_expr(expr);
        if self.ignore_control_transfers {
            self.effects -= CONTROL_TRANSFERS;
        }
    }

    /// Stops tracking break/return/throw effects, now and for all
    /// further walks and merges into this descriptor.
    pub fn ignore_control_flow_transfers(&mut self) {
        self.ignore_control_transfers = true;
        self.effects -= CONTROL_TRANSFERS;
    }

    /// Unions another descriptor into this one.
    pub fn merge_in(&mut self, other: &EffectAnalyzer) {
        self.effects |= other.effects;
        if self.ignore_control_transfers {
            self.effects -= CONTROL_TRANSFERS;
        }
        self.locals_read.extend(other.locals_read.iter().copied());
        self.locals_written
            .extend(other.locals_written.iter().copied());
    }

    pub fn has_side_effects(&self) -> bool {
        self.effects.has_side_effects()
    }

    /// Would moving `other` from before this descriptor's effects to
    /// after them (or vice versa) be observable?
    pub fn invalidates(&self, other: &EffectAnalyzer) -> bool {
        if self.effects.interferes_with(other.effects) {
            return true;
        }
        // Per-slot hazards: a write on one side against any access to
        // the same slot on the other.
        if !self.locals_written.is_disjoint(&other.locals_written) {
            return true;
        }
        if !self.locals_written.is_disjoint(&other.locals_read) {
            return true;
        }
        if !self.locals_read.is_disjoint(&other.locals_written) {
            return true;
        }
        false
    }

    fn implicit_trap(&self) -> Effect {
        if self.traps_never_happen {
            Effect::NONE
        } else {
            Effect::MAY_TRAP
        }
    }

    fn walk_expr<'a>(&mut self, expr: ExprRef<'a>) {
        match &expr.kind {
            ExpressionKind::Nop | ExpressionKind::Const(_) => {}

            ExpressionKind::Unreachable => self.effects |= Effect::TRAPS,

            ExpressionKind::Block { list, .. } => {
                for child in list.iter() {
                    self.walk_expr(*child);
                }
            }

            ExpressionKind::Unary { op, value } => {
                if op.can_trap() {
                    self.effects |= self.implicit_trap();
                }
                self.walk_expr(*value);
            }

            ExpressionKind::Binary { op, left, right } => {
                if op.can_trap() {
                    self.effects |= self.implicit_trap();
                }
                self.walk_expr(*left);
                self.walk_expr(*right);
            }

            ExpressionKind::LocalGet { index } => {
                self.locals_read.insert(*index);
            }

            ExpressionKind::LocalSet { index, value }
            | ExpressionKind::LocalTee { index, value } => {
                self.effects |= Effect::LOCAL_WRITE;
                self.locals_written.insert(*index);
                self.walk_expr(*value);
            }

            ExpressionKind::GlobalGet { .. } => self.effects |= Effect::GLOBAL_READ,

            ExpressionKind::GlobalSet { value, .. } => {
                self.effects |= Effect::GLOBAL_WRITE;
                self.walk_expr(*value);
            }

            ExpressionKind::Load { ptr, .. } => {
                self.effects |= Effect::MEMORY_READ | self.implicit_trap();
                self.walk_expr(*ptr);
            }

            ExpressionKind::Store { ptr, value, .. } => {
                self.effects |= Effect::MEMORY_WRITE | self.implicit_trap();
                self.walk_expr(*ptr);
                self.walk_expr(*value);
            }

            ExpressionKind::Call { operands, .. } => {
                self.effects |= Effect::CALLS;
                for operand in operands.iter() {
                    self.walk_expr(*operand);
                }
            }

            ExpressionKind::CallIndirect {
                target, operands, ..
            } => {
                // May trap on a bad table index or signature mismatch.
                self.effects |= Effect::CALLS | self.implicit_trap();
                self.walk_expr(*target);
                for operand in operands.iter() {
                    self.walk_expr(*operand);
                }
            }

            ExpressionKind::If {
                condition,
                if_true,
                if_false,
            } => {
                self.effects |= Effect::BRANCHES;
                self.walk_expr(*condition);
                self.walk_expr(*if_true);
                if let Some(false_branch) = if_false {
                    self.walk_expr(*false_branch);
                }
            }

            ExpressionKind::Loop { body, .. } => {
                self.effects |= Effect::BRANCHES;
                self.walk_expr(*body);
            }

            ExpressionKind::Break {
                condition, value, ..
            } => {
                self.effects |= Effect::BRANCHES;
                if let Some(cond) = condition {
                    self.walk_expr(*cond);
                }
                if let Some(val) = value {
                    self.walk_expr(*val);
                }
            }

            ExpressionKind::Switch {
                condition, value, ..
            } => {
                self.effects |= Effect::BRANCHES;
                self.walk_expr(*condition);
                if let Some(val) = value {
                    self.walk_expr(*val);
                }
            }

            ExpressionKind::Return { value } => {
                self.effects |= Effect::BRANCHES;
                if let Some(val) = value {
                    self.walk_expr(*val);
                }
            }

            ExpressionKind::Drop { value } => self.walk_expr(*value),

            ExpressionKind::Select {
                condition,
                if_true,
                if_false,
            } => {
                self.walk_expr(*condition);
                self.walk_expr(*if_true);
                self.walk_expr(*if_false);
            }

            ExpressionKind::MemorySize => self.effects |= Effect::MEMORY_READ,

            ExpressionKind::MemoryGrow { delta } => {
                self.effects |= Effect::GROWS;
                self.walk_expr(*delta);
            }
        }
        if self.ignore_control_transfers {
            self.effects -= CONTROL_TRANSFERS;
        }
    }
}
