//! Pushes assignments to later positions in their block.
//!
//! An assignment to a local that is only read after a conditional exit
//! can move past that exit. If the exit is taken, the assignment never
//! runs, and in programs with many early returns that saves real work.
//! Within an `if (err) return` pattern for example, setup code for the
//! non-error path moves below the check.
//!
//! Only assignments with a very specific shape move: the local must be
//! written exactly once, never read before that write, and all of its
//! reads must sit after the point we push past. The assigned value must
//! also be free of side effects, since pushing makes it execute in
//! strictly fewer program paths.

use crate::effects::EffectAnalyzer;
use crate::expression::{ExprRef, ExpressionKind};
use crate::module::{Function, Module};
use crate::pass::{OptimizationOptions, Pass};
use crate::visitor::{ReadOnlyVisitor, Visitor};
use bumpalo::collections::Vec as BumpVec;
use std::collections::HashMap;

/// Per-slot facts from one walk over the function body: how often each
/// local is read and written, and whether it is single-first-assignment
/// (written exactly once, and that write precedes every read).
struct LocalAnalyzer {
    sfa: Vec<bool>,
    num_sets: Vec<u32>,
    num_gets: Vec<u32>,
}

impl LocalAnalyzer {
    fn analyze<'a>(func: &Function<'a>) -> Self {
        let num_locals = func.num_locals() as usize;
        let mut analyzer = LocalAnalyzer {
            sfa: vec![false; num_locals],
            num_sets: vec![0; num_locals],
            num_gets: vec![0; num_locals],
        };
        // Params arrive pre-assigned, so they can never qualify.
        for i in func.num_params() as usize..num_locals {
            analyzer.sfa[i] = true;
        }
        if let Some(body) = func.body {
            analyzer.visit(body);
        }
        for i in 0..num_locals {
            if analyzer.num_sets[i] == 0 {
                analyzer.sfa[i] = false;
            }
        }
        analyzer
    }

    fn is_sfa(&self, index: u32) -> bool {
        self.sfa[index as usize]
    }

    fn get_num_gets(&self, index: u32) -> u32 {
        self.num_gets[index as usize]
    }
}

impl<'a> ReadOnlyVisitor<'a> for LocalAnalyzer {
    // Children before parents, so a get nested inside the value of the
    // first set is seen while the set count is still zero.
    fn visit(&mut self, expr: ExprRef<'a>) {
        self.visit_children(expr);
        self.visit_expression(expr);
    }

    fn visit_expression(&mut self, expr: ExprRef<'a>) {
        match &expr.kind {
            ExpressionKind::LocalGet { index } => {
                let i = *index as usize;
                self.num_gets[i] += 1;
                if self.num_sets[i] == 0 {
                    self.sfa[i] = false;
                }
            }
            ExpressionKind::LocalSet { index, .. } | ExpressionKind::LocalTee { index, .. } => {
                let i = *index as usize;
                self.num_sets[i] += 1;
                if self.num_sets[i] > 1 {
                    self.sfa[i] = false;
                }
            }
            _ => {}
        }
    }
}

/// A point it is worth pushing past: structured branching, or a
/// conditional exit. An unconditional branch is not one, as everything
/// after it in the block is unreachable anyway.
fn is_push_point<'a>(expr: ExprRef<'a>) -> bool {
    let mut curr = expr;
    // A dropped conditional break still decides whether control leaves.
    if let ExpressionKind::Drop { value } = &curr.kind {
        curr = *value;
    }
    match &curr.kind {
        ExpressionKind::If { .. } => true,
        ExpressionKind::Break { condition, .. } => condition.is_some(),
        _ => false,
    }
}

/// Looks for assignments to push later in one block's statement list.
/// Candidate effect descriptors are memoized for the lifetime of this
/// one block's rewrite and discarded with it.
struct Pusher<'p, 'a> {
    list: &'p mut BumpVec<'a, ExprRef<'a>>,
    analyzer: &'p LocalAnalyzer,
    num_gets_so_far: &'p [u32],
    options: &'p OptimizationOptions,
    pushable_effects: HashMap<ExprRef<'a>, EffectAnalyzer>,
}

impl<'p, 'a> Pusher<'p, 'a> {
    fn run(&mut self) {
        // The last statement can never move anywhere, so scanning for
        // candidates stops before it. Scan for a pushable followed,
        // possibly after others, by a push point.
        let relevant = self.list.len() - 1;
        let mut first_pushable = None;
        let mut i = 0;
        while i < relevant {
            let stmt = self.list[i];
            if first_pushable.is_none() && self.is_pushable(stmt) {
                first_pushable = Some(i);
                i += 1;
                continue;
            }
            if let (Some(first), true) = (first_pushable, is_push_point(stmt)) {
                // Optimize this segment, then proceed from where the
                // rewrite tells us. Pushed statements may be pushable
                // again, past a later point.
                i = self.optimize_segment(first, i);
                first_pushable = None;
                continue;
            }
            i += 1;
        }
    }

    /// A pushable statement assigns a single-first-assignment local
    /// whose reads all lie ahead of us, with a side-effect-free value.
    fn is_pushable(&self, expr: ExprRef<'a>) -> bool {
        let ExpressionKind::LocalSet { index, value } = &expr.kind else {
            return false;
        };
        self.analyzer.is_sfa(*index)
            && self.num_gets_so_far[*index as usize] == self.analyzer.get_num_gets(*index)
            && !EffectAnalyzer::of(self.options, *value).has_side_effects()
    }

    /// Pushes what it can from `[first_pushable, push_point)` to just
    /// after the push point, and returns the index to resume scanning
    /// from.
    fn optimize_segment(&mut self, first_pushable: usize, push_point: usize) -> usize {
        assert!(first_pushable < push_point);
        // Everything that matters if you want to move past the push
        // point. Control transfers out of the block are fine to ignore:
        // every read of a pushable's slot is still ahead, so if control
        // leaves, the assignment was about to become dead anyway.
        let mut cumulative_effects = EffectAnalyzer::new(self.options);
        cumulative_effects.walk(self.list[push_point]);
        cumulative_effects.ignore_control_flow_transfers();
        let mut to_push: Vec<ExprRef<'a>> = Vec::new();
        let mut i = push_point - 1;
        loop {
            let stmt = self.list[i];
            if self.is_pushable(stmt) {
                let options = self.options;
                let effects = self
                    .pushable_effects
                    .entry(stmt)
                    .or_insert_with(|| EffectAnalyzer::of(options, stmt));
                if cumulative_effects.invalidates(effects) {
                    // Can't move this one, so anything pushed from
                    // earlier must get past it as well.
                    cumulative_effects.merge_in(effects);
                } else {
                    to_push.push(stmt);
                }
            } else {
                // Not pushable, but it may block pushing across it.
                cumulative_effects.walk(stmt);
            }
            if i == first_pushable {
                break;
            }
            debug_assert!(i > 0);
            i -= 1;
        }
        if to_push.is_empty() {
            return push_point + 1;
        }
        // Slide everything else down over the gaps the pushed
        // statements leave, then write those out right after the push
        // point. The earliest statements sit at the end of to_push, so
        // iterating it forward restores their original relative order.
        let total = to_push.len();
        let last = total - 1;
        let mut skip = 0;
        for index in first_pushable..=push_point {
            if skip < total && self.list[index] == to_push[last - skip] {
                skip += 1;
            } else if skip > 0 {
                let stmt = self.list[index];
                self.list[index - skip] = stmt;
            }
        }
        assert_eq!(skip, total);
        for (offset, pushed) in to_push.iter().enumerate() {
            self.list[push_point - offset] = *pushed;
        }
        push_point - total + 1
    }
}

struct PushWalker<'p> {
    analyzer: &'p LocalAnalyzer,
    options: &'p OptimizationOptions,
    num_gets_so_far: Vec<u32>,
}

impl<'p, 'a> Visitor<'a> for PushWalker<'p> {
    // Children before parents: by the time a block is processed, the
    // get counts cover everything inside and before it.
    fn visit(&mut self, expr: &mut ExprRef<'a>) {
        self.visit_children(expr);
        self.visit_expression(expr);
    }

    fn visit_expression(&mut self, expr: &mut ExprRef<'a>) {
        match &mut expr.kind {
            ExpressionKind::LocalGet { index } => {
                self.num_gets_so_far[*index as usize] += 1;
            }
            ExpressionKind::Block { list, .. } => {
                // Pushing needs a pushable, a push point, and at least
                // one statement after the push point.
                if list.len() >= 3 {
                    let mut pusher = Pusher {
                        list,
                        analyzer: self.analyzer,
                        num_gets_so_far: &self.num_gets_so_far,
                        options: self.options,
                        pushable_effects: HashMap::new(),
                    };
                    pusher.run();
                }
            }
            _ => {}
        }
    }
}

/// Moves assignments to single-assignment locals later in their block,
/// past conditional exits that might skip all of their uses.
pub struct CodePushing;

impl CodePushing {
    pub fn run_on_function<'a>(func: &mut Function<'a>, options: &OptimizationOptions) {
        let analyzer = LocalAnalyzer::analyze(func);
        let mut walker = PushWalker {
            analyzer: &analyzer,
            options,
            num_gets_so_far: vec![0; func.num_locals() as usize],
        };
        if let Some(body) = &mut func.body {
            walker.visit(body);
        }
    }
}

impl Pass for CodePushing {
    fn name(&self) -> &str {
        "code-pushing"
    }

    fn is_function_parallel(&self) -> bool {
        true
    }

    // Assignments only move later, never earlier, so every use still
    // has the set before it.
    fn requires_non_nullable_local_fixups(&self) -> bool {
        false
    }

    fn run<'a>(&mut self, module: &mut Module<'a>, options: &OptimizationOptions) {
        for func in &mut module.functions {
            Self::run_on_function(func, options);
        }
    }
}
