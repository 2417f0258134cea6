use crate::module::Module;

pub trait Pass {
    fn name(&self) -> &str;

    /// Whether the pass works on each function independently, with no
    /// module-level state shared between them.
    fn is_function_parallel(&self) -> bool {
        false
    }

    /// Whether locals of non-defaultable types may need fixups after
    /// the pass runs. Passes that never move a set before its first
    /// execution point can opt out.
    fn requires_non_nullable_local_fixups(&self) -> bool {
        true
    }

    fn run<'a>(&mut self, module: &mut Module<'a>, options: &OptimizationOptions);
}

#[derive(Debug, Clone)]
pub struct OptimizationOptions {
    pub debug: bool,
    pub optimize_level: u32,
    pub shrink_level: u32,
    /// Assume no trap is ever reached at runtime. Loads, stores,
    /// divisions and the like are then treated as non-trapping for
    /// effect purposes.
    pub traps_never_happen: bool,
}

impl Default for OptimizationOptions {
    fn default() -> Self {
        Self {
            debug: false,
            optimize_level: 0,
            shrink_level: 0,
            traps_never_happen: false,
        }
    }
}

impl OptimizationOptions {
    pub fn o0() -> Self {
        Self {
            optimize_level: 0,
            shrink_level: 0,
            ..Default::default()
        }
    }

    pub fn o1() -> Self {
        Self {
            optimize_level: 1,
            shrink_level: 0,
            ..Default::default()
        }
    }

    pub fn o2() -> Self {
        Self {
            optimize_level: 2,
            shrink_level: 0,
            ..Default::default()
        }
    }

    pub fn o3() -> Self {
        Self {
            optimize_level: 3,
            shrink_level: 0,
            ..Default::default()
        }
    }

    pub fn os() -> Self {
        Self {
            optimize_level: 2,
            shrink_level: 1,
            ..Default::default()
        }
    }

    pub fn oz() -> Self {
        Self {
            optimize_level: 2,
            shrink_level: 2,
            ..Default::default()
        }
    }
}

pub struct PassRunner {
    passes: Vec<Box<dyn Pass>>,
    options: OptimizationOptions,
}

impl Default for PassRunner {
    fn default() -> Self {
        Self::new(OptimizationOptions::default())
    }
}

impl PassRunner {
    pub fn new(options: OptimizationOptions) -> Self {
        Self {
            passes: Vec::new(),
            options,
        }
    }

    pub fn options(&self) -> &OptimizationOptions {
        &self.options
    }

    pub fn add<P: Pass + 'static>(&mut self, pass: P) {
        self.passes.push(Box::new(pass));
    }

    /// The main entry point for -O1, -O2, etc.
    pub fn add_default_optimization_passes(&mut self) {
        if self.options.optimize_level == 0 && self.options.shrink_level == 0 {
            return; // -O0: no optimizations
        }

        if self.options.optimize_level >= 2 || self.options.shrink_level >= 2 {
            self.add(crate::passes::code_pushing::CodePushing);
        }
    }

    pub fn get_all_pass_names() -> Vec<&'static str> {
        vec!["code-pushing"]
    }

    pub fn add_by_name(&mut self, name: &str) -> bool {
        match name {
            "code-pushing" => self.add(crate::passes::code_pushing::CodePushing),
            _ => return false,
        }
        true
    }

    pub fn pass_names(&self) -> Vec<&str> {
        self.passes.iter().map(|pass| pass.name()).collect()
    }

    pub fn run<'a>(&mut self, module: &mut Module<'a>) {
        for pass in &mut self.passes {
            if self.options.debug {
                eprintln!("running pass: {}", pass.name());
            }
            pass.run(module, &self.options);
        }
    }
}
