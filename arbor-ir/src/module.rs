use crate::expression::ExprRef;
use arbor_core::{Signature, Type};

/// A function: a signature, a slot table (parameters followed by
/// declared locals) and a body expression tree.
#[derive(Debug)]
pub struct Function<'a> {
    pub name: String,
    pub sig: Signature,
    pub vars: Vec<Type>,
    pub body: Option<ExprRef<'a>>,
}

impl<'a> Function<'a> {
    pub fn new(
        name: String,
        params: Vec<Type>,
        results: Type,
        vars: Vec<Type>,
        body: Option<ExprRef<'a>>,
    ) -> Self {
        Self {
            name,
            sig: Signature::new(params, results),
            vars,
            body,
        }
    }

    pub fn num_params(&self) -> u32 {
        self.sig.params.len() as u32
    }

    pub fn num_locals(&self) -> u32 {
        (self.sig.params.len() + self.vars.len()) as u32
    }

    pub fn is_param(&self, index: u32) -> bool {
        (index as usize) < self.sig.params.len()
    }

    pub fn local_type(&self, index: u32) -> Option<Type> {
        let index = index as usize;
        if index < self.sig.params.len() {
            self.sig.params.get(index).copied()
        } else {
            self.vars.get(index - self.sig.params.len()).copied()
        }
    }
}

#[derive(Debug, Default)]
pub struct Module<'a> {
    pub functions: Vec<Function<'a>>,
}

impl<'a> Module<'a> {
    pub fn new() -> Self {
        Self {
            functions: Vec::new(),
        }
    }

    pub fn add_function(&mut self, func: Function<'a>) {
        self.functions.push(func);
    }

    pub fn get_function(&self, name: &str) -> Option<&Function<'a>> {
        self.functions.iter().find(|f| f.name == name)
    }

    pub fn get_function_mut(&mut self, name: &str) -> Option<&mut Function<'a>> {
        self.functions.iter_mut().find(|f| f.name == name)
    }
}
