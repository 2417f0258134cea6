pub mod code_pushing;
