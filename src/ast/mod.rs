/// AST (Abstract Syntax Tree) module
/// Contains all definitions related to the AST structure
///
/// Submodules:
/// - ast: The node arena, node ids and parent links
/// - expressions: Expression nodes, identifiers and operators
/// - statements: Statement and declaration nodes
/// - types: The VC type representation and its compatibility rules
pub mod ast;
pub mod expressions;
pub mod statements;
pub mod types;
