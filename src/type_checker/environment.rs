use log::trace;

use crate::{
    ast::{
        ast::Ast,
        expressions::Ident,
        statements::{DeclId, DeclKind},
        types::Type,
    },
    Span,
};

use super::symbol_table::SymbolTable;

/// Signatures of the predeclared standard library: name, return type, parameter types.
fn stdlib_signatures() -> Vec<(&'static str, Type, Vec<Type>)> {
    vec![
        ("getInt", Type::Int, vec![]),
        ("putInt", Type::Void, vec![Type::Int]),
        ("putIntLn", Type::Void, vec![Type::Int]),
        ("getFloat", Type::Float, vec![]),
        ("putFloat", Type::Void, vec![Type::Float]),
        ("putFloatLn", Type::Void, vec![Type::Float]),
        ("putBool", Type::Void, vec![Type::Boolean]),
        ("putBoolLn", Type::Void, vec![Type::Boolean]),
        ("putString", Type::Void, vec![Type::String]),
        ("putStringLn", Type::Void, vec![Type::String]),
        ("putLn", Type::Void, vec![]),
    ]
}

/// Per-compilation standard environment.
///
/// Builds the standard library declarations inside the program's arena so
/// calls to them bind and check exactly like user functions.
#[derive(Debug, Clone, Default)]
pub struct StdEnvironment {
    pub functions: Vec<DeclId>,
}

impl StdEnvironment {
    /// Pushes the standard library into `ast` and declares it in the global scope of `symbols`.
    pub fn install(ast: &mut Ast, symbols: &mut SymbolTable) -> Self {
        let signatures = stdlib_signatures();
        let mut functions = Vec::with_capacity(signatures.len());

        for (name, return_type, param_types) in signatures {
            let params = param_types
                .into_iter()
                .enumerate()
                .map(|(index, ty)| {
                    ast.push_decl(
                        DeclKind::Param,
                        Ident::new(format!("i{}", index), Span::dummy()),
                        ty,
                        Span::dummy(),
                    )
                })
                .collect();

            let decl = ast.push_decl(
                DeclKind::Func {
                    params,
                    body: None,
                    has_return: false,
                },
                Ident::new(name.to_string(), Span::dummy()),
                return_type,
                Span::dummy(),
            );
            symbols.insert(name, decl);
            functions.push(decl);
        }

        trace!("Installed {} standard library functions", functions.len());
        StdEnvironment { functions }
    }

    pub fn contains(&self, decl: DeclId) -> bool {
        self.functions.contains(&decl)
    }
}
