//! C code generation.
//!
//! Output layout, in order: includes, constants, the runtime library, the
//! print/input helpers, one struct per record type, prototypes for every
//! method and non-main function, method bodies, functions in declaration
//! order and finally `main`.

pub mod call;
pub mod decl;
pub mod expr;
pub mod for_loop;
pub mod function;
pub mod member;
pub mod runtime;
pub mod stmt;
pub mod types;

use mathc_ir::{Function, Program, StringInterner, TypeDef};
use tracing::debug;

use crate::context::CodegenContext;
use crate::CodegenResult;

use self::function::{emit_function, emit_prototype, is_main};
use self::runtime::CRuntime;
use self::types::CTypeMapper;

/// Lowers one program to a C translation unit.
pub struct CCodegen<'a> {
    program: &'a Program,
    ctx: CodegenContext<'a>,
}

impl<'a> CCodegen<'a> {
    pub fn new(program: &'a Program, interner: &'a StringInterner) -> Self {
        Self {
            program,
            ctx: CodegenContext::new(interner, &program.arena),
        }
    }

    /// Generate the whole translation unit.
    pub fn generate(mut self) -> CodegenResult {
        let program = self.program;
        debug!(
            functions = program.functions().count(),
            types = program.type_defs().count(),
            "generating C"
        );

        let needs_time = program
            .imports
            .iter()
            .any(|import| self.ctx.resolve_name(import.module) == "random");
        CRuntime::emit_includes(&mut self.ctx, needs_time);
        CRuntime::emit_constants(&mut self.ctx);
        CRuntime::emit_helpers(&mut self.ctx);
        CRuntime::emit_io(&mut self.ctx);

        for def in program.type_defs() {
            self.emit_struct(def);
        }

        let functions: Vec<&Function> = program
            .functions()
            .filter(|func| !is_main(&self.ctx, func, None))
            .collect();

        for def in program.type_defs() {
            for method in def.methods() {
                emit_prototype(&mut self.ctx, method, Some(def.name));
            }
        }
        for func in &functions {
            emit_prototype(&mut self.ctx, func, None);
        }
        self.ctx.newline();

        for def in program.type_defs() {
            for method in def.methods() {
                emit_function(&mut self.ctx, method, Some(def.name));
            }
        }
        for func in functions {
            emit_function(&mut self.ctx, func, None);
        }

        let main = program
            .main
            .as_ref()
            .or_else(|| program.functions().find(|func| is_main(&self.ctx, func, None)));
        match main {
            Some(main) => emit_function(&mut self.ctx, main, None),
            None => {
                self.ctx.writeln("int main(void) {");
                self.ctx.indent();
                self.ctx.writeln("return 0;");
                self.ctx.dedent();
                self.ctx.writeln("}");
            }
        }

        CodegenResult {
            code: self.ctx.take_output(),
            diagnostics: self.ctx.take_diagnostics(),
        }
    }

    fn emit_struct(&mut self, def: &TypeDef) {
        let name = self.ctx.resolve_name(def.name);
        self.ctx.writeln(&format!("typedef struct {name} {{"));
        self.ctx.indent();
        if def.fields().next().is_none() {
            // C forbids empty structs.
            self.ctx.writeln("char _empty;");
        }
        for (ty, field) in def.fields() {
            let c_type = CTypeMapper::map_type(ty, self.ctx.interner);
            let field = self.ctx.resolve_name(field);
            self.ctx.writeln(&format!("{c_type} {field};"));
        }
        self.ctx.dedent();
        self.ctx.writeln(&format!("}} {name};"));
        self.ctx.newline();
    }
}
