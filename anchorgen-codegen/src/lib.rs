//! Context builder, type resolver, and Go-client emitter (§2 steps 2-6).
//!
//! [`generate`] is the single entry point: build the context, run every
//! emitter, and hand back the in-memory file set. Nothing is written to
//! disk here — that is `sink::write_files`'s job, called only once every
//! file in the set has been produced without error (§5 "no partial output
//! is committed").

pub mod accounts;
pub mod addresses;
pub mod constants;
pub mod context;
pub mod dispatch;
pub mod enums;
pub mod error;
pub mod errors;
pub mod events;
pub mod flatten;
pub mod instruction;
pub mod naming;
pub mod pda;
pub mod resolve;
pub mod sink;
pub mod structs;
pub mod tests_emit;

use anchorgen_idl::types::Idl;
use context::GenContext;
use error::GenError;
use naming::to_snake_case;
use sink::GeneratedFile;

#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    pub emit_tests: bool,
}

/// Runs every cross-cutting and per-instruction emitter over `idl` and
/// returns the full in-memory file set (§6 "Output file set"). Collects
/// files in a fixed, deterministic order per file so that two runs over
/// the same input produce byte-identical output (§8 "Deterministic
/// output").
pub fn generate(idl: &Idl, options: &GenerateOptions) -> Result<Vec<GeneratedFile>, GenError> {
    match generate_inner(idl, options) {
        Ok(files) => Ok(files),
        Err(err) => {
            tracing::error!(program = %idl.program_name(), %err, "code generation failed");
            Err(err)
        }
    }
}

fn generate_inner(idl: &Idl, options: &GenerateOptions) -> Result<Vec<GeneratedFile>, GenError> {
    let mut ctx = GenContext::build(idl)?;
    let mut files = Vec::new();

    files.push(emit_types_file(&mut ctx, idl)?);
    files.push(emit_accounts_file(&mut ctx, idl)?);
    files.push(emit_events_file(&mut ctx, idl)?);
    files.push(GeneratedFile {
        relative_path: "errors.go".to_string(),
        contents: wrap_package(&ctx, &errors::emit_errors(&idl.errors)),
    });
    files.push(GeneratedFile {
        relative_path: "constants.go".to_string(),
        contents: wrap_package(&ctx, &constants::emit_constants(&idl.constants)?),
    });

    let plans: Vec<_> = idl.instructions.iter().map(instruction::plan_instruction).collect();
    for plan in &plans {
        let (body, struct_name) = instruction::emit_instruction(&mut ctx, plan)?;
        let ctor = instruction::emit_new_instruction_fn(&ctx, plan, &struct_name)?;
        let mut contents = body;
        contents.push_str(&ctor);
        files.push(GeneratedFile {
            relative_path: format!("{}.go", to_snake_case(&plan.instruction.name)),
            contents: wrap_package(&ctx, &contents),
        });

        if options.emit_tests {
            let test_body = tests_emit::emit_instruction_fuzz_test(&ctx, plan)?;
            files.push(GeneratedFile {
                relative_path: format!("{}_test.go", to_snake_case(&plan.instruction.name)),
                contents: wrap_package(&ctx, &test_body),
            });
        }
    }

    files.push(GeneratedFile {
        relative_path: "instructions.go".to_string(),
        contents: wrap_package(&ctx, &dispatch::emit_dispatch(&ctx, &idl.instructions)),
    });

    // Addresses is emitted last: it reads the context's address table, which
    // only grows as every other emitter above runs (§3.2, §5 append-only).
    files.push(GeneratedFile {
        relative_path: "addresses.go".to_string(),
        contents: wrap_package(&ctx, &addresses::emit_addresses(&ctx)),
    });

    if options.emit_tests {
        files.push(GeneratedFile {
            relative_path: "test_utils.go".to_string(),
            contents: wrap_package(&ctx, &emit_test_utils()),
        });
    }

    tracing::debug!(program = %ctx.program_name, files = files.len(), "code generation succeeded");
    Ok(files)
}

fn emit_types_file(ctx: &mut GenContext, idl: &Idl) -> Result<GeneratedFile, GenError> {
    use anchorgen_idl::types::TypeDefKind;

    let mut out = String::new();
    for type_def in &idl.types {
        match &type_def.body {
            TypeDefKind::Enum { variants } => {
                if variants.iter().any(|v| !v.is_scalar()) {
                    ctx.mark_emitted(naming::to_pascal_case(&type_def.name));
                    out.push_str(&enums::emit_complex_enum(ctx, &type_def.name, variants)?);
                    out.push('\n');
                    for variant in variants {
                        if variant.fields.is_some() {
                            out.push_str(&enums::emit_variant_encode_decode(ctx, &type_def.name, variant)?);
                            out.push('\n');
                        }
                    }
                    out.push_str(&enums::emit_all_variants_helper(&type_def.name, variants));
                    out.push('\n');
                } else {
                    ctx.mark_emitted(naming::to_pascal_case(&type_def.name));
                    out.push_str(&enums::emit_scalar_enum(&type_def.name, variants));
                    out.push('\n');
                }
            }
            TypeDefKind::Struct { .. } => {
                if let Some(src) = accounts::emit_plain_struct(ctx, type_def)? {
                    out.push_str(&src);
                }
            }
            TypeDefKind::Alias { .. } => {
                // Type aliases carry no independent layout; nothing to emit.
            }
        }
    }

    Ok(GeneratedFile {
        relative_path: "types.go".to_string(),
        contents: wrap_package(ctx, &out),
    })
}

fn emit_accounts_file(ctx: &mut GenContext, idl: &Idl) -> Result<GeneratedFile, GenError> {
    let mut out = String::new();
    for account_def in &idl.accounts {
        out.push_str(&accounts::emit_account(ctx, account_def)?);
    }
    Ok(GeneratedFile {
        relative_path: "accounts.go".to_string(),
        contents: wrap_package(ctx, &out),
    })
}

fn emit_events_file(ctx: &mut GenContext, idl: &Idl) -> Result<GeneratedFile, GenError> {
    let mut out = String::new();
    for event in &idl.events {
        out.push_str(&events::emit_event(ctx, event)?);
    }
    out.push_str(&events::emit_event_registry(&idl.events));
    Ok(GeneratedFile {
        relative_path: "events.go".to_string(),
        contents: wrap_package(ctx, &out),
    })
}

fn emit_test_utils() -> String {
    "// fuzz-test helpers shared by every <instruction>_test.go file in this package.\n".to_string()
}

fn wrap_package(ctx: &GenContext, body: &str) -> String {
    format!("package {}\n\n{}", ctx.package_ident, body)
}
