//! PDA seed resolution and derivation emission (§4.7, §8 S4, §9 "PDA seed
//! parameter order").

use crate::context::GenContext;
use crate::error::GenError;
use crate::flatten::FlatAccount;
use crate::naming::{find_address_fn, find_address_with_bump_fn, must_address_fn, to_pascal_case};
use crate::resolve::go_type;
use anchorgen_idl::types::*;

#[derive(Debug, Clone)]
pub enum ResolvedSeed {
    /// A byte literal embedded directly in the derivation body.
    Const(Vec<u8>),
    /// A runtime parameter the caller must supply.
    Param { name: String, go_type: String },
}

#[derive(Debug, Clone)]
pub struct PdaPlan {
    pub account_name: String,
    pub seeds: Vec<ResolvedSeed>,
    /// `None` means "use the enclosing program's own id" (§4.7 "Program
    /// seed"). `Some(Const(..))`/`Some(Param{..})` mirror `ResolvedSeed`.
    pub program: Option<ResolvedSeed>,
}

/// Resolves every seed of one account's `pda` against the instruction's
/// args and flattened accounts. Any path that does not resolve is
/// `GenError::Resolution` naming the path (with a fuzzy suggestion from the
/// set of known arg/account names).
pub fn resolve_pda(
    ctx: &GenContext,
    account_name: &str,
    pda: &Pda,
    args: &[Field],
    accounts: &[FlatAccount],
) -> Result<PdaPlan, GenError> {
    let mut seeds = Vec::new();
    for seed in &pda.seeds {
        seeds.push(resolve_seed(ctx, seed, args, accounts)?);
    }
    let program = match &pda.program {
        None => None,
        Some(seed) => Some(resolve_seed(ctx, seed, args, accounts)?),
    };
    Ok(PdaPlan {
        account_name: account_name.to_string(),
        seeds,
        program,
    })
}

fn resolve_seed(
    ctx: &GenContext,
    seed: &Seed,
    args: &[Field],
    accounts: &[FlatAccount],
) -> Result<ResolvedSeed, GenError> {
    match seed {
        Seed::Const { value } => Ok(ResolvedSeed::Const(value.clone())),
        Seed::Arg { path } => resolve_arg_seed(ctx, path, args),
        Seed::Account { path, account } => resolve_account_seed(ctx, path, account.as_deref(), accounts),
    }
}

fn resolve_arg_seed(ctx: &GenContext, path: &str, args: &[Field]) -> Result<ResolvedSeed, GenError> {
    let mut parts = path.splitn(2, '.');
    let head = parts.next().unwrap_or_default();
    let rest = parts.next();

    let arg = args.iter().find(|a| a.name == head).ok_or_else(|| {
        let suggestion = anchorgen_idl::search::suggest(head, args.iter().map(|a| a.name.as_str()))
            .map(|s| s.candidate);
        GenError::Resolution { path: path.to_string(), suggestion }
    })?;

    match rest {
        None => Ok(ResolvedSeed::Param {
            name: head.to_string(),
            go_type: go_type(ctx, &arg.ty)?,
        }),
        Some(field_name) => {
            let type_name = match &arg.ty {
                Type::Defined { defined } => &defined.name,
                _ => {
                    return Err(GenError::Resolution {
                        path: path.to_string(),
                        suggestion: None,
                    })
                }
            };
            let field = resolve_field_in_type(ctx, type_name, field_name, path)?;
            Ok(ResolvedSeed::Param {
                name: format!("{head}_{field_name}"),
                go_type: go_type(ctx, &field.ty)?,
            })
        }
    }
}

fn resolve_account_seed(
    ctx: &GenContext,
    path: &str,
    qualifier: Option<&str>,
    accounts: &[FlatAccount],
) -> Result<ResolvedSeed, GenError> {
    let mut parts = path.splitn(2, '.');
    let head = parts.next().unwrap_or_default();
    let rest = parts.next();

    let account = accounts.iter().find(|a| a.name == head).ok_or_else(|| {
        let suggestion =
            anchorgen_idl::search::suggest(head, accounts.iter().map(|a| a.name.as_str()))
                .map(|s| s.candidate);
        GenError::Resolution { path: path.to_string(), suggestion }
    })?;

    match rest {
        None => {
            if let Some(address) = &account.address {
                return Ok(ResolvedSeed::Const(decode_base58(address)));
            }
            Ok(ResolvedSeed::Param {
                name: head.to_string(),
                go_type: "ag_solanago.PublicKey".to_string(),
            })
        }
        Some(field_name) => {
            let type_name = qualifier.ok_or_else(|| GenError::Resolution {
                path: path.to_string(),
                suggestion: None,
            })?;
            let field = resolve_field_in_type(ctx, type_name, field_name, path)?;
            Ok(ResolvedSeed::Param {
                name: format!("{head}_{field_name}"),
                go_type: go_type(ctx, &field.ty)?,
            })
        }
    }
}

fn resolve_field_in_type<'a>(
    ctx: &'a GenContext,
    type_name: &str,
    field_name: &str,
    full_path: &str,
) -> Result<&'a Field, GenError> {
    let type_def = ctx.lookup_type(type_name).ok_or_else(|| GenError::Resolution {
        path: full_path.to_string(),
        suggestion: None,
    })?;
    let named = match &type_def.body {
        TypeDefKind::Struct { fields: Some(DefinedFields::Named(named)) } => named,
        _ => {
            return Err(GenError::Resolution {
                path: full_path.to_string(),
                suggestion: None,
            })
        }
    };
    named.iter().find(|f| f.name == field_name).ok_or_else(|| {
        let suggestion =
            anchorgen_idl::search::suggest(field_name, named.iter().map(|f| f.name.as_str()))
                .map(|s| s.candidate);
        GenError::Resolution { path: full_path.to_string(), suggestion }
    })
}

fn decode_base58(s: &str) -> Vec<u8> {
    bs58::decode(s).into_vec().unwrap_or_default()
}

/// Parameter list in public-API order (§9 "PDA seed parameter order"):
/// seeds' left-to-right order excluding constants, then the program seed if
/// it is a non-constant reference.
pub fn plan_params(plan: &PdaPlan) -> Vec<(String, String)> {
    let mut params: Vec<(String, String)> = plan
        .seeds
        .iter()
        .filter_map(|s| match s {
            ResolvedSeed::Param { name, go_type } => Some((name.clone(), go_type.clone())),
            ResolvedSeed::Const(_) => None,
        })
        .collect();
    if let Some(ResolvedSeed::Param { name, go_type }) = &plan.program {
        params.push((name.clone(), go_type.clone()));
    }
    params
}

/// Emits the private derivation function, `Find<Account>Address`,
/// `find<account>AddressWithBumpSeed`, and the `Must…` wrappers (§4.6 "PDA
/// helpers").
pub fn emit_pda_helpers(ctx: &GenContext, plan: &PdaPlan) -> String {
    let account = &plan.account_name;
    let params = plan_params(plan);
    let param_decls: Vec<String> = params
        .iter()
        .map(|(n, t)| format!("{n} {t}"))
        .collect();
    let param_names: Vec<String> = params.iter().map(|(n, _)| n.clone()).collect();

    let derive_fn = format!("derive{}Address", to_pascal_case(account));
    let find_fn = find_address_fn(account);
    let find_with_bump_fn = find_address_with_bump_fn(account);
    let must_fn = must_address_fn(account);

    let program_expr = match &plan.program {
        None => match &ctx.program_address {
            Some(addr) => format!("ag_solanago.MustPublicKeyFromBase58(\"{addr}\")"),
            None => "ProgramID".to_string(),
        },
        Some(ResolvedSeed::Const(bytes)) => format!(
            "ag_solanago.PublicKeyFromBytes([]byte{{{}}})",
            bytes.iter().map(|b| b.to_string()).collect::<Vec<_>>().join(", ")
        ),
        Some(ResolvedSeed::Param { name, .. }) => name.clone(),
    };

    let mut decls_with_bump = param_decls.clone();
    decls_with_bump.push("bumpSeed uint8".to_string());

    let mut out = String::new();

    let derive_seeds = render_seed_build(&plan.seeds, "ag_solanago.PublicKey{}, err");
    out.push_str(&format!(
        "func {derive_fn}({decls}, bumpSeed uint8) (ag_solanago.PublicKey, error) {{\n{seeds}\tif bumpSeed != 0 {{\n\t\tseeds = append(seeds, []byte{{bumpSeed}})\n\t\treturn ag_solanago.CreateProgramAddress(seeds, {program})\n\t}}\n\taddr, _, err := ag_solanago.FindProgramAddress(seeds, {program})\n\treturn addr, err\n}}\n\n",
        derive_fn = derive_fn,
        decls = param_decls.join(", "),
        seeds = derive_seeds,
        program = program_expr,
    ));

    let find_seeds = render_seed_build(&plan.seeds, "ag_solanago.PublicKey{}, 0, err");
    out.push_str(&format!(
        "// {find_fn} searches for the canonical bump seed.\nfunc {find_fn}({decls}) (ag_solanago.PublicKey, uint8, error) {{\n{seeds}\treturn ag_solanago.FindProgramAddress(seeds, {program})\n}}\n\n",
        find_fn = find_fn,
        decls = param_decls.join(", "),
        seeds = find_seeds,
        program = program_expr,
    ));

    out.push_str(&format!(
        "// {with_bump} requires the caller's own bump seed.\nfunc {with_bump}({decls}) (ag_solanago.PublicKey, error) {{\n\treturn {derive_fn}({names_with_bump})\n}}\n\n",
        with_bump = find_with_bump_fn,
        decls = decls_with_bump.join(", "),
        derive_fn = derive_fn,
        names_with_bump = {
            let mut names = param_names.clone();
            names.push("bumpSeed".to_string());
            names.join(", ")
        },
    ));

    out.push_str(&format!(
        "func {must_fn}({decls}) ag_solanago.PublicKey {{\n\taddr, _, err := {find_fn}({names})\n\tif err != nil {{\n\t\tpanic(err)\n\t}}\n\treturn addr\n}}\n",
        must_fn = must_fn,
        decls = param_decls.join(", "),
        find_fn = find_fn,
        names = param_names.join(", "),
    ));

    out
}

/// Builds the `seeds` slice one statement at a time (§4.7): const seeds
/// append their literal bytes directly, a pubkey seed appends `.Bytes()`,
/// and any other-typed seed borsh-marshals its value, propagating a marshal
/// failure via `err_return` (the caller's zero-value return tuple, which
/// differs between `derive<Account>Address` and `Find<Account>Address`).
fn render_seed_build(seeds: &[ResolvedSeed], err_return: &str) -> String {
    let mut out = String::new();
    out.push_str(&format!("\tseeds := make([][]byte, 0, {})\n", seeds.len()));
    for seed in seeds {
        match seed {
            ResolvedSeed::Const(bytes) => {
                out.push_str(&format!(
                    "\tseeds = append(seeds, []byte{{{}}})\n",
                    bytes.iter().map(|b| b.to_string()).collect::<Vec<_>>().join(", ")
                ));
            }
            ResolvedSeed::Param { name, go_type } => {
                if go_type == "ag_solanago.PublicKey" {
                    out.push_str(&format!("\tseeds = append(seeds, {name}.Bytes())\n"));
                } else {
                    out.push_str(&format!(
                        "\t{{\n\t\tb, err := ag_binary.MarshalBorsh({name})\n\t\tif err != nil {{\n\t\t\treturn {err_return}\n\t\t}}\n\t\tseeds = append(seeds, b)\n\t}}\n",
                    ));
                }
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::GenContext;

    fn ctx() -> GenContext {
        let idl = Idl {
            address: Some("675kPX9MHTjS2zt1qfr1NYHuzeLXfQM9H24wFSUt1Mp8".into()),
            metadata: Metadata {
                name: "example".into(), version: None, spec: None,
                description: None, repository: None, address: None, dependencies: None,
            },
            docs: vec![], instructions: vec![], accounts: vec![], events: vec![],
            errors: vec![], types: vec![], constants: vec![],
        };
        GenContext::build(&idl).unwrap()
    }

    fn owner_account() -> FlatAccount {
        FlatAccount {
            name: "owner".into(), docs: vec![], writable: false, signer: true,
            optional: false, address: None, pda: None, group_path: vec![],
        }
    }

    #[test]
    fn s4_const_and_account_seed() {
        let pda = Pda {
            seeds: vec![
                Seed::Const { value: b"vault".to_vec() },
                Seed::Account { path: "owner".into(), account: None },
            ],
            program: None,
        };
        let accounts = vec![owner_account()];
        let plan = resolve_pda(&ctx(), "vault", &pda, &[], &accounts).unwrap();
        assert_eq!(plan.seeds.len(), 2);
        let params = plan_params(&plan);
        assert_eq!(params, vec![("owner".to_string(), "ag_solanago.PublicKey".to_string())]);
    }

    #[test]
    fn unresolved_path_is_fatal() {
        let pda = Pda {
            seeds: vec![Seed::Account { path: "nope".into(), account: None }],
            program: None,
        };
        let accounts = vec![owner_account()];
        let result = resolve_pda(&ctx(), "vault", &pda, &[], &accounts);
        assert!(matches!(result, Err(GenError::Resolution { .. })));
    }

    #[test]
    fn fixed_address_account_seed_becomes_const() {
        let mut acc = owner_account();
        acc.address = Some("11111111111111111111111111111111".to_string());
        let pda = Pda {
            seeds: vec![Seed::Account { path: "owner".into(), account: None }],
            program: None,
        };
        let plan = resolve_pda(&ctx(), "vault", &pda, &[], &[acc]).unwrap();
        assert!(matches!(plan.seeds[0], ResolvedSeed::Const(_)));
        assert!(plan_params(&plan).is_empty());
    }

    #[test]
    fn non_pubkey_arg_seed_is_borsh_marshaled_not_a_fabricated_helper() {
        let pda = Pda {
            seeds: vec![Seed::Arg { path: "id".into() }],
            program: None,
        };
        let args = vec![Field { name: "id".into(), docs: vec![], ty: Type::Simple(Simple::U64) }];
        let plan = resolve_pda(&ctx(), "vault", &pda, &args, &[]).unwrap();
        let src = emit_pda_helpers(&ctx(), &plan);
        assert!(src.contains("ag_binary.MarshalBorsh(id)"));
        assert!(!src.contains("uint64Bytes("));
    }
}
