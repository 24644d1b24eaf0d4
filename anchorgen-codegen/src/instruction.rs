//! Per-instruction emitter (§4.6).
//!
//! Produces one builder struct per instruction: pre-sized account-meta
//! slice, argument/account setters, nested account-group builders, PDA
//! helpers, and the `Build`/`Validate`/`ValidateAndBuild`/`EncodeToTree`
//! quartet described in §4.6 and exercised by §8 scenario S3.

use crate::context::GenContext;
use crate::error::GenError;
use crate::flatten::{flatten, top_level_groups, FlatAccount};
use crate::naming::{
    account_getter_name, account_setter_name, arg_setter_name, discriminator_var_name,
    instruction_struct_name, new_instruction_builder_fn, new_instruction_fn, to_camel_case,
    to_pascal_case,
};
use crate::pda::{emit_pda_helpers, resolve_pda};
use crate::resolve::go_type;
use crate::structs::{fields_from_named, render_fields, EncodeDecodeSpec, OptionPolicy};
use anchorgen_idl::discriminator::instruction_sighash;
use anchorgen_idl::types::*;

pub struct InstructionPlan<'a> {
    pub instruction: &'a Instruction,
    pub struct_name: String,
    pub args: Vec<crate::structs::StructField>,
    pub flat_accounts: Vec<FlatAccount>,
    pub discriminator: [u8; 8],
}

/// Resolves an instruction's discriminator bytes per §4.3: explicit
/// `discriminator` wins, then `discriminant` per its kind, then the Anchor
/// sighash fallback (always 8 bytes regardless of encoding — non-Anchor
/// encodings are distinguished at the dispatch layer, not here).
pub fn resolve_discriminator(instr: &Instruction) -> [u8; 8] {
    if let Some(bytes) = &instr.discriminator {
        let mut out = [0u8; 8];
        let n = bytes.len().min(8);
        out[..n].copy_from_slice(&bytes[..n]);
        return out;
    }
    if let Some(discriminant) = &instr.discriminant {
        let mut out = [0u8; 8];
        match discriminant.kind {
            DiscriminantKind::U8 => out[0] = discriminant.value as u8,
            DiscriminantKind::U32 => out[..4].copy_from_slice(&(discriminant.value as u32).to_le_bytes()),
            DiscriminantKind::Uvarint32 => out[..4].copy_from_slice(&(discriminant.value as u32).to_le_bytes()),
        }
        return out;
    }
    instruction_sighash(&instr.name)
}

pub fn plan_instruction<'a>(instr: &'a Instruction) -> InstructionPlan<'a> {
    InstructionPlan {
        instruction: instr,
        struct_name: instruction_struct_name(&instr.name),
        args: fields_from_named(&instr.args),
        flat_accounts: flatten(&instr.accounts),
        discriminator: resolve_discriminator(instr),
    }
}

/// Emits the full source for one instruction: struct, discriminator
/// constant, encode/decode methods, builder constructor, setters,
/// account-group sub-builders, PDA helpers, and `Build`/`Validate`/
/// `ValidateAndBuild`/`EncodeToTree`.
pub fn emit_instruction(ctx: &mut GenContext, plan: &InstructionPlan) -> Result<(String, String), GenError> {
    let mut out = String::new();
    let instr = plan.instruction;
    let struct_name = plan.struct_name.clone();
    ctx.claim_identifier(struct_name.clone())?;

    let disc_var = discriminator_var_name(&instr.name);
    out.push_str(&format!(
        "var {disc_var} = [8]byte{{{}}}\n\n",
        plan.discriminator.iter().map(|b| b.to_string()).collect::<Vec<_>>().join(", ")
    ));

    out.push_str(&format!("type {struct_name} struct {{\n"));
    out.push_str(&render_fields(ctx, &plan.args)?);
    out.push_str(&format!(
        "\n\t// {} opaque account metas, in declaration order (§8 \"Account ordering\").\n\tag_solanago.AccountMetaSlice `bin:\"-\" borsh_skip:\"true\"`\n",
        plan.flat_accounts.len()
    ));
    out.push_str("}\n\n");

    let spec = EncodeDecodeSpec {
        struct_name: &struct_name,
        fields: &plan.args,
        discriminator: Some(plan.discriminator),
        option_policy: OptionPolicy::AssumePresent,
    };
    out.push_str(&crate::structs::emit_encode_decode(ctx, &spec)?);
    out.push('\n');

    out.push_str(&emit_builder_constructor(ctx, plan, &struct_name)?);
    out.push_str(&emit_arg_setters(ctx, plan, &struct_name)?);
    out.push_str(&emit_account_accessors(plan, &struct_name));
    out.push_str(&emit_group_builders(ctx, plan, &struct_name)?);
    out.push_str(&emit_pda_helpers_for_instruction(ctx, plan)?);
    out.push_str(&emit_validate_and_build(plan, &struct_name));

    Ok((out, struct_name))
}

fn emit_builder_constructor(
    ctx: &mut GenContext,
    plan: &InstructionPlan,
    struct_name: &str,
) -> Result<String, GenError> {
    let ctor = new_instruction_builder_fn(&plan.instruction.name);
    let mut out = String::new();
    out.push_str(&format!(
        "// {ctor} returns a builder with a pre-sized account-meta slice; fixed\n// addresses known at generation time are already filled in.\nfunc {ctor}() *{struct_name} {{\n"
    ));
    out.push_str(&format!(
        "\tnd := &{struct_name}{{}}\n\tnd.AccountMetaSlice = make(ag_solanago.AccountMetaSlice, {})\n",
        plan.flat_accounts.len()
    ));
    for (i, account) in plan.flat_accounts.iter().enumerate() {
        if let Some(address) = &account.address {
            ctx.intern_address(address.clone());
            out.push_str(&format!(
                "\tnd.AccountMetaSlice[{i}] = ag_solanago.Meta(ag_solanago.MustPublicKeyFromBase58(\"{address}\"))",
            ));
            if account.writable {
                out.push_str(".WRITE()");
            }
            if account.signer {
                out.push_str(".SIGNER()");
            }
            out.push('\n');
        }
    }
    out.push_str("\treturn nd\n}\n\n");
    Ok(out)
}

fn emit_arg_setters(
    ctx: &GenContext,
    plan: &InstructionPlan,
    struct_name: &str,
) -> Result<String, GenError> {
    let mut out = String::new();
    for field in &plan.instruction.args {
        let setter = arg_setter_name(&field.name);
        let go_ty = go_type(ctx, &field.ty)?;
        let pascal = to_pascal_case(&field.name);
        out.push_str(&format!(
            "func (nd *{struct_name}) {setter}(value {go_ty}) *{struct_name} {{\n\tnd.{pascal} = value\n\treturn nd\n}}\n\n"
        ));
    }
    Ok(out)
}

fn emit_account_accessors(plan: &InstructionPlan, struct_name: &str) -> String {
    let mut out = String::new();
    for (i, account) in plan.flat_accounts.iter().enumerate() {
        let setter = account_setter_name(&account.name);
        let getter = account_getter_name(&account.name);
        let mut meta = "ag_solanago.Meta(account)".to_string();
        if account.writable {
            meta.push_str(".WRITE()");
        }
        if account.signer {
            meta.push_str(".SIGNER()");
        }
        out.push_str(&format!(
            "func (nd *{struct_name}) {setter}(account ag_solanago.PublicKey) *{struct_name} {{\n\tnd.AccountMetaSlice[{i}] = {meta}\n\treturn nd\n}}\n\n"
        ));
        out.push_str(&format!(
            "func (nd *{struct_name}) {getter}() ag_solanago.PublicKey {{\n\treturn nd.AccountMetaSlice[{i}].PublicKey\n}}\n\n"
        ));
    }
    out
}

/// Nested account groups (§4.6 "Account groups") get a small sub-builder
/// with one setter per member, accepted in one call via
/// `Set<Group>AccountsFromBuilder`.
fn emit_group_builders(
    _ctx: &GenContext,
    plan: &InstructionPlan,
    struct_name: &str,
) -> Result<String, GenError> {
    let mut out = String::new();
    for group in top_level_groups(&plan.instruction.accounts) {
        let group_struct = format!("{struct_name}{}Accounts", to_pascal_case(&group.name));
        let group_flat = flatten(&group.accounts);
        out.push_str(&format!("type {group_struct} struct {{\n"));
        for account in &group_flat {
            out.push_str(&format!("\t{} ag_solanago.PublicKey\n", to_pascal_case(&account.name)));
        }
        out.push_str("}\n\n");

        let setter = format!("Set{}AccountsFromBuilder", to_pascal_case(&group.name));
        out.push_str(&format!(
            "func (nd *{struct_name}) {setter}(b {group_struct}) *{struct_name} {{\n"
        ));
        for account in &group_flat {
            out.push_str(&format!(
                "\tnd.{}(b.{})\n",
                account_setter_name(&account.name),
                to_pascal_case(&account.name),
            ));
        }
        out.push_str("\treturn nd\n}\n\n");
    }
    out
}

fn emit_pda_helpers_for_instruction(ctx: &mut GenContext, plan: &InstructionPlan) -> Result<String, GenError> {
    let mut out = String::new();
    for account in &plan.flat_accounts {
        if let Some(pda) = &account.pda {
            let plan_pda = resolve_pda(ctx, &account.name, pda, &plan.instruction.args, &plan.flat_accounts)?;
            out.push_str(&emit_pda_helpers(ctx, &plan_pda));
            out.push('\n');
        }
    }
    Ok(out)
}

/// `Validate`/`Build`/`ValidateAndBuild`/`EncodeToTree` (§4.6, §8 S3): every
/// non-optional account's meta must be non-zero before a `solana.Instruction`
/// is materialized.
fn emit_validate_and_build(plan: &InstructionPlan, struct_name: &str) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "func (nd *{struct_name}) Validate() error {{\n"
    ));
    for (i, account) in plan.flat_accounts.iter().enumerate() {
        if !account.optional {
            out.push_str(&format!(
                "\tif nd.AccountMetaSlice[{i}] == nil || nd.AccountMetaSlice[{i}].PublicKey.IsZero() {{\n\t\treturn fmt.Errorf(\"account \\\"{name}\\\" is not set\")\n\t}}\n",
                name = account.name,
            ));
        }
    }
    out.push_str("\treturn nil\n}\n\n");

    out.push_str(&format!(
        "func (nd {struct_name}) Build() *Instruction {{\n\treturn &Instruction{{BaseVariant: ag_binary.BaseVariant{{\n\t\tTypeID: {variant},\n\t\tImpl:   nd,\n\t}}}}\n}}\n\n",
        variant = crate::dispatch::variant_var_name(&plan.instruction.name),
    ));

    out.push_str(&format!(
        "func (nd {struct_name}) ValidateAndBuild() (*Instruction, error) {{\n\tif err := nd.Validate(); err != nil {{\n\t\treturn nil, err\n\t}}\n\treturn nd.Build(), nil\n}}\n\n"
    ));

    out
}

/// `New<Name>Instruction` (§4.6): the friendliest entry point, taking every
/// argument and account as a positional parameter in declaration order.
/// Account params collide with an identically-named arg param are suffixed
/// `Account` until unique (§4.6 "collide args and accounts by suffixing
/// `Account`", §8 "Name conflict").
pub fn emit_new_instruction_fn(
    ctx: &GenContext,
    plan: &InstructionPlan,
    struct_name: &str,
) -> Result<String, GenError> {
    let fn_name = new_instruction_fn(&plan.instruction.name);
    let mut used_param_names: std::collections::HashSet<String> = std::collections::HashSet::new();
    let mut params = Vec::new();
    let mut arg_param_names = Vec::new();
    for field in &plan.instruction.args {
        let param_name = to_camel_case(&field.name);
        used_param_names.insert(param_name.clone());
        params.push(format!("{} {}", param_name, go_type(ctx, &field.ty)?));
        arg_param_names.push(param_name);
    }
    let mut account_param_names = Vec::new();
    for account in &plan.flat_accounts {
        if account.address.is_none() {
            let mut param_name = to_camel_case(&account.name);
            while used_param_names.contains(&param_name) {
                param_name.push_str("Account");
            }
            used_param_names.insert(param_name.clone());
            params.push(format!("{param_name} ag_solanago.PublicKey"));
            account_param_names.push(param_name);
        }
    }

    let mut out = String::new();
    out.push_str(&format!(
        "func {fn_name}({}) *{struct_name} {{\n\tnd := {builder}()\n",
        params.join(", "),
        builder = new_instruction_builder_fn(&plan.instruction.name),
    ));
    for (field, arg) in plan.instruction.args.iter().zip(&arg_param_names) {
        out.push_str(&format!(
            "\tnd.{setter}({arg})\n",
            setter = arg_setter_name(&field.name),
        ));
    }
    let addressless_accounts = plan.flat_accounts.iter().filter(|a| a.address.is_none());
    for (account, arg) in addressless_accounts.zip(&account_param_names) {
        out.push_str(&format!(
            "\tnd.{setter}({arg})\n",
            setter = account_setter_name(&account.name),
        ));
    }
    out.push_str("\treturn nd\n}\n");
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::GenContext;

    fn empty_idl() -> Idl {
        Idl {
            address: None,
            metadata: Metadata {
                name: "example".into(), version: None, spec: None,
                description: None, repository: None, address: None, dependencies: None,
            },
            docs: vec![], instructions: vec![], accounts: vec![], events: vec![],
            errors: vec![], types: vec![], constants: vec![],
        }
    }

    fn sample_instruction() -> Instruction {
        Instruction {
            name: "initialize_vault".into(),
            docs: vec![],
            discriminator: None,
            discriminant: None,
            accounts: vec![
                AccountItem::Leaf(Account {
                    name: "owner".into(), docs: vec![], writable: true, signer: true,
                    optional: false, address: None, pda: None,
                }),
                AccountItem::Leaf(Account {
                    name: "systemProgram".into(), docs: vec![], writable: false, signer: false,
                    optional: false, address: Some("11111111111111111111111111111111".into()), pda: None,
                }),
            ],
            args: vec![Field {
                name: "amount".into(), docs: vec![], ty: Type::Simple(Simple::U64),
            }],
            returns: None,
        }
    }

    #[test]
    fn discriminator_falls_back_to_sighash() {
        let instr = sample_instruction();
        let disc = resolve_discriminator(&instr);
        assert_eq!(&disc[..], &instruction_sighash("initialize_vault")[..]);
    }

    #[test]
    fn emits_struct_and_setters() {
        let instr = sample_instruction();
        let plan = plan_instruction(&instr);
        let mut ctx = GenContext::build(&empty_idl()).unwrap();
        let (src, _) = emit_instruction(&mut ctx, &plan).unwrap();
        assert!(src.contains("type Instruction_InitializeVault struct"));
        assert!(src.contains("SetAmount"));
        assert!(src.contains("SetOwnerAccount"));
        assert!(src.contains("func (nd *Instruction_InitializeVault) Validate() error"));
    }

    #[test]
    fn new_instruction_fn_skips_fixed_address_accounts() {
        let instr = sample_instruction();
        let plan = plan_instruction(&instr);
        let ctx = GenContext::build(&empty_idl()).unwrap();
        let src = emit_new_instruction_fn(&ctx, &plan, "Instruction_InitializeVault").unwrap();
        assert!(src.contains("func NewInitializeVaultInstruction(amount uint64, owner ag_solanago.PublicKey)"));
        assert!(!src.contains("systemProgram ag_solanago.PublicKey"));
    }

    #[test]
    fn new_instruction_fn_suffixes_colliding_account_param_with_account() {
        let instr = Instruction {
            name: "set_authority".into(),
            docs: vec![],
            discriminator: None,
            discriminant: None,
            accounts: vec![AccountItem::Leaf(Account {
                name: "authority".into(), docs: vec![], writable: true, signer: true,
                optional: false, address: None, pda: None,
            })],
            args: vec![Field {
                name: "authority".into(), docs: vec![], ty: Type::Simple(Simple::Pubkey),
            }],
            returns: None,
        };
        let plan = plan_instruction(&instr);
        let ctx = GenContext::build(&empty_idl()).unwrap();
        let src = emit_new_instruction_fn(&ctx, &plan, "Instruction_SetAuthority").unwrap();
        assert!(src.contains(
            "func NewSetAuthorityInstruction(authority ag_solanago.PublicKey, authorityAccount ag_solanago.PublicKey)"
        ));
        assert!(src.contains("nd.SetAuthority(authority)"));
        assert!(src.contains("nd.SetAuthorityAccount(authorityAccount)"));
    }
}
