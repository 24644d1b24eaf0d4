//! Typed account-data and plain-struct emission (§4.5, §4.10).
//!
//! Both `accounts` (on-chain state, discriminator-prefixed) and `types`
//! (plain structs referenced by value) share the same struct/encode/decode
//! machinery in `structs.rs`; this module only supplies the per-kind
//! discriminator and struct-name policy.

use crate::context::GenContext;
use crate::error::GenError;
use crate::naming::account_data_struct_name;
use crate::structs::{render_fields, EncodeDecodeSpec, OptionPolicy};
use anchorgen_idl::discriminator::account_sighash;
use anchorgen_idl::types::*;

/// Emits one on-chain account's Go struct plus its encode/decode methods,
/// discriminator-prefixed the same way instructions are (§4.5 "struct kinds
/// that carry a discriminator"). Field layout is looked up from the `types`
/// entry sharing the account's name, per Anchor's own convention.
pub fn emit_account(ctx: &mut GenContext, account_def: &AccountDef) -> Result<String, GenError> {
    let struct_name = ctx.disambiguate(&account_data_struct_name(&account_def.name));
    ctx.mark_emitted(struct_name.clone());

    let type_def = ctx.lookup_type(&account_def.name).ok_or_else(|| GenError::Resolution {
        path: account_def.name.clone(),
        suggestion: None,
    })?;
    let named_fields = match &type_def.body {
        TypeDefKind::Struct { fields } => fields.clone(),
        _ => {
            return Err(GenError::Unsupported {
                node: account_def.name.clone(),
                feature: "non-struct account data type".to_string(),
            })
        }
    };
    let fields = crate::structs::fields_from_defined(&named_fields);

    let discriminator = account_def
        .discriminator
        .clone()
        .map(|bytes| {
            let mut out = [0u8; 8];
            let n = bytes.len().min(8);
            out[..n].copy_from_slice(&bytes[..n]);
            out
        })
        .unwrap_or_else(|| account_sighash(&account_def.name));

    let mut out = String::new();
    for doc in &account_def.docs {
        out.push_str(&format!("// {doc}\n"));
    }
    out.push_str(&format!("type {struct_name} struct {{\n"));
    out.push_str(&render_fields(ctx, &fields)?);
    out.push_str("}\n\n");

    let spec = EncodeDecodeSpec {
        struct_name: &struct_name,
        fields: &fields,
        discriminator: Some(discriminator),
        option_policy: OptionPolicy::NullChecked,
    };
    out.push_str(&crate::structs::emit_encode_decode(ctx, &spec)?);
    out.push('\n');
    Ok(out)
}

/// A plain `type` definition (§3.1 `TypeDef`, struct variant) with no
/// discriminator — used by value inside instruction args, account fields,
/// and complex-enum variants.
pub fn emit_plain_struct(ctx: &mut GenContext, type_def: &TypeDef) -> Result<Option<String>, GenError> {
    let fields = match &type_def.body {
        TypeDefKind::Struct { fields } => fields,
        TypeDefKind::Enum { .. } | TypeDefKind::Alias { .. } => return Ok(None),
    };

    let struct_name = ctx.disambiguate(&crate::naming::to_pascal_case(&type_def.name));
    ctx.mark_emitted(struct_name.clone());

    let struct_fields = crate::structs::fields_from_defined(fields);
    let mut out = String::new();
    for doc in &type_def.docs {
        out.push_str(&format!("// {doc}\n"));
    }
    out.push_str(&format!("type {struct_name} struct {{\n"));
    out.push_str(&render_fields(ctx, &struct_fields)?);
    out.push_str("}\n\n");

    let spec = EncodeDecodeSpec {
        struct_name: &struct_name,
        fields: &struct_fields,
        discriminator: None,
        option_policy: OptionPolicy::NullChecked,
    };
    out.push_str(&crate::structs::emit_encode_decode(ctx, &spec)?);
    out.push('\n');
    Ok(Some(out))
}
