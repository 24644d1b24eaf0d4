//! Struct serialization emission (§4.5).
//!
//! Shared by instruction args, typed structs, account data, event data, and
//! complex-enum variants with named or tuple fields — every named struct in
//! the output gets `MarshalWithEncoder`/`UnmarshalWithDecoder` built from
//! the same contract.

use crate::context::GenContext;
use crate::error::GenError;
use crate::naming::{to_pascal_case, tuple_elem_name};
use crate::resolve::{go_type, is_complex_enum_field};
use anchorgen_idl::types::*;

#[derive(Debug, Clone)]
pub struct StructField {
    pub go_name: String,
    pub docs: Vec<String>,
    pub ty: Type,
}

pub fn fields_from_defined(fields: &Option<DefinedFields>) -> Vec<StructField> {
    match fields {
        None => vec![],
        Some(DefinedFields::Named(named)) => named
            .iter()
            .map(|f| StructField {
                go_name: to_pascal_case(&f.name),
                docs: f.docs.clone(),
                ty: f.ty.clone(),
            })
            .collect(),
        Some(DefinedFields::Tuple(tys)) => tys
            .iter()
            .enumerate()
            .map(|(i, ty)| StructField {
                go_name: tuple_elem_name(i),
                docs: vec![],
                ty: ty.clone(),
            })
            .collect(),
    }
}

pub fn fields_from_named(fields: &[Field]) -> Vec<StructField> {
    fields
        .iter()
        .map(|f| StructField {
            go_name: to_pascal_case(&f.name),
            docs: f.docs.clone(),
            ty: f.ty.clone(),
        })
        .collect()
}

/// Whether a field's Option indirection is null-checked on encode. Disabled
/// for instruction args, where presence is guaranteed by `Validate` before
/// `Build` runs (§4.5, §4.6).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionPolicy {
    NullChecked,
    AssumePresent,
}

/// Renders a Go struct's field declarations (doc comments included).
pub fn render_fields(ctx: &GenContext, fields: &[StructField]) -> Result<String, GenError> {
    let mut out = String::new();
    for field in fields {
        for doc in &field.docs {
            out.push_str(&format!("\t// {doc}\n"));
        }
        let go_ty = field_go_type(ctx, field)?;
        out.push_str(&format!("\t{} {}\n", field.go_name, go_ty));
    }
    Ok(out)
}

/// A field's declared Go type, honoring the complex-enum indirection rule
/// of §4.5/§9: a complex-enum field is never additionally wrapped in a
/// pointer even if the IDL marks it `Option`, because the marker
/// abstraction's `nil` already means "absent".
fn field_go_type(ctx: &GenContext, field: &StructField) -> Result<String, GenError> {
    if is_complex_enum_field(ctx, &field.ty) {
        let inner = match &field.ty {
            Type::Option { option } => option.as_ref(),
            other => other,
        };
        return go_type(ctx, inner);
    }
    go_type(ctx, &field.ty)
}

pub struct EncodeDecodeSpec<'a> {
    pub struct_name: &'a str,
    pub fields: &'a [StructField],
    pub discriminator: Option<[u8; 8]>,
    pub option_policy: OptionPolicy,
}

/// Emits `MarshalWithEncoder`/`UnmarshalWithDecoder` per the encode/decode
/// contract of §4.5.
pub fn emit_encode_decode(ctx: &GenContext, spec: &EncodeDecodeSpec) -> Result<String, GenError> {
    let mut out = String::new();

    out.push_str(&format!(
        "func (obj *{name}) MarshalWithEncoder(encoder *ag_binary.Encoder) error {{\n",
        name = spec.struct_name
    ));
    if let Some(disc) = spec.discriminator {
        out.push_str(&format!(
            "\tif err := encoder.WriteBytes([]byte{{{}}}, false); err != nil {{\n\t\treturn err\n\t}}\n",
            disc.iter().map(|b| b.to_string()).collect::<Vec<_>>().join(", ")
        ));
    }
    for field in spec.fields {
        out.push_str(&emit_field_encode(ctx, field, spec.option_policy)?);
    }
    out.push_str("\treturn nil\n}\n\n");

    out.push_str(&format!(
        "func (obj *{name}) UnmarshalWithDecoder(decoder *ag_binary.Decoder) error {{\n",
        name = spec.struct_name
    ));
    if let Some(disc) = spec.discriminator {
        let disc_literal = disc.iter().map(|b| b.to_string()).collect::<Vec<_>>().join(", ");
        out.push_str(&format!(
            "\tdiscriminator, err := decoder.ReadTypeID()\n\tif err != nil {{\n\t\treturn err\n\t}}\n\tif !discriminator.Equal(ag_binary.TypeID{{{disc_literal}}}) {{\n\t\treturn fmt.Errorf(\"wrong discriminator: wanted [{disc_literal}], got %s\", discriminator)\n\t}}\n",
        ));
    }
    for field in spec.fields {
        out.push_str(&emit_field_decode(ctx, field, spec.option_policy)?);
    }
    out.push_str("\treturn nil\n}\n");

    Ok(out)
}

fn emit_field_encode(
    ctx: &GenContext,
    field: &StructField,
    policy: OptionPolicy,
) -> Result<String, GenError> {
    let target = format!("obj.{}", field.go_name);

    if is_complex_enum_field(ctx, &field.ty) {
        let enum_name = complex_enum_name(&field.ty);
        return Ok(format!(
            "\t{{\n\t\tcontainer := {lower}ContainerFrom({target})\n\t\tif err := encoder.Encode(container); err != nil {{\n\t\t\treturn err\n\t\t}}\n\t}}\n",
            lower = crate::naming::to_camel_case(&enum_name),
            target = target,
        ));
    }

    if let Type::Option { option } = &field.ty {
        reject_unsupported_inline(option)?;
        return Ok(match policy {
            OptionPolicy::NullChecked => format!(
                "\tif {target} == nil {{\n\t\tif err := encoder.WriteBool(false); err != nil {{\n\t\t\treturn err\n\t\t}}\n\t}} else {{\n\t\tif err := encoder.WriteBool(true); err != nil {{\n\t\t\treturn err\n\t\t}}\n\t\tif err := encoder.Encode(*{target}); err != nil {{\n\t\t\treturn err\n\t\t}}\n\t}}\n",
                target = target,
            ),
            OptionPolicy::AssumePresent => format!(
                "\tif err := encoder.WriteBool(true); err != nil {{\n\t\treturn err\n\t}}\n\tif err := encoder.Encode(*{target}); err != nil {{\n\t\treturn err\n\t}}\n",
                target = target,
            ),
        });
    }

    reject_unsupported_inline(&field.ty)?;
    Ok(format!(
        "\tif err := encoder.Encode({target}); err != nil {{\n\t\treturn err\n\t}}\n",
        target = target,
    ))
}

fn emit_field_decode(
    ctx: &GenContext,
    field: &StructField,
    policy: OptionPolicy,
) -> Result<String, GenError> {
    let target = format!("obj.{}", field.go_name);

    if is_complex_enum_field(ctx, &field.ty) {
        let enum_name = complex_enum_name(&field.ty);
        let lower = crate::naming::to_camel_case(&enum_name);
        return Ok(format!(
            "\t{{\n\t\tvar container {lower}Container\n\t\tif err := decoder.Decode(&container); err != nil {{\n\t\t\treturn err\n\t\t}}\n\t\tvariant, err := container.To{enum}()\n\t\tif err != nil {{\n\t\t\treturn err\n\t\t}}\n\t\t{target} = variant\n\t}}\n",
            lower = lower,
            enum = to_pascal_case(&enum_name),
            target = target,
        ));
    }

    let stoppable = matches!(field.ty, Type::Option { .. })
        || matches!(field.ty, Type::Simple(Simple::Bool));

    if let Type::Option { option } = &field.ty {
        reject_unsupported_inline(option)?;
        let prelude = if policy == OptionPolicy::NullChecked && stoppable {
            "\tif !decoder.HasRemaining() {\n\t\treturn nil\n\t}\n"
        } else {
            ""
        };
        return Ok(format!(
            "{prelude}\t{{\n\t\tpresent, err := decoder.ReadBool()\n\t\tif err != nil {{\n\t\t\treturn err\n\t\t}}\n\t\tif present {{\n\t\t\tif err := decoder.Decode(&{target}); err != nil {{\n\t\t\t\treturn err\n\t\t\t}}\n\t\t}}\n\t}}\n",
            prelude = prelude,
            target = target,
        ));
    }

    reject_unsupported_inline(&field.ty)?;

    if stoppable {
        return Ok(format!(
            "\tif !decoder.HasRemaining() {{\n\t\treturn nil\n\t}}\n\tif err := decoder.Decode(&{target}); err != nil {{\n\t\treturn err\n\t}}\n",
            target = target,
        ));
    }

    Ok(format!(
        "\tif err := decoder.Decode(&{target}); err != nil {{\n\t\treturn err\n\t}}\n",
        target = target,
    ))
}

pub(crate) fn complex_enum_name(ty: &Type) -> String {
    match ty {
        Type::Defined { defined } => defined.name.clone(),
        Type::Option { option } => complex_enum_name(option),
        _ => unreachable!("complex_enum_name called on a non-defined type"),
    }
}

fn reject_unsupported_inline(ty: &Type) -> Result<(), GenError> {
    crate::resolve::reject_unsupported(ty)
}
