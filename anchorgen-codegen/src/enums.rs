//! Enum classification and emission (§4.4, §8 scenarios S1/S2).
//!
//! Classification itself lives on `GenContext` (computed once, at context-
//! build time); this module only renders the two possible shapes.

use crate::context::GenContext;
use crate::error::GenError;
use crate::naming::{
    complex_variant_struct_name, enum_container_name, is_variant_marker_name, to_camel_case,
    to_pascal_case,
};
use crate::structs::{fields_from_defined, render_fields, EncodeDecodeSpec, OptionPolicy};
use anchorgen_idl::types::*;

/// A scalar enum (§4.4): every variant has no fields. Emitted as an 8-bit
/// integer with named `iota` constants, a `String()` conversion, and no
/// bespoke (de)serialization — it rides the base type's own borsh rules.
pub fn emit_scalar_enum(name: &str, variants: &[EnumVariant]) -> String {
    let type_name = to_pascal_case(name);
    let mut out = String::new();
    out.push_str(&format!("type {type_name} uint8\n\nconst (\n"));
    for (i, v) in variants.iter().enumerate() {
        let const_name = format!("{type_name}{}", to_pascal_case(&v.name));
        if i == 0 {
            out.push_str(&format!("\t{const_name} {type_name} = iota\n"));
        } else {
            out.push_str(&format!("\t{const_name}\n"));
        }
    }
    out.push_str(")\n\n");

    out.push_str(&format!("func (v {type_name}) String() string {{\n\tswitch v {{\n"));
    for v in variants {
        let const_name = format!("{type_name}{}", to_pascal_case(&v.name));
        out.push_str(&format!(
            "\tcase {const_name}:\n\t\treturn \"{}\"\n",
            v.name
        ));
    }
    out.push_str(&format!(
        "\tdefault:\n\t\treturn \"{type_name}(unknown)\"\n\t}}\n}}\n"
    ));
    out
}

/// A complex enum (§4.4, §9 "Complex-enum field indirection"): emitted as a
/// marker interface implemented by one concrete struct per variant, plus a
/// private tagged-container struct used only for (de)serialization.
pub fn emit_complex_enum(ctx: &GenContext, name: &str, variants: &[EnumVariant]) -> Result<String, GenError> {
    let marker = to_pascal_case(name);
    let marker_method = is_variant_marker_name(name);
    let container = enum_container_name(name);
    let mut out = String::new();

    out.push_str(&format!("type {marker} interface {{\n\t{marker_method}()\n}}\n\n"));

    let mut variant_structs = Vec::new();
    for variant in variants {
        let struct_name = complex_variant_struct_name(name, &variant.name);
        let fields = fields_from_defined(&variant.fields);
        let field_src = render_fields(ctx, &fields)?;
        out.push_str(&format!("type {struct_name} struct {{\n{field_src}}}\n\n"));
        out.push_str(&format!("func (*{struct_name}) {marker_method}() {{}}\n\n"));
        variant_structs.push((struct_name, variant.name.clone()));
    }

    // `Enum` is tagged `borsh_enum:"true"` so the encoder writes only the
    // active variant's field, not every field with a presence prefix (§4.4,
    // §8 S2's tagged-union contract).
    out.push_str(&format!("type {container} struct {{\n\tEnum ag_binary.BorshEnum `borsh_enum:\"true\"`\n"));
    for (struct_name, variant_name) in &variant_structs {
        out.push_str(&format!(
            "\t{} {struct_name}\n",
            to_pascal_case(variant_name)
        ));
    }
    out.push_str("}\n\n");

    out.push_str(&format!(
        "func {lower}ContainerFrom(v {marker}) {container} {{\n\tswitch vv := v.(type) {{\n",
        lower = to_camel_case(&enum_container_name(name))
    ));
    for (i, (struct_name, variant_name)) in variant_structs.iter().enumerate() {
        out.push_str(&format!(
            "\tcase *{struct_name}:\n\t\treturn {container}{{Enum: {i}, {}: *vv}}\n",
            to_pascal_case(variant_name)
        ));
    }
    out.push_str(&format!(
        "\tdefault:\n\t\tpanic(\"unreachable: unknown {marker} variant\")\n\t}}\n}}\n\n"
    ));

    out.push_str(&format!(
        "func (c {container}) To{marker}() ({marker}, error) {{\n\tswitch c.Enum {{\n"
    ));
    for (i, (_, variant_name)) in variant_structs.iter().enumerate() {
        out.push_str(&format!(
            "\tcase {i}:\n\t\treturn &c.{}, nil\n",
            to_pascal_case(variant_name)
        ));
    }
    out.push_str(&format!(
        "\tdefault:\n\t\treturn nil, fmt.Errorf(\"unknown enum index: %d\", c.Enum)\n\t}}\n}}\n"
    ));

    Ok(out)
}

/// A small reflection-free helper used only by the fuzz-test emitter (§4.8):
/// one zero-value instance per variant, for tests to iterate when fuzzing a
/// complex-enum argument variant-by-variant.
pub fn emit_all_variants_helper(name: &str, variants: &[EnumVariant]) -> String {
    let marker = to_pascal_case(name);
    let mut out = String::new();
    out.push_str(&format!(
        "func all{marker}Variants() []{marker} {{\n\treturn []{marker}{{\n"
    ));
    for variant in variants {
        let struct_name = complex_variant_struct_name(name, &variant.name);
        out.push_str(&format!("\t\t&{struct_name}{{}},\n"));
    }
    out.push_str("\t}\n}\n");
    out
}

/// Per-variant encode/decode for a *named or tuple* fields complex-enum
/// variant (§4.5: "complex-enum variant with named or tuple fields" is one
/// of the struct kinds that gets the full encode/decode contract).
pub fn emit_variant_encode_decode(
    ctx: &GenContext,
    enum_name: &str,
    variant: &EnumVariant,
) -> Result<String, GenError> {
    let struct_name = complex_variant_struct_name(enum_name, &variant.name);
    let fields = fields_from_defined(&variant.fields);
    let spec = EncodeDecodeSpec {
        struct_name: &struct_name,
        fields: &fields,
        discriminator: None,
        option_policy: OptionPolicy::NullChecked,
    };
    crate::structs::emit_encode_decode(ctx, &spec)
}
