//! Instruction dispatch / sum type (§4.9).
//!
//! One package-level `Instruction` sum type wraps every per-instruction
//! builder behind a single `TypeID`-tagged variant container, the same
//! shape `ag_binary.BaseVariant` gives a `gagliardetto/binary` client: a
//! registry maps discriminator bytes back to a constructor, and decoding an
//! opaque instruction byte string dispatches through it.

use crate::context::GenContext;
use crate::naming::{discriminator_var_name, instruction_struct_name, to_pascal_case};
use anchorgen_idl::discriminator::DiscriminatorEncoding;
use anchorgen_idl::types::Instruction;

/// The `ag_binary` `TypeID` encoding matching a program's discriminator
/// scheme (§4.3, §4.9): Anchor's 8-byte sighash needs its own encoding,
/// while the Steel-style kinds map straight onto `ag_binary`'s fixed-width
/// encodings.
fn type_id_encoding(encoding: DiscriminatorEncoding) -> &'static str {
    match encoding {
        DiscriminatorEncoding::Anchor => "ag_binary.AnchorTypeIDEncoding",
        DiscriminatorEncoding::Uint8 => "ag_binary.Uint8TypeIDEncoding",
        DiscriminatorEncoding::Uint32 => "ag_binary.Uint32TypeIDEncoding",
        DiscriminatorEncoding::Uvarint32 => "ag_binary.Uvarint32TypeIDEncoding",
    }
}

/// The package-level `ag_binary.TypeID` constant name for one instruction,
/// referenced by its builder's `Build` method (`instruction.rs`) and here.
pub fn variant_var_name(instruction_name: &str) -> String {
    format!("{}Variant", to_pascal_case(instruction_name))
}

/// Emits the registry, the `Instruction` sum type, and `DecodeInstruction`.
pub fn emit_dispatch(ctx: &GenContext, instructions: &[Instruction]) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "var InstructionImplDef = ag_binary.NewVariantDefinition({}, []ag_binary.VariantType{{\n",
        type_id_encoding(ctx.discriminator_encoding),
    ));
    for instr in instructions {
        out.push_str(&format!(
            "\t{{Name: \"{name}\", Type: (*{struct_name})(nil)}},\n",
            name = instr.name,
            struct_name = instruction_struct_name(&instr.name),
        ));
    }
    out.push_str("})\n\n");

    for instr in instructions {
        let disc = discriminator_var_name(&instr.name);
        let variant = variant_var_name(&instr.name);
        out.push_str(&format!(
            "var {variant} = ag_binary.TypeID({disc})\n"
        ));
    }
    out.push('\n');

    out.push_str("type Instruction struct {\n\tag_binary.BaseVariant\n}\n\n");

    out.push_str(
        "func (inst *Instruction) EncodeToTree(parent ag_treeout.Branches) {\n\tparent.Child(ag_format.Program(ProgramName, ProgramID)).ParentFunc(func(programBranch ag_treeout.Branches) {\n\t\tprogramBranch.Child(ag_format.Instruction(InstructionImplDef.Name(inst.TypeID))).ParentFunc(func(instructionBranch ag_treeout.Branches) {\n\t\t\tif named, ok := inst.Impl.(interface{ EncodeToTree(ag_treeout.Branches) }); ok {\n\t\t\t\tnamed.EncodeToTree(instructionBranch)\n\t\t\t}\n\t\t})\n\t})\n}\n\n",
    );

    out.push_str(
        "func (inst *Instruction) MarshalWithEncoder(encoder *ag_binary.Encoder) error {\n\treturn encoder.Encode(inst.Impl)\n}\n\n",
    );

    out.push_str(
        "func (inst *Instruction) UnmarshalWithDecoder(decoder *ag_binary.Decoder) (err error) {\n\tinst.BaseVariant, err = InstructionImplDef.DecodeVariant(decoder)\n\treturn err\n}\n\n",
    );

    out.push_str(
        "func (inst *Instruction) ToLegacyInstruction() (solana.Instruction, error) {\n\tif inst.Impl == nil {\n\t\treturn nil, fmt.Errorf(\"instruction is nil\")\n\t}\n\tif impl, ok := inst.Impl.(solana.Instruction); ok {\n\t\treturn impl, nil\n\t}\n\treturn nil, fmt.Errorf(\"instruction %T does not implement solana.Instruction\", inst.Impl)\n}\n\n",
    );

    out.push_str(
        "// DecodeInstruction decodes a raw program instruction's data bytes into\n// the typed Instruction sum type, dispatching on the discriminator\n// registered in InstructionImplDef.\nfunc DecodeInstruction(accounts []*ag_solanago.AccountMeta, data []byte) (*Instruction, error) {\n\tinst := new(Instruction)\n\tif err := ag_binary.NewBorshDecoder(data).Decode(inst); err != nil {\n\t\treturn nil, fmt.Errorf(\"unable to decode instruction: %w\", err)\n\t}\n\tif v, ok := inst.Impl.(ag_solanago.AccountsSettable); ok {\n\t\tif err := v.SetAccounts(accounts); err != nil {\n\t\t\treturn nil, fmt.Errorf(\"unable to set accounts: %w\", err)\n\t\t}\n\t}\n\treturn inst, nil\n}\n",
    );

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::GenContext;
    use anchorgen_idl::types::*;

    fn empty_ctx() -> GenContext {
        let idl = Idl {
            address: None,
            metadata: Metadata {
                name: "example".into(), version: None, spec: None,
                description: None, repository: None, address: None, dependencies: None,
            },
            docs: vec![], instructions: vec![], accounts: vec![], events: vec![],
            errors: vec![], types: vec![], constants: vec![],
        };
        GenContext::build(&idl).unwrap()
    }

    #[test]
    fn registers_each_instruction() {
        let instr = Instruction {
            name: "initialize".into(), docs: vec![], discriminator: None, discriminant: None,
            accounts: vec![], args: vec![], returns: None,
        };
        let src = emit_dispatch(&empty_ctx(), std::slice::from_ref(&instr));
        assert!(src.contains("\"initialize\""));
        assert!(src.contains("func DecodeInstruction"));
        assert!(src.contains("var InitializeVariant"));
    }

    fn ctx_with_instructions(instrs: Vec<Instruction>) -> GenContext {
        let idl = Idl {
            address: None,
            metadata: Metadata {
                name: "example".into(), version: None, spec: None,
                description: None, repository: None, address: None, dependencies: None,
            },
            docs: vec![], instructions: instrs, accounts: vec![], events: vec![],
            errors: vec![], types: vec![], constants: vec![],
        };
        GenContext::build(&idl).unwrap()
    }

    #[test]
    fn anchor_style_discriminator_uses_anchor_type_id_encoding() {
        let instr = Instruction {
            name: "initialize".into(), docs: vec![], discriminator: None, discriminant: None,
            accounts: vec![], args: vec![], returns: None,
        };
        let ctx = ctx_with_instructions(vec![instr.clone()]);
        let src = emit_dispatch(&ctx, std::slice::from_ref(&instr));
        assert!(src.contains("ag_binary.NewVariantDefinition(ag_binary.AnchorTypeIDEncoding,"));
    }

    #[test]
    fn steel_style_discriminant_uses_matching_uint8_encoding() {
        let instr = Instruction {
            name: "initialize".into(), docs: vec![],
            discriminator: None,
            discriminant: Some(Discriminant { kind: DiscriminantKind::U8, value: 0 }),
            accounts: vec![], args: vec![], returns: None,
        };
        let ctx = ctx_with_instructions(vec![instr.clone()]);
        let src = emit_dispatch(&ctx, std::slice::from_ref(&instr));
        assert!(src.contains("ag_binary.NewVariantDefinition(ag_binary.Uint8TypeIDEncoding,"));
    }
}
