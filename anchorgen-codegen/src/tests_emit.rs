//! Round-trip fuzz test emission (§4.8), gated by the `tests` CLI flag.
//!
//! For every instruction, a fuzzer fills the args struct with random
//! values; complex-enum args are tested variant-by-variant. The account
//! meta slice is excluded from the comparison (cleared before encode),
//! since it carries no information the args struct does.

use crate::context::GenContext;
use crate::error::GenError;
use crate::instruction::InstructionPlan;
use crate::naming::new_instruction_builder_fn;
use crate::resolve::is_complex_enum_field;
use anchorgen_idl::types::*;

pub fn emit_instruction_fuzz_test(ctx: &GenContext, plan: &InstructionPlan) -> Result<String, GenError> {
    let struct_name = &plan.struct_name;
    let test_name = format!("TestEncodeDecode_{struct_name}");
    let builder = new_instruction_builder_fn(&plan.instruction.name);

    let complex_enum_args: Vec<&crate::structs::StructField> = plan
        .args
        .iter()
        .filter(|f| is_complex_enum_field(ctx, &f.ty))
        .collect();

    let mut out = String::new();
    out.push_str(&format!("func {test_name}(t *testing.T) {{\n"));

    if complex_enum_args.is_empty() {
        out.push_str(&format!(
            "\tfuzzer := fuzz.New().NilChance(0)\n\tfor i := 0; i < 128; i++ {{\n\t\tnd := {builder}()\n\t\tfuzzer.Fuzz(nd)\n\t\tnd.AccountMetaSlice = make(ag_solanago.AccountMetaSlice, {n})\n\t\tbuf := new(bytes.Buffer)\n\t\trequire.NoError(t, ag_binary.NewBorshEncoder(buf).Encode(nd))\n\n\t\tgot := new({struct_name})\n\t\trequire.NoError(t, ag_binary.NewBorshDecoder(buf.Bytes()).Decode(got))\n\t\tgot.AccountMetaSlice = nd.AccountMetaSlice\n\t\trequire.Equal(t, nd, got)\n\t}}\n",
            builder = builder,
            struct_name = struct_name,
            n = plan.flat_accounts.len(),
        ));
    } else {
        out.push_str("\tfuzzer := fuzz.New().NilChance(0)\n");
        for field in &complex_enum_args {
            let enum_name = crate::structs::complex_enum_name(&field.ty);
            out.push_str(&format!(
                "\tfor _, variant := range all{enum}Variants() {{\n\t\tnd := {builder}()\n\t\tfuzzer.Fuzz(nd)\n\t\tnd.{go_name} = variant\n\t\tfuzzer.Fuzz(nd.{go_name})\n\t\tnd.AccountMetaSlice = make(ag_solanago.AccountMetaSlice, {n})\n\t\tbuf := new(bytes.Buffer)\n\t\trequire.NoError(t, ag_binary.NewBorshEncoder(buf).Encode(nd))\n\n\t\tgot := new({struct_name})\n\t\trequire.NoError(t, ag_binary.NewBorshDecoder(buf.Bytes()).Decode(got))\n\t\tgot.AccountMetaSlice = nd.AccountMetaSlice\n\t\trequire.Equal(t, nd, got)\n\t}}\n",
                enum = enum_name,
                go_name = field.go_name,
                builder = builder,
                struct_name = struct_name,
                n = plan.flat_accounts.len(),
            ));
        }
    }

    out.push_str("}\n");
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::GenContext;
    use crate::instruction::plan_instruction;

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

    #[test]
    fn emits_a_round_trip_test_per_instruction() {
        let instr = Instruction {
            name: "initialize".into(), docs: vec![], discriminator: None, discriminant: None,
            accounts: vec![], args: vec![Field { name: "amount".into(), docs: vec![], ty: Type::Simple(Simple::U64) }],
            returns: None,
        };
        let plan = plan_instruction(&instr);
        let ctx = GenContext::build(&empty_idl()).unwrap();
        let src = emit_instruction_fuzz_test(&ctx, &plan).unwrap();
        assert!(src.contains("func TestEncodeDecode_Instruction_Initialize(t *testing.T)"));
        assert!(src.contains("fuzz.New()"));
    }
}
